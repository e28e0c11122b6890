mod common;

use common::{harness, BASE_URL};
use content_admin_backend::TableStore;
use content_admin_core::{
    form::{REQUIRED_FIELDS_MESSAGE, UPLOAD_FAILED_MESSAGE},
    AddDialog, EditDialog, FormState, ImageChoice, ImageFile, ImageUploader,
};
use content_admin_models::{
    constants::NOT_CONFIRMED,
    entities::prelude::{
        BlogDraft, BlogPost, Event, EventDraft, NewsDraft, NewsItem, NewsKind, SponsoredDraft, SponsoredEvent,
        SponsoredLink, TeamMember, TeamMemberDraft,
    },
    Record,
};
use content_admin_repository::Repository;
use serde_json::json;
use std::sync::{atomic::Ordering, Arc};

fn add_dialog<R: Record>(h: &common::Harness) -> AddDialog<R> {
    AddDialog::new(
        Repository::new(Arc::clone(&h.client)),
        ImageUploader::new(Arc::clone(&h.client)),
    )
}

fn hack_night() -> EventDraft {
    EventDraft {
        name: "Hack Night".into(),
        venue: "Lab 3".into(),
        date: Some("2025-03-01".into()),
        time: Some("18:00".into()),
        description: "Intro to systems".into(),
    }
}

#[tokio::test]
async fn add_event_without_image_lists_dates_as_given() {
    let h = harness();
    let mut dialog = add_dialog::<Event>(&h);
    dialog.set_draft(hack_night());

    let created = dialog.submit().await.unwrap();
    assert_eq!(dialog.state(), &FormState::Success);
    assert_eq!(dialog.draft(), &EventDraft::default());

    let listed = Repository::<Event>::new(h.client.clone()).list(None).await.unwrap();
    assert_eq!(listed, vec![created.clone()]);

    let cells = listed[0].cells();
    assert_eq!(cells[0].as_deref(), Some("Hack Night"));
    assert_eq!(cells[3].as_deref(), Some("2025-03-01"));
    assert_eq!(cells[4].as_deref(), Some("18:00"));
    assert_eq!(cells[5], None);
}

#[tokio::test]
async fn add_event_without_date_and_time_renders_not_confirmed() {
    let h = harness();
    let mut dialog = add_dialog::<Event>(&h);
    dialog.set_draft(EventDraft {
        date: None,
        time: None,
        ..hack_night()
    });

    let created = dialog.submit().await.unwrap();
    let cells = created.cells();
    assert_eq!(cells[3].as_deref(), Some(NOT_CONFIRMED));
    assert_eq!(cells[4].as_deref(), Some(NOT_CONFIRMED));
}

#[tokio::test]
async fn add_with_image_stores_public_url() {
    let h = harness();
    let mut dialog = add_dialog::<TeamMember>(&h);
    dialog.draft_mut().name = "Ada".into();
    dialog.draft_mut().designation = "Lead".into();
    dialog.attach_image(ImageFile::new("ada.jpg", "image/jpeg", &b"jpeg"[..]));

    let created = dialog.submit().await.unwrap();
    let url = created.image.unwrap();
    assert!(url.starts_with(&format!("{BASE_URL}/storage/v1/object/public/storage/team/")));
    assert!(url.ends_with("_ada.jpg"));
    assert!(dialog.image().is_none());
}

#[tokio::test]
async fn missing_required_field_fails_before_any_call() {
    let h = harness();
    let mut dialog = add_dialog::<NewsItem>(&h);
    dialog.set_draft(NewsDraft {
        content: "<p>body</p>".into(),
        ..Default::default()
    });
    dialog.attach_image(ImageFile::new("a.png", "image/png", &b"png"[..]));

    let err = dialog.submit().await.unwrap_err();
    assert_eq!(err.message, REQUIRED_FIELDS_MESSAGE);
    assert!(err.cause.is_validation());
    assert_eq!(h.store.uploads.load(Ordering::SeqCst), 0);
    assert_eq!(h.store.write_calls(), 0);
    assert_eq!(
        dialog.state(),
        &FormState::Failed(REQUIRED_FIELDS_MESSAGE.into())
    );
}

async fn assert_rejected_before_write<R: Record>(h: &common::Harness, draft: R::Draft) {
    let mut dialog = add_dialog::<R>(h);
    dialog.set_draft(draft);
    let err = dialog.submit().await.unwrap_err();
    assert_eq!(err.message, REQUIRED_FIELDS_MESSAGE, "{}", R::TABLE);
    assert!(err.cause.is_validation());
}

#[tokio::test]
async fn each_entity_enforces_its_required_fields() {
    let h = harness();

    assert_rejected_before_write::<TeamMember>(
        &h,
        TeamMemberDraft {
            name: "Ada".into(),
            ..Default::default()
        },
    )
    .await;
    assert_rejected_before_write::<BlogPost>(
        &h,
        BlogDraft {
            title: "Ownership".into(),
            date: Some("2025-03-01".into()),
            ..Default::default()
        },
    )
    .await;
    assert_rejected_before_write::<BlogPost>(
        &h,
        BlogDraft {
            title: "Ownership".into(),
            author: "Ferris".into(),
            ..Default::default()
        },
    )
    .await;
    assert_rejected_before_write::<NewsItem>(
        &h,
        NewsDraft {
            name: "Launch".into(),
            ..Default::default()
        },
    )
    .await;
    assert_eq!(h.store.write_calls(), 0);

    let mut dialog = add_dialog::<BlogPost>(&h);
    dialog.set_draft(BlogDraft {
        title: "Ownership".into(),
        author: "Ferris".into(),
        date: Some("2025-03-01".into()),
        ..Default::default()
    });
    dialog.submit().await.unwrap();
    assert_eq!(h.store.write_calls(), 1);
}

#[tokio::test]
async fn upload_failure_aborts_without_writing() {
    let h = harness();
    h.store.fail_uploads.store(true, Ordering::SeqCst);
    let mut dialog = add_dialog::<Event>(&h);
    dialog.set_draft(hack_night());
    dialog.attach_image(ImageFile::new("poster.png", "image/png", &b"png"[..]));

    let err = dialog.submit().await.unwrap_err();
    assert_eq!(err.message, UPLOAD_FAILED_MESSAGE);
    assert_eq!(h.store.write_calls(), 0);
    assert_eq!(h.store.inner.row_count("events").await, 0);
    // The form keeps its input for another attempt.
    assert_eq!(dialog.draft().name, "Hack Night");
    assert!(dialog.image().is_some());
}

#[tokio::test]
async fn write_failure_reports_generic_message_and_leaves_upload_behind() {
    let h = harness();
    h.store.fail_writes.store(true, Ordering::SeqCst);
    let mut dialog = add_dialog::<SponsoredEvent>(&h);
    dialog.set_draft(SponsoredDraft {
        name: "Robotics Cup".into(),
        ..Default::default()
    });
    dialog.attach_image(ImageFile::new("cup.png", "image/png", &b"png"[..]));

    let err = dialog.submit().await.unwrap_err();
    assert_eq!(
        err.message,
        "Failed to add sponsored event. Please try again."
    );
    let keys = h.store.inner.object_keys().await;
    assert_eq!(keys.len(), 1);
    assert!(keys[0].starts_with("storage/images/"));
}

#[tokio::test]
async fn edit_without_new_image_keeps_stored_url() {
    let h = harness();
    let url = format!("{BASE_URL}/storage/v1/object/public/storage/news/1_a.png");
    h.store
        .inner
        .seed(
            "news",
            json!({
                "id": 3,
                "name": "Launch",
                "content": "v1",
                "link": "https://launch.example",
                "type": "special",
                "image": url
            }),
        )
        .await
        .unwrap();
    let repo = Repository::<NewsItem>::new(h.client.clone());
    let before = repo.find(3).await.unwrap().unwrap();

    let mut dialog = EditDialog::open(
        repo.clone(),
        ImageUploader::new(h.client.clone()),
        &before,
    );
    assert_eq!(dialog.draft().kind, NewsKind::Special);
    assert_eq!(dialog.image_choice(), &ImageChoice::Keep);
    dialog.draft_mut().content = "v2".into();

    let after = dialog.submit().await.unwrap();
    assert_eq!(after.content, "v2");
    assert_eq!(after.image, before.image);
    assert_eq!(repo.find(3).await.unwrap().unwrap().image.as_deref(), Some(url.as_str()));
}

#[tokio::test]
async fn edit_can_replace_or_clear_image() {
    let h = harness();
    h.store
        .inner
        .seed(
            "team_members",
            json!({"id": 1, "name": "Ada", "designation": "Lead", "image": "https://old/ada.png"}),
        )
        .await
        .unwrap();
    let repo = Repository::<TeamMember>::new(h.client.clone());
    let uploader = ImageUploader::new(h.client.clone());
    let member = repo.find(1).await.unwrap().unwrap();

    let mut dialog = EditDialog::open(repo.clone(), uploader.clone(), &member);
    dialog.choose_image(ImageFile::new("new.png", "image/png", &b"png"[..]));
    let replaced = dialog.submit().await.unwrap();
    let new_url = replaced.image.clone().unwrap();
    assert!(new_url.ends_with("_new.png"));
    assert_eq!(dialog.current_image(), Some(new_url.as_str()));
    assert_eq!(dialog.image_choice(), &ImageChoice::Keep);

    dialog.clear_image();
    let cleared = dialog.submit().await.unwrap();
    assert_eq!(cleared.image, None);
}

#[tokio::test]
async fn edit_sends_full_draft() {
    let h = harness();
    h.store
        .inner
        .seed(
            "team_members",
            json!({"id": 1, "name": "Ada", "designation": "Lead", "quote": "q", "order_index": 4}),
        )
        .await
        .unwrap();
    let repo = Repository::<TeamMember>::new(h.client.clone());
    let member = repo.find(1).await.unwrap().unwrap();

    let mut dialog = EditDialog::open(repo, ImageUploader::new(h.client.clone()), &member);
    dialog.set_draft(TeamMemberDraft {
        name: "Ada L.".into(),
        designation: "Mentor".into(),
        ..Default::default()
    });
    let updated = dialog.submit().await.unwrap();
    assert_eq!(updated.designation, "Mentor");
    assert_eq!(updated.quote, "");
    assert_eq!(updated.order_index, None);
}

#[tokio::test]
async fn sponsored_links_survive_round_trip() {
    let h = harness();
    let mut dialog = add_dialog::<SponsoredEvent>(&h);
    dialog.set_draft(SponsoredDraft {
        name: "Robotics Cup".into(),
        links: vec![SponsoredLink {
            label: "Register".into(),
            url: "https://cup.example".into(),
        }],
        ..Default::default()
    });
    let created = dialog.submit().await.unwrap();

    let raw = h
        .store
        .inner
        .select_by_id("sponsoreds", created.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(raw["links"][0]["linkName"], "Register");
    assert_eq!(raw["links"][0]["link"], "https://cup.example");
}

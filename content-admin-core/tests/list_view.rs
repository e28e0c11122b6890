mod common;

use common::harness;
use content_admin_core::{FormState, ListView};
use content_admin_models::{
    entities::prelude::{BlogPost, Event, EventDraft, NewsItem},
    ChangeType, RawRowChange, Record,
};
use content_admin_repository::Repository;
use serde_json::json;
use std::{sync::atomic::Ordering, time::Duration};

fn change(change_type: ChangeType, table: &str, record: serde_json::Value) -> RawRowChange {
    let (record, old_record) = match change_type {
        ChangeType::Delete => (None, Some(record)),
        _ => (Some(record), None),
    };
    RawRowChange {
        change_type,
        table: table.into(),
        schema: Some("public".into()),
        record,
        old_record,
    }
}

#[tokio::test]
async fn confirmed_delete_removes_row_locally_and_remotely() {
    let h = harness();
    for id in [41, 42, 43] {
        h.store
            .inner
            .seed("news", json!({"id": id, "name": format!("item {id}")}))
            .await
            .unwrap();
    }
    let mut view = ListView::<NewsItem>::new(h.client.clone(), h.hub.clone());
    view.mount().await.unwrap();

    view.request_delete(42);
    assert_eq!(view.pending_delete(), Some(42));
    view.confirm_delete().await.unwrap().unwrap();

    assert!(view.get(42).is_none());
    assert!(!view.render().to_string().contains("item 42"));
    let fresh = Repository::<NewsItem>::new(h.client.clone()).list(None).await.unwrap();
    assert!(fresh.iter().all(|n| n.id != 42));
    assert_eq!(fresh.len(), 2);
}

#[tokio::test]
async fn cancelled_delete_makes_no_call() {
    let h = harness();
    h.store
        .inner
        .seed("news", json!({"id": 42, "name": "keep me"}))
        .await
        .unwrap();
    let mut view = ListView::<NewsItem>::new(h.client.clone(), h.hub.clone());
    view.mount().await.unwrap();

    view.request_delete(42);
    view.cancel_delete();
    assert_eq!(view.pending_delete(), None);
    assert!(view.confirm_delete().await.is_none());

    assert_eq!(h.store.delete_calls(), 0);
    assert!(view.get(42).is_some());
}

#[tokio::test]
async fn pushed_changes_patch_rows_without_refetch() {
    let h = harness();
    let mut view = ListView::<BlogPost>::new(h.client.clone(), h.hub.clone());
    view.mount().await.unwrap();

    h.hub.publish(change(
        ChangeType::Insert,
        "blogs",
        json!({"id": 7, "title": "Ownership", "author": "Ferris"}),
    ));
    assert_eq!(view.next_change().await, Some(ChangeType::Insert));
    assert_eq!(view.rows()[0].title, "Ownership");

    h.hub.publish(change(
        ChangeType::Update,
        "blogs",
        json!({"id": 7, "title": "Borrowing", "author": "Ferris"}),
    ));
    assert_eq!(view.next_change().await, Some(ChangeType::Update));
    assert_eq!(view.rows()[0].title, "Borrowing");

    h.hub.publish(change(ChangeType::Delete, "blogs", json!({"id": 7})));
    assert_eq!(view.next_change().await, Some(ChangeType::Delete));
    assert!(view.rows().is_empty());

    // Nothing above touched the backend table.
    assert_eq!(h.store.inner.row_count("blogs").await, 0);
}

#[tokio::test]
async fn undecodable_change_is_skipped() {
    let h = harness();
    let mut view = ListView::<Event>::new(h.client.clone(), h.hub.clone());
    view.mount().await.unwrap();

    h.hub.publish(change(ChangeType::Delete, "events", json!({"name": "no id"})));
    h.hub.publish(change(
        ChangeType::Insert,
        "events",
        json!({"id": 1, "name": "Hack Night"}),
    ));

    let next = tokio::time::timeout(Duration::from_secs(1), view.next_change())
        .await
        .unwrap();
    assert_eq!(next, Some(ChangeType::Insert));
    assert_eq!(view.rows().len(), 1);
}

#[tokio::test]
async fn add_through_view_refetches_list() {
    let h = harness();
    let mut view = ListView::<Event>::new(h.client.clone(), h.hub.clone());
    view.mount().await.unwrap();
    assert_eq!(view.render().to_string(), "No events found.\n");

    let mut dialog = view.add_dialog();
    dialog.set_draft(EventDraft {
        name: "Hack Night".into(),
        venue: "Lab 3".into(),
        date: Some("2025-03-01".into()),
        time: Some("18:00".into()),
        description: "Intro to systems".into(),
    });
    let created = view.submit_add(&mut dialog).await.unwrap();
    assert_eq!(dialog.state(), &FormState::Success);

    let table = view.render();
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.cell(0, "Name"), Some("Hack Night"));
    assert_eq!(table.cell(0, "Date"), Some("2025-03-01"));
    assert_eq!(table.cell(0, "Image"), None);

    let mut edit = view.open_edit(created.id()).unwrap();
    edit.draft_mut().venue = "Lab 4".into();
    view.submit_edit(&mut edit).await.unwrap();
    assert_eq!(view.render().cell(0, "Venue"), Some("Lab 4"));
}

#[tokio::test]
async fn failed_refresh_keeps_previous_rows() {
    let h = harness();
    h.store
        .inner
        .seed("events", json!({"id": 1, "name": "Hack Night"}))
        .await
        .unwrap();
    let mut view = ListView::<Event>::new(h.client.clone(), h.hub.clone());
    view.mount().await.unwrap();

    h.store
        .inner
        .seed("events", json!({"id": 2, "name": "Demo Day"}))
        .await
        .unwrap();
    h.store.fail_reads.store(true, Ordering::SeqCst);
    assert!(view.refresh().await.is_err());
    assert_eq!(view.rows().len(), 1);
    assert_eq!(view.rows()[0].name, "Hack Night");
}

#[tokio::test]
async fn malformed_row_does_not_blank_the_list() {
    let h = harness();
    for row in [
        json!({"id": 1, "name": "Hack Night", "created_at": "2024-01-01T00:00:00.123"}),
        json!({"id": 2, "name": ["not", "a", "string"]}),
        json!({"id": 3, "name": "Demo Day", "created_at": "not a date"}),
    ] {
        h.store.inner.seed("events", row).await.unwrap();
    }
    let mut view = ListView::<Event>::new(h.client.clone(), h.hub.clone());
    view.mount().await.unwrap();

    let ids: Vec<_> = view.rows().iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![1, 3]);
    assert!(view.rows()[0].created_at.is_some());
    assert!(view.rows()[1].created_at.is_none());
}

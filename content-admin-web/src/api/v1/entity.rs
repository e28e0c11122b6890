//! CRUD routes shared by every content resource.
//!
//! | Method   | Path    | Flow                                   |
//! |----------|---------|----------------------------------------|
//! | `GET`    | `/`     | list in the table's default order      |
//! | `POST`   | `/`     | Add dialog (multipart)                 |
//! | `PUT`    | `/{id}` | Edit dialog seeded from the stored row |
//! | `DELETE` | `/{id}` | confirmed delete                       |
//! | `GET`    | `/ws`   | realtime change feed                   |

use super::{
    form::{read_form, RecordForm},
    ws,
};
use crate::AppState;
use actix_multipart::Multipart;
use actix_web::web;
use content_admin_core::{
    form::update_failed_message, list::fetch_failed_message, AddDialog, ConfirmDialog, EditDialog,
};
use content_admin_error::{web::WebError, WebResult};
use content_admin_models::{web::WebResponse, Record, RecordId};
use std::sync::Arc;
use tracing::{error, info, instrument};

pub(crate) fn configure_routes<R: Record>(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(list::<R>))
        .route("", web::post().to(create::<R>))
        .route("/ws", web::get().to(ws::changes_ws::<R>))
        .route("/{id}", web::put().to(update::<R>))
        .route("/{id}", web::delete().to(delete::<R>));
}

#[instrument(name = "list-records", skip_all, fields(table = R::TABLE))]
async fn list<R: Record>(state: web::Data<Arc<AppState>>) -> WebResult<WebResponse<Vec<R>>> {
    let rows = state.repository::<R>().list(None).await.map_err(|e| {
        error!(error = %e, "Failed to fetch rows");
        WebError::Failed(fetch_failed_message::<R>())
    })?;
    Ok(WebResponse::ok(rows))
}

#[instrument(name = "create-record", skip_all, fields(table = R::TABLE))]
async fn create<R: Record>(
    state: web::Data<Arc<AppState>>,
    multipart: Multipart,
) -> WebResult<WebResponse<R>> {
    let RecordForm { fields, image, .. } = read_form::<R::Draft>(multipart).await?;

    let mut dialog = AddDialog::new(state.repository::<R>(), state.uploader());
    dialog.set_draft(fields);
    if let Some(image) = image {
        dialog.attach_image(image);
    }

    let record = dialog.submit().await?;
    Ok(WebResponse::ok(record))
}

#[instrument(name = "update-record", skip_all, fields(table = R::TABLE, id = *id))]
async fn update<R: Record>(
    state: web::Data<Arc<AppState>>,
    id: web::Path<RecordId>,
    multipart: Multipart,
) -> WebResult<WebResponse<R>> {
    let id = id.into_inner();
    let RecordForm {
        fields,
        image,
        clear_image,
    } = read_form::<R::Draft>(multipart).await?;

    let repo = state.repository::<R>();
    let current = repo
        .find(id)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to load row for edit");
            WebError::Failed(update_failed_message::<R>())
        })?
        .ok_or_else(|| WebError::NotFound(format!("{} {id}", R::LABEL)))?;

    let mut dialog = EditDialog::open(repo, state.uploader(), &current);
    dialog.set_draft(fields);
    match (image, clear_image) {
        (Some(image), _) => dialog.choose_image(image),
        (None, true) => dialog.clear_image(),
        (None, false) => {}
    }

    let record = dialog.submit().await?;
    Ok(WebResponse::ok(record))
}

/// The request itself is the confirmation.
#[instrument(name = "delete-record", skip_all, fields(table = R::TABLE, id = *id))]
async fn delete<R: Record>(
    state: web::Data<Arc<AppState>>,
    id: web::Path<RecordId>,
) -> WebResult<WebResponse<()>> {
    let repo = state.repository::<R>();
    let mut confirm = ConfirmDialog::new();
    confirm.open(id.into_inner());

    match confirm.confirm(|id| async move { repo.delete(id).await }).await {
        Some(Ok(())) => {
            info!("Deleted {}", R::LABEL);
            Ok(WebResponse::<()>::ok_empty())
        }
        Some(Err(e)) => {
            error!(error = %e, "Failed to delete row");
            Err(WebError::Failed(format!(
                "Failed to delete {}. Please try again.",
                R::LABEL
            )))
        }
        None => Err(WebError::InternalError("no delete pending".into())),
    }
}

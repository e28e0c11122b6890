//! Change-notification webhook.
//!
//! The backend's database webhooks post every committed insert, update and
//! delete on the content tables here; each notification is fanned out to
//! the list views and WebSocket clients watching that table.

use crate::AppState;
use actix_web::{web, HttpRequest};
use content_admin_error::{web::WebError, WebResult};
use content_admin_models::{
    constants::WEBHOOK_SECRET_HEADER, web::WebResponse, EntityKind, RawRowChange,
};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

pub(super) const ROUTER_PREFIX: &str = "/changes";

/// Returns how many subscribers received the change.
#[instrument(name = "ingest-change", skip_all, fields(table = %payload.table, change = ?payload.change_type))]
pub(super) async fn ingest(
    req: HttpRequest,
    state: web::Data<Arc<AppState>>,
    payload: web::Json<RawRowChange>,
) -> WebResult<WebResponse<usize>> {
    if let Some(secret) = state
        .settings()
        .realtime
        .webhook_secret
        .as_deref()
        .filter(|s| !s.is_empty())
    {
        let presented = req
            .headers()
            .get(WEBHOOK_SECRET_HEADER)
            .and_then(|v| v.to_str().ok());
        if presented != Some(secret) {
            warn!("Rejected change notification with a bad secret");
            return Err(WebError::Unauthorized);
        }
    }

    let change = payload.into_inner();
    let schema = &state.settings().backend.schema;
    if change.schema.as_ref().is_some_and(|s| s != schema) {
        debug!(schema = ?change.schema, "Ignoring change from another schema");
        return Ok(WebResponse::ok(0));
    }
    if EntityKind::from_table(&change.table).is_none() {
        debug!("Ignoring change on an unmanaged table");
        return Ok(WebResponse::ok(0));
    }

    let delivered = state.hub().publish(change);
    debug!(delivered, "Change published");
    Ok(WebResponse::ok(delivered))
}

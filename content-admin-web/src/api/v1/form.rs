//! Multipart submissions for the Add and Edit dialogs.
//!
//! Parts:
//! - `fields`: the draft as JSON (required)
//! - `image`: an image file (optional)
//! - `clearImage`: `true` to remove the stored image (Edit only)

use actix_multipart::{Field, Multipart};
use bytes::BytesMut;
use content_admin_core::ImageFile;
use content_admin_error::{web::WebError, WebResult};
use content_admin_models::constants::MAX_IMAGE_BYTES;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use tracing::debug;

const MAX_FIELDS_BYTES: usize = 1024 * 1024;
const MAX_FLAG_BYTES: usize = 16;

pub(crate) struct RecordForm<D> {
    pub fields: D,
    pub image: Option<ImageFile>,
    pub clear_image: bool,
}

pub(crate) async fn read_form<D: DeserializeOwned>(
    mut multipart: Multipart,
) -> WebResult<RecordForm<D>> {
    let mut fields = None;
    let mut image = None;
    let mut clear_image = false;

    while let Some(item) = multipart.next().await {
        let mut field = item?;
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "fields" => {
                let bytes = read_field(&mut field, MAX_FIELDS_BYTES).await?;
                let draft = serde_json::from_slice::<D>(&bytes)
                    .map_err(|e| WebError::BadRequest(format!("Invalid `fields` part: {e}")))?;
                fields = Some(draft);
            }
            "image" => {
                let file_name = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                    .unwrap_or_default()
                    .to_string();
                let content_type = field
                    .content_type()
                    .map(|m| m.to_string())
                    .unwrap_or_default();
                let bytes = read_field(&mut field, MAX_IMAGE_BYTES).await?;
                // Browsers send an empty part when no file was picked.
                if bytes.is_empty() || file_name.is_empty() {
                    continue;
                }
                if !content_type.starts_with("image/") {
                    return Err(WebError::BadRequest(format!(
                        "Invalid image content-type: `{content_type}`"
                    )));
                }
                image = Some(ImageFile::new(file_name, content_type, bytes.freeze()));
            }
            "clearImage" => {
                let bytes = read_field(&mut field, MAX_FLAG_BYTES).await?;
                let flag = String::from_utf8_lossy(&bytes);
                clear_image = matches!(flag.trim(), "true" | "1" | "on");
            }
            other => {
                debug!(part = other, "Ignoring unknown form part");
                read_field(&mut field, MAX_FIELDS_BYTES).await?;
            }
        }
    }

    let fields =
        fields.ok_or_else(|| WebError::BadRequest("Missing `fields` part".to_string()))?;
    Ok(RecordForm {
        fields,
        image,
        clear_image,
    })
}

async fn read_field(field: &mut Field, max_bytes: usize) -> WebResult<BytesMut> {
    let mut buf = BytesMut::new();
    while let Some(chunk) = field.next().await {
        let data = chunk?;
        if buf.len().saturating_add(data.len()) > max_bytes {
            return Err(WebError::BadRequest(format!(
                "Part `{}` exceeds {max_bytes} bytes",
                field.name().unwrap_or_default()
            )));
        }
        buf.extend_from_slice(&data);
    }
    Ok(buf)
}

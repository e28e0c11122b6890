//! Image upload helper.
//!
//! Stores a selected file under `<folder>/<uuid>_<file name>` in the
//! configured bucket and hands back the public URL of the stored object.

use bytes::Bytes;
use content_admin_backend::BackendClient;
use content_admin_error::{backend::BackendError, BackendResult};
use content_admin_models::constants::MAX_IMAGE_BYTES;
use std::{fmt, sync::Arc};
use tracing::{debug, instrument};
use uuid::Uuid;

/// A file picked in a form, held in memory until submit.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl ImageFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    /// The file name without any directory part a browser may have sent.
    pub fn base_name(&self) -> &str {
        let name = self
            .file_name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or_default()
            .trim();
        if name.is_empty() {
            "image"
        } else {
            name
        }
    }
}

impl fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[derive(Clone)]
pub struct ImageUploader {
    client: Arc<BackendClient>,
}

impl ImageUploader {
    pub fn new(client: Arc<BackendClient>) -> Self {
        Self { client }
    }

    /// Object path for `file` inside `folder`, unique per call.
    pub fn object_path(folder: &str, file: &ImageFile) -> String {
        format!(
            "{}/{}_{}",
            folder.trim_matches('/'),
            Uuid::new_v4(),
            file.base_name()
        )
    }

    /// Upload `file` into `folder` and return its public URL.
    #[instrument(name = "upload-image", skip(self, file), fields(file = %file.file_name))]
    pub async fn upload(&self, folder: &str, file: &ImageFile) -> BackendResult<String> {
        if file.bytes.len() > MAX_IMAGE_BYTES {
            return Err(BackendError::Upload(format!(
                "{} is {} bytes, the limit is {MAX_IMAGE_BYTES}",
                file.file_name,
                file.bytes.len()
            )));
        }

        let path = Self::object_path(folder, file);
        let content_type = if file.content_type.is_empty() {
            "application/octet-stream"
        } else {
            file.content_type.as_str()
        };
        let stored = self
            .client
            .objects()
            .upload(self.client.bucket(), &path, content_type, file.bytes.clone())
            .await?;
        debug!(key = %stored.key, "Image stored");

        Ok(self.client.public_url(&path))
    }
}

use thiserror::Error;

/// Failures raised while talking to the managed backend.
///
/// Every remote call is all-or-nothing, so each variant describes a whole
/// operation that did not take effect.
#[derive(Error, Debug, Default)]
pub enum BackendError {
    #[error("backend unavailable")]
    #[default]
    Unavailable,

    /// A read (`select`) against a table failed or returned undecodable rows.
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// An insert, update or delete was rejected or never reached the backend.
    #[error("write failed: {0}")]
    Write(String),

    /// The object storage refused the upload.
    #[error("upload failed: {0}")]
    Upload(String),

    /// A required field was missing before anything was sent.
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("row not found: {0}")]
    NotFound(String),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BackendError {
    #[inline]
    pub fn is_validation(&self) -> bool {
        matches!(self, BackendError::Validation(_))
    }
}

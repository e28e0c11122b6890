//! Backend client for the managed data and storage service.
//!
//! The service is reached through two narrow seams, [`TableStore`] for rows
//! and [`ObjectStore`] for files, so the rest of the crate never depends on
//! the transport. [`BackendClient`] bundles one implementation of each with
//! the public base URL and bucket, and is created once per process and
//! handed to every component that needs it.

pub mod memory;
pub mod realtime;
pub mod rest;

use async_trait::async_trait;
use bytes::Bytes;
use content_admin_error::{backend::BackendError, BackendResult};
use content_admin_models::{
    constants::PUBLIC_OBJECT_PREFIX,
    settings::{Backend as BackendSettings, BackendKind},
    OrderSpec, RecordFields, RecordId,
};
use serde_json::Value;
use std::sync::Arc;

pub use memory::MemoryBackend;
pub use realtime::ChangeHub;
pub use rest::RestBackend;

/// Row operations against named remote tables.
///
/// Rows travel as JSON objects; decoding into typed records is the
/// repository's job.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Select every row of `table`, ordered by `order` when it is non-empty.
    async fn select(&self, table: &str, order: &OrderSpec) -> BackendResult<Vec<Value>>;

    async fn select_by_id(&self, table: &str, id: RecordId) -> BackendResult<Option<Value>>;

    /// Insert one row and return it as stored (with its assigned id).
    async fn insert(&self, table: &str, fields: RecordFields) -> BackendResult<Value>;

    /// Overwrite the given columns of one row and return the updated row.
    async fn update(&self, table: &str, id: RecordId, fields: RecordFields)
        -> BackendResult<Value>;

    async fn delete(&self, table: &str, id: RecordId) -> BackendResult<()>;
}

/// Metadata returned by a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// `<bucket>/<path>` as reported by the storage service.
    pub key: String,
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        content_type: &str,
        bytes: Bytes,
    ) -> BackendResult<StoredObject>;
}

/// Explicitly-owned handle to the backend.
#[derive(Clone)]
pub struct BackendClient {
    tables: Arc<dyn TableStore>,
    objects: Arc<dyn ObjectStore>,
    base_url: String,
    bucket: String,
}

impl BackendClient {
    pub fn new(
        tables: Arc<dyn TableStore>,
        objects: Arc<dyn ObjectStore>,
        base_url: impl Into<String>,
        bucket: impl Into<String>,
    ) -> Self {
        Self {
            tables,
            objects,
            base_url: base_url.into(),
            bucket: bucket.into(),
        }
    }

    /// Build the client selected by configuration.
    pub fn from_settings(settings: &BackendSettings) -> BackendResult<Self> {
        match settings.kind {
            BackendKind::Rest => {
                let rest = Arc::new(RestBackend::new(settings)?);
                Ok(Self::new(
                    rest.clone(),
                    rest,
                    settings.url.clone(),
                    settings.bucket.clone(),
                ))
            }
            BackendKind::Memory => Ok(Self::memory(
                Arc::new(MemoryBackend::new()),
                settings.url.clone(),
                settings.bucket.clone(),
            )),
        }
    }

    /// A client whose tables and objects both live in `backend`.
    pub fn memory(
        backend: Arc<MemoryBackend>,
        base_url: impl Into<String>,
        bucket: impl Into<String>,
    ) -> Self {
        Self::new(backend.clone(), backend, base_url, bucket)
    }

    #[inline]
    pub fn tables(&self) -> &dyn TableStore {
        self.tables.as_ref()
    }

    #[inline]
    pub fn objects(&self) -> &dyn ObjectStore {
        self.objects.as_ref()
    }

    #[inline]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// World-readable URL of an object in the configured bucket.
    ///
    /// Built by concatenation; the base URL is not validated and the object
    /// is never probed for reachability.
    pub fn public_url(&self, path: &str) -> String {
        format!(
            "{}{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            PUBLIC_OBJECT_PREFIX,
            self.bucket,
            path.trim_start_matches('/')
        )
    }
}

/// Turn a non-object JSON value into a fetch error naming the table.
pub(crate) fn expect_object(table: &str, value: Value) -> BackendResult<RecordFields> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(BackendError::Fetch(format!(
            "`{table}` returned a non-object row: {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_url_concatenation() {
        let client = BackendClient::memory(
            Arc::new(MemoryBackend::new()),
            "https://abc.example.co/",
            "storage",
        );
        assert_eq!(
            client.public_url("events/1_a.png"),
            "https://abc.example.co/storage/v1/object/public/storage/events/1_a.png"
        );
    }

    #[test]
    fn test_public_url_with_missing_base_is_not_validated() {
        let client = BackendClient::memory(Arc::new(MemoryBackend::new()), "", "storage");
        assert_eq!(
            client.public_url("team/x.png"),
            "/storage/v1/object/public/storage/team/x.png"
        );
    }
}

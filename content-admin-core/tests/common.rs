#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use content_admin_backend::{
    BackendClient, ChangeHub, MemoryBackend, ObjectStore, StoredObject, TableStore,
};
use content_admin_error::{backend::BackendError, BackendResult};
use content_admin_models::{OrderSpec, RecordFields, RecordId};
use serde_json::Value;
use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc, Once,
};
use tracing::Level;

pub const BASE_URL: &str = "https://abc.example.co";
pub const BUCKET: &str = "storage";

static INIT_TRACING: Once = Once::new();

pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_target(false)
            .without_time()
            .try_init();
    });
}

/// Memory backend wrapper that counts calls and can be told to fail.
#[derive(Default)]
pub struct CountingBackend {
    pub inner: MemoryBackend,
    pub writes: AtomicUsize,
    pub deletes: AtomicUsize,
    pub uploads: AtomicUsize,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
    pub fail_uploads: AtomicBool,
}

impl CountingBackend {
    pub fn new() -> Self {
        Self {
            inner: MemoryBackend::new(),
            ..Default::default()
        }
    }

    pub fn write_calls(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    fn check_write(&self) -> BackendResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(BackendError::Write("connection reset by peer".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl TableStore for CountingBackend {
    async fn select(&self, table: &str, order: &OrderSpec) -> BackendResult<Vec<Value>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(BackendError::Fetch("connection refused".into()));
        }
        self.inner.select(table, order).await
    }

    async fn select_by_id(&self, table: &str, id: RecordId) -> BackendResult<Option<Value>> {
        self.inner.select_by_id(table, id).await
    }

    async fn insert(&self, table: &str, fields: RecordFields) -> BackendResult<Value> {
        self.check_write()?;
        self.inner.insert(table, fields).await
    }

    async fn update(
        &self,
        table: &str,
        id: RecordId,
        fields: RecordFields,
    ) -> BackendResult<Value> {
        self.check_write()?;
        self.inner.update(table, id, fields).await
    }

    async fn delete(&self, table: &str, id: RecordId) -> BackendResult<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(table, id).await
    }
}

#[async_trait]
impl ObjectStore for CountingBackend {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        content_type: &str,
        bytes: Bytes,
    ) -> BackendResult<StoredObject> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(BackendError::Upload("storage quota exceeded".into()));
        }
        self.inner.upload(bucket, path, content_type, bytes).await
    }
}

pub struct Harness {
    pub store: Arc<CountingBackend>,
    pub client: Arc<BackendClient>,
    pub hub: ChangeHub,
}

pub fn harness() -> Harness {
    init_tracing();
    let store = Arc::new(CountingBackend::new());
    let client = Arc::new(BackendClient::new(
        store.clone(),
        store.clone(),
        BASE_URL,
        BUCKET,
    ));
    Harness {
        store,
        client,
        hub: ChangeHub::default(),
    }
}

//! Process-local backend.
//!
//! Mirrors the managed service closely enough for local runs and tests:
//! ids are assigned on insert, `created_at` is stamped, updates merge the
//! given columns, listing honours [`OrderSpec`] including null placement,
//! and uploading to an existing object path is rejected.

use crate::{expect_object, ObjectStore, StoredObject, TableStore};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use content_admin_error::{backend::BackendError, BackendResult};
use content_admin_models::{OrderKey, OrderSpec, RecordFields, RecordId};
use serde_json::Value;
use std::{
    cmp::Ordering,
    collections::HashMap,
    sync::atomic::{AtomicI64, Ordering as AtomicOrdering},
};
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryObject {
    pub content_type: String,
    pub bytes: Bytes,
}

#[derive(Debug, Default)]
pub struct MemoryBackend {
    tables: RwLock<HashMap<String, Vec<RecordFields>>>,
    objects: RwLock<HashMap<String, MemoryObject>>,
    next_id: AtomicI64,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(1),
            ..Default::default()
        }
    }

    /// Keys (`<bucket>/<path>`) of every stored object.
    pub async fn object_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub async fn object(&self, key: &str) -> Option<MemoryObject> {
        self.objects.read().await.get(key).cloned()
    }

    pub async fn row_count(&self, table: &str) -> usize {
        self.tables.read().await.get(table).map_or(0, Vec::len)
    }
}

#[async_trait]
impl TableStore for MemoryBackend {
    async fn select(&self, table: &str, order: &OrderSpec) -> BackendResult<Vec<Value>> {
        let tables = self.tables.read().await;
        let mut rows = tables.get(table).cloned().unwrap_or_default();
        if !order.is_empty() {
            rows.sort_by(|a, b| compare_rows(a, b, &order.keys));
        }
        Ok(rows.into_iter().map(Value::Object).collect())
    }

    async fn select_by_id(&self, table: &str, id: RecordId) -> BackendResult<Option<Value>> {
        let tables = self.tables.read().await;
        Ok(tables
            .get(table)
            .and_then(|rows| rows.iter().find(|row| row_id(row) == Some(id)))
            .cloned()
            .map(Value::Object))
    }

    async fn insert(&self, table: &str, mut fields: RecordFields) -> BackendResult<Value> {
        let id = self.next_id.fetch_add(1, AtomicOrdering::SeqCst);
        fields.insert("id".into(), Value::from(id));
        fields
            .entry("created_at")
            .or_insert_with(|| Value::String(Utc::now().to_rfc3339()));

        let mut tables = self.tables.write().await;
        tables.entry(table.to_string()).or_default().push(fields.clone());
        debug!(table, id, "Inserted row");
        Ok(Value::Object(fields))
    }

    async fn update(
        &self,
        table: &str,
        id: RecordId,
        fields: RecordFields,
    ) -> BackendResult<Value> {
        let mut tables = self.tables.write().await;
        let row = tables
            .get_mut(table)
            .and_then(|rows| rows.iter_mut().find(|row| row_id(row) == Some(id)))
            .ok_or_else(|| BackendError::NotFound(format!("{table}#{id}")))?;

        for (column, value) in fields {
            if column != "id" {
                row.insert(column, value);
            }
        }
        Ok(Value::Object(row.clone()))
    }

    async fn delete(&self, table: &str, id: RecordId) -> BackendResult<()> {
        let mut tables = self.tables.write().await;
        if let Some(rows) = tables.get_mut(table) {
            rows.retain(|row| row_id(row) != Some(id));
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for MemoryBackend {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        content_type: &str,
        bytes: Bytes,
    ) -> BackendResult<StoredObject> {
        let key = format!("{bucket}/{path}");
        let mut objects = self.objects.write().await;
        if objects.contains_key(&key) {
            return Err(BackendError::Upload(format!("The resource already exists: {key}")));
        }
        objects.insert(
            key.clone(),
            MemoryObject {
                content_type: content_type.to_string(),
                bytes,
            },
        );
        Ok(StoredObject { key })
    }
}

fn row_id(row: &RecordFields) -> Option<RecordId> {
    row.get("id").and_then(Value::as_i64)
}

fn compare_rows(a: &RecordFields, b: &RecordFields, keys: &[OrderKey]) -> Ordering {
    for key in keys {
        let left = a.get(&key.column).filter(|v| !v.is_null());
        let right = b.get(&key.column).filter(|v| !v.is_null());
        let ordering = match (left, right) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) if key.nulls_first => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) if key.nulls_first => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(l), Some(r)) => {
                let ordering = compare_values(l, r);
                if key.ascending {
                    ordering
                } else {
                    ordering.reverse()
                }
            }
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

fn compare_values(l: &Value, r: &Value) -> Ordering {
    match (l, r) {
        (Value::Number(l), Value::Number(r)) => l
            .as_f64()
            .zip(r.as_f64())
            .and_then(|(l, r)| l.partial_cmp(&r))
            .unwrap_or(Ordering::Equal),
        (Value::String(l), Value::String(r)) => l.cmp(r),
        (Value::Bool(l), Value::Bool(r)) => l.cmp(r),
        _ => Ordering::Equal,
    }
}

impl MemoryBackend {
    /// Seed a row verbatim, keeping its `id` if present.
    pub async fn seed(&self, table: &str, row: Value) -> BackendResult<Value> {
        let mut fields = expect_object(table, row)?;
        match fields.get("id").and_then(Value::as_i64) {
            Some(id) => {
                self.next_id.fetch_max(id + 1, AtomicOrdering::SeqCst);
                let mut tables = self.tables.write().await;
                tables.entry(table.to_string()).or_default().push(fields.clone());
                Ok(Value::Object(fields))
            }
            None => {
                fields.remove("id");
                self.insert(table, fields).await
            }
        }
    }
}

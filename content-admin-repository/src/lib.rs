//! Generic record repository.
//!
//! One [`Repository`] type serves every content table; the table name, row
//! shape and default ordering all come from the [`Record`] implementation.

use content_admin_backend::BackendClient;
use content_admin_error::{backend::BackendError, BackendResult};
use content_admin_models::{OrderSpec, Record, RecordFields, RecordId};
use serde_json::Value;
use std::{marker::PhantomData, sync::Arc};
use tracing::{debug, instrument, warn};

/// Repository for one record type.
pub struct Repository<R> {
    client: Arc<BackendClient>,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for Repository<R> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            _record: PhantomData,
        }
    }
}

impl<R: Record> Repository<R> {
    pub fn new(client: Arc<BackendClient>) -> Self {
        Self {
            client,
            _record: PhantomData,
        }
    }

    #[inline]
    pub fn client(&self) -> &Arc<BackendClient> {
        &self.client
    }

    /// List every row, using `order` or the record's default ordering.
    ///
    /// Rows that do not decode are logged and left out; only a failed
    /// remote call fails the listing.
    #[instrument(name = "repository-list", skip_all, fields(table = R::TABLE))]
    pub async fn list(&self, order: Option<&OrderSpec>) -> BackendResult<Vec<R>> {
        let default_order;
        let order = match order {
            Some(order) => order,
            None => {
                default_order = R::default_order();
                &default_order
            }
        };
        let rows = self.client.tables().select(R::TABLE, order).await?;
        let total = rows.len();
        let records: Vec<R> = rows
            .into_iter()
            .filter_map(|row| match decode::<R>(row) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(error = %e, "Skipping row");
                    None
                }
            })
            .collect();
        debug!(count = records.len(), skipped = total - records.len(), "Listed rows");
        Ok(records)
    }

    /// Find one row by id.
    #[instrument(name = "repository-find", skip(self), fields(table = R::TABLE))]
    pub async fn find(&self, id: RecordId) -> BackendResult<Option<R>> {
        self.client
            .tables()
            .select_by_id(R::TABLE, id)
            .await?
            .map(decode::<R>)
            .transpose()
    }

    /// Insert one row built from `fields`; returns it with its assigned id.
    #[instrument(name = "repository-insert", skip_all, fields(table = R::TABLE))]
    pub async fn insert(&self, fields: RecordFields) -> BackendResult<R> {
        let row = self.client.tables().insert(R::TABLE, fields).await?;
        decode_written(row)
    }

    /// Overwrite the provided columns of row `id`.
    #[instrument(name = "repository-update", skip(self, fields), fields(table = R::TABLE))]
    pub async fn update(&self, id: RecordId, fields: RecordFields) -> BackendResult<R> {
        let row = self.client.tables().update(R::TABLE, id, fields).await?;
        decode_written(row)
    }

    #[instrument(name = "repository-delete", skip(self), fields(table = R::TABLE))]
    pub async fn delete(&self, id: RecordId) -> BackendResult<()> {
        self.client.tables().delete(R::TABLE, id).await
    }
}

fn decode<R: Record>(row: Value) -> BackendResult<R> {
    serde_json::from_value(row)
        .map_err(|e| BackendError::Fetch(format!("undecodable `{}` row: {e}", R::TABLE)))
}

fn decode_written<R: Record>(row: Value) -> BackendResult<R> {
    serde_json::from_value(row)
        .map_err(|e| BackendError::Write(format!("undecodable `{}` row: {e}", R::TABLE)))
}

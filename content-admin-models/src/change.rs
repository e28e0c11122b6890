//! Row-change notifications.
//!
//! The backend reports every insert, update and delete on a watched table as
//! a [`RawRowChange`] (the database webhook payload). List views decode it
//! into a typed [`RowChange`] for their own record type.

use crate::record::{Record, RecordId};
use content_admin_error::{backend::BackendError, BackendResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeType {
    Insert,
    Update,
    Delete,
}

/// Untyped change payload as delivered by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRowChange {
    #[serde(rename = "type")]
    pub change_type: ChangeType,
    pub table: String,
    #[serde(default)]
    pub schema: Option<String>,
    /// The row after the change (`INSERT`/`UPDATE`).
    #[serde(default)]
    pub record: Option<Value>,
    /// The row before the change (`UPDATE`/`DELETE`); carries at least the id.
    #[serde(default)]
    pub old_record: Option<Value>,
}

/// A change decoded against one record type.
#[derive(Debug, Clone, PartialEq)]
pub enum RowChange<R> {
    Insert(R),
    Update(R),
    Delete(RecordId),
}

impl<R: Record> RowChange<R> {
    pub fn from_raw(raw: &RawRowChange) -> BackendResult<Self> {
        match raw.change_type {
            ChangeType::Insert => Ok(RowChange::Insert(decode_record(raw)?)),
            ChangeType::Update => Ok(RowChange::Update(decode_record(raw)?)),
            ChangeType::Delete => {
                let id = raw
                    .old_record
                    .as_ref()
                    .and_then(|old| old.get("id"))
                    .and_then(Value::as_i64)
                    .ok_or_else(|| {
                        BackendError::Fetch(format!(
                            "delete notification on `{}` without an id",
                            raw.table
                        ))
                    })?;
                Ok(RowChange::Delete(id))
            }
        }
    }
}

fn decode_record<R: Record>(raw: &RawRowChange) -> BackendResult<R> {
    let record = raw.record.clone().ok_or_else(|| {
        BackendError::Fetch(format!(
            "{:?} notification on `{}` without a record",
            raw.change_type, raw.table
        ))
    })?;
    Ok(serde_json::from_value(record)?)
}

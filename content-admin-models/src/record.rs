//! The abstraction every content table implements.
//!
//! One generic repository, list view and pair of form dialogs work over any
//! type implementing [`Record`]; the implementor only describes its table,
//! its editable fields and how it renders as a table row.

use crate::order::OrderSpec;
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;
use validator::Validate;

/// Backend-assigned row identifier.
pub type RecordId = i64;

/// A JSON object of column values sent on insert/update.
pub type RecordFields = serde_json::Map<String, serde_json::Value>;

/// A rendered table cell. `None` renders as nothing.
pub type Cell = Option<String>;

pub trait Record: Serialize + DeserializeOwned + Clone + Debug + Send + Sync + 'static {
    /// The editable field set collected by the Add/Edit dialogs.
    ///
    /// The image is never part of the draft; it is uploaded separately and
    /// written as the `image` column.
    type Draft: Serialize + DeserializeOwned + Validate + Default + Clone + Debug + Send + Sync;

    /// Remote table name.
    const TABLE: &'static str;
    /// Singular noun used in user-facing messages ("event", "news item").
    const LABEL: &'static str;
    /// Storage folder uploaded images land in.
    const FOLDER: &'static str;

    fn id(&self) -> RecordId;

    /// Public URL of the attached image, if any.
    fn image(&self) -> Option<&str>;

    /// The editable fields of this row, used to seed the Edit dialog.
    fn draft(&self) -> Self::Draft;

    /// Ordering applied when listing without an explicit spec.
    fn default_order() -> OrderSpec {
        OrderSpec::default()
    }

    /// Table headers, one per cell.
    fn columns() -> &'static [&'static str];

    fn cells(&self) -> Vec<Cell>;
}

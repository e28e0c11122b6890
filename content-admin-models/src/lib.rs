//! Shared models for the content admin service.
//!
//! Holds the configuration tree, the [`Record`] abstraction every content
//! table implements, the five entity shapes, ordering and row-change
//! payloads, and the JSON response envelope used by the HTTP surface.
pub mod change;
pub mod constants;
pub mod entities;
pub mod kind;
pub mod order;
pub mod record;
pub mod serde_ext;
pub mod settings;
pub mod web;

pub use change::{ChangeType, RawRowChange, RowChange};
pub use kind::EntityKind;
pub use order::{OrderKey, OrderSpec};
pub use record::{Cell, Record, RecordFields, RecordId};

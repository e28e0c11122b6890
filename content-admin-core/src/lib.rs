//! Admin workflows shared by every content table.
//!
//! [`ListView`] keeps a table in sync and hands out the [`AddDialog`],
//! [`EditDialog`] and delete [`ConfirmDialog`] for its rows; images go
//! through the [`ImageUploader`].

pub mod confirm;
pub mod form;
pub mod list;
pub mod table;
pub mod upload;

pub use confirm::ConfirmDialog;
pub use form::{AddDialog, EditDialog, FormState, ImageChoice};
pub use list::ListView;
pub use table::Table;
pub use upload::{ImageFile, ImageUploader};

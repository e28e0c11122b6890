//! Entity list view.
//!
//! Keeps a local copy of one table in sync with the backend: a full fetch on
//! mount, then local patches from the table's row-change feed. The feed is
//! subscribed before the first fetch so no change made while the fetch is in
//! flight is lost; replaying such a change over fresh rows is harmless since
//! every patch is keyed by id.

use crate::{
    confirm::ConfirmDialog,
    form::{AddDialog, EditDialog},
    table::Table,
    upload::ImageUploader,
};
use content_admin_backend::{BackendClient, ChangeHub};
use content_admin_error::{form::SubmitError, BackendResult};
use content_admin_models::{ChangeType, RawRowChange, Record, RecordId, RowChange};
use content_admin_repository::Repository;
use std::sync::Arc;
use tokio::sync::broadcast::{
    self,
    error::{RecvError, TryRecvError},
};
use tracing::{debug, error, info, warn};

pub struct ListView<R: Record> {
    repo: Repository<R>,
    uploader: ImageUploader,
    hub: ChangeHub,
    rows: Vec<R>,
    changes: Option<broadcast::Receiver<Arc<RawRowChange>>>,
    delete: ConfirmDialog<RecordId>,
}

impl<R: Record> ListView<R> {
    pub fn new(client: Arc<BackendClient>, hub: ChangeHub) -> Self {
        Self {
            repo: Repository::new(Arc::clone(&client)),
            uploader: ImageUploader::new(client),
            hub,
            rows: Vec::new(),
            changes: None,
            delete: ConfirmDialog::new(),
        }
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn get(&self, id: RecordId) -> Option<&R> {
        self.rows.iter().find(|row| row.id() == id)
    }

    pub fn is_mounted(&self) -> bool {
        self.changes.is_some()
    }

    /// Subscribe to the table's changes, load every row, then apply whatever
    /// arrived during the load.
    pub async fn mount(&mut self) -> BackendResult<()> {
        self.changes = Some(self.hub.subscribe(R::TABLE));
        let loaded = self.refresh().await;
        self.pump().await;
        loaded
    }

    /// Drop the change subscription. Rows are kept as last seen.
    pub fn unmount(&mut self) {
        if self.changes.take().is_some() {
            debug!(table = R::TABLE, "List view unmounted");
        }
    }

    /// Re-fetch every row. On failure the error is logged and the current
    /// rows are left as they were.
    pub async fn refresh(&mut self) -> BackendResult<()> {
        match self.repo.list(None).await {
            Ok(rows) => {
                self.rows = rows;
                Ok(())
            }
            Err(e) => {
                error!(table = R::TABLE, error = %e, "{}", fetch_failed_message::<R>());
                Err(e)
            }
        }
    }

    /// Patch the local rows with one change.
    ///
    /// Inserts upsert by id, updates replace by id and are dropped when the
    /// row is unknown, deletes remove by id. Each is idempotent.
    pub fn apply(&mut self, change: RowChange<R>) {
        match change {
            RowChange::Insert(record) => match self.position(record.id()) {
                Some(index) => self.rows[index] = record,
                None => self.rows.push(record),
            },
            RowChange::Update(record) => {
                if let Some(index) = self.position(record.id()) {
                    self.rows[index] = record;
                }
            }
            RowChange::Delete(id) => self.rows.retain(|row| row.id() != id),
        }
    }

    /// Apply every change already queued on the subscription without
    /// waiting. Returns how many were applied.
    pub async fn pump(&mut self) -> usize {
        let Some(changes) = self.changes.as_mut() else {
            return 0;
        };

        let mut queued = Vec::new();
        let mut lagged = false;
        let mut closed = false;
        loop {
            match changes.try_recv() {
                Ok(raw) => queued.push(raw),
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(table = R::TABLE, skipped, "Change feed lagged");
                    lagged = true;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Closed) => {
                    closed = true;
                    break;
                }
            }
        }
        if closed {
            self.changes = None;
        }

        let applied = queued.iter().filter(|raw| self.handle(raw).is_some()).count();
        if lagged {
            let _ = self.refresh().await;
        }
        applied
    }

    /// Wait for the next change on this table and apply it.
    ///
    /// Returns `None` once the view is unmounted or the feed is closed.
    pub async fn next_change(&mut self) -> Option<ChangeType> {
        loop {
            let changes = self.changes.as_mut()?;
            let received = changes.recv().await;
            match received {
                Ok(raw) => {
                    if let Some(change_type) = self.handle(&raw) {
                        return Some(change_type);
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(table = R::TABLE, skipped, "Change feed lagged, re-fetching");
                    let _ = self.refresh().await;
                }
                Err(RecvError::Closed) => {
                    self.changes = None;
                    return None;
                }
            }
        }
    }

    fn handle(&mut self, raw: &RawRowChange) -> Option<ChangeType> {
        if raw.table != R::TABLE {
            return None;
        }
        match RowChange::<R>::from_raw(raw) {
            Ok(change) => {
                self.apply(change);
                Some(raw.change_type)
            }
            Err(e) => {
                error!(table = R::TABLE, error = %e, "Dropping undecodable change");
                None
            }
        }
    }

    fn position(&self, id: RecordId) -> Option<usize> {
        self.rows.iter().position(|row| row.id() == id)
    }

    pub fn add_dialog(&self) -> AddDialog<R> {
        AddDialog::new(self.repo.clone(), self.uploader.clone())
    }

    /// Open the Edit dialog for a listed row.
    pub fn open_edit(&self, id: RecordId) -> Option<EditDialog<R>> {
        self.get(id)
            .map(|record| EditDialog::open(self.repo.clone(), self.uploader.clone(), record))
    }

    /// Submit `dialog`, then re-fetch the list on success.
    pub async fn submit_add(&mut self, dialog: &mut AddDialog<R>) -> Result<R, SubmitError> {
        let record = dialog.submit().await?;
        let _ = self.refresh().await;
        Ok(record)
    }

    pub async fn submit_edit(&mut self, dialog: &mut EditDialog<R>) -> Result<R, SubmitError> {
        let record = dialog.submit().await?;
        let _ = self.refresh().await;
        Ok(record)
    }

    /// Ask for confirmation before deleting row `id`.
    pub fn request_delete(&mut self, id: RecordId) {
        self.delete.open(id);
    }

    pub fn pending_delete(&self) -> Option<RecordId> {
        self.delete.pending().copied()
    }

    pub fn cancel_delete(&mut self) {
        self.delete.cancel();
    }

    /// Delete the row awaiting confirmation.
    ///
    /// `None` when nothing was pending. The row leaves the local list only
    /// once the backend accepted the delete.
    pub async fn confirm_delete(&mut self) -> Option<BackendResult<()>> {
        let repo = self.repo.clone();
        let (id, result) = self
            .delete
            .confirm(|id| async move { (id, repo.delete(id).await) })
            .await?;

        match &result {
            Ok(()) => {
                self.apply(RowChange::Delete(id));
                info!(table = R::TABLE, id, "Deleted {}", R::LABEL);
            }
            Err(e) => error!(table = R::TABLE, id, error = %e, "Failed to delete {}", R::LABEL),
        }
        Some(result)
    }

    pub fn render(&self) -> Table {
        Table {
            columns: R::columns().to_vec(),
            rows: self.rows.iter().map(R::cells).collect(),
            empty_message: format!("No {} found.", plural(R::LABEL)),
        }
    }
}

impl<R: Record> Drop for ListView<R> {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Generic message for a failed listing.
pub fn fetch_failed_message<R: Record>() -> String {
    format!("Failed to fetch {}. Please try again.", plural(R::LABEL))
}

fn plural(label: &str) -> String {
    if label.ends_with('s') {
        label.to_string()
    } else {
        format!("{label}s")
    }
}

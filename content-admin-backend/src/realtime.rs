//! Realtime row-change fan-out.
//!
//! The backend notifies the service of every committed row change; the hub
//! re-broadcasts each notification to whoever watches that table (list views,
//! WebSocket clients). Delivery is best effort: a lagging subscriber skips
//! messages rather than slowing down the others.

use content_admin_models::RawRowChange;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::debug;

/// Per-table broadcast channels, created lazily on first subscribe.
#[derive(Clone)]
pub struct ChangeHub {
    capacity: usize,
    tables: Arc<DashMap<String, broadcast::Sender<Arc<RawRowChange>>>>,
}

impl Default for ChangeHub {
    fn default() -> Self {
        Self::new(1024)
    }
}

impl ChangeHub {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            tables: Arc::new(DashMap::new()),
        }
    }

    /// Receive every change published for `table` from now on.
    pub fn subscribe(&self, table: &str) -> broadcast::Receiver<Arc<RawRowChange>> {
        self.tables
            .entry(table.to_string())
            .or_insert_with(|| {
                let (tx, _rx) = broadcast::channel(self.capacity);
                tx
            })
            .value()
            .subscribe()
    }

    /// Publish a change to the subscribers of its table.
    ///
    /// Returns the number of subscribers reached; changes on tables nobody
    /// watches are dropped.
    pub fn publish(&self, change: RawRowChange) -> usize {
        let Some(sender) = self.tables.get(&change.table) else {
            debug!(table = %change.table, "No subscribers for change");
            return 0;
        };
        sender.send(Arc::new(change)).unwrap_or(0)
    }
}

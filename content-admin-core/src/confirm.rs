//! Two-step confirmation for destructive actions.

use std::future::Future;

/// Holds the target of a pending destructive action until the user either
/// confirms or cancels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmDialog<T> {
    pending: Option<T>,
}

impl<T> Default for ConfirmDialog<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T> ConfirmDialog<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the dialog for `target`, replacing any earlier pending target.
    pub fn open(&mut self, target: T) {
        self.pending = Some(target);
    }

    pub fn is_open(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref()
    }

    /// Close without acting.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take()
    }

    /// Close and run `action` on the pending target.
    ///
    /// Returns `None` without calling `action` when nothing is pending.
    pub async fn confirm<F, Fut, O>(&mut self, action: F) -> Option<O>
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = O>,
    {
        let target = self.pending.take()?;
        Some(action(target).await)
    }
}

//! Optimistic collection state
//!
//! A view holds what the admin currently sees. A gesture stages its guess
//! immediately (`Pending`); the persisted result either confirms it or the
//! view is replaced wholesale by a fresh read. There is no field-level merge.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncState {
    /// Local guess, not yet acknowledged by the store
    Pending,
    /// Matches what the store last reported
    Confirmed,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderedView<T> {
    items: Vec<T>,
    state: SyncState,
}

impl<T> OrderedView<T> {
    /// View built from a fresh read
    pub fn confirmed(items: Vec<T>) -> Self {
        Self {
            items,
            state: SyncState::Confirmed,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state == SyncState::Pending
    }

    /// Show an optimistic guess before the store answers
    pub fn stage(&mut self, items: Vec<T>) {
        self.items = items;
        self.state = SyncState::Pending;
    }

    /// The store accepted the change and reported this state
    pub fn confirm(&mut self, items: Vec<T>) {
        self.items = items;
        self.state = SyncState::Confirmed;
    }

    /// Discard whatever is shown and take the store's state
    pub fn reconcile(&mut self, fresh: Vec<T>) {
        if self.is_pending() {
            tracing::debug!(count = fresh.len(), "Discarding optimistic state");
        }
        self.items = fresh;
        self.state = SyncState::Confirmed;
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_then_confirm() {
        let mut view = OrderedView::confirmed(vec![1, 2, 3]);
        assert_eq!(view.state(), SyncState::Confirmed);

        view.stage(vec![3, 1, 2]);
        assert!(view.is_pending());
        assert_eq!(view.items(), &[3, 1, 2]);

        view.confirm(vec![3, 1, 2]);
        assert_eq!(view.state(), SyncState::Confirmed);
    }

    #[test]
    fn test_reconcile_replaces_wholesale() {
        let mut view = OrderedView::confirmed(vec![1, 2, 3]);
        view.stage(vec![2, 1, 3]);
        view.reconcile(vec![1, 3, 2]);

        assert_eq!(view.state(), SyncState::Confirmed);
        assert_eq!(view.into_items(), vec![1, 3, 2]);
    }
}

//! Transaction log with a single pending slot
//!
//! `authoritative` is the last snapshot fetched from the backend. `pending`
//! holds the optimistic snapshot of the one command in flight. Readers see
//! the pending snapshot when there is one. Rolling back means discarding
//! the pending slot and nothing else.

use tracing::debug;

use crate::snapshot::Snapshot;

/// An optimistic edit awaiting confirmation
#[derive(Debug, Clone)]
pub struct PendingTransaction {
    /// Name of the command, for logging
    pub label: &'static str,
    pub snapshot: Snapshot,
}

#[derive(Debug, Default)]
pub struct TransactionLog {
    authoritative: Snapshot,
    pending: Option<PendingTransaction>,
}

impl TransactionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The state readers should see
    pub fn visible(&self) -> &Snapshot {
        match &self.pending {
            Some(pending) => &pending.snapshot,
            None => &self.authoritative,
        }
    }

    pub fn authoritative(&self) -> &Snapshot {
        &self.authoritative
    }

    pub fn pending(&self) -> Option<&PendingTransaction> {
        self.pending.as_ref()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Record an optimistic snapshot, replacing any earlier one
    pub fn begin(&mut self, label: &'static str, snapshot: Snapshot) {
        if let Some(previous) = &self.pending {
            debug!("Pending '{}' superseded by '{}'", previous.label, label);
        }
        self.pending = Some(PendingTransaction { label, snapshot });
    }

    /// The command finished; stop showing its optimistic snapshot
    pub fn settle(&mut self) {
        self.pending = None;
    }

    /// Discard the optimistic snapshot and fall back to authoritative state
    pub fn rollback(&mut self) {
        if let Some(pending) = self.pending.take() {
            debug!("Rolled back '{}'", pending.label);
        }
    }

    /// Replace authoritative state with a fresh fetch
    pub fn adopt(&mut self, snapshot: Snapshot) {
        self.authoritative = snapshot;
    }
}

//! The structured record of what a reload did (spec §2's "log records
//! describing the outcome"), returned to the caller and mirrored into
//! `tracing` events as the reload progresses.

use pgconf_core::Context;

/// Whether the calling process is the postmaster (the process that owns
/// the registry directly) or a child that inherited it — only the
/// postmaster logs "parameter changed" lines at `LOG` (spec §4.5, §7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadRole {
    Postmaster,
    Child,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Applied {
        name: String,
        old: Option<String>,
        new: String,
    },
    Removed {
        name: String,
    },
    PlaceholderCreated {
        name: String,
        value: String,
    },
    Warned {
        name: String,
        reason: String,
    },
}

/// The outcome of one successful reload attempt.
#[derive(Debug, Clone)]
pub struct ReloadReport {
    pub context: Context,
    pub changes: Vec<Change>,
}

impl ReloadReport {
    pub fn new(context: Context) -> Self {
        Self {
            context,
            changes: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, change: Change) {
        self.changes.push(change);
    }

    /// True iff nothing was actually applied or removed — a warning-only
    /// pass still counts as a no-op change log (spec §8 Idempotence).
    pub fn is_noop(&self) -> bool {
        !self
            .changes
            .iter()
            .any(|c| matches!(c, Change::Applied { .. } | Change::Removed { .. } | Change::PlaceholderCreated { .. }))
    }

    pub fn applied(&self) -> impl Iterator<Item = &Change> {
        self.changes
            .iter()
            .filter(|c| matches!(c, Change::Applied { .. }))
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Change> {
        self.changes
            .iter()
            .filter(|c| matches!(c, Change::Warned { .. }))
    }
}

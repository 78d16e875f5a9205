//! Result of a reconciliation run

use serde::Serialize;

use crate::diff::{DiffMode, DiffResult};
use crate::selection::SelectionRange;

/// How a successful run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The destination was updated
    Applied,
    /// No difference found and not forced
    NothingToDo,
    /// Changes were computed but not applied
    DryRun,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Applied => write!(f, "applied"),
            Self::NothingToDo => write!(f, "nothing to do"),
            Self::DryRun => write!(f, "dry run"),
        }
    }
}

/// Report of a successful run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub outcome: Outcome,
    pub range: SelectionRange,
    pub diff_mode: DiffMode,
    /// Number of source entries the range selected
    pub selected: usize,
    /// Changes applied, or that would be applied on a dry run
    pub changes: DiffResult,
    /// Validators copied into the destination by this run
    pub deployed: usize,
}

impl ReconcileReport {
    pub fn has_change(&self) -> bool {
        self.changes.has_change()
    }
}

//! Inputs of a reconciliation run

use crate::diff::DiffMode;
use crate::entry::Layout;
use crate::selection::SelectionRange;
use crate::{Error, Result};

/// Policy flags deciding whether and how to mutate the destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Policy {
    /// Apply even when no difference is detected, replacing every selected entry
    pub force: bool,
    /// Accept an empty selection, removing everything deployed
    pub purge: bool,
    /// Report intended changes without touching the filesystem
    pub dry_run: bool,
    /// Which differences count as changes
    pub diff_mode: DiffMode,
}

/// Everything one run needs
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReconcileConfig {
    /// Staging tree holding newly generated entries
    pub source: Layout,
    /// Node data directories to reconcile
    pub destination: Layout,
    pub range: SelectionRange,
    pub policy: Policy,
    /// Account given exclusive access to created paths; `None` skips hardening
    pub owner: Option<String>,
}

impl ReconcileConfig {
    /// Ensure every path is set.
    pub fn validate(&self) -> Result<()> {
        let paths = [
            ("source validators", &self.source.validators),
            ("source secrets", &self.source.secrets),
            ("destination validators", &self.destination.validators),
            ("destination secrets", &self.destination.secrets),
        ];
        for (what, path) in paths {
            if path.as_os_str().is_empty() {
                return Err(Error::MissingPath { what: what.to_string() });
            }
        }
        Ok(())
    }
}

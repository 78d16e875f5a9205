//! Reconciler implementation
//!
//! The Reconciler makes a node's validator and secret directories hold
//! exactly the selected slice of a staging tree. Every run recomputes its
//! view from directory listings, so re-running after a partial failure
//! finishes the job instead of relying on a journal.
//!
//! Each entry is copied and hardened under a staging name and only then
//! renamed into place. A name without the staging suffix is therefore always
//! complete, and leftovers of an interrupted copy show up as incomplete
//! entries that the next run removes.

mod config;
mod report;

use std::path::Path;

use tracing::{debug, info, warn};
use vdist_fs::{PermissionHardener, io};

use crate::diff::{DiffEngine, DiffResult};
use crate::entry::{EntryKind, EntrySet, Layout, PairedEntrySet};
use crate::{Error, Result};

pub use config::{Policy, ReconcileConfig};
pub use report::{Outcome, ReconcileReport};

/// Orchestrates loading, selection, diffing and applying
///
/// Decision order:
/// 1. Load the source pair set; a mismatch aborts before any mutation
/// 2. Select the configured range; empty is fatal unless purging
/// 3. Prepare the destination roots and diff against them
/// 4. Stop with nothing to do when unchanged and not forced
/// 5. Stop with a report on dry runs
/// 6. Remove stale and incomplete entries, then stage, harden and move
///    new ones into place
pub struct Reconciler<'a> {
    hardener: &'a dyn PermissionHardener,
}

impl<'a> Reconciler<'a> {
    /// Create a Reconciler that restricts created paths through `hardener`.
    pub fn new(hardener: &'a dyn PermissionHardener) -> Self {
        Self { hardener }
    }

    /// Run one reconciliation.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingPath`] if a root is not configured
    /// - [`Error::MismatchedPair`] if source validators and secrets differ
    /// - [`Error::EmptySelection`] if nothing is selected without purge
    /// - [`Error::Fs`] on the first failing filesystem operation; earlier
    ///   mutations of the same run stay in place
    pub fn reconcile(&self, config: &ReconcileConfig) -> Result<ReconcileReport> {
        config.validate()?;
        let policy = config.policy;

        debug!("Finding new validators/secrets...");
        let source = PairedEntrySet::load(&config.source)?;
        debug!(
            validators = source.validators.len(),
            secrets = source.secrets.len(),
            "Validators and secrets match"
        );

        let selected = config.range.apply(source.names());
        debug!(range = %config.range, count = selected.len(), "Selected new validators");

        if selected.is_empty() {
            warn!("No new validators or secrets selected!");
            if !policy.purge {
                return Err(Error::EmptySelection {
                    start: config.range.start,
                    end: config.range.end,
                    available: source.names().len(),
                });
            }
            info!("Purge requested, all deployed validators will be removed.");
        }

        let deployed = if policy.dry_run {
            read_destination(&config.destination)?
        } else {
            self.prepare_destination(&config.destination, config.owner.as_deref())?
        };
        debug!(
            validators = deployed.validators.len(),
            secrets = deployed.secrets.len(),
            "Found old validators/secrets"
        );

        let engine = DiffEngine::new(policy.diff_mode);
        let diff = engine.diff(selected, &deployed);

        let report = |outcome, changes, deployed| ReconcileReport {
            outcome,
            range: config.range,
            diff_mode: policy.diff_mode,
            selected: selected.len(),
            changes,
            deployed,
        };

        let changes = if policy.force {
            info!("Forcing validator layout update.");
            diff.refresh_unchanged()
        } else if diff.has_change() {
            info!("Difference in validator layout found.");
            diff
        } else {
            info!("No difference in validator layout found. Nothing to do.");
            return Ok(report(Outcome::NothingToDo, diff, 0));
        };

        if policy.dry_run {
            info!("This is a DRY run! No files will be copied or removed.");
            log_planned(&changes);
            return Ok(report(Outcome::DryRun, changes, 0));
        }

        let copied = self.apply(config, &changes)?;
        info!(deployed = copied, "SUCCESS");
        Ok(report(Outcome::Applied, changes, copied))
    }

    /// Create missing destination roots, harden them and list them.
    fn prepare_destination(&self, layout: &Layout, owner: Option<&str>) -> Result<PairedEntrySet> {
        for kind in [EntryKind::Validator, EntryKind::Secret] {
            let root = layout.root(kind);
            if io::ensure_dir(root)? {
                debug!(path = %root.display(), "Created output {kind}s directory");
            }
            self.harden(root, owner)?;
        }
        PairedEntrySet::load_deployed(layout)
    }

    /// Remove first, then add. Returns the number of validators copied.
    fn apply(&self, config: &ReconcileConfig, changes: &DiffResult) -> Result<usize> {
        let source = &config.source;
        let destination = &config.destination;
        let owner = config.owner.as_deref();

        let stale = &changes.validators.to_remove;
        if !stale.is_empty() {
            info!("Removing {} old validators...", stale.len());
            for name in stale {
                io::remove_validator(&destination.validators.join(name))?;
            }
        }
        let stale = &changes.secrets.to_remove;
        if !stale.is_empty() {
            info!("Removing {} old secrets...", stale.len());
            for name in stale {
                io::remove_secret(&destination.secrets.join(name))?;
            }
        }

        let fresh = &changes.validators.to_add;
        info!("Copying {} new validators...", fresh.len());
        for name in fresh {
            let staged = destination.validators.join(io::staging_name(name));
            let created = io::copy_tree(&source.validators.join(name), &staged)?;
            for path in &created {
                self.harden(path, owner)?;
            }
            io::rename(&staged, &destination.validators.join(name))?;
        }
        let fresh_secrets = &changes.secrets.to_add;
        info!("Copying {} new secrets...", fresh_secrets.len());
        for name in fresh_secrets {
            let staged = destination.secrets.join(io::staging_name(name));
            io::copy_file(&source.secrets.join(name), &staged)?;
            self.harden(&staged, owner)?;
            io::rename(&staged, &destination.secrets.join(name))?;
        }

        Ok(fresh.len())
    }

    fn harden(&self, path: &Path, owner: Option<&str>) -> Result<()> {
        if let Some(owner) = owner {
            self.hardener.restrict(path, owner)?;
        }
        Ok(())
    }
}

/// List the destination without creating anything; absent roots are empty.
fn read_destination(layout: &Layout) -> Result<PairedEntrySet> {
    let load = |kind: EntryKind| -> Result<EntrySet> {
        let root = layout.root(kind);
        if root.is_dir() {
            EntrySet::load_deployed(kind, root)
        } else {
            Ok(EntrySet::new(kind, root, Vec::new()))
        }
    };
    Ok(PairedEntrySet {
        validators: load(EntryKind::Validator)?,
        secrets: load(EntryKind::Secret)?,
    })
}

fn log_planned(changes: &DiffResult) {
    for (kind, diff) in [
        (EntryKind::Validator, &changes.validators),
        (EntryKind::Secret, &changes.secrets),
    ] {
        for name in &diff.to_remove {
            info!("Would remove {kind}: {name}");
        }
        for name in &diff.to_add {
            info!("Would copy {kind}: {name}");
        }
    }
}

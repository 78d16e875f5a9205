//! Core reconciliation layer for validator distribution
//!
//! Makes a node's validator and secret directories hold exactly a chosen
//! slice of a staging tree:
//! - **entry**: load paired validator/secret listings
//! - **selection**: pick a half-open range of sorted names
//! - **diff**: classify names into add, remove and unchanged
//! - **reconcile**: decide on and apply the minimal mutation set

pub mod diff;
pub mod entry;
pub mod error;
pub mod reconcile;
pub mod selection;

pub use diff::{DiffEngine, DiffMode, DiffResult, KindDiff};
pub use entry::{EntryKind, EntrySet, Layout, PairedEntrySet};
pub use error::{Error, Result};
pub use reconcile::{Outcome, Policy, ReconcileConfig, ReconcileReport, Reconciler};
pub use selection::{SelectionRange, select};

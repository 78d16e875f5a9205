//! Filesystem primitives for validator distribution
//!
//! Provides sorted listings, verbatim copies, guarded removals and
//! owner-only permission hardening for validator and secret trees.

pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod permissions;

pub use config::ConfigStore;
pub use constants::{DistPath, RESERVED_PREFIX, STAGING_SUFFIX};
pub use error::{Error, Result};
pub use permissions::{NoopHardener, PermissionHardener, default_hardener};

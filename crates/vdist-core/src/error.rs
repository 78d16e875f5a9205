//! Error types for vdist-core

/// Result type for vdist-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during reconciliation
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required source or destination path was not configured
    #[error("Missing required path: {what}")]
    MissingPath { what: String },

    /// Validator and secret names in the source differ
    #[error(
        "Validators and secrets do not match: validators without secret {only_validators:?}, secrets without validator {only_secrets:?}"
    )]
    MismatchedPair {
        only_validators: Vec<String>,
        only_secrets: Vec<String>,
    },

    /// The selection range picked nothing and purging was not requested
    #[error("No validators selected by range {start}..{end} ({available} available); use purge to remove all")]
    EmptySelection {
        start: isize,
        end: isize,
        available: usize,
    },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from vdist-fs
    #[error(transparent)]
    Fs(#[from] vdist_fs::Error),
}

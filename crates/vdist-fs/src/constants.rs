//! Well-known names in validator and secret trees.

use std::path::Path;

/// Destination entries starting with this prefix are node state
/// (the slashing protection database) and are never managed.
pub const RESERVED_PREFIX: &str = "slashing";

/// Suffix of entries that are still being assembled in a destination root.
/// They are moved to their final name only once copied and hardened.
pub const STAGING_SUFFIX: &str = ".partial";

/// Fixed path segments of the distribution layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistPath {
    /// The `validators` subdirectory of a combined root
    ValidatorsDir,
    /// The `secrets` subdirectory of a combined root
    SecretsDir,
    /// The credential file inside each validator directory
    Keystore,
}

impl DistPath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidatorsDir => "validators",
            Self::SecretsDir => "secrets",
            Self::Keystore => "keystore.json",
        }
    }
}

impl AsRef<Path> for DistPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for DistPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for DistPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

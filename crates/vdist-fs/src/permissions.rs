//! Owner-only access control for deployed paths
//!
//! Hardening is always applied to one path at a time. Nothing relies on
//! permissions inherited from a parent directory.

use std::path::Path;
use std::process::{Command, Stdio};

use crate::{Error, Result};

/// Mode applied to directories on Unix.
pub const DIRECTORY_MODE: u32 = 0o700;

/// Mode applied to files on Unix.
pub const FILE_MODE: u32 = 0o600;

/// Restricts access to a path so only its owner can use it.
pub trait PermissionHardener {
    /// Restrict access to `path` to `owner`.
    ///
    /// Fails with [`Error::UnknownFileType`] if `path` is neither a file
    /// nor a directory.
    fn restrict(&self, path: &Path, owner: &str) -> Result<()>;
}

/// Leaves permissions untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHardener;

impl PermissionHardener for NoopHardener {
    fn restrict(&self, _path: &Path, _owner: &str) -> Result<()> {
        Ok(())
    }
}

/// Applies `0700` to directories and `0600` to files.
///
/// The owner is not changed; the process is expected to run as the
/// account that owns the node data.
#[cfg(unix)]
#[derive(Debug, Default, Clone, Copy)]
pub struct PosixHardener;

#[cfg(unix)]
impl PermissionHardener for PosixHardener {
    fn restrict(&self, path: &Path, _owner: &str) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let mode = if path.is_dir() {
            DIRECTORY_MODE
        } else if path.is_file() {
            FILE_MODE
        } else {
            return Err(Error::UnknownFileType {
                path: path.to_path_buf(),
            });
        };
        tracing::trace!(path = %path.display(), mode = format!("{mode:o}"), "Restricting access");
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
            .map_err(|e| Error::io(path, e))
    }
}

/// Replaces the ACL of a path through `icacls`, dropping inherited
/// entries and granting full control to the owner only.
#[derive(Debug, Default, Clone, Copy)]
pub struct IcaclsHardener;

impl IcaclsHardener {
    /// Build the `icacls` arguments for `path`.
    pub fn args(path: &Path, owner: &str) -> Result<Vec<String>> {
        let perms = if path.is_dir() {
            "(OI)(CI)(F)"
        } else if path.is_file() {
            "(F)"
        } else {
            return Err(Error::UnknownFileType {
                path: path.to_path_buf(),
            });
        };
        Ok(vec![
            path.display().to_string(),
            "/inheritance:r".to_string(),
            "/grant:r".to_string(),
            format!("{owner}:{perms}"),
        ])
    }
}

impl PermissionHardener for IcaclsHardener {
    fn restrict(&self, path: &Path, owner: &str) -> Result<()> {
        let args = Self::args(path, owner)?;
        tracing::trace!(path = %path.display(), owner, "Replacing ACL");
        let status = Command::new("icacls")
            .args(&args)
            .stdout(Stdio::null())
            .status()
            .map_err(|e| Error::io(path, e))?;
        if status.success() {
            Ok(())
        } else {
            Err(Error::PermissionHardening {
                path: path.to_path_buf(),
                message: format!("icacls exited with {status}"),
            })
        }
    }
}

/// The hardener for the current platform.
pub fn default_hardener() -> Box<dyn PermissionHardener> {
    #[cfg(unix)]
    {
        Box::new(PosixHardener)
    }
    #[cfg(not(unix))]
    {
        Box::new(IcaclsHardener)
    }
}

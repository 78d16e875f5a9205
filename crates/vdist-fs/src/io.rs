//! Listing, copying and removal of distribution entries
//!
//! All operations are synchronous and fail fast: the first error aborts
//! the operation and is returned with the offending path attached.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::{DistPath, Error, Result, STAGING_SUFFIX};

/// List the immediate entry names of `dir`, sorted lexicographically.
pub fn list_names(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let name = entry.file_name().into_string().map_err(|raw| {
            Error::io(
                dir.join(&raw),
                std::io::Error::new(ErrorKind::InvalidData, "entry name is not valid UTF-8"),
            )
        })?;
        names.push(name);
    }
    names.sort();
    Ok(names)
}

/// Create `dir` and any missing parents.
///
/// Returns `true` if the directory did not exist before the call.
pub fn ensure_dir(dir: &Path) -> Result<bool> {
    if dir.is_dir() {
        return Ok(false);
    }
    fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    Ok(true)
}

/// Copy a single file verbatim.
pub fn copy_file(src: &Path, dst: &Path) -> Result<()> {
    tracing::debug!(src = %src.display(), dst = %dst.display(), "Copying file");
    fs::copy(src, dst).map_err(|e| Error::io(src, e))?;
    Ok(())
}

/// Recursively copy the directory `src` to `dst`.
///
/// `dst` must not exist. Returns every path created, parents before
/// children, so callers can act on each one individually.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<Vec<PathBuf>> {
    tracing::debug!(src = %src.display(), dst = %dst.display(), "Copying directory");
    let mut created = Vec::new();
    copy_tree_into(src, dst, &mut created)?;
    Ok(created)
}

fn copy_tree_into(src: &Path, dst: &Path, created: &mut Vec<PathBuf>) -> Result<()> {
    fs::create_dir(dst).map_err(|e| Error::io(dst, e))?;
    created.push(dst.to_path_buf());

    let mut entries = fs::read_dir(src)
        .map_err(|e| Error::io(src, e))?
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(|e| Error::io(src, e))?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let from = entry.path();
        let to = dst.join(entry.file_name());
        let file_type = entry.file_type().map_err(|e| Error::io(&from, e))?;
        if file_type.is_dir() {
            copy_tree_into(&from, &to, created)?;
        } else {
            fs::copy(&from, &to).map_err(|e| Error::io(&from, e))?;
            created.push(to);
        }
    }
    Ok(())
}

/// Name under which the entry `name` is assembled before it is moved into
/// place with [`rename`].
pub fn staging_name(name: &str) -> String {
    format!("{name}{STAGING_SUFFIX}")
}

/// Whether `name` is a leftover of an interrupted copy.
pub fn is_staged(name: &str) -> bool {
    name.ends_with(STAGING_SUFFIX)
}

/// Move a fully assembled entry to its final name.
pub fn rename(from: &Path, to: &Path) -> Result<()> {
    tracing::debug!(from = %from.display(), to = %to.display(), "Moving into place");
    fs::rename(from, to).map_err(|e| Error::io(to, e))
}

/// Remove a deployed validator directory.
///
/// Deletes the credential file, then the directory itself. A missing
/// credential file is tolerated so an interrupted removal can be finished.
/// The directory is never removed recursively: unexpected content makes
/// this fail.
pub fn remove_validator(dir: &Path) -> Result<()> {
    let keystore = dir.join(DistPath::Keystore);
    match fs::remove_file(&keystore) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %keystore.display(), "Keystore already absent");
        }
        Err(e) => return Err(Error::io(&keystore, e)),
    }
    fs::remove_dir(dir).map_err(|e| Error::io(dir, e))
}

/// Remove a deployed secret file.
pub fn remove_secret(path: &Path) -> Result<()> {
    fs::remove_file(path).map_err(|e| Error::io(path, e))
}

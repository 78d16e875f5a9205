//! Validator and secret listings
//!
//! Both kinds are listed from their own root directory. In a staging tree
//! every validator must have a secret of the same name and vice versa.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use vdist_fs::{DistPath, io};

use crate::{Error, Result};

/// The two kinds of managed entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// A directory holding a `keystore.json`
    Validator,
    /// A single passphrase file
    Secret,
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validator => write!(f, "validator"),
            Self::Secret => write!(f, "secret"),
        }
    }
}

/// Root directories of the two entry kinds
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Layout {
    pub validators: PathBuf,
    pub secrets: PathBuf,
}

impl Layout {
    pub fn new(validators: impl Into<PathBuf>, secrets: impl Into<PathBuf>) -> Self {
        Self {
            validators: validators.into(),
            secrets: secrets.into(),
        }
    }

    /// Layout with `validators/` and `secrets/` under a single root.
    pub fn from_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self::new(root.join(DistPath::ValidatorsDir), root.join(DistPath::SecretsDir))
    }

    pub fn root(&self, kind: EntryKind) -> &Path {
        match kind {
            EntryKind::Validator => &self.validators,
            EntryKind::Secret => &self.secrets,
        }
    }
}

/// Sorted, duplicate-free names of one kind under one root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySet {
    kind: EntryKind,
    root: PathBuf,
    names: Vec<String>,
    /// Entries present on disk but not fully in place; never part of `names`
    incomplete: Vec<String>,
}

impl EntrySet {
    /// Build a set from arbitrary names; they are sorted and deduplicated.
    pub fn new(kind: EntryKind, root: impl Into<PathBuf>, names: impl IntoIterator<Item = String>) -> Self {
        let names: BTreeSet<String> = names.into_iter().collect();
        Self {
            kind,
            root: root.into(),
            names: names.into_iter().collect(),
            incomplete: Vec::new(),
        }
    }

    /// List the immediate entries of `root`.
    pub fn load(kind: EntryKind, root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let names = io::list_names(&root)?;
        Ok(Self::new(kind, root, names))
    }

    /// List a deployed root, setting aside entries that are not fully in place.
    ///
    /// An entry is incomplete when it still carries the staging suffix, or
    /// when it is a validator directory without a keystore.
    pub fn load_deployed(kind: EntryKind, root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let (incomplete, names): (Vec<String>, Vec<String>) = io::list_names(&root)?
            .into_iter()
            .partition(|name| is_incomplete(kind, &root, name));
        let mut set = Self::new(kind, root, names);
        set.incomplete = incomplete;
        Ok(set)
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.binary_search_by(|n| n.as_str().cmp(name)).is_ok()
    }

    /// Sorted names found on disk that must be removed and, if still
    /// wanted, copied again.
    pub fn incomplete(&self) -> &[String] {
        &self.incomplete
    }
}

fn is_incomplete(kind: EntryKind, root: &Path, name: &str) -> bool {
    io::is_staged(name)
        || (kind == EntryKind::Validator && !root.join(name).join(DistPath::Keystore).is_file())
}

/// Validators and secrets sharing one layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairedEntrySet {
    pub validators: EntrySet,
    pub secrets: EntrySet,
}

impl PairedEntrySet {
    /// Load both listings and require identical name sets.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MismatchedPair`] naming every unpaired entry.
    pub fn load(layout: &Layout) -> Result<Self> {
        let set = Self::load_unchecked(layout)?;
        set.verify_pairs()?;
        Ok(set)
    }

    /// Load both listings without the pair check.
    pub fn load_unchecked(layout: &Layout) -> Result<Self> {
        Ok(Self {
            validators: EntrySet::load(EntryKind::Validator, &layout.validators)?,
            secrets: EntrySet::load(EntryKind::Secret, &layout.secrets)?,
        })
    }

    /// Load a deployed tree.
    ///
    /// No pair check: an interrupted run may legitimately leave one kind
    /// ahead of the other. Incomplete entries are set aside per kind.
    pub fn load_deployed(layout: &Layout) -> Result<Self> {
        Ok(Self {
            validators: EntrySet::load_deployed(EntryKind::Validator, &layout.validators)?,
            secrets: EntrySet::load_deployed(EntryKind::Secret, &layout.secrets)?,
        })
    }

    /// Sorted names shared by both kinds.
    ///
    /// Only meaningful once the pair check passed.
    pub fn names(&self) -> &[String] {
        self.validators.names()
    }

    fn verify_pairs(&self) -> Result<()> {
        let only_validators: Vec<String> = self
            .validators
            .names()
            .iter()
            .filter(|n| !self.secrets.contains(n))
            .cloned()
            .collect();
        let only_secrets: Vec<String> = self
            .secrets
            .names()
            .iter()
            .filter(|n| !self.validators.contains(n))
            .cloned()
            .collect();

        if only_validators.is_empty() && only_secrets.is_empty() {
            return Ok(());
        }
        Err(Error::MismatchedPair {
            only_validators,
            only_secrets,
        })
    }
}

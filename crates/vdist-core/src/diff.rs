//! Classification of selected names against deployed names
//!
//! Deployed names starting with an excluded prefix are dropped before
//! comparison, so they are neither removed nor counted as deployed.
//! Incomplete deployed entries are always removed, whatever the mode, and
//! copied again when still selected.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use vdist_fs::RESERVED_PREFIX;

use crate::entry::{EntrySet, PairedEntrySet};

/// Which differences count as a change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffMode {
    /// Names on either side only are changes; extras are removed
    #[default]
    Symmetric,
    /// Only selected names missing from the destination are changes;
    /// extra deployed names are left alone
    #[serde(alias = "additive-only")]
    Additive,
}

impl FromStr for DiffMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "symmetric" => Ok(Self::Symmetric),
            "additive" | "additive-only" => Ok(Self::Additive),
            other => Err(format!("unknown diff mode: {other}")),
        }
    }
}

impl std::fmt::Display for DiffMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Symmetric => write!(f, "symmetric"),
            Self::Additive => write!(f, "additive"),
        }
    }
}

/// Names of one kind, classified. Each list is sorted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct KindDiff {
    pub to_add: Vec<String>,
    pub to_remove: Vec<String>,
    pub unchanged: Vec<String>,
}

impl KindDiff {
    pub fn has_change(&self) -> bool {
        !self.to_add.is_empty() || !self.to_remove.is_empty()
    }

    /// Also replace every unchanged entry.
    ///
    /// Unchanged names move into both `to_add` and `to_remove`.
    pub fn refresh_unchanged(mut self) -> Self {
        let unchanged = std::mem::take(&mut self.unchanged);
        self.to_add = merge_sorted(self.to_add, &unchanged);
        self.to_remove = merge_sorted(self.to_remove, &unchanged);
        self
    }
}

fn merge_sorted(names: Vec<String>, extra: &[String]) -> Vec<String> {
    let mut set: BTreeSet<String> = names.into_iter().collect();
    set.extend(extra.iter().cloned());
    set.into_iter().collect()
}

/// Per-kind classification for validators and secrets
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DiffResult {
    pub validators: KindDiff,
    pub secrets: KindDiff,
}

impl DiffResult {
    pub fn has_change(&self) -> bool {
        self.validators.has_change() || self.secrets.has_change()
    }

    pub fn refresh_unchanged(self) -> Self {
        Self {
            validators: self.validators.refresh_unchanged(),
            secrets: self.secrets.refresh_unchanged(),
        }
    }
}

/// Compares desired names against deployed names
#[derive(Debug, Clone)]
pub struct DiffEngine {
    mode: DiffMode,
    exclude_prefixes: Vec<String>,
}

impl DiffEngine {
    /// Engine excluding the slashing database prefix.
    pub fn new(mode: DiffMode) -> Self {
        Self::with_exclusions(mode, [RESERVED_PREFIX])
    }

    pub fn with_exclusions<I, S>(mode: DiffMode, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            mode,
            exclude_prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn mode(&self) -> DiffMode {
        self.mode
    }

    fn is_excluded(&self, name: &str) -> bool {
        self.exclude_prefixes.iter().any(|p| name.starts_with(p.as_str()))
    }

    /// Classify one kind of names.
    pub fn diff_names<D, P>(&self, desired: D, deployed: P) -> KindDiff
    where
        D: IntoIterator,
        D::Item: AsRef<str>,
        P: IntoIterator,
        P::Item: AsRef<str>,
    {
        let desired: BTreeSet<String> = desired
            .into_iter()
            .map(|n| n.as_ref().to_string())
            .collect();
        let deployed: BTreeSet<String> = deployed
            .into_iter()
            .map(|n| n.as_ref().to_string())
            .filter(|n| !self.is_excluded(n))
            .collect();

        let to_add = desired.difference(&deployed).cloned().collect();
        let unchanged = desired.intersection(&deployed).cloned().collect();
        let to_remove = match self.mode {
            DiffMode::Symmetric => deployed.difference(&desired).cloned().collect(),
            DiffMode::Additive => Vec::new(),
        };

        KindDiff {
            to_add,
            to_remove,
            unchanged,
        }
    }

    /// Classify one deployed set, including its incomplete entries.
    ///
    /// Incomplete names are never in `deployed.names()`, so a selected one
    /// already lands in `to_add`; every one of them is removed first.
    pub fn diff_entries(&self, desired: &[String], deployed: &EntrySet) -> KindDiff {
        let mut diff = self.diff_names(desired, deployed.names());
        let incomplete: Vec<String> = deployed
            .incomplete()
            .iter()
            .filter(|n| !self.is_excluded(n))
            .cloned()
            .collect();
        if !incomplete.is_empty() {
            diff.to_remove = merge_sorted(diff.to_remove, &incomplete);
        }
        diff
    }

    /// Classify both kinds; `selected` names apply to validators and secrets alike.
    pub fn diff(&self, selected: &[String], deployed: &PairedEntrySet) -> DiffResult {
        DiffResult {
            validators: self.diff_entries(selected, &deployed.validators),
            secrets: self.diff_entries(selected, &deployed.secrets),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strings(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn symmetric_diff_adds_and_removes() {
        let engine = DiffEngine::new(DiffMode::Symmetric);
        let diff = engine.diff_names(["b", "c"], ["a", "b"]);

        assert_eq!(diff.to_add, strings(&["c"]));
        assert_eq!(diff.to_remove, strings(&["a"]));
        assert_eq!(diff.unchanged, strings(&["b"]));
        assert!(diff.has_change());
    }

    #[test]
    fn additive_diff_never_removes() {
        let engine = DiffEngine::new(DiffMode::Additive);
        let diff = engine.diff_names(["b"], ["a", "b"]);

        assert!(diff.to_remove.is_empty());
        assert!(!diff.has_change());
    }

    #[test]
    fn reserved_prefix_is_invisible() {
        let engine = DiffEngine::new(DiffMode::Symmetric);
        let diff = engine.diff_names(Vec::<String>::new(), ["slashing-db", "slashing_protection.sqlite3"]);

        assert_eq!(diff, KindDiff::default());
    }

    #[test]
    fn custom_exclusions() {
        let engine = DiffEngine::with_exclusions(DiffMode::Symmetric, ["lock", "slashing"]);
        let diff = engine.diff_names(["a"], ["a", "lockfile", "z"]);

        assert_eq!(diff.to_remove, strings(&["z"]));
    }

    #[test]
    fn incomplete_entries_are_replaced_even_when_additive() {
        let temp = tempfile::TempDir::new().unwrap();
        let root = temp.path();
        for name in ["a", "b", "c.partial", "slashing-db"] {
            std::fs::create_dir(root.join(name)).unwrap();
        }
        std::fs::write(root.join("a").join("keystore.json"), "{}").unwrap();
        let deployed = EntrySet::load_deployed(crate::EntryKind::Validator, root).unwrap();

        let engine = DiffEngine::new(DiffMode::Additive);
        let diff = engine.diff_entries(&strings(&["a", "b"]), &deployed);

        assert_eq!(diff.to_add, strings(&["b"]));
        assert_eq!(diff.to_remove, strings(&["b", "c.partial"]));
        assert_eq!(diff.unchanged, strings(&["a"]));
    }

    #[test]
    fn refresh_moves_unchanged_into_both_sides() {
        let diff = KindDiff {
            to_add: strings(&["c"]),
            to_remove: strings(&["a"]),
            unchanged: strings(&["b"]),
        }
        .refresh_unchanged();

        assert_eq!(diff.to_add, strings(&["b", "c"]));
        assert_eq!(diff.to_remove, strings(&["a", "b"]));
        assert!(diff.unchanged.is_empty());
    }

    #[test]
    fn diff_mode_parses_aliases() {
        assert_eq!("Symmetric".parse::<DiffMode>().unwrap(), DiffMode::Symmetric);
        assert_eq!("additive-only".parse::<DiffMode>().unwrap(), DiffMode::Additive);
        assert!("mirror".parse::<DiffMode>().is_err());
    }
}

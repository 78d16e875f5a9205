//! [`Staging`] builder for reconciliation test scenarios.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Deterministic validator name for index `i`.
///
/// Names sort in index order, so range `[s, e)` selects indices `s..e`.
pub fn validator_name(i: usize) -> String {
    format!("0x{i:08x}")
}

/// A temporary directory holding a staging tree under `source/` and a
/// node data directory under `node/`.
///
/// # Example
///
/// ```rust,no_run
/// use vdist_test_utils::Staging;
///
/// let staging = Staging::with_pairs(5);
/// staging.deploy_pair("0x00000000");
/// staging.assert_deployed(&["0x00000000"]);
/// ```
pub struct Staging {
    temp_dir: TempDir,
}

impl Default for Staging {
    fn default() -> Self {
        Self::new()
    }
}

impl Staging {
    /// Empty `source/validators` and `source/secrets`; no node directory.
    pub fn new() -> Self {
        let staging = Self {
            temp_dir: TempDir::new().unwrap(),
        };
        fs::create_dir_all(staging.source().join("validators")).unwrap();
        fs::create_dir_all(staging.source().join("secrets")).unwrap();
        staging
    }

    /// Staging tree with `count` matching validator/secret pairs.
    pub fn with_pairs(count: usize) -> Self {
        let staging = Self::new();
        for i in 0..count {
            staging.add_pair(&validator_name(i));
        }
        staging
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Combined source root holding `validators/` and `secrets/`.
    pub fn source(&self) -> PathBuf {
        self.root().join("source")
    }

    /// Combined node root holding `validators/` and `secrets/`.
    pub fn node(&self) -> PathBuf {
        self.root().join("node")
    }

    /// Add a validator and its secret to the staging tree.
    pub fn add_pair(&self, name: &str) {
        self.add_validator(name);
        self.add_secret(name);
    }

    /// Add a validator without a secret.
    pub fn add_validator(&self, name: &str) {
        write_validator(&self.source().join("validators"), name);
    }

    /// Add a secret without a validator.
    pub fn add_secret(&self, name: &str) {
        write_secret(&self.source().join("secrets"), name);
    }

    /// Place a validator/secret pair directly into the node tree.
    pub fn deploy_pair(&self, name: &str) {
        write_validator(&self.node().join("validators"), name);
        write_secret(&self.node().join("secrets"), name);
    }

    /// Place a slashing database directory into the node validators tree.
    pub fn add_slashing_db(&self, name: &str) {
        let dir = self.node().join("validators").join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("slashing_protection.sqlite3"), b"db").unwrap();
    }

    /// Sorted entry names of `node/<kind>` (empty when absent).
    pub fn node_names(&self, kind: &str) -> Vec<String> {
        let dir = self.node().join(kind);
        if !dir.is_dir() {
            return Vec::new();
        }
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    /// Every path under `node/` relative to the root, with file contents.
    /// Directories map to `None`.
    pub fn snapshot(&self) -> BTreeMap<PathBuf, Option<Vec<u8>>> {
        let mut out = BTreeMap::new();
        if self.node().exists() {
            collect(&self.node(), self.root(), &mut out);
        }
        out
    }

    /// Assert that exactly `names` are deployed as validator/secret pairs,
    /// ignoring slashing state.
    ///
    /// # Panics
    /// Panics if the deployed validators or secrets differ from `names`.
    pub fn assert_deployed(&self, names: &[&str]) {
        let expected: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        let validators: Vec<String> = self
            .node_names("validators")
            .into_iter()
            .filter(|n| !n.starts_with("slashing"))
            .collect();
        assert_eq!(validators, expected, "deployed validators differ");
        assert_eq!(self.node_names("secrets"), expected, "deployed secrets differ");
        for name in names {
            let keystore = self.node().join("validators").join(name).join("keystore.json");
            assert!(keystore.is_file(), "Expected keystore: {}", keystore.display());
        }
    }
}

fn write_validator(root: &Path, name: &str) {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("keystore.json"), format!("{{\"pubkey\":\"{name}\"}}")).unwrap();
}

fn write_secret(root: &Path, name: &str) {
    fs::create_dir_all(root).unwrap();
    fs::write(root.join(name), format!("passphrase-{name}")).unwrap();
}

fn collect(dir: &Path, base: &Path, out: &mut BTreeMap<PathBuf, Option<Vec<u8>>>) {
    let relative = dir.strip_prefix(base).unwrap().to_path_buf();
    out.insert(relative, None);
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            collect(&path, base, out);
        } else {
            let relative = path.strip_prefix(base).unwrap().to_path_buf();
            out.insert(relative, Some(fs::read(&path).unwrap()));
        }
    }
}

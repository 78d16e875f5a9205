//! Settings file support and merging with command-line arguments
//!
//! Command-line values always win; the settings file only fills gaps.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::Level;
use vdist_core::{DiffMode, Layout, Policy, ReconcileConfig, SelectionRange};
use vdist_fs::{ConfigStore, DistPath};

use crate::cli::Cli;
use crate::error::{CliError, Result};

/// Owner used for permission hardening when none is configured
pub const DEFAULT_USER: &str = "nimbus";

/// Contents of a `--config` file
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub input: Option<PathBuf>,
    pub input_val: Option<PathBuf>,
    pub input_sec: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub output_val: Option<PathBuf>,
    pub output_sec: Option<PathBuf>,
    pub user: Option<String>,
    pub diff_mode: Option<DiffMode>,
    pub purge: bool,
    pub no_harden: bool,
    pub log_level: Option<String>,
}

impl Settings {
    /// Load settings from `path`, or defaults when no file was given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Ok(ConfigStore::new().load(path)?),
            None => Ok(Self::default()),
        }
    }
}

/// What the binary should do, after merging all inputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub config: ReconcileConfig,
    pub log_level: Level,
}

/// Merge command-line arguments over settings.
pub fn resolve(cli: &Cli, settings: &Settings) -> Result<Resolved> {
    let source = layout(
        "input",
        [
            (cli.input_val.as_ref(), cli.input_sec.as_ref(), cli.input.as_ref()),
            (
                settings.input_val.as_ref(),
                settings.input_sec.as_ref(),
                settings.input.as_ref(),
            ),
        ],
    )?;
    let destination = layout(
        "output",
        [
            (cli.output_val.as_ref(), cli.output_sec.as_ref(), cli.output.as_ref()),
            (
                settings.output_val.as_ref(),
                settings.output_sec.as_ref(),
                settings.output.as_ref(),
            ),
        ],
    )?;

    let policy = Policy {
        force: cli.force,
        purge: cli.purge || settings.purge,
        dry_run: cli.dry_run,
        diff_mode: cli
            .diff_mode
            .map(DiffMode::from)
            .or(settings.diff_mode)
            .unwrap_or_default(),
    };

    let owner = if cli.no_harden || settings.no_harden {
        None
    } else {
        Some(
            cli.user
                .clone()
                .or_else(|| settings.user.clone())
                .unwrap_or_else(|| DEFAULT_USER.to_string()),
        )
    };

    let level_name = cli
        .log_level
        .as_deref()
        .or(settings.log_level.as_deref())
        .unwrap_or("info");
    let log_level = parse_level(level_name)?;

    Ok(Resolved {
        config: ReconcileConfig {
            source,
            destination,
            range: SelectionRange::new(cli.start, cli.end),
            policy,
            owner,
        },
        log_level,
    })
}

/// Parse a level name, accepting the legacy `warning` and `critical`.
fn parse_level(name: &str) -> Result<Level> {
    let lower = name.to_ascii_lowercase();
    let canonical = match lower.as_str() {
        "warning" => "warn",
        "critical" => "error",
        other => other,
    };
    canonical
        .parse::<Level>()
        .map_err(|_| CliError::user(format!("Invalid log level: {name}")))
}

type Roots<'a> = (Option<&'a PathBuf>, Option<&'a PathBuf>, Option<&'a PathBuf>);

/// Resolve one side from `(validators, secrets, combined root)` candidates
/// in priority order.
fn layout(side: &str, candidates: [Roots<'_>; 2]) -> Result<Layout> {
    let validators = candidates.iter().find_map(|(val, _, root)| {
        val.cloned()
            .or_else(|| root.map(|root| root.join(DistPath::ValidatorsDir)))
    });
    let secrets = candidates.iter().find_map(|(_, sec, root)| {
        sec.cloned()
            .or_else(|| root.map(|root| root.join(DistPath::SecretsDir)))
    });

    match (validators, secrets) {
        (Some(validators), Some(secrets)) => Ok(Layout::new(validators, secrets)),
        _ => Err(vdist_core::Error::MissingPath {
            what: format!("the --{side}-sec and --{side}-val (or --{side}) parameters are required"),
        }
        .into()),
    }
}

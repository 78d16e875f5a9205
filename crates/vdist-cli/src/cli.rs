//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use vdist_core::DiffMode;

const EXAMPLE: &str = "\
Example:
  dist-validators -i ~/secrets -I ~/validators -o /node/secrets -O /node/validators -s 0 -e 10";

/// Deploy a range of validators and their secrets into a node data directory
#[derive(Parser, Debug)]
#[command(name = "dist-validators")]
#[command(author, version, about, long_about = None, after_help = EXAMPLE)]
pub struct Cli {
    /// Source root containing validators/ and secrets/
    #[arg(long, conflicts_with_all = ["input_val", "input_sec"])]
    pub input: Option<PathBuf>,

    /// Path that contains all secrets
    #[arg(short = 'i', long)]
    pub input_sec: Option<PathBuf>,

    /// Path that contains all validators
    #[arg(short = 'I', long)]
    pub input_val: Option<PathBuf>,

    /// Destination root for validators/ and secrets/
    #[arg(long, conflicts_with_all = ["output_val", "output_sec"])]
    pub output: Option<PathBuf>,

    /// Destination path for secrets
    #[arg(short = 'o', long)]
    pub output_sec: Option<PathBuf>,

    /// Destination path for validators
    #[arg(short = 'O', long)]
    pub output_val: Option<PathBuf>,

    /// Starting index of validators/secrets to copy; negative counts from the end
    #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
    pub start: isize,

    /// Ending index (exclusive) of validators/secrets to copy; negative counts from the end
    #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
    pub end: isize,

    /// User that should own the created files [default: nimbus]
    #[arg(short, long)]
    pub user: Option<String>,

    /// Do not restrict permissions of created paths
    #[arg(long)]
    pub no_harden: bool,

    /// Print number of deployed validators to stdout
    #[arg(short, long)]
    pub print_count: bool,

    /// Print the full report as JSON to stdout
    #[arg(long, conflicts_with = "print_count")]
    pub json: bool,

    /// Update layout even if no changes are detected
    #[arg(short, long)]
    pub force: bool,

    /// Purge all validators if none are selected
    #[arg(short = 'P', long)]
    pub purge: bool,

    /// Only print what would be copied or removed
    #[arg(short, long)]
    pub dry_run: bool,

    /// Which differences count as changes [default: symmetric]
    #[arg(long, value_enum)]
    pub diff_mode: Option<DiffModeArg>,

    /// Logging level: trace, debug, info, warn(ing) or error/critical [default: info]
    #[arg(short, long, env = "DIST_VALIDATORS_LOG")]
    pub log_level: Option<String>,

    /// Settings file (TOML or JSON) providing defaults for paths and policy
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Diff mode as accepted on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffModeArg {
    /// Remove deployed entries that are not selected
    Symmetric,
    /// Only add missing entries, keep everything already deployed
    #[value(alias = "additive-only")]
    Additive,
}

impl From<DiffModeArg> for DiffMode {
    fn from(arg: DiffModeArg) -> Self {
        match arg {
            DiffModeArg::Symmetric => DiffMode::Symmetric,
            DiffModeArg::Additive => DiffMode::Additive,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_legacy_short_flags() {
        let cli = Cli::try_parse_from([
            "dist-validators",
            "-i", "/s/secrets",
            "-I", "/s/validators",
            "-o", "/n/secrets",
            "-O", "/n/validators",
            "-s", "2",
            "-e", "7",
            "-u", "beacon",
            "-p", "-f", "-P", "-d",
            "-l", "debug",
        ])
        .unwrap();

        assert_eq!(cli.input_sec, Some(PathBuf::from("/s/secrets")));
        assert_eq!(cli.output_val, Some(PathBuf::from("/n/validators")));
        assert_eq!((cli.start, cli.end), (2, 7));
        assert_eq!(cli.user.as_deref(), Some("beacon"));
        assert!(cli.print_count && cli.force && cli.purge && cli.dry_run);
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn combined_root_conflicts_with_split_roots() {
        let result = Cli::try_parse_from(["dist-validators", "--input", "/s", "-I", "/v"]);
        assert!(result.is_err());
    }

    #[test]
    fn json_conflicts_with_print_count() {
        let result = Cli::try_parse_from(["dist-validators", "--json", "-p"]);
        assert!(result.is_err());
    }

    #[test]
    fn diff_mode_alias() {
        let cli = Cli::try_parse_from(["dist-validators", "--diff-mode", "additive-only"]).unwrap();
        assert_eq!(cli.diff_mode, Some(DiffModeArg::Additive));
    }

    #[test]
    fn negative_bounds_are_accepted() {
        let cli = Cli::try_parse_from(["dist-validators", "-s", "-3", "-e", "-1"]).unwrap();
        assert_eq!((cli.start, cli.end), (-3, -1));
    }
}

//! Validator distribution CLI
//!
//! Deploys a contiguous range of validators and their secrets from a
//! staging tree into a node data directory.

mod cli;
mod distribute;
mod error;
mod settings;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::Cli;
use distribute::Output;
use error::Result;
use settings::Settings;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load(cli.config.as_deref())?;
    let resolved = settings::resolve(&cli, &settings)?;
    init_tracing(resolved.log_level);

    let output = if cli.json {
        Output::Json
    } else if cli.print_count {
        Output::Count
    } else {
        Output::Human
    };

    let report = distribute::run_distribute(&resolved.config)?;
    println!("{}", distribute::render(&report, output)?);
    Ok(())
}

/// Install the process-wide subscriber. Logs go to stderr so stdout stays
/// parseable for orchestration tooling.
fn init_tracing(level: Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
    tracing::debug!(%level, "Logging initialised");
}

#[cfg(test)]
mod tests {
    use super::*;
    use vdist_test_utils::Staging;

    fn resolve(args: &[&str]) -> settings::Resolved {
        let mut full = vec!["dist-validators"];
        full.extend_from_slice(args);
        let cli = Cli::try_parse_from(full).unwrap();
        settings::resolve(&cli, &Settings::default()).unwrap()
    }

    #[test]
    fn test_distribute_with_temp_staging() {
        let staging = Staging::with_pairs(3);
        let input = staging.source();
        let output = staging.node();
        let resolved = resolve(&[
            "--input",
            input.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
            "-e",
            "2",
        ]);

        let report = distribute::run_distribute(&resolved.config).unwrap();

        assert_eq!(report.deployed, 2);
        staging.assert_deployed(&["0x00000000", "0x00000001"]);
    }

    #[test]
    fn test_cli_error_user() {
        let error = crate::error::CliError::user("test error");
        assert_eq!(format!("{}", error), "test error");
    }
}

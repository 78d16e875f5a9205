//! Distribution command implementation

use colored::Colorize;
use vdist_core::{Outcome, ReconcileConfig, ReconcileReport, Reconciler};
use vdist_fs::default_hardener;

use crate::error::Result;

/// How the result is written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    /// Colored summary for people
    Human,
    /// Only the number of deployed validators
    Count,
    /// The full report as JSON
    Json,
}

/// Run one reconciliation with the platform permission hardener.
pub fn run_distribute(config: &ReconcileConfig) -> Result<ReconcileReport> {
    let hardener = default_hardener();
    let report = Reconciler::new(hardener.as_ref()).reconcile(config)?;
    Ok(report)
}

/// Render `report` for stdout.
pub fn render(report: &ReconcileReport, output: Output) -> Result<String> {
    match output {
        Output::Count => Ok(report.deployed.to_string()),
        Output::Json => Ok(serde_json::to_string_pretty(report)?),
        Output::Human => Ok(summary(report)),
    }
}

fn summary(report: &ReconcileReport) -> String {
    let mut lines = Vec::new();
    match report.outcome {
        Outcome::NothingToDo => {
            lines.push(format!(
                "{} Validator layout already matches range {}. Nothing to do.",
                "OK".green().bold(),
                report.range
            ));
            return lines.join("\n");
        }
        Outcome::DryRun => lines.push(format!(
            "{} Dry run for range {}, nothing was changed:",
            "DRY-RUN".yellow().bold(),
            report.range
        )),
        Outcome::Applied => lines.push(format!(
            "{} Deployed {} validators for range {}:",
            "OK".green().bold(),
            report.deployed,
            report.range
        )),
    }

    let changes = &report.changes;
    for (label, diff) in [("validator", &changes.validators), ("secret", &changes.secrets)] {
        for name in &diff.to_remove {
            lines.push(format!("   {} {} {}", "-".red(), label.dimmed(), name));
        }
        for name in &diff.to_add {
            lines.push(format!("   {} {} {}", "+".green(), label.dimmed(), name.cyan()));
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use vdist_core::{DiffMode, DiffResult, KindDiff, SelectionRange};

    fn report(outcome: Outcome, deployed: usize) -> ReconcileReport {
        let names = vec!["0xaa".to_string(), "0xbb".to_string()];
        let kind = KindDiff {
            to_add: names,
            to_remove: vec!["0x01".to_string()],
            unchanged: Vec::new(),
        };
        ReconcileReport {
            outcome,
            range: SelectionRange::new(0, 2),
            diff_mode: DiffMode::Symmetric,
            selected: 2,
            changes: DiffResult {
                validators: kind.clone(),
                secrets: kind,
            },
            deployed,
        }
    }

    #[test]
    fn count_output_is_the_bare_number() {
        assert_eq!(render(&report(Outcome::Applied, 2), Output::Count).unwrap(), "2");
        assert_eq!(render(&report(Outcome::DryRun, 0), Output::Count).unwrap(), "0");
    }

    #[test]
    fn json_output_parses_back() {
        let text = render(&report(Outcome::DryRun, 0), Output::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["outcome"], "dry_run");
        assert_eq!(value["changes"]["secrets"]["to_remove"][0], "0x01");
    }

    #[test]
    fn human_output_lists_changes() {
        colored::control::set_override(false);
        let text = render(&report(Outcome::Applied, 2), Output::Human).unwrap();
        assert!(text.starts_with("OK Deployed 2 validators for range 0..2:"));
        assert!(text.contains("+ validator 0xaa"));
        assert!(text.contains("- secret 0x01"));
    }
}

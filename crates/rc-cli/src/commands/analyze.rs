//! Analyze command: run the rule pass over one scenario and drive log.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use rc_core::{Report, Scenario, detect, parse_log};
use rc_db::Store;

/// Runs the analyze command.
///
/// Loads the scenario, parses the log, detects violations, and writes the
/// report JSON to `output` (or to `writer` with `json_to_stdout`). When a
/// store is given, the ruleset, scenario, and violations are persisted.
/// Any failure aborts before the report file is written.
pub fn run<W: Write>(
    writer: &mut W,
    scenario_path: &Path,
    logfile_path: &Path,
    store: Option<(Store, PathBuf)>,
    output: &Path,
    json_to_stdout: bool,
) -> Result<()> {
    let scenario = Scenario::load(scenario_path)
        .with_context(|| format!("failed to load scenario {}", scenario_path.display()))?;
    let log_text = std::fs::read_to_string(logfile_path)
        .with_context(|| format!("failed to read log {}", logfile_path.display()))?;
    let events = parse_log(&log_text)
        .with_context(|| format!("failed to parse log {}", logfile_path.display()))?;

    let violations = detect(&scenario.road_rules, &events)?;
    let report = Report::build(Some(&scenario), violations);
    let report_json = serde_json::to_string_pretty(&report)?;

    if json_to_stdout {
        writeln!(writer, "{report_json}")?;
    } else {
        std::fs::write(output, format!("{report_json}\n"))
            .with_context(|| format!("failed to write report {}", output.display()))?;
        writeln!(writer, "Report written to {}", output.display())?;
    }

    if let Some((mut store, db_path)) = store {
        let ruleset_id = store.upsert_ruleset(&scenario.road_rules)?;
        let scenario_id = store.register_scenario(
            &scenario,
            &scenario_path.display().to_string(),
            ruleset_id,
        )?;
        let saved = store.save_violations(scenario_id, &report.violations)?;
        tracing::debug!(scenario_id, ruleset_id, saved, "persisted analysis");
        writeln!(
            writer,
            "Saved scenario {scenario_id} and {saved} violations to {}",
            db_path.display()
        )?;
    }

    Ok(())
}

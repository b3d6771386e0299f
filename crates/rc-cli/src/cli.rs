//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rc_core::ViolationKind;

/// Drive log violation analyzer.
///
/// Applies a scenario's road rules to a recorded drive log, reports the
/// violations, and optionally persists them for later querying.
#[derive(Debug, Parser)]
#[command(name = "roadcheck", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Analyze a drive log against a scenario and write a report.
    Analyze {
        /// Path to the scenario JSON.
        scenario: PathBuf,

        /// Path to the drive log.
        logfile: PathBuf,

        /// Persist the scenario and its violations to this database.
        #[arg(long)]
        db: Option<PathBuf>,

        /// Where to write the report JSON.
        #[arg(short, long, default_value = "report.json")]
        output: PathBuf,

        /// Print the report to stdout instead of writing a file.
        #[arg(long)]
        json: bool,
    },

    /// Show the most recent violations across all scenarios.
    Summary {
        /// How many violations to show.
        #[arg(default_value_t = 20)]
        limit: usize,

        /// Database to query (defaults to the configured path).
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// List violations of one type for a scenario.
    Violations {
        /// Scenario ID as stored in the database.
        scenario_id: i64,

        /// Violation type (e.g. SPEEDING).
        kind: ViolationKind,

        /// Database to query (defaults to the configured path).
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// Show violation counts by type for a scenario.
    Counts {
        /// Scenario ID as stored in the database.
        scenario_id: i64,

        /// Database to query (defaults to the configured path).
        #[arg(long)]
        db: Option<PathBuf>,
    },
}

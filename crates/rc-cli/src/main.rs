use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use rc_cli::commands::{analyze, counts, summary, violations};
use rc_cli::{Cli, Commands, Config};

/// Resolve the database path (explicit `--db` or configured default) and open
/// the store, ensuring the parent directory exists.
fn open_store(config_path: Option<&Path>, db: Option<&Path>) -> Result<(rc_db::Store, PathBuf)> {
    let database_path = match db {
        Some(path) => path.to_path_buf(),
        None => {
            let config = Config::load_from(config_path).context("failed to load configuration")?;
            tracing::debug!(?config, "loaded configuration");
            config.database_path
        }
    };

    if let Some(parent) = database_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).context("failed to create database directory")?;
        }
    }

    let store = rc_db::Store::open(&database_path).context("failed to open database")?;
    Ok((store, database_path))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let mut stdout = std::io::stdout();

    match &cli.command {
        Some(Commands::Analyze {
            scenario,
            logfile,
            db,
            output,
            json,
        }) => {
            // Persistence stays opt-in: no --db, no store.
            let store = match db {
                Some(path) => Some(open_store(cli.config.as_deref(), Some(path))?),
                None => None,
            };
            analyze::run(&mut stdout, scenario, logfile, store, output, *json)?;
        }
        Some(Commands::Summary { limit, db }) => {
            let (store, _path) = open_store(cli.config.as_deref(), db.as_deref())?;
            summary::run(&mut stdout, &store, *limit)?;
        }
        Some(Commands::Violations {
            scenario_id,
            kind,
            db,
        }) => {
            let (store, _path) = open_store(cli.config.as_deref(), db.as_deref())?;
            violations::run(&mut stdout, &store, *scenario_id, *kind)?;
        }
        Some(Commands::Counts { scenario_id, db }) => {
            let (store, _path) = open_store(cli.config.as_deref(), db.as_deref())?;
            counts::run(&mut stdout, &store, *scenario_id)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}

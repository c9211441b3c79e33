//! Spell points developer binary.
//!
//! Drives [`SpellPointsRuntime`] from the command line against RON character
//! fixtures, with settings kept in a JSON file store.
//!
//! # Examples
//!
//! ```bash
//! spellpoints settings enable true
//! spellpoints settings preset AM_CUSTOM
//! spellpoints cast --character crates/client/fixtures/wizard.ron --tier spell3
//! spellpoints recalc --character crates/client/fixtures/wizard.ron --class class-wizard --levels 6
//! spellpoints cost --character crates/client/fixtures/wizard.ron --spell-level 1
//! ```

mod commands;
mod console;
mod fixture;
mod logging;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use commands::{Cast, Cost, Recalc, SettingsCommand};
use console::ConsoleSink;
use spellpoints_runtime::{FileSettingsStore, RuntimeConfig, SpellPointsRuntime};

/// Spell point rules for D&D 5e characters
#[derive(Parser)]
#[command(name = "spellpoints")]
#[command(about = "Inspect spell point settings and simulate casts", long_about = None)]
#[command(version)]
struct Cli {
    /// Settings file (overrides SPELLPOINTS_SETTINGS_PATH)
    #[arg(long, global = true, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Also write logs to this directory (overrides SPELLPOINTS_LOG_DIR)
    #[arg(long, global = true, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Inspect or edit module settings
    #[command(subcommand)]
    Settings(SettingsCommand),

    /// Simulate casting from a slot tier
    Cast(Cast),

    /// Simulate a class change and the maximum refresh
    Recalc(Recalc),

    /// Show point costs and the computed maximum
    Cost(Cost),
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut config = RuntimeConfig::from_env();
    if let Some(path) = cli.settings {
        config.settings_path = path;
    }
    if let Some(dir) = cli.log_dir {
        config.log_dir = Some(dir);
    }

    let _guard = logging::setup_logging(config.log_dir.as_deref())?;
    tracing::debug!(settings = %config.settings_path.display(), "Opening settings store");

    let store = FileSettingsStore::open(&config.settings_path)?;
    let runtime = SpellPointsRuntime::builder()
        .store(Arc::new(store))
        .sink(Arc::new(ConsoleSink))
        .build()?;

    match cli.command {
        Command::Settings(cmd) => cmd.execute(&runtime),
        Command::Cast(cmd) => cmd.execute(&runtime),
        Command::Recalc(cmd) => cmd.execute(&runtime),
        Command::Cost(cmd) => cmd.execute(&runtime),
    }
}

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use launchsense_core::{Config, RoutineContext};

mod commands;
mod input;
mod logging;

#[derive(Parser)]
#[command(name = "launchsense", version, about = "Launchsense CLI")]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a UI state from a prediction batch
    Generate {
        /// Routine (morning, afternoon, evening, weekend, custom)
        #[arg(long)]
        routine: RoutineContext,
        /// JSON file with an array of predictions
        #[arg(long)]
        predictions: PathBuf,
        /// JSON file with an array of apps
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Analyze a prediction batch against a routine
    Analyze {
        #[arg(long)]
        routine: RoutineContext,
        #[arg(long)]
        predictions: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Replay timed batches through the incremental updater
    Replay {
        /// Routine for steps that don't name one
        #[arg(long)]
        routine: RoutineContext,
        /// JSON file with an array of {offset_ms, routine?, predictions}
        #[arg(long)]
        batches: PathBuf,
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Print emissions as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print shell completions
    Completions {
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = Config::load_or_default();
    logging::init(&config.logging.filter);

    let result = match cli.command {
        Commands::Generate {
            routine,
            predictions,
            catalog,
            json,
        } => commands::generate::run(&config, routine, &predictions, catalog.as_deref(), json),
        Commands::Analyze {
            routine,
            predictions,
            json,
        } => commands::analyze::run(&config, routine, &predictions, json),
        Commands::Replay {
            routine,
            batches,
            catalog,
            json,
        } => commands::replay::run(&config, routine, &batches, catalog.as_deref(), json),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => commands::completions::run(shell),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

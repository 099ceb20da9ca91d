//! Scorebook CLI
//!
//! Command-line interface for the snapshot sync engine

use clap::{Parser, Subcommand};
use scorebook_core::logging_facility::{init, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "scorebook")]
#[command(about = "Scorebook - snapshot sync and score storage", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: commands::GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    Migrate,
    /// Sync a snapshot document for a user
    Sync(commands::sync::SyncArgs),
    /// Print the last synced snapshot of a user
    Load(commands::sync::LoadArgs),
    /// Score operations
    Scores(commands::scores::ScoresArgs),
    /// Print the effective configuration as TOML
    Config,
}

fn main() {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init(Profile::for_cli(cli.global.json_logs));

    let result = match cli.command {
        Commands::Migrate => commands::migrate::execute(&cli.global),
        Commands::Sync(args) => commands::sync::execute_sync(&cli.global, args),
        Commands::Load(args) => commands::sync::execute_load(&cli.global, args),
        Commands::Scores(args) => commands::scores::execute(&cli.global, args),
        Commands::Config => commands::config::execute(&cli.global),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

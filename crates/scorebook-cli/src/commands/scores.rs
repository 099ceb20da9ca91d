//! Score listing and deletion commands

use super::{print_json, CliResult, GlobalArgs};
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct ScoresArgs {
    #[command(subcommand)]
    pub command: ScoresCommand,
}

#[derive(Debug, Subcommand)]
pub enum ScoresCommand {
    /// List a user's scores
    List {
        #[arg(long)]
        user: i64,
    },
    /// Delete one score and its images
    Delete {
        #[arg(long)]
        user: i64,
        #[arg(long)]
        id: i64,
    },
}

pub fn execute(global: &GlobalArgs, args: ScoresArgs) -> CliResult {
    let engine = global.engine()?;
    let mut conn = engine.connect()?;

    match args.command {
        ScoresCommand::List { user } => print_json(&engine.list_scores(&conn, user)?),
        ScoresCommand::Delete { user, id } => {
            let report = engine.delete_score(&mut conn, user, id)?;
            println!("Deleted score {}", id);
            println!("  images removed: {}", report.removed.len());
            if !report.failed.is_empty() {
                println!("  images left behind: {}", report.failed.join(", "));
            }
            Ok(())
        }
    }
}

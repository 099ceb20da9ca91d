//! Schema migration command

use super::{CliResult, GlobalArgs};
use scorebook_store::migrations::applied_migrations;

pub fn execute(global: &GlobalArgs) -> CliResult {
    let engine = global.engine()?;
    let conn = engine.connect()?;
    let applied = applied_migrations(&conn)?;

    println!("Database ready: {}", engine.config().database_path.display());
    for id in applied {
        println!("  applied: {}", id);
    }
    Ok(())
}

//! Effective configuration dump

use super::{CliResult, GlobalArgs};

pub fn execute(global: &GlobalArgs) -> CliResult {
    let config = global.load_config()?;
    print!("{}", toml::to_string(&config)?);
    Ok(())
}

//! Snapshot sync and load commands

use super::{print_json, CliResult, GlobalArgs};
use clap::Args;
use scorebook_engine::{UploadedPart, UploadedParts};
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct SyncArgs {
    #[arg(long)]
    pub user: i64,

    /// Snapshot document (JSON); `-` reads stdin
    #[arg(long)]
    pub input: PathBuf,

    /// Binary part referenced by a page `fileKey`, as KEY=PATH
    #[arg(long = "part", value_parser = parse_part)]
    pub parts: Vec<(String, PathBuf)>,
}

#[derive(Debug, Args)]
pub struct LoadArgs {
    #[arg(long)]
    pub user: i64,
}

fn parse_part(raw: &str) -> Result<(String, PathBuf), String> {
    match raw.split_once('=') {
        Some((key, path)) if !key.is_empty() && !path.is_empty() => {
            Ok((key.to_string(), PathBuf::from(path)))
        }
        _ => Err(format!("expected KEY=PATH, got '{}'", raw)),
    }
}

fn read_input(path: &Path) -> std::io::Result<String> {
    if path == Path::new("-") {
        std::io::read_to_string(std::io::stdin())
    } else {
        std::fs::read_to_string(path)
    }
}

fn read_parts(parts: Vec<(String, PathBuf)>) -> std::io::Result<UploadedParts> {
    let mut uploaded = UploadedParts::new();
    for (key, path) in parts {
        let bytes = std::fs::read(&path)?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        uploaded.insert(
            key,
            UploadedPart {
                bytes,
                filename,
                mime_type: None,
            },
        );
    }
    Ok(uploaded)
}

pub fn execute_sync(global: &GlobalArgs, args: SyncArgs) -> CliResult {
    let raw: serde_json::Value = serde_json::from_str(&read_input(&args.input)?)?;
    let parts = read_parts(args.parts)?;

    let engine = global.engine()?;
    let mut conn = engine.connect()?;
    let outcome = engine.sync_snapshot(&mut conn, args.user, &raw, &parts)?;

    print_json(&outcome)
}

pub fn execute_load(global: &GlobalArgs, args: LoadArgs) -> CliResult {
    let engine = global.engine()?;
    let conn = engine.connect()?;

    match engine.load_snapshot(&conn, args.user)? {
        Some(record) => print_json(&record),
        None => Err(format!("No snapshot stored for user {}", args.user).into()),
    }
}

//! Persisted row shapes

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::collections::BTreeSet;

/// A row of the `scores` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub composer: String,
    pub description: String,
    /// Serialized config object; its `pages` array holds `PersistedPage`s
    pub config_json: String,
    /// Cover pointer; empty when the score has no image
    pub image_filename: String,
    pub created_at: String,
    pub updated_at: String,
}

impl ScoreRecord {
    /// Parse `config_json`, treating anything but a JSON object as empty
    pub fn config_object(&self) -> Map<String, Value> {
        match serde_json::from_str::<Value>(&self.config_json) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    /// Non-empty `filename`s of the object entries in `config.pages`
    pub fn page_filenames(&self) -> Vec<String> {
        page_filenames(&self.config_object())
    }

    /// Every blob this row references: the cover pointer plus all page files
    pub fn file_set(&self) -> BTreeSet<String> {
        let mut files: BTreeSet<String> = self.page_filenames().into_iter().collect();
        if !self.image_filename.is_empty() {
            files.insert(self.image_filename.clone());
        }
        files
    }
}

/// Filenames referenced from the `pages` array of a score config
pub fn page_filenames(config: &Map<String, Value>) -> Vec<String> {
    config
        .get("pages")
        .and_then(Value::as_array)
        .map(|pages| {
            pages
                .iter()
                .filter_map(|page| page.get("filename").and_then(Value::as_str))
                .filter(|name| !name.trim().is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// One page entry inside a stored score config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedPage {
    pub filename: String,
    pub order: Number,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<Number>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A row of the `snapshots` table
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotRow {
    pub id: i64,
    pub user_id: i64,
    /// Serialized normalized snapshot document
    pub snapshot: String,
    pub exported_at: String,
    pub saved_at: String,
}

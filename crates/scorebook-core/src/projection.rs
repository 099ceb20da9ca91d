//! Public view of persisted scores
//!
//! The engine stores filenames only; this module turns them into the
//! addresses clients fetch images from (`<route>/<percent-encoded name>`).

use serde::Serialize;
use serde_json::{Map, Number, Value};

use crate::model::ScoreRecord;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView {
    pub filename: String,
    pub image_url: String,
    pub order: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreView {
    pub id: i64,
    pub title: String,
    pub composer: String,
    pub description: String,
    pub config: Map<String, Value>,
    pub pages: Vec<PageView>,
    pub image_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Public address of a stored blob
pub fn image_url(route: &str, filename: &str) -> String {
    format!("{}/{}", route, urlencoding::encode(filename))
}

/// Project one persisted row
///
/// Page entries without a usable `filename` are skipped; a page without a
/// numeric `order` gets its position among the remaining pages.
pub fn project_score(record: &ScoreRecord, route: &str) -> ScoreView {
    let config = record.config_object();

    let pages: Vec<PageView> = config
        .get("pages")
        .and_then(Value::as_array)
        .map(|pages| {
            pages
                .iter()
                .filter_map(Value::as_object)
                .filter_map(|page| {
                    let filename = page.get("filename")?.as_str()?;
                    (!filename.trim().is_empty()).then(|| (filename.to_string(), page))
                })
                .enumerate()
                .map(|(index, (filename, page))| project_page(route, filename, page, index))
                .collect()
        })
        .unwrap_or_default();

    ScoreView {
        id: record.id,
        title: record.title.clone(),
        composer: record.composer.clone(),
        description: record.description.clone(),
        config,
        pages,
        image_url: (!record.image_filename.is_empty())
            .then(|| image_url(route, &record.image_filename)),
        created_at: record.created_at.clone(),
        updated_at: record.updated_at.clone(),
    }
}

fn project_page(
    route: &str,
    filename: String,
    page: &Map<String, Value>,
    index: usize,
) -> PageView {
    let order = match page.get("order") {
        Some(Value::Number(n)) => Value::Number(n.clone()),
        _ => Value::Number(Number::from(index as u64)),
    };
    let extra = page
        .iter()
        .filter(|(key, _)| !matches!(key.as_str(), "filename" | "imageUrl" | "order"))
        .map(|(key, val)| (key.clone(), val.clone()))
        .collect();

    PageView {
        image_url: image_url(route, &filename),
        filename,
        order,
        extra,
    }
}

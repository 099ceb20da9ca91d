use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use super::study::{ApiConfig, PdfAttachment, VocabPage};

/// Marker carried in the `format` field of every snapshot document
pub const SNAPSHOT_FORMAT: &str = "jp_vocab_app_backup";

/// The only encoding accepted for inline image and PDF data
pub const IMAGE_ENCODING: &str = "base64";

/// Canonical snapshot document, as produced by the sanitizer
///
/// `scores` distinguishes "leave the score collection alone" (`None`) from
/// "the collection is now empty" (`Some(vec![])`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub format: String,
    pub version: Number,
    pub exported_at: String,
    pub pages: Vec<VocabPage>,
    pub api_config: ApiConfig,
    pub exam_history: Map<String, Value>,
    pub pdf: Option<PdfAttachment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scores: Option<Vec<ScoreSnapshot>>,
}

impl Snapshot {
    /// Serialize to the JSON value that gets persisted and re-sanitized on load
    pub fn to_value(&self) -> crate::errors::Result<Value> {
        serde_json::to_value(self).map_err(|e| crate::errors::ScorebookError::Serialization {
            message: e.to_string(),
        })
    }
}

/// One scored document inside a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    pub composer: String,
    pub description: String,
    pub config: Map<String, Value>,
    pub pages: Vec<ScorePageSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_index: Option<usize>,
}

impl ScoreSnapshot {
    /// Index of the cover page, clamped into the page list
    pub fn resolved_cover_index(&self) -> usize {
        let last = self.pages.len().saturating_sub(1);
        self.cover_index.unwrap_or(0).min(last)
    }
}

/// One page of a score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorePageSnapshot {
    pub order: Number,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<bool>,
    pub image: EncodedImageSection,
    /// Fields this version does not understand, kept for forward compatibility
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub meta: Map<String, Value>,
}

/// Reference to the bytes of one page image
///
/// Either inline base64 `data`, or a `file_key` naming a binary part that
/// arrived alongside the document. When `file_key` is set, `data` is empty.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedImageSection {
    pub encoding: String,
    pub data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_key: Option<String>,
}

/// Which form of an image section is honored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource<'a> {
    Upload(&'a str),
    Inline(&'a str),
}

impl EncodedImageSection {
    /// Inline base64 section
    pub fn inline(data: impl Into<String>) -> Self {
        Self {
            encoding: IMAGE_ENCODING.to_string(),
            data: data.into(),
            mime_type: None,
            filename: None,
            file_key: None,
        }
    }

    /// Section pointing at an uploaded binary part
    pub fn upload(file_key: impl Into<String>) -> Self {
        Self {
            encoding: IMAGE_ENCODING.to_string(),
            data: String::new(),
            mime_type: None,
            filename: None,
            file_key: Some(file_key.into()),
        }
    }

    pub fn source(&self) -> ImageSource<'_> {
        match self.file_key.as_deref() {
            Some(key) => ImageSource::Upload(key),
            None => ImageSource::Inline(&self.data),
        }
    }
}

// Page images run to megabytes; keep them out of debug output.
impl std::fmt::Debug for EncodedImageSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncodedImageSection")
            .field("encoding", &self.encoding)
            .field("data_len", &self.data.len())
            .field("mime_type", &self.mime_type)
            .field("filename", &self.filename)
            .field("file_key", &self.file_key)
            .finish()
    }
}

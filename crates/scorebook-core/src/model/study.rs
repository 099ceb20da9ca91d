//! Auxiliary study data carried alongside scores in a snapshot

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Tag given to vocabulary items that carry none
pub const DEFAULT_WORD_TAG: &str = "普通";

/// A numbered page of vocabulary items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabPage {
    pub page: Number,
    pub items: Vec<WordItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordItem {
    pub id: Number,
    pub jp: String,
    pub reading: String,
    pub pos: String,
    pub cn: String,
    pub tag: String,
    pub accent: Vec<String>,
}

/// Settings for the client's language-model backend
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Base64 PDF attached to the snapshot
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfAttachment {
    pub encoding: String,
    pub data: String,
}

impl std::fmt::Debug for PdfAttachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfAttachment")
            .field("encoding", &self.encoding)
            .field("data_len", &self.data.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_is_redacted_in_debug() {
        let config = ApiConfig {
            api_base: Some("https://llm.example".to_string()),
            model: None,
            api_key: Some("sk-live-123".to_string()),
        };
        let text = format!("{:?}", config);
        assert!(!text.contains("sk-live-123"));
        assert!(text.contains("<redacted>"));
        assert!(text.contains("llm.example"));
    }

    #[test]
    fn test_api_config_serializes_camel_case() {
        let config = ApiConfig {
            api_base: Some("b".to_string()),
            model: Some("m".to_string()),
            api_key: None,
        };
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value, serde_json::json!({"apiBase": "b", "model": "m"}));
    }
}

//! Sanitization of the auxiliary study data (vocabulary, settings, exams, PDF)

use serde_json::{Map, Number, Value};

use super::coerce;
use crate::model::study::DEFAULT_WORD_TAG;
use crate::model::{ApiConfig, PdfAttachment, VocabPage, WordItem, IMAGE_ENCODING};

pub fn sanitize_vocab_pages(value: Option<&Value>) -> Vec<VocabPage> {
    let Some(entries) = value.and_then(Value::as_array) else {
        return Vec::new();
    };
    entries.iter().filter_map(sanitize_vocab_page).collect()
}

fn sanitize_vocab_page(value: &Value) -> Option<VocabPage> {
    let raw = value.as_object()?;
    let page = coerce::number(raw.get("page")).filter(|p| *p > 0.0)?;
    let items: Vec<WordItem> = raw
        .get("items")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .enumerate()
                .filter_map(|(index, item)| sanitize_word_item(item, index))
                .collect()
        })
        .unwrap_or_default();
    Some(VocabPage {
        page: coerce::json_number(page)?,
        items,
    })
}

/// Sanitize one vocabulary item; `jp`, `pos` and `cn` are required
pub fn sanitize_word_item(value: &Value, index: usize) -> Option<WordItem> {
    let raw = value.as_object()?;
    let jp = coerce::non_blank(raw.get("jp"))?;
    let pos = coerce::non_blank(raw.get("pos"))?;
    let cn = coerce::non_blank(raw.get("cn"))?;

    let default_id = Number::from(index as u64 + 1);
    let id = coerce::number_value(raw.get("id")).unwrap_or(default_id);

    Some(WordItem {
        id,
        jp,
        reading: coerce::trimmed(raw.get("reading")),
        pos,
        cn,
        tag: coerce::non_blank(raw.get("tag")).unwrap_or_else(|| DEFAULT_WORD_TAG.to_string()),
        accent: normalize_accent(raw.get("accent")),
    })
}

/// Accent marks arrive as a list, a delimited string or a bare number
pub fn normalize_accent(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.trim().to_string(),
                other => other.to_string(),
            })
            .filter(|s| !s.is_empty())
            .collect(),
        Some(Value::String(s)) => s
            .split(|c: char| c == ',' || c == '，' || c == '/' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect(),
        Some(Value::Number(n)) => vec![n.to_string()],
        _ => Vec::new(),
    }
}

pub fn sanitize_api_config(value: Option<&Value>) -> ApiConfig {
    let Some(raw) = value.and_then(Value::as_object) else {
        return ApiConfig::default();
    };
    let string = |key: &str| raw.get(key).and_then(Value::as_str).map(str::to_string);
    ApiConfig {
        api_base: string("apiBase"),
        model: string("model"),
        api_key: string("apiKey"),
    }
}

pub fn sanitize_exam_history(value: Option<&Value>) -> Map<String, Value> {
    value.and_then(Value::as_object).cloned().unwrap_or_default()
}

pub fn sanitize_pdf(value: Option<&Value>) -> Option<PdfAttachment> {
    let raw = value?.as_object()?;
    if raw.get("encoding").and_then(Value::as_str) != Some(IMAGE_ENCODING) {
        return None;
    }
    let data = raw.get("data")?.as_str()?;
    Some(PdfAttachment {
        encoding: IMAGE_ENCODING.to_string(),
        data: data.to_string(),
    })
}

//! Per-score sanitization
//!
//! Permissive: entries that cannot be repaired are dropped rather than
//! failing the document.

use serde_json::{Map, Value};

use super::coerce;
use crate::model::{EncodedImageSection, ScorePageSnapshot, ScoreSnapshot, IMAGE_ENCODING};

/// Page fields with a dedicated slot; everything else lands in `meta`
pub const KNOWN_PAGE_FIELDS: [&str; 5] = ["order", "width", "height", "cover", "image"];

const META_FIELD: &str = "meta";

/// Sanitize every entry of a `scores` array, dropping unusable ones
pub fn sanitize_scores(entries: &[Value]) -> Vec<ScoreSnapshot> {
    entries.iter().filter_map(sanitize_score).collect()
}

/// Sanitize one score entry
///
/// Returns `None` for non-objects, blank titles, and scores left with no pages.
pub fn sanitize_score(value: &Value) -> Option<ScoreSnapshot> {
    let raw = value.as_object()?;
    let title = coerce::non_blank(raw.get("title"))?;

    let pages: Vec<ScorePageSnapshot> = raw
        .get("pages")
        .and_then(Value::as_array)
        .map(|pages| {
            pages
                .iter()
                .enumerate()
                .filter_map(|(index, page)| sanitize_page(page, index))
                .collect()
        })
        .unwrap_or_default();
    if pages.is_empty() {
        return None;
    }

    let cover_index = coerce::index(raw.get("coverIndex"));

    Some(ScoreSnapshot {
        id: coerce::integer(raw.get("id")),
        title,
        composer: coerce::trimmed(raw.get("composer")),
        description: raw
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        config: raw
            .get("config")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default(),
        pages,
        cover_index,
    })
}

/// Sanitize one page; `index` is its position in the incoming array
pub fn sanitize_page(value: &Value, index: usize) -> Option<ScorePageSnapshot> {
    let raw = value.as_object()?;
    let image = sanitize_image(raw.get("image")?)?;

    let order = coerce::number_value(raw.get("order")).unwrap_or_else(|| (index as u64).into());

    Some(ScorePageSnapshot {
        order,
        width: coerce::number_value(raw.get("width")),
        height: coerce::number_value(raw.get("height")),
        cover: raw.get("cover").and_then(Value::as_bool),
        image,
        meta: collect_meta(raw),
    })
}

// An incoming `meta` object is flattened so that a canonical page
// sanitizes to itself.
fn collect_meta(raw: &Map<String, Value>) -> Map<String, Value> {
    let mut meta = Map::new();
    let is_known = |key: &str| KNOWN_PAGE_FIELDS.contains(&key);

    match raw.get(META_FIELD) {
        Some(Value::Object(nested)) => {
            for (key, val) in nested {
                if !is_known(key) {
                    meta.insert(key.clone(), val.clone());
                }
            }
        }
        Some(other) => {
            meta.insert(META_FIELD.to_string(), other.clone());
        }
        None => {}
    }

    for (key, val) in raw {
        if key != META_FIELD && !is_known(key) {
            meta.insert(key.clone(), val.clone());
        }
    }
    meta
}

/// Sanitize an image section
///
/// A non-blank `fileKey` selects the uploaded-part form; otherwise the
/// section needs `encoding: "base64"` and non-blank `data`.
pub fn sanitize_image(value: &Value) -> Option<EncodedImageSection> {
    let raw = value.as_object()?;
    let mime_type = coerce::non_blank(raw.get("mimeType"));
    let filename = coerce::non_blank(raw.get("filename"));

    let mut section = match coerce::non_blank(raw.get("fileKey")) {
        Some(key) => EncodedImageSection::upload(key),
        None => {
            if raw.get("encoding").and_then(Value::as_str) != Some(IMAGE_ENCODING) {
                return None;
            }
            EncodedImageSection::inline(coerce::non_blank(raw.get("data"))?)
        }
    };
    section.mime_type = mime_type;
    section.filename = filename;
    Some(section)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ImageSource;
    use serde_json::json;

    fn inline_image() -> Value {
        json!({"encoding": "base64", "data": "AAAA"})
    }

    #[test]
    fn test_score_without_title_is_dropped() {
        let entry = json!({"title": "   ", "pages": [{"image": inline_image()}]});
        assert!(sanitize_score(&entry).is_none());
    }

    #[test]
    fn test_score_without_valid_pages_is_dropped() {
        let entry = json!({"title": "Waltz", "pages": [{"image": {"encoding": "hex", "data": "00"}}, 3]});
        assert!(sanitize_score(&entry).is_none());
    }

    #[test]
    fn test_score_fields_are_normalized() {
        let entry = json!({
            "id": "12",
            "title": "  Waltz ",
            "composer": " Chopin ",
            "description": "  keep spacing ",
            "config": {"tempo": 90},
            "coverIndex": "1",
            "pages": [{"image": inline_image()}, {"image": inline_image()}]
        });
        let score = sanitize_score(&entry).unwrap();
        assert_eq!(score.id, Some(12));
        assert_eq!(score.title, "Waltz");
        assert_eq!(score.composer, "Chopin");
        assert_eq!(score.description, "  keep spacing ");
        assert_eq!(score.config.get("tempo"), Some(&json!(90)));
        assert_eq!(score.cover_index, Some(1));
    }

    #[test]
    fn test_invalid_cover_index_and_id_become_absent() {
        for (id, cover) in [(json!(1.5), json!(-1)), (json!("x"), json!(-0.5)), (json!(null), json!("nope"))] {
            let entry = json!({"id": id, "title": "A", "coverIndex": cover, "pages": [{"image": inline_image()}]});
            let score = sanitize_score(&entry).unwrap();
            assert_eq!(score.id, None);
            assert_eq!(score.cover_index, None);
        }
    }

    #[test]
    fn test_cover_index_is_floored() {
        let entry = json!({"title": "A", "coverIndex": 0.5, "pages": [{"image": inline_image()}]});
        assert_eq!(sanitize_score(&entry).unwrap().cover_index, Some(0));
    }

    #[test]
    fn test_page_numeric_fields_fall_back() {
        let page = sanitize_page(
            &json!({"order": "abc", "width": "640", "height": null, "image": inline_image()}),
            4,
        )
        .unwrap();
        assert_eq!(page.order, serde_json::Number::from(4));
        assert_eq!(page.width, Some(serde_json::Number::from(640)));
        assert_eq!(page.height, None);
    }

    #[test]
    fn test_unknown_page_fields_go_to_meta() {
        let page = sanitize_page(
            &json!({"order": 1, "cover": true, "image": inline_image(), "rotation": 90, "meta": {"label": "A", "order": 5}}),
            0,
        )
        .unwrap();
        assert_eq!(page.cover, Some(true));
        assert_eq!(page.order, serde_json::Number::from(1));
        assert_eq!(page.meta.get("rotation"), Some(&json!(90)));
        assert_eq!(page.meta.get("label"), Some(&json!("A")));
        assert!(page.meta.get("order").is_none());
        assert!(page.meta.get("meta").is_none());
    }

    #[test]
    fn test_upload_section_wins_over_inline_data() {
        let section = sanitize_image(&json!({
            "fileKey": " page-1 ",
            "data": "ignored",
            "mimeType": " image/jpeg ",
            "filename": "scan.jpg"
        }))
        .unwrap();
        assert_eq!(section.source(), ImageSource::Upload("page-1"));
        assert_eq!(section.data, "");
        assert_eq!(section.mime_type.as_deref(), Some("image/jpeg"));
        assert_eq!(section.filename.as_deref(), Some("scan.jpg"));
    }

    #[test]
    fn test_inline_section_requires_base64_and_data() {
        assert!(sanitize_image(&json!({"encoding": "base64", "data": "  "})).is_none());
        assert!(sanitize_image(&json!({"data": "AAAA"})).is_none());
        assert!(sanitize_image(&json!("AAAA")).is_none());
        let section = sanitize_image(&json!({"encoding": "base64", "data": " AAAA\n"})).unwrap();
        assert_eq!(section.source(), ImageSource::Inline("AAAA"));
    }
}

//! Image materialization
//!
//! Turns one `EncodedImageSection` into one file in the blob store.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use scorebook_core::model::{EncodedImageSection, ImageSource};
use scorebook_core::{ExError, ScorebookError};
use scorebook_store::errors::Result;
use scorebook_store::FsBlobStore;
use std::collections::HashMap;
use std::path::Path;
use uuid::Uuid;

/// Standard alphabet, padding optional, stray trailing bits ignored
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// A binary part received next to the snapshot document
#[derive(Clone, Default, PartialEq, Eq)]
pub struct UploadedPart {
    pub bytes: Vec<u8>,
    /// Client-side name of the file
    pub filename: Option<String>,
    pub mime_type: Option<String>,
}

impl std::fmt::Debug for UploadedPart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadedPart")
            .field("len", &self.bytes.len())
            .field("filename", &self.filename)
            .field("mime_type", &self.mime_type)
            .finish()
    }
}

/// Uploaded parts keyed by the `fileKey` pages refer to them with
pub type UploadedParts = HashMap<String, UploadedPart>;

/// A freshly written page image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializedImage {
    pub filename: String,
    pub size: u64,
}

/// Resolve `image` to bytes and write them under a new unique name
///
/// An uploaded part is used when `file_key` names one; its filename and
/// MIME type fill in whatever the section left unset. Everything else is
/// decoded from `data`.
///
/// # Errors
///
/// - `InvalidImage` when there are no bytes or `data` is not base64
/// - `ImageTooLarge` when the bytes exceed `max_bytes`
/// - `Io` when the blob cannot be written
pub fn materialize(
    image: &EncodedImageSection,
    parts: &UploadedParts,
    blobs: &FsBlobStore,
    max_bytes: u64,
) -> Result<MaterializedImage> {
    let uploaded = match image.source() {
        ImageSource::Upload(key) => parts.get(key),
        ImageSource::Inline(_) => None,
    };

    let (bytes, filename, mime_type) = match uploaded {
        Some(part) => (
            part.bytes.clone(),
            image.filename.as_deref().or(part.filename.as_deref()),
            image.mime_type.as_deref().or(part.mime_type.as_deref()),
        ),
        None => (
            decode_base64(&image.data)?,
            image.filename.as_deref(),
            image.mime_type.as_deref(),
        ),
    };

    if bytes.is_empty() {
        return Err(ScorebookError::InvalidImage {
            reason: "no image bytes".to_string(),
        }
        .into());
    }
    let size = bytes.len() as u64;
    if size > max_bytes {
        return Err(ScorebookError::image_too_large(size, max_bytes).into());
    }

    let name = format!("{}{}", Uuid::new_v4(), choose_extension(filename, mime_type));
    blobs.write(&name, &bytes)?;

    Ok(MaterializedImage {
        filename: name,
        size,
    })
}

/// Decode inline data, accepting an optional `data:<mime>;base64,` prefix
fn decode_base64(data: &str) -> Result<Vec<u8>> {
    let trimmed = data.trim();
    let payload = match trimmed.split_once(',') {
        Some((prefix, rest)) if prefix.contains("base64") => rest,
        _ => trimmed,
    };
    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();

    LENIENT_BASE64.decode(compact.as_bytes()).map_err(|e| {
        ExError::from(ScorebookError::InvalidImage {
            reason: e.to_string(),
        })
    })
}

/// Extension of the stored file, dot included
///
/// The client filename wins when its extension is plain alphanumeric;
/// otherwise the MIME type decides, defaulting to `.png`.
pub fn choose_extension(filename: Option<&str>, mime_type: Option<&str>) -> String {
    let from_name = filename
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()));
    if let Some(ext) = from_name {
        return format!(".{}", ext);
    }

    let mime = mime_type.unwrap_or_default().to_ascii_lowercase();
    let ext = if mime.contains("jpeg") || mime.contains("jpg") {
        ".jpg"
    } else if mime.contains("webp") {
        ".webp"
    } else {
        ".png"
    };
    ext.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_from_filename() {
        assert_eq!(choose_extension(Some("scan.JPEG"), Some("image/png")), ".JPEG");
        assert_eq!(choose_extension(Some("page.webp"), None), ".webp");
    }

    #[test]
    fn test_extension_from_mime() {
        assert_eq!(choose_extension(None, Some("image/jpeg")), ".jpg");
        assert_eq!(choose_extension(Some("noext"), Some("image/webp")), ".webp");
        assert_eq!(choose_extension(Some("weird.p/g"), Some("image/png")), ".png");
        assert_eq!(choose_extension(None, Some("application/octet-stream")), ".png");
        assert_eq!(choose_extension(None, None), ".png");
    }

    #[test]
    fn test_decode_strips_data_url_prefix() {
        assert_eq!(decode_base64("data:image/png;base64,AQID").unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_decode_tolerates_whitespace_and_missing_padding() {
        assert_eq!(decode_base64(" AQ\nI ").unwrap(), vec![1, 2]);
        assert_eq!(decode_base64("AQI=").unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_base64("not base64!").is_err());
    }
}

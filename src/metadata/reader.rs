use anyhow::{Context, Result};
use image::ImageFormat;
use img_parts::Bytes;
use img_parts::png::{Png, PngChunk};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

use super::{DREAM_KEY, METADATA_KEY};

const TEXT_CHUNK: [u8; 4] = *b"tEXt";
const ITXT_CHUNK: [u8; 4] = *b"iTXt";

/// The embedded metadata recovered from a generated image.
///
/// Serializes to the on-disk field names, so a JSON dump of this struct
/// matches the shape of the embedded chunks:
/// `{"sd-metadata": {...}, "Dream": "..."}`.
#[derive(Debug, Clone, Serialize)]
pub struct RetrievedMetadata {
    /// The structured generation record, `{}` when absent.
    #[serde(rename = "sd-metadata")]
    pub sd_metadata: Value,
    /// The legacy human-readable prompt line, empty when absent.
    #[serde(rename = "Dream")]
    pub dream: String,
}

/// Read the embedded generation metadata of the image at `path`.
///
/// For PNG input the `sd-metadata` and `Dream` text chunks are extracted;
/// absent chunks fall back to `{}` and `""`. Other recognized image formats
/// have no text-chunk facility and yield the same defaults without erroring.
/// A present but malformed `sd-metadata` field is an error, as is a path
/// that cannot be read or holds no recognizable image.
pub fn retrieve_metadata(path: &Path) -> Result<RetrievedMetadata> {
    let bytes = fs::read(path)
        .with_context(|| format!("Failed to read image file {}", path.display()))?;

    let format = image::guess_format(&bytes)
        .with_context(|| format!("Unrecognized image format in {}", path.display()))?;
    if format != ImageFormat::Png {
        log::debug!(
            "{} is {format:?}, which carries no text chunks",
            path.display()
        );
        return Ok(RetrievedMetadata {
            sd_metadata: Value::Object(Default::default()),
            dream: String::new(),
        });
    }

    let png = Png::from_bytes(Bytes::from(bytes))
        .map_err(|e| anyhow::anyhow!("Failed to parse PNG {}: {e}", path.display()))?;

    let mut metadata_text: Option<String> = None;
    let mut dream = String::new();
    for chunk in png.chunks() {
        let Some((keyword, text)) = chunk_text(chunk) else {
            continue;
        };
        match keyword.as_str() {
            METADATA_KEY => metadata_text = Some(text),
            DREAM_KEY => dream = text,
            _ => {}
        }
    }

    let metadata_text = metadata_text.unwrap_or_else(|| "{}".to_string());
    let sd_metadata = serde_json::from_str(&metadata_text).with_context(|| {
        format!("Malformed {METADATA_KEY} field in {}", path.display())
    })?;

    Ok(RetrievedMetadata { sd_metadata, dream })
}

/// Decode a `tEXt` or uncompressed `iTXt` chunk into (keyword, text).
fn chunk_text(chunk: &PngChunk) -> Option<(String, String)> {
    let contents = chunk.contents();
    match chunk.kind() {
        TEXT_CHUNK => {
            let nul = contents.iter().position(|&b| b == 0)?;
            let keyword = String::from_utf8_lossy(&contents[..nul]).into_owned();
            let text = String::from_utf8_lossy(&contents[nul + 1..]).into_owned();
            Some((keyword, text))
        }
        ITXT_CHUNK => {
            // keyword\0 compression-flag compression-method language\0 translated\0 text
            let nul = contents.iter().position(|&b| b == 0)?;
            let keyword = String::from_utf8_lossy(&contents[..nul]).into_owned();
            let rest = contents.get(nul + 1..)?;
            let (&flag, rest) = rest.split_first()?;
            if flag != 0 {
                // Compressed iTXt is never written by this crate.
                return None;
            }
            let (_, rest) = rest.split_first()?;
            let lang_end = rest.iter().position(|&b| b == 0)?;
            let rest = rest.get(lang_end + 1..)?;
            let translated_end = rest.iter().position(|&b| b == 0)?;
            let text = String::from_utf8_lossy(rest.get(translated_end + 1..)?).into_owned();
            Some((keyword, text))
        }
        _ => None,
    }
}

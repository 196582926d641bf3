use anyhow::{Context, Result};
use image::DynamicImage;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use img_parts::Bytes;
use img_parts::png::{Png, PngChunk};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use super::{DREAM_KEY, METADATA_KEY};

const TEXT_CHUNK: [u8; 4] = *b"tEXt";
const IEND_CHUNK: [u8; 4] = *b"IEND";

/// Default PNG compression level, matching the codec's own default tier.
pub const DEFAULT_COMPRESS_LEVEL: u8 = 6;

/// Writes generated images to an output directory with embedded metadata.
///
/// Each save encodes the pixel buffer as PNG and embeds two text chunks:
/// the legacy `Dream` prompt line, and (when structured metadata is given)
/// a JSON-encoded `sd-metadata` record. Files at the destination path are
/// overwritten without warning.
///
/// # Example
///
/// ```rust,no_run
/// use pngmeta::metadata::{DEFAULT_COMPRESS_LEVEL, PngWriter};
/// use serde_json::json;
///
/// let writer = PngWriter::new("outputs")?;
/// let image = image::DynamicImage::new_rgb8(512, 512);
/// let meta = json!({"image": {"prompt": "a cat", "seed": 3231591882u64}});
///
/// let path = writer.save(
///     &image,
///     "\"a cat\" -s50 -W512 -H512 -C7.5 -Addim",
///     "000001.3231591882.png",
///     Some(&meta),
///     DEFAULT_COMPRESS_LEVEL,
/// )?;
/// println!("Saved {}", path.display());
/// # anyhow::Ok(())
/// ```
#[derive(Debug, Clone)]
pub struct PngWriter {
    outdir: PathBuf,
}

impl PngWriter {
    /// Create a writer for `outdir`, creating the directory if absent.
    pub fn new(outdir: impl Into<PathBuf>) -> Result<Self> {
        let outdir = outdir.into();
        fs::create_dir_all(&outdir).with_context(|| {
            format!("Failed to create output directory {}", outdir.display())
        })?;
        Ok(Self { outdir })
    }

    /// The configured output directory.
    pub fn outdir(&self) -> &Path {
        &self.outdir
    }

    /// Save `image` as `<outdir>/<name>` with embedded prompt metadata.
    ///
    /// `dream_prompt` always goes into the `Dream` chunk; `metadata`, when
    /// given, is JSON-serialized into the `sd-metadata` chunk.
    /// `compress_level` ranges 0 to 9 (higher is smaller and slower) and is
    /// mapped onto the codec's compression tiers. Returns the full path
    /// written.
    pub fn save(
        &self,
        image: &DynamicImage,
        dream_prompt: &str,
        name: &str,
        metadata: Option<&serde_json::Value>,
        compress_level: u8,
    ) -> Result<PathBuf> {
        let path = self.outdir.join(name);

        let encoded = encode_png(image, compress_level)?;
        let mut png = Png::from_bytes(Bytes::from(encoded))
            .map_err(|e| anyhow::anyhow!("Failed to parse encoded PNG: {e}"))?;

        insert_text_chunk(&mut png, DREAM_KEY, dream_prompt);
        if let Some(meta) = metadata {
            let text = serde_json::to_string(meta)
                .context("Failed to serialize structured metadata to JSON")?;
            insert_text_chunk(&mut png, METADATA_KEY, &text);
        }

        fs::write(&path, png.encoder().bytes())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        log::debug!("Wrote {}", path.display());
        Ok(path)
    }

    /// Retrieve only the structured metadata of a file stored in the
    /// configured directory. See [`retrieve_metadata`](super::retrieve_metadata)
    /// for the full record.
    pub fn retrieve_metadata(&self, name: &str) -> Result<serde_json::Value> {
        let all = super::reader::retrieve_metadata(&self.outdir.join(name))?;
        Ok(all.sd_metadata)
    }
}

/// Replace the embedded metadata of the image at `path` in place.
///
/// The image is re-encoded as PNG carrying a single fresh `sd-metadata`
/// chunk. This is a destructive replace, not a merge: any previously
/// embedded text chunks, including the legacy `Dream` prompt, are dropped.
pub fn rewrite_metadata(path: &Path, metadata: &serde_json::Value) -> Result<()> {
    let image = image::open(path)
        .with_context(|| format!("Failed to open image {}", path.display()))?;

    let encoded = encode_png(&image, DEFAULT_COMPRESS_LEVEL)?;
    let mut png = Png::from_bytes(Bytes::from(encoded))
        .map_err(|e| anyhow::anyhow!("Failed to parse encoded PNG: {e}"))?;

    let text = serde_json::to_string(metadata)
        .context("Failed to serialize structured metadata to JSON")?;
    insert_text_chunk(&mut png, METADATA_KEY, &text);

    fs::write(path, png.encoder().bytes())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Encode a pixel buffer as PNG into memory.
fn encode_png(image: &DynamicImage, compress_level: u8) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let encoder = PngEncoder::new_with_quality(
        Cursor::new(&mut out),
        compression_for_level(compress_level),
        FilterType::Adaptive,
    );
    image
        .write_with_encoder(encoder)
        .context("Failed to encode PNG")?;
    Ok(out)
}

/// Map a 0-9 zlib-style level onto the codec's compression tiers.
/// Level 6 is the zlib default and lands on the codec default.
fn compression_for_level(level: u8) -> CompressionType {
    match level {
        0..=3 => CompressionType::Fast,
        4..=6 => CompressionType::Default,
        _ => CompressionType::Best,
    }
}

/// Insert a `tEXt` chunk (`keyword\0text`) ahead of the `IEND` chunk.
fn insert_text_chunk(png: &mut Png, keyword: &str, text: &str) {
    let mut contents = Vec::with_capacity(keyword.len() + 1 + text.len());
    contents.extend_from_slice(keyword.as_bytes());
    contents.push(0);
    contents.extend_from_slice(text.as_bytes());

    let chunk = PngChunk::new(TEXT_CHUNK, Bytes::from(contents));
    let chunks = png.chunks_mut();
    let pos = chunks
        .iter()
        .position(|c| c.kind() == IEND_CHUNK)
        .unwrap_or(chunks.len());
    chunks.insert(pos, chunk);
}

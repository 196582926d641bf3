//! PNG text-chunk metadata reading and writing.
//!
//! This module provides the two halves of the metadata round trip:
//!
//! - [`PngWriter`] / [`rewrite_metadata`] — embed generation metadata into
//!   PNG files as named text chunks
//! - [`retrieve_metadata`] — extract those chunks back into structured form
//!
//! Two fields are recognized, identified by bare keyword for compatibility
//! with previously generated files: [`DREAM_KEY`] holds the legacy
//! human-readable switch line and [`METADATA_KEY`] holds a JSON-encoded
//! record of the full generation parameters.

mod reader;
mod writer;

pub use reader::{RetrievedMetadata, retrieve_metadata};
pub use writer::{DEFAULT_COMPRESS_LEVEL, PngWriter, rewrite_metadata};

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Text-chunk keyword for the legacy human-readable prompt line.
pub const DREAM_KEY: &str = "Dream";

/// Text-chunk keyword for the JSON-encoded generation record.
pub const METADATA_KEY: &str = "sd-metadata";

/// Collect PNG files from the given paths.
///
/// Accepts a mix of file paths and directory paths. Directories are walked
/// recursively (following symlinks). Non-PNG files are skipped.
pub fn collect_pngs(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut images = Vec::new();

    for path in paths {
        if path.is_file() {
            if is_png(path) {
                images.push(path.clone());
            } else {
                log::warn!("Skipping non-PNG file: {}", path.display());
            }
        } else if path.is_dir() {
            for entry in WalkDir::new(path)
                .follow_links(true)
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let p = entry.path();
                if p.is_file() && is_png(p) {
                    images.push(p.to_path_buf());
                }
            }
        } else {
            log::warn!("Path does not exist: {}", path.display());
        }
    }

    images
}

/// Check if a file has a `.png` extension.
fn is_png(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("png"))
        .unwrap_or(false)
}

//! # pngmeta
//!
//! Persist and recover image-generation metadata inside PNG files, and assign
//! collision-free sequential filenames in a shared output directory.
//!
//! Generated images carry two named text chunks: `Dream`, a human-readable
//! reconstruction of the command-line switches that produced the image, and
//! `sd-metadata`, a JSON record of the full generation parameters. Both
//! round-trip exactly through [`metadata::retrieve_metadata`].
//!
//! ## Quick Start
//!
//! The typical write path: pick the next free filename, render the switch
//! line, and save the pixel buffer with both metadata fields embedded:
//!
//! ```rust,no_run
//! use pngmeta::metadata::{DEFAULT_COMPRESS_LEVEL, PngWriter, retrieve_metadata};
//! use pngmeta::namer::OutputNamer;
//! use pngmeta::options::{GenerationDefaults, GenerationOptions};
//! use pngmeta::switches::format_switches;
//! use serde_json::json;
//!
//! fn main() -> anyhow::Result<()> {
//!     let namer = OutputNamer::new("outputs")?;
//!     let writer = PngWriter::new("outputs")?;
//!
//!     // The pipeline hands us a pixel buffer plus the options that made it.
//!     let image = image::DynamicImage::new_rgb8(512, 512);
//!     let opt = GenerationOptions {
//!         prompt: "a cat".to_string(),
//!         steps: Some(50),
//!         ..Default::default()
//!     };
//!
//!     let seed = 3231591882u64;
//!     let name = format!("{}.{seed}.png", namer.unique_prefix()?);
//!     let dream = format_switches(&opt, &GenerationDefaults::default()).join(" ");
//!     let meta = json!({"model": "stable diffusion", "image": opt});
//!
//!     let path = writer.save(&image, &dream, &name, Some(&meta), DEFAULT_COMPRESS_LEVEL)?;
//!
//!     // The read path is independent and works on any previously written file.
//!     let recovered = retrieve_metadata(&path)?;
//!     println!("{}", recovered.dream);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## File naming
//!
//! Output files are named `<6-digit-prefix>.<suffix>.png` (the suffix is
//! commonly the seed). [`namer::OutputNamer`] recomputes the next prefix from
//! the directory contents on every request, so the directory itself is the
//! only counter. Two uncoordinated writers can race to the same prefix; the
//! scheme assumes sequential single-process use.
//!
//! ## Modules
//!
//! - [`namer`] — sequential output filename prefixes
//! - [`metadata`] — embedding and recovering PNG text-chunk metadata
//! - [`options`] — the generation parameter record and its defaults
//! - [`switches`] — command-line switch reconstruction for the `Dream` field

pub mod metadata;
pub mod namer;
pub mod options;
pub mod switches;

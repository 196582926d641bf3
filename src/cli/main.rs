use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

use pngmeta::metadata;

#[derive(Parser, Debug)]
#[command(
    name = "pngmeta",
    version,
    about = "Inspect and rewrite generation metadata embedded in PNG images"
)]
struct Cli {
    /// PNG files or directories to process
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// Output results as JSON
    #[arg(long)]
    json: bool,

    /// Replace each image's structured metadata with the JSON document in FILE
    #[arg(long, value_name = "FILE")]
    rewrite: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    if cli.paths.is_empty() {
        anyhow::bail!("No input files or directories specified. Use --help for usage.");
    }

    let images = metadata::collect_pngs(&cli.paths);
    if images.is_empty() {
        anyhow::bail!("No PNG files found in the specified paths.");
    }

    // Handle --rewrite
    if let Some(ref replacement_path) = cli.rewrite {
        let contents = std::fs::read_to_string(replacement_path).with_context(|| {
            format!("Failed to read {}", replacement_path.display())
        })?;
        let replacement: serde_json::Value = serde_json::from_str(&contents)
            .context("Failed to parse the replacement metadata as JSON")?;

        for image_path in &images {
            match metadata::rewrite_metadata(image_path, &replacement) {
                Ok(()) => log::info!("Rewrote metadata: {}", image_path.display()),
                Err(e) => log::error!("Failed to rewrite {}: {e}", image_path.display()),
            }
        }
        return Ok(());
    }

    if cli.json {
        let mut entries = Vec::new();
        for image_path in &images {
            let retrieved = metadata::retrieve_metadata(image_path)?;
            // RetrievedMetadata serializes to the on-disk field names.
            let mut entry = serde_json::to_value(&retrieved)?;
            entry["path"] = serde_json::Value::String(image_path.display().to_string());
            entries.push(entry);
        }
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for image_path in &images {
        print_metadata(image_path)?;
    }
    Ok(())
}

/// Print the embedded metadata of one file in human-readable form.
fn print_metadata(path: &Path) -> Result<()> {
    let retrieved = metadata::retrieve_metadata(path)?;

    println!("=== {} ===", path.display());
    if retrieved.dream.is_empty() {
        println!("{}: (none)", metadata::DREAM_KEY);
    } else {
        println!("{}: {}", metadata::DREAM_KEY, retrieved.dream);
    }
    if retrieved.sd_metadata.as_object().is_some_and(|m| m.is_empty()) {
        println!("{}: (none)", metadata::METADATA_KEY);
    } else {
        println!(
            "{}: {}",
            metadata::METADATA_KEY,
            serde_json::to_string_pretty(&retrieved.sd_metadata)?
        );
    }
    println!();
    Ok(())
}

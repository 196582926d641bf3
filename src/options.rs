use serde::{Deserialize, Serialize};

/// Per-invocation generation parameters, as supplied on the command line.
///
/// This is a read-only record of what the caller asked for. Fields left at
/// `None`, `false`, zero, or empty are treated as unset and fall back to
/// [`GenerationDefaults`] where a value is required.
///
/// The record is serde-compatible so it can travel verbatim inside the
/// structured `sd-metadata` field of a generated PNG.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationOptions {
    /// The text prompt.
    pub prompt: String,
    /// Number of sampling steps.
    pub steps: Option<u32>,
    /// Output width in pixels.
    pub width: Option<u32>,
    /// Output height in pixels.
    pub height: Option<u32>,
    /// Classifier-free guidance scale.
    pub cfg_scale: Option<f64>,
    /// Sampler name (e.g. `"ddim"`, `"k_lms"`).
    pub sampler_name: Option<String>,
    /// Generate seamlessly-tiling output.
    pub seamless: bool,
    /// Path to an initial image for image-to-image generation.
    pub init_img: Option<String>,
    /// Resize the initial image to fit the output dimensions.
    pub fit: bool,
    /// Noise strength for image-to-image (only meaningful with `init_img`).
    pub strength: Option<f64>,
    /// Face-restoration strength.
    pub gfpgan_strength: Option<f64>,
    /// Upscaling parameters (factor, optionally followed by strength).
    pub upscale: Option<Vec<f64>>,
    /// Amount of noise to vary the seed by.
    pub variation_amount: f64,
    /// Prior variation (seed, weight) pairs to combine.
    pub with_variations: Vec<(u64, f64)>,
}

/// Fallback values for options the caller left unset.
///
/// Mirrors the generator's own configuration, so a reconstructed command
/// line is complete even when the caller relied on defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationDefaults {
    pub steps: u32,
    pub width: u32,
    pub height: u32,
    pub cfg_scale: f64,
    pub sampler_name: String,
    pub seamless: bool,
    pub strength: f64,
}

impl Default for GenerationDefaults {
    fn default() -> Self {
        Self {
            steps: 50,
            width: 512,
            height: 512,
            cfg_scale: 7.5,
            sampler_name: "k_lms".to_string(),
            seamless: false,
            strength: 0.75,
        }
    }
}

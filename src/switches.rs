use crate::options::{GenerationDefaults, GenerationOptions};

/// Reconstruct the command-line switches that produced an image.
///
/// Returns an ordered token sequence: the quoted prompt first, then one
/// token per set option, with unset options taken from `defaults` where a
/// value is always emitted (`-s`, `-W`, `-H`, `-C`, `-A`) and omitted
/// entirely otherwise. The order is fixed; callers typically join the
/// tokens with spaces to produce the legacy `Dream` line.
///
/// # Example
///
/// ```rust
/// use pngmeta::options::{GenerationDefaults, GenerationOptions};
/// use pngmeta::switches::format_switches;
///
/// let opt = GenerationOptions {
///     prompt: "a cat".to_string(),
///     steps: Some(30),
///     ..Default::default()
/// };
/// let switches = format_switches(&opt, &GenerationDefaults::default());
/// assert_eq!(switches[0], "\"a cat\"");
/// assert_eq!(switches[1], "-s30");
/// ```
pub fn format_switches(opt: &GenerationOptions, defaults: &GenerationDefaults) -> Vec<String> {
    let mut switches = Vec::new();

    switches.push(format!("\"{}\"", opt.prompt));
    switches.push(format!(
        "-s{}",
        opt.steps.filter(|&s| s != 0).unwrap_or(defaults.steps)
    ));
    switches.push(format!(
        "-W{}",
        opt.width.filter(|&w| w != 0).unwrap_or(defaults.width)
    ));
    switches.push(format!(
        "-H{}",
        opt.height.filter(|&h| h != 0).unwrap_or(defaults.height)
    ));
    switches.push(format!(
        "-C{}",
        opt.cfg_scale.filter(|&c| c != 0.0).unwrap_or(defaults.cfg_scale)
    ));
    switches.push(format!(
        "-A{}",
        opt.sampler_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(&defaults.sampler_name)
    ));

    if opt.seamless || defaults.seamless {
        switches.push("--seamless".to_string());
    }
    if let Some(init_img) = opt.init_img.as_deref().filter(|s| !s.is_empty()) {
        switches.push(format!("-I{init_img}"));
    }
    if opt.fit {
        switches.push("--fit".to_string());
    }
    // Strength only makes sense against an initial image.
    if opt.init_img.is_some() {
        if let Some(strength) = opt.strength.filter(|&f| f != 0.0) {
            switches.push(format!("-f{strength}"));
        }
    }
    if let Some(gfpgan_strength) = opt.gfpgan_strength.filter(|&g| g != 0.0) {
        switches.push(format!("-G{gfpgan_strength}"));
    }
    if let Some(upscale) = opt.upscale.as_deref().filter(|u| !u.is_empty()) {
        let joined = upscale
            .iter()
            .map(|u| u.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        switches.push(format!("-U {joined}"));
    }
    if opt.variation_amount > 0.0 {
        switches.push(format!("-v{}", opt.variation_amount));
    }
    if !opt.with_variations.is_empty() {
        let formatted = opt
            .with_variations
            .iter()
            .map(|(seed, weight)| format!("{seed}:{weight}"))
            .collect::<Vec<_>>()
            .join(",");
        switches.push(format!("-V{formatted}"));
    }

    switches
}

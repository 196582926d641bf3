use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Assigns sequential, collision-free filename prefixes in an output directory.
///
/// Output files follow the `<6-digit-prefix>.<suffix>.png` convention
/// (e.g. `000007.3231591882.png`, where the suffix is commonly the seed).
/// The next prefix is recomputed from the directory contents on every call,
/// so there is no counter to persist or get out of sync with disk.
///
/// # Example
///
/// ```rust,no_run
/// use pngmeta::namer::OutputNamer;
///
/// let namer = OutputNamer::new("outputs")?;
/// let prefix = namer.unique_prefix()?;
/// let name = format!("{prefix}.3231591882.png");
/// # anyhow::Ok(())
/// ```
///
/// Two callers racing on the same directory may compute the same prefix.
/// Sequencing is derived purely from a directory scan, so concurrent use
/// needs external coordination.
#[derive(Debug, Clone)]
pub struct OutputNamer {
    outdir: PathBuf,
}

impl OutputNamer {
    /// Create a namer for `outdir`, creating the directory if absent.
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

    /// Compute the next unused 6-digit prefix.
    ///
    /// Scans the directory in descending name order and takes the first
    /// entry matching the output naming convention. Zero-padding makes
    /// descending lexicographic order equal descending numeric order for
    /// same-width prefixes. An empty (or all non-matching) directory
    /// yields `"000001"`.
    pub fn unique_prefix(&self) -> Result<String> {
        let mut names: Vec<String> = fs::read_dir(&self.outdir)
            .with_context(|| {
                format!("Failed to list output directory {}", self.outdir.display())
            })?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();
        names.sort_unstable_by(|a, b| b.cmp(a));

        let (existing, digits) = names
            .iter()
            .find_map(|name| numeric_prefix(name).map(|digits| (name.as_str(), digits)))
            .unwrap_or(("0000000.0.png", "0000000"));

        let basecount: u64 = digits.parse().with_context(|| {
            format!("Output filename {existing} has an unparseable numeric prefix")
        })?;
        Ok(format!("{:06}", basecount + 1))
    }
}

/// Match `<digits>.<suffix containing ".png">` and return the digit segment.
///
/// The suffix is deliberately loose: anything after the first dot counts as
/// long as a `.png` occurrence follows, so multi-dot suffixes (and names that
/// merely contain `.png` before their real extension) all match. Existing
/// directories were named under this rule, so it stays as is.
fn numeric_prefix(name: &str) -> Option<&str> {
    let (prefix, rest) = name.split_once('.')?;
    if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    rest.contains(".png").then_some(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"").unwrap();
    }

    // ── numeric_prefix ───────────────────────────────────────────────

    #[test]
    fn prefix_matches_standard_names() {
        assert_eq!(numeric_prefix("000001.0.png"), Some("000001"));
        assert_eq!(numeric_prefix("000007.3231591882.png"), Some("000007"));
    }

    #[test]
    fn prefix_requires_middle_segment() {
        // No free-form segment between the digits and ".png".
        assert_eq!(numeric_prefix("000001.png"), None);
    }

    #[test]
    fn prefix_rejects_non_numeric() {
        assert_eq!(numeric_prefix("readme.txt"), None);
        assert_eq!(numeric_prefix("img001.0.png"), None);
        assert_eq!(numeric_prefix(".0.png"), None);
        assert_eq!(numeric_prefix("000001"), None);
    }

    #[test]
    fn prefix_accepts_multi_dot_suffix() {
        assert_eq!(numeric_prefix("000004.seed.variant.png"), Some("000004"));
        assert_eq!(numeric_prefix("000004..png"), Some("000004"));
    }

    #[test]
    fn prefix_accepts_unanchored_png_tail() {
        // ".png" anywhere after the first dot matches, even mid-name.
        assert_eq!(numeric_prefix("000007.0.png.bak"), Some("000007"));
    }

    // ── unique_prefix ────────────────────────────────────────────────

    #[test]
    fn empty_directory_starts_at_one() {
        let dir = TempDir::new().unwrap();
        let namer = OutputNamer::new(dir.path()).unwrap();
        assert_eq!(namer.unique_prefix().unwrap(), "000001");
    }

    #[test]
    fn increments_past_highest_existing() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "000001.a.png");
        touch(dir.path(), "000002.b.png");

        let namer = OutputNamer::new(dir.path()).unwrap();
        assert_eq!(namer.unique_prefix().unwrap(), "000003");
    }

    #[test]
    fn non_matching_entries_are_ignored() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "readme.txt");

        let namer = OutputNamer::new(dir.path()).unwrap();
        assert_eq!(namer.unique_prefix().unwrap(), "000001");
    }

    #[test]
    fn non_matching_entries_sorting_last_do_not_shadow() {
        // "zzz.txt" sorts before any digit prefix in descending order but
        // must not be selected.
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "zzz.txt");
        touch(dir.path(), "000002.1.png");

        let namer = OutputNamer::new(dir.path()).unwrap();
        assert_eq!(namer.unique_prefix().unwrap(), "000003");
    }

    #[test]
    fn carries_into_double_digits() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "000009.42.png");

        let namer = OutputNamer::new(dir.path()).unwrap();
        assert_eq!(namer.unique_prefix().unwrap(), "000010");
    }

    #[test]
    fn sequential_naming_is_monotonic() {
        let dir = TempDir::new().unwrap();
        let namer = OutputNamer::new(dir.path()).unwrap();

        for expected in ["000001", "000002", "000003"] {
            let prefix = namer.unique_prefix().unwrap();
            assert_eq!(prefix, expected);
            touch(dir.path(), &format!("{prefix}.0.png"));
        }
    }

    #[test]
    fn wider_prefix_parses_numerically() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "0000012.0.png");

        let namer = OutputNamer::new(dir.path()).unwrap();
        assert_eq!(namer.unique_prefix().unwrap(), "000013");
    }

    #[test]
    fn overflowing_prefix_is_an_error() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "99999999999999999999999.0.png");

        let namer = OutputNamer::new(dir.path()).unwrap();
        assert!(namer.unique_prefix().is_err());
    }

    #[test]
    fn new_creates_missing_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a/b/outputs");

        let namer = OutputNamer::new(&nested).unwrap();
        assert!(nested.is_dir());
        assert_eq!(namer.outdir(), nested);
        assert_eq!(namer.unique_prefix().unwrap(), "000001");
    }
}

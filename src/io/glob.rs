//! File globbing for input locations such as `corpus/*.txt`.

use anyhow::{Context, Result};
use glob::glob;
use std::path::PathBuf;

/// Whether `location` contains glob metacharacters.
pub fn is_glob_pattern(location: &str) -> bool {
    location.contains(['*', '?', '['])
}

/// Expand a glob pattern into a sorted list of matching files.
///
/// Directories matched by the pattern are skipped. No match is not an error;
/// the result is simply empty.
///
/// ```no_run
/// use wordbeam::io::glob::expand_glob;
///
/// let files = expand_glob("corpus/**/*.txt")?;
/// # anyhow::Result::<()>::Ok(())
/// ```
///
/// # Errors
/// The pattern is invalid, or a matched path cannot be read.
pub fn expand_glob(pattern: &str) -> Result<Vec<PathBuf>> {
    let paths = glob(pattern).with_context(|| format!("invalid glob pattern: {pattern}"))?;

    let mut result = Vec::new();
    for entry in paths {
        let path =
            entry.with_context(|| format!("error reading glob entry for pattern: {pattern}"))?;
        if path.is_file() {
            result.push(path);
        }
    }

    // Sort for deterministic order
    result.sort();

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn detects_metacharacters() {
        assert!(is_glob_pattern("in/*.txt"));
        assert!(is_glob_pattern("in/part-?"));
        assert!(is_glob_pattern("in/[ab].txt"));
        assert!(!is_glob_pattern("in/plain.txt"));
    }

    #[test]
    fn expands_files_sorted_and_skips_directories() -> Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("b.txt"), "b")?;
        fs::write(dir.path().join("a.txt"), "a")?;
        fs::create_dir(dir.path().join("c.txt"))?;

        let pattern = format!("{}/*.txt", dir.path().display());
        let files = expand_glob(&pattern)?;
        let names: Vec<_> = files
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
            .collect();
        assert_eq!(names, ["a.txt", "b.txt"]);
        Ok(())
    }

    #[test]
    fn invalid_pattern_is_an_error() {
        assert!(expand_glob("[").is_err());
    }
}

//! Line-oriented text input and tab-separated output.
//!
//! Input locations may name a single file, a directory (every visible file in
//! it, not recursing) or a glob pattern. Each line becomes a [`Record`] whose
//! offset is the byte position of the line in its file.
//!
//! Output goes to a fresh directory holding one part file with a
//! `key<TAB>value` line per result, sorted by key, and an empty `_SUCCESS`
//! marker written last.

use crate::error::JobError;
use crate::io::glob::{expand_glob, is_glob_pattern};
use crate::job::Record;
use anyhow::{Context, Result, bail};
use std::fmt::Display;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Name of the single part file inside an output directory.
pub const PART_FILE: &str = "part-r-00000";

/// Marker written once the part file is complete.
pub const SUCCESS_MARKER: &str = "_SUCCESS";

// Bookkeeping files such as `_SUCCESS` or `.crc` are not input.
fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('_') || n.starts_with('.'))
}

/// Resolve an input location into a sorted list of files.
///
/// An existing directory with no visible files resolves to an empty list, and
/// the job then runs over zero records.
///
/// # Errors
/// [`JobError::NoInput`] if the path does not exist or a glob matches nothing;
/// I/O errors listing a directory; invalid glob patterns.
pub fn resolve_inputs(location: &str) -> Result<Vec<PathBuf>> {
    let path = Path::new(location);
    let files: Vec<PathBuf> = if is_glob_pattern(location) {
        let files: Vec<PathBuf> = expand_glob(location)?
            .into_iter()
            .filter(|p| !is_hidden(p))
            .collect();
        if files.is_empty() {
            return Err(JobError::NoInput(location.to_string()).into());
        }
        files
    } else if path.is_file() {
        vec![path.to_path_buf()]
    } else if path.is_dir() {
        let mut files = Vec::new();
        for entry in fs::read_dir(path).with_context(|| format!("list {}", path.display()))? {
            let entry = entry.with_context(|| format!("list {}", path.display()))?;
            let p = entry.path();
            if p.is_file() && !is_hidden(&p) {
                files.push(p);
            }
        }
        files.sort();
        files
    } else {
        return Err(JobError::NoInput(location.to_string()).into());
    };

    debug!(location, files = files.len(), "resolved input");
    Ok(files)
}

/// Read every line of `paths` as a record.
///
/// Line terminators (`\n` or `\r\n`) are stripped. Offsets restart at zero for
/// each file.
///
/// # Errors
/// A file cannot be opened, or contains bytes that are not UTF-8.
pub fn read_records(paths: &[PathBuf]) -> Result<Vec<Record>> {
    let mut out = Vec::new();
    for path in paths {
        let before = out.len();
        let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
        let mut reader = BufReader::new(f);

        let mut offset = 0u64;
        let mut line = String::new();
        for idx in 1u64.. {
            line.clear();
            let read = reader
                .read_line(&mut line)
                .with_context(|| format!("read line {idx} in {}", path.display()))?;
            if read == 0 {
                break;
            }
            let text = line
                .strip_suffix('\n')
                .map(|l| l.strip_suffix('\r').unwrap_or(l))
                .unwrap_or(line.as_str());
            out.push(Record::new(offset, text));
            offset += read as u64;
        }
        debug!(path = %path.display(), records = out.len() - before, "read input file");
    }
    Ok(out)
}

/// Write `results` into a new directory `dir`.
///
/// Returns the path of the part file.
///
/// # Errors
/// [`JobError::OutputExists`] if `dir` already exists; I/O errors while
/// creating or writing files.
pub fn write_output<K, V>(dir: impl AsRef<Path>, results: &[(K, V)]) -> Result<PathBuf>
where
    K: Display + Ord,
    V: Display,
{
    let dir = dir.as_ref();
    if dir.exists() {
        return Err(JobError::OutputExists(dir.to_path_buf()).into());
    }
    fs::create_dir_all(dir).with_context(|| format!("mkdir -p {}", dir.display()))?;

    let mut sorted: Vec<&(K, V)> = results.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));

    let part = dir.join(PART_FILE);
    let f = File::create(&part).with_context(|| format!("create {}", part.display()))?;
    let mut w = BufWriter::new(f);
    for (k, v) in sorted {
        writeln!(w, "{k}\t{v}").with_context(|| format!("write {}", part.display()))?;
    }
    w.flush().with_context(|| format!("flush {}", part.display()))?;

    let marker = dir.join(SUCCESS_MARKER);
    File::create(&marker).with_context(|| format!("create {}", marker.display()))?;

    info!(path = %part.display(), records = results.len(), "wrote output");
    Ok(part)
}

/// Read back the `(word, total)` pairs of an output directory.
///
/// # Errors
/// The part file is missing, or a line is not `word<TAB>integer`.
pub fn read_counts(dir: impl AsRef<Path>) -> Result<Vec<(String, u64)>> {
    let part = dir.as_ref().join(PART_FILE);
    let f = File::open(&part).with_context(|| format!("open {}", part.display()))?;

    let mut out = Vec::new();
    for (idx, line) in BufReader::new(f).lines().enumerate() {
        let line = line.with_context(|| format!("read line {} in {}", idx + 1, part.display()))?;
        let Some((word, total)) = line.split_once('\t') else {
            bail!("line {} in {} has no tab: {line:?}", idx + 1, part.display());
        };
        let total: u64 = total
            .parse()
            .with_context(|| format!("parse count on line {} in {}", idx + 1, part.display()))?;
        out.push((word.to_string(), total));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_names_start_with_underscore_or_dot() {
        assert!(is_hidden(Path::new("out/_SUCCESS")));
        assert!(is_hidden(Path::new(".part.crc")));
        assert!(!is_hidden(Path::new("in/book.txt")));
    }

    #[test]
    fn offsets_count_bytes_including_terminators() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("in.txt");
        fs::write(&path, "ab\r\nc\n\nlast")?;

        let records = read_records(&[path])?;
        assert_eq!(
            records,
            vec![
                Record::new(0, "ab"),
                Record::new(4, "c"),
                Record::new(6, ""),
                Record::new(7, "last"),
            ]
        );
        Ok(())
    }
}

//! Job configuration.
//!
//! Settings come from an optional TOML file and are then overridden by
//! command-line flags. Every field has a default, so an empty file (or none)
//! is a valid configuration:
//!
//! ```toml
//! sequential = false
//! threads = 4
//! partitions = 16
//! word_chars = "ascii"   # or "unicode"
//! combine = false
//! ```

use crate::error::JobError;
use crate::runner::Runner;
use crate::wordcount::WordChars;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JobConfig {
    /// Run every stage on the calling thread over one partition.
    pub sequential: bool,
    /// Size of a dedicated worker pool; rayon's global pool when unset.
    pub threads: Option<usize>,
    /// Number of partitions; `2 × CPUs` when unset.
    pub partitions: Option<usize>,
    pub word_chars: WordChars,
    /// Sum counts inside each partition before grouping.
    pub combine: bool,
}

impl JobConfig {
    /// # Errors
    /// Malformed TOML or unknown keys.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parse job configuration")
    }

    /// # Errors
    /// The file cannot be read or does not parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("in {}", path.display()))
    }

    /// # Errors
    /// [`JobError::InvalidConfig`] for a zero thread or partition count.
    pub fn validate(&self) -> Result<(), JobError> {
        if self.threads == Some(0) {
            return Err(JobError::InvalidConfig("threads must be at least 1".into()));
        }
        if self.partitions == Some(0) {
            return Err(JobError::InvalidConfig("partitions must be at least 1".into()));
        }
        Ok(())
    }

    pub fn runner(&self) -> Runner {
        if self.sequential {
            Runner::sequential()
        } else {
            Runner::parallel(self.threads, self.partitions)
        }
    }
}

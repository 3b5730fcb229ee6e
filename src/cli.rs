//! Command-line surface of the `wordbeam` binary.
//!
//! ```text
//! wordbeam [OPTIONS] <INPUT> <OUTPUT>
//! ```
//!
//! Exactly two positional arguments are accepted. Anything else is a usage
//! error reported by clap with a non-zero exit status.

use crate::combiners::Sum;
use crate::config::JobConfig;
use crate::counters::JobCounters;
use crate::error::JobError;
use crate::io::text::{read_records, resolve_inputs, write_output};
use crate::wordcount::{WordChars, word_count_job};
use anyhow::Result;
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Count word frequencies in text files
#[derive(Parser, Debug)]
#[command(name = "wordbeam", version)]
pub struct Cli {
    /// Input file, directory or glob pattern
    pub input: String,

    /// Output directory; must not exist yet
    pub output: PathBuf,

    /// TOML job configuration file
    #[arg(long, value_name = "FILE")]
    pub conf: Option<PathBuf>,

    /// Run on the calling thread over a single partition
    #[arg(long)]
    pub sequential: bool,

    /// Worker threads for this job
    #[arg(long)]
    pub threads: Option<usize>,

    /// Number of partitions
    #[arg(long)]
    pub partitions: Option<usize>,

    /// Treat Unicode letters and digits as word characters
    #[arg(long)]
    pub unicode: bool,

    /// Sum counts per partition before grouping (map-side combiner)
    #[arg(long)]
    pub combine: bool,

    /// Verbose logging (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Configuration file (if any) with command-line flags applied on top.
    ///
    /// # Errors
    /// The configuration file cannot be loaded, or the result is invalid.
    pub fn job_config(&self) -> Result<JobConfig> {
        let mut config = match &self.conf {
            Some(path) => JobConfig::load(path)?,
            None => JobConfig::default(),
        };
        if self.sequential {
            config.sequential = true;
        }
        if self.threads.is_some() {
            config.threads = self.threads;
        }
        if self.partitions.is_some() {
            config.partitions = self.partitions;
        }
        if self.unicode {
            config.word_chars = WordChars::Unicode;
        }
        if self.combine {
            config.combine = true;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Install the global `tracing` subscriber on stderr.
///
/// `RUST_LOG` takes precedence over the verbosity flag.
pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // A subscriber may already be installed (tests); keep it.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose >= 2)
        .try_init()
        .ok();
}

/// Run the word-count job described by `cli`.
///
/// # Errors
/// Configuration, input resolution, reading, execution or writing failures.
pub fn run(cli: &Cli) -> Result<JobCounters> {
    let config = cli.job_config()?;
    info!(input = %cli.input, output = %cli.output.display(), ?config, "submitting job");

    // Fail before reading any input.
    if cli.output.exists() {
        return Err(JobError::OutputExists(cli.output.clone()).into());
    }

    let files = resolve_inputs(&cli.input)?;
    let records = read_records(&files)?;
    let mut job = word_count_job(config.word_chars).with_runner(config.runner());
    if config.combine {
        job = job.with_combiner(Sum::<u64>::new());
    }
    let output = job.run(records)?;

    write_output(&cli.output, &output.results)?;
    output.counters.log();
    Ok(output.counters)
}

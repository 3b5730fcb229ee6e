use std::path::PathBuf;
use thiserror::Error;

/// Job-level failures a caller may want to tell apart.
///
/// Everything else (I/O, parsing) travels as a plain `anyhow::Error` with
/// context attached. The mapper and reducer never produce errors.
#[derive(Error, Debug)]
pub enum JobError {
    #[error("output directory {} already exists", .0.display())]
    OutputExists(PathBuf),

    #[error("no input files found at {0}")]
    NoInput(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

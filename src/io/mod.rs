//! Reading input records and writing job output.
//!
//! - [`glob`] expands file patterns.
//! - [`text`] resolves an input location to files, reads them as line
//!   records, and writes `word<TAB>total` output directories.

pub mod glob;
pub mod text;

//! # wordbeam
//!
//! Word-frequency counting as a map/reduce job, on a small batch engine in
//! the style of Apache Beam.
//!
//! The job itself is two stateless functions:
//!
//! - the **mapper** ([`WordCountMapper`]) turns one line of text into
//!   `(word, 1)` pairs, a word being a maximal run of `[A-Za-z0-9_]`;
//! - the **reducer** ([`WordCountReducer`]) sums the counts of one word.
//!
//! Everything between them (partitioning the input, grouping every emission
//! of a word into one group, running partitions on worker threads) is done by
//! the engine.
//!
//! ## Quick Start
//!
//! ```
//! use wordbeam::*;
//! use wordbeam::job::records_from_lines;
//!
//! # fn main() -> anyhow::Result<()> {
//! let job = word_count_job(WordChars::Ascii);
//! let output = job.run(records_from_lines(["foo, bar! foo?"]))?;
//! assert_eq!(
//!     output.into_sorted_results(),
//!     vec![("bar".to_string(), 1), ("foo".to_string(), 2)]
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## The engine
//!
//! A [`Pipeline`] holds a graph of stages; a [`PCollection<T>`] is a lazy,
//! typed handle on one stage's output. Stateless transforms
//! ([`map`](PCollection::map), [`flat_map`](PCollection::flat_map),
//! [`combine_partial`](PCollection::combine_partial)) are fused and run per
//! partition; [`group_by_key`](PCollection::group_by_key) is a barrier.
//! Nothing runs until a collect method is called:
//!
//! - [`collect_seq`](PCollection::collect_seq): one partition, calling thread
//! - [`collect_par`](PCollection::collect_par): partitions on rayon workers
//!
//! Both produce the same multiset of results.
//!
//! ```
//! use wordbeam::*;
//!
//! # fn main() -> anyhow::Result<()> {
//! let p = Pipeline::default();
//! let counts = from_vec(&p, vec!["a b".to_string(), "a".to_string()])
//!     .flat_map(|s: &String| s.split(' ').map(|w| (w.to_string(), 1u64)).collect::<Vec<_>>())
//!     .group_by_key()
//!     .map(|(w, ones): &(String, Vec<u64>)| (w.clone(), ones.len() as u64))
//!     .collect_par_sorted(None, Some(2))?;
//! assert_eq!(counts, vec![("a".to_string(), 2), ("b".to_string(), 1)]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`wordcount`] - tokenizer, mapper and reducer
//! - [`job`] - `Mapper`/`Reducer` traits and the job that runs them
//! - [`lifecycle`] - per-partition setup/cleanup scopes
//! - [`collection`], [`pipeline`], [`runner`] - the engine
//! - [`combiners`] - reusable `CombineFn`s for map-side combining
//! - [`io`] - input resolution, line records, output directories
//! - [`config`], [`cli`] - job configuration and the binary's argument parsing
//! - [`testing`] - assertions for pipeline tests

pub mod cli;
pub mod collection;
pub mod combiners;
pub mod config;
pub mod counters;
pub mod error;
pub mod io;
pub mod job;
pub mod lifecycle;
pub mod node;
pub mod node_id;
pub mod pipeline;
pub mod runner;
pub mod testing;
pub mod type_token;
pub mod wordcount;
mod helpers;

pub use collection::{CombineFn, PCollection, RFBound, from_vec};
pub use combiners::Sum;
pub use error::JobError;
pub use job::{JobOutput, MapReduceJob, Mapper, Record, Reducer};
pub use node_id::NodeId;
pub use pipeline::Pipeline;
pub use runner::{ExecMode, Runner};
pub use type_token::Partition;
pub use wordcount::{WordChars, WordCountMapper, WordCountReducer, word_count_job};

//! Map/reduce jobs on top of the pipeline engine.
//!
//! A job is a [`Mapper`] and a [`Reducer`] injected into a fixed plan:
//!
//! ```text
//! records ─ map (scoped per partition) ─ [combine] ─ group_by_key ─ reduce (scoped per partition) ─ results
//! ```
//!
//! The optional combine stage pre-aggregates map output inside each partition
//! (see [`MapReduceJob::with_combiner`]).
//!
//! The engine owns everything between the two user functions: partitioning,
//! grouping every emission of a key into exactly one group, and invoking the
//! reducer exactly once per group. Mapper and reducer only see one record or
//! one group at a time and hold no mutable state, so any partition can be
//! re-run with identical output.

use crate::counters::{
    COMBINE_INPUT_RECORDS, COMBINE_OUTPUT_RECORDS, JobCounters, MAP_INPUT_RECORDS,
    MAP_OUTPUT_RECORDS, REDUCE_INPUT_GROUPS, REDUCE_OUTPUT_RECORDS,
};
use crate::{CombineFn, PCollection, Pipeline, RFBound, Runner, from_vec};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::hash::Hash;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::info;

/// One line of input and where it started in its source.
///
/// `offset` is opaque to mappers; it only identifies the record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub offset: u64,
    pub line: String,
}

impl Record {
    pub fn new(offset: u64, line: impl Into<String>) -> Self {
        Self {
            offset,
            line: line.into(),
        }
    }
}

/// Build records from in-memory lines, using the byte offsets the lines would
/// have in a `\n`-separated file.
pub fn records_from_lines<I, S>(lines: I) -> Vec<Record>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut offset = 0u64;
    lines
        .into_iter()
        .map(|line| {
            let record = Record::new(offset, line);
            offset += record.line.len() as u64 + 1;
            record
        })
        .collect()
}

/// Turns one record into zero or more key/value emissions.
pub trait Mapper: Send + Sync + 'static {
    type Key: RFBound + Eq + Hash;
    type Value: RFBound;

    fn map(&self, record: &Record) -> Vec<(Self::Key, Self::Value)>;
}

/// Turns one key and every value emitted for it into one output value.
pub trait Reducer: Send + Sync + 'static {
    type Key: RFBound + Eq + Hash;
    type Value: RFBound;
    type Output: RFBound;

    /// `values` arrive in no particular order.
    fn reduce(&self, key: &Self::Key, values: &[Self::Value]) -> Self::Output;
}

/// Results of a job plus the counters gathered while running it.
#[derive(Clone, Debug)]
pub struct JobOutput<K, O> {
    pub results: Vec<(K, O)>,
    pub counters: JobCounters,
}

impl<K: Ord, O> JobOutput<K, O> {
    /// Results ordered by key.
    pub fn into_sorted_results(mut self) -> Vec<(K, O)> {
        self.results.sort_by(|a, b| a.0.cmp(&b.0));
        self.results
    }
}

#[derive(Default)]
struct StageTallies {
    map_output: Arc<AtomicU64>,
    combine_output: Arc<AtomicU64>,
    groups: Arc<AtomicU64>,
    reduce_output: Arc<AtomicU64>,
}

type Emissions<M> = PCollection<(<M as Mapper>::Key, <M as Mapper>::Value)>;
type CombineStage<M> = Arc<dyn Fn(Emissions<M>) -> Emissions<M> + Send + Sync>;

/// A mapper/reducer pair, an optional combiner and the runner that executes them.
pub struct MapReduceJob<M: Mapper, R> {
    mapper: Arc<M>,
    reducer: Arc<R>,
    combiner: Option<CombineStage<M>>,
    runner: Runner,
}

impl<M, R> MapReduceJob<M, R>
where
    M: Mapper,
    R: Reducer<Key = M::Key, Value = M::Value>,
{
    pub fn new(mapper: M, reducer: R) -> Self {
        Self {
            mapper: Arc::new(mapper),
            reducer: Arc::new(reducer),
            combiner: None,
            runner: Runner::default(),
        }
    }

    /// Pre-aggregate map output with `comb` inside each partition, before
    /// grouping.
    ///
    /// The reducer must give the same output for a key whether it sees the
    /// raw values or the combined ones; summing counts is the usual case.
    pub fn with_combiner<C, A>(mut self, comb: C) -> Self
    where
        C: CombineFn<M::Value, A, M::Value>,
        A: Send + Sync + 'static,
    {
        let comb = Arc::new(comb);
        self.combiner = Some(Arc::new(move |emitted: Emissions<M>| {
            emitted.combine_partial_shared(Arc::clone(&comb))
        }));
        self
    }

    pub fn has_combiner(&self) -> bool {
        self.combiner.is_some()
    }

    pub fn with_runner(mut self, runner: Runner) -> Self {
        self.runner = runner;
        self
    }

    pub fn runner(&self) -> &Runner {
        &self.runner
    }

    /// Attach the job's stages to `p` over `records` without running them.
    pub fn plan(&self, p: &Pipeline, records: Vec<Record>) -> PCollection<(M::Key, R::Output)> {
        self.build(p, records, &StageTallies::default())
    }

    fn build(
        &self,
        p: &Pipeline,
        records: Vec<Record>,
        tallies: &StageTallies,
    ) -> PCollection<(M::Key, R::Output)> {
        let mapper = Arc::clone(&self.mapper);
        let reducer = Arc::clone(&self.reducer);

        let emitted = from_vec(p, records)
            .flat_map_scoped("map", move |record: &Record| mapper.map(record))
            .tally(Arc::clone(&tallies.map_output));
        let shuffled = match &self.combiner {
            Some(combine) => combine(emitted).tally(Arc::clone(&tallies.combine_output)),
            None => emitted,
        };

        shuffled
            .group_by_key()
            .tally(Arc::clone(&tallies.groups))
            .map_scoped("reduce", move |(key, values): &(M::Key, Vec<M::Value>)| {
                (key.clone(), reducer.reduce(key, values))
            })
            .tally(Arc::clone(&tallies.reduce_output))
    }

    /// Run the job over `records` and return its results and counters.
    ///
    /// # Errors
    /// Only engine failures (a malformed plan or a thread pool that cannot be
    /// built); mapping and reducing themselves cannot fail.
    pub fn run(&self, records: Vec<Record>) -> Result<JobOutput<M::Key, R::Output>> {
        let started = Instant::now();
        let input_records = records.len() as u64;
        info!(
            records = input_records,
            mode = ?self.runner.mode,
            combiner = self.has_combiner(),
            "running job"
        );

        let p = Pipeline::default();
        let tallies = StageTallies::default();
        let results = self.build(&p, records, &tallies).collect_with(&self.runner)?;

        let mut counters = JobCounters::default();
        counters.set(MAP_INPUT_RECORDS, input_records);
        let map_output = tallies.map_output.load(Ordering::Relaxed);
        counters.set(MAP_OUTPUT_RECORDS, map_output);
        if self.has_combiner() {
            counters.set(COMBINE_INPUT_RECORDS, map_output);
            counters.set(
                COMBINE_OUTPUT_RECORDS,
                tallies.combine_output.load(Ordering::Relaxed),
            );
        }
        counters.set(REDUCE_INPUT_GROUPS, tallies.groups.load(Ordering::Relaxed));
        counters.set(REDUCE_OUTPUT_RECORDS, tallies.reduce_output.load(Ordering::Relaxed));
        counters.set_elapsed(started.elapsed());

        Ok(JobOutput { results, counters })
    }
}

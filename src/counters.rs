//! Job counters.
//!
//! A finished job reports how many elements crossed each stage boundary,
//! plus the wall-clock time of the run. Counters are gathered by the engine
//! around the mapper and reducer (see [`PCollection::tally`](crate::PCollection::tally)),
//! never by the mapper or reducer themselves.
//!
//! ```
//! use wordbeam::counters::{JobCounters, MAP_INPUT_RECORDS};
//!
//! let mut c = JobCounters::default();
//! c.set(MAP_INPUT_RECORDS, 2);
//! assert_eq!(c.get(MAP_INPUT_RECORDS), Some(2));
//! assert_eq!(c.to_json()["counters"][MAP_INPUT_RECORDS], 2);
//! ```

use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::info;

pub const MAP_INPUT_RECORDS: &str = "map_input_records";
pub const MAP_OUTPUT_RECORDS: &str = "map_output_records";
/// Only reported when the job has a combiner.
pub const COMBINE_INPUT_RECORDS: &str = "combine_input_records";
pub const COMBINE_OUTPUT_RECORDS: &str = "combine_output_records";
pub const REDUCE_INPUT_GROUPS: &str = "reduce_input_groups";
pub const REDUCE_OUTPUT_RECORDS: &str = "reduce_output_records";

/// Snapshot of named counters for one job run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct JobCounters {
    values: BTreeMap<String, u64>,
    elapsed: Option<Duration>,
}

impl JobCounters {
    pub fn set(&mut self, name: &str, value: u64) {
        self.values.insert(name.to_string(), value);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<u64> {
        self.values.get(name).copied()
    }

    /// Counters in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn set_elapsed(&mut self, elapsed: Duration) {
        self.elapsed = Some(elapsed);
    }

    #[must_use]
    pub fn elapsed(&self) -> Option<Duration> {
        self.elapsed
    }

    /// Emit one `info` event per counter, then one for the elapsed time.
    pub fn log(&self) {
        for (name, value) in self.iter() {
            info!(counter = name, value, "job counter");
        }
        if let Some(elapsed) = self.elapsed {
            info!(elapsed_ms = elapsed.as_millis() as u64, "job finished");
        }
    }

    #[must_use]
    pub fn to_json(&self) -> Value {
        let counters: serde_json::Map<String, Value> = self
            .values
            .iter()
            .map(|(k, v)| (k.clone(), json!(v)))
            .collect();
        let mut out = json!({ "counters": counters });
        if let Some(elapsed) = self.elapsed {
            out["elapsed_ms"] = json!(elapsed.as_millis() as u64);
        }
        out
    }
}

//! Testing utilities for pipelines and jobs.
//!
//! Grouping and combining give no ordering guarantees, so most assertions here
//! compare collections as multisets or after sorting by key.
//!
//! ```
//! use wordbeam::*;
//! use wordbeam::testing::*;
//!
//! let p = TestPipeline::new();
//! let out = from_vec(&p, vec![("a".to_string(), 1u64), ("a".to_string(), 1)])
//!     .group_by_key()
//!     .collect_seq()
//!     .unwrap();
//! assert_grouped_kv_equal(out, vec![("a".to_string(), vec![1, 1])]);
//! ```

pub mod assertions;

pub use assertions::*;

use crate::Pipeline;

/// A [`Pipeline`] with graph inspection helpers for tests.
#[derive(Clone, Default)]
pub struct TestPipeline {
    pipeline: Pipeline,
}

impl TestPipeline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes in the pipeline graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        let (nodes, _) = self.pipeline.snapshot();
        nodes.len()
    }

    /// Number of edges in the pipeline graph.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        let (_, edges) = self.pipeline.snapshot();
        edges.len()
    }
}

// Allow TestPipeline to be used wherever Pipeline is expected
impl std::ops::Deref for TestPipeline {
    type Target = Pipeline;

    fn deref(&self) -> &Self::Target {
        &self.pipeline
    }
}

impl AsRef<Pipeline> for TestPipeline {
    fn as_ref(&self) -> &Pipeline {
        &self.pipeline
    }
}

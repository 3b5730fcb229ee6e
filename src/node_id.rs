//! Identifiers for nodes within a [`Pipeline`](crate::pipeline::Pipeline).
//!
//! Every stage added to a pipeline gets a sequential `NodeId`. The runner walks
//! edges between these ids to recover the execution chain for a terminal node.

/// Unique numeric identifier for a node in a pipeline graph.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NodeId(u64);

impl NodeId {
    pub(crate) fn new(v: u64) -> Self {
        Self(v)
    }

    /// Return the underlying numeric value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

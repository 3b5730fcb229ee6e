//! Plan execution.
//!
//! The runner walks back from a terminal node to its source, then executes the
//! resulting linear chain:
//!
//! - the source vector is split into contiguous partitions,
//! - neighbouring stateless stages are fused and applied per partition,
//! - `GroupByKey` is a barrier: a local phase per partition, one merge, then
//!   the merged groups are split again so the next stages still run
//!   partition-parallel (one worker handles a disjoint set of keys).
//!
//! Sequential mode runs the same chain over a single partition on the calling
//! thread.

use crate::RFBound;
use crate::node::{DynOp, Node};
use crate::node_id::NodeId;
use crate::pipeline::Pipeline;
use crate::type_token::{Partition, VecOps};
use anyhow::{Context, Result, anyhow, bail};
use rayon::prelude::*;
use std::any::type_name;
use std::sync::Arc;
use tracing::{debug, trace};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecMode {
    Sequential,
    Parallel {
        threads: Option<usize>,
        partitions: Option<usize>,
    },
}

#[derive(Clone, Debug)]
pub struct Runner {
    pub mode: ExecMode,
    pub default_partitions: usize,
}

impl Default for Runner {
    fn default() -> Self {
        Self {
            mode: ExecMode::Parallel {
                threads: None,
                partitions: None,
            },
            default_partitions: 2 * num_cpus::get().max(2),
        }
    }
}

impl Runner {
    pub fn sequential() -> Self {
        Self {
            mode: ExecMode::Sequential,
            ..Default::default()
        }
    }

    pub fn parallel(threads: Option<usize>, partitions: Option<usize>) -> Self {
        Self {
            mode: ExecMode::Parallel {
                threads,
                partitions,
            },
            ..Default::default()
        }
    }

    /// Execute the chain ending at `terminal` and materialize it as `Vec<T>`.
    ///
    /// # Errors
    /// - a node on the chain is missing from the pipeline,
    /// - the chain does not start with a source,
    /// - a dedicated thread pool cannot be built,
    /// - the terminal output is not a `Vec<T>`.
    pub fn run_collect<T: RFBound>(&self, p: &Pipeline, terminal: NodeId) -> Result<Vec<T>> {
        let (mut gnodes, edges) = p.snapshot();

        // Linear backwalk: terminal → … → source
        let mut chain: Vec<Node> = Vec::new();
        let mut cur = terminal;
        loop {
            let n = gnodes
                .remove(&cur)
                .ok_or_else(|| anyhow!("missing node {cur:?}"))?;
            chain.push(n);
            match edges.iter().find(|(_, to)| *to == cur) {
                Some((from, _)) => cur = *from,
                None => break,
            }
        }
        chain.reverse();

        debug!(stages = chain.len(), mode = ?self.mode, terminal = terminal.raw(), "executing plan");

        match self.mode {
            ExecMode::Sequential => exec_chain::<T>(chain, 1, false),
            ExecMode::Parallel {
                threads,
                partitions,
            } => {
                let parts = partitions.unwrap_or(self.default_partitions).max(1);
                match threads {
                    Some(t) => {
                        let pool = rayon::ThreadPoolBuilder::new()
                            .num_threads(t.max(1))
                            .build()
                            .context("build rayon thread pool")?;
                        pool.install(|| exec_chain::<T>(chain, parts, true))
                    }
                    None => exec_chain::<T>(chain, parts, true),
                }
            }
        }
    }
}

/// Run a fused stateless stage
fn fuse_stateless(ops: &[Arc<dyn DynOp>], input: Partition) -> Partition {
    ops.iter().fold(input, |acc, op| op.apply(acc))
}

fn for_each_partition<F>(parts: Vec<Partition>, parallel: bool, f: F) -> Vec<Partition>
where
    F: Fn(Partition) -> Partition + Send + Sync,
{
    if parallel {
        parts.into_par_iter().map(f).collect()
    } else {
        parts.into_iter().map(f).collect()
    }
}

fn resplit(ops: &dyn VecOps, merged: Partition, n: usize) -> Result<Vec<Partition>> {
    if n <= 1 {
        return Ok(vec![merged]);
    }
    ops.split(merged.as_ref(), n)
        .ok_or_else(|| anyhow!("barrier output has an unexpected type"))
}

fn exec_chain<T: RFBound>(chain: Vec<Node>, partitions: usize, parallel: bool) -> Result<Vec<T>> {
    let mut stages = chain.into_iter().peekable();

    let Some(Node::Source { payload, vec_ops }) = stages.next() else {
        bail!("plan must start with a Source node");
    };
    let total_len = vec_ops
        .len(payload.as_ref())
        .ok_or_else(|| anyhow!("source payload has an unexpected type"))?;
    let n = if parallel {
        partitions.min(total_len.max(1))
    } else {
        1
    };
    let mut current = vec_ops
        .split(payload.as_ref(), n)
        .ok_or_else(|| anyhow!("source payload has an unexpected type"))?;
    trace!(elements = total_len, partitions = current.len(), "source split");

    while let Some(node) = stages.next() {
        trace!(kind = node.kind(), partitions = current.len(), "stage");
        match node {
            Node::Stateless(first) => {
                // Collect contiguous stateless nodes and fuse them
                let mut ops = first;
                while let Some(Node::Stateless(more)) = stages.next_if(|s| matches!(s, Node::Stateless(_))) {
                    ops.extend(more);
                }
                current = for_each_partition(current, parallel, |chunk| fuse_stateless(&ops, chunk));
            }
            Node::GroupByKey { local, merge, out_ops } => {
                let locals = for_each_partition(current, parallel, |chunk| local(chunk));
                let merged = merge(locals);
                let groups = out_ops.len(merged.as_ref()).unwrap_or(0);
                current = resplit(out_ops.as_ref(), merged, n.min(groups.max(1)))?;
            }
            Node::Source { .. } => bail!("unexpected additional source in plan"),
        }
    }

    let mut out = Vec::<T>::new();
    for part in current {
        let v = *part.downcast::<Vec<T>>().map_err(|_| {
            anyhow!("terminal type mismatch: expected Vec<{}>", type_name::<T>())
        })?;
        out.extend(v);
    }
    Ok(out)
}

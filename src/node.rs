use crate::type_token::{Partition, VecOps};
use std::any::Any;
use std::sync::Arc;

/// A stateless, element-wise stage applied to one partition at a time.
pub trait DynOp: Send + Sync {
    fn apply(&self, input: Partition) -> Partition;
}

/// Per-partition local phase of the grouping barrier.
pub type LocalFn = Arc<dyn Fn(Partition) -> Partition + Send + Sync>;

/// Merge phase of the grouping barrier: all local outputs → one `Vec` partition.
pub type MergeFn = Arc<dyn Fn(Vec<Partition>) -> Partition + Send + Sync>;

#[derive(Clone)]
pub enum Node {
    /// Source vector plus the helpers needed to split it.
    Source {
        payload: Arc<dyn Any + Send + Sync>,
        vec_ops: Arc<dyn VecOps>,
    },

    /// Contiguous stateless ops; the runner fuses neighbouring `Stateless` nodes.
    Stateless(Vec<Arc<dyn DynOp>>),

    /// GroupByKey
    /// - `local`: Vec<(K, V)> → HashMap<K, Vec<V>>
    /// - `merge`: Vec<HashMap<K, Vec<V>>> → Vec<(K, Vec<V>)>
    /// - `out_ops`: splits the merged groups so downstream stages run per key in parallel
    GroupByKey {
        local: LocalFn,
        merge: MergeFn,
        out_ops: Arc<dyn VecOps>,
    },
}

impl Node {
    /// Short label used in execution logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Source { .. } => "source",
            Node::Stateless(_) => "stateless",
            Node::GroupByKey { .. } => "group_by_key",
        }
    }
}

use crate::collection::RFBound;
use crate::node::Node;
use crate::node_id::NodeId;
use crate::type_token::vec_ops_for;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Container for a computation graph.
///
/// Cloning a `Pipeline` is cheap and yields another handle on the same graph,
/// which is how every [`PCollection`](crate::PCollection) keeps a reference to it.
pub struct Pipeline {
    pub(crate) inner: Arc<Mutex<PipelineInner>>,
}

pub(crate) struct PipelineInner {
    next_id: u64,
    nodes: HashMap<NodeId, Node>,
    edges: Vec<(NodeId, NodeId)>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(PipelineInner {
                next_id: 0,
                nodes: HashMap::new(),
                edges: Vec::new(),
            })),
        }
    }
}

impl Clone for Pipeline {
    fn clone(&self) -> Self {
        Pipeline {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Pipeline {
    // Every mutation is a single insert/push, so a poisoned graph is still consistent.
    fn lock(&self) -> MutexGuard<'_, PipelineInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn insert_node(&self, node: Node) -> NodeId {
        let mut g = self.lock();
        let id = NodeId::new(g.next_id);
        g.next_id += 1;
        g.nodes.insert(id, node);
        id
    }

    pub(crate) fn connect(&self, from: NodeId, to: NodeId) {
        self.lock().edges.push((from, to));
    }

    pub(crate) fn add_source<T: RFBound>(&self, data: Vec<T>) -> NodeId {
        self.insert_node(Node::Source {
            payload: Arc::new(data),
            vec_ops: vec_ops_for::<T>(),
        })
    }

    /// Copy of the current graph (nodes are cheap `Arc` clones).
    pub fn snapshot(&self) -> (HashMap<NodeId, Node>, Vec<(NodeId, NodeId)>) {
        let g = self.lock();
        (g.nodes.clone(), g.edges.clone())
    }
}

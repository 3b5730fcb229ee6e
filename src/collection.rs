use crate::lifecycle::TaskScope;
use crate::node::DynOp;
use crate::pipeline::Pipeline;
use crate::node_id::NodeId;
use crate::type_token::Partition;
use serde::{Serialize, de::DeserializeOwned};
use std::collections::HashMap;
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Bound shared by every element type that flows through a pipeline.
pub trait RFBound: 'static + Send + Sync + Clone + Serialize + DeserializeOwned {}
impl<T> RFBound for T where T: 'static + Send + Sync + Clone + Serialize + DeserializeOwned {}

/// A lazily evaluated collection of `T`, identified by a node in its pipeline.
#[derive(Clone)]
pub struct PCollection<T> {
    pub(crate) pipeline: Pipeline,
    pub(crate) id: NodeId,
    pub(crate) _t: PhantomData<T>,
}

impl<T> PCollection<T> {
    pub(crate) fn attach(pipeline: Pipeline, id: NodeId) -> Self {
        PCollection {
            pipeline,
            id,
            _t: PhantomData,
        }
    }

    /// Node backing this collection.
    pub fn node_id(&self) -> NodeId {
        self.id
    }

    /// Pipeline this collection belongs to.
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }
}

/// Create a source collection from an in-memory vector.
pub fn from_vec<T>(p: &Pipeline, data: Vec<T>) -> PCollection<T>
where
    T: RFBound,
{
    let id = p.add_source(data);
    PCollection::attach(p.clone(), id)
}

/* ---- Stateless DynOps ---- */

pub(crate) struct MapOp<I, O, F>(pub F, pub PhantomData<(I, O)>);
impl<I, O, F> DynOp for MapOp<I, O, F>
where
    I: RFBound,
    O: RFBound,
    F: Send + Sync + Fn(&I) -> O + 'static,
{
    fn apply(&self, input: Partition) -> Partition {
        let v = *input.downcast::<Vec<I>>().expect("MapOp input");
        let out: Vec<O> = v.iter().map(|i| self.0(i)).collect();
        Box::new(out) as Partition
    }
}

pub(crate) struct FlatMapOp<I, O, F>(pub F, pub PhantomData<(I, O)>);
impl<I, O, F> DynOp for FlatMapOp<I, O, F>
where
    I: RFBound,
    O: RFBound,
    F: Send + Sync + Fn(&I) -> Vec<O> + 'static,
{
    fn apply(&self, input: Partition) -> Partition {
        let v = *input.downcast::<Vec<I>>().expect("FlatMapOp input");
        let mut out: Vec<O> = Vec::new();
        for i in &v {
            out.extend(self.0(i));
        }
        Box::new(out)
    }
}

/// Flat-map that opens a [`TaskScope`] around each partition batch.
pub(crate) struct ScopedFlatMapOp<I, O, F> {
    pub stage: String,
    pub f: F,
    pub _t: PhantomData<(I, O)>,
}
impl<I, O, F> DynOp for ScopedFlatMapOp<I, O, F>
where
    I: RFBound,
    O: RFBound,
    F: Send + Sync + Fn(&I) -> Vec<O> + 'static,
{
    fn apply(&self, input: Partition) -> Partition {
        let v = *input.downcast::<Vec<I>>().expect("ScopedFlatMapOp input");
        let scope = TaskScope::enter(&self.stage, v.len());
        let mut out: Vec<O> = Vec::new();
        for i in &v {
            out.extend((self.f)(i));
        }
        scope.finish(out.len());
        Box::new(out)
    }
}

/// Pass-through op that adds the partition length to a shared counter.
pub(crate) struct TallyOp<T>(pub Arc<AtomicU64>, pub PhantomData<T>);
impl<T: RFBound> DynOp for TallyOp<T> {
    fn apply(&self, input: Partition) -> Partition {
        let v = input.downcast::<Vec<T>>().expect("TallyOp input");
        self.0.fetch_add(v.len() as u64, Ordering::Relaxed);
        v
    }
}

/// Folds each key's values within one partition into a single value.
///
/// Keys are not merged across partitions; the next `group_by_key` still sees
/// one partial value per key and partition.
pub(crate) struct CombinePartialOp<K, V, A, C> {
    pub comb: Arc<C>,
    pub _t: PhantomData<(K, V, A)>,
}
impl<K, V, A, C> DynOp for CombinePartialOp<K, V, A, C>
where
    K: RFBound + Eq + Hash,
    V: RFBound,
    A: Send + Sync + 'static,
    C: CombineFn<V, A, V>,
{
    fn apply(&self, input: Partition) -> Partition {
        let kv = *input.downcast::<Vec<(K, V)>>().expect("CombinePartialOp input");
        let mut accs: HashMap<K, A> = HashMap::new();
        for (k, v) in kv {
            let acc = accs.entry(k).or_insert_with(|| self.comb.create());
            self.comb.add_input(acc, v);
        }
        let out: Vec<(K, V)> = accs
            .into_iter()
            .map(|(k, a)| (k, self.comb.finish(a)))
            .collect();
        Box::new(out)
    }
}

/* ---- Combiners ---- */

/// An associative aggregation over the values of one key.
///
/// `create` builds an empty accumulator, `add_input` folds one value in and
/// `finish` turns the accumulator into the output value. Since the result of
/// one fold may be folded again later, `O` must be a valid input.
pub trait CombineFn<V, A, O>: Send + Sync + 'static {
    fn create(&self) -> A;
    fn add_input(&self, acc: &mut A, v: V);
    fn finish(&self, acc: A) -> O;
}

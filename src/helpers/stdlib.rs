use crate::collection::{FlatMapOp, MapOp, TallyOp};
use crate::node::{DynOp, Node};
use crate::{ExecMode, PCollection, RFBound, Runner};
use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;

impl<T: RFBound> PCollection<T> {
    pub(crate) fn push_stateless<O>(self, op: Arc<dyn DynOp>) -> PCollection<O> {
        let id = self.pipeline.insert_node(Node::Stateless(vec![op]));
        self.pipeline.connect(self.id, id);
        PCollection::attach(self.pipeline, id)
    }

    pub fn map<O, F>(self, f: F) -> PCollection<O>
    where
        O: RFBound,
        F: 'static + Send + Sync + Fn(&T) -> O,
    {
        self.push_stateless(Arc::new(MapOp::<T, O, F>(f, PhantomData)))
    }

    pub fn flat_map<O, F>(self, f: F) -> PCollection<O>
    where
        O: RFBound,
        F: 'static + Send + Sync + Fn(&T) -> Vec<O>,
    {
        self.push_stateless(Arc::new(FlatMapOp::<T, O, F>(f, PhantomData)))
    }

    /// Pass elements through unchanged, adding how many went by to `counter`.
    ///
    /// The counter is only meaningful once the collection has been collected.
    pub fn tally(self, counter: Arc<AtomicU64>) -> PCollection<T> {
        self.push_stateless(Arc::new(TallyOp::<T>(counter, PhantomData)))
    }
}

impl<T: RFBound> PCollection<T> {
    pub fn collect(self) -> anyhow::Result<Vec<T>> {
        self.collect_seq()
    }

    pub fn collect_seq(self) -> anyhow::Result<Vec<T>> {
        self.collect_with(&Runner {
            mode: ExecMode::Sequential,
            ..Default::default()
        })
    }

    pub fn collect_par(
        self,
        threads: Option<usize>,
        partitions: Option<usize>,
    ) -> anyhow::Result<Vec<T>> {
        self.collect_with(&Runner {
            mode: ExecMode::Parallel {
                threads,
                partitions,
            },
            ..Default::default()
        })
    }

    /// Execute with an explicitly configured runner.
    pub fn collect_with(self, runner: &Runner) -> anyhow::Result<Vec<T>> {
        runner.run_collect::<T>(&self.pipeline, self.id)
    }
}

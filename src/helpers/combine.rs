use crate::collection::CombinePartialOp;
use crate::{CombineFn, PCollection, RFBound};
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::Arc;

impl<K: RFBound + Eq + Hash, V: RFBound> PCollection<(K, V)> {
    /// Pre-aggregate values per key inside each partition, before a shuffle.
    ///
    /// This is a stateless stage: it fuses with the stages around it, and a key
    /// that occurs in several partitions still comes out once per partition.
    /// Follow it with [`group_by_key`](PCollection::group_by_key) to finish the
    /// aggregation.
    ///
    /// ```
    /// use wordbeam::*;
    ///
    /// let p = Pipeline::default();
    /// let partial = from_vec(&p, vec![("a".to_string(), 1u64), ("a".to_string(), 2)])
    ///     .combine_partial(Sum::<u64>::new())
    ///     .collect_seq()?;
    /// assert_eq!(partial, vec![("a".to_string(), 3)]);
    /// # anyhow::Result::<()>::Ok(())
    /// ```
    pub fn combine_partial<C, A>(self, comb: C) -> PCollection<(K, V)>
    where
        C: CombineFn<V, A, V>,
        A: Send + Sync + 'static,
    {
        self.combine_partial_shared(Arc::new(comb))
    }

    pub(crate) fn combine_partial_shared<C, A>(self, comb: Arc<C>) -> PCollection<(K, V)>
    where
        C: CombineFn<V, A, V>,
        A: Send + Sync + 'static,
    {
        self.push_stateless(Arc::new(CombinePartialOp::<K, V, A, C> {
            comb,
            _t: PhantomData,
        }))
    }
}

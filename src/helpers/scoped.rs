//! Stateless transforms wrapped in a [`TaskScope`](crate::lifecycle::TaskScope).
//!
//! These behave exactly like [`PCollection::flat_map`] and [`PCollection::map`],
//! except that each partition batch is bracketed by the scope's setup/cleanup
//! logging. The user function itself still sees one element at a time.

use crate::collection::ScopedFlatMapOp;
use crate::{PCollection, RFBound};
use std::marker::PhantomData;
use std::sync::Arc;

impl<T: RFBound> PCollection<T> {
    /// Flat-map with a per-partition task scope named `stage`.
    pub fn flat_map_scoped<O, F>(self, stage: &str, f: F) -> PCollection<O>
    where
        O: RFBound,
        F: 'static + Send + Sync + Fn(&T) -> Vec<O>,
    {
        self.push_stateless(Arc::new(ScopedFlatMapOp::<T, O, F> {
            stage: stage.to_string(),
            f,
            _t: PhantomData,
        }))
    }

    /// One-to-one map with a per-partition task scope named `stage`.
    pub fn map_scoped<O, F>(self, stage: &str, f: F) -> PCollection<O>
    where
        O: RFBound,
        F: 'static + Send + Sync + Fn(&T) -> O,
    {
        self.flat_map_scoped(stage, move |t: &T| vec![f(t)])
    }
}

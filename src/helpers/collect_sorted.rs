//! Collect-and-sort helpers for [`PCollection`].
//!
//! Grouping and combining do not preserve any order, so sinks that need
//! reproducible output (files, snapshots, tests) sort after collecting.

use crate::{PCollection, RFBound, Runner};
use anyhow::Result;

impl<T: RFBound + Ord> PCollection<T> {
    /// Collect sequentially and sort.
    ///
    /// ```
    /// use wordbeam::*;
    ///
    /// let p = Pipeline::default();
    /// let data = from_vec(&p, vec![3, 1, 2]);
    /// assert_eq!(data.collect_seq_sorted().unwrap(), vec![1, 2, 3]);
    /// ```
    pub fn collect_seq_sorted(self) -> Result<Vec<T>> {
        let mut v = self.collect_seq()?;
        v.sort();
        Ok(v)
    }

    /// Collect in parallel and sort.
    ///
    /// # Errors
    /// Propagates any error from [`PCollection::collect_par`].
    pub fn collect_par_sorted(
        self,
        threads: Option<usize>,
        partitions: Option<usize>,
    ) -> Result<Vec<T>> {
        let mut v = self.collect_par(threads, partitions)?;
        v.sort();
        Ok(v)
    }

    /// Collect with `runner` and sort.
    pub fn collect_sorted_with(self, runner: &Runner) -> Result<Vec<T>> {
        let mut v = self.collect_with(runner)?;
        v.sort();
        Ok(v)
    }
}

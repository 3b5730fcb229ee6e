//! Built-in combiners for [`combine_partial`](crate::PCollection::combine_partial)
//! and [`MapReduceJob::with_combiner`](crate::MapReduceJob::with_combiner).

mod basic;

pub use basic::Sum;

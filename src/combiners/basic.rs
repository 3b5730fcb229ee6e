//! Arithmetic combiners.

use crate::RFBound;
use crate::collection::CombineFn;
use std::marker::PhantomData;
use std::mem::take;
use std::ops::Add;

/// Sum of values per key. No values sum to `T::default()`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sum<T>(PhantomData<T>);

impl<T> Sum<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> CombineFn<T, T, T> for Sum<T>
where
    T: RFBound + Add<Output = T> + Default,
{
    fn create(&self) -> T {
        T::default()
    }

    fn add_input(&self, acc: &mut T, v: T) {
        *acc = take(acc) + v;
    }

    fn finish(&self, acc: T) -> T {
        acc
    }
}

//! Type-erased partition buffers and vector helpers.
//!
//! Stages exchange data as [`Partition`]s: boxed `Vec<T>` values whose element
//! type is only known to the closures that built the stage. The runner still
//! needs to measure and split those vectors, which is what [`VecOps`] provides.
//! All operations return `None` when the dynamic type does not match.

use std::any::Any;
use std::marker::PhantomData;
use std::sync::Arc;

/// A partition buffer carried between stages at runtime.
pub type Partition = Box<dyn Any + Send + Sync>;

/// Type-erased helpers for `Vec<T>`.
pub trait VecOps: Send + Sync {
    /// Number of elements if `data` is a `Vec<T>`.
    fn len(&self, data: &dyn Any) -> Option<usize>;

    /// Split `data` into at most `n` contiguous partitions.
    ///
    /// Order is preserved inside each chunk. `n <= 1` or a tiny input yields a
    /// single chunk; an empty input still yields one (empty) chunk so every
    /// downstream stage runs at least once.
    fn split(&self, data: &dyn Any, n: usize) -> Option<Vec<Partition>>;
}

struct VecOpsImpl<T: Clone + Send + Sync + 'static>(PhantomData<T>);

impl<T: Clone + Send + Sync + 'static> VecOps for VecOpsImpl<T> {
    fn len(&self, data: &dyn Any) -> Option<usize> {
        data.downcast_ref::<Vec<T>>().map(Vec::len)
    }

    fn split(&self, data: &dyn Any, n: usize) -> Option<Vec<Partition>> {
        let v = data.downcast_ref::<Vec<T>>()?;
        Some(split_owned(v.clone(), n))
    }
}

/// Split an owned vector into at most `n` boxed contiguous chunks.
pub(crate) fn split_owned<T: Send + Sync + 'static>(v: Vec<T>, n: usize) -> Vec<Partition> {
    let len = v.len();
    if n <= 1 || len <= 1 {
        return vec![Box::new(v) as Partition];
    }

    let chunk = len.div_ceil(n);
    let mut out = Vec::with_capacity(n);
    let mut rest = v;
    while rest.len() > chunk {
        let tail = rest.split_off(chunk);
        out.push(Box::new(rest) as Partition);
        rest = tail;
    }
    out.push(Box::new(rest) as Partition);
    out
}

/// Create a type-erased `VecOps` for `Vec<T>`.
///
/// ```
/// use wordbeam::type_token::vec_ops_for;
/// use std::any::Any;
///
/// let ops = vec_ops_for::<i64>();
/// let data: Box<dyn Any + Send + Sync> = Box::new(vec![1i64, 2, 3]);
/// assert_eq!(ops.len(data.as_ref()), Some(3));
/// assert_eq!(ops.split(data.as_ref(), 2).map(|p| p.len()), Some(2));
/// ```
pub fn vec_ops_for<T: Clone + Send + Sync + 'static>() -> Arc<dyn VecOps> {
    Arc::new(VecOpsImpl::<T>(PhantomData))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk_lens(parts: Vec<Partition>) -> Vec<usize> {
        parts
            .into_iter()
            .map(|p| p.downcast::<Vec<u32>>().map(|v| v.len()).unwrap_or(usize::MAX))
            .collect()
    }

    #[test]
    fn split_owned_preserves_all_elements() {
        let parts = split_owned((0..10u32).collect::<Vec<_>>(), 3);
        assert_eq!(chunk_lens(parts), vec![4, 4, 2]);
    }

    #[test]
    fn split_owned_empty_input_yields_one_chunk() {
        let parts = split_owned(Vec::<u32>::new(), 8);
        assert_eq!(chunk_lens(parts), vec![0]);
    }

    #[test]
    fn vec_ops_rejects_wrong_type() {
        let ops = vec_ops_for::<u32>();
        let data: Partition = Box::new(vec!["x".to_string()]);
        assert!(ops.len(data.as_ref()).is_none());
        assert!(ops.split(data.as_ref(), 2).is_none());
    }
}

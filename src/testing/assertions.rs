//! Assertions for comparing collected pipeline output with expectations.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Assert that two collections are equal in order and content.
///
/// # Panics
/// The collections differ in length or at some index.
///
/// ```
/// use wordbeam::testing::assert_collections_equal;
///
/// assert_collections_equal(&[1, 2, 3], &[1, 2, 3]);
/// ```
pub fn assert_collections_equal<T: Debug + PartialEq>(actual: &[T], expected: &[T]) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "Collection length mismatch:\n  Expected length: {}\n  Actual length: {}\n  Expected: {expected:?}\n  Actual: {actual:?}",
        expected.len(),
        actual.len()
    );

    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        assert_eq!(
            a, e,
            "Collection mismatch at index {i}:\n  Expected: {e:?}\n  Actual: {a:?}\n  Full expected: {expected:?}\n  Full actual: {actual:?}"
        );
    }
}

fn multiplicities<T: Eq + Hash>(items: &[T]) -> HashMap<&T, usize> {
    let mut m = HashMap::new();
    for item in items {
        *m.entry(item).or_insert(0) += 1;
    }
    m
}

/// Assert that two collections hold the same elements with the same
/// multiplicities, ignoring order.
///
/// # Panics
/// Some element occurs a different number of times in each collection.
///
/// ```
/// use wordbeam::testing::assert_collections_unordered_equal;
///
/// assert_collections_unordered_equal(&["b", "a", "a"], &["a", "b", "a"]);
/// ```
pub fn assert_collections_unordered_equal<T: Debug + Eq + Hash>(actual: &[T], expected: &[T]) {
    let actual_counts = multiplicities(actual);
    let expected_counts = multiplicities(expected);

    if actual_counts != expected_counts {
        let missing: Vec<_> = expected_counts
            .iter()
            .filter(|(item, n)| actual_counts.get(*item).copied().unwrap_or(0) < **n)
            .map(|(item, _)| *item)
            .collect();
        let extra: Vec<_> = actual_counts
            .iter()
            .filter(|(item, n)| expected_counts.get(*item).copied().unwrap_or(0) < **n)
            .map(|(item, _)| *item)
            .collect();

        panic!(
            "Collection content mismatch:\n  Missing elements: {missing:?}\n  Extra elements: {extra:?}\n  Expected: {expected:?}\n  Actual: {actual:?}"
        );
    }
}

/// Assert that two key-value collections are equal after sorting by key.
///
/// # Panics
/// The collections differ after sorting.
///
/// ```
/// use wordbeam::testing::assert_kv_collections_equal;
///
/// assert_kv_collections_equal(vec![("b", 2), ("a", 1)], vec![("a", 1), ("b", 2)]);
/// ```
pub fn assert_kv_collections_equal<K, V>(mut actual: Vec<(K, V)>, mut expected: Vec<(K, V)>)
where
    K: Debug + Ord,
    V: Debug + PartialEq,
{
    actual.sort_by(|a, b| a.0.cmp(&b.0));
    expected.sort_by(|a, b| a.0.cmp(&b.0));

    assert_eq!(
        actual.len(),
        expected.len(),
        "Collection length mismatch:\n  Expected length: {}\n  Actual length: {}\n  Expected: {expected:?}\n  Actual: {actual:?}",
        expected.len(),
        actual.len()
    );

    for (i, ((ak, av), (ek, ev))) in actual.iter().zip(expected.iter()).enumerate() {
        assert!(
            !(ak != ek || av != ev),
            "Collection mismatch at index {i} after sorting:\n  Expected: ({ek:?}, {ev:?})\n  Actual: ({ak:?}, {av:?})\n  Full expected: {expected:?}\n  Full actual: {actual:?}"
        );
    }
}

/// Assert that two grouped collections are equal.
///
/// Groups are matched by key; values inside a group are compared as
/// multisets, since grouping does not order them.
///
/// # Panics
/// The collections differ in keys, or some group differs in its values.
///
/// ```
/// use wordbeam::testing::assert_grouped_kv_equal;
///
/// let actual = vec![("a", vec![1, 2, 1]), ("b", vec![3])];
/// let expected = vec![("b", vec![3]), ("a", vec![1, 1, 2])];
/// assert_grouped_kv_equal(actual, expected);
/// ```
pub fn assert_grouped_kv_equal<K, V>(mut actual: Vec<(K, Vec<V>)>, mut expected: Vec<(K, Vec<V>)>)
where
    K: Debug + Ord,
    V: Debug + Ord,
{
    for (_, vs) in actual.iter_mut().chain(expected.iter_mut()) {
        vs.sort();
    }
    assert_kv_collections_equal(actual, expected);
}

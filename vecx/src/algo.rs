//! Free-standing sequence algorithms

use crate::{Storage, Vector};
use std::cmp::Ordering;

/// Remove every element equal to `value`. Returns how many were removed.
pub fn erase_value<T: PartialEq, S: Storage<T>>(v: &mut Vector<T, S>, value: &T) -> usize {
    v.retain(|x| x != value)
}

/// Remove every element matching `pred`. Returns how many were removed.
pub fn erase_if<T, S: Storage<T>>(v: &mut Vector<T, S>, mut pred: impl FnMut(&T) -> bool) -> usize {
    v.retain(|x| !pred(x))
}

/// Sort, then drop duplicates, leaving each distinct value once in
/// ascending order.
pub fn unique_sort<T: Ord, S: Storage<T>>(v: &mut Vector<T, S>) {
    v.sort();
    v.dedup();
}

/// [`unique_sort`] under a custom ordering; elements comparing
/// [`Ordering::Equal`] count as duplicates.
pub fn unique_sort_by<T, S: Storage<T>>(
    v: &mut Vector<T, S>,
    mut cmp: impl FnMut(&T, &T) -> Ordering,
) {
    v.sort_by(&mut cmp);
    v.dedup_by(|a, b| cmp(a, b) == Ordering::Equal);
}

//! A top-down merge sort. This is what a [`Tree`][crate::tree::Tree] uses to order its keys
//! before building itself, both at construction and when it rebuilds during a rebalance.
//!
//! # Examples
//!
//! ```
//! use rebuild_bst::sort::merge_sort;
//!
//! assert_eq!(merge_sort(vec![105, 79, 100, 110]), vec![79, 100, 105, 110]);
//! assert_eq!(merge_sort(Vec::<i32>::new()), Vec::<i32>::new());
//! ```

use std::cmp::Ordering;

/// Sorts `items` in ascending order. See [`merge_sort_by`].
pub fn merge_sort<T>(items: Vec<T>) -> Vec<T>
where
    T: Ord,
{
    merge_sort_by(items, T::cmp)
}

/// Sorts `items` with the given comparator by splitting the sequence at its midpoint, sorting
/// each half and merging them back together. Runs in `O(n lg n)`.
///
/// The sort is stable: when the comparator reports two elements as equal, the one from the left
/// half is taken first.
///
/// # Examples
///
/// ```
/// use rebuild_bst::sort::merge_sort_by;
///
/// let sorted = merge_sort_by(vec![(1u8, 'a'), (0, 'b'), (1, 'c')], |l, r| l.0.cmp(&r.0));
/// assert_eq!(sorted, vec![(0, 'b'), (1, 'a'), (1, 'c')]);
/// ```
pub fn merge_sort_by<T, F>(items: Vec<T>, mut compare: F) -> Vec<T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    sort_range(items, &mut compare)
}

fn sort_range<T, F>(mut items: Vec<T>, compare: &mut F) -> Vec<T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    // Empty and single element sequences are already sorted.
    if items.len() <= 1 {
        return items;
    }

    // The left half gets the extra element of an odd length sequence.
    let right = items.split_off((items.len() + 1) / 2);
    let left = sort_range(items, compare);
    let right = sort_range(right, compare);
    merge(left, right, compare)
}

/// Merges two sorted sequences into one, repeatedly taking the smaller front element.
fn merge<T, F>(left: Vec<T>, right: Vec<T>, compare: &mut F) -> Vec<T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();

    while let (Some(l), Some(r)) = (left.peek(), right.peek()) {
        let next = match compare(l, r) {
            Ordering::Less | Ordering::Equal => left.next(),
            Ordering::Greater => right.next(),
        };
        merged.extend(next);
    }
    merged.extend(left);
    merged.extend(right);

    merged
}

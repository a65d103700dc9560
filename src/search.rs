//
// Copyright (c) 2025 Nathan Fiedler
//

//! Binary search over a sorted [`Sequence`].
//!
//! Both searches evaluate positions as signed 64-bit values so they work for
//! sequences longer than `i32::MAX`. A result that does not name a position
//! within the sequence is returned as the bitwise complement of the length,
//! which is always negative.

use crate::Sequence;

/// Index of the first element that is not less than `target`.
///
/// If equal elements exist this is the leftmost of them. Returns `!len` when
/// `target` is greater than every element (including when the sequence is
/// empty).
pub fn search_first_not_less<S>(seq: &S, target: &S::Item) -> i64
where
    S: Sequence + ?Sized,
    S::Item: Ord,
{
    partition_point(seq, |element| element < target)
}

/// Index just past the last element that is not greater than `target`, the
/// insertion point that places a new element after all of its equals.
///
/// Returns `!len` when no element is greater than `target`.
pub fn search_first_greater<S>(seq: &S, target: &S::Item) -> i64
where
    S: Sequence + ?Sized,
    S::Item: Ord,
{
    partition_point(seq, |element| element <= target)
}

/// Binary search for the first position at which `before` turns false,
/// assuming it holds for some prefix of the sequence and for nothing after.
fn partition_point<S, F>(seq: &S, before: F) -> i64
where
    S: Sequence + ?Sized,
    F: Fn(&S::Item) -> bool,
{
    let size = i64::try_from(seq.len()).unwrap_or(i64::MAX);
    let mut low: i64 = 0;
    let mut high: i64 = size - 1;
    while low <= high {
        // both bounds are non-negative so the midpoint cannot overflow
        let mid = low + ((high - low) >> 1);
        match seq.get(mid as u64) {
            Some(element) if before(element) => low = mid + 1,
            _ => high = mid - 1,
        }
    }
    if low == size { !size } else { low }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DynamicList;

    fn sorted(values: &[u32]) -> DynamicList<u32> {
        values.iter().copied().collect()
    }

    #[test]
    fn test_search_empty() {
        let sut: DynamicList<u32> = DynamicList::new();
        assert_eq!(search_first_not_less(&sut, &5), !0);
        assert_eq!(search_first_greater(&sut, &5), !0);
    }

    #[test]
    fn test_search_first_not_less() {
        let sut = sorted(&[1, 3, 3, 3, 5, 7, 9]);
        assert_eq!(search_first_not_less(&sut, &0), 0);
        assert_eq!(search_first_not_less(&sut, &1), 0);
        assert_eq!(search_first_not_less(&sut, &3), 1);
        assert_eq!(search_first_not_less(&sut, &4), 4);
        assert_eq!(search_first_not_less(&sut, &9), 6);
        assert_eq!(search_first_not_less(&sut, &10), !7);
    }

    #[test]
    fn test_search_first_greater() {
        let sut = sorted(&[1, 3, 3, 3, 5, 7, 9]);
        assert_eq!(search_first_greater(&sut, &0), 0);
        assert_eq!(search_first_greater(&sut, &1), 1);
        assert_eq!(search_first_greater(&sut, &3), 4);
        assert_eq!(search_first_greater(&sut, &4), 4);
        assert_eq!(search_first_greater(&sut, &8), 6);
        assert_eq!(search_first_greater(&sut, &9), !7);
    }

    #[test]
    fn test_search_matches_slice_partition_point() {
        let mut values: Vec<u32> = (0..5000).map(|_| rand::random_range(0..1000)).collect();
        values.sort_unstable();
        let sut = sorted(&values);
        for target in 0..1001 {
            let expected = values.partition_point(|v| *v < target) as i64;
            let actual = search_first_not_less(&sut, &target);
            if expected == 5000 {
                assert_eq!(actual, !5000);
            } else {
                assert_eq!(actual, expected);
            }
            let expected = values.partition_point(|v| *v <= target) as i64;
            let actual = search_first_greater(&sut, &target);
            if expected == 5000 {
                assert_eq!(actual, !5000);
            } else {
                assert_eq!(actual, expected);
            }
        }
    }
}

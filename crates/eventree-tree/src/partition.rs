//! In-place two-pointer partition of a node's frame indices.

/// Reorder `items` so every item satisfying `is_lower` precedes every item
/// that does not. Returns the number of lower items.
///
/// Hoare-style: scans from both ends and swaps misplaced pairs, without
/// allocating. Relative order within each side is not preserved.
pub(crate) fn partition_in_place<T, E>(
    items: &mut [T],
    mut is_lower: impl FnMut(&T) -> Result<bool, E>,
) -> Result<usize, E> {
    let mut lo = 0;
    let mut hi = items.len();
    loop {
        while lo < hi && is_lower(&items[lo])? {
            lo += 1;
        }
        while lo < hi && !is_lower(&items[hi - 1])? {
            hi -= 1;
        }
        if lo >= hi {
            return Ok(lo);
        }
        // items[lo] belongs high, items[hi - 1] belongs low.
        items.swap(lo, hi - 1);
        lo += 1;
        hi -= 1;
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use super::partition_in_place;

    fn partition_below(items: &mut [i64], threshold: i64) -> usize {
        partition_in_place(items, |&v| Ok::<_, Infallible>(v < threshold)).unwrap()
    }

    #[test]
    fn mixed_values() {
        let mut items = vec![7, 1, 9, 3, 8, 2, 6];
        let mid = partition_below(&mut items, 5);
        assert_eq!(mid, 3);
        assert!(items[..mid].iter().all(|&v| v < 5));
        assert!(items[mid..].iter().all(|&v| v >= 5));
    }

    #[test]
    fn preserves_multiset() {
        let original = vec![4, 4, 0, 9, 2, 4, 7, 1, 4];
        let mut items = original.clone();
        let mid = partition_below(&mut items, 4);
        assert_eq!(mid, 3);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        let mut expected = original;
        expected.sort_unstable();
        assert_eq!(sorted, expected);
    }

    #[test]
    fn all_lower_or_all_high() {
        let mut items = vec![1, 2, 3];
        assert_eq!(partition_below(&mut items, 10), 3);
        assert_eq!(items, vec![1, 2, 3]);
        assert_eq!(partition_below(&mut items, 0), 0);
        assert_eq!(items, vec![1, 2, 3]);
    }

    #[test]
    fn empty_slice() {
        let mut items: Vec<i64> = Vec::new();
        assert_eq!(partition_below(&mut items, 0), 0);
    }

    #[test]
    fn predicate_error_propagates() {
        let mut items = vec![1, 2, 3];
        let result = partition_in_place(&mut items, |&v| if v == 2 { Err("bad") } else { Ok(true) });
        assert_eq!(result, Err("bad"));
    }
}

//! Set operations over sorted position lists.
//!
//! Index lookups produce ascending lists of `i64` positions; these helpers
//! combine them in a single linear pass. Inputs must already be sorted
//! ascending (see [`sort`]). Unsorted input is not detected and yields an
//! unspecified, but complete, result.
//!
//! An element present in both inputs counts once per matching pair, while
//! repeats inside a single input are kept. In multiset terms, [`union`]
//! keeps the larger multiplicity of each value and [`intersect`] the
//! smaller.

/// Sorts positions ascending in place.
pub fn sort(positions: &mut [i64]) {
    positions.sort_unstable();
}

/// Returns true if `positions` is ascending.
pub fn is_sorted(positions: &[i64]) -> bool {
    positions.windows(2).all(|w| w[0] <= w[1])
}

/// Returns the sorted union of two sorted lists.
///
/// ```
/// use steno_base::positions::union;
///
/// assert_eq!(union(&[1, 3, 5], &[2, 3, 4]), vec![1, 2, 3, 4, 5]);
/// ```
pub fn union(a: &[i64], b: &[i64]) -> Vec<i64> {
    let mut out = Vec::with_capacity(a.len() + b.len() / 2);
    let mut ib = 0;
    for &pos in a {
        while ib < b.len() && b[ib] < pos {
            out.push(b[ib]);
            ib += 1;
        }
        if ib < b.len() && b[ib] == pos {
            ib += 1;
        }
        out.push(pos);
    }
    out.extend_from_slice(&b[ib..]);
    out
}

/// Returns the sorted intersection of two sorted lists.
///
/// ```
/// use steno_base::positions::intersect;
///
/// assert_eq!(intersect(&[1, 3, 5], &[2, 3, 4]), vec![3]);
/// ```
pub fn intersect(a: &[i64], b: &[i64]) -> Vec<i64> {
    let mut out = Vec::with_capacity(a.len() / 2);
    let mut ib = 0;
    for &pos in a {
        while ib < b.len() && b[ib] < pos {
            ib += 1;
        }
        if ib < b.len() && b[ib] == pos {
            out.push(pos);
            ib += 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sorted_list() -> impl Strategy<Value = Vec<i64>> {
        prop::collection::vec(-50i64..50, 0..40).prop_map(|mut v| {
            sort(&mut v);
            v
        })
    }

    fn distinct_sorted_list() -> impl Strategy<Value = Vec<i64>> {
        prop::collection::btree_set(-50i64..50, 0..40).prop_map(|s| s.into_iter().collect())
    }

    #[test]
    fn union_and_intersect_example() {
        assert_eq!(union(&[1, 3, 5], &[2, 3, 4]), vec![1, 2, 3, 4, 5]);
        assert_eq!(intersect(&[1, 3, 5], &[2, 3, 4]), vec![3]);
    }

    #[test]
    fn empty_inputs() {
        assert_eq!(union(&[], &[1, 2]), vec![1, 2]);
        assert_eq!(union(&[1, 2], &[]), vec![1, 2]);
        assert!(intersect(&[], &[1, 2]).is_empty());
        assert!(intersect(&[1, 2], &[]).is_empty());
    }

    #[test]
    fn repeats_within_one_input_are_kept() {
        assert_eq!(union(&[1, 1, 2], &[1]), vec![1, 1, 2]);
        assert_eq!(union(&[1], &[1, 1]), vec![1, 1]);
        assert_eq!(intersect(&[1, 1, 2], &[1, 2]), vec![1, 2]);
        assert_eq!(intersect(&[1, 1], &[1, 1, 1]), vec![1, 1]);
    }

    #[test]
    fn sort_establishes_precondition() {
        let mut positions = vec![9, -3, 4, 4, 0];
        assert!(!is_sorted(&positions));
        sort(&mut positions);
        assert_eq!(positions, vec![-3, 0, 4, 4, 9]);
        assert!(is_sorted(&positions));
    }

    proptest! {
        #[test]
        fn outputs_are_sorted(a in sorted_list(), b in sorted_list()) {
            prop_assert!(is_sorted(&union(&a, &b)));
            prop_assert!(is_sorted(&intersect(&a, &b)));
        }

        #[test]
        fn union_is_commutative(a in sorted_list(), b in sorted_list()) {
            prop_assert_eq!(union(&a, &b), union(&b, &a));
        }

        #[test]
        fn intersect_is_commutative(a in sorted_list(), b in sorted_list()) {
            prop_assert_eq!(intersect(&a, &b), intersect(&b, &a));
        }

        #[test]
        fn self_union_and_intersect_are_identity(a in sorted_list()) {
            prop_assert_eq!(union(&a, &a), a.clone());
            prop_assert_eq!(intersect(&a, &a), a);
        }

        #[test]
        fn sizes_add_up(a in sorted_list(), b in sorted_list()) {
            let u = union(&a, &b);
            let i = intersect(&a, &b);
            prop_assert_eq!(u.len() + i.len(), a.len() + b.len());
            for pos in &i {
                prop_assert!(u.binary_search(pos).is_ok());
            }
        }

        #[test]
        fn distinct_inputs_match_set_semantics(
            a in distinct_sorted_list(),
            b in distinct_sorted_list(),
        ) {
            use std::collections::BTreeSet;
            let sa: BTreeSet<i64> = a.iter().copied().collect();
            let sb: BTreeSet<i64> = b.iter().copied().collect();

            let expected_union: Vec<i64> = sa.union(&sb).copied().collect();
            let expected_intersect: Vec<i64> = sa.intersection(&sb).copied().collect();
            prop_assert_eq!(union(&a, &b), expected_union);
            prop_assert_eq!(intersect(&a, &b), expected_intersect);
        }
    }
}

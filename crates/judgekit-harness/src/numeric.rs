//! Small numeric and collection helpers for test bodies.

use std::fmt::{Display, Write as _};
use std::hash::Hash;
use std::ops::Add;

use indexmap::IndexSet;

/// `|value - answer| / |answer|`, or the absolute difference when
/// `answer` is zero.
///
/// # Panics
///
/// Panics if `answer` is NaN or infinite. A non-finite `value` yields a
/// non-finite difference, which fails any tolerance check.
#[track_caller]
pub fn relative_difference(value: f64, answer: f64) -> f64 {
    assert!(answer.is_finite(), "reference answer must be finite, got {answer}");
    let diff = (value - answer).abs();
    if answer.abs() > 0.0 {
        diff / answer.abs()
    } else {
        diff
    }
}

/// Assert that two `f64` values agree to within a relative `eps`.
///
/// The check passes when [`relative_difference`] is at most `2 * eps`.
///
/// ```
/// judgekit_harness::assert_near_rel!(1.0000001, 1.0, 1e-6);
/// ```
#[macro_export]
macro_rules! assert_near_rel {
    ($value:expr, $answer:expr, $eps:expr $(,)?) => {{
        let (value, answer, eps): (f64, f64, f64) = ($value, $answer, $eps);
        let diff = $crate::relative_difference(value, answer);
        assert!(
            diff <= 2.0 * eps,
            "relative difference {} between {} and {} exceeds {}",
            diff,
            value,
            answer,
            2.0 * eps
        );
    }};
}

/// Remainder of `x / m` shifted into `[0, |m|)` for positive `m`.
///
/// # Panics
///
/// Panics if `m` is zero.
pub fn get_by_module(x: i64, m: i64) -> i64 {
    let r = x % m;
    if r < 0 {
        r + m
    } else {
        r
    }
}

/// Distinct values in order of first occurrence.
pub fn unique<T, I>(values: I) -> Vec<T>
where
    T: Hash + Eq,
    I: IntoIterator<Item = T>,
{
    values.into_iter().collect::<IndexSet<T>>().into_iter().collect()
}

/// The values in ascending order.
pub fn sorted<T, I>(values: I) -> Vec<T>
where
    T: Ord,
    I: IntoIterator<Item = T>,
{
    let mut result: Vec<T> = values.into_iter().collect();
    result.sort();
    result
}

/// `size` consecutive values starting at `first`.
pub fn sequence<T>(size: usize, first: T) -> Vec<T>
where
    T: Copy + Add<Output = T> + From<u8>,
{
    let one = T::from(1);
    let mut result = Vec::with_capacity(size);
    let mut next = first;
    for i in 0..size {
        result.push(next);
        if i + 1 < size {
            next = next + one;
        }
    }
    result
}

/// `{a, b, c}`.
pub fn format_list<T: Display>(values: &[T]) -> String {
    let mut out = String::from("{");
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{v}");
    }
    out.push('}');
    out
}

/// `{{a, b},\n {c, d}}`.
pub fn format_grid<T, Row>(rows: &[Row]) -> String
where
    T: Display,
    Row: AsRef<[T]>,
{
    let mut out = String::from("{");
    for (i, row) in rows.iter().enumerate() {
        if i > 0 {
            out.push_str(",\n ");
        }
        out.push_str(&format_list(row.as_ref()));
    }
    out.push('}');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panics::catch_panic;

    #[test]
    fn relative_difference_scales_by_answer() {
        assert_eq!(relative_difference(110.0, 100.0), 0.1);
        assert_eq!(relative_difference(-3.0, 0.0), 3.0);
        assert_eq!(relative_difference(5.0, 5.0), 0.0);
    }

    #[test]
    fn non_finite_answer_is_rejected() {
        assert!(catch_panic(|| relative_difference(1.0, f64::NAN)).is_err());
        assert!(catch_panic(|| relative_difference(1.0, f64::INFINITY)).is_err());
        assert!(relative_difference(f64::NAN, 1.0).is_nan());
    }

    #[test]
    fn near_rel_uses_twice_epsilon() {
        assert_near_rel!(1.0 + 1.5e-6, 1.0, 1e-6);
        assert!(catch_panic(|| assert_near_rel!(1.0 + 3e-6, 1.0, 1e-6)).is_err());
        assert!(catch_panic(|| assert_near_rel!(f64::NAN, 1.0, 1e-6)).is_err());
    }

    #[test]
    fn module_is_non_negative() {
        assert_eq!(get_by_module(7, 3), 1);
        assert_eq!(get_by_module(-7, 3), 2);
        assert_eq!(get_by_module(-6, 3), 0);
        assert_eq!(get_by_module(i64::MIN, 10), 2);
    }

    #[test]
    fn unique_keeps_first_occurrence_order() {
        assert_eq!(unique(vec![3, 1, 3, 2, 1, 5]), vec![3, 1, 2, 5]);
        assert_eq!(unique(Vec::<i32>::new()), Vec::<i32>::new());
    }

    #[test]
    fn sorted_and_sequence() {
        assert_eq!(sorted([5, -1, 3]), vec![-1, 3, 5]);
        assert_eq!(sequence(4, 10i64), vec![10, 11, 12, 13]);
        assert_eq!(sequence(0, 1u32), Vec::<u32>::new());
        assert_eq!(sequence(1, u64::MAX), vec![u64::MAX]);
    }

    #[test]
    fn list_and_grid_formatting() {
        assert_eq!(format_list::<i32>(&[]), "{}");
        assert_eq!(format_list(&[1, 2, 3]), "{1, 2, 3}");
        assert_eq!(format_grid::<i32, _>(&[vec![1, 2], vec![3, 4]]), "{{1, 2},\n {3, 4}}");
        assert_eq!(format_grid::<u8, Vec<u8>>(&[]), "{}");
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn module_lands_in_range(x in any::<i64>(), m in 1i64..1_000_000) {
                let r = get_by_module(x, m);
                prop_assert!((0..m).contains(&r));
                prop_assert_eq!(r, x.rem_euclid(m));
            }

            #[test]
            fn unique_is_a_deduplicated_prefix_walk(v in prop::collection::vec(0u8..16, 0..64)) {
                let u = unique(v.clone());
                let mut seen = std::collections::HashSet::new();
                let expected: Vec<u8> = v.into_iter().filter(|x| seen.insert(*x)).collect();
                prop_assert_eq!(u, expected);
            }
        }
    }
}

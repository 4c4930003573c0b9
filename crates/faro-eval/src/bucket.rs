//! Equal-population quantile bucketing with a first-occurrence tie-break.
//!
//! Values are ranked `1..=n` with ties broken by position, so every rank is
//! distinct. Ranks are then cut into `q` right-closed intervals with edges at
//! `1 + j * (n - 1) / q`, the lowest interval also closed on the left. Bucket
//! `0` holds the lowest values and bucket `q - 1` the highest.

/// 1-based ranks with ties broken by first occurrence.
///
/// # Example
///
/// ```
/// use faro_eval::bucket::stable_ranks;
///
/// assert_eq!(stable_ranks(&[0.5, 0.1, 0.5, 0.3]), vec![3, 1, 4, 2]);
/// ```
pub fn stable_ranks(values: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    // `sort_by` is stable, so equal values keep their input order.
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0; values.len()];
    for (rank, &idx) in order.iter().enumerate() {
        ranks[idx] = rank + 1;
    }
    ranks
}

/// Bucket of a 1-based `rank` among `n` distinct ranks cut into `q` buckets.
pub const fn bucket_of_rank(rank: usize, n: usize, q: usize) -> usize {
    if n <= 1 || rank <= 1 {
        return 0;
    }
    // ceil(q * (rank - 1) / (n - 1)) - 1, in exact integer arithmetic.
    let span = n - 1;
    (q * (rank - 1)).div_ceil(span) - 1
}

/// Bucket index of every value.
///
/// # Example
///
/// ```
/// use faro_eval::bucket::quantile_buckets;
///
/// assert_eq!(quantile_buckets(&[2.0, 1.0], 2), vec![1, 0]);
/// assert_eq!(
///     quantile_buckets(&[6.0, 5.0, 4.0, 3.0, 2.0, 1.0], 3),
///     vec![2, 2, 1, 1, 0, 0]
/// );
/// ```
pub fn quantile_buckets(values: &[f64], q: usize) -> Vec<usize> {
    let n = values.len();
    stable_ranks(values)
        .into_iter()
        .map(|rank| bucket_of_rank(rank, n, q))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_ties_keep_input_order() {
        let buckets = quantile_buckets(&[1.0, 1.0, 1.0, 1.0], 2);
        assert_eq!(buckets, vec![0, 0, 1, 1]);
    }

    #[rstest]
    #[case(10, 5)]
    #[case(30, 5)]
    #[case(100, 10)]
    #[case(12, 4)]
    fn test_divisible_populations_are_equal(#[case] n: usize, #[case] q: usize) {
        let values: Vec<f64> = (0..n).map(|i| ((i * 7919) % n) as f64).collect();
        let buckets = quantile_buckets(&values, q);
        for b in 0..q {
            assert_eq!(buckets.iter().filter(|&&x| x == b).count(), n / q);
        }
    }

    #[rstest]
    #[case(7, 5, vec![0, 0, 1, 2, 3, 4, 4])]
    #[case(5, 5, vec![0, 1, 2, 3, 4])]
    #[case(3, 5, vec![0, 2, 4])]
    fn test_uneven_populations(#[case] n: usize, #[case] q: usize, #[case] expected: Vec<usize>) {
        let values: Vec<f64> = (0..n).map(|i| i as f64).collect();
        assert_eq!(quantile_buckets(&values, q), expected);
    }

    #[test]
    fn test_single_value() {
        assert_eq!(quantile_buckets(&[3.0], 5), vec![0]);
        assert!(quantile_buckets(&[], 5).is_empty());
    }
}

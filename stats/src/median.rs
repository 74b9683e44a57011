use num_traits::ToPrimitive;

/// Median of an already sorted slice. For an even number of items this is
/// the mean of the two middle items, so the result is always an `f64`.
///
/// Returns `None` for an empty slice; the caller decides what an undefined
/// median means.
pub fn median_of_sorted<T: ToPrimitive>(xs: &[T]) -> Option<f64> {
    let n = xs.len();
    if n == 0 {
        None
    } else if n % 2 == 0 {
        let i = n / 2;
        Some((xs[i - 1].to_f64()? + xs[i].to_f64()?) / 2.0)
    } else {
        xs[n / 2].to_f64()
    }
}

/// Median of an unordered collection of values.
///
/// ```rust
/// assert_eq!(stats::median(vec![30u64, 10, 20]), Some(20.0));
/// assert_eq!(stats::median(Vec::<u64>::new()), None);
/// ```
pub fn median<T, I>(items: I) -> Option<f64>
where
    T: ToPrimitive + Ord,
    I: IntoIterator<Item = T>,
{
    let mut xs: Vec<T> = items.into_iter().collect();
    xs.sort_unstable();
    median_of_sorted(&xs)
}

//! `PercentMetric`, the ratio of two read counts, used for the read
//! classification fractions.
#![deny(missing_docs)]

use crate::{CountMetric, Metric};
use serde::{Deserialize, Serialize};

/// A fraction with numerator and denominator kept as separate counts, so
/// that shards merge exactly.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PercentMetric {
    /// Numerator
    pub numerator: CountMetric,
    /// Denominator
    pub denominator: CountMetric,
}

impl Metric for PercentMetric {
    fn merge(&mut self, other: Self) {
        self.numerator.merge(other.numerator);
        self.denominator.merge(other.denominator);
    }
}

impl PercentMetric {
    /// Generate a `PercentMetric` from a numerator and a denominator
    ///
    /// # Example
    /// ```rust
    /// use metric::{Metric, PercentMetric};
    /// let mut c1 = PercentMetric::from_parts(4, 5);
    /// c1.merge(PercentMetric::from_parts(0, 5));
    /// assert!(c1 == PercentMetric::from_parts(4, 10));
    /// ```
    pub fn from_parts<T>(num: T, den: T) -> Self
    where
        T: Into<CountMetric>,
    {
        PercentMetric {
            numerator: num.into(),
            denominator: den.into(),
        }
    }

    /// Return the fraction as an `Option`. It is `None` if the denominator is zero
    ///
    /// # Example
    /// ```rust
    /// use metric::PercentMetric;
    /// assert!(PercentMetric::from_parts(0, 0).fraction().is_none());
    /// assert!(PercentMetric::from_parts(3, 4).fraction() == Some(0.75f64));
    /// ```
    pub fn fraction(&self) -> Option<f64> {
        if self.denominator.count == 0 {
            None
        } else {
            Some((self.numerator.count as f64) / (self.denominator.count as f64))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::arbitrary::any;
    use std::cmp::{max, min};

    #[test]
    fn test_merge_percent_metric() {
        let mut p1 = PercentMetric::from_parts(4, 5);
        p1.merge(PercentMetric::from_parts(0, 0));
        assert_eq!(p1.fraction(), Some(0.8));
        p1.merge(PercentMetric::from_parts(3, 4));
        assert_eq!(p1, PercentMetric::from_parts(7, 9));
    }

    proptest::proptest! {
        #[test]
        fn prop_test_percent_metric_merge(
            x1 in any::<u32>(),
            x2 in any::<u32>(),
            y1 in any::<u32>(),
            y2 in any::<u32>()
        ) {
            let mut p_x = PercentMetric::from_parts(min(x1, x2), max(x1, x2));
            let p_y = PercentMetric::from_parts(min(y1, y2), max(y1, y2));
            let p_total = PercentMetric::from_parts(
                i64::from(min(x1, x2)) + i64::from(min(y1, y2)),
                i64::from(max(x1, x2)) + i64::from(max(y1, y2)),
            );
            p_x.merge(p_y);
            assert_eq!(p_total, p_x);
        }
    }
}

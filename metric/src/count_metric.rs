//!
//! `CountMetric` tracks a single count, typically a number of reads falling
//! into one classification bucket. Internally it is an `i64`.

use crate::Metric;
use serde::{Deserialize, Serialize};

/// Number of reads in one bucket of the scan.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, Ord, PartialOrd)]
#[serde(transparent)]
pub struct CountMetric {
    pub(crate) count: i64,
}

impl Metric for CountMetric {
    /// Merging two `CountMetric` objects is just adding up the two counts
    ///
    /// # Example
    /// ```rust
    /// use metric::{Metric, CountMetric};
    /// let mut tag_reads = CountMetric::default();
    /// tag_reads.increment();
    /// tag_reads.merge(CountMetric::from(50));
    /// assert!(tag_reads == CountMetric::from(51))
    /// ```
    fn merge(&mut self, other: Self) {
        self.count += other.count;
    }
}

impl CountMetric {
    /// Increment the counter by 1
    pub fn increment(&mut self) {
        self.count += 1;
    }

    /// Return the count
    pub fn count(self) -> i64 {
        self.count
    }
}

impl<T> From<T> for CountMetric
where
    T: Into<i64>,
{
    fn from(val: T) -> Self {
        CountMetric { count: val.into() }
    }
}

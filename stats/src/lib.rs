//! stats
#![deny(missing_docs)]

mod median;
pub use median::{median, median_of_sorted};

/// Round `x` to the given number of decimal places, half away from zero.
///
/// ```rust
/// assert_eq!(stats::round_to(0.15049, 3), 0.15);
/// assert_eq!(stats::round_to(0.8, 2), 0.8);
/// ```
pub fn round_to(x: f64, decimals: u32) -> f64 {
    let scale = 10_f64.powi(decimals as i32);
    (x * scale).round() / scale
}

/// Express a ratio as a percentage rounded to `decimals` places.
pub fn as_percent(ratio: f64, decimals: u32) -> f64 {
    round_to(ratio * 100.0, decimals)
}

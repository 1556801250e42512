//! Confidence interval for a sample mean via the t distribution.

use serde::{Deserialize, Serialize};

use super::moments::SampleStats;
use super::student::t_quantile;

/// Two-sided interval around a sample mean.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

impl ConfidenceInterval {
    /// Interval width; NaN when the bounds are undefined.
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Two-sided confidence interval for the mean of a sample, with `tail`
/// probability in each tail (`tail = 0.05` gives the 90% interval).
///
/// The margin is `t_{1-tail, n-1} * std / sqrt(n)` and the interval is
/// symmetric about the mean. A sample with fewer than two observations has
/// df <= 0; the t quantile is undefined there and both bounds come out NaN.
pub fn mean_interval(stats: &SampleStats, tail: f64) -> ConfidenceInterval {
    let n = stats.count as f64;
    let df = n - 1.0;
    let margin = t_quantile(1.0 - tail, df) * stats.std / n.sqrt();
    ConfidenceInterval {
        lower: stats.mean - margin,
        upper: stats.mean + margin,
    }
}

//! Streaming mean/variance via Welford's algorithm.
//!
//! The accumulator is O(1) per observation and merges exactly, which is what
//! lets a grouped reduction run chunk-by-chunk (and in parallel) while still
//! producing the same mean and sample standard deviation as a single in-memory
//! pass.

use serde::{Deserialize, Serialize};

/// Welford accumulator for one group's volume observations.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningMoments {
    count: u64,
    mean: f64,
    m2: f64,
}

impl RunningMoments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one observation into the accumulator.
    pub fn push(&mut self, x: f64) {
        self.count += 1;
        let delta = x - self.mean;
        self.mean += delta / self.count as f64;
        let delta2 = x - self.mean;
        self.m2 += delta * delta2;
    }

    /// Combine two accumulators (Chan et al. parallel update).
    ///
    /// The result equals pushing both streams into one accumulator, up to
    /// floating-point rounding.
    pub fn merge(a: Self, b: Self) -> Self {
        if a.count == 0 {
            return b;
        }
        if b.count == 0 {
            return a;
        }
        let count = a.count + b.count;
        let delta = b.mean - a.mean;
        let mean = a.mean + delta * b.count as f64 / count as f64;
        let m2 = a.m2 + b.m2 + delta * delta * (a.count as f64) * (b.count as f64) / count as f64;
        Self { count, mean, m2 }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Arithmetic mean; NaN when no observations were seen.
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            return f64::NAN;
        }
        self.mean
    }

    /// Sample variance (n - 1 denominator); NaN for fewer than two
    /// observations, matching what a dataframe `std` reports for a
    /// single-row group.
    pub fn sample_variance(&self) -> f64 {
        if self.count < 2 {
            return f64::NAN;
        }
        self.m2 / (self.count - 1) as f64
    }

    /// Sample standard deviation.
    pub fn sample_std(&self) -> f64 {
        self.sample_variance().sqrt()
    }

    /// Snapshot as a summary-statistics triple.
    pub fn stats(&self) -> SampleStats {
        SampleStats {
            mean: self.mean(),
            std: self.sample_std(),
            count: self.count,
        }
    }
}

/// Summary statistics for one sample: the (mean, std, count) triple the
/// interval estimate and the two-sample test consume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleStats {
    pub mean: f64,
    pub std: f64,
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        if a.is_nan() || b.is_nan() {
            return false;
        }
        (a - b).abs() <= tol
    }

    fn fill(values: &[f64]) -> RunningMoments {
        let mut m = RunningMoments::new();
        for &v in values {
            m.push(v);
        }
        m
    }

    #[test]
    fn matches_two_pass_formulas() {
        let values = [100.0, 200.0, 300.0];
        let m = fill(&values);
        assert_eq!(m.count(), 3);
        assert!(approx_eq(m.mean(), 200.0, 1e-12));
        // Sample variance: ((100)^2 + 0 + (100)^2) / 2 = 10000
        assert!(approx_eq(m.sample_variance(), 10_000.0, 1e-9));
        assert!(approx_eq(m.sample_std(), 100.0, 1e-9));
    }

    #[test]
    fn empty_and_single_are_undefined() {
        let empty = RunningMoments::new();
        assert!(empty.mean().is_nan());
        assert!(empty.sample_variance().is_nan());

        let single = fill(&[42.0]);
        assert!(approx_eq(single.mean(), 42.0, 1e-12));
        assert!(single.sample_variance().is_nan());
        assert!(single.sample_std().is_nan());
    }

    #[test]
    fn merge_equals_sequential() {
        let all = [1.5, -2.0, 3.25, 7.0, 0.125, -4.5, 9.75];
        let whole = fill(&all);
        for split in 0..=all.len() {
            let merged = RunningMoments::merge(fill(&all[..split]), fill(&all[split..]));
            assert_eq!(merged.count(), whole.count());
            assert!(approx_eq(merged.mean(), whole.mean(), 1e-10), "split {split}");
            assert!(
                approx_eq(merged.sample_variance(), whole.sample_variance(), 1e-9),
                "split {split}"
            );
        }
    }

    #[test]
    fn merge_with_empty_is_identity() {
        let m = fill(&[5.0, 6.0]);
        let left = RunningMoments::merge(RunningMoments::new(), m);
        let right = RunningMoments::merge(m, RunningMoments::new());
        assert_eq!(left, m);
        assert_eq!(right, m);
    }

    #[test]
    fn constant_stream_has_zero_variance() {
        let m = fill(&[1000.0, 1000.0, 1000.0]);
        assert!(approx_eq(m.sample_variance(), 0.0, 1e-9));
        assert!(approx_eq(m.sample_std(), 0.0, 1e-9));
    }

    #[test]
    fn stats_snapshot() {
        let s = fill(&[10.0, 10.0, 10.0]).stats();
        assert_eq!(s.count, 3);
        assert!(approx_eq(s.mean, 10.0, 1e-12));
        assert!(approx_eq(s.std, 0.0, 1e-12));
    }
}

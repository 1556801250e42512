//! Two-independent-sample t-test from summary statistics.
//!
//! Operates on (mean, std, count) triples only, never raw samples, so it can
//! sit downstream of an out-of-core aggregation. Welch's unequal-variance
//! form is the default; the pooled equal-variance form is opt-in.

use serde::{Deserialize, Serialize};

use super::moments::SampleStats;
use super::student::t_sf;

/// Variance assumption for the two-sample test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarianceModel {
    /// Welch's correction: no equal-variance assumption (default).
    Welch,
    /// Pooled variance: assumes both populations share one variance.
    Pooled,
}

impl Default for VarianceModel {
    fn default() -> Self {
        VarianceModel::Welch
    }
}

/// Result of a two-sample test: statistic, degrees of freedom, and the
/// two-sided p-value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TTestResult {
    pub statistic: f64,
    pub df: f64,
    pub p_value: f64,
}

/// Two-independent-sample t-test for equality of means, from summary
/// statistics.
///
/// Under `Welch`, the Welch-Satterthwaite degrees of freedom are used; when
/// both sample variances are zero that formula is 0/0, and df falls back to 1
/// so that distinct means still produce an infinite statistic with p = 0.
/// Degenerate inputs (a count below two leaves the sample std undefined)
/// propagate as NaN rather than erroring.
pub fn t_test_from_stats(a: &SampleStats, b: &SampleStats, model: VarianceModel) -> TTestResult {
    let n1 = a.count as f64;
    let n2 = b.count as f64;

    let (denom, df) = match model {
        VarianceModel::Welch => {
            let vn1 = a.std * a.std / n1;
            let vn2 = b.std * b.std / n2;
            let mut df = (vn1 + vn2) * (vn1 + vn2)
                / (vn1 * vn1 / (n1 - 1.0) + vn2 * vn2 / (n2 - 1.0));
            if df.is_nan() {
                df = 1.0;
            }
            ((vn1 + vn2).sqrt(), df)
        }
        VarianceModel::Pooled => {
            let df = n1 + n2 - 2.0;
            let pooled_var =
                ((n1 - 1.0) * a.std * a.std + (n2 - 1.0) * b.std * b.std) / df;
            ((pooled_var * (1.0 / n1 + 1.0 / n2)).sqrt(), df)
        }
    };

    let statistic = (a.mean - b.mean) / denom;
    let p_value = 2.0 * t_sf(statistic.abs(), df);

    TTestResult {
        statistic,
        df,
        p_value,
    }
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

    fn stats(mean: f64, std: f64, count: u64) -> SampleStats {
        SampleStats { mean, std, count }
    }

    #[test]
    fn identical_samples_show_no_difference() {
        let s = stats(200.0, 100.0, 3);
        let out = t_test_from_stats(&s, &s, VarianceModel::Welch);
        assert!(approx_eq(out.statistic, 0.0, 1e-12));
        assert!(approx_eq(out.p_value, 1.0, 1e-12));
    }

    #[test]
    fn equal_n_equal_std_closed_form() {
        // t = (m1 - m2) / (s * sqrt(2/n)); Welch df collapses to 2n - 2.
        let a = stats(205.0, 10.0, 50);
        let b = stats(200.0, 10.0, 50);
        let out = t_test_from_stats(&a, &b, VarianceModel::Welch);
        assert!(approx_eq(out.statistic, 2.5, 1e-10));
        assert!(approx_eq(out.df, 98.0, 1e-9));
        assert!(out.p_value > 0.012 && out.p_value < 0.016, "p = {}", out.p_value);

        let pooled = t_test_from_stats(&a, &b, VarianceModel::Pooled);
        assert!(approx_eq(pooled.statistic, out.statistic, 1e-10));
        assert!(approx_eq(pooled.df, out.df, 1e-9));
    }

    #[test]
    fn swap_flips_sign_and_keeps_p() {
        let a = stats(210.0, 14.0, 30);
        let b = stats(200.0, 35.0, 90);
        let ab = t_test_from_stats(&a, &b, VarianceModel::Welch);
        let ba = t_test_from_stats(&b, &a, VarianceModel::Welch);
        assert!(approx_eq(ab.statistic, -ba.statistic, 1e-10));
        assert!(approx_eq(ab.df, ba.df, 1e-9));
        assert!(approx_eq(ab.p_value, ba.p_value, 1e-10));
    }

    #[test]
    fn welch_df_between_min_and_sum() {
        // Welch df lies in [min(n1,n2)-1, n1+n2-2].
        let a = stats(5.0, 2.0, 10);
        let b = stats(4.0, 9.0, 40);
        let out = t_test_from_stats(&a, &b, VarianceModel::Welch);
        assert!(out.df >= 9.0 && out.df <= 48.0, "df = {}", out.df);
    }

    #[test]
    fn zero_variance_distinct_means_is_certain() {
        // Both stds are zero: df falls back to 1, statistic is infinite.
        let a = stats(1000.0, 0.0, 3);
        let b = stats(10.0, 0.0, 3);
        let out = t_test_from_stats(&a, &b, VarianceModel::Welch);
        assert!(out.statistic.is_infinite() && out.statistic > 0.0);
        assert!(approx_eq(out.df, 1.0, 0.0));
        assert!(approx_eq(out.p_value, 0.0, 1e-300));
    }

    #[test]
    fn single_observation_sample_propagates_nan() {
        let a = stats(42.0, f64::NAN, 1);
        let b = stats(10.0, 3.0, 20);
        let out = t_test_from_stats(&a, &b, VarianceModel::Welch);
        assert!(out.statistic.is_nan());
        assert!(out.p_value.is_nan());
    }

    #[test]
    fn large_separation_is_significant() {
        let a = stats(1000.0, 5.0, 30);
        let b = stats(10.0, 5.0, 30);
        let out = t_test_from_stats(&a, &b, VarianceModel::Welch);
        assert!(out.statistic.abs() > 100.0);
        assert!(out.p_value < 1e-10);
    }

    #[test]
    fn default_model_is_welch() {
        assert_eq!(VarianceModel::default(), VarianceModel::Welch);
    }
}

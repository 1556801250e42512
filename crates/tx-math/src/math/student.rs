//! Student's t distribution: CDF, survival function, and quantile.
//!
//! Everything is expressed through the regularized incomplete beta identity
//!
//! ```text
//! P(T > x) = 0.5 * I_z(df/2, 1/2),   z = df / (df + x^2),   x >= 0
//! ```
//!
//! so the only numerics involved are `reg_inc_beta` and its inverse. The
//! distribution is undefined for df <= 0 and all functions return NaN there
//! rather than panicking.

use super::beta::{reg_inc_beta, reg_inc_beta_inv};

/// Upper-tail mass of t(df) beyond |x|, i.e. 0.5 * I_z(df/2, 1/2).
fn half_tail(x: f64, df: f64) -> f64 {
    let z = df / (df + x * x);
    0.5 * reg_inc_beta(z, 0.5 * df, 0.5)
}

/// CDF of Student's t with `df` degrees of freedom at `x`.
pub fn t_cdf(x: f64, df: f64) -> f64 {
    if x.is_nan() || df.is_nan() || df <= 0.0 {
        return f64::NAN;
    }
    if x == f64::INFINITY {
        return 1.0;
    }
    if x == f64::NEG_INFINITY {
        return 0.0;
    }
    if x >= 0.0 {
        1.0 - half_tail(x, df)
    } else {
        half_tail(x, df)
    }
}

/// Survival function P(T > x); computed directly from the tail identity so
/// small upper-tail probabilities do not lose precision to cancellation.
pub fn t_sf(x: f64, df: f64) -> f64 {
    if x.is_nan() || df.is_nan() || df <= 0.0 {
        return f64::NAN;
    }
    if x == f64::INFINITY {
        return 0.0;
    }
    if x == f64::NEG_INFINITY {
        return 1.0;
    }
    if x >= 0.0 {
        half_tail(x, df)
    } else {
        1.0 - half_tail(x, df)
    }
}

/// Quantile (inverse CDF) of Student's t with `df` degrees of freedom.
///
/// `p = 0` and `p = 1` map to the infinities; `p` outside [0, 1] is NaN.
pub fn t_quantile(p: f64, df: f64) -> f64 {
    if p.is_nan() || df.is_nan() || df <= 0.0 {
        return f64::NAN;
    }
    if p < 0.0 || p > 1.0 {
        return f64::NAN;
    }
    if p == 0.0 {
        return f64::NEG_INFINITY;
    }
    if p == 1.0 {
        return f64::INFINITY;
    }
    if p == 0.5 {
        return 0.0;
    }
    if p < 0.5 {
        return -t_quantile(1.0 - p, df);
    }
    // For p > 1/2: 2*(1-p) = I_z(df/2, 1/2), then x = sqrt(df * (1-z)/z).
    let z = reg_inc_beta_inv(2.0 * (1.0 - p), 0.5 * df, 0.5);
    if z.is_nan() {
        return f64::NAN;
    }
    if z <= 0.0 {
        return f64::INFINITY;
    }
    (df * (1.0 - z) / z).sqrt()
}

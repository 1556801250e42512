//! Regularized incomplete beta function and its inverse.
//!
//! The continued-fraction evaluation (modified Lentz) follows Numerical
//! Recipes. `reg_inc_beta` is the workhorse behind the Student's t CDF; the
//! inverse is a bisection on the (monotone) forward function.

use super::stable::log_beta;

const BETACF_MAX_ITERS: usize = 200;
const BETACF_EPS: f64 = 3.0e-12;
const BETACF_FPMIN: f64 = 1.0e-30;

/// Regularized incomplete beta function I_x(a, b).
///
/// Returns NaN for NaN inputs or non-positive shape parameters; clamps the
/// argument so that I_x = 0 for x <= 0 and I_x = 1 for x >= 1.
pub fn reg_inc_beta(x: f64, a: f64, b: f64) -> f64 {
    if x.is_nan() || a.is_nan() || b.is_nan() {
        return f64::NAN;
    }
    if a <= 0.0 || b <= 0.0 {
        return f64::NAN;
    }
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    let ln_beta = log_beta(a, b);
    let front = (a * x.ln() + b * (1.0 - x).ln() - ln_beta).exp();
    // Use the continued fraction directly where it converges fast, the
    // symmetry I_x(a,b) = 1 - I_{1-x}(b,a) elsewhere.
    let threshold = (a + 1.0) / (a + b + 2.0);
    let result = if x < threshold {
        front * betacf(a, b, x) / a
    } else {
        1.0 - front * betacf(b, a, 1.0 - x) / b
    };
    result.clamp(0.0, 1.0)
}

/// Inverse of `reg_inc_beta` in x: smallest x with I_x(a, b) ~= p.
///
/// Bisection on [0, 1]; the forward function is monotone in x.
pub fn reg_inc_beta_inv(p: f64, a: f64, b: f64) -> f64 {
    if p.is_nan() || a.is_nan() || b.is_nan() {
        return f64::NAN;
    }
    if a <= 0.0 || b <= 0.0 {
        return f64::NAN;
    }
    if p <= 0.0 {
        return 0.0;
    }
    if p >= 1.0 {
        return 1.0;
    }

    let mut low = 0.0;
    let mut high = 1.0;
    let mut mid = 0.5;
    let tol = 1e-12;
    for _ in 0..200 {
        mid = 0.5 * (low + high);
        let val = reg_inc_beta(mid, a, b);
        if val.is_nan() {
            return f64::NAN;
        }
        let delta = val - p;
        if delta.abs() < tol {
            return mid;
        }
        if delta < 0.0 {
            low = mid;
        } else {
            high = mid;
        }
    }
    mid
}

fn betacf(a: f64, b: f64, x: f64) -> f64 {
    let qab = a + b;
    let qap = a + 1.0;
    let qam = a - 1.0;
    let mut c = 1.0;
    let mut d = 1.0 - qab * x / qap;
    if d.abs() < BETACF_FPMIN {
        d = BETACF_FPMIN;
    }
    d = 1.0 / d;
    let mut h = d;

    for m in 1..=BETACF_MAX_ITERS {
        let m_f = m as f64;
        let m2 = 2.0 * m_f;
        let aa = m_f * (b - m_f) * x / ((qam + m2) * (a + m2));
        d = 1.0 + aa * d;
        if d.abs() < BETACF_FPMIN {
            d = BETACF_FPMIN;
        }
        c = 1.0 + aa / c;
        if c.abs() < BETACF_FPMIN {
            c = BETACF_FPMIN;
        }
        d = 1.0 / d;
        h *= d * c;

        let aa = -(a + m_f) * (qab + m_f) * x / ((a + m2) * (qap + m2));
        d = 1.0 + aa * d;
        if d.abs() < BETACF_FPMIN {
            d = BETACF_FPMIN;
        }
        c = 1.0 + aa / c;
        if c.abs() < BETACF_FPMIN {
            c = BETACF_FPMIN;
        }
        d = 1.0 / d;
        let del = d * c;
        h *= del;
        if (del - 1.0).abs() < BETACF_EPS {
            break;
        }
    }

    h
}

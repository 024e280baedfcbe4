//! Two-sided p-values from Student-t and standard normal statistics.

use statrs::distribution::{ContinuousCDF, Normal, StudentsT};

/// t statistic of a correlation coefficient `r` with `df = n - 2`.
///
/// Perfect correlations map to an infinite statistic.
pub fn correlation_t(r: f64, df: f64) -> f64 {
    let r = r.clamp(-1.0, 1.0);
    let rest = 1.0 - r * r;
    if rest <= 0.0 {
        return f64::INFINITY.copysign(r);
    }
    r * (df / rest).sqrt()
}

/// Two-sided p-value of a correlation coefficient over `n_samples` pairs,
/// or NaN with fewer than 3 samples.
pub fn correlation_pvalue(r: f64, n_samples: usize) -> f64 {
    if !r.is_finite() || n_samples <= 2 {
        return f64::NAN;
    }
    let df = (n_samples - 2) as f64;
    let t = correlation_t(r, df);
    if t.is_infinite() {
        return 0.0;
    }
    two_sided_pvalue_from_t(t, df)
}

/// Two-sided p-value of a t statistic with (possibly fractional) `df`.
pub fn two_sided_pvalue_from_t(t: f64, df: f64) -> f64 {
    if !t.is_finite() || !(df > 0.0) {
        return f64::NAN;
    }
    match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => (2.0 * dist.cdf(-t.abs())).clamp(0.0, 1.0),
        Err(_) => f64::NAN,
    }
}

pub fn standard_normal() -> Normal {
    Normal::new(0.0, 1.0).expect("unit normal parameters are valid")
}

pub fn two_sided_pvalue_from_z(z: f64, normal: &Normal) -> f64 {
    if !z.is_finite() {
        return f64::NAN;
    }
    (2.0 * normal.cdf(-z.abs())).clamp(0.0, 1.0)
}

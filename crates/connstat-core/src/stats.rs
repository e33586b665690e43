//! Statistical tests used to judge generated connectivity.
//!
//! - One-sample Kolmogorov-Smirnov test against an arbitrary CDF, with the
//!   asymptotic Kolmogorov distribution (Stephens' small-sample correction)
//! - Z-test for a sum of independent Bernoulli trials
//! - Helpers: standard normal CDF and composite Simpson integration

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

// ============================================================================
// Result types
// ============================================================================

/// Outcome of a Kolmogorov-Smirnov test.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct KsResult {
    /// Largest absolute difference between empirical and reference CDF.
    pub statistic: f64,
    /// Probability of a statistic at least this large under the null.
    pub p_value: f64,
    /// Number of observations.
    pub sample_size: usize,
}

/// Outcome of a Z-test on a connection count.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZResult {
    /// Standardised difference between observed and expected count.
    pub z: f64,
    /// Two-sided p-value.
    pub p_value: f64,
    /// Observed number of successes.
    pub observed: usize,
    /// Expected number of successes.
    pub expected: f64,
    /// Variance of the number of successes.
    pub variance: f64,
}

// ============================================================================
// Distributions
// ============================================================================

/// Complementary error function.
///
/// Chebyshev fit with fractional error below 1.2e-7 everywhere.
pub fn erfc(x: f64) -> f64 {
    let z = x.abs();
    let t = 1.0 / (1.0 + 0.5 * z);
    let poly = -z * z - 1.265_512_23
        + t * (1.000_023_68
            + t * (0.374_091_96
                + t * (0.096_784_18
                    + t * (-0.186_288_06
                        + t * (0.278_868_07
                            + t * (-1.135_203_98
                                + t * (1.488_515_87 + t * (-0.822_152_23 + t * 0.170_872_77))))))));
    let ans = t * poly.exp();
    if x >= 0.0 { ans } else { 2.0 - ans }
}

/// Standard normal cumulative distribution function.
pub fn normal_cdf(z: f64) -> f64 {
    0.5 * erfc(-z / std::f64::consts::SQRT_2)
}

/// Survival function of the Kolmogorov distribution, `P(K > lambda)`.
pub fn kolmogorov_survival(lambda: f64) -> f64 {
    if lambda.is_nan() {
        return f64::NAN;
    }
    if lambda < 0.042 {
        return 1.0;
    }
    if lambda < 1.18 {
        // Jacobi theta form converges quickly for small lambda
        let y = (-std::f64::consts::PI.powi(2) / (8.0 * lambda * lambda)).exp();
        let cdf = (2.0 * std::f64::consts::PI).sqrt() / lambda
            * (y + y.powi(9) + y.powi(25) + y.powi(49));
        (1.0 - cdf).clamp(0.0, 1.0)
    } else {
        let x = (-2.0 * lambda * lambda).exp();
        (2.0 * (x - x.powi(4) + x.powi(9))).clamp(0.0, 1.0)
    }
}

// ============================================================================
// Kolmogorov-Smirnov
// ============================================================================

/// Kolmogorov-Smirnov distance between `sample` and the reference `cdf`.
pub fn ks_statistic<F>(sample: &[f64], cdf: F) -> Result<f64>
where
    F: Fn(f64) -> f64,
{
    if sample.is_empty() {
        return Err(Error::EmptySample { test: "KS test" });
    }
    if sample.iter().any(|x| x.is_nan()) {
        return Err(Error::validation("KS sample contains NaN"));
    }
    let mut sorted = sample.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len() as f64;
    let d = sorted
        .iter()
        .enumerate()
        .map(|(i, &x)| {
            let f = cdf(x);
            let below = f - i as f64 / n;
            let above = (i + 1) as f64 / n - f;
            below.max(above)
        })
        .fold(0.0, f64::max);
    Ok(d)
}

/// One-sample, two-sided Kolmogorov-Smirnov test.
pub fn ks_test<F>(sample: &[f64], cdf: F) -> Result<KsResult>
where
    F: Fn(f64) -> f64,
{
    let statistic = ks_statistic(sample, cdf)?;
    let sqrt_n = (sample.len() as f64).sqrt();
    let lambda = (sqrt_n + 0.12 + 0.11 / sqrt_n) * statistic;
    Ok(KsResult {
        statistic,
        p_value: kolmogorov_survival(lambda),
        sample_size: sample.len(),
    })
}

/// Kolmogorov-Smirnov test against the uniform distribution on `[0, 1]`.
pub fn ks_uniform(sample: &[f64]) -> Result<KsResult> {
    ks_test(sample, |x| x.clamp(0.0, 1.0))
}

// ============================================================================
// Z-test
// ============================================================================

/// Z-test of `observed` successes against independent Bernoulli trials with
/// success probabilities `probabilities`.
pub fn z_test(observed: usize, probabilities: &[f64]) -> Result<ZResult> {
    if probabilities.is_empty() {
        return Err(Error::EmptySample { test: "Z-test" });
    }
    if let Some(p) = probabilities.iter().find(|p| !(0.0..=1.0).contains(*p)) {
        return Err(Error::validation(format!(
            "connection probability {p} is outside [0, 1]"
        )));
    }
    let expected: f64 = probabilities.iter().sum();
    let variance: f64 = probabilities.iter().map(|p| p * (1.0 - p)).sum();
    let diff = observed as f64 - expected;

    let (z, p_value) = if variance > 0.0 {
        let z = diff / variance.sqrt();
        (z, erfc(z.abs() / std::f64::consts::SQRT_2).min(1.0))
    } else if diff.abs() < 1e-9 {
        (0.0, 1.0)
    } else {
        warn!(observed, expected, "zero variance with observed != expected");
        (diff.signum() * f64::INFINITY, 0.0)
    };

    Ok(ZResult {
        z,
        p_value,
        observed,
        expected,
        variance,
    })
}

// ============================================================================
// Numerics
// ============================================================================

/// Composite Simpson integration of `f` over `[a, b]` with `intervals`
/// sub-intervals (rounded up to an even number).
pub fn simpson<F>(f: F, a: f64, b: f64, intervals: usize) -> f64
where
    F: Fn(f64) -> f64,
{
    if b <= a {
        return 0.0;
    }
    let n = (intervals.max(2) + 1) & !1;
    let h = (b - a) / n as f64;
    let inner: f64 = (1..n)
        .map(|i| {
            let w = if i % 2 == 1 { 4.0 } else { 2.0 };
            w * f(a + i as f64 * h)
        })
        .sum();
    (f(a) + inner + f(b)) * h / 3.0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_cdf_known_values() {
        assert!((normal_cdf(0.0) - 0.5).abs() < 1e-7);
        assert!((normal_cdf(1.96) - 0.975_002_1).abs() < 1e-6);
        assert!((normal_cdf(-1.0) - 0.158_655_25).abs() < 1e-6);
    }

    #[test]
    fn test_kolmogorov_survival_known_values() {
        // Critical values of the Kolmogorov distribution
        assert!((kolmogorov_survival(1.3581) - 0.05).abs() < 1e-3);
        assert!((kolmogorov_survival(1.6276) - 0.01).abs() < 1e-3);
        assert!((kolmogorov_survival(0.8276) - 0.5).abs() < 1e-3);
        assert_eq!(kolmogorov_survival(0.0), 1.0);
        assert!(kolmogorov_survival(5.0) < 1e-20);
    }

    #[test]
    fn test_kolmogorov_survival_continuous_at_branch() {
        let below = kolmogorov_survival(1.18 - 1e-9);
        let above = kolmogorov_survival(1.18 + 1e-9);
        assert!((below - above).abs() < 1e-6);
    }

    #[test]
    fn test_ks_statistic_exact() {
        // Empirical CDF of {0.5} against U(0,1): max(0.5 - 0, 1 - 0.5)
        let d = ks_statistic(&[0.5], |x| x).unwrap();
        assert!((d - 0.5).abs() < 1e-12);

        let sample: Vec<f64> = (0..4).map(|i| (2 * i + 1) as f64 / 8.0).collect();
        let d = ks_statistic(&sample, |x| x).unwrap();
        assert!((d - 0.125).abs() < 1e-12);
    }

    #[test]
    fn test_ks_uniform_accepts_grid() {
        let sample: Vec<f64> = (0..1000).map(|i| (i as f64 + 0.5) / 1000.0).collect();
        let r = ks_uniform(&sample).unwrap();
        assert!(r.p_value > 0.99);
        assert_eq!(r.sample_size, 1000);
    }

    #[test]
    fn test_ks_uniform_rejects_skewed() {
        let sample: Vec<f64> = (0..1000).map(|i| ((i as f64 + 0.5) / 1000.0).powi(2)).collect();
        let r = ks_uniform(&sample).unwrap();
        assert!(r.p_value < 1e-10);
    }

    #[test]
    fn test_ks_empty_sample() {
        assert!(matches!(
            ks_uniform(&[]),
            Err(Error::EmptySample { .. })
        ));
    }

    #[test]
    fn test_ks_nan_rejected() {
        assert!(ks_uniform(&[0.1, f64::NAN]).is_err());
    }

    #[test]
    fn test_z_test_exact_expectation() {
        let r = z_test(50, &[0.5; 100]).unwrap();
        assert_eq!(r.z, 0.0);
        assert!((r.p_value - 1.0).abs() < 1e-6);
        assert_eq!(r.expected, 50.0);
        assert_eq!(r.variance, 25.0);
    }

    #[test]
    fn test_z_test_two_standard_deviations() {
        let r = z_test(60, &[0.5; 100]).unwrap();
        assert!((r.z - 2.0).abs() < 1e-12);
        assert!((r.p_value - 0.0455).abs() < 1e-3);
    }

    #[test]
    fn test_z_test_zero_variance() {
        let r = z_test(10, &[1.0; 10]).unwrap();
        assert_eq!(r.z, 0.0);
        assert_eq!(r.p_value, 1.0);

        let r = z_test(9, &[1.0; 10]).unwrap();
        assert_eq!(r.z, f64::NEG_INFINITY);
        assert_eq!(r.p_value, 0.0);
    }

    #[test]
    fn test_z_test_rejects_bad_probabilities() {
        assert!(z_test(1, &[1.5]).is_err());
        assert!(z_test(0, &[]).is_err());
    }

    #[test]
    fn test_simpson_polynomial() {
        let v = simpson(|x| x * x, 0.0, 3.0, 10);
        assert!((v - 9.0).abs() < 1e-12);
        assert_eq!(simpson(|x| x, 1.0, 1.0, 10), 0.0);
    }
}

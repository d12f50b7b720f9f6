use crate::error::{Result, StatsError};
use crate::testing::utils::{mean, sample_variance};
use statrs::distribution::{ContinuousCDF, StudentsT};
use std::fmt;

/// Conventional bands for |d|, extended with a band for values too large to
/// be a plausible difference between equivalent payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectMagnitude {
    Small,
    Medium,
    Large,
    VeryLarge,
    /// |d| >= 3: treat the comparison itself as suspect.
    Extreme,
    /// d could not be computed (both groups constant with equal means).
    Undefined,
}

impl EffectMagnitude {
    pub fn from_d(d: f64) -> Self {
        let abs_d = d.abs();
        if abs_d.is_nan() {
            EffectMagnitude::Undefined
        } else if abs_d < 0.2 {
            EffectMagnitude::Small
        } else if abs_d < 0.5 {
            EffectMagnitude::Medium
        } else if abs_d < 0.8 {
            EffectMagnitude::Large
        } else if abs_d < 3.0 {
            EffectMagnitude::VeryLarge
        } else {
            EffectMagnitude::Extreme
        }
    }
}

impl fmt::Display for EffectMagnitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EffectMagnitude::Small => "SMALL",
            EffectMagnitude::Medium => "MEDIUM",
            EffectMagnitude::Large => "LARGE",
            EffectMagnitude::VeryLarge => "VERY LARGE",
            EffectMagnitude::Extreme => "EXTREMELY LARGE (SUSPECT!)",
            EffectMagnitude::Undefined => "UNDEFINED",
        })
    }
}

/// Interval estimate for mean(A) - mean(B).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

impl ConfidenceInterval {
    pub fn contains_zero(&self) -> bool {
        self.lower <= 0.0 && 0.0 <= self.upper
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EffectSizeResult {
    pub cohens_d: f64,
    pub magnitude: EffectMagnitude,
    pub mean_difference: f64,
    pub interval: ConfidenceInterval,
    pub excludes_zero: bool,
    /// |d| above the configured threshold: the groups are probably not
    /// measuring comparable things.
    pub implausibly_extreme: bool,
}

/// Calculate Cohen's d of `a` relative to `b` with the pooled standard
/// deviation.
///
/// Positive when mean(A) > mean(B). With zero pooled deviation the result is
/// signed infinity, or NaN when the means are also equal.
pub fn calculate_cohens_d(a: &[f64], b: &[f64]) -> Result<f64> {
    if a.len() < 2 || b.len() < 2 {
        return Err(StatsError::InsufficientData {
            needed: 2,
            got: a.len().min(b.len()),
        });
    }

    let n1 = a.len() as f64;
    let n2 = b.len() as f64;
    let diff = mean(a) - mean(b);

    let pooled_var =
        ((n1 - 1.0) * sample_variance(a) + (n2 - 1.0) * sample_variance(b)) / (n1 + n2 - 2.0);
    let pooled_sd = pooled_var.sqrt();

    if pooled_sd > 0.0 {
        Ok(diff / pooled_sd)
    } else if diff == 0.0 {
        Ok(f64::NAN)
    } else {
        Ok(diff.signum() * f64::INFINITY)
    }
}

/// Confidence interval for mean(A) - mean(B).
///
/// The standard error is Welch's `sqrt(s_a^2/n_a + s_b^2/n_b)` while the
/// critical value uses `n_a + n_b - 2` degrees of freedom.
pub fn mean_difference_interval(
    a: &[f64],
    b: &[f64],
    confidence: f64,
) -> Result<ConfidenceInterval> {
    if a.len() < 2 || b.len() < 2 {
        return Err(StatsError::InsufficientData {
            needed: 2,
            got: a.len().min(b.len()),
        });
    }

    let n1 = a.len() as f64;
    let n2 = b.len() as f64;
    let diff = mean(a) - mean(b);
    let se = (sample_variance(a) / n1 + sample_variance(b) / n2).sqrt();

    let t_crit = StudentsT::new(0.0, 1.0, n1 + n2 - 2.0)
        .map(|t| t.inverse_cdf(1.0 - (1.0 - confidence) / 2.0))
        .map_err(|_| StatsError::InsufficientData {
            needed: 2,
            got: a.len().min(b.len()),
        })?;

    Ok(ConfidenceInterval {
        lower: diff - t_crit * se,
        upper: diff + t_crit * se,
    })
}

/// Effect size, magnitude band and interval for one (query, metric) pair.
pub fn effect_size(
    a: &[f64],
    b: &[f64],
    confidence: f64,
    extreme_threshold: f64,
) -> Result<EffectSizeResult> {
    let d = calculate_cohens_d(a, b)?;
    let interval = mean_difference_interval(a, b, confidence)?;

    Ok(EffectSizeResult {
        cohens_d: d,
        magnitude: EffectMagnitude::from_d(d),
        mean_difference: mean(a) - mean(b),
        interval,
        excludes_zero: !interval.contains_zero(),
        implausibly_extreme: d.abs() > extreme_threshold,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_cohens_d() {
        // ~8 vs ~2: pooled variance (2 * 0.25 + 2 * 0.04) / 4 = 0.145
        let d = calculate_cohens_d(&[8.0, 7.5, 8.5], &[2.0, 2.2, 1.8]).unwrap();
        assert_abs_diff_eq!(d, 15.76, epsilon = 0.1);

        // ~5 vs ~5
        let d = calculate_cohens_d(&[5.0, 5.1, 4.9], &[5.0, 5.1, 4.9]).unwrap();
        assert_abs_diff_eq!(d, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn sign_follows_mean_difference() {
        let high = [10.0, 11.0, 12.0];
        let low = [1.0, 2.0, 3.0];
        assert!(calculate_cohens_d(&high, &low).unwrap() > 0.0);
        assert!(calculate_cohens_d(&low, &high).unwrap() < 0.0);
    }

    #[test]
    fn test_zero_variance_cases() {
        let d = calculate_cohens_d(&[10.0; 5], &[10.0; 5]).unwrap();
        assert!(d.is_nan());
        assert_eq!(EffectMagnitude::from_d(d), EffectMagnitude::Undefined);

        let d = calculate_cohens_d(&[5.0; 3], &[10.0; 3]).unwrap();
        assert!(d.is_infinite() && d < 0.0);
        assert_eq!(EffectMagnitude::from_d(d), EffectMagnitude::Extreme);
    }

    #[test]
    fn magnitude_band_edges() {
        assert_eq!(EffectMagnitude::from_d(0.19), EffectMagnitude::Small);
        assert_eq!(EffectMagnitude::from_d(-0.2), EffectMagnitude::Medium);
        assert_eq!(EffectMagnitude::from_d(0.5), EffectMagnitude::Large);
        assert_eq!(EffectMagnitude::from_d(0.8), EffectMagnitude::VeryLarge);
        assert_eq!(EffectMagnitude::from_d(2.99), EffectMagnitude::VeryLarge);
        assert_eq!(EffectMagnitude::from_d(-3.0), EffectMagnitude::Extreme);
    }

    #[test]
    fn interval_uses_pooled_degrees_of_freedom() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [2.0, 4.0, 6.0, 8.0, 10.0];
        let ci = mean_difference_interval(&a, &b, 0.95).unwrap();
        // diff = -3, se = sqrt(2.5), t(0.975, 8) = 2.306004
        let half = 2.306004 * 2.5_f64.sqrt();
        assert_abs_diff_eq!(ci.lower, -3.0 - half, epsilon = 1e-4);
        assert_abs_diff_eq!(ci.upper, -3.0 + half, epsilon = 1e-4);
        assert!(ci.contains_zero());
    }

    #[test]
    fn extreme_flag_is_separate_from_band() {
        let high = [100.0, 102.0, 98.0, 101.0, 99.0];
        let low = [50.0, 52.0, 48.0, 51.0, 49.0];
        let r = effect_size(&high, &low, 0.95, 3.0).unwrap();
        assert!(r.cohens_d > 30.0);
        assert_eq!(r.magnitude, EffectMagnitude::Extreme);
        assert!(r.implausibly_extreme);
        assert!(r.excludes_zero);
        assert_abs_diff_eq!(r.mean_difference, 50.0);

        let r = effect_size(&high, &low, 0.95, 100.0).unwrap();
        assert_eq!(r.magnitude, EffectMagnitude::Extreme);
        assert!(!r.implausibly_extreme);
    }

    #[test]
    fn undefined_effect_is_not_flagged_extreme() {
        let r = effect_size(&[10.0; 5], &[10.0; 5], 0.95, 3.0).unwrap();
        assert!(r.cohens_d.is_nan());
        assert!(!r.implausibly_extreme);
        assert!(r.interval.contains_zero());
    }

    #[test]
    fn small_groups_are_rejected() {
        assert!(calculate_cohens_d(&[1.0], &[1.0, 2.0]).is_err());
        assert!(mean_difference_interval(&[1.0, 2.0], &[1.0], 0.95).is_err());
    }
}

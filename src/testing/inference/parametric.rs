//! Parametric two-sample tests.
//!
//! Student's and Welch's t-tests. Slices and precomputed summaries both go
//! through [`t_test_from_moments`].

use crate::error::{Result, StatsError};
use crate::testing::utils::{mean, sample_variance};
use crate::testing::{Alternative, TTestType, TestResult};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Perform a t-test comparing two samples.
///
/// This function performs either Student's t-test (assuming equal variances) or
/// Welch's t-test (allowing unequal variances) on two samples.
///
/// # Arguments
///
/// * `x` - First sample (group A)
/// * `y` - Second sample (group B)
/// * `test_type` - Type of t-test to perform
/// * `alternative` - Direction of H1 for `x` relative to `y`
///
/// # Returns
///
/// `TestResult` containing the t-statistic, the p-value for `alternative`
/// and the degrees of freedom. The two-sided p-value is kept in the metadata
/// under `"p_two_sided"`.
pub fn t_test(
    x: &[f64],
    y: &[f64],
    test_type: TTestType,
    alternative: Alternative,
) -> Result<TestResult<f64>> {
    let nx = x.len();
    let ny = y.len();

    if nx < 2 || ny < 2 {
        return Err(StatsError::InsufficientData {
            needed: 2,
            got: nx.min(ny),
        });
    }

    Ok(t_test_from_moments(
        mean(x),
        sample_variance(x),
        nx as f64,
        mean(y),
        sample_variance(y),
        ny as f64,
        test_type,
        alternative,
    ))
}

/// Perform a t-test from group means, sample variances and sizes.
#[allow(clippy::too_many_arguments)]
pub fn t_test_from_moments(
    mean1: f64,
    var1: f64,
    n1: f64,
    mean2: f64,
    var2: f64,
    n2: f64,
    test_type: TTestType,
    alternative: Alternative,
) -> TestResult<f64> {
    let mean_diff = mean1 - mean2;

    let (std_err, df) = match test_type {
        TTestType::Student => {
            let pooled_var = ((n1 - 1.0) * var1 + (n2 - 1.0) * var2) / (n1 + n2 - 2.0);
            ((pooled_var * (1.0 / n1 + 1.0 / n2)).sqrt(), n1 + n2 - 2.0)
        }
        TTestType::Welch => {
            let term1 = var1 / n1;
            let term2 = var2 / n2;
            let combined_var = term1 + term2;

            // Welch-Satterthwaite equation for degrees of freedom
            let df = combined_var * combined_var
                / (term1 * term1 / (n1 - 1.0) + term2 * term2 / (n2 - 1.0));
            (combined_var.sqrt(), df)
        }
    };

    let (t_stat, p_two_sided) = if std_err == 0.0 {
        // Both groups constant: identical means carry no evidence, distinct
        // means are infinitely far apart.
        if mean_diff == 0.0 {
            (0.0, 1.0)
        } else {
            (mean_diff.signum() * f64::INFINITY, 0.0)
        }
    } else {
        let t = mean_diff / std_err;
        (t, two_sided_p_value(t, df))
    };

    TestResult::new(t_stat, one_sided_p_value(p_two_sided, t_stat, alternative))
        .with_degrees_of_freedom(df)
        .with_standard_error(std_err)
        .with_metadata("p_two_sided", p_two_sided)
        .with_metadata("mean_difference", mean_diff)
}

/// Convert a two-sided p-value into the p-value for `alternative`.
///
/// For `Greater`, a statistic favouring the first group halves the two-sided
/// p-value; any other statistic (including zero) gives `1 - p/2`. `Less` is
/// the mirror image.
pub fn one_sided_p_value(p_two_sided: f64, statistic: f64, alternative: Alternative) -> f64 {
    match alternative {
        Alternative::TwoSided => p_two_sided,
        Alternative::Greater => {
            if statistic > 0.0 {
                p_two_sided / 2.0
            } else {
                1.0 - p_two_sided / 2.0
            }
        }
        Alternative::Less => {
            if statistic < 0.0 {
                p_two_sided / 2.0
            } else {
                1.0 - p_two_sided / 2.0
            }
        }
    }
}

fn two_sided_p_value(t_stat: f64, df: f64) -> f64 {
    if !t_stat.is_finite() {
        return if t_stat.is_infinite() { 0.0 } else { 1.0 };
    }

    if df <= 0.0 || !df.is_finite() {
        return 1.0;
    }

    match StudentsT::new(0.0, 1.0, df) {
        Ok(t_dist) => (2.0 * t_dist.sf(t_stat.abs())).min(1.0),
        Err(_) => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn welch_matches_reference_values() {
        // t = -3 / sqrt(2.5/5 + 10/5), Welch-Satterthwaite df = 6.25 / 1.0625
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [2.0, 4.0, 6.0, 8.0, 10.0];
        let r = t_test(&a, &b, TTestType::Welch, Alternative::TwoSided).unwrap();
        assert_abs_diff_eq!(r.statistic, -1.8974, epsilon = 1e-3);
        assert_abs_diff_eq!(r.degrees_of_freedom.unwrap(), 5.882, epsilon = 1e-2);
        assert_abs_diff_eq!(r.p_value, 0.1076, epsilon = 2e-3);
    }

    #[test]
    fn student_uses_pooled_degrees_of_freedom() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [2.0, 4.0, 6.0, 8.0, 10.0];
        let r = t_test(&a, &b, TTestType::Student, Alternative::TwoSided).unwrap();
        assert_abs_diff_eq!(r.degrees_of_freedom.unwrap(), 8.0);
        assert_abs_diff_eq!(r.statistic, -1.8974, epsilon = 1e-3);
    }

    #[test]
    fn one_sided_correction_both_branches() {
        assert_abs_diff_eq!(one_sided_p_value(0.04, 2.5, Alternative::Greater), 0.02);
        assert_abs_diff_eq!(one_sided_p_value(0.04, -2.5, Alternative::Greater), 0.98);
        assert_abs_diff_eq!(one_sided_p_value(0.04, 0.0, Alternative::Greater), 0.98);
        assert_abs_diff_eq!(one_sided_p_value(0.04, -2.5, Alternative::Less), 0.02);
        assert_abs_diff_eq!(one_sided_p_value(0.04, 2.5, Alternative::TwoSided), 0.04);
    }

    #[test]
    fn greater_alternative_on_known_means() {
        let high = [100.0, 102.0, 98.0, 101.0, 99.0];
        let low = [50.0, 52.0, 48.0, 51.0, 49.0];

        let r = t_test(&high, &low, TTestType::Welch, Alternative::Greater).unwrap();
        assert!(r.statistic > 0.0);
        assert!(r.p_value < 1e-6);
        assert_abs_diff_eq!(r.p_value, r.metadata["p_two_sided"] / 2.0, epsilon = 1e-15);

        let r = t_test(&low, &high, TTestType::Welch, Alternative::Greater).unwrap();
        assert!(r.statistic < 0.0);
        assert!(r.p_value > 0.999);
    }

    #[test]
    fn constant_identical_groups_do_not_produce_nan() {
        let r = t_test(&[10.0; 5], &[10.0; 5], TTestType::Welch, Alternative::Greater).unwrap();
        assert_eq!(r.statistic, 0.0);
        assert_abs_diff_eq!(r.p_value, 0.5);
    }

    #[test]
    fn constant_distinct_groups_are_infinitely_apart() {
        let r = t_test(&[10.0; 3], &[5.0; 3], TTestType::Welch, Alternative::Greater).unwrap();
        assert!(r.statistic.is_infinite() && r.statistic > 0.0);
        assert_eq!(r.p_value, 0.0);
    }

    #[test]
    fn too_few_observations() {
        assert!(matches!(
            t_test(&[1.0], &[1.0, 2.0], TTestType::Welch, Alternative::Greater),
            Err(StatsError::InsufficientData { needed: 2, got: 1 })
        ));
    }
}

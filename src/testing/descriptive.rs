//! Univariate summaries of a single sample slice.
//!
//! Quartiles are computed with linear interpolation between order statistics
//! (the "type 7" definition). The same routine feeds the reported Q1/Q3 and
//! the Tukey fences, so the outlier list always agrees with the quartiles
//! shown next to it.

use crate::error::{Result, StatsError};
use crate::testing::utils::{mean, sample_variance, sorted_copy, tie_group_sizes};

/// Tukey fence multiplier.
const IQR_FENCE: f64 = 1.5;

/// Full summary of one sample.
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptiveSummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub mode: f64,
    /// Sample standard deviation, NaN when `count < 2`.
    pub std_dev: f64,
    /// Sample variance, NaN when `count < 2`.
    pub variance: f64,
    pub range: f64,
    pub min: f64,
    pub max: f64,
    pub q1: f64,
    pub q2: f64,
    pub q3: f64,
    pub iqr: f64,
    /// Coefficient of variation in percent, NaN when the mean is zero.
    pub cv_percent: f64,
    pub outlier_count: usize,
    /// Values outside the Tukey fences, in sample order.
    pub outliers: Vec<f64>,
    pub distinct_values: usize,
}

/// Compute the full summary of `data`.
///
/// # Errors
///
/// `StatsError::InsufficientData` when `data` is empty.
pub fn describe(data: &[f64]) -> Result<DescriptiveSummary> {
    if data.is_empty() {
        return Err(StatsError::InsufficientData { needed: 1, got: 0 });
    }

    let sorted = sorted_copy(data);
    let n = sorted.len();

    let mean = mean(data);
    let variance = sample_variance(data);
    let std_dev = variance.sqrt();

    let q1 = quantile_sorted(&sorted, 0.25);
    let q2 = quantile_sorted(&sorted, 0.5);
    let q3 = quantile_sorted(&sorted, 0.75);
    let iqr = q3 - q1;

    let lower = q1 - IQR_FENCE * iqr;
    let upper = q3 + IQR_FENCE * iqr;
    let outliers: Vec<f64> = data.iter().copied().filter(|&v| v < lower || v > upper).collect();

    let cv_percent = if mean == 0.0 {
        f64::NAN
    } else {
        100.0 * std_dev / mean
    };

    let min = sorted[0];
    let max = sorted[n - 1];

    Ok(DescriptiveSummary {
        count: n,
        mean,
        median: q2,
        mode: mode_sorted(&sorted),
        std_dev,
        variance,
        range: max - min,
        min,
        max,
        q1,
        q2,
        q3,
        iqr,
        cv_percent,
        outlier_count: outliers.len(),
        outliers,
        distinct_values: tie_group_sizes(&sorted).len(),
    })
}

/// Quantile `p` (0..=1) of `data` by linear interpolation.
///
/// # Errors
///
/// `StatsError::InsufficientData` when `data` is empty.
pub fn quantile(data: &[f64], p: f64) -> Result<f64> {
    if data.is_empty() {
        return Err(StatsError::InsufficientData { needed: 1, got: 0 });
    }
    Ok(quantile_sorted(&sorted_copy(data), p))
}

/// Linear interpolation between the order statistics surrounding
/// `p * (n - 1)`. `sorted` must be non-empty and ascending.
pub(crate) fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let pos = p.clamp(0.0, 1.0) * (n - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Most frequent value; ties resolve to the smallest.
fn mode_sorted(sorted: &[f64]) -> f64 {
    let mut best = sorted[0];
    let mut best_count = 0;
    let mut i = 0;
    while i < sorted.len() {
        let mut j = i + 1;
        while j < sorted.len() && sorted[j] == sorted[i] {
            j += 1;
        }
        // Strict comparison keeps the earliest (smallest) run on ties
        if j - i > best_count {
            best_count = j - i;
            best = sorted[i];
        }
        i = j;
    }
    best
}

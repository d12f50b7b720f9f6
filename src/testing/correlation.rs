//! Time/size association within one (query, group) slice.
//!
//! Pearson's r when both metrics look normal, Spearman's rho (Pearson on
//! mid-ranks) otherwise. Both p-values use the t approximation
//! `t = r * sqrt((n - 2) / (1 - r^2))` with `n - 2` degrees of freedom.

use crate::error::{Result, StatsError};
use crate::testing::inference::normality::normality_test;
use crate::testing::utils::{average_ranks, mean};
use statrs::distribution::{ContinuousCDF, StudentsT};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrelationMethod {
    Pearson,
    Spearman,
}

impl CorrelationMethod {
    pub fn name(&self) -> &'static str {
        match self {
            CorrelationMethod::Pearson => "Pearson",
            CorrelationMethod::Spearman => "Spearman",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrelationStrength {
    Weak,
    Moderate,
    Strong,
}

impl CorrelationStrength {
    pub fn from_r(r: f64) -> Self {
        let abs_r = r.abs();
        if abs_r < 0.3 {
            CorrelationStrength::Weak
        } else if abs_r < 0.7 {
            CorrelationStrength::Moderate
        } else {
            CorrelationStrength::Strong
        }
    }
}

impl fmt::Display for CorrelationStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CorrelationStrength::Weak => "weak",
            CorrelationStrength::Moderate => "moderate",
            CorrelationStrength::Strong => "strong",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationResult {
    pub method: CorrelationMethod,
    pub coefficient: f64,
    pub p_value: f64,
    pub significant: bool,
    pub strength: CorrelationStrength,
    /// `r > 0`; zero counts as negative.
    pub positive: bool,
    pub n: usize,
}

impl CorrelationResult {
    pub fn direction(&self) -> &'static str {
        if self.positive { "positive" } else { "negative" }
    }
}

/// Pearson's r and its two-sided p-value.
///
/// # Errors
///
/// `InsufficientData` for fewer than three pairs (or unequal lengths),
/// `ConstantInput` when either variable has zero variance.
pub fn pearson(x: &[f64], y: &[f64]) -> Result<(f64, f64)> {
    let n = x.len().min(y.len());
    if n < 3 || x.len() != y.len() {
        return Err(StatsError::InsufficientData { needed: 3, got: n });
    }

    let mx = mean(x);
    let my = mean(y);
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - mx;
        let dy = yi - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx <= 0.0 || syy <= 0.0 {
        return Err(StatsError::ConstantInput);
    }

    let r = (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0);
    Ok((r, correlation_p_value(r, n)))
}

/// Spearman's rho (Pearson on average ranks) and its two-sided p-value.
pub fn spearman(x: &[f64], y: &[f64]) -> Result<(f64, f64)> {
    if x.len() != y.len() {
        return Err(StatsError::InsufficientData {
            needed: 3,
            got: x.len().min(y.len()),
        });
    }
    pearson(&average_ranks(x), &average_ranks(y))
}

fn correlation_p_value(r: f64, n: usize) -> f64 {
    let df = (n - 2) as f64;
    let r2 = r * r;
    if r2 >= 1.0 - 1e-15 {
        return 0.0;
    }

    let t = r * (df / (1.0 - r2)).sqrt();
    match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => (2.0 * dist.sf(t.abs())).min(1.0),
        Err(_) => 1.0,
    }
}

/// Correlate response time with response size for one slice.
///
/// Runs Shapiro-Wilk on both metrics to pick the method, then classifies
/// strength and direction. `alpha` is used both for the normality verdicts
/// and for significance.
pub fn analyze_correlation(
    time: &[f64],
    size: &[f64],
    alpha: f64,
    min_pairs: usize,
) -> Result<CorrelationResult> {
    let n = time.len().min(size.len());
    if n < min_pairs.max(3) || time.len() != size.len() {
        return Err(StatsError::InsufficientData {
            needed: min_pairs.max(3),
            got: n,
        });
    }

    let both_normal =
        normality_test(time, alpha)?.is_normal && normality_test(size, alpha)?.is_normal;
    let method = if both_normal {
        CorrelationMethod::Pearson
    } else {
        CorrelationMethod::Spearman
    };

    let (r, p) = match method {
        CorrelationMethod::Pearson => pearson(time, size)?,
        CorrelationMethod::Spearman => spearman(time, size)?,
    };

    Ok(CorrelationResult {
        method,
        coefficient: r,
        p_value: p,
        significant: p < alpha,
        strength: CorrelationStrength::from_r(r),
        positive: r > 0.0,
        n,
    })
}

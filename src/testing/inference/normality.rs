//! Shapiro-Wilk normality test.
//!
//! Implements Royston's approximation (Applied Statistics algorithm AS R94):
//! coefficients from Blom scores with polynomial corrections for the two
//! extreme order statistics, and a normalising transform of `1 - W` to get
//! the p-value. Exact p-value for n = 3.

use crate::error::{Result, StatsError};
use crate::testing::utils::{mean, sorted_copy};
use statrs::distribution::{ContinuousCDF, Normal};

/// Outcome of a normality test on one slice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalityVerdict {
    /// Shapiro-Wilk W, in (0, 1].
    pub statistic: f64,
    pub p_value: f64,
    /// `p_value > alpha`.
    pub is_normal: bool,
}

impl NormalityVerdict {
    pub fn from_test(statistic: f64, p_value: f64, alpha: f64) -> Self {
        NormalityVerdict {
            statistic,
            p_value,
            is_normal: p_value > alpha,
        }
    }
}

/// Run Shapiro-Wilk on `data` and decide normality at `alpha`.
///
/// # Errors
///
/// `StatsError::InsufficientSampleSize` when fewer than three values are
/// given.
pub fn normality_test(data: &[f64], alpha: f64) -> Result<NormalityVerdict> {
    let (w, p) = shapiro_wilk(data)?;
    Ok(NormalityVerdict::from_test(w, p, alpha))
}

// AS R94 polynomial coefficients
const C1: [f64; 6] = [0.0, 0.221157, -0.147981, -2.071190, 4.434685, -2.706056];
const C2: [f64; 6] = [0.0, 0.042981, -0.293762, -1.752461, 5.682633, -3.582633];
const C3: [f64; 4] = [0.5440, -0.39978, 0.025054, -6.714e-4];
const C4: [f64; 4] = [1.3822, -0.77857, 0.062767, -0.0020322];
const C5: [f64; 4] = [-1.5861, -0.31082, -0.083751, 0.0038915];
const C6: [f64; 3] = [-0.4803, -0.082676, 0.0030302];
const G: [f64; 2] = [-2.273, 0.459];

/// Shapiro-Wilk statistic and p-value.
///
/// A constant sample returns `(1.0, 1.0)`: there is no evidence against
/// normality in a sample with zero range.
pub fn shapiro_wilk(data: &[f64]) -> Result<(f64, f64)> {
    let n = data.len();
    if n < 3 {
        return Err(StatsError::InsufficientSampleSize { n });
    }

    let x = sorted_copy(data);
    if x[n - 1] - x[0] <= f64::EPSILON * x[n - 1].abs().max(1.0) {
        return Ok((1.0, 1.0));
    }

    if n == 3 {
        return Ok(shapiro_wilk_three(&x));
    }

    let a = coefficients(n);
    let nn2 = n / 2;

    let numerator: f64 = (0..nn2).map(|i| a[i] * (x[n - 1 - i] - x[i])).sum();
    let m = mean(&x);
    let ss: f64 = x.iter().map(|&v| (v - m) * (v - m)).sum();
    let w = ((numerator * numerator) / ss).min(1.0);

    Ok((w, p_value(w, n)))
}

fn shapiro_wilk_three(x: &[f64]) -> (f64, f64) {
    let m = mean(x);
    let ss: f64 = x.iter().map(|&v| (v - m) * (v - m)).sum();
    let spread = std::f64::consts::FRAC_1_SQRT_2 * (x[2] - x[0]);
    let w = (spread * spread / ss).clamp(0.75, 1.0);

    // P(W <= w) = 6/pi * (asin(sqrt(w)) - asin(sqrt(3/4)))
    let p = 6.0 / std::f64::consts::PI * (w.sqrt().asin() - std::f64::consts::FRAC_PI_3);
    (w, p.clamp(0.0, 1.0))
}

/// Horner evaluation of `c[0] + c[1] x + c[2] x^2 + ...`.
fn poly(c: &[f64], x: f64) -> f64 {
    c.iter().rev().fold(0.0, |acc, &ci| acc * x + ci)
}

/// Antisymmetric weights for the lower half of the order statistics.
fn coefficients(n: usize) -> Vec<f64> {
    let nn2 = n / 2;
    let an = n as f64;
    let normal = Normal::standard();

    let m: Vec<f64> = (1..=nn2)
        .map(|i| normal.inverse_cdf((i as f64 - 0.375) / (an + 0.25)))
        .collect();
    let summ2 = 2.0 * m.iter().map(|v| v * v).sum::<f64>();
    let ssumm2 = summ2.sqrt();
    let rsn = 1.0 / an.sqrt();

    let a1 = poly(&C1, rsn) - m[0] / ssumm2;
    let mut a = vec![0.0; nn2];
    a[0] = a1;

    if n > 5 {
        let a2 = -m[1] / ssumm2 + poly(&C2, rsn);
        let fac = ((summ2 - 2.0 * m[0] * m[0] - 2.0 * m[1] * m[1])
            / (1.0 - 2.0 * a1 * a1 - 2.0 * a2 * a2))
            .sqrt();
        a[1] = a2;
        for i in 2..nn2 {
            a[i] = -m[i] / fac;
        }
    } else {
        let fac = ((summ2 - 2.0 * m[0] * m[0]) / (1.0 - 2.0 * a1 * a1)).sqrt();
        for i in 1..nn2 {
            a[i] = -m[i] / fac;
        }
    }
    a
}

fn p_value(w: f64, n: usize) -> f64 {
    let w1 = 1.0 - w;
    if w1 <= 0.0 {
        return 1.0;
    }

    let an = n as f64;
    let y = w1.ln();
    let (z, mu, sigma) = if n <= 11 {
        let gamma = poly(&G, an);
        if y >= gamma {
            return 1e-99;
        }
        (-(gamma - y).ln(), poly(&C3, an), poly(&C4, an).exp())
    } else {
        let xx = an.ln();
        (y, poly(&C5, xx), poly(&C6, xx).exp())
    };

    let p = 1.0 - Normal::standard().cdf((z - mu) / sigma);
    p.clamp(0.0, 1.0)
}

use crate::error::{Result, StatsError};
use crate::testing::utils::{average_ranks, tie_group_sizes};
use crate::testing::{Alternative, TestResult};
use statrs::distribution::{ContinuousCDF, Normal};

/// Largest sample size (in at least one group) for which the exact null
/// distribution of U is used when there are no ties.
const EXACT_MAX_SIZE: usize = 8;

/// Every count in the exact recurrence must stay an integer that `f64`
/// represents exactly.
const EXACT_MAX_ARRANGEMENTS: f64 = 9_007_199_254_740_992.0; // 2^53

/// Mann-Whitney U test of `x` against `y`.
///
/// The statistic is U for `x`: the number of (x, y) pairs with x > y, ties
/// counting one half. `Alternative::Greater` tests whether `x` tends to be
/// larger than `y`; that p-value is already one-sided.
///
/// The exact null distribution is used when there are no ties, at least one
/// sample has at most eight values and the number of arrangements fits in
/// 2^53; otherwise the normal approximation with tie and continuity
/// correction.
pub fn mann_whitney(x: &[f64], y: &[f64], alternative: Alternative) -> Result<TestResult<f64>> {
    let nx = x.len();
    let ny = y.len();

    if nx == 0 || ny == 0 {
        return Err(StatsError::InsufficientData {
            needed: 1,
            got: 0,
        });
    }

    let combined: Vec<f64> = x.iter().chain(y.iter()).copied().collect();
    let ranks = average_ranks(&combined);

    // Calculate rank sum for group X
    let rank_sum_x: f64 = ranks[..nx].iter().sum();

    let nx_f = nx as f64;
    let ny_f = ny as f64;
    let u_x = rank_sum_x - nx_f * (nx_f + 1.0) / 2.0;
    let u_y = nx_f * ny_f - u_x;

    let ties = tie_group_sizes(&combined);
    let has_ties = ties.iter().any(|&t| t > 1);
    let exact = !has_ties
        && (nx <= EXACT_MAX_SIZE || ny <= EXACT_MAX_SIZE)
        && arrangements(nx, ny) <= EXACT_MAX_ARRANGEMENTS;

    let mean_u = nx_f * ny_f / 2.0;
    let n = nx_f + ny_f;
    let tie_term: f64 = ties
        .iter()
        .map(|&t| {
            let t = t as f64;
            t * t * t - t
        })
        .sum();
    let var_u = nx_f * ny_f / 12.0 * ((n + 1.0) - tie_term / (n * (n - 1.0)));

    let p_value = if exact {
        let distribution = exact_u_distribution(nx, ny);
        match alternative {
            Alternative::Greater => upper_tail(&distribution, u_x),
            Alternative::Less => upper_tail(&distribution, u_y),
            Alternative::TwoSided => (2.0 * upper_tail(&distribution, u_x.max(u_y))).min(1.0),
        }
    } else {
        match alternative {
            Alternative::Greater => normal_upper_tail(u_x, mean_u, var_u),
            Alternative::Less => normal_upper_tail(u_y, mean_u, var_u),
            Alternative::TwoSided => {
                (2.0 * normal_upper_tail(u_x.max(u_y), mean_u, var_u)).min(1.0)
            }
        }
    };

    let z_score = if var_u > 0.0 {
        (u_x - mean_u) / var_u.sqrt()
    } else {
        0.0
    };

    Ok(TestResult::new(u_x, p_value.clamp(0.0, 1.0))
        .with_standard_error(var_u.sqrt())
        .with_metadata("z_score", z_score)
        .with_metadata("mean_u", mean_u)
        .with_metadata("var_u", var_u)
        .with_metadata("u_y", u_y)
        .with_metadata("exact", if exact { 1.0 } else { 0.0 })
        .with_metadata("nx", nx_f)
        .with_metadata("ny", ny_f))
}

/// C(m + n, m), the number of equally likely rank arrangements under H0.
fn arrangements(m: usize, n: usize) -> f64 {
    let k = m.min(n);
    let total = m + n;
    (1..=k).fold(1.0, |acc, i| acc * (total - k + i) as f64 / i as f64)
}

/// P(U >= u) under the normal approximation with continuity correction.
fn normal_upper_tail(u: f64, mean_u: f64, var_u: f64) -> f64 {
    let numerator = u - mean_u - 0.5;
    if var_u <= 0.0 {
        // Every observation tied: U sits exactly at its mean
        return if numerator > 0.0 { 0.0 } else { 1.0 };
    }
    Normal::standard().sf(numerator / var_u.sqrt())
}

/// P(U >= u) from an exact probability mass function indexed by U.
fn upper_tail(pmf: &[f64], u: f64) -> f64 {
    let start = u.ceil().max(0.0) as usize;
    pmf.iter().skip(start).sum::<f64>().min(1.0)
}

/// Exact null distribution of U for sample sizes `m` and `n` without ties.
///
/// The counts are the coefficients of the Gaussian binomial
/// `[m + n choose m]_q = prod_{i=1..m} (1 - q^(n+i)) / (1 - q^i)`; they are
/// normalised into probabilities over U = 0..=m*n. Counts are exact only
/// while C(m + n, m) stays below 2^53.
pub fn exact_u_distribution(m: usize, n: usize) -> Vec<f64> {
    let (m, n) = if m <= n { (m, n) } else { (n, m) };
    let max_u = m * n;
    let mut counts = vec![0.0; max_u + 1];
    counts[0] = 1.0;

    for i in 1..=m {
        // Multiply by (1 - q^(n+i)), highest degree first
        let shift = n + i;
        for k in (shift..=max_u).rev() {
            counts[k] -= counts[k - shift];
        }
        // Divide by (1 - q^i): running sum with stride i
        for k in i..=max_u {
            counts[k] += counts[k - i];
        }
    }

    let total: f64 = counts.iter().sum();
    counts.iter().map(|&c| c / total).collect()
}

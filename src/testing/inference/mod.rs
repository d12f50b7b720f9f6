use crate::error::{Result, StatsError};
use crate::testing::inference::normality::NormalityVerdict;
use crate::testing::{Alternative, TTestType, TestMethod, TestResult};

pub mod normality;

pub mod parametric;

pub mod nonparametric;

/// Outcome of the one-sided comparison H1: mean(A) > mean(B).
#[derive(Debug, Clone, PartialEq)]
pub struct HypothesisResult {
    pub method: TestMethod,
    pub statistic: f64,
    /// One-sided p-value for "A greater than B".
    pub p_value: f64,
    pub reject_null: bool,
}

impl HypothesisResult {
    pub fn test_name(&self) -> &'static str {
        self.method.name()
    }
}

/// Pick the comparison for two slices from their normality verdicts.
///
/// Welch's t-test only when both slices were tested and found normal; a
/// missing verdict (slice too small to test) counts as non-normal.
pub fn select_test(a: Option<&NormalityVerdict>, b: Option<&NormalityVerdict>) -> TestMethod {
    match (a, b) {
        (Some(a), Some(b)) if a.is_normal && b.is_normal => {
            TestMethod::TTest(TTestType::Welch)
        }
        _ => TestMethod::MannWhitney,
    }
}

/// Two-sample tests on plain slices; `self` is always group A.
pub trait SampleStatTests {
    fn t_test(
        &self,
        other: &[f64],
        test_type: TTestType,
        alternative: Alternative,
    ) -> Result<TestResult<f64>>;

    fn mann_whitney_test(
        &self,
        other: &[f64],
        alternative: Alternative,
    ) -> Result<TestResult<f64>>;

    /// Run `method` against `other` with the alternative "self is greater"
    /// and decide at `alpha`. Both samples need at least two values.
    fn compare_greater(
        &self,
        other: &[f64],
        method: TestMethod,
        alpha: f64,
    ) -> Result<HypothesisResult>;
}

impl SampleStatTests for [f64] {
    fn t_test(
        &self,
        other: &[f64],
        test_type: TTestType,
        alternative: Alternative,
    ) -> Result<TestResult<f64>> {
        parametric::t_test(self, other, test_type, alternative)
    }

    fn mann_whitney_test(
        &self,
        other: &[f64],
        alternative: Alternative,
    ) -> Result<TestResult<f64>> {
        nonparametric::mann_whitney(self, other, alternative)
    }

    fn compare_greater(
        &self,
        other: &[f64],
        method: TestMethod,
        alpha: f64,
    ) -> Result<HypothesisResult> {
        if self.len() < 2 || other.len() < 2 {
            return Err(StatsError::InsufficientData {
                needed: 2,
                got: self.len().min(other.len()),
            });
        }

        let result = match method {
            TestMethod::TTest(test_type) => self.t_test(other, test_type, Alternative::Greater)?,
            TestMethod::MannWhitney => self.mann_whitney_test(other, Alternative::Greater)?,
        };

        Ok(HypothesisResult {
            method,
            statistic: result.statistic,
            p_value: result.p_value,
            reject_null: result.is_significant(alpha),
        })
    }
}

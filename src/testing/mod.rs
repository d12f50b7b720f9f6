use num_traits::Float;
use std::collections::BTreeMap;

pub mod correlation;
pub mod descriptive;
pub mod effect;
pub mod inference;

pub mod utils;

/// Two-sample comparison actually executed for a (query, metric) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestMethod {
    TTest(TTestType),
    MannWhitney,
}

impl TestMethod {
    pub fn name(&self) -> &'static str {
        match self {
            TestMethod::TTest(TTestType::Welch) => "Welch t-test",
            TestMethod::TTest(TTestType::Student) => "Student t-test",
            TestMethod::MannWhitney => "Mann-Whitney U",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TTestType {
    Student, // Equal variance
    Welch,   // Unequal variance
}

/// Direction of the alternative hypothesis, always stated for the first
/// sample relative to the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alternative {
    TwoSided,
    Less,
    Greater,
}

#[derive(Debug, Clone)]
pub struct TestResult<T> {
    /// The test statistic value (e.g., t-statistic, U statistic)
    pub statistic: T,
    /// The p-value of the test
    pub p_value: T,
    /// Degrees of freedom (for parametric inference)
    pub degrees_of_freedom: Option<T>,
    /// Standard error of the test statistic
    pub standard_error: Option<T>,
    /// Additional test-specific information
    pub metadata: BTreeMap<&'static str, T>,
}

impl<T> TestResult<T>
where
    T: Float,
{
    /// Create a new test result with minimal information
    pub fn new(statistic: T, p_value: T) -> Self {
        TestResult {
            statistic,
            p_value,
            degrees_of_freedom: None,
            standard_error: None,
            metadata: BTreeMap::new(),
        }
    }

    /// Add degrees of freedom to the result
    pub fn with_degrees_of_freedom(mut self, df: T) -> Self {
        self.degrees_of_freedom = Some(df);
        self
    }

    /// Add standard error to the result
    pub fn with_standard_error(mut self, se: T) -> Self {
        self.standard_error = Some(se);
        self
    }

    /// Add additional metadata
    pub fn with_metadata(mut self, key: &'static str, value: T) -> Self {
        self.metadata.insert(key, value);
        self
    }

    /// Check if the result is statistically significant at the given threshold
    pub fn is_significant(&self, alpha: T) -> bool {
        self.p_value < alpha
    }
}

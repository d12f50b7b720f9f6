//! Thresholds and significance levels used throughout an analysis run.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for one comparison run.
///
/// The defaults are the values every report is calibrated against; change
/// them only when the measurement campaign itself changes.
///
/// # Example
/// ```
/// use api_bench_stats::config::AnalysisConfig;
///
/// let config = AnalysisConfig::default();
/// assert_eq!(config.significance_level, 0.05);
/// assert_eq!(config.success_status, 200);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Alpha for hypothesis tests, normality verdicts and correlations.
    pub significance_level: f64,

    /// Confidence level of the mean-difference interval.
    pub confidence_level: f64,

    /// HTTP status code that marks a record as successful.
    pub success_status: u16,

    /// Coefficient of variation (percent) below which a size slice is
    /// reported as suspiciously stable.
    pub low_variation_cv_percent: f64,

    /// The low-variation check only applies above this mean size (KB).
    pub low_variation_mean_floor: f64,

    /// Cross-group mean size ratio above which (or below its inverse) the
    /// groups are assumed to return different payloads.
    pub size_ratio_limit: f64,

    /// Minimum fraction of successful records per group.
    pub min_success_rate: f64,

    /// |d| above which an effect size is treated as implausible.
    pub extreme_effect_threshold: f64,

    /// Minimum paired observations for a correlation.
    pub min_correlation_pairs: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            significance_level: 0.05,
            confidence_level: 0.95,
            success_status: 200,
            low_variation_cv_percent: 5.0,
            low_variation_mean_floor: 1.0,
            size_ratio_limit: 10.0,
            min_success_rate: 0.9,
            extreme_effect_threshold: 3.0,
            min_correlation_pairs: 3,
        }
    }
}

impl AnalysisConfig {
    /// Parse a configuration from TOML; missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> anyhow::Result<Self> {
        toml::from_str(source).map_err(|e| anyhow::anyhow!("invalid analysis config: {}", e))
    }

    /// Load overrides from a TOML file.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&source)
    }

    /// Render the full configuration as TOML, every key present.
    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        toml::to_string(self).context("failed to serialize analysis config")
    }

    /// Confidence level as a whole percentage, for report labels.
    pub fn confidence_percent(&self) -> u32 {
        (self.confidence_level * 100.0).round() as u32
    }
}

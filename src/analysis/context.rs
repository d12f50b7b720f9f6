use crate::config::AnalysisConfig;
use std::fmt;
use tracing::warn;

/// What triggered an alert. The report keys its limitation paragraphs off
/// these categories rather than the message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertKind {
    /// Every successful response of a slice had the same size.
    ConstantSize,
    /// Size coefficient of variation under the configured floor.
    LowVariation,
    /// Mean sizes of the two groups differ by more than the ratio limit.
    PayloadMismatch,
    /// A group's success rate is under the configured minimum.
    LowSuccessRate,
    /// |d| above the extreme-effect threshold.
    ExtremeEffect,
}

impl AlertKind {
    /// Constant or near-constant sizes, typical of cached responses.
    pub fn suggests_caching(self) -> bool {
        matches!(self, AlertKind::ConstantSize | AlertKind::LowVariation)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// State shared by every stage of one run.
///
/// Alerts accumulate in insertion order and are never removed; the report
/// lists all of them.
#[derive(Debug, Clone, Default)]
pub struct AnalysisContext {
    config: AnalysisConfig,
    alerts: Vec<Alert>,
}

impl AnalysisContext {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            alerts: Vec::new(),
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn add_alert(&mut self, kind: AlertKind, message: impl Into<String>) {
        let message = message.into();
        warn!("ALERT: {}", message);
        self.alerts.push(Alert { kind, message });
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn alert_count(&self) -> usize {
        self.alerts.len()
    }

    pub fn has_alert(&self, predicate: impl Fn(AlertKind) -> bool) -> bool {
        self.alerts.iter().any(|a| predicate(a.kind))
    }

    pub fn is_clean(&self) -> bool {
        self.alerts.is_empty()
    }
}

//! Measurement records produced by the collectors and the keys used to slice
//! them.
//!
//! The collectors write one CSV row per request. The core never mutates a
//! record; it only filters and projects them into numeric slices.

use serde::Deserialize;
use std::fmt;

pub mod loader;

pub use loader::{load_measurements, MeasurementSet};

/// Logical operation being benchmarked.
///
/// The collectors tag every row with `C1`, `C2` or `C3`; the tag maps to the
/// operation explicitly instead of being looked up by name at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
pub enum QueryId {
    /// C1: the subject's most popular repositories.
    #[serde(rename = "C1")]
    List,
    /// C2: details of a single repository.
    #[serde(rename = "C2")]
    Detail,
    /// C3: the latest issues of a repository.
    #[serde(rename = "C3")]
    Issues,
}

impl QueryId {
    /// The fixed query set, in report order.
    pub const ALL: [QueryId; 3] = [QueryId::List, QueryId::Detail, QueryId::Issues];

    pub fn tag(self) -> &'static str {
        match self {
            QueryId::List => "C1",
            QueryId::Detail => "C2",
            QueryId::Issues => "C3",
        }
    }
}

impl fmt::Display for QueryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One of the two API styles under comparison.
///
/// `Rest` is group A and `GraphQl` is group B in every one-sided test
/// (H1: mean(A) > mean(B)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
pub enum ApiGroup {
    #[serde(rename = "REST")]
    Rest,
    #[serde(rename = "GraphQL")]
    GraphQl,
}

impl ApiGroup {
    pub const ALL: [ApiGroup; 2] = [ApiGroup::Rest, ApiGroup::GraphQl];

    pub fn label(self) -> &'static str {
        match self {
            ApiGroup::Rest => "REST",
            ApiGroup::GraphQl => "GraphQL",
        }
    }
}

impl fmt::Display for ApiGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Numeric column of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Metric {
    ResponseTime,
    ResponseSize,
}

impl Metric {
    pub const ALL: [Metric; 2] = [Metric::ResponseTime, Metric::ResponseSize];

    /// Column name as written by the collectors.
    pub fn column(self) -> &'static str {
        match self {
            Metric::ResponseTime => "response_time_ms",
            Metric::ResponseSize => "response_size_kb",
        }
    }

    /// Human-readable label with unit.
    pub fn label(self) -> &'static str {
        match self {
            Metric::ResponseTime => "Response Time (ms)",
            Metric::ResponseSize => "Response Size (KB)",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// A single observed request.
///
/// Column aliases accept both the English headers and the Portuguese ones the
/// collectors write (`consulta`, `tipo_api`, ...).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MeasurementRecord {
    #[serde(alias = "id_execucao")]
    pub run_id: u64,
    #[serde(alias = "usuario")]
    pub subject: String,
    #[serde(alias = "consulta")]
    pub query_id: QueryId,
    #[serde(alias = "tipo_api")]
    pub group: ApiGroup,
    #[serde(alias = "tempo_resposta_ms")]
    pub response_time_ms: f64,
    #[serde(alias = "tamanho_resposta_kb")]
    pub response_size_kb: f64,
    pub status_code: u16,
    pub timestamp: String,
    #[serde(alias = "observacoes", default)]
    pub note: String,
}

impl MeasurementRecord {
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::ResponseTime => self.response_time_ms,
            Metric::ResponseSize => self.response_size_kb,
        }
    }

    pub fn is_success(&self, success_status: u16) -> bool {
        self.status_code == success_status
    }
}

/// Values of `metric` for one (query, group) slice, successful records only.
pub fn slice_values(
    records: &[MeasurementRecord],
    query: QueryId,
    group: ApiGroup,
    metric: Metric,
    success_status: u16,
) -> Vec<f64> {
    records
        .iter()
        .filter(|r| r.query_id == query && r.group == group && r.is_success(success_status))
        .map(|r| r.value(metric))
        .collect()
}

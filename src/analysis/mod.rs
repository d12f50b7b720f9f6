//! The comparison pipeline.
//!
//! One forward pass over the successful records: descriptive pairs, then
//! normality, hypothesis tests, effect sizes and correlations. Every stage
//! reads the maps filled by the stages before it and writes its own; failures
//! on one slice are logged and the slice is left out.

pub mod context;

pub use context::{Alert, AlertKind, AnalysisContext};

use crate::data::{slice_values, ApiGroup, MeasurementRecord, MeasurementSet, Metric, QueryId};
use crate::error::StatsError;
use crate::testing::correlation::{analyze_correlation, CorrelationResult};
use crate::testing::descriptive::{describe, DescriptiveSummary};
use crate::testing::effect::{effect_size, EffectSizeResult};
use crate::testing::inference::normality::{normality_test, NormalityVerdict};
use crate::testing::inference::{select_test, HypothesisResult, SampleStatTests};
use crate::testing::TestMethod;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{info, warn};

/// Results are keyed by (query, metric) for two-group comparisons.
pub type PairKey = (QueryId, Metric);

/// Record counts for one group before and after filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GroupCounts {
    pub total: usize,
    pub successful: usize,
}

impl GroupCounts {
    pub fn success_percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            100.0 * self.successful as f64 / self.total as f64
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PreprocessSummary {
    pub per_group: BTreeMap<ApiGroup, GroupCounts>,
    pub combined_successful: usize,
    pub queries: BTreeSet<QueryId>,
    pub groups: BTreeSet<ApiGroup>,
}

/// Both slices of a (query, metric) pair with their summaries.
#[derive(Debug, Clone, PartialEq)]
pub struct SlicePair {
    pub rest: Vec<f64>,
    pub graphql: Vec<f64>,
    pub rest_summary: DescriptiveSummary,
    pub graphql_summary: DescriptiveSummary,
}

/// Normality verdicts for a pair; `None` when the slice was too small to
/// test.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalityPair {
    pub rest: Option<NormalityVerdict>,
    pub graphql: Option<NormalityVerdict>,
    pub recommended: TestMethod,
}

/// How many queries showed a significant difference for each metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SignificanceCounts {
    pub time: usize,
    pub size: usize,
}

impl SignificanceCounts {
    pub fn from_hypotheses(hypotheses: &BTreeMap<PairKey, HypothesisResult>) -> Self {
        hypotheses
            .iter()
            .filter(|(_, h)| h.reject_null)
            .fold(SignificanceCounts::default(), |mut acc, ((_, metric), _)| {
                match metric {
                    Metric::ResponseTime => acc.time += 1,
                    Metric::ResponseSize => acc.size += 1,
                }
                acc
            })
    }
}

/// Everything computed in one run. Read-only once returned.
#[derive(Debug, Clone, Default)]
pub struct AnalysisResults {
    pub preprocess: PreprocessSummary,
    pub descriptive: BTreeMap<PairKey, SlicePair>,
    pub normality: BTreeMap<PairKey, NormalityPair>,
    pub hypotheses: BTreeMap<PairKey, HypothesisResult>,
    pub effects: BTreeMap<PairKey, EffectSizeResult>,
    pub correlations: BTreeMap<(QueryId, ApiGroup), CorrelationResult>,
}

impl AnalysisResults {
    pub fn significance_counts(&self) -> SignificanceCounts {
        SignificanceCounts::from_hypotheses(&self.hypotheses)
    }
}

/// Run every inferential stage over `set`.
///
/// Validation is separate (see [`crate::quality::validate`]); alerts raised
/// here (extreme effects) are appended to those already in `ctx`.
pub fn run_analysis(set: &MeasurementSet, ctx: &mut AnalysisContext) -> AnalysisResults {
    let preprocess = preprocess(set, ctx);
    let descriptive = descriptive_pairs(set, ctx);
    let normality = normality_pairs(&descriptive, ctx);
    let hypotheses = hypothesis_tests(&descriptive, &normality, ctx);
    let effects = effect_sizes(&descriptive, ctx);
    let correlations = correlations(set, ctx);

    AnalysisResults {
        preprocess,
        descriptive,
        normality,
        hypotheses,
        effects,
        correlations,
    }
}

pub fn preprocess(set: &MeasurementSet, ctx: &AnalysisContext) -> PreprocessSummary {
    let success = ctx.config().success_status;
    let mut summary = PreprocessSummary::default();

    for group in ApiGroup::ALL {
        let records = set.group(group);
        let counts = GroupCounts {
            total: records.len(),
            successful: records.iter().filter(|r| r.is_success(success)).count(),
        };
        info!(
            "{}: {} records, {} successful ({:.1}%)",
            group,
            counts.total,
            counts.successful,
            counts.success_percent()
        );
        summary.combined_successful += counts.successful;
        summary.per_group.insert(group, counts);
    }

    for record in set.all().filter(|r| r.is_success(success)) {
        summary.queries.insert(record.query_id);
        summary.groups.insert(record.group);
    }

    info!(
        "Combined successful records: {}, queries: {:?}, groups: {:?}",
        summary.combined_successful, summary.queries, summary.groups
    );
    summary
}

pub fn descriptive_pairs(
    set: &MeasurementSet,
    ctx: &AnalysisContext,
) -> BTreeMap<PairKey, SlicePair> {
    let success = ctx.config().success_status;
    let mut pairs = BTreeMap::new();

    for query in QueryId::ALL {
        for metric in Metric::ALL {
            let slice =
                |group: ApiGroup| slice_values(set.group(group), query, group, metric, success);
            let rest = slice(ApiGroup::Rest);
            let graphql = slice(ApiGroup::GraphQl);

            let (rest_summary, graphql_summary) = match (describe(&rest), describe(&graphql)) {
                (Ok(r), Ok(g)) => (r, g),
                (Err(e), _) | (_, Err(e)) => {
                    warn!("Insufficient data for {} - {}: {}", query, metric, e);
                    continue;
                }
            };

            let summaries = [
                (ApiGroup::Rest, &rest_summary),
                (ApiGroup::GraphQl, &graphql_summary),
            ];
            for (group, s) in summaries {
                info!(
                    "{} {} {}: n={} ({} distinct), mean={:.2}, median={:.2}, sd={:.2}, \
                     IQR={:.2}, CV={:.2}%, outliers={}",
                    query,
                    metric,
                    group,
                    s.count,
                    s.distinct_values,
                    s.mean,
                    s.median,
                    s.std_dev,
                    s.iqr,
                    s.cv_percent,
                    s.outlier_count
                );
            }

            pairs.insert(
                (query, metric),
                SlicePair {
                    rest,
                    graphql,
                    rest_summary,
                    graphql_summary,
                },
            );
        }
    }
    pairs
}

pub fn normality_pairs(
    descriptive: &BTreeMap<PairKey, SlicePair>,
    ctx: &AnalysisContext,
) -> BTreeMap<PairKey, NormalityPair> {
    let alpha = ctx.config().significance_level;

    descriptive
        .iter()
        .map(|(&(query, metric), pair)| {
            let verdict = |group: ApiGroup, values: &[f64]| match normality_test(values, alpha) {
                Ok(v) => {
                    info!(
                        "{} {} {}: W={:.4}, p={:.4} ({})",
                        query,
                        metric,
                        group,
                        v.statistic,
                        v.p_value,
                        if v.is_normal { "normal" } else { "non-normal" }
                    );
                    Some(v)
                }
                Err(e) => {
                    warn!("Normality test skipped for {} {} {}: {}", query, metric, group, e);
                    None
                }
            };

            let rest = verdict(ApiGroup::Rest, &pair.rest);
            let graphql = verdict(ApiGroup::GraphQl, &pair.graphql);
            let recommended = select_test(rest.as_ref(), graphql.as_ref());
            info!("{} {}: recommended test {}", query, metric, recommended.name());

            (
                (query, metric),
                NormalityPair {
                    rest,
                    graphql,
                    recommended,
                },
            )
        })
        .collect()
}

pub fn hypothesis_tests(
    descriptive: &BTreeMap<PairKey, SlicePair>,
    normality: &BTreeMap<PairKey, NormalityPair>,
    ctx: &AnalysisContext,
) -> BTreeMap<PairKey, HypothesisResult> {
    let alpha = ctx.config().significance_level;
    let mut results = BTreeMap::new();

    info!("H0: mean(REST) = mean(GraphQL); H1: mean(REST) > mean(GraphQL)");
    for (key, pair) in descriptive {
        let Some(norm) = normality.get(key) else {
            continue;
        };
        let (query, metric) = *key;

        match pair.rest.compare_greater(&pair.graphql, norm.recommended, alpha) {
            Ok(h) => {
                info!(
                    "{} {}: {} statistic={:.4}, p={:.4}, reject H0: {}",
                    query,
                    metric,
                    h.test_name(),
                    h.statistic,
                    h.p_value,
                    if h.reject_null { "YES" } else { "NO" }
                );
                results.insert(*key, h);
            }
            Err(e) => warn!("Hypothesis test skipped for {} {}: {}", query, metric, e),
        }
    }
    results
}

pub fn effect_sizes(
    descriptive: &BTreeMap<PairKey, SlicePair>,
    ctx: &mut AnalysisContext,
) -> BTreeMap<PairKey, EffectSizeResult> {
    let confidence = ctx.config().confidence_level;
    let threshold = ctx.config().extreme_effect_threshold;
    let mut results = BTreeMap::new();

    for (&(query, metric), pair) in descriptive {
        let effect = match effect_size(&pair.rest, &pair.graphql, confidence, threshold) {
            Ok(effect) => effect,
            Err(e) => {
                warn!("Effect size skipped for {} {}: {}", query, metric, e);
                continue;
            }
        };

        info!(
            "{} {}: Cohen's d={:.4} ({}), CI=[{:.2}, {:.2}], contains zero: {}",
            query,
            metric,
            effect.cohens_d,
            effect.magnitude,
            effect.interval.lower,
            effect.interval.upper,
            if effect.excludes_zero { "NO" } else { "YES" }
        );

        if effect.implausibly_extreme {
            ctx.add_alert(
                AlertKind::ExtremeEffect,
                format!("Extreme Cohen's d in {} {}: {:.2}", query, metric, effect.cohens_d),
            );
        }
        results.insert((query, metric), effect);
    }
    results
}

pub fn correlations(
    set: &MeasurementSet,
    ctx: &AnalysisContext,
) -> BTreeMap<(QueryId, ApiGroup), CorrelationResult> {
    let config = ctx.config();
    let mut results = BTreeMap::new();

    for query in QueryId::ALL {
        for group in ApiGroup::ALL {
            let records: Vec<&MeasurementRecord> = set
                .group(group)
                .iter()
                .filter(|r| {
                    r.query_id == query && r.group == group && r.is_success(config.success_status)
                })
                .collect();
            let time: Vec<f64> = records.iter().map(|r| r.response_time_ms).collect();
            let size: Vec<f64> = records.iter().map(|r| r.response_size_kb).collect();

            let outcome = analyze_correlation(
                &time,
                &size,
                config.significance_level,
                config.min_correlation_pairs,
            );
            match outcome {
                Ok(c) => {
                    info!(
                        "{} {}: {} r={:.4}, p={:.4}, significant: {}, {} {} correlation",
                        query,
                        group,
                        c.method.name(),
                        c.coefficient,
                        c.p_value,
                        if c.significant { "YES" } else { "NO" },
                        c.direction(),
                        c.strength
                    );
                    results.insert((query, group), c);
                }
                Err(StatsError::InsufficientData { .. }) => {
                    info!("{} {}: insufficient data", query, group)
                }
                Err(StatsError::ConstantInput) => {
                    info!("{} {}: a metric is constant, correlation undefined", query, group)
                }
                Err(e) => warn!("Correlation skipped for {} {}: {}", query, group, e),
            }
        }
    }
    results
}

//! Plain-text report of a finished run.
//!
//! The output depends only on the results, the alerts and the timestamp
//! passed in, so two renders of the same run are byte-identical.

use crate::analysis::{AlertKind, AnalysisContext, AnalysisResults};
use crate::data::{Metric, QueryId};
use chrono::NaiveDateTime;

const RULE_WIDTH: usize = 80;

/// Render the full report.
pub fn render_report(
    results: &AnalysisResults,
    ctx: &AnalysisContext,
    generated_at: NaiveDateTime,
) -> String {
    let heavy = "=".repeat(RULE_WIDTH);
    let light = "-".repeat(RULE_WIDTH);
    let mut lines: Vec<String> = Vec::new();

    lines.push(heavy.clone());
    lines.push("FULL REPORT: REST vs GraphQL".to_string());
    lines.push("Corrected and Validated Statistical Analysis".to_string());
    lines.push(heavy.clone());
    lines.push(format!("Analysis date: {}", generated_at.format("%Y-%m-%d %H:%M:%S")));
    lines.push(String::new());

    if !ctx.is_clean() {
        lines.push("DATA QUALITY ALERTS".to_string());
        lines.push(light.clone());
        for (i, alert) in ctx.alerts().iter().enumerate() {
            lines.push(format!("{}. {}", i + 1, alert));
        }
        lines.push(String::new());
        lines.push("WARNING: These alerts point to possible problems that must be".to_string());
        lines.push("taken into account when interpreting the results!".to_string());
        lines.push(String::new());
    }

    let counts = results.significance_counts();
    let query_total = QueryId::ALL.len();

    lines.push("EXECUTIVE SUMMARY".to_string());
    lines.push(light.clone());
    lines.push(String::new());
    lines.push(format!(
        "Response Time: {}/{} queries with a significant difference",
        counts.time, query_total
    ));
    lines.push(format!(
        "Response Size: {}/{} queries with a significant difference",
        counts.size, query_total
    ));
    lines.push(String::new());

    for query in QueryId::ALL {
        lines.push(String::new());
        lines.push(format!("QUERY {}", query));
        lines.push(light.clone());
        for metric in Metric::ALL {
            push_metric_block(&mut lines, results, ctx, query, metric);
        }
    }

    lines.push(String::new());
    lines.push(String::new());
    lines.push("STUDY LIMITATIONS".to_string());
    lines.push(light.clone());
    lines.push(String::new());
    lines.push("This study has the following limitations, which must be considered:".to_string());
    lines.push(String::new());

    if ctx.has_alert(|k| k == AlertKind::PayloadMismatch) {
        lines.push("1. POSSIBLY UNFAIR COMPARISON:".to_string());
        lines.push("   The REST and GraphQL queries may not be returning exactly the".to_string());
        lines.push("   same data. GraphQL selects specific fields while REST returns".to_string());
        lines.push("   complete structures, which can explain large differences in".to_string());
        lines.push("   response sizes.".to_string());
        lines.push(String::new());
    }

    if ctx.has_alert(AlertKind::suggests_caching) {
        lines.push("2. POSSIBLE UNDOCUMENTED CACHING:".to_string());
        lines.push("   Nearly constant response sizes suggest caching or static data".to_string());
        lines.push("   that was not documented. This reduces the external validity of".to_string());
        lines.push("   the results.".to_string());
        lines.push(String::new());
    }

    lines.push("3. NETWORK CONDITIONS:".to_string());
    lines.push("   Measurements were taken in one specific environment. Results may".to_string());
    lines.push("   vary with other network conditions and server load.".to_string());
    lines.push(String::new());

    lines.push(String::new());
    lines.push("CONCLUSIONS".to_string());
    lines.push(light);
    lines.push(String::new());

    let verdict = if counts.size > counts.time {
        "GraphQL shows a SIGNIFICANT advantage in response size."
    } else if counts.time > counts.size {
        "GraphQL shows a SIGNIFICANT advantage in response time."
    } else {
        "Mixed results across the analysed metrics."
    };
    lines.push(verdict.to_string());

    if !ctx.is_clean() {
        lines.push(String::new());
        lines.push("HOWEVER, given the data quality alerts identified above, these".to_string());
        lines.push("conclusions should be interpreted with caution.".to_string());
    }

    lines.push(String::new());
    lines.push(heavy);

    lines.join("\n")
}

/// One metric of one query; omitted when no hypothesis test ran for it.
fn push_metric_block(
    lines: &mut Vec<String>,
    results: &AnalysisResults,
    ctx: &AnalysisContext,
    query: QueryId,
    metric: Metric,
) {
    let key = (query, metric);
    let (Some(pair), Some(hypothesis)) =
        (results.descriptive.get(&key), results.hypotheses.get(&key))
    else {
        return;
    };

    lines.push(String::new());
    lines.push(format!("{}:", metric.label()));
    lines.push(format!(
        "  Mean REST: {:.2} ({} distinct values)",
        pair.rest_summary.mean, pair.rest_summary.distinct_values
    ));
    lines.push(format!(
        "  Mean GraphQL: {:.2} ({} distinct values)",
        pair.graphql_summary.mean, pair.graphql_summary.distinct_values
    ));
    lines.push(format!(
        "  Difference: {:.2}",
        pair.rest_summary.mean - pair.graphql_summary.mean
    ));
    lines.push(format!("  Test: {}", hypothesis.test_name()));
    lines.push(format!("  p-value: {:.4}", hypothesis.p_value));
    lines.push(format!(
        "  Significant: {}",
        if hypothesis.reject_null { "YES" } else { "NO" }
    ));

    if let Some(effect) = results.effects.get(&key) {
        lines.push(format!("  Cohen's d: {:.4} ({})", effect.cohens_d, effect.magnitude));
        lines.push(format!(
            "  {}% CI: [{:.2}, {:.2}]",
            ctx.config().confidence_percent(),
            effect.interval.lower,
            effect.interval.upper
        ));
        if effect.implausibly_extreme {
            lines.push("  ALERT: extreme Cohen's d - the comparison may be unfair!".to_string());
        }
    }
}

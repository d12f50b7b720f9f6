//! Data-quality checks run before any inference.
//!
//! Nothing here stops the analysis. Each finding becomes an alert in the
//! [`AnalysisContext`] and ends up in the report, so a reader can judge how
//! far the numbers that follow can be trusted.

use crate::analysis::context::{AlertKind, AnalysisContext};
use crate::data::{slice_values, ApiGroup, MeasurementSet, Metric, QueryId};
use crate::testing::descriptive::describe;
use crate::testing::utils::mean;
use tracing::info;

/// Run every check against `set`, recording alerts in `ctx`.
///
/// Returns `true` when none of the checks fired.
pub fn validate(set: &MeasurementSet, ctx: &mut AnalysisContext) -> bool {
    let before = ctx.alert_count();

    info!("Data quality validation");
    check_size_variation(set, ctx);
    check_size_ratio(set, ctx);
    check_success_rate(set, ctx);

    let fired = ctx.alert_count() - before;
    if fired == 0 {
        info!("No critical data problems detected");
    } else {
        info!("Total alerts: {} (they will be included in the final report)", fired);
    }
    fired == 0
}

/// Constant or near-constant response sizes per (group, query).
fn check_size_variation(set: &MeasurementSet, ctx: &mut AnalysisContext) {
    let config = ctx.config().clone();

    for group in ApiGroup::ALL {
        for query in QueryId::ALL {
            let sizes = slice_values(
                set.group(group),
                query,
                group,
                Metric::ResponseSize,
                config.success_status,
            );
            let Ok(summary) = describe(&sizes) else {
                continue;
            };

            // Size CV with a non-positive mean is reported as zero
            let cv = if summary.mean > 0.0 { summary.cv_percent } else { 0.0 };
            info!(
                "{} {}: {} distinct values, CV={:.2}%",
                group, query, summary.distinct_values, cv
            );

            if summary.distinct_values == 1 {
                ctx.add_alert(
                    AlertKind::ConstantSize,
                    format!(
                        "{} {} has ALL response sizes identical ({:.2} KB)",
                        group, query, summary.mean
                    ),
                );
            } else if cv < config.low_variation_cv_percent
                && summary.mean > config.low_variation_mean_floor
            {
                ctx.add_alert(
                    AlertKind::LowVariation,
                    format!("{} {} has very low size variation (CV={:.1}%)", group, query, cv),
                );
            }
        }
    }
}

/// Mean size of REST over GraphQL per query; far apart means the two APIs
/// are probably not returning the same data.
fn check_size_ratio(set: &MeasurementSet, ctx: &mut AnalysisContext) {
    let config = ctx.config().clone();

    for query in QueryId::ALL {
        let rest = slice_values(
            set.group(ApiGroup::Rest),
            query,
            ApiGroup::Rest,
            Metric::ResponseSize,
            config.success_status,
        );
        let graphql = slice_values(
            set.group(ApiGroup::GraphQl),
            query,
            ApiGroup::GraphQl,
            Metric::ResponseSize,
            config.success_status,
        );
        if rest.is_empty() || graphql.is_empty() {
            continue;
        }

        let mean_rest = mean(&rest);
        let mean_graphql = mean(&graphql);
        let ratio = size_ratio(mean_rest, mean_graphql);
        info!(
            "{}: REST={:.2}KB vs GraphQL={:.2}KB (ratio={:.1}x)",
            query, mean_rest, mean_graphql, ratio
        );

        if ratio > config.size_ratio_limit || ratio < 1.0 / config.size_ratio_limit {
            ctx.add_alert(
                AlertKind::PayloadMismatch,
                format!(
                    "{} shows a {:.1}x size difference - \
                     REST and GraphQL may be returning DIFFERENT DATA",
                    query, ratio
                ),
            );
        }
    }
}

/// `a / b`, infinite when `b` is not positive.
pub fn size_ratio(a: f64, b: f64) -> f64 {
    if b > 0.0 { a / b } else { f64::INFINITY }
}

/// Share of records per group carrying the success status, across all queries.
fn check_success_rate(set: &MeasurementSet, ctx: &mut AnalysisContext) {
    let config = ctx.config().clone();

    for group in ApiGroup::ALL {
        let records = set.group(group);
        let total = records.len();
        let succeeded = records.iter().filter(|r| r.is_success(config.success_status)).count();
        let rate = if total > 0 {
            succeeded as f64 / total as f64
        } else {
            0.0
        };
        info!("{}: {}/{} ({:.1}%)", group, succeeded, total, rate * 100.0);

        if rate < config.min_success_rate {
            ctx.add_alert(
                AlertKind::LowSuccessRate,
                format!("{} has a low success rate ({:.1}%)", group, rate * 100.0),
            );
        }
    }
}

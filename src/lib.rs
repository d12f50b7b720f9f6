//! # api-bench-stats
//!
//! Statistical comparison of two populations of API performance measurements:
//! one log collected from a REST API, one from a GraphQL API serving the same
//! logical queries.
//!
//! The crate does not collect anything. It reads the two measurement logs,
//! checks whether the data is fit for comparison, and then answers, per query
//! and per metric, whether REST responses are larger or slower than GraphQL
//! ones, how large that difference is, and how far the answer can be trusted.
//!
//! ## Core Features
//!
//! - **Data-quality validation**: constant payloads, suspiciously low
//!   variation, mismatched payload sizes and low success rates are reported
//!   as alerts instead of silently skewing the results
//! - **Descriptive statistics**: full univariate summaries with Tukey outliers
//! - **Hypothesis testing**: one-sided Welch t-test or Mann-Whitney U, chosen
//!   from Shapiro-Wilk normality verdicts
//! - **Effect sizes**: Cohen's d with magnitude bands and a confidence
//!   interval for the mean difference
//! - **Correlation**: Pearson or Spearman between response time and size
//!
//! ## Quick Start
//!
//! Load a [`data::MeasurementSet`], run [`quality::validate`] and
//! [`analysis::run_analysis`] against one [`analysis::AnalysisContext`], then
//! render the outcome with [`report::render_report`].
//!
//! ## Module Organization
//!
//! - **[`testing`]**: Statistical routines (descriptive, inference, effect size, correlation)
//! - **[`data`]**: Measurement records and CSV loading
//! - **[`quality`]**: Data-quality checks
//! - **[`analysis`]**: Alert context and the comparison pipeline
//! - **[`report`]**: Text report

pub mod analysis;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod quality;
pub mod report;
pub mod testing;

pub use error::{Result, StatsError};

//! Command-line arguments for the comparison binary.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "api-bench-stats")]
#[command(version)]
#[command(about = "Statistical comparison of REST and GraphQL measurement logs", long_about = None)]
pub struct Cli {
    /// Measurement log collected from the REST API
    #[arg(value_name = "REST_CSV", default_value = "data/metrics_rest.csv")]
    pub rest: PathBuf,

    /// Measurement log collected from the GraphQL API
    #[arg(value_name = "GRAPHQL_CSV", default_value = "data/metrics_graphql.csv")]
    pub graphql: PathBuf,
}

/// Where the rendered report is written, relative to the working directory.
pub const REPORT_FILE: &str = "statistical_report.txt";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_default_when_omitted() {
        let cli = Cli::parse_from(["api-bench-stats"]);
        assert_eq!(cli.rest, PathBuf::from("data/metrics_rest.csv"));
        assert_eq!(cli.graphql, PathBuf::from("data/metrics_graphql.csv"));
    }

    #[test]
    fn positional_paths_override_defaults() {
        let cli = Cli::parse_from(["api-bench-stats", "a.csv", "b.csv"]);
        assert_eq!(cli.rest, PathBuf::from("a.csv"));
        assert_eq!(cli.graphql, PathBuf::from("b.csv"));
    }

    #[test]
    fn flags_are_rejected() {
        assert!(Cli::try_parse_from(["api-bench-stats", "--verbose"]).is_err());
    }
}

use std::path::PathBuf;

/// Errors raised by the statistical routines and the measurement loader.
///
/// Per-slice variants (`InsufficientData`, `InsufficientSampleSize`,
/// `ConstantInput`) are recoverable: the pipeline skips the affected slice and
/// keeps going. `InputMissing` is fatal and aborts before any analysis.
#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    #[error("insufficient data: need at least {needed} observations, got {got}")]
    InsufficientData { needed: usize, got: usize },

    #[error("insufficient sample size for normality test: n = {n} (need at least 3)")]
    InsufficientSampleSize { n: usize },

    #[error("input has zero variance")]
    ConstantInput,

    #[error("measurement files not found, looked for: {}", display_paths(.paths))]
    InputMissing { paths: Vec<PathBuf> },

    #[error("malformed measurement record in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{path} line {line}: {column} must be a finite non-negative number, got {value}")]
    InvalidMeasurement {
        path: PathBuf,
        line: usize,
        column: &'static str,
        value: f64,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" and ")
}

pub type Result<T> = std::result::Result<T, StatsError>;

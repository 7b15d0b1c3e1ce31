use std::path::PathBuf;

use thiserror::Error;

/// Why a load stopped. The first failing stage wins; nothing is retried.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not find the data file in any of: {}", display_paths(candidates))]
    DataSourceNotFound { candidates: Vec<PathBuf> },

    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("missing required columns: {}", missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("failed to parse {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

/// Malformed tabular or cell content.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed CSV")]
    Csv(#[from] csv::Error),

    #[error("row {row}: '{value}' in column '{column}' is not a date")]
    Date {
        row: usize,
        column: String,
        value: String,
    },

    #[error("row {row}: '{value}' in column '{column}' is not a number")]
    Number {
        row: usize,
        column: String,
        value: String,
    },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

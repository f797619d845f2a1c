//! CLI error types.

use std::path::PathBuf;

use versetex_config::ConfigError;
use versetex_core::{PreprocessError, TemplateError};

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("Cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot write output: {0}")]
    Write(#[source] std::io::Error),

    #[error("Invalid format.template: {0}")]
    Template(#[from] TemplateError),

    #[error("{0}")]
    Preprocess(#[from] PreprocessError),
}

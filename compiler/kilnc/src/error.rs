use std::path::PathBuf;

use kiln_types::DeclError;

/// Failures that stop the driver before any diagnostics are produced.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("cannot read `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid manifest `{}`: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("manifest error: {0}")]
    Manifest(String),

    #[error(transparent)]
    Declaration(#[from] DeclError),

    #[error("{0}")]
    Usage(String),

    #[error("cannot write output: {0}")]
    Output(#[source] std::io::Error),
}

use std::path::PathBuf;

use crate::fetch_cache::QueryKind;

#[derive(thiserror::Error, Debug)]
pub enum ExplorerError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
    #[error(transparent)]
    Model(#[from] ramp_model::ModelError),
}

/// Why a transport could not produce a payload.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    #[error("no fixture for query `{0}`")]
    NoFixture(QueryKind),
    #[error("server error: {0}")]
    Server(String),
}

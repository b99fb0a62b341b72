use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

use crate::error::{ExplorerError, TransportError};
use crate::fetch_cache::{FetchPayload, QueryKind};

/// Whatever talks to the REST/GraphQL backends.
pub trait Transport {
    fn fetch(&mut self, kind: QueryKind, params: &Value) -> Result<FetchPayload, TransportError>;
}

/// Serves canned payloads per query kind; used for replays and tests.
#[derive(Debug, Clone, Default)]
pub struct FixtureTransport {
    fixtures: HashMap<QueryKind, FetchPayload>,
    failures: HashMap<QueryKind, String>,
}

impl FixtureTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a JSON object mapping query kind names to payloads.
    pub fn load_from_file(path: &Path) -> Result<Self, ExplorerError> {
        let json = std::fs::read_to_string(path).map_err(|source| ExplorerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let fixtures: HashMap<QueryKind, FetchPayload> = serde_json::from_str(&json)?;
        Ok(Self {
            fixtures,
            ..Self::default()
        })
    }

    pub fn with_payload(mut self, kind: QueryKind, payload: FetchPayload) -> Self {
        self.fixtures.insert(kind, payload);
        self
    }

    pub fn with_failure(mut self, kind: QueryKind, message: &str) -> Self {
        self.failures.insert(kind, message.to_string());
        self
    }
}

impl Transport for FixtureTransport {
    fn fetch(&mut self, kind: QueryKind, params: &Value) -> Result<FetchPayload, TransportError> {
        tracing::trace!(kind = %kind, %params, "fixture fetch");
        if let Some(message) = self.failures.get(&kind) {
            return Err(TransportError::Server(message.clone()));
        }
        self.fixtures
            .get(&kind)
            .cloned()
            .ok_or(TransportError::NoFixture(kind))
    }
}

use serde_json::Value;
use std::path::PathBuf;

use crate::actions::Action;
use crate::fetch_cache::RequestTicket;
use crate::serialization::{self, Snapshot};
use crate::store::Store;
use crate::transport::Transport;

/// Deferred effects that must run outside the reducer (network, file IO)
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Ask the transport for a query result
    Fetch { ticket: RequestTicket, params: Value },
    /// Save the restorable part of the store to disk
    SaveSnapshot { path: PathBuf },
    /// Restore a snapshot from disk
    LoadSnapshot { path: PathBuf },
}

/// Execute a single effect. Fetches answer with a completion action to be
/// dispatched; file effects report failures through the store.
pub fn run(store: &mut Store, transport: &mut dyn Transport, effect: Effect) -> Option<Action> {
    match effect {
        Effect::Fetch { ticket, params } => match transport.fetch(ticket.kind, &params) {
            Ok(payload) => Some(Action::FetchSucceeded { ticket, payload }),
            Err(e) => Some(Action::FetchFailed {
                ticket,
                error: e.to_string(),
            }),
        },
        Effect::SaveSnapshot { path } => {
            if let Err(e) = serialization::save_to_file(&Snapshot::from_store(store), &path) {
                tracing::warn!(path = %path.display(), error = %e, "snapshot save failed");
                store.error_message = Some(e.to_string());
            }
            None
        }
        Effect::LoadSnapshot { path } => {
            match serialization::load_from_file(&path) {
                Ok(snapshot) => snapshot.apply(store),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "snapshot load failed");
                    store.error_message = Some(e.to_string());
                }
            }
            None
        }
    }
}

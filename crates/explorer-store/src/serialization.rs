use ramp_model::OrderedMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::entity::Disease;
use crate::error::ExplorerError;
use crate::store::Store;

// ------------------------------------------------------------------
// Serialization structures
// ------------------------------------------------------------------

/// The user-facing part of the store worth restoring across sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub active_tab: Option<String>,
    #[serde(default)]
    pub selected_filters: OrderedMap<String, Vec<String>>,
    #[serde(default)]
    pub diseases: Vec<Disease>,
    #[serde(default)]
    pub selected_disease: Option<String>,
}

impl Snapshot {
    pub fn from_store(store: &Store) -> Self {
        Self {
            active_tab: store.active_tab.get().clone(),
            selected_filters: store.filters.selected().clone(),
            diseases: store.diseases.select_all().into_iter().cloned().collect(),
            selected_disease: store.diseases.selected_id().map(str::to_string),
        }
    }

    /// Overwrite the matching parts of `store`.
    pub fn apply(self, store: &mut Store) {
        store.active_tab.set(self.active_tab);
        store.filters.clear_all();
        for (label, values) in self.selected_filters.iter() {
            store.filters.set_selected_values(label, values.clone());
        }
        store.diseases.set_all(self.diseases);
        store.diseases.select(self.selected_disease);
    }
}

// ------------------------------------------------------------------
// File I/O operations
// ------------------------------------------------------------------

pub fn save_to_file(snapshot: &Snapshot, path: &Path) -> Result<(), ExplorerError> {
    let json = serde_json::to_string_pretty(snapshot)?;
    std::fs::write(path, json).map_err(|source| ExplorerError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_from_file(path: &Path) -> Result<Snapshot, ExplorerError> {
    let json = std::fs::read_to_string(path).map_err(|source| ExplorerError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&json)?)
}

//! Keyed collections of domain records.

use ramp_model::OrderedMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A record with a stable semantic identifier.
pub trait Entity: Clone {
    fn id(&self) -> &str;
}

/// Records keyed by [`Entity::id`], plus the id of the record currently
/// opened in a detail view.
#[derive(Debug, Clone)]
pub struct EntityStore<T> {
    records: OrderedMap<String, T>,
    selected_id: Option<String>,
}

impl<T> Default for EntityStore<T> {
    fn default() -> Self {
        Self {
            records: OrderedMap::default(),
            selected_id: None,
        }
    }
}

impl<T: Entity> EntityStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole collection. The selection survives only if the
    /// selected id is still present.
    pub fn set_all(&mut self, records: impl IntoIterator<Item = T>) {
        self.records = records
            .into_iter()
            .map(|r| (r.id().to_string(), r))
            .collect();
        let still_present = self
            .selected_id
            .as_ref()
            .is_some_and(|id| self.records.contains_key(id));
        if !still_present {
            self.selected_id = None;
        }
    }

    /// Insert or replace one record in place.
    pub fn upsert_one(&mut self, record: T) {
        self.records.insert(record.id().to_string(), record);
    }

    pub fn remove_one(&mut self, id: &str) -> Option<T> {
        let removed = self.records.remove(&id.to_string());
        if removed.is_some() && self.selected_id.as_deref() == Some(id) {
            self.selected_id = None;
        }
        removed
    }

    pub fn select_all(&self) -> Vec<&T> {
        self.records.values().collect()
    }

    pub fn select_by_id(&self, id: &str) -> Option<&T> {
        self.records.get(&id.to_string())
    }

    pub fn ids(&self) -> Vec<&str> {
        self.records.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.selected_id = None;
    }

    pub fn select(&mut self, id: Option<String>) {
        self.selected_id = id;
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    pub fn selected(&self) -> Option<&T> {
        self.selected_id
            .as_deref()
            .and_then(|id| self.select_by_id(id))
    }
}

/// A rare disease, keyed by its GARD identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Disease {
    #[serde(rename = "gardId")]
    pub gard_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Entity for Disease {
    fn id(&self) -> &str {
        &self.gard_id
    }
}

/// A node of the disease hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseNode {
    #[serde(rename = "gardId")]
    pub gard_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DiseaseNode>,
}

/// A gene or metabolite, keyed by its source identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analyte {
    #[serde(rename = "sourceId")]
    pub source_id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Entity for Analyte {
    fn id(&self) -> &str {
        &self.source_id
    }
}

#[cfg(test)]
pub(crate) fn disease(id: &str, name: &str) -> Disease {
    Disease {
        gard_id: id.to_string(),
        name: Some(name.to_string()),
        fields: Map::new(),
    }
}

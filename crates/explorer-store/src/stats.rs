//! RAMP database metadata shown on the landing and about pages.

use ramp_model::OrderedMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One region of an UpSet-style intersection plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intersect {
    pub id: String,
    pub sets: Vec<String>,
    pub size: u64,
}

/// Database summary. Source versions and entity counts are passed through
/// to the tables unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RampStats {
    pub source_versions: Vec<Value>,
    pub entity_counts: Vec<Value>,
    pub metabolite_intersects: Vec<Intersect>,
    pub gene_intersects: Vec<Intersect>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,
}

/// Identifier prefixes accepted for one analyte type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportedIds {
    pub analyte_type: String,
    pub id_types: Vec<String>,
}

/// API documentation: section name → path descriptions.
pub type ApiPaths = OrderedMap<String, Vec<Value>>;

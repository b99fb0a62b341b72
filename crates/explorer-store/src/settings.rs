use once_cell::sync::Lazy;
use ramp_model::RatioPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ExplorerError;

/// Query parameters that drive paging and sorting rather than filters.
pub const RESERVED_PARAMS: [&str; 4] = ["sort", "pageIndex", "pageSize", "direction"];

pub static DEFAULT_SETTINGS: Lazy<ExplorerSettings> = Lazy::new(ExplorerSettings::default);

/// Tunables for the browse pages and the statistics tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExplorerSettings {
    pub reserved_params: Vec<String>,
    /// Joins multiple selected values inside one query parameter.
    pub filter_delimiter: String,
    pub default_sort: String,
    /// The one sort field that orders ascending.
    pub ascending_sort: String,
    pub default_page_size: usize,
    /// Page size when fetching the values of one filter category.
    pub filter_fetch_limit: usize,
    pub ratio_policy: RatioPolicy,
}

impl Default for ExplorerSettings {
    fn default() -> Self {
        Self {
            reserved_params: RESERVED_PARAMS.iter().map(|p| p.to_string()).collect(),
            filter_delimiter: "&".to_string(),
            default_sort: "COUNT_ARTICLES".to_string(),
            ascending_sort: "GardName".to_string(),
            default_page_size: 10,
            filter_fetch_limit: 200,
            ratio_policy: RatioPolicy::Truthy,
        }
    }
}

impl ExplorerSettings {
    pub fn is_reserved(&self, key: &str) -> bool {
        self.reserved_params.iter().any(|p| p == key)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ExplorerError> {
        let json = std::fs::read_to_string(path).map_err(|source| ExplorerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Self = serde_json::from_str(&json)?;
        if settings.filter_delimiter.is_empty() {
            return Err(ExplorerError::InvalidSettings(
                "filterDelimiter must not be empty".to_string(),
            ));
        }
        Ok(settings)
    }
}

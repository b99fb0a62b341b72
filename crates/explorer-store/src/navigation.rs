use ramp_model::OrderedMap;
use serde::{Deserialize, Serialize};

use crate::settings::ExplorerSettings;

/// Router events the browse page reacts to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum NavigationEvent {
    Start,
    End { params: OrderedMap<String, String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    /// Only the configured name field sorts ascending; counts sort descending.
    pub fn for_sort(sort: &str, settings: &ExplorerSettings) -> Self {
        if sort == settings.ascending_sort {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        }
    }
}

/// Paging and sorting for a list request. `page_index` is 0-based here and
/// 1-based in the URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    pub page_index: usize,
    pub page_size: usize,
    pub sort: String,
    pub direction: SortDirection,
}

impl PageRequest {
    pub fn first(settings: &ExplorerSettings) -> Self {
        Self {
            page_index: 0,
            page_size: settings.default_page_size,
            sort: settings.default_sort.clone(),
            direction: SortDirection::for_sort(&settings.default_sort, settings),
        }
    }

    /// Unparseable or missing values fall back to the defaults.
    pub fn from_params(params: &OrderedMap<String, String>, settings: &ExplorerSettings) -> Self {
        let mut page = Self::first(settings);
        let get = |key: &str| params.get(&key.to_string());

        if let Some(index) = get("pageIndex").and_then(|v| v.parse::<usize>().ok()) {
            page.page_index = index.saturating_sub(1);
        }
        if let Some(size) = get("pageSize").and_then(|v| v.parse::<usize>().ok()) {
            if size > 0 {
                page.page_size = size;
            }
        }
        if let Some(sort) = get("sort").filter(|s| !s.is_empty()) {
            page.sort = sort.clone();
            page.direction = SortDirection::for_sort(sort, settings);
        }
        match get("direction").map(String::as_str) {
            Some("ASC") => page.direction = SortDirection::Asc,
            Some("DESC") => page.direction = SortDirection::Desc,
            _ => {}
        }
        page
    }

    pub fn to_params(&self) -> OrderedMap<String, String> {
        OrderedMap::from_pairs(vec![
            ("pageIndex".to_string(), (self.page_index + 1).to_string()),
            ("pageSize".to_string(), self.page_size.to_string()),
            ("sort".to_string(), self.sort.clone()),
            ("direction".to_string(), self.direction.as_str().to_string()),
        ])
    }

    /// Number of records to skip for this page.
    pub fn skip(&self) -> usize {
        self.page_index * self.page_size
    }
}

/// A page of list results as reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub page_index: usize,
    pub page_size: usize,
    pub total: usize,
}

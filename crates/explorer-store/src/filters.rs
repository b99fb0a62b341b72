//! Filter categories and the user's selected filter values.
//!
//! Categories arrive from the server as a flat list; those with a `parent`
//! are shown grouped under it. The grouping is derived: every call to
//! [`FilterAccumulator::merge_filter_results`] rebuilds it from that call's
//! list alone. Selected values live in the navigation query string, one
//! parameter per category label, values joined by the filter delimiter.

use ramp_model::OrderedMap;
use serde::{Deserialize, Serialize};

use crate::settings::ExplorerSettings;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCategory {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default)]
    pub values: Vec<String>,
}

/// Collapse categories sharing a label: the latest definition wins but keeps
/// the position of the first.
pub fn dedupe_by_label(categories: Vec<FilterCategory>) -> Vec<FilterCategory> {
    categories
        .into_iter()
        .map(|c| (c.label.clone(), c))
        .collect::<OrderedMap<_, _>>()
        .values()
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterAccumulator {
    grouped: OrderedMap<String, Vec<FilterCategory>>,
    top_level: Vec<FilterCategory>,
    selected: OrderedMap<String, Vec<String>>,
}

impl FilterAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the parent → categories grouping from `categories`.
    pub fn merge_filter_results(&mut self, categories: &[FilterCategory]) {
        let mut grouped: OrderedMap<String, Vec<FilterCategory>> = OrderedMap::new();
        let mut top_level = Vec::new();
        for category in categories {
            match &category.parent {
                Some(parent) => match grouped.get_mut(parent) {
                    Some(group) => group.push(category.clone()),
                    None => {
                        grouped.insert(parent.clone(), vec![category.clone()]);
                    }
                },
                None => top_level.push(category.clone()),
            }
        }
        tracing::debug!(
            parents = grouped.len(),
            top_level = top_level.len(),
            "filter categories regrouped"
        );
        self.grouped = grouped;
        self.top_level = top_level;
    }

    pub fn grouped(&self) -> &OrderedMap<String, Vec<FilterCategory>> {
        &self.grouped
    }

    pub fn group(&self, parent: &str) -> Option<&[FilterCategory]> {
        self.grouped.get(&parent.to_string()).map(Vec::as_slice)
    }

    pub fn top_level(&self) -> &[FilterCategory] {
        &self.top_level
    }

    pub fn set_selected_values(&mut self, label: &str, values: Vec<String>) {
        self.selected.insert(label.to_string(), values);
    }

    pub fn selected_values(&self, label: &str) -> Option<&[String]> {
        self.selected.get(&label.to_string()).map(Vec::as_slice)
    }

    pub fn selected(&self) -> &OrderedMap<String, Vec<String>> {
        &self.selected
    }

    /// A key may be present with an empty list; only a non-empty list counts.
    pub fn has_selections(&self, label: &str) -> bool {
        self.selected_values(label).is_some_and(|v| !v.is_empty())
    }

    pub fn clear_all(&mut self) {
        self.selected.clear();
    }

    /// Read selections from navigation query parameters. Reserved paging
    /// and sorting keys are skipped; an empty value is kept as an empty list.
    pub fn parse_from_query_params<'a>(
        &mut self,
        params: impl IntoIterator<Item = (&'a String, &'a String)>,
        settings: &ExplorerSettings,
    ) {
        for (key, value) in params {
            if settings.is_reserved(key) {
                continue;
            }
            self.selected
                .insert(key.clone(), split_values(value, &settings.filter_delimiter));
        }
    }

    /// Encode selections for an outgoing navigation. Empty selections map
    /// to `None` so the parameter is dropped from the URL.
    pub fn to_query_params(
        selections: &[(String, Vec<String>)],
        settings: &ExplorerSettings,
    ) -> OrderedMap<String, Option<String>> {
        selections
            .iter()
            .map(|(label, values)| {
                let encoded =
                    (!values.is_empty()).then(|| values.join(&settings.filter_delimiter));
                (label.clone(), encoded)
            })
            .collect()
    }
}

fn split_values(value: &str, delimiter: &str) -> Vec<String> {
    if value.is_empty() {
        return Vec::new();
    }
    value.split(delimiter).map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(label: &str, parent: Option<&str>, values: &[&str]) -> FilterCategory {
        FilterCategory {
            label: label.to_string(),
            parent: parent.map(str::to_string),
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }

    fn params(pairs: &[(&str, &str)]) -> OrderedMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_grouping_replaced_per_call() {
        let mut filters = FilterAccumulator::new();
        filters.merge_filter_results(&[
            category("A", Some("P"), &["1"]),
            category("B", Some("P"), &["2"]),
            category("T", None, &["t"]),
        ]);
        let labels: Vec<_> = filters.group("P").unwrap().iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["A", "B"]);
        assert_eq!(filters.top_level().len(), 1);

        filters.merge_filter_results(&[category("C", Some("P"), &["3"])]);
        let labels: Vec<_> = filters.group("P").unwrap().iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["C"]);
        assert!(filters.top_level().is_empty());
    }

    #[test]
    fn test_parse_skips_reserved_keys() {
        let mut filters = FilterAccumulator::new();
        filters.parse_from_query_params(
            &params(&[("a", "x&y"), ("sort", "z")]),
            &ExplorerSettings::default(),
        );
        assert_eq!(filters.selected_values("a"), Some(&["x".to_string(), "y".to_string()][..]));
        assert_eq!(filters.selected_values("sort"), None);
        assert_eq!(filters.selected().len(), 1);
    }

    #[test]
    fn test_clear_then_parse_has_no_residue() {
        let settings = ExplorerSettings::default();
        let mut filters = FilterAccumulator::new();
        filters.set_selected_values("old", vec!["1".to_string()]);

        filters.clear_all();
        filters.parse_from_query_params(
            &params(&[("Phenotype", "Seizure"), ("pageIndex", "2"), ("Gene", "")]),
            &settings,
        );

        let keys: Vec<_> = filters.selected().keys().cloned().collect();
        assert_eq!(keys, vec!["Phenotype", "Gene"]);
        assert!(filters.has_selections("Phenotype"));
        assert_eq!(filters.selected_values("Gene"), Some(&[][..]));
        assert!(!filters.has_selections("Gene"));
    }

    #[test]
    fn test_selection_encoding_drops_empty_lists() {
        let encoded = FilterAccumulator::to_query_params(
            &[
                ("Phenotype".to_string(), vec!["a".to_string(), "b".to_string()]),
                ("Gene".to_string(), vec![]),
            ],
            &ExplorerSettings::default(),
        );
        assert_eq!(encoded.get(&"Phenotype".to_string()), Some(&Some("a&b".to_string())));
        assert_eq!(encoded.get(&"Gene".to_string()), Some(&None));
    }

    #[test]
    fn test_dedupe_keeps_first_position_latest_value() {
        let deduped = dedupe_by_label(vec![
            category("A", None, &["old"]),
            category("B", None, &["b"]),
            category("A", None, &["new"]),
        ]);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].label, "A");
        assert_eq!(deduped[0].values, vec!["new"]);
    }
}

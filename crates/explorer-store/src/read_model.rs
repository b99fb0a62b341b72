//! Per-tab view models for the RAMP query pages.
//!
//! A page has one tab per entry of its input map. Overview, visualization
//! and data maps arrive independently and are keyed by the same tab names;
//! [`compose`] stitches them into one [`RampPage`] per tab. A slice that has
//! not arrived stays `None`, which presentation reads as "not loaded yet".

use ramp_model::OrderedMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RampPage<I, O, V, D> {
    pub input_map: I,
    pub overview_map: Option<O>,
    pub visualizations_map: Option<V>,
    pub data_map: Option<D>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposedPages<I, O, V, D> {
    /// The resolved active tab; `None` only when there are no tabs.
    pub active_tab: Option<String>,
    pub pages: OrderedMap<String, RampPage<I, O, V, D>>,
}

impl<I, O, V, D> ComposedPages<I, O, V, D> {
    pub fn active(&self) -> Option<&RampPage<I, O, V, D>> {
        self.active_tab.as_ref().and_then(|tab| self.pages.get(tab))
    }
}

/// Which optional sources have arrived at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadedTracker {
    pub results_loaded: bool,
    pub data_loaded: bool,
    pub visualizations_loaded: bool,
}

pub fn loaded_tracker<O, V, D>(
    overview_map: Option<&OrderedMap<String, O>>,
    visualizations_map: Option<&OrderedMap<String, V>>,
    data_map: Option<&OrderedMap<String, D>>,
) -> LoadedTracker {
    LoadedTracker {
        results_loaded: overview_map.is_some(),
        data_loaded: data_map.is_some(),
        visualizations_loaded: visualizations_map.is_some(),
    }
}

/// Build every tab's page. Without an active tab the first input key is used.
pub fn compose<I, O, V, D>(
    active_tab: Option<&str>,
    input_map: &OrderedMap<String, I>,
    overview_map: Option<&OrderedMap<String, O>>,
    visualizations_map: Option<&OrderedMap<String, V>>,
    data_map: Option<&OrderedMap<String, D>>,
) -> ComposedPages<I, O, V, D>
where
    I: Clone,
    O: Clone,
    V: Clone,
    D: Clone,
{
    let active_tab = active_tab
        .map(str::to_string)
        .or_else(|| input_map.first_key().cloned());

    let pages = input_map
        .iter()
        .map(|(tab, inputs)| {
            let page = RampPage {
                input_map: inputs.clone(),
                overview_map: overview_map.and_then(|m| m.get(tab)).cloned(),
                visualizations_map: visualizations_map.and_then(|m| m.get(tab)).cloned(),
                data_map: data_map.and_then(|m| m.get(tab)).cloned(),
            };
            (tab.clone(), page)
        })
        .collect();

    ComposedPages { active_tab, pages }
}

/// Tab identifiers use dashes for spaces.
pub fn clean_label(label: &str) -> String {
    label.replace('-', " ")
}

/// Window title for a tab: `"<base> - <tab label>"`.
pub fn tab_title(base: &str, tab: &str) -> String {
    format!("{base} - {}", clean_label(tab))
}

/// Split a pasted analyte list on tabs, newlines, commas and semicolons.
pub fn parse_analyte_input(input: &str) -> Vec<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed
        .split(['\t', '\n', ',', ';'])
        .filter(|piece| !piece.is_empty())
        .map(|piece| piece.trim().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    type Pages = ComposedPages<u32, &'static str, &'static str, &'static str>;

    fn inputs() -> OrderedMap<String, u32> {
        OrderedMap::from_pairs(vec![("x".to_string(), 1), ("y".to_string(), 2)])
    }

    #[test]
    fn test_defaults_to_first_tab() {
        let composed: Pages = compose(None, &inputs(), None, None, None);
        assert_eq!(composed.active_tab.as_deref(), Some("x"));
        assert_eq!(composed.active().map(|p| p.input_map), Some(1));
    }

    #[test]
    fn test_missing_slices_stay_none() {
        let overview = OrderedMap::from_pairs(vec![("y".to_string(), "y-overview")]);
        let composed: Pages = compose(Some("y"), &inputs(), Some(&overview), None, None);

        let x = composed.pages.get(&"x".to_string()).unwrap();
        assert_eq!(x.overview_map, None);
        assert_eq!(x.data_map, None);

        let y = composed.pages.get(&"y".to_string()).unwrap();
        assert_eq!(y.overview_map, Some("y-overview"));
        assert_eq!(composed.active_tab.as_deref(), Some("y"));
    }

    #[test]
    fn test_each_tab_gets_its_own_slice() {
        let data = OrderedMap::from_pairs(vec![
            ("x".to_string(), "x-data"),
            ("y".to_string(), "y-data"),
        ]);
        let composed: Pages = compose(Some("x"), &inputs(), None, None, Some(&data));
        let keys: Vec<_> = composed.pages.keys().cloned().collect();
        assert_eq!(keys, vec!["x", "y"]);
        assert_eq!(composed.pages.get(&"y".to_string()).unwrap().data_map, Some("y-data"));
    }

    #[test]
    fn test_empty_input_has_no_active_tab() {
        let empty: OrderedMap<String, u32> = OrderedMap::new();
        let composed: Pages = compose(None, &empty, None, None, None);
        assert_eq!(composed.active_tab, None);
        assert!(composed.pages.is_empty());
    }

    #[test]
    fn test_loaded_tracker_reflects_presence() {
        let overview: OrderedMap<String, u8> = OrderedMap::new();
        let tracker = loaded_tracker::<u8, u8, u8>(Some(&overview), None, None);
        assert!(tracker.results_loaded);
        assert!(!tracker.data_loaded);
        assert!(!tracker.visualizations_loaded);
    }

    #[test]
    fn test_labels_and_titles() {
        assert_eq!(clean_label("pathways-from-analytes"), "pathways from analytes");
        assert_eq!(tab_title("RaMP", "chemical-classes"), "RaMP - chemical classes");
    }

    #[test]
    fn test_analyte_input_split_and_trimmed() {
        assert_eq!(
            parse_analyte_input(" hmdb:HMDB0000001, gene_symbol:ABCA1;\nchebi:16335\t"),
            vec!["hmdb:HMDB0000001", "gene_symbol:ABCA1", "chebi:16335"]
        );
        assert!(parse_analyte_input("   ").is_empty());
    }
}

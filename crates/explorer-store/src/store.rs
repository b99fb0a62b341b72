use ramp_model::{FisherResult, FishersDataframe, OrderedMap};
use serde::Serialize;
use serde_json::Value;

use crate::entity::{Analyte, Disease, DiseaseNode, EntityStore};
use crate::fetch_cache::{FetchCache, QueryKind, QueryResult};
use crate::filters::{FilterAccumulator, FilterCategory};
use crate::navigation::{Page, PageRequest};
use crate::settings::{DEFAULT_SETTINGS, ExplorerSettings};
use crate::stats::{ApiPaths, RampStats, SupportedIds};
use crate::versioned::Versioned;

/// Tab id → opaque presentation payload (form sections, overview, ...).
pub type TabMap = OrderedMap<String, Value>;

/// All explorer state. Owned by [`crate::state::State`]; no globals.
#[derive(Debug, Clone)]
pub struct Store {
    pub settings: ExplorerSettings,

    // RDAS
    pub diseases: EntityStore<Disease>,
    pub disease_page: Option<Page>,
    pub page_request: PageRequest,
    pub disease_tree: Option<Vec<DiseaseNode>>,
    pub typeahead: Vec<Disease>,
    pub disease_loading: bool,
    pub disease_filters: Versioned<Vec<FilterCategory>>,
    pub static_disease_filters: Vec<FilterCategory>,
    pub all_disease_filters: Vec<FilterCategory>,
    /// Diseases the user follows.
    pub subscriptions: Vec<Disease>,
    pub filters: FilterAccumulator,

    // RAMP
    pub fetches: FetchCache,
    pub analytes: EntityStore<Analyte>,
    pub stats: RampStats,
    pub supported_ids: Vec<SupportedIds>,
    pub api: Option<ApiPaths>,
    /// Unfiltered enrichment frame from the last pathway enrichment.
    pub combined_dataframe: Option<FishersDataframe>,
    /// Result of the last p-value cutoff over `combined_dataframe`.
    pub filtered_dataframe: Versioned<Option<FishersDataframe>>,
    pub active_tab: Versioned<Option<String>>,
    pub input_map: Versioned<TabMap>,
    pub overview_map: Versioned<Option<TabMap>>,
    pub visualizations_map: Versioned<Option<TabMap>>,
    pub data_map: Versioned<Option<TabMap>>,

    pub error_message: Option<String>,
}

impl Store {
    pub fn new(settings: ExplorerSettings) -> Self {
        let page_request = PageRequest::first(&settings);
        Self {
            settings,
            diseases: EntityStore::new(),
            disease_page: None,
            page_request,
            disease_tree: None,
            typeahead: Vec::new(),
            disease_loading: false,
            disease_filters: Versioned::new(Vec::new()),
            static_disease_filters: Vec::new(),
            all_disease_filters: Vec::new(),
            subscriptions: Vec::new(),
            filters: FilterAccumulator::new(),
            fetches: FetchCache::new(),
            analytes: EntityStore::new(),
            stats: RampStats::default(),
            supported_ids: Vec::new(),
            api: None,
            combined_dataframe: None,
            filtered_dataframe: Versioned::new(None),
            active_tab: Versioned::new(None),
            input_map: Versioned::new(TabMap::new()),
            overview_map: Versioned::new(None),
            visualizations_map: Versioned::new(None),
            data_map: Versioned::new(None),
            error_message: None,
        }
    }

    /// Back to the initial state, keeping settings and the fetch sequence
    /// counters so that requests still in flight are dropped on arrival.
    pub fn reset(&mut self) {
        let mut fetches = std::mem::take(&mut self.fetches);
        fetches.clear_all();
        *self = Self::new(self.settings.clone());
        self.fetches = fetches;
    }

    /// Version key of everything the page composer reads.
    pub fn pages_key(&self) -> (u64, u64, u64, u64, u64) {
        (
            self.active_tab.version(),
            self.input_map.version(),
            self.overview_map.version(),
            self.visualizations_map.version(),
            self.data_map.version(),
        )
    }

    /// Pathway enrichment rows using the configured ratio policy. A cutoff
    /// filter, when applied, replaces the full frame.
    pub fn pathway_enrichment_rows(&self) -> Vec<FisherResult> {
        self.filtered_dataframe
            .get()
            .as_ref()
            .or_else(|| {
                self.fetches
                    .get(QueryKind::PathwayEnrichments)
                    .and_then(|r| r.dataframe.as_ref())
            })
            .map(|df| df.results_with(self.settings.ratio_policy))
            .unwrap_or_default()
    }

    pub fn biochemical_pathways(&self) -> BiochemicalPathwaysResults<'_> {
        BiochemicalPathwaysResults {
            pathways: self.fetches.get(QueryKind::Pathways),
            pathway_enrichment: self.fetches.get(QueryKind::PathwayEnrichments),
            cluster_plot: self
                .fetches
                .get(QueryKind::ClusterPlot)
                .and_then(|r| r.plot.as_ref())
                .and_then(|plot| plot.first())
                .map(String::as_str),
        }
    }

    pub fn reaction_results(&self) -> ReactionResults<'_> {
        ReactionResults {
            reactions: self.fetches.get(QueryKind::Reactions),
            reaction_classes: self.fetches.get(QueryKind::ReactionClasses),
            common_reactions: self.fetches.get(QueryKind::CommonReactions),
        }
    }

    pub fn chemical_property_results(&self) -> ChemicalPropertyResults<'_> {
        ChemicalPropertyResults {
            chemical_properties: self.fetches.get(QueryKind::Properties),
            chemical_classes: self.fetches.get(QueryKind::MetaboliteClasses),
            chemical_enrichment: self.fetches.get(QueryKind::ChemicalEnrichments),
        }
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(DEFAULT_SETTINGS.clone())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BiochemicalPathwaysResults<'a> {
    pub pathways: Option<&'a QueryResult>,
    pub pathway_enrichment: Option<&'a QueryResult>,
    pub cluster_plot: Option<&'a str>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionResults<'a> {
    pub reactions: Option<&'a QueryResult>,
    pub reaction_classes: Option<&'a QueryResult>,
    pub common_reactions: Option<&'a QueryResult>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChemicalPropertyResults<'a> {
    pub chemical_properties: Option<&'a QueryResult>,
    pub chemical_classes: Option<&'a QueryResult>,
    pub chemical_enrichment: Option<&'a QueryResult>,
}

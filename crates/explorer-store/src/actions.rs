use ramp_model::PvalColumn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;

use crate::effects::Effect;
use crate::entity::{Analyte, Disease, DiseaseNode};
use crate::fetch_cache::{Commit, FetchPayload, QueryKind, RequestTicket};
use crate::filters::{FilterCategory, dedupe_by_label};
use crate::navigation::{NavigationEvent, Page, PageRequest};
use crate::stats::{ApiPaths, RampStats, SupportedIds};
use crate::store::{Store, TabMap};

/// Events that can be dispatched to modify the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Action {
    // Fetch lifecycle
    /// Start a server query; emits a fetch effect
    Fetch { kind: QueryKind, params: Value },
    /// A query completed
    FetchSucceeded {
        ticket: RequestTicket,
        payload: FetchPayload,
    },
    /// A query failed
    FetchFailed { ticket: RequestTicket, error: String },
    /// Forget the committed result of one query
    ClearQuery { kind: QueryKind },
    /// Request the disease list for the current page, sort and filters
    BrowseDiseases,
    /// Request the values of one filter category, by search term or page
    FetchFilters {
        label: String,
        #[serde(default)]
        term: Option<String>,
        #[serde(default)]
        page: Option<usize>,
    },

    // Diseases
    /// Replace the disease list (browse page)
    SetDiseases {
        diseases: Vec<Disease>,
        page: Option<Page>,
    },
    /// Insert or replace one disease and open it
    SetDisease { disease: Disease },
    RemoveDisease { id: String },
    /// Close the disease detail view
    ClearDisease,
    SetDiseaseTree { tree: Vec<DiseaseNode> },
    ClearTypeahead,
    ClearStaticDiseaseFilters,

    // Enrichment
    /// Cut the last pathway enrichment down to rows at or below `cutoff`
    FilterEnrichment { cutoff: f64, column: PvalColumn },

    // Filters
    /// Filter categories arrived
    FiltersLoaded { categories: Vec<FilterCategory> },
    SetSelectedFilterValues { label: String, values: Vec<String> },
    ClearSelectedFilters,
    /// Router event
    Navigate { event: NavigationEvent },

    // Tabbed pages
    SetActiveTab { tab: Option<String> },
    SetInputMap { map: TabMap },
    SetOverviewMap { map: Option<TabMap> },
    SetVisualizationsMap { map: Option<TabMap> },
    SetDataMap { map: Option<TabMap> },

    // File Operations
    SaveSnapshot { path: PathBuf },
    LoadSnapshot { path: PathBuf },
    ClearErrorMessage,
    /// Back to the initial state
    Reset,
}

/// Apply a single action to modify the store state
pub fn update(store: &mut Store, action: Action) -> Vec<Effect> {
    tracing::trace!(?action, "applying action");
    match action {
        Action::Fetch { kind, params } => {
            let ticket = store.fetches.begin(kind, params.clone());
            if matches!(kind, QueryKind::DiseaseList | QueryKind::Disease) {
                store.disease_loading = true;
            }
            vec![Effect::Fetch { ticket, params }]
        }
        Action::FetchSucceeded { ticket, payload } => {
            let committed = payload.clone();
            if store.fetches.record_success(ticket, payload) == Commit::Applied {
                apply_payload(store, ticket.kind, committed);
            }
            vec![]
        }
        Action::FetchFailed { ticket, error } => {
            if store.fetches.record_failure(ticket, error) == Commit::Applied
                && matches!(ticket.kind, QueryKind::DiseaseList | QueryKind::Disease)
            {
                store.disease_loading = false;
            }
            vec![]
        }
        Action::ClearQuery { kind } => {
            store.fetches.clear(kind);
            vec![]
        }
        Action::BrowseDiseases => {
            let params = browse_params(store);
            update(
                store,
                Action::Fetch {
                    kind: QueryKind::DiseaseList,
                    params,
                },
            )
        }
        Action::FetchFilters { label, term, page } => {
            let limit = store.settings.filter_fetch_limit;
            // a search always starts from the first page
            let skip = match term {
                Some(_) => 0,
                None => page.unwrap_or(0) * limit,
            };
            let mut params = Map::new();
            params.insert("label".to_string(), Value::from(label));
            if let Some(term) = term {
                params.insert("term".to_string(), Value::from(term));
            }
            params.insert("limit".to_string(), Value::from(limit));
            params.insert("skip".to_string(), Value::from(skip));
            update(
                store,
                Action::Fetch {
                    kind: QueryKind::DiseaseFilters,
                    params: Value::Object(params),
                },
            )
        }

        // Diseases
        Action::SetDiseases { diseases, page } => {
            store.diseases.set_all(diseases);
            store.disease_page = page;
            store.disease_loading = false;
            vec![]
        }
        Action::SetDisease { disease } => {
            let id = disease.gard_id.clone();
            store.diseases.upsert_one(disease);
            store.diseases.select(Some(id));
            store.disease_loading = false;
            vec![]
        }
        Action::RemoveDisease { id } => {
            store.diseases.remove_one(&id);
            vec![]
        }
        Action::ClearDisease => {
            store.diseases.select(None);
            vec![]
        }
        Action::SetDiseaseTree { tree } => {
            store.disease_tree = Some(tree);
            vec![]
        }
        Action::ClearTypeahead => {
            store.typeahead.clear();
            vec![]
        }
        Action::ClearStaticDiseaseFilters => {
            store.static_disease_filters.clear();
            vec![]
        }

        // Enrichment
        Action::FilterEnrichment { cutoff, column } => {
            let Some(combined) = store.combined_dataframe.as_ref() else {
                store.error_message = Some("No pathway enrichment to filter".to_string());
                return vec![];
            };
            match combined.filter(cutoff, column) {
                Ok(filtered) => {
                    tracing::debug!(cutoff, rows = filtered.fishresults.len(), "enrichment filtered");
                    store.filtered_dataframe.set(Some(filtered));
                    store.fetches.clear(QueryKind::ClusterPlot);
                }
                Err(e) => store.error_message = Some(e.to_string()),
            }
            vec![]
        }

        // Filters
        Action::FiltersLoaded { categories } => {
            load_filters(store, categories);
            vec![]
        }
        Action::SetSelectedFilterValues { label, values } => {
            store.filters.set_selected_values(&label, values);
            vec![]
        }
        Action::ClearSelectedFilters => {
            store.filters.clear_all();
            vec![]
        }
        Action::Navigate { event } => {
            match event {
                NavigationEvent::Start => {
                    store.filters.clear_all();
                    store.disease_loading = true;
                }
                NavigationEvent::End { params } => {
                    store.filters.clear_all();
                    store.filters.parse_from_query_params(&params, &store.settings);
                    store.page_request = PageRequest::from_params(&params, &store.settings);
                    tracing::debug!(
                        selections = store.filters.selected().len(),
                        page = store.page_request.page_index,
                        "navigation parameters applied"
                    );
                }
            }
            vec![]
        }

        // Tabbed pages
        Action::SetActiveTab { tab } => {
            store.active_tab.set(tab);
            vec![]
        }
        Action::SetInputMap { map } => {
            store.input_map.set(map);
            vec![]
        }
        Action::SetOverviewMap { map } => {
            store.overview_map.set(map);
            vec![]
        }
        Action::SetVisualizationsMap { map } => {
            store.visualizations_map.set(map);
            vec![]
        }
        Action::SetDataMap { map } => {
            store.data_map.set(map);
            vec![]
        }

        // File Operations
        Action::SaveSnapshot { path } => vec![Effect::SaveSnapshot { path }],
        Action::LoadSnapshot { path } => vec![Effect::LoadSnapshot { path }],
        Action::ClearErrorMessage => {
            store.error_message = None;
            vec![]
        }
        Action::Reset => {
            store.reset();
            vec![]
        }
    }
}

fn load_filters(store: &mut Store, categories: Vec<FilterCategory>) {
    let categories = dedupe_by_label(categories);
    store.filters.merge_filter_results(&categories);
    store.disease_filters.set(categories);
}

/// Route a committed payload into the typed parts of the store.
fn apply_payload(store: &mut Store, kind: QueryKind, payload: FetchPayload) {
    let outcome = match kind {
        QueryKind::DiseaseList => decode::<Disease>(&payload.data).map(|diseases| {
            store.diseases.set_all(diseases);
            store.disease_page = payload
                .query
                .and_then(|q| serde_json::from_value::<Page>(q).ok());
            store.disease_loading = false;
        }),
        QueryKind::Disease => decode::<Disease>(&payload.data).map(|diseases| {
            store.disease_loading = false;
            if let Some(disease) = diseases.into_iter().next() {
                let id = disease.gard_id.clone();
                store.diseases.upsert_one(disease);
                store.diseases.select(Some(id));
            }
        }),
        QueryKind::DiseaseTree => {
            decode::<DiseaseNode>(&payload.data).map(|tree| store.disease_tree = Some(tree))
        }
        QueryKind::DiseaseFilters => {
            decode::<FilterCategory>(&payload.data).map(|categories| load_filters(store, categories))
        }
        QueryKind::StaticDiseaseFilters => decode::<FilterCategory>(&payload.data)
            .map(|categories| store.static_disease_filters = categories),
        QueryKind::AllDiseaseFilters => decode::<FilterCategory>(&payload.data)
            .map(|categories| store.all_disease_filters = categories),
        QueryKind::DiseaseSubscriptions => {
            decode::<Disease>(&payload.data).map(|diseases| store.subscriptions = diseases)
        }
        QueryKind::Typeahead => {
            decode::<Disease>(&payload.data).map(|diseases| store.typeahead = diseases)
        }
        QueryKind::Analytes => {
            decode::<Analyte>(&payload.data).map(|analytes| store.analytes.set_all(analytes))
        }
        QueryKind::PathwayEnrichments => {
            // a fresh enrichment invalidates any cutoff view and cluster plot
            store.combined_dataframe = payload.dataframe;
            store.filtered_dataframe.set(None);
            store.fetches.clear(QueryKind::ClusterPlot);
            Ok(())
        }
        QueryKind::RampStats => first_row::<RampStats>(&payload.data)
            .map(|stats| store.stats = stats.unwrap_or_default()),
        QueryKind::SourceVersions => {
            store.stats.source_versions = payload.data;
            Ok(())
        }
        QueryKind::SupportedIds => {
            decode::<SupportedIds>(&payload.data).map(|ids| store.supported_ids = ids)
        }
        QueryKind::RampApi => first_row::<ApiPaths>(&payload.data).map(|api| store.api = api),
        _ => Ok(()),
    };
    if let Err(e) = outcome {
        tracing::warn!(kind = %kind, error = %e, "malformed payload");
        store.error_message = Some(format!("Malformed {kind} payload: {e}"));
    }
}

fn decode<T: DeserializeOwned>(rows: &[Value]) -> Result<Vec<T>, serde_json::Error> {
    rows.iter().cloned().map(serde_json::from_value).collect()
}

/// Single-object payloads arrive as a one-row `data` array.
fn first_row<T: DeserializeOwned>(rows: &[Value]) -> Result<Option<T>, serde_json::Error> {
    rows.first().cloned().map(serde_json::from_value).transpose()
}

/// Disease list query for the current page request and filter selections.
fn browse_params(store: &Store) -> Value {
    let page = &store.page_request;
    let mut params = Map::new();
    params.insert("skip".to_string(), Value::from(page.skip()));
    params.insert("limit".to_string(), Value::from(page.page_size));
    params.insert("sort".to_string(), Value::from(page.sort.clone()));
    params.insert("direction".to_string(), Value::from(page.direction.as_str()));
    for (label, values) in store.filters.selected().iter() {
        if !values.is_empty() {
            params.insert(label.clone(), Value::from(values.clone()));
        }
    }
    Value::Object(params)
}

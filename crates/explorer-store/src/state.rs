use ramp_model::FisherResult;

use crate::actions::{self, Action};
use crate::cache::{Cache, Pages};
use crate::effects::{self, Effect};
use crate::store::Store;
use crate::transport::Transport;

/// Store, derived views and the action/effect queues that drive them.
/// Actions are applied in dispatch order; effects run afterwards and may
/// dispatch completion actions of their own.
pub struct State {
    pub store: Store,
    pub cache: Cache,
    transport: Box<dyn Transport>,
    action_queue: Vec<Action>,
    effect_queue: Vec<Effect>,
}

impl State {
    pub fn new(store: Store, transport: Box<dyn Transport>) -> Self {
        Self {
            store,
            cache: Cache::new(),
            transport,
            action_queue: Vec::new(),
            effect_queue: Vec::new(),
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        self.action_queue.push(action);
    }

    pub fn flush_actions(&mut self) {
        let actions = std::mem::take(&mut self.action_queue);
        for action in actions {
            let reset = matches!(action, Action::Reset);
            let mut effects = actions::update(&mut self.store, action);
            if reset {
                // versions restart at zero, so cached keys could collide
                self.cache.invalidate();
            }
            self.effect_queue.append(&mut effects);
        }
    }

    pub fn flush_effects(&mut self) {
        let effects = std::mem::take(&mut self.effect_queue);
        for effect in effects {
            if let Some(action) = effects::run(&mut self.store, self.transport.as_mut(), effect) {
                self.action_queue.push(action);
            }
        }
    }

    /// Flush until both queues are empty.
    pub fn run_until_idle(&mut self) {
        while !self.action_queue.is_empty() || !self.effect_queue.is_empty() {
            self.flush_actions();
            self.flush_effects();
        }
    }

    pub fn pending_effects(&self) -> &[Effect] {
        &self.effect_queue
    }

    pub fn pages(&mut self) -> &Pages {
        self.cache.pages.get(&self.store)
    }

    pub fn enrichment_rows(&mut self) -> &[FisherResult] {
        self.cache.enrichment_rows.get(&self.store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch_cache::{FetchPayload, QueryKind};
    use crate::store::TabMap;
    use crate::transport::FixtureTransport;
    use serde_json::{Value, json};

    fn tabs(pairs: &[(&str, Value)]) -> TabMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_fetch_round_trip_through_transport() {
        let transport = FixtureTransport::new().with_payload(
            QueryKind::DiseaseFilters,
            FetchPayload {
                data: vec![
                    json!({"label": "Seizure", "parent": "Phenotype", "values": ["yes"]}),
                    json!({"label": "Gene", "values": ["BRCA1"]}),
                ],
                ..Default::default()
            },
        );
        let mut state = State::new(Store::default(), Box::new(transport));
        state.dispatch(Action::Fetch {
            kind: QueryKind::DiseaseFilters,
            params: json!({"limit": 200}),
        });
        state.run_until_idle();

        assert!(!state.store.fetches.loading());
        assert_eq!(state.store.filters.group("Phenotype").map(<[_]>::len), Some(1));
        assert_eq!(state.store.filters.top_level().len(), 1);
        assert_eq!(state.store.disease_filters.get().len(), 2);
    }

    #[test]
    fn test_transport_failure_recorded() {
        let transport = FixtureTransport::new().with_failure(QueryKind::Pathways, "timeout");
        let mut state = State::new(Store::default(), Box::new(transport));
        state.dispatch(Action::Fetch {
            kind: QueryKind::Pathways,
            params: Value::Null,
        });
        state.run_until_idle();

        assert_eq!(state.store.fetches.last_error(), Some("server error: timeout"));
        assert!(state.store.fetches.get(QueryKind::Pathways).is_none());
    }

    #[test]
    fn test_pages_recomputed_only_on_change() {
        let mut state = State::new(Store::default(), Box::new(FixtureTransport::new()));
        state.dispatch(Action::SetInputMap {
            map: tabs(&[("pathways", json!(["form"])), ("reactions", json!([]))]),
        });
        state.flush_actions();

        assert_eq!(state.pages().active_tab.as_deref(), Some("pathways"));
        state.pages();
        assert_eq!(state.cache.pages.recomputes(), 1);

        state.dispatch(Action::SetOverviewMap {
            map: Some(tabs(&[("reactions", json!({"count": 3}))])),
        });
        state.dispatch(Action::SetActiveTab {
            tab: Some("reactions".to_string()),
        });
        state.flush_actions();

        let pages = state.pages();
        let active = pages.active().unwrap();
        assert_eq!(active.overview_map, Some(json!({"count": 3})));
        assert_eq!(state.cache.pages.recomputes(), 2);
    }

    #[test]
    fn test_reset_clears_store_and_cache() {
        let mut state = State::new(Store::default(), Box::new(FixtureTransport::new()));
        state.dispatch(Action::SetInputMap {
            map: tabs(&[("x", json!(1))]),
        });
        state.flush_actions();
        assert_eq!(state.pages().pages.len(), 1);

        state.dispatch(Action::Reset);
        state.flush_actions();
        assert!(state.pages().pages.is_empty());
    }

    fn disease_rows(id: &str) -> FetchPayload {
        FetchPayload {
            data: vec![json!({ "gardId": id })],
            ..Default::default()
        }
    }

    #[test]
    fn test_fetch_in_flight_across_reset_is_dropped() {
        let transport =
            FixtureTransport::new().with_payload(QueryKind::DiseaseList, disease_rows("GARD:pre-reset"));
        let mut state = State::new(Store::default(), Box::new(transport));
        state.dispatch(Action::Fetch {
            kind: QueryKind::DiseaseList,
            params: Value::Null,
        });
        state.flush_actions();
        assert_eq!(state.pending_effects().len(), 1);

        state.dispatch(Action::Reset);
        state.run_until_idle();

        assert!(state.store.diseases.is_empty());
        assert!(state.store.fetches.get(QueryKind::DiseaseList).is_none());
        assert!(!state.store.fetches.loading());
    }

    #[test]
    fn test_ticket_from_before_reset_loses_to_newer_request() {
        let mut state = State::new(Store::default(), Box::new(FixtureTransport::new()));
        let old = state.store.fetches.begin(QueryKind::DiseaseList, Value::Null);
        state.dispatch(Action::Reset);
        state.flush_actions();
        let new = state.store.fetches.begin(QueryKind::DiseaseList, Value::Null);
        assert_ne!(old, new);

        state.dispatch(Action::FetchSucceeded {
            ticket: new,
            payload: disease_rows("GARD:new"),
        });
        state.dispatch(Action::FetchSucceeded {
            ticket: old,
            payload: disease_rows("GARD:old"),
        });
        state.flush_actions();
        assert_eq!(state.store.diseases.ids(), vec!["GARD:new"]);
    }

    #[test]
    fn test_enrichment_rows_follow_commits() {
        let transport = FixtureTransport::new().with_payload(
            QueryKind::PathwayEnrichments,
            serde_json::from_value(json!({
                "data": [],
                "dataframe": {
                    "analyteType": ["metabolites"],
                    "fishresults": [{"pathwayName": "P", "Num_In_Path": 3, "Total_In_Path": 42}]
                }
            }))
            .unwrap(),
        );
        let mut state = State::new(Store::default(), Box::new(transport));
        assert!(state.enrichment_rows().is_empty());

        state.dispatch(Action::Fetch {
            kind: QueryKind::PathwayEnrichments,
            params: Value::Null,
        });
        state.run_until_idle();
        assert_eq!(state.enrichment_rows()[0].path_count.as_deref(), Some("3/42"));
    }
}

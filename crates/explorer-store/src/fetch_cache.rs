//! Latest result per query kind, with per-kind request sequencing.
//!
//! Every fetch is started with [`FetchCache::begin`], which hands out a
//! [`RequestTicket`] carrying a per-kind sequence number. A completion is only
//! committed when its ticket is the newest one issued for that kind, so a slow
//! response can never overwrite the answer to a later request.

use ramp_model::{FisherResult, FishersDataframe, OrderedMap};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Distinct server queries whose results are cached independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QueryKind {
    Ontologies,
    Analytes,
    Pathways,
    CommonReactions,
    Reactions,
    ReactionClasses,
    Metabolites,
    OntologyList,
    MetaboliteClasses,
    Properties,
    ChemicalEnrichments,
    PathwayEnrichments,
    ClusterPlot,
    DiseaseList,
    Disease,
    DiseaseTree,
    DiseaseFilters,
    StaticDiseaseFilters,
    AllDiseaseFilters,
    DiseaseSubscriptions,
    Typeahead,
    RampStats,
    SourceVersions,
    SupportedIds,
    RampApi,
}

impl QueryKind {
    pub const ALL: [QueryKind; 25] = [
        QueryKind::Ontologies,
        QueryKind::Analytes,
        QueryKind::Pathways,
        QueryKind::CommonReactions,
        QueryKind::Reactions,
        QueryKind::ReactionClasses,
        QueryKind::Metabolites,
        QueryKind::OntologyList,
        QueryKind::MetaboliteClasses,
        QueryKind::Properties,
        QueryKind::ChemicalEnrichments,
        QueryKind::PathwayEnrichments,
        QueryKind::ClusterPlot,
        QueryKind::DiseaseList,
        QueryKind::Disease,
        QueryKind::DiseaseTree,
        QueryKind::DiseaseFilters,
        QueryKind::StaticDiseaseFilters,
        QueryKind::AllDiseaseFilters,
        QueryKind::DiseaseSubscriptions,
        QueryKind::Typeahead,
        QueryKind::RampStats,
        QueryKind::SourceVersions,
        QueryKind::SupportedIds,
        QueryKind::RampApi,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            QueryKind::Ontologies => "ontologies",
            QueryKind::Analytes => "analytes",
            QueryKind::Pathways => "pathways",
            QueryKind::CommonReactions => "commonReactions",
            QueryKind::Reactions => "reactions",
            QueryKind::ReactionClasses => "reactionClasses",
            QueryKind::Metabolites => "metabolites",
            QueryKind::OntologyList => "ontologyList",
            QueryKind::MetaboliteClasses => "metaboliteClasses",
            QueryKind::Properties => "properties",
            QueryKind::ChemicalEnrichments => "chemicalEnrichments",
            QueryKind::PathwayEnrichments => "pathwayEnrichments",
            QueryKind::ClusterPlot => "clusterPlot",
            QueryKind::DiseaseList => "diseaseList",
            QueryKind::Disease => "disease",
            QueryKind::DiseaseTree => "diseaseTree",
            QueryKind::DiseaseFilters => "diseaseFilters",
            QueryKind::StaticDiseaseFilters => "staticDiseaseFilters",
            QueryKind::AllDiseaseFilters => "allDiseaseFilters",
            QueryKind::DiseaseSubscriptions => "diseaseSubscriptions",
            QueryKind::Typeahead => "typeahead",
            QueryKind::RampStats => "rampStats",
            QueryKind::SourceVersions => "sourceVersions",
            QueryKind::SupportedIds => "supportedIds",
            QueryKind::RampApi => "rampApi",
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handle for one dispatched request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestTicket {
    pub kind: QueryKind,
    pub seq: u64,
}

/// The body of a successful fetch, as delivered by the transport.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchPayload {
    #[serde(default)]
    pub data: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataframe: Option<FishersDataframe>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plot: Option<Vec<String>>,
}

/// One committed fetch, tagged with the parameters that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub data: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<Value>,
    #[serde(rename = "derivedFrame", default, skip_serializing_if = "Option::is_none")]
    pub dataframe: Option<FishersDataframe>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plot: Option<Vec<String>>,
    /// Parameters of the request, as dispatched.
    #[serde(rename = "queryParams")]
    pub params: Value,
    pub seq: u64,
}

impl QueryResult {
    /// Display rows built from the attached dataframe, if any.
    pub fn fisher_results(&self) -> Vec<FisherResult> {
        self.dataframe
            .as_ref()
            .map(FishersDataframe::results)
            .unwrap_or_default()
    }
}

/// Loading/error state of a single query kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KindStatus {
    pub loading: bool,
    pub error: Option<String>,
    /// Highest sequence number issued.
    pub requested: u64,
    /// Sequence number of the committed result.
    pub committed: Option<u64>,
    #[serde(skip)]
    params: Option<Value>,
}

/// Outcome of delivering a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    Applied,
    /// A newer request for the same kind exists; nothing changed.
    Stale,
}

#[derive(Debug, Clone, Default)]
pub struct FetchCache {
    results: HashMap<QueryKind, QueryResult>,
    status: OrderedMap<QueryKind, KindStatus>,
    last_error: Option<String>,
}

impl FetchCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a request for `kind` as in flight and issue its ticket.
    pub fn begin(&mut self, kind: QueryKind, params: Value) -> RequestTicket {
        let status = self.status_entry(kind);
        status.requested += 1;
        status.loading = true;
        status.error = None;
        status.params = Some(params);
        let seq = status.requested;
        self.last_error = None;
        tracing::debug!(kind = %kind, seq, "fetch started");
        RequestTicket { kind, seq }
    }

    pub fn record_success(&mut self, ticket: RequestTicket, payload: FetchPayload) -> Commit {
        if self.is_stale(ticket) {
            tracing::debug!(kind = %ticket.kind, seq = ticket.seq, "stale fetch result dropped");
            return Commit::Stale;
        }
        let status = self.status_entry(ticket.kind);
        status.loading = false;
        status.error = None;
        status.committed = Some(ticket.seq);
        let params = status.params.clone().unwrap_or(Value::Null);

        let result = QueryResult {
            data: payload.data,
            query: payload.query,
            dataframe: payload.dataframe,
            plot: payload.plot,
            params,
            seq: ticket.seq,
        };
        tracing::debug!(kind = %ticket.kind, seq = ticket.seq, rows = result.data.len(), "fetch committed");
        self.results.insert(ticket.kind, result);
        Commit::Applied
    }

    pub fn record_failure(&mut self, ticket: RequestTicket, error: String) -> Commit {
        if self.is_stale(ticket) {
            tracing::debug!(kind = %ticket.kind, seq = ticket.seq, "stale fetch failure dropped");
            return Commit::Stale;
        }
        tracing::warn!(kind = %ticket.kind, seq = ticket.seq, error = %error, "fetch failed");
        let status = self.status_entry(ticket.kind);
        status.loading = false;
        status.error = Some(error.clone());
        self.last_error = Some(error);
        Commit::Applied
    }

    pub fn get(&self, kind: QueryKind) -> Option<&QueryResult> {
        self.results.get(&kind)
    }

    pub fn status(&self, kind: QueryKind) -> Option<&KindStatus> {
        self.status.get(&kind)
    }

    pub fn is_loading(&self, kind: QueryKind) -> bool {
        self.status(kind).is_some_and(|s| s.loading)
    }

    /// True while any kind has a request in flight.
    pub fn loading(&self) -> bool {
        self.status.values().any(|s| s.loading)
    }

    /// Most recent failure message, cleared by the next fetch start.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Drop the committed result for `kind`. Sequence numbers keep counting.
    pub fn clear(&mut self, kind: QueryKind) {
        self.results.remove(&kind);
        if let Some(status) = self.status.get_mut(&kind) {
            status.committed = None;
            status.error = None;
        }
    }

    /// Drop every result and in-flight marker. Sequence counters survive, so
    /// completions of requests issued before the call are stale afterwards.
    pub fn clear_all(&mut self) {
        self.results.clear();
        self.last_error = None;
        self.status = self
            .status
            .iter()
            .map(|(kind, status)| {
                let kept = KindStatus {
                    requested: status.requested,
                    ..KindStatus::default()
                };
                (*kind, kept)
            })
            .collect();
    }

    /// Only the newest in-flight ticket of a kind may commit.
    fn is_stale(&self, ticket: RequestTicket) -> bool {
        match self.status.get(&ticket.kind) {
            Some(status) => !status.loading || ticket.seq != status.requested,
            None => true,
        }
    }

    fn status_entry(&mut self, kind: QueryKind) -> &mut KindStatus {
        if !self.status.contains_key(&kind) {
            self.status.insert(kind, KindStatus::default());
        }
        match self.status.get_mut(&kind) {
            Some(status) => status,
            None => unreachable!("status inserted above"),
        }
    }
}

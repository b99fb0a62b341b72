use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::ModelError;
use crate::analyte::AnalyteType;
use crate::fisher::{FisherResult, FisherResultRaw, RatioPolicy};
use crate::ordered_map::OrderedMap;

/// Cluster label used for rows the clustering step did not assign.
pub const UNASSIGNED_CLUSTER: &str = "Did not cluster";

/// The enrichment response as a whole: analyte types, rows, result kinds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FishersDataframe {
    #[serde(rename = "analyteType", default)]
    pub analyte_type: Vec<String>,
    #[serde(default)]
    pub fishresults: Vec<FisherResultRaw>,
    #[serde(default)]
    pub result_type: Vec<String>,
}

/// Which p-value column a cutoff applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PvalColumn {
    Pval,
    #[serde(rename = "Pval_FDR")]
    Fdr,
    #[serde(rename = "Pval_Holm")]
    Holm,
}

impl PvalColumn {
    /// Pick the value for this column, using the combined variant for a
    /// combined enrichment.
    fn value(self, row: &FisherResultRaw, combined: bool) -> Option<f64> {
        let column = match (self, combined) {
            (PvalColumn::Pval, false) => "Pval",
            (PvalColumn::Pval, true) => "Pval_combined",
            (PvalColumn::Fdr, false) => "Pval_FDR",
            (PvalColumn::Fdr, true) => "Pval_combined_FDR",
            (PvalColumn::Holm, false) => "Pval_Holm",
            (PvalColumn::Holm, true) => "Pval_combined_Holm",
        };
        row.number(column)
    }
}

impl FromStr for PvalColumn {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pval" => Ok(PvalColumn::Pval),
            "fdr" | "pval_fdr" => Ok(PvalColumn::Fdr),
            "holm" | "pval_holm" => Ok(PvalColumn::Holm),
            _ => Err(ModelError::UnknownPvalColumn(s.to_string())),
        }
    }
}

impl FishersDataframe {
    pub fn analyte(&self) -> Option<AnalyteType> {
        AnalyteType::from_dataframe_types(&self.analyte_type)
    }

    pub fn is_combined(&self) -> bool {
        self.analyte() == Some(AnalyteType::Both)
    }

    pub fn results(&self) -> Vec<FisherResult> {
        self.results_with(RatioPolicy::default())
    }

    pub fn results_with(&self, policy: RatioPolicy) -> Vec<FisherResult> {
        self.fishresults
            .iter()
            .cloned()
            .map(|raw| FisherResult::from_raw_with(raw, policy))
            .collect()
    }

    /// Keep rows whose `column` p-value is at or below `cutoff`.
    /// Rows lacking the column are dropped.
    pub fn filter(&self, cutoff: f64, column: PvalColumn) -> Result<Self, ModelError> {
        if !(0.0..=1.0).contains(&cutoff) {
            return Err(ModelError::InvalidCutoff(cutoff));
        }
        let combined = self.is_combined();
        let fishresults = self
            .fishresults
            .iter()
            .filter(|row| column.value(row, combined).is_some_and(|p| p <= cutoff))
            .cloned()
            .collect();
        Ok(Self {
            analyte_type: self.analyte_type.clone(),
            fishresults,
            result_type: self.result_type.clone(),
        })
    }
}

/// Group rows by cluster assignment, first-seen cluster order.
pub fn cluster_groups(results: &[FisherResult]) -> OrderedMap<String, Vec<FisherResult>> {
    let mut groups: OrderedMap<String, Vec<FisherResult>> = OrderedMap::new();
    for result in results {
        let key = result
            .stats
            .cluster_assignment()
            .unwrap_or(UNASSIGNED_CLUSTER)
            .to_string();
        match groups.get_mut(&key) {
            Some(rows) => rows.push(result.clone()),
            None => {
                groups.insert(key, vec![result.clone()]);
            }
        }
    }
    groups
}

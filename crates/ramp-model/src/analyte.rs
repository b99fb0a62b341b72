use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ModelError;

/// Which analytes an enrichment was run over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyteType {
    Genes,
    Metabolites,
    /// Combined gene + metabolite enrichment.
    Both,
}

impl AnalyteType {
    pub fn as_str(self) -> &'static str {
        match self {
            AnalyteType::Genes => "genes",
            AnalyteType::Metabolites => "metabolites",
            AnalyteType::Both => "both",
        }
    }

    /// The dataframe reports its analyte types as a list; more than one
    /// distinct type, or an explicit "both", means a combined run.
    pub fn from_dataframe_types(types: &[String]) -> Option<Self> {
        let mut parsed = types.iter().filter_map(|t| t.parse::<AnalyteType>().ok());
        let first = parsed.next()?;
        if parsed.any(|t| t != first) {
            Some(AnalyteType::Both)
        } else {
            Some(first)
        }
    }
}

impl fmt::Display for AnalyteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalyteType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "genes" | "gene" => Ok(AnalyteType::Genes),
            "metabolites" | "metabolite" => Ok(AnalyteType::Metabolites),
            "both" => Ok(AnalyteType::Both),
            other => Err(ModelError::UnknownAnalyteType(other.to_string())),
        }
    }
}

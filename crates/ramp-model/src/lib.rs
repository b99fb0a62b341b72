pub mod analyte;
pub mod dataframe;
pub mod fisher;
pub mod ordered_map;

pub use analyte::AnalyteType;
pub use dataframe::{FishersDataframe, PvalColumn, cluster_groups};
pub use fisher::{FisherResult, FisherResultRaw, RatioPolicy};
pub use ordered_map::OrderedMap;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("unknown analyte type `{0}`")]
    UnknownAnalyteType(String),
    #[error("unknown p-value column `{0}`")]
    UnknownPvalColumn(String),
    #[error("p-value cutoff must be within 0..=1, got {0}")]
    InvalidCutoff(f64),
}

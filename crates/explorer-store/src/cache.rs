use ramp_model::{FisherResult, RatioPolicy};
use serde_json::Value;

use crate::fetch_cache::QueryKind;
use crate::read_model::{ComposedPages, compose};
use crate::store::Store;
use crate::versioned::Memoized;

pub type Pages = ComposedPages<Value, Value, Value, Value>;

/// Derived views over the store, recomputed when their inputs change version.
pub struct Cache {
    pub pages: Memoized<Store, (u64, u64, u64, u64, u64), Pages>,
    pub enrichment_rows: Memoized<Store, (Option<u64>, u64, RatioPolicy), Vec<FisherResult>>,
}

impl Cache {
    pub fn new() -> Self {
        let pages = Memoized::new(
            |s: &Store| s.pages_key(),
            |s: &Store| {
                compose(
                    s.active_tab.get().as_deref(),
                    s.input_map.get(),
                    s.overview_map.get().as_ref(),
                    s.visualizations_map.get().as_ref(),
                    s.data_map.get().as_ref(),
                )
            },
        );

        let enrichment_rows = Memoized::new(
            |s: &Store| {
                (
                    s.fetches
                        .status(QueryKind::PathwayEnrichments)
                        .and_then(|status| status.committed),
                    s.filtered_dataframe.version(),
                    s.settings.ratio_policy,
                )
            },
            |s: &Store| s.pathway_enrichment_rows(),
        );

        Self {
            pages,
            enrichment_rows,
        }
    }

    /// Forget every cached view; the next read recomputes.
    pub fn invalidate(&mut self) {
        self.pages.invalidate();
        self.enrichment_rows.invalidate();
    }
}

impl Default for Cache {
    fn default() -> Self {
        Self::new()
    }
}

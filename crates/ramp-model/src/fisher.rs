//! Fisher's-exact-test enrichment rows.
//!
//! The server returns one row per pathway with separate metabolite, gene and
//! combined statistics. [`FisherResult::from_raw`] derives the display fields
//! (`metabCount`, `geneCount`, `pathCount` ratio strings and a spaced analyte
//! list) once at construction; [`FisherResult::select_fields`] picks the
//! columns that make sense for the analyte type the enrichment ran over.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fields hidden for a combined ("both") enrichment.
pub const BOTH_EXCLUDED: [&str; 8] = [
    "Total_In_Path",
    "Pval_Holm",
    "Pval_FDR",
    "Pval",
    "Num_In_Path",
    "metabCount",
    "geneCount",
    "pathCount",
];

/// Fields hidden for a single-analyte enrichment.
pub const SINGLE_EXCLUDED: [&str; 11] = [
    "Total_In_Path_Metab",
    "Total_In_Path_Gene",
    "Pval_combined_Holm",
    "Pval_combined_FDR",
    "Pval_Metab",
    "Pval_combined",
    "Num_In_Path_Metab",
    "Num_In_Path_Gene",
    "metabCount",
    "geneCount",
    "pathCount",
];

/// When a numerator/denominator pair counts as present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatioPolicy {
    /// Both values must be truthy: zero, empty and null produce no ratio.
    #[default]
    Truthy,
    /// Both values must merely be present; `0/12` is rendered.
    Present,
}

impl RatioPolicy {
    fn accepts(self, value: Option<&Value>) -> bool {
        match (self, value) {
            (_, None | Some(Value::Null)) => false,
            (RatioPolicy::Present, Some(_)) => true,
            (RatioPolicy::Truthy, Some(Value::Bool(b))) => *b,
            (RatioPolicy::Truthy, Some(Value::Number(n))) => {
                n.as_f64().is_some_and(|v| v != 0.0 && !v.is_nan())
            }
            (RatioPolicy::Truthy, Some(Value::String(s))) => !s.is_empty(),
            (RatioPolicy::Truthy, Some(_)) => true,
        }
    }

    /// `"<num>/<denom>"`, each side rendered as delivered (`3`, not `3.0`).
    fn ratio(self, num: Option<&Value>, denom: Option<&Value>) -> Option<String> {
        match (num, denom) {
            (Some(n), Some(d)) if self.accepts(num) && self.accepts(denom) => {
                Some(format!("{}/{}", display(n), display(d)))
            }
            _ => None,
        }
    }
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A statistics row as delivered by the enrichment endpoint. Every column is
/// kept with its original JSON type and in payload order; the typed
/// accessors read the statistics the transformer needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FisherResultRaw {
    fields: Map<String, Value>,
}

impl FisherResultRaw {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append or replace a column.
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// A numeric column; non-numbers read as absent.
    pub fn number(&self, name: &str) -> Option<f64> {
        self.fields.get(name).and_then(Value::as_f64)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    pub fn pathway_name(&self) -> Option<&str> {
        self.text("pathwayName")
    }

    pub fn cluster_assignment(&self) -> Option<&str> {
        self.text("cluster_assignment")
    }

    /// Column names in payload order.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.fields.keys()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A display-ready enrichment row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FisherResult {
    #[serde(flatten)]
    pub stats: FisherResultRaw,
    #[serde(rename = "metabCount", default, skip_serializing_if = "Option::is_none")]
    pub metab_count: Option<String>,
    #[serde(rename = "geneCount", default, skip_serializing_if = "Option::is_none")]
    pub gene_count: Option<String>,
    #[serde(rename = "pathCount", default, skip_serializing_if = "Option::is_none")]
    pub path_count: Option<String>,
}

impl FisherResult {
    pub fn from_raw(raw: FisherResultRaw) -> Self {
        Self::from_raw_with(raw, RatioPolicy::default())
    }

    pub fn from_raw_with(raw: FisherResultRaw, policy: RatioPolicy) -> Self {
        let mut stats = raw;
        let mut derive = |name: &str, num: &str, denom: &str| {
            let computed = policy.ratio(stats.get(num), stats.get(denom));
            // a ratio column already on the row survives when none is derived
            let delivered = stats.fields.shift_remove(name);
            computed.or_else(|| delivered.as_ref().and_then(Value::as_str).map(str::to_string))
        };
        let metab_count = derive("metabCount", "Num_In_Path_Metab", "Total_In_Path_Metab");
        let gene_count = derive("geneCount", "Num_In_Path_Gene", "Total_In_Path_Gene");
        let path_count = derive("pathCount", "Num_In_Path", "Total_In_Path");

        if let Some(Value::String(analytes)) = stats.fields.get_mut("analytes") {
            *analytes = expand_analytes(analytes);
        }

        Self {
            stats,
            metab_count,
            gene_count,
            path_count,
        }
    }

    /// Every field name carried by this row: delivered columns in payload
    /// order, then the derived ratio columns.
    pub fn field_names(&self) -> Vec<String> {
        let derived = [
            ("metabCount", self.metab_count.is_some()),
            ("geneCount", self.gene_count.is_some()),
            ("pathCount", self.path_count.is_some()),
        ];
        self.stats
            .keys()
            .cloned()
            .chain(
                derived
                    .iter()
                    .filter(|(_, set)| *set)
                    .map(|(name, _)| name.to_string()),
            )
            .collect()
    }

    /// Columns worth showing for an enrichment over `analyte_type`.
    /// Only the literal `"both"` selects the combined view.
    pub fn select_fields(&self, analyte_type: &str) -> Vec<String> {
        let excluded: &[&str] = if analyte_type == "both" {
            &BOTH_EXCLUDED
        } else {
            &SINGLE_EXCLUDED
        };
        self.field_names()
            .into_iter()
            .filter(|field| !excluded.contains(&field.as_str()))
            .collect()
    }

    /// Look up a field by its wire name.
    pub fn field(&self, name: &str) -> Option<Value> {
        match name {
            "metabCount" => self.metab_count.clone().map(Value::from),
            "geneCount" => self.gene_count.clone().map(Value::from),
            "pathCount" => self.path_count.clone().map(Value::from),
            _ => self.stats.get(name).cloned(),
        }
    }
}

/// Space out `|` delimiters: `"A|B|C"` becomes `"A | B | C"`.
/// Whitespace around each piece is normalised away, so `" A |B"` also
/// becomes `"A | B"` and already spaced input is left unchanged.
pub fn expand_analytes(analytes: &str) -> String {
    analytes
        .split('|')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw_with_counts(num: Option<i64>, total: Option<i64>) -> FisherResultRaw {
        let mut raw = FisherResultRaw::new().with("pathwayName", "TCA cycle");
        if let Some(num) = num {
            raw = raw.with("Num_In_Path_Metab", num);
        }
        if let Some(total) = total {
            raw = raw.with("Total_In_Path_Metab", total);
        }
        raw.with("Num_In_Path_Gene", 2)
            .with("Total_In_Path_Gene", 17)
            .with("Num_In_Path", 5)
            .with("Total_In_Path", 59)
    }

    #[test]
    fn test_ratio_strings_built_from_counts() {
        let result = FisherResult::from_raw(raw_with_counts(Some(3), Some(42)));
        assert_eq!(result.metab_count.as_deref(), Some("3/42"));
        assert_eq!(result.gene_count.as_deref(), Some("2/17"));
        assert_eq!(result.path_count.as_deref(), Some("5/59"));
    }

    #[test]
    fn test_zero_or_missing_count_yields_no_ratio() {
        let zero = FisherResult::from_raw(raw_with_counts(Some(0), Some(42)));
        assert_eq!(zero.metab_count, None);
        assert_eq!(zero.gene_count.as_deref(), Some("2/17"));

        let missing = FisherResult::from_raw(raw_with_counts(Some(3), None));
        assert_eq!(missing.metab_count, None);
    }

    #[test]
    fn test_present_policy_renders_zero_counts() {
        let result = FisherResult::from_raw_with(
            raw_with_counts(Some(0), Some(42)),
            RatioPolicy::Present,
        );
        assert_eq!(result.metab_count.as_deref(), Some("0/42"));
    }

    #[test]
    fn test_analytes_expanded_and_stable() {
        let raw = FisherResultRaw::new().with("analytes", "A|B|C");
        let once = FisherResult::from_raw(raw);
        assert_eq!(once.stats.text("analytes"), Some("A | B | C"));

        let twice = FisherResult::from_raw(once.stats.clone());
        assert_eq!(twice.stats.text("analytes"), Some("A | B | C"));

        assert_eq!(expand_analytes(" A |B"), "A | B");
    }

    #[test]
    fn test_both_hides_single_statistics() {
        let raw = raw_with_counts(Some(3), Some(42))
            .with("Pval", 0.01)
            .with("Pval_FDR", 0.02)
            .with("Pval_Holm", 0.03)
            .with("Pval_combined", 0.001);
        let result = FisherResult::from_raw(raw);

        let fields = result.select_fields("both");
        for hidden in BOTH_EXCLUDED {
            assert!(!fields.iter().any(|f| f == hidden), "{hidden} should be hidden");
        }
        assert!(fields.iter().any(|f| f == "Pval_combined"));
        assert!(fields.iter().any(|f| f == "Num_In_Path_Metab"));
    }

    #[test]
    fn test_single_type_hides_combined_statistics() {
        let raw = raw_with_counts(Some(3), Some(42))
            .with("Pval", 0.01)
            .with("Pval_combined_Holm", 0.2);
        let result = FisherResult::from_raw(raw);

        for analyte_type in ["genes", "metabolites", "anything"] {
            let fields = result.select_fields(analyte_type);
            for hidden in SINGLE_EXCLUDED {
                assert!(!fields.iter().any(|f| f == hidden));
            }
            assert!(fields.iter().any(|f| f == "Pval"));
            assert!(fields.iter().any(|f| f == "pathwayName"));
        }
    }

    #[test]
    fn test_unknown_columns_survive_round_trip() {
        let json = r#"{
            "pathwayName": "Glycolysis",
            "Num_In_Path": 4,
            "Total_In_Path": 10,
            "Pval": 0.5,
            "sourceLabel": "reactome"
        }"#;
        let raw: FisherResultRaw = serde_json::from_str(json).unwrap();
        let result = FisherResult::from_raw(raw);

        assert_eq!(result.path_count.as_deref(), Some("4/10"));
        assert_eq!(result.field("pathCount"), Some(Value::from("4/10")));
        assert_eq!(result.field("sourceLabel"), Some(Value::from("reactome")));
        assert!(result.select_fields("genes").contains(&"sourceLabel".to_string()));
    }

    #[test]
    fn test_integer_counts_keep_their_type() {
        let raw: FisherResultRaw =
            serde_json::from_value(json!({"Num_In_Path": 3, "Total_In_Path": 42, "Pval": 0.25}))
                .unwrap();
        let text = serde_json::to_string(&FisherResult::from_raw(raw)).unwrap();
        assert!(text.contains(r#""Num_In_Path":3,"#), "{text}");
        assert!(text.contains(r#""Total_In_Path":42,"#), "{text}");
        assert!(text.contains(r#""pathCount":"3/42""#), "{text}");
    }

    #[test]
    fn test_field_names_follow_payload_order() {
        let raw: FisherResultRaw = serde_json::from_str(
            r#"{"sourceLabel": "wiki", "Pval": 0.1, "pathwayName": "P", "Num_In_Path": 1, "Total_In_Path": 2}"#,
        )
        .unwrap();
        let result = FisherResult::from_raw(raw);
        assert_eq!(
            result.field_names(),
            vec!["sourceLabel", "Pval", "pathwayName", "Num_In_Path", "Total_In_Path", "pathCount"]
        );
    }
}

use clap::{Parser, Subcommand};
use explorer_store::logging::{self, Verbosity};
use explorer_store::transport::FixtureTransport;
use explorer_store::{Action, ExplorerError, ExplorerSettings, State, Store};
use ramp_model::{FisherResult, FishersDataframe, PvalColumn, cluster_groups};
use serde_json::{Map, Value, json};
use std::path::{Path, PathBuf};

/// RAMP / RDAS explorer state engine
#[derive(Parser)]
#[command(name = "explorer")]
#[command(version)]
#[command(about = "Replay explorer events and inspect derived read models", long_about = None)]
struct Cli {
    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Errors only
    #[arg(short, long, global = true)]
    quiet: bool,
    /// Settings JSON file
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a JSON array of actions and print the resulting state
    Replay {
        /// Actions file
        #[arg(long)]
        events: PathBuf,
        /// Canned fetch payloads keyed by query kind
        #[arg(long)]
        fixtures: Option<PathBuf>,
    },

    /// Turn a Fishers dataframe into display rows
    Fisher {
        /// Dataframe JSON file
        #[arg(long)]
        input: PathBuf,
        /// genes, metabolites or both (default: from the dataframe)
        #[arg(long)]
        analyte_type: Option<String>,
        /// Keep rows with p-value at or below this cutoff
        #[arg(long)]
        cutoff: Option<f64>,
        /// Column the cutoff applies to (pval, fdr, holm)
        #[arg(long, default_value = "pval")]
        column: String,
        /// Group rows by cluster assignment
        #[arg(long)]
        clusters: bool,
    },
}

fn main() -> Result<(), ExplorerError> {
    let cli = Cli::parse();
    logging::init_subscriber(Verbosity::from_flags(cli.verbose, cli.quiet));

    let settings = match &cli.settings {
        Some(path) => ExplorerSettings::load_from_file(path)?,
        None => ExplorerSettings::default(),
    };

    let output = match cli.command {
        Commands::Replay { events, fixtures } => cmd_replay(settings, &events, fixtures.as_deref())?,
        Commands::Fisher {
            input,
            analyte_type,
            cutoff,
            column,
            clusters,
        } => cmd_fisher(&settings, &input, analyte_type, cutoff, &column, clusters)?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ExplorerError> {
    let text = std::fs::read_to_string(path).map_err(|source| ExplorerError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&text)?)
}

fn cmd_replay(
    settings: ExplorerSettings,
    events: &Path,
    fixtures: Option<&Path>,
) -> Result<Value, ExplorerError> {
    let actions: Vec<Action> = read_json(events)?;
    let transport = match fixtures {
        Some(path) => FixtureTransport::load_from_file(path)?,
        None => FixtureTransport::new(),
    };

    let mut state = State::new(Store::new(settings), Box::new(transport));
    tracing::info!(actions = actions.len(), "replaying events");
    for action in actions {
        state.dispatch(action);
    }
    state.run_until_idle();

    let pages = serde_json::to_value(state.pages())?;
    let rows = serde_json::to_value(state.enrichment_rows())?;
    let store = &state.store;
    let statuses: Map<String, Value> = explorer_store::fetch_cache::QueryKind::ALL
        .iter()
        .filter_map(|kind| {
            let status = store.fetches.status(*kind)?;
            Some((kind.to_string(), serde_json::to_value(status).ok()?))
        })
        .collect();

    Ok(json!({
        "pages": pages,
        "loading": store.fetches.loading(),
        "lastError": store.fetches.last_error(),
        "queries": statuses,
        "filters": store.filters,
        "pageRequest": store.page_request,
        "diseases": store.diseases.select_all(),
        "selectedDisease": store.diseases.selected_id(),
        "analytes": store.analytes.select_all(),
        "rampStats": store.stats,
        "enrichmentRows": rows,
        "errorMessage": store.error_message,
    }))
}

fn cmd_fisher(
    settings: &ExplorerSettings,
    input: &Path,
    analyte_type: Option<String>,
    cutoff: Option<f64>,
    column: &str,
    clusters: bool,
) -> Result<Value, ExplorerError> {
    let mut dataframe: FishersDataframe = read_json(input)?;
    if let Some(cutoff) = cutoff {
        dataframe = dataframe.filter(cutoff, column.parse::<PvalColumn>()?)?;
    }
    let analyte_type = analyte_type
        .or_else(|| dataframe.analyte().map(|t| t.to_string()))
        .unwrap_or_else(|| "both".to_string());

    let results = dataframe.results_with(settings.ratio_policy);
    tracing::debug!(rows = results.len(), analyte_type = %analyte_type, "fisher rows built");

    if clusters {
        let groups = cluster_groups(&results);
        let mut out = Map::new();
        for (cluster, rows) in groups.iter() {
            out.insert(cluster.clone(), rows_to_json(rows, &analyte_type));
        }
        return Ok(Value::Object(out));
    }
    Ok(rows_to_json(&results, &analyte_type))
}

/// Project each row onto the columns meaningful for `analyte_type`.
fn rows_to_json(rows: &[FisherResult], analyte_type: &str) -> Value {
    let projected = rows
        .iter()
        .map(|row| {
            let Ok(Value::Object(all)) = serde_json::to_value(row) else {
                return Value::Null;
            };
            let fields: Map<String, Value> = row
                .select_fields(analyte_type)
                .into_iter()
                .filter_map(|name| all.get(&name).cloned().map(|value| (name, value)))
                .collect();
            Value::Object(fields)
        })
        .collect();
    Value::Array(projected)
}

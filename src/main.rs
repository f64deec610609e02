use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use ballhog_stats::analysis::gemini::GeminiClient;
use ballhog_stats::analysis::{TextGenerator, TradeAnalyzer};
use ballhog_stats::client::api::PlayerApiClient;
use ballhog_stats::client::columns::ColumnConfig;
use ballhog_stats::client::comparison::{ComparisonController, Side, MAX_SLOTS};
use ballhog_stats::client::table::{TableController, TableState};
use ballhog_stats::config::{AppConfig, Secrets};
use ballhog_stats::monitoring::logger;
use ballhog_stats::players::sort::SortOrder;
use ballhog_stats::scheduler::spawn_refresh_loop;
use ballhog_stats::server::{self, AppState};
use ballhog_stats::sheets::auth::{ServiceAccountAuth, ServiceAccountKey, SHEETS_READONLY_SCOPE};
use ballhog_stats::sheets::client::GoogleSheetsClient;
use ballhog_stats::store::PlayerStore;

#[derive(Parser)]
#[command(name = "ballhog", about = "NBA player stats server and terminal client")]
struct Cli {
    /// Path to the TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Print the player table from a running server
    Table {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        team: Option<String>,
        #[arg(long)]
        position: Option<String>,
        /// Column to sort by
        #[arg(long)]
        sort: Option<String>,
        #[arg(long, default_value = "desc")]
        order: String,
        /// Extra columns to show, comma separated
        #[arg(long, value_delimiter = ',')]
        columns: Vec<String>,
        /// Print CSV instead of a text table
        #[arg(long)]
        csv: bool,
    },
    /// Compare two sides of a trade from a running server
    Compare {
        #[arg(long = "trading", required = true)]
        trading: Vec<String>,
        #[arg(long = "receiving", required = true)]
        receiving: Vec<String>,
        /// Also request an AI write-up
        #[arg(long)]
        analyze: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let (mut config, secrets) = AppConfig::load(cli.config.as_deref())?;

    let command = cli.command.unwrap_or(Command::Serve);
    if !matches!(command, Command::Serve) {
        config.monitoring.json_logs = false;
    }
    logger::init_logging(&config.monitoring)?;

    match command {
        Command::Serve => run_server(config, secrets).await,
        Command::Table {
            search,
            team,
            position,
            sort,
            order,
            columns,
            csv,
        } => {
            let options = TableOptions {
                search,
                team,
                position,
                sort,
                order,
                columns,
                csv,
            };
            run_table(&config, options).await
        }
        Command::Compare {
            trading,
            receiving,
            analyze,
        } => run_compare(&config, &trading, &receiving, analyze).await,
    }
}

/// Run the API server with its refresh loop until Ctrl-C.
async fn run_server(config: AppConfig, secrets: Secrets) -> Result<()> {
    tracing::info!(
        addr = %config.server.addr(),
        spreadsheet = %config.sheet.spreadsheet_id,
        range = %config.sheet.range,
        "Ballhog stats server starting"
    );

    let key = ServiceAccountKey::load(
        secrets.google_credentials_base64.as_ref(),
        &config.sheet.credentials_path,
    )?;
    let auth = ServiceAccountAuth::new(key, SHEETS_READONLY_SCOPE)?;
    let sheets = GoogleSheetsClient::new(&config.sheet, auth)?;

    let store = Arc::new(PlayerStore::new(
        Arc::new(sheets),
        Duration::from_secs(config.cache.ttl_seconds),
    ));
    let refresh_handle = spawn_refresh_loop(store.clone(), config.refresh.interval_minutes);

    let generator = match secrets.gemini_api_key {
        Some(key) => {
            let client: Arc<dyn TextGenerator> = Arc::new(GeminiClient::new(key, &config.analysis)?);
            Some(client)
        }
        None => None,
    };
    let analyzer = TradeAnalyzer::new(generator);

    let state = AppState::new(store.clone(), analyzer);
    let router = server::build_router(state, &config.server)?;
    let result = server::serve(router, &config.server.addr()).await;

    refresh_handle.abort();
    store.teardown().await;
    tracing::info!("Server stopped");

    result
}

struct TableOptions {
    search: Option<String>,
    team: Option<String>,
    position: Option<String>,
    sort: Option<String>,
    order: String,
    columns: Vec<String>,
    csv: bool,
}

async fn run_table(config: &AppConfig, options: TableOptions) -> Result<()> {
    let api = PlayerApiClient::new(&config.client.api_base_url)?;
    let mut table = TableController::new(
        ColumnConfig::standard(),
        Duration::from_millis(config.client.search_debounce_ms),
    );

    table.load_from(&api).await;
    if let TableState::Error(message) = table.state() {
        bail!("Failed to load player table: {message}");
    }

    table.set_position_filter(options.position.as_deref());
    table.set_team_filter(options.team.as_deref());
    if let Some(search) = &options.search {
        table.set_search(search);
    }
    for column in &options.columns {
        table.toggle_column(column, true);
    }
    if let Some(sort) = &options.sort {
        table.sort_by(sort, SortOrder::from_query(Some(options.order.as_str())));
    }

    if options.csv {
        print!("{}", table.to_csv()?);
    } else {
        println!("{}", table.view().to_text());
    }
    Ok(())
}

/// Resolve a typed name to a stored one: exact match, else a unique
/// autocomplete hit.
fn resolve_name(controller: &ComparisonController, typed: &str) -> Result<String> {
    let suggestions = controller.suggestions(typed);
    if let Some(exact) = suggestions.iter().find(|n| ***n == *typed) {
        return Ok(exact.to_string());
    }
    match suggestions.as_slice() {
        [only] => Ok(only.to_string()),
        [] => bail!("No player matches \"{typed}\""),
        many => bail!("\"{typed}\" is ambiguous: {}", many.join(", ")),
    }
}

fn fill_side(controller: &mut ComparisonController, side: Side, names: &[String]) -> Result<()> {
    for (index, typed) in names.iter().enumerate() {
        if index > 0 && controller.add_slot(side).is_none() {
            bail!("At most {MAX_SLOTS} players per side");
        }
        let name = resolve_name(controller, typed)?;
        let card = controller
            .select(side, index, &name)
            .with_context(|| format!("Failed to select {name}"))?;
        println!(
            "{side:<9}  {}  (Rank: {}, Position: {}, Team: {})",
            card.name, card.rank, card.position, card.team
        );
    }
    Ok(())
}

async fn run_compare(
    config: &AppConfig,
    trading: &[String],
    receiving: &[String],
    analyze: bool,
) -> Result<()> {
    let api = PlayerApiClient::new(&config.client.api_base_url)?;
    let mut controller = ComparisonController::load_from(&api).await?;

    fill_side(&mut controller, Side::Trading, trading)?;
    fill_side(&mut controller, Side::Receiving, receiving)?;

    let Some(comparison) = controller.compare() else {
        bail!("Select at least one player on each side to compare");
    };
    println!("\n{}", comparison.to_text());

    if analyze {
        match controller.analyze(&api).await {
            Some(text) => println!("{text}"),
            None => {
                let message = controller
                    .notifications()
                    .latest()
                    .map(|n| n.message.clone())
                    .unwrap_or_default();
                bail!("Trade analysis failed: {message}");
            }
        }
    }
    Ok(())
}

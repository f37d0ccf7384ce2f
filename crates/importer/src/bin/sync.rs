use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use importer::fetch::FetchConfig;
use importer::{
    DataGolfClient, DataGolfConfig, DataGolfImporter, FeedSnapshot, FeedValidator,
    ImportContext, SyncSummary, TournamentImporter, apply_live_sync,
};
use storage::Database;
use storage::services::normalize_rating;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "golf-sync")]
#[command(about = "Fantasy golf live-data sync", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the DataGolf feeds and apply them to a tournament
    Sync {
        #[arg(long)]
        tournament: Uuid,

        #[arg(long, env = "DATABASE_URL")]
        database_url: String,

        #[command(flatten)]
        provider: ProviderArgs,
    },
    /// Fetch the DataGolf feeds and save them as JSON snapshots
    Export {
        #[arg(long, default_value = "./snapshots")]
        output: PathBuf,

        #[command(flatten)]
        provider: ProviderArgs,
    },
    /// Apply previously saved feed snapshots to a tournament
    Replay {
        #[arg(long)]
        tournament: Uuid,

        #[arg(long)]
        field: PathBuf,

        #[arg(long)]
        rankings: PathBuf,

        #[arg(long)]
        live: PathBuf,

        #[arg(long)]
        validate_only: bool,

        #[arg(long, env = "DATABASE_URL")]
        database_url: Option<String>,
    },
    /// Print the display rating for a skill estimate
    Rating {
        #[arg(allow_hyphen_values = true)]
        estimate: f64,
    },
}

#[derive(clap::Args)]
struct ProviderArgs {
    #[arg(long, env = "DATAGOLF_API_KEY", hide_env_values = true, default_value = "")]
    api_key: String,

    #[arg(long, env = "DATAGOLF_BASE_URL", default_value = importer::config::DEFAULT_BASE_URL)]
    base_url: String,

    #[arg(long, env = "DATAGOLF_TOUR", default_value = importer::config::DEFAULT_TOUR)]
    tour: String,

    #[arg(long, env = "FETCH_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,

    #[arg(long, env = "FETCH_RETRIES", default_value_t = 3)]
    retries: u32,

    #[arg(long, env = "FETCH_BACKOFF_MS", default_value_t = 1000)]
    backoff_ms: u64,
}

impl ProviderArgs {
    fn config(&self) -> DataGolfConfig {
        DataGolfConfig::new(self.api_key.clone())
            .with_base_url(self.base_url.clone())
            .with_tour(self.tour.clone())
            .with_fetch(FetchConfig {
                timeout: Duration::from_secs(self.timeout_secs),
                retries: self.retries,
                base_backoff: Duration::from_millis(self.backoff_ms),
                validate: None,
            })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "golf_sync={},importer={},storage={}",
                    log_level, log_level, log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Sync {
            tournament,
            database_url,
            provider,
        } => handle_sync(tournament, &database_url, &provider).await,
        Commands::Export { output, provider } => handle_export(output, &provider).await,
        Commands::Replay {
            tournament,
            field,
            rankings,
            live,
            validate_only,
            database_url,
        } => {
            handle_replay(
                tournament,
                [field, rankings, live],
                validate_only,
                database_url.as_deref(),
            )
            .await
        }
        Commands::Rating { estimate } => {
            println!("{}", normalize_rating(estimate));
            Ok(())
        }
    }
}

async fn connect(database_url: &str) -> anyhow::Result<Database> {
    tracing::info!("Connecting to database...");
    let db = Database::new(database_url)
        .await
        .context("failed to connect to the database")?;
    db.run_migrations()
        .await
        .context("failed to run migrations")?;
    Ok(db)
}

async fn handle_sync(
    tournament_id: Uuid,
    database_url: &str,
    provider: &ProviderArgs,
) -> anyhow::Result<()> {
    let client = DataGolfClient::new(provider.config())?;
    let importer = DataGolfImporter::new(client);
    let db = connect(database_url).await?;

    let summary = importer
        .import(tournament_id, &ImportContext { gateway: &db })
        .await
        .with_context(|| format!("{} sync failed for tournament {}", importer.name(), tournament_id))?;

    print_summary(&summary)
}

async fn handle_export(output: PathBuf, provider: &ProviderArgs) -> anyhow::Result<()> {
    let client = DataGolfClient::new(provider.config())?;
    let snapshot = client.fetch_snapshot().await?;

    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
    snapshot
        .save(&output, &timestamp)
        .await
        .with_context(|| format!("failed to export snapshots to {}", output.display()))?;

    tracing::info!("Replay with:");
    tracing::info!(
        "   golf-sync replay --tournament <uuid> --field {dir}/{ts}_field.json --rankings {dir}/{ts}_rankings.json --live {dir}/{ts}_live.json",
        dir = output.display(),
        ts = timestamp
    );

    Ok(())
}

async fn handle_replay(
    tournament_id: Uuid,
    [field, rankings, live]: [PathBuf; 3],
    validate_only: bool,
    database_url: Option<&str>,
) -> anyhow::Result<()> {
    let snapshot = FeedSnapshot::load(&field, &rankings, &live)
        .await
        .context("failed to load feed snapshots")?;

    tracing::info!("Validating snapshots...");
    let report = FeedValidator::validate(&snapshot)?;
    report.log_warnings();
    tracing::info!("✓ Validation successful!");

    if validate_only {
        return Ok(());
    }

    let Some(database_url) = database_url else {
        bail!("--database-url or DATABASE_URL is required unless --validate-only is set");
    };
    let db = connect(database_url).await?;

    let summary = apply_live_sync(&db, tournament_id, &snapshot, chrono::Utc::now()).await?;
    print_summary(&summary)
}

fn print_summary(summary: &SyncSummary) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}

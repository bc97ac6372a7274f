//! `smish` — SMS scam screening against a remote classification backend.
//!
//! Reads `config.toml` (or the path given with `--config`, with `SMISH_*`
//! environment overrides), opens the SQLite message store, and runs one
//! user-triggered action per invocation. Every action terminates with a
//! status line — there is no ambiguous "still working" end state.
//!
//! # Usage
//!
//! ```
//! smish import --file inbox-export.json
//! smish analyze --limit 5
//! smish check
//! smish status
//! ```

mod source;

use std::{
  path::{Path, PathBuf},
  sync::Arc,
  time::Duration,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use smish_client::{AnalysisClient, ClientConfig};
use smish_core::{
  classify::Classifier, store::MessageStore, verdict::WatchlistStatus,
};
use smish_store_sqlite::SqliteStore;
use smish_sync::{Importer, Orchestrator, RunState};

use source::JsonFileSource;

/// The canned probe message, for exercising the backend without a store.
const PROBE_MESSAGE: &str =
  "CONGRATULATIONS! You've won $1000! Click http://example.com to claim.";
const PROBE_SENDER: &str = "+1234560000";

// ─── CLI ─────────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "smish", about = "SMS scam screening message cache")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Import messages from a JSON inbox export into the store.
  Import {
    /// Path to the export file.
    #[arg(long)]
    file: PathBuf,

    /// Only import messages received at or after this epoch-millis bound.
    #[arg(long)]
    since: Option<i64>,
  },

  /// Run one analysis batch over unanalyzed received messages.
  Analyze {
    /// Batch size; defaults to `batch_limit` from config.
    #[arg(long)]
    limit: Option<usize>,
  },

  /// Probe the classification backend's health endpoint.
  Check,

  /// Classify a single message without touching the store.
  Probe {
    #[arg(long)]
    message: Option<String>,
    #[arg(long)]
    sender:  Option<String>,
  },

  /// Show message and scam counts.
  Status,

  /// Irreversibly empty the message store.
  Clear,
}

// ─── Settings ────────────────────────────────────────────────────────────────

/// Shape of `config.toml`; every key has a default so the file is optional.
#[derive(Debug, Clone, Deserialize)]
struct Settings {
  #[serde(default = "default_store_path")]
  store_path: PathBuf,

  #[serde(default = "default_server_url")]
  server_url: String,

  #[serde(default = "default_connect_timeout")]
  connect_timeout_secs: u64,

  #[serde(default = "default_request_timeout")]
  request_timeout_secs: u64,

  /// Messages per analysis batch. The backend may be a single local LLM
  /// working through requests one at a time, so keep this small.
  #[serde(default = "default_batch_limit")]
  batch_limit: usize,
}

fn default_store_path() -> PathBuf { PathBuf::from("smish.db") }
fn default_server_url() -> String { "http://localhost:5000".to_string() }
fn default_connect_timeout() -> u64 { 30 }
fn default_request_timeout() -> u64 { 60 }
fn default_batch_limit() -> usize { 5 }

impl Settings {
  fn client_config(&self) -> ClientConfig {
    let mut config = ClientConfig::new(self.server_url.clone());
    config.connect_timeout = Duration::from_secs(self.connect_timeout_secs);
    config.request_timeout = Duration::from_secs(self.request_timeout_secs);
    config
  }
}

// ─── Entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("SMISH"))
    .build()
    .context("failed to read configuration")?;

  let settings: Settings = settings
    .try_deserialize()
    .context("failed to deserialise settings")?;

  let store_path = expand_tilde(&settings.store_path);
  let store = Arc::new(
    SqliteStore::open(&store_path)
      .await
      .with_context(|| format!("failed to open store at {store_path:?}"))?,
  );

  match cli.command {
    Command::Import { file, since } => import(store, file, since).await,
    Command::Analyze { limit } => analyze(&settings, store, limit).await,
    Command::Check => check(&settings).await,
    Command::Probe { message, sender } => {
      probe(&settings, message, sender).await
    }
    Command::Status => status(store).await,
    Command::Clear => clear(store).await,
  }
}

// ─── Actions ─────────────────────────────────────────────────────────────────

async fn import(
  store: Arc<SqliteStore>,
  file: PathBuf,
  since: Option<i64>,
) -> anyhow::Result<()> {
  let importer = Importer::new(store, JsonFileSource::new(file));
  let report = importer.import(since).await.context("import failed")?;

  println!(
    "Loaded {} messages ({} new, {} refreshed, {} skipped).",
    report.imported, report.inserted, report.refreshed, report.skipped
  );
  println!(
    "{} messages in store, {} known scams.",
    report.total_in_store, report.known_scams
  );
  Ok(())
}

async fn analyze(
  settings: &Settings,
  store: Arc<SqliteStore>,
  limit: Option<usize>,
) -> anyhow::Result<()> {
  let client = AnalysisClient::new(settings.client_config())
    .context("failed to build HTTP client")?;
  let orchestrator = Orchestrator::new(store, Arc::new(client));

  // Stream per-message progress while the batch runs.
  let mut rx = orchestrator.subscribe();
  let printer = tokio::spawn(async move {
    while rx.changed().await.is_ok() {
      let state = rx.borrow_and_update().clone();
      if let RunState::Running { index, total } = state
        && index > 0
      {
        println!("analyzed message {index}/{total}");
      }
    }
  });

  let limit = limit.unwrap_or(settings.batch_limit);
  let state = orchestrator.analyze_batch(limit).await;

  // Dropping the orchestrator closes the channel and ends the printer.
  drop(orchestrator);
  printer.await.ok();

  match state {
    RunState::Completed(s) if s.selected == 0 => {
      println!(
        "No new messages to analyze. {} scams in store.",
        s.total_scams
      );
      Ok(())
    }
    RunState::Completed(s) => {
      println!(
        "Batch complete: {} analyzed, {} new scams, {} scams in store.",
        s.processed, s.new_scams, s.total_scams
      );
      Ok(())
    }
    RunState::Failed(reason) => anyhow::bail!("analysis failed: {reason}"),
    state => anyhow::bail!("run ended in unexpected state: {state:?}"),
  }
}

async fn check(settings: &Settings) -> anyhow::Result<()> {
  let client = AnalysisClient::new(settings.client_config())
    .context("failed to build HTTP client")?;

  let health = client.check_health().await;
  if health.reachable {
    println!("Server reachable: {}", health.summary);
  } else {
    println!("Cannot reach server: {}", health.summary);
    std::process::exit(1);
  }
  Ok(())
}

async fn probe(
  settings: &Settings,
  message: Option<String>,
  sender: Option<String>,
) -> anyhow::Result<()> {
  let client = AnalysisClient::new(settings.client_config())
    .context("failed to build HTTP client")?;

  let message = message.unwrap_or_else(|| PROBE_MESSAGE.to_string());
  let sender = sender.unwrap_or_else(|| PROBE_SENDER.to_string());

  match client.classify(&message, &sender).await {
    Ok(verdict) => {
      println!(
        "Classification: {} ({} confidence)",
        verdict.classification, verdict.confidence
      );
      if !verdict.reason.is_empty() {
        println!("Reason: {}", verdict.reason);
      }
      println!("Risk score: {:.2}", verdict.risk_score);
      println!("Alert level: {:?}", verdict.alert_level());
      if verdict.watchlist == WatchlistStatus::OnWatchlist {
        println!("Warning: sender is on the watchlist!");
      }
      Ok(())
    }
    Err(e) => anyhow::bail!("analysis failed: {e}"),
  }
}

async fn status(store: Arc<SqliteStore>) -> anyhow::Result<()> {
  let count = store.count().await.context("loading message count")?;
  let scams = store.scam_count().await.context("loading scam count")?;
  println!("{count} messages stored, {scams} scams detected.");
  Ok(())
}

async fn clear(store: Arc<SqliteStore>) -> anyhow::Result<()> {
  store.clear_all().await.context("clearing store")?;
  println!("All messages cleared from the local store.");
  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

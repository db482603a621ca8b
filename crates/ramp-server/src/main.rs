//! ramp server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`) plus `RAMP_*`
//! environment variables, opens the SQLite overlay, and serves the JSON API
//! under `/api`.

mod settings;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use axum::Router;
use clap::Parser;
use ramp_core::repository::PointRepository;
use ramp_discovery::ConfiguredDiscovery;
use ramp_store_sqlite::SqliteOverlayStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::settings::{ServerConfig, expand_tilde};

#[derive(Parser)]
#[command(author, version, about = "Ramp accessibility map server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;

  // Open the overlay store, creating parent directories on first run.
  let store_path = expand_tilde(&server_cfg.store_path);
  if let Some(parent) = store_path.parent().filter(|p| !p.as_os_str().is_empty()) {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {parent:?}"))?;
  }
  let store = SqliteOverlayStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let discovery = ConfiguredDiscovery::from_config(&server_cfg.discovery)
    .context("failed to build discovery client")?;
  if discovery.is_enabled() {
    tracing::info!(model = %server_cfg.discovery.model, "discovery enabled");
  } else {
    tracing::warn!("no discovery API key configured; searches will serve stored points only");
  }

  let repo = Arc::new(PointRepository::new(store, discovery));
  let app = Router::new().nest("/api", ramp_api::api_router(repo));
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

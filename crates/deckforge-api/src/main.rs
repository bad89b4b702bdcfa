//! deckforge API server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) layered under
//! `DECKFORGE_*` environment variables, opens the SQLite store, and serves
//! the JSON API over HTTP.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;
use deckforge_advisor::Advisor;
use deckforge_api::{AppState, ServerConfig};
use deckforge_store_sqlite::SqliteStore;
use deckforge_upstream::Upstream;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Deckforge deck-building API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

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
    .add_source(config::Environment::with_prefix("DECKFORGE"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let upstream = Upstream::new(
    server_cfg.creature_api_url.clone(),
    server_cfg.card_api_url.clone(),
    server_cfg.card_api_key.clone(),
    server_cfg.upstream_timeout(),
  )
  .context("failed to build upstream HTTP clients")?;

  let advisor = Advisor::with_random_selector(server_cfg.advisor_config());
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  let app = deckforge_api::router(AppState::new(store, upstream, advisor, server_cfg));

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` (alone or followed by `/`) to `$HOME`.
fn expand_tilde(path: &Path) -> PathBuf {
  let Ok(home) = std::env::var("HOME") else {
    return path.to_path_buf();
  };
  match path.strip_prefix("~") {
    Ok(rest) => PathBuf::from(home).join(rest),
    Err(_) => path.to_path_buf(),
  }
}

//! JSON REST API for Deckforge.
//!
//! Exposes an axum [`Router`] backed by any [`DeckStore`] that also serves
//! its cached cards as a [`CardCatalog`], plus a set of upstream sources.

pub mod auth;
pub mod error;
pub mod handlers;

use std::{path::PathBuf, sync::Arc, time::Duration};

use axum::{
  Json, Router,
  routing::{delete, get, post},
};
use deckforge_advisor::{Advisor, AdvisorConfig};
use deckforge_core::{
  catalog::{CardCatalog, CreatureLookup, ImageProbe},
  store::DeckStore,
};
use deckforge_upstream::{DEFAULT_CARD_API_URL, DEFAULT_CREATURE_API_URL};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use error::ApiError;
use handlers::{accounts, cards, creatures, deck, synergy};

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `DECKFORGE_*` environment variables. Every field has a default.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:                  String,
  pub port:                  u16,
  pub store_path:            PathBuf,
  /// Lifetime of a login session.
  pub token_ttl_minutes:     i64,
  pub creature_api_url:      String,
  pub card_api_url:          String,
  pub card_api_key:          Option<String>,
  /// Whole-request timeout of the upstream HTTP clients.
  pub upstream_timeout_secs: u64,
  /// Bound on each lookup made while computing recommendations.
  pub lookup_timeout_ms:     u64,
  pub max_image_probes:      usize,
  /// Bound on all counter-suggestion lookups of one request together.
  pub counter_budget_ms:     u64,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:                  "127.0.0.1".to_owned(),
      port:                  8000,
      store_path:            PathBuf::from("deckforge.db"),
      token_ttl_minutes:     30,
      creature_api_url:      DEFAULT_CREATURE_API_URL.to_owned(),
      card_api_url:          DEFAULT_CARD_API_URL.to_owned(),
      card_api_key:          None,
      upstream_timeout_secs: 10,
      lookup_timeout_ms:     3000,
      max_image_probes:      8,
      counter_budget_ms:     10_000,
    }
  }
}

impl ServerConfig {
  pub fn advisor_config(&self) -> AdvisorConfig {
    AdvisorConfig {
      lookup_timeout:   Duration::from_millis(self.lookup_timeout_ms),
      max_image_probes: self.max_image_probes,
      counter_budget:   Duration::from_millis(self.counter_budget_ms),
    }
  }

  pub fn upstream_timeout(&self) -> Duration { Duration::from_secs(self.upstream_timeout_secs) }

  pub fn token_ttl(&self) -> chrono::Duration { chrono::Duration::minutes(self.token_ttl_minutes) }
}

// ─── Application state ───────────────────────────────────────────────────────

/// Storage the API runs against: decks, accounts, and the local card cache.
pub trait Store: DeckStore + CardCatalog + 'static {}

impl<T> Store for T where T: DeckStore + CardCatalog + 'static {}

/// The upstream providers cards are fetched from on first reference.
pub trait Sources: CreatureLookup + CardCatalog + ImageProbe + 'static {}

impl<T> Sources for T where T: CreatureLookup + CardCatalog + ImageProbe + 'static {}

/// Shared state threaded through all axum handlers.
pub struct AppState<S, U> {
  pub store:    Arc<S>,
  pub upstream: Arc<U>,
  /// Shared so its image cache lives as long as the process.
  pub advisor:  Arc<Advisor>,
  pub config:   Arc<ServerConfig>,
}

impl<S, U> AppState<S, U> {
  pub fn new(store: S, upstream: U, advisor: Advisor, config: ServerConfig) -> Self {
    Self {
      store:    Arc::new(store),
      upstream: Arc::new(upstream),
      advisor:  Arc::new(advisor),
      config:   Arc::new(config),
    }
  }
}

impl<S, U> Clone for AppState<S, U> {
  fn clone(&self) -> Self {
    Self {
      store:    Arc::clone(&self.store),
      upstream: Arc::clone(&self.upstream),
      advisor:  Arc::clone(&self.advisor),
      config:   Arc::clone(&self.config),
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the full API router for `state`.
pub fn router<S, U>(state: AppState<S, U>) -> Router
where
  S: Store,
  U: Sources,
{
  Router::new()
    .route("/", get(root))
    // Accounts
    .route("/auth/signup", post(accounts::signup::<S, U>))
    .route("/auth/login", post(accounts::login::<S, U>))
    .route("/auth/logout", post(accounts::logout::<S, U>))
    // Deck
    .route("/deck", get(deck::show::<S, U>).post(deck::add::<S, U>))
    .route("/deck/creatures/{id}", delete(deck::remove_creature::<S, U>))
    .route("/deck/supports/{id}", delete(deck::remove_support::<S, U>))
    .route("/deck/resources/{id}", delete(deck::remove_resource::<S, U>))
    // Creatures
    .route("/creatures/{id}", get(creatures::get_one::<S, U>))
    // Scoring
    .route("/synergy", get(synergy::score))
    // Card cache
    .route(
      "/cards/supports",
      get(cards::list_supports::<S, U>).post(cards::create_support::<S, U>),
    )
    .route(
      "/cards/supports/{id}",
      get(cards::get_support::<S, U>)
        .put(cards::update_support::<S, U>)
        .delete(cards::delete_support::<S, U>),
    )
    .route(
      "/cards/resources",
      get(cards::list_resources::<S, U>).post(cards::create_resource::<S, U>),
    )
    .route(
      "/cards/resources/{id}",
      get(cards::get_resource::<S, U>)
        .put(cards::update_resource::<S, U>)
        .delete(cards::delete_resource::<S, U>),
    )
    .layer(TraceLayer::new_for_http())
    .layer(CorsLayer::permissive())
    .with_state(state)
}

/// `GET /`
async fn root() -> Json<Value> {
  Json(json!({ "message": "Welcome to the Deckforge deck builder!" }))
}

#[cfg(test)]
mod tests;

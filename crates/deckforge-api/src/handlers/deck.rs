//! Handlers for `/deck` endpoints. Every route acts on the caller's own deck.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/deck` | Cards, scores and recommendations |
//! | `POST`   | `/deck` | Body: `{"creature_ids","support_names","resource_types"}` |
//! | `DELETE` | `/deck/creatures/{id}` | 404 if not in the deck |
//! | `DELETE` | `/deck/supports/{id}` | |
//! | `DELETE` | `/deck/resources/{id}` | |

use axum::{
  Json,
  extract::{Path, State},
};
use deckforge_core::{
  card::{CreatureCard, ResourceCard, SupportCard},
  deck::{Deck, DeckContents, Recommendation},
  synergy::{SCORE_CAP, percent},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use uuid::Uuid;

use super::{cards, creatures};
use crate::{AppState, Sources, Store, auth::Authenticated, error::ApiError};

const NO_DECK: &str = "No deck found. Create one!";

/// Scores and advice for a deck's full contents.
#[derive(Debug, Default, Serialize)]
pub struct DeckSummary {
  pub deck_count:      usize,
  pub raw_score:       i64,
  /// `raw_score` as a percentage of the fullest possible deck.
  pub deck_score:      i64,
  pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Default, Serialize)]
pub struct DeckView {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub message:   Option<String>,
  pub creatures: Vec<CreatureCard>,
  pub supports:  Vec<SupportCard>,
  pub resources: Vec<ResourceCard>,
  #[serde(flatten)]
  pub summary:   DeckSummary,
}

async fn summarise<S, U>(
  state: &AppState<S, U>,
  contents: &DeckContents,
) -> Result<DeckSummary, ApiError>
where
  S: Store,
  U: Sources,
{
  let raw_score = contents.counts().score()?;
  let recommendations = state
    .advisor
    .recommend(contents, state.store.as_ref(), state.upstream.as_ref())
    .await;

  Ok(DeckSummary {
    deck_count: contents.len(),
    raw_score,
    deck_score: percent(raw_score, SCORE_CAP)?,
    recommendations,
  })
}

async fn own_deck<S, U>(state: &AppState<S, U>, auth: &Authenticated) -> Result<Deck, ApiError>
where
  S: Store,
  U: Sources,
{
  state
    .store
    .get_deck(auth.user.user_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(NO_DECK.into()))
}

// ─── Show ────────────────────────────────────────────────────────────────────

/// `GET /deck`
pub async fn show<S, U>(
  State(state): State<AppState<S, U>>,
  auth: Authenticated,
) -> Result<Json<DeckView>, ApiError>
where
  S: Store,
  U: Sources,
{
  let Some(deck) = state
    .store
    .get_deck(auth.user.user_id)
    .await
    .map_err(ApiError::store)?
  else {
    return Ok(Json(DeckView {
      message: Some(NO_DECK.into()),
      ..Default::default()
    }));
  };

  let contents = state
    .store
    .deck_contents(deck.deck_id)
    .await
    .map_err(ApiError::store)?;
  let summary = summarise(&state, &contents).await?;

  Ok(Json(DeckView {
    message: None,
    creatures: contents.creatures,
    supports: contents.supports,
    resources: contents.resources,
    summary,
  }))
}

// ─── Add ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AddCards {
  pub creature_ids:   Vec<i64>,
  pub support_names:  Vec<String>,
  pub resource_types: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct AddResult {
  pub message:         &'static str,
  pub added_creatures: Vec<CreatureCard>,
  pub added_supports:  Vec<SupportCard>,
  pub added_resources: Vec<ResourceCard>,
  /// Requested cards no provider knows.
  pub not_found:       Vec<String>,
  #[serde(flatten)]
  pub summary:         DeckSummary,
}

/// `POST /deck`: fetch-and-cache each requested card and add it to the
/// caller's deck, creating the deck on first use. Cards already in the deck
/// are skipped.
pub async fn add<S, U>(
  State(state): State<AppState<S, U>>,
  auth: Authenticated,
  Json(body): Json<AddCards>,
) -> Result<Json<AddResult>, ApiError>
where
  S: Store,
  U: Sources,
{
  let deck = state
    .store
    .get_or_create_deck(auth.user.user_id)
    .await
    .map_err(ApiError::store)?;

  let mut added_creatures = Vec::new();
  let mut added_supports = Vec::new();
  let mut added_resources = Vec::new();
  let mut not_found = Vec::new();

  for id in body.creature_ids {
    match creatures::cached_creature(&state, &id.to_string()).await? {
      Some(c) => {
        if state
          .store
          .add_creature(deck.deck_id, c.id)
          .await
          .map_err(ApiError::store)?
        {
          added_creatures.push(c);
        }
      }
      None => not_found.push(format!("creature {id}")),
    }
  }

  for name in body.support_names {
    match cards::cached_support(&state, &name).await? {
      Some(card) => {
        if state
          .store
          .add_support(deck.deck_id, card.id)
          .await
          .map_err(ApiError::store)?
        {
          added_supports.push(card);
        }
      }
      None => not_found.push(format!("support {name}")),
    }
  }

  for resource_type in body.resource_types {
    match cards::cached_resource(&state, &resource_type).await? {
      Some(card) => {
        if state
          .store
          .add_resource(deck.deck_id, card.id)
          .await
          .map_err(ApiError::store)?
        {
          added_resources.push(card);
        }
      }
      None => not_found.push(format!("resource {resource_type}")),
    }
  }

  tracing::info!(
    user_id = %auth.user.user_id,
    creatures = added_creatures.len(),
    supports = added_supports.len(),
    resources = added_resources.len(),
    "deck updated"
  );

  let contents = state
    .store
    .deck_contents(deck.deck_id)
    .await
    .map_err(ApiError::store)?;
  let summary = summarise(&state, &contents).await?;

  Ok(Json(AddResult {
    message: "Deck updated successfully",
    added_creatures,
    added_supports,
    added_resources,
    not_found,
    summary,
  }))
}

// ─── Remove ──────────────────────────────────────────────────────────────────

/// `DELETE /deck/creatures/{id}`
pub async fn remove_creature<S, U>(
  State(state): State<AppState<S, U>>,
  auth: Authenticated,
  Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError>
where
  S: Store,
  U: Sources,
{
  let deck = own_deck(&state, &auth).await?;
  let removed = state
    .store
    .remove_creature(deck.deck_id, id)
    .await
    .map_err(ApiError::store)?;
  if !removed {
    return Err(ApiError::NotFound(format!("creature {id} is not in your deck")));
  }
  Ok(Json(json!({ "message": "Creature removed from deck" })))
}

/// `DELETE /deck/supports/{id}`
pub async fn remove_support<S, U>(
  State(state): State<AppState<S, U>>,
  auth: Authenticated,
  Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError>
where
  S: Store,
  U: Sources,
{
  let deck = own_deck(&state, &auth).await?;
  let removed = state
    .store
    .remove_support(deck.deck_id, id)
    .await
    .map_err(ApiError::store)?;
  if !removed {
    return Err(ApiError::NotFound(format!("support card {id} is not in your deck")));
  }
  Ok(Json(json!({ "message": "Support card removed from deck" })))
}

/// `DELETE /deck/resources/{id}`
pub async fn remove_resource<S, U>(
  State(state): State<AppState<S, U>>,
  auth: Authenticated,
  Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError>
where
  S: Store,
  U: Sources,
{
  let deck = own_deck(&state, &auth).await?;
  let removed = state
    .store
    .remove_resource(deck.deck_id, id)
    .await
    .map_err(ApiError::store)?;
  if !removed {
    return Err(ApiError::NotFound(format!("resource card {id} is not in your deck")));
  }
  Ok(Json(json!({ "message": "Resource card removed from deck" })))
}

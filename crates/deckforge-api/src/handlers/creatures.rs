//! Handlers for `/creatures` endpoints.

use std::collections::BTreeSet;

use axum::{
  Json,
  extract::{Path, State},
};
use deckforge_core::{
  card::{CardType, CreatureCard},
  matchup::resolve,
};
use serde::Serialize;

use crate::{AppState, Sources, Store, auth::Authenticated, error::ApiError};

/// A creature with the strengths and weaknesses its types give it.
#[derive(Debug, Serialize)]
pub struct CreatureView {
  #[serde(flatten)]
  pub creature:   CreatureCard,
  pub strengths:  BTreeSet<CardType>,
  pub weaknesses: BTreeSet<CardType>,
}

impl From<CreatureCard> for CreatureView {
  fn from(creature: CreatureCard) -> Self {
    let coverage = resolve(creature.types.iter().copied());
    Self {
      creature,
      strengths: coverage.strengths,
      weaknesses: coverage.weaknesses,
    }
  }
}

/// Return the cached creature keyed by `id_or_name`, fetching and caching it
/// from upstream on first reference. `None` if upstream does not know it.
pub(crate) async fn cached_creature<S, U>(
  state: &AppState<S, U>,
  id_or_name: &str,
) -> Result<Option<CreatureCard>, ApiError>
where
  S: Store,
  U: Sources,
{
  if let Ok(id) = id_or_name.trim().parse::<i64>()
    && let Some(hit) = state.store.get_creature(id).await.map_err(ApiError::store)?
  {
    return Ok(Some(hit));
  }

  let Some(creature) = state
    .upstream
    .fetch_creature(id_or_name)
    .await
    .map_err(ApiError::upstream)?
  else {
    return Ok(None);
  };

  state
    .store
    .upsert_creature(&creature)
    .await
    .map_err(ApiError::store)?;
  tracing::debug!(id = creature.id, name = %creature.name, "cached creature");
  Ok(Some(creature))
}

/// `GET /creatures/{id}`; `id` may also be a creature name.
pub async fn get_one<S, U>(
  State(state): State<AppState<S, U>>,
  _auth: Authenticated,
  Path(id): Path<String>,
) -> Result<Json<CreatureView>, ApiError>
where
  S: Store,
  U: Sources,
{
  let creature = cached_creature(&state, &id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("creature {id} not found")))?;
  Ok(Json(creature.into()))
}

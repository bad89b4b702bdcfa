//! `GET /synergy`: the scorer on its own, for clients previewing a deck.

use axum::{Json, extract::Query};
use deckforge_core::synergy::{SCORE_CAP, percent, score as raw_score};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ScoreParams {
  pub creatures: i64,
  pub supports:  i64,
  pub resources: i64,
}

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
  pub raw_score: i64,
  pub percent:   i64,
}

/// `GET /synergy?creatures=&supports=&resources=`; missing counts are zero.
pub async fn score(Query(params): Query<ScoreParams>) -> Result<Json<ScoreResponse>, ApiError> {
  let raw = raw_score(params.creatures, params.supports, params.resources)?;
  Ok(Json(ScoreResponse {
    raw_score: raw,
    percent:   percent(raw, SCORE_CAP)?,
  }))
}

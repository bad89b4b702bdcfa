//! Handlers for the `/cards` endpoints: the local cache of support and
//! resource cards.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/cards/supports` | Every cached support card |
//! | `POST`   | `/cards/supports?name=` | Fetch first catalog match and cache it; 201 |
//! | `GET`    | `/cards/supports/{id}` | 404 if not cached |
//! | `PUT`    | `/cards/supports/{id}` | Partial update; 409 on a name clash |
//! | `DELETE` | `/cards/supports/{id}` | Also drops deck memberships |
//!
//! `/cards/resources` mirrors these, taking `?resource_type=` on `POST`.

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use deckforge_core::{
  card::{CardCategory, CardRecord, ResourceCard, SupportCard},
  store::{NewResource, NewSupport, ResourcePatch, SupportPatch},
};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::{AppState, Sources, Store, error::ApiError};

// ─── Fetch-and-cache ─────────────────────────────────────────────────────────

/// First upstream record of `category` named `name`.
async fn first_match<S, U>(
  state: &AppState<S, U>,
  category: CardCategory,
  name: &str,
) -> Result<Option<CardRecord>, ApiError>
where
  S: Store,
  U: Sources,
{
  let records = state
    .upstream
    .find_cards_by_category(category, Some(name))
    .await
    .map_err(ApiError::upstream)?;
  Ok(records.into_iter().next())
}

fn required(what: &str, value: &str) -> Result<String, ApiError> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    return Err(ApiError::BadRequest(format!("{what} must not be blank")));
  }
  Ok(trimmed.to_owned())
}

/// The cached support card called `name`, fetched from upstream on first
/// reference.
pub(crate) async fn cached_support<S, U>(
  state: &AppState<S, U>,
  name: &str,
) -> Result<Option<SupportCard>, ApiError>
where
  S: Store,
  U: Sources,
{
  let name = required("support card name", name)?;
  if let Some(hit) = state
    .store
    .find_support_by_name(&name)
    .await
    .map_err(ApiError::store)?
  {
    return Ok(Some(hit));
  }

  let Some(record) = first_match(state, CardCategory::Support, &name).await? else {
    return Ok(None);
  };
  let card = state
    .store
    .insert_support(NewSupport::from(record))
    .await
    .map_err(ApiError::store)?;
  tracing::debug!(id = %card.id, name = %card.name, "cached support card");
  Ok(Some(card))
}

/// The cached basic resource card for `resource_type`, e.g. `"Fire"` resolves
/// to "Fire Energy".
pub(crate) async fn cached_resource<S, U>(
  state: &AppState<S, U>,
  resource_type: &str,
) -> Result<Option<ResourceCard>, ApiError>
where
  S: Store,
  U: Sources,
{
  let resource_type = required("resource type", resource_type)?;
  let name = format!("{resource_type} Energy");
  if let Some(hit) = state
    .store
    .find_resource_by_name(&name)
    .await
    .map_err(ApiError::store)?
  {
    return Ok(Some(hit));
  }

  let Some(record) = first_match(state, CardCategory::Resource, &name).await? else {
    return Ok(None);
  };
  let card = state
    .store
    .insert_resource(NewResource::from(record))
    .await
    .map_err(ApiError::store)?;
  tracing::debug!(id = %card.id, name = %card.name, "cached resource card");
  Ok(Some(card))
}

// ─── Supports ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateSupportParams {
  pub name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SupportUpdate {
  pub name:        Option<String>,
  pub external_id: Option<String>,
  pub image_url:   Option<String>,
  pub set_name:    Option<String>,
  pub rarity:      Option<String>,
  pub effect:      Option<String>,
}

impl From<SupportUpdate> for SupportPatch {
  fn from(u: SupportUpdate) -> Self {
    Self {
      name:        u.name,
      external_id: u.external_id,
      image_url:   u.image_url,
      set_name:    u.set_name,
      rarity:      u.rarity,
      effect:      u.effect,
    }
  }
}

/// `GET /cards/supports`
pub async fn list_supports<S, U>(
  State(state): State<AppState<S, U>>,
) -> Result<Json<Vec<SupportCard>>, ApiError>
where
  S: Store,
  U: Sources,
{
  let cards = state.store.list_supports().await.map_err(ApiError::store)?;
  Ok(Json(cards))
}

/// `POST /cards/supports?name=<name>`
pub async fn create_support<S, U>(
  State(state): State<AppState<S, U>>,
  Query(params): Query<CreateSupportParams>,
) -> Result<impl IntoResponse, ApiError>
where
  S: Store,
  U: Sources,
{
  let card = cached_support(&state, &params.name)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("support card {:?} not found", params.name)))?;
  Ok((StatusCode::CREATED, Json(card)))
}

/// `GET /cards/supports/{id}`
pub async fn get_support<S, U>(
  State(state): State<AppState<S, U>>,
  Path(id): Path<Uuid>,
) -> Result<Json<SupportCard>, ApiError>
where
  S: Store,
  U: Sources,
{
  let card = state
    .store
    .get_support(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("support card {id} not found")))?;
  Ok(Json(card))
}

/// `PUT /cards/supports/{id}`
pub async fn update_support<S, U>(
  State(state): State<AppState<S, U>>,
  Path(id): Path<Uuid>,
  Json(body): Json<SupportUpdate>,
) -> Result<Json<SupportCard>, ApiError>
where
  S: Store,
  U: Sources,
{
  if let Some(name) = body.name.as_deref() {
    let owner = state
      .store
      .find_support_by_name(name)
      .await
      .map_err(ApiError::store)?;
    if owner.is_some_and(|c| c.id != id) {
      return Err(ApiError::Conflict(format!("support card {name:?} already exists")));
    }
  }

  let card = state
    .store
    .update_support(id, body.into())
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("support card {id} not found")))?;
  Ok(Json(card))
}

/// `DELETE /cards/supports/{id}`
pub async fn delete_support<S, U>(
  State(state): State<AppState<S, U>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError>
where
  S: Store,
  U: Sources,
{
  if !state.store.delete_support(id).await.map_err(ApiError::store)? {
    return Err(ApiError::NotFound(format!("support card {id} not found")));
  }
  Ok(Json(json!({ "message": "Support card deleted" })))
}

// ─── Resources ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateResourceParams {
  pub resource_type: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ResourceUpdate {
  pub name:          Option<String>,
  pub external_id:   Option<String>,
  pub image_url:     Option<String>,
  pub set_name:      Option<String>,
  pub rarity:        Option<String>,
  pub resource_type: Option<String>,
}

impl From<ResourceUpdate> for ResourcePatch {
  fn from(u: ResourceUpdate) -> Self {
    Self {
      name:          u.name,
      external_id:   u.external_id,
      image_url:     u.image_url,
      set_name:      u.set_name,
      rarity:        u.rarity,
      resource_type: u.resource_type,
    }
  }
}

/// `GET /cards/resources`
pub async fn list_resources<S, U>(
  State(state): State<AppState<S, U>>,
) -> Result<Json<Vec<ResourceCard>>, ApiError>
where
  S: Store,
  U: Sources,
{
  let cards = state.store.list_resources().await.map_err(ApiError::store)?;
  Ok(Json(cards))
}

/// `POST /cards/resources?resource_type=<type>`
pub async fn create_resource<S, U>(
  State(state): State<AppState<S, U>>,
  Query(params): Query<CreateResourceParams>,
) -> Result<impl IntoResponse, ApiError>
where
  S: Store,
  U: Sources,
{
  let card = cached_resource(&state, &params.resource_type)
    .await?
    .ok_or_else(|| {
      ApiError::NotFound(format!("no {:?} resource card found", params.resource_type))
    })?;
  Ok((StatusCode::CREATED, Json(card)))
}

/// `GET /cards/resources/{id}`
pub async fn get_resource<S, U>(
  State(state): State<AppState<S, U>>,
  Path(id): Path<Uuid>,
) -> Result<Json<ResourceCard>, ApiError>
where
  S: Store,
  U: Sources,
{
  let card = state
    .store
    .get_resource(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("resource card {id} not found")))?;
  Ok(Json(card))
}

/// `PUT /cards/resources/{id}`
pub async fn update_resource<S, U>(
  State(state): State<AppState<S, U>>,
  Path(id): Path<Uuid>,
  Json(body): Json<ResourceUpdate>,
) -> Result<Json<ResourceCard>, ApiError>
where
  S: Store,
  U: Sources,
{
  if let Some(name) = body.name.as_deref() {
    let owner = state
      .store
      .find_resource_by_name(name)
      .await
      .map_err(ApiError::store)?;
    if owner.is_some_and(|c| c.id != id) {
      return Err(ApiError::Conflict(format!("resource card {name:?} already exists")));
    }
  }

  let card = state
    .store
    .update_resource(id, body.into())
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("resource card {id} not found")))?;
  Ok(Json(card))
}

/// `DELETE /cards/resources/{id}`
pub async fn delete_resource<S, U>(
  State(state): State<AppState<S, U>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError>
where
  S: Store,
  U: Sources,
{
  if !state.store.delete_resource(id).await.map_err(ApiError::store)? {
    return Err(ApiError::NotFound(format!("resource card {id} not found")));
  }
  Ok(Json(json!({ "message": "Resource card deleted" })))
}

//! Handlers for `/auth` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/auth/signup` | Body: `{"email","password"}`; 201 |
//! | `POST` | `/auth/login`  | Body: `{"email","password"}`; returns a bearer token |
//! | `POST` | `/auth/logout` | Bearer; 204 |

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
  AppState, Sources, Store,
  auth::{Authenticated, hash_password, issue_token, token_digest, verify_password},
  error::ApiError,
};

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Deserialize)]
pub struct Credentials {
  pub email:    String,
  pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
  pub access_token: String,
  pub token_type:   &'static str,
  pub expires_at:   DateTime<Utc>,
}

/// Trim and lower-case `email`, rejecting anything without a local part and
/// a domain.
fn normalise_email(email: &str) -> Result<String, ApiError> {
  let email = email.trim().to_lowercase();
  let valid = match email.split_once('@') {
    Some((local, domain)) => {
      !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
    }
    None => false,
  };
  if !valid {
    return Err(ApiError::BadRequest(format!("invalid email address: {email:?}")));
  }
  Ok(email)
}

// ─── Signup ──────────────────────────────────────────────────────────────────

/// `POST /auth/signup`
pub async fn signup<S, U>(
  State(state): State<AppState<S, U>>,
  Json(body): Json<Credentials>,
) -> Result<impl IntoResponse, ApiError>
where
  S: Store,
  U: Sources,
{
  let email = normalise_email(&body.email)?;
  if body.password.chars().count() < MIN_PASSWORD_LEN {
    return Err(ApiError::BadRequest(format!(
      "password must be at least {MIN_PASSWORD_LEN} characters"
    )));
  }

  let existing = state
    .store
    .find_user_by_email(&email)
    .await
    .map_err(ApiError::store)?;
  if existing.is_some() {
    return Err(ApiError::BadRequest("this email is already registered".into()));
  }

  let hash = hash_password(&body.password)?;
  let user = state
    .store
    .create_user(email, hash)
    .await
    .map_err(ApiError::store)?;

  tracing::info!(user_id = %user.user_id, "user signed up");
  Ok((
    StatusCode::CREATED,
    Json(json!({ "message": "Success! You can now log in.", "user": user })),
  ))
}

// ─── Login / logout ──────────────────────────────────────────────────────────

/// `POST /auth/login`
pub async fn login<S, U>(
  State(state): State<AppState<S, U>>,
  Json(body): Json<Credentials>,
) -> Result<Json<TokenResponse>, ApiError>
where
  S: Store,
  U: Sources,
{
  let user = state
    .store
    .find_user_by_email(&body.email)
    .await
    .map_err(ApiError::store)?
    .filter(|u| verify_password(&body.password, &u.password_hash))
    .ok_or(ApiError::BadCredentials)?;

  let token = issue_token();
  let expires_at = Utc::now() + state.config.token_ttl();
  state
    .store
    .create_session(user.user_id, token_digest(&token), expires_at)
    .await
    .map_err(ApiError::store)?;

  tracing::info!(user_id = %user.user_id, "user logged in");
  Ok(Json(TokenResponse {
    access_token: token,
    token_type: "bearer",
    expires_at,
  }))
}

/// `POST /auth/logout`
pub async fn logout<S, U>(
  State(state): State<AppState<S, U>>,
  auth: Authenticated,
) -> Result<StatusCode, ApiError>
where
  S: Store,
  U: Sources,
{
  state
    .store
    .delete_session(&auth.token_hash)
    .await
    .map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}

//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  BadRequest(String),

  #[error("not authenticated")]
  Unauthorized,

  #[error("incorrect email or password")]
  BadCredentials,

  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] BoxError),

  #[error("upstream error: {0}")]
  Upstream(#[source] BoxError),

  #[error("internal error: {0}")]
  Internal(String),
}

impl ApiError {
  pub fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    ApiError::Store(Box::new(e))
  }

  pub fn upstream(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    ApiError::Upstream(Box::new(e))
  }
}

impl From<deckforge_core::Error> for ApiError {
  fn from(e: deckforge_core::Error) -> Self {
    use deckforge_core::Error as E;
    match e {
      E::InvalidArgument(m) => ApiError::BadRequest(m),
      E::UnknownType(t) => ApiError::BadRequest(format!("unknown type: {t}")),
      E::UpstreamUnavailable(m) => ApiError::Upstream(m.into()),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Unauthorized | ApiError::BadCredentials => StatusCode::UNAUTHORIZED,
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::Conflict(_) => StatusCode::CONFLICT,
      ApiError::Store(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
      ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
    };

    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    }

    let mut res = (status, Json(json!({ "error": self.to_string() }))).into_response();
    if status == StatusCode::UNAUTHORIZED {
      res
        .headers_mut()
        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    }
    res
  }
}

#[cfg(test)]
mod tests {
  use deckforge_core::Error as CoreError;

  use super::*;

  fn status_of(e: CoreError) -> StatusCode { ApiError::from(e).into_response().status() }

  #[test]
  fn core_errors_map_to_statuses() {
    assert_eq!(
      status_of(CoreError::InvalidArgument("negative".into())),
      StatusCode::BAD_REQUEST
    );
    assert_eq!(status_of(CoreError::UnknownType("Shadow".into())), StatusCode::BAD_REQUEST);
    assert_eq!(
      status_of(CoreError::UpstreamUnavailable("timed out".into())),
      StatusCode::BAD_GATEWAY
    );
  }

  #[test]
  fn unauthorized_carries_challenge() {
    let res = ApiError::Unauthorized.into_response();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(res.headers()[header::WWW_AUTHENTICATE], "Bearer");
  }
}

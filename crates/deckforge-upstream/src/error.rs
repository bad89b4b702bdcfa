//! Error type for `deckforge-upstream`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Transport failure: connect, TLS, timeout, truncated body.
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  /// The provider answered with a non-success status other than 404.
  #[error("upstream returned {status} for {url}")]
  Status { status: u16, url: String },

  #[error("could not decode upstream response: {0}")]
  Decode(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

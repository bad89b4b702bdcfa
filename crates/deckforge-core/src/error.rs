//! Error types for `deckforge-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A negative count, a non-positive cap, or a malformed type label.
  #[error("invalid argument: {0}")]
  InvalidArgument(String),

  /// A well-formed label that names no type in the closed set.
  #[error("unknown card type: {0:?}")]
  UnknownType(String),

  #[error("upstream unavailable: {0}")]
  UpstreamUnavailable(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

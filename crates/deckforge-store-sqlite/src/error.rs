//! Error type for `deckforge-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] deckforge_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  /// A column held text that does not decode into its domain type.
  #[error("decode error: {0}")]
  Decode(String),

  #[error("email already registered: {0}")]
  EmailTaken(String),

  /// A support or resource card already uses this name.
  #[error("card name already exists: {0}")]
  NameTaken(String),

  #[error("deck not found: {0}")]
  DeckNotFound(uuid::Uuid),

  /// Attempted to add a card to a deck before caching the card record.
  #[error("card not found: {0}")]
  CardNotFound(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings, UUIDs are hyphenated lowercase strings,
//! and list-valued creature fields are compact JSON.

use chrono::{DateTime, Utc};
use deckforge_core::{
  card::{CardType, CreatureCard, CreatureStats, ResourceCard, SupportCard},
  deck::Deck,
  user::{Session, User},
};
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode(format!("bad timestamp {s:?}: {e}")))
}

pub fn encode_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
  Ok(serde_json::to_string(value)?)
}

pub fn decode_json<T: DeserializeOwned>(s: &str) -> Result<T> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub user_id:       String,
  pub email:         String,
  pub password_hash: String,
  pub created_at:    String,
}

impl RawUser {
  pub const COLUMNS: &'static str = "user_id, email, password_hash, created_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:       row.get(0)?,
      email:         row.get(1)?,
      password_hash: row.get(2)?,
      created_at:    row.get(3)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:       decode_uuid(&self.user_id)?,
      email:         self.email,
      password_hash: self.password_hash,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

pub struct RawSession {
  pub token_hash: String,
  pub user_id:    String,
  pub created_at: String,
  pub expires_at: String,
}

impl RawSession {
  pub fn into_session(self) -> Result<Session> {
    Ok(Session {
      token_hash: self.token_hash,
      user_id:    decode_uuid(&self.user_id)?,
      created_at: decode_dt(&self.created_at)?,
      expires_at: decode_dt(&self.expires_at)?,
    })
  }
}

/// Raw values read from a `creatures` row; list fields still JSON-encoded.
pub struct RawCreature {
  pub creature_id: i64,
  pub name:        String,
  pub types:       String,
  pub image_url:   Option<String>,
  pub moves:       String,
  pub abilities:   String,
  pub stats:       String,
}

impl RawCreature {
  pub const COLUMNS: &'static str =
    "c.creature_id, c.name, c.types, c.image_url, c.moves, c.abilities, c.stats";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      creature_id: row.get(0)?,
      name:        row.get(1)?,
      types:       row.get(2)?,
      image_url:   row.get(3)?,
      moves:       row.get(4)?,
      abilities:   row.get(5)?,
      stats:       row.get(6)?,
    })
  }

  pub fn into_creature(self) -> Result<CreatureCard> {
    let types: Vec<CardType> = decode_json(&self.types)?;
    let stats: CreatureStats = decode_json(&self.stats)?;
    Ok(CreatureCard {
      id: self.creature_id,
      name: self.name,
      types,
      image_url: self.image_url,
      moves: decode_json(&self.moves)?,
      abilities: decode_json(&self.abilities)?,
      stats,
    })
  }
}

/// Shared shape of the `supports` and `resources` tables. The last column is
/// the effect text or the resource subtype respectively.
pub struct RawCard {
  pub id:          String,
  pub name:        String,
  pub external_id: Option<String>,
  pub image_url:   Option<String>,
  pub set_name:    Option<String>,
  pub rarity:      Option<String>,
  pub subtype:     Option<String>,
}

impl RawCard {
  pub const SUPPORT_COLUMNS: &'static str =
    "s.support_id, s.name, s.external_id, s.image_url, s.set_name, s.rarity, s.effect";
  pub const RESOURCE_COLUMNS: &'static str = "r.resource_id, r.name, r.external_id, \
                                              r.image_url, r.set_name, r.rarity, \
                                              r.resource_type";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      name:        row.get(1)?,
      external_id: row.get(2)?,
      image_url:   row.get(3)?,
      set_name:    row.get(4)?,
      rarity:      row.get(5)?,
      subtype:     row.get(6)?,
    })
  }

  pub fn into_support(self) -> Result<SupportCard> {
    Ok(SupportCard {
      id:          decode_uuid(&self.id)?,
      name:        self.name,
      external_id: self.external_id,
      image_url:   self.image_url,
      set_name:    self.set_name,
      rarity:      self.rarity,
      effect:      self.subtype,
    })
  }

  pub fn into_resource(self) -> Result<ResourceCard> {
    Ok(ResourceCard {
      id:            decode_uuid(&self.id)?,
      name:          self.name,
      external_id:   self.external_id,
      image_url:     self.image_url,
      set_name:      self.set_name,
      rarity:        self.rarity,
      resource_type: self.subtype,
    })
  }
}

pub struct RawDeck {
  pub deck_id:    String,
  pub user_id:    String,
  pub created_at: String,
}

impl RawDeck {
  pub fn into_deck(self) -> Result<Deck> {
    Ok(Deck {
      deck_id:    decode_uuid(&self.deck_id)?,
      user_id:    decode_uuid(&self.user_id)?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

//! Card types: the records a deck is assembled from.
//!
//! Card records are shared: many decks may reference the same creature,
//! support or resource row, and removing a card from a deck never deletes the
//! record itself.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Elemental type ──────────────────────────────────────────────────────────

/// The closed set of elemental types.
///
/// Variants are declared alphabetically so that the derived `Ord` sorts by
/// type name; sets of types iterate in a stable, readable order.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumIter,
  EnumString,
  IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum CardType {
  Bug,
  Dark,
  Dragon,
  Electric,
  Fairy,
  Fighting,
  Fire,
  Flying,
  Ghost,
  Grass,
  Ground,
  Ice,
  Normal,
  Poison,
  Psychic,
  Rock,
  Steel,
  Water,
}

impl CardType {
  /// Parse a free-form label such as `"fire"` or `" Water "`.
  ///
  /// Blank labels and labels containing anything but ASCII letters are
  /// malformed ([`Error::InvalidArgument`]); well-formed labels outside the
  /// closed set are [`Error::UnknownType`].
  pub fn parse_label(label: &str) -> Result<Self> {
    let trimmed = label.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
      return Err(Error::InvalidArgument(format!(
        "malformed type label: {label:?}"
      )));
    }
    CardType::from_str(trimmed).map_err(|_| Error::UnknownType(trimmed.to_owned()))
  }

  pub fn as_str(self) -> &'static str { self.into() }
}

// ─── Category ────────────────────────────────────────────────────────────────

/// The three kinds of card a deck holds.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CardCategory {
  Creature,
  Support,
  Resource,
}

// ─── Creature ────────────────────────────────────────────────────────────────

/// Base stats reported by the creature-data provider. Not used for scoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureStats {
  pub hp:              i64,
  pub attack:          i64,
  pub defense:         i64,
  pub special_attack:  i64,
  pub special_defense: i64,
  pub speed:           i64,
}

/// A creature, keyed by the upstream provider's numeric id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureCard {
  pub id:        i64,
  pub name:      String,
  /// One or more elemental types, in the order the provider lists them.
  pub types:     Vec<CardType>,
  pub image_url: Option<String>,
  pub moves:     Vec<String>,
  pub abilities: Vec<String>,
  pub stats:     CreatureStats,
}

// ─── Support & resource ──────────────────────────────────────────────────────

/// A support (trainer) card cached from the card catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportCard {
  pub id:          Uuid,
  pub name:        String,
  /// The catalog's own identifier, when known.
  pub external_id: Option<String>,
  pub image_url:   Option<String>,
  pub set_name:    Option<String>,
  pub rarity:      Option<String>,
  /// Short effect text.
  pub effect:      Option<String>,
}

/// A resource (energy) card cached from the card catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceCard {
  pub id:            Uuid,
  pub name:          String,
  pub external_id:   Option<String>,
  pub image_url:     Option<String>,
  pub set_name:      Option<String>,
  pub rarity:        Option<String>,
  /// Resource subtype, e.g. `"Fire"` for "Fire Energy".
  pub resource_type: Option<String>,
}

/// Derive a resource subtype from a card name by dropping a trailing
/// `" Energy"`. Returns `None` for names that reduce to nothing.
pub fn resource_type_from_name(name: &str) -> Option<String> {
  let trimmed = name.trim();
  let stripped = trimmed
    .strip_suffix("Energy")
    .or_else(|| trimmed.strip_suffix("energy"))
    .unwrap_or(trimmed)
    .trim();
  (!stripped.is_empty()).then(|| stripped.to_owned())
}

// ─── Catalog records ─────────────────────────────────────────────────────────

/// A card as returned by a catalog lookup, before it is cached locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardRecord {
  pub category:    CardCategory,
  pub name:        String,
  pub external_id: Option<String>,
  pub image_url:   Option<String>,
  pub set_name:    Option<String>,
  pub rarity:      Option<String>,
  /// Effect text for supports, resource subtype for resources.
  pub subtype:     Option<String>,
}

/// A creature candidate returned by a lookup-by-type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureRef {
  pub id:   i64,
  pub name: String,
}

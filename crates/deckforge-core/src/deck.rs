//! Decks and the recommendations computed for them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  card::{CardType, CreatureCard, ResourceCard, SupportCard},
  synergy::DeckCounts,
};

/// A user's deck. The envelope only; membership lives in join tables and is
/// read back as [`DeckContents`]. A user has at most one deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
  pub deck_id:    Uuid,
  pub user_id:    Uuid,
  pub created_at: DateTime<Utc>,
}

/// The materialised card lists of one deck.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeckContents {
  pub creatures: Vec<CreatureCard>,
  pub supports:  Vec<SupportCard>,
  pub resources: Vec<ResourceCard>,
}

impl DeckContents {
  pub fn is_empty(&self) -> bool {
    self.creatures.is_empty() && self.supports.is_empty() && self.resources.is_empty()
  }

  pub fn len(&self) -> usize {
    self.creatures.len() + self.supports.len() + self.resources.len()
  }

  pub fn counts(&self) -> DeckCounts {
    DeckCounts {
      creatures: self.creatures.len() as i64,
      supports:  self.supports.len() as i64,
      resources: self.resources.len() as i64,
    }
  }

  /// Every creature's types, flattened. A dual-type creature contributes
  /// both; two creatures of the same type contribute it twice.
  pub fn creature_types(&self) -> impl Iterator<Item = CardType> + '_ {
    self.creatures.iter().flat_map(|c| c.types.iter().copied())
  }
}

// ─── Recommendations ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationCategory {
  Creature,
  Support,
  Resource,
  Info,
}

/// One suggestion for improving a deck. Computed per request, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
  pub category:      RecommendationCategory,
  pub name:          String,
  pub image_url:     Option<String>,
  pub message:       String,
  /// Upstream id of a suggested creature, so clients can add it directly.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub creature_id:   Option<i64>,
  /// Subtype of a suggested resource card.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub resource_type: Option<String>,
}

impl Recommendation {
  /// An `info` entry with no card attached.
  pub fn info(message: impl Into<String>) -> Self {
    Self {
      category:      RecommendationCategory::Info,
      name:          "Deck advice".to_owned(),
      image_url:     None,
      message:       message.into(),
      creature_id:   None,
      resource_type: None,
    }
  }
}

//! Lookup traits for the card data the deck builder does not own.
//!
//! Implemented by the HTTP clients in `deckforge-upstream` and, for cards
//! already cached locally, by storage backends. The recommendation engine
//! depends on these traits only.

use std::future::Future;

use crate::card::{CardCategory, CardRecord, CardType, CreatureCard, CreatureRef};

/// Lists cards of one category, optionally filtered by name.
pub trait CardCatalog: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Return every card of `category` whose name matches `name` (provider
  /// defined; usually a prefix or substring match), or every card when
  /// `name` is `None`.
  fn find_cards_by_category<'a>(
    &'a self,
    category: CardCategory,
    name: Option<&'a str>,
  ) -> impl Future<Output = Result<Vec<CardRecord>, Self::Error>> + Send + 'a;
}

/// Creature data: full records by id or name, and candidates by type.
pub trait CreatureLookup: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Fetch one creature. Returns `None` if the provider does not know it.
  fn fetch_creature<'a>(
    &'a self,
    id_or_name: &'a str,
  ) -> impl Future<Output = Result<Option<CreatureCard>, Self::Error>> + Send + 'a;

  /// Every creature having `card_type` among its types.
  fn find_creatures_by_type(
    &self,
    card_type: CardType,
  ) -> impl Future<Output = Result<Vec<CreatureRef>, Self::Error>> + Send + '_;
}

/// Answers whether a creature has a displayable card image.
///
/// Idempotent, so results may be cached by the caller.
pub trait ImageProbe: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// The image reference for `name`, or `None` if it has no image.
  fn display_image<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + 'a;
}

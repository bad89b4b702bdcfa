//! The `DeckStore` trait and its input types.
//!
//! The trait is implemented by storage backends (e.g.
//! `deckforge-store-sqlite`). The API layer depends on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  card::{CardRecord, CreatureCard, ResourceCard, SupportCard, resource_type_from_name},
  deck::{Deck, DeckContents},
  user::{Session, User},
};

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Input to [`DeckStore::insert_support`]. The id is assigned by the store.
#[derive(Debug, Clone, Default)]
pub struct NewSupport {
  pub name:        String,
  pub external_id: Option<String>,
  pub image_url:   Option<String>,
  pub set_name:    Option<String>,
  pub rarity:      Option<String>,
  pub effect:      Option<String>,
}

impl From<CardRecord> for NewSupport {
  fn from(r: CardRecord) -> Self {
    Self {
      name:        r.name,
      external_id: r.external_id,
      image_url:   r.image_url,
      set_name:    r.set_name,
      rarity:      r.rarity,
      effect:      r.subtype,
    }
  }
}

/// Input to [`DeckStore::insert_resource`].
#[derive(Debug, Clone, Default)]
pub struct NewResource {
  pub name:          String,
  pub external_id:   Option<String>,
  pub image_url:     Option<String>,
  pub set_name:      Option<String>,
  pub rarity:        Option<String>,
  pub resource_type: Option<String>,
}

impl From<CardRecord> for NewResource {
  fn from(r: CardRecord) -> Self {
    let resource_type = r.subtype.or_else(|| resource_type_from_name(&r.name));
    Self {
      name: r.name,
      external_id: r.external_id,
      image_url: r.image_url,
      set_name: r.set_name,
      rarity: r.rarity,
      resource_type,
    }
  }
}

/// Partial update for a support card; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct SupportPatch {
  pub name:        Option<String>,
  pub external_id: Option<String>,
  pub image_url:   Option<String>,
  pub set_name:    Option<String>,
  pub rarity:      Option<String>,
  pub effect:      Option<String>,
}

/// Partial update for a resource card.
#[derive(Debug, Clone, Default)]
pub struct ResourcePatch {
  pub name:          Option<String>,
  pub external_id:   Option<String>,
  pub image_url:     Option<String>,
  pub set_name:      Option<String>,
  pub rarity:        Option<String>,
  pub resource_type: Option<String>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Deckforge storage backend.
///
/// Card records are shared between decks; removing a card from a deck only
/// deletes the membership row.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait DeckStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Register a user. `email` is stored lower-cased; an address already
  /// registered (in any case) is rejected.
  fn create_user(
    &self,
    email: String,
    password_hash: String,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  fn find_user_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  fn get_user(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  // ── Sessions ──────────────────────────────────────────────────────────

  fn create_session(
    &self,
    user_id: Uuid,
    token_hash: String,
    expires_at: DateTime<Utc>,
  ) -> impl Future<Output = Result<Session, Self::Error>> + Send + '_;

  /// Look up a live session. Expired sessions are reported as `None`.
  fn find_session<'a>(
    &'a self,
    token_hash: &'a str,
  ) -> impl Future<Output = Result<Option<Session>, Self::Error>> + Send + 'a;

  /// Returns `true` if a session was deleted.
  fn delete_session<'a>(
    &'a self,
    token_hash: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  // ── Creatures ─────────────────────────────────────────────────────────

  /// Insert or replace the cached record for `creature.id`.
  fn upsert_creature<'a>(
    &'a self,
    creature: &'a CreatureCard,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  fn get_creature(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<CreatureCard>, Self::Error>> + Send + '_;

  // ── Supports ──────────────────────────────────────────────────────────

  /// Get-or-insert by name: an existing card with the same name is returned
  /// unchanged.
  fn insert_support(
    &self,
    card: NewSupport,
  ) -> impl Future<Output = Result<SupportCard, Self::Error>> + Send + '_;

  fn get_support(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<SupportCard>, Self::Error>> + Send + '_;

  fn find_support_by_name<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Option<SupportCard>, Self::Error>> + Send + 'a;

  fn list_supports(
    &self,
  ) -> impl Future<Output = Result<Vec<SupportCard>, Self::Error>> + Send + '_;

  /// Returns the updated card, or `None` if `id` is unknown.
  fn update_support(
    &self,
    id: Uuid,
    patch: SupportPatch,
  ) -> impl Future<Output = Result<Option<SupportCard>, Self::Error>> + Send + '_;

  /// Delete the card and every deck membership referencing it.
  fn delete_support(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Resources ─────────────────────────────────────────────────────────

  fn insert_resource(
    &self,
    card: NewResource,
  ) -> impl Future<Output = Result<ResourceCard, Self::Error>> + Send + '_;

  fn get_resource(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<ResourceCard>, Self::Error>> + Send + '_;

  fn find_resource_by_name<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Option<ResourceCard>, Self::Error>> + Send + 'a;

  fn list_resources(
    &self,
  ) -> impl Future<Output = Result<Vec<ResourceCard>, Self::Error>> + Send + '_;

  fn update_resource(
    &self,
    id: Uuid,
    patch: ResourcePatch,
  ) -> impl Future<Output = Result<Option<ResourceCard>, Self::Error>> + Send + '_;

  fn delete_resource(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Decks ─────────────────────────────────────────────────────────────

  fn get_deck(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<Deck>, Self::Error>> + Send + '_;

  /// Return the user's deck, creating it on first use.
  fn get_or_create_deck(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Deck, Self::Error>> + Send + '_;

  /// Add a membership. Returns `false` if the card was already in the deck.
  fn add_creature(
    &self,
    deck_id: Uuid,
    creature_id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn add_support(
    &self,
    deck_id: Uuid,
    support_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn add_resource(
    &self,
    deck_id: Uuid,
    resource_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Remove a membership. Returns `false` if the card was not in the deck.
  fn remove_creature(
    &self,
    deck_id: Uuid,
    creature_id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn remove_support(
    &self,
    deck_id: Uuid,
    support_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn remove_resource(
    &self,
    deck_id: Uuid,
    resource_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Materialise the card lists of a deck.
  fn deck_contents(
    &self,
    deck_id: Uuid,
  ) -> impl Future<Output = Result<DeckContents, Self::Error>> + Send + '_;
}

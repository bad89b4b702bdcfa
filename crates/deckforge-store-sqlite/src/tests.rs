//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{Duration, Utc};
use deckforge_core::{
  card::{CardCategory, CardType, CreatureCard, CreatureStats},
  catalog::CardCatalog,
  store::{DeckStore, NewResource, NewSupport, ResourcePatch, SupportPatch},
};
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn creature(id: i64, name: &str, types: &[CardType]) -> CreatureCard {
  CreatureCard {
    id,
    name: name.into(),
    types: types.to_vec(),
    image_url: Some(format!("https://img.example/{id}.png")),
    moves: vec!["tackle".into()],
    abilities: vec![],
    stats: CreatureStats { hp: 40, ..Default::default() },
  }
}

fn support(name: &str) -> NewSupport {
  NewSupport {
    name: name.into(),
    effect: Some("Draw 2 cards.".into()),
    ..Default::default()
  }
}

fn resource(name: &str) -> NewResource {
  NewResource {
    name: name.into(),
    resource_type: Some(name.trim_end_matches(" Energy").into()),
    ..Default::default()
  }
}

// ─── Users & sessions ────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_find_user() {
  let s = store().await;

  let user = s
    .create_user("Ash@Example.com".into(), "hash".into())
    .await
    .unwrap();
  assert_eq!(user.email, "ash@example.com");

  let found = s.find_user_by_email("ASH@example.COM").await.unwrap().unwrap();
  assert_eq!(found.user_id, user.user_id);
  assert_eq!(found.password_hash, "hash");

  let by_id = s.get_user(user.user_id).await.unwrap();
  assert_eq!(by_id.map(|u| u.email), Some("ash@example.com".into()));
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
  let s = store().await;
  s.create_user("misty@example.com".into(), "a".into()).await.unwrap();

  let err = s
    .create_user("MISTY@example.com".into(), "b".into())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::EmailTaken(_)));
}

#[tokio::test]
async fn session_lifecycle() {
  let s = store().await;
  let user = s.create_user("brock@example.com".into(), "h".into()).await.unwrap();

  let expires = Utc::now() + Duration::minutes(30);
  s.create_session(user.user_id, "digest".into(), expires)
    .await
    .unwrap();

  let found = s.find_session("digest").await.unwrap().unwrap();
  assert_eq!(found.user_id, user.user_id);

  assert!(s.delete_session("digest").await.unwrap());
  assert!(s.find_session("digest").await.unwrap().is_none());
  assert!(!s.delete_session("digest").await.unwrap());
}

#[tokio::test]
async fn expired_session_is_not_found() {
  let s = store().await;
  let user = s.create_user("gary@example.com".into(), "h".into()).await.unwrap();

  s.create_session(user.user_id, "old".into(), Utc::now() - Duration::minutes(1))
    .await
    .unwrap();
  assert!(s.find_session("old").await.unwrap().is_none());
}

// ─── Cards ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn upsert_creature_replaces_record() {
  let s = store().await;
  s.upsert_creature(&creature(25, "pikachu", &[CardType::Electric]))
    .await
    .unwrap();

  let mut updated = creature(25, "pikachu", &[CardType::Electric]);
  updated.abilities = vec!["static".into()];
  s.upsert_creature(&updated).await.unwrap();

  let got = s.get_creature(25).await.unwrap().unwrap();
  assert_eq!(got, updated);
  assert!(s.get_creature(26).await.unwrap().is_none());
}

#[tokio::test]
async fn insert_support_is_get_or_insert_by_name() {
  let s = store().await;

  let first = s.insert_support(support("Potion")).await.unwrap();
  let again = s.insert_support(support("potion")).await.unwrap();
  assert_eq!(first.id, again.id);
  assert_eq!(again.name, "Potion");

  assert_eq!(s.list_supports().await.unwrap().len(), 1);
  let by_name = s.find_support_by_name("POTION").await.unwrap().unwrap();
  assert_eq!(by_name.id, first.id);
}

#[tokio::test]
async fn blank_card_name_is_rejected() {
  let s = store().await;
  let err = s.insert_support(support("   ")).await.unwrap_err();
  assert!(matches!(err, Error::Core(deckforge_core::Error::InvalidArgument(_))));
}

#[tokio::test]
async fn update_support_patches_only_given_fields() {
  let s = store().await;
  let card = s.insert_support(support("Switch")).await.unwrap();

  let patched = s
    .update_support(card.id, SupportPatch {
      rarity: Some("Common".into()),
      ..Default::default()
    })
    .await
    .unwrap()
    .unwrap();
  assert_eq!(patched.name, "Switch");
  assert_eq!(patched.rarity.as_deref(), Some("Common"));
  assert_eq!(patched.effect.as_deref(), Some("Draw 2 cards."));

  let missing = s
    .update_support(Uuid::new_v4(), SupportPatch::default())
    .await
    .unwrap();
  assert!(missing.is_none());
}

#[tokio::test]
async fn renaming_onto_an_existing_name_fails() {
  let s = store().await;
  s.insert_resource(resource("Fire Energy")).await.unwrap();
  let water = s.insert_resource(resource("Water Energy")).await.unwrap();

  let err = s
    .update_resource(water.id, ResourcePatch {
      name: Some("fire energy".into()),
      ..Default::default()
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::NameTaken(_)));

  let unchanged = s.get_resource(water.id).await.unwrap().unwrap();
  assert_eq!(unchanged.name, "Water Energy");
}

// ─── Decks ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn get_or_create_deck_is_stable() {
  let s = store().await;
  let user = s.create_user("may@example.com".into(), "h".into()).await.unwrap();

  assert!(s.get_deck(user.user_id).await.unwrap().is_none());
  let a = s.get_or_create_deck(user.user_id).await.unwrap();
  let b = s.get_or_create_deck(user.user_id).await.unwrap();
  assert_eq!(a.deck_id, b.deck_id);
  assert_eq!(s.get_deck(user.user_id).await.unwrap(), Some(a));
}

#[tokio::test]
async fn deck_membership_round_trip() {
  let s = store().await;
  let user = s.create_user("dawn@example.com".into(), "h".into()).await.unwrap();
  let deck = s.get_or_create_deck(user.user_id).await.unwrap();

  s.upsert_creature(&creature(7, "squirtle", &[CardType::Water]))
    .await
    .unwrap();
  s.upsert_creature(&creature(4, "charmander", &[CardType::Fire]))
    .await
    .unwrap();
  let potion = s.insert_support(support("Potion")).await.unwrap();
  let fire = s.insert_resource(resource("Fire Energy")).await.unwrap();

  assert!(s.add_creature(deck.deck_id, 7).await.unwrap());
  assert!(s.add_creature(deck.deck_id, 4).await.unwrap());
  assert!(!s.add_creature(deck.deck_id, 7).await.unwrap());
  assert!(s.add_support(deck.deck_id, potion.id).await.unwrap());
  assert!(s.add_resource(deck.deck_id, fire.id).await.unwrap());

  let contents = s.deck_contents(deck.deck_id).await.unwrap();
  let ids: Vec<i64> = contents.creatures.iter().map(|c| c.id).collect();
  assert_eq!(ids, vec![7, 4]);
  assert_eq!(contents.supports, vec![potion.clone()]);
  assert_eq!(contents.resources, vec![fire]);
  assert_eq!(contents.counts().score().unwrap(), 28);

  assert!(s.remove_creature(deck.deck_id, 7).await.unwrap());
  assert!(!s.remove_creature(deck.deck_id, 7).await.unwrap());
  // The card record survives removal from the deck.
  assert!(s.get_creature(7).await.unwrap().is_some());

  let contents = s.deck_contents(deck.deck_id).await.unwrap();
  assert_eq!(contents.creatures.len(), 1);
}

#[tokio::test]
async fn add_requires_deck_and_cached_card() {
  let s = store().await;
  let user = s.create_user("iris@example.com".into(), "h".into()).await.unwrap();
  let deck = s.get_or_create_deck(user.user_id).await.unwrap();

  let err = s.add_creature(Uuid::new_v4(), 1).await.unwrap_err();
  assert!(matches!(err, Error::DeckNotFound(_)));

  let err = s.add_creature(deck.deck_id, 9999).await.unwrap_err();
  assert!(matches!(err, Error::CardNotFound(_)));

  let err = s.add_support(deck.deck_id, Uuid::new_v4()).await.unwrap_err();
  assert!(matches!(err, Error::CardNotFound(_)));
}

#[tokio::test]
async fn deleting_a_card_drops_its_memberships() {
  let s = store().await;
  let user = s.create_user("cilan@example.com".into(), "h".into()).await.unwrap();
  let deck = s.get_or_create_deck(user.user_id).await.unwrap();
  let card = s.insert_support(support("Bill")).await.unwrap();
  s.add_support(deck.deck_id, card.id).await.unwrap();

  assert!(s.delete_support(card.id).await.unwrap());
  assert!(!s.delete_support(card.id).await.unwrap());
  assert!(s.deck_contents(deck.deck_id).await.unwrap().supports.is_empty());
}

#[tokio::test]
async fn decks_are_isolated_per_user() {
  let s = store().await;
  let a = s.create_user("a@example.com".into(), "h".into()).await.unwrap();
  let b = s.create_user("b@example.com".into(), "h".into()).await.unwrap();
  let deck_a = s.get_or_create_deck(a.user_id).await.unwrap();
  let deck_b = s.get_or_create_deck(b.user_id).await.unwrap();
  assert_ne!(deck_a.deck_id, deck_b.deck_id);

  s.upsert_creature(&creature(1, "bulbasaur", &[CardType::Grass]))
    .await
    .unwrap();
  s.add_creature(deck_a.deck_id, 1).await.unwrap();

  assert_eq!(s.deck_contents(deck_a.deck_id).await.unwrap().len(), 1);
  assert!(s.deck_contents(deck_b.deck_id).await.unwrap().is_empty());
  assert!(!s.remove_creature(deck_b.deck_id, 1).await.unwrap());
}

// ─── Catalog ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn cached_cards_serve_as_catalog() {
  let s = store().await;
  s.insert_support(support("Potion")).await.unwrap();
  s.insert_support(support("Super Potion")).await.unwrap();
  s.insert_support(support("Switch")).await.unwrap();
  s.insert_resource(resource("Grass Energy")).await.unwrap();
  s.upsert_creature(&creature(1, "bulbasaur", &[CardType::Grass, CardType::Poison]))
    .await
    .unwrap();

  let all = s
    .find_cards_by_category(CardCategory::Support, None)
    .await
    .unwrap();
  assert_eq!(all.len(), 3);

  let potions = s
    .find_cards_by_category(CardCategory::Support, Some("potion"))
    .await
    .unwrap();
  let names: Vec<&str> = potions.iter().map(|r| r.name.as_str()).collect();
  assert_eq!(names, vec!["Potion", "Super Potion"]);

  let energy = s
    .find_cards_by_category(CardCategory::Resource, None)
    .await
    .unwrap();
  assert_eq!(energy[0].subtype.as_deref(), Some("Grass"));

  let creatures = s
    .find_cards_by_category(CardCategory::Creature, None)
    .await
    .unwrap();
  assert_eq!(creatures[0].external_id.as_deref(), Some("1"));
  assert_eq!(creatures[0].subtype.as_deref(), Some("Grass"));
}

#[tokio::test]
async fn catalog_skips_creatures_without_an_image() {
  let s = store().await;
  s.upsert_creature(&creature(1, "bulbasaur", &[CardType::Grass]))
    .await
    .unwrap();
  let missingno = CreatureCard {
    image_url: None,
    ..creature(0, "missingno", &[CardType::Normal])
  };
  s.upsert_creature(&missingno).await.unwrap();
  assert_eq!(s.list_creatures().await.unwrap().len(), 2);

  let creatures = s
    .find_cards_by_category(CardCategory::Creature, None)
    .await
    .unwrap();
  let names: Vec<&str> = creatures.iter().map(|r| r.name.as_str()).collect();
  assert_eq!(names, vec!["bulbasaur"]);

  let named = s
    .find_cards_by_category(CardCategory::Creature, Some("missingno"))
    .await
    .unwrap();
  assert!(named.is_empty());
}

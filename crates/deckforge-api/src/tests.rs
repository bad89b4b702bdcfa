use std::{collections::HashMap, io};

use axum::{
  body::Body,
  http::{HeaderMap, Request, StatusCode, header},
};
use chrono::{Duration, Utc};
use deckforge_advisor::{Advisor, AdvisorConfig, FixedSelector};
use deckforge_core::{
  card::{CardCategory, CardRecord, CardType, CreatureCard, CreatureRef, CreatureStats},
  catalog::{CardCatalog, CreatureLookup, ImageProbe},
  store::DeckStore,
};
use deckforge_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use super::*;
use crate::auth::{issue_token, token_digest};

// ─── Fake upstream ───────────────────────────────────────────────────────────

#[derive(Default)]
struct FakeUpstream {
  creatures: Vec<CreatureCard>,
  by_type:   HashMap<CardType, Vec<CreatureRef>>,
  images:    HashMap<String, String>,
  cards:     Vec<CardRecord>,
}

impl CreatureLookup for FakeUpstream {
  type Error = io::Error;

  async fn fetch_creature(&self, id_or_name: &str) -> Result<Option<CreatureCard>, io::Error> {
    let key = id_or_name.trim().to_lowercase();
    Ok(
      self
        .creatures
        .iter()
        .find(|c| c.id.to_string() == key || c.name == key)
        .cloned(),
    )
  }

  async fn find_creatures_by_type(&self, card_type: CardType) -> Result<Vec<CreatureRef>, io::Error> {
    Ok(self.by_type.get(&card_type).cloned().unwrap_or_default())
  }
}

impl CardCatalog for FakeUpstream {
  type Error = io::Error;

  async fn find_cards_by_category(
    &self,
    category: CardCategory,
    name: Option<&str>,
  ) -> Result<Vec<CardRecord>, io::Error> {
    Ok(
      self
        .cards
        .iter()
        .filter(|r| r.category == category)
        .filter(|r| name.is_none_or(|n| r.name.eq_ignore_ascii_case(n)))
        .cloned()
        .collect(),
    )
  }
}

impl ImageProbe for FakeUpstream {
  type Error = io::Error;

  async fn display_image(&self, name: &str) -> Result<Option<String>, io::Error> {
    Ok(self.images.get(name).cloned())
  }
}

fn creature(id: i64, name: &str, types: &[CardType]) -> CreatureCard {
  CreatureCard {
    id,
    name: name.to_owned(),
    types: types.to_vec(),
    image_url: Some(format!("https://img.example/{id}.png")),
    moves: vec!["tackle".into()],
    abilities: vec![],
    stats: CreatureStats::default(),
  }
}

fn record(category: CardCategory, name: &str, subtype: Option<&str>) -> CardRecord {
  CardRecord {
    category,
    name: name.to_owned(),
    external_id: Some(format!("base1-{}", name.len())),
    image_url: Some(format!("https://img.example/{name}.png")),
    set_name: Some("Base".into()),
    rarity: Some("Common".into()),
    subtype: subtype.map(str::to_owned),
  }
}

fn upstream() -> FakeUpstream {
  use CardType::*;

  let sandshrew = CreatureRef { id: 27, name: "sandshrew".into() };
  FakeUpstream {
    creatures: vec![
      creature(7, "squirtle", &[Water]),
      creature(54, "psyduck", &[Water]),
      creature(25, "pikachu", &[Electric]),
      creature(27, "sandshrew", &[Ground]),
    ],
    by_type:   HashMap::from([(Ground, vec![sandshrew])]),
    images:    HashMap::from([(
      "sandshrew".to_owned(),
      "https://cards.example/sandshrew.png".to_owned(),
    )]),
    cards:     vec![
      record(CardCategory::Support, "Potion", Some("Heal 20 damage.")),
      record(CardCategory::Support, "Bill", Some("Draw 2 cards.")),
      record(CardCategory::Resource, "Water Energy", Some("Water")),
      record(CardCategory::Resource, "Fire Energy", Some("Fire")),
    ],
  }
}

async fn make_state() -> AppState<SqliteStore, FakeUpstream> {
  let store = SqliteStore::open_in_memory().await.unwrap();
  let advisor = Advisor::new(AdvisorConfig::default(), FixedSelector(0));
  AppState::new(store, upstream(), advisor, ServerConfig::default())
}

// ─── Request helpers ─────────────────────────────────────────────────────────

async fn send(
  state: &AppState<SqliteStore, FakeUpstream>,
  method: &str,
  uri: &str,
  token: Option<&str>,
  body: Option<Value>,
) -> (StatusCode, HeaderMap, Value) {
  let mut req = Request::builder().method(method).uri(uri);
  if let Some(token) = token {
    req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
  }
  let req = match body {
    Some(body) => req
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(body.to_string()))
      .unwrap(),
    None => req.body(Body::empty()).unwrap(),
  };

  let res = router(state.clone()).oneshot(req).await.unwrap();
  let status = res.status();
  let headers = res.headers().clone();
  let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
    .await
    .unwrap();
  let value = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, headers, value)
}

/// Sign up and log in `email`, returning a bearer token.
async fn login_as(state: &AppState<SqliteStore, FakeUpstream>, email: &str) -> String {
  let creds = json!({ "email": email, "password": "pikachu123" });
  let (status, _, _) = send(state, "POST", "/auth/signup", None, Some(creds.clone())).await;
  assert_eq!(status, StatusCode::CREATED);
  let (status, _, body) = send(state, "POST", "/auth/login", None, Some(creds)).await;
  assert_eq!(status, StatusCode::OK);
  body["access_token"].as_str().unwrap().to_owned()
}

// ─── Root & accounts ─────────────────────────────────────────────────────────

#[tokio::test]
async fn root_welcomes() {
  let state = make_state().await;
  let (status, _, body) = send(&state, "GET", "/", None, None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["message"], "Welcome to the Deckforge deck builder!");
}

#[tokio::test]
async fn signup_validates_input() {
  let state = make_state().await;

  let creds = json!({ "email": "Ash@Kanto.org", "password": "pikachu123" });
  let (status, _, body) = send(&state, "POST", "/auth/signup", None, Some(creds)).await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["message"], "Success! You can now log in.");
  assert_eq!(body["user"]["email"], "ash@kanto.org");

  let again = json!({ "email": "ash@kanto.org", "password": "another1" });
  let (status, _, body) = send(&state, "POST", "/auth/signup", None, Some(again)).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "this email is already registered");

  let short = json!({ "email": "misty@kanto.org", "password": "abc" });
  let (status, _, _) = send(&state, "POST", "/auth/signup", None, Some(short)).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let bad_email = json!({ "email": "misty", "password": "pikachu123" });
  let (status, _, _) = send(&state, "POST", "/auth/signup", None, Some(bad_email)).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
  let state = make_state().await;
  login_as(&state, "ash@kanto.org").await;

  let wrong = json!({ "email": "ash@kanto.org", "password": "wrong-password" });
  let (status, _, _) = send(&state, "POST", "/auth/login", None, Some(wrong)).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);

  let nobody = json!({ "email": "gary@kanto.org", "password": "pikachu123" });
  let (status, _, _) = send(&state, "POST", "/auth/login", None, Some(nobody)).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_issues_bearer_token() {
  let state = make_state().await;
  let creds = json!({ "email": "ash@kanto.org", "password": "pikachu123" });
  send(&state, "POST", "/auth/signup", None, Some(creds.clone())).await;

  let (status, _, body) = send(&state, "POST", "/auth/login", None, Some(creds)).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["token_type"], "bearer");
  assert_eq!(body["access_token"].as_str().unwrap().len(), 43);
}

#[tokio::test]
async fn deck_requires_a_bearer_token() {
  let state = make_state().await;

  let (status, headers, _) = send(&state, "GET", "/deck", None, None).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
  assert_eq!(headers[header::WWW_AUTHENTICATE], "Bearer");

  let (status, _, _) = send(&state, "GET", "/deck", Some("not-a-token"), None).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_revokes_the_token() {
  let state = make_state().await;
  let token = login_as(&state, "ash@kanto.org").await;

  let (status, _, _) = send(&state, "GET", "/deck", Some(&token), None).await;
  assert_eq!(status, StatusCode::OK);

  let (status, _, body) = send(&state, "POST", "/auth/logout", Some(&token), None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);
  assert_eq!(body, Value::Null);

  let (status, _, _) = send(&state, "GET", "/deck", Some(&token), None).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_sessions_are_rejected() {
  let state = make_state().await;
  let user = state
    .store
    .create_user("ash@kanto.org".into(), "unused".into())
    .await
    .unwrap();

  let token = issue_token();
  state
    .store
    .create_session(user.user_id, token_digest(&token), Utc::now() - Duration::minutes(1))
    .await
    .unwrap();

  let (status, _, _) = send(&state, "GET", "/deck", Some(&token), None).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ─── Deck ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn show_without_a_deck() {
  let state = make_state().await;
  let token = login_as(&state, "ash@kanto.org").await;

  let (status, _, body) = send(&state, "GET", "/deck", Some(&token), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["message"], "No deck found. Create one!");
  assert_eq!(body["deck_count"], 0);
  assert_eq!(body["creatures"], json!([]));
}

#[tokio::test]
async fn add_cards_scores_and_advises() {
  let state = make_state().await;
  let token = login_as(&state, "ash@kanto.org").await;

  let body = json!({
    "creature_ids": [7, 54, 9999],
    "support_names": ["Potion"],
    "resource_types": ["Water"],
  });
  let (status, _, body) = send(&state, "POST", "/deck", Some(&token), Some(body)).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["message"], "Deck updated successfully");
  assert_eq!(body["added_creatures"].as_array().unwrap().len(), 2);
  assert_eq!(body["added_supports"][0]["name"], "Potion");
  assert_eq!(body["added_supports"][0]["effect"], "Heal 20 damage.");
  assert_eq!(body["added_resources"][0]["name"], "Water Energy");
  assert_eq!(body["added_resources"][0]["resource_type"], "Water");
  assert_eq!(body["not_found"], json!(["creature 9999"]));

  // 2 creatures, 1 support, 1 resource.
  assert_eq!(body["deck_count"], 4);
  assert_eq!(body["raw_score"], 28);
  assert_eq!(body["deck_score"], 8);

  let recs = body["recommendations"].as_array().unwrap();
  assert_eq!(recs[0]["category"], "creature");
  assert_eq!(recs[0]["name"], "sandshrew");
  assert_eq!(recs[0]["creature_id"], 27);
  assert_eq!(
    recs[0]["message"],
    "Your deck has 2 creatures weak to Electric. Consider adding sandshrew!"
  );
  assert_eq!(recs[0]["image_url"], "https://cards.example/sandshrew.png");
  // Everything cached locally is already in the deck.
  assert!(
    recs
      .iter()
      .all(|r| r["category"] != "support" && r["category"] != "resource")
  );
  let last = recs.last().unwrap();
  assert_eq!(last["category"], "info");
  assert!(last["message"].as_str().unwrap().contains("score is 28"));

  // Cards already in the deck are not added twice.
  let again = json!({ "creature_ids": [7] });
  let (status, _, body) = send(&state, "POST", "/deck", Some(&token), Some(again)).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["added_creatures"], json!([]));
  assert_eq!(body["deck_count"], 4);

  let (status, _, body) = send(&state, "GET", "/deck", Some(&token), None).await;
  assert_eq!(status, StatusCode::OK);
  assert!(body.get("message").is_none());
  assert_eq!(body["creatures"][0]["name"], "squirtle");
  assert_eq!(body["creatures"][1]["name"], "psyduck");
  assert_eq!(body["raw_score"], 28);
}

#[tokio::test]
async fn cached_cards_are_advertised() {
  let state = make_state().await;
  let token = login_as(&state, "ash@kanto.org").await;

  let (status, _, _) = send(&state, "POST", "/cards/supports?name=Bill", None, None).await;
  assert_eq!(status, StatusCode::CREATED);

  let body = json!({ "creature_ids": [25] });
  let (_, _, body) = send(&state, "POST", "/deck", Some(&token), Some(body)).await;
  let recs = body["recommendations"].as_array().unwrap();
  let bill = recs.iter().find(|r| r["name"] == "Bill").unwrap();
  assert_eq!(bill["category"], "support");
  assert_eq!(bill["message"], "Consider adding Bill to support your creatures.");
}

#[tokio::test]
async fn remove_cards_from_deck() {
  let state = make_state().await;
  let token = login_as(&state, "ash@kanto.org").await;

  let (status, _, _) = send(&state, "DELETE", "/deck/creatures/7", Some(&token), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let body = json!({ "creature_ids": [7], "support_names": ["Potion"] });
  let (_, _, body) = send(&state, "POST", "/deck", Some(&token), Some(body)).await;
  let support_id = body["added_supports"][0]["id"].as_str().unwrap().to_owned();

  let (status, _, body) = send(&state, "DELETE", "/deck/creatures/7", Some(&token), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["message"], "Creature removed from deck");

  let (status, _, _) = send(&state, "DELETE", "/deck/creatures/7", Some(&token), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let uri = format!("/deck/supports/{support_id}");
  let (status, _, _) = send(&state, "DELETE", &uri, Some(&token), None).await;
  assert_eq!(status, StatusCode::OK);

  let (_, _, body) = send(&state, "GET", "/deck", Some(&token), None).await;
  assert_eq!(body["deck_count"], 0);
  assert_eq!(
    body["recommendations"][0]["message"],
    "Your deck is empty! Start adding creatures!"
  );
  // The support card stays cached.
  let (status, _, _) = send(&state, "GET", &format!("/cards/supports/{support_id}"), None, None).await;
  assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn decks_are_per_user() {
  let state = make_state().await;
  let ash = login_as(&state, "ash@kanto.org").await;
  let misty = login_as(&state, "misty@kanto.org").await;

  let body = json!({ "creature_ids": [7] });
  send(&state, "POST", "/deck", Some(&ash), Some(body)).await;

  let (_, _, body) = send(&state, "GET", "/deck", Some(&misty), None).await;
  assert_eq!(body["message"], "No deck found. Create one!");

  let (status, _, _) = send(&state, "DELETE", "/deck/creatures/7", Some(&misty), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ─── Creatures ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn creature_lookup_is_cached_with_coverage() {
  let state = make_state().await;
  let token = login_as(&state, "ash@kanto.org").await;

  let (status, _, body) = send(&state, "GET", "/creatures/25", Some(&token), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["name"], "pikachu");
  assert_eq!(body["types"], json!(["Electric"]));
  assert_eq!(body["strengths"], json!(["Flying", "Water"]));
  assert_eq!(body["weaknesses"], json!(["Ground"]));

  let cached = state.store.get_creature(25).await.unwrap().unwrap();
  assert_eq!(cached.name, "pikachu");

  let (status, _, body) = send(&state, "GET", "/creatures/sandshrew", Some(&token), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["id"], 27);

  let (status, _, _) = send(&state, "GET", "/creatures/9999", Some(&token), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let (status, _, _) = send(&state, "GET", "/creatures/25", None, None).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ─── Synergy ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn synergy_endpoint_scores_counts() {
  let state = make_state().await;

  let (status, _, body) = send(&state, "GET", "/synergy?creatures=4", None, None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, json!({ "raw_score": 40, "percent": 11 }));

  let uri = "/synergy?creatures=20&supports=20&resources=20";
  let (_, _, body) = send(&state, "GET", uri, None, None).await;
  assert_eq!(body, json!({ "raw_score": 360, "percent": 100 }));

  let (_, _, body) = send(&state, "GET", "/synergy", None, None).await;
  assert_eq!(body, json!({ "raw_score": 0, "percent": 0 }));

  let (status, _, _) = send(&state, "GET", "/synergy?creatures=-1", None, None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn synergy_endpoint_rejects_overflowing_counts() {
  let state = make_state().await;

  let uri = "/synergy?creatures=1000000000000000000";
  let (status, _, body) = send(&state, "GET", uri, None, None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("overflows"));
}

// ─── Card cache ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn support_card_crud() {
  let state = make_state().await;

  let (status, _, potion) = send(&state, "POST", "/cards/supports?name=potion", None, None).await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(potion["name"], "Potion");
  let id = potion["id"].as_str().unwrap().to_owned();

  // A second create returns the cached row.
  let (_, _, again) = send(&state, "POST", "/cards/supports?name=Potion", None, None).await;
  assert_eq!(again["id"], potion["id"]);

  send(&state, "POST", "/cards/supports?name=Bill", None, None).await;
  let (_, _, list) = send(&state, "GET", "/cards/supports", None, None).await;
  let names: Vec<&str> = list
    .as_array()
    .unwrap()
    .iter()
    .map(|c| c["name"].as_str().unwrap())
    .collect();
  assert_eq!(names, ["Bill", "Potion"]);

  let uri = format!("/cards/supports/{id}");
  let (status, _, _) = send(&state, "PUT", &uri, None, Some(json!({ "name": "Bill" }))).await;
  assert_eq!(status, StatusCode::CONFLICT);

  let patch = json!({ "rarity": "Rare" });
  let (status, _, body) = send(&state, "PUT", &uri, None, Some(patch)).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["rarity"], "Rare");
  assert_eq!(body["name"], "Potion");

  let (status, _, _) = send(&state, "DELETE", &uri, None, None).await;
  assert_eq!(status, StatusCode::OK);
  let (status, _, _) = send(&state, "GET", &uri, None, None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  let (status, _, _) = send(&state, "DELETE", &uri, None, None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let (status, _, _) = send(&state, "POST", "/cards/supports?name=Nope", None, None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  let (status, _, _) = send(&state, "POST", "/cards/supports?name=%20", None, None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn resource_card_crud() {
  let state = make_state().await;

  let (status, _, fire) = send(&state, "POST", "/cards/resources?resource_type=Fire", None, None).await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(fire["name"], "Fire Energy");
  assert_eq!(fire["resource_type"], "Fire");

  let uri = format!("/cards/resources/{}", fire["id"].as_str().unwrap());
  let (status, _, body) = send(&state, "GET", &uri, None, None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["set_name"], "Base");

  let (status, _, _) = send(&state, "POST", "/cards/resources?resource_type=Psychic", None, None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let (status, _, _) = send(&state, "DELETE", &uri, None, None).await;
  assert_eq!(status, StatusCode::OK);
  let (_, _, list) = send(&state, "GET", "/cards/resources", None, None).await;
  assert_eq!(list, json!([]));
}

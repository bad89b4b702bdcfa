//! Client for the creature-data provider (PokeAPI-compatible JSON).

use std::time::Duration;

use deckforge_core::card::{CardType, CreatureCard, CreatureRef, CreatureStats};
use serde::Deserialize;

use crate::{Result, fetch_json};

pub const DEFAULT_CREATURE_API_URL: &str = "https://pokeapi.co/api/v2";

/// Only the first few moves are kept on a card.
const MOVE_LIMIT: usize = 4;

#[derive(Clone)]
pub struct CreatureApiClient {
  http:     reqwest::Client,
  base_url: String,
}

impl CreatureApiClient {
  pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
    let http = reqwest::Client::builder().timeout(timeout).build()?;
    let base_url = base_url.into().trim_end_matches('/').to_owned();
    Ok(Self { http, base_url })
  }

  /// `GET /pokemon/{id_or_name}`. Returns `None` for unknown creatures and
  /// for keys that could never name one.
  pub async fn fetch_creature(&self, id_or_name: &str) -> Result<Option<CreatureCard>> {
    let Some(key) = normalise_key(id_or_name) else {
      return Ok(None);
    };
    let url = format!("{}/pokemon/{key}", self.base_url);

    let wire: Option<WireCreature> = fetch_json(self.http.get(&url)).await?;
    Ok(wire.map(WireCreature::into_card))
  }

  /// `GET /type/{type}`: every creature listing `card_type` among its types.
  pub async fn find_creatures_by_type(&self, card_type: CardType) -> Result<Vec<CreatureRef>> {
    let url = format!(
      "{}/type/{}",
      self.base_url,
      card_type.as_str().to_ascii_lowercase()
    );

    let wire: Option<WireTypeDetail> = fetch_json(self.http.get(&url)).await?;
    Ok(wire.map(WireTypeDetail::into_refs).unwrap_or_default())
  }
}

/// Lower-case and validate a lookup key; the provider only knows ASCII
/// alphanumerics and hyphens.
fn normalise_key(id_or_name: &str) -> Option<String> {
  let key = id_or_name.trim().to_ascii_lowercase();
  let valid = !key.is_empty()
    && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
  valid.then_some(key)
}

/// `https://pokeapi.co/api/v2/pokemon/25/` → `25`.
fn id_from_url(url: &str) -> Option<i64> {
  url.trim_end_matches('/').rsplit('/').next()?.parse().ok()
}

/// `"solar-beam"` → `"Solar-beam"`.
fn capitalise(s: &str) -> String {
  let mut chars = s.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
    None => String::new(),
  }
}

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct WireNamed {
  name: String,
  #[serde(default)]
  url:  String,
}

#[derive(Debug, Deserialize)]
struct WireCreature {
  id:        i64,
  name:      String,
  #[serde(default)]
  types:     Vec<WireTypeSlot>,
  #[serde(default)]
  moves:     Vec<WireMoveSlot>,
  #[serde(default)]
  abilities: Vec<WireAbilitySlot>,
  #[serde(default)]
  stats:     Vec<WireStat>,
  #[serde(default)]
  sprites:   WireSprites,
}

#[derive(Debug, Deserialize)]
struct WireTypeSlot {
  #[serde(rename = "type")]
  kind: WireNamed,
}

#[derive(Debug, Deserialize)]
struct WireMoveSlot {
  #[serde(rename = "move")]
  move_: WireNamed,
}

#[derive(Debug, Deserialize)]
struct WireAbilitySlot {
  ability: WireNamed,
}

#[derive(Debug, Deserialize)]
struct WireStat {
  base_stat: i64,
  stat:      WireNamed,
}

#[derive(Debug, Default, Deserialize)]
struct WireSprites {
  front_default: Option<String>,
  #[serde(default)]
  other:         Option<WireOtherSprites>,
}

#[derive(Debug, Deserialize)]
struct WireOtherSprites {
  #[serde(rename = "official-artwork")]
  official_artwork: Option<WireArtwork>,
}

#[derive(Debug, Deserialize)]
struct WireArtwork {
  front_default: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireTypeDetail {
  #[serde(default)]
  pokemon: Vec<WireTypeMember>,
}

#[derive(Debug, Deserialize)]
struct WireTypeMember {
  pokemon: WireNamed,
}

impl WireCreature {
  fn into_card(self) -> CreatureCard {
    let types = self
      .types
      .iter()
      .filter_map(|slot| match CardType::parse_label(&slot.kind.name) {
        Ok(t) => Some(t),
        Err(e) => {
          tracing::warn!(creature = %self.name, error = %e, "dropping type label");
          None
        }
      })
      .collect();

    let mut stats = CreatureStats::default();
    for s in &self.stats {
      let slot = match s.stat.name.as_str() {
        "hp" => &mut stats.hp,
        "attack" => &mut stats.attack,
        "defense" => &mut stats.defense,
        "special-attack" => &mut stats.special_attack,
        "special-defense" => &mut stats.special_defense,
        "speed" => &mut stats.speed,
        _ => continue,
      };
      *slot = s.base_stat;
    }

    let image_url = self
      .sprites
      .other
      .and_then(|o| o.official_artwork)
      .and_then(|a| a.front_default)
      .or(self.sprites.front_default);

    CreatureCard {
      id: self.id,
      name: self.name,
      types,
      image_url,
      moves: self
        .moves
        .iter()
        .take(MOVE_LIMIT)
        .map(|m| capitalise(&m.move_.name))
        .collect(),
      abilities: self
        .abilities
        .iter()
        .map(|a| capitalise(&a.ability.name))
        .collect(),
      stats,
    }
  }
}

impl WireTypeDetail {
  fn into_refs(self) -> Vec<CreatureRef> {
    self
      .pokemon
      .into_iter()
      .filter_map(|m| match id_from_url(&m.pokemon.url) {
        Some(id) => Some(CreatureRef { id, name: m.pokemon.name }),
        None => {
          tracing::debug!(url = %m.pokemon.url, "creature reference without id");
          None
        }
      })
      .collect()
  }
}

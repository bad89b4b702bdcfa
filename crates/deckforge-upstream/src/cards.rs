//! Client for the trading-card catalog (pokemontcg.io v2-compatible JSON).

use std::time::Duration;

use deckforge_core::card::{CardCategory, CardRecord, resource_type_from_name};
use serde::Deserialize;

use crate::{Result, fetch_json};

pub const DEFAULT_CARD_API_URL: &str = "https://api.pokemontcg.io/v2";

const PAGE_SIZE: &str = "250";

#[derive(Clone)]
pub struct CardApiClient {
  http:     reqwest::Client,
  base_url: String,
  api_key:  Option<String>,
}

impl CardApiClient {
  pub fn new(
    base_url: impl Into<String>,
    api_key: Option<String>,
    timeout: Duration,
  ) -> Result<Self> {
    let http = reqwest::Client::builder().timeout(timeout).build()?;
    let base_url = base_url.into().trim_end_matches('/').to_owned();
    let api_key = api_key.filter(|k| !k.trim().is_empty());
    Ok(Self { http, base_url, api_key })
  }

  async fn search(&self, query: String) -> Result<Vec<WireCard>> {
    let mut req = self
      .http
      .get(format!("{}/cards", self.base_url))
      .query(&[("q", query.as_str()), ("pageSize", PAGE_SIZE)]);
    if let Some(key) = &self.api_key {
      req = req.header("X-Api-Key", key);
    }

    let page: Option<WirePage> = fetch_json(req).await?;
    Ok(page.map(|p| p.data).unwrap_or_default())
  }

  /// Cards of `category`, optionally restricted to an exact (case-insensitive)
  /// name.
  pub async fn find_cards_by_category(
    &self,
    category: CardCategory,
    name: Option<&str>,
  ) -> Result<Vec<CardRecord>> {
    let cards = self.search(search_query(category, name)).await?;
    Ok(cards.into_iter().filter_map(WireCard::into_record).collect())
  }

  /// Image of the first creature card named `name` that has a large image.
  pub async fn display_image(&self, name: &str) -> Result<Option<String>> {
    let cards = self
      .search(search_query(CardCategory::Creature, Some(name)))
      .await?;

    Ok(cards.into_iter().find_map(|c| {
      (category_for_supertype(&c.supertype) == Some(CardCategory::Creature))
        .then_some(c.images?.large?)
    }))
  }
}

fn supertype_for(category: CardCategory) -> &'static str {
  match category {
    CardCategory::Creature => "Pokémon",
    CardCategory::Support => "Trainer",
    CardCategory::Resource => "Energy",
  }
}

fn category_for_supertype(supertype: &str) -> Option<CardCategory> {
  match supertype {
    "Pokémon" | "Pokemon" => Some(CardCategory::Creature),
    "Trainer" => Some(CardCategory::Support),
    "Energy" => Some(CardCategory::Resource),
    _ => None,
  }
}

/// Lucene-style query understood by the catalog. Quotes in names are dropped
/// so they cannot escape the phrase.
fn search_query(category: CardCategory, name: Option<&str>) -> String {
  let mut q = format!("supertype:\"{}\"", supertype_for(category));
  if let Some(name) = name.map(|n| n.replace('"', "")).filter(|n| !n.trim().is_empty()) {
    q.push_str(&format!(" name:\"{}\"", name.trim()));
  }
  q
}

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct WirePage {
  #[serde(default)]
  data: Vec<WireCard>,
}

#[derive(Debug, Deserialize)]
struct WireCard {
  id:        String,
  name:      String,
  #[serde(default)]
  supertype: String,
  #[serde(default)]
  subtypes:  Vec<String>,
  #[serde(default)]
  types:     Vec<String>,
  #[serde(default)]
  rules:     Vec<String>,
  images:    Option<WireImages>,
  set:       Option<WireSet>,
  rarity:    Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireImages {
  small: Option<String>,
  large: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireSet {
  name: String,
}

impl WireCard {
  /// `None` for supertypes outside the three deck categories.
  fn into_record(self) -> Option<CardRecord> {
    let category = category_for_supertype(&self.supertype)?;

    let subtype = match category {
      CardCategory::Creature => self.types.into_iter().next(),
      CardCategory::Support => self
        .rules
        .into_iter()
        .next()
        .or_else(|| self.subtypes.into_iter().next()),
      CardCategory::Resource => resource_type_from_name(&self.name),
    };
    let image_url = self.images.and_then(|i| i.large.or(i.small));

    Some(CardRecord {
      category,
      name: self.name,
      external_id: Some(self.id),
      image_url,
      set_name: self.set.map(|s| s.name),
      rarity: self.rarity,
      subtype,
    })
  }
}

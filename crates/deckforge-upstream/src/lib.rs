//! HTTP clients for the third-party services Deckforge reads card data from.
//!
//! [`CreatureApiClient`] talks to the creature-data provider,
//! [`CardApiClient`] to the trading-card catalog. [`Upstream`] bundles both
//! and implements the lookup traits from `deckforge_core::catalog`.

mod cards;
mod creatures;

pub mod error;

use std::time::Duration;

use deckforge_core::{
  card::{CardCategory, CardRecord, CardType, CreatureCard, CreatureRef},
  catalog::{CardCatalog, CreatureLookup, ImageProbe},
};
use serde::de::DeserializeOwned;

pub use cards::{CardApiClient, DEFAULT_CARD_API_URL};
pub use creatures::{CreatureApiClient, DEFAULT_CREATURE_API_URL};
pub use error::{Error, Result};

/// Send `req` and decode a JSON body. A 404 is reported as `Ok(None)`.
async fn fetch_json<T: DeserializeOwned>(req: reqwest::RequestBuilder) -> Result<Option<T>> {
  let resp = req.send().await?;
  let status = resp.status();

  if status == reqwest::StatusCode::NOT_FOUND {
    tracing::debug!(url = %resp.url(), "upstream has no such resource");
    return Ok(None);
  }
  if !status.is_success() {
    return Err(Error::Status {
      status: status.as_u16(),
      url:    resp.url().to_string(),
    });
  }

  let body = resp.bytes().await?;
  serde_json::from_slice(&body)
    .map(Some)
    .map_err(|e| Error::Decode(e.to_string()))
}

// ─── Bundle ──────────────────────────────────────────────────────────────────

/// Both providers behind one handle.
///
/// Cheap to clone; the inner [`reqwest::Client`]s are `Arc`-based.
#[derive(Clone)]
pub struct Upstream {
  pub creatures: CreatureApiClient,
  pub cards:     CardApiClient,
}

impl Upstream {
  pub fn new(
    creature_api_url: impl Into<String>,
    card_api_url: impl Into<String>,
    card_api_key: Option<String>,
    timeout: Duration,
  ) -> Result<Self> {
    Ok(Self {
      creatures: CreatureApiClient::new(creature_api_url, timeout)?,
      cards:     CardApiClient::new(card_api_url, card_api_key, timeout)?,
    })
  }
}

impl CreatureLookup for Upstream {
  type Error = Error;

  async fn fetch_creature(&self, id_or_name: &str) -> Result<Option<CreatureCard>> {
    self.creatures.fetch_creature(id_or_name).await
  }

  async fn find_creatures_by_type(&self, card_type: CardType) -> Result<Vec<CreatureRef>> {
    self.creatures.find_creatures_by_type(card_type).await
  }
}

impl CardCatalog for Upstream {
  type Error = Error;

  async fn find_cards_by_category(
    &self,
    category: CardCategory,
    name: Option<&str>,
  ) -> Result<Vec<CardRecord>> {
    self.cards.find_cards_by_category(category, name).await
  }
}

impl ImageProbe for Upstream {
  type Error = Error;

  async fn display_image(&self, name: &str) -> Result<Option<String>> {
    self.cards.display_image(name).await
  }
}

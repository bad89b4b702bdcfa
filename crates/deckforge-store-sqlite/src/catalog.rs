//! The local card cache doubles as a [`CardCatalog`]: the recommendation
//! engine can advertise cards that some user already added.

use deckforge_core::{
  card::{CardCategory, CardRecord, CreatureCard, ResourceCard, SupportCard},
  catalog::CardCatalog,
  store::DeckStore as _,
};

use crate::{Error, Result, SqliteStore};

impl CardCatalog for SqliteStore {
  type Error = Error;

  /// Case-insensitive substring match on the card name. Creatures without a
  /// display image are never listed.
  async fn find_cards_by_category(
    &self,
    category: CardCategory,
    name: Option<&str>,
  ) -> Result<Vec<CardRecord>> {
    let records: Vec<CardRecord> = match category {
      CardCategory::Creature => self
        .list_creatures()
        .await?
        .into_iter()
        .filter(|c| c.image_url.is_some())
        .map(creature_record)
        .collect(),
      CardCategory::Support => self
        .list_supports()
        .await?
        .into_iter()
        .map(support_record)
        .collect(),
      CardCategory::Resource => self
        .list_resources()
        .await?
        .into_iter()
        .map(resource_record)
        .collect(),
    };

    let Some(needle) = name.map(|n| n.trim().to_lowercase()) else {
      return Ok(records);
    };
    Ok(
      records
        .into_iter()
        .filter(|r| r.name.to_lowercase().contains(&needle))
        .collect(),
    )
  }
}

fn creature_record(c: CreatureCard) -> CardRecord {
  CardRecord {
    category:    CardCategory::Creature,
    external_id: Some(c.id.to_string()),
    subtype:     c.types.first().map(|t| t.as_str().to_owned()),
    name:        c.name,
    image_url:   c.image_url,
    set_name:    None,
    rarity:      None,
  }
}

fn support_record(s: SupportCard) -> CardRecord {
  CardRecord {
    category:    CardCategory::Support,
    name:        s.name,
    external_id: s.external_id,
    image_url:   s.image_url,
    set_name:    s.set_name,
    rarity:      s.rarity,
    subtype:     s.effect,
  }
}

fn resource_record(r: ResourceCard) -> CardRecord {
  CardRecord {
    category:    CardCategory::Resource,
    name:        r.name,
    external_id: r.external_id,
    image_url:   r.image_url,
    set_name:    r.set_name,
    rarity:      r.rarity,
    subtype:     r.resource_type,
  }
}

//! [`SqliteStore`], the SQLite implementation of [`DeckStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension as _, ToSql};
use uuid::Uuid;

use deckforge_core::{
  card::{CreatureCard, ResourceCard, SupportCard},
  deck::{Deck, DeckContents},
  store::{DeckStore, NewResource, NewSupport, ResourcePatch, SupportPatch},
  user::{Session, User},
};

use crate::{
  Error, Result,
  encode::{
    RawCard, RawCreature, RawDeck, RawSession, RawUser, encode_dt, encode_json,
    encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Table descriptors ───────────────────────────────────────────────────────

/// The `supports` and `resources` tables share a layout apart from their key
/// and subtype columns.
struct CardTable {
  table:       &'static str,
  alias:       &'static str,
  id_col:      &'static str,
  subtype_col: &'static str,
  columns:     &'static str,
}

const SUPPORTS: CardTable = CardTable {
  table:       "supports",
  alias:       "s",
  id_col:      "support_id",
  subtype_col: "effect",
  columns:     RawCard::SUPPORT_COLUMNS,
};

const RESOURCES: CardTable = CardTable {
  table:       "resources",
  alias:       "r",
  id_col:      "resource_id",
  subtype_col: "resource_type",
  columns:     RawCard::RESOURCE_COLUMNS,
};

impl CardTable {
  fn select(&self, filter: &str) -> String {
    format!(
      "SELECT {} FROM {} {} {filter}",
      self.columns, self.table, self.alias
    )
  }
}

/// A deck membership join table.
struct Membership {
  table:      &'static str,
  card_table: &'static str,
  card_col:   &'static str,
}

const DECK_CREATURES: Membership = Membership {
  table:      "deck_creatures",
  card_table: "creatures",
  card_col:   "creature_id",
};

const DECK_SUPPORTS: Membership = Membership {
  table:      "deck_supports",
  card_table: "supports",
  card_col:   "support_id",
};

const DECK_RESOURCES: Membership = Membership {
  table:      "deck_resources",
  card_table: "resources",
  card_col:   "resource_id",
};

enum AddOutcome {
  NoDeck,
  NoCard,
  Added(bool),
}

enum UpdateOutcome {
  Missing,
  NameTaken,
  Updated(RawCard),
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Deckforge store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Every cached creature, ordered by id.
  pub async fn list_creatures(&self) -> Result<Vec<CreatureCard>> {
    let raws: Vec<RawCreature> = self
      .conn
      .call(|conn| {
        let sql = format!(
          "SELECT {} FROM creatures c ORDER BY c.creature_id",
          RawCreature::COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], RawCreature::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCreature::into_creature).collect()
  }

  // ── Card tables ───────────────────────────────────────────────────────────

  async fn insert_card(&self, t: &'static CardTable, card: RawCard) -> Result<RawCard> {
    let name = card.name.trim().to_owned();
    if name.is_empty() {
      return Err(
        deckforge_core::Error::InvalidArgument("card name must not be blank".into())
          .into(),
      );
    }

    let insert = format!(
      "INSERT OR IGNORE INTO {} ({}, name, external_id, image_url, set_name, rarity, {})
       VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
      t.table, t.id_col, t.subtype_col
    );
    let select = t.select(&format!("WHERE {}.name = ?1", t.alias));

    let raw = self
      .conn
      .call(move |conn| {
        conn.execute(
          &insert,
          rusqlite::params![
            card.id,
            name,
            card.external_id,
            card.image_url,
            card.set_name,
            card.rarity,
            card.subtype,
          ],
        )?;
        // Either the row just written or the one that already owned the name.
        let raw = conn.query_row(&select, rusqlite::params![name], RawCard::from_row)?;
        Ok(raw)
      })
      .await?;

    Ok(raw)
  }

  async fn get_card(&self, t: &'static CardTable, id: Uuid) -> Result<Option<RawCard>> {
    let id_str = encode_uuid(id);
    let sql = t.select(&format!("WHERE {}.{} = ?1", t.alias, t.id_col));

    let raw = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], RawCard::from_row)
            .optional()?,
        )
      })
      .await?;

    Ok(raw)
  }

  async fn find_card_by_name(
    &self,
    t: &'static CardTable,
    name: &str,
  ) -> Result<Option<RawCard>> {
    let name = name.trim().to_owned();
    let sql = t.select(&format!("WHERE {}.name = ?1", t.alias));

    let raw = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![name], RawCard::from_row)
            .optional()?,
        )
      })
      .await?;

    Ok(raw)
  }

  async fn list_cards(&self, t: &'static CardTable) -> Result<Vec<RawCard>> {
    let sql = t.select(&format!("ORDER BY {}.name", t.alias));

    let raws = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], RawCard::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(raws)
  }

  async fn update_card(
    &self,
    t: &'static CardTable,
    id: Uuid,
    patch: RawCard,
  ) -> Result<Option<RawCard>> {
    let id_str = encode_uuid(id);
    let new_name = Some(patch.name.trim().to_owned()).filter(|n| !n.is_empty());
    let taken_name = new_name.clone().unwrap_or_default();

    let clash = format!(
      "SELECT 1 FROM {} WHERE name = ?1 AND {} <> ?2",
      t.table, t.id_col
    );
    let update = format!(
      "UPDATE {table} SET
         name        = COALESCE(?2, name),
         external_id = COALESCE(?3, external_id),
         image_url   = COALESCE(?4, image_url),
         set_name    = COALESCE(?5, set_name),
         rarity      = COALESCE(?6, rarity),
         {sub}       = COALESCE(?7, {sub})
       WHERE {id} = ?1",
      table = t.table,
      sub = t.subtype_col,
      id = t.id_col,
    );
    let select = t.select(&format!("WHERE {}.{} = ?1", t.alias, t.id_col));

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        if let Some(name) = &new_name {
          let clashes = tx
            .query_row(&clash, rusqlite::params![name, id_str], |_| Ok(true))
            .optional()?
            .unwrap_or(false);
          if clashes {
            return Ok(UpdateOutcome::NameTaken);
          }
        }

        let n = tx.execute(
          &update,
          rusqlite::params![
            id_str,
            new_name,
            patch.external_id,
            patch.image_url,
            patch.set_name,
            patch.rarity,
            patch.subtype,
          ],
        )?;
        if n == 0 {
          return Ok(UpdateOutcome::Missing);
        }

        let raw = tx.query_row(&select, rusqlite::params![id_str], RawCard::from_row)?;
        tx.commit()?;
        Ok(UpdateOutcome::Updated(raw))
      })
      .await?;

    match outcome {
      UpdateOutcome::Missing => Ok(None),
      UpdateOutcome::NameTaken => Err(Error::NameTaken(taken_name)),
      UpdateOutcome::Updated(raw) => Ok(Some(raw)),
    }
  }

  async fn delete_card(&self, t: &'static CardTable, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let sql = format!("DELETE FROM {} WHERE {} = ?1", t.table, t.id_col);

    // Memberships go with it via ON DELETE CASCADE.
    let n = self
      .conn
      .call(move |conn| Ok(conn.execute(&sql, rusqlite::params![id_str])?))
      .await?;

    Ok(n > 0)
  }

  // ── Memberships ───────────────────────────────────────────────────────────

  async fn add_member<K>(
    &self,
    m: &'static Membership,
    deck_id: Uuid,
    card_id: K,
    label: String,
  ) -> Result<bool>
  where
    K: ToSql + Send + 'static,
  {
    let deck_str = encode_uuid(deck_id);
    let card_exists = format!("SELECT 1 FROM {} WHERE {} = ?1", m.card_table, m.card_col);
    let insert = format!(
      "INSERT OR IGNORE INTO {} (deck_id, {}) VALUES (?1, ?2)",
      m.table, m.card_col
    );

    let outcome = self
      .conn
      .call(move |conn| {
        let has_deck = conn
          .query_row(
            "SELECT 1 FROM decks WHERE deck_id = ?1",
            rusqlite::params![deck_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if !has_deck {
          return Ok(AddOutcome::NoDeck);
        }

        let has_card = conn
          .query_row(&card_exists, rusqlite::params![card_id], |_| Ok(true))
          .optional()?
          .unwrap_or(false);
        if !has_card {
          return Ok(AddOutcome::NoCard);
        }

        let n = conn.execute(&insert, rusqlite::params![deck_str, card_id])?;
        Ok(AddOutcome::Added(n == 1))
      })
      .await?;

    match outcome {
      AddOutcome::NoDeck => Err(Error::DeckNotFound(deck_id)),
      AddOutcome::NoCard => Err(Error::CardNotFound(label)),
      AddOutcome::Added(added) => Ok(added),
    }
  }

  async fn remove_member<K>(
    &self,
    m: &'static Membership,
    deck_id: Uuid,
    card_id: K,
  ) -> Result<bool>
  where
    K: ToSql + Send + 'static,
  {
    let deck_str = encode_uuid(deck_id);
    let sql = format!("DELETE FROM {} WHERE deck_id = ?1 AND {} = ?2", m.table, m.card_col);

    let n = self
      .conn
      .call(move |conn| Ok(conn.execute(&sql, rusqlite::params![deck_str, card_id])?))
      .await?;

    Ok(n > 0)
  }
}

fn support_row(card: NewSupport) -> RawCard {
  RawCard {
    id:          encode_uuid(Uuid::new_v4()),
    name:        card.name,
    external_id: card.external_id,
    image_url:   card.image_url,
    set_name:    card.set_name,
    rarity:      card.rarity,
    subtype:     card.effect,
  }
}

fn resource_row(card: NewResource) -> RawCard {
  RawCard {
    id:          encode_uuid(Uuid::new_v4()),
    name:        card.name,
    external_id: card.external_id,
    image_url:   card.image_url,
    set_name:    card.set_name,
    rarity:      card.rarity,
    subtype:     card.resource_type,
  }
}

/// Patches reuse [`RawCard`]; a blank name means "keep the current one".
fn support_patch(p: SupportPatch) -> RawCard {
  RawCard {
    id:          String::new(),
    name:        p.name.unwrap_or_default(),
    external_id: p.external_id,
    image_url:   p.image_url,
    set_name:    p.set_name,
    rarity:      p.rarity,
    subtype:     p.effect,
  }
}

fn resource_patch(p: ResourcePatch) -> RawCard {
  RawCard {
    id:          String::new(),
    name:        p.name.unwrap_or_default(),
    external_id: p.external_id,
    image_url:   p.image_url,
    set_name:    p.set_name,
    rarity:      p.rarity,
    subtype:     p.resource_type,
  }
}

// ─── DeckStore impl ──────────────────────────────────────────────────────────

impl DeckStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn create_user(&self, email: String, password_hash: String) -> Result<User> {
    let user = User {
      user_id: Uuid::new_v4(),
      email: email.trim().to_lowercase(),
      password_hash,
      created_at: Utc::now(),
    };

    let id_str    = encode_uuid(user.user_id);
    let email_str = user.email.clone();
    let hash      = user.password_hash.clone();
    let at_str    = encode_dt(user.created_at);

    let inserted = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "INSERT OR IGNORE INTO users (user_id, email, password_hash, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, email_str, hash, at_str],
        )?;
        Ok(n == 1)
      })
      .await?;

    if !inserted {
      return Err(Error::EmailTaken(user.email));
    }
    tracing::debug!(user_id = %user.user_id, "registered user");
    Ok(user)
  }

  async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
    let email = email.trim().to_lowercase();

    let raw = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {} FROM users WHERE email = ?1", RawUser::COLUMNS);
        Ok(
          conn
            .query_row(&sql, rusqlite::params![email], RawUser::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
    let id_str = encode_uuid(user_id);

    let raw = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {} FROM users WHERE user_id = ?1", RawUser::COLUMNS);
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], RawUser::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  // ── Sessions ──────────────────────────────────────────────────────────────

  async fn create_session(
    &self,
    user_id: Uuid,
    token_hash: String,
    expires_at: DateTime<Utc>,
  ) -> Result<Session> {
    let session = Session {
      token_hash,
      user_id,
      created_at: Utc::now(),
      expires_at,
    };

    let hash_str    = session.token_hash.clone();
    let user_str    = encode_uuid(user_id);
    let created_str = encode_dt(session.created_at);
    let expires_str = encode_dt(expires_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO sessions (token_hash, user_id, created_at, expires_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![hash_str, user_str, created_str, expires_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(session)
  }

  async fn find_session(&self, token_hash: &str) -> Result<Option<Session>> {
    let hash = token_hash.to_owned();

    let raw: Option<RawSession> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT token_hash, user_id, created_at, expires_at
               FROM sessions WHERE token_hash = ?1",
              rusqlite::params![hash],
              |row| {
                Ok(RawSession {
                  token_hash: row.get(0)?,
                  user_id:    row.get(1)?,
                  created_at: row.get(2)?,
                  expires_at: row.get(3)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    let session = raw.map(RawSession::into_session).transpose()?;
    Ok(session.filter(|s| !s.is_expired(Utc::now())))
  }

  async fn delete_session(&self, token_hash: &str) -> Result<bool> {
    let hash = token_hash.to_owned();

    let n = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM sessions WHERE token_hash = ?1",
          rusqlite::params![hash],
        )?)
      })
      .await?;

    Ok(n > 0)
  }

  // ── Creatures ─────────────────────────────────────────────────────────────

  async fn upsert_creature(&self, creature: &CreatureCard) -> Result<()> {
    let id        = creature.id;
    let name      = creature.name.clone();
    let types     = encode_json(&creature.types)?;
    let image_url = creature.image_url.clone();
    let moves     = encode_json(&creature.moves)?;
    let abilities = encode_json(&creature.abilities)?;
    let stats     = encode_json(&creature.stats)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO creatures (
             creature_id, name, types, image_url, moves, abilities, stats
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
           ON CONFLICT(creature_id) DO UPDATE SET
             name      = excluded.name,
             types     = excluded.types,
             image_url = excluded.image_url,
             moves     = excluded.moves,
             abilities = excluded.abilities,
             stats     = excluded.stats",
          rusqlite::params![id, name, types, image_url, moves, abilities, stats],
        )?;
        Ok(())
      })
      .await?;

    Ok(())
  }

  async fn get_creature(&self, id: i64) -> Result<Option<CreatureCard>> {
    let raw = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {} FROM creatures c WHERE c.creature_id = ?1",
          RawCreature::COLUMNS
        );
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id], RawCreature::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCreature::into_creature).transpose()
  }

  // ── Supports ──────────────────────────────────────────────────────────────

  async fn insert_support(&self, card: NewSupport) -> Result<SupportCard> {
    self.insert_card(&SUPPORTS, support_row(card)).await?.into_support()
  }

  async fn get_support(&self, id: Uuid) -> Result<Option<SupportCard>> {
    self.get_card(&SUPPORTS, id).await?.map(RawCard::into_support).transpose()
  }

  async fn find_support_by_name(&self, name: &str) -> Result<Option<SupportCard>> {
    self
      .find_card_by_name(&SUPPORTS, name)
      .await?
      .map(RawCard::into_support)
      .transpose()
  }

  async fn list_supports(&self) -> Result<Vec<SupportCard>> {
    self
      .list_cards(&SUPPORTS)
      .await?
      .into_iter()
      .map(RawCard::into_support)
      .collect()
  }

  async fn update_support(
    &self,
    id: Uuid,
    patch: SupportPatch,
  ) -> Result<Option<SupportCard>> {
    self
      .update_card(&SUPPORTS, id, support_patch(patch))
      .await?
      .map(RawCard::into_support)
      .transpose()
  }

  async fn delete_support(&self, id: Uuid) -> Result<bool> {
    self.delete_card(&SUPPORTS, id).await
  }

  // ── Resources ─────────────────────────────────────────────────────────────

  async fn insert_resource(&self, card: NewResource) -> Result<ResourceCard> {
    self.insert_card(&RESOURCES, resource_row(card)).await?.into_resource()
  }

  async fn get_resource(&self, id: Uuid) -> Result<Option<ResourceCard>> {
    self.get_card(&RESOURCES, id).await?.map(RawCard::into_resource).transpose()
  }

  async fn find_resource_by_name(&self, name: &str) -> Result<Option<ResourceCard>> {
    self
      .find_card_by_name(&RESOURCES, name)
      .await?
      .map(RawCard::into_resource)
      .transpose()
  }

  async fn list_resources(&self) -> Result<Vec<ResourceCard>> {
    self
      .list_cards(&RESOURCES)
      .await?
      .into_iter()
      .map(RawCard::into_resource)
      .collect()
  }

  async fn update_resource(
    &self,
    id: Uuid,
    patch: ResourcePatch,
  ) -> Result<Option<ResourceCard>> {
    self
      .update_card(&RESOURCES, id, resource_patch(patch))
      .await?
      .map(RawCard::into_resource)
      .transpose()
  }

  async fn delete_resource(&self, id: Uuid) -> Result<bool> {
    self.delete_card(&RESOURCES, id).await
  }

  // ── Decks ─────────────────────────────────────────────────────────────────

  async fn get_deck(&self, user_id: Uuid) -> Result<Option<Deck>> {
    let user_str = encode_uuid(user_id);

    let raw: Option<RawDeck> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT deck_id, user_id, created_at FROM decks WHERE user_id = ?1",
              rusqlite::params![user_str],
              |row| {
                Ok(RawDeck {
                  deck_id:    row.get(0)?,
                  user_id:    row.get(1)?,
                  created_at: row.get(2)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawDeck::into_deck).transpose()
  }

  async fn get_or_create_deck(&self, user_id: Uuid) -> Result<Deck> {
    let deck_str = encode_uuid(Uuid::new_v4());
    let user_str = encode_uuid(user_id);
    let at_str   = encode_dt(Utc::now());

    let raw: RawDeck = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR IGNORE INTO decks (deck_id, user_id, created_at) VALUES (?1, ?2, ?3)",
          rusqlite::params![deck_str, user_str, at_str],
        )?;
        let raw = conn.query_row(
          "SELECT deck_id, user_id, created_at FROM decks WHERE user_id = ?1",
          rusqlite::params![user_str],
          |row| {
            Ok(RawDeck {
              deck_id:    row.get(0)?,
              user_id:    row.get(1)?,
              created_at: row.get(2)?,
            })
          },
        )?;
        Ok(raw)
      })
      .await?;

    raw.into_deck()
  }

  async fn add_creature(&self, deck_id: Uuid, creature_id: i64) -> Result<bool> {
    self
      .add_member(&DECK_CREATURES, deck_id, creature_id, format!("creature {creature_id}"))
      .await
  }

  async fn add_support(&self, deck_id: Uuid, support_id: Uuid) -> Result<bool> {
    self
      .add_member(
        &DECK_SUPPORTS,
        deck_id,
        encode_uuid(support_id),
        format!("support {support_id}"),
      )
      .await
  }

  async fn add_resource(&self, deck_id: Uuid, resource_id: Uuid) -> Result<bool> {
    self
      .add_member(
        &DECK_RESOURCES,
        deck_id,
        encode_uuid(resource_id),
        format!("resource {resource_id}"),
      )
      .await
  }

  async fn remove_creature(&self, deck_id: Uuid, creature_id: i64) -> Result<bool> {
    self.remove_member(&DECK_CREATURES, deck_id, creature_id).await
  }

  async fn remove_support(&self, deck_id: Uuid, support_id: Uuid) -> Result<bool> {
    self
      .remove_member(&DECK_SUPPORTS, deck_id, encode_uuid(support_id))
      .await
  }

  async fn remove_resource(&self, deck_id: Uuid, resource_id: Uuid) -> Result<bool> {
    self
      .remove_member(&DECK_RESOURCES, deck_id, encode_uuid(resource_id))
      .await
  }

  async fn deck_contents(&self, deck_id: Uuid) -> Result<DeckContents> {
    let deck_str = encode_uuid(deck_id);

    let (creatures, supports, resources) = self
      .conn
      .call(move |conn| {
        // Membership rowids preserve the order cards were added in.
        let creature_sql = format!(
          "SELECT {} FROM deck_creatures dc
           JOIN creatures c ON c.creature_id = dc.creature_id
           WHERE dc.deck_id = ?1 ORDER BY dc.rowid",
          RawCreature::COLUMNS
        );
        let support_sql = format!(
          "SELECT {} FROM deck_supports ds
           JOIN supports s ON s.support_id = ds.support_id
           WHERE ds.deck_id = ?1 ORDER BY ds.rowid",
          RawCard::SUPPORT_COLUMNS
        );
        let resource_sql = format!(
          "SELECT {} FROM deck_resources dr
           JOIN resources r ON r.resource_id = dr.resource_id
           WHERE dr.deck_id = ?1 ORDER BY dr.rowid",
          RawCard::RESOURCE_COLUMNS
        );

        let mut stmt = conn.prepare(&creature_sql)?;
        let creatures = stmt
          .query_map(rusqlite::params![deck_str], RawCreature::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = conn.prepare(&support_sql)?;
        let supports = stmt
          .query_map(rusqlite::params![deck_str], RawCard::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = conn.prepare(&resource_sql)?;
        let resources = stmt
          .query_map(rusqlite::params![deck_str], RawCard::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((creatures, supports, resources))
      })
      .await?;

    Ok(DeckContents {
      creatures: creatures
        .into_iter()
        .map(RawCreature::into_creature)
        .collect::<Result<_>>()?,
      supports:  supports
        .into_iter()
        .map(RawCard::into_support)
        .collect::<Result<_>>()?,
      resources: resources
        .into_iter()
        .map(RawCard::into_resource)
        .collect::<Result<_>>()?,
    })
  }
}

//! SQL schema for the Deckforge SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id       TEXT PRIMARY KEY,
    email         TEXT NOT NULL UNIQUE,   -- lower-cased
    password_hash TEXT NOT NULL,          -- argon2 PHC string
    created_at    TEXT NOT NULL
);

-- Only the SHA-256 digest of a bearer token is stored.
CREATE TABLE IF NOT EXISTS sessions (
    token_hash  TEXT PRIMARY KEY,
    user_id     TEXT NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    created_at  TEXT NOT NULL,
    expires_at  TEXT NOT NULL
);

-- Card records are shared between decks and survive membership removal.
CREATE TABLE IF NOT EXISTS creatures (
    creature_id INTEGER PRIMARY KEY,      -- upstream id
    name        TEXT NOT NULL,
    types       TEXT NOT NULL,            -- JSON array of type names
    image_url   TEXT,
    moves       TEXT NOT NULL DEFAULT '[]',
    abilities   TEXT NOT NULL DEFAULT '[]',
    stats       TEXT NOT NULL DEFAULT '{}'
);

CREATE TABLE IF NOT EXISTS supports (
    support_id  TEXT PRIMARY KEY,
    name        TEXT NOT NULL UNIQUE COLLATE NOCASE,
    external_id TEXT,
    image_url   TEXT,
    set_name    TEXT,
    rarity      TEXT,
    effect      TEXT
);

CREATE TABLE IF NOT EXISTS resources (
    resource_id   TEXT PRIMARY KEY,
    name          TEXT NOT NULL UNIQUE COLLATE NOCASE,
    external_id   TEXT,
    image_url     TEXT,
    set_name      TEXT,
    rarity        TEXT,
    resource_type TEXT
);

-- At most one deck per user.
CREATE TABLE IF NOT EXISTS decks (
    deck_id     TEXT PRIMARY KEY,
    user_id     TEXT NOT NULL UNIQUE REFERENCES users(user_id) ON DELETE CASCADE,
    created_at  TEXT NOT NULL
);

-- Membership; the composite keys make re-adding a card a no-op.
CREATE TABLE IF NOT EXISTS deck_creatures (
    deck_id     TEXT NOT NULL REFERENCES decks(deck_id) ON DELETE CASCADE,
    creature_id INTEGER NOT NULL REFERENCES creatures(creature_id) ON DELETE CASCADE,
    PRIMARY KEY (deck_id, creature_id)
);

CREATE TABLE IF NOT EXISTS deck_supports (
    deck_id     TEXT NOT NULL REFERENCES decks(deck_id) ON DELETE CASCADE,
    support_id  TEXT NOT NULL REFERENCES supports(support_id) ON DELETE CASCADE,
    PRIMARY KEY (deck_id, support_id)
);

CREATE TABLE IF NOT EXISTS deck_resources (
    deck_id     TEXT NOT NULL REFERENCES decks(deck_id) ON DELETE CASCADE,
    resource_id TEXT NOT NULL REFERENCES resources(resource_id) ON DELETE CASCADE,
    PRIMARY KEY (deck_id, resource_id)
);

CREATE INDEX IF NOT EXISTS sessions_user_idx ON sessions(user_id);

PRAGMA user_version = 1;
";

//! Core types and trait definitions for the Deckforge deck builder.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Everything that scores or annotates a deck without touching the network
//! lives here; the other crates depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod card;
pub mod catalog;
pub mod deck;
pub mod error;
pub mod matchup;
pub mod store;
pub mod synergy;
pub mod user;

pub use error::{Error, Result};

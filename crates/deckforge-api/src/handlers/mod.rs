//! Route handlers, one module per resource.

pub mod accounts;
pub mod cards;
pub mod creatures;
pub mod deck;
pub mod synergy;

//! The static type-effectiveness table and the strength/weakness resolver
//! built on top of it.
//!
//! The table is plain `'static` data: there is nothing to initialise and
//! nothing to mutate. Every type referenced in a matchup is itself a
//! [`CardType`], so the table is closed by construction.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::{Error, Result, card::CardType};

// ─── Table ───────────────────────────────────────────────────────────────────

/// What a single type is weak to and strong against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeMatchup {
  /// Types this type takes extra damage from.
  pub weak_to:        &'static [CardType],
  /// Types this type is effective against.
  pub strong_against: &'static [CardType],
}

/// Look up the matchup for `card_type`.
pub const fn lookup(card_type: CardType) -> TypeMatchup {
  use CardType::*;

  let (weak_to, strong_against): (&'static [CardType], &'static [CardType]) =
    match card_type {
      Normal => (&[Fighting], &[]),
      Fire => (&[Water, Rock, Ground], &[Grass, Bug, Ice, Steel]),
      Water => (&[Electric, Grass], &[Fire, Ground, Rock]),
      Electric => (&[Ground], &[Water, Flying]),
      Grass => (&[Fire, Ice, Poison, Flying, Bug], &[Water, Ground, Rock]),
      Ice => (&[Fire, Fighting, Rock, Steel], &[Grass, Ground, Flying, Dragon]),
      Fighting => (
        &[Flying, Psychic, Fairy],
        &[Normal, Ice, Rock, Dark, Steel],
      ),
      Poison => (&[Ground, Psychic], &[Grass, Fairy]),
      Ground => (
        &[Water, Grass, Ice],
        &[Fire, Electric, Poison, Rock, Steel],
      ),
      Flying => (&[Electric, Ice, Rock], &[Grass, Fighting, Bug]),
      Psychic => (&[Bug, Ghost, Dark], &[Fighting, Poison]),
      Bug => (&[Fire, Flying, Rock], &[Grass, Psychic, Dark]),
      Rock => (
        &[Water, Grass, Fighting, Ground, Steel],
        &[Fire, Ice, Flying, Bug],
      ),
      Ghost => (&[Ghost, Dark], &[Psychic, Ghost]),
      Dragon => (&[Ice, Dragon, Fairy], &[Dragon]),
      Dark => (&[Fighting, Bug, Fairy], &[Psychic, Ghost]),
      Steel => (&[Fire, Fighting, Ground], &[Ice, Rock, Fairy]),
      Fairy => (&[Poison, Steel], &[Fighting, Dragon, Dark]),
    };

  TypeMatchup { weak_to, strong_against }
}

/// Look up a matchup by label. Fails with [`Error::UnknownType`] for labels
/// outside the closed set, [`Error::InvalidArgument`] for malformed ones.
pub fn lookup_label(label: &str) -> Result<TypeMatchup> {
  CardType::parse_label(label).map(lookup)
}

// ─── Resolver ────────────────────────────────────────────────────────────────

/// Union of strengths and weaknesses over a set of types.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Coverage {
  pub strengths:  BTreeSet<CardType>,
  pub weaknesses: BTreeSet<CardType>,
}

/// Aggregate the strengths and weaknesses of `types`. Duplicates are allowed
/// and change nothing.
pub fn resolve<I>(types: I) -> Coverage
where
  I: IntoIterator<Item = CardType>,
{
  let mut coverage = Coverage::default();
  for t in types {
    let m = lookup(t);
    coverage.strengths.extend(m.strong_against.iter().copied());
    coverage.weaknesses.extend(m.weak_to.iter().copied());
  }
  coverage
}

/// [`resolve`] over raw labels, as they arrive from upstream data.
///
/// Unknown types are skipped; a malformed label fails the whole call.
pub fn resolve_labels<I, S>(labels: I) -> Result<Coverage>
where
  I: IntoIterator<Item = S>,
  S: AsRef<str>,
{
  let mut types = Vec::new();
  for label in labels {
    match CardType::parse_label(label.as_ref()) {
      Ok(t) => types.push(t),
      Err(Error::UnknownType(t)) => {
        tracing::debug!(label = %t, "skipping unknown card type");
      }
      Err(e) => return Err(e),
    }
  }
  Ok(resolve(types))
}

/// For each weakness, how many of the input types contribute it.
///
/// Four Water creatures yield `{Electric: 4, Grass: 4}`.
pub fn count_weaknesses<I>(types: I) -> BTreeMap<CardType, usize>
where
  I: IntoIterator<Item = CardType>,
{
  let mut counts = BTreeMap::new();
  for t in types {
    for w in lookup(t).weak_to {
      *counts.entry(*w).or_insert(0) += 1;
    }
  }
  counts
}

/// Types effective against `weakness`, in name order.
///
/// Reads the table through `strong_against`: a counter to a deck's weak spot
/// is a type that hits `weakness` hard, not one that is itself weak to it.
pub fn counters_for(weakness: CardType) -> Vec<CardType> {
  use strum::IntoEnumIterator as _;

  CardType::iter()
    .filter(|t| lookup(*t).strong_against.contains(&weakness))
    .collect()
}

//! The synergy score: a weighted count of a deck's cards, plus a normalised
//! percentage for display.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub const CREATURE_WEIGHT: i64 = 10;
pub const SUPPORT_WEIGHT: i64 = 5;
pub const RESOURCE_WEIGHT: i64 = 3;

/// Raw score of the fullest deck the game allows; `percent` saturates here.
pub const SCORE_CAP: i64 = 360;

/// Decks scoring below this get the "balance your deck" commentary.
pub const BALANCE_THRESHOLD: i64 = 50;

/// Card counts per category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckCounts {
  pub creatures: i64,
  pub supports:  i64,
  pub resources: i64,
}

impl DeckCounts {
  pub fn score(&self) -> Result<i64> {
    score(self.creatures, self.supports, self.resources)
  }
}

/// `10·creatures + 5·supports + 3·resources`.
pub fn score(creatures: i64, supports: i64, resources: i64) -> Result<i64> {
  for (what, n) in [
    ("creature", creatures),
    ("support", supports),
    ("resource", resources),
  ] {
    if n < 0 {
      return Err(Error::InvalidArgument(format!(
        "{what} count must be non-negative, got {n}"
      )));
    }
  }

  CREATURE_WEIGHT
    .checked_mul(creatures)
    .zip(SUPPORT_WEIGHT.checked_mul(supports))
    .zip(RESOURCE_WEIGHT.checked_mul(resources))
    .and_then(|((c, s), r)| c.checked_add(s)?.checked_add(r))
    .ok_or_else(|| {
      Error::InvalidArgument(format!(
        "score overflows for counts ({creatures}, {supports}, {resources})"
      ))
    })
}

/// `round(100 · min(raw, cap) / cap)`, rounding halves away from zero.
///
/// Always in `[0, 100]` for valid input.
pub fn percent(raw: i64, cap: i64) -> Result<i64> {
  if cap <= 0 {
    return Err(Error::InvalidArgument(format!(
      "score cap must be positive, got {cap}"
    )));
  }
  if raw < 0 {
    return Err(Error::InvalidArgument(format!(
      "raw score must be non-negative, got {raw}"
    )));
  }

  // Widened so `100 · cap` cannot overflow. Both operands are non-negative,
  // so adding half the divisor before dividing rounds halves away from zero.
  let (clamped, cap) = (i128::from(raw.min(cap)), i128::from(cap));
  let pct = (100 * clamped + cap / 2) / cap;
  Ok(pct as i64)
}

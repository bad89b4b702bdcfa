//! Deck recommendations.
//!
//! [`Advisor::recommend`] turns a deck's card lists into an ordered list of
//! suggestions: counter-picks for the deck's type weaknesses, support and
//! resource cards it does not own yet, and a comment on its synergy score.
//!
//! Upstream lookups are time-bounded and their failures only shorten the
//! list; recommending never fails.

mod cache;
mod engine;
mod selector;

pub use cache::ImageCache;
pub use engine::{Advisor, AdvisorConfig, messages};
pub use selector::{CandidateSelector, FixedSelector, RandomSelector, SeededSelector, pick};

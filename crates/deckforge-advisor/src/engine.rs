//! [`Advisor`]: the recommendation engine.

use std::{collections::HashSet, fmt::Display, future::Future, sync::Arc, time::Duration};

use deckforge_core::{
  Error,
  card::{CardCategory, CardRecord, CardType},
  catalog::{CardCatalog, CreatureLookup, ImageProbe},
  deck::{DeckContents, Recommendation, RecommendationCategory},
  matchup::{count_weaknesses, counters_for, resolve},
  synergy::BALANCE_THRESHOLD,
};
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::{
  cache::ImageCache,
  selector::{CandidateSelector, RandomSelector, pick},
};

// ─── Messages ────────────────────────────────────────────────────────────────

/// User-facing recommendation texts.
pub mod messages {
  pub const EMPTY_DECK: &str = "Your deck is empty! Start adding creatures!";
  pub const BALANCED: &str = "Great job! Your deck seems well-balanced!";

  pub fn counter(count: usize, weakness: impl std::fmt::Display, name: &str) -> String {
    format!("Your deck has {count} creatures weak to {weakness}. Consider adding {name}!")
  }

  pub fn creature(name: &str) -> String { format!("Consider adding {name}!") }

  pub fn support(name: &str) -> String {
    format!("Consider adding {name} to support your creatures.")
  }

  pub fn resource(name: &str) -> String {
    format!("Consider adding {name} to power up your creatures.")
  }

  pub fn low_score(score: i64) -> String {
    format!(
      "Your deck's synergy score is {score}, which is lower than the ideal target of \
       around 50. Consider adding more resource or support cards to improve your \
       deck's balance."
    )
  }

  pub fn good_score(score: i64) -> String {
    format!(
      "Your deck's synergy score is {score}. That's a great start! You might consider \
       fine-tuning your deck further for even better balance."
    )
  }
}

// ─── Configuration ───────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct AdvisorConfig {
  /// Upper bound on each individual upstream lookup.
  pub lookup_timeout:   Duration,
  /// How many candidates of a countering type are image-checked before the
  /// weakness is skipped.
  pub max_image_probes: usize,
  /// Upper bound on the whole counter-suggestion stage of one request.
  /// Weaknesses not reached in time get no suggestion.
  pub counter_budget:   Duration,
}

impl Default for AdvisorConfig {
  fn default() -> Self {
    Self {
      lookup_timeout:   Duration::from_secs(3),
      max_image_probes: 8,
      counter_budget:   Duration::from_secs(10),
    }
  }
}

// ─── Advisor ─────────────────────────────────────────────────────────────────

/// Computes recommendations for a deck.
///
/// Holds the image cache, so one advisor should be shared for the lifetime
/// of the process.
pub struct Advisor {
  config:   AdvisorConfig,
  selector: Arc<dyn CandidateSelector>,
  images:   ImageCache,
}

impl Advisor {
  pub fn new(config: AdvisorConfig, selector: impl CandidateSelector + 'static) -> Self {
    Self {
      config,
      selector: Arc::new(selector),
      images: ImageCache::new(),
    }
  }

  /// An advisor picking counter-suggestions at random.
  pub fn with_random_selector(config: AdvisorConfig) -> Self {
    Self::new(config, RandomSelector)
  }

  pub fn config(&self) -> &AdvisorConfig { &self.config }

  pub fn images(&self) -> &ImageCache { &self.images }

  /// Recommend improvements for `deck`.
  ///
  /// `known` lists the support and resource cards that may be advertised;
  /// `sources` supplies counter-suggestion candidates and image checks.
  /// Output order: counter-suggestions by weakness name, supports, resources,
  /// score commentary.
  pub async fn recommend<K, U>(
    &self,
    deck: &DeckContents,
    known: &K,
    sources: &U,
  ) -> Vec<Recommendation>
  where
    K: CardCatalog,
    U: CreatureLookup + ImageProbe,
  {
    if deck.is_empty() {
      return vec![Recommendation::info(messages::EMPTY_DECK)];
    }

    let mut out = Vec::new();
    self.counter_suggestions(deck, sources, &mut out).await;
    self
      .catalog_suggestions(deck, known, CardCategory::Support, &mut out)
      .await;
    self
      .catalog_suggestions(deck, known, CardCategory::Resource, &mut out)
      .await;
    out.push(score_commentary(deck));

    finish(out)
  }

  // ── Counter-suggestions ───────────────────────────────────────────────────

  async fn counter_suggestions<U>(
    &self,
    deck: &DeckContents,
    sources: &U,
    out: &mut Vec<Recommendation>,
  ) where
    U: CreatureLookup + ImageProbe,
  {
    let coverage = resolve(deck.creature_types());
    let counts = count_weaknesses(deck.creature_types());
    debug!(
      strengths = coverage.strengths.len(),
      weaknesses = coverage.weaknesses.len(),
      "resolved deck coverage"
    );

    let deadline = Instant::now() + self.config.counter_budget;
    for (i, weakness) in coverage.weaknesses.iter().enumerate() {
      if Instant::now() >= deadline {
        warn!(
          skipped = coverage.weaknesses.len() - i,
          budget = ?self.config.counter_budget,
          "counter-suggestion budget spent"
        );
        break;
      }
      let n = counts.get(weakness).copied().unwrap_or(0);
      if let Some(rec) = self.counter_for(*weakness, n, sources, deadline).await {
        out.push(rec);
      } else {
        debug!(%weakness, "no counter-suggestion found");
      }
    }
  }

  async fn counter_for<U>(
    &self,
    weakness: CardType,
    count: usize,
    sources: &U,
    deadline: Instant,
  ) -> Option<Recommendation>
  where
    U: CreatureLookup + ImageProbe,
  {
    let counters = counters_for(weakness);
    let counter_type = *pick(self.selector.as_ref(), &counters)?;

    let mut pool = self
      .bounded(
        format!("creatures of type {counter_type}"),
        Some(deadline),
        sources.find_creatures_by_type(counter_type),
      )
      .await?;

    // Draw without replacement until a candidate with an image turns up.
    for _ in 0..self.config.max_image_probes {
      if pool.is_empty() {
        break;
      }
      let idx = self.selector.choose(pool.len()) % pool.len();
      let candidate = pool.swap_remove(idx);
      if let Some(image_url) = self.image_for(&candidate.name, sources, deadline).await {
        return Some(Recommendation {
          category:      RecommendationCategory::Creature,
          message:       messages::counter(count, weakness, &candidate.name),
          name:          candidate.name,
          image_url:     Some(image_url),
          creature_id:   Some(candidate.id),
          resource_type: None,
        });
      }
    }
    None
  }

  async fn image_for<P: ImageProbe>(
    &self,
    name: &str,
    probe: &P,
    deadline: Instant,
  ) -> Option<String> {
    if let Some(hit) = self.images.get(name) {
      return Some(hit);
    }
    let image_url = self
      .bounded(format!("image for {name}"), Some(deadline), probe.display_image(name))
      .await??;
    self.images.confirm(name, image_url.clone());
    Some(image_url)
  }

  // ── Catalog suggestions ───────────────────────────────────────────────────

  async fn catalog_suggestions<K: CardCatalog>(
    &self,
    deck: &DeckContents,
    known: &K,
    category: CardCategory,
    out: &mut Vec<Recommendation>,
  ) {
    let Some(records) = self
      .bounded(
        format!("{category} catalog"),
        None,
        known.find_cards_by_category(category, None),
      )
      .await
    else {
      return;
    };

    let mut seen: HashSet<String> = match category {
      CardCategory::Creature => deck.creatures.iter().map(|c| c.name.to_lowercase()).collect(),
      CardCategory::Support => deck.supports.iter().map(|c| c.name.to_lowercase()).collect(),
      CardCategory::Resource => deck.resources.iter().map(|c| c.name.to_lowercase()).collect(),
    };

    out.extend(
      records
        .into_iter()
        .filter(|r| seen.insert(r.name.to_lowercase()))
        .map(|r| catalog_recommendation(category, r)),
    );
  }

  // ── Helpers ───────────────────────────────────────────────────────────────

  /// Run an upstream lookup under the configured timeout, cut short at
  /// `deadline` if one is given. Failures and timeouts are logged and become
  /// `None`.
  async fn bounded<T, E, F>(&self, what: String, deadline: Option<Instant>, lookup: F) -> Option<T>
  where
    F: Future<Output = Result<T, E>>,
    E: Display,
  {
    let started = Instant::now();
    let mut until = started + self.config.lookup_timeout;
    if let Some(deadline) = deadline {
      until = until.min(deadline);
    }

    let err = match tokio::time::timeout_at(until, lookup).await {
      Ok(Ok(value)) => return Some(value),
      Ok(Err(e)) => Error::UpstreamUnavailable(format!("{what}: {e}")),
      Err(_) => Error::UpstreamUnavailable(format!(
        "{what}: timed out after {:?}",
        until.saturating_duration_since(started)
      )),
    };
    warn!(error = %err, "skipping recommendation");
    None
  }
}

fn catalog_recommendation(category: CardCategory, r: CardRecord) -> Recommendation {
  let (category, message, resource_type) = match category {
    CardCategory::Resource => (
      RecommendationCategory::Resource,
      messages::resource(&r.name),
      r.subtype,
    ),
    CardCategory::Support => (RecommendationCategory::Support, messages::support(&r.name), None),
    CardCategory::Creature => (RecommendationCategory::Creature, messages::creature(&r.name), None),
  };
  Recommendation {
    category,
    name: r.name,
    image_url: r.image_url,
    message,
    creature_id: None,
    resource_type,
  }
}

fn score_commentary(deck: &DeckContents) -> Recommendation {
  // Counts come from list lengths and are never negative.
  let score = deck.counts().score().unwrap_or_default();
  if score < BALANCE_THRESHOLD {
    Recommendation::info(messages::low_score(score))
  } else {
    Recommendation::info(messages::good_score(score))
  }
}

/// Unreachable while score commentary is unconditional; kept so an empty
/// result can never reach a client.
fn finish(mut out: Vec<Recommendation>) -> Vec<Recommendation> {
  if out.is_empty() {
    out.push(Recommendation::info(messages::BALANCED));
  }
  out
}

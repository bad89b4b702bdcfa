//! Memo of creatures confirmed to have a display image.

use dashmap::DashMap;

/// Maps creature name → image reference for every name whose image has been
/// confirmed.
///
/// The cache only grows. Negative answers are never stored, so a name that
/// lacked an image once is simply probed again next time; a confirmed name is
/// never re-checked. Safe to share across concurrent requests.
#[derive(Debug, Default)]
pub struct ImageCache {
  confirmed: DashMap<String, String>,
}

impl ImageCache {
  pub fn new() -> Self { Self::default() }

  pub fn get(&self, name: &str) -> Option<String> {
    self.confirmed.get(name).map(|entry| entry.value().clone())
  }

  /// Record a confirmed image. An existing entry is kept as is.
  pub fn confirm(&self, name: &str, image_url: String) {
    self.confirmed.entry(name.to_owned()).or_insert(image_url);
  }

  pub fn len(&self) -> usize { self.confirmed.len() }

  pub fn is_empty(&self) -> bool { self.confirmed.is_empty() }
}

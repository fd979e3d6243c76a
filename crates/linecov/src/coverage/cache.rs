//! Prefill Cache
//!
//! Remembers which compiled bodies were already analyzed in the current
//! measurement window, keyed by body identity.

use super::body::BodyId;
use super::hash_table::HashTable;

/// Identity-keyed set of analyzed bodies
#[derive(Debug, Default)]
pub struct PrefillCache {
    seen: HashTable<()>,
}

impl PrefillCache {
    /// Create an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `body` for analysis
    ///
    /// Returns `false` if it was already claimed, in which case the caller
    /// skips it.
    pub fn try_begin(&mut self, body: BodyId) -> bool {
        let key = body.to_key();
        if self.seen.find(&key).is_some() {
            tracing::debug!(%body, "prefill cache hit");
            return false;
        }
        tracing::debug!(%body, "prefill cache miss");
        self.seen.insert(&key, ());
        true
    }

    /// Whether `body` was already analyzed
    #[must_use]
    pub fn contains(&self, body: BodyId) -> bool {
        self.seen.find(&body.to_key()).is_some()
    }

    /// Number of bodies analyzed
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether no body was analyzed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Forget every body
    pub fn clear(&mut self) {
        self.seen.clear();
    }
}

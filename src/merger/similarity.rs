//! Pairwise content similarity with a bounded score cache.
//!
//! Scores are Jaccard word overlap in [0, 1]: symmetric, reflexive, and
//! deterministic for identical inputs, which makes caching sound. Cache keys
//! are unordered pairs of SHA-256 content digests so `score(a, b)` and
//! `score(b, a)` share one entry.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};

use lru::LruCache;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::config::MergerConfig;
use crate::types::ResearchError;

/// Common low-signal words excluded from content fingerprints.
const STOPWORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "is",
    "are", "was", "were", "this", "that", "from", "as", "it", "its", "be", "been", "not", "what",
];

/// Extract lowercase keywords: alphanumeric runs longer than two characters,
/// stopwords removed.
pub(crate) fn keywords(content: &str) -> Vec<String> {
    content
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() > 2)
        .map(|w| w.to_lowercase())
        .filter(|w| !STOPWORDS.contains(&w.as_str()))
        .collect()
}

/// Order- and punctuation-insensitive content fingerprint.
///
/// Built from the first 20 keywords, sorted, so trivially reworded
/// duplicates collapse onto one digest.
pub(crate) fn content_fingerprint(content: &str) -> [u8; 32] {
    let mut keys = keywords(content);
    keys.truncate(20);
    keys.sort_unstable();

    let mut hasher = Sha256::new();
    for key in &keys {
        hasher.update(key.as_bytes());
        hasher.update(b" ");
    }
    hasher.finalize().into()
}

fn text_digest(content: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hasher.finalize().into()
}

type PairKey = ([u8; 32], [u8; 32]);

// ============= Cache Statistics =============

/// Counters for similarity-cache performance monitoring.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
    /// Number of entries currently cached.
    pub entry_count: usize,
}

impl CacheStats {
    /// Calculate hit rate as a percentage.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

// ============= Similarity Scorer =============

/// Computes bounded content similarity, memoized in an LRU cache.
///
/// Owned exclusively by the merge engine; interior locking makes the cache
/// safe for concurrent lookups, and a stale entry is never a correctness
/// issue because scores are deterministic.
pub struct SimilarityScorer {
    cache: Mutex<LruCache<PairKey, f32>>,
    enabled: bool,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl SimilarityScorer {
    /// Create a scorer from the merger configuration.
    pub fn new(config: &MergerConfig) -> Self {
        let capacity = NonZeroUsize::new(config.max_cache_size).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
            enabled: config.enable_similarity_cache,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Similarity between two contents in [0, 1].
    ///
    /// Symmetric and reflexive: `score(a, b) == score(b, a)` and
    /// `score(a, a) == 1.0`.
    pub fn score(&self, a: &str, b: &str) -> f32 {
        if a == b {
            return 1.0;
        }

        if !self.enabled {
            return jaccard(a, b);
        }

        let da = text_digest(a);
        let db = text_digest(b);
        let key = if da <= db { (da, db) } else { (db, da) };

        {
            let mut cache = self.cache.lock();
            if let Some(&cached) = cache.get(&key) {
                if (0.0..=1.0).contains(&cached) {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    return cached;
                }
                // A score outside [0, 1] means the cache no longer holds what
                // we put in it. Recover by dropping every entry and recomputing.
                let err = ResearchError::CacheCorruption(format!(
                    "cached score {cached} outside [0, 1]"
                ));
                warn!(error = %err, "clearing similarity cache");
                cache.clear();
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let score = jaccard(a, b);
        self.cache.lock().put(key, score);
        score
    }

    /// Drop all cached scores.
    pub fn clear(&self) {
        self.cache.lock().clear();
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entry_count: self.cache.lock().len(),
        }
    }

    /// Reset hit/miss counters and drop cached scores.
    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.clear();
    }

    #[cfg(test)]
    fn poison(&self, a: &str, b: &str, value: f32) {
        let da = text_digest(a);
        let db = text_digest(b);
        let key = if da <= db { (da, db) } else { (db, da) };
        self.cache.lock().put(key, value);
    }
}

/// Word-set Jaccard overlap. Empty content never matches anything.
fn jaccard(a: &str, b: &str) -> f32 {
    use std::collections::HashSet;

    let words_a: HashSet<String> = a.split_whitespace().map(|w| w.to_lowercase()).collect();
    let words_b: HashSet<String> = b.split_whitespace().map(|w| w.to_lowercase()).collect();

    if words_a.is_empty() || words_b.is_empty() {
        return 0.0;
    }

    let intersection = words_a.intersection(&words_b).count();
    let union = words_a.union(&words_b).count();
    if union == 0 {
        0.0
    } else {
        intersection as f32 / union as f32
    }
}

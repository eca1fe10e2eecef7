//! Response cache implementation.

use derive_getters::Getters;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;
use std::time::Instant;

/// Cached completion text.
#[derive(Debug, Clone, Getters)]
pub struct CacheEntry {
    text: String,
    created_at: Instant,
    hits: u64,
}

/// Cache key derived from a prompt and its output token limit.
///
/// The prompt is stored as a SHA-256 digest, so keys stay small no matter
/// how long the prompt is.
///
/// # Example
///
/// ```
/// use orbiter_cache::CacheKey;
///
/// let a = CacheKey::new("Plan a Hohmann transfer", 200);
/// let b = CacheKey::new("Plan a Hohmann transfer", 200);
/// let c = CacheKey::new("Plan a Hohmann transfer", 400);
/// assert_eq!(a, b);
/// assert_ne!(a, c);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Getters)]
pub struct CacheKey {
    prompt_digest: String,
    max_output_tokens: u32,
}

impl CacheKey {
    /// Build the key for a prompt and output token limit.
    pub fn new(prompt: &str, max_output_tokens: u32) -> Self {
        let digest = Sha256::digest(prompt.as_bytes());
        Self {
            prompt_digest: hex::encode(digest),
            max_output_tokens,
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // First 12 hex chars are plenty for logs
        let short = self.prompt_digest.get(..12).unwrap_or(&self.prompt_digest);
        write!(f, "{}:{}", short, self.max_output_tokens)
    }
}

/// Bounded least-recently-used cache of completion texts.
///
/// Entries never expire; once the capacity is reached the least recently
/// used entry is evicted. A capacity of zero disables caching entirely.
///
/// # Example
///
/// ```
/// use orbiter_cache::{CacheKey, ResponseCache};
///
/// let mut cache = ResponseCache::new(2);
/// let key = CacheKey::new("Summarize the Artemis II crew roles", 150);
///
/// cache.insert(key.clone(), "Commander, pilot and two mission specialists.".to_string());
/// assert_eq!(
///     cache.get(&key),
///     Some("Commander, pilot and two mission specialists.")
/// );
/// ```
#[derive(Debug, Clone)]
pub struct ResponseCache {
    capacity: usize,
    entries: HashMap<CacheKey, CacheEntry>,
    access_order: Vec<CacheKey>,
}

impl ResponseCache {
    /// Create a cache holding at most `capacity` responses.
    pub fn new(capacity: usize) -> Self {
        tracing::debug!(capacity, enabled = capacity > 0, "Creating new ResponseCache");
        Self {
            capacity,
            entries: HashMap::new(),
            access_order: Vec::new(),
        }
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether the cache stores anything at all.
    pub fn is_enabled(&self) -> bool {
        self.capacity > 0
    }

    /// Look up a cached response, marking it most recently used.
    #[tracing::instrument(skip(self, key), fields(key = %key, cache_size = self.entries.len()))]
    pub fn get(&mut self, key: &CacheKey) -> Option<&str> {
        if !self.is_enabled() {
            return None;
        }

        let entry = self.entries.get_mut(key)?;
        entry.hits += 1;
        tracing::debug!(hits = entry.hits, "Cache hit");

        self.touch(key);
        self.entries.get(key).map(|entry| entry.text.as_str())
    }

    /// Full entry for a key, without touching recency.
    pub fn peek(&self, key: &CacheKey) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    /// Insert a response, evicting the least recently used one if full.
    ///
    /// Replacing an existing key keeps its hit count.
    #[tracing::instrument(skip(self, key, text), fields(key = %key, cache_size = self.entries.len()))]
    pub fn insert(&mut self, key: CacheKey, text: String) {
        if !self.is_enabled() {
            tracing::debug!("Cache disabled, skipping insert");
            return;
        }

        if self.entries.len() >= self.capacity && !self.entries.contains_key(&key) {
            self.evict_lru();
        }

        self.touch(&key);
        let hits = self.entries.get(&key).map_or(0, |entry| entry.hits);
        self.entries.insert(
            key,
            CacheEntry {
                text,
                created_at: Instant::now(),
                hits,
            },
        );
        tracing::debug!("Inserted entry into cache");
    }

    /// Clear all cache entries.
    pub fn clear(&mut self) {
        let count = self.entries.len();
        self.entries.clear();
        self.access_order.clear();
        tracing::info!(cleared = count, "Cleared response cache");
    }

    /// Get number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Move a key to the most recently used position.
    fn touch(&mut self, key: &CacheKey) {
        if let Some(pos) = self.access_order.iter().position(|k| k == key) {
            self.access_order.remove(pos);
        }
        self.access_order.push(key.clone());
    }

    /// Evict least recently used entry.
    fn evict_lru(&mut self) {
        if self.access_order.is_empty() {
            return;
        }
        let key = self.access_order.remove(0);
        tracing::debug!(key = %key, "Evicting LRU entry");
        self.entries.remove(&key);
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(256)
    }
}

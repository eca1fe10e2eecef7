//! Tests for the response cache.

use orbiter_cache::{CacheKey, ResponseCache};

#[test]
fn test_hit_returns_stored_text_verbatim() {
    let mut cache = ResponseCache::new(4);
    let key = CacheKey::new("Describe the lunar gateway", 200);
    cache.insert(key.clone(), "  A small station in NRHO.\n".to_string());

    assert_eq!(cache.get(&key), Some("  A small station in NRHO.\n"));
    assert_eq!(cache.get(&key), Some("  A small station in NRHO.\n"));
    assert_eq!(*cache.peek(&key).expect("entry").hits(), 2);
}

#[test]
fn test_key_distinguishes_max_tokens() {
    let mut cache = ResponseCache::new(4);
    cache.insert(CacheKey::new("prompt", 100), "short".to_string());

    assert!(cache.get(&CacheKey::new("prompt", 200)).is_none());
    assert!(cache.get(&CacheKey::new("prompt ", 100)).is_none());
    assert_eq!(cache.get(&CacheKey::new("prompt", 100)), Some("short"));
}

#[test]
fn test_evicts_least_recently_used() {
    let mut cache = ResponseCache::new(2);
    let a = CacheKey::new("a", 10);
    let b = CacheKey::new("b", 10);
    let c = CacheKey::new("c", 10);

    cache.insert(a.clone(), "A".to_string());
    cache.insert(b.clone(), "B".to_string());
    // Touch `a` so `b` becomes least recently used
    assert!(cache.get(&a).is_some());
    cache.insert(c.clone(), "C".to_string());

    assert_eq!(cache.len(), 2);
    assert!(cache.get(&b).is_none());
    assert_eq!(cache.get(&a), Some("A"));
    assert_eq!(cache.get(&c), Some("C"));
}

#[test]
fn test_reinsert_does_not_evict() {
    let mut cache = ResponseCache::new(2);
    let a = CacheKey::new("a", 10);
    let b = CacheKey::new("b", 10);

    cache.insert(a.clone(), "A".to_string());
    cache.insert(b.clone(), "B".to_string());
    cache.insert(a.clone(), "A2".to_string());

    assert_eq!(cache.len(), 2);
    assert_eq!(cache.get(&a), Some("A2"));
    assert_eq!(cache.get(&b), Some("B"));
}

#[test]
fn test_zero_capacity_disables_cache() {
    let mut cache = ResponseCache::new(0);
    let key = CacheKey::new("anything", 10);
    cache.insert(key.clone(), "ignored".to_string());

    assert!(!cache.is_enabled());
    assert!(cache.is_empty());
    assert!(cache.get(&key).is_none());
}

#[test]
fn test_clear_empties_cache() {
    let mut cache = ResponseCache::default();
    cache.insert(CacheKey::new("a", 1), "A".to_string());
    cache.insert(CacheKey::new("b", 1), "B".to_string());

    cache.clear();
    assert!(cache.is_empty());
    assert_eq!(cache.capacity(), 256);
}

#[test]
fn test_key_display_is_short() {
    let key = CacheKey::new("Plan a Hohmann transfer", 200);
    let shown = key.to_string();
    assert!(shown.ends_with(":200"));
    assert_eq!(shown.len(), "000000000000:200".len());
    assert_eq!(key.prompt_digest().len(), 64);
}

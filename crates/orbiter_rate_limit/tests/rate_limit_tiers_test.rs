//! Tests for provider tiers and the quota limiter.

use orbiter_rate_limit::tiers::OpenAITier;
use orbiter_rate_limit::{QuotaLimiter, Tier, TierConfig};
use std::collections::HashMap;
use std::str::FromStr;

#[test]
fn test_openai_free_tier() {
    let tier = OpenAITier::Free;
    assert_eq!(tier.rpm(), Some(3));
    assert_eq!(tier.tpm(), Some(40_000));
    assert_eq!(tier.name(), "Free");
}

#[test]
fn test_openai_tier5() {
    let tier = OpenAITier::Tier5;
    assert_eq!(tier.rpm(), Some(10_000));
    assert_eq!(tier.tpm(), Some(100_000_000));
    assert_eq!(tier.name(), "Tier 5");
}

#[test]
fn test_openai_tier_parses_case_insensitively() {
    assert_eq!(OpenAITier::from_str("TIER2").ok(), Some(OpenAITier::Tier2));
    assert_eq!(OpenAITier::from_str("free").ok(), Some(OpenAITier::Free));
    assert!(OpenAITier::from_str("gold").is_err());
}

#[test]
fn test_boxed_tier_delegates() {
    let tier: Box<dyn Tier> = Box::new(OpenAITier::Tier1);
    assert_eq!(tier.rpm(), Some(500));
    assert_eq!(tier.name(), "Tier 1");
}

#[test]
fn test_quota_limiter_blocks_after_rpm() {
    let limiter = QuotaLimiter::new(OpenAITier::Free);
    assert_eq!(limiter.tier_name(), "Free");

    // Free tier allows a burst of 3 requests per minute
    assert!(limiter.try_acquire(10));
    assert!(limiter.try_acquire(10));
    assert!(limiter.try_acquire(10));
    assert!(!limiter.try_acquire(10));
}

#[test]
fn test_quota_limiter_blocks_on_tokens() {
    let tier = TierConfig {
        name: "Tokens Only".to_string(),
        rpm: None,
        tpm: Some(1_000),
        models: HashMap::new(),
    };
    let limiter = QuotaLimiter::new(tier);

    assert!(limiter.try_acquire(800));
    assert!(!limiter.try_acquire(800));
}

#[test]
fn test_unlimited_tier_never_blocks() {
    let tier = TierConfig {
        name: "Unlimited".to_string(),
        rpm: None,
        tpm: None,
        models: HashMap::new(),
    };
    let limiter = QuotaLimiter::new(tier);
    for _ in 0..1_000 {
        assert!(limiter.try_acquire(1_000_000));
    }
}

#[tokio::test]
async fn test_acquire_within_quota_returns() {
    let limiter = QuotaLimiter::new(OpenAITier::Tier1);
    limiter.acquire(1_000).await;
    limiter.acquire(1_000).await;
}

//! Built-in provider tiers.

use crate::Tier;

/// OpenAI API usage tiers.
///
/// Based on [OpenAI usage tiers](https://platform.openai.com/docs/guides/rate-limits).
/// Tiers are assigned by cumulative spend and account age.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter, strum::EnumString, strum::Display)]
#[strum(ascii_case_insensitive)]
pub enum OpenAITier {
    /// Free tier: 3 RPM, 40K TPM
    #[strum(serialize = "free")]
    Free,
    /// Tier 1: $5+ paid (500 RPM, 200K TPM)
    #[strum(serialize = "tier1")]
    Tier1,
    /// Tier 2: $50+ paid (5000 RPM, 2M TPM)
    #[strum(serialize = "tier2")]
    Tier2,
    /// Tier 3: $100+ paid (10000 RPM, 10M TPM)
    #[strum(serialize = "tier3")]
    Tier3,
    /// Tier 4: $250+ paid (10000 RPM, 30M TPM)
    #[strum(serialize = "tier4")]
    Tier4,
    /// Tier 5: $1000+ paid (10000 RPM, 100M TPM)
    #[strum(serialize = "tier5")]
    Tier5,
}

impl Tier for OpenAITier {
    fn rpm(&self) -> Option<u32> {
        match self {
            OpenAITier::Free => Some(3),
            OpenAITier::Tier1 => Some(500),
            OpenAITier::Tier2 => Some(5000),
            OpenAITier::Tier3 | OpenAITier::Tier4 | OpenAITier::Tier5 => Some(10000),
        }
    }

    fn tpm(&self) -> Option<u64> {
        match self {
            OpenAITier::Free => Some(40_000),
            OpenAITier::Tier1 => Some(200_000),
            OpenAITier::Tier2 => Some(2_000_000),
            OpenAITier::Tier3 => Some(10_000_000),
            OpenAITier::Tier4 => Some(30_000_000),
            OpenAITier::Tier5 => Some(100_000_000),
        }
    }

    fn name(&self) -> &str {
        match self {
            OpenAITier::Free => "Free",
            OpenAITier::Tier1 => "Tier 1",
            OpenAITier::Tier2 => "Tier 2",
            OpenAITier::Tier3 => "Tier 3",
            OpenAITier::Tier4 => "Tier 4",
            OpenAITier::Tier5 => "Tier 5",
        }
    }
}

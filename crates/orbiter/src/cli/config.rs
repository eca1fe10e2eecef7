//! Configuration resolution and the `config` command.

use orbiter::{ClientDefaults, ClientSettings, OrbiterConfig, OrbiterResult, TierConfig};
use std::path::Path;
use tracing::debug;

/// Provider whose tiers the CLI enforces.
pub const PROVIDER: &str = "openai";

/// Load an explicit config file, or the layered defaults.
pub fn load_config(path: Option<&Path>) -> OrbiterResult<OrbiterConfig> {
    match path {
        Some(path) => OrbiterConfig::from_file(path),
        None => OrbiterConfig::load(),
    }
}

/// Model precedence: explicit flag, then the settings (`OPENAI_MODEL`),
/// then the config file.
pub fn resolve_model(
    flag: Option<String>,
    settings: Option<&ClientSettings>,
    defaults: &ClientDefaults,
) -> String {
    flag.filter(|model| !model.trim().is_empty())
        .or_else(|| settings.and_then(|s| s.model().clone()))
        .unwrap_or_else(|| defaults.model.clone())
}

/// Tier named in `[client] tier`, with overrides for the client model applied.
///
/// An explicitly named tier that does not exist is an error; no tier at
/// all means no quota enforcement.
pub fn resolve_tier(config: &OrbiterConfig) -> OrbiterResult<Option<TierConfig>> {
    let Some(name) = config.client.tier.as_deref() else {
        return Ok(None);
    };
    match config.client_tier(PROVIDER) {
        Some(tier) => {
            debug!(tier = %tier.name, model = %config.client.model, "Resolved provider tier");
            Ok(Some(tier))
        }
        None => Err(orbiter::ConfigError::new(format!(
            "Unknown {} tier '{}'",
            PROVIDER, name
        ))
        .into()),
    }
}

/// Print the effective configuration with the credential redacted.
pub fn show_config(path: Option<&Path>) -> OrbiterResult<()> {
    let mut config = load_config(path)?;
    let settings = ClientSettings::from_env();
    config.client.model = resolve_model(None, settings.as_ref().ok(), &config.client);

    let rendered = serde_json::to_string_pretty(&config).map_err(|e| {
        orbiter::ConfigError::new(format!("Failed to render configuration: {}", e))
    })?;
    println!("{}", rendered);

    match settings {
        Ok(settings) => println!("{:?}", settings),
        Err(e) => println!("credentials: {}", e.message),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_flag_beats_settings_and_file() {
        let settings = ClientSettings::new("sk-test").unwrap().with_model("gpt-4o-mini");
        let defaults = ClientDefaults::default();

        assert_eq!(
            resolve_model(Some("o1".to_string()), Some(&settings), &defaults),
            "o1"
        );
        assert_eq!(resolve_model(None, Some(&settings), &defaults), "gpt-4o-mini");
        assert_eq!(resolve_model(None, None, &defaults), defaults.model);
    }

    #[test]
    fn client_tier_applies_model_overrides() {
        let mut config = OrbiterConfig::load().unwrap();
        config.client.model = "gpt-4o-mini".to_string();

        config.client.tier = None;
        assert!(resolve_tier(&config).unwrap().is_none());

        config.client.tier = Some("tier1".to_string());
        let tier = resolve_tier(&config).unwrap().unwrap();
        assert_eq!(tier.tpm, Some(2_000_000));

        config.client.tier = Some("platinum".to_string());
        assert!(resolve_tier(&config).is_err());
    }
}

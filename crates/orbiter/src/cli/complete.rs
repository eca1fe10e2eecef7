//! The `complete` command.

use crate::cli::CompleteArgs;
use crate::cli::config::{load_config, resolve_model, resolve_tier};
use orbiter::{
    ClientError, ClientErrorKind, ClientSettings, OrbiterError, OrbiterErrorKind, OrbiterResult,
    ResilientClient,
};
use std::path::Path;
use tokio::io::AsyncReadExt;
use tracing::info;

async fn read_prompt(prompt: String) -> OrbiterResult<String> {
    if prompt != "-" {
        return Ok(prompt);
    }
    let mut buffer = String::new();
    tokio::io::stdin()
        .read_to_string(&mut buffer)
        .await
        .map_err(|e| {
            ClientError::new(ClientErrorKind::InvalidInput(format!(
                "failed to read prompt from stdin: {}",
                e
            )))
        })?;
    Ok(buffer)
}

/// Complete one prompt and print the response to stdout.
pub async fn handle_complete(args: CompleteArgs, config_path: Option<&Path>) -> OrbiterResult<()> {
    let mut config = load_config(config_path)?;
    let settings = ClientSettings::from_env()?;

    let client_config = &mut config.client;
    client_config.model = resolve_model(args.model, Some(&settings), client_config);
    if let Some(budget) = args.budget {
        client_config.session_token_budget = Some(budget);
    }
    if let Some(system) = args.system {
        client_config.system_prompt = Some(system);
    }
    if let Some(tier) = args.tier {
        client_config.tier = Some(tier);
    }
    let request_config = config.request_config()?;
    let tier = resolve_tier(&config)?;

    let settings = settings.with_model(request_config.model().clone());
    let mut client = ResilientClient::from_settings(request_config, settings);
    if let Some(tier) = tier {
        client = client.with_tier(tier);
    }

    let prompt = read_prompt(args.prompt).await?;
    let text = client.complete(&prompt, args.max_tokens).await?;
    println!("{}", text);

    info!(
        tokens_consumed = client.tokens_consumed(),
        remaining = ?client.remaining_budget(),
        "Session summary"
    );
    Ok(())
}

/// Message shown to the user for a failed command.
pub fn user_message(err: &OrbiterError) -> String {
    match err.kind() {
        OrbiterErrorKind::Client(client_err) => match client_err.kind() {
            ClientErrorKind::InvalidInput(reason) => format!("Invalid request: {}", reason),
            ClientErrorKind::BudgetExceeded {
                remaining,
                requested,
            } => format!(
                "Session token budget exhausted: about {} tokens needed, {} remaining.",
                requested, remaining
            ),
            ClientErrorKind::RetriesExhausted { attempts, .. } => format!(
                "The service is temporarily unavailable (gave up after {} attempts). Please try again later.",
                attempts
            ),
            ClientErrorKind::Other(message) => format!("Request failed: {}", message),
        },
        OrbiterErrorKind::Config(config_err) => {
            format!("Configuration error: {}", config_err.message)
        }
        _ => err.to_string(),
    }
}

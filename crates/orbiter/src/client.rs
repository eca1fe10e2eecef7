//! The resilient completion client.

use orbiter_cache::{CacheKey, ResponseCache};
use orbiter_core::{
    ClientSettings, RawCompletion, RequestConfig, TokenBudget, TransportRequest, estimate_tokens,
};
use orbiter_error::{ClientError, ClientErrorKind, ClientResult, ConfigError, TransportError};
use orbiter_interface::{CompletionTransport, OutcomeClass};
use orbiter_models::OpenAiTransport;
use orbiter_rate_limit::{QuotaLimiter, RequestPacer, RetryFailure, Tier, retry_with_backoff};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Mutable per-session bookkeeping.
#[derive(Debug)]
struct ClientState {
    last_request_at: Option<Instant>,
    budget: TokenBudget,
    cache: ResponseCache,
    outcomes: HashMap<OutcomeClass, u64>,
}

/// Dispatches and outcomes of one logical call, committed when it ends.
#[derive(Debug, Default)]
struct AttemptLog {
    last_dispatch: Option<Instant>,
    outcomes: Vec<OutcomeClass>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Completion client with pacing, retries, a token budget and a response cache.
///
/// Each instance owns its session state; instances share nothing. Calls on
/// one instance are serialized, so dispatches form a total order and the
/// minimum interval holds between consecutive calls.
///
/// State is committed only when a logical call ends. Dropping a pending
/// [`complete`](Self::complete) future (for example on a timeout) leaves
/// the dispatch timestamp, token count and cache exactly as they were.
///
/// # Example
///
/// ```rust,ignore
/// use orbiter::{RequestConfig, ResilientClient};
///
/// let config = RequestConfig::builder().session_token_budget(20_000u64).build()?;
/// let client = ResilientClient::from_env(config)?;
///
/// let plan = client.complete("Outline a Mars sample return", 800).await?;
/// println!("{plan}");
/// println!("remaining: {:?}", client.remaining_budget());
/// ```
pub struct ResilientClient<T> {
    config: RequestConfig,
    transport: T,
    pacer: RequestPacer,
    quota: Option<QuotaLimiter>,
    session: tokio::sync::Mutex<()>,
    state: Mutex<ClientState>,
}

impl<T: CompletionTransport> ResilientClient<T> {
    /// Create a client over any transport.
    #[instrument(skip_all, fields(provider = transport.provider_name(), model = %config.model()))]
    pub fn new(config: RequestConfig, transport: T) -> Self {
        debug!(
            min_request_interval = ?config.min_request_interval(),
            max_retries = config.max_retries(),
            budget = ?config.session_token_budget(),
            cache_capacity = config.cache_capacity(),
            "Creating resilient client"
        );
        let state = ClientState {
            last_request_at: None,
            budget: TokenBudget::new(*config.session_token_budget()),
            cache: ResponseCache::new(*config.cache_capacity()),
            outcomes: HashMap::new(),
        };
        Self {
            pacer: RequestPacer::new(*config.min_request_interval()),
            config,
            transport,
            quota: None,
            session: tokio::sync::Mutex::new(()),
            state: Mutex::new(state),
        }
    }

    /// Enforce a provider tier's request and token quotas.
    pub fn with_tier(self, tier: impl Tier) -> Self {
        self.with_quota(QuotaLimiter::new(tier))
    }

    /// Share a quota limiter with other clients drawing on the same account.
    pub fn with_quota(mut self, quota: QuotaLimiter) -> Self {
        debug!(tier = quota.tier_name(), "Enforcing provider quota");
        self.quota = Some(quota);
        self
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &RequestConfig {
        &self.config
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn state(&self) -> MutexGuard<'_, ClientState> {
        lock(&self.state)
    }

    /// Tokens left in the session budget, or `None` when unlimited.
    pub fn remaining_budget(&self) -> Option<u64> {
        self.state().budget.remaining()
    }

    /// Tokens recorded this session.
    pub fn tokens_consumed(&self) -> u64 {
        self.state().budget.consumed()
    }

    /// When the most recent request was dispatched.
    pub fn last_request_at(&self) -> Option<Instant> {
        self.state().last_request_at
    }

    /// Number of cached responses.
    pub fn cached_responses(&self) -> usize {
        self.state().cache.len()
    }

    /// How many attempts this session ended in the given class.
    pub fn outcome_count(&self, class: OutcomeClass) -> u64 {
        self.state().outcomes.get(&class).copied().unwrap_or(0)
    }

    /// Start a fresh session: zero the token count, clear the cache,
    /// forget the last dispatch and the outcome counts.
    pub fn reset_session(&self) {
        let mut state = self.state();
        state.budget.reset();
        state.cache.clear();
        state.last_request_at = None;
        state.outcomes.clear();
        info!("Session reset");
    }

    fn build_request(&self, prompt: &str, max_output_tokens: u32) -> ClientResult<TransportRequest> {
        let mut builder = TransportRequest::builder();
        builder
            .model(self.config.model().clone())
            .prompt(prompt)
            .max_output_tokens(max_output_tokens)
            .timeout(*self.config.timeout());
        if let Some(system_prompt) = self.config.system_prompt() {
            builder.system_prompt(system_prompt.clone());
        }
        if let Some(temperature) = self.config.temperature() {
            builder.temperature(*temperature);
        }
        builder.build().map_err(|e| {
            ClientError::new(ClientErrorKind::Other(format!(
                "Failed to build request: {}",
                e
            )))
        })
    }

    /// Complete `prompt`, generating at most `max_output_tokens` tokens.
    ///
    /// Identical `(prompt, max_output_tokens)` pairs are answered from the
    /// cache without pacing, budget checks or network calls. Otherwise the
    /// call is checked against the session budget, paced behind the
    /// previous dispatch and sent, retrying rate limits, timeouts and
    /// connection failures with exponential backoff.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for a blank prompt or a zero token limit
    /// - `BudgetExceeded` when the estimate does not fit the remaining budget
    /// - `RetriesExhausted` when every allowed attempt failed transiently
    /// - `Other` for provider failures that are never retried
    ///
    /// # Cancellation
    ///
    /// Dropping the returned future discards everything the call staged,
    /// including the dispatch time of an attempt already sent. The next
    /// call is then paced against the previous committed dispatch, so it
    /// may follow the abandoned attempt sooner than the minimum interval.
    #[instrument(
        skip(self, prompt),
        fields(
            provider = self.transport.provider_name(),
            prompt_chars = prompt.chars().count()
        )
    )]
    pub async fn complete(&self, prompt: &str, max_output_tokens: u32) -> ClientResult<String> {
        if prompt.trim().is_empty() {
            return Err(ClientError::new(ClientErrorKind::InvalidInput(
                "prompt must not be empty".to_string(),
            )));
        }
        if max_output_tokens == 0 {
            return Err(ClientError::new(ClientErrorKind::InvalidInput(
                "max_output_tokens must be positive".to_string(),
            )));
        }

        let request = self.build_request(prompt, max_output_tokens)?;
        let key = CacheKey::new(prompt, max_output_tokens);
        let estimate = estimate_tokens(self.config.system_prompt().as_deref(), prompt, max_output_tokens);

        let _session = self.session.lock().await;

        let last_request_at = {
            let mut state = self.state();
            if let Some(text) = state.cache.get(&key) {
                debug!("Answered from cache");
                return Ok(text.to_string());
            }
            if let Err(remaining) = state.budget.check(estimate) {
                warn!(estimate, remaining, "Session token budget exceeded");
                return Err(ClientError::new(ClientErrorKind::BudgetExceeded {
                    remaining,
                    requested: estimate,
                }));
            }
            state.last_request_at
        };

        if let Some(quota) = &self.quota {
            quota.acquire(estimate).await;
        }
        let first_dispatch = self.pacer.wait_turn(last_request_at).await;

        info!(estimate, "Dispatching completion request");
        let log = Mutex::new(AttemptLog::default());
        let (request, log_ref) = (&request, &log);
        let result = retry_with_backoff(
            self.config.backoff(),
            *self.config.max_retries(),
            move |attempt| async move {
                let dispatched_at = if attempt == 0 {
                    first_dispatch
                } else {
                    Instant::now()
                };
                lock(log_ref).last_dispatch = Some(dispatched_at);
                let result = self.transport.send(request).await;
                let class = OutcomeClass::of(&result);
                debug!(attempt, outcome = %class, "Attempt finished");
                lock(log_ref).outcomes.push(class);
                result
            },
        )
        .await;

        let log = log.into_inner().unwrap_or_else(PoisonError::into_inner);
        self.commit(key, estimate, log, result)
    }

    /// Fold a finished call into session state and map its result.
    fn commit(
        &self,
        key: CacheKey,
        estimate: u64,
        log: AttemptLog,
        result: Result<RawCompletion, RetryFailure<TransportError>>,
    ) -> ClientResult<String> {
        let mut state = self.state();
        if let Some(dispatched_at) = log.last_dispatch {
            state.last_request_at = Some(dispatched_at);
        }
        for class in log.outcomes {
            *state.outcomes.entry(class).or_insert(0) += 1;
        }

        match result {
            Ok(completion) => {
                let reported = completion.total_tokens();
                let tokens = reported.unwrap_or(estimate);
                state.budget.record(tokens);
                let text = completion.into_text();
                state.cache.insert(key, text.clone());
                info!(
                    tokens,
                    estimated = reported.is_none(),
                    consumed = state.budget.consumed(),
                    "Completion succeeded"
                );
                Ok(text)
            }
            Err(RetryFailure::Exhausted { attempts, last }) => {
                warn!(attempts, error = %last, "Completion failed after retries");
                Err(ClientError::new(ClientErrorKind::RetriesExhausted {
                    attempts,
                    last: last.kind,
                }))
            }
            Err(RetryFailure::Permanent { attempts, error }) => {
                warn!(attempts, error = %error, "Completion failed");
                Err(ClientError::new(ClientErrorKind::Other(error.kind.to_string())))
            }
        }
    }
}

impl ResilientClient<OpenAiTransport> {
    /// Create a client for an OpenAI-compatible endpoint.
    ///
    /// A model set in `settings` (for example from `OPENAI_MODEL`) replaces
    /// the model in `config`.
    pub fn from_settings(config: RequestConfig, settings: ClientSettings) -> Self {
        let config = match settings.model() {
            Some(model) => config.with_model(model.clone()),
            None => config,
        };
        Self::new(config, OpenAiTransport::new(settings))
    }

    /// Create a client reading credentials from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `OPENAI_API_KEY` is missing or blank.
    pub fn from_env(config: RequestConfig) -> Result<Self, ConfigError> {
        Ok(Self::from_settings(config, ClientSettings::from_env()?))
    }
}

impl<T: CompletionTransport> std::fmt::Debug for ResilientClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state();
        f.debug_struct("ResilientClient")
            .field("provider", &self.transport.provider_name())
            .field("config", &self.config)
            .field("quota", &self.quota)
            .field("tokens_consumed", &state.budget.consumed())
            .field("cached_responses", &state.cache.len())
            .finish()
    }
}

//! Agent and arena configuration

use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Backoff for retryable HTTP failures (429 and 5xx)
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts including the first; `None` retries until the
    /// adapter's timeout cuts the request off
    pub max_attempts: Option<usize>,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: Some(5),
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Fail on the first error
    pub fn none() -> Self {
        Self {
            max_attempts: Some(1),
            ..Self::default()
        }
    }

    /// Whether another attempt may follow attempt number `attempt` (1-based)
    pub fn allows_retry(&self, attempt: usize) -> bool {
        self.max_attempts.is_none_or(|max| attempt < max)
    }

    pub fn next_delay(&self, delay: Duration) -> Duration {
        Duration::from_secs_f64(delay.as_secs_f64() * self.backoff_multiplier).min(self.max_delay)
    }
}

/// Connection settings for an OpenAI-compatible chat-completions endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct AgentConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub retry: RetryPolicy,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            retry: RetryPolicy::default(),
        }
    }
}

impl AgentConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `ARBITER_API_KEY` (or `GROQ_API_KEY`), `ARBITER_BASE_URL` and
    /// `ARBITER_MODEL`, keeping defaults for anything unset
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        let mut config = Self {
            api_key: var("ARBITER_API_KEY").or_else(|| var("GROQ_API_KEY")),
            ..Self::default()
        };
        if let Some(url) = var("ARBITER_BASE_URL") {
            config.base_url = url;
        }
        if let Some(model) = var("ARBITER_MODEL") {
            config.model = model;
        }
        config
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// Driver settings for an [`Arena`](crate::Arena)
#[derive(Debug, Clone, PartialEq)]
pub struct ArenaConfig {
    /// Upper bound on one agent reply, retries included
    pub decision_timeout: Duration,
    /// Seed for the random fallback; entropy when `None`
    pub seed: Option<u64>,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            decision_timeout: Duration::from_secs(30),
            seed: None,
        }
    }
}

impl ArenaConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_decision_timeout(mut self, timeout: Duration) -> Self {
        self.decision_timeout = timeout;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

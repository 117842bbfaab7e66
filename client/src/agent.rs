use async_trait::async_trait;
use thiserror::Error;

use arbiter_protocol::DecisionRequest;

/// Something that can answer decision requests for one side.
///
/// Agents return the raw reply text. Interpretation, clamping and fallback
/// all happen in the [`DecisionAdapter`](crate::DecisionAdapter), so an
/// agent never needs to know the rules of the match.
///
/// # Example
///
/// ```ignore
/// struct AlwaysFirst;
///
/// #[async_trait]
/// impl DecisionAgent for AlwaysFirst {
///     fn name(&self) -> &str {
///         "always-first"
///     }
///
///     async fn decide(&self, request: &DecisionRequest) -> Result<String, AgentError> {
///         Ok(r#"{"why":"first move","act":"move","idx":1}"#.to_string())
///     }
/// }
/// ```
#[async_trait]
pub trait DecisionAgent: Send + Sync {
    /// Display name for diagnostics
    fn name(&self) -> &str;

    /// Produce a reply for `request`
    async fn decide(&self, request: &DecisionRequest) -> Result<String, AgentError>;
}

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("No API key configured")]
    MissingApiKey,

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Completion had no content")]
    EmptyCompletion,

    #[error("Agent has no more replies")]
    Exhausted,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AgentError {
    /// Rate limits and server errors are worth another attempt
    pub fn is_retryable(&self) -> bool {
        match self {
            AgentError::Http { status, .. } => *status == 429 || (500..600).contains(status),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_statuses() {
        let http = |status| AgentError::Http {
            status,
            body: String::new(),
        };
        assert!(http(429).is_retryable());
        assert!(http(503).is_retryable());
        assert!(!http(400).is_retryable());
        assert!(!http(401).is_retryable());
        assert!(!AgentError::EmptyCompletion.is_retryable());
    }
}

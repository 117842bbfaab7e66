//! OpenAI-compatible chat-completions agent

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use arbiter_protocol::{DecisionRequest, TaskKind};

use crate::agent::{AgentError, DecisionAgent};
use crate::config::AgentConfig;

const PREVIEW_PROMPT: &str = "You are picking the lead order for a turn-based battle. \
The user message is JSON describing your roster and the opponent's species. \
Reply with JSON only: {\"why\": short reason, \"order\": roster indices as a digit string, e.g. \"3124\"}.";

const TURN_PROMPT: &str = "You are playing one side of a turn-based battle. \
The user message is JSON with your active combatant, its moves (1-based idx), your team and the opponent's visible state. \
Reply with JSON only: {\"why\": short reason, \"act\": \"move\" or \"switch\", \"idx\": number}. \
To use a special resource listed in canUse, add \"tera\", \"dynamax\", \"zmove\" or \"mega\": true.";

const FORCED_PROMPT: &str = "Your active combatant fainted. \
The user message is JSON with switchOptions (1-based team indices). \
Reply with JSON only: {\"why\": short reason, \"idx\": one of switchOptions}.";

/// Sampling settings per task
fn sampling(task: TaskKind) -> (f64, u32) {
    match task {
        TaskKind::TeamPreview => (0.5, 150),
        TaskKind::MoveOrSwitch | TaskKind::ForcedSwitch => (0.4, 200),
    }
}

fn system_prompt(task: TaskKind) -> &'static str {
    match task {
        TaskKind::TeamPreview => PREVIEW_PROMPT,
        TaskKind::MoveOrSwitch => TURN_PROMPT,
        TaskKind::ForcedSwitch => FORCED_PROMPT,
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Decision agent backed by a chat-completions endpoint (Groq by default)
pub struct ChatCompletionsAgent {
    http: reqwest::Client,
    config: AgentConfig,
    name: String,
}

impl ChatCompletionsAgent {
    pub fn new(config: AgentConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            name: config.model.clone(),
            config,
        }
    }

    /// Share a connection pool between agents
    pub fn with_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    fn body(&self, request: &DecisionRequest) -> anyhow::Result<serde_json::Value> {
        let (temperature, max_tokens) = sampling(request.task);
        Ok(json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": system_prompt(request.task) },
                { "role": "user", "content": request.to_json()? },
            ],
            "temperature": temperature,
            "max_tokens": max_tokens,
            "response_format": { "type": "json_object" },
        }))
    }

    async fn complete_once(&self, api_key: &str, body: &serde_json::Value) -> Result<String, AgentError> {
        let response = self
            .http
            .post(self.config.endpoint())
            .bearer_auth(api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(AgentError::EmptyCompletion)
    }
}

#[async_trait]
impl DecisionAgent for ChatCompletionsAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn decide(&self, request: &DecisionRequest) -> Result<String, AgentError> {
        let api_key = self.config.api_key.as_deref().ok_or(AgentError::MissingApiKey)?;
        let body = self.body(request)?;
        let policy = &self.config.retry;

        let mut delay = policy.initial_delay;
        let mut attempt = 1;
        loop {
            match self.complete_once(api_key, &body).await {
                Ok(content) => {
                    tracing::debug!(
                        model = %self.config.model,
                        side = %request.side,
                        task = %request.task,
                        attempt,
                        "completion received"
                    );
                    return Ok(content);
                }
                Err(e) if e.is_retryable() && policy.allows_retry(attempt) => {
                    tracing::warn!(
                        attempt,
                        max_attempts = ?policy.max_attempts,
                        error = %e,
                        "completion failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                    delay = policy.next_delay(delay);
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbiter_protocol::SideId;

    #[test]
    fn test_request_body() {
        let agent = ChatCompletionsAgent::new(AgentConfig::new().with_model("test-model"));
        let request = DecisionRequest::forced_switch(SideId::P2, 4, "gen9 6v6 singles", vec![2, 3]);

        let body = agent.body(&request).unwrap();
        assert_eq!(body["model"], "test-model");
        assert_eq!(body["max_tokens"], 200);
        assert_eq!(body["response_format"]["type"], "json_object");
        assert_eq!(body["messages"][0]["content"], FORCED_PROMPT);

        let user = body["messages"][1]["content"].as_str().unwrap();
        assert_eq!(DecisionRequest::parse(user), Some(request));
    }

    #[test]
    fn test_sampling_per_task() {
        assert_eq!(sampling(TaskKind::TeamPreview), (0.5, 150));
        assert_eq!(sampling(TaskKind::MoveOrSwitch), (0.4, 200));
    }

    #[tokio::test]
    async fn test_missing_key_fails_fast() {
        let agent = ChatCompletionsAgent::new(AgentConfig::new());
        let request = DecisionRequest::forced_switch(SideId::P1, 1, "gen9 1v1 singles", vec![1]);

        let err = agent.decide(&request).await.unwrap_err();
        assert!(matches!(err, AgentError::MissingApiKey));
        assert_eq!(agent.name(), crate::config::DEFAULT_MODEL);
    }
}

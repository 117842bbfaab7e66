//! Offline agents for tests and demos

use std::collections::VecDeque;
use std::sync::Mutex;

use anyhow::anyhow;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde_json::json;

use arbiter_protocol::{DecisionRequest, TaskKind};

use crate::agent::{AgentError, DecisionAgent};

/// Replays a fixed list of replies, then a default (or an error)
pub struct ScriptedAgent {
    name: String,
    replies: Mutex<VecDeque<String>>,
    default_reply: Option<String>,
    seen: Mutex<Vec<DecisionRequest>>,
}

impl ScriptedAgent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            replies: Mutex::new(VecDeque::new()),
            default_reply: None,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn with_replies<I, S>(self, replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Ok(mut queue) = self.replies.lock() {
            queue.extend(replies.into_iter().map(Into::into));
        }
        self
    }

    /// Reply used once the script runs out
    pub fn with_default(mut self, reply: impl Into<String>) -> Self {
        self.default_reply = Some(reply.into());
        self
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<DecisionRequest> {
        self.seen.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl DecisionAgent for ScriptedAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn decide(&self, request: &DecisionRequest) -> Result<String, AgentError> {
        self.seen
            .lock()
            .map_err(|_| anyhow!("request log poisoned"))?
            .push(request.clone());

        let next = self
            .replies
            .lock()
            .map_err(|_| anyhow!("reply queue poisoned"))?
            .pop_front();

        next.or_else(|| self.default_reply.clone())
            .ok_or(AgentError::Exhausted)
    }
}

/// Picks uniformly among whatever the request allows
pub struct RandomAgent {
    name: String,
    rng: Mutex<StdRng>,
}

impl RandomAgent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn seeded(name: impl Into<String>, seed: u64) -> Self {
        Self {
            name: name.into(),
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn reply(&self, request: &DecisionRequest, rng: &mut StdRng) -> serde_json::Value {
        match request.task {
            TaskKind::TeamPreview => {
                let mut order: Vec<usize> = (1..=request.preview_size()).collect();
                order.shuffle(rng);
                let order: String = order.iter().map(|i| i.to_string()).collect();
                json!({ "why": "random order", "order": order })
            }
            TaskKind::MoveOrSwitch => {
                let moves: Vec<usize> = request
                    .state
                    .as_ref()
                    .map(|s| s.me.usable_moves().map(|m| m.index).collect())
                    .unwrap_or_default();
                let switches = request.available_switches();

                // Mostly attack; switch now and then when it is possible
                if !switches.is_empty() && (moves.is_empty() || rng.gen_bool(0.1)) {
                    let idx = switches.choose(rng).copied().unwrap_or(1);
                    json!({ "why": "random switch", "act": "switch", "idx": idx })
                } else {
                    let idx = moves.choose(rng).copied().unwrap_or(1);
                    json!({ "why": "random move", "act": "move", "idx": idx })
                }
            }
            TaskKind::ForcedSwitch => {
                let idx = request.available_switches().choose(rng).copied().unwrap_or(1);
                json!({ "why": "random replacement", "idx": idx })
            }
        }
    }
}

#[async_trait]
impl DecisionAgent for RandomAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn decide(&self, request: &DecisionRequest) -> Result<String, AgentError> {
        let mut rng = self.rng.lock().map_err(|_| anyhow!("rng poisoned"))?;
        Ok(self.reply(request, &mut rng).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbiter_protocol::SideId;

    #[tokio::test]
    async fn test_script_then_default() {
        let agent = ScriptedAgent::new("s")
            .with_replies(["one", "two"])
            .with_default("again");
        let req = DecisionRequest::forced_switch(SideId::P1, 1, "gen9 1v1 singles", vec![1]);

        assert_eq!(agent.decide(&req).await.unwrap(), "one");
        assert_eq!(agent.decide(&req).await.unwrap(), "two");
        assert_eq!(agent.decide(&req).await.unwrap(), "again");
        assert_eq!(agent.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_script_exhausted() {
        let agent = ScriptedAgent::new("s");
        let req = DecisionRequest::forced_switch(SideId::P1, 1, "gen9 1v1 singles", vec![1]);
        assert!(matches!(agent.decide(&req).await, Err(AgentError::Exhausted)));
    }

    #[tokio::test]
    async fn test_random_forced_switch_is_legal() {
        let agent = RandomAgent::seeded("r", 3);
        let req = DecisionRequest::forced_switch(SideId::P2, 5, "gen9 6v6 singles", vec![3, 5]);

        for _ in 0..10 {
            let raw = agent.decide(&req).await.unwrap();
            let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
            let idx = value["idx"].as_u64().unwrap();
            assert!(idx == 3 || idx == 5);
        }
    }
}

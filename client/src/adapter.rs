//! Decision protocol adapter
//!
//! Wraps the two agents with a timeout and turns whatever they send back
//! into a legal [`Decision`]. It never fails: transport errors, timeouts
//! and unusable replies all end in a fallback decision.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use rand::SeedableRng;
use rand::rngs::StdRng;

use arbiter_battle::decision::{build_request, fallback_decision, interpret_reply};
use arbiter_battle::{Decision, Match};
use arbiter_protocol::{DecisionRequest, SideId, TaskKind};

use crate::agent::DecisionAgent;
use crate::config::ArenaConfig;

pub struct DecisionAdapter {
    agents: [Arc<dyn DecisionAgent>; 2],
    timeout: Duration,
    rng: StdRng,
}

impl DecisionAdapter {
    pub fn new(p1: Arc<dyn DecisionAgent>, p2: Arc<dyn DecisionAgent>, config: &ArenaConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            agents: [p1, p2],
            timeout: config.decision_timeout,
            rng,
        }
    }

    pub fn agent(&self, side: SideId) -> &Arc<dyn DecisionAgent> {
        &self.agents[side.index()]
    }

    /// Ask one side for a decision
    pub async fn request_action(&mut self, m: &Match, side: SideId, task: TaskKind) -> Decision {
        let request = build_request(m, side, task);
        let reply = ask(self.agents[side.index()].as_ref(), &request, self.timeout).await;
        self.interpret(m, side, task, reply)
    }

    /// Ask several sides at once; replies are interpreted only after all
    /// of them are in, in the order of `tasks`
    pub async fn request_all(&mut self, m: &Match, tasks: &[(SideId, TaskKind)]) -> Vec<Decision> {
        let requests: Vec<DecisionRequest> = tasks
            .iter()
            .map(|&(side, task)| build_request(m, side, task))
            .collect();

        let replies = join_all(
            requests
                .iter()
                .map(|req| ask(self.agents[req.side.index()].as_ref(), req, self.timeout)),
        )
        .await;

        tasks
            .iter()
            .zip(replies)
            .map(|(&(side, task), reply)| self.interpret(m, side, task, reply))
            .collect()
    }

    fn interpret(
        &mut self,
        m: &Match,
        side: SideId,
        task: TaskKind,
        reply: Result<String, String>,
    ) -> Decision {
        match reply {
            Ok(raw) => interpret_reply(m, side, task, &raw, &mut self.rng),
            Err(reason) => fallback_decision(m, side, task, reason, &mut self.rng),
        }
    }
}

/// One bounded agent call; the error is the reason used for the fallback
async fn ask(
    agent: &dyn DecisionAgent,
    request: &DecisionRequest,
    timeout: Duration,
) -> Result<String, String> {
    match tokio::time::timeout(timeout, agent.decide(request)).await {
        Ok(Ok(raw)) => {
            tracing::debug!(
                agent = agent.name(),
                side = %request.side,
                task = %request.task,
                reply = %raw,
                "agent replied"
            );
            Ok(raw)
        }
        Ok(Err(e)) => {
            tracing::warn!(
                agent = agent.name(),
                side = %request.side,
                task = %request.task,
                error = %e,
                "agent failed"
            );
            Err(e.to_string())
        }
        Err(_) => {
            tracing::warn!(
                agent = agent.name(),
                side = %request.side,
                task = %request.task,
                ?timeout,
                "agent timed out"
            );
            Err(format!("no reply within {:?}", timeout))
        }
    }
}

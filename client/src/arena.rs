//! The arena: drives one match against two agents
//!
//! ```text
//! advance()
//!   ├─ stall check ── Recover ─> default decisions, agents bypassed
//!   │               └ Fault ───> match aborted as a draw
//!   ├─ NotStarted   start(), then team preview or the first turn
//!   ├─ ForcedSwitch ask the sides that need a replacement
//!   └─ Turn         ask both sides concurrently, resolve one turn
//! ```
//!
//! Every call returns a well-formed [`AdvanceReport`]. Calling it after the
//! match has ended changes nothing and returns the known result.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use arbiter_battle::decision::default_decision;
use arbiter_battle::{
    Action, Choice, Decision, LogEntry, Match, MatchOutcome, MatchPhase, MatchRequest,
    MatchSnapshot, MechanicsOracle, StallDetector, StallVerdict,
};
use arbiter_protocol::{SideId, TaskKind};

use crate::adapter::DecisionAdapter;
use crate::agent::DecisionAgent;
use crate::archive::{MatchRecord, ReasoningEntry, match_id};
use crate::config::ArenaConfig;
use crate::handle::{ArenaHandle, ArenaState};

/// What one `advance()` produced
#[derive(Debug, Clone, PartialEq)]
pub struct AdvanceReport {
    /// Log entries appended by this call
    pub log_delta: Vec<LogEntry>,
    pub snapshot: MatchSnapshot,
    pub result: MatchOutcome,
}

/// How [`Arena::run`] finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Finished(MatchOutcome),
    /// Stopped through an [`ArenaHandle`] before the match ended
    Aborted { turn: u32 },
}

/// Where decisions come from for one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Agents,
    Defaults,
}

pub struct Arena {
    game: Match,
    oracle: Box<dyn MechanicsOracle>,
    adapter: DecisionAdapter,
    stall: StallDetector,
    reasoning: Vec<ReasoningEntry>,
    cursor: usize,
    handle: ArenaHandle,
    started_at: DateTime<Utc>,
}

impl Arena {
    pub fn new(
        game: Match,
        oracle: impl MechanicsOracle + 'static,
        p1: Arc<dyn DecisionAgent>,
        p2: Arc<dyn DecisionAgent>,
        config: ArenaConfig,
    ) -> Self {
        Self {
            game,
            oracle: Box::new(oracle),
            adapter: DecisionAdapter::new(p1, p2, &config),
            stall: StallDetector::new(),
            reasoning: Vec::new(),
            cursor: 0,
            handle: ArenaHandle::new(Arc::new(ArenaState::new())),
            started_at: Utc::now(),
        }
    }

    pub fn handle(&self) -> ArenaHandle {
        self.handle.clone()
    }

    pub fn game(&self) -> &Match {
        &self.game
    }

    pub fn reasoning(&self) -> &[ReasoningEntry] {
        &self.reasoning
    }

    pub fn result(&self) -> MatchOutcome {
        self.game.outcome()
    }

    /// Move the match forward by one step
    pub async fn advance(&mut self) -> AdvanceReport {
        if !self.game.is_over() {
            match self.stall.observe(self.game.turn()) {
                StallVerdict::Progressing => self.step(Source::Agents).await,
                StallVerdict::Recover => {
                    self.game.record_stall_recovery();
                    self.step(Source::Defaults).await;
                }
                StallVerdict::Fault => {
                    tracing::error!(turn = self.game.turn(), "turn stalled after recovery, aborting");
                    self.game.abort_stalled();
                }
            }
        }
        self.report()
    }

    /// Advance until the match ends or the handle is stopped
    pub async fn run(&mut self) -> RunOutcome {
        loop {
            if self.handle.is_stopped() {
                tracing::info!(turn = self.game.turn(), "arena stopped");
                return RunOutcome::Aborted {
                    turn: self.game.turn(),
                };
            }
            let report = self.advance().await;
            if report.result.is_terminal() {
                return RunOutcome::Finished(report.result);
            }
        }
    }

    /// Archival record, once the match has ended
    pub fn record(&self) -> Option<MatchRecord> {
        if !self.game.is_over() {
            return None;
        }
        let sides = self.game.sides();
        Some(MatchRecord {
            id: match_id(&self.started_at),
            started_at: self.started_at,
            p1_name: sides[0].name.clone(),
            p2_name: sides[1].name.clone(),
            result: self.game.outcome(),
            end_reason: self.game.end_reason(),
            total_turns: self.game.turn().saturating_sub(1),
            log: self.game.log().entries().to_vec(),
            reasoning: self.reasoning.clone(),
        })
    }

    fn report(&mut self) -> AdvanceReport {
        let log_delta = self.game.log().since(self.cursor).to_vec();
        self.cursor = self.game.log().len();

        let snapshot = self.game.snapshot();
        self.handle.publish(snapshot.clone());
        AdvanceReport {
            log_delta,
            snapshot,
            result: self.game.outcome(),
        }
    }

    async fn step(&mut self, source: Source) {
        if self.game.phase() == MatchPhase::NotStarted {
            self.game.start();
        }

        match self.game.next_request() {
            MatchRequest::TeamPreview => self.team_preview(source).await,
            MatchRequest::ForcedSwitch(sides) => {
                if self.forced_switches(&sides, source).await {
                    self.turn(source).await;
                }
            }
            MatchRequest::Turn => self.turn(source).await,
            MatchRequest::NotStarted | MatchRequest::Finished(_) => {}
        }
    }

    async fn decide(&mut self, tasks: &[(SideId, TaskKind)], source: Source) -> Vec<Decision> {
        let decisions = match source {
            Source::Agents => self.adapter.request_all(&self.game, tasks).await,
            Source::Defaults => tasks
                .iter()
                .map(|&(side, task)| default_decision(&self.game, side, task))
                .collect(),
        };

        for decision in &decisions {
            self.game.record_decision(decision);
            if !decision.justification.is_empty() {
                self.reasoning.push(ReasoningEntry {
                    turn: self.game.turn(),
                    side: decision.side,
                    task: decision.task,
                    text: decision.justification.clone(),
                    origin: decision.origin,
                });
            }
        }
        decisions
    }

    async fn team_preview(&mut self, source: Source) {
        let tasks = self.game.next_request().tasks();
        let decisions = self.decide(&tasks, source).await;

        let mut orders: [Vec<usize>; 2] =
            SideId::BOTH.map(|s| (0..self.game.side(s).pool.len()).collect());
        for decision in decisions {
            if let Choice::TeamOrder(order) = decision.choice {
                orders[decision.side.index()] = order;
            }
        }

        if let Err(e) = self.game.apply_team_order(orders) {
            tracing::warn!(error = %e, "team order rejected");
        }
    }

    /// Returns false when a replacement could not be applied
    async fn forced_switches(&mut self, sides: &[SideId], source: Source) -> bool {
        let tasks: Vec<_> = sides.iter().map(|&s| (s, TaskKind::ForcedSwitch)).collect();
        let decisions = self.decide(&tasks, source).await;

        for decision in decisions {
            let Choice::SwitchIn(target) = decision.choice else {
                continue;
            };
            if let Err(e) = self.game.apply_forced_switch(decision.side, target) {
                tracing::warn!(side = %decision.side, slot = target, error = %e, "replacement rejected");
                return false;
            }
        }
        self.game.next_request() == MatchRequest::Turn
    }

    async fn turn(&mut self, source: Source) {
        let tasks = self.game.next_request().tasks();
        let decisions = self.decide(&tasks, source).await;

        let mut actions = [Action::Pass; 2];
        for decision in &decisions {
            if let Some(action) = decision.action() {
                actions[decision.side.index()] = action;
            }
        }

        match self.game.resolve_turn(self.oracle.as_ref(), actions) {
            Ok(report) => tracing::debug!(
                turn = report.turn,
                first = %report.order[0],
                fainted = ?report.fainted,
                "turn resolved"
            ),
            Err(e) => tracing::warn!(error = %e, "turn rejected"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use arbiter_battle::{
        ChartOracle, Combatant, DecisionOrigin, EndReason, EntryFormat, FormatRules, MatchEvent,
        MoveCategory, MoveSlot, SideSetup, StatBlock, Type, create_match,
    };

    use crate::scripted::ScriptedAgent;

    const HIT: &str = r#"{"why":"hit","act":"move","idx":1}"#;

    fn mon(id: &str) -> Combatant {
        Combatant::new(id, id, 50, StatBlock::uniform(80))
            .with_types(vec![Type::Normal])
            .with_moves(vec![MoveSlot::new("Tackle", Type::Normal, MoveCategory::Physical, 40, 35)])
    }

    fn arena() -> (Arena, Arc<ScriptedAgent>) {
        let rules = FormatRules::new()
            .with_entry_format(EntryFormat::OneVsOne)
            .with_team_preview(false);
        let game = create_match(
            SideSetup::new("alpha", vec![mon("a")]),
            SideSetup::new("beta", vec![mon("b")]),
            rules,
        )
        .unwrap();
        let p1 = Arc::new(ScriptedAgent::new("p1").with_default(HIT));
        let p2 = Arc::new(ScriptedAgent::new("p2").with_default(HIT));
        let arena = Arena::new(game, ChartOracle::new(), p1.clone(), p2, ArenaConfig::new().with_seed(5));
        (arena, p1)
    }

    #[tokio::test]
    async fn test_stalled_turn_recovers_with_defaults() {
        let (mut arena, p1) = arena();
        arena.advance().await;
        let turn = arena.game().turn();
        let asked = p1.requests().len();

        // A previous advance already saw this turn without moving it
        arena.stall.observe(turn);
        let report = arena.advance().await;

        assert!(report
            .log_delta
            .iter()
            .any(|e| matches!(e.event, MatchEvent::StallRecovered { turn: t } if t == turn)));
        let defaults = report
            .log_delta
            .iter()
            .filter(|e| {
                matches!(
                    e.event,
                    MatchEvent::Fallback {
                        origin: DecisionOrigin::StallDefault,
                        ..
                    }
                )
            })
            .count();
        assert_eq!(defaults, 2);

        // Agents were bypassed and the turn still resolved
        assert_eq!(p1.requests().len(), asked);
        assert!(report.snapshot.turn > turn || report.result.is_terminal());
    }

    #[tokio::test]
    async fn test_repeated_stall_aborts_as_draw() {
        let (mut arena, _) = arena();
        arena.advance().await;
        let turn = arena.game().turn();

        arena.stall.observe(turn);
        arena.stall.observe(turn);
        let report = arena.advance().await;

        assert_eq!(report.result, MatchOutcome::Draw);
        assert_eq!(arena.game().end_reason(), Some(EndReason::StallFault));
        assert_eq!(report.snapshot.turn, turn);
        assert!(arena.record().is_some());
    }
}

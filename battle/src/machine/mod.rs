//! Match state machine
//!
//! ```text
//! NotStarted ──start()──> TeamPreview ──apply_team_order()──> TurnLoop ──> Ended
//!      │                                                        ▲   │
//!      └──────────── start() (no team preview) ─────────────────┘   │
//!                                        apply_forced_switch() ─────┘
//!                                        resolve_turn()
//! ```
//!
//! The outer driver asks [`Match::next_request`] what is needed, obtains
//! decisions, and feeds them back through the `apply_*`/`resolve_turn`
//! methods. Nothing changes once the match has ended.

mod setup;
mod stall;

use std::fmt;

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use arbiter_protocol::{SideId, SpecialResource, TaskKind};

use crate::action::{Action, ActionError};
use crate::decision::Decision;
use crate::format::FormatRules;
use crate::log::{MatchEvent, MatchLog};
use crate::oracle::MechanicsOracle;
use crate::resolver::{self, TurnReport};
use crate::types::{FieldState, Side, Status};

pub use setup::{SetupError, SideSetup, create_match};
pub use stall::{StallDetector, StallVerdict};

/// Lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MatchPhase {
    NotStarted,
    TeamPreview,
    TurnLoop,
    Ended,
}

impl fmt::Display for MatchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MatchPhase::NotStarted => "not started",
            MatchPhase::TeamPreview => "team preview",
            MatchPhase::TurnLoop => "turn loop",
            MatchPhase::Ended => "ended",
        })
    }
}

/// Result of a match so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MatchOutcome {
    #[default]
    Ongoing,
    P1,
    P2,
    Draw,
}

impl MatchOutcome {
    pub fn won_by(side: SideId) -> Self {
        match side {
            SideId::P1 => MatchOutcome::P1,
            SideId::P2 => MatchOutcome::P2,
        }
    }

    pub fn winner(&self) -> Option<SideId> {
        match self {
            MatchOutcome::P1 => Some(SideId::P1),
            MatchOutcome::P2 => Some(SideId::P2),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        *self != MatchOutcome::Ongoing
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchOutcome::Ongoing => "ongoing",
            MatchOutcome::P1 => "p1",
            MatchOutcome::P2 => "p2",
            MatchOutcome::Draw => "draw",
        }
    }
}

impl fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a match ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum EndReason {
    /// One side's entry fainted completely
    Knockout,
    /// Both entries fainted in the same turn
    SimultaneousKnockout,
    TurnLimit,
    /// The same turn stalled again after recovery
    StallFault,
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EndReason::Knockout => "knockout",
            EndReason::SimultaneousKnockout => "simultaneous knockout",
            EndReason::TurnLimit => "turn limit",
            EndReason::StallFault => "stall fault",
        })
    }
}

/// What the match needs next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchRequest {
    /// `start()` has not been called
    NotStarted,
    /// Both sides must order their roster
    TeamPreview,
    /// These sides must send in a replacement before the turn
    ForcedSwitch(Vec<SideId>),
    /// Both sides must choose an action
    Turn,
    Finished(MatchOutcome),
}

impl MatchRequest {
    /// Decision tasks this request opens, per side
    pub fn tasks(&self) -> Vec<(SideId, TaskKind)> {
        match self {
            MatchRequest::TeamPreview => SideId::BOTH
                .iter()
                .map(|&s| (s, TaskKind::TeamPreview))
                .collect(),
            MatchRequest::ForcedSwitch(sides) => {
                sides.iter().map(|&s| (s, TaskKind::ForcedSwitch)).collect()
            }
            MatchRequest::Turn => SideId::BOTH
                .iter()
                .map(|&s| (s, TaskKind::MoveOrSwitch))
                .collect(),
            MatchRequest::NotStarted | MatchRequest::Finished(_) => Vec::new(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MachineError {
    #[error("Expected phase {expected}, match is in {actual}")]
    WrongPhase {
        expected: MatchPhase,
        actual: MatchPhase,
    },

    #[error("Invalid team order for {side}: {reason}")]
    InvalidOrder { side: SideId, reason: String },

    #[error("No replacement pending for {0}")]
    NoSwitchPending(SideId),

    #[error("Illegal switch for {side}: {source}")]
    IllegalSwitch {
        side: SideId,
        #[source]
        source: ActionError,
    },

    #[error("{0} must send in a replacement first")]
    ReplacementPending(SideId),
}

/// One game between two sides
#[derive(Debug, Clone)]
pub struct Match {
    pub(crate) sides: [Side; 2],
    pub(crate) field: FieldState,
    pub(crate) rules: FormatRules,
    /// 0 during team preview, 1 for the first turn
    pub(crate) turn: u32,
    pub(crate) phase: MatchPhase,
    pub(crate) log: MatchLog,
    pub(crate) outcome: MatchOutcome,
    pub(crate) end_reason: Option<EndReason>,
}

impl Match {
    /// Field conditions for the whole match; the engine never changes them
    pub fn with_field(mut self, field: FieldState) -> Self {
        self.field = field;
        self
    }

    pub fn side(&self, id: SideId) -> &Side {
        &self.sides[id.index()]
    }

    pub(crate) fn side_mut(&mut self, id: SideId) -> &mut Side {
        &mut self.sides[id.index()]
    }

    pub fn sides(&self) -> &[Side; 2] {
        &self.sides
    }

    pub fn field(&self) -> &FieldState {
        &self.field
    }

    pub fn rules(&self) -> &FormatRules {
        &self.rules
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn log(&self) -> &MatchLog {
        &self.log
    }

    pub fn outcome(&self) -> MatchOutcome {
        self.outcome
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    pub fn is_over(&self) -> bool {
        self.phase == MatchPhase::Ended
    }

    fn expect_phase(&self, expected: MatchPhase) -> Result<(), MachineError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(MachineError::WrongPhase {
                expected,
                actual: self.phase,
            })
        }
    }

    /// Leave `NotStarted`; a no-op in any other phase
    ///
    /// Without team preview both sides enter their default order and the
    /// first turn begins immediately.
    pub fn start(&mut self) {
        if self.phase != MatchPhase::NotStarted {
            return;
        }

        self.log.push(
            self.turn,
            MatchEvent::MatchStart {
                p1: self.sides[0].name.clone(),
                p2: self.sides[1].name.clone(),
                format: self.rules.label(),
            },
        );

        if self.rules.team_preview {
            self.phase = MatchPhase::TeamPreview;
            return;
        }

        let orders = self.sides.each_ref().map(|s| (0..s.pool.len()).collect::<Vec<_>>());
        self.enter_and_lead(orders);
    }

    /// What the driver has to supply next
    pub fn next_request(&self) -> MatchRequest {
        match self.phase {
            MatchPhase::NotStarted => MatchRequest::NotStarted,
            MatchPhase::TeamPreview => MatchRequest::TeamPreview,
            MatchPhase::Ended => MatchRequest::Finished(self.outcome),
            MatchPhase::TurnLoop => {
                let pending: Vec<SideId> = SideId::BOTH
                    .into_iter()
                    .filter(|&s| self.side(s).needs_replacement())
                    .collect();
                if pending.is_empty() {
                    MatchRequest::Turn
                } else {
                    MatchRequest::ForcedSwitch(pending)
                }
            }
        }
    }

    /// Apply both sides' team orders (0-based pool positions) and begin turn 1
    pub fn apply_team_order(&mut self, orders: [Vec<usize>; 2]) -> Result<(), MachineError> {
        self.expect_phase(MatchPhase::TeamPreview)?;

        for side in SideId::BOTH {
            self.check_order(side, &orders[side.index()])?;
        }

        for side in SideId::BOTH {
            let s = self.side(side);
            let species = orders[side.index()]
                .iter()
                .take(self.rules.entry_size())
                .filter_map(|&pos| s.pool.get(pos))
                .filter_map(|&i| s.party.get(i))
                .map(|c| c.species.clone())
                .collect();
            self.log.push(self.turn, MatchEvent::TeamOrder { side, species });
        }

        self.enter_and_lead(orders);
        Ok(())
    }

    fn check_order(&self, side: SideId, order: &[usize]) -> Result<(), MachineError> {
        let pool_len = self.side(side).pool.len();
        let pick = self.rules.entry_size().min(pool_len);
        let invalid = |reason: String| MachineError::InvalidOrder { side, reason };

        if order.len() < pick {
            return Err(invalid(format!("{} members ordered, {} needed", order.len(), pick)));
        }
        for (i, &pos) in order.iter().enumerate() {
            if pos >= pool_len {
                return Err(invalid(format!("position {} out of range", pos + 1)));
            }
            if order[..i].contains(&pos) {
                return Err(invalid(format!("position {} repeated", pos + 1)));
            }
        }
        Ok(())
    }

    fn enter_and_lead(&mut self, orders: [Vec<usize>; 2]) {
        let entry_size = self.rules.entry_size();
        for side in SideId::BOTH {
            let s = self.side_mut(side);
            s.enter(&orders[side.index()], entry_size);
            s.set_active(0);
        }

        self.turn = 1;
        self.phase = MatchPhase::TurnLoop;
        for side in SideId::BOTH {
            if let Some(lead) = self.side(side).active_combatant() {
                let species = lead.species.clone();
                self.log.push(self.turn, MatchEvent::SendOut { side, species });
            }
        }
        self.log.push(self.turn, MatchEvent::TurnStart { turn: self.turn });
    }

    /// Send in a replacement (0-based entry index) for a fainted combatant
    pub fn apply_forced_switch(&mut self, side: SideId, target: usize) -> Result<(), MachineError> {
        self.expect_phase(MatchPhase::TurnLoop)?;
        if !self.side(side).needs_replacement() {
            return Err(MachineError::NoSwitchPending(side));
        }
        Action::Switch { target }
            .validate(self.side(side))
            .map_err(|source| MachineError::IllegalSwitch { side, source })?;

        let s = self.side_mut(side);
        s.set_active(target);
        let species = s.entry[target].species.clone();
        self.log.push(self.turn, MatchEvent::SendOut { side, species });
        Ok(())
    }

    /// Resolve one simultaneous turn, then check for the end of the match
    pub fn resolve_turn(
        &mut self,
        oracle: &dyn MechanicsOracle,
        actions: [Action; 2],
    ) -> Result<TurnReport, MachineError> {
        self.expect_phase(MatchPhase::TurnLoop)?;
        if let Some(side) = SideId::BOTH
            .into_iter()
            .find(|&s| self.side(s).needs_replacement())
        {
            return Err(MachineError::ReplacementPending(side));
        }

        let report = resolver::resolve_turn(self, oracle, actions);
        self.check_end();
        Ok(report)
    }

    fn check_end(&mut self) {
        let p1_out = self.sides[0].all_fainted();
        let p2_out = self.sides[1].all_fainted();

        match (p1_out, p2_out) {
            (true, true) => self.end(MatchOutcome::Draw, EndReason::SimultaneousKnockout),
            (true, false) => self.end(MatchOutcome::P2, EndReason::Knockout),
            (false, true) => self.end(MatchOutcome::P1, EndReason::Knockout),
            (false, false) if self.turn > self.rules.max_turns => {
                self.end(MatchOutcome::Draw, EndReason::TurnLimit)
            }
            (false, false) => self.log.push(self.turn, MatchEvent::TurnStart { turn: self.turn }),
        }
    }

    fn end(&mut self, outcome: MatchOutcome, reason: EndReason) {
        if self.phase == MatchPhase::Ended {
            return;
        }
        self.phase = MatchPhase::Ended;
        self.outcome = outcome;
        self.end_reason = Some(reason);
        self.log.push(self.turn, MatchEvent::MatchEnd { outcome, reason });
        tracing::info!(turn = self.turn, %outcome, %reason, "match ended");
    }

    /// End the match as a draw after an unrecoverable stall
    pub fn abort_stalled(&mut self) -> MatchOutcome {
        self.end(MatchOutcome::Draw, EndReason::StallFault);
        self.outcome
    }

    /// Log a marker when a decision was not the agent's own choice
    pub fn record_decision(&mut self, decision: &Decision) {
        if !decision.is_degraded() {
            return;
        }
        let reason = decision.reason.clone().unwrap_or_default();
        tracing::warn!(
            side = %decision.side,
            task = %decision.task,
            origin = %decision.origin,
            reason = %reason,
            "decision degraded"
        );
        self.log.push(
            self.turn,
            MatchEvent::Fallback {
                side: decision.side,
                task: decision.task,
                origin: decision.origin,
                reason,
            },
        );
    }

    /// Log that stall recovery is about to apply default actions
    pub fn record_stall_recovery(&mut self) {
        tracing::warn!(turn = self.turn, "turn stalled, applying default actions");
        self.log.push(self.turn, MatchEvent::StallRecovered { turn: self.turn });
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            turn: self.turn,
            phase: self.phase,
            outcome: self.outcome,
            field: self.field.clone(),
            sides: self.sides.each_ref().map(SideSnapshot::of),
        }
    }
}

/// Read-only summary of the match, suitable for reports
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MatchSnapshot {
    pub turn: u32,
    pub phase: MatchPhase,
    pub outcome: MatchOutcome,
    pub field: FieldState,
    pub sides: [SideSnapshot; 2],
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SideSnapshot {
    pub id: SideId,
    pub name: String,
    pub active: Option<String>,
    pub members: Vec<MemberSnapshot>,
    pub fainted: Vec<String>,
    pub special_uses_remaining: u8,
}

impl SideSnapshot {
    fn of(side: &Side) -> Self {
        let members = if side.entry.is_empty() {
            side.pool
                .iter()
                .filter_map(|&i| side.party.get(i))
                .map(|c| MemberSnapshot::of(c, false, c.is_fainted()))
                .collect()
        } else {
            side.entry
                .iter()
                .enumerate()
                .map(|(i, c)| MemberSnapshot::of(c, side.active == Some(i), side.is_fainted(i)))
                .collect()
        };

        Self {
            id: side.id,
            name: side.name.clone(),
            active: side.active_combatant().map(|c| c.species.clone()),
            members,
            fainted: side.fainted.clone(),
            special_uses_remaining: side.special_uses_remaining,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MemberSnapshot {
    pub id: String,
    pub species: String,
    pub hp: u32,
    pub max_hp: u32,
    pub status: Option<Status>,
    pub active: bool,
    pub fainted: bool,
    pub resources_used: Vec<SpecialResource>,
}

impl MemberSnapshot {
    fn of(c: &crate::types::Combatant, active: bool, fainted: bool) -> Self {
        Self {
            id: c.id.clone(),
            species: c.species.clone(),
            hp: c.hp,
            max_hp: c.max_hp,
            status: c.status,
            active,
            fainted,
            resources_used: c.resources_used.iter().copied().collect(),
        }
    }
}

mod tests;

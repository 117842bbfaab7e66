//! Decision translation
//!
//! Turns match state into a [`DecisionRequest`](arbiter_protocol::DecisionRequest)
//! for one side, and turns whatever the agent said back into a legal
//! [`Choice`]. Interpretation never fails: unusable replies are clamped,
//! scraped for an index, or replaced by a fallback, and the resulting
//! [`Decision`] records which of those happened.

mod interpret;
mod view;

use std::fmt;

use rand::Rng;
use rand::seq::SliceRandom;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use arbiter_protocol::{SideId, TaskKind};

use crate::action::{Action, default_action};
use crate::machine::Match;

pub use interpret::{interpret_forced, interpret_move, interpret_preview, interpret_reply};
pub use view::{battle_view, build_request, preview_view};

/// How a decision was arrived at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum DecisionOrigin {
    /// The agent's reply, used as given
    Agent,
    /// Move index was off by one and clamped into range
    Clamped,
    /// Reply was not valid JSON; the choice was scraped from the raw text
    Extracted,
    /// Reply unusable or missing; a fallback was substituted
    Fallback,
    /// Agent bypassed by stall recovery
    StallDefault,
}

impl DecisionOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionOrigin::Agent => "agent",
            DecisionOrigin::Clamped => "clamped",
            DecisionOrigin::Extracted => "extracted",
            DecisionOrigin::Fallback => "fallback",
            DecisionOrigin::StallDefault => "stall default",
        }
    }
}

impl fmt::Display for DecisionOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a side decided, in engine terms
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Choice {
    /// 0-based pool positions, in the chosen order
    TeamOrder(Vec<usize>),
    Action(Action),
    /// 0-based entry index to send in
    SwitchIn(usize),
}

/// A validated choice plus how it was obtained
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Decision {
    pub side: SideId,
    pub task: TaskKind,
    pub choice: Choice,
    /// The agent's justification (empty when there was none)
    pub justification: String,
    pub origin: DecisionOrigin,
    /// Why the reply was not used as given
    pub reason: Option<String>,
}

impl Decision {
    pub(crate) fn new(side: SideId, task: TaskKind, choice: Choice, origin: DecisionOrigin) -> Self {
        Self {
            side,
            task,
            choice,
            justification: String::new(),
            origin,
            reason: None,
        }
    }

    pub(crate) fn with_justification(mut self, justification: impl Into<String>) -> Self {
        self.justification = justification.into();
        self
    }

    pub(crate) fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Anything other than the agent's own, unmodified choice
    pub fn is_degraded(&self) -> bool {
        self.origin != DecisionOrigin::Agent
    }

    pub fn action(&self) -> Option<Action> {
        match self.choice {
            Choice::Action(action) => Some(action),
            _ => None,
        }
    }
}

/// Identity order over a side's pool
pub(crate) fn identity_order(pool_len: usize) -> Vec<usize> {
    (0..pool_len).collect()
}

/// A uniformly random usable move (Struggle or Pass when there is none)
pub fn random_action<R: Rng + ?Sized>(m: &Match, side: SideId, rng: &mut R) -> Action {
    let side_state = m.side(side);
    let Some(active) = side_state.active_combatant() else {
        return Action::Pass;
    };

    let usable: Vec<usize> = active.usable_moves().collect();
    usable
        .choose(rng)
        .map(|&i| Action::use_move(i))
        .unwrap_or(Action::Struggle)
}

/// Substitute for a reply that never arrived (timeout, transport error)
pub fn fallback_decision<R: Rng + ?Sized>(
    m: &Match,
    side: SideId,
    task: TaskKind,
    reason: impl Into<String>,
    rng: &mut R,
) -> Decision {
    let choice = match task {
        TaskKind::TeamPreview => Choice::TeamOrder(identity_order(m.side(side).pool.len())),
        TaskKind::MoveOrSwitch => Choice::Action(random_action(m, side, rng)),
        TaskKind::ForcedSwitch => Choice::SwitchIn(first_switch(m, side)),
    };
    Decision::new(side, task, choice, DecisionOrigin::Fallback).with_reason(reason)
}

/// Deterministic default used by stall recovery; the agent is not consulted
pub fn default_decision(m: &Match, side: SideId, task: TaskKind) -> Decision {
    let choice = match task {
        TaskKind::TeamPreview => Choice::TeamOrder(identity_order(m.side(side).pool.len())),
        TaskKind::MoveOrSwitch => Choice::Action(default_action(m.side(side))),
        TaskKind::ForcedSwitch => Choice::SwitchIn(first_switch(m, side)),
    };
    Decision::new(side, task, choice, DecisionOrigin::StallDefault).with_reason("stall recovery")
}

pub(crate) fn first_switch(m: &Match, side: SideId) -> usize {
    m.side(side).switch_options().first().copied().unwrap_or(0)
}

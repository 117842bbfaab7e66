//! Turn resolution
//!
//! A turn moves through four phases:
//!
//! ```text
//! AwaitingActions ──> Ordering ──> Executing ──> Settled
//!   validate both       switches     each side      party synced,
//!   actions, drop       first, then  acts in order  turn counter
//!   denied resources    speed                       advanced
//! ```
//!
//! Illegal actions are never executed. They are replaced by the side's
//! default action and an [`ActionRejected`](crate::log::MatchEvent::ActionRejected)
//! entry is logged.

mod execute;
mod order;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use arbiter_protocol::SideId;

use crate::action::{Action, check_resource, default_action};
use crate::log::MatchEvent;
use crate::machine::Match;
use crate::oracle::MechanicsOracle;

pub use order::{SpeedCheck, determine_order};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TurnPhase {
    AwaitingActions,
    Ordering,
    Executing,
    Settled,
}

/// What happened during one resolved turn
#[derive(Debug, Clone, PartialEq)]
pub struct TurnReport {
    /// The turn that was resolved
    pub turn: u32,
    /// Actions as executed, after any substitution
    pub actions: [Action; 2],
    pub order: [SideId; 2],
    pub speed: SpeedCheck,
    /// Sides whose active combatant fainted, in fainting order
    pub fainted: Vec<SideId>,
    pub phase: TurnPhase,
}

fn enter(turn: u32, phase: TurnPhase) -> TurnPhase {
    tracing::trace!(turn, ?phase, "turn phase");
    phase
}

/// Resolve one turn in place
///
/// Does not check whether the match has ended; [`Match::resolve_turn`]
/// wraps this with the phase checks and the end-of-match test.
pub fn resolve_turn(m: &mut Match, oracle: &dyn MechanicsOracle, actions: [Action; 2]) -> TurnReport {
    let turn = m.turn;

    enter(turn, TurnPhase::AwaitingActions);
    let [p1, p2] = actions;
    let actions = [accept(m, SideId::P1, p1), accept(m, SideId::P2, p2)];

    enter(turn, TurnPhase::Ordering);
    let (order, speed) = determine_order(&m.sides, &actions, m.rules.speed_tie);
    m.log.push(
        turn,
        MatchEvent::SpeedCheck {
            first: speed.first,
            p1_speed: speed.p1_speed,
            p2_speed: speed.p2_speed,
            tie: speed.tie,
        },
    );

    enter(turn, TurnPhase::Executing);
    let mut fainted = Vec::new();
    for side in order {
        execute::execute_action(m, oracle, side, actions[side.index()], &mut fainted);
    }

    let phase = enter(turn, TurnPhase::Settled);
    for side in m.sides.iter_mut() {
        side.sync_party();
    }
    m.turn += 1;

    TurnReport {
        turn,
        actions,
        order,
        speed,
        fainted,
        phase,
    }
}

/// Validate an action, substituting the default when it is illegal
fn accept(m: &mut Match, side: SideId, action: Action) -> Action {
    let turn = m.turn;
    let s = &m.sides[side.index()];

    let action = match action.validate(s) {
        Ok(()) => action,
        Err(e) => {
            let replacement = default_action(s);
            tracing::warn!(%side, %action, %replacement, error = %e, "action rejected");
            m.log.push(
                turn,
                MatchEvent::ActionRejected {
                    side,
                    action: action.to_string(),
                    reason: e.to_string(),
                },
            );
            replacement
        }
    };

    match action.special() {
        Some(resource) => match check_resource(s, &m.rules, resource) {
            Ok(()) => action,
            Err(denial) => {
                tracing::debug!(%side, %resource, reason = %denial, "special resource denied");
                m.log.push(
                    turn,
                    MatchEvent::ResourceDenied {
                        side,
                        resource,
                        reason: denial.to_string(),
                    },
                );
                action.without_special()
            }
        },
        None => action,
    }
}

mod tests;

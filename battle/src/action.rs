//! Per-turn actions and legality checks

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use arbiter_protocol::SpecialResource;

use crate::format::FormatRules;
use crate::types::Side;

/// A side's choice for one turn
///
/// Indices are 0-based: `index` into the active combatant's moves,
/// `target` into the side's entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Action {
    Move {
        index: usize,
        special: Option<SpecialResource>,
    },
    Switch {
        target: usize,
    },
    /// Forced when no move has uses left
    Struggle,
    /// Nothing to do (no combatant left to act)
    Pass,
}

impl Action {
    pub fn use_move(index: usize) -> Self {
        Action::Move {
            index,
            special: None,
        }
    }

    pub fn is_switch(&self) -> bool {
        matches!(self, Action::Switch { .. })
    }

    pub fn special(&self) -> Option<SpecialResource> {
        match self {
            Action::Move { special, .. } => *special,
            _ => None,
        }
    }

    /// The same action without a special resource attached
    pub fn without_special(self) -> Self {
        match self {
            Action::Move { index, .. } => Action::use_move(index),
            other => other,
        }
    }

    /// Check this action against the side's current state
    pub fn validate(&self, side: &Side) -> Result<(), ActionError> {
        match *self {
            Action::Pass => {
                if side.active.is_some() {
                    Err(ActionError::PassWithActive)
                } else {
                    Ok(())
                }
            }
            Action::Struggle => {
                let active = side.active_combatant().ok_or(ActionError::NoActive)?;
                if active.has_usable_move() {
                    Err(ActionError::StruggleWithMoves)
                } else {
                    Ok(())
                }
            }
            Action::Move { index, .. } => {
                let active = side.active_combatant().ok_or(ActionError::NoActive)?;
                let slot = active
                    .moves
                    .get(index)
                    .ok_or(ActionError::MoveOutOfRange(index + 1))?;
                if slot.is_usable() {
                    Ok(())
                } else {
                    Err(ActionError::MoveUnusable(slot.name.clone()))
                }
            }
            Action::Switch { target } => {
                if target >= side.entry.len() {
                    Err(ActionError::SwitchOutOfRange(target + 1))
                } else if side.active == Some(target) {
                    Err(ActionError::SwitchToActive)
                } else if side.is_fainted(target) {
                    Err(ActionError::SwitchToFainted(side.entry[target].id.clone()))
                } else {
                    Ok(())
                }
            }
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Move {
                index,
                special: Some(res),
            } => write!(f, "move {} +{}", index + 1, res),
            Action::Move { index, .. } => write!(f, "move {}", index + 1),
            Action::Switch { target } => write!(f, "switch {}", target + 1),
            Action::Struggle => f.write_str("struggle"),
            Action::Pass => f.write_str("pass"),
        }
    }
}

/// Why an action cannot be executed as chosen
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("No active combatant")]
    NoActive,

    #[error("Move {0} does not exist")]
    MoveOutOfRange(usize),

    #[error("Move {0} has no uses left or is disabled")]
    MoveUnusable(String),

    #[error("Struggle chosen while other moves are usable")]
    StruggleWithMoves,

    #[error("Switch target {0} is not in the entry")]
    SwitchOutOfRange(usize),

    #[error("Switch target is already active")]
    SwitchToActive,

    #[error("Switch target {0} has fainted")]
    SwitchToFainted(String),

    #[error("Pass chosen while a combatant is active")]
    PassWithActive,
}

/// Why a special resource cannot be activated
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResourceDenial {
    #[error("{0} is not allowed in this format")]
    NotAllowed(SpecialResource),

    #[error("no special resource uses left")]
    BudgetExhausted,

    #[error("{0} was already used by this combatant")]
    AlreadyUsed(SpecialResource),

    #[error("no tera type in build")]
    NoTeraType,

    #[error("no active combatant")]
    NoActive,
}

/// Check whether `side` may activate `resource` this turn
pub fn check_resource(
    side: &Side,
    rules: &FormatRules,
    resource: SpecialResource,
) -> Result<(), ResourceDenial> {
    if !rules.allows(resource) {
        return Err(ResourceDenial::NotAllowed(resource));
    }
    if side.special_uses_remaining == 0 {
        return Err(ResourceDenial::BudgetExhausted);
    }

    let active = side.active_combatant().ok_or(ResourceDenial::NoActive)?;
    if resource.is_permanent() && active.has_used(resource) {
        return Err(ResourceDenial::AlreadyUsed(resource));
    }
    if active.dynamaxed && resource == SpecialResource::Dynamax {
        return Err(ResourceDenial::AlreadyUsed(resource));
    }
    if resource == SpecialResource::Terastallize && active.build.tera_type.is_none() {
        return Err(ResourceDenial::NoTeraType);
    }
    Ok(())
}

/// Resources `side` could activate right now
pub fn usable_resources(side: &Side, rules: &FormatRules) -> Vec<SpecialResource> {
    SpecialResource::ALL
        .into_iter()
        .filter(|r| check_resource(side, rules, *r).is_ok())
        .collect()
}

/// The default legal action: first usable move, Struggle, or Pass
pub fn default_action(side: &Side) -> Action {
    match side.active_combatant() {
        Some(active) => active
            .usable_moves()
            .next()
            .map(Action::use_move)
            .unwrap_or(Action::Struggle),
        None => Action::Pass,
    }
}

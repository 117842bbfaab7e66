//! Mechanics oracle adapter
//!
//! Damage and move effects are computed by an external collaborator behind
//! [`MechanicsOracle`]. [`resolve_action`] is the only way the match engine
//! talks to it: it marshals the two combatants and the chosen move, then
//! turns whatever comes back (including errors, panics and non-finite
//! numbers) into a well-formed [`OracleOutcome`]. It never touches match
//! state.

mod chart;

use std::panic::{AssertUnwindSafe, catch_unwind};

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use arbiter_protocol::SpecialResource;

use crate::types::{Combatant, FieldState, MoveSlot, Stat, Status};

pub use chart::ChartOracle;

/// Everything the oracle gets to see for one move
#[derive(Debug, Clone, Copy)]
pub struct OracleRequest<'a> {
    pub attacker: &'a Combatant,
    pub defender: &'a Combatant,
    pub move_slot: &'a MoveSlot,
    /// Resource activated together with this move
    pub special: Option<SpecialResource>,
    pub field: &'a FieldState,
    pub generation: u8,
}

/// Damage as reported by the oracle
#[derive(Debug, Clone, PartialEq)]
pub enum Damage {
    Single(f64),
    /// Possible damage values; the adapter uses their mean
    Rolls(Vec<f64>),
}

/// Who a side effect applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EffectTarget {
    Attacker,
    Defender,
}

/// Secondary effects of a move
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SideEffect {
    Status { target: EffectTarget, status: Status },
    Heal { target: EffectTarget, amount: u32 },
    Boost { target: EffectTarget, stat: Stat, stages: i8 },
    /// Damage to the attacker
    Recoil { amount: u32 },
}

/// Raw oracle answer
#[derive(Debug, Clone, PartialEq)]
pub struct OracleResponse {
    pub damage: Damage,
    pub effects: Vec<SideEffect>,
    pub success: bool,
    /// Type effectiveness, when the oracle reports it
    pub effectiveness: Option<f32>,
}

impl OracleResponse {
    pub fn hit(damage: Damage) -> Self {
        Self {
            damage,
            effects: Vec::new(),
            success: true,
            effectiveness: None,
        }
    }

    pub fn miss() -> Self {
        Self {
            damage: Damage::Single(0.0),
            effects: Vec::new(),
            success: false,
            effectiveness: None,
        }
    }

    pub fn with_effect(mut self, effect: SideEffect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effectiveness(mut self, multiplier: f32) -> Self {
        self.effectiveness = Some(multiplier);
        self
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OracleError {
    #[error("Unknown move: {0}")]
    UnknownMove(String),

    #[error("Unsupported generation: {0}")]
    UnsupportedGeneration(u8),

    #[error("Oracle failure: {0}")]
    Failed(String),
}

/// External combat-math collaborator
pub trait MechanicsOracle: Send + Sync {
    fn calculate(&self, request: &OracleRequest<'_>) -> Result<OracleResponse, OracleError>;
}

/// Sanitized result used by the resolver
#[derive(Debug, Clone, PartialEq)]
pub struct OracleOutcome {
    /// Whole HP to subtract from the defender
    pub damage: u32,
    pub effects: Vec<SideEffect>,
    pub success: bool,
    pub effectiveness: Option<f32>,
    /// Set when the oracle failed and this outcome is the zero-damage fallback
    pub fault: Option<String>,
}

impl OracleOutcome {
    fn fault(reason: impl Into<String>) -> Self {
        Self {
            damage: 0,
            effects: Vec::new(),
            success: false,
            effectiveness: None,
            fault: Some(reason.into()),
        }
    }
}

/// Ask the oracle for the outcome of one move
///
/// Never fails: errors, panics, empty roll lists and non-finite or negative
/// damage all become a zero-damage, no-effect outcome with `fault` set.
pub fn resolve_action(oracle: &dyn MechanicsOracle, request: &OracleRequest<'_>) -> OracleOutcome {
    let response = match catch_unwind(AssertUnwindSafe(|| oracle.calculate(request))) {
        Ok(Ok(response)) => response,
        Ok(Err(e)) => {
            tracing::warn!(move_name = %request.move_slot.name, error = %e, "oracle returned an error");
            return OracleOutcome::fault(e.to_string());
        }
        Err(_) => {
            tracing::warn!(move_name = %request.move_slot.name, "oracle panicked");
            return OracleOutcome::fault("oracle panicked");
        }
    };

    let damage = match mean_damage(&response.damage) {
        Some(d) => d,
        None => {
            tracing::warn!(
                move_name = %request.move_slot.name,
                damage = ?response.damage,
                "oracle returned non-numeric damage"
            );
            return OracleOutcome::fault(format!("non-numeric damage {:?}", response.damage));
        }
    };

    OracleOutcome {
        damage,
        effects: response.effects,
        success: response.success,
        effectiveness: response.effectiveness.filter(|e| e.is_finite()),
        fault: None,
    }
}

/// Mean of the reported damage, rounded half-up to whole HP
fn mean_damage(damage: &Damage) -> Option<u32> {
    let value = match damage {
        Damage::Single(v) => *v,
        Damage::Rolls(rolls) if rolls.is_empty() => return None,
        Damage::Rolls(rolls) => rolls.iter().sum::<f64>() / rolls.len() as f64,
    };

    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Some((value + 0.5).floor().min(u32::MAX as f64) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MoveCategory, StatBlock, Type};

    struct Fixed(Result<OracleResponse, OracleError>);

    impl MechanicsOracle for Fixed {
        fn calculate(&self, _: &OracleRequest<'_>) -> Result<OracleResponse, OracleError> {
            self.0.clone()
        }
    }

    struct Panicking;

    impl MechanicsOracle for Panicking {
        fn calculate(&self, _: &OracleRequest<'_>) -> Result<OracleResponse, OracleError> {
            panic!("backend crashed")
        }
    }

    fn run(oracle: &dyn MechanicsOracle) -> OracleOutcome {
        let a = Combatant::new("a", "Pikachu", 50, StatBlock::uniform(60));
        let d = Combatant::new("d", "Eevee", 50, StatBlock::uniform(60));
        let slot = MoveSlot::new("Thunderbolt", Type::Electric, MoveCategory::Special, 90, 24);
        let field = FieldState::new();
        resolve_action(
            oracle,
            &OracleRequest {
                attacker: &a,
                defender: &d,
                move_slot: &slot,
                special: None,
                field: &field,
                generation: 9,
            },
        )
    }

    #[test]
    fn test_rolls_use_rounded_mean() {
        let outcome = run(&Fixed(Ok(OracleResponse::hit(Damage::Rolls(vec![
            10.0, 11.0,
        ])))));
        assert_eq!(outcome.damage, 11);
        assert!(outcome.success);
        assert!(outcome.fault.is_none());

        let outcome = run(&Fixed(Ok(OracleResponse::hit(Damage::Single(12.49)))));
        assert_eq!(outcome.damage, 12);
    }

    #[test]
    fn test_error_becomes_zero_damage() {
        let outcome = run(&Fixed(Err(OracleError::UnknownMove("Thunderbolt".into()))));
        assert_eq!(outcome.damage, 0);
        assert!(!outcome.success);
        assert!(outcome.fault.is_some());
    }

    #[test]
    fn test_non_numeric_damage_is_a_fault() {
        for bad in [
            Damage::Single(f64::NAN),
            Damage::Single(f64::INFINITY),
            Damage::Single(-3.0),
            Damage::Rolls(Vec::new()),
        ] {
            let outcome = run(&Fixed(Ok(OracleResponse::hit(bad).with_effect(
                SideEffect::Recoil { amount: 5 },
            ))));
            assert_eq!(outcome.damage, 0);
            assert!(!outcome.success);
            assert!(outcome.effects.is_empty());
            assert!(outcome.fault.is_some());
        }
    }

    #[test]
    fn test_panic_is_contained() {
        let outcome = run(&Panicking);
        assert_eq!(outcome.damage, 0);
        assert_eq!(outcome.fault.as_deref(), Some("oracle panicked"));
    }
}

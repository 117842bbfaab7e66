//! Shared test fixtures

use arbiter_protocol::SideId;

use crate::format::FormatRules;
use crate::machine::{Match, SideSetup, create_match};
use crate::oracle::{Damage, MechanicsOracle, OracleError, OracleRequest, OracleResponse, SideEffect};
use crate::types::{Combatant, MoveCategory, MoveSlot, StatBlock, Type};

/// Deals the same damage on every hit
pub(crate) struct FixedOracle {
    pub damage: f64,
    pub effects: Vec<SideEffect>,
}

impl FixedOracle {
    pub fn new(damage: f64) -> Self {
        Self {
            damage,
            effects: Vec::new(),
        }
    }

    pub fn with_effect(mut self, effect: SideEffect) -> Self {
        self.effects.push(effect);
        self
    }
}

impl MechanicsOracle for FixedOracle {
    fn calculate(&self, _req: &OracleRequest<'_>) -> Result<OracleResponse, OracleError> {
        let mut response = OracleResponse::hit(Damage::Single(self.damage));
        response.effects = self.effects.clone();
        Ok(response)
    }
}

pub(crate) struct PanickingOracle;

impl MechanicsOracle for PanickingOracle {
    fn calculate(&self, _req: &OracleRequest<'_>) -> Result<OracleResponse, OracleError> {
        panic!("simulator crashed")
    }
}

pub(crate) fn tackle() -> MoveSlot {
    MoveSlot::new("Tackle", Type::Normal, MoveCategory::Physical, 40, 35)
}

/// Level 50, 150 max HP, one move
pub(crate) fn mon(id: &str, base_speed: u32) -> Combatant {
    Combatant::new(id, id, 50, StatBlock::new(75, 80, 80, 80, 80, base_speed))
        .with_types(vec![Type::Normal])
        .with_moves(vec![tackle()])
}

pub(crate) fn one_vs_one() -> FormatRules {
    FormatRules::new()
        .with_entry_format(crate::format::EntryFormat::OneVsOne)
        .with_team_preview(false)
}

/// A match already in the turn loop
pub(crate) fn started(p1: Vec<Combatant>, p2: Vec<Combatant>, rules: FormatRules) -> Match {
    let mut m = create_match(SideSetup::new("alpha", p1), SideSetup::new("beta", p2), rules).unwrap();
    m.start();
    if m.phase() == crate::machine::MatchPhase::TeamPreview {
        let orders = SideId::BOTH.map(|s| (0..m.side(s).pool.len()).collect());
        m.apply_team_order(orders).unwrap();
    }
    m
}

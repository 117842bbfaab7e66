//! Reference oracle built on the type chart
//!
//! A deliberately small damage model so the engine can run end to end
//! without an external simulator:
//!
//! ```text
//! base   = ((2L/5 + 2) * P * A / D) / 50 + 2
//! damage = floor(base * roll * STAB * effectiveness * burn * weather),  roll in 0.85..=1.00
//! ```
//!
//! Accuracy, critical hits and secondary chances are ignored, so the same
//! inputs always give the same sixteen rolls.

use arbiter_protocol::SpecialResource;

use super::{
    Damage, EffectTarget, MechanicsOracle, OracleError, OracleRequest, OracleResponse, SideEffect,
};
use crate::query::is_immune_to;
use crate::types::{MoveCategory, Stat, Status, Type, Weather};

/// Type-chart damage calculator with a handful of well-known move effects
#[derive(Debug, Clone, Copy, Default)]
pub struct ChartOracle;

impl ChartOracle {
    pub fn new() -> Self {
        Self
    }
}

impl MechanicsOracle for ChartOracle {
    fn calculate(&self, req: &OracleRequest<'_>) -> Result<OracleResponse, OracleError> {
        if !(1..=9).contains(&req.generation) {
            return Err(OracleError::UnsupportedGeneration(req.generation));
        }

        if req.move_slot.is_status() {
            return Ok(status_move(req));
        }

        let defending = req.defender.defending_types();
        let effectiveness = match req.move_slot.move_type {
            Some(t) if is_immune_to(&defending, t) => {
                return Ok(OracleResponse::miss().with_effectiveness(0.0));
            }
            Some(t) => t.effectiveness_multi(&defending),
            None => 1.0,
        };

        let (atk_stat, def_stat) = match req.move_slot.category {
            MoveCategory::Special => (Stat::Spa, Stat::Spd),
            _ => (Stat::Atk, Stat::Def),
        };
        let attack = req.attacker.effective_stat(atk_stat).max(1) as f64;
        let defense = req.defender.effective_stat(def_stat).max(1) as f64;

        let mut power = req.move_slot.power as f64;
        if req.special == Some(SpecialResource::ZMove) {
            power *= 1.5;
        }

        let level = req.attacker.level as f64;
        let base = ((2.0 * level / 5.0 + 2.0) * power * attack / defense) / 50.0 + 2.0;

        let stab = match req.move_slot.move_type {
            Some(t) if req.attacker.has_stab(t) => 1.5,
            _ => 1.0,
        };
        let burn = if atk_stat == Stat::Atk && req.attacker.status == Some(Status::Burn) {
            0.5
        } else {
            1.0
        };
        let modifier = stab * effectiveness as f64 * burn * weather_modifier(req);

        let rolls: Vec<f64> = (85..=100)
            .map(|r| (base * r as f64 / 100.0 * modifier).floor().max(1.0))
            .collect();

        let expected = rolls.iter().sum::<f64>() / rolls.len() as f64;
        let dealt = (expected.round() as u32).min(req.defender.hp);

        let mut response = OracleResponse::hit(Damage::Rolls(rolls)).with_effectiveness(effectiveness);
        for effect in damaging_effects(req, dealt) {
            response = response.with_effect(effect);
        }
        Ok(response)
    }
}

/// Rain and sun boost one of water/fire and weaken the other
fn weather_modifier(req: &OracleRequest<'_>) -> f64 {
    match (req.field.weather, req.move_slot.move_type) {
        (Some(Weather::Rain), Some(Type::Water)) | (Some(Weather::Sun), Some(Type::Fire)) => 1.5,
        (Some(Weather::Rain), Some(Type::Fire)) | (Some(Weather::Sun), Some(Type::Water)) => 0.5,
        _ => 1.0,
    }
}

fn status_move(req: &OracleRequest<'_>) -> OracleResponse {
    let boost = |stat, stages| SideEffect::Boost {
        target: EffectTarget::Attacker,
        stat,
        stages,
    };
    let inflict = |status| SideEffect::Status {
        target: EffectTarget::Defender,
        status,
    };

    let effects = match req.move_slot.name.to_ascii_lowercase().as_str() {
        "swords dance" => vec![boost(Stat::Atk, 2)],
        "nasty plot" => vec![boost(Stat::Spa, 2)],
        "agility" => vec![boost(Stat::Spe, 2)],
        "dragon dance" => vec![boost(Stat::Atk, 1), boost(Stat::Spe, 1)],
        "calm mind" => vec![boost(Stat::Spa, 1), boost(Stat::Spd, 1)],
        "bulk up" => vec![boost(Stat::Atk, 1), boost(Stat::Def, 1)],
        "recover" | "roost" | "slack off" | "soft-boiled" => vec![SideEffect::Heal {
            target: EffectTarget::Attacker,
            amount: req.attacker.max_hp / 2,
        }],
        "thunder wave" => {
            if is_immune_to(&req.defender.defending_types(), Type::Electric) {
                return OracleResponse::miss().with_effectiveness(0.0);
            }
            vec![inflict(Status::Paralysis)]
        }
        "will-o-wisp" => vec![inflict(Status::Burn)],
        "toxic" => vec![inflict(Status::BadPoison)],
        "spore" | "sleep powder" | "hypnosis" => vec![inflict(Status::Sleep)],
        _ => Vec::new(),
    };

    let mut response = OracleResponse::hit(Damage::Single(0.0));
    response.effects = effects;
    response
}

/// Recoil and drain, proportional to the damage actually dealt
fn damaging_effects(req: &OracleRequest<'_>, dealt: u32) -> Vec<SideEffect> {
    if req.move_slot.is_struggle() {
        return vec![SideEffect::Recoil {
            amount: (req.attacker.max_hp / 4).max(1),
        }];
    }

    let name = req.move_slot.name.to_ascii_lowercase();
    match name.as_str() {
        "brave bird" | "flare blitz" | "double-edge" | "wood hammer" | "wave crash" => {
            vec![SideEffect::Recoil { amount: dealt / 3 }]
        }
        "head smash" => vec![SideEffect::Recoil { amount: dealt / 2 }],
        "giga drain" | "drain punch" | "horn leech" => vec![SideEffect::Heal {
            target: EffectTarget::Attacker,
            amount: dealt / 2,
        }],
        _ => Vec::new(),
    }
}

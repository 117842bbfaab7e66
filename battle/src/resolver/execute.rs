//! Executing one side's action

use arbiter_protocol::{SideId, SpecialResource};

use crate::action::{Action, check_resource};
use crate::log::MatchEvent;
use crate::machine::Match;
use crate::oracle::{EffectTarget, MechanicsOracle, OracleRequest, SideEffect, resolve_action};
use crate::types::MoveSlot;

/// Execute `action` for `side`, pushing sides that fainted onto `fainted`
pub(crate) fn execute_action(
    m: &mut Match,
    oracle: &dyn MechanicsOracle,
    side: SideId,
    action: Action,
    fainted: &mut Vec<SideId>,
) {
    match action {
        Action::Pass => {}
        Action::Switch { target } => execute_switch(m, side, target),
        Action::Move { .. } | Action::Struggle => execute_move(m, oracle, side, action, fainted),
    }
}

fn execute_switch(m: &mut Match, side: SideId, target: usize) {
    let turn = m.turn;
    let s = &mut m.sides[side.index()];

    if let Err(e) = (Action::Switch { target }).validate(s) {
        m.log.push(
            turn,
            MatchEvent::ActionRejected {
                side,
                action: format!("switch {}", target + 1),
                reason: e.to_string(),
            },
        );
        return;
    }

    let from = s.active_combatant().map(|c| c.species.clone());
    s.set_active(target);
    let to = s.entry[target].species.clone();

    let event = match from {
        Some(from) => MatchEvent::SwitchIn { side, from, to },
        None => MatchEvent::SendOut { side, species: to },
    };
    m.log.push(turn, event);
}

fn execute_move(
    m: &mut Match,
    oracle: &dyn MechanicsOracle,
    side: SideId,
    action: Action,
    fainted: &mut Vec<SideId>,
) {
    let turn = m.turn;
    let target = side.opponent();

    // The attacker may have fainted earlier in the turn
    let Some(attacker) = m.sides[side.index()].active_combatant() else {
        return;
    };
    let species = attacker.species.clone();
    let (move_slot, special) = match action {
        Action::Move { index, special } => match attacker.moves.get(index) {
            Some(slot) if slot.is_usable() => (slot.clone(), special),
            _ => (MoveSlot::struggle(), None),
        },
        _ => (MoveSlot::struggle(), None),
    };

    let special = special.filter(|&resource| activate(m, side, resource));

    if let Action::Move { index, .. } = action {
        if let Some(slot) = m.sides[side.index()]
            .active_combatant_mut()
            .and_then(|c| c.moves.get_mut(index))
        {
            slot.consume_pp();
        }
    }
    m.log.push(
        turn,
        MatchEvent::MoveUsed {
            side,
            species: species.clone(),
            move_name: move_slot.name.clone(),
        },
    );

    let outcome = {
        let (Some(attacker), Some(defender)) = (
            m.sides[side.index()].active_combatant(),
            m.sides[target.index()].active_combatant(),
        ) else {
            m.log.push(
                turn,
                MatchEvent::MoveFailed {
                    side,
                    species,
                    move_name: move_slot.name,
                    reason: "there was no target".to_string(),
                },
            );
            return;
        };

        resolve_action(
            oracle,
            &OracleRequest {
                attacker,
                defender,
                move_slot: &move_slot,
                special,
                field: &m.field,
                generation: m.rules.generation,
            },
        )
    };

    if let Some(reason) = outcome.fault {
        m.log.push(
            turn,
            MatchEvent::OracleFault {
                side,
                move_name: move_slot.name,
                reason,
            },
        );
    } else if !outcome.success {
        let reason = if outcome.effectiveness == Some(0.0) {
            "it had no effect"
        } else {
            "it failed"
        };
        m.log.push(
            turn,
            MatchEvent::MoveFailed {
                side,
                species,
                move_name: move_slot.name,
                reason: reason.to_string(),
            },
        );
    } else {
        if outcome.damage > 0 {
            if let Some(multiplier) = outcome.effectiveness.filter(|e| *e != 1.0) {
                m.log.push(
                    turn,
                    MatchEvent::Effectiveness {
                        side: target,
                        multiplier,
                    },
                );
            }
            if let Some(defender) = m.sides[target.index()].active_combatant_mut() {
                let amount = defender.take_damage(outcome.damage);
                let event = MatchEvent::Damage {
                    side: target,
                    species: defender.species.clone(),
                    amount,
                    hp: defender.hp,
                    max_hp: defender.max_hp,
                };
                m.log.push(turn, event);
            }
        }

        for effect in outcome.effects {
            apply_effect(m, side, effect);
        }
    }

    check_faint(m, target, fainted);
    check_faint(m, side, fainted);
}

/// Spend the side's budget on `resource`; false when it cannot be used
fn activate(m: &mut Match, side: SideId, resource: SpecialResource) -> bool {
    let turn = m.turn;
    if let Err(denial) = check_resource(&m.sides[side.index()], &m.rules, resource) {
        m.log.push(
            turn,
            MatchEvent::ResourceDenied {
                side,
                resource,
                reason: denial.to_string(),
            },
        );
        return false;
    }

    let s = &mut m.sides[side.index()];
    s.special_uses_remaining = s.special_uses_remaining.saturating_sub(1);
    let Some(active) = s.active_combatant_mut() else {
        return false;
    };
    active.resources_used.insert(resource);
    if resource == SpecialResource::Dynamax {
        active.dynamaxed = true;
    }

    tracing::info!(%side, species = %active.species, %resource, "special resource activated");
    let event = MatchEvent::ResourceActivated {
        side,
        species: active.species.clone(),
        resource,
    };
    m.log.push(turn, event);
    true
}

fn apply_effect(m: &mut Match, attacker_side: SideId, effect: SideEffect) {
    let turn = m.turn;
    let side_of = |target: EffectTarget| match target {
        EffectTarget::Attacker => attacker_side,
        EffectTarget::Defender => attacker_side.opponent(),
    };

    let (side, target) = match &effect {
        SideEffect::Status { target, .. }
        | SideEffect::Heal { target, .. }
        | SideEffect::Boost { target, .. } => (side_of(*target), *target),
        SideEffect::Recoil { .. } => (attacker_side, EffectTarget::Attacker),
    };
    let Some(c) = m.sides[side.index()].active_combatant_mut() else {
        return;
    };
    if c.is_fainted() {
        return;
    }
    let species = c.species.clone();

    let event = match effect {
        SideEffect::Status { status, .. } => {
            if c.status.is_some() {
                return;
            }
            c.status = Some(status);
            MatchEvent::StatusInflicted {
                side,
                species,
                status,
            }
        }
        SideEffect::Heal { amount, .. } => {
            let amount = c.heal(amount);
            if amount == 0 {
                return;
            }
            MatchEvent::Heal {
                side,
                species,
                amount,
                hp: c.hp,
                max_hp: c.max_hp,
            }
        }
        SideEffect::Boost { stat, stages, .. } => {
            let change = c.boosts.boost(stat, stages);
            if change == 0 {
                return;
            }
            MatchEvent::StatChange {
                side,
                species,
                stat,
                change,
            }
        }
        SideEffect::Recoil { amount } => {
            let amount = c.take_damage(amount);
            if amount == 0 {
                return;
            }
            MatchEvent::Recoil {
                side,
                species,
                amount,
            }
        }
    };

    tracing::trace!(effect_target = ?target, event = %event, "side effect applied");
    m.log.push(turn, event);
}

fn check_faint(m: &mut Match, side: SideId, fainted: &mut Vec<SideId>) {
    let turn = m.turn;
    let s = &mut m.sides[side.index()];
    let Some(species) = s
        .active_combatant()
        .filter(|c| c.is_fainted())
        .map(|c| c.species.clone())
    else {
        return;
    };

    s.faint_active();
    tracing::debug!(%side, %species, "fainted");
    m.log.push(turn, MatchEvent::Fainted { side, species });
    if !fainted.contains(&side) {
        fainted.push(side);
    }
}

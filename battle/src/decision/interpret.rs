//! Turning agent replies into legal choices

use rand::Rng;

use arbiter_protocol::{
    ReplyAction, SideId, SpecialResource, TaskKind, parse_reply, scan_choice, scan_order,
};

use super::{Choice, Decision, DecisionOrigin, first_switch, identity_order, random_action};
use crate::action::Action;
use crate::machine::Match;

/// Interpret a raw reply for whichever task it answers
pub fn interpret_reply<R: Rng + ?Sized>(
    m: &Match,
    side: SideId,
    task: TaskKind,
    raw: &str,
    rng: &mut R,
) -> Decision {
    match task {
        TaskKind::TeamPreview => interpret_preview(m, side, raw),
        TaskKind::MoveOrSwitch => interpret_move(m, side, raw, rng),
        TaskKind::ForcedSwitch => interpret_forced(m, side, raw),
    }
}

/// Team preview: a permutation of the pool, identity order when unusable
///
/// A partial order is completed with the missing members in natural order
/// as long as it covers at least the members that will be entered.
pub fn interpret_preview(m: &Match, side: SideId, raw: &str) -> Decision {
    let task = TaskKind::TeamPreview;
    let pool_len = m.side(side).pool.len();
    let pick = m.rules().entry_size().min(pool_len);

    let (digits, justification, origin) = match parse_reply(raw) {
        Ok(reply) => (
            reply.order_indices(),
            reply.justification().to_string(),
            DecisionOrigin::Agent,
        ),
        Err(e) => match scan_order(raw) {
            Some(digits) => (digits, String::new(), DecisionOrigin::Extracted),
            None => {
                return Decision::new(
                    side,
                    task,
                    Choice::TeamOrder(identity_order(pool_len)),
                    DecisionOrigin::Fallback,
                )
                .with_reason(e.to_string());
            }
        },
    };

    match complete_order(&digits, pool_len, pick) {
        Some(order) => {
            let decision = Decision::new(side, task, Choice::TeamOrder(order), origin)
                .with_justification(justification);
            if origin == DecisionOrigin::Extracted {
                decision.with_reason("order scraped from malformed reply")
            } else {
                decision
            }
        }
        None => Decision::new(
            side,
            task,
            Choice::TeamOrder(identity_order(pool_len)),
            DecisionOrigin::Fallback,
        )
        .with_justification(justification)
        .with_reason(format!(
            "order {:?} is not a valid ordering of {} members",
            digits, pool_len
        )),
    }
}

/// Validate 1-based digits and fill in whatever was left out
fn complete_order(digits: &[usize], pool_len: usize, pick: usize) -> Option<Vec<usize>> {
    let mut order = Vec::with_capacity(pool_len);
    for &d in digits {
        if d == 0 || d > pool_len || order.contains(&(d - 1)) {
            return None;
        }
        order.push(d - 1);
    }
    if order.len() < pick {
        return None;
    }
    for pos in 0..pool_len {
        if !order.contains(&pos) {
            order.push(pos);
        }
    }
    Some(order)
}

/// Regular turn: a usable move or a legal switch
pub fn interpret_move<R: Rng + ?Sized>(m: &Match, side: SideId, raw: &str, rng: &mut R) -> Decision {
    let task = TaskKind::MoveOrSwitch;

    if m.side(side).active_combatant().is_none() {
        return Decision::new(side, task, Choice::Action(Action::Pass), DecisionOrigin::Agent);
    }

    match parse_reply(raw) {
        Ok(reply) => {
            let justification = reply.justification().to_string();
            let action = reply.action();
            let special = reply.special_resource();
            choose(m, side, action, reply.idx, special, DecisionOrigin::Agent, rng)
                .with_justification(justification)
        }
        Err(e) => match scan_choice(raw) {
            Some(scanned) => choose(
                m,
                side,
                scanned.action,
                Some(scanned.index),
                None,
                DecisionOrigin::Extracted,
                rng,
            )
            .with_reason_if_missing(format!("{}; choice scraped from text", e)),
            None => Decision::new(
                side,
                task,
                Choice::Action(random_action(m, side, rng)),
                DecisionOrigin::Fallback,
            )
            .with_reason(e.to_string()),
        },
    }
}

fn choose<R: Rng + ?Sized>(
    m: &Match,
    side: SideId,
    action: Option<ReplyAction>,
    idx: Option<i64>,
    special: Option<SpecialResource>,
    origin: DecisionOrigin,
    rng: &mut R,
) -> Decision {
    let task = TaskKind::MoveOrSwitch;
    let side_state = m.side(side);
    let fallback = |rng: &mut R, reason: String| {
        Decision::new(
            side,
            task,
            Choice::Action(random_action(m, side, rng)),
            DecisionOrigin::Fallback,
        )
        .with_reason(reason)
    };

    if action == Some(ReplyAction::Switch) {
        let options = side_state.switch_options();
        return match idx {
            Some(i) if i >= 1 && options.contains(&((i - 1) as usize)) => Decision::new(
                side,
                task,
                Choice::Action(Action::Switch {
                    target: (i - 1) as usize,
                }),
                origin,
            ),
            Some(i) => fallback(rng, format!("switch target {} is not legal", i)),
            None => fallback(rng, "switch without a target".to_string()),
        };
    }

    let Some(active) = side_state.active_combatant() else {
        return Decision::new(side, task, Choice::Action(Action::Pass), origin);
    };
    if !active.has_usable_move() {
        return Decision::new(side, task, Choice::Action(Action::Struggle), origin);
    }

    let Some(idx) = idx else {
        return fallback(rng, "missing move index".to_string());
    };

    let count = active.moves.len() as i64;
    let (index, origin) = if (1..=count).contains(&idx) {
        ((idx - 1) as usize, origin)
    } else if idx == 0 || idx == count + 1 {
        let clamped = idx.clamp(1, count) - 1;
        let origin = if origin == DecisionOrigin::Agent {
            DecisionOrigin::Clamped
        } else {
            origin
        };
        (clamped as usize, origin)
    } else {
        return fallback(rng, format!("move index {} out of range 1..={}", idx, count));
    };

    let slot = &active.moves[index];
    if !slot.is_usable() {
        return fallback(rng, format!("move {} ({}) is not usable", index + 1, slot.name));
    }

    let decision = Decision::new(side, task, Choice::Action(Action::Move { index, special }), origin);
    if origin == DecisionOrigin::Clamped {
        decision.with_reason(format!("move index {} clamped to {}", idx, index + 1))
    } else {
        decision
    }
}

/// Forced switch: one of the legal options, else the first of them
pub fn interpret_forced(m: &Match, side: SideId, raw: &str) -> Decision {
    let task = TaskKind::ForcedSwitch;
    let options = m.side(side).switch_options();

    let (idx, justification, origin, parse_error) = match parse_reply(raw) {
        Ok(reply) => (
            reply.idx,
            reply.justification().to_string(),
            DecisionOrigin::Agent,
            None,
        ),
        Err(e) => (
            scan_choice(raw).map(|c| c.index),
            String::new(),
            DecisionOrigin::Extracted,
            Some(e.to_string()),
        ),
    };

    match idx {
        Some(i) if i >= 1 && options.contains(&((i - 1) as usize)) => {
            let decision = Decision::new(side, task, Choice::SwitchIn((i - 1) as usize), origin)
                .with_justification(justification);
            match parse_error {
                Some(e) => decision.with_reason(format!("{}; choice scraped from text", e)),
                None => decision,
            }
        }
        other => {
            let reason = match (other, parse_error) {
                (Some(i), _) => format!("switch target {} is not legal", i),
                (None, Some(e)) => e,
                (None, None) => "missing switch target".to_string(),
            };
            Decision::new(
                side,
                task,
                Choice::SwitchIn(first_switch(m, side)),
                DecisionOrigin::Fallback,
            )
            .with_justification(justification)
            .with_reason(reason)
        }
    }
}

impl Decision {
    fn with_reason_if_missing(self, reason: String) -> Self {
        if self.reason.is_some() {
            self
        } else {
            self.with_reason(reason)
        }
    }
}

//! Action ordering

use std::cmp::Ordering;

use arbiter_protocol::SideId;

use crate::action::Action;
use crate::format::SpeedTieBreak;
use crate::types::Side;

/// Speeds compared when ordering a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeedCheck {
    pub p1_speed: u32,
    pub p2_speed: u32,
    pub first: SideId,
    /// Priority and speed were equal; the tie rule decided
    pub tie: bool,
}

/// Switches go before moves; passing goes last
fn priority(action: &Action) -> i8 {
    match action {
        Action::Switch { .. } => 1,
        Action::Move { .. } | Action::Struggle => 0,
        Action::Pass => -1,
    }
}

/// Execution order for the turn: priority, then speed, then the tie rule
pub fn determine_order(
    sides: &[Side; 2],
    actions: &[Action; 2],
    tie_break: SpeedTieBreak,
) -> ([SideId; 2], SpeedCheck) {
    let speed = |side: &Side| side.active_combatant().map_or(0, |c| c.effective_speed());
    let p1_speed = speed(&sides[0]);
    let p2_speed = speed(&sides[1]);

    let by_priority = priority(&actions[0]).cmp(&priority(&actions[1]));
    let (first, tie) = match by_priority.then(p1_speed.cmp(&p2_speed)) {
        Ordering::Greater => (SideId::P1, false),
        Ordering::Less => (SideId::P2, false),
        Ordering::Equal => (tie_break.winner(), true),
    };

    (
        [first, first.opponent()],
        SpeedCheck {
            p1_speed,
            p2_speed,
            first,
            tie,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Combatant, StatBlock};

    fn side(id: SideId, speed: u32) -> Side {
        let c = Combatant::new("x", "X", 50, StatBlock::new(80, 80, 80, 80, 80, speed));
        let mut s = Side::new(id, "t", vec![c.clone(), Combatant { id: "y".into(), ..c }], vec![0, 1]);
        s.enter(&[0, 1], 2);
        s.set_active(0);
        s
    }

    #[test]
    fn test_faster_side_first() {
        let sides = [side(SideId::P1, 50), side(SideId::P2, 120)];
        let actions = [Action::use_move(0), Action::use_move(0)];
        let (order, check) = determine_order(&sides, &actions, SpeedTieBreak::FavorP1);

        assert_eq!(order, [SideId::P2, SideId::P1]);
        assert!(!check.tie);
        assert!(check.p2_speed > check.p1_speed);
    }

    #[test]
    fn test_switch_beats_speed() {
        let sides = [side(SideId::P1, 50), side(SideId::P2, 120)];
        let actions = [Action::Switch { target: 1 }, Action::use_move(0)];
        let (order, _) = determine_order(&sides, &actions, SpeedTieBreak::FavorP2);
        assert_eq!(order, [SideId::P1, SideId::P2]);
    }

    #[test]
    fn test_tie_rule() {
        let sides = [side(SideId::P1, 90), side(SideId::P2, 90)];
        let actions = [Action::use_move(0), Action::use_move(0)];

        let (order, check) = determine_order(&sides, &actions, SpeedTieBreak::FavorP1);
        assert_eq!(order[0], SideId::P1);
        assert!(check.tie);

        let (order, _) = determine_order(&sides, &actions, SpeedTieBreak::FavorP2);
        assert_eq!(order[0], SideId::P2);
    }
}

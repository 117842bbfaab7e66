#[cfg(test)]
mod tests {
    use arbiter_protocol::{SideId, SpecialResource};

    use crate::action::Action;
    use crate::format::{EntryFormat, FormatRules, SpeedTieBreak};
    use crate::log::MatchEvent;
    use crate::machine::{EndReason, MachineError, MatchOutcome, MatchPhase, MatchRequest};
    use crate::oracle::{EffectTarget, SideEffect};
    use crate::resolver::TurnPhase;
    use crate::testing::{FixedOracle, PanickingOracle, mon, one_vs_one, started};
    use crate::types::{Build, Stat, Type};

    fn count(m: &crate::machine::Match, pred: impl Fn(&MatchEvent) -> bool) -> usize {
        m.log().iter().filter(|e| pred(&e.event)).count()
    }

    #[test]
    fn test_tie_winner_knocks_out_low_hp_side() {
        let a = mon("a", 90).with_hp(15);
        let b = mon("b", 90);
        let rules = one_vs_one().with_speed_tie(SpeedTieBreak::FavorP2);
        let mut m = started(vec![a], vec![b], rules);

        let report = m
            .resolve_turn(&FixedOracle::new(15.0), [Action::use_move(0), Action::use_move(0)])
            .unwrap();

        assert!(report.speed.tie);
        assert_eq!(report.order, [SideId::P2, SideId::P1]);
        assert_eq!(report.fainted, vec![SideId::P1]);
        assert_eq!(report.phase, TurnPhase::Settled);

        assert_eq!(m.outcome(), MatchOutcome::P2);
        assert_eq!(m.end_reason(), Some(EndReason::Knockout));
        assert_eq!(m.phase(), MatchPhase::Ended);

        // The fainted side never got to act
        let p1_moves = count(&m, |e| matches!(e, MatchEvent::MoveUsed { side: SideId::P1, .. }));
        assert_eq!(p1_moves, 0);
        let b = m.side(SideId::P2).active_combatant().unwrap();
        assert_eq!(b.hp, b.max_hp);
    }

    #[test]
    fn test_recoil_double_knockout_is_draw() {
        let oracle = FixedOracle::new(150.0).with_effect(SideEffect::Recoil { amount: 150 });
        let mut m = started(vec![mon("a", 120)], vec![mon("b", 40)], one_vs_one());

        let report = m
            .resolve_turn(&oracle, [Action::use_move(0), Action::use_move(0)])
            .unwrap();

        assert_eq!(report.fainted, vec![SideId::P2, SideId::P1]);
        assert_eq!(m.outcome(), MatchOutcome::Draw);
        assert_eq!(m.end_reason(), Some(EndReason::SimultaneousKnockout));
        assert_eq!(
            count(&m, |e| matches!(e, MatchEvent::Recoil { amount: 150, .. })),
            1
        );
    }

    #[test]
    fn test_turn_limit_draw() {
        let rules = one_vs_one().with_max_turns(2);
        let mut m = started(vec![mon("a", 90)], vec![mon("b", 80)], rules);
        let oracle = FixedOracle::new(1.0);

        m.resolve_turn(&oracle, [Action::use_move(0), Action::use_move(0)])
            .unwrap();
        assert_eq!(m.outcome(), MatchOutcome::Ongoing);
        assert_eq!(m.turn(), 2);

        m.resolve_turn(&oracle, [Action::use_move(0), Action::use_move(0)])
            .unwrap();
        assert_eq!(m.outcome(), MatchOutcome::Draw);
        assert_eq!(m.end_reason(), Some(EndReason::TurnLimit));
        assert_eq!(m.next_request(), MatchRequest::Finished(MatchOutcome::Draw));
    }

    #[test]
    fn test_illegal_action_replaced_by_default() {
        let mut m = started(vec![mon("a", 90)], vec![mon("b", 80)], one_vs_one());

        let report = m
            .resolve_turn(&FixedOracle::new(10.0), [Action::use_move(3), Action::Pass])
            .unwrap();

        assert_eq!(report.actions[0], Action::use_move(0));
        assert_eq!(report.actions[1], Action::use_move(0));
        assert_eq!(
            count(&m, |e| matches!(e, MatchEvent::ActionRejected { .. })),
            2
        );
        let b = m.side(SideId::P2).active_combatant().unwrap();
        assert_eq!(b.hp, b.max_hp - 10);
    }

    #[test]
    fn test_special_resource_budget() {
        let tera = Build {
            tera_type: Some(Type::Fire),
            ..Build::default()
        };
        let a = mon("a", 90).with_build(tera);
        let rules = one_vs_one().with_resources([SpecialResource::Terastallize]);
        let mut m = started(vec![a], vec![mon("b", 80)], rules);
        let oracle = FixedOracle::new(1.0);

        let tera_move = Action::Move {
            index: 0,
            special: Some(SpecialResource::Terastallize),
        };
        let report = m.resolve_turn(&oracle, [tera_move, tera_move]).unwrap();

        // p2 has no tera type, so its request is dropped
        assert_eq!(report.actions[1], Action::use_move(0));
        let p1 = m.side(SideId::P1);
        assert!(p1.active_combatant().unwrap().is_terastallized());
        assert_eq!(p1.special_uses_remaining, 0);
        assert_eq!(
            count(&m, |e| matches!(e, MatchEvent::ResourceActivated { side: SideId::P1, .. })),
            1
        );

        let report = m.resolve_turn(&oracle, [tera_move, Action::use_move(0)]).unwrap();
        assert_eq!(report.actions[0], Action::use_move(0));
        assert_eq!(
            count(&m, |e| matches!(e, MatchEvent::ResourceDenied { .. })),
            2
        );
        assert!(m.side(SideId::P1).party[0].is_terastallized());
    }

    #[test]
    fn test_oracle_panic_is_contained() {
        let mut m = started(vec![mon("a", 90)], vec![mon("b", 80)], one_vs_one());

        m.resolve_turn(&PanickingOracle, [Action::use_move(0), Action::use_move(0)])
            .unwrap();

        assert_eq!(
            count(&m, |e| matches!(e, MatchEvent::OracleFault { .. })),
            2
        );
        for side in SideId::BOTH {
            let c = m.side(side).active_combatant().unwrap();
            assert_eq!(c.hp, c.max_hp);
        }
        assert_eq!(m.outcome(), MatchOutcome::Ongoing);
    }

    #[test]
    fn test_switch_resolves_before_moves() {
        let rules = FormatRules::new()
            .with_entry_format(EntryFormat::ThreeVsThree)
            .with_team_preview(false);
        let mut m = started(
            vec![mon("a1", 200), mon("a2", 50)],
            vec![mon("b1", 10)],
            rules,
        );
        m.sides[0].entry[0].boosts.boost(Stat::Atk, 2);

        let report = m
            .resolve_turn(
                &FixedOracle::new(30.0),
                [Action::Switch { target: 1 }, Action::use_move(0)],
            )
            .unwrap();

        assert_eq!(report.order, [SideId::P1, SideId::P2]);
        let p1 = m.side(SideId::P1);
        assert_eq!(p1.active, Some(1));
        assert_eq!(p1.entry[1].hp, p1.entry[1].max_hp - 30);
        assert_eq!(p1.entry[0].hp, p1.entry[0].max_hp);
        assert!(p1.entry[0].boosts.is_clear());
    }

    #[test]
    fn test_faint_requires_replacement() {
        let rules = FormatRules::new()
            .with_entry_format(EntryFormat::ThreeVsThree)
            .with_team_preview(false);
        let mut m = started(vec![mon("a", 120)], vec![mon("b1", 50), mon("b2", 50)], rules);
        let oracle = FixedOracle::new(200.0);

        m.resolve_turn(&oracle, [Action::use_move(0), Action::use_move(0)])
            .unwrap();
        assert_eq!(m.next_request(), MatchRequest::ForcedSwitch(vec![SideId::P2]));

        let err = m
            .resolve_turn(&oracle, [Action::use_move(0), Action::use_move(0)])
            .unwrap_err();
        assert_eq!(err, MachineError::ReplacementPending(SideId::P2));

        m.apply_forced_switch(SideId::P2, 1).unwrap();
        assert_eq!(m.next_request(), MatchRequest::Turn);

        m.resolve_turn(&oracle, [Action::use_move(0), Action::use_move(0)])
            .unwrap();
        assert_eq!(m.outcome(), MatchOutcome::P1);
        assert_eq!(m.side(SideId::P2).fainted, vec!["b1".to_string(), "b2".to_string()]);
    }

    #[test]
    fn test_side_effects_and_pp() {
        let oracle = FixedOracle::new(20.0)
            .with_effect(SideEffect::Boost {
                target: EffectTarget::Attacker,
                stat: Stat::Atk,
                stages: 1,
            })
            .with_effect(SideEffect::Heal {
                target: EffectTarget::Attacker,
                amount: 5,
            });
        let mut m = started(vec![mon("a", 90)], vec![mon("b", 80)], one_vs_one());

        m.resolve_turn(&oracle, [Action::use_move(0), Action::use_move(0)])
            .unwrap();

        let a = m.side(SideId::P1).active_combatant().unwrap();
        assert_eq!(a.boosts.atk, 1);
        // p1 healed at full HP, p2 healed after taking the hit
        assert_eq!(a.hp, a.max_hp - 20);
        let b = m.side(SideId::P2).active_combatant().unwrap();
        assert_eq!(b.hp, b.max_hp - 15);

        let party = &m.side(SideId::P1).party[0];
        assert_eq!(party.moves[0].pp, 34);
        assert_eq!(party.boosts.atk, 1);
    }
}

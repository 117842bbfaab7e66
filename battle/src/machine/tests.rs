#[cfg(test)]
mod tests {
    use arbiter_protocol::{SideId, TaskKind};

    use crate::action::{Action, ActionError};
    use crate::decision::{Choice, Decision, DecisionOrigin, default_decision};
    use crate::format::{EntryFormat, FormatRules};
    use crate::log::MatchEvent;
    use crate::machine::{
        EndReason, MachineError, Match, MatchOutcome, MatchPhase, MatchRequest, SideSetup,
        create_match,
    };
    use crate::testing::{FixedOracle, mon, one_vs_one, started};

    fn preview_match() -> Match {
        let rules = FormatRules::new().with_entry_format(EntryFormat::ThreeVsThree);
        create_match(
            SideSetup::new("alpha", vec![mon("a1", 50), mon("a2", 60), mon("a3", 70), mon("a4", 80)]),
            SideSetup::new("beta", vec![mon("b1", 50), mon("b2", 60)]),
            rules,
        )
        .unwrap()
    }

    #[test]
    fn test_team_preview_flow() {
        let mut m = preview_match();
        assert_eq!(m.next_request(), MatchRequest::NotStarted);

        m.start();
        assert_eq!(m.phase(), MatchPhase::TeamPreview);
        assert_eq!(m.turn(), 0);
        assert_eq!(m.next_request(), MatchRequest::TeamPreview);
        assert_eq!(m.next_request().tasks().len(), 2);

        m.apply_team_order([vec![3, 0, 2, 1], vec![1, 0]]).unwrap();

        assert_eq!(m.phase(), MatchPhase::TurnLoop);
        assert_eq!(m.turn(), 1);
        assert_eq!(m.next_request(), MatchRequest::Turn);

        let p1 = m.side(SideId::P1);
        let ids: Vec<_> = p1.entry.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a4", "a1", "a3"]);
        assert_eq!(p1.active_combatant().unwrap().id, "a4");
        assert_eq!(m.side(SideId::P2).active_combatant().unwrap().id, "b2");

        let send_outs = m
            .log()
            .iter()
            .filter(|e| matches!(e.event, MatchEvent::SendOut { .. }))
            .count();
        assert_eq!(send_outs, 2);
    }

    #[test]
    fn test_invalid_team_orders() {
        let mut m = preview_match();
        m.start();

        let err = m.apply_team_order([vec![0, 0, 1], vec![0, 1]]).unwrap_err();
        assert!(matches!(err, MachineError::InvalidOrder { side: SideId::P1, .. }));

        let err = m.apply_team_order([vec![0, 1], vec![0, 1]]).unwrap_err();
        assert!(matches!(err, MachineError::InvalidOrder { side: SideId::P1, .. }));

        let err = m.apply_team_order([vec![0, 1, 2], vec![0, 5]]).unwrap_err();
        assert!(matches!(err, MachineError::InvalidOrder { side: SideId::P2, .. }));

        // Nothing was applied
        assert_eq!(m.phase(), MatchPhase::TeamPreview);
        assert!(m.side(SideId::P1).entry.is_empty());
    }

    #[test]
    fn test_start_without_preview() {
        let mut m = create_match(
            SideSetup::new("alpha", vec![mon("a", 50)]),
            SideSetup::new("beta", vec![mon("b", 50)]),
            one_vs_one(),
        )
        .unwrap();

        m.start();
        assert_eq!(m.phase(), MatchPhase::TurnLoop);
        assert_eq!(m.turn(), 1);

        let len = m.log().len();
        m.start();
        assert_eq!(m.log().len(), len);
    }

    #[test]
    fn test_wrong_phase() {
        let mut m = preview_match();
        let err = m
            .resolve_turn(&FixedOracle::new(1.0), [Action::Pass, Action::Pass])
            .unwrap_err();
        assert_eq!(
            err,
            MachineError::WrongPhase {
                expected: MatchPhase::TurnLoop,
                actual: MatchPhase::NotStarted,
            }
        );

        m.start();
        assert!(m.apply_forced_switch(SideId::P1, 1).is_err());
    }

    #[test]
    fn test_forced_switch_errors() {
        let rules = one_vs_one().with_entry_format(EntryFormat::ThreeVsThree);
        let mut m = started(vec![mon("a1", 90), mon("a2", 90)], vec![mon("b", 10)], rules);

        assert_eq!(
            m.apply_forced_switch(SideId::P1, 1),
            Err(MachineError::NoSwitchPending(SideId::P1))
        );

        m.side_mut(SideId::P1).faint_active();
        let err = m.apply_forced_switch(SideId::P1, 0).unwrap_err();
        assert!(matches!(
            err,
            MachineError::IllegalSwitch {
                side: SideId::P1,
                source: ActionError::SwitchToFainted(_)
            }
        ));

        m.apply_forced_switch(SideId::P1, 1).unwrap();
        assert_eq!(m.side(SideId::P1).active, Some(1));
    }

    #[test]
    fn test_abort_stalled_freezes_match() {
        let mut m = started(vec![mon("a", 90)], vec![mon("b", 80)], one_vs_one());

        assert_eq!(m.abort_stalled(), MatchOutcome::Draw);
        assert_eq!(m.end_reason(), Some(EndReason::StallFault));
        assert!(m.is_over());

        let len = m.log().len();
        assert!(
            m.resolve_turn(&FixedOracle::new(10.0), [Action::use_move(0), Action::use_move(0)])
                .is_err()
        );
        assert_eq!(m.abort_stalled(), MatchOutcome::Draw);
        assert_eq!(m.log().len(), len);
        assert!(m.next_request().tasks().is_empty());
    }

    #[test]
    fn test_record_decision_logs_degraded_only() {
        let mut m = started(vec![mon("a", 90)], vec![mon("b", 80)], one_vs_one());
        let len = m.log().len();

        let agent = Decision::new(
            SideId::P1,
            TaskKind::MoveOrSwitch,
            Choice::Action(Action::use_move(0)),
            DecisionOrigin::Agent,
        );
        m.record_decision(&agent);
        assert_eq!(m.log().len(), len);

        let stalled = default_decision(&m, SideId::P2, TaskKind::MoveOrSwitch);
        m.record_decision(&stalled);
        m.record_stall_recovery();

        let tail = m.log().since(len);
        assert_eq!(tail.len(), 2);
        assert!(tail.iter().all(|e| e.event.is_fault()));
        assert!(matches!(
            tail[0].event,
            MatchEvent::Fallback {
                origin: DecisionOrigin::StallDefault,
                ..
            }
        ));
    }

    #[test]
    fn test_snapshot() {
        let mut m = preview_match();
        m.start();

        let before = m.snapshot();
        assert_eq!(before.sides[0].members.len(), 4);
        assert_eq!(before.sides[0].active, None);

        m.apply_team_order([vec![0, 1, 2], vec![0, 1]]).unwrap();
        let after = m.snapshot();
        assert_eq!(after.turn, 1);
        assert_eq!(after.sides[0].members.len(), 3);
        assert_eq!(after.sides[1].active.as_deref(), Some("b1"));
        assert!(after.sides[1].members[0].active);
        assert_eq!(after.outcome, MatchOutcome::Ongoing);
    }

    #[test]
    fn test_field_passes_through() {
        use crate::decision::build_request;
        use crate::types::{FieldState, Weather};

        let mut m = create_match(
            SideSetup::new("alpha", vec![mon("a", 50)]),
            SideSetup::new("beta", vec![mon("b", 50)]),
            one_vs_one(),
        )
        .unwrap()
        .with_field(FieldState::new().with_weather(Weather::Sand));
        m.start();

        assert_eq!(m.snapshot().field.weather, Some(Weather::Sand));
        let request = build_request(&m, SideId::P1, TaskKind::MoveOrSwitch);
        let state = request.state.unwrap();
        assert_eq!(state.field.weather.as_deref(), Some("Sandstorm"));
    }
}

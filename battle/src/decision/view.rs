//! Building decision requests from match state

use arbiter_protocol::{
    ActiveView, BattleView, DecisionRequest, OpponentView, PreviewMember, RosterView, SideId,
    TaskKind, TeamPreview,
};

use crate::action::usable_resources;
use crate::machine::Match;
use crate::types::Combatant;

/// Build the request one side needs for `task`
pub fn build_request(m: &Match, side: SideId, task: TaskKind) -> DecisionRequest {
    let label = m.rules().label();
    match task {
        TaskKind::TeamPreview => DecisionRequest::team_preview(side, label, preview_view(m, side)),
        TaskKind::MoveOrSwitch => match battle_view(m, side) {
            Some(view) => DecisionRequest::move_or_switch(side, m.turn(), label, view),
            None => DecisionRequest::forced_switch(side, m.turn(), label, switch_options(m, side)),
        },
        TaskKind::ForcedSwitch => {
            DecisionRequest::forced_switch(side, m.turn(), label, switch_options(m, side))
        }
    }
}

fn switch_options(m: &Match, side: SideId) -> Vec<usize> {
    m.side(side)
        .switch_options()
        .into_iter()
        .map(|i| i + 1)
        .collect()
}

/// Own pool in full detail, opponent pool as species only
pub fn preview_view(m: &Match, side: SideId) -> TeamPreview {
    let me = m.side(side);
    let opp = m.side(side.opponent());

    let members = me
        .pool
        .iter()
        .filter_map(|&i| me.party.get(i))
        .enumerate()
        .map(|(pos, c)| PreviewMember {
            index: pos + 1,
            species: c.species.clone(),
            level: c.level,
            types: type_names(c),
            ability: c.build.ability.clone(),
            item: c.build.item.clone(),
            moves: c.moves.iter().map(|mv| mv.name.clone()).collect(),
        })
        .collect::<Vec<_>>();

    let opponents = opp
        .pool
        .iter()
        .filter_map(|&i| opp.party.get(i))
        .map(|c| c.species.clone())
        .collect();

    TeamPreview {
        pick: m.rules().entry_size().min(members.len()),
        me: members,
        opp: opponents,
    }
}

/// Minimized snapshot for a regular turn; `None` without an active combatant
pub fn battle_view(m: &Match, side: SideId) -> Option<BattleView> {
    let me = m.side(side);
    let active = me.active_combatant()?;

    let view = ActiveView {
        species: active.species.clone(),
        level: active.level,
        hp: active.hp_display(),
        status: active.status.map(|s| s.code().to_string()),
        ability: active.build.ability.clone(),
        item: active.build.item.clone(),
        types: type_names(active),
        moves: active
            .moves
            .iter()
            .enumerate()
            .map(|(i, mv)| mv.view(i + 1))
            .collect(),
        boosts: active.boosts.non_zero(),
        can_use: usable_resources(me, m.rules()),
    };

    let team = me
        .entry
        .iter()
        .enumerate()
        .map(|(i, c)| RosterView {
            index: i + 1,
            species: c.species.clone(),
            hp_percent: c.hp_percent(),
            status: c.status.map(|s| s.code().to_string()),
            fainted: me.is_fainted(i),
            active: me.active == Some(i),
        })
        .collect();

    let opp = m
        .side(side.opponent())
        .active_combatant()
        .map(|c| OpponentView {
            species: c.species.clone(),
            hp_percent: c.hp_percent(),
            status: c.status.map(|s| s.code().to_string()),
            boosts: c.boosts.non_zero(),
            terastallized: c.is_terastallized(),
        });

    Some(BattleView {
        me: view,
        team,
        opp,
        field: m.field().view(),
    })
}

fn type_names(c: &Combatant) -> Vec<String> {
    c.types.iter().map(|t| t.as_str().to_string()).collect()
}

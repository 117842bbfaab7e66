//! Building a match from two parties

use thiserror::Error;

use arbiter_protocol::SideId;

use super::{Match, MatchOutcome, MatchPhase};
use crate::format::FormatRules;
use crate::log::MatchLog;
use crate::types::{Combatant, FieldState, Side};

/// One side's roster as handed to [`create_match`]
#[derive(Debug, Clone, PartialEq)]
pub struct SideSetup {
    pub name: String,
    pub party: Vec<Combatant>,
    /// Party indices eligible for entry; the whole party when `None`
    pub entry: Option<Vec<usize>>,
}

impl SideSetup {
    pub fn new(name: impl Into<String>, party: Vec<Combatant>) -> Self {
        Self {
            name: name.into(),
            party,
            entry: None,
        }
    }

    pub fn with_entry(mut self, entry: Vec<usize>) -> Self {
        self.entry = Some(entry);
        self
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SetupError {
    #[error("{0} has an empty party")]
    EmptyParty(SideId),

    #[error("{side} has two members with id {id}")]
    DuplicateId { side: SideId, id: String },

    #[error("{side} entry index {index} is outside the party")]
    EntryOutOfRange { side: SideId, index: usize },

    #[error("{side} lists party index {index} twice")]
    DuplicateEntry { side: SideId, index: usize },

    #[error("{0} entry is empty")]
    EmptyEntry(SideId),

    #[error("{side} member {id} starts the match fainted")]
    StartsFainted { side: SideId, id: String },
}

/// Validate both rosters and build a match in [`MatchPhase::NotStarted`]
///
/// Members above the level cap are scaled down to it. A pool smaller than
/// the format's entry size is allowed; that side simply enters fewer.
pub fn create_match(p1: SideSetup, p2: SideSetup, rules: FormatRules) -> Result<Match, SetupError> {
    let p1 = build_side(SideId::P1, p1, &rules)?;
    let p2 = build_side(SideId::P2, p2, &rules)?;

    tracing::debug!(
        format = %rules.label(),
        p1 = %p1.name,
        p2 = %p2.name,
        "match created"
    );

    Ok(Match {
        sides: [p1, p2],
        field: FieldState::new(),
        rules,
        turn: 0,
        phase: MatchPhase::NotStarted,
        log: MatchLog::new(),
        outcome: MatchOutcome::Ongoing,
        end_reason: None,
    })
}

fn build_side(id: SideId, setup: SideSetup, rules: &FormatRules) -> Result<Side, SetupError> {
    let SideSetup {
        name,
        mut party,
        entry,
    } = setup;

    if party.is_empty() {
        return Err(SetupError::EmptyParty(id));
    }

    for (i, member) in party.iter().enumerate() {
        if party[..i].iter().any(|other| other.id == member.id) {
            return Err(SetupError::DuplicateId {
                side: id,
                id: member.id.clone(),
            });
        }
    }

    let pool = match entry {
        Some(indices) => {
            if indices.is_empty() {
                return Err(SetupError::EmptyEntry(id));
            }
            for (i, &index) in indices.iter().enumerate() {
                if index >= party.len() {
                    return Err(SetupError::EntryOutOfRange { side: id, index });
                }
                if indices[..i].contains(&index) {
                    return Err(SetupError::DuplicateEntry { side: id, index });
                }
            }
            indices
        }
        None => (0..party.len()).collect(),
    };

    for &index in &pool {
        let member = &party[index];
        if member.is_fainted() {
            return Err(SetupError::StartsFainted {
                side: id,
                id: member.id.clone(),
            });
        }
    }

    for member in party.iter_mut() {
        if member.level > rules.level_cap {
            member.set_level(rules.level_cap);
        }
        if member.hp > member.max_hp {
            tracing::warn!(
                side = %id,
                member = %member.id,
                hp = member.hp,
                max_hp = member.max_hp,
                "clamping HP to max"
            );
            member.hp = member.max_hp;
        }
    }

    let mut side = Side::new(id, name, party, pool);
    side.special_uses_remaining = rules.special_resource_limit;
    Ok(side)
}

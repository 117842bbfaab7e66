//! Views of battle state as seen by one side
//!
//! Opponent data is limited to what a player could observe: species,
//! HP percentage, status and stat stages. Builds, exact stats and
//! unrevealed moves never appear here.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::SpecialResource;

/// Rosters shown during team preview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamPreview {
    /// Our roster, full detail
    pub me: Vec<PreviewMember>,

    /// Opponent roster, species only
    pub opp: Vec<String>,

    /// How many members will be entered into the match
    pub pick: usize,
}

/// One of our roster members during team preview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewMember {
    /// 1-based roster index
    pub index: usize,
    pub species: String,
    pub level: u8,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub ability: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    #[serde(default)]
    pub moves: Vec<String>,
}

/// Minimized snapshot for a regular turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleView {
    /// Our active combatant
    pub me: ActiveView,

    /// Our entered roster (HP and fainted flags only)
    pub team: Vec<RosterView>,

    /// Opponent's active combatant, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opp: Option<OpponentView>,

    /// Field conditions
    #[serde(default)]
    pub field: FieldView,
}

/// Our active combatant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveView {
    pub species: String,
    pub level: u8,

    /// "CURRENT/MAX"
    pub hp: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default)]
    pub ability: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,

    #[serde(default)]
    pub types: Vec<String>,

    /// Every move slot, in order; `index` is what the agent replies with
    #[serde(default)]
    pub moves: Vec<MoveView>,

    /// Non-zero stat stages only
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub boosts: BTreeMap<String, i8>,

    /// Special resources this combatant may activate this turn
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub can_use: Vec<SpecialResource>,
}

impl ActiveView {
    /// Moves that can actually be selected (not disabled, with PP)
    pub fn usable_moves(&self) -> impl Iterator<Item = &MoveView> {
        self.moves.iter().filter(|m| !m.disabled && m.pp > 0)
    }
}

/// A move slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveView {
    /// 1-based slot index
    pub index: usize,
    pub name: String,
    #[serde(rename = "type")]
    pub move_type: String,
    pub category: String,
    pub power: u16,
    pub pp: u8,
    pub max_pp: u8,
    #[serde(default)]
    pub disabled: bool,
}

/// One entered roster member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterView {
    /// 1-based entry index (what a switch reply refers to)
    pub index: usize,
    pub species: String,
    pub hp_percent: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub fainted: bool,
    #[serde(default)]
    pub active: bool,
}

/// Publicly visible opponent data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpponentView {
    pub species: String,
    pub hp_percent: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub boosts: BTreeMap<String, i8>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub terastallized: bool,
}

/// Weather and terrain, passed through as display strings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldView {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terrain: Option<String>,
}

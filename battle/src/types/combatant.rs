//! Combatant records

use std::collections::BTreeSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use arbiter_protocol::SpecialResource;

use super::moves::MoveSlot;
use super::pokemon_type::Type;
use super::stats::{Stat, StatBlock, StatStages};
use super::status::Status;

/// Build parameters that feed stat calculation and the mechanics oracle
///
/// Never shown to the opposing agent.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Build {
    pub ability: String,
    pub item: Option<String>,
    pub nature: String,
    pub evs: StatBlock,
    pub ivs: StatBlock,
    pub tera_type: Option<Type>,
}

impl Default for Build {
    fn default() -> Self {
        Self {
            ability: String::new(),
            item: None,
            nature: "Serious".to_string(),
            evs: StatBlock::default(),
            ivs: StatBlock::uniform(31),
            tera_type: None,
        }
    }
}

/// One roster member and everything about it that changes during a match
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Combatant {
    /// Unique within its side; used to match entry and party copies
    pub id: String,
    pub species: String,
    pub level: u8,
    pub types: Vec<Type>,

    pub base_stats: StatBlock,

    /// Stats at the current level, derived from base stats and build
    pub stats: StatBlock,

    pub build: Build,

    pub hp: u32,
    pub max_hp: u32,

    pub status: Option<Status>,
    pub moves: Vec<MoveSlot>,

    /// Cleared on switch-out
    pub boosts: StatStages,

    /// One-shot flags: resources this combatant has activated
    pub resources_used: BTreeSet<SpecialResource>,

    /// Dynamax lasts until the combatant leaves the field
    pub dynamaxed: bool,
}

impl Combatant {
    pub fn new(id: impl Into<String>, species: impl Into<String>, level: u8, base_stats: StatBlock) -> Self {
        let build = Build::default();
        let stats = StatBlock::at_level(&base_stats, level, &build.evs, &build.ivs);

        Self {
            id: id.into(),
            species: species.into(),
            level,
            types: Vec::new(),
            base_stats,
            stats,
            build,
            hp: stats.hp,
            max_hp: stats.hp,
            status: None,
            moves: Vec::new(),
            boosts: StatStages::new(),
            resources_used: BTreeSet::new(),
            dynamaxed: false,
        }
    }

    pub fn with_types(mut self, types: Vec<Type>) -> Self {
        self.types = types;
        self
    }

    pub fn with_moves(mut self, moves: Vec<MoveSlot>) -> Self {
        self.moves = moves;
        self
    }

    pub fn with_build(mut self, build: Build) -> Self {
        self.build = build;
        self.recalculate_stats();
        self
    }

    /// Start the match at a given HP (clamped to max)
    pub fn with_hp(mut self, hp: u32) -> Self {
        self.hp = hp.min(self.max_hp);
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    /// Change level and recompute stats, keeping the HP ratio
    pub fn set_level(&mut self, level: u8) {
        if level == self.level {
            return;
        }
        self.level = level;
        self.recalculate_stats();
    }

    fn recalculate_stats(&mut self) {
        let old_max = self.max_hp;
        self.stats = StatBlock::at_level(&self.base_stats, self.level, &self.build.evs, &self.build.ivs);
        self.max_hp = self.stats.hp;
        self.hp = if old_max == 0 {
            self.max_hp
        } else {
            (self.hp * self.max_hp).div_ceil(old_max).min(self.max_hp)
        };
    }

    pub fn is_fainted(&self) -> bool {
        self.hp == 0
    }

    /// HP as a percentage, never 0 while alive
    pub fn hp_percent(&self) -> u32 {
        if self.max_hp == 0 || self.hp == 0 {
            return 0;
        }
        ((self.hp * 100) / self.max_hp).max(1)
    }

    /// "CURRENT/MAX"
    pub fn hp_display(&self) -> String {
        format!("{}/{}", self.hp, self.max_hp)
    }

    /// Subtract damage, floored at zero; returns HP actually lost
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.hp);
        self.hp -= lost;
        lost
    }

    /// Restore HP up to max; returns HP actually gained
    pub fn heal(&mut self, amount: u32) -> u32 {
        let gained = amount.min(self.max_hp.saturating_sub(self.hp));
        self.hp += gained;
        gained
    }

    /// Stat after stage multipliers (and paralysis for speed)
    pub fn effective_stat(&self, stat: Stat) -> u32 {
        let raw = self.stats.get(stat) as f64 * StatStages::multiplier(self.boosts.get(stat));
        let raw = if stat == Stat::Spe && self.status == Some(Status::Paralysis) {
            raw / 2.0
        } else {
            raw
        };
        raw.floor() as u32
    }

    pub fn effective_speed(&self) -> u32 {
        self.effective_stat(Stat::Spe)
    }

    pub fn is_terastallized(&self) -> bool {
        self.resources_used.contains(&SpecialResource::Terastallize)
    }

    pub fn has_used(&self, resource: SpecialResource) -> bool {
        self.resources_used.contains(&resource)
    }

    /// Types used when being hit
    pub fn defending_types(&self) -> Vec<Type> {
        match (self.is_terastallized(), self.build.tera_type) {
            (true, Some(tera)) => vec![tera],
            _ => self.types.clone(),
        }
    }

    /// Whether a move of this type gets the same-type bonus
    pub fn has_stab(&self, move_type: Type) -> bool {
        self.types.contains(&move_type)
            || (self.is_terastallized() && self.build.tera_type == Some(move_type))
    }

    /// Indices of moves that can be selected
    pub fn usable_moves(&self) -> impl Iterator<Item = usize> + '_ {
        self.moves
            .iter()
            .enumerate()
            .filter(|(_, m)| m.is_usable())
            .map(|(i, _)| i)
    }

    pub fn has_usable_move(&self) -> bool {
        self.moves.iter().any(MoveSlot::is_usable)
    }

    /// Called when this combatant leaves the field
    pub fn on_switch_out(&mut self) {
        self.boosts.clear();
        self.dynamaxed = false;
    }
}

//! Format rules

use std::collections::BTreeSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use arbiter_protocol::{SideId, SpecialResource};

/// How many roster members each side enters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EntryFormat {
    OneVsOne,
    ThreeVsThree,
    SixVsSix,
}

impl EntryFormat {
    pub fn entry_size(&self) -> usize {
        match self {
            EntryFormat::OneVsOne => 1,
            EntryFormat::ThreeVsThree => 3,
            EntryFormat::SixVsSix => 6,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1v1" => Some(EntryFormat::OneVsOne),
            "3v3" => Some(EntryFormat::ThreeVsThree),
            "6v6" => Some(EntryFormat::SixVsSix),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryFormat::OneVsOne => "1v1",
            EntryFormat::ThreeVsThree => "3v3",
            EntryFormat::SixVsSix => "6v6",
        }
    }
}

/// Who moves first when effective speeds are equal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SpeedTieBreak {
    #[default]
    FavorP1,
    FavorP2,
}

impl SpeedTieBreak {
    pub fn winner(&self) -> SideId {
        match self {
            SpeedTieBreak::FavorP1 => SideId::P1,
            SpeedTieBreak::FavorP2 => SideId::P2,
        }
    }
}

/// Rules fixed for the whole match
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FormatRules {
    /// Mechanics generation passed to the oracle (1-9)
    pub generation: u8,

    pub entry_format: EntryFormat,

    /// Ask both sides to order their roster before turn 1
    pub team_preview: bool,

    /// Levels above this are lowered when the match is created
    pub level_cap: u8,

    /// Special resources this format permits
    pub allowed_resources: BTreeSet<SpecialResource>,

    /// Special resource activations per side per match
    pub special_resource_limit: u8,

    /// The match is a draw once this many turns have settled
    pub max_turns: u32,

    pub speed_tie: SpeedTieBreak,
}

impl Default for FormatRules {
    fn default() -> Self {
        Self {
            generation: 9,
            entry_format: EntryFormat::SixVsSix,
            team_preview: true,
            level_cap: 100,
            allowed_resources: BTreeSet::from([SpecialResource::Terastallize]),
            special_resource_limit: 1,
            max_turns: 100,
            speed_tie: SpeedTieBreak::default(),
        }
    }
}

impl FormatRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_generation(mut self, generation: u8) -> Self {
        self.generation = generation;
        self
    }

    pub fn with_entry_format(mut self, entry_format: EntryFormat) -> Self {
        self.entry_format = entry_format;
        self
    }

    pub fn with_team_preview(mut self, team_preview: bool) -> Self {
        self.team_preview = team_preview;
        self
    }

    pub fn with_level_cap(mut self, level_cap: u8) -> Self {
        self.level_cap = level_cap;
        self
    }

    pub fn with_resources(mut self, resources: impl IntoIterator<Item = SpecialResource>) -> Self {
        self.allowed_resources = resources.into_iter().collect();
        self
    }

    pub fn with_special_resource_limit(mut self, limit: u8) -> Self {
        self.special_resource_limit = limit;
        self
    }

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn with_speed_tie(mut self, speed_tie: SpeedTieBreak) -> Self {
        self.speed_tie = speed_tie;
        self
    }

    pub fn entry_size(&self) -> usize {
        self.entry_format.entry_size()
    }

    pub fn allows(&self, resource: SpecialResource) -> bool {
        self.allowed_resources.contains(&resource)
    }

    /// Short label shown to agents, e.g. "gen9 3v3 singles"
    pub fn label(&self) -> String {
        format!("gen{} {} singles", self.generation, self.entry_format.as_str())
    }
}

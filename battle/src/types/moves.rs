//! Move slots

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use arbiter_protocol::MoveView;

use super::pokemon_type::Type;

/// Damage class of a move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

impl MoveCategory {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "physical" => Some(MoveCategory::Physical),
            "special" => Some(MoveCategory::Special),
            "status" => Some(MoveCategory::Status),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MoveCategory::Physical => "Physical",
            MoveCategory::Special => "Special",
            MoveCategory::Status => "Status",
        }
    }
}

/// A known move with its remaining uses
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MoveSlot {
    pub name: String,

    /// `None` for typeless moves (Struggle)
    pub move_type: Option<Type>,

    pub category: MoveCategory,

    /// Base power (0 for status moves)
    pub power: u16,

    /// Accuracy percentage, `None` for moves that never miss
    pub accuracy: Option<u8>,

    pub pp: u8,
    pub max_pp: u8,

    /// Temporarily unselectable (e.g. Disable)
    pub disabled: bool,
}

impl MoveSlot {
    pub fn new(
        name: impl Into<String>,
        move_type: Type,
        category: MoveCategory,
        power: u16,
        pp: u8,
    ) -> Self {
        Self {
            name: name.into(),
            move_type: Some(move_type),
            category,
            power,
            accuracy: Some(100),
            pp,
            max_pp: pp,
            disabled: false,
        }
    }

    pub fn with_accuracy(mut self, accuracy: Option<u8>) -> Self {
        self.accuracy = accuracy;
        self
    }

    /// The move every combatant falls back to once nothing else is usable
    pub fn struggle() -> Self {
        Self {
            name: "Struggle".to_string(),
            move_type: None,
            category: MoveCategory::Physical,
            power: 50,
            accuracy: None,
            pp: 1,
            max_pp: 1,
            disabled: false,
        }
    }

    pub fn is_struggle(&self) -> bool {
        self.move_type.is_none() && self.name == "Struggle"
    }

    /// Selectable: has uses left and is not disabled
    pub fn is_usable(&self) -> bool {
        self.pp > 0 && !self.disabled
    }

    pub fn is_status(&self) -> bool {
        self.category == MoveCategory::Status || self.power == 0
    }

    /// Spend one use
    pub fn consume_pp(&mut self) {
        self.pp = self.pp.saturating_sub(1);
    }

    /// Agent-facing view at a 1-based slot index
    pub fn view(&self, index: usize) -> MoveView {
        MoveView {
            index,
            name: self.name.clone(),
            move_type: self
                .move_type
                .map(|t| t.as_str().to_string())
                .unwrap_or_else(|| "???".to_string()),
            category: self.category.as_str().to_string(),
            power: self.power,
            pp: self.pp,
            max_pp: self.max_pp,
            disabled: self.disabled,
        }
    }
}

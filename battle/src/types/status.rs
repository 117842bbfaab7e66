//! Non-volatile status conditions

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Non-volatile status conditions (persist through switching)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Status {
    Burn,
    Freeze,
    Paralysis,
    Poison,
    BadPoison,
    Sleep,
}

impl Status {
    /// Parse from the short code ("brn", "frz", "par", "psn", "tox", "slp")
    /// or the display name
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "brn" | "burn" => Some(Status::Burn),
            "frz" | "freeze" => Some(Status::Freeze),
            "par" | "paralysis" => Some(Status::Paralysis),
            "psn" | "poison" => Some(Status::Poison),
            "tox" | "toxic" => Some(Status::BadPoison),
            "slp" | "sleep" => Some(Status::Sleep),
            _ => None,
        }
    }

    /// Short code, as shown to agents
    pub fn code(&self) -> &'static str {
        match self {
            Status::Burn => "brn",
            Status::Freeze => "frz",
            Status::Paralysis => "par",
            Status::Poison => "psn",
            Status::BadPoison => "tox",
            Status::Sleep => "slp",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Burn => "Burn",
            Status::Freeze => "Freeze",
            Status::Paralysis => "Paralysis",
            Status::Poison => "Poison",
            Status::BadPoison => "Toxic",
            Status::Sleep => "Sleep",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

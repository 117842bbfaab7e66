//! Special resources (one-shot or limited tactical options)

use std::fmt;

use serde::{Deserialize, Serialize};

/// A limited-use option a side may activate alongside a move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecialResource {
    Terastallize,
    Dynamax,
    #[serde(rename = "zmove")]
    ZMove,
    #[serde(rename = "mega")]
    MegaEvolution,
}

impl SpecialResource {
    pub const ALL: [SpecialResource; 4] = [
        SpecialResource::Terastallize,
        SpecialResource::Dynamax,
        SpecialResource::ZMove,
        SpecialResource::MegaEvolution,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().replace(['-', '_', ' '], "").as_str() {
            "terastallize" | "tera" | "terastal" => Some(SpecialResource::Terastallize),
            "dynamax" | "max" | "gigantamax" => Some(SpecialResource::Dynamax),
            "zmove" | "z" => Some(SpecialResource::ZMove),
            "mega" | "megaevolution" | "megaevolve" => Some(SpecialResource::MegaEvolution),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SpecialResource::Terastallize => "terastallize",
            SpecialResource::Dynamax => "dynamax",
            SpecialResource::ZMove => "zmove",
            SpecialResource::MegaEvolution => "mega",
        }
    }

    /// Permanent transformations can be activated at most once per combatant
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            SpecialResource::Terastallize | SpecialResource::MegaEvolution
        )
    }
}

impl fmt::Display for SpecialResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

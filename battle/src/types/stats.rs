//! Stats, stat stages and stat calculation

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Stats that can carry a stage modifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Stat {
    Atk,
    Def,
    Spa,
    Spd,
    Spe,
    Accuracy,
    Evasion,
}

impl Stat {
    pub const ALL: [Stat; 7] = [
        Stat::Atk,
        Stat::Def,
        Stat::Spa,
        Stat::Spd,
        Stat::Spe,
        Stat::Accuracy,
        Stat::Evasion,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "atk" | "attack" => Some(Stat::Atk),
            "def" | "defense" => Some(Stat::Def),
            "spa" | "spatk" | "specialattack" => Some(Stat::Spa),
            "spd" | "spdef" | "specialdefense" => Some(Stat::Spd),
            "spe" | "speed" => Some(Stat::Spe),
            "accuracy" | "acc" => Some(Stat::Accuracy),
            "evasion" | "eva" => Some(Stat::Evasion),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stat::Atk => "atk",
            Stat::Def => "def",
            Stat::Spa => "spa",
            Stat::Spd => "spd",
            Stat::Spe => "spe",
            Stat::Accuracy => "accuracy",
            Stat::Evasion => "evasion",
        }
    }
}

impl std::fmt::Display for Stat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A full set of six stats (base stats, EVs, IVs or computed values)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StatBlock {
    pub hp: u32,
    pub atk: u32,
    pub def: u32,
    pub spa: u32,
    pub spd: u32,
    pub spe: u32,
}

impl StatBlock {
    pub fn new(hp: u32, atk: u32, def: u32, spa: u32, spd: u32, spe: u32) -> Self {
        Self {
            hp,
            atk,
            def,
            spa,
            spd,
            spe,
        }
    }

    /// The same value in every stat
    pub fn uniform(value: u32) -> Self {
        Self::new(value, value, value, value, value, value)
    }

    /// Value for a staged stat (accuracy/evasion have no stat value)
    pub fn get(&self, stat: Stat) -> u32 {
        match stat {
            Stat::Atk => self.atk,
            Stat::Def => self.def,
            Stat::Spa => self.spa,
            Stat::Spd => self.spd,
            Stat::Spe => self.spe,
            Stat::Accuracy | Stat::Evasion => 0,
        }
    }

    /// Compute in-battle stats from base stats at a level
    ///
    /// HP = (2B + IV + EV/4) * L / 100 + L + 10
    /// other = (2B + IV + EV/4) * L / 100 + 5
    pub fn at_level(base: &StatBlock, level: u8, evs: &StatBlock, ivs: &StatBlock) -> Self {
        let level = level as u32;
        let core = |b: u32, ev: u32, iv: u32| (2 * b + iv + ev / 4) * level / 100;

        Self {
            hp: core(base.hp, evs.hp, ivs.hp) + level + 10,
            atk: core(base.atk, evs.atk, ivs.atk) + 5,
            def: core(base.def, evs.def, ivs.def) + 5,
            spa: core(base.spa, evs.spa, ivs.spa) + 5,
            spd: core(base.spd, evs.spd, ivs.spd) + 5,
            spe: core(base.spe, evs.spe, ivs.spe) + 5,
        }
    }
}

/// Stat stages (-6 to +6)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StatStages {
    pub atk: i8,
    pub def: i8,
    pub spa: i8,
    pub spd: i8,
    pub spe: i8,
    pub accuracy: i8,
    pub evasion: i8,
}

impl StatStages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, stat: Stat) -> i8 {
        match stat {
            Stat::Atk => self.atk,
            Stat::Def => self.def,
            Stat::Spa => self.spa,
            Stat::Spd => self.spd,
            Stat::Spe => self.spe,
            Stat::Accuracy => self.accuracy,
            Stat::Evasion => self.evasion,
        }
    }

    fn slot(&mut self, stat: Stat) -> &mut i8 {
        match stat {
            Stat::Atk => &mut self.atk,
            Stat::Def => &mut self.def,
            Stat::Spa => &mut self.spa,
            Stat::Spd => &mut self.spd,
            Stat::Spe => &mut self.spe,
            Stat::Accuracy => &mut self.accuracy,
            Stat::Evasion => &mut self.evasion,
        }
    }

    /// Apply a stage change, returns the change actually applied
    pub fn boost(&mut self, stat: Stat, amount: i8) -> i8 {
        let slot = self.slot(stat);
        let before = *slot;
        *slot = before.saturating_add(amount).clamp(-6, 6);
        *slot - before
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_clear(&self) -> bool {
        Stat::ALL.iter().all(|s| self.get(*s) == 0)
    }

    /// Non-zero stages keyed by stat name
    pub fn non_zero(&self) -> BTreeMap<String, i8> {
        Stat::ALL
            .iter()
            .filter(|s| self.get(**s) != 0)
            .map(|s| (s.as_str().to_string(), self.get(*s)))
            .collect()
    }

    /// Multiplier for a stage on atk/def/spa/spd/spe
    /// +1 = 1.5x, +2 = 2x, ..., +6 = 4x
    /// -1 = 0.67x, -2 = 0.5x, ..., -6 = 0.25x
    pub fn multiplier(stage: i8) -> f64 {
        let stage = stage.clamp(-6, 6) as i32;
        if stage >= 0 {
            (2 + stage) as f64 / 2.0
        } else {
            2.0 / (2 - stage) as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boost_clamps_and_reports_change() {
        let mut stages = StatStages::new();

        assert_eq!(stages.boost(Stat::Atk, 2), 2);
        assert_eq!(stages.atk, 2);

        stages.atk = 5;
        assert_eq!(stages.boost(Stat::Atk, 3), 1);
        assert_eq!(stages.atk, 6);
        assert_eq!(stages.boost(Stat::Atk, 1), 0);

        stages.def = -5;
        assert_eq!(stages.boost(Stat::Def, -3), -1);
        assert_eq!(stages.def, -6);
    }

    #[test]
    fn test_clear_and_non_zero() {
        let mut stages = StatStages::new();
        stages.boost(Stat::Spe, -1);
        stages.boost(Stat::Spa, 2);

        let shown = stages.non_zero();
        assert_eq!(shown.len(), 2);
        assert_eq!(shown["spe"], -1);
        assert_eq!(shown["spa"], 2);

        stages.clear();
        assert!(stages.is_clear());
        assert!(stages.non_zero().is_empty());
    }

    #[test]
    fn test_stage_multiplier() {
        assert!((StatStages::multiplier(0) - 1.0).abs() < 0.001);
        assert!((StatStages::multiplier(1) - 1.5).abs() < 0.001);
        assert!((StatStages::multiplier(6) - 4.0).abs() < 0.001);
        assert!((StatStages::multiplier(-1) - 2.0 / 3.0).abs() < 0.001);
        assert!((StatStages::multiplier(-6) - 0.25).abs() < 0.001);
    }

    #[test]
    fn test_stats_at_level() {
        // Garchomp base stats, no investment, perfect IVs, level 50
        let base = StatBlock::new(108, 130, 95, 80, 85, 102);
        let stats = StatBlock::at_level(&base, 50, &StatBlock::default(), &StatBlock::uniform(31));

        assert_eq!(stats.hp, 183);
        assert_eq!(stats.atk, 150);
        assert_eq!(stats.spe, 122);
    }

    #[test]
    fn test_stat_parse() {
        assert_eq!(Stat::parse("Speed"), Some(Stat::Spe));
        assert_eq!(Stat::parse("spa"), Some(Stat::Spa));
        assert_eq!(Stat::parse("hp"), None);
    }
}

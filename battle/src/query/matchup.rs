//! Type matchup helpers

use crate::types::Type;

/// Check if defender is immune (0x effectiveness) to a type
pub fn is_immune_to(defender_types: &[Type], attacking_type: Type) -> bool {
    attacking_type.effectiveness_multi(defender_types) == 0.0
}

/// Battle-log phrase for an effectiveness multiplier
pub fn describe_effectiveness(multiplier: f32) -> &'static str {
    if multiplier == 0.0 {
        "It had no effect..."
    } else if multiplier > 1.0 {
        "It's super effective!"
    } else if multiplier < 1.0 {
        "It's not very effective..."
    } else {
        "It hit."
    }
}

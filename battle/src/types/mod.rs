//! Data model: combatants, sides and field

mod combatant;
mod conditions;
mod field;
mod moves;
mod pokemon_type;
mod side;
mod stats;
mod status;

pub use combatant::{Build, Combatant};
pub use conditions::{Terrain, Weather};
pub use field::FieldState;
pub use moves::{MoveCategory, MoveSlot};
pub use pokemon_type::{TYPE_CHART, Type};
pub use side::Side;
pub use stats::{Stat, StatBlock, StatStages};
pub use status::Status;

//! Type matchup queries used by the reference oracle and narration

mod matchup;

pub use matchup::{describe_effectiveness, is_immune_to};

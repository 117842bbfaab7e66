//! Match engine for LLM-vs-LLM turn-based battles.
//!
//! This crate owns the rules: it builds a match from two rosters, runs the
//! state machine, resolves simultaneous turns, and turns raw agent replies
//! into legal choices. It does no I/O; agents and timing live in
//! `arbiter-client`.
//!
//! # Overview
//!
//! ```text
//! arbiter-protocol (requests, replies)
//!        │
//!        ▼
//! arbiter-battle (rules + state machine) ← THIS CRATE
//!        │
//!        └─> arbiter-client (agents, arena driver)
//! ```
//!
//! # Main Types
//!
//! ## Data model
//! - [`Combatant`] - One battler with stats, moves and resource flags
//! - [`Side`] - One player's party, entry and active slot
//! - [`FormatRules`] - Generation, entry size, resources, turn limit
//!
//! ## Running a match
//! - [`create_match`] - Validate two [`SideSetup`]s and build a [`Match`]
//! - [`Match`] - Lifecycle state machine; ask [`Match::next_request`] what it needs
//! - [`resolver::resolve_turn`] - One simultaneous turn
//! - [`MechanicsOracle`] - Pluggable damage calculator ([`ChartOracle`] is built in)
//!
//! ## Decisions
//! - [`decision::build_request`] - What an agent is shown
//! - [`decision::interpret_reply`] - Raw reply to a legal [`Choice`]
//!
//! # Example Usage
//!
//! ```ignore
//! use arbiter_battle::{Action, ChartOracle, FormatRules, SideSetup, create_match};
//!
//! let mut m = create_match(SideSetup::new("p1", team1), SideSetup::new("p2", team2), FormatRules::new())?;
//! m.start();
//! m.apply_team_order([vec![0, 1, 2, 3, 4, 5], vec![0, 1, 2, 3, 4, 5]])?;
//!
//! let report = m.resolve_turn(&ChartOracle, [Action::use_move(0), Action::use_move(1)])?;
//! for entry in m.log().iter() {
//!     println!("{}", entry);
//! }
//! ```

pub mod action;
pub mod decision;
pub mod format;
pub mod log;
pub mod machine;
pub mod oracle;
pub mod query;
pub mod resolver;
pub mod types;

#[cfg(test)]
mod testing;

// Re-export main types at crate root for convenience
pub use action::{Action, ActionError, ResourceDenial, check_resource, default_action};
pub use decision::{Choice, Decision, DecisionOrigin};
pub use format::{EntryFormat, FormatRules, SpeedTieBreak};
pub use log::{LogEntry, MatchEvent, MatchLog};
pub use machine::{
    EndReason, MachineError, Match, MatchOutcome, MatchPhase, MatchRequest, MatchSnapshot,
    SetupError, SideSetup, StallDetector, StallVerdict, create_match,
};
pub use oracle::{ChartOracle, MechanicsOracle, OracleError, OracleRequest, OracleResponse};
pub use resolver::{TurnPhase, TurnReport};
pub use types::{
    Build, Combatant, FieldState, MoveCategory, MoveSlot, Side, Stat, StatBlock, StatStages,
    Status, TYPE_CHART, Terrain, Type, Weather,
};

// Re-export commonly used protocol types
pub use arbiter_protocol::{DecisionRequest, SideId, SpecialResource, TaskKind};

//! Narrated match log
//!
//! The log is append-only. Every entry carries the turn it happened on;
//! callers that poll the match keep a cursor and read [`MatchLog::since`].

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use arbiter_protocol::{SideId, SpecialResource, TaskKind};

use crate::decision::DecisionOrigin;
use crate::machine::{EndReason, MatchOutcome};
use crate::types::{Stat, Status};

/// Something that happened during a match
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "camelCase"))]
pub enum MatchEvent {
    MatchStart {
        p1: String,
        p2: String,
        format: String,
    },
    TeamOrder {
        side: SideId,
        species: Vec<String>,
    },
    TurnStart {
        turn: u32,
    },
    SendOut {
        side: SideId,
        species: String,
    },
    SwitchIn {
        side: SideId,
        from: String,
        to: String,
    },
    SpeedCheck {
        first: SideId,
        p1_speed: u32,
        p2_speed: u32,
        tie: bool,
    },
    ResourceActivated {
        side: SideId,
        species: String,
        resource: SpecialResource,
    },
    ResourceDenied {
        side: SideId,
        resource: SpecialResource,
        reason: String,
    },
    MoveUsed {
        side: SideId,
        species: String,
        move_name: String,
    },
    MoveFailed {
        side: SideId,
        species: String,
        move_name: String,
        reason: String,
    },
    Effectiveness {
        side: SideId,
        multiplier: f32,
    },
    Damage {
        side: SideId,
        species: String,
        amount: u32,
        hp: u32,
        max_hp: u32,
    },
    Heal {
        side: SideId,
        species: String,
        amount: u32,
        hp: u32,
        max_hp: u32,
    },
    Recoil {
        side: SideId,
        species: String,
        amount: u32,
    },
    StatusInflicted {
        side: SideId,
        species: String,
        status: Status,
    },
    StatChange {
        side: SideId,
        species: String,
        stat: Stat,
        change: i8,
    },
    Fainted {
        side: SideId,
        species: String,
    },
    /// An action broke an invariant and was replaced
    ActionRejected {
        side: SideId,
        action: String,
        reason: String,
    },
    /// The agent's reply was not used as given
    Fallback {
        side: SideId,
        task: TaskKind,
        origin: DecisionOrigin,
        reason: String,
    },
    OracleFault {
        side: SideId,
        move_name: String,
        reason: String,
    },
    StallRecovered {
        turn: u32,
    },
    MatchEnd {
        outcome: MatchOutcome,
        reason: EndReason,
    },
}

impl MatchEvent {
    /// Whether this entry marks degraded decision quality or an internal fault
    pub fn is_fault(&self) -> bool {
        matches!(
            self,
            MatchEvent::ActionRejected { .. }
                | MatchEvent::Fallback { .. }
                | MatchEvent::OracleFault { .. }
                | MatchEvent::StallRecovered { .. }
        )
    }
}

impl fmt::Display for MatchEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchEvent::MatchStart { p1, p2, format } => {
                write!(f, "{} vs {} ({})", p1, p2, format)
            }
            MatchEvent::TeamOrder { side, species } => {
                write!(f, "[{}] team order: {}", side, species.join(", "))
            }
            MatchEvent::TurnStart { turn } => write!(f, "=== Turn {} ===", turn),
            MatchEvent::SendOut { side, species } => write!(f, "[{}] sent out {}!", side, species),
            MatchEvent::SwitchIn { side, from, to } => {
                write!(f, "[{}] withdrew {} and sent out {}!", side, from, to)
            }
            MatchEvent::SpeedCheck {
                first,
                p1_speed,
                p2_speed,
                tie,
            } => {
                write!(f, "speed p1 {} vs p2 {}: {} moves first", p1_speed, p2_speed, first)?;
                if *tie {
                    f.write_str(" (tie)")?;
                }
                Ok(())
            }
            MatchEvent::ResourceActivated {
                side,
                species,
                resource,
            } => write!(f, "[{}] {} used {}!", side, species, resource),
            MatchEvent::ResourceDenied {
                side,
                resource,
                reason,
            } => write!(f, "[{}] {} denied: {}", side, resource, reason),
            MatchEvent::MoveUsed {
                side,
                species,
                move_name,
            } => write!(f, "[{}] {} used {}!", side, species, move_name),
            MatchEvent::MoveFailed {
                side,
                species,
                move_name,
                reason,
            } => write!(f, "[{}] {}'s {} failed: {}", side, species, move_name, reason),
            MatchEvent::Effectiveness { multiplier, .. } => {
                f.write_str(crate::query::describe_effectiveness(*multiplier))
            }
            MatchEvent::Damage {
                side,
                species,
                amount,
                hp,
                max_hp,
            } => write!(
                f,
                "[{}] {} took {} damage ({}/{})",
                side, species, amount, hp, max_hp
            ),
            MatchEvent::Heal {
                side,
                species,
                amount,
                hp,
                max_hp,
            } => write!(
                f,
                "[{}] {} restored {} HP ({}/{})",
                side, species, amount, hp, max_hp
            ),
            MatchEvent::Recoil {
                side,
                species,
                amount,
            } => write!(f, "[{}] {} is hit with {} recoil", side, species, amount),
            MatchEvent::StatusInflicted {
                side,
                species,
                status,
            } => write!(f, "[{}] {} is afflicted with {}", side, species, status),
            MatchEvent::StatChange {
                side,
                species,
                stat,
                change,
            } => write!(f, "[{}] {}'s {} changed by {:+}", side, species, stat, change),
            MatchEvent::Fainted { side, species } => write!(f, "[{}] {} fainted!", side, species),
            MatchEvent::ActionRejected {
                side,
                action,
                reason,
            } => write!(f, "[{}] rejected {}: {}; using default", side, action, reason),
            MatchEvent::Fallback {
                side,
                task,
                origin,
                reason,
            } => write!(f, "[{}] {} fallback ({}): {}", side, task, origin, reason),
            MatchEvent::OracleFault {
                side,
                move_name,
                reason,
            } => write!(f, "[{}] {} had no effect (oracle fault: {})", side, move_name, reason),
            MatchEvent::StallRecovered { turn } => {
                write!(f, "turn {} stalled; default actions applied", turn)
            }
            MatchEvent::MatchEnd { outcome, reason } => match outcome {
                MatchOutcome::Draw => write!(f, "The match ended in a draw ({})", reason),
                other => write!(f, "{} wins ({})", other, reason),
            },
        }
    }
}

/// A log entry stamped with its turn
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LogEntry {
    pub turn: u32,
    pub event: MatchEvent,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.event.fmt(f)
    }
}

/// Append-only list of events
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MatchLog {
    entries: Vec<LogEntry>,
}

impl MatchLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: u32, event: MatchEvent) {
        tracing::debug!(turn, event = %event, "match event");
        self.entries.push(LogEntry { turn, event });
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Entries appended at or after `cursor`
    pub fn since(&self, cursor: usize) -> &[LogEntry] {
        self.entries.get(cursor..).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_since_cursor() {
        let mut log = MatchLog::new();
        log.push(0, MatchEvent::TurnStart { turn: 1 });
        log.push(1, MatchEvent::StallRecovered { turn: 1 });

        assert_eq!(log.since(0).len(), 2);
        assert_eq!(log.since(1).len(), 1);
        assert!(log.since(2).is_empty());
        assert!(log.since(10).is_empty());
    }

    #[test]
    fn test_narration() {
        let event = MatchEvent::Damage {
            side: SideId::P2,
            species: "Gengar".to_string(),
            amount: 40,
            hp: 80,
            max_hp: 120,
        };
        assert_eq!(event.to_string(), "[p2] Gengar took 40 damage (80/120)");

        let end = MatchEvent::MatchEnd {
            outcome: MatchOutcome::Draw,
            reason: EndReason::TurnLimit,
        };
        assert_eq!(end.to_string(), "The match ended in a draw (turn limit)");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_event_json_is_tagged() {
        let event = MatchEvent::Fainted {
            side: SideId::P1,
            species: "Gengar".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "fainted");
        assert_eq!(json["side"], "p1");
    }

    #[test]
    fn test_fault_markers() {
        let fallback = MatchEvent::Fallback {
            side: SideId::P1,
            task: TaskKind::MoveOrSwitch,
            origin: DecisionOrigin::Fallback,
            reason: "invalid JSON".to_string(),
        };
        assert!(fallback.is_fault());
        assert!(!MatchEvent::TurnStart { turn: 3 }.is_fault());
    }
}

//! Archival record of a finished match

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use arbiter_battle::{DecisionOrigin, EndReason, LogEntry, MatchOutcome};
use arbiter_protocol::{SideId, TaskKind};

/// One justification given by an agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasoningEntry {
    pub turn: u32,
    pub side: SideId,
    pub task: TaskKind,
    pub text: String,
    pub origin: DecisionOrigin,
}

/// Everything worth keeping once a match is over
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub id: String,
    pub started_at: DateTime<Utc>,
    pub p1_name: String,
    pub p2_name: String,
    pub result: MatchOutcome,
    pub end_reason: Option<EndReason>,
    pub total_turns: u32,
    pub log: Vec<LogEntry>,
    pub reasoning: Vec<ReasoningEntry>,
}

impl MatchRecord {
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn winner_name(&self) -> Option<&str> {
        match self.result.winner()? {
            SideId::P1 => Some(&self.p1_name),
            SideId::P2 => Some(&self.p2_name),
        }
    }
}

/// Match id derived from the start time
pub(crate) fn match_id(started_at: &DateTime<Utc>) -> String {
    format!("match-{}", started_at.format("%Y%m%dT%H%M%S%3f"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbiter_battle::MatchEvent;
    use chrono::TimeZone;

    fn record() -> MatchRecord {
        let started_at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 30, 0).unwrap();
        MatchRecord {
            id: match_id(&started_at),
            started_at,
            p1_name: "alpha".to_string(),
            p2_name: "beta".to_string(),
            result: MatchOutcome::P2,
            end_reason: Some(EndReason::Knockout),
            total_turns: 7,
            log: vec![LogEntry {
                turn: 7,
                event: MatchEvent::MatchEnd {
                    outcome: MatchOutcome::P2,
                    reason: EndReason::Knockout,
                },
            }],
            reasoning: vec![ReasoningEntry {
                turn: 1,
                side: SideId::P1,
                task: TaskKind::MoveOrSwitch,
                text: "resisted".to_string(),
                origin: DecisionOrigin::Agent,
            }],
        }
    }

    #[test]
    fn test_match_id() {
        assert_eq!(record().id, "match-20260301T123000000");
    }

    #[test]
    fn test_json_shape() {
        let rec = record();
        let json = rec.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["result"], "p2");
        assert_eq!(value["p1Name"], "alpha");
        assert_eq!(value["totalTurns"], 7);
        assert_eq!(MatchRecord::from_json(&json).unwrap(), rec);
        assert_eq!(rec.winner_name(), Some("beta"));
    }
}

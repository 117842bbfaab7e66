//! Decision request types
//!
//! These types describe the JSON object handed to a decision agent whenever
//! one side has to make a choice. Indices are 1-based on the wire.

mod views;

use serde::{Deserialize, Serialize};

use crate::SideId;

pub use views::{
    ActiveView, BattleView, FieldView, MoveView, OpponentView, PreviewMember, RosterView,
    TeamPreview,
};

/// What kind of choice the agent is being asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskKind {
    /// Order the roster before the match; the first members form the entry
    TeamPreview,
    /// Regular turn: use a move or switch
    MoveOrSwitch,
    /// The active combatant fainted and a replacement must be sent in
    ForcedSwitch,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::TeamPreview => "teamPreview",
            TaskKind::MoveOrSwitch => "moveOrSwitch",
            TaskKind::ForcedSwitch => "forcedSwitch",
        }
    }
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request asking one side to make a decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRequest {
    /// Task discriminator
    pub task: TaskKind,

    /// Which side is deciding
    pub side: SideId,

    /// Current turn (0 during team preview)
    pub turn: u32,

    /// Human-readable format label, e.g. "gen9 3v3 singles"
    pub format: String,

    /// Rosters for team preview
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<TeamPreview>,

    /// Minimized battle snapshot for a regular turn
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<BattleView>,

    /// Legal switch-in indices for a forced switch
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub switch_options: Vec<usize>,
}

impl DecisionRequest {
    /// Build a team preview request
    pub fn team_preview(side: SideId, format: impl Into<String>, preview: TeamPreview) -> Self {
        Self {
            task: TaskKind::TeamPreview,
            side,
            turn: 0,
            format: format.into(),
            preview: Some(preview),
            state: None,
            switch_options: Vec::new(),
        }
    }

    /// Build a regular move-or-switch request
    pub fn move_or_switch(
        side: SideId,
        turn: u32,
        format: impl Into<String>,
        state: BattleView,
    ) -> Self {
        Self {
            task: TaskKind::MoveOrSwitch,
            side,
            turn,
            format: format.into(),
            preview: None,
            state: Some(state),
            switch_options: Vec::new(),
        }
    }

    /// Build a forced switch request carrying only the legal switch-in indices
    pub fn forced_switch(
        side: SideId,
        turn: u32,
        format: impl Into<String>,
        switch_options: Vec<usize>,
    ) -> Self {
        Self {
            task: TaskKind::ForcedSwitch,
            side,
            turn,
            format: format.into(),
            preview: None,
            state: None,
            switch_options,
        }
    }

    /// Serialize the request to compact JSON
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a request from JSON
    pub fn parse(json: &str) -> Option<Self> {
        serde_json::from_str(json).ok()
    }

    /// Number of move slots on our active combatant (0 if not a move request)
    pub fn move_count(&self) -> usize {
        self.state.as_ref().map(|s| s.me.moves.len()).unwrap_or(0)
    }

    /// Number of roster members to order during team preview
    pub fn preview_size(&self) -> usize {
        self.preview.as_ref().map(|p| p.me.len()).unwrap_or(0)
    }

    /// Indices (1-based) the side may switch into
    pub fn available_switches(&self) -> Vec<usize> {
        if self.task == TaskKind::ForcedSwitch {
            return self.switch_options.clone();
        }

        self.state
            .as_ref()
            .map(|s| {
                s.team
                    .iter()
                    .filter(|p| !p.active && !p.fainted)
                    .map(|p| p.index)
                    .collect()
            })
            .unwrap_or_default()
    }
}

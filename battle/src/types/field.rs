//! Global field state

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use arbiter_protocol::FieldView;

use super::conditions::{Terrain, Weather};

/// Field conditions shared by both sides
///
/// The match engine never changes these on its own; they are set when the
/// match is created and handed to the oracle and to agents as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FieldState {
    pub weather: Option<Weather>,
    pub terrain: Option<Terrain>,
}

impl FieldState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weather(mut self, weather: Weather) -> Self {
        self.weather = Some(weather);
        self
    }

    pub fn with_terrain(mut self, terrain: Terrain) -> Self {
        self.terrain = Some(terrain);
        self
    }

    /// Agent-facing view
    pub fn view(&self) -> FieldView {
        FieldView {
            weather: self.weather.map(|w| w.as_str().to_string()),
            terrain: self.terrain.map(|t| t.as_str().to_string()),
        }
    }
}

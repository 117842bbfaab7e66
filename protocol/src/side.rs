//! Side identifiers shared by requests, replies and the match engine

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the two sides in a match (p1, p2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SideId {
    P1,
    P2,
}

impl SideId {
    /// Both sides in fixed order
    pub const BOTH: [SideId; 2] = [SideId::P1, SideId::P2];

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "p1" => Some(SideId::P1),
            "p2" => Some(SideId::P2),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SideId::P1 => "p1",
            SideId::P2 => "p2",
        }
    }

    /// Array index (0 for p1, 1 for p2)
    pub fn index(&self) -> usize {
        match self {
            SideId::P1 => 0,
            SideId::P2 => 1,
        }
    }

    pub fn opponent(&self) -> SideId {
        match self {
            SideId::P1 => SideId::P2,
            SideId::P2 => SideId::P1,
        }
    }
}

impl fmt::Display for SideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(SideId::parse("p1"), Some(SideId::P1));
        assert_eq!(SideId::parse(" P2 "), Some(SideId::P2));
        assert_eq!(SideId::parse("p3"), None);
    }

    #[test]
    fn test_opponent_and_index() {
        assert_eq!(SideId::P1.opponent(), SideId::P2);
        assert_eq!(SideId::P2.opponent(), SideId::P1);
        assert_eq!(SideId::P1.index(), 0);
        assert_eq!(SideId::P2.index(), 1);
    }
}

//! Stall detection for the outer driver loop

/// What to do about the turn just observed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StallVerdict {
    /// First look at this turn
    Progressing,
    /// Same turn as last time: bypass the agents once
    Recover,
    /// Still the same turn after recovery
    Fault,
}

/// Notices when successive advances fail to move the turn counter
#[derive(Debug, Clone, Default)]
pub struct StallDetector {
    last_turn: Option<u32>,
    seen: u32,
}

impl StallDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the turn at the start of an advance
    pub fn observe(&mut self, turn: u32) -> StallVerdict {
        if self.last_turn == Some(turn) {
            self.seen = self.seen.saturating_add(1);
        } else {
            self.last_turn = Some(turn);
            self.seen = 1;
        }

        match self.seen {
            1 => StallVerdict::Progressing,
            2 => StallVerdict::Recover,
            _ => StallVerdict::Fault,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_never_stalls() {
        let mut d = StallDetector::new();
        for turn in 0..5 {
            assert_eq!(d.observe(turn), StallVerdict::Progressing);
        }
    }

    #[test]
    fn test_recover_then_fault() {
        let mut d = StallDetector::new();
        assert_eq!(d.observe(4), StallVerdict::Progressing);
        assert_eq!(d.observe(4), StallVerdict::Recover);
        assert_eq!(d.observe(4), StallVerdict::Fault);
    }

    #[test]
    fn test_recovery_resets_on_progress() {
        let mut d = StallDetector::new();
        d.observe(2);
        assert_eq!(d.observe(2), StallVerdict::Recover);
        assert_eq!(d.observe(3), StallVerdict::Progressing);
        assert_eq!(d.observe(3), StallVerdict::Recover);

        d.reset();
        assert_eq!(d.observe(3), StallVerdict::Progressing);
    }
}

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use arbiter_battle::{MatchOutcome, MatchSnapshot};

/// State shared between an arena and its handles
pub struct ArenaState {
    pub stopped: AtomicBool,
    pub latest: RwLock<Option<MatchSnapshot>>,
}

impl ArenaState {
    pub fn new() -> Self {
        Self {
            stopped: AtomicBool::new(false),
            latest: RwLock::new(None),
        }
    }
}

impl Default for ArenaState {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloneable remote control for a running [`Arena`](crate::Arena).
///
/// Stopping takes effect between `advance()` calls; a turn that is already
/// executing always settles first.
#[derive(Clone)]
pub struct ArenaHandle {
    state: Arc<ArenaState>,
}

impl ArenaHandle {
    pub fn new(state: Arc<ArenaState>) -> Self {
        Self { state }
    }

    pub fn stop(&self) {
        self.state.stopped.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.state.stopped.load(Ordering::Relaxed)
    }

    /// Snapshot published after the most recent `advance()`
    pub fn snapshot(&self) -> Option<MatchSnapshot> {
        self.state.latest.read().ok()?.clone()
    }

    pub fn turn(&self) -> Option<u32> {
        self.snapshot().map(|s| s.turn)
    }

    pub fn outcome(&self) -> MatchOutcome {
        self.snapshot().map(|s| s.outcome).unwrap_or_default()
    }

    pub(crate) fn publish(&self, snapshot: MatchSnapshot) {
        if let Ok(mut latest) = self.state.latest.write() {
            *latest = Some(snapshot);
        }
    }
}

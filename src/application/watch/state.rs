//! Watch controller state machine

use std::fmt;

/// Where the controller is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Building,
    Watching,
}

/// Inputs that move the controller between phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Session started; run the first build
    Start,
    /// A build finished, successfully or not
    BuildFinished,
    /// A debounced change batch is ready
    Changes,
    Stop,
}

impl Phase {
    /// The phase after `trigger`, or `None` if it does not apply here.
    pub fn next(self, trigger: Trigger) -> Option<Phase> {
        match (self, trigger) {
            (Phase::Idle, Trigger::Start) => Some(Phase::Building),
            (Phase::Building, Trigger::BuildFinished) => Some(Phase::Watching),
            (Phase::Building, Trigger::Stop) => Some(Phase::Idle),
            (Phase::Watching, Trigger::Changes) => Some(Phase::Building),
            (Phase::Watching, Trigger::Stop) => Some(Phase::Idle),
            _ => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::Building => "building",
            Phase::Watching => "watching",
        };
        f.write_str(name)
    }
}

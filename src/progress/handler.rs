//! Progress handler trait and events

use std::fmt;
use std::time::Duration;

/// Steps of one harvest run, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Build,
    Parse,
    Mine,
    Assemble,
    Remap,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Build => "build",
            Phase::Parse => "parse",
            Phase::Mine => "mine",
            Phase::Assemble => "assemble",
            Phase::Remap => "remap",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Events emitted during a harvest run
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Run started; `source` is the board or the transcript being mined
    Started { source: String },

    PhaseStarted { phase: Phase },

    PhaseComplete { phase: Phase, duration: Duration },

    /// Run completed successfully
    Completed { total_time: Duration },

    /// Run failed
    Failed { phase: Phase, error: String },
}

/// Trait for handling progress events during a run
pub trait ProgressHandler: Send + Sync {
    /// Called when a progress event occurs
    fn on_progress(&self, event: &ProgressEvent);
}

/// No-op handler that ignores all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl ProgressHandler for NoOpHandler {
    fn on_progress(&self, _event: &ProgressEvent) {}
}

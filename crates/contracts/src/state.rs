//! WorkerState - dispatch worker state machine

use serde::Serialize;
use std::fmt;

/// Dispatch worker state
///
/// `Idle -> WaitingRateLimit -> Sending -> {Success, Failure} -> Idle`;
/// `Stopped` is terminal and reached from `Idle` on shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerState {
    /// Blocked on the queue
    #[default]
    Idle,
    /// Message dequeued, waiting out the send interval
    WaitingRateLimit,
    /// Transport call in flight
    Sending,
    /// Last send classified as success
    Success,
    /// Last send classified as anything else
    Failure,
    /// Loop ended
    Stopped,
}

impl WorkerState {
    /// True once the worker loop has ended
    pub fn is_stopped(&self) -> bool {
        matches!(self, Self::Stopped)
    }
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::WaitingRateLimit => "waiting_rate_limit",
            Self::Sending => "sending",
            Self::Success => "success",
            Self::Failure => "failure",
            Self::Stopped => "stopped",
        };
        f.write_str(s)
    }
}

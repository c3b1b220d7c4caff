//! Test doubles shared by the unit tests

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use contracts::{Message, Outcome, PushTransport};
use tokio::time::Instant;

/// Transport that records every call and replays scripted outcomes
///
/// Answers `Success` once the script runs out.
#[derive(Clone, Default)]
pub(crate) struct RecordingTransport {
    calls: Arc<Mutex<Vec<(Instant, Message)>>>,
    outcomes: Arc<Mutex<VecDeque<Outcome>>>,
}

impl RecordingTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_outcomes(outcomes: impl IntoIterator<Item = Outcome>) -> Self {
        let transport = Self::default();
        transport.outcomes.lock().unwrap().extend(outcomes);
        transport
    }

    pub(crate) fn calls(&self) -> Vec<(Instant, Message)> {
        self.calls.lock().unwrap().clone()
    }

    /// Poll until `n` calls were recorded (virtual time when paused)
    pub(crate) async fn wait_for_calls(&self, n: usize) {
        let deadline = Instant::now() + Duration::from_secs(120);
        while self.calls.lock().unwrap().len() < n {
            assert!(Instant::now() < deadline, "timed out waiting for {n} calls");
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

impl PushTransport for RecordingTransport {
    fn name(&self) -> &str {
        "recording"
    }

    async fn send(&self, message: &Message) -> Outcome {
        self.calls
            .lock()
            .unwrap()
            .push((Instant::now(), message.clone()));
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Outcome::Success)
    }
}

//! Dispatcher error types

use thiserror::Error;

/// Dispatcher-specific errors
///
/// None of these are raised for per-message delivery failures; those are
/// [`contracts::Outcome`] values.
#[derive(Debug, Error)]
pub enum DispatcherError {
    /// Both title and body empty - dropped at the producer edge
    #[error("title and body cannot both be empty, message dropped")]
    EmptyMessage,

    /// Disabled or missing token - dropped at the producer edge
    #[error("dispatcher inactive (disabled or no token), message dropped")]
    Inactive,

    /// Queue closed by shutdown
    #[error("message queue closed")]
    QueueClosed,

    /// A worker generation is already running against the queue
    #[error("dispatch worker already running (generation {generation})")]
    AlreadyRunning { generation: u64 },

    /// Transport construction error (from contract)
    #[error("contract error: {0}")]
    Contract(#[from] contracts::ContractError),
}

impl DispatcherError {
    /// Stable reason label for rejection metrics
    pub fn reason(&self) -> &'static str {
        match self {
            Self::EmptyMessage => "empty",
            Self::Inactive => "inactive",
            Self::QueueClosed => "closed",
            Self::AlreadyRunning { .. } => "already_running",
            Self::Contract(_) => "contract",
        }
    }
}

//! Outcome - classified result of a single delivery attempt

use serde::Serialize;
use std::fmt;

/// Classified result of one transport attempt
///
/// Produced by the transport for every message it is handed. Expected
/// failure paths are variants here, not errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// Endpoint accepted the message
    Success,

    /// Endpoint reachable, but explicitly signaled failure
    ProviderRejected { code: i64, message: String },

    /// I/O failure talking to the endpoint (timeout, refused, unreadable body)
    TransportError { detail: String },

    /// HTTP 400
    BadRequest,

    /// HTTP 500
    ServerError,

    /// Any other status, or no response at all
    UnknownFailure { status: Option<u16> },
}

impl Outcome {
    /// Create a transport error outcome
    pub fn transport_error(detail: impl Into<String>) -> Self {
        Self::TransportError {
            detail: detail.into(),
        }
    }

    /// Create a provider rejection outcome
    pub fn provider_rejected(code: i64, message: impl Into<String>) -> Self {
        Self::ProviderRejected {
            code,
            message: message.into(),
        }
    }

    /// True only for [`Outcome::Success`]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Stable label (used as metric label and log field)
    pub fn label(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::ProviderRejected { .. } => "provider_rejected",
            Self::TransportError { .. } => "transport_error",
            Self::BadRequest => "bad_request",
            Self::ServerError => "server_error",
            Self::UnknownFailure { .. } => "unknown_failure",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::ProviderRejected { code, message } => {
                write!(f, "provider rejected (code {code}): {message}")
            }
            Self::TransportError { detail } => write!(f, "transport error: {detail}"),
            Self::BadRequest => write!(f, "bad request (HTTP 400)"),
            Self::ServerError => write!(f, "server error (HTTP 500)"),
            Self::UnknownFailure { status: Some(s) } => write!(f, "unknown failure (HTTP {s})"),
            Self::UnknownFailure { status: None } => write!(f, "unknown failure (no response)"),
        }
    }
}

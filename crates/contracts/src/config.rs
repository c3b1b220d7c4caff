//! PushConfig - dispatcher configuration snapshot
//!
//! Loaded once per worker generation and treated as immutable afterwards.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::Category;

/// Default minimum interval between two successful sends (seconds)
pub const DEFAULT_MIN_INTERVAL_SECONDS: f64 = 5.0;

/// Default HTTP request timeout (seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 10;

/// Push provider: endpoint layout plus request/response schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    /// `POST {base}/{token}` with `{title, msg}`; HTTP 200 is success
    #[default]
    Meow,
    /// `POST {base}/{token}` with `{title, msg}`; success when `status == 200`
    MeowStatus,
    /// `POST {endpoint}` with `{token, title, text}`; success when `errcode == 0`
    TokenBody,
}

impl Provider {
    /// Provider name (used for logging/metrics)
    pub fn name(&self) -> &'static str {
        match self {
            Self::Meow => "meow",
            Self::MeowStatus => "meow_status",
            Self::TokenBody => "token_body",
        }
    }

    /// Endpoint used when the config carries no override
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            Self::Meow | Self::MeowStatus => "http://api.chuckfang.com",
            Self::TokenBody => "http://api.chuckfang.com/send",
        }
    }

    /// True if the token is appended to the endpoint as a path segment
    pub fn embeds_token_in_path(&self) -> bool {
        matches!(self, Self::Meow | Self::MeowStatus)
    }
}

/// Dispatcher configuration snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushConfig {
    /// Master switch
    #[serde(default)]
    pub enabled: bool,

    /// Provider auth token
    #[serde(default)]
    pub token: String,

    /// Endpoint override (provider default when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Categories to forward (empty = forward all)
    #[serde(default)]
    pub allowed_categories: Vec<Category>,

    /// Minimum interval between successful sends
    #[serde(default = "default_min_interval_seconds")]
    pub min_interval_seconds: f64,

    /// Request/response schema
    #[serde(default)]
    pub provider: Provider,

    /// Prepended to every title in the request body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_prefix: Option<String>,

    /// HTTP request timeout
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
}

fn default_min_interval_seconds() -> f64 {
    DEFAULT_MIN_INTERVAL_SECONDS
}

fn default_request_timeout_seconds() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECONDS
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            token: String::new(),
            endpoint: None,
            allowed_categories: Vec::new(),
            min_interval_seconds: DEFAULT_MIN_INTERVAL_SECONDS,
            provider: Provider::default(),
            title_prefix: None,
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECONDS,
        }
    }
}

impl PushConfig {
    /// Enabled config with the given token, defaults elsewhere
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            enabled: true,
            token: token.into(),
            ..Self::default()
        }
    }

    /// Enabled and carrying a token
    pub fn is_active(&self) -> bool {
        self.enabled && !self.token.is_empty()
    }

    /// Category allow-list check
    ///
    /// An untagged message always passes; an empty allow-list passes everything.
    pub fn allows(&self, category: Option<&Category>) -> bool {
        match category {
            None => true,
            Some(_) if self.allowed_categories.is_empty() => true,
            Some(tag) => self.allowed_categories.contains(tag),
        }
    }

    /// Minimum send interval as a Duration
    ///
    /// NaN and negative values clamp to zero; values past `Duration::MAX`
    /// saturate.
    pub fn min_interval(&self) -> Duration {
        let secs = self.min_interval_seconds;
        if secs.is_nan() || secs <= 0.0 {
            return Duration::ZERO;
        }
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    }

    /// Request timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Effective endpoint base (override or provider default)
    pub fn endpoint_base(&self) -> &str {
        self.endpoint
            .as_deref()
            .unwrap_or_else(|| self.provider.default_endpoint())
    }
}

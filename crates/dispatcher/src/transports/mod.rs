//! Transport implementations
//!
//! One HTTP transport, parameterized by the provider's request schema.

mod classify;
mod http;
mod meow;
mod token_body;

pub use self::classify::{classify, SuccessIndicator};
pub use self::http::HttpTransport;
pub use self::meow::MeowSchema;
pub use self::token_body::TokenBodySchema;

use contracts::{Message, Provider, PushConfig};
use serde_json::Value;

/// Request/response schema of one push provider
pub trait RequestSchema: Send + Sync {
    /// Provider this schema speaks
    fn provider(&self) -> Provider;

    /// Target URL (token already embedded where the provider wants it)
    fn url(&self) -> &str;

    /// JSON request body for a message
    fn body(&self, message: &Message) -> Value;

    /// Where success is reported in a 200 response
    fn indicator(&self) -> SuccessIndicator;
}

/// Pick the schema for the configured provider
pub fn schema_for(config: &PushConfig) -> Box<dyn RequestSchema> {
    match config.provider {
        Provider::Meow => Box::new(MeowSchema::new(config)),
        Provider::MeowStatus => Box::new(MeowSchema::with_status_field(config)),
        Provider::TokenBody => Box::new(TokenBodySchema::new(config)),
    }
}

fn prefixed_title(prefix: Option<&str>, title: &str) -> String {
    match prefix {
        Some(prefix) => format!("{prefix}{title}"),
        None => title.to_string(),
    }
}

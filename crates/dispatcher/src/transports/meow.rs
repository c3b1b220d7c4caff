//! MeoW-style providers: token embedded in the URL path, `{title, msg}` body

use contracts::{Message, PushConfig, Provider};
use serde::Serialize;
use serde_json::Value;

use super::{prefixed_title, RequestSchema, SuccessIndicator};

#[derive(Serialize)]
struct MeowRequest<'a> {
    title: String,
    msg: &'a str,
}

/// `POST {base}/{token}` with `{"title", "msg"}`
///
/// The body falls back to the title when empty, since the endpoint rejects
/// an empty `msg`.
#[derive(Debug, Clone)]
pub struct MeowSchema {
    provider: Provider,
    url: String,
    title_prefix: Option<String>,
}

impl MeowSchema {
    /// Plain variant: HTTP 200 is success
    pub fn new(config: &PushConfig) -> Self {
        Self::build(Provider::Meow, config)
    }

    /// Variant reporting success in a `status` response field
    pub fn with_status_field(config: &PushConfig) -> Self {
        Self::build(Provider::MeowStatus, config)
    }

    fn build(provider: Provider, config: &PushConfig) -> Self {
        let base = config.endpoint_base().trim_end_matches('/');
        Self {
            provider,
            url: format!("{base}/{}", config.token),
            title_prefix: config.title_prefix.clone(),
        }
    }
}

impl RequestSchema for MeowSchema {
    fn provider(&self) -> Provider {
        self.provider
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn body(&self, message: &Message) -> Value {
        let msg = if message.body.is_empty() {
            &message.title
        } else {
            &message.body
        };
        let request = MeowRequest {
            title: prefixed_title(self.title_prefix.as_deref(), &message.title),
            msg,
        };
        serde_json::to_value(request).unwrap_or(Value::Null)
    }

    fn indicator(&self) -> SuccessIndicator {
        match self.provider {
            Provider::MeowStatus => SuccessIndicator::Status,
            _ => SuccessIndicator::None,
        }
    }
}

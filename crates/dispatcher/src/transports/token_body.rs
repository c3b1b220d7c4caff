//! Token-in-body provider: fixed endpoint, `{token, title, text}` body

use contracts::{Message, PushConfig, Provider};
use serde::Serialize;
use serde_json::Value;

use super::{prefixed_title, RequestSchema, SuccessIndicator};

#[derive(Serialize)]
struct TokenBodyRequest<'a> {
    token: &'a str,
    title: String,
    text: &'a str,
}

/// `POST {endpoint}` with `{"token", "title", "text"}`; success is `errcode == 0`
#[derive(Debug, Clone)]
pub struct TokenBodySchema {
    url: String,
    token: String,
    title_prefix: Option<String>,
}

impl TokenBodySchema {
    pub fn new(config: &PushConfig) -> Self {
        Self {
            url: config.endpoint_base().to_string(),
            token: config.token.clone(),
            title_prefix: config.title_prefix.clone(),
        }
    }
}

impl RequestSchema for TokenBodySchema {
    fn provider(&self) -> Provider {
        Provider::TokenBody
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn body(&self, message: &Message) -> Value {
        let request = TokenBodyRequest {
            token: &self.token,
            title: prefixed_title(self.title_prefix.as_deref(), &message.title),
            text: &message.body,
        };
        serde_json::to_value(request).unwrap_or(Value::Null)
    }

    fn indicator(&self) -> SuccessIndicator {
        SuccessIndicator::ErrCode
    }
}

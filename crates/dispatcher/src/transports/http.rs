//! HttpTransport - JSON POST to a push endpoint

use std::time::Duration;

use contracts::{ContractError, Message, Outcome, PushConfig, PushTransport};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use tracing::{debug, instrument};

use super::{classify, schema_for, RequestSchema};

/// HTTP push transport
///
/// Sends exactly one request per message; never retries.
pub struct HttpTransport {
    name: String,
    client: reqwest::Client,
    schema: Box<dyn RequestSchema>,
}

impl HttpTransport {
    /// Build the transport for the configured provider
    pub fn from_config(config: &PushConfig) -> Result<Self, ContractError> {
        Self::with_schema(schema_for(config), config.request_timeout())
    }

    /// Build with an explicit schema
    pub fn with_schema(
        schema: Box<dyn RequestSchema>,
        timeout: Duration,
    ) -> Result<Self, ContractError> {
        let name = schema.provider().name().to_string();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| {
                ContractError::transport_build(&name, format!("failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            name,
            client,
            schema,
        })
    }

    /// Target URL
    pub fn url(&self) -> &str {
        self.schema.url()
    }
}

impl PushTransport for HttpTransport {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "http_transport_send",
        skip(self, message),
        fields(provider = %self.name)
    )]
    async fn send(&self, message: &Message) -> Outcome {
        let body = self.schema.body(message);

        let response = match self.client.post(self.schema.url()).json(&body).send().await {
            Ok(response) => response,
            Err(e) => return Outcome::transport_error(format!("HTTP request failed: {e}")),
        };

        let status = response.status().as_u16();
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                return Outcome::transport_error(format!("failed to read response body: {e}"))
            }
        };

        debug!(status, bytes = bytes.len(), "Response received");

        classify(status, &bytes, self.schema.indicator())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::Provider;

    #[test]
    fn test_from_config_uses_provider_name() {
        let config = PushConfig {
            provider: Provider::TokenBody,
            ..PushConfig::with_token("T1")
        };
        let transport = HttpTransport::from_config(&config).unwrap();
        assert_eq!(transport.name(), "token_body");
        assert_eq!(transport.url(), "http://api.chuckfang.com/send");
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        // bind then drop to get a port nothing listens on
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = PushConfig {
            endpoint: Some(format!("http://{addr}")),
            ..PushConfig::with_token("T1")
        };
        let transport = HttpTransport::from_config(&config).unwrap();
        let outcome = transport.send(&Message::new("Hello", "World")).await;
        assert!(
            matches!(outcome, Outcome::TransportError { .. }),
            "got: {outcome:?}"
        );
    }
}

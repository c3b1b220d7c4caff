//! Response classification
//!
//! Pure function of (status, body): the same captured response always maps
//! to the same [`Outcome`].

use contracts::Outcome;
use serde_json::Value;

/// Where a provider reports success inside a 200 response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuccessIndicator {
    /// No indicator field; HTTP 200 alone means success
    None,
    /// `errcode == 0`, failure text in `errmsg`; a missing `errcode` counts as 0
    ErrCode,
    /// `status == 200`, failure text in `msg`; a missing `status` counts as success
    Status,
}

impl SuccessIndicator {
    fn fields(&self) -> Option<(&'static str, &'static str, i64)> {
        match self {
            Self::None => None,
            Self::ErrCode => Some(("errcode", "errmsg", 0)),
            Self::Status => Some(("status", "msg", 200)),
        }
    }
}

/// Classify an HTTP response
pub fn classify(status: u16, body: &[u8], indicator: SuccessIndicator) -> Outcome {
    match status {
        200 => classify_ok(body, indicator),
        400 => Outcome::BadRequest,
        500 => Outcome::ServerError,
        other => Outcome::UnknownFailure {
            status: Some(other),
        },
    }
}

fn classify_ok(body: &[u8], indicator: SuccessIndicator) -> Outcome {
    let Some((code_field, message_field, success_code)) = indicator.fields() else {
        return Outcome::Success;
    };

    // 200 with an unreadable body: the status code is authoritative
    let Ok(json) = serde_json::from_slice::<Value>(body) else {
        return Outcome::Success;
    };

    let Some(object) = json.as_object() else {
        return Outcome::transport_error(format!(
            "unexpected response body, expected a JSON object: {json}"
        ));
    };

    match object.get(code_field) {
        None => Outcome::Success,
        Some(code) if code.as_f64() == Some(success_code as f64) => Outcome::Success,
        Some(code) => {
            let message = object
                .get(message_field)
                .and_then(Value::as_str)
                .unwrap_or_default();
            let code = code
                .as_i64()
                .or_else(|| code.as_f64().map(|c| c as i64))
                .unwrap_or(-1);
            Outcome::provider_rejected(code, message)
        }
    }
}

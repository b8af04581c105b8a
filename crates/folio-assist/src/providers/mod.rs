//! Request bodies and response parsing for each wire dialect.
//!
//! Each dialect module exposes `body` (the JSON request for a
//! [`ChatRequest`](crate::prompt::ChatRequest)), `authorize` (headers) and
//! `parse` (reply text out of the JSON response).

pub mod chat_completions;
pub mod generate_content;
pub mod messages;

use serde::Deserialize;

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorDetail {
    Object { message: String },
    Text(String),
}

/// Pull a human-readable message out of an error response body.
///
/// All supported providers wrap errors as `{"error": {"message": ...}}`.
/// Falls back to the trimmed body, then to `None` for an empty body.
pub fn error_message(body: &str) -> Option<String> {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        let message = match envelope.error {
            ErrorDetail::Object { message } => message,
            ErrorDetail::Text(message) => message,
        };
        if !message.trim().is_empty() {
            return Some(message);
        }
    }
    let trimmed = body.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_error_message() {
        let body = r#"{"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}"#;
        assert_eq!(error_message(body).as_deref(), Some("Incorrect API key provided"));
    }

    #[test]
    fn anthropic_style_error() {
        let body = r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#;
        assert_eq!(error_message(body).as_deref(), Some("Overloaded"));
    }

    #[test]
    fn string_error_and_fallbacks() {
        assert_eq!(error_message(r#"{"error": "bad"}"#).as_deref(), Some("bad"));
        assert_eq!(error_message("  Bad Gateway \n").as_deref(), Some("Bad Gateway"));
        assert_eq!(error_message(""), None);
    }
}

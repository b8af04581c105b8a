//! OpenAI-style `/chat/completions`, also spoken by Groq.

use serde::{Deserialize, Serialize};

use crate::prompt::ChatRequest;

#[derive(Serialize)]
pub struct Body<'a> {
    model: &'a str,
    messages: [Message<'a>; 2],
    max_tokens: u32,
    temperature: f64,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

pub fn body(req: &ChatRequest) -> Body<'_> {
    Body {
        model: &req.model,
        messages: [
            Message {
                role: "system",
                content: &req.system,
            },
            Message {
                role: "user",
                content: &req.message,
            },
        ],
        max_tokens: req.max_tokens,
        temperature: req.temperature,
    }
}

pub fn authorize(builder: reqwest::RequestBuilder, api_key: &str) -> reqwest::RequestBuilder {
    builder.bearer_auth(api_key)
}

#[derive(Deserialize)]
struct Response {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Text of the first choice. `Ok(None)` when there is none.
pub fn parse(body: &str) -> Result<Option<String>, serde_json::Error> {
    let response: Response = serde_json::from_str(body)?;
    Ok(response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ChatRequest {
        ChatRequest {
            system: "sys".into(),
            message: "hi".into(),
            model: "gpt-4o-mini".into(),
            max_tokens: 64,
            temperature: 0.5,
        }
    }

    #[test]
    fn body_shape() {
        let req = request();
        let json = serde_json::to_value(body(&req)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "model": "gpt-4o-mini",
                "messages": [
                    {"role": "system", "content": "sys"},
                    {"role": "user", "content": "hi"}
                ],
                "max_tokens": 64,
                "temperature": 0.5
            })
        );
    }

    #[test]
    fn parses_first_choice() {
        let body = r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"Hello"}},{"index":1,"message":{"role":"assistant","content":"Other"}}]}"#;
        assert_eq!(parse(body).unwrap().as_deref(), Some("Hello"));
    }

    #[test]
    fn no_choices_is_none() {
        assert_eq!(parse(r#"{"choices":[]}"#).unwrap(), None);
        assert_eq!(parse(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap(), None);
        assert!(parse("not json").is_err());
    }
}

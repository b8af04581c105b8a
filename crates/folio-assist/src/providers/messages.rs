//! Anthropic `/messages`.

use serde::{Deserialize, Serialize};

use crate::prompt::ChatRequest;

pub const API_VERSION: &str = "2023-06-01";

#[derive(Serialize)]
pub struct Body<'a> {
    model: &'a str,
    system: &'a str,
    messages: [Message<'a>; 1],
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
        system: &req.system,
        messages: [Message {
            role: "user",
            content: &req.message,
        }],
        max_tokens: req.max_tokens,
        temperature: req.temperature,
    }
}

pub fn authorize(builder: reqwest::RequestBuilder, api_key: &str) -> reqwest::RequestBuilder {
    builder
        .header("x-api-key", api_key)
        .header("anthropic-version", API_VERSION)
}

#[derive(Deserialize)]
struct Response {
    #[serde(default)]
    content: Vec<Block>,
}

#[derive(Deserialize)]
struct Block {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// Concatenated text blocks. `Ok(None)` when there are none.
pub fn parse(body: &str) -> Result<Option<String>, serde_json::Error> {
    let response: Response = serde_json::from_str(body)?;
    let text: String = response
        .content
        .into_iter()
        .filter(|b| b.kind == "text")
        .filter_map(|b| b.text)
        .collect();
    Ok((!text.is_empty()).then_some(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_is_top_level() {
        let req = ChatRequest {
            system: "sys".into(),
            message: "hi".into(),
            model: "claude".into(),
            max_tokens: 10,
            temperature: 0.25,
        };
        let json = serde_json::to_value(body(&req)).unwrap();
        assert_eq!(json["system"], "sys");
        assert_eq!(json["messages"].as_array().unwrap().len(), 1);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["max_tokens"], 10);
    }

    #[test]
    fn joins_text_blocks() {
        let body = r#"{"content":[{"type":"text","text":"a"},{"type":"tool_use","id":"t"},{"type":"text","text":"b"}],"stop_reason":"end_turn"}"#;
        assert_eq!(parse(body).unwrap().as_deref(), Some("ab"));
        assert_eq!(parse(r#"{"content":[]}"#).unwrap(), None);
    }
}

//! Gemini `:generateContent`.

use serde::{Deserialize, Serialize};

use crate::prompt::ChatRequest;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Body<'a> {
    system_instruction: Content<'a>,
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f64,
}

pub fn body(req: &ChatRequest) -> Body<'_> {
    Body {
        system_instruction: Content {
            role: None,
            parts: [Part { text: &req.system }],
        },
        contents: [Content {
            role: Some("user"),
            parts: [Part { text: &req.message }],
        }],
        generation_config: GenerationConfig {
            max_output_tokens: req.max_tokens,
            temperature: req.temperature,
        },
    }
}

pub fn authorize(builder: reqwest::RequestBuilder, api_key: &str) -> reqwest::RequestBuilder {
    builder.header("x-goog-api-key", api_key)
}

#[derive(Deserialize)]
struct Response {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<ReplyContent>,
}

#[derive(Deserialize)]
struct ReplyContent {
    #[serde(default)]
    parts: Vec<ReplyPart>,
}

#[derive(Deserialize)]
struct ReplyPart {
    #[serde(default)]
    text: Option<String>,
}

/// Text parts of the first candidate. `Ok(None)` when there are none.
pub fn parse(body: &str) -> Result<Option<String>, serde_json::Error> {
    let response: Response = serde_json::from_str(body)?;
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    Ok((!text.is_empty()).then_some(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_case_body() {
        let req = ChatRequest {
            system: "sys".into(),
            message: "hi".into(),
            model: "gemini".into(),
            max_tokens: 32,
            temperature: 0.0,
        };
        let json = serde_json::to_value(body(&req)).unwrap();
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "sys");
        assert!(json["systemInstruction"].get("role").is_none());
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 32);
    }

    #[test]
    fn parses_first_candidate() {
        let body = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"x"},{"text":"y"}]},"finishReason":"STOP"}]}"#;
        assert_eq!(parse(body).unwrap().as_deref(), Some("xy"));
        // blocked by safety filters: candidate without content
        assert_eq!(parse(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap(), None);
        assert_eq!(parse(r#"{"promptFeedback":{}}"#).unwrap(), None);
    }
}

//! The text-generation services folio can route a message to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AssistError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
    Gemini,
    Groq,
}

/// Wire format a provider speaks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dialect {
    /// `/chat/completions` with a `messages` array (OpenAI, Groq).
    ChatCompletions,
    /// `/messages` with a top-level `system` field.
    Messages,
    /// `:generateContent` with `contents` and `parts`.
    GenerateContent,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 4] = [
        ProviderKind::OpenAi,
        ProviderKind::Anthropic,
        ProviderKind::Gemini,
        ProviderKind::Groq,
    ];

    /// Name used in config files and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Gemini => "gemini",
            ProviderKind::Groq => "groq",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "OpenAI",
            ProviderKind::Anthropic => "Anthropic",
            ProviderKind::Gemini => "Google Gemini",
            ProviderKind::Groq => "Groq",
        }
    }

    pub fn dialect(self) -> Dialect {
        match self {
            ProviderKind::OpenAi | ProviderKind::Groq => Dialect::ChatCompletions,
            ProviderKind::Anthropic => Dialect::Messages,
            ProviderKind::Gemini => Dialect::GenerateContent,
        }
    }

    /// API root; the dialect appends its own path.
    pub fn base_url(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "https://api.openai.com/v1",
            ProviderKind::Anthropic => "https://api.anthropic.com/v1",
            ProviderKind::Gemini => "https://generativelanguage.googleapis.com/v1beta",
            ProviderKind::Groq => "https://api.groq.com/openai/v1",
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "gpt-4o-mini",
            ProviderKind::Anthropic => "claude-3-5-sonnet-latest",
            ProviderKind::Gemini => "gemini-1.5-flash",
            ProviderKind::Groq => "llama-3.3-70b-versatile",
        }
    }

    /// Environment variable holding the API key.
    pub fn api_key_env(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "OPENAI_API_KEY",
            ProviderKind::Anthropic => "ANTHROPIC_API_KEY",
            ProviderKind::Gemini => "GEMINI_API_KEY",
            ProviderKind::Groq => "GROQ_API_KEY",
        }
    }

    /// Full request URL for a model under the given API root.
    pub fn endpoint(self, base_url: &str, model: &str) -> String {
        let base = base_url.trim_end_matches('/');
        match self.dialect() {
            Dialect::ChatCompletions => format!("{base}/chat/completions"),
            Dialect::Messages => format!("{base}/messages"),
            Dialect::GenerateContent => format!("{base}/models/{model}:generateContent"),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProviderKind {
    type Err = AssistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ProviderKind::ALL
            .into_iter()
            .find(|p| p.name() == wanted)
            .ok_or_else(|| AssistError::UnknownProvider(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_parse_back() {
        for kind in ProviderKind::ALL {
            assert_eq!(kind.name().parse::<ProviderKind>().unwrap(), kind);
        }
        assert_eq!(" OpenAI ".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAi);
        assert!(matches!(
            "mistral".parse::<ProviderKind>(),
            Err(AssistError::UnknownProvider(name)) if name == "mistral"
        ));
    }

    #[test]
    fn endpoints_follow_dialect() {
        assert_eq!(
            ProviderKind::Groq.endpoint(ProviderKind::Groq.base_url(), "m"),
            "https://api.groq.com/openai/v1/chat/completions"
        );
        assert_eq!(
            ProviderKind::Anthropic.endpoint("http://localhost:9000/", "m"),
            "http://localhost:9000/messages"
        );
        assert_eq!(
            ProviderKind::Gemini.endpoint(ProviderKind::Gemini.base_url(), "gemini-1.5-flash"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn env_names_match_config() {
        for kind in ProviderKind::ALL {
            assert!(
                folio_common::config::API_KEY_ENV
                    .iter()
                    .any(|(name, var)| *name == kind.name() && *var == kind.api_key_env())
            );
        }
    }
}

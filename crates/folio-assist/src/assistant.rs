//! Routing a message to a provider and turning the reply into fragments.

use folio_common::Config;
use folio_editor_core::fragments::{CodeFragment, extract_fragments, primary_fragment};
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;

use crate::error::AssistError;
use crate::prompt::{ChatRequest, DocumentContext, build_request};
use crate::provider::{Dialect, ProviderKind};
use crate::providers::{self, chat_completions, generate_content, messages};

/// A provider with its key, model and endpoint settled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedProvider {
    pub kind: ProviderKind,
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
}

/// The assistant's answer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AssistReply {
    pub provider: ProviderKind,
    pub model: String,
    pub text: String,
    pub fragments: Vec<CodeFragment>,
}

impl AssistReply {
    /// The fragment to apply to the document, if the reply has code.
    pub fn primary_fragment(&self) -> Option<&CodeFragment> {
        primary_fragment(&self.fragments)
    }
}

pub struct Assistant {
    client: reqwest::Client,
    config: Config,
}

impl Assistant {
    pub fn new(config: Config) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: Config) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The provider named as default in the config.
    pub fn default_provider(&self) -> Result<ProviderKind, AssistError> {
        self.config.default_provider.parse()
    }

    /// Settle key, model and endpoint for a provider from the config.
    pub fn resolve(&self, kind: ProviderKind) -> Result<ResolvedProvider, AssistError> {
        let settings = self.config.provider(kind.name());
        let api_key = settings
            .and_then(|s| s.api_key.clone())
            .filter(|k| !k.trim().is_empty())
            .ok_or(AssistError::MissingApiKey {
                provider: kind,
                env: kind.api_key_env(),
            })?;
        let model = settings
            .and_then(|s| s.model.clone())
            .unwrap_or_else(|| kind.default_model().to_owned());
        let base_url = settings
            .and_then(|s| s.base_url.as_deref())
            .unwrap_or(kind.base_url());
        Ok(ResolvedProvider {
            kind,
            endpoint: kind.endpoint(base_url, &model),
            api_key,
            model,
        })
    }

    /// Send `message` with the document as context and collect the reply.
    pub async fn ask(
        &self,
        kind: ProviderKind,
        context: &DocumentContext,
        message: &str,
    ) -> Result<AssistReply, AssistError> {
        let provider = self.resolve(kind)?;
        let editor = &self.config.editor;
        let request = build_request(
            context,
            message,
            provider.model.clone(),
            editor.max_tokens,
            editor.temperature,
        );

        let text = self.complete(&provider, &request).await?;
        let fragments = extract_fragments(&text);
        tracing::info!(
            provider = %kind,
            model = %provider.model,
            fragments = fragments.len(),
            "assistant replied"
        );

        Ok(AssistReply {
            provider: kind,
            model: provider.model,
            text,
            fragments,
        })
    }

    /// One request, one response. No retries; the first error is returned.
    pub async fn complete(
        &self,
        provider: &ResolvedProvider,
        request: &ChatRequest,
    ) -> Result<String, AssistError> {
        let kind = provider.kind;
        let builder = self
            .client
            .post(&provider.endpoint)
            .header(CONTENT_TYPE, "application/json");
        let builder = match kind.dialect() {
            Dialect::ChatCompletions => chat_completions::authorize(builder, &provider.api_key)
                .json(&chat_completions::body(request)),
            Dialect::Messages => {
                messages::authorize(builder, &provider.api_key).json(&messages::body(request))
            }
            Dialect::GenerateContent => generate_content::authorize(builder, &provider.api_key)
                .json(&generate_content::body(request)),
        };

        tracing::debug!(provider = %kind, endpoint = %provider.endpoint, "sending request");
        let response = builder
            .send()
            .await
            .map_err(|source| AssistError::Http {
                provider: kind,
                source,
            })?;
        let status = response.status();
        let body = response.text().await.map_err(|source| AssistError::Http {
            provider: kind,
            source,
        })?;

        if !status.is_success() {
            let message = providers::error_message(&body).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_owned()
            });
            tracing::warn!(provider = %kind, status = status.as_u16(), %message, "provider error");
            return Err(AssistError::Api {
                provider: kind,
                status: status.as_u16(),
                message,
            });
        }

        let parsed = match kind.dialect() {
            Dialect::ChatCompletions => chat_completions::parse(&body),
            Dialect::Messages => messages::parse(&body),
            Dialect::GenerateContent => generate_content::parse(&body),
        };
        parsed
            .map_err(|source| AssistError::Decode {
                provider: kind,
                source,
            })?
            .filter(|text| !text.trim().is_empty())
            .ok_or(AssistError::EmptyResponse(kind))
    }
}

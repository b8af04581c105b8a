use miette::Diagnostic;

use crate::provider::ProviderKind;

#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum AssistError {
    #[error("unknown provider {0:?}")]
    #[diagnostic(
        code(folio::assist::unknown_provider),
        help("available providers: openai, anthropic, gemini, groq")
    )]
    UnknownProvider(String),

    #[error("no API key configured for {provider}")]
    #[diagnostic(
        code(folio::assist::missing_key),
        help("set {env} or add api_key under [providers.{provider}] in the config file")
    )]
    MissingApiKey {
        provider: ProviderKind,
        env: &'static str,
    },

    /// Transport failure before a response arrived.
    #[error("request to {provider} failed")]
    #[diagnostic(code(folio::assist::http))]
    Http {
        provider: ProviderKind,
        #[source]
        source: reqwest::Error,
    },

    /// The provider answered with an error status.
    #[error("{provider} returned {status}: {message}")]
    #[diagnostic(code(folio::assist::api))]
    Api {
        provider: ProviderKind,
        status: u16,
        message: String,
    },

    #[error("could not decode {provider} response")]
    #[diagnostic(code(folio::assist::decode))]
    Decode {
        provider: ProviderKind,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0} returned no text")]
    #[diagnostic(code(folio::assist::empty))]
    EmptyResponse(ProviderKind),
}

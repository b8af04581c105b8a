//! Error types shared by the folio crates.

use miette::{Diagnostic, NamedSource, SourceOffset, SourceSpan};
use std::borrow::Cow;

/// Main error type for folio operations
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum FolioError {
    /// IO error
    #[error(transparent)]
    #[diagnostic(code(folio::io))]
    Io(#[from] std::io::Error),

    /// Parse error with source location
    #[error(transparent)]
    #[diagnostic_source]
    Parse(#[from] ParseError),

    /// Serialization error
    #[error(transparent)]
    #[diagnostic_source]
    Serde(#[from] SerDeError),

    /// Config file has an extension we don't know how to read
    #[error("unsupported config format: {0}")]
    #[diagnostic(
        code(folio::config::format),
        help("use a .toml or .json file")
    )]
    UnsupportedFormat(String),

    /// Stored workspace was written by a newer version
    #[error("workspace snapshot version {found} is newer than supported version {supported}")]
    #[diagnostic(code(folio::store::version))]
    SnapshotVersion { found: u32, supported: u32 },

    /// Could not determine a platform directory
    #[error("could not determine the {0} directory")]
    #[diagnostic(code(folio::dirs))]
    MissingDir(&'static str),
}

/// Parse error with source code location information
#[derive(thiserror::Error, Debug, Diagnostic)]
#[error("failed to parse {}: {}", self.src.name(), self.kind)]
#[diagnostic(code(folio::parse))]
pub struct ParseError {
    #[diagnostic_source]
    kind: SerDeError,
    #[source_code]
    src: NamedSource<Cow<'static, str>>,
    #[label("here")]
    err_location: SourceSpan,
    #[help]
    advice: Option<String>,
}

impl ParseError {
    /// Attach the offending document to a JSON error.
    pub fn json(err: serde_json::Error, name: impl AsRef<str>, src: impl Into<String>) -> Self {
        let src: String = src.into();
        // serde_json reports 1-based lines and columns; column 0 means "no position".
        let offset = if err.line() == 0 {
            0
        } else {
            SourceOffset::from_location(&src, err.line(), err.column().max(1)).offset()
        };
        Self {
            kind: SerDeError::Json(err),
            src: NamedSource::new(name, Cow::Owned(src)),
            err_location: SourceSpan::new(offset.into(), 0),
            advice: None,
        }
    }

    /// Attach the offending document to a TOML error.
    pub fn toml(err: toml::de::Error, name: impl AsRef<str>, src: impl Into<String>) -> Self {
        let src: String = src.into();
        let span = err
            .span()
            .map(|r| SourceSpan::new(r.start.into(), r.len()))
            .unwrap_or_else(|| SourceSpan::new(0.into(), 0));
        Self {
            kind: SerDeError::TomlDe(err),
            src: NamedSource::new(name, Cow::Owned(src)),
            err_location: span,
            advice: None,
        }
    }

    pub fn with_advice(mut self, advice: impl Into<String>) -> Self {
        self.advice = Some(advice.into());
        self
    }

    /// Byte offset the error points at.
    pub fn offset(&self) -> usize {
        self.err_location.offset()
    }
}

/// Serialization/deserialization errors
#[derive(thiserror::Error, Debug, Diagnostic)]
#[non_exhaustive]
pub enum SerDeError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),
    #[error(transparent)]
    TomlSer(#[from] toml::ser::Error),
}

impl From<serde_json::Error> for FolioError {
    fn from(err: serde_json::Error) -> Self {
        FolioError::Serde(SerDeError::Json(err))
    }
}

impl From<toml::ser::Error> for FolioError {
    fn from(err: toml::ser::Error) -> Self {
        FolioError::Serde(SerDeError::TomlSer(err))
    }
}

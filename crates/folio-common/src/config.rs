use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::future::Future;
use std::path::{Path, PathBuf};

use crate::error::{FolioError, ParseError};

/// Environment variables consulted for provider keys, by provider name.
pub const API_KEY_ENV: &[(&str, &str)] = &[
    ("openai", "OPENAI_API_KEY"),
    ("anthropic", "ANTHROPIC_API_KEY"),
    ("gemini", "GEMINI_API_KEY"),
    ("groq", "GROQ_API_KEY"),
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Provider used when none is given on the command line.
    pub default_provider: String,
    /// Per-provider settings, keyed by provider name.
    pub providers: BTreeMap<String, ProviderSettings>,
    pub editor: EditorSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProviderSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Overrides the provider's default model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Overrides the provider's fixed endpoint (proxies, self-hosted gateways).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EditorSettings {
    /// Number of undo groups kept per document.
    pub undo_depth: usize,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            undo_depth: 100,
            max_tokens: 4096,
            temperature: 0.3,
        }
    }
}

impl Default for Config {
    /// The default configuration routes to OpenAI with no stored keys.
    fn default() -> Self {
        Self {
            default_provider: "openai".to_owned(),
            providers: BTreeMap::new(),
            editor: EditorSettings::default(),
        }
    }
}

impl Config {
    /// Loads the configuration from the provided loader.
    pub async fn load(loader: &impl Loader) -> Result<Self, FolioError> {
        loader.load().await
    }

    /// Saves the configuration using the provided saver.
    pub async fn save(&self, saver: &impl Saver) -> Result<(), FolioError> {
        saver.save(self).await
    }

    /// Settings for a provider, if any were configured.
    pub fn provider(&self, name: &str) -> Option<&ProviderSettings> {
        self.providers.get(name)
    }

    /// Fill in missing API keys from the environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|var| std::env::var(var).ok());
    }

    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        for (provider, var) in API_KEY_ENV {
            let Some(key) = lookup(var).filter(|k| !k.trim().is_empty()) else {
                continue;
            };
            let entry = self.providers.entry((*provider).to_owned()).or_default();
            if entry.api_key.is_none() {
                tracing::debug!(provider, var, "api key taken from environment");
                entry.api_key = Some(key);
            }
        }
    }
}

/// Default location of the config file: `<config dir>/folio/config.toml`.
#[cfg(not(all(target_family = "wasm", target_os = "unknown")))]
pub fn default_config_path() -> Result<PathBuf, FolioError> {
    dirs::config_dir()
        .map(|dir| dir.join("folio").join("config.toml"))
        .ok_or(FolioError::MissingDir("config"))
}

/// The trait for loading configuration data.
pub trait Loader {
    /// Loads the configuration data.
    fn load(&self) -> impl Future<Output = Result<Config, FolioError>> + Send;
}

/// The trait for saving configuration data.
pub trait Saver {
    /// Saves the configuration data.
    fn save(&self, config: &Config) -> impl Future<Output = Result<(), FolioError>> + Send;
}

/// An implementation of [`Loader`] and [`Saver`] that reads and writes a configuration file.
#[cfg(not(all(target_family = "wasm", target_os = "unknown")))]
pub struct FileStore {
    path: PathBuf,
}

#[cfg(not(all(target_family = "wasm", target_os = "unknown")))]
impl FileStore {
    /// Create a new [`FileStore`] with the given path.
    ///
    /// [`Config`] data is serialized according to the file extension,
    /// `.toml` or `.json`. A missing file loads as the default config.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn extension(&self) -> Result<&str, FolioError> {
        match self.path.extension().and_then(|ext| ext.to_str()) {
            Some(ext @ ("json" | "toml")) => Ok(ext),
            other => Err(FolioError::UnsupportedFormat(
                other.unwrap_or("<none>").to_owned(),
            )),
        }
    }
}

#[cfg(not(all(target_family = "wasm", target_os = "unknown")))]
impl Loader for FileStore {
    async fn load(&self) -> Result<Config, FolioError> {
        let ext = self.extension()?;
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no config file, using defaults");
                return Ok(Config::default());
            }
            Err(e) => return Err(e.into()),
        };
        let name = self.path.display().to_string();
        let config = match ext {
            "json" => serde_json::from_str(&text)
                .map_err(|e| ParseError::json(e, &name, text.clone()))?,
            _ => toml::from_str(&text).map_err(|e| ParseError::toml(e, &name, text.clone()))?,
        };
        Ok(config)
    }
}

#[cfg(not(all(target_family = "wasm", target_os = "unknown")))]
impl Saver for FileStore {
    async fn save(&self, config: &Config) -> Result<(), FolioError> {
        let text = match self.extension()? {
            "json" => serde_json::to_string_pretty(config)?,
            _ => toml::to_string_pretty(config)?,
        };
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, text).await?;
        tracing::info!(path = %self.path.display(), "config saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("config.toml"));
        let config = Config::load(&store).await.unwrap();
        assert_eq!(config, Config::default());
    }

    #[tokio::test]
    async fn toml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested").join("config.toml"));

        let mut config = Config::default();
        config.default_provider = "anthropic".into();
        config.providers.insert(
            "anthropic".into(),
            ProviderSettings {
                api_key: Some("sk-test".into()),
                model: Some("claude-test".into()),
                base_url: None,
            },
        );
        config.save(&store).await.unwrap();

        let loaded = Config::load(&store).await.unwrap();
        assert_eq!(loaded, config);
    }

    #[tokio::test]
    async fn saved_temperature_is_exact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        Config::default().save(&FileStore::new(&path)).await.unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("temperature = 0.3\n"), "{text}");
    }

    #[tokio::test]
    async fn partial_toml_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[editor]\nundo_depth = 5\n").unwrap();

        let config = Config::load(&FileStore::new(&path)).await.unwrap();
        assert_eq!(config.editor.undo_depth, 5);
        assert_eq!(config.editor.max_tokens, 4096);
        assert_eq!(config.default_provider, "openai");
    }

    #[tokio::test]
    async fn bad_json_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ \"default_provider\": }").unwrap();

        let err = Config::load(&FileStore::new(&path)).await.unwrap_err();
        assert!(matches!(err, FolioError::Parse(_)));
    }

    #[tokio::test]
    async fn unknown_extension_rejected() {
        let store = FileStore::new("config.yaml");
        let err = Config::load(&store).await.unwrap_err();
        assert!(matches!(err, FolioError::UnsupportedFormat(ext) if ext == "yaml"));
    }

    #[test]
    fn env_fills_only_missing_keys() {
        let mut config = Config::default();
        config.providers.insert(
            "openai".into(),
            ProviderSettings {
                api_key: Some("from-file".into()),
                ..Default::default()
            },
        );
        config.apply_env_with(|var| match var {
            "OPENAI_API_KEY" => Some("from-env".into()),
            "GROQ_API_KEY" => Some("gsk".into()),
            "GEMINI_API_KEY" => Some("  ".into()),
            _ => None,
        });

        assert_eq!(
            config.provider("openai").unwrap().api_key.as_deref(),
            Some("from-file")
        );
        assert_eq!(
            config.provider("groq").unwrap().api_key.as_deref(),
            Some("gsk")
        );
        assert!(config.provider("gemini").is_none());
    }
}

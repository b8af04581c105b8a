//! Workspace persistence.
//!
//! The editor keeps the whole project (every file's text plus which file is
//! main and which is open) as one JSON document, overwritten on each save.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{FolioError, ParseError};

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceSnapshot {
    pub version: u32,
    /// File compiled as the document root.
    pub main: String,
    /// File open in the editor.
    pub active: String,
    pub files: BTreeMap<String, String>,
}

impl WorkspaceSnapshot {
    pub fn new(main: impl Into<String>, files: BTreeMap<String, String>) -> Self {
        let main = main.into();
        Self {
            version: SNAPSHOT_VERSION,
            active: main.clone(),
            main,
            files,
        }
    }
}

#[cfg(not(all(target_family = "wasm", target_os = "unknown")))]
pub struct SnapshotStore<T = PathBuf>
where
    T: AsRef<Path>,
{
    path: T,
}

#[cfg(not(all(target_family = "wasm", target_os = "unknown")))]
impl<T> SnapshotStore<T>
where
    T: AsRef<Path>,
{
    pub fn new(path: T) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        self.path.as_ref()
    }

    /// Load the stored workspace. A missing file is `Ok(None)`.
    pub async fn load(&self) -> Result<Option<WorkspaceSnapshot>, FolioError> {
        let path = self.path.as_ref();
        let text = match tokio::fs::read_to_string(path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let snapshot: WorkspaceSnapshot = serde_json::from_str(&text).map_err(|e| {
            ParseError::json(e, path.display().to_string(), text.clone())
                .with_advice("the workspace file may be corrupt; restore it or start a new one")
        })?;

        if snapshot.version > SNAPSHOT_VERSION {
            return Err(FolioError::SnapshotVersion {
                found: snapshot.version,
                supported: SNAPSHOT_VERSION,
            });
        }

        tracing::debug!(
            path = %path.display(),
            files = snapshot.files.len(),
            "workspace loaded"
        );
        Ok(Some(snapshot))
    }

    /// Save the workspace, replacing whatever was stored before.
    pub async fn save(&self, snapshot: &WorkspaceSnapshot) -> Result<(), FolioError> {
        let path = self.path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_string_pretty(snapshot)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, path).await?;

        tracing::debug!(path = %path.display(), files = snapshot.files.len(), "workspace saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> WorkspaceSnapshot {
        let mut files = BTreeMap::new();
        files.insert("main.tex".to_owned(), "\\documentclass{article}".to_owned());
        files.insert("refs.bib".to_owned(), String::new());
        WorkspaceSnapshot::new("main.tex", files)
    }

    #[tokio::test]
    async fn missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("workspace.json"));
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("ws").join("workspace.json"));
        let snapshot = sample();

        store.save(&snapshot).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(snapshot));
        assert!(!dir.path().join("ws").join("workspace.json.tmp").exists());
    }

    #[tokio::test]
    async fn last_write_wins() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("workspace.json"));
        let mut snapshot = sample();
        store.save(&snapshot).await.unwrap();

        snapshot
            .files
            .insert("main.tex".into(), "\\documentclass{report}".into());
        store.save(&snapshot).await.unwrap();

        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded.files["main.tex"], "\\documentclass{report}");
    }

    #[tokio::test]
    async fn newer_version_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("workspace.json"));
        let mut snapshot = sample();
        snapshot.version = SNAPSHOT_VERSION + 1;
        store.save(&snapshot).await.unwrap();

        let err = store.load().await.unwrap_err();
        assert!(matches!(err, FolioError::SnapshotVersion { .. }));
    }
}

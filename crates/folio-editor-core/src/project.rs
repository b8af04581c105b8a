//! Project model: a flat map from filename to text.
//!
//! There is no structure beyond that. Writes replace the stored text
//! wholesale and the last write wins.

use std::collections::BTreeMap;

use folio_common::WorkspaceSnapshot;
use miette::Diagnostic;

use crate::packages::{self, InstalledPackage};

pub const DEFAULT_MAIN: &str = "main.tex";

pub const DEFAULT_TEMPLATE: &str = r"\documentclass{article}
\usepackage{amsmath}

\title{Untitled}
\author{}
\date{\today}

\begin{document}

\maketitle

\section{Introduction}

\end{document}
";

#[derive(thiserror::Error, Debug, Diagnostic, PartialEq, Eq)]
pub enum ProjectError {
    #[error("invalid file name {0:?}")]
    #[diagnostic(
        code(folio::project::invalid_name),
        help("use a relative path without '..' segments")
    )]
    InvalidName(String),

    #[error("file {0} does not exist")]
    #[diagnostic(code(folio::project::not_found))]
    NotFound(String),

    #[error("file {0} already exists")]
    #[diagnostic(code(folio::project::exists))]
    AlreadyExists(String),

    #[error("cannot remove the main file {0}")]
    #[diagnostic(
        code(folio::project::remove_main),
        help("make another file the main file first")
    )]
    RemoveMain(String),

    #[error("snapshot is missing its main file {0}")]
    #[diagnostic(code(folio::project::snapshot))]
    MissingMain(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Project {
    files: BTreeMap<String, String>,
    main: String,
    active: String,
}

impl Default for Project {
    /// A project holding `main.tex` with the article template.
    fn default() -> Self {
        let mut files = BTreeMap::new();
        files.insert(DEFAULT_MAIN.to_owned(), DEFAULT_TEMPLATE.to_owned());
        Self {
            files,
            main: DEFAULT_MAIN.to_owned(),
            active: DEFAULT_MAIN.to_owned(),
        }
    }
}

fn validate_name(name: &str) -> Result<(), ProjectError> {
    let invalid = name.trim().is_empty()
        || name.starts_with('/')
        || name.starts_with('\\')
        || name.contains('\0')
        || name.split(['/', '\\']).any(|seg| seg == ".." || seg.is_empty());
    if invalid {
        Err(ProjectError::InvalidName(name.to_owned()))
    } else {
        Ok(())
    }
}

impl Project {
    /// A project with a single main file.
    pub fn with_main(name: &str, text: impl Into<String>) -> Result<Self, ProjectError> {
        validate_name(name)?;
        let mut files = BTreeMap::new();
        files.insert(name.to_owned(), text.into());
        Ok(Self {
            files,
            main: name.to_owned(),
            active: name.to_owned(),
        })
    }

    pub fn main(&self) -> &str {
        &self.main
    }

    pub fn active(&self) -> &str {
        &self.active
    }

    pub fn file(&self, name: &str) -> Option<&str> {
        self.files.get(name).map(String::as_str)
    }

    pub fn main_text(&self) -> &str {
        self.file(&self.main).unwrap_or_default()
    }

    pub fn active_text(&self) -> &str {
        self.file(&self.active).unwrap_or_default()
    }

    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Store text for a file, creating it if needed.
    pub fn write(&mut self, name: &str, text: impl Into<String>) -> Result<(), ProjectError> {
        validate_name(name)?;
        self.files.insert(name.to_owned(), text.into());
        Ok(())
    }

    pub fn create_file(&mut self, name: &str, text: impl Into<String>) -> Result<(), ProjectError> {
        validate_name(name)?;
        if self.files.contains_key(name) {
            return Err(ProjectError::AlreadyExists(name.to_owned()));
        }
        self.files.insert(name.to_owned(), text.into());
        tracing::info!(file = name, "file created");
        Ok(())
    }

    pub fn rename_file(&mut self, from: &str, to: &str) -> Result<(), ProjectError> {
        validate_name(to)?;
        if self.files.contains_key(to) {
            return Err(ProjectError::AlreadyExists(to.to_owned()));
        }
        let text = self
            .files
            .remove(from)
            .ok_or_else(|| ProjectError::NotFound(from.to_owned()))?;
        self.files.insert(to.to_owned(), text);
        if self.main == from {
            self.main = to.to_owned();
        }
        if self.active == from {
            self.active = to.to_owned();
        }
        tracing::info!(from, to, "file renamed");
        Ok(())
    }

    /// Remove a file. If it was open, the main file becomes active.
    pub fn remove_file(&mut self, name: &str) -> Result<String, ProjectError> {
        if name == self.main {
            return Err(ProjectError::RemoveMain(name.to_owned()));
        }
        let text = self
            .files
            .remove(name)
            .ok_or_else(|| ProjectError::NotFound(name.to_owned()))?;
        if self.active == name {
            self.active = self.main.clone();
        }
        tracing::info!(file = name, "file removed");
        Ok(text)
    }

    pub fn set_active(&mut self, name: &str) -> Result<(), ProjectError> {
        if !self.files.contains_key(name) {
            return Err(ProjectError::NotFound(name.to_owned()));
        }
        self.active = name.to_owned();
        Ok(())
    }

    pub fn set_main(&mut self, name: &str) -> Result<(), ProjectError> {
        if !self.files.contains_key(name) {
            return Err(ProjectError::NotFound(name.to_owned()));
        }
        self.main = name.to_owned();
        Ok(())
    }

    /// Packages loaded by the main file, recomputed from its text.
    pub fn installed_packages(&self) -> Vec<InstalledPackage> {
        packages::installed_packages(self.main_text())
    }

    pub fn to_snapshot(&self) -> WorkspaceSnapshot {
        let mut snapshot = WorkspaceSnapshot::new(self.main.clone(), self.files.clone());
        snapshot.active = self.active.clone();
        snapshot
    }

    /// Rebuild a project from a stored snapshot.
    ///
    /// An active file that no longer exists falls back to the main file.
    pub fn from_snapshot(snapshot: WorkspaceSnapshot) -> Result<Self, ProjectError> {
        if !snapshot.files.contains_key(&snapshot.main) {
            return Err(ProjectError::MissingMain(snapshot.main));
        }
        for name in snapshot.files.keys() {
            validate_name(name)?;
        }
        let active = if snapshot.files.contains_key(&snapshot.active) {
            snapshot.active
        } else {
            tracing::warn!(active = %snapshot.active, "active file missing from snapshot");
            snapshot.main.clone()
        };
        Ok(Self {
            files: snapshot.files,
            main: snapshot.main,
            active,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_project_has_template() {
        let project = Project::default();
        assert_eq!(project.main(), "main.tex");
        assert_eq!(project.active(), "main.tex");
        assert!(project.main_text().starts_with("\\documentclass{article}"));
        let names: Vec<_> = project
            .installed_packages()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, ["amsmath"]);
    }

    #[test]
    fn last_write_wins() {
        let mut project = Project::default();
        project.write("main.tex", "first").unwrap();
        project.write("main.tex", "second").unwrap();
        assert_eq!(project.main_text(), "second");

        project.write("sections/intro.tex", "intro").unwrap();
        assert_eq!(project.len(), 2);
    }

    #[test]
    fn names_are_validated() {
        let mut project = Project::default();
        for bad in ["", "  ", "/etc/passwd", "../x.tex", "a//b.tex", "a/../b.tex", "C:\\..\\x"] {
            assert_eq!(
                project.write(bad, "x"),
                Err(ProjectError::InvalidName(bad.to_owned())),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn create_rename_remove() {
        let mut project = Project::default();
        project.create_file("refs.bib", "@book{}").unwrap();
        assert_eq!(
            project.create_file("refs.bib", ""),
            Err(ProjectError::AlreadyExists("refs.bib".into()))
        );

        project.set_active("refs.bib").unwrap();
        project.rename_file("refs.bib", "bib/refs.bib").unwrap();
        assert_eq!(project.active(), "bib/refs.bib");

        assert_eq!(project.remove_file("bib/refs.bib").unwrap(), "@book{}");
        assert_eq!(project.active(), "main.tex");
        assert_eq!(
            project.remove_file("main.tex"),
            Err(ProjectError::RemoveMain("main.tex".into()))
        );
        assert_eq!(
            project.remove_file("nope.tex"),
            Err(ProjectError::NotFound("nope.tex".into()))
        );
    }

    #[test]
    fn renaming_main_follows() {
        let mut project = Project::default();
        project.rename_file("main.tex", "paper.tex").unwrap();
        assert_eq!(project.main(), "paper.tex");
        assert!(project.file("main.tex").is_none());
    }

    #[test]
    fn snapshot_round_trip() {
        let mut project = Project::default();
        project.create_file("appendix.tex", "A").unwrap();
        project.set_active("appendix.tex").unwrap();

        let snapshot = project.to_snapshot();
        assert_eq!(snapshot.active, "appendix.tex");
        assert_eq!(Project::from_snapshot(snapshot).unwrap(), project);
    }

    #[test]
    fn snapshot_repairs_active_and_rejects_missing_main() {
        let mut snapshot = Project::default().to_snapshot();
        snapshot.active = "gone.tex".into();
        let project = Project::from_snapshot(snapshot.clone()).unwrap();
        assert_eq!(project.active(), "main.tex");

        snapshot.main = "gone.tex".into();
        assert_eq!(
            Project::from_snapshot(snapshot),
            Err(ProjectError::MissingMain("gone.tex".into()))
        );
    }
}

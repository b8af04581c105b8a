//! folio-editor-core: editor logic without framework dependencies.
//!
//! This crate provides:
//! - `TextBuffer` trait for text storage abstraction, `EditorRope` backed by ropey
//! - `UndoableBuffer<T>` with grouped undo/redo
//! - `EditorDocument` - buffer, cursor and selection for the open file
//! - `Project` - the filename to text map behind the editor
//! - completion resolution, package splicing, line diffs and assistant
//!   fragment handling, all operating on plain text

pub mod catalog;
pub mod completion;
pub mod diff;
pub mod document;
pub mod fragments;
pub mod packages;
pub mod project;
pub mod text;
pub mod types;
pub mod undo;

pub use catalog::{Completion, CompletionKind};
pub use completion::{CompletionContext, CompletionResult, ExpandedSnippet, rank, resolve};
pub use diff::{DiffSummary, LineChange, LineDiff, diff_lines};
pub use document::EditorDocument;
pub use fragments::{CodeFragment, FragmentPlacement, apply_fragment, extract_fragments};
pub use packages::{InstalledPackage, PackageError, add_package, installed_packages, remove_package};
pub use project::{Project, ProjectError};
pub use smol_str::SmolStr;
pub use text::{EditorRope, TextBuffer};
pub use types::{CursorState, EditInfo, Position, Selection};
pub use undo::{UndoManager, UndoableBuffer};

#[cfg(not(all(target_family = "wasm", target_os = "unknown")))]
pub(crate) use regex::Regex;
#[cfg(all(target_family = "wasm", target_os = "unknown"))]
pub(crate) use regex_lite::Regex;

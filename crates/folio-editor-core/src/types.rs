//! Core editor types: positions, cursor, selection, and edit tracking.
//!
//! These types are framework-agnostic and can be used with any text buffer implementation.

use std::ops::Range;

use serde::{Deserialize, Serialize};
use web_time::Instant;

/// Line/column position as reported by an editor widget.
///
/// Both are 0-based. The column counts chars, not bytes or UTF-16 units.
#[derive(Clone, Debug, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Cursor state.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Default)]
pub struct CursorState {
    /// Character offset in text (NOT byte offset!)
    pub offset: usize,
}

impl CursorState {
    /// Create a new cursor at the given offset.
    pub fn new(offset: usize) -> Self {
        Self { offset }
    }
}

/// Text selection with anchor and head positions.
///
/// The anchor is where the selection started, the head is where the cursor is now.
/// They may be in any order - use `start()` and `end()` for ordered bounds.
#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Where selection started
    pub anchor: usize,
    /// Where cursor is now
    pub head: usize,
}

impl Selection {
    /// Create a new selection.
    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    /// Get the start (lower bound) of the selection.
    pub fn start(&self) -> usize {
        self.anchor.min(self.head)
    }

    /// Get the end (upper bound) of the selection.
    pub fn end(&self) -> usize {
        self.anchor.max(self.head)
    }

    /// Check if the selection is collapsed (empty, cursor only).
    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.head
    }

    pub fn len(&self) -> usize {
        self.end() - self.start()
    }

    pub fn is_empty(&self) -> bool {
        self.is_collapsed()
    }

    pub fn to_range(&self) -> Range<usize> {
        self.start()..self.end()
    }
}

/// Information about the most recent edit.
#[derive(Clone, Debug, Copy, PartialEq)]
pub struct EditInfo {
    /// Character offset where the edit happened.
    pub edit_char_pos: usize,
    pub inserted_len: usize,
    pub deleted_len: usize,
    /// Whether inserted or deleted text contained a newline.
    pub contains_newline: bool,
    /// Document length in chars after the edit.
    pub doc_len_after: usize,
    pub timestamp: Instant,
}

impl EditInfo {
    /// Whether the edit changed the line structure of the document.
    pub fn changes_lines(&self) -> bool {
        self.contains_newline
    }
}

//! Editor document: a buffer with undo, a cursor, and an optional selection.
//!
//! This is the state an editor widget exposes for the file being edited.
//! Completion requests are answered from here and assistant fragments are
//! applied here.

use smol_str::SmolStr;

use crate::catalog::Completion;
use crate::completion::{self, CompletionResult};
use crate::text::{EditorRope, TextBuffer};
use crate::types::{CursorState, EditInfo, Position, Selection};
use crate::undo::{UndoManager, UndoableBuffer};

#[derive(Clone)]
pub struct EditorDocument {
    buffer: UndoableBuffer<EditorRope>,
    cursor: CursorState,
    selection: Option<Selection>,
}

impl Default for EditorDocument {
    fn default() -> Self {
        Self::new("", 100)
    }
}

impl EditorDocument {
    /// Create a document with the cursor at the start.
    pub fn new(text: &str, undo_depth: usize) -> Self {
        Self {
            buffer: UndoableBuffer::new(EditorRope::from_str(text), undo_depth),
            cursor: CursorState::default(),
            selection: None,
        }
    }

    pub fn buffer(&self) -> &UndoableBuffer<EditorRope> {
        &self.buffer
    }

    pub fn content(&self) -> String {
        self.buffer.to_string()
    }

    pub fn len_chars(&self) -> usize {
        self.buffer.len_chars()
    }

    pub fn cursor(&self) -> usize {
        self.cursor.offset
    }

    /// Move the cursor, clamped to the document. Clears the selection.
    pub fn set_cursor(&mut self, offset: usize) {
        self.cursor = CursorState::new(offset.min(self.len_chars()));
        self.selection = None;
    }

    pub fn set_cursor_position(&mut self, position: Position) {
        let offset = self.offset_of(position);
        self.set_cursor(offset);
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection.filter(|s| !s.is_collapsed())
    }

    /// Select a range; the cursor follows the head.
    pub fn set_selection(&mut self, anchor: usize, head: usize) {
        let len = self.len_chars();
        let sel = Selection::new(anchor.min(len), head.min(len));
        self.cursor = CursorState::new(sel.head);
        self.selection = Some(sel);
    }

    pub fn selected_text(&self) -> Option<SmolStr> {
        self.selection()
            .and_then(|sel| self.buffer.slice(sel.to_range()))
    }

    /// Char offset of a line/column position, clamped to the line and the
    /// document.
    pub fn offset_of(&self, position: Position) -> usize {
        let line = position.line.min(self.buffer.len_lines().saturating_sub(1));
        let start = self.buffer.line_to_char(line);
        let mut end = if line + 1 < self.buffer.len_lines() {
            self.buffer.line_to_char(line + 1)
        } else {
            self.len_chars()
        };
        // stop before the line break
        if end > start && self.buffer.char_at(end - 1) == Some('\n') {
            end -= 1;
        }
        if end > start && self.buffer.char_at(end - 1) == Some('\r') {
            end -= 1;
        }
        start.saturating_add(position.column).min(end)
    }

    pub fn position_of(&self, offset: usize) -> Position {
        let offset = offset.min(self.len_chars());
        let line = self.buffer.char_to_line(offset);
        Position::new(line, offset - self.buffer.line_to_char(line))
    }

    /// Current line up to the cursor.
    pub fn line_before_cursor(&self) -> SmolStr {
        self.buffer.line_prefix(self.cursor.offset)
    }

    /// Resolve completions at the cursor.
    pub fn completions(&self, explicit: bool) -> Option<CompletionResult> {
        completion::resolve(&self.line_before_cursor(), self.cursor.offset, explicit)
    }

    pub fn insert_at_cursor(&mut self, text: &str) -> Option<EditInfo> {
        self.replace_range(self.cursor.offset..self.cursor.offset, text)
    }

    /// Replace the selection (or insert at the cursor if nothing is
    /// selected) as a single undo step.
    pub fn replace_selection(&mut self, text: &str) -> Option<EditInfo> {
        let range = self
            .selection()
            .map(|s| s.to_range())
            .unwrap_or(self.cursor.offset..self.cursor.offset);
        self.replace_range(range, text)
    }

    /// Replace the whole document as a single undo step. The cursor moves to
    /// the end.
    pub fn replace_all(&mut self, text: &str) -> Option<EditInfo> {
        self.replace_range(0..self.len_chars(), text)
    }

    /// Replace a char range; the cursor ends after the inserted text.
    pub fn replace_range(&mut self, range: std::ops::Range<usize>, text: &str) -> Option<EditInfo> {
        let len = self.len_chars();
        let range = range.start.min(len)..range.end.min(len);
        self.buffer.begin_group();
        self.buffer.replace(range.clone(), text);
        self.buffer.end_group();
        self.set_cursor(range.start + text.chars().count());
        self.buffer.last_edit()
    }

    /// Insert a resolved completion, replacing the typed token. Snippet
    /// placeholders are expanded and the cursor lands on the first one.
    pub fn apply_completion(&mut self, result: &CompletionResult, choice: &Completion) {
        let expanded = completion::expand_snippet(choice.insert_text());
        self.replace_range(result.from..result.to, &expanded.text);
        if let Some(at) = expanded.cursor {
            self.set_cursor(result.from + at);
        }
        tracing::debug!(label = choice.label, "completion applied");
    }

    pub fn begin_group(&mut self) {
        self.buffer.begin_group();
    }

    pub fn end_group(&mut self) {
        self.buffer.end_group();
    }

    pub fn can_undo(&self) -> bool {
        self.buffer.can_undo()
    }

    pub fn undo(&mut self) -> bool {
        let undone = self.buffer.undo();
        self.clamp_cursor();
        undone
    }

    pub fn redo(&mut self) -> bool {
        let redone = self.buffer.redo();
        self.clamp_cursor();
        redone
    }

    fn clamp_cursor(&mut self) {
        let len = self.len_chars();
        if self.cursor.offset > len {
            self.cursor = CursorState::new(len);
        }
        self.selection = None;
    }
}

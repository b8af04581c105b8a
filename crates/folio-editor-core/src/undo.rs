//! Undo/redo management for editor operations.
//!
//! Provides:
//! - `UndoManager` trait for abstracting undo implementations
//! - `UndoableBuffer<T>` - wraps a TextBuffer and provides grouped undo/redo

use std::ops::Range;

use smol_str::{SmolStr, ToSmolStr};

use crate::text::TextBuffer;
use crate::types::EditInfo;

/// Trait for managing undo/redo operations.
///
/// Implementations must actually perform the undo/redo, not just track state.
pub trait UndoManager {
    /// Check if undo is available.
    fn can_undo(&self) -> bool;

    /// Check if redo is available.
    fn can_redo(&self) -> bool;

    /// Perform undo. Returns true if successful.
    fn undo(&mut self) -> bool;

    /// Perform redo. Returns true if successful.
    fn redo(&mut self) -> bool;

    /// Clear all undo/redo history.
    fn clear_history(&mut self);
}

/// A recorded edit operation for undo/redo.
#[derive(Debug, Clone)]
struct EditOperation {
    /// Character position where edit occurred
    pos: usize,
    /// Text that was deleted (empty for pure insertions)
    deleted: SmolStr,
    /// Text that was inserted (empty for pure deletions)
    inserted: SmolStr,
}

/// Operations undone and redone together.
type EditGroup = Vec<EditOperation>;

/// A TextBuffer wrapper that tracks edits and provides undo/redo.
///
/// Every mutation is recorded. Mutations made between [`begin_group`] and
/// the matching [`end_group`] form one undo step; groups nest, and only the
/// outermost `end_group` closes the step.
///
/// [`begin_group`]: UndoableBuffer::begin_group
/// [`end_group`]: UndoableBuffer::end_group
#[derive(Clone)]
pub struct UndoableBuffer<T> {
    buffer: T,
    undo_stack: Vec<EditGroup>,
    redo_stack: Vec<EditGroup>,
    open_group: Option<EditGroup>,
    group_depth: usize,
    max_steps: usize,
}

impl<T: TextBuffer + Default> Default for UndoableBuffer<T> {
    fn default() -> Self {
        Self::new(T::default(), 100)
    }
}

impl<T: TextBuffer> UndoableBuffer<T> {
    /// Create a new undoable buffer wrapping the given buffer.
    pub fn new(buffer: T, max_steps: usize) -> Self {
        Self {
            buffer,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            open_group: None,
            group_depth: 0,
            max_steps: max_steps.max(1),
        }
    }

    /// Get a reference to the inner buffer.
    pub fn inner(&self) -> &T {
        &self.buffer
    }

    /// Number of undo steps available.
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Start grouping edits into a single undo step.
    pub fn begin_group(&mut self) {
        if self.group_depth == 0 {
            self.open_group = Some(Vec::new());
        }
        self.group_depth += 1;
    }

    /// Close the current group. Unbalanced calls are ignored.
    pub fn end_group(&mut self) {
        if self.group_depth == 0 {
            return;
        }
        self.group_depth -= 1;
        if self.group_depth == 0 {
            if let Some(group) = self.open_group.take() {
                if !group.is_empty() {
                    self.push_group(group);
                }
            }
        }
    }

    fn push_group(&mut self, group: EditGroup) {
        self.undo_stack.push(group);
        if self.undo_stack.len() > self.max_steps {
            let excess = self.undo_stack.len() - self.max_steps;
            self.undo_stack.drain(..excess);
        }
    }

    fn record_op(&mut self, pos: usize, deleted: &str, inserted: &str) {
        self.redo_stack.clear();

        let op = EditOperation {
            pos,
            deleted: deleted.to_smolstr(),
            inserted: inserted.to_smolstr(),
        };

        match self.open_group.as_mut() {
            Some(group) => group.push(op),
            None => self.push_group(vec![op]),
        }
    }

    fn revert(&mut self, op: &EditOperation) {
        let inserted_chars = op.inserted.chars().count();
        if inserted_chars > 0 {
            self.buffer.delete(op.pos..op.pos + inserted_chars);
        }
        if !op.deleted.is_empty() {
            self.buffer.insert(op.pos, &op.deleted);
        }
    }

    fn reapply(&mut self, op: &EditOperation) {
        let deleted_chars = op.deleted.chars().count();
        if deleted_chars > 0 {
            self.buffer.delete(op.pos..op.pos + deleted_chars);
        }
        if !op.inserted.is_empty() {
            self.buffer.insert(op.pos, &op.inserted);
        }
    }
}

// Implement TextBuffer by delegating to inner buffer + recording operations
impl<T: TextBuffer> TextBuffer for UndoableBuffer<T> {
    fn len_bytes(&self) -> usize {
        self.buffer.len_bytes()
    }

    fn len_chars(&self) -> usize {
        self.buffer.len_chars()
    }

    fn insert(&mut self, char_offset: usize, text: &str) {
        if text.is_empty() {
            return;
        }
        let char_offset = char_offset.min(self.buffer.len_chars());
        self.record_op(char_offset, "", text);
        self.buffer.insert(char_offset, text);
    }

    fn delete(&mut self, char_range: Range<usize>) {
        let len = self.buffer.len_chars();
        let char_range = char_range.start.min(len)..char_range.end.min(len);
        if char_range.is_empty() {
            return;
        }
        let deleted = self.buffer.slice(char_range.clone()).unwrap_or_default();
        self.record_op(char_range.start, &deleted, "");
        self.buffer.delete(char_range);
    }

    fn slice(&self, char_range: Range<usize>) -> Option<SmolStr> {
        self.buffer.slice(char_range)
    }

    fn char_at(&self, char_offset: usize) -> Option<char> {
        self.buffer.char_at(char_offset)
    }

    fn to_string(&self) -> String {
        self.buffer.to_string()
    }

    fn char_to_byte(&self, char_offset: usize) -> usize {
        self.buffer.char_to_byte(char_offset)
    }

    fn byte_to_char(&self, byte_offset: usize) -> usize {
        self.buffer.byte_to_char(byte_offset)
    }

    fn len_lines(&self) -> usize {
        self.buffer.len_lines()
    }

    fn char_to_line(&self, char_offset: usize) -> usize {
        self.buffer.char_to_line(char_offset)
    }

    fn line_to_char(&self, line: usize) -> usize {
        self.buffer.line_to_char(line)
    }

    fn last_edit(&self) -> Option<EditInfo> {
        self.buffer.last_edit()
    }
}

impl<T: TextBuffer> UndoManager for UndoableBuffer<T> {
    fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    fn undo(&mut self) -> bool {
        let Some(group) = self.undo_stack.pop() else {
            return false;
        };
        for op in group.iter().rev() {
            self.revert(op);
        }
        self.redo_stack.push(group);
        true
    }

    fn redo(&mut self) -> bool {
        let Some(group) = self.redo_stack.pop() else {
            return false;
        };
        for op in &group {
            self.reapply(op);
        }
        self.undo_stack.push(group);
        true
    }

    fn clear_history(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EditorRope;

    #[test]
    fn test_insert_undo_redo() {
        let mut buf = UndoableBuffer::new(EditorRope::from_str("hello"), 100);
        assert!(!buf.can_undo());

        buf.insert(5, " world");
        assert_eq!(buf.to_string(), "hello world");

        assert!(buf.undo());
        assert_eq!(buf.to_string(), "hello");
        assert!(buf.can_redo());

        assert!(buf.redo());
        assert_eq!(buf.to_string(), "hello world");
        assert!(!buf.can_redo());
    }

    #[test]
    fn test_group_undoes_as_one_step() {
        let mut buf = UndoableBuffer::new(EditorRope::from_str("hello world"), 100);

        buf.begin_group();
        buf.delete(6..11);
        buf.insert(6, "rust");
        buf.end_group();
        assert_eq!(buf.to_string(), "hello rust");
        assert_eq!(buf.undo_depth(), 1);

        assert!(buf.undo());
        assert_eq!(buf.to_string(), "hello world");
        assert!(buf.redo());
        assert_eq!(buf.to_string(), "hello rust");
    }

    #[test]
    fn test_nested_groups_close_at_outermost() {
        let mut buf = UndoableBuffer::new(EditorRope::from_str(""), 100);

        buf.begin_group();
        buf.insert(0, "a");
        buf.begin_group();
        buf.insert(1, "b");
        buf.end_group();
        assert_eq!(buf.undo_depth(), 0);
        buf.insert(2, "c");
        buf.end_group();

        assert_eq!(buf.undo_depth(), 1);
        assert!(buf.undo());
        assert_eq!(buf.to_string(), "");
    }

    #[test]
    fn test_empty_group_is_not_recorded() {
        let mut buf = UndoableBuffer::new(EditorRope::from_str("x"), 100);
        buf.begin_group();
        buf.end_group();
        buf.end_group();
        assert!(!buf.can_undo());
    }

    #[test]
    fn test_new_edit_clears_redo() {
        let mut buf = UndoableBuffer::new(EditorRope::from_str("abc"), 100);

        buf.insert(3, "d");
        assert!(buf.undo());
        assert!(buf.can_redo());

        buf.insert(3, "e");
        assert!(!buf.can_redo());
    }

    #[test]
    fn test_max_steps() {
        let mut buf = UndoableBuffer::new(EditorRope::from_str(""), 3);

        buf.insert(0, "a");
        buf.insert(1, "b");
        buf.insert(2, "c");
        buf.insert(3, "d");

        assert!(buf.undo());
        assert!(buf.undo());
        assert!(buf.undo());
        assert!(!buf.undo());
        assert_eq!(buf.to_string(), "a");
    }
}

//! Text buffer abstraction for editor storage.
//!
//! The `TextBuffer` trait provides a common interface for text storage so the
//! document, completion and fragment code can run against ropey locally or
//! against whatever buffer an embedding editor widget exposes.

use smol_str::{SmolStr, ToSmolStr};
use std::ops::Range;
use web_time::Instant;

use crate::types::EditInfo;

/// A text buffer that supports efficient editing and offset conversion.
///
/// All offsets are in Unicode scalar values (chars), not bytes or UTF-16.
pub trait TextBuffer {
    /// Total length in bytes (UTF-8).
    fn len_bytes(&self) -> usize;

    /// Total length in chars (Unicode scalar values).
    fn len_chars(&self) -> usize;

    /// Check if empty.
    fn is_empty(&self) -> bool {
        self.len_chars() == 0
    }

    /// Insert text at char offset.
    fn insert(&mut self, char_offset: usize, text: &str);

    /// Delete char range.
    fn delete(&mut self, char_range: Range<usize>);

    /// Replace char range with text.
    fn replace(&mut self, char_range: Range<usize>, text: &str) {
        if !char_range.is_empty() {
            self.delete(char_range.clone());
        }
        if !text.is_empty() {
            self.insert(char_range.start, text);
        }
    }

    /// Get a slice as SmolStr. Returns None if range is invalid.
    fn slice(&self, char_range: Range<usize>) -> Option<SmolStr>;

    /// Get character at offset. Returns None if out of bounds.
    fn char_at(&self, char_offset: usize) -> Option<char>;

    /// Convert entire buffer to String.
    fn to_string(&self) -> String;

    /// Convert char offset to byte offset.
    fn char_to_byte(&self, char_offset: usize) -> usize;

    /// Convert byte offset to char offset.
    fn byte_to_char(&self, byte_offset: usize) -> usize;

    /// Number of lines. An empty buffer has one line, as does a buffer
    /// without a trailing newline; a trailing newline starts a new empty line.
    fn len_lines(&self) -> usize;

    /// Line index containing the char offset. Offsets past the end clamp.
    fn char_to_line(&self, char_offset: usize) -> usize;

    /// Char offset of the start of a line. Lines past the end clamp to the
    /// end of the buffer.
    fn line_to_char(&self, line: usize) -> usize;

    /// Get info about the last edit operation, if any.
    fn last_edit(&self) -> Option<EditInfo>;

    /// Text from the start of the offset's line up to the offset.
    fn line_prefix(&self, char_offset: usize) -> SmolStr {
        let offset = char_offset.min(self.len_chars());
        let start = self.line_to_char(self.char_to_line(offset));
        self.slice(start..offset).unwrap_or_default()
    }
}

/// Ropey-backed text buffer for local editing.
///
/// Provides O(log n) editing operations and offset conversions.
#[derive(Clone, Default)]
pub struct EditorRope {
    rope: ropey::Rope,
    last_edit: Option<EditInfo>,
}

impl EditorRope {
    /// Create a new empty rope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from string.
    pub fn from_str(s: &str) -> Self {
        Self {
            rope: ropey::Rope::from_str(s),
            last_edit: None,
        }
    }

    /// Get a reference to the underlying rope (for advanced operations).
    pub fn rope(&self) -> &ropey::Rope {
        &self.rope
    }
}

impl TextBuffer for EditorRope {
    fn len_bytes(&self) -> usize {
        self.rope.len_bytes()
    }

    fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    fn insert(&mut self, char_offset: usize, text: &str) {
        let char_offset = char_offset.min(self.rope.len_chars());
        self.rope.insert(char_offset, text);

        self.last_edit = Some(EditInfo {
            edit_char_pos: char_offset,
            inserted_len: text.chars().count(),
            deleted_len: 0,
            contains_newline: text.contains('\n'),
            doc_len_after: self.rope.len_chars(),
            timestamp: Instant::now(),
        });
    }

    fn delete(&mut self, char_range: Range<usize>) {
        let len = self.rope.len_chars();
        let char_range = char_range.start.min(len)..char_range.end.min(len);
        let contains_newline = self
            .slice(char_range.clone())
            .map(|s| s.contains('\n'))
            .unwrap_or(false);
        let deleted_len = char_range.len();

        self.rope.remove(char_range.clone());

        self.last_edit = Some(EditInfo {
            edit_char_pos: char_range.start,
            inserted_len: 0,
            deleted_len,
            contains_newline,
            doc_len_after: self.rope.len_chars(),
            timestamp: Instant::now(),
        });
    }

    fn slice(&self, char_range: Range<usize>) -> Option<SmolStr> {
        if char_range.start > char_range.end || char_range.end > self.len_chars() {
            return None;
        }
        Some(self.rope.slice(char_range).to_smolstr())
    }

    fn char_at(&self, char_offset: usize) -> Option<char> {
        if char_offset >= self.len_chars() {
            return None;
        }
        Some(self.rope.char(char_offset))
    }

    fn to_string(&self) -> String {
        self.rope.to_string()
    }

    fn char_to_byte(&self, char_offset: usize) -> usize {
        self.rope.char_to_byte(char_offset.min(self.rope.len_chars()))
    }

    fn byte_to_char(&self, byte_offset: usize) -> usize {
        self.rope.byte_to_char(byte_offset.min(self.rope.len_bytes()))
    }

    fn len_lines(&self) -> usize {
        self.rope.len_lines()
    }

    fn char_to_line(&self, char_offset: usize) -> usize {
        self.rope.char_to_line(char_offset.min(self.rope.len_chars()))
    }

    fn line_to_char(&self, line: usize) -> usize {
        if line >= self.rope.len_lines() {
            return self.rope.len_chars();
        }
        self.rope.line_to_char(line)
    }

    fn last_edit(&self) -> Option<EditInfo> {
        self.last_edit
    }
}

impl From<&str> for EditorRope {
    fn from(s: &str) -> Self {
        Self::from_str(s)
    }
}

impl From<String> for EditorRope {
    fn from(s: String) -> Self {
        Self::from_str(&s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_operations() {
        let mut rope = EditorRope::from_str("hello world");
        assert_eq!(rope.len_chars(), 11);

        rope.insert(5, " beautiful");
        assert_eq!(rope.to_string(), "hello beautiful world");

        rope.delete(5..15);
        assert_eq!(rope.to_string(), "hello world");
        let edit = rope.last_edit().unwrap();
        assert_eq!(edit.deleted_len, 10);
        assert_eq!(edit.doc_len_after, 11);
    }

    #[test]
    fn test_slice_bounds() {
        let rope = EditorRope::from_str("hello world");
        assert_eq!(rope.slice(6..11).as_deref(), Some("world"));
        assert_eq!(rope.slice(0..100), None);
    }

    #[test]
    fn test_offset_conversion() {
        // "α" is 2 bytes, 1 char
        let rope = EditorRope::from_str("\\alpha α x");
        assert_eq!(rope.len_chars(), 10);
        assert_eq!(rope.len_bytes(), 11);
        assert_eq!(rope.char_to_byte(7), 7);
        assert_eq!(rope.char_to_byte(8), 9);
        assert_eq!(rope.byte_to_char(10), 9);
    }

    #[test]
    fn test_lines() {
        let rope = EditorRope::from_str("one\ntwo\nthree");
        assert_eq!(rope.len_lines(), 3);
        assert_eq!(rope.char_to_line(5), 1);
        assert_eq!(rope.line_to_char(2), 8);
        assert_eq!(rope.line_to_char(10), rope.len_chars());
        assert_eq!(rope.line_prefix(10).as_str(), "th");
        assert_eq!(rope.line_prefix(4).as_str(), "");
    }

    #[test]
    fn test_replace_records_newline() {
        let mut rope = EditorRope::from_str("a\nb");
        rope.replace(1..2, " ");
        assert_eq!(rope.to_string(), "a b");
        // last edit is the insertion of " "
        assert!(!rope.last_edit().unwrap().contains_newline);
    }
}

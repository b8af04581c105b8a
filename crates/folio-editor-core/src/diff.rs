//! Line diff between two versions of a file.
//!
//! Lines are compared by index only: line `i` of the old text against line
//! `i` of the new text, with leftover lines reported as added or removed.
//! There is no alignment, so inserting a line near the top reports every
//! following line as modified.

use std::fmt;

use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LineChange<'a> {
    Unchanged { text: &'a str },
    Modified { old: &'a str, new: &'a str },
    Added { text: &'a str },
    Removed { text: &'a str },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DiffLine<'a> {
    /// 0-based line index, shared by both sides.
    pub index: usize,
    #[serde(flatten)]
    pub change: LineChange<'a>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DiffSummary {
    pub unchanged: usize,
    pub modified: usize,
    pub added: usize,
    pub removed: usize,
}

impl DiffSummary {
    pub fn is_identical(&self) -> bool {
        self.modified == 0 && self.added == 0 && self.removed == 0
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LineDiff<'a> {
    pub lines: Vec<DiffLine<'a>>,
}

/// Zip both texts line by line.
pub fn diff_lines<'a>(old: &'a str, new: &'a str) -> LineDiff<'a> {
    let old_lines: Vec<&str> = old.lines().collect();
    let new_lines: Vec<&str> = new.lines().collect();
    let len = old_lines.len().max(new_lines.len());

    let lines = (0..len)
        .map(|index| {
            let change = match (old_lines.get(index), new_lines.get(index)) {
                (Some(&o), Some(&n)) if o == n => LineChange::Unchanged { text: o },
                (Some(&o), Some(&n)) => LineChange::Modified { old: o, new: n },
                (None, Some(&n)) => LineChange::Added { text: n },
                (Some(&o), None) => LineChange::Removed { text: o },
                (None, None) => unreachable!("index below max length"),
            };
            DiffLine { index, change }
        })
        .collect();

    LineDiff { lines }
}

impl LineDiff<'_> {
    pub fn summary(&self) -> DiffSummary {
        let mut summary = DiffSummary::default();
        for line in &self.lines {
            match line.change {
                LineChange::Unchanged { .. } => summary.unchanged += 1,
                LineChange::Modified { .. } => summary.modified += 1,
                LineChange::Added { .. } => summary.added += 1,
                LineChange::Removed { .. } => summary.removed += 1,
            }
        }
        summary
    }

    /// Only the lines that differ.
    pub fn changes(&self) -> impl Iterator<Item = &DiffLine<'_>> {
        self.lines
            .iter()
            .filter(|l| !matches!(l.change, LineChange::Unchanged { .. }))
    }
}

/// Plain-text rendering: two-character prefix per line, a modified line
/// shows its old text followed by `~>` and the new text.
impl fmt::Display for LineDiff<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            match &line.change {
                LineChange::Unchanged { text } => writeln!(f, "  {text}")?,
                LineChange::Modified { old, new } => writeln!(f, "~ {old} ~> {new}")?,
                LineChange::Added { text } => writeln!(f, "+ {text}")?,
                LineChange::Removed { text } => writeln!(f, "- {text}")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_texts() {
        let diff = diff_lines("a\nb\n", "a\nb");
        assert!(diff.summary().is_identical());
        assert_eq!(diff.changes().count(), 0);
    }

    #[test]
    fn trailing_lines_added_and_removed() {
        let diff = diff_lines("a\nb", "a\nb\nc\nd");
        let summary = diff.summary();
        assert_eq!(summary.added, 2);
        assert_eq!(summary.unchanged, 2);

        let diff = diff_lines("a\nb\nc", "a");
        assert_eq!(diff.summary().removed, 2);
        assert_eq!(
            diff.lines[2],
            DiffLine {
                index: 2,
                change: LineChange::Removed { text: "c" }
            }
        );
    }

    #[test]
    fn insertion_shifts_everything_after_it() {
        let diff = diff_lines("one\ntwo\nthree", "zero\none\ntwo\nthree");
        let summary = diff.summary();
        assert_eq!(summary.modified, 3);
        assert_eq!(summary.added, 1);
        assert_eq!(summary.unchanged, 0);
    }

    #[test]
    fn renders_plain_text() {
        let diff = diff_lines("\\section{A}\nbody\nend", "\\section{B}\nbody");
        insta::assert_snapshot!(diff.to_string(), @r"
        ~ \section{A} ~> \section{B}
          body
        - end
        ");
    }

    #[test]
    fn serializes_with_kind_tag() {
        let diff = diff_lines("x", "y");
        let json = serde_json::to_value(&diff.lines[0]).unwrap();
        assert_eq!(json["kind"], "modified");
        assert_eq!(json["index"], 0);
        assert_eq!(json["new"], "y");
    }
}

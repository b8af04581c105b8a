//! Code fragments in assistant replies and applying them to a document.

use serde::Serialize;

use crate::document::EditorDocument;
use crate::types::EditInfo;

/// A fenced code block pulled out of a reply.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CodeFragment {
    /// Info string after the opening fence, lowercased. Empty if none.
    pub language: String,
    pub code: String,
}

impl CodeFragment {
    pub fn is_latex(&self) -> bool {
        matches!(self.language.as_str(), "latex" | "tex" | "")
    }

    /// Whether this fragment is a complete document rather than a snippet.
    pub fn is_full_document(&self) -> bool {
        self.code.contains("\\documentclass")
    }
}

/// Where a fragment goes when applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FragmentPlacement {
    ReplaceDocument,
    ReplaceSelection,
    InsertAtCursor,
}

impl FragmentPlacement {
    pub fn for_fragment(fragment: &CodeFragment, has_selection: bool) -> Self {
        if fragment.is_full_document() {
            FragmentPlacement::ReplaceDocument
        } else if has_selection {
            FragmentPlacement::ReplaceSelection
        } else {
            FragmentPlacement::InsertAtCursor
        }
    }
}

/// Collect fenced code blocks (```` ``` ```` or `~~~`) in order.
///
/// An unterminated final block runs to the end of the reply.
pub fn extract_fragments(reply: &str) -> Vec<CodeFragment> {
    let mut fragments = Vec::new();
    let mut open: Option<(&str, String, Vec<&str>)> = None;

    for line in reply.lines() {
        let trimmed = line.trim_start();
        match open.as_mut() {
            None => {
                if let Some(fence) = fence_of(trimmed) {
                    let info = trimmed[fence.len()..].trim().to_lowercase();
                    let language = info.split_whitespace().next().unwrap_or("").to_owned();
                    open = Some((fence, language, Vec::new()));
                }
            }
            Some((fence, _, body)) => {
                if trimmed.trim_end() == *fence {
                    if let Some((_, language, body)) = open.take() {
                        fragments.push(CodeFragment {
                            language,
                            code: body.join("\n"),
                        });
                    }
                } else {
                    body.push(line);
                }
            }
        }
    }

    if let Some((_, language, body)) = open {
        fragments.push(CodeFragment {
            language,
            code: body.join("\n"),
        });
    }

    fragments
}

fn fence_of(line: &str) -> Option<&'static str> {
    if line.starts_with("```") {
        Some("```")
    } else if line.starts_with("~~~") {
        Some("~~~")
    } else {
        None
    }
}

/// The fragment to apply from a reply: the first LaTeX block, else the
/// first block of any language.
pub fn primary_fragment(fragments: &[CodeFragment]) -> Option<&CodeFragment> {
    fragments
        .iter()
        .find(|f| f.is_latex())
        .or_else(|| fragments.first())
}

/// Apply a fragment to the document as one undo step.
pub fn apply_fragment(
    document: &mut EditorDocument,
    fragment: &CodeFragment,
) -> (FragmentPlacement, Option<EditInfo>) {
    let placement = FragmentPlacement::for_fragment(fragment, document.selection().is_some());
    let edit = match placement {
        FragmentPlacement::ReplaceDocument => {
            let mut code = fragment.code.clone();
            if !code.ends_with('\n') {
                code.push('\n');
            }
            document.replace_all(&code)
        }
        FragmentPlacement::ReplaceSelection => document.replace_selection(&fragment.code),
        FragmentPlacement::InsertAtCursor => document.insert_at_cursor(&fragment.code),
    };
    tracing::info!(?placement, language = %fragment.language, "fragment applied");
    (placement, edit)
}

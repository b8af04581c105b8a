//! Prompt construction: the user's message plus the open document.

use serde::Serialize;

/// What the assistant sees of the editor.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DocumentContext {
    pub filename: String,
    pub text: String,
    /// Selected text, if the user selected something.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<String>,
}

impl DocumentContext {
    pub fn new(filename: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            text: text.into(),
            selection: None,
        }
    }

    pub fn with_selection(mut self, selection: impl Into<String>) -> Self {
        let selection = selection.into();
        self.selection = (!selection.is_empty()).then_some(selection);
        self
    }
}

/// A provider-neutral request.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChatRequest {
    pub system: String,
    pub message: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

const ROLE: &str = "You are an assistant embedded in a LaTeX editor. \
Answer questions about the user's document and help them edit it. \
When you propose LaTeX, put it in a single fenced ```latex code block. \
If you rewrite the whole document, the block must start with \\documentclass; \
otherwise give only the fragment to insert.";

/// Build the system prompt with the document injected.
pub fn system_prompt(context: &DocumentContext) -> String {
    let mut prompt = String::with_capacity(ROLE.len() + context.text.len() + 64);
    prompt.push_str(ROLE);
    prompt.push_str("\n\nThe user is editing `");
    prompt.push_str(&context.filename);
    prompt.push_str("`:\n\n```latex\n");
    prompt.push_str(&context.text);
    if !context.text.ends_with('\n') {
        prompt.push('\n');
    }
    prompt.push_str("```\n");
    if let Some(selection) = &context.selection {
        prompt.push_str("\nThe current selection is:\n\n```latex\n");
        prompt.push_str(selection);
        if !selection.ends_with('\n') {
            prompt.push('\n');
        }
        prompt.push_str("```\n");
    }
    prompt
}

pub fn build_request(
    context: &DocumentContext,
    message: &str,
    model: impl Into<String>,
    max_tokens: u32,
    temperature: f64,
) -> ChatRequest {
    ChatRequest {
        system: system_prompt(context),
        message: message.trim().to_owned(),
        model: model.into(),
        max_tokens,
        temperature,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_is_injected_in_fence() {
        let ctx = DocumentContext::new("main.tex", "\\section{A}");
        let prompt = system_prompt(&ctx);
        assert!(prompt.starts_with(ROLE));
        assert!(prompt.ends_with("`main.tex`:\n\n```latex\n\\section{A}\n```\n"));
        assert!(!prompt.contains("selection"));
    }

    #[test]
    fn selection_is_appended() {
        let ctx = DocumentContext::new("a.tex", "x\n").with_selection("x");
        let prompt = system_prompt(&ctx);
        assert!(prompt.ends_with("The current selection is:\n\n```latex\nx\n```\n"));

        let ctx = DocumentContext::new("a.tex", "x").with_selection("");
        assert!(ctx.selection.is_none());
    }

    #[test]
    fn prompt_layout() {
        let ctx = DocumentContext::new("main.tex", "\\section{A}\nx = 1\n").with_selection("x = 1");
        let prompt = system_prompt(&ctx);
        insta::assert_snapshot!(prompt.strip_prefix(ROLE).unwrap().trim(), @r"
        The user is editing `main.tex`:

        ```latex
        \section{A}
        x = 1
        ```

        The current selection is:

        ```latex
        x = 1
        ```
        ");
    }

    #[test]
    fn request_trims_message() {
        let ctx = DocumentContext::new("main.tex", "");
        let req = build_request(&ctx, "  add a table \n", "gpt", 100, 0.5);
        assert_eq!(req.message, "add a table");
        assert_eq!(req.model, "gpt");
        assert_eq!(req.max_tokens, 100);
    }
}

//! Context-aware completion resolution.
//!
//! Given the text of the current line up to the cursor, decide which
//! candidate pool applies and which span of text the chosen candidate
//! replaces:
//!
//! - inside the braces of `\usepackage{...}` (optionally with `[options]`),
//!   offer package names for the word being typed;
//! - anywhere else, offer every command, snippet and symbol for the
//!   `\name` (or bare word) being typed.
//!
//! Ordering is left to the consumer. [`rank`] implements the usual
//! "boost, then label" ordering for consumers that don't have their own.

use std::cmp::Reverse;
use std::sync::LazyLock;

use serde::Serialize;

use crate::Regex;
use crate::catalog::{self, Completion};

/// Text up to the cursor sits inside a package-import argument list.
static PACKAGE_ARGUMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\usepackage(?:\[[^\]]*\])?\{[\w,]*$").expect("valid package pattern")
});

/// The package name being typed.
static PACKAGE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w*$").expect("valid package token pattern"));

/// The command or word being typed.
static GENERAL_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\?[\w@]*$").expect("valid general token pattern"));

/// Which candidate pool a position resolved to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionContext {
    PackageName,
    General,
}

/// Candidates plus the char range they replace.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CompletionResult {
    pub context: CompletionContext,
    /// Char offset where the typed token starts.
    pub from: usize,
    /// Char offset of the cursor.
    pub to: usize,
    /// The token being typed, `from..to`.
    pub typed: String,
    pub options: Vec<Completion>,
}

/// Resolve completions at a cursor.
///
/// `line_prefix` is the current line from its start up to the cursor and
/// `cursor` is the cursor's char offset in the document. When `explicit` is
/// false (completion triggered by typing rather than a keybinding), a general
/// position with nothing typed yields no result.
pub fn resolve(line_prefix: &str, cursor: usize, explicit: bool) -> Option<CompletionResult> {
    if PACKAGE_ARGUMENT.is_match(line_prefix) {
        let typed = match_suffix(&PACKAGE_TOKEN, line_prefix);
        tracing::debug!(typed, "resolved package-name completion");
        return Some(CompletionResult {
            context: CompletionContext::PackageName,
            from: cursor.saturating_sub(typed.chars().count()),
            to: cursor,
            typed: typed.to_owned(),
            options: catalog::PACKAGES.to_vec(),
        });
    }

    let typed = match_suffix(&GENERAL_TOKEN, line_prefix);
    if typed.is_empty() && !explicit {
        return None;
    }

    tracing::debug!(typed, explicit, "resolved general completion");
    Some(CompletionResult {
        context: CompletionContext::General,
        from: cursor.saturating_sub(typed.chars().count()),
        to: cursor,
        typed: typed.to_owned(),
        options: catalog::general_candidates().copied().collect(),
    })
}

fn match_suffix<'a>(pattern: &Regex, text: &'a str) -> &'a str {
    pattern.find(text).map(|m| m.as_str()).unwrap_or("")
}

/// Filter candidates to those matching `typed` and order them by boost
/// (highest first), then label.
///
/// Matching is a case-insensitive prefix test that ignores a leading
/// backslash on either side, so `sec` finds `\section`.
pub fn rank(options: &[Completion], typed: &str) -> Vec<Completion> {
    let needle = typed.trim_start_matches('\\').to_lowercase();
    let mut ranked: Vec<Completion> = options
        .iter()
        .filter(|c| {
            c.label
                .trim_start_matches('\\')
                .to_lowercase()
                .starts_with(&needle)
        })
        .copied()
        .collect();
    ranked.sort_by_key(|c| (Reverse(c.boost.unwrap_or(0)), c.label));
    ranked
}

/// Text with snippet placeholders expanded, plus where the cursor goes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpandedSnippet {
    pub text: String,
    /// Char offset within `text` of the first placeholder, if any.
    pub cursor: Option<usize>,
}

/// Expand `${n}` and `${n:default}` placeholders.
///
/// Placeholders are replaced by their default text (or nothing). The cursor
/// lands at the start of the lowest-numbered placeholder; `${0}` counts as
/// the last one. Anything that doesn't parse as a placeholder is kept as is.
pub fn expand_snippet(template: &str) -> ExpandedSnippet {
    let mut text = String::with_capacity(template.len());
    let mut best: Option<(u32, usize)> = None;
    let mut rest = template;

    while let Some(start) = rest.find("${") {
        text.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(close) = after.find('}') else {
            text.push_str(&rest[start..]);
            rest = "";
            break;
        };
        let inner = &after[..close];
        let (index, default) = match inner.split_once(':') {
            Some((index, default)) => (index, default),
            None => (inner, ""),
        };
        match index.parse::<u32>() {
            Ok(n) => {
                let rank = if n == 0 { u32::MAX } else { n };
                let at = text.chars().count();
                if best.is_none_or(|(r, _)| rank < r) {
                    best = Some((rank, at));
                }
                text.push_str(default);
            }
            Err(_) => text.push_str(&rest[start..start + 2 + close + 1]),
        }
        rest = &after[close + 1..];
    }
    text.push_str(rest);

    ExpandedSnippet {
        text,
        cursor: best.map(|(_, at)| at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CompletionKind;

    #[test]
    fn package_argument_offers_packages() {
        let line = "\\usepackage{ams";
        let result = resolve(line, 100, false).unwrap();
        assert_eq!(result.context, CompletionContext::PackageName);
        assert_eq!(result.typed, "ams");
        assert_eq!(result.from, 97);
        assert_eq!(result.to, 100);
        assert!(
            result
                .options
                .iter()
                .all(|c| c.kind == CompletionKind::Package)
        );
    }

    #[test]
    fn package_argument_after_comma_and_options() {
        let result = resolve("  \\usepackage[utf8]{amsmath,gra", 31, false).unwrap();
        assert_eq!(result.context, CompletionContext::PackageName);
        assert_eq!(result.typed, "gra");
        assert_eq!(result.from, 28);
    }

    #[test]
    fn empty_package_argument_still_resolves() {
        let result = resolve("\\usepackage{", 12, false).unwrap();
        assert_eq!(result.context, CompletionContext::PackageName);
        assert_eq!(result.typed, "");
        assert_eq!(result.from, 12);
    }

    #[test]
    fn closed_package_argument_is_general() {
        let result = resolve("\\usepackage{amsmath} \\te", 24, false).unwrap();
        assert_eq!(result.context, CompletionContext::General);
        assert_eq!(result.typed, "\\te");
        assert_eq!(result.from, 21);
    }

    #[test]
    fn other_brace_arguments_are_general() {
        let result = resolve("\\section{Intro", 14, false).unwrap();
        assert_eq!(result.context, CompletionContext::General);
        assert_eq!(result.typed, "Intro");
    }

    #[test]
    fn general_pool_is_commands_snippets_symbols() {
        let result = resolve("x = \\al", 7, false).unwrap();
        let kinds: std::collections::HashSet<_> = result.options.iter().map(|c| c.kind).collect();
        assert!(kinds.contains(&CompletionKind::Command));
        assert!(kinds.contains(&CompletionKind::Snippet));
        assert!(kinds.contains(&CompletionKind::Symbol));
        assert!(!kinds.contains(&CompletionKind::Package));
    }

    #[test]
    fn at_sign_is_part_of_token() {
        let result = resolve("\\make@ti", 8, false).unwrap();
        assert_eq!(result.typed, "\\make@ti");
    }

    #[test]
    fn nothing_typed_needs_explicit_request() {
        assert!(resolve("some text ", 10, false).is_none());
        let result = resolve("some text ", 10, true).unwrap();
        assert_eq!(result.context, CompletionContext::General);
        assert_eq!(result.from, 10);
    }

    #[test]
    fn multibyte_prefix_uses_char_offsets() {
        // "é" is one char but two bytes
        let result = resolve("é \\alp", 6, false).unwrap();
        assert_eq!(result.typed, "\\alp");
        assert_eq!(result.from, 2);
    }

    #[test]
    fn rank_orders_by_boost_then_label() {
        let result = resolve("\\sub", 4, false).unwrap();
        let ranked = rank(&result.options, &result.typed);
        let labels: Vec<_> = ranked.iter().map(|c| c.label).collect();
        assert_eq!(labels, ["\\subsection", "\\subset", "\\subseteq", "\\subsubsection"]);
    }

    #[test]
    fn rank_ignores_case_and_backslash() {
        let result = resolve("\\usepackage{GRAPH", 17, false).unwrap();
        let ranked = rank(&result.options, &result.typed);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].label, "graphicx");

        let ranked = rank(catalog::SYMBOLS, "omega");
        let labels: Vec<_> = ranked.iter().map(|c| c.label).collect();
        assert_eq!(labels, ["\\Omega", "\\omega"]);
    }

    #[test]
    fn expand_plain_placeholder() {
        let expanded = expand_snippet("\\section{${1}}");
        assert_eq!(expanded.text, "\\section{}");
        assert_eq!(expanded.cursor, Some(9));
    }

    #[test]
    fn expand_defaults_and_ordering() {
        let expanded = expand_snippet("\\href{${2}}{${1:text}}${0}");
        assert_eq!(expanded.text, "\\href{}{text}");
        assert_eq!(expanded.cursor, Some(8));
    }

    #[test]
    fn expand_without_placeholders() {
        let expanded = expand_snippet("\\maketitle");
        assert_eq!(expanded.text, "\\maketitle");
        assert_eq!(expanded.cursor, None);
        assert_eq!(expand_snippet("${x} and ${").text, "${x} and ${");
    }
}

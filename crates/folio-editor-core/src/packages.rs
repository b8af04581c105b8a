//! Package directives: scanning and splicing `\usepackage` lines.
//!
//! There is no document model behind this. Installed packages are whatever a
//! scan of the text finds right now, and adding or removing one is a string
//! edit on the line that holds (or will hold) the directive.

use std::ops::Range;
use std::sync::LazyLock;

use miette::Diagnostic;
use serde::Serialize;

use crate::Regex;

static DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\usepackage\s*(?:\[([^\]]*)\])?\s*\{([^}]*)\}").expect("valid directive pattern")
});

static DOCUMENTCLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\documentclass\b").expect("valid documentclass pattern"));

static PACKAGE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9-]+$").expect("valid package name pattern"));

#[derive(thiserror::Error, Debug, Diagnostic, PartialEq, Eq)]
pub enum PackageError {
    #[error("invalid package name {0:?}")]
    #[diagnostic(
        code(folio::packages::invalid_name),
        help("package names contain only letters, digits and '-'")
    )]
    InvalidName(String),

    #[error("package {0} is already installed")]
    #[diagnostic(code(folio::packages::already_installed))]
    AlreadyInstalled(String),

    #[error("package {0} is not installed")]
    #[diagnostic(code(folio::packages::not_installed))]
    NotInstalled(String),
}

/// A package named by a `\usepackage` directive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InstalledPackage {
    pub name: String,
    /// Contents of the `[...]` option block, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<String>,
    /// 0-based line of the directive.
    pub line: usize,
}

/// One directive found on a line.
struct Directive {
    line: usize,
    options: Option<String>,
    /// Byte range of the brace contents within the line.
    list: Range<usize>,
    names: Vec<String>,
}

/// The part of a line before an unescaped `%`.
fn strip_comment(line: &str) -> &str {
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        match c {
            '\\' => escaped = !escaped,
            '%' if !escaped => return &line[..i],
            _ => escaped = false,
        }
    }
    line
}

fn directives_in_line(index: usize, line: &str) -> impl Iterator<Item = Directive> + '_ {
    DIRECTIVE
        .captures_iter(strip_comment(line))
        .filter_map(move |caps| {
            let list = caps.get(2)?;
            Some(Directive {
                line: index,
                options: caps.get(1).map(|m| m.as_str().trim().to_owned()),
                list: list.range(),
                names: list
                    .as_str()
                    .split(',')
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                    .map(str::to_owned)
                    .collect(),
            })
        })
}

fn directives(text: &str) -> impl Iterator<Item = Directive> + '_ {
    text.split('\n')
        .enumerate()
        .flat_map(|(i, line)| directives_in_line(i, line))
}

/// Every package the text currently loads, in document order.
pub fn installed_packages(text: &str) -> Vec<InstalledPackage> {
    directives(text)
        .flat_map(|d| {
            let line = d.line;
            let options = d.options;
            d.names.into_iter().map(move |name| InstalledPackage {
                name,
                options: options.clone(),
                line,
            })
        })
        .collect()
}

pub fn is_installed(text: &str, name: &str) -> bool {
    directives(text).any(|d| d.names.iter().any(|n| n == name))
}

fn validate_name(name: &str) -> Result<(), PackageError> {
    if PACKAGE_NAME.is_match(name) {
        Ok(())
    } else {
        Err(PackageError::InvalidName(name.to_owned()))
    }
}

/// Add a `\usepackage` line for `name`.
///
/// The directive goes after the last existing `\usepackage`, or after
/// `\documentclass` when there is none, or at the very top.
pub fn add_package(text: &str, name: &str, options: Option<&str>) -> Result<String, PackageError> {
    validate_name(name)?;
    if is_installed(text, name) {
        return Err(PackageError::AlreadyInstalled(name.to_owned()));
    }

    let mut directive = match options.map(str::trim).filter(|o| !o.is_empty()) {
        Some(opts) => format!("\\usepackage[{opts}]{{{name}}}"),
        None => format!("\\usepackage{{{name}}}"),
    };

    let mut lines: Vec<String> = text.split('\n').map(str::to_owned).collect();
    let anchor = directives(text).map(|d| d.line).last().or_else(|| {
        lines
            .iter()
            .position(|line| DOCUMENTCLASS.is_match(strip_comment(line)))
    });
    let at = anchor.map(|line| line + 1).unwrap_or(0);

    // Lines keep their `\r` after splitting on `\n`; match the document.
    if text.contains("\r\n") {
        if at < lines.len() {
            directive.push('\r');
        } else if let Some(last) = lines.last_mut() {
            // appended after an unterminated last line
            last.push('\r');
        }
    }
    lines.insert(at, directive);

    tracing::info!(package = name, line = at, "package added");
    Ok(lines.join("\n"))
}

/// Remove `name` from every directive that loads it.
///
/// A directive loading only `name` loses its whole line; otherwise just the
/// name is dropped from the list.
pub fn remove_package(text: &str, name: &str) -> Result<String, PackageError> {
    validate_name(name)?;

    let mut lines: Vec<String> = text.split('\n').map(str::to_owned).collect();
    let mut drop_lines = Vec::new();
    let mut found = false;

    for (index, line) in lines.iter_mut().enumerate() {
        let mut hits: Vec<Directive> = directives_in_line(index, line.as_str())
            .filter(|d| d.names.iter().any(|n| n == name))
            .collect();
        if hits.is_empty() {
            continue;
        }
        found = true;

        // Rewrite right to left so earlier byte ranges stay valid.
        hits.reverse();
        for d in hits {
            let separator = if line[d.list.clone()].contains(", ") {
                ", "
            } else {
                ","
            };
            let kept: Vec<&str> = d
                .names
                .iter()
                .map(String::as_str)
                .filter(|n| *n != name)
                .collect();
            if kept.is_empty() {
                let span = directive_span(line, &d);
                line.replace_range(span, "");
            } else {
                line.replace_range(d.list.clone(), &kept.join(separator));
            }
        }

        if line.trim().is_empty() {
            drop_lines.push(index);
        }
    }

    if !found {
        return Err(PackageError::NotInstalled(name.to_owned()));
    }

    for index in drop_lines.into_iter().rev() {
        lines.remove(index);
    }

    tracing::info!(package = name, "package removed");
    Ok(lines.join("\n"))
}

/// Byte span of the full `\usepackage[...]{...}` directive owning `d.list`.
fn directive_span(line: &str, d: &Directive) -> Range<usize> {
    let start = line[..d.list.start].rfind("\\usepackage").unwrap_or(d.list.start);
    // list.end is the closing brace
    start..d.list.end + 1
}

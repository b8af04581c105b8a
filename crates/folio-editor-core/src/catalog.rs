//! Static completion pools: commands, environment snippets, math symbols and
//! package names.
//!
//! Insert text may contain `${n}` placeholders (optionally `${n:default}`);
//! see [`crate::completion::expand_snippet`].

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionKind {
    Command,
    Snippet,
    Symbol,
    Package,
}

/// A single completion candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Completion {
    /// Text shown in the list and matched against what was typed.
    pub label: &'static str,
    pub kind: CompletionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<&'static str>,
    /// Text inserted instead of the label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apply: Option<&'static str>,
    /// Ranking hint; higher sorts first.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boost: Option<i8>,
}

impl Completion {
    const fn new(label: &'static str, kind: CompletionKind) -> Self {
        Self {
            label,
            kind,
            detail: None,
            apply: None,
            boost: None,
        }
    }

    const fn detail(mut self, detail: &'static str) -> Self {
        self.detail = Some(detail);
        self
    }

    const fn apply(mut self, apply: &'static str) -> Self {
        self.apply = Some(apply);
        self
    }

    const fn boost(mut self, boost: i8) -> Self {
        self.boost = Some(boost);
        self
    }

    /// Text to insert for this candidate.
    pub fn insert_text(&self) -> &'static str {
        self.apply.unwrap_or(self.label)
    }
}

const fn cmd(label: &'static str) -> Completion {
    Completion::new(label, CompletionKind::Command)
}

const fn snip(label: &'static str, body: &'static str) -> Completion {
    Completion::new(label, CompletionKind::Snippet).apply(body)
}

const fn sym(label: &'static str, glyph: &'static str) -> Completion {
    Completion::new(label, CompletionKind::Symbol).detail(glyph)
}

const fn pkg(label: &'static str, detail: &'static str) -> Completion {
    Completion::new(label, CompletionKind::Package).detail(detail)
}

pub static COMMANDS: &[Completion] = &[
    cmd("\\documentclass").apply("\\documentclass{${1:article}}"),
    cmd("\\usepackage").apply("\\usepackage{${1}}").boost(2),
    cmd("\\title").apply("\\title{${1}}"),
    cmd("\\author").apply("\\author{${1}}"),
    cmd("\\date").apply("\\date{${1:\\today}}"),
    cmd("\\maketitle"),
    cmd("\\tableofcontents"),
    cmd("\\chapter").apply("\\chapter{${1}}"),
    cmd("\\section").apply("\\section{${1}}").boost(3),
    cmd("\\subsection").apply("\\subsection{${1}}").boost(2),
    cmd("\\subsubsection").apply("\\subsubsection{${1}}"),
    cmd("\\paragraph").apply("\\paragraph{${1}}"),
    cmd("\\textbf").apply("\\textbf{${1}}").boost(2),
    cmd("\\textit").apply("\\textit{${1}}").boost(1),
    cmd("\\emph").apply("\\emph{${1}}").boost(1),
    cmd("\\underline").apply("\\underline{${1}}"),
    cmd("\\texttt").apply("\\texttt{${1}}"),
    cmd("\\footnote").apply("\\footnote{${1}}"),
    cmd("\\label").apply("\\label{${1}}").boost(1),
    cmd("\\ref").apply("\\ref{${1}}").boost(1),
    cmd("\\eqref").apply("\\eqref{${1}}"),
    cmd("\\cite").apply("\\cite{${1}}").boost(1),
    cmd("\\includegraphics").apply("\\includegraphics[width=${1:\\linewidth}]{${2}}"),
    cmd("\\caption").apply("\\caption{${1}}"),
    cmd("\\centering"),
    cmd("\\item").boost(2),
    cmd("\\frac").apply("\\frac{${1}}{${2}}").boost(1),
    cmd("\\sqrt").apply("\\sqrt{${1}}"),
    cmd("\\sum").apply("\\sum_{${1}}^{${2}}"),
    cmd("\\prod").apply("\\prod_{${1}}^{${2}}"),
    cmd("\\int").apply("\\int_{${1}}^{${2}}"),
    cmd("\\lim").apply("\\lim_{${1}}"),
    cmd("\\mathbb").apply("\\mathbb{${1}}"),
    cmd("\\mathcal").apply("\\mathcal{${1}}"),
    cmd("\\mathrm").apply("\\mathrm{${1}}"),
    cmd("\\left"),
    cmd("\\right"),
    cmd("\\hline"),
    cmd("\\newpage"),
    cmd("\\vspace").apply("\\vspace{${1}}"),
    cmd("\\hspace").apply("\\hspace{${1}}"),
    cmd("\\newcommand").apply("\\newcommand{\\${1}}{${2}}"),
    cmd("\\renewcommand").apply("\\renewcommand{\\${1}}{${2}}"),
    cmd("\\url").apply("\\url{${1}}"),
    cmd("\\href").apply("\\href{${1}}{${2}}"),
    cmd("\\input").apply("\\input{${1}}"),
    cmd("\\include").apply("\\include{${1}}"),
    cmd("\\bibliography").apply("\\bibliography{${1}}"),
    cmd("\\bibliographystyle").apply("\\bibliographystyle{${1:plain}}"),
];

pub static SNIPPETS: &[Completion] = &[
    snip(
        "\\begin{document}",
        "\\begin{document}\n${1}\n\\end{document}",
    ),
    snip(
        "\\begin{equation}",
        "\\begin{equation}\n    ${1}\n\\end{equation}",
    )
    .boost(2),
    snip("\\begin{align}", "\\begin{align}\n    ${1}\n\\end{align}").boost(1),
    snip(
        "\\begin{itemize}",
        "\\begin{itemize}\n    \\item ${1}\n\\end{itemize}",
    )
    .boost(2),
    snip(
        "\\begin{enumerate}",
        "\\begin{enumerate}\n    \\item ${1}\n\\end{enumerate}",
    )
    .boost(1),
    snip(
        "\\begin{figure}",
        "\\begin{figure}[${1:htbp}]\n    \\centering\n    \\includegraphics[width=\\linewidth]{${2}}\n    \\caption{${3}}\n    \\label{fig:${4}}\n\\end{figure}",
    ),
    snip(
        "\\begin{table}",
        "\\begin{table}[${1:htbp}]\n    \\centering\n    \\begin{tabular}{${2:c c}}\n        ${3}\n    \\end{tabular}\n    \\caption{${4}}\n\\end{table}",
    ),
    snip(
        "\\begin{tabular}",
        "\\begin{tabular}{${1:c c}}\n    ${2}\n\\end{tabular}",
    ),
    snip("\\begin{abstract}", "\\begin{abstract}\n${1}\n\\end{abstract}"),
    snip("\\begin{proof}", "\\begin{proof}\n${1}\n\\end{proof}"),
    snip(
        "\\begin{theorem}",
        "\\begin{theorem}\n${1}\n\\end{theorem}",
    ),
    snip(
        "\\begin{verbatim}",
        "\\begin{verbatim}\n${1}\n\\end{verbatim}",
    ),
    snip("\\begin{center}", "\\begin{center}\n${1}\n\\end{center}"),
    snip(
        "\\begin{matrix}",
        "\\begin{pmatrix}\n    ${1}\n\\end{pmatrix}",
    )
    .detail("pmatrix"),
];

pub static SYMBOLS: &[Completion] = &[
    sym("\\alpha", "α"),
    sym("\\beta", "β"),
    sym("\\gamma", "γ"),
    sym("\\delta", "δ"),
    sym("\\epsilon", "ϵ"),
    sym("\\varepsilon", "ε"),
    sym("\\zeta", "ζ"),
    sym("\\eta", "η"),
    sym("\\theta", "θ"),
    sym("\\iota", "ι"),
    sym("\\kappa", "κ"),
    sym("\\lambda", "λ"),
    sym("\\mu", "μ"),
    sym("\\nu", "ν"),
    sym("\\xi", "ξ"),
    sym("\\pi", "π"),
    sym("\\rho", "ρ"),
    sym("\\sigma", "σ"),
    sym("\\tau", "τ"),
    sym("\\upsilon", "υ"),
    sym("\\phi", "ϕ"),
    sym("\\varphi", "φ"),
    sym("\\chi", "χ"),
    sym("\\psi", "ψ"),
    sym("\\omega", "ω"),
    sym("\\Gamma", "Γ"),
    sym("\\Delta", "Δ"),
    sym("\\Theta", "Θ"),
    sym("\\Lambda", "Λ"),
    sym("\\Xi", "Ξ"),
    sym("\\Pi", "Π"),
    sym("\\Sigma", "Σ"),
    sym("\\Phi", "Φ"),
    sym("\\Psi", "Ψ"),
    sym("\\Omega", "Ω"),
    sym("\\infty", "∞"),
    sym("\\partial", "∂"),
    sym("\\nabla", "∇"),
    sym("\\times", "×"),
    sym("\\cdot", "⋅"),
    sym("\\pm", "±"),
    sym("\\leq", "≤"),
    sym("\\geq", "≥"),
    sym("\\neq", "≠"),
    sym("\\approx", "≈"),
    sym("\\equiv", "≡"),
    sym("\\in", "∈"),
    sym("\\notin", "∉"),
    sym("\\subset", "⊂"),
    sym("\\subseteq", "⊆"),
    sym("\\cup", "∪"),
    sym("\\cap", "∩"),
    sym("\\forall", "∀"),
    sym("\\exists", "∃"),
    sym("\\rightarrow", "→"),
    sym("\\leftarrow", "←"),
    sym("\\Rightarrow", "⇒"),
    sym("\\Leftrightarrow", "⇔"),
    sym("\\mapsto", "↦"),
    sym("\\ldots", "…"),
];

pub static PACKAGES: &[Completion] = &[
    pkg("amsmath", "AMS mathematical facilities").boost(3),
    pkg("amssymb", "AMS symbol fonts").boost(2),
    pkg("amsthm", "theorem environments").boost(1),
    pkg("mathtools", "amsmath extensions and fixes"),
    pkg("graphicx", "include graphics files").boost(3),
    pkg("hyperref", "hyperlinks and PDF metadata").boost(2),
    pkg("geometry", "page layout and margins").boost(2),
    pkg("xcolor", "colour support"),
    pkg("booktabs", "publication-quality tables").boost(1),
    pkg("tabularx", "tables with flexible columns"),
    pkg("multirow", "cells spanning rows"),
    pkg("longtable", "tables across pages"),
    pkg("tikz", "programmatic graphics"),
    pkg("pgfplots", "plots built on TikZ"),
    pkg("listings", "source code listings"),
    pkg("biblatex", "bibliographies"),
    pkg("natbib", "author-year citations"),
    pkg("cleveref", "smart cross-references"),
    pkg("siunitx", "SI units and number formatting"),
    pkg("float", "improved float placement"),
    pkg("caption", "customise captions"),
    pkg("subcaption", "sub-figures and sub-tables"),
    pkg("enumitem", "customise list environments"),
    pkg("fancyhdr", "headers and footers"),
    pkg("babel", "multilingual typesetting"),
    pkg("inputenc", "input encoding"),
    pkg("fontenc", "font encoding"),
    pkg("microtype", "micro-typography"),
    pkg("algorithm2e", "algorithm pseudocode"),
    pkg("physics", "physics notation macros"),
    pkg("url", "typeset URLs"),
];

/// Every candidate offered at a general document position.
pub fn general_candidates() -> impl Iterator<Item = &'static Completion> {
    COMMANDS.iter().chain(SNIPPETS).chain(SYMBOLS)
}

/// Look up a known package by name.
pub fn package_info(name: &str) -> Option<&'static Completion> {
    PACKAGES.iter().find(|p| p.label == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn labels_are_unique_per_pool() {
        for pool in [COMMANDS, SNIPPETS, SYMBOLS, PACKAGES] {
            let mut seen = HashSet::new();
            for c in pool {
                assert!(seen.insert(c.label), "duplicate label {}", c.label);
            }
        }
    }

    #[test]
    fn kinds_match_pools() {
        assert!(COMMANDS.iter().all(|c| c.kind == CompletionKind::Command));
        assert!(SNIPPETS.iter().all(|c| c.kind == CompletionKind::Snippet));
        assert!(SYMBOLS.iter().all(|c| c.kind == CompletionKind::Symbol));
        assert!(PACKAGES.iter().all(|c| c.kind == CompletionKind::Package));
    }

    #[test]
    fn general_pool_is_union() {
        assert_eq!(
            general_candidates().count(),
            COMMANDS.len() + SNIPPETS.len() + SYMBOLS.len()
        );
    }

    #[test]
    fn insert_text_falls_back_to_label() {
        let alpha = SYMBOLS.iter().find(|c| c.label == "\\alpha").unwrap();
        assert_eq!(alpha.insert_text(), "\\alpha");
        assert_eq!(package_info("graphicx").unwrap().insert_text(), "graphicx");
        assert!(package_info("nonexistent").is_none());
    }
}

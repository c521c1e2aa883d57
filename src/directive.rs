//! Extraction of `@import` directives from raw stylesheet text.
//!
//! Matching is single-pass and pattern-based: one directive shape is
//! recognised (`@import`, optional `url(` wrapper, a quoted path, an optional
//! trailing media-condition expression, a terminating `;`). There is no
//! tokenizer and no AST; the matcher is deliberately isolated behind this
//! module so a grammar-based parser could replace it without touching the
//! graph, sort, or inline logic.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// One `@import` directive found in a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportRecord {
    /// The exact original directive text, used verbatim as a search pattern
    /// when the directive is replaced.
    pub statement: String,
    /// The path text as written in the directive, quotes stripped. May be
    /// relative, root-relative, or protocol-qualified.
    pub raw_path: String,
    /// Normalized single-line form carrying only the path, used when the
    /// original directive carries a media condition so the condition can be
    /// split off.
    pub rule: String,
    /// The media-query expression trailing the path, or `None` when the
    /// directive is unconditional.
    pub condition: Option<String>,
}

static IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"@import\s*(?:url\()?\s*["']([^'"]*)['"]\s*\)?\s*(.*?);"#)
        .unwrap_or_else(|e| panic!("import pattern failed to compile: {e}"))
});

/// Extract all `@import` directives from `content`, in document order.
///
/// Directives that sit inside a `/* ... */` comment block are not matched:
/// when the text following a candidate reaches a `*/` terminator before any
/// `/*` opener, the candidate is discarded.
#[must_use]
pub fn parse(content: &str) -> Vec<ImportRecord> {
    IMPORT
        .captures_iter(content)
        .filter(|caps| {
            caps.get(0)
                .is_some_and(|m| !in_comment_block(content, m.end()))
        })
        .filter_map(|caps| {
            let statement = caps.get(0)?.as_str().to_owned();
            let raw_path = caps.get(1)?.as_str().to_owned();
            let condition = caps
                .get(2)
                .map(|m| m.as_str())
                .filter(|c| !c.is_empty())
                .map(str::to_owned);
            let rule = format!("@import '{raw_path}';");
            Some(ImportRecord {
                statement,
                raw_path,
                rule,
                condition,
            })
        })
        .collect()
}

/// A match is inside a comment block when the remaining text closes a
/// comment before opening a new one.
fn in_comment_block(content: &str, match_end: usize) -> bool {
    let rest = content.get(match_end..).unwrap_or("");
    match (rest.find("*/"), rest.find("/*")) {
        (Some(close), Some(open)) => close < open,
        (Some(_), None) => true,
        _ => false,
    }
}

//! Minifier collaborator.
//!
//! A pure text-in/text-out transform applied after inlining when
//! optimization is enabled. The built-in implementation strips comment
//! blocks and collapses inter-token whitespace; it has no knowledge of the
//! include structure.

/// Pure content transform applied to fully inlined output.
pub trait Minifier {
    /// Produce a minified rendering of `content`.
    fn minify(&self, content: &str) -> String;
}

/// Built-in whitespace-and-comment CSS minifier.
#[derive(Debug, Default, Clone, Copy)]
pub struct CssMinifier;

impl Minifier for CssMinifier {
    fn minify(&self, content: &str) -> String {
        let stripped = strip_comments(content);
        let mut out = String::with_capacity(stripped.len());
        let mut pending_space = false;
        for ch in stripped.chars() {
            if ch.is_whitespace() {
                pending_space = !out.is_empty();
                continue;
            }
            if pending_space && spaced(out.chars().next_back(), ch) {
                out.push(' ');
            }
            pending_space = false;
            out.push(ch);
        }
        while out.ends_with(';') {
            out.pop();
        }
        out.replace(";}", "}")
    }
}

/// Whitespace survives only between tokens that would otherwise merge.
fn spaced(previous: Option<char>, next: char) -> bool {
    !matches!(next, '{' | '}' | ';' | ':' | ',' | ')')
        && !matches!(previous, Some('{' | '}' | ';' | ':' | ',' | '('))
}

fn strip_comments(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut rest = content;
    while let Some(start) = rest.find("/*") {
        out.push_str(rest.get(..start).unwrap_or(""));
        rest = rest.get(start + 2..).unwrap_or("");
        rest = match rest.find("*/") {
            Some(end) => rest.get(end + 2..).unwrap_or(""),
            None => "",
        };
    }
    out.push_str(rest);
    out
}

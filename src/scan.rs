//! File lister collaborator: glob discovery of stylesheet sources.
//!
//! Produces the ordered, duplicate-free file list that seeds graph key
//! iteration order. Listing order affects diagnostic ordering, not
//! correctness, so the platform sort order of the glob walk is kept as-is.

use camino::{Utf8Path, Utf8PathBuf};
use glob::{MatchOptions, glob_with};
use indexmap::IndexSet;
use miette::Diagnostic;
use regex::Regex;
use thiserror::Error;

/// Errors raised while listing stylesheet files.
#[derive(Debug, Error, Diagnostic)]
pub enum ScanError {
    /// The search pattern derived from the root directory is invalid.
    #[error("invalid glob pattern \"{pattern}\": {source}")]
    #[diagnostic(code(csscat::scan::pattern))]
    Pattern {
        /// The offending pattern.
        pattern: String,
        /// The underlying pattern error.
        #[source]
        source: glob::PatternError,
    },

    /// A directory entry could not be read during the walk.
    #[error("failed to read a directory entry: {source}")]
    #[diagnostic(code(csscat::scan::walk))]
    Walk {
        /// The underlying walk error.
        #[source]
        source: glob::GlobError,
    },

    /// A matched path contains non-UTF-8 data.
    #[error("matched path is not valid UTF-8: {path}")]
    #[diagnostic(code(csscat::scan::non_utf8))]
    NonUtf8 {
        /// Lossy rendering of the offending path.
        path: String,
    },
}

/// List every `.css` file under `root`, relative to `root`.
///
/// Paths matching `exclude` (tested against the relative, forward-slash
/// form) are filtered out. The result preserves the walk order and contains
/// no duplicates.
///
/// # Errors
///
/// Returns a [`ScanError`] when the derived pattern is invalid, an entry
/// cannot be read, or a match is not valid UTF-8.
pub fn css_files(root: &Utf8Path, exclude: Option<&Regex>) -> Result<Vec<Utf8PathBuf>, ScanError> {
    let opts = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };
    let pattern = format!("{root}/**/*.css");
    let entries = glob_with(&pattern, opts).map_err(|source| ScanError::Pattern {
        pattern: pattern.clone(),
        source,
    })?;

    let mut found: IndexSet<Utf8PathBuf> = IndexSet::new();
    for entry in entries {
        let path = entry.map_err(|source| ScanError::Walk { source })?;
        let utf8 = Utf8PathBuf::from_path_buf(path).map_err(|p| ScanError::NonUtf8 {
            path: p.display().to_string(),
        })?;
        if !utf8.is_file() {
            continue;
        }
        let relative = utf8
            .strip_prefix(root)
            .map_or_else(|_| utf8.clone(), Utf8Path::to_path_buf);
        let rel_display = crate::paths::to_forward_slashes(&relative);
        if exclude.is_some_and(|re| re.is_match(&rel_display)) {
            tracing::debug!(path = %rel_display, "excluded by pattern");
            continue;
        }
        found.insert(Utf8PathBuf::from(rel_display));
    }
    Ok(found.into_iter().collect())
}

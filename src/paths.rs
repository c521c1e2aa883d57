//! Lexical path helpers shared by graph building and asset rewriting.
//!
//! Dependency resolution must depend only on the importer's path and the raw
//! directive text, so everything here is purely lexical: no component ever
//! touches the filesystem. Canonical identities are absolute, `.`/`..`-free
//! paths with forward-slash separators.

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};

/// Collapse `.` and `..` components without consulting the filesystem.
///
/// Leading `..` components on an absolute path are dropped, matching how
/// `path.resolve` behaves in the original tooling this replaces.
#[must_use]
pub fn normalize(path: &Utf8Path) -> Utf8PathBuf {
    let mut out = Utf8PathBuf::new();
    for component in path.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => {
                if !matches!(
                    out.components().next_back(),
                    None | Some(Utf8Component::RootDir | Utf8Component::Prefix(_))
                ) {
                    out.pop();
                }
            }
            other => out.push(other.as_str()),
        }
    }
    out
}

/// Resolve `raw` against `base_dir` into a canonical path.
///
/// `raw` is the path text as written in a directive or asset reference; it is
/// always interpreted relative to `base_dir`, which must already be absolute.
#[must_use]
pub fn resolve(base_dir: &Utf8Path, raw: &str) -> Utf8PathBuf {
    normalize(&base_dir.join(raw))
}

/// Re-express the absolute `target` relative to the absolute `base_dir`.
///
/// The result uses forward slashes regardless of platform, suitable for
/// embedding in CSS `url(...)` references.
#[must_use]
pub fn relative_from(target: &Utf8Path, base_dir: &Utf8Path) -> String {
    let target_parts: Vec<&str> = target
        .components()
        .filter_map(component_name)
        .collect();
    let base_parts: Vec<&str> = base_dir
        .components()
        .filter_map(component_name)
        .collect();

    let shared = target_parts
        .iter()
        .zip(&base_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let ups = base_parts.len().saturating_sub(shared);
    let mut parts: Vec<&str> = Vec::with_capacity(ups + target_parts.len() - shared);
    parts.resize(ups, "..");
    parts.extend(target_parts.iter().skip(shared));
    parts.join("/")
}

/// Rewrite platform separators to forward slashes.
#[must_use]
pub fn to_forward_slashes(path: &Utf8Path) -> String {
    path.as_str().replace('\\', "/")
}

/// A colon before the first path separator marks a protocol qualifier
/// (`http:`, `data:`, a Windows drive, and so on).
#[must_use]
pub fn has_protocol(raw: &str) -> bool {
    let separator = raw.find(['/', '\\']);
    match (raw.find(':'), separator) {
        (Some(colon), Some(sep)) => colon < sep,
        (Some(_), None) => true,
        (None, _) => false,
    }
}

fn component_name(component: Utf8Component<'_>) -> Option<&str> {
    match component {
        Utf8Component::Normal(name) => Some(name),
        _ => None,
    }
}

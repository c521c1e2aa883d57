//! Dependency inlining and asset-path rewriting.
//!
//! The final stage. Files are visited in processing order, so every
//! dependency's content has already been fully rewritten by the time a
//! dependent reads it. Substitution is textual: the normalized rule (or,
//! for unconditional `url(...)`-form directives the conditional stage never
//! normalized, the original statement) is replaced with the dependency's
//! current content, after that content's relative asset references have been
//! re-expressed from the importer's directory.

use std::sync::LazyLock;

use camino::{Utf8Path, Utf8PathBuf};
use regex::Regex;

use crate::graph::FileSet;
use crate::minify::Minifier;
use crate::paths;
use crate::store::{ContentStore, StoreError};

static ASSET_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"url\(\s*["']?([^"')]+?)["']?\s*\)"#)
        .unwrap_or_else(|e| panic!("asset pattern failed to compile: {e}"))
});

/// Inline every import of every non-skipped file in `order`, then minify
/// when a `minifier` is supplied.
///
/// Skipped files are left untouched on disk. With minification disabled, a
/// file without imports is not rewritten at all.
///
/// # Errors
///
/// Propagates [`StoreError`] from reading or writing file content.
pub fn inline_imports(
    order: &[Utf8PathBuf],
    set: &FileSet,
    store: &dyn ContentStore,
    minifier: Option<&dyn Minifier>,
) -> Result<(), StoreError> {
    for file in order {
        let Some(record) = set.records.get(file) else {
            continue;
        };
        if record.skip {
            tracing::debug!(file = %file, "pass-through");
            continue;
        }
        if record.imports.is_none() && minifier.is_none() {
            tracing::debug!(file = %file, "nothing to inline");
            continue;
        }

        let mut content = store.read(file)?;
        if let Some(imports) = &record.imports {
            let dir = parent_dir(file);
            for (dep, import) in imports {
                let dep_content = store.read(dep)?;
                let rewritten = rewrite_asset_urls(&dep_content, parent_dir(dep), dir);
                content = if content.contains(&import.rule) {
                    content.replacen(&import.rule, &rewritten, 1)
                } else {
                    content.replacen(&import.statement, &rewritten, 1)
                };
            }
        }
        if let Some(active) = minifier {
            content = active.minify(&content);
        }
        store.write(file, &content)?;
        tracing::info!(file = %file, "concatenated");
    }
    Ok(())
}

/// Re-express every relative `url(...)` reference in `content` from
/// `from_dir` (where the text currently lives) to `to_dir` (where it is
/// about to be inlined). Absolute, root-relative, protocol-qualified, and
/// protocol-relative references are left untouched.
#[must_use]
pub fn rewrite_asset_urls(content: &str, from_dir: &Utf8Path, to_dir: &Utf8Path) -> String {
    let mut out = String::with_capacity(content.len());
    let mut last = 0;
    for caps in ASSET_URL.captures_iter(content) {
        let Some(reference) = caps.get(1) else {
            continue;
        };
        out.push_str(content.get(last..reference.start()).unwrap_or(""));
        let raw = reference.as_str();
        if is_external(raw) {
            out.push_str(raw);
        } else {
            let target = paths::resolve(from_dir, raw);
            out.push_str(&paths::relative_from(&target, to_dir));
        }
        last = reference.end();
    }
    out.push_str(content.get(last..).unwrap_or(""));
    out
}

fn is_external(reference: &str) -> bool {
    reference.starts_with('/') || reference.starts_with('\\') || paths::has_protocol(reference)
}

fn parent_dir(file: &Utf8Path) -> &Utf8Path {
    file.parent().unwrap_or(Utf8Path::new("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::minify::CssMinifier;
    use crate::store::memory::MemStore;
    use rstest::rstest;

    fn run(store: &MemStore, files: &[&str], minifier: Option<&dyn Minifier>) {
        let list: Vec<Utf8PathBuf> = files.iter().map(Utf8PathBuf::from).collect();
        let mut set = FileSet::from_files(&list, store, &[]).expect("build file set");
        let order = crate::order::sort(&mut set).expect("sort");
        crate::media::wrap_conditional_imports(&order, &set, store).expect("wrap");
        inline_imports(&order, &set, store, minifier).expect("inline");
    }

    #[test]
    fn import_is_replaced_with_dependency_content() {
        let store = MemStore::with(&[
            ("/css/a.css", "@import 'b.css';\n.a{}"),
            ("/css/b.css", ".b{color:red}"),
        ]);
        run(&store, &["/css/a.css", "/css/b.css"], None);

        let result = store.content("/css/a.css").expect("a.css");
        assert_eq!(result, ".b{color:red}\n.a{}");
        assert!(!result.contains("@import"));
    }

    #[test]
    fn media_guard_survives_inlining() {
        let store = MemStore::with(&[
            ("/css/a.css", "@import 'b.css' screen and (min-width: 100px);"),
            ("/css/b.css", ".b{}"),
        ]);
        run(&store, &["/css/a.css", "/css/b.css"], None);

        assert_eq!(
            store.content("/css/a.css").expect("a.css"),
            "@media screen and (min-width: 100px) {\n.b{}\n}"
        );
    }

    #[test]
    fn url_form_unconditional_import_falls_back_to_statement() {
        let store = MemStore::with(&[
            ("/css/a.css", "@import url(\"b.css\");\n.a{}"),
            ("/css/b.css", ".b{}"),
        ]);
        run(&store, &["/css/a.css", "/css/b.css"], None);

        assert_eq!(store.content("/css/a.css").expect("a.css"), ".b{}\n.a{}");
    }

    #[test]
    fn nested_dependencies_arrive_fully_inlined() {
        let store = MemStore::with(&[
            ("/css/a.css", "@import 'mid.css';"),
            ("/css/mid.css", "@import 'leaf.css';\n.mid{}"),
            ("/css/leaf.css", ".leaf{}"),
        ]);
        run(
            &store,
            &["/css/a.css", "/css/mid.css", "/css/leaf.css"],
            None,
        );

        assert_eq!(
            store.content("/css/a.css").expect("a.css"),
            ".leaf{}\n.mid{}"
        );
    }

    #[test]
    fn relative_assets_are_rewritten_to_the_importer_location() {
        let store = MemStore::with(&[
            ("/css/a.css", "@import 'sub/b.css';"),
            ("/css/sub/b.css", ".b{background:url( 'img/dot.png' )}"),
        ]);
        run(&store, &["/css/a.css", "/css/sub/b.css"], None);

        assert_eq!(
            store.content("/css/a.css").expect("a.css"),
            ".b{background:url( 'sub/img/dot.png' )}"
        );
    }

    #[test]
    fn assets_walk_up_when_the_importer_sits_deeper() {
        let store = MemStore::with(&[
            ("/css/pages/a.css", "@import '../shared/b.css';"),
            ("/css/shared/b.css", ".b{background:url(tex.png)}"),
        ]);
        run(&store, &["/css/pages/a.css", "/css/shared/b.css"], None);

        assert_eq!(
            store.content("/css/pages/a.css").expect("a.css"),
            ".b{background:url(../shared/tex.png)}"
        );
    }

    #[rstest]
    #[case("url(data:image/png;base64,AAAA)")]
    #[case("url(http://cdn.example/x.png)")]
    #[case("url(https://cdn.example/x.png)")]
    #[case("url(//cdn.example/x.png)")]
    #[case("url(/assets/x.png)")]
    fn external_references_are_left_untouched(#[case] reference: &str) {
        let content = format!(".b{{background:{reference}}}");
        let rewritten = rewrite_asset_urls(
            &content,
            Utf8Path::new("/css/sub"),
            Utf8Path::new("/css"),
        );
        assert_eq!(rewritten, content);
    }

    #[test]
    fn asset_rewriting_is_idempotent_for_correctly_scoped_references() {
        let content = ".b{background:url('img/dot.png')}";
        let dir = Utf8Path::new("/css");
        let once = rewrite_asset_urls(content, dir, dir);
        assert_eq!(once, content);
        assert_eq!(rewrite_asset_urls(&once, dir, dir), content);
    }

    #[test]
    fn optimization_minifies_files_without_imports() {
        let store = MemStore::with(&[("/css/plain.css", ".a { color: red; }\n")]);
        run(&store, &["/css/plain.css"], Some(&CssMinifier));

        assert_eq!(
            store.content("/css/plain.css").expect("plain.css"),
            ".a{color:red}"
        );
    }

    #[test]
    fn without_optimization_an_import_free_file_is_untouched() {
        let original = "  .a { color : red }  /* note */";
        let store = MemStore::with(&[("/css/plain.css", original)]);
        run(&store, &["/css/plain.css"], None);

        assert_eq!(store.content("/css/plain.css").expect("plain.css"), original);
    }

    #[test]
    fn skipped_importer_keeps_its_resolvable_siblings_uninlined() {
        let original = "@import '/abs/x.css';\n@import 'b.css';\n";
        let store = MemStore::with(&[("/css/a.css", original), ("/css/b.css", ".b{}")]);
        run(&store, &["/css/a.css", "/css/b.css"], None);

        assert_eq!(store.content("/css/a.css").expect("a.css"), original);
    }
}

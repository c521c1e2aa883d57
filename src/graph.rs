//! Per-file records and the dependency graph over canonical file identities.
//!
//! [`FileSet`] is the explicit context value threaded through the pipeline
//! stages; there is no ambient shared state. Records and graph are built
//! once, in input-list order, and only file *content* is mutated by later
//! stages.
//!
//! Unresolvable includes (root-relative, protocol-qualified, or
//! ignore-listed raw paths) mark the importing file `skip` and are recorded
//! in the graph under their raw text, so they can never collide with a real
//! file identity and are never visited as source files.

use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use serde::Serialize;

use crate::directive::{self, ImportRecord};
use crate::paths;
use crate::store::{ContentStore, StoreError};

/// One record per source file, keyed by canonical absolute path.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FileRecord {
    /// True when this file contains an include that cannot be resolved, or
    /// transitively depends on such a file. Skipped files pass through the
    /// rewrite and inline stages unmodified.
    pub skip: bool,
    /// Import records keyed by the dependency's canonical path (raw text for
    /// unresolvable dependencies). `None` when the file has no include
    /// directives at all, which is distinct from "imports exist but all
    /// skip".
    pub imports: Option<IndexMap<Utf8PathBuf, ImportRecord>>,
}

/// File records plus the dependency graph they induce.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FileSet {
    /// Record per input file, in input-list order.
    pub records: IndexMap<Utf8PathBuf, FileRecord>,
    /// Ordered dependency lists per file. Duplicate edges are allowed;
    /// unresolvable edges carry the raw directive text.
    pub graph: IndexMap<Utf8PathBuf, Vec<Utf8PathBuf>>,
}

/// Why an include could not be resolved to a file identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unresolvable {
    RootRelative,
    Protocol,
    Ignored,
}

impl Unresolvable {
    const fn describe(self) -> &'static str {
        match self {
            Self::RootRelative => "root-relative path",
            Self::Protocol => "protocol-qualified path",
            Self::Ignored => "ignore-listed path",
        }
    }
}

impl FileSet {
    /// Build records and graph for `files` (canonical absolute paths).
    ///
    /// Each file is read through `store` and parsed for directives; raw
    /// paths in `ignore` are treated as unresolvable. Resolution is purely
    /// lexical, so the result depends only on the input list, the file
    /// contents, and the ignore list.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`StoreError`] when a listed file cannot be
    /// read; the run must abort rather than produce partial output.
    pub fn from_files(
        files: &[Utf8PathBuf],
        store: &dyn ContentStore,
        ignore: &[String],
    ) -> Result<Self, StoreError> {
        let mut set = Self::default();
        for file in files {
            if set.records.contains_key(file) {
                continue;
            }
            let content = store.read(file)?;
            set.add_file(file, &content, ignore);
        }
        Ok(set)
    }

    fn add_file(&mut self, file: &Utf8Path, content: &str, ignore: &[String]) {
        let directives = directive::parse(content);
        let mut record = FileRecord::default();
        let mut edges = Vec::with_capacity(directives.len());

        for found in directives {
            match classify(&found.raw_path, ignore) {
                Some(reason) => {
                    tracing::warn!(
                        file = %file,
                        import = %found.raw_path,
                        reason = reason.describe(),
                        "unresolvable import; file will pass through unmodified",
                    );
                    record.skip = true;
                    let raw = Utf8PathBuf::from(&found.raw_path);
                    record
                        .imports
                        .get_or_insert_with(IndexMap::new)
                        .insert(raw.clone(), found);
                    edges.push(raw);
                }
                None => {
                    let base = parent_dir(file);
                    let canonical = paths::resolve(base, &found.raw_path);
                    edges.push(canonical.clone());
                    let imports = record.imports.get_or_insert_with(IndexMap::new);
                    if canonical != file {
                        imports.insert(canonical, found);
                    }
                }
            }
        }

        tracing::debug!(file = %file, imports = edges.len(), "parsed");
        self.graph.insert(file.to_path_buf(), edges);
        self.records.insert(file.to_path_buf(), record);
    }
}

fn parent_dir(file: &Utf8Path) -> &Utf8Path {
    file.parent().unwrap_or(Utf8Path::new("/"))
}

fn classify(raw: &str, ignore: &[String]) -> Option<Unresolvable> {
    if ignore.iter().any(|entry| entry == raw) {
        return Some(Unresolvable::Ignored);
    }
    if raw.starts_with('/') || raw.starts_with('\\') {
        return Some(Unresolvable::RootRelative);
    }
    if paths::has_protocol(raw) {
        return Some(Unresolvable::Protocol);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemStore;
    use rstest::rstest;

    fn paths(raw: &[&str]) -> Vec<Utf8PathBuf> {
        raw.iter().map(Utf8PathBuf::from).collect()
    }

    #[test]
    fn from_files_records_resolved_edges() {
        let store = MemStore::with(&[
            ("/css/a.css", "@import 'sub/b.css';\n.a{}"),
            ("/css/sub/b.css", ".b{}"),
        ]);
        let set = FileSet::from_files(&paths(&["/css/a.css", "/css/sub/b.css"]), &store, &[])
            .expect("build");

        let edges = set.graph.get(Utf8Path::new("/css/a.css")).expect("edges");
        assert_eq!(edges, &[Utf8PathBuf::from("/css/sub/b.css")]);
        let record = set.records.get(Utf8Path::new("/css/a.css")).expect("record");
        assert!(!record.skip);
        let imports = record.imports.as_ref().expect("imports");
        assert!(imports.contains_key(Utf8Path::new("/css/sub/b.css")));
    }

    #[test]
    fn from_files_leaves_imports_absent_without_directives() {
        let store = MemStore::with(&[("/css/plain.css", ".a{}")]);
        let set = FileSet::from_files(&paths(&["/css/plain.css"]), &store, &[]).expect("build");
        let record = set
            .records
            .get(Utf8Path::new("/css/plain.css"))
            .expect("record");
        assert!(record.imports.is_none());
        assert!(!record.skip);
    }

    #[test]
    fn root_relative_import_marks_importer_skip() {
        let store = MemStore::with(&[("/css/a.css", "@import '/abs/path.css';")]);
        let set = FileSet::from_files(&paths(&["/css/a.css"]), &store, &[]).expect("build");
        let record = set.records.get(Utf8Path::new("/css/a.css")).expect("record");
        assert!(record.skip);
        let edges = set.graph.get(Utf8Path::new("/css/a.css")).expect("edges");
        assert_eq!(edges, &[Utf8PathBuf::from("/abs/path.css")]);
    }

    #[rstest]
    #[case("http://cdn.example/x.css")]
    #[case("https://cdn.example/x.css")]
    #[case("data:text/css,.a{}")]
    fn protocol_imports_mark_importer_skip(#[case] target: &str) {
        let content = format!("@import '{target}';");
        let store = MemStore::with(&[("/css/a.css", content.as_str())]);
        let set = FileSet::from_files(&paths(&["/css/a.css"]), &store, &[]).expect("build");
        assert!(set.records.get(Utf8Path::new("/css/a.css")).expect("record").skip);
    }

    #[test]
    fn ignore_list_matches_raw_text_not_resolved_path() {
        let store = MemStore::with(&[
            ("/css/a.css", "@import 'c.css';"),
            ("/css/c.css", ".c{}"),
        ]);
        let set = FileSet::from_files(
            &paths(&["/css/a.css", "/css/c.css"]),
            &store,
            &["c.css".to_owned()],
        )
        .expect("build");
        assert!(set.records.get(Utf8Path::new("/css/a.css")).expect("a").skip);
        assert!(!set.records.get(Utf8Path::new("/css/c.css")).expect("c").skip);
        let edges = set.graph.get(Utf8Path::new("/css/a.css")).expect("edges");
        assert_eq!(edges, &[Utf8PathBuf::from("c.css")]);
    }

    #[test]
    fn self_import_keeps_edge_but_not_import_key() {
        let store = MemStore::with(&[("/css/a.css", "@import 'a.css';")]);
        let set = FileSet::from_files(&paths(&["/css/a.css"]), &store, &[]).expect("build");
        let edges = set.graph.get(Utf8Path::new("/css/a.css")).expect("edges");
        assert_eq!(edges, &[Utf8PathBuf::from("/css/a.css")]);
        let record = set.records.get(Utf8Path::new("/css/a.css")).expect("record");
        assert!(
            record
                .imports
                .as_ref()
                .is_none_or(|imports| !imports.contains_key(Utf8Path::new("/css/a.css")))
        );
    }

    #[test]
    fn missing_listed_file_is_fatal() {
        let store = MemStore::with(&[]);
        let err = FileSet::from_files(&paths(&["/css/gone.css"]), &store, &[])
            .expect_err("missing file should abort");
        assert!(err.to_string().contains("gone.css"));
    }
}

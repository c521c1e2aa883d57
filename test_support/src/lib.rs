//! Test utilities for staging stylesheet trees.
//!
//! Integration tests drive whole runs over real directories; this crate
//! provides the small helpers they share for building those directories.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

/// A temporary stylesheet tree rooted in its own directory.
///
/// The directory is removed when the fixture is dropped.
pub struct CssTree {
    // Held for its Drop: removing it would delete the tree early.
    _temp: TempDir,
    root: Utf8PathBuf,
}

impl CssTree {
    /// Create an empty tree.
    ///
    /// # Panics
    ///
    /// Panics when the temporary directory cannot be created or its path is
    /// not valid UTF-8.
    #[must_use]
    pub fn new() -> Self {
        let temp = TempDir::new().expect("create temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf())
            .expect("temp dir path should be utf-8");
        Self { _temp: temp, root }
    }

    /// Create a tree pre-populated with `(relative path, content)` entries.
    #[must_use]
    pub fn with_files(entries: &[(&str, &str)]) -> Self {
        let tree = Self::new();
        for (path, content) in entries {
            tree.write(path, content);
        }
        tree
    }

    /// The absolute root of the tree.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Absolute path of an entry.
    #[must_use]
    pub fn path(&self, relative: &str) -> Utf8PathBuf {
        self.root.join(relative)
    }

    /// Write `content` at `relative`, creating parent directories.
    ///
    /// # Panics
    ///
    /// Panics when the parent directory or the file cannot be written.
    pub fn write(&self, relative: &str, content: &str) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent directories");
        }
        fs::write(&path, content).expect("write fixture file");
    }

    /// Read the current content of an entry.
    ///
    /// # Panics
    ///
    /// Panics when the file cannot be read.
    #[must_use]
    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path(relative)).expect("read fixture file")
    }
}

impl Default for CssTree {
    fn default() -> Self {
        Self::new()
    }
}

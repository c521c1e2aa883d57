//! File content store collaborator.
//!
//! The core never touches the filesystem directly; it reads and rewrites
//! file content through [`ContentStore`] so tests can substitute an
//! in-memory store. The production implementation, [`DiskStore`], creates
//! parent directories on write the way the original helper did.

use std::fs;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use miette::Diagnostic;
use thiserror::Error;

/// Errors raised by content store operations.
#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    /// A listed source file does not exist or cannot be read.
    #[error("file does not exist: \"{path}\"")]
    #[diagnostic(code(csscat::store::not_found))]
    NotFound {
        /// The path that was requested.
        path: Utf8PathBuf,
    },

    /// Any other I/O failure while reading or writing.
    #[error("i/o failure on \"{path}\": {source}")]
    #[diagnostic(code(csscat::store::io))]
    Io {
        /// The path being accessed when the failure occurred.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Read/write access to file content, keyed by canonical path.
pub trait ContentStore {
    /// Read the full text of `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the file is absent and
    /// [`StoreError::Io`] for any other read failure.
    fn read(&self, path: &Utf8Path) -> Result<String, StoreError>;

    /// Replace the content of `path`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when the directory cannot be created or the
    /// file cannot be written.
    fn write(&self, path: &Utf8Path, content: &str) -> Result<(), StoreError>;
}

/// [`ContentStore`] backed by the real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiskStore;

impl ContentStore for DiskStore {
    fn read(&self, path: &Utf8Path) -> Result<String, StoreError> {
        fs::read_to_string(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound {
                path: path.to_path_buf(),
            },
            _ => StoreError::Io {
                path: path.to_path_buf(),
                source,
            },
        })
    }

    fn write(&self, path: &Utf8Path, content: &str) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, content).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

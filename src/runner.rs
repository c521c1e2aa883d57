//! Stage orchestration.
//!
//! Keeps the binary entry point minimal by providing a single function that
//! validates the configuration, assembles the file list, and drives the
//! pipeline:
//! build records and graph, sort by dependency, wrap conditioned imports,
//! inline. Every stage runs to completion over the full file set before the
//! next begins, and a fatal condition aborts the run before any later stage
//! mutates a file.

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use miette::Diagnostic;
use thiserror::Error;
use tracing::{debug, info};

use crate::cli::Cli;
use crate::graph::FileSet;
use crate::minify::{CssMinifier, Minifier};
use crate::store::DiskStore;
use crate::{inline, media, order, paths, scan};

/// Configuration failures detected before any file I/O.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// Neither a directory nor an explicit file list was given.
    #[error("no directory or file list defined")]
    #[diagnostic(code(csscat::config::missing_input))]
    MissingInput,

    /// The target directory does not exist.
    #[error("target directory could not be found: {path}")]
    #[diagnostic(code(csscat::config::directory_not_found))]
    DirectoryNotFound {
        /// The directory that was requested.
        path: Utf8PathBuf,
    },

    /// Scanning produced no stylesheet files.
    #[error("could not find any css files in {path}")]
    #[diagnostic(code(csscat::config::empty_file_list))]
    EmptyFileList {
        /// The directory that was scanned.
        path: Utf8PathBuf,
    },
}

/// Execute a full concatenation run for the parsed [`Cli`] options.
///
/// # Errors
///
/// Returns an error for invalid configuration, an unreadable listed file,
/// or a circular dependency; unresolvable imports are warnings and do not
/// fail the run.
pub fn run(cli: &Cli) -> Result<()> {
    let store = DiskStore;
    debug!(options = ?cli, "options");
    let list = assemble_file_list(cli)?;
    debug!(files = ?list, "file listing");

    info!("creating the file records");
    let mut set = FileSet::from_files(&list, &store, &cli.ignore)
        .context("building file records")?;

    let order = order::sort(&mut set).context("ordering files by dependency")?;
    dump("file records", &set.records);
    dump("dependency graph", &set.graph);
    dump("processing order", &order);

    info!("handling dependencies with media conditions");
    media::wrap_conditional_imports(&order, &set, &store)
        .context("wrapping conditioned imports")?;

    info!("concatenating and optimizing");
    let minifier = CssMinifier;
    let active: Option<&dyn Minifier> = cli.optimize.then_some(&minifier);
    inline::inline_imports(&order, &set, &store, active).context("inlining imports")?;

    info!("finished");
    Ok(())
}

/// Resolve the configured inputs into canonical absolute paths.
fn assemble_file_list(cli: &Cli) -> Result<Vec<Utf8PathBuf>> {
    if cli.files.is_empty() && cli.directory.is_none() {
        return Err(ConfigError::MissingInput.into());
    }

    let root = resolve_root(cli.directory.as_deref())?;

    if cli.files.is_empty() {
        info!(directory = %root, "scanning for css files");
        let found = scan::css_files(&root, Some(&cli.exclude))
            .with_context(|| format!("scanning {root}"))?;
        if found.is_empty() {
            return Err(ConfigError::EmptyFileList { path: root }.into());
        }
        return Ok(found
            .iter()
            .map(|relative| paths::resolve(&root, relative.as_str()))
            .collect());
    }

    Ok(cli
        .files
        .iter()
        .map(|file| {
            if file.is_absolute() {
                paths::normalize(file)
            } else {
                paths::resolve(&root, file.as_str())
            }
        })
        .collect())
}

/// Canonicalise the root directory, or fall back to the current directory
/// when only an explicit file list was given.
fn resolve_root(directory: Option<&Utf8Path>) -> Result<Utf8PathBuf> {
    let raw = match directory {
        Some(dir) => {
            std::fs::canonicalize(dir).map_err(|_| ConfigError::DirectoryNotFound {
                path: dir.to_path_buf(),
            })?
        }
        None => std::env::current_dir().context("resolving the current directory")?,
    };
    Utf8PathBuf::from_path_buf(raw)
        .map_err(|p| anyhow::anyhow!("root directory is not valid UTF-8: {}", p.display()))
}

/// Pretty-print a pipeline data structure at debug level.
fn dump<T: serde::Serialize>(label: &str, value: &T) {
    if tracing::enabled!(tracing::Level::DEBUG) {
        match serde_json::to_string_pretty(value) {
            Ok(rendered) => debug!("{label}:\n{rendered}"),
            Err(error) => debug!(%error, "failed to render {label}"),
        }
    }
}

//! Command line interface definition using clap.
//!
//! The flags mirror the configuration surface of the concatenation engine:
//! an input selection (`--directory` scan or an explicit `--files` list), an
//! exclusion pattern, an ignore list for include paths, the optimization
//! toggle, and reporting verbosity.

use camino::Utf8PathBuf;
use clap::{ArgAction, Parser};
use regex::Regex;
use tracing::Level;

/// Default exclusion pattern: hidden files and directories.
pub const DEFAULT_EXCLUDE: &str = r"^\.|/\.";

/// Flatten CSS `@import` trees by inlining dependencies in dependency order.
#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Root directory to scan for `.css` sources.
    #[arg(short, long, value_name = "DIR")]
    pub directory: Option<Utf8PathBuf>,

    /// Explicit file list; overrides scanning. Relative entries are
    /// resolved against the directory when both are given.
    #[arg(long, value_name = "FILE", num_args = 1..)]
    pub files: Vec<Utf8PathBuf>,

    /// Drop scanned paths matching this pattern (tested against the path
    /// relative to the directory).
    #[arg(long, value_name = "REGEX", default_value = DEFAULT_EXCLUDE)]
    pub exclude: Regex,

    /// Treat these raw include paths as unresolvable; importing files pass
    /// through unmodified.
    #[arg(long, value_name = "PATH", num_args = 1..)]
    pub ignore: Vec<String>,

    /// Disable minification of the concatenated output.
    #[arg(long = "no-optimize", action = ArgAction::SetFalse)]
    pub optimize: bool,

    /// Enable verbose logging output.
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only report errors.
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Maximum log level implied by the verbosity flags.
    #[must_use]
    pub const fn log_level(&self) -> Level {
        if self.verbose {
            Level::DEBUG
        } else if self.quiet {
            Level::ERROR
        } else {
            Level::INFO
        }
    }
}

//! Deterministic dependency ordering.
//!
//! Post-order depth-first traversal over the dependency graph yields
//! "dependencies before dependents". Each branch carries its ancestor chain
//! so a revisit inside the chain is reported as a circular dependency with
//! the full path for diagnosis. Before a file is emitted, a separate
//! memoized check propagates `skip` from any direct or transitive dependency
//! that is unresolvable or missing; contaminated files are emitted without
//! descending into their edges. The two traversals keep disjoint state: the
//! ancestor chain finds cycles, the contagion memo merely tolerates them.

use std::collections::HashSet;

use camino::{Utf8Path, Utf8PathBuf};
use itertools::Itertools;
use miette::Diagnostic;
use thiserror::Error;

use crate::graph::FileSet;

/// Errors raised while ordering the graph.
#[derive(Debug, Error, Diagnostic)]
pub enum OrderError {
    /// A dependency closes a chain back onto one of its dependents.
    #[error(
        "circular dependency found: \"{dependency}\" is required by \"{dependent}\" ( {} )",
        .chain.iter().join(" -> ")
    )]
    #[diagnostic(code(csscat::order::circular_dependency))]
    CircularDependency {
        /// The dependency that was already present in the ancestor chain.
        dependency: Utf8PathBuf,
        /// The file whose import closed the chain.
        dependent: Utf8PathBuf,
        /// Ancestor-to-descendant chain, closed by the offending dependency.
        chain: Vec<Utf8PathBuf>,
    },
}

/// Order every file so dependencies precede dependents.
///
/// Files marked `skip`, or depending (transitively) on a skipped or missing
/// file, are flagged in `set` and appended to the order without traversal;
/// they participate in the order so later stages can account for them, but
/// are never used as inlining sources.
///
/// # Errors
///
/// Returns [`OrderError::CircularDependency`] on the first chain revisit,
/// before any file content has been touched.
pub fn sort(set: &mut FileSet) -> Result<Vec<Utf8PathBuf>, OrderError> {
    let keys: Vec<Utf8PathBuf> = set.graph.keys().cloned().collect();
    let mut walker = Walker {
        set,
        visited: HashSet::new(),
        order: Vec::new(),
    };
    for key in &keys {
        walker.visit(key, Vec::new())?;
    }
    Ok(walker.order)
}

struct Walker<'a> {
    set: &'a mut FileSet,
    visited: HashSet<Utf8PathBuf>,
    order: Vec<Utf8PathBuf>,
}

impl Walker<'_> {
    fn visit(&mut self, name: &Utf8Path, ancestors: Vec<Utf8PathBuf>) -> Result<(), OrderError> {
        if self.visited.contains(name) {
            return Ok(());
        }
        self.visited.insert(name.to_path_buf());

        let mut chain = ancestors;
        chain.push(name.to_path_buf());

        if self.is_skip(name) || self.depends_on_skip(name, &mut HashSet::new()) {
            if let Some(record) = self.set.records.get_mut(name) {
                record.skip = true;
            }
            self.order.push(name.to_path_buf());
            return Ok(());
        }

        let deps = self.set.graph.get(name).cloned().unwrap_or_default();
        for dep in deps {
            if chain.contains(&dep) {
                return Err(OrderError::CircularDependency {
                    dependency: dep.clone(),
                    dependent: name.to_path_buf(),
                    chain: chain.iter().cloned().chain([dep]).collect(),
                });
            }
            self.visit(&dep, chain.clone())?;
        }

        self.order.push(name.to_path_buf());
        Ok(())
    }

    fn is_skip(&self, name: &Utf8Path) -> bool {
        self.set
            .records
            .get(name)
            .is_some_and(|record| record.skip)
    }

    /// Transitive contagion check. The `seen` memo is scoped to one check
    /// pass so cyclic graphs terminate here; cycle *reporting* belongs to
    /// the ancestor chain in [`Walker::visit`].
    fn depends_on_skip(&self, name: &Utf8Path, seen: &mut HashSet<Utf8PathBuf>) -> bool {
        seen.insert(name.to_path_buf());
        let Some(deps) = self.set.graph.get(name) else {
            return false;
        };
        for dep in deps {
            match self.set.records.get(dep) {
                None => return true,
                Some(record) if record.skip => return true,
                Some(_) => {
                    if !seen.contains(dep) && self.depends_on_skip(dep, seen) {
                        return true;
                    }
                }
            }
        }
        false
    }
}

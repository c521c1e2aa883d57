//! Wrapping of media-conditioned imports in `@media` blocks.
//!
//! Runs over the full processing order before inlining. Replacing the exact
//! original directive text with a guard block around the bare, condition-free
//! rule is what lets the inliner treat conditional and unconditional imports
//! identically: after this stage, the normalized rule is the literal
//! substring that stands for "this import".

use camino::Utf8PathBuf;

use crate::graph::FileSet;
use crate::store::{ContentStore, StoreError};

/// Rewrite every conditioned import in every non-skipped file of `order`.
///
/// Each file is persisted before the next stage reads it. Files with no
/// conditioned imports are left untouched; skipped files emit nothing.
///
/// # Errors
///
/// Propagates [`StoreError`] from reading or writing a file.
pub fn wrap_conditional_imports(
    order: &[Utf8PathBuf],
    set: &FileSet,
    store: &dyn ContentStore,
) -> Result<(), StoreError> {
    for file in order {
        let Some(record) = set.records.get(file) else {
            continue;
        };
        if record.skip {
            tracing::debug!(file = %file, "pass-through");
            continue;
        }
        let conditioned: Vec<_> = record
            .imports
            .iter()
            .flat_map(|imports| imports.values())
            .filter(|import| import.condition.is_some())
            .collect();
        if conditioned.is_empty() {
            tracing::debug!(file = %file, "no conditioned imports");
            continue;
        }

        let mut content = store.read(file)?;
        for import in conditioned {
            let Some(condition) = import.condition.as_deref() else {
                continue;
            };
            let block = format!("@media {condition} {{\n{rule}\n}}", rule = import.rule);
            content = content.replacen(&import.statement, &block, 1);
        }
        store.write(file, &content)?;
        tracing::info!(file = %file, "wrapped conditioned imports");
    }
    Ok(())
}

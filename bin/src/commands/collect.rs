//! Collect command implementation.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use candela_lib::prelude::*;

/// Moves the wide per-field files from the storage tree into a flat directory.
///
/// Only the wide layout produces the fixed file names this command looks for;
/// fields whose file is missing are reported and skipped.
pub(crate) fn collect(from: &Path, to: &Path) -> Result<()> {
    fs::create_dir_all(to)
        .with_context(|| format!("Failed to create directory {}", to.display()))?;

    let mut moved = 0usize;
    for &field in Field::all() {
        let source = Layout::Wide.wide_path(from, field);
        if !source.exists() {
            println!("missing: {}", source.display());
            continue;
        }
        let file_name = source
            .file_name()
            .context("Source path has no file name")?;
        let target = to.join(file_name);
        fs::rename(&source, &target).with_context(|| {
            format!(
                "Failed to move {} to {}",
                source.display(),
                target.display()
            )
        })?;
        println!("moved: {} -> {}", source.display(), target.display());
        moved += 1;
    }

    println!("\n{moved} of {} files collected into {}", Field::all().len(), to.display());
    Ok(())
}

//! Validate command implementation.

use anyhow::{Context, Result};
use std::path::Path;

use candela_lib::prelude::*;

use crate::display::print_validation_summary;

/// Reloads stored field files and reports sanity-check violations.
///
/// When no symbols are given, the set is discovered from what a previous run
/// wrote under `out_dir`.
pub(crate) fn validate(out_dir: &Path, layout: Layout, symbols: Option<&[String]>) -> Result<()> {
    let symbols: Vec<String> = match symbols {
        Some(given) => given.to_vec(),
        None => stored_symbols(out_dir, layout)
            .with_context(|| format!("No stored data found under {}", out_dir.display()))?,
    };

    if symbols.is_empty() {
        println!("Nothing to validate.");
        return Ok(());
    }

    println!("Validating {} symbols under {}", symbols.len(), out_dir.display());
    let summary = check_all(out_dir, layout, &symbols);
    print_validation_summary(&summary);

    Ok(())
}

//! Display utilities and output formatting for the candela CLI.

use clap::ValueEnum;
use indicatif::{ProgressBar, ProgressStyle};

use candela_lib::prelude::*;

/// On-disk layout as a CLI argument.
#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum LayoutArg {
    Wide,
    Narrow,
}

impl From<LayoutArg> for Layout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Wide => Self::Wide,
            LayoutArg::Narrow => Self::Narrow,
        }
    }
}

/// Builds the per-symbol progress bar, hidden in quiet mode.
pub(crate) fn symbol_progress(total: u64, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} symbols ({percent}%) {msg}")
            .expect("Invalid progress template")
            .progress_chars("=>-"),
    );
    pb
}

/// Prints the end-of-run summary for a batch fetch.
pub(crate) fn print_fetch_summary(report: &BatchReport, write_report: &WriteReport) {
    println!("\nSUMMARY");
    println!("Processed symbols: {}", report.processed());
    println!("Errored symbols:   {}", report.errored());
    println!("Total candles:     {}", report.total_candles());
    if report.dropped_rows > 0 {
        println!("Dropped rows:      {}", report.dropped_rows);
    }
    if report.coerced_cells > 0 {
        println!("Coerced cells:     {}", report.coerced_cells);
    }
    println!(
        "Files written:     {} ({} rows)",
        write_report.files_written(),
        write_report.total_rows()
    );

    if !report.errors.is_empty() {
        println!("\nErrors:");
        for (symbol, reason) in &report.errors {
            println!("  {symbol}: {reason}");
        }
    }
}

/// Prints the validation summary with per-violation detail.
pub(crate) fn print_validation_summary(summary: &ValidationSummary) {
    println!("\nVALIDATION SUMMARY");
    println!("Checked pairs: {}", summary.checked);
    println!("Passed:        {}", summary.passed);
    println!("Violations:    {}", summary.records.len());

    if !summary.records.is_empty() {
        println!("\nDetails:");
        for record in &summary.records {
            println!("  {record}");
        }
    }
}

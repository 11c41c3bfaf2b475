//! Fetch command implementation.
//!
//! Runs the full pipeline: metadata → symbol selection → sequential candle
//! fetch → per-field Parquet write → optional reload-and-validate pass.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::PathBuf;
use std::time::Duration;

use candela_lib::prelude::*;

use crate::display::{print_fetch_summary, print_validation_summary, symbol_progress};

/// Arguments for one fetch run.
pub(crate) struct FetchArgs {
    pub(crate) quote_priority: Vec<String>,
    pub(crate) limit: usize,
    pub(crate) interval: String,
    pub(crate) start: String,
    pub(crate) end: Option<String>,
    pub(crate) rows: usize,
    pub(crate) delay_ms: u64,
    pub(crate) layout: Layout,
    pub(crate) out_dir: PathBuf,
    pub(crate) base_url: String,
    pub(crate) mock: bool,
    pub(crate) validate: bool,
    pub(crate) quiet: bool,
}

/// Downloads OHLCV data for the selected symbol universe.
pub(crate) async fn fetch(args: FetchArgs) -> Result<()> {
    if args.mock {
        run(ExchangeClient::new(FixtureTransport::sample()), args).await
    } else {
        let config = TransportConfig {
            base_url: args.base_url.clone(),
            ..Default::default()
        };
        let transport = HttpTransport::new(config).context("Failed to create HTTP client")?;
        run(ExchangeClient::new(transport), args).await
    }
}

async fn run<T: Transport>(client: ExchangeClient<T>, args: FetchArgs) -> Result<()> {
    let interval = args
        .interval
        .parse::<Interval>()
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    let start = NaiveDate::parse_from_str(&args.start, "%Y-%m-%d")
        .with_context(|| format!("Invalid start date: {}", args.start))?;
    let end = args
        .end
        .as_deref()
        .map(|s| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .with_context(|| format!("Invalid end date: {s}"))
        })
        .transpose()?;

    // Metadata failure is fatal: without it there is no universe to fetch
    let info = client
        .exchange_info()
        .await
        .context("Failed to fetch exchange metadata")?;
    let universe = select(&info, &args.quote_priority, args.limit)?;

    if universe.is_empty() {
        println!("No symbols matched the selection criteria.");
        return Ok(());
    }
    if !args.quiet {
        println!("Selected {} symbols: {}", universe.len(), universe.join(", "));
    }

    let plan = FetchPlan {
        interval,
        rows: args.rows,
        start: Some(start),
        end,
        delay: Duration::from_millis(args.delay_ms),
    };

    let progress = symbol_progress(universe.len() as u64, args.quiet);
    let report = collect(&client, &universe, &plan, |symbol| {
        progress.set_message(symbol.to_string());
        progress.inc(1);
    })
    .await;
    progress.finish_with_message(format!(
        "{} symbols fetched, {} errored",
        report.processed(),
        report.errored()
    ));

    if report.series.is_empty() {
        println!("\nNo symbol produced data; existing files left untouched.");
        if !report.errors.is_empty() {
            println!("Errors:");
            for (symbol, reason) in &report.errors {
                println!("  {symbol}: {reason}");
            }
        }
        return Ok(());
    }

    let write_report = write(&report.series, &args.out_dir, args.layout)?;
    print_fetch_summary(&report, &write_report);

    if args.validate {
        let fetched: Vec<String> = report.series.keys().cloned().collect();
        let summary = check_all(&args.out_dir, args.layout, &fetched);
        print_validation_summary(&summary);
    }

    Ok(())
}

//! Symbols command implementation.

use anyhow::{Context, Result};

use candela_lib::prelude::*;

/// Prints the symbol universe the selector would pick for a run.
pub(crate) async fn symbols(
    quote_priority: &[String],
    limit: usize,
    base_url: &str,
    mock: bool,
) -> Result<()> {
    let info = if mock {
        ExchangeClient::new(FixtureTransport::sample())
            .exchange_info()
            .await
    } else {
        let config = TransportConfig {
            base_url: base_url.to_string(),
            ..Default::default()
        };
        let transport = HttpTransport::new(config).context("Failed to create HTTP client")?;
        ExchangeClient::new(transport).exchange_info().await
    }
    .context("Failed to fetch exchange metadata")?;

    let universe = select(&info, quote_priority, limit)?;

    println!(
        "Universe ({} of up to {}, quotes: {}):",
        universe.len(),
        limit,
        quote_priority.join(" > ")
    );
    for (i, symbol) in universe.iter().enumerate() {
        println!("{:>4}  {symbol}", i + 1);
    }

    Ok(())
}

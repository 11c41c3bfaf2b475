//! candela CLI - Binance spot OHLCV downloader.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod display;

use display::LayoutArg;

#[derive(Parser)]
#[command(name = "candela")]
#[command(about = "Download Binance spot OHLCV data into per-field Parquet files", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Quiet mode (suppress progress output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline: select symbols, fetch candles, write Parquet
    Fetch {
        /// Quote assets in priority order, comma separated
        #[arg(long, default_value = "USDT,USDC,FDUSD,BTC,ETH", value_delimiter = ',')]
        quote_priority: Vec<String>,

        /// Maximum number of symbols in the universe
        #[arg(short, long, default_value = "25")]
        limit: usize,

        /// Kline interval (1m, 5m, 15m, 30m, 1h, 4h, 1d, 1w)
        #[arg(short, long, default_value = "1d")]
        interval: String,

        /// Start date (YYYY-MM-DD)
        #[arg(short, long, default_value = "2020-01-01")]
        start: String,

        /// End date (YYYY-MM-DD). Defaults to open-ended.
        #[arg(short, long)]
        end: Option<String>,

        /// Kline rows per request; requests repeat until the window is covered
        #[arg(long, default_value = "1000")]
        rows: usize,

        /// Minimum delay between kline requests, in milliseconds
        #[arg(long, default_value = "200")]
        delay_ms: u64,

        /// On-disk layout
        #[arg(long, value_enum, default_value = "wide")]
        layout: LayoutArg,

        /// Storage root directory
        #[arg(short, long, default_value = "storage/ohlcv")]
        out_dir: PathBuf,

        /// Exchange REST base URL
        #[arg(long, default_value = "https://api.binance.com")]
        base_url: String,

        /// Use the built-in deterministic fixture instead of the live API
        #[arg(long)]
        mock: bool,

        /// Reload and sanity-check the written files after the run
        #[arg(long)]
        validate: bool,
    },

    /// Show the symbol universe the selector would pick
    Symbols {
        /// Quote assets in priority order, comma separated
        #[arg(long, default_value = "USDT,USDC,FDUSD,BTC,ETH", value_delimiter = ',')]
        quote_priority: Vec<String>,

        /// Maximum number of symbols in the universe
        #[arg(short, long, default_value = "25")]
        limit: usize,

        /// Exchange REST base URL
        #[arg(long, default_value = "https://api.binance.com")]
        base_url: String,

        /// Use the built-in deterministic fixture instead of the live API
        #[arg(long)]
        mock: bool,
    },

    /// Reload previously written files and report sanity-check violations
    Validate {
        /// Storage root directory
        #[arg(short, long, default_value = "storage/ohlcv")]
        out_dir: PathBuf,

        /// On-disk layout the files were written with
        #[arg(long, value_enum, default_value = "wide")]
        layout: LayoutArg,

        /// Symbols to check, comma separated. Defaults to every stored symbol.
        #[arg(long, value_delimiter = ',')]
        symbols: Option<Vec<String>>,
    },

    /// Move the five wide-layout field files into a destination directory
    Collect {
        /// Storage root the files were written under
        #[arg(short, long, default_value = "storage/ohlcv")]
        from: PathBuf,

        /// Destination directory
        #[arg(short, long, default_value = "data_collection")]
        to: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Fetch {
            quote_priority,
            limit,
            interval,
            start,
            end,
            rows,
            delay_ms,
            layout,
            out_dir,
            base_url,
            mock,
            validate,
        } => {
            commands::fetch::fetch(commands::fetch::FetchArgs {
                quote_priority,
                limit,
                interval,
                start,
                end,
                rows,
                delay_ms,
                layout: layout.into(),
                out_dir,
                base_url,
                mock,
                validate,
                quiet: cli.quiet,
            })
            .await
        }
        Commands::Symbols {
            quote_priority,
            limit,
            base_url,
            mock,
        } => commands::symbols::symbols(&quote_priority, limit, &base_url, mock).await,
        Commands::Validate {
            out_dir,
            layout,
            symbols,
        } => commands::validate::validate(&out_dir, layout.into(), symbols.as_deref()),
        Commands::Collect { from, to } => commands::collect::collect(&from, &to),
    }
}

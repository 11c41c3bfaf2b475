//! Symbol universe selection for the candela OHLCV downloader.
//!
//! Given an exchange metadata snapshot, [`select`] produces a bounded,
//! de-duplicated, ranked list of spot symbols:
//!
//! 1. Keep descriptors that are `TRADING` with spot trading allowed.
//! 2. Rank by quote-asset priority, then base asset alphabetically.
//! 3. Skip leveraged-token tickers, quotes outside the priority list, and
//!    base assets already picked, until `limit` symbols are chosen.
//!
//! # Example
//!
//! ```
//! use candela_select::select;
//! use candela_types::{ExchangeInfo, SymbolDescriptor, SymbolStatus};
//!
//! let info = ExchangeInfo {
//!     symbols: vec![SymbolDescriptor::new(
//!         "BTCUSDT", SymbolStatus::Trading, "BTC", "USDT", true,
//!     )],
//! };
//! let universe = select(&info, &["USDT".to_string()], 10).unwrap();
//! assert_eq!(universe, vec!["BTCUSDT".to_string()]);
//! ```

#![doc(issue_tracker_base_url = "https://github.com/candela-data/candela/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

use std::collections::HashSet;

use candela_types::{CandelaError, ExchangeInfo, Result, SymbolDescriptor};

/// Substrings that mark leveraged or synthetic instruments to exclude.
const LEVERAGED_MARKERS: &[&str] = &["UP", "DOWN", "BEAR", "BULL"];

/// Rank for quote assets absent from the priority list; sorts after every
/// valid priority index.
const UNRANKED: usize = usize::MAX;

/// Selects a bounded, de-duplicated spot symbol universe.
///
/// The returned list is at most `limit` long, contains each base asset at
/// most once, and only quotes from `quote_priority`. Identical inputs always
/// produce identical output: the ranking sort is stable, so ties beyond the
/// (quote rank, base asset) key preserve metadata order.
///
/// An empty snapshot or an empty filtered set yields an empty universe.
///
/// # Errors
///
/// Returns [`CandelaError::ZeroLimit`] if `limit == 0`.
pub fn select(
    info: &ExchangeInfo,
    quote_priority: &[String],
    limit: usize,
) -> Result<Vec<String>> {
    if limit == 0 {
        return Err(CandelaError::ZeroLimit);
    }

    let mut ranked: Vec<&SymbolDescriptor> = info
        .symbols
        .iter()
        .filter(|s| s.is_tradable_spot())
        .collect();
    ranked.sort_by(|a, b| {
        let key_a = (quote_rank(&a.quote_asset, quote_priority), &a.base_asset);
        let key_b = (quote_rank(&b.quote_asset, quote_priority), &b.base_asset);
        key_a.cmp(&key_b)
    });

    let mut picked = Vec::with_capacity(limit.min(ranked.len()));
    let mut seen_bases: HashSet<&str> = HashSet::new();

    for desc in ranked {
        if is_leveraged(&desc.symbol) {
            continue;
        }
        if quote_rank(&desc.quote_asset, quote_priority) == UNRANKED {
            continue;
        }
        // One quote per base to diversify the universe
        if !seen_bases.insert(desc.base_asset.as_str()) {
            continue;
        }
        picked.push(desc.symbol.clone());
        if picked.len() >= limit {
            break;
        }
    }

    Ok(picked)
}

/// Returns the priority index of a quote asset, or [`UNRANKED`] if absent.
fn quote_rank(quote: &str, quote_priority: &[String]) -> usize {
    quote_priority
        .iter()
        .position(|q| q == quote)
        .unwrap_or(UNRANKED)
}

/// Returns true if the ticker contains a leveraged/derivative marker.
fn is_leveraged(symbol: &str) -> bool {
    LEVERAGED_MARKERS.iter().any(|m| symbol.contains(m))
}

#[cfg(test)]
mod tests {
    use super::*;
    use candela_types::SymbolStatus;

    fn desc(symbol: &str, base: &str, quote: &str) -> SymbolDescriptor {
        SymbolDescriptor::new(symbol, SymbolStatus::Trading, base, quote, true)
    }

    fn priorities(codes: &[&str]) -> Vec<String> {
        codes.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_excludes_leveraged_tokens() {
        let info = ExchangeInfo {
            symbols: vec![
                desc("BTCUSDT", "BTC", "USDT"),
                desc("BTCUPUSDT", "BTCUP", "USDT"),
                desc("ETHUSDT", "ETH", "USDT"),
            ],
        };
        let universe = select(&info, &priorities(&["USDT"]), 10).unwrap();
        assert_eq!(universe, vec!["BTCUSDT", "ETHUSDT"]);
    }

    #[test]
    fn test_dedupes_by_base_asset() {
        let info = ExchangeInfo {
            symbols: vec![
                desc("BTCUSDT", "BTC", "USDT"),
                desc("BTCUSDC", "BTC", "USDC"),
                desc("ETHUSDC", "ETH", "USDC"),
            ],
        };
        let universe = select(&info, &priorities(&["USDT", "USDC"]), 10).unwrap();
        // BTC appears once, via the higher-priority quote
        assert_eq!(universe, vec!["BTCUSDT", "ETHUSDC"]);
    }

    #[test]
    fn test_quote_priority_ordering() {
        let info = ExchangeInfo {
            symbols: vec![
                desc("AAABTC", "AAA", "BTC"),
                desc("ZZZUSDT", "ZZZ", "USDT"),
            ],
        };
        let universe = select(&info, &priorities(&["USDT", "BTC"]), 10).unwrap();
        // USDT-quoted pairs rank before BTC-quoted ones despite base order
        assert_eq!(universe, vec!["ZZZUSDT", "AAABTC"]);
    }

    #[test]
    fn test_skips_quotes_outside_priority_list() {
        let info = ExchangeInfo {
            symbols: vec![desc("BTCEUR", "BTC", "EUR"), desc("ETHUSDT", "ETH", "USDT")],
        };
        let universe = select(&info, &priorities(&["USDT"]), 10).unwrap();
        assert_eq!(universe, vec!["ETHUSDT"]);
    }

    #[test]
    fn test_respects_limit() {
        let info = ExchangeInfo {
            symbols: vec![
                desc("AAAUSDT", "AAA", "USDT"),
                desc("BBBUSDT", "BBB", "USDT"),
                desc("CCCUSDT", "CCC", "USDT"),
            ],
        };
        let universe = select(&info, &priorities(&["USDT"]), 2).unwrap();
        assert_eq!(universe.len(), 2);
        assert_eq!(universe, vec!["AAAUSDT", "BBBUSDT"]);
    }

    #[test]
    fn test_filters_non_trading_and_non_spot() {
        let info = ExchangeInfo {
            symbols: vec![
                SymbolDescriptor::new(
                    "AAAUSDT",
                    SymbolStatus::Other("BREAK".to_string()),
                    "AAA",
                    "USDT",
                    true,
                ),
                SymbolDescriptor::new("BBBUSDT", SymbolStatus::Trading, "BBB", "USDT", false),
                desc("CCCUSDT", "CCC", "USDT"),
            ],
        };
        let universe = select(&info, &priorities(&["USDT"]), 10).unwrap();
        assert_eq!(universe, vec!["CCCUSDT"]);
    }

    #[test]
    fn test_empty_metadata_yields_empty_universe() {
        let info = ExchangeInfo::default();
        let universe = select(&info, &priorities(&["USDT"]), 10).unwrap();
        assert!(universe.is_empty());
    }

    #[test]
    fn test_zero_limit_is_rejected() {
        let info = ExchangeInfo::default();
        assert!(matches!(
            select(&info, &priorities(&["USDT"]), 0),
            Err(CandelaError::ZeroLimit)
        ));
    }

    #[test]
    fn test_deterministic() {
        let info = ExchangeInfo {
            symbols: vec![
                desc("ETHUSDT", "ETH", "USDT"),
                desc("BTCUSDT", "BTC", "USDT"),
                desc("ADAUSDT", "ADA", "USDT"),
            ],
        };
        let q = priorities(&["USDT"]);
        let first = select(&info, &q, 3).unwrap();
        let second = select(&info, &q, 3).unwrap();
        assert_eq!(first, second);
        // Base-asset alphabetical within the same quote rank
        assert_eq!(first, vec!["ADAUSDT", "BTCUSDT", "ETHUSDT"]);
    }
}

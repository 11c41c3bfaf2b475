//! Kline aggregation interval definitions.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Kline interval as understood by the exchange's candle endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    /// 1-minute candles.
    #[serde(rename = "1m")]
    Minute1,
    /// 5-minute candles.
    #[serde(rename = "5m")]
    Minute5,
    /// 15-minute candles.
    #[serde(rename = "15m")]
    Minute15,
    /// 30-minute candles.
    #[serde(rename = "30m")]
    Minute30,
    /// 1-hour candles.
    #[serde(rename = "1h")]
    Hour1,
    /// 4-hour candles.
    #[serde(rename = "4h")]
    Hour4,
    /// Daily candles.
    #[default]
    #[serde(rename = "1d")]
    Day1,
    /// Weekly candles.
    #[serde(rename = "1w")]
    Week1,
}

impl Interval {
    /// Returns the interval duration in seconds.
    #[must_use]
    pub const fn seconds(&self) -> u64 {
        match self {
            Self::Minute1 => 60,
            Self::Minute5 => 300,
            Self::Minute15 => 900,
            Self::Minute30 => 1800,
            Self::Hour1 => 3600,
            Self::Hour4 => 14400,
            Self::Day1 => 86400,
            Self::Week1 => 604_800,
        }
    }

    /// Returns the interval duration in milliseconds.
    #[must_use]
    pub const fn milliseconds(&self) -> u64 {
        self.seconds() * 1000
    }

    /// Returns the interval as the exchange's query-string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Minute1 => "1m",
            Self::Minute5 => "5m",
            Self::Minute15 => "15m",
            Self::Minute30 => "30m",
            Self::Hour1 => "1h",
            Self::Hour4 => "4h",
            Self::Day1 => "1d",
            Self::Week1 => "1w",
        }
    }

    /// Returns all available intervals.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Minute1,
            Self::Minute5,
            Self::Minute15,
            Self::Minute30,
            Self::Hour1,
            Self::Hour4,
            Self::Day1,
            Self::Week1,
        ]
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Interval {
    type Err = IntervalParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1m" | "m1" | "minute" => Ok(Self::Minute1),
            "5m" | "m5" => Ok(Self::Minute5),
            "15m" | "m15" => Ok(Self::Minute15),
            "30m" | "m30" => Ok(Self::Minute30),
            "1h" | "h1" | "hour" => Ok(Self::Hour1),
            "4h" | "h4" => Ok(Self::Hour4),
            "1d" | "d1" | "day" | "daily" => Ok(Self::Day1),
            "1w" | "w1" | "week" | "weekly" => Ok(Self::Week1),
            _ => Err(IntervalParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid interval string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalParseError(String);

impl std::fmt::Display for IntervalParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid interval '{}', expected one of: 1m, 5m, 15m, 30m, 1h, 4h, 1d, 1w",
            self.0
        )
    }
}

impl std::error::Error for IntervalParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_seconds() {
        assert_eq!(Interval::Minute1.seconds(), 60);
        assert_eq!(Interval::Hour1.seconds(), 3600);
        assert_eq!(Interval::Day1.seconds(), 86400);
    }

    #[test]
    fn test_interval_parse() {
        assert_eq!("1d".parse::<Interval>().unwrap(), Interval::Day1);
        assert_eq!("daily".parse::<Interval>().unwrap(), Interval::Day1);
        assert_eq!("H4".parse::<Interval>().unwrap(), Interval::Hour4);
        assert!("7d".parse::<Interval>().is_err());
    }

    #[test]
    fn test_default_is_daily() {
        assert_eq!(Interval::default(), Interval::Day1);
    }
}

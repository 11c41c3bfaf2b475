//! The five OHLCV fields.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One of the five OHLCV fields persisted per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    /// Opening price.
    Open,
    /// Highest price.
    High,
    /// Lowest price.
    Low,
    /// Closing price.
    Close,
    /// Traded volume.
    Volume,
}

impl Field {
    /// Returns the field as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::High => "high",
            Self::Low => "low",
            Self::Close => "close",
            Self::Volume => "volume",
        }
    }

    /// Returns all five fields in canonical order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Open, Self::High, Self::Low, Self::Close, Self::Volume]
    }

    /// Returns true for the four price fields (everything except volume).
    #[must_use]
    pub const fn is_price(&self) -> bool {
        !matches!(self, Self::Volume)
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Field {
    type Err = FieldParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "high" => Ok(Self::High),
            "low" => Ok(Self::Low),
            "close" => Ok(Self::Close),
            "volume" => Ok(Self::Volume),
            _ => Err(FieldParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldParseError(String);

impl std::fmt::Display for FieldParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid field '{}', expected one of: open, high, low, close, volume",
            self.0
        )
    }
}

impl std::error::Error for FieldParseError {}

//! On-disk layout conventions.
//!
//! Two conventions exist; exactly one is picked per run:
//!
//! - **Wide**: `<root>/<field>/binance_<field>_daily.parquet` — columns are
//!   symbols, rows are the timestamp index.
//! - **Narrow**: `<root>/<field>/<symbol>.parquet` — two columns,
//!   `timestamp` and the field value.
//!
//! A later run overwrites files at the same paths; there is no migration
//! between the two conventions.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use candela_types::Field;

/// Storage layout for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Layout {
    /// One wide file per field containing all symbols as columns.
    #[default]
    Wide,
    /// One narrow file per (field, symbol) pair.
    Narrow,
}

impl Layout {
    /// Returns the layout as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Wide => "wide",
            Self::Narrow => "narrow",
        }
    }

    /// Returns the directory holding one field's files.
    #[must_use]
    pub fn field_dir(&self, root: &Path, field: Field) -> PathBuf {
        root.join(field.as_str())
    }

    /// Returns the file path for a (field, symbol) pair under this layout.
    ///
    /// For the wide layout the symbol does not participate in the path; all
    /// symbols share the single per-field file.
    #[must_use]
    pub fn data_path(&self, root: &Path, field: Field, symbol: &str) -> PathBuf {
        match self {
            Self::Wide => self.wide_path(root, field),
            Self::Narrow => self.field_dir(root, field).join(format!("{symbol}.parquet")),
        }
    }

    /// Returns the single per-field file path used by the wide layout.
    #[must_use]
    pub fn wide_path(&self, root: &Path, field: Field) -> PathBuf {
        self.field_dir(root, field)
            .join(format!("binance_{field}_daily.parquet"))
    }
}

impl std::fmt::Display for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Layout {
    type Err = LayoutParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "wide" => Ok(Self::Wide),
            "narrow" => Ok(Self::Narrow),
            _ => Err(LayoutParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid layout name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutParseError(String);

impl std::fmt::Display for LayoutParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid layout '{}', expected 'wide' or 'narrow'", self.0)
    }
}

impl std::error::Error for LayoutParseError {}

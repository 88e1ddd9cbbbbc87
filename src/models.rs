//! Core data structures for sensor CSV reading.
//!
//! Defines the separator and decimal conventions, the per-file parse
//! report, and the diagnostics collected while reading.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Field separators found in coreViewer exports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Separator {
    #[default]
    Comma,
    Semicolon,
}

impl Separator {
    /// The separator as a single character
    pub fn as_char(&self) -> char {
        match self {
            Separator::Comma => ',',
            Separator::Semicolon => ';',
        }
    }

    /// The separator as a single ASCII byte
    pub fn as_byte(&self) -> u8 {
        match self {
            Separator::Comma => b',',
            Separator::Semicolon => b';',
        }
    }

    /// Decimal convention implied by this separator.
    ///
    /// Semicolon-separated exports come from locales that write decimals
    /// with a comma; everything else uses a period.
    pub fn decimal_convention(&self) -> DecimalConvention {
        match self {
            Separator::Semicolon => DecimalConvention::Comma,
            Separator::Comma => DecimalConvention::Period,
        }
    }
}

impl fmt::Display for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Separator::Comma => write!(f, "comma"),
            Separator::Semicolon => write!(f, "semicolon"),
        }
    }
}

impl FromStr for Separator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "comma" | "," => Ok(Separator::Comma),
            "semicolon" | ";" => Ok(Separator::Semicolon),
            other => Err(format!(
                "unknown separator '{}' (expected comma or semicolon)",
                other
            )),
        }
    }
}

/// Character used as the fractional separator in numeric fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecimalConvention {
    Period,
    Comma,
}

impl DecimalConvention {
    pub fn as_char(&self) -> char {
        match self {
            DecimalConvention::Period => '.',
            DecimalConvention::Comma => ',',
        }
    }
}

/// A data row excluded because its field count differs from the header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// Zero-based line number in the source file
    pub line: usize,
    pub expected_fields: usize,
    pub found_fields: usize,
}

/// Diagnostics collected while reading a single file
#[derive(Debug, Clone, Default)]
pub struct ParseReport {
    pub path: PathBuf,
    pub separator: Separator,
    pub repaired: bool,
    pub skip_rows: usize,
    pub rows_parsed: usize,
    pub skipped_rows: Vec<SkippedRow>,
    pub dropped_trailing_column: Option<String>,
    pub text_columns: Vec<String>,
    pub replaced_invalid_bytes: bool,
}

impl ParseReport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separator_decimal_pairing() {
        assert_eq!(
            Separator::Semicolon.decimal_convention(),
            DecimalConvention::Comma
        );
        assert_eq!(
            Separator::Comma.decimal_convention(),
            DecimalConvention::Period
        );
    }

    #[test]
    fn test_separator_from_str() {
        assert_eq!("comma".parse::<Separator>().unwrap(), Separator::Comma);
        assert_eq!(
            "Semicolon".parse::<Separator>().unwrap(),
            Separator::Semicolon
        );
        assert_eq!(";".parse::<Separator>().unwrap(), Separator::Semicolon);
        assert!("tab".parse::<Separator>().is_err());
    }
}

//! Configuration for reading and exporting sensor CSV files.
//!
//! Every knob that influences a read is carried explicitly in
//! [`ReadOptions`] and passed into the read operation; there is no
//! process-wide default state.

use crate::constants::{DEFAULT_ENCODING, SENSORDATA_MARKER};
use crate::error::{ReaderError, Result};
use crate::models::Separator;
use encoding_rs::Encoding;
use polars::prelude::ParquetCompression;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

/// Options for reading one or many sensor CSV files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadOptions {
    /// Explicit field separator; `None` detects it from the header line
    pub separator: Option<Separator>,

    /// WHATWG encoding label of the input files
    pub encoding: String,

    /// Treat the first line after the preamble as column names
    pub has_header: bool,

    /// Column names used when the file carries no header
    pub names: Option<Vec<String>>,

    /// Substrings identifying the marker line that precedes the header
    pub markers: Vec<String>,

    /// Tag every aggregated row with the path of its source file
    pub add_source: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            separator: None,
            encoding: DEFAULT_ENCODING.to_string(),
            has_header: true,
            names: None,
            markers: vec![SENSORDATA_MARKER.to_string()],
            add_source: true,
        }
    }
}

impl ReadOptions {
    /// Bypass separator detection
    pub fn with_separator(mut self, separator: Separator) -> Self {
        self.separator = Some(separator);
        self
    }

    /// Read files in the given encoding
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }

    /// Treat the first line after the preamble as data
    pub fn without_header(mut self) -> Self {
        self.has_header = false;
        self
    }

    /// Names applied to header-less files when the column count matches
    pub fn with_names(mut self, names: Vec<String>) -> Self {
        self.names = Some(names);
        self
    }

    /// Replace the marker needles
    pub fn with_markers(mut self, markers: Vec<String>) -> Self {
        self.markers = markers;
        self
    }

    /// Enable or disable source tagging during aggregation
    pub fn with_add_source(mut self, add_source: bool) -> Self {
        self.add_source = add_source;
        self
    }

    /// Resolve the configured encoding label.
    ///
    /// Only ASCII-compatible encodings are accepted: separators and line
    /// terminators must stay single bytes for the in-place repair.
    pub fn resolve_encoding(&self) -> Result<&'static Encoding> {
        let encoding = Encoding::for_label(self.encoding.trim().as_bytes()).ok_or_else(|| {
            ReaderError::UnsupportedEncoding {
                label: self.encoding.clone(),
            }
        })?;

        if !encoding.is_ascii_compatible() {
            return Err(ReaderError::UnsupportedEncoding {
                label: self.encoding.clone(),
            });
        }

        debug!("Resolved encoding '{}' to {}", self.encoding, encoding.name());
        Ok(encoding)
    }
}

/// Supported compression algorithms for parquet export
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompressionAlgorithm {
    /// Snappy compression - good balance of speed and compression
    #[default]
    Snappy,
    /// ZSTD compression - better compression ratio, slower
    Zstd,
    /// LZ4 compression - fastest, lower compression ratio
    Lz4,
    /// No compression
    Uncompressed,
}

impl CompressionAlgorithm {
    /// Convert to polars ParquetCompression type
    pub fn to_polars_compression(&self) -> ParquetCompression {
        match self {
            CompressionAlgorithm::Snappy => ParquetCompression::Snappy,
            CompressionAlgorithm::Zstd => ParquetCompression::Zstd(None),
            CompressionAlgorithm::Lz4 => ParquetCompression::Lz4Raw,
            CompressionAlgorithm::Uncompressed => ParquetCompression::Uncompressed,
        }
    }
}

impl FromStr for CompressionAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "snappy" => Ok(CompressionAlgorithm::Snappy),
            "zstd" => Ok(CompressionAlgorithm::Zstd),
            "lz4" => Ok(CompressionAlgorithm::Lz4),
            "none" | "uncompressed" => Ok(CompressionAlgorithm::Uncompressed),
            other => Err(format!(
                "unknown compression '{}' (expected snappy, zstd, lz4 or none)",
                other
            )),
        }
    }
}

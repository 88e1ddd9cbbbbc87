//! coreSensing CSV Reader Library
//!
//! Reads sensor-logger CSV exports written by coreViewer into typed
//! polars frames. The exports start with a free-text preamble, mark the
//! header with a `Sensordata` line, sometimes omit the trailing separator
//! on the header, and use either comma/period or semicolon/comma
//! conventions depending on locale.
//!
//! This library provides tools for:
//! - Locating the marker line and skipping the preamble
//! - Repairing the header line in place, idempotently and atomically
//! - Detecting the separator and decimal convention
//! - Parsing rows tolerantly, dropping an empty trailing column and
//!   coercing columns to numbers where every value allows it
//! - Aggregating many files with source provenance
//! - Exporting the result to Parquet

pub mod aggregate;
pub mod cli;
pub mod coercion;
pub mod config;
pub mod constants;
pub mod error;
pub mod lines;
pub mod marker;
pub mod models;
pub mod parser;
pub mod reader;
pub mod repair;
pub mod separator;
pub mod writer;

// Re-export commonly used types
pub use aggregate::read_many;
pub use config::{CompressionAlgorithm, ReadOptions};
pub use error::{ReaderError, Result};
pub use models::{DecimalConvention, ParseReport, Separator, SkippedRow};
pub use reader::{read_sensor_csv, read_sensor_csv_with_report};
pub use writer::write_parquet;

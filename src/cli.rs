//! Command-line interface components.

use crate::config::{CompressionAlgorithm, ReadOptions};
use crate::constants::{DEFAULT_ENCODING, DEFAULT_INPUT_DIR, DEFAULT_PREVIEW_ROWS};
use crate::models::Separator;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "coresensing-csv")]
#[command(about = "Read coreSensing/coreViewer CSV exports into a typed table")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// CSV file or directory containing CSV files
    #[arg(value_name = "INPUT", default_value = DEFAULT_INPUT_DIR)]
    pub input: PathBuf,

    /// Read every CSV file in the directory instead of only the first
    #[arg(long)]
    pub all: bool,

    /// The first line after the marker is data, not column names
    #[arg(long)]
    pub no_header: bool,

    /// File encoding (WHATWG label, e.g. utf-8, latin1)
    #[arg(long, default_value = DEFAULT_ENCODING)]
    pub encoding: String,

    /// Field separator (comma, semicolon); detected from the header if omitted
    #[arg(long)]
    pub separator: Option<Separator>,

    /// Do not add the __source__ column when aggregating
    #[arg(long)]
    pub no_source: bool,

    /// Number of rows to preview
    #[arg(long, default_value_t = DEFAULT_PREVIEW_ROWS)]
    pub rows: usize,

    /// Write the table to this Parquet file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Parquet compression algorithm (snappy, zstd, lz4, none)
    #[arg(long, default_value = "snappy")]
    pub compression: CompressionAlgorithm,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Read options assembled from the command-line flags
    pub fn read_options(&self) -> ReadOptions {
        let mut options = ReadOptions::default()
            .with_encoding(self.encoding.clone())
            .with_add_source(!self.no_source);

        if let Some(separator) = self.separator {
            options = options.with_separator(separator);
        }
        if self.no_header {
            options = options.without_header();
        }
        options
    }

    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

/// Input resolution for files and directories
pub mod input_discovery {
    use crate::constants::CSV_FILE_PATTERN;
    use anyhow::{Context, Result};
    use std::path::{Path, PathBuf};

    /// All `*.csv` files directly inside `dir`, sorted by path
    pub fn csv_files_in(dir: &Path) -> Result<Vec<PathBuf>> {
        let pattern = dir.join(CSV_FILE_PATTERN);
        let pattern = pattern.to_string_lossy();

        let mut files = glob::glob(&pattern)
            .with_context(|| format!("Invalid glob pattern {}", pattern))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .with_context(|| format!("Failed to list {}", dir.display()))?;
        files.retain(|path| path.is_file());
        files.sort();
        Ok(files)
    }

    /// Resolve the files to read for a file or directory input
    pub fn resolve_inputs(input: &Path, all: bool) -> Result<Vec<PathBuf>> {
        if input.is_dir() {
            let files = csv_files_in(input)?;
            if files.is_empty() {
                anyhow::bail!("No CSV file found in {}", input.display());
            }
            if all {
                Ok(files)
            } else {
                Ok(files.into_iter().take(1).collect())
            }
        } else if input.exists() {
            Ok(vec![input.to_path_buf()])
        } else {
            anyhow::bail!("File {} not found", input.display());
        }
    }

}

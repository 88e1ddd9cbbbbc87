//! Parquet export of parsed sensor tables.

use crate::config::CompressionAlgorithm;
use crate::error::{ReaderError, Result};
use polars::prelude::{DataFrame, ParquetWriter};
use std::fs::{self, File};
use std::path::Path;
use tracing::{debug, info};

/// Write `df` to a Parquet file, creating parent directories as needed
pub fn write_parquet(
    df: &mut DataFrame,
    output_path: &Path,
    compression: CompressionAlgorithm,
) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| ReaderError::io(parent, e))?;
        }
    }

    debug!(
        "Writing {} rows to {} ({:?} compression)",
        df.height(),
        output_path.display(),
        compression
    );

    let file = File::create(output_path).map_err(|e| ReaderError::io(output_path, e))?;
    ParquetWriter::new(file)
        .with_compression(compression.to_polars_compression())
        .finish(df)?;

    let size = fs::metadata(output_path)
        .map_err(|e| ReaderError::io(output_path, e))?
        .len();
    info!(
        "Wrote {} rows x {} columns to {} ({} bytes)",
        df.height(),
        df.width(),
        output_path.display(),
        size
    );
    Ok(())
}

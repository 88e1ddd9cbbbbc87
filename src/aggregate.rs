//! Multi-file aggregation with source provenance.
//!
//! Files are read in input order through the full single-file pipeline
//! and concatenated. Any per-file failure aborts the whole batch; only
//! row-level problems inside a file are tolerated.

use crate::config::ReadOptions;
use crate::constants::SOURCE_COLUMN;
use crate::error::{ReaderError, Result};
use crate::reader::read_sensor_csv;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Read every file and concatenate the results in input order.
///
/// With `options.add_source` each row carries its file path in the
/// `__source__` column. No input yields an empty frame (no rows, no
/// columns). All files must produce the same column names in the same
/// order; dtypes that differ are widened (integer/float to float,
/// anything involving text to text). Numbers widened to text are
/// rendered in polars' own format, so a comma-decimal `0,5` from a
/// semicolon export becomes `"0.5"`.
pub fn read_many<I, P>(paths: I, options: &ReadOptions) -> Result<DataFrame>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut frames = Vec::new();
    let mut sources = Vec::new();

    for path in paths {
        let path = path.as_ref();
        let mut df = read_sensor_csv(path, options).inspect_err(|e| {
            error!("Failed to read {}: {:#}", path.display(), e);
        })?;

        if options.add_source {
            let source = path.to_string_lossy().to_string();
            let tag = Series::new(SOURCE_COLUMN.into(), vec![source.as_str(); df.height()]);
            df.with_column(tag)?;
        }

        frames.push(df);
        sources.push(path.to_path_buf());
    }

    if frames.is_empty() {
        debug!("No input files, returning empty frame");
        return Ok(DataFrame::empty());
    }

    check_column_names(&frames, &sources)?;
    reconcile_dtypes(&mut frames)?;

    let file_count = frames.len();
    let combined = if file_count == 1 {
        frames.swap_remove(0)
    } else {
        let lazy_frames: Vec<LazyFrame> = frames.into_iter().map(|df| df.lazy()).collect();
        concat(lazy_frames, UnionArgs::default())?.collect()?
    };

    info!(
        "Aggregated {} files into {} rows x {} columns",
        file_count,
        combined.height(),
        combined.width()
    );
    Ok(combined)
}

fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect()
}

/// Mismatched column sets are a configuration error, not something to union
fn check_column_names(frames: &[DataFrame], sources: &[PathBuf]) -> Result<()> {
    let expected = column_names(&frames[0]);

    for (df, source) in frames.iter().zip(sources).skip(1) {
        let found = column_names(df);
        if found != expected {
            return Err(ReaderError::SchemaMismatch {
                path: source.clone(),
                expected,
                found,
            });
        }
    }
    Ok(())
}

/// Widen columns whose dtype differs between frames
fn reconcile_dtypes(frames: &mut [DataFrame]) -> Result<()> {
    for name in column_names(&frames[0]) {
        let dtypes = frames
            .iter()
            .map(|df| df.column(&name).map(|column| column.dtype().clone()))
            .collect::<PolarsResult<Vec<DataType>>>()?;

        if dtypes.iter().all(|dtype| dtype == &dtypes[0]) {
            continue;
        }

        let target = if dtypes
            .iter()
            .all(|dtype| matches!(dtype, DataType::Int64 | DataType::Float64))
        {
            DataType::Float64
        } else {
            DataType::String
        };
        debug!("Widening column '{}' to {} across files", name, target);

        for df in frames.iter_mut() {
            let widened = df.column(&name)?.cast(&target)?;
            df.with_column(widened)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_empty_input_yields_empty_frame() {
        let paths: Vec<PathBuf> = vec![];
        let df = read_many(&paths, &ReadOptions::default()).unwrap();
        assert_eq!(df.shape(), (0, 0));
    }

    #[test]
    fn test_same_file_twice_with_source() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "a.csv", "Sensordata\nTime in ms,c1\n0,1.5,\n100,2.5,\n");

        let single = read_many([&path], &ReadOptions::default()).unwrap();
        let df = read_many([&path, &path], &ReadOptions::default()).unwrap();

        assert_eq!(df.height(), 2 * single.height());
        let source = df.column(SOURCE_COLUMN).unwrap().as_materialized_series();
        assert_eq!(source.n_unique().unwrap(), 1);

        let expected = path.to_string_lossy().to_string();
        assert_eq!(source.str().unwrap().get(0), Some(expected.as_str()));
    }

    #[test]
    fn test_input_order_is_preserved() {
        let dir = TempDir::new().unwrap();
        let first = write_file(&dir, "b.csv", "t,v\n1,10\n2,20\n");
        let second = write_file(&dir, "a.csv", "t,v\n3,30\n");

        let options = ReadOptions::default().with_add_source(false);
        let df = read_many([&first, &second], &options).unwrap();

        assert_eq!(df.width(), 2);
        let t: Vec<Option<i64>> = df
            .column("t")
            .unwrap()
            .as_materialized_series()
            .i64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(t, vec![Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn test_mismatched_columns_are_rejected() {
        let dir = TempDir::new().unwrap();
        let first = write_file(&dir, "one.csv", "t,v\n1,10\n");
        let second = write_file(&dir, "two.csv", "t,w\n2,20\n");

        let result = read_many([&first, &second], &ReadOptions::default());
        match result {
            Err(ReaderError::SchemaMismatch { path, expected, found }) => {
                assert_eq!(path, second);
                assert_eq!(expected, vec!["t", "v", SOURCE_COLUMN]);
                assert_eq!(found, vec!["t", "w", SOURCE_COLUMN]);
            }
            other => panic!("Expected SchemaMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_differing_numeric_dtypes_are_widened() {
        let dir = TempDir::new().unwrap();
        let ints = write_file(&dir, "ints.csv", "t,v\n1,10\n");
        let floats = write_file(&dir, "floats.csv", "t,v\n2,2.5\n");

        let options = ReadOptions::default().with_add_source(false);
        let df = read_many([&ints, &floats], &options).unwrap();

        let v = df.column("v").unwrap();
        assert_eq!(v.dtype(), &DataType::Float64);
        assert_eq!(v.f64().unwrap().get(0), Some(10.0));
        assert_eq!(v.f64().unwrap().get(1), Some(2.5));
    }

    #[test]
    fn test_text_wins_over_numeric() {
        let dir = TempDir::new().unwrap();
        let numbers = write_file(&dir, "n.csv", "t,v\n1,10\n");
        let labels = write_file(&dir, "l.csv", "t,v\n2,high\n");

        let options = ReadOptions::default().with_add_source(false);
        let df = read_many([&numbers, &labels], &options).unwrap();
        assert_eq!(df.column("v").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_single_file_passes_through() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "only.csv", "t,v\n1,10\n2,20\n");

        let options = ReadOptions::default().with_add_source(false);
        let single = read_sensor_csv(&path, &options).unwrap();
        let df = read_many([&path], &options).unwrap();
        assert!(df.equals_missing(&single));
    }

    #[test]
    fn test_comma_decimals_widened_to_text_use_period() {
        let dir = TempDir::new().unwrap();
        let numbers = write_file(&dir, "n.csv", "Sensordata\nTime in ms;v\n1;0,5;\n");
        let labels = write_file(&dir, "l.csv", "Sensordata\nTime in ms;v\n2;high;\n");

        let options = ReadOptions::default().with_add_source(false);
        let df = read_many([&numbers, &labels], &options).unwrap();

        let v = df.column("v").unwrap().as_materialized_series();
        assert_eq!(v.dtype(), &DataType::String);
        assert_eq!(v.str().unwrap().get(0), Some("0.5"));
        assert_eq!(v.str().unwrap().get(1), Some("high"));
    }

    #[test]
    fn test_failure_in_any_file_aborts_batch() {
        let dir = TempDir::new().unwrap();
        let good = write_file(&dir, "good.csv", "t,v\n1,10\n");
        let missing = dir.path().join("missing.csv");

        let result = read_many([&good, &missing], &ReadOptions::default());
        assert!(matches!(result, Err(ReaderError::Io { .. })));
    }
}

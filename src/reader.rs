//! Single-file read pipeline.
//!
//! marker → separator → header repair → marker (again) → table parse.
//! The marker is located afresh after the repair because the file may
//! have been rewritten in between.

use crate::config::ReadOptions;
use crate::error::{ReaderError, Result};
use crate::marker::find_marker_line;
use crate::models::ParseReport;
use crate::parser::TableParser;
use crate::repair::repair_header_line;
use crate::separator::detect_separator;
use polars::prelude::DataFrame;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Read a coreViewer CSV export into a typed frame.
///
/// The file may be modified in place: a missing trailing separator on the
/// header line is appended before parsing.
pub fn read_sensor_csv(path: impl AsRef<Path>, options: &ReadOptions) -> Result<DataFrame> {
    read_sensor_csv_with_report(path, options).map(|(df, _)| df)
}

/// Like [`read_sensor_csv`], also returning the parse diagnostics
pub fn read_sensor_csv_with_report(
    path: impl AsRef<Path>,
    options: &ReadOptions,
) -> Result<(DataFrame, ParseReport)> {
    let path = path.as_ref();
    let encoding = options.resolve_encoding()?;
    let markers = &options.markers;
    let mut report = ParseReport::new(path);

    let separator = match options.separator {
        Some(separator) => {
            debug!("Using explicit {} separator for {}", separator, path.display());
            separator
        }
        None => detect_separator(path, markers, encoding)?,
    };
    report.separator = separator;

    report.repaired = repair_header_line(path, markers, separator, encoding)?;

    report.skip_rows = match find_marker_line(path, markers, encoding)? {
        Some(marker_idx) => marker_idx + 1,
        None => 0,
    };

    let bytes = fs::read(path).map_err(|e| ReaderError::io(path, e))?;
    let (text, had_errors) = encoding.decode_with_bom_removal(&bytes);
    if had_errors {
        warn!(
            "Invalid {} byte sequences in {} were replaced",
            encoding.name(),
            path.display()
        );
        report.replaced_invalid_bytes = true;
    }

    let df = TableParser::new(separator)
        .with_skip_rows(report.skip_rows)
        .with_header(options.has_header)
        .with_names(options.names.clone())
        .parse(&text, &mut report)?;

    info!(
        "Read {}: {} rows x {} columns ({} separator, {} rows skipped{})",
        path.display(),
        df.height(),
        df.width(),
        separator,
        report.skipped_rows.len(),
        if report.repaired { ", header repaired" } else { "" }
    );

    Ok((df, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Separator;
    use polars::prelude::DataType;
    use tempfile::TempDir;

    const EU_EXPORT: &str = "coreViewer Export\r\nDevice;1-01107\r\nSensordata\r\nTime in ms;c1;c2\r\n0;0,25;1,5;\r\n100;0,5;2,5;\r\n";

    #[test]
    fn test_read_repairs_and_parses() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("eu.csv");
        fs::write(&path, EU_EXPORT).unwrap();

        let (df, report) = read_sensor_csv_with_report(&path, &ReadOptions::default()).unwrap();

        assert!(report.repaired);
        assert_eq!(report.separator, Separator::Semicolon);
        assert_eq!(report.skip_rows, 3);
        assert_eq!(df.shape(), (2, 3));
        assert_eq!(df.column("Time in ms").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("c2").unwrap().f64().unwrap().get(1), Some(2.5));

        let on_disk = fs::read_to_string(&path).unwrap();
        assert!(on_disk.contains("Time in ms;c1;c2;\r\n"));
    }

    #[test]
    fn test_second_read_leaves_file_unchanged() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("eu.csv");
        fs::write(&path, EU_EXPORT).unwrap();

        let first = read_sensor_csv(&path, &ReadOptions::default()).unwrap();
        let bytes_after_first = fs::read(&path).unwrap();

        let (second, report) =
            read_sensor_csv_with_report(&path, &ReadOptions::default()).unwrap();
        assert!(!report.repaired);
        assert_eq!(fs::read(&path).unwrap(), bytes_after_first);
        assert!(first.equals_missing(&second));
    }

    #[test]
    fn test_without_marker_reads_from_first_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plain.csv");
        let content = "a,b\n1,2.5\n3,4.5\n";
        fs::write(&path, content).unwrap();

        let (df, report) = read_sensor_csv_with_report(&path, &ReadOptions::default()).unwrap();
        assert_eq!(report.skip_rows, 0);
        assert!(!report.repaired);
        assert_eq!(df.shape(), (2, 2));
        assert_eq!(fs::read_to_string(&path).unwrap(), content);
    }

    #[test]
    fn test_separator_override_bypasses_detection() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("override.csv");
        fs::write(&path, "Sensordata\nZeit;c1\n0;1,5;\n").unwrap();

        let options = ReadOptions::default().with_separator(Separator::Semicolon);
        let df = read_sensor_csv(&path, &options).unwrap();
        assert_eq!(df.shape(), (1, 2));
        assert_eq!(df.column("c1").unwrap().f64().unwrap().get(0), Some(1.5));
    }

    #[test]
    fn test_latin1_encoding() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("latin1.csv");
        fs::write(&path, b"Ger\xe4t\nSensordata\nTime in ms,Temp \xb0C\n0,21.5,\n".to_vec()).unwrap();

        let options = ReadOptions::default().with_encoding("latin1");
        let (df, report) = read_sensor_csv_with_report(&path, &options).unwrap();
        assert!(!report.replaced_invalid_bytes);
        assert!(df.column("Temp °C").is_ok());
    }

    #[test]
    fn test_invalid_utf8_is_replaced_not_fatal() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.csv");
        fs::write(&path, b"Sensordata\nTime in ms,label\n0,caf\xff,\n".to_vec()).unwrap();

        let (df, report) = read_sensor_csv_with_report(&path, &ReadOptions::default()).unwrap();
        assert!(report.replaced_invalid_bytes);
        let label = df.column("label").unwrap().as_materialized_series().str().unwrap();
        assert_eq!(label.get(0), Some("caf\u{fffd}"));
    }

    #[test]
    fn test_missing_file_names_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.csv");

        let err = read_sensor_csv(&path, &ReadOptions::default()).unwrap_err();
        assert!(err.to_string().contains("missing.csv"));
    }
}

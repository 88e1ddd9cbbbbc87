//! Delimited table parsing for the data section of an export.
//!
//! Splits lines on a single separator character (no quoting), skips the
//! preamble and blank lines, drops rows whose arity disagrees with the
//! header, removes a wholly empty trailing column and coerces each column
//! to the narrowest type that fits every value.

use crate::coercion::{coerce_column, is_missing};
use crate::constants::{GENERATED_COLUMN_PREFIX, UNNAMED_COLUMN_PREFIX};
use crate::error::Result;
use crate::lines::text_lines;
use crate::models::{DecimalConvention, ParseReport, Separator, SkippedRow};
use polars::prelude::*;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Parser for the tabular part of a sensor CSV file
#[derive(Debug, Clone)]
pub struct TableParser {
    separator: Separator,
    decimal: DecimalConvention,
    skip_rows: usize,
    has_header: bool,
    names: Option<Vec<String>>,
}

impl TableParser {
    /// Create a parser using the decimal convention implied by `separator`
    pub fn new(separator: Separator) -> Self {
        Self {
            separator,
            decimal: separator.decimal_convention(),
            skip_rows: 0,
            has_header: true,
            names: None,
        }
    }

    /// Number of leading lines to ignore
    pub fn with_skip_rows(mut self, skip_rows: usize) -> Self {
        self.skip_rows = skip_rows;
        self
    }

    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    /// Names for header-less input, applied when the column count matches
    pub fn with_names(mut self, names: Option<Vec<String>>) -> Self {
        self.names = names;
        self
    }

    /// Parse decoded file content into a typed frame
    pub fn parse(&self, text: &str, report: &mut ParseReport) -> Result<DataFrame> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let separator = self.separator.as_char();

        let mut rows = text_lines(text)
            .into_iter()
            .enumerate()
            .skip(self.skip_rows)
            .filter(|(_, line)| !line.trim().is_empty());

        let Some((first_line, first)) = rows.next() else {
            warn!(
                "No table found after {} preamble lines in {}",
                self.skip_rows,
                report.path.display()
            );
            return Ok(DataFrame::empty());
        };

        let first_fields: Vec<&str> = first.split(separator).collect();
        let width = first_fields.len();
        // A trailing separator on the first line may be ours (header repair)
        // while the data rows never had one.
        let open_last_field = width > 1 && first_fields.last().is_some_and(|f| is_missing(f));

        let (header, mut columns): (Option<Vec<&str>>, Vec<Vec<String>>) = if self.has_header {
            (Some(first_fields), vec![Vec::new(); width])
        } else {
            let columns = first_fields.iter().map(|f| vec![f.to_string()]).collect();
            (None, columns)
        };
        debug!(
            "Table in {} starts at line {} with {} fields",
            report.path.display(),
            first_line + 1,
            width
        );

        let mut padded_rows = 0;
        for (line_num, line) in rows {
            let mut fields: Vec<&str> = line.split(separator).collect();
            if open_last_field && fields.len() + 1 == width {
                fields.push("");
                padded_rows += 1;
            }
            if fields.len() != width {
                warn!(
                    "Skipping line {} of {}: expected {} fields, found {}",
                    line_num + 1,
                    report.path.display(),
                    width,
                    fields.len()
                );
                report.skipped_rows.push(SkippedRow {
                    line: line_num,
                    expected_fields: width,
                    found_fields: fields.len(),
                });
                continue;
            }
            for (column, field) in columns.iter_mut().zip(fields) {
                column.push(field.to_string());
            }
        }

        if padded_rows > 0 {
            debug!(
                "{} rows in {} lack the trailing separator, last field treated as missing",
                padded_rows,
                report.path.display()
            );
        }

        let mut names = match &header {
            Some(fields) => header_names(fields),
            None => Vec::new(),
        };

        if columns
            .last()
            .is_some_and(|column| column.iter().all(|value| is_missing(value)))
        {
            columns.pop();
            let dropped = names
                .pop()
                .unwrap_or_else(|| generated_name(columns.len()));
            debug!(
                "Dropped empty trailing column '{}' from {}",
                dropped,
                report.path.display()
            );
            report.dropped_trailing_column = Some(dropped);
        }

        if header.is_none() {
            names = match &self.names {
                Some(given) if given.len() == columns.len() => given.clone(),
                _ => (0..columns.len()).map(generated_name).collect(),
            };
        }

        let height = columns.first().map_or(0, Vec::len);
        let mut frame_columns = Vec::with_capacity(columns.len());
        for (name, raw) in names.iter().zip(&columns) {
            let values = coerce_column(raw, self.decimal);
            if !values.is_numeric() {
                debug!("Column '{}' kept as text", name);
                report.text_columns.push(name.clone());
            }
            frame_columns.push(values.into_column(name));
        }

        report.rows_parsed = height;
        Ok(DataFrame::new(frame_columns)?)
    }
}

/// Name a header-less column by position
fn generated_name(index: usize) -> String {
    format!("{}{}", GENERATED_COLUMN_PREFIX, index)
}

/// Trimmed, non-empty, unique column names from raw header fields
fn header_names(fields: &[&str]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::with_capacity(fields.len());

    for (index, field) in fields.iter().enumerate() {
        let base = match field.trim() {
            "" => format!("{}{}", UNNAMED_COLUMN_PREFIX, index),
            name => name.to_string(),
        };

        let mut name = base.clone();
        let mut suffix = 1;
        while seen.contains(&name) {
            name = format!("{}.{}", base, suffix);
            suffix += 1;
        }
        seen.insert(name.clone());
        names.push(name);
    }

    names
}

//! Per-column numeric coercion.
//!
//! A column becomes numeric only when every non-missing value parses
//! under the active decimal convention; otherwise it stays text,
//! verbatim. The decision is returned as a [`ColumnValues`] variant.

use crate::models::DecimalConvention;
use polars::prelude::*;

/// Typed values of a single column
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    Integer(Vec<Option<i64>>),
    Float(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

impl ColumnValues {
    pub fn is_numeric(&self) -> bool {
        !matches!(self, ColumnValues::Text(_))
    }

    /// Materialize as a named polars column
    pub fn into_column(self, name: &str) -> Column {
        match self {
            ColumnValues::Integer(values) => Series::new(name.into(), values).into(),
            ColumnValues::Float(values) => Series::new(name.into(), values).into(),
            ColumnValues::Text(values) => Series::new(name.into(), values).into(),
        }
    }
}

/// A raw field is missing when it is empty after trimming
pub fn is_missing(value: &str) -> bool {
    value.trim().is_empty()
}

/// Parse an integer field, whitespace-tolerant
pub fn parse_integer(value: &str) -> Option<i64> {
    value.trim().parse::<i64>().ok()
}

/// Parse a floating point field under the given decimal convention.
///
/// With comma decimals a period is ambiguous (it may be a thousands
/// separator), so such values are rejected rather than guessed.
pub fn parse_float(value: &str, decimal: DecimalConvention) -> Option<f64> {
    let value = value.trim();
    match decimal {
        DecimalConvention::Period => value.parse::<f64>().ok(),
        DecimalConvention::Comma => {
            if value.contains('.') {
                return None;
            }
            value.replace(',', ".").parse::<f64>().ok()
        }
    }
}

/// Decide the type of a raw column: integer, float, or text.
pub fn coerce_column(raw: &[String], decimal: DecimalConvention) -> ColumnValues {
    let present = || raw.iter().filter(|value| !is_missing(value));

    if present().all(|value| parse_integer(value).is_some()) && present().next().is_some() {
        return ColumnValues::Integer(
            raw.iter()
                .map(|value| {
                    if is_missing(value) {
                        None
                    } else {
                        parse_integer(value)
                    }
                })
                .collect(),
        );
    }

    let floats: Option<Vec<Option<f64>>> = raw
        .iter()
        .map(|value| {
            if is_missing(value) {
                Some(None)
            } else {
                parse_float(value, decimal).map(Some)
            }
        })
        .collect();

    match floats {
        Some(values) => ColumnValues::Float(values),
        None => ColumnValues::Text(
            raw.iter()
                .map(|value| {
                    if is_missing(value) {
                        None
                    } else {
                        Some(value.clone())
                    }
                })
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_integer_column() {
        let values = coerce_column(&strings(&["0", "100", " 200 "]), DecimalConvention::Period);
        assert_eq!(
            values,
            ColumnValues::Integer(vec![Some(0), Some(100), Some(200)])
        );
    }

    #[test]
    fn test_comma_decimal_column() {
        let values = coerce_column(
            &strings(&["0,1071704523610606", "7,5", "3"]),
            DecimalConvention::Comma,
        );
        match values {
            ColumnValues::Float(floats) => {
                assert!((floats[0].unwrap() - 0.1071704523610606).abs() < 1e-15);
                assert_eq!(floats[1], Some(7.5));
                assert_eq!(floats[2], Some(3.0));
            }
            other => panic!("Expected float column, got {:?}", other),
        }
    }

    #[test]
    fn test_period_in_comma_convention_is_text() {
        let values = coerce_column(&strings(&["1,5", "1.000"]), DecimalConvention::Comma);
        assert_eq!(
            values,
            ColumnValues::Text(vec![Some("1,5".to_string()), Some("1.000".to_string())])
        );
    }

    #[test]
    fn test_single_non_numeric_value_keeps_text_verbatim() {
        let values = coerce_column(&strings(&["1.5", " n/a ", "2"]), DecimalConvention::Period);
        assert_eq!(
            values,
            ColumnValues::Text(vec![
                Some("1.5".to_string()),
                Some(" n/a ".to_string()),
                Some("2".to_string())
            ])
        );
    }

    #[test]
    fn test_missing_values_do_not_block_coercion() {
        let values = coerce_column(&strings(&["1", "", "3"]), DecimalConvention::Period);
        assert_eq!(values, ColumnValues::Integer(vec![Some(1), None, Some(3)]));

        let values = coerce_column(&strings(&["1.5", "  ", "3"]), DecimalConvention::Period);
        assert_eq!(values, ColumnValues::Float(vec![Some(1.5), None, Some(3.0)]));
    }

    #[test]
    fn test_all_missing_column_is_float() {
        let values = coerce_column(&strings(&["", " "]), DecimalConvention::Period);
        assert_eq!(values, ColumnValues::Float(vec![None, None]));
        assert!(values.is_numeric());
    }

    #[test]
    fn test_into_column_dtypes() {
        let column = ColumnValues::Integer(vec![Some(1)]).into_column("a");
        assert_eq!(column.dtype(), &DataType::Int64);

        let column = ColumnValues::Float(vec![Some(1.0)]).into_column("b");
        assert_eq!(column.dtype(), &DataType::Float64);

        let column = ColumnValues::Text(vec![Some("x".to_string())]).into_column("c");
        assert_eq!(column.dtype(), &DataType::String);
        assert_eq!(column.name().as_str(), "c");
    }
}

//! Application constants for the coreSensing CSV reader
//!
//! Recognition tokens for the export layout, default option values and
//! the names of synthetic columns.

// =============================================================================
// Export Layout
// =============================================================================

/// Marker token on the line immediately preceding the column header
pub const SENSORDATA_MARKER: &str = "Sensordata";

/// Label of the leading time column written by coreViewer
pub const TIME_COLUMN_LABEL: &str = "Time in ms";

/// Header prefix emitted by exports using the European (semicolon) layout
pub const SEMICOLON_HEADER_SENTINEL: &str = "Time in ms;";

/// Header prefix emitted by exports using the comma layout
pub const COMMA_HEADER_SENTINEL: &str = "Time in ms,";

// =============================================================================
// Defaults
// =============================================================================

/// Default text encoding label (WHATWG label, resolved by encoding_rs)
pub const DEFAULT_ENCODING: &str = "utf-8";

/// Default number of rows printed by the CLI preview
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// Default input location used by the CLI when none is given
pub const DEFAULT_INPUT_DIR: &str = "data";

/// File pattern for sensor exports inside an input directory
pub const CSV_FILE_PATTERN: &str = "*.csv";

// =============================================================================
// Column Naming
// =============================================================================

/// Column attached to every row when aggregating with source tagging
pub const SOURCE_COLUMN: &str = "__source__";

/// Prefix for header fields that are empty
pub const UNNAMED_COLUMN_PREFIX: &str = "unnamed_";

/// Prefix for generated names when the file carries no header
pub const GENERATED_COLUMN_PREFIX: &str = "col_";

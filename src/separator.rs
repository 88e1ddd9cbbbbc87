//! Separator detection from the header line.
//!
//! The heuristic is deliberately narrow: it only recognizes the
//! `Time in ms` label written by coreViewer, followed by either a
//! semicolon or a comma.

use crate::constants::{COMMA_HEADER_SENTINEL, SEMICOLON_HEADER_SENTINEL};
use crate::error::Result;
use crate::marker::{find_marker_line, read_line_at};
use crate::models::Separator;
use encoding_rs::Encoding;
use std::path::Path;
use tracing::debug;

/// Decide the field separator from the line following the marker.
///
/// Falls back to [`Separator::Comma`] when the marker or the header line
/// is missing, or when the header carries neither sentinel.
pub fn detect_separator<S: AsRef<str>>(
    path: &Path,
    needles: &[S],
    encoding: &'static Encoding,
) -> Result<Separator> {
    let Some(marker_idx) = find_marker_line(path, needles, encoding)? else {
        debug!("No marker in {}, defaulting to comma", path.display());
        return Ok(Separator::Comma);
    };

    let Some(header) = read_line_at(path, marker_idx + 1, encoding)? else {
        debug!(
            "Marker is the last line of {}, defaulting to comma",
            path.display()
        );
        return Ok(Separator::Comma);
    };

    let separator = separator_from_header(&header);
    debug!("Detected {} separator for {}", separator, path.display());
    Ok(separator)
}

/// Classify a raw header line by its sentinel substring
pub fn separator_from_header(header: &str) -> Separator {
    if header.contains(SEMICOLON_HEADER_SENTINEL) {
        return Separator::Semicolon;
    }
    if !header.contains(COMMA_HEADER_SENTINEL) {
        debug!("Header carries no known time label: {:?}", header);
    }
    Separator::Comma
}

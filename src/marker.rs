//! Marker line detection.
//!
//! Locates the line that precedes the column header of a coreViewer
//! export, which also tells us how many preamble lines to skip.

use crate::error::{ReaderError, Result};
use crate::lines::{RawLines, split_line_ending};
use encoding_rs::Encoding;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, warn};

/// Find the first line containing any of the needles.
///
/// Returns the zero-based line index, or `None` when no line matches.
/// Bytes that are invalid in `encoding` are replaced before matching.
pub fn find_marker_line<S: AsRef<str>>(
    path: &Path,
    needles: &[S],
    encoding: &'static Encoding,
) -> Result<Option<usize>> {
    let file = File::open(path).map_err(|e| ReaderError::io(path, e))?;
    let lines = RawLines::new(BufReader::new(file));

    let mut reported_replacement = false;

    for (line_num, line) in lines.enumerate() {
        let line = line.map_err(|e| ReaderError::io(path, e))?;
        let (body, _) = split_line_ending(&line);
        let (text, had_errors) = encoding.decode_without_bom_handling(body);

        if had_errors && !reported_replacement {
            warn!(
                "Invalid {} bytes in {} (line {}), replaced while scanning",
                encoding.name(),
                path.display(),
                line_num
            );
            reported_replacement = true;
        }

        if needles.iter().any(|needle| text.contains(needle.as_ref())) {
            debug!("Marker found in {} at line {}", path.display(), line_num);
            return Ok(Some(line_num));
        }
    }

    debug!("No marker found in {}", path.display());
    Ok(None)
}

/// Read the line at `index`, decoded lossily, without its terminator
pub fn read_line_at(
    path: &Path,
    index: usize,
    encoding: &'static Encoding,
) -> Result<Option<String>> {
    let file = File::open(path).map_err(|e| ReaderError::io(path, e))?;

    match RawLines::new(BufReader::new(file)).nth(index) {
        Some(line) => {
            let line = line.map_err(|e| ReaderError::io(path, e))?;
            let (body, _) = split_line_ending(&line);
            let (text, _) = encoding.decode_without_bom_handling(body);
            Ok(Some(text.into_owned()))
        }
        None => Ok(None),
    }
}

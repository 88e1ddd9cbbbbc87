//! In-place repair of the header line of a coreViewer export.
//!
//! Some exports write the column header without the trailing separator
//! that every data row carries, which shifts the data against the header
//! by one field. The repair streams the file into a temporary sibling,
//! appends the missing separator to the line after the marker, and swaps
//! the copy into place only when something changed.

use crate::error::{ReaderError, Result};
use crate::lines::{RawLines, split_line_ending};
use crate::marker::find_marker_line;
use crate::models::Separator;
use encoding_rs::Encoding;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Append `separator` to the line after the marker if it is missing.
///
/// Returns `true` when the file was rewritten. Running the repair again on
/// its own output is a no-op.
pub fn repair_header_line<S: AsRef<str>>(
    path: &Path,
    needles: &[S],
    separator: Separator,
    encoding: &'static Encoding,
) -> Result<bool> {
    let marker_idx = match find_marker_line(path, needles, encoding)? {
        Some(idx) => idx,
        None => {
            debug!("No marker in {}, nothing to repair", path.display());
            return Ok(false);
        }
    };
    let header_idx = marker_idx + 1;

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    // Dropping the handle on any early return deletes the temporary file.
    let temp = NamedTempFile::new_in(parent).map_err(|e| ReaderError::io(parent, e))?;
    let source = File::open(path).map_err(|e| ReaderError::io(path, e))?;

    let mut changed = false;
    {
        let mut writer = BufWriter::new(temp.as_file());

        for (line_num, line) in RawLines::new(BufReader::new(source)).enumerate() {
            let line = line.map_err(|e| ReaderError::io(path, e))?;

            if line_num == header_idx {
                let (body, ending) = split_line_ending(&line);
                if body.last() != Some(&separator.as_byte()) {
                    let mut repaired = Vec::with_capacity(line.len() + 1);
                    repaired.extend_from_slice(body);
                    repaired.push(separator.as_byte());
                    repaired.extend_from_slice(ending.as_bytes());

                    writer
                        .write_all(&repaired)
                        .map_err(|e| ReaderError::io(temp.path(), e))?;
                    changed = true;
                    continue;
                }
            }

            writer
                .write_all(&line)
                .map_err(|e| ReaderError::io(temp.path(), e))?;
        }

        writer.flush().map_err(|e| ReaderError::io(temp.path(), e))?;
    }

    if !changed {
        debug!("Header line of {} already terminated", path.display());
        return Ok(false);
    }

    temp.as_file()
        .sync_all()
        .map_err(|e| ReaderError::io(temp.path(), e))?;

    let permissions = fs::metadata(path)
        .map_err(|e| ReaderError::io(path, e))?
        .permissions();
    fs::set_permissions(temp.path(), permissions).map_err(|e| ReaderError::io(temp.path(), e))?;

    temp.persist(path).map_err(|e| ReaderError::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;

    info!(
        "Appended missing '{}' to header line {} of {}",
        separator.as_char(),
        header_idx,
        path.display()
    );
    Ok(true)
}

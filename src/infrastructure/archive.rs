//! Inspection of downloaded ZIP archives.

use std::io::Cursor;

/// Number of entries in a ZIP held in memory, or `None` if it is not a ZIP.
#[must_use]
pub fn count_entries(bytes: &[u8]) -> Option<usize> {
    match zip::ZipArchive::new(Cursor::new(bytes)) {
        Ok(archive) => Some(archive.len()),
        Err(e) => {
            tracing::debug!("Failed to read archive: {}", e);
            None
        }
    }
}

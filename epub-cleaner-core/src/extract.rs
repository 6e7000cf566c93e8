use std::fs::{self, File};
use std::io::{self, Read, Seek};
use std::path::Path;

use tracing::{debug, info};

use crate::contract::CleanError;

/// Unpack every entry of the ZIP archive read from `reader` into `destination`.
///
/// Entry names that are absolute or climb out of `destination` abort the
/// extraction with [`CleanError::UnsafeEntryPath`]. Returns the number of file
/// entries written.
pub fn extract_archive<R: Read + Seek>(reader: R, destination: &Path) -> Result<usize, CleanError> {
    let mut archive = zip::ZipArchive::new(reader)?;
    let mut files = 0;

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        let relative = entry
            .enclosed_name()
            .ok_or_else(|| CleanError::UnsafeEntryPath(entry.name().to_string()))?;
        let target = destination.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&target)?;
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = File::create(&target)?;
        io::copy(&mut entry, &mut out)?;
        debug!(entry = %entry.name(), size = entry.size(), "Extracted entry");
        files += 1;
    }

    info!(files, destination = %destination.display(), "Extracted archive");
    Ok(files)
}

/// Convenience wrapper reading the archive from a file on disk.
pub fn extract_archive_file(archive: &Path, destination: &Path) -> Result<usize, CleanError> {
    let file = File::open(archive)?;
    extract_archive(io::BufReader::new(file), destination)
}

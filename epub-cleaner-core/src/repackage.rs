use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;

use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::CompressionMethod;

use crate::contract::CleanError;
use crate::walker::collect_files;

/// Name of the EPUB container marker that must lead the archive, uncompressed.
pub const EPUB_MIMETYPE_ENTRY: &str = "mimetype";

/// Archive-internal name of `path`: relative to `root`, `/`-separated.
fn entry_name(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Zip every file under `root` into a new deflate-compressed archive at `destination`.
///
/// A top-level `mimetype` file goes first and is stored, so rebuilt EPUBs stay
/// valid containers. Only file entries are written: directory entries of the
/// source archive (`OEBPS/`) are not recreated. Returns the number of entries written.
pub fn repackage(root: &Path, destination: &Path) -> Result<usize, CleanError> {
    let mut files = collect_files(root)?;
    if let Some(pos) = files
        .iter()
        .position(|p| entry_name(root, p) == EPUB_MIMETYPE_ENTRY)
    {
        let mimetype = files.remove(pos);
        files.insert(0, mimetype);
    }

    let mut writer = zip::ZipWriter::new(BufWriter::new(File::create(destination)?));
    for path in &files {
        let name = entry_name(root, path);
        let method = if name == EPUB_MIMETYPE_ENTRY {
            CompressionMethod::Stored
        } else {
            CompressionMethod::Deflated
        };
        let options = SimpleFileOptions::default().compression_method(method);
        writer.start_file(name.as_str(), options)?;
        let mut input = File::open(path)?;
        io::copy(&mut input, &mut writer)?;
        debug!(entry = %name, "Added entry to archive");
    }

    let mut out = writer.finish()?;
    io::Write::flush(&mut out)?;

    info!(
        entries = files.len(),
        destination = %destination.display(),
        "Created processed archive"
    );
    Ok(files.len())
}

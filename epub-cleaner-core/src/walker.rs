use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::contract::CleanError;
use crate::substitute::remove_strings;

/// Extensions (lowercase, without the dot) whose files are treated as text.
pub const TEXT_EXTENSIONS: &[&str] = &["xhtml", "html", "htm", "xml", "css", "txt", "opf", "ncx"];

/// Outcome of walking one extracted tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WalkReport {
    /// Files with a text extension, decodable or not.
    pub text_entries: usize,
    /// Text files whose content changed and were written back.
    pub rewritten: usize,
    /// Text files left untouched because they are not valid UTF-8, relative to the root.
    pub skipped_undecodable: Vec<PathBuf>,
}

/// True when the extension of `path` is in [`TEXT_EXTENSIONS`], ignoring case.
pub fn is_text_entry(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            TEXT_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// All regular files under `root`, depth first, each directory's entries in name order.
pub(crate) fn collect_files(root: &Path) -> io::Result<Vec<PathBuf>> {
    fn visit_dir(dir: &Path, results: &mut Vec<PathBuf>) -> io::Result<()> {
        let mut entries = fs::read_dir(dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<io::Result<Vec<_>>>()?;
        entries.sort();
        for path in entries {
            if path.is_dir() {
                visit_dir(&path, results)?;
            } else if path.is_file() {
                results.push(path);
            }
        }
        Ok(())
    }

    let mut files = Vec::new();
    visit_dir(root, &mut files)?;
    Ok(files)
}

/// Remove `strings` from every text file under `root`, in place.
///
/// Files that are not valid UTF-8 are skipped and listed in the report rather
/// than treated as errors. Files with other extensions are never opened.
pub fn clean_tree(root: &Path, strings: &[String]) -> Result<WalkReport, CleanError> {
    let files = collect_files(root)?;
    let total = files.iter().filter(|p| is_text_entry(p)).count();
    let mut report = WalkReport::default();

    for path in files.iter().filter(|p| is_text_entry(p)) {
        report.text_entries += 1;
        let relative = path.strip_prefix(root).unwrap_or(path).to_path_buf();
        debug!(
            file = %relative.display(),
            progress = format!("{}/{}", report.text_entries, total),
            "Processing text entry"
        );

        let bytes = fs::read(path)?;
        let content = match String::from_utf8(bytes) {
            Ok(content) => content,
            Err(e) => {
                warn!(
                    file = %relative.display(),
                    valid_up_to = e.utf8_error().valid_up_to(),
                    "Skipping text entry that is not valid UTF-8"
                );
                report.skipped_undecodable.push(relative);
                continue;
            }
        };

        let cleaned = remove_strings(&content, strings);
        if cleaned != content {
            fs::write(path, cleaned.as_bytes())?;
            report.rewritten += 1;
        }
    }

    info!(
        text_entries = report.text_entries,
        rewritten = report.rewritten,
        skipped = report.skipped_undecodable.len(),
        "Finished cleaning extracted tree"
    );
    Ok(report)
}

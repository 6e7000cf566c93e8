use regex::Regex;
use std::sync::OnceLock;
use unicode_normalization::UnicodeNormalization;

use crate::substitute::remove_strings;

/// Used when sanitizing and string removal leave nothing usable behind.
pub const FALLBACK_FILENAME: &str = "untitled";

const WINDOWS_DEVICE_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

fn unsafe_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9_.\-]").expect("static regex is valid"))
}

/// Reduce a client-supplied filename to a flat, ASCII-only name that is safe
/// to use as a path component and an object key segment.
///
/// May return an empty string when nothing usable remains.
pub fn secure_filename(name: &str) -> String {
    let ascii: String = name.nfkd().filter(char::is_ascii).collect();
    let flattened = ascii.replace(['/', '\\'], " ");
    let joined = flattened.split_whitespace().collect::<Vec<_>>().join("_");
    let cleaned = unsafe_chars().replace_all(&joined, "");
    let trimmed = cleaned.trim_matches(|c| c == '.' || c == '_');

    let stem = trimmed.split('.').next().unwrap_or("").to_ascii_uppercase();
    if !trimmed.is_empty() && WINDOWS_DEVICE_NAMES.contains(&stem.as_str()) {
        return format!("_{trimmed}");
    }
    trimmed.to_string()
}

/// Output filename for an upload: the sanitized name, with `strings` removed
/// from it when `process_filename` is set.
///
/// Removal can leave an empty name or one made only of dots (`.`, `..`);
/// those resolve to directories, so they are replaced by [`FALLBACK_FILENAME`].
pub fn derive_filename(original: &str, strings: &[String], process_filename: bool) -> String {
    let mut filename = secure_filename(original);
    if process_filename {
        filename = remove_strings(&filename, strings);
    }
    if filename.chars().all(|c| c == '.') {
        tracing::warn!(original, derived = %filename, "Filename unusable after sanitizing, using fallback");
        return FALLBACK_FILENAME.to_string();
    }
    filename
}

use tracing::debug;

/// Remove every occurrence of each string in `strings` from `content`.
///
/// Strings are applied one after another, each as a full left-to-right pass
/// over the output of the previous one, so the order of `strings` matters:
/// removing `"AB"` then `"A"` from `"AABB"` yields `"B"`. Matching is literal
/// and case-sensitive. Empty strings remove nothing.
pub fn remove_strings(content: &str, strings: &[String]) -> String {
    if strings.is_empty() {
        return content.to_string();
    }

    let mut result = content.to_string();
    let mut last_percent = 0;
    for (i, needle) in strings.iter().enumerate() {
        if !needle.is_empty() && result.contains(needle.as_str()) {
            result = result.replace(needle.as_str(), "");
        }
        let percent = (i + 1) * 100 / strings.len();
        if percent > last_percent {
            debug!(percent, "Removing strings");
            last_percent = percent;
        }
    }
    result
}

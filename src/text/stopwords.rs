// Stopword lists: bundled English default plus a plain-text file format.

use std::collections::HashSet;

use stop_words::{get, LANGUAGE};

/// The English stopword list bundled with the `stop-words` crate, lowercased.
pub fn bundled_english() -> HashSet<String> {
    get(LANGUAGE::English)
        .into_iter()
        .map(|w| w.trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

/// Parse a stopword file: one word per line, blank lines and `#` comments ignored.
pub fn parse_list(contents: &str) -> HashSet<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_lowercase)
        .collect()
}

/// Render a stopword set in the file format `parse_list` reads, sorted for
/// stable output.
pub fn render_list(words: &HashSet<String>) -> String {
    let mut sorted: Vec<&str> = words.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    let mut out = sorted.join("\n");
    out.push('\n');
    out
}

//! Filesystem-safe names for exported files and folders
//!
//! Titles come straight from Datawrapper and routinely contain `/` and `:`
//! (e.g. "Prisons: 2019/20"), which would otherwise be read as path separators.

/// Maximum length of a sanitised name, in characters
pub const MAX_NAME_LEN: usize = 255;

const FORBIDDEN: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Convert an arbitrary title into a filesystem-safe name.
///
/// Strips `\ / : * ? " < > |` and control characters, trims leading and
/// trailing whitespace and dots, and truncates to [`MAX_NAME_LEN`]
/// characters. Idempotent: `sanitize(&sanitize(s)) == sanitize(s)`.
pub fn sanitize(name: &str) -> String {
    let stripped: String = name
        .chars()
        .filter(|c| !FORBIDDEN.contains(c) && !c.is_control())
        .collect();

    let trimmed = trim_edges(&stripped);
    let truncated: String = trimmed.chars().take(MAX_NAME_LEN).collect();

    // Truncation can expose trailing whitespace or dots
    trim_edges(&truncated).to_string()
}

fn trim_edges(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace() || c == '.')
}

//! Text normalization applied before any keyword matching.
//!
//! Lower-cases, folds the six Spanish accented characters to their plain
//! equivalents and deletes everything outside `[a-z0-9]` and whitespace.
//! Any other accented character (e.g. `ü`) is dropped entirely, not folded.

/// Normalize raw message text for keyword matching.
///
/// Total over any input; the empty string normalizes to the empty string.
/// Idempotent: `normalize(normalize(s)) == normalize(s)`.
pub fn normalize(text: &str) -> String {
    let folded: String = text
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' => 'u',
            'ñ' => 'n',
            other => other,
        })
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect();

    folded.trim().to_string()
}

//! Line splitting for OCR text.

/// Split raw text into trimmed lines.
///
/// Handles `\n`, `\r\n` and bare `\r` endings. Blank lines are kept so line
/// indexes stay aligned with the source; empty input yields no lines.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.lines()
        .flat_map(|line| line.split('\r'))
        .map(str::trim)
        .collect()
}

/// Character length of a line, counting Cyrillic and Polish letters once.
pub fn char_len(line: &str) -> usize {
    line.chars().count()
}

//! Position utilities.
//!
//! The AST uses byte offsets; annotations and diagnostics are reported
//! with line/column positions. This module provides the conversion.

use serde::Serialize;

/// A position in a source file (0-indexed line and column).
///
/// Columns count characters, not bytes, so multi-byte source text
/// reports the column a reader would expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    /// 0-indexed line number
    pub line: u32,
    /// 0-indexed column in characters
    pub column: u32,
}

impl Position {
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// Line map for efficient offset -> position conversion.
/// Stores the starting offset of each line.
#[derive(Debug, Clone)]
pub struct LineMap {
    /// Starting offset of each line (`line_starts[0]` is always 0)
    line_starts: Vec<u32>,
}

impl LineMap {
    /// Build a line map from source text.
    #[must_use]
    pub fn build(source: &str) -> Self {
        let mut line_starts = vec![0u32];

        for (i, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(u32::try_from(i + 1).unwrap_or(u32::MAX));
            } else if ch == '\r' {
                // \r\n is handled by the \n branch; bare \r ends a line
                let next_idx = i + 1;
                if source.as_bytes().get(next_idx) != Some(&b'\n') {
                    line_starts.push(u32::try_from(next_idx).unwrap_or(u32::MAX));
                }
            }
        }

        Self { line_starts }
    }

    /// Convert a byte offset to a Position (line, column).
    #[must_use]
    pub fn position(&self, offset: u32, source: &str) -> Position {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert_point) => insert_point.saturating_sub(1),
        };

        let line_start = (self.line_starts.get(line).copied().unwrap_or(0) as usize)
            .min(source.len());
        let end = (offset as usize).min(source.len());
        let start = line_start.min(end);
        let column = source.get(start..end).map_or(0, |s| s.chars().count());

        Position {
            line: u32::try_from(line).unwrap_or(u32::MAX),
            column: u32::try_from(column).unwrap_or(u32::MAX),
        }
    }

    /// Get the number of lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Get the starting offset of a line.
    #[must_use]
    pub fn line_start(&self, line: usize) -> Option<u32> {
        self.line_starts.get(line).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line() {
        let source = "let x = 1;";
        let map = LineMap::build(source);
        assert_eq!(map.line_count(), 1);
        assert_eq!(map.position(4, source), Position::new(0, 4));
    }

    #[test]
    fn test_multi_line() {
        let source = "let x = 1;\nlet y = 2;\n";
        let map = LineMap::build(source);
        assert_eq!(map.line_count(), 3);
        assert_eq!(map.position(11, source), Position::new(1, 0));
        assert_eq!(map.position(15, source), Position::new(1, 4));
    }

    #[test]
    fn test_crlf() {
        let source = "a\r\nb\rc";
        let map = LineMap::build(source);
        assert_eq!(map.line_count(), 3);
        assert_eq!(map.position(3, source), Position::new(1, 0));
        assert_eq!(map.position(5, source), Position::new(2, 0));
    }

    #[test]
    fn test_multibyte_column_counts_chars() {
        let source = "let héllo = 1;";
        let map = LineMap::build(source);
        // 'h' is at byte 4; the char after the two-byte 'é' is at byte 7
        assert_eq!(map.position(7, source), Position::new(0, 6));
    }
}

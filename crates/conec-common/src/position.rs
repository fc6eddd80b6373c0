//! Position utilities for diagnostics.
//!
//! The IR tracks byte offsets; diagnostic consumers want line/column. This
//! module provides the conversion.

use serde::{Deserialize, Serialize};

/// Source location with both offset and line/column info (0-indexed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    /// Byte offset from start of file
    pub offset: u32,
    /// 0-indexed line number
    pub line: u32,
    /// 0-indexed column
    pub column: u32,
}

/// Line map for efficient offset -> line/column conversion.
/// Stores the starting offset of each line.
#[derive(Debug, Clone)]
pub struct LineMap {
    /// Starting offset of each line (`line_starts[0]` is always 0)
    line_starts: Vec<u32>,
}

impl LineMap {
    /// Build a line map from source text.
    pub fn build(source: &str) -> Self {
        let mut line_starts = vec![0u32];
        for (i, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(u32::try_from(i + 1).unwrap_or(u32::MAX));
            }
        }
        LineMap { line_starts }
    }

    /// Convert a byte offset to a source location.
    ///
    /// Offsets past the last line start clamp onto the final line.
    pub fn location(&self, offset: u32) -> SourceLocation {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next_line) => next_line - 1,
        };
        SourceLocation {
            offset,
            line: line as u32,
            column: offset - self.line_starts[line],
        }
    }

    /// Number of lines in the source.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
#[path = "tests/position_tests.rs"]
mod position_tests;

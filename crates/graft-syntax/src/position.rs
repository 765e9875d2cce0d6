//! Line and column positions.
//!
//! Tree-sitter positions are zero-based and [`LineCol`] keeps that
//! convention. Error messages prefer one-based coordinates, produced by
//! [`LineCol::one_based`].

/// A zero-based line and column position within a source file.
///
/// The column counts UTF-8 bytes from the start of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LineCol {
    /// Zero-indexed line number.
    pub line: usize,
    /// Zero-indexed column number (byte offset within the line).
    pub column: usize,
}

impl LineCol {
    /// Creates a new line/column position.
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Returns one-based display coordinates.
    #[must_use]
    pub fn one_based(self) -> (u32, u32) {
        // Line/column numbers will realistically never exceed u32::MAX.
        let line = u32::try_from(self.line.saturating_add(1)).unwrap_or(u32::MAX);
        let column = u32::try_from(self.column.saturating_add(1)).unwrap_or(u32::MAX);
        (line, column)
    }
}

impl From<tree_sitter::Point> for LineCol {
    fn from(point: tree_sitter::Point) -> Self {
        Self::new(point.row, point.column)
    }
}

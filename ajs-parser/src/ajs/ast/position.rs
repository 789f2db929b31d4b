//! Line and column positions in unit definition source
//!
//! Lines and columns are 1-based. A line break counts once whatever its form
//! (`\r\n`, `\r` or `\n`), and the column restarts at 1 after it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A line:column position in source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// The first character of a source.
    pub const START: Position = Position { line: 1, column: 1 };

    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_creation() {
        let pos = Position::new(5, 10);
        assert_eq!(pos.line, 5);
        assert_eq!(pos.column, 10);
    }

    #[test]
    fn test_position_comparison() {
        assert!(Position::new(1, 9) < Position::new(2, 1));
        assert!(Position::new(2, 1) < Position::new(2, 3));
        assert_eq!(Position::new(3, 4), Position::new(3, 4));
    }

    #[test]
    fn test_position_display_and_default() {
        assert_eq!(Position::new(12, 7).to_string(), "line 12, column 7");
        assert_eq!(Position::default(), Position::new(1, 1));
    }
}

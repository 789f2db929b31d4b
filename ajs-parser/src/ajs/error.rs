//! Errors raised while reading and parsing unit definitions
//!
//! Parsing is fail-fast: the first unmet expectation aborts the whole parse and no
//! partial tree is returned. Decoding errors live in
//! [`decoding`](crate::ajs::decoding) because they never invalidate the tree.

use crate::ajs::ast::Position;
use std::io;
use thiserror::Error;

/// Errors that abort a parse
#[derive(Debug, Error)]
pub enum ParseError {
    /// The underlying source failed to deliver text
    #[error("read failure{}: {source}", at_position(.position))]
    Input {
        #[source]
        source: io::Error,
        position: Option<Position>,
    },
    /// The text does not follow the grammar
    #[error("line {line}, column {column}: {message}\n{}", format_snippet(.snippet, .column))]
    Syntax {
        message: String,
        line: usize,
        column: usize,
        snippet: String,
    },
}

impl ParseError {
    pub fn input(source: io::Error, position: Option<Position>) -> Self {
        ParseError::Input { source, position }
    }

    pub fn syntax(message: impl Into<String>, position: Position, snippet: impl Into<String>) -> Self {
        ParseError::Syntax {
            message: message.into(),
            line: position.line,
            column: position.column,
            snippet: snippet.into(),
        }
    }

    /// Where the failure happened, when known.
    pub fn position(&self) -> Option<Position> {
        match self {
            ParseError::Input { position, .. } => *position,
            ParseError::Syntax { line, column, .. } => Some(Position::new(*line, *column)),
        }
    }

    pub fn is_syntax(&self) -> bool {
        matches!(self, ParseError::Syntax { .. })
    }

    /// The bare message of a syntax error, without position or snippet.
    pub fn message(&self) -> Option<&str> {
        match self {
            ParseError::Syntax { message, .. } => Some(message),
            ParseError::Input { .. } => None,
        }
    }
}

/// Type alias for parse results
pub type ParseResult<T> = Result<T, ParseError>;

fn at_position(position: &Option<Position>) -> String {
    match position {
        Some(position) => format!(" at {}", position),
        None => String::new(),
    }
}

/// Render the offending line with a caret under the failing column.
///
/// Tabs are kept in the caret line so the caret stays aligned in terminals.
pub fn format_snippet(snippet: &str, column: &usize) -> String {
    let line = snippet.trim_end_matches(|ch: char| ch == '\r' || ch == '\n');
    let mut marker: String = line
        .chars()
        .take(column.saturating_sub(1))
        .map(|ch| if ch == '\t' { '\t' } else { ' ' })
        .collect();
    let padding = column.saturating_sub(1).saturating_sub(marker.chars().count());
    marker.extend(std::iter::repeat(' ').take(padding));
    marker.push('^');
    format!("  | {}\n  | {}", line, marker)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_display() {
        let err = ParseError::syntax("expected `;`", Position::new(2, 5), "ty=n}");
        insta::assert_snapshot!(err.to_string(), @r"
        line 2, column 5: expected `;`
          | ty=n}
          |     ^
        ");
    }

    #[test]
    fn test_snippet_past_end_of_line() {
        assert_eq!(format_snippet("ab", &5), "  | ab\n  |     ^");
    }

    #[test]
    fn test_input_error_display() {
        let err = ParseError::input(
            io::Error::new(io::ErrorKind::UnexpectedEof, "pipe closed"),
            Some(Position::new(4, 1)),
        );
        assert_eq!(err.to_string(), "read failure at line 4, column 1: pipe closed");
        assert_eq!(err.position(), Some(Position::new(4, 1)));
        assert!(!err.is_syntax());
    }
}

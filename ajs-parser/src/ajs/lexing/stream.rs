//! Character stream
//!
//!     [`CharacterStream`] walks a [`LineSource`] one character at a time and keeps the
//!     1-based line and column of the current character. Exactly one line is buffered;
//!     prefix tests such as [`CharacterStream::line_starts_with`] look at that buffer
//!     and never consume input.
//!
//! Line breaks
//!
//!     Whatever its form in the source, a line break reads as a single `'\n'`. Advancing
//!     past it increments the line number once and resets the column to 1.
//!     [`CharacterStream::rest_of_line`] and [`CharacterStream::line_break`] still
//!     return the original terminator.
//!
//! End of input
//!
//!     At end of input [`CharacterStream::current`] returns [`EOF`] (NUL) and advancing
//!     is a no-op. The line source is released as soon as it reports end of input or
//!     fails, never later.

use super::source::{LineSource, SourceLine};
use crate::ajs::ast::Position;
use crate::ajs::error::{ParseError, ParseResult};
use tracing::trace;

/// Sentinel returned by [`CharacterStream::current`] at end of input.
pub const EOF: char = '\0';

#[derive(Debug, Default)]
struct BufferedLine {
    text: String,
    chars: Vec<char>,
    terminator: &'static str,
}

impl From<SourceLine> for BufferedLine {
    fn from(line: SourceLine) -> Self {
        Self {
            chars: line.content.chars().collect(),
            text: line.content,
            terminator: line.terminator,
        }
    }
}

/// A character cursor over a line source
#[derive(Debug)]
pub struct CharacterStream<S> {
    source: Option<S>,
    line: BufferedLine,
    index: usize,
    line_number: usize,
    eof: bool,
}

impl<S: LineSource> CharacterStream<S> {
    /// Open the stream and buffer the first line.
    pub fn new(source: S) -> ParseResult<Self> {
        let mut stream = Self {
            source: Some(source),
            line: BufferedLine::default(),
            index: 0,
            line_number: 0,
            eof: false,
        };
        stream.fetch_line()?;
        Ok(stream)
    }

    /// The current character, `'\n'` on a line break, [`EOF`] at end of input.
    pub fn current(&self) -> char {
        if self.eof {
            EOF
        } else {
            self.line.chars.get(self.index).copied().unwrap_or('\n')
        }
    }

    /// Move forward one character and return the new current character.
    pub fn advance(&mut self) -> ParseResult<char> {
        if self.eof {
            return Ok(EOF);
        }
        self.index += 1;
        let line_end = if self.line.terminator.is_empty() {
            self.line.chars.len()
        } else {
            self.line.chars.len() + 1
        };
        if self.index >= line_end {
            self.fetch_line()?;
        }
        Ok(self.current())
    }

    /// Text of the current line without its terminator; `None` at end of input.
    pub fn line(&self) -> Option<&str> {
        (!self.eof).then_some(self.line.text.as_str())
    }

    pub fn line_number(&self) -> usize {
        self.line_number
    }

    pub fn column_number(&self) -> usize {
        self.index + 1
    }

    pub fn position(&self) -> Position {
        Position::new(self.line_number, self.column_number())
    }

    pub fn at_eof(&self) -> bool {
        self.eof
    }

    /// True on a line break and at end of input.
    pub fn at_eol(&self) -> bool {
        self.eof || self.index >= self.line.chars.len()
    }

    /// The line break as written in the source when the current character is one.
    pub fn line_break(&self) -> Option<&'static str> {
        let on_break = !self.eof && self.index >= self.line.chars.len();
        (on_break && !self.line.terminator.is_empty()).then_some(self.line.terminator)
    }

    /// From the current character to the end of the line, terminator included.
    pub fn rest_of_line(&self) -> String {
        if self.eof {
            return String::new();
        }
        let mut rest: String = self.line.chars[self.index.min(self.line.chars.len())..]
            .iter()
            .collect();
        rest.push_str(self.line.terminator);
        rest
    }

    /// Whether the rest of the line starts with `prefix`, without consuming anything.
    pub fn line_starts_with(&self, prefix: &str) -> bool {
        if self.eof {
            return prefix.is_empty();
        }
        let tail = self.line.chars.get(self.index..).unwrap_or_default();
        let mut rest = tail.iter().copied().chain(self.line.terminator.chars());
        prefix.chars().all(|expected| rest.next() == Some(expected))
    }

    /// The buffered line for error snippets; still the last line at end of input.
    pub fn snippet(&self) -> &str {
        &self.line.text
    }

    /// Build a syntax error at the current position.
    pub fn syntax_error(&self, message: impl Into<String>) -> ParseError {
        ParseError::syntax(message, self.position(), self.snippet())
    }

    fn fetch_line(&mut self) -> ParseResult<()> {
        let next = match self.source.as_mut() {
            Some(source) => source.next_line(),
            None => Ok(None),
        };
        match next {
            Ok(Some(line)) => {
                self.line = line.into();
                self.index = 0;
                self.line_number += 1;
                Ok(())
            }
            Ok(None) => {
                self.release();
                self.finish();
                Ok(())
            }
            Err(err) => {
                let position = Position::new(self.line_number + 1, 1);
                self.release();
                self.finish();
                Err(ParseError::input(err, Some(position)))
            }
        }
    }

    /// Park the cursor just past the last character of input.
    fn finish(&mut self) {
        self.eof = true;
        if self.line_number == 0 || !self.line.terminator.is_empty() {
            self.line_number += 1;
            self.line = BufferedLine::default();
            self.index = 0;
        } else {
            self.index = self.line.chars.len();
        }
    }

    fn release(&mut self) {
        if self.source.take().is_some() {
            trace!(line = self.line_number, "line source released");
        }
    }
}

//! Token scanner
//!
//!     Scanning primitives shared by the tuple and unit grammars. Every primitive is
//!     built from [`CharacterStream`] operations only and owns its own output buffer,
//!     so scans never share scratch state.
//!
//!     Primitives that stop at a character never consume it: after
//!     `scan_until(&[';'])` the current character is the `;`.

use super::options::{QuoteRule, ScannerOptions};
use super::source::{LineSource, StrSource};
use super::stream::{CharacterStream, EOF};
use crate::ajs::ast::Position;
use crate::ajs::error::{ParseError, ParseResult};

/// Human readable name of a character for error messages.
pub(crate) fn describe(ch: char) -> String {
    match ch {
        EOF => "end of input".to_string(),
        '\n' => "line break".to_string(),
        other => format!("`{}`", other),
    }
}

/// Scanning primitives over a character stream
#[derive(Debug)]
pub struct TokenScanner<S> {
    stream: CharacterStream<S>,
    options: ScannerOptions,
}

impl<S: LineSource> TokenScanner<S> {
    pub fn new(stream: CharacterStream<S>, options: ScannerOptions) -> Self {
        Self { stream, options }
    }

    pub fn options(&self) -> &ScannerOptions {
        &self.options
    }

    pub fn stream(&self) -> &CharacterStream<S> {
        &self.stream
    }

    pub fn current(&self) -> char {
        self.stream.current()
    }

    pub fn advance(&mut self) -> ParseResult<char> {
        self.stream.advance()
    }

    pub fn position(&self) -> Position {
        self.stream.position()
    }

    pub fn at_eof(&self) -> bool {
        self.stream.at_eof()
    }

    pub fn syntax_error(&self, message: impl Into<String>) -> ParseError {
        self.stream.syntax_error(message)
    }

    fn skip(&mut self, count: usize) -> ParseResult<()> {
        for _ in 0..count {
            self.stream.advance()?;
        }
        Ok(())
    }

    /// Skip characters up to and including the space, without looking at comments.
    pub fn skip_spaces(&mut self) -> ParseResult<()> {
        while !self.stream.at_eof() && self.stream.current() <= ' ' {
            self.stream.advance()?;
        }
        Ok(())
    }

    /// Skip whitespace and, when enabled, line and block comments in any order.
    pub fn skip_whitespace(&mut self) -> ParseResult<()> {
        loop {
            self.skip_spaces()?;
            if !self.options.skip_comments {
                return Ok(());
            }
            let line_comment = &self.options.line_comment;
            if !line_comment.is_empty() && self.stream.line_starts_with(line_comment) {
                while !self.stream.at_eol() {
                    self.stream.advance()?;
                }
                continue;
            }
            let start = &self.options.block_comment_start;
            let end = &self.options.block_comment_end;
            if !start.is_empty() && !end.is_empty() && self.stream.line_starts_with(start) {
                self.skip_block_comment()?;
                continue;
            }
            return Ok(());
        }
    }

    fn skip_block_comment(&mut self) -> ParseResult<()> {
        let opened = self.position();
        let start_len = self.options.block_comment_start.chars().count();
        let end_len = self.options.block_comment_end.chars().count();
        self.skip(start_len)?;
        loop {
            if self.stream.at_eof() {
                return Err(self.syntax_error(format!(
                    "unterminated block comment opened at line {}, column {}",
                    opened.line, opened.column
                )));
            }
            if self.stream.line_starts_with(&self.options.block_comment_end) {
                return self.skip(end_len);
            }
            self.stream.advance()?;
        }
    }

    /// Collect characters while `accept` holds; stops at end of input.
    pub fn scan_while(&mut self, mut accept: impl FnMut(char) -> bool) -> ParseResult<String> {
        let mut text = String::new();
        while !self.stream.at_eof() && accept(self.stream.current()) {
            text.push(self.stream.current());
            self.stream.advance()?;
        }
        Ok(text)
    }

    /// Collect characters until one of `stops` (or end of input) is current.
    pub fn scan_until(&mut self, stops: &[char]) -> ParseResult<String> {
        self.scan_while(|ch| !stops.contains(&ch))
    }

    pub fn scan_letters(&mut self) -> ParseResult<String> {
        self.scan_while(char::is_alphabetic)
    }

    pub fn scan_alphanumeric(&mut self) -> ParseResult<String> {
        self.scan_while(char::is_alphanumeric)
    }

    /// Consume `expected` if the input continues with it; otherwise fail without
    /// consuming anything.
    pub fn scan_word(&mut self, expected: &str) -> ParseResult<()> {
        if !self.stream.line_starts_with(expected) {
            return Err(self.syntax_error(format!("word not found: expected `{}`", expected)));
        }
        self.skip(expected.chars().count())
    }

    /// Consume `expected` as the current character.
    pub fn expect_char(&mut self, expected: char) -> ParseResult<()> {
        let found = self.stream.current();
        if found != expected || self.stream.at_eof() {
            return Err(self.syntax_error(format!(
                "expected `{}`, found {}",
                expected,
                describe(found)
            )));
        }
        self.stream.advance()?;
        Ok(())
    }

    /// The quote rule for the current character, if it opens quoted text.
    pub fn quote_rule_at_current(&self) -> Option<QuoteRule> {
        if self.stream.at_eof() {
            return None;
        }
        self.options.quote_rule(self.stream.current())
    }

    /// Scan quoted text starting at the current quote character, returning the text
    /// with quotes and escapes removed along with the rule that applied. Line breaks
    /// inside the quotes keep their original form.
    pub fn scan_quoted_string(&mut self) -> ParseResult<(String, QuoteRule)> {
        let rule = self.quote_rule_at_current().ok_or_else(|| {
            self.syntax_error(format!(
                "expected quoted text, found {}",
                describe(self.stream.current())
            ))
        })?;
        let opened = self.position();
        self.stream.advance()?;
        let mut text = String::new();
        loop {
            if self.stream.at_eof() {
                return Err(self.syntax_error(format!(
                    "unterminated quoted text opened at line {}, column {}",
                    opened.line, opened.column
                )));
            }
            let ch = self.stream.current();
            if ch == rule.quote {
                self.stream.advance()?;
                if rule.is_doubling() && !self.stream.at_eof() && self.stream.current() == rule.quote {
                    text.push(rule.quote);
                    self.stream.advance()?;
                    continue;
                }
                return Ok((text, rule));
            }
            if !rule.is_doubling() && ch == rule.escape {
                self.stream.advance()?;
                if self.stream.at_eof() {
                    continue;
                }
            }
            match self.stream.line_break() {
                Some(terminator) => text.push_str(terminator),
                None => text.push(self.stream.current()),
            }
            self.stream.advance()?;
        }
    }
}

impl QuoteRule {
    /// Read quoted text written with this rule back to its content.
    pub fn unescape(&self, quoted: &str) -> ParseResult<String> {
        let options = ScannerOptions {
            skip_comments: false,
            quotes: vec![*self],
            ..ScannerOptions::default()
        };
        let stream = CharacterStream::new(StrSource::new(quoted))?;
        let mut scanner = TokenScanner::new(stream, options);
        let (text, _) = scanner.scan_quoted_string()?;
        if !scanner.at_eof() {
            return Err(scanner.syntax_error("unexpected text after closing quote"));
        }
        Ok(text)
    }
}

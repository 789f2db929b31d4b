//! Tuple grammar
//!
//!     "(" [ <entry> ("," <entry>)* ] ")"
//!     <entry> = <key> "=" <value> | <value>
//!
//!     Keys and values are read up to the next `,`, `)` or `=` and trimmed. A key-less
//!     entry must not be empty; a keyed entry may have an empty value (`f=`). A second
//!     `=` inside one entry, a missing `)` and trailing text after a standalone tuple
//!     are syntax errors.

use crate::ajs::ast::{Tuple, TupleEntry};
use crate::ajs::error::ParseResult;
use crate::ajs::lexing::scanner::describe;
use crate::ajs::lexing::{CharacterStream, LineSource, ScannerOptions, StrSource, TokenScanner};

const ENTRY_STOPS: [char; 3] = [',', ')', '='];

/// Parse a tuple starting at the current `(`; stops right after the closing `)`.
pub(crate) fn parse_tuple<S: LineSource>(scanner: &mut TokenScanner<S>) -> ParseResult<Tuple> {
    let opened = scanner.position();
    scanner.expect_char('(')?;
    if scanner.current() == ')' {
        scanner.advance()?;
        return Ok(Tuple::empty());
    }

    let mut entries = Vec::new();
    loop {
        let first = scanner.scan_until(&ENTRY_STOPS)?;
        let entry = if !scanner.at_eof() && scanner.current() == '=' {
            scanner.advance()?;
            let key = first.trim();
            if key.is_empty() {
                return Err(scanner.syntax_error("tuple entry has an empty key"));
            }
            let value = scanner.scan_until(&ENTRY_STOPS)?;
            if !scanner.at_eof() && scanner.current() == '=' {
                return Err(scanner.syntax_error(format!(
                    "unexpected `=` in the value of tuple key `{}`",
                    key
                )));
            }
            TupleEntry::keyed(key, value.trim())
        } else {
            TupleEntry::bare(first.trim())
        };

        if scanner.at_eof() {
            return Err(scanner.syntax_error(format!(
                "unterminated tuple opened at line {}, column {}",
                opened.line, opened.column
            )));
        }
        if entry.key().is_none() && entry.value().is_empty() {
            return Err(scanner.syntax_error("empty tuple entry"));
        }
        entries.push(entry);

        match scanner.current() {
            ')' => {
                scanner.advance()?;
                return Ok(Tuple::new(entries));
            }
            ',' => {
                scanner.advance()?;
            }
            other => {
                return Err(scanner.syntax_error(format!(
                    "expected `,` or `)` in tuple, found {}",
                    describe(other)
                )))
            }
        }
    }
}

/// Parse a standalone tuple literal such as `(f=A,t=B,seq)`.
///
/// Surrounding whitespace is allowed; anything else after the closing `)` is not.
pub fn parse_tuple_text(text: &str) -> ParseResult<Tuple> {
    let stream = CharacterStream::new(StrSource::new(text))?;
    let mut scanner = TokenScanner::new(stream, ScannerOptions::default().with_comments(false));
    scanner.skip_spaces()?;
    let tuple = parse_tuple(&mut scanner)?;
    scanner.skip_spaces()?;
    if !scanner.at_eof() {
        return Err(scanner.syntax_error(format!(
            "unexpected {} after tuple",
            describe(scanner.current())
        )));
    }
    Ok(tuple)
}

//! Parsing unit definitions
//!
//!     Source text flows through three layers:
//!         1. A [`LineSource`] yields physical lines (from memory or from a byte reader
//!            decoded with an explicit encoding).
//!         2. The [lexing](crate::ajs::lexing) layer turns lines into characters with
//!            positions and offers scanning primitives.
//!         3. The [tuple](tuple) and [unit](unit) grammars compose those primitives into
//!            a tree of [`UnitDraft`](crate::ajs::ast::tree::UnitDraft)s, moved into a
//!            [`UnitTree`] at the end.
//!
//!     The parse is one synchronous pass. It either returns a complete tree or the first
//!     error; there is no recovery and no partial result.
//!
//! Sibling names
//!
//!     Sibling units are expected to have distinct names but the grammar accepts
//!     duplicates. Lookups by name resolve to the first match and the parse logs a
//!     warning for every duplicate it finds.
//!
//! Quotes inside raw values
//!
//!     The default options register both `"` and `'` as quote characters with `#` as
//!     the escape prefix. Either one opens an embedded quoted substring even in the
//!     middle of a raw value, so a lone apostrophe (`cm=it's late;`) opens quoted text
//!     that is never closed and the parse fails. Write such values quoted
//!     (`cm="it's late";`) or escape the apostrophe inside a quoted substring.

pub mod tuple;
pub mod unit;

pub use tuple::parse_tuple_text;

use crate::ajs::ast::UnitTree;
use crate::ajs::error::{ParseError, ParseResult};
use crate::ajs::lexing::{
    CharacterStream, LineSource, QuoteRule, ReaderSource, ScannerOptions, StrSource, TokenScanner,
};
use encoding_rs::Encoding;
use once_cell::sync::Lazy;
use std::io::{BufReader, Read};
use tracing::{debug, warn};
use unit::UnitGrammar;

/// Options for the unit grammar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    pub scanner: ScannerOptions,
}

impl ParseOptions {
    pub fn new(scanner: ScannerOptions) -> Self {
        Self { scanner }
    }

    /// Use `escape` as the prefix inside both kinds of quoted text.
    pub fn with_escape(mut self, escape: char) -> Self {
        self.scanner = self
            .scanner
            .with_quote(QuoteRule::new('"', escape))
            .with_quote(QuoteRule::new('\'', escape));
        self
    }

    pub fn with_comments(mut self, skip_comments: bool) -> Self {
        self.scanner = self.scanner.with_comments(skip_comments);
        self
    }
}

impl Default for ParseOptions {
    /// Comments enabled, `#` as the escape prefix inside quotes.
    fn default() -> Self {
        Self {
            scanner: ScannerOptions::default()
                .with_quote(QuoteRule::UNIT_DOUBLE)
                .with_quote(QuoteRule::UNIT_SINGLE),
        }
    }
}

static DEFAULT_OPTIONS: Lazy<ParseOptions> = Lazy::new(ParseOptions::default);

/// Parse unit definitions held in memory.
pub fn parse(text: &str) -> ParseResult<UnitTree> {
    parse_with(text, &DEFAULT_OPTIONS)
}

pub fn parse_with(text: &str, options: &ParseOptions) -> ParseResult<UnitTree> {
    parse_source(StrSource::new(text), options)
}

/// Parse unit definitions from a byte reader decoded with `encoding`.
///
/// `encoding` must be ASCII-compatible (UTF-8, Shift_JIS, EUC-JP, ...); anything else
/// fails with an input error before reading.
pub fn parse_reader<R: Read>(reader: R, encoding: &'static Encoding) -> ParseResult<UnitTree> {
    parse_reader_with(reader, encoding, &DEFAULT_OPTIONS)
}

pub fn parse_reader_with<R: Read>(
    reader: R,
    encoding: &'static Encoding,
    options: &ParseOptions,
) -> ParseResult<UnitTree> {
    let source = ReaderSource::new(BufReader::new(reader), encoding)
        .map_err(|err| ParseError::input(err, None))?;
    parse_source(source, options)
}

/// Parse from any line source. The source is dropped before this returns, on success
/// and on failure alike.
pub fn parse_source<S: LineSource>(source: S, options: &ParseOptions) -> ParseResult<UnitTree> {
    let stream = CharacterStream::new(source)?;
    let mut grammar = UnitGrammar::new(TokenScanner::new(stream, options.scanner.clone()));
    let drafts = grammar.parse_document()?;
    let lines = grammar.line_count();
    drop(grammar);

    let tree = UnitTree::from_drafts(drafts);
    debug!(units = tree.len(), roots = tree.root_ids().len(), lines, "parsed unit definitions");
    for name in tree.duplicate_siblings() {
        warn!(unit = %name, "sibling units share a name; lookups resolve to the first");
    }
    Ok(tree)
}

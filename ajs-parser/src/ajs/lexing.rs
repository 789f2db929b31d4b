//! Lexing layer
//!
//!     Unit definitions are scanned character by character. There is no separate token
//!     stream: the grammars drive a [`TokenScanner`], which is a thin set of primitives
//!     (skip whitespace and comments, match a word, scan a quoted string, scan until a
//!     stop character) over a [`CharacterStream`].
//!
//!     The stream pulls physical lines from a [`LineSource`]. Text held in memory and
//!     byte readers decoded with an explicit encoding are both line sources, and both
//!     yield identical line and column numbering.

pub mod options;
pub mod scanner;
pub mod source;
pub mod stream;

pub use options::{QuoteRule, ScannerOptions};
pub use scanner::TokenScanner;
pub use source::{LineSource, ReaderSource, StrSource};
pub use stream::CharacterStream;

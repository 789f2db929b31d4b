//! Unit definition loading
//!
//! `UnitLoader` reads unit definitions from a file, a reader or a string with a fixed
//! encoding and parse options, then parses them. The encoding is UTF-8 unless one is
//! set; the platform's locale never decides it.
//!
//! # Example
//!
//! ```rust,ignore
//! use ajs_parser::ajs::loader::UnitLoader;
//!
//! let tree = UnitLoader::new()
//!     .with_encoding_label("Shift_JIS")?
//!     .load_path("export/NET1.txt")?;
//! ```

use crate::ajs::ast::UnitTree;
use crate::ajs::error::ParseError;
use crate::ajs::parsing::{parse_reader_with, parse_with, ParseOptions};
use encoding_rs::{Encoding, UTF_8};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when loading unit definitions
#[derive(Debug, Error)]
pub enum LoaderError {
    /// The file could not be opened
    #[error("cannot open {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    /// No encoding is known by this label, or it cannot carry unit definitions
    #[error("unsupported encoding `{0}`")]
    Encoding(String),
    /// Reading or parsing failed
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Loads and parses unit definitions with fixed options
#[derive(Debug, Clone)]
pub struct UnitLoader {
    options: ParseOptions,
    encoding: &'static Encoding,
}

impl Default for UnitLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitLoader {
    pub fn new() -> Self {
        Self {
            options: ParseOptions::default(),
            encoding: UTF_8,
        }
    }

    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    /// Decode bytes with `encoding`, which must be ASCII-compatible.
    pub fn with_encoding(mut self, encoding: &'static Encoding) -> Result<Self, LoaderError> {
        if !encoding.is_ascii_compatible() {
            return Err(LoaderError::Encoding(encoding.name().to_string()));
        }
        self.encoding = encoding;
        Ok(self)
    }

    /// Pick the encoding by WHATWG label (`utf-8`, `shift_jis`, `euc-jp`, ...).
    pub fn with_encoding_label(self, label: &str) -> Result<Self, LoaderError> {
        let encoding = Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| LoaderError::Encoding(label.to_string()))?;
        self.with_encoding(encoding)
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Parse a file. The file is closed before this returns, whatever the outcome.
    pub fn load_path<P: AsRef<Path>>(&self, path: P) -> Result<UnitTree, LoaderError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| LoaderError::Io {
            path: path.display().to_string(),
            source,
        })?;
        debug!(path = %path.display(), encoding = self.encoding.name(), "loading unit definitions");
        self.load_reader(file)
    }

    pub fn load_reader<R: Read>(&self, reader: R) -> Result<UnitTree, LoaderError> {
        Ok(parse_reader_with(reader, self.encoding, &self.options)?)
    }

    /// Parse text already decoded; the loader's encoding plays no part.
    pub fn load_str(&self, text: &str) -> Result<UnitTree, LoaderError> {
        Ok(parse_with(text, &self.options)?)
    }
}

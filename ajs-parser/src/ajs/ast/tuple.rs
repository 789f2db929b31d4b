//! Tuple element
//!
//!     A tuple is a parenthesized, comma separated list of entries. Each entry is
//!     either a bare value or a `key=value` pair. Tuples carry structured values such
//!     as relations between units and execution cycles.
//!
//! Syntax
//!
//!     "(" <entry> ("," <entry>)* ")"
//!     <entry> = <raw> ["=" <raw>]
//!
//!     Examples:
//!         (f=JOB1,t=JOB2)
//!         (2,m)
//!         ()
//!
//!     Entry order is significant: positional values ("from", "to", interval then
//!     unit) are read by index.

use crate::ajs::error::ParseError;
use crate::ajs::parsing::tuple::parse_tuple_text;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One entry of a tuple: an optional key and a mandatory value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TupleEntry {
    key: Option<String>,
    value: String,
}

impl TupleEntry {
    pub fn new(key: Option<String>, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }

    pub fn keyed(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(Some(key.into()), value)
    }

    pub fn bare(value: impl Into<String>) -> Self {
        Self::new(None, value)
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for TupleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.key {
            Some(key) => write!(f, "{}={}", key, self.value),
            None => f.write_str(&self.value),
        }
    }
}

/// An ordered sequence of tuple entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tuple {
    entries: Vec<TupleEntry>,
}

impl Tuple {
    pub fn new(entries: Vec<TupleEntry>) -> Self {
        Self { entries }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[TupleEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TupleEntry> {
        self.entries.iter()
    }

    /// Entry at `index`, in textual order.
    pub fn entry(&self, index: usize) -> Option<&TupleEntry> {
        self.entries.get(index)
    }

    /// Value of the entry at `index`, keyed or not.
    pub fn value_at(&self, index: usize) -> Option<&str> {
        self.entry(index).map(TupleEntry::value)
    }

    /// Value of the first entry whose key is `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.key() == Some(key))
            .map(TupleEntry::value)
    }

    /// Values of the key-less entries, in order.
    pub fn bare_values(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|entry| entry.key.is_none())
            .map(TupleEntry::value)
    }
}

impl<'a> IntoIterator for &'a Tuple {
    type Item = &'a TupleEntry;
    type IntoIter = std::slice::Iter<'a, TupleEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (index, entry) in self.entries.iter().enumerate() {
            if index > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", entry)?;
        }
        f.write_str(")")
    }
}

impl FromStr for Tuple {
    type Err = ParseError;

    /// Parse a standalone tuple literal such as `(f=A,t=B)`.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        parse_tuple_text(text)
    }
}

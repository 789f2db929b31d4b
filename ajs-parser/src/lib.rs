//! # ajs
//!
//! A parser for job scheduler unit definition files.
//!
//! File Layout
//!
//!     src/ajs/lexing     Character stream with line/column tracking and the token scanner
//!     src/ajs/parsing    Tuple and unit grammars, the `parse` entry points
//!     src/ajs/ast        The unit tree produced by parsing
//!     src/ajs/decoding   Decoders that turn raw parameter values into typed objects
//!     src/ajs/loader     File and reader loading with an explicit encoding
//!
//! Consumers talk to the core through two calls only: [`parse`] producing a
//! [`UnitTree`], and [`Parameter::decode`] turning one parameter into a typed value.

pub mod ajs;

pub use ajs::ast::{
    Parameter, ParameterValue, Position, Tuple, TupleEntry, Unit, UnitId, UnitTree, UnitType,
};
pub use ajs::decoding::{decoder_for, DecodeError, DecodeResult, Decoder, FromParameter};
pub use ajs::error::{ParseError, ParseResult};
pub use ajs::loader::{LoaderError, UnitLoader};
pub use ajs::parsing::{parse, parse_reader, parse_reader_with, parse_with, ParseOptions};

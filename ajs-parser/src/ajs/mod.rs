//! Main module for ajs library functionality

pub mod ast;
pub mod decoding;
pub mod error;
pub mod lexing;
pub mod loader;
pub mod parsing;

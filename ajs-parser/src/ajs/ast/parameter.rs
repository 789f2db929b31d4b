//! Parameter element
//!
//!     A parameter is one named configuration entry of a unit, carrying one or more
//!     values. Names are not unique within a unit: `el`, `ar` and the schedule
//!     parameters repeat once per element, relation or rule.
//!
//! Syntax
//!
//!     <name> "=" <value> ("," <value>)* ";"
//!
//!     Examples:
//!         ty=n;
//!         sd=1,2024/04/01;
//!         el=JOB1,j,+240 +144;
//!         ar=(f=JOB1,t=JOB2);
//!
//!     A parameter knows its owning unit by [`UnitId`] only; the tree resolves the
//!     handle when a decoded value names a sibling or child unit.

use super::position::Position;
use super::tree::UnitId;
use super::value::ParameterValue;
use crate::ajs::decoding::{DecodeResult, Decoder};
use std::fmt;
use tracing::debug;

/// A named, multi-valued configuration entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    name: String,
    values: Vec<ParameterValue>,
    owner: Option<UnitId>,
    position: Position,
}

impl Parameter {
    /// A parameter with a single value.
    pub fn new(name: impl Into<String>, value: ParameterValue) -> Self {
        Self {
            name: name.into(),
            values: vec![value],
            owner: None,
            position: Position::default(),
        }
    }

    /// A parameter with the given values, or `None` when `values` is empty.
    pub fn with_values(name: impl Into<String>, values: Vec<ParameterValue>) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        Some(Self {
            name: name.into(),
            values,
            owner: None,
            position: Position::default(),
        })
    }

    /// Shorthand for a parameter whose values are all raw text.
    pub fn raw<I, S>(name: impl Into<String>, values: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_values(name, values.into_iter().map(ParameterValue::raw).collect())
    }

    /// Set the source position of the parameter name.
    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub(crate) fn set_owner(&mut self, owner: UnitId) {
        self.owner = Some(owner);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[ParameterValue] {
        &self.values
    }

    pub fn value(&self, index: usize) -> Option<&ParameterValue> {
        self.values.get(index)
    }

    /// The first value; every parameter has at least one.
    pub fn first_value(&self) -> &ParameterValue {
        &self.values[0]
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false; kept for symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Handle of the owning unit, once the parameter belongs to a tree.
    pub fn owner(&self) -> Option<UnitId> {
        self.owner
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Values in source form joined by `,`, as they follow `name=` in the file.
    pub fn raw_text(&self) -> String {
        self.values
            .iter()
            .map(|value| value.source_text())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Run a decoder over this parameter's values.
    pub fn decode<D: Decoder>(&self, decoder: D) -> DecodeResult<D::Output> {
        decoder.decode(self).map_err(|err| {
            debug!(parameter = %self.name, owner = ?self.owner, reason = err.reason(), "decode failed");
            err
        })
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={};", self.name, self.raw_text())
    }
}

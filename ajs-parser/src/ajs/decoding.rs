//! Value decoders
//!
//!     A decoder turns the values of one [`Parameter`] into a typed object. Decoders
//!     run on demand, after parsing, and only look at the values they are given: a
//!     failure is local to that call and never invalidates the tree.
//!
//!     Decoded objects are not cached and keep no reference to their parameter.
//!
//! Fields
//!
//!     Most parameters read as a comma separated list of fields, but the parser may
//!     have split them into several values or kept them as one (`sd=0,ud` has two raw
//!     values; `Parameter::raw("sd", ["0, ud"])` has one). Decoders therefore work on
//!     [`fields`](fields::fields): every value split at top-level commas and trimmed,
//!     so both spellings decode alike.
//!
//! Rule numbers
//!
//!     Schedule parameters accept an optional leading rule number (`sd=2,...`). It
//!     defaults to 1 and ranges over 1 to 144; only `sd=0,ud` uses 0.
//!
//! Catalogue
//!
//!     sd        [`StartDate`]          schedule::StartDate
//!     st        [`StartTime`]
//!     cy        [`ExecutionCycle`]
//!     sh        [`ClosedDayShift`]
//!     shd       [`ShiftDays`]
//!     ln        [`LinkedRule`]
//!     sy, ey    [`DelayTime`]
//!     el        [`Element`]
//!     sz        [`MapSize`]
//!     ar        [`Relation`]
//!     fd, pr    [`IntegerDecoder`]
//!     ty        [`UnitTypeDecoder`]
//!     cm, ...   [`TextDecoder`]

pub mod delay;
pub mod fields;
pub mod layout;
pub mod scalar;
pub mod schedule;

pub use delay::{DelayTime, DelayTiming, RelativeBase};
pub use fields::RuleNumber;
pub use layout::{Element, MapSize, Relation, RelationKind};
pub use scalar::{IntegerDecoder, TextDecoder, UnitTypeDecoder};
pub use schedule::{
    ClosedDayShift, CycleUnit, DayCounting, DaySpec, Designation, ExecutionCycle, LinkedRule,
    ScheduledDate, ShiftDays, ShiftDirection, StartDate, StartTime, TimeOfDay, WeekOfMonth,
    Weekday,
};

use crate::ajs::ast::Parameter;
use std::marker::PhantomData;
use thiserror::Error;

/// A parameter whose values do not follow its decoder's grammar
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot decode `{parameter}` value `{raw}`: {reason}")]
pub struct DecodeError {
    parameter: String,
    raw: String,
    reason: String,
}

impl DecodeError {
    pub fn new(parameter: &Parameter, reason: impl Into<String>) -> Self {
        Self {
            parameter: parameter.name().to_string(),
            raw: parameter.raw_text(),
            reason: reason.into(),
        }
    }

    /// Name of the parameter that failed to decode.
    pub fn parameter(&self) -> &str {
        &self.parameter
    }

    /// The offending values as written in source.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

pub type DecodeResult<T> = Result<T, DecodeError>;

/// Turns one parameter into a typed value
pub trait Decoder {
    type Output;

    fn decode(&self, parameter: &Parameter) -> DecodeResult<Self::Output>;
}

impl<T, F> Decoder for F
where
    F: Fn(&Parameter) -> DecodeResult<T>,
{
    type Output = T;

    fn decode(&self, parameter: &Parameter) -> DecodeResult<T> {
        self(parameter)
    }
}

/// Types with a canonical decoder
pub trait FromParameter: Sized {
    fn from_parameter(parameter: &Parameter) -> DecodeResult<Self>;
}

/// The canonical decoder of `T`, see [`decoder_for`]
#[derive(Debug)]
pub struct DecoderFor<T>(PhantomData<fn() -> T>);

impl<T> Clone for DecoderFor<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for DecoderFor<T> {}

/// `parameter.decode(decoder_for::<StartDate>())`
pub const fn decoder_for<T: FromParameter>() -> DecoderFor<T> {
    DecoderFor(PhantomData)
}

impl<T: FromParameter> Decoder for DecoderFor<T> {
    type Output = T;

    fn decode(&self, parameter: &Parameter) -> DecodeResult<T> {
        T::from_parameter(parameter)
    }
}

/// Run a grammar over the parameter's fields, attaching the parameter to the failure.
pub(crate) fn decode_fields<T>(
    parameter: &Parameter,
    grammar: impl FnOnce(Vec<String>) -> Result<T, String>,
) -> DecodeResult<T> {
    grammar(fields::fields(parameter)).map_err(|reason| DecodeError::new(parameter, reason))
}

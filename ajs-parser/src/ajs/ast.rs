//! Unit tree data model
//!
//!     Parsing produces a [`UnitTree`]: an arena owning every [`Unit`] of one source,
//!     addressed through [`UnitId`] handles. Units keep their parameters in source
//!     order; a parameter name may repeat within one unit.
//!
//! Ownership
//!
//!     The tree owns its units, a unit owns its parameters, and a parameter refers back
//!     to its owning unit only through a `UnitId`. Nothing in the model holds a strong
//!     reference upwards, so the tree is a plain value that can be cloned, sent across
//!     threads and shared immutably.
//!
//! Values
//!
//!     A parameter has one or more [`ParameterValue`]s, a closed union over raw text,
//!     quoted text and [`Tuple`] literals. The variant is fixed at parse time from the
//!     first character of the value.

pub mod parameter;
pub mod position;
pub mod snapshot;
pub mod tree;
pub mod tuple;
pub mod unit;
pub mod unit_type;
pub mod value;

pub use parameter::Parameter;
pub use position::Position;
pub use snapshot::{ParameterSnapshot, UnitSnapshot};
pub use tree::{UnitId, UnitTree};
pub use tuple::{Tuple, TupleEntry};
pub use unit::{Unit, UnitHeader};
pub use unit_type::{UnitKind, UnitType};
pub use value::{ParameterValue, ValueKind};

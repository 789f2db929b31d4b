//! Unit element
//!
//!     A unit is one node of a job definition: a job group, a jobnet or a job. It has
//!     a header of up to four attributes, an ordered parameter list and nested units.
//!
//! Syntax
//!
//!     "unit" "=" <name> ["," <permission> ["," <owner> ["," <resource-group>]]] ";"
//!     "{" <parameter>* <unit>* "}"
//!
//!     Example:
//!         unit=NET1,,jp1admin,;
//!         {
//!             ty=n;
//!             unit=JOB1,,,;{ty=j;sc="/opt/batch/run.sh";}
//!         }
//!
//!     The `ty` parameter is mandatory: its first value is the unit's type code.

use super::parameter::Parameter;
use super::position::Position;
use super::tree::UnitId;
use super::unit_type::UnitType;

/// The attribute fields between `unit=` and `;`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitHeader {
    pub name: String,
    pub permission: Option<String>,
    pub owner: Option<String>,
    pub resource_group: Option<String>,
}

impl UnitHeader {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A finalized unit inside a [`UnitTree`](super::UnitTree)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub(super) id: UnitId,
    pub(super) header: UnitHeader,
    pub(super) type_code: String,
    pub(super) parameters: Vec<Parameter>,
    pub(super) children: Vec<UnitId>,
    pub(super) parent: Option<UnitId>,
    pub(super) fully_qualified_name: String,
    pub(super) position: Position,
}

impl Unit {
    pub fn id(&self) -> UnitId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.header.name
    }

    pub fn header(&self) -> &UnitHeader {
        &self.header
    }

    pub fn permission(&self) -> Option<&str> {
        self.header.permission.as_deref()
    }

    /// The owning user identity from the header.
    pub fn owner(&self) -> Option<&str> {
        self.header.owner.as_deref()
    }

    pub fn resource_group(&self) -> Option<&str> {
        self.header.resource_group.as_deref()
    }

    /// The raw type code, the first value of `ty`.
    pub fn type_code(&self) -> &str {
        &self.type_code
    }

    pub fn unit_type(&self) -> UnitType {
        UnitType::from_code(&self.type_code)
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// All parameters called `name`, in source order.
    pub fn parameters_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Parameter> {
        self.parameters.iter().filter(move |param| param.name() == name)
    }

    /// The first parameter called `name`.
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|param| param.name() == name)
    }

    pub fn child_ids(&self) -> &[UnitId] {
        &self.children
    }

    pub fn parent_id(&self) -> Option<UnitId> {
        self.parent
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// `/`-joined names from the root down to this unit.
    pub fn fully_qualified_name(&self) -> &str {
        &self.fully_qualified_name
    }

    /// Position of the `unit` keyword that opens this unit.
    pub fn position(&self) -> Position {
        self.position
    }
}

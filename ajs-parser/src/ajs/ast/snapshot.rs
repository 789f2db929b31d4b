//! Unit snapshot - a serializable projection of a unit subtree
//!
//! Tooling that wants JSON (or any serde format) consumes [`UnitSnapshot`] rather than
//! walking the arena itself. Parameter values are kept in source form, so a snapshot
//! shows exactly what the file said.

use super::tree::UnitTree;
use super::unit::Unit;
use serde::{Deserialize, Serialize};

/// A parameter as name plus source-form values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSnapshot {
    pub name: String,
    pub values: Vec<String>,
}

/// A unit and its descendants in a normalized, serializable form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSnapshot {
    pub name: String,
    pub fully_qualified_name: String,
    pub unit_type: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub permission: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub resource_group: Option<String>,
    pub parameters: Vec<ParameterSnapshot>,
    pub children: Vec<UnitSnapshot>,
}

impl UnitSnapshot {
    pub(super) fn from_unit(tree: &UnitTree, unit: &Unit) -> Self {
        Self {
            name: unit.name().to_string(),
            fully_qualified_name: unit.fully_qualified_name().to_string(),
            unit_type: unit.type_code().to_string(),
            permission: unit.permission().map(str::to_string),
            owner: unit.owner().map(str::to_string),
            resource_group: unit.resource_group().map(str::to_string),
            parameters: unit
                .parameters()
                .iter()
                .map(|param| ParameterSnapshot {
                    name: param.name().to_string(),
                    values: param
                        .values()
                        .iter()
                        .map(|value| value.source_text().into_owned())
                        .collect(),
                })
                .collect(),
            children: tree
                .children(unit.id())
                .map(|child| Self::from_unit(tree, child))
                .collect(),
        }
    }

    /// Number of units in this subtree, including itself.
    pub fn unit_count(&self) -> usize {
        1 + self.children.iter().map(UnitSnapshot::unit_count).sum::<usize>()
    }
}

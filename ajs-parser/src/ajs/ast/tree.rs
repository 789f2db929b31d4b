//! Unit arena
//!
//!     The grammar finalizes units bottom-up into [`UnitDraft`]s. Once the whole source
//!     is read the drafts are moved into a [`UnitTree`], which assigns every unit a
//!     [`UnitId`] in depth-first pre-order and points each parameter back at its owner.
//!     The tree is immutable from then on.

use super::parameter::Parameter;
use super::position::Position;
use super::snapshot::UnitSnapshot;
use super::unit::{Unit, UnitHeader};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::ops::Index;

/// Handle of a unit inside its [`UnitTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnitId(usize);

impl UnitId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A unit whose closing brace has been read, not yet placed in a tree
#[derive(Debug, Clone)]
pub(crate) struct UnitDraft {
    pub header: UnitHeader,
    pub type_code: String,
    pub parameters: Vec<Parameter>,
    pub children: Vec<UnitDraft>,
    pub fully_qualified_name: String,
    pub position: Position,
}

/// All units parsed from one source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitTree {
    units: Vec<Unit>,
    roots: Vec<UnitId>,
}

impl UnitTree {
    pub(crate) fn from_drafts(drafts: Vec<UnitDraft>) -> Self {
        let mut tree = UnitTree {
            units: Vec::new(),
            roots: Vec::with_capacity(drafts.len()),
        };
        for draft in drafts {
            let id = tree.insert(draft, None);
            tree.roots.push(id);
        }
        tree
    }

    fn insert(&mut self, draft: UnitDraft, parent: Option<UnitId>) -> UnitId {
        let id = UnitId(self.units.len());
        let UnitDraft {
            header,
            type_code,
            mut parameters,
            children,
            fully_qualified_name,
            position,
        } = draft;
        for param in &mut parameters {
            param.set_owner(id);
        }
        self.units.push(Unit {
            id,
            header,
            type_code,
            parameters,
            children: Vec::with_capacity(children.len()),
            parent,
            fully_qualified_name,
            position,
        });
        let child_ids: Vec<UnitId> = children
            .into_iter()
            .map(|child| self.insert(child, Some(id)))
            .collect();
        self.units[id.0].children = child_ids;
        id
    }

    /// Top-level units, in source order.
    pub fn roots(&self) -> impl Iterator<Item = &Unit> {
        self.roots.iter().map(move |id| &self.units[id.0])
    }

    pub fn root_ids(&self) -> &[UnitId] {
        &self.roots
    }

    /// The first top-level unit. A parsed tree always has one.
    pub fn root(&self) -> Option<&Unit> {
        self.roots.first().map(|id| &self.units[id.0])
    }

    pub fn get(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(id.0)
    }

    /// Number of units at every depth.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Every unit, depth-first in source order.
    pub fn iter(&self) -> std::slice::Iter<'_, Unit> {
        self.units.iter()
    }

    pub fn parent(&self, id: UnitId) -> Option<&Unit> {
        self.get(id)?.parent.map(|parent| &self.units[parent.0])
    }

    pub fn children(&self, id: UnitId) -> impl Iterator<Item = &Unit> {
        self.get(id)
            .map(|unit| unit.children.as_slice())
            .unwrap_or_default()
            .iter()
            .map(move |child| &self.units[child.0])
    }

    /// The first child of `id` called `name`.
    pub fn child_named(&self, id: UnitId, name: &str) -> Option<&Unit> {
        self.children(id).find(|child| child.name() == name)
    }

    /// Look a unit up by its fully-qualified name (`NET/SUB/JOB`).
    pub fn find(&self, fully_qualified_name: &str) -> Option<&Unit> {
        let mut segments = fully_qualified_name.split('/');
        let first = segments.next()?;
        let mut unit = self.roots().find(|root| root.name() == first)?;
        for segment in segments {
            unit = self.child_named(unit.id, segment)?;
        }
        Some(unit)
    }

    /// The unit owning `param`, if the parameter belongs to this tree.
    pub fn owner_of(&self, param: &Parameter) -> Option<&Unit> {
        param.owner().and_then(|id| self.get(id))
    }

    /// Ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: UnitId) -> impl Iterator<Item = &Unit> {
        std::iter::successors(self.parent(id), move |unit| self.parent(unit.id))
    }

    /// Fully-qualified names that occur more than once among siblings.
    pub fn duplicate_siblings(&self) -> Vec<String> {
        let mut duplicates = Vec::new();
        let groups = std::iter::once(self.roots.as_slice())
            .chain(self.units.iter().map(|unit| unit.children.as_slice()));
        for group in groups {
            let mut seen = HashSet::new();
            for id in group {
                let unit = &self.units[id.0];
                if !seen.insert(unit.name()) {
                    duplicates.push(unit.fully_qualified_name.clone());
                }
            }
        }
        duplicates
    }

    /// Serializable projection of the subtree under `id`.
    pub fn snapshot(&self, id: UnitId) -> Option<UnitSnapshot> {
        let unit = self.get(id)?;
        Some(UnitSnapshot::from_unit(self, unit))
    }

    /// Serializable projections of every top-level unit.
    pub fn snapshots(&self) -> Vec<UnitSnapshot> {
        self.roots()
            .map(|unit| UnitSnapshot::from_unit(self, unit))
            .collect()
    }
}

impl Index<UnitId> for UnitTree {
    type Output = Unit;

    fn index(&self, id: UnitId) -> &Unit {
        &self.units[id.0]
    }
}

impl<'a> IntoIterator for &'a UnitTree {
    type Item = &'a Unit;
    type IntoIter = std::slice::Iter<'a, Unit>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

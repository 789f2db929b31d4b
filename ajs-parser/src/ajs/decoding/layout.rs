//! Jobnet map layout: elements, map size and relations
//!
//! Element (`el`)
//!
//!     el        = unit-name "," type-code "," "+" h " " "+" v
//!
//!     Names a child unit of the owning jobnet and where its icon sits on the map, in
//!     pixels. The map grid has 160 pixel columns starting at 80 and 96 pixel rows
//!     starting at 48, so `+80 +48` is the top-left cell (0, 0).
//!
//! Map size (`sz`)
//!
//!     sz        = columns ("x" | "X" | "×") rows
//!
//! Relation (`ar`)
//!
//!     ar        = "(" "f=" from "," "t=" to ["," ("seq" | "con")] ")"
//!
//!     Both ends name child units of the owning jobnet. Without a kind the relation
//!     is sequential.

use super::fields::{in_range, single, Cursor};
use super::{decode_fields, DecodeResult, FromParameter};
use crate::ajs::ast::{Parameter, Unit, UnitId, UnitTree};
use crate::ajs::parsing::parse_tuple_text;
use serde::Serialize;

const ORIGIN_H: u32 = 80;
const ORIGIN_V: u32 = 48;
const CELL_WIDTH: u32 = 160;
const CELL_HEIGHT: u32 = 96;

/// Decoded `el`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Element {
    pub unit_name: String,
    pub type_code: String,
    pub h: u32,
    pub v: u32,
}

impl Element {
    /// Grid column and row of the icon. Offsets left of or above the grid origin
    /// fall in the first column or row.
    pub fn grid(&self) -> (u32, u32) {
        (
            self.h.saturating_sub(ORIGIN_H) / CELL_WIDTH,
            self.v.saturating_sub(ORIGIN_V) / CELL_HEIGHT,
        )
    }
}

impl FromParameter for Element {
    fn from_parameter(parameter: &Parameter) -> DecodeResult<Self> {
        decode_fields(parameter, |fields| {
            let [unit_name, type_code, offsets]: [String; 3] = fields
                .try_into()
                .map_err(|fields: Vec<String>| format!("expected 3 fields, found {}", fields.len()))?;
            if unit_name.is_empty() {
                return Err("element names no unit".to_string());
            }
            let (h, v) = pixel_offsets(&offsets)?;
            Ok(Element {
                unit_name,
                type_code,
                h: in_range(h, ORIGIN_H, u32::MAX, "horizontal offset")?,
                v: in_range(v, ORIGIN_V, u32::MAX, "vertical offset")?,
            })
        })
    }
}

fn pixel_offsets(text: &str) -> Result<(u32, u32), String> {
    let offset = |part: Option<&str>| -> Result<u32, String> {
        let part = part.ok_or_else(|| format!("`{}` must be `+H +V`", text))?;
        let mut cursor = Cursor::new(part);
        if !cursor.eat('+') {
            return Err(format!("offset `{}` must start with `+`", part));
        }
        let value = cursor
            .number()
            .ok_or_else(|| format!("offset `{}` is not a number", part))?;
        cursor.expect_end("offset")?;
        Ok(value)
    };
    let mut parts = text.split_whitespace();
    let h = offset(parts.next())?;
    let v = offset(parts.next())?;
    if parts.next().is_some() {
        return Err(format!("`{}` must be `+H +V`", text));
    }
    Ok((h, v))
}

/// Decoded `sz`: the jobnet map size in grid cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MapSize {
    pub columns: u32,
    pub rows: u32,
}

impl FromParameter for MapSize {
    fn from_parameter(parameter: &Parameter) -> DecodeResult<Self> {
        decode_fields(parameter, |fields| {
            let text = single(fields, "map size")?;
            let mut cursor = Cursor::new(&text);
            let columns = cursor.number();
            let separated = matches!(cursor.bump(), Some('x' | 'X' | '×'));
            let rows = cursor.number();
            match (columns, separated, rows) {
                (Some(columns), true, Some(rows)) if cursor.is_empty() => Ok(MapSize {
                    columns: in_range(columns, 1, u32::MAX, "columns")?,
                    rows: in_range(rows, 1, u32::MAX, "rows")?,
                }),
                _ => Err(format!("`{}` must be `WxH`", text)),
            }
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// `seq`: `to` starts when `from` ends normally
    #[default]
    Sequential,
    /// `con`: `to` is the branch taken by a judgment job
    Conditional,
}

/// Decoded `ar`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Relation {
    pub from: String,
    pub to: String,
    pub kind: RelationKind,
}

impl FromParameter for Relation {
    fn from_parameter(parameter: &Parameter) -> DecodeResult<Self> {
        decode_fields(parameter, |fields| {
            let text = single(fields, "relation")?;
            let tuple = parse_tuple_text(&text).map_err(|err| {
                format!(
                    "`{}` is not a relation tuple: {}",
                    text,
                    err.message().unwrap_or("read failure")
                )
            })?;
            let end = |key: &str| -> Result<String, String> {
                match tuple.get(key) {
                    Some(name) if !name.is_empty() => Ok(name.to_string()),
                    _ => Err(format!("relation has no `{}=` unit", key)),
                }
            };
            let from = end("f")?;
            let to = end("t")?;
            let mut kinds = tuple.bare_values();
            let kind = match kinds.next() {
                None | Some("seq") => RelationKind::Sequential,
                Some("con") => RelationKind::Conditional,
                Some(other) => return Err(format!("`{}` is not one of seq, con", other)),
            };
            if kinds.next().is_some() || tuple.len() > 3 {
                return Err(format!("`{}` has unexpected entries", text));
            }
            Ok(Relation { from, to, kind })
        })
    }
}

impl UnitTree {
    /// The child of `owner` an element points at; the first match when names repeat.
    pub fn resolve_element(&self, owner: UnitId, element: &Element) -> Option<&Unit> {
        self.child_named(owner, &element.unit_name)
    }

    /// Both ends of a relation among the children of `owner`.
    pub fn resolve_relation(&self, owner: UnitId, relation: &Relation) -> Option<(&Unit, &Unit)> {
        Some((
            self.child_named(owner, &relation.from)?,
            self.child_named(owner, &relation.to)?,
        ))
    }
}

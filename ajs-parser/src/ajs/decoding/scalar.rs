//! Single-value decoders: text, bounded integers and unit types

use super::fields::{in_range, single, Cursor};
use super::{decode_fields, DecodeError, DecodeResult, Decoder};
use crate::ajs::ast::{Parameter, UnitType};

/// The decoded string form of a single-valued parameter (`cm`, `sc`, ...)
#[derive(Debug, Clone, Copy, Default)]
pub struct TextDecoder;

impl Decoder for TextDecoder {
    type Output = String;

    fn decode(&self, parameter: &Parameter) -> DecodeResult<String> {
        match parameter.values() {
            [value] => Ok(value.as_str().into_owned()),
            values => Err(DecodeError::new(
                parameter,
                format!("expected one value, found {}", values.len()),
            )),
        }
    }
}

/// A whole number within `min..=max`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegerDecoder {
    pub min: u32,
    pub max: u32,
}

impl IntegerDecoder {
    /// `fd`: expected run time in minutes.
    pub const EXPECTED_DURATION: IntegerDecoder = IntegerDecoder::new(1, 2879);
    /// `pr`: execution priority.
    pub const PRIORITY: IntegerDecoder = IntegerDecoder::new(1, 5);

    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }
}

impl Decoder for IntegerDecoder {
    type Output = u32;

    fn decode(&self, parameter: &Parameter) -> DecodeResult<u32> {
        decode_fields(parameter, |fields| {
            let text = single(fields, "number")?;
            let mut cursor = Cursor::new(&text);
            let value = cursor
                .number()
                .filter(|_| cursor.is_empty())
                .ok_or_else(|| format!("`{}` is not a number", text))?;
            in_range(value, self.min, self.max, "value")
        })
    }
}

/// The unit type named by `ty`
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitTypeDecoder;

impl Decoder for UnitTypeDecoder {
    type Output = UnitType;

    fn decode(&self, parameter: &Parameter) -> DecodeResult<UnitType> {
        let code = parameter.first_value().as_str();
        if code.is_empty() || code.contains(char::is_whitespace) {
            return Err(DecodeError::new(parameter, format!("`{}` is not a type code", code)));
        }
        Ok(UnitType::from_code(&code))
    }
}

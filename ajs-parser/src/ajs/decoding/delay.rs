//! Delay monitoring times (`sy`, `ey`)
//!
//!     delay     = [rule ","] ( hh ":" mm | base minutes )
//!     base      = "M" | "U" | "C"
//!     minutes   = 1-2879
//!
//!     An absolute time is checked against the clock; a relative one counts minutes
//!     from the start of the root jobnet (`M`), the parent jobnet (`U`) or the unit's
//!     own jobnet (`C`). `sy` watches the start, `ey` the end; both share this grammar.

use super::fields::{in_range, require_defined, single, take_rule_number, Cursor, RuleNumber};
use super::schedule::TimeOfDay;
use super::{decode_fields, DecodeResult, FromParameter};
use crate::ajs::ast::Parameter;
use serde::Serialize;

const MAX_MINUTES: u32 = 2879;

/// Whose start time a relative delay counts from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelativeBase {
    RootJobnetStart,
    ParentJobnetStart,
    OwnJobnetStart,
}

impl RelativeBase {
    pub fn from_tag(tag: char) -> Option<Self> {
        match tag {
            'M' => Some(RelativeBase::RootJobnetStart),
            'U' => Some(RelativeBase::ParentJobnetStart),
            'C' => Some(RelativeBase::OwnJobnetStart),
            _ => None,
        }
    }

    pub fn tag(self) -> char {
        match self {
            RelativeBase::RootJobnetStart => 'M',
            RelativeBase::ParentJobnetStart => 'U',
            RelativeBase::OwnJobnetStart => 'C',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "timing", rename_all = "snake_case")]
pub enum DelayTiming {
    Absolute { time: TimeOfDay },
    Relative { base: RelativeBase, minutes: u16 },
}

/// Decoded `sy` or `ey`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DelayTime {
    pub rule: RuleNumber,
    pub timing: DelayTiming,
}

impl FromParameter for DelayTime {
    fn from_parameter(parameter: &Parameter) -> DecodeResult<Self> {
        decode_fields(parameter, |mut fields| {
            let rule = require_defined(take_rule_number(&mut fields, 1)?)?;
            let text = single(fields, "delay time")?;
            Ok(DelayTime {
                rule,
                timing: timing(&text)?,
            })
        })
    }
}

fn timing(text: &str) -> Result<DelayTiming, String> {
    let mut cursor = Cursor::new(text);
    let base = match cursor.peek().and_then(RelativeBase::from_tag) {
        Some(base) => base,
        None => return TimeOfDay::parse(text).map(|time| DelayTiming::Absolute { time }),
    };
    cursor.bump();
    let minutes = cursor
        .number()
        .ok_or_else(|| format!("`{}` needs minutes after `{}`", text, base.tag()))?;
    cursor.expect_end("relative minutes")?;
    let minutes = in_range(minutes, 1, MAX_MINUTES, "relative minutes")?;
    Ok(DelayTiming::Relative {
        base,
        minutes: minutes as u16,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ajs::ast::ParameterValue;
    use crate::ajs::decoding::decoder_for;
    use rstest::rstest;

    fn decode(name: &str, raw: &str) -> Result<DelayTime, String> {
        Parameter::new(name, ParameterValue::raw(raw))
            .decode(decoder_for::<DelayTime>())
            .map_err(|err| err.reason().to_string())
    }

    #[rstest]
    #[case("sy", "07:30", DelayTiming::Absolute { time: TimeOfDay { hour: 7, minute: 30 } })]
    #[case("ey", "2,30:15", DelayTiming::Absolute { time: TimeOfDay { hour: 30, minute: 15 } })]
    #[case("sy", "M90", DelayTiming::Relative { base: RelativeBase::RootJobnetStart, minutes: 90 })]
    #[case("ey", "U1", DelayTiming::Relative { base: RelativeBase::ParentJobnetStart, minutes: 1 })]
    #[case("sy", "C2879", DelayTiming::Relative { base: RelativeBase::OwnJobnetStart, minutes: 2879 })]
    fn test_delay_forms(#[case] name: &str, #[case] raw: &str, #[case] expected: DelayTiming) {
        assert_eq!(decode(name, raw).map(|delay| delay.timing), Ok(expected));
    }

    #[rstest]
    #[case("M0", "relative minutes 0 is out of range 1-2879")]
    #[case("C2880", "relative minutes 2880 is out of range 1-2879")]
    #[case("U", "`U` needs minutes after `U`")]
    #[case("M10m", "unexpected `m` after relative minutes")]
    #[case("X10", "`X10` is not a time of day")]
    fn test_malformed_delays(#[case] raw: &str, #[case] reason: &str) {
        assert_eq!(decode("sy", raw), Err(reason.to_string()));
    }

    #[test]
    fn test_rule_number_prefix() {
        assert_eq!(decode("ey", "5,M30").map(|delay| delay.rule.get()), Ok(5));
        assert!(decode("ey", "0,M30").is_err());
    }
}

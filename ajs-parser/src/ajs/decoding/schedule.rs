//! Schedule decoders: start date, start time, cycle and closed-day handling
//!
//! Start date (`sd`)
//!
//!     sd        = [rule ","] ( "en" | "ud" | date )
//!     date      = [[yyyy "/"] mm "/"] day-spec
//!     day-spec  = [count] dd                  day of the month
//!               | [count] "b" ["-" dd]        counted back from the month end
//!               | ["+"] weekday [":" week]    weekday, optionally in a given week
//!     count     = "+" | "*" | "@"             relative, business days, closed days
//!     weekday   = "su" | "mo" | "tu" | "we" | "th" | "fr" | "sa"
//!     week      = 1-5 | "b"                   "b" is the last week
//!
//!     `ud` (undefined) requires rule number 0 and rule number 0 requires `ud`.
//!     Years range over 1994-2036.
//!
//! Start time (`st`)
//!
//!     st        = [rule ","] ["+"] hh ":" mm  hh 0-47, "+" relative to the jobnet
//!
//! Execution cycle (`cy`)
//!
//!     cy        = [rule ","] "(" n "," unit ")"
//!     unit      = y | m | w | d               by first letter, any case
//!
//!     `n` ranges over 1-9 years, 1-12 months, 1-5 weeks or 1-31 days.
//!
//! Closed days
//!
//!     sh        = [rule ","] ( "be" | "af" | "ca" | "no" )
//!     shd       = [rule ","] dd                 1-31
//!     ln        = [rule ","] n                  1-144, the parent jobnet's rule

use super::fields::{in_range, require_defined, single, take_rule_number, Cursor, RuleNumber};
use super::{decode_fields, DecodeResult, FromParameter};
use crate::ajs::ast::Parameter;
use crate::ajs::parsing::parse_tuple_text;
use serde::Serialize;

const YEARS: (u32, u32) = (1994, 2036);

/// How a day number is counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DayCounting {
    /// Plain calendar day
    Calendar,
    /// `+`: relative to the parent's start
    Relative,
    /// `*`: counted in business days
    BusinessDay,
    /// `@`: counted in closed days
    ClosedDay,
}

impl DayCounting {
    fn take(cursor: &mut Cursor<'_>) -> Self {
        if cursor.eat('+') {
            DayCounting::Relative
        } else if cursor.eat('*') {
            DayCounting::BusinessDay
        } else if cursor.eat('@') {
            DayCounting::ClosedDay
        } else {
            DayCounting::Calendar
        }
    }

    pub fn prefix(self) -> &'static str {
        match self {
            DayCounting::Calendar => "",
            DayCounting::Relative => "+",
            DayCounting::BusinessDay => "*",
            DayCounting::ClosedDay => "@",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    const CODES: [(&'static str, Weekday); 7] = [
        ("su", Weekday::Sunday),
        ("mo", Weekday::Monday),
        ("tu", Weekday::Tuesday),
        ("we", Weekday::Wednesday),
        ("th", Weekday::Thursday),
        ("fr", Weekday::Friday),
        ("sa", Weekday::Saturday),
    ];

    pub fn from_code(code: &str) -> Option<Self> {
        Self::CODES
            .iter()
            .find(|(known, _)| *known == code)
            .map(|(_, weekday)| *weekday)
    }

    pub fn code(self) -> &'static str {
        Self::CODES
            .iter()
            .find(|(_, weekday)| *weekday == self)
            .map(|(code, _)| *code)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekOfMonth {
    Nth(u8),
    Last,
}

/// The day part of a scheduled date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "form", rename_all = "snake_case")]
pub enum DaySpec {
    Day {
        counting: DayCounting,
        day: u8,
    },
    /// `b` is the last day, `b-3` three days before it.
    MonthEnd {
        counting: DayCounting,
        days_before: u8,
    },
    Weekday {
        relative: bool,
        weekday: Weekday,
        week: Option<WeekOfMonth>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ScheduledDate {
    pub year: Option<u16>,
    pub month: Option<u8>,
    pub day: DaySpec,
}

/// What a start date designates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Designation {
    /// `en`: the date the jobnet is registered
    EntryDate,
    /// `ud`: no start date
    Undefined,
    Scheduled(ScheduledDate),
}

/// Decoded `sd`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct StartDate {
    pub rule: RuleNumber,
    pub designation: Designation,
}

impl FromParameter for StartDate {
    fn from_parameter(parameter: &Parameter) -> DecodeResult<Self> {
        decode_fields(parameter, |mut fields| {
            let rule = take_rule_number(&mut fields, 1)?;
            let text = single(fields, "start date")?;
            let designation = match text.as_str() {
                "ud" if rule.is_undefined() => Designation::Undefined,
                "ud" => return Err(format!("`ud` needs rule number 0, found {}", rule)),
                "en" => Designation::EntryDate,
                date => Designation::Scheduled(scheduled_date(date)?),
            };
            if rule.is_undefined() && designation != Designation::Undefined {
                require_defined(rule)?;
            }
            Ok(StartDate { rule, designation })
        })
    }
}

fn scheduled_date(text: &str) -> Result<ScheduledDate, String> {
    let parts: Vec<&str> = text.split('/').collect();
    let (year, month, day) = match parts.as_slice() {
        [day] => (None, None, *day),
        [month, day] => (None, Some(*month), *day),
        [year, month, day] => (Some(*year), Some(*month), *day),
        _ => return Err(format!("`{}` is not a date", text)),
    };
    let year = year
        .map(|year| {
            if year.len() != 4 {
                return Err(format!("year `{}` must have four digits", year));
            }
            let value = whole_number(year, "year")?;
            in_range(value, YEARS.0, YEARS.1, "year").map(|year| year as u16)
        })
        .transpose()?;
    let month = month
        .map(|month| {
            let value = whole_number(month, "month")?;
            in_range(value, 1, 12, "month").map(|month| month as u8)
        })
        .transpose()?;
    Ok(ScheduledDate {
        year,
        month,
        day: day_spec(day)?,
    })
}

fn day_spec(text: &str) -> Result<DaySpec, String> {
    let mut cursor = Cursor::new(text);
    let counting = DayCounting::take(&mut cursor);

    if cursor.peek().is_some_and(|ch| ch.is_ascii_digit()) {
        let day = cursor.number().ok_or_else(|| format!("day `{}` is too large", text))?;
        cursor.expect_end("day")?;
        let day = in_range(day, 1, 31, "day")? as u8;
        return Ok(DaySpec::Day { counting, day });
    }

    if cursor.rest() == "b" || cursor.rest().starts_with("b-") {
        cursor.eat('b');
        let days_before = if cursor.eat('-') {
            let days = cursor
                .number()
                .ok_or_else(|| format!("`{}` needs a day count after `b-`", text))?;
            in_range(days, 1, 31, "days before month end")? as u8
        } else {
            0
        };
        cursor.expect_end("month end")?;
        return Ok(DaySpec::MonthEnd {
            counting,
            days_before,
        });
    }

    let relative = match counting {
        DayCounting::Calendar => false,
        DayCounting::Relative => true,
        other => {
            return Err(format!(
                "a weekday cannot be counted with `{}`",
                other.prefix()
            ))
        }
    };
    let code: String = cursor.rest().chars().take(2).collect();
    let weekday = Weekday::from_code(&code).ok_or_else(|| format!("`{}` is not a day", text))?;
    cursor.eat_str(&code);
    let week = if cursor.eat(':') {
        if cursor.eat('b') {
            Some(WeekOfMonth::Last)
        } else {
            let week = cursor
                .number()
                .ok_or_else(|| format!("`{}` needs a week number or `b` after `:`", text))?;
            Some(WeekOfMonth::Nth(in_range(week, 1, 5, "week")? as u8))
        }
    } else {
        None
    };
    cursor.expect_end("weekday")?;
    Ok(DaySpec::Weekday {
        relative,
        weekday,
        week,
    })
}

fn whole_number(text: &str, what: &str) -> Result<u32, String> {
    let mut cursor = Cursor::new(text);
    match cursor.number() {
        Some(value) if cursor.is_empty() => Ok(value),
        _ => Err(format!("{} `{}` is not a number", what, text)),
    }
}

/// Hours and minutes; hours run past midnight up to 47
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TimeOfDay {
    pub hour: u8,
    pub minute: u8,
}

impl TimeOfDay {
    pub const MAX_HOUR: u8 = 47;

    /// Minutes since midnight of the start day.
    pub fn minutes(self) -> u32 {
        u32::from(self.hour) * 60 + u32::from(self.minute)
    }

    /// `hh:mm` with a one or two digit hour and a two digit minute.
    pub(crate) fn parse(text: &str) -> Result<Self, String> {
        let mut cursor = Cursor::new(text);
        let hour = cursor.digits();
        if hour.is_empty() || hour.len() > 2 || !cursor.eat(':') {
            return Err(format!("`{}` is not a time of day", text));
        }
        let minute = cursor.digits();
        if minute.len() != 2 {
            return Err(format!("`{}` is not a time of day", text));
        }
        cursor.expect_end("time of day")?;
        let hour = in_range(whole_number(hour, "hour")?, 0, u32::from(Self::MAX_HOUR), "hour")?;
        let minute = in_range(whole_number(minute, "minute")?, 0, 59, "minute")?;
        Ok(TimeOfDay {
            hour: hour as u8,
            minute: minute as u8,
        })
    }
}

/// Decoded `st`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct StartTime {
    pub rule: RuleNumber,
    /// `+hh:mm`: relative to the parent jobnet's start
    pub relative: bool,
    pub time: TimeOfDay,
}

impl FromParameter for StartTime {
    fn from_parameter(parameter: &Parameter) -> DecodeResult<Self> {
        decode_fields(parameter, |mut fields| {
            let rule = require_defined(take_rule_number(&mut fields, 1)?)?;
            let text = single(fields, "start time")?;
            let (relative, time) = match text.strip_prefix('+') {
                Some(time) => (true, time),
                None => (false, text.as_str()),
            };
            Ok(StartTime {
                rule,
                relative,
                time: TimeOfDay::parse(time)?,
            })
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleUnit {
    Year,
    Month,
    Week,
    Day,
}

impl CycleUnit {
    /// By first letter, case-insensitive: `m`, `M` and `month` are all months.
    pub fn from_text(text: &str) -> Option<Self> {
        match text.chars().next()?.to_ascii_lowercase() {
            'y' => Some(CycleUnit::Year),
            'm' => Some(CycleUnit::Month),
            'w' => Some(CycleUnit::Week),
            'd' => Some(CycleUnit::Day),
            _ => None,
        }
    }

    pub fn max_interval(self) -> u32 {
        match self {
            CycleUnit::Year => 9,
            CycleUnit::Month => 12,
            CycleUnit::Week => 5,
            CycleUnit::Day => 31,
        }
    }
}

/// Decoded `cy`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ExecutionCycle {
    pub rule: RuleNumber,
    pub interval: u8,
    pub unit: CycleUnit,
}

impl FromParameter for ExecutionCycle {
    fn from_parameter(parameter: &Parameter) -> DecodeResult<Self> {
        decode_fields(parameter, |mut fields| {
            let rule = require_defined(take_rule_number(&mut fields, 1)?)?;
            let text = single(fields, "cycle")?;
            let tuple = parse_tuple_text(&text)
                .map_err(|err| format!("`{}` is not a cycle tuple: {}", text, err.message().unwrap_or("read failure")))?;
            let (interval, unit) = match tuple.entries() {
                [interval, unit] if interval.key().is_none() && unit.key().is_none() => {
                    (interval.value(), unit.value())
                }
                _ => return Err(format!("`{}` must be `(n,unit)`", text)),
            };
            let unit = CycleUnit::from_text(unit)
                .ok_or_else(|| format!("`{}` is not a cycle unit", unit))?;
            let interval = in_range(whole_number(interval, "interval")?, 1, unit.max_interval(), "interval")?;
            Ok(ExecutionCycle {
                rule,
                interval: interval as u8,
                unit,
            })
        })
    }
}

/// What happens when a scheduled day is a closed day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftDirection {
    /// `be`: run on the business day before
    Before,
    /// `af`: run on the business day after
    After,
    /// `ca`: do not run
    Cancel,
    /// `no`: run anyway
    NoShift,
}

impl ShiftDirection {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "be" => Some(ShiftDirection::Before),
            "af" => Some(ShiftDirection::After),
            "ca" => Some(ShiftDirection::Cancel),
            "no" => Some(ShiftDirection::NoShift),
            _ => None,
        }
    }
}

/// Decoded `sh`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ClosedDayShift {
    pub rule: RuleNumber,
    pub direction: ShiftDirection,
}

impl FromParameter for ClosedDayShift {
    fn from_parameter(parameter: &Parameter) -> DecodeResult<Self> {
        decode_fields(parameter, |mut fields| {
            let rule = require_defined(take_rule_number(&mut fields, 1)?)?;
            let code = single(fields, "shift code")?;
            let direction = ShiftDirection::from_code(&code)
                .ok_or_else(|| format!("`{}` is not one of be, af, ca, no", code))?;
            Ok(ClosedDayShift { rule, direction })
        })
    }
}

/// Decoded `shd`: how many days a shifted run may move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ShiftDays {
    pub rule: RuleNumber,
    pub days: u8,
}

impl FromParameter for ShiftDays {
    fn from_parameter(parameter: &Parameter) -> DecodeResult<Self> {
        decode_fields(parameter, |mut fields| {
            let rule = require_defined(take_rule_number(&mut fields, 1)?)?;
            let days = single(fields, "day count")?;
            let days = in_range(whole_number(&days, "day count")?, 1, 31, "day count")?;
            Ok(ShiftDays {
                rule,
                days: days as u8,
            })
        })
    }
}

/// Decoded `ln`: the parent jobnet rule this rule follows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct LinkedRule {
    pub rule: RuleNumber,
    pub parent_rule: RuleNumber,
}

impl FromParameter for LinkedRule {
    fn from_parameter(parameter: &Parameter) -> DecodeResult<Self> {
        decode_fields(parameter, |mut fields| {
            let rule = require_defined(take_rule_number(&mut fields, 1)?)?;
            let parent = single(fields, "parent rule number")?;
            let parent = in_range(
                whole_number(&parent, "parent rule number")?,
                1,
                u32::from(RuleNumber::MAX),
                "parent rule number",
            )?;
            let parent_rule = RuleNumber::new(parent as u8)
                .ok_or_else(|| format!("parent rule number {} is out of range", parent))?;
            Ok(LinkedRule { rule, parent_rule })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ajs::ast::ParameterValue;
    use crate::ajs::decoding::{decoder_for, DecodeError};
    use rstest::rstest;

    fn param(name: &str, raw: &str) -> Parameter {
        Parameter::new(name, ParameterValue::raw(raw))
    }

    fn start_date(raw: &str) -> Result<StartDate, DecodeError> {
        param("sd", raw).decode(decoder_for::<StartDate>())
    }

    fn scheduled(raw: &str) -> ScheduledDate {
        match start_date(raw).unwrap().designation {
            Designation::Scheduled(date) => date,
            other => panic!("expected a scheduled date, got {:?}", other),
        }
    }

    #[test]
    fn test_undefined_needs_rule_zero() {
        let date = start_date("0, ud").unwrap();
        assert_eq!(date.designation, Designation::Undefined);
        assert_eq!(date.rule.get(), 0);

        let err = start_date("1, ud").unwrap_err();
        assert_eq!(err.reason(), "`ud` needs rule number 0, found 1");
        assert!(start_date("ud").is_err());
        assert!(start_date("0,en").is_err());
    }

    #[test]
    fn test_entry_date_with_default_rule() {
        let date = start_date("en").unwrap();
        assert_eq!(date.designation, Designation::EntryDate);
        assert_eq!(date.rule, RuleNumber::DEFAULT);
    }

    #[rstest]
    #[case("2024/04/01", Some(2024), Some(4), DaySpec::Day { counting: DayCounting::Calendar, day: 1 })]
    #[case("3,12/+25", None, Some(12), DaySpec::Day { counting: DayCounting::Relative, day: 25 })]
    #[case("*5", None, None, DaySpec::Day { counting: DayCounting::BusinessDay, day: 5 })]
    #[case("@b", None, None, DaySpec::MonthEnd { counting: DayCounting::ClosedDay, days_before: 0 })]
    #[case("04/*b-2", None, Some(4), DaySpec::MonthEnd { counting: DayCounting::BusinessDay, days_before: 2 })]
    #[case("mo", None, None, DaySpec::Weekday { relative: false, weekday: Weekday::Monday, week: None })]
    #[case("+fr:b", None, None, DaySpec::Weekday { relative: true, weekday: Weekday::Friday, week: Some(WeekOfMonth::Last) })]
    #[case("2030/01/su:2", Some(2030), Some(1), DaySpec::Weekday { relative: false, weekday: Weekday::Sunday, week: Some(WeekOfMonth::Nth(2)) })]
    fn test_scheduled_dates(
        #[case] raw: &str,
        #[case] year: Option<u16>,
        #[case] month: Option<u8>,
        #[case] day: DaySpec,
    ) {
        assert_eq!(scheduled(raw), ScheduledDate { year, month, day });
    }

    #[rstest]
    #[case("2024/13/01")]
    #[case("24/04/01")]
    #[case("2099/01/01")]
    #[case("32")]
    #[case("0")]
    #[case("b-")]
    #[case("b-40")]
    #[case("*mo")]
    #[case("mo:6")]
    #[case("xx")]
    #[case("1/2/3/4")]
    #[case("145,en")]
    fn test_malformed_start_dates(#[case] raw: &str) {
        assert!(start_date(raw).is_err(), "{} should not decode", raw);
    }

    #[test]
    fn test_start_time() {
        let time = param("st", "2,+25:30").decode(decoder_for::<StartTime>()).unwrap();
        assert_eq!(time.rule.get(), 2);
        assert!(time.relative);
        assert_eq!(time.time, TimeOfDay { hour: 25, minute: 30 });
        assert_eq!(time.time.minutes(), 1530);

        for bad in ["48:00", "9:5", "12:60", "1230", "0,09:00"] {
            assert!(param("st", bad).decode(decoder_for::<StartTime>()).is_err(), "{}", bad);
        }
    }

    #[test]
    fn test_execution_cycle_from_raw_text() {
        let cycle = param("cy", "(2,m)").decode(decoder_for::<ExecutionCycle>()).unwrap();
        assert_eq!(
            cycle,
            ExecutionCycle {
                rule: RuleNumber::DEFAULT,
                interval: 2,
                unit: CycleUnit::Month
            }
        );
    }

    #[test]
    fn test_execution_cycle_from_parsed_values() {
        let tuple = "(1,Week)".parse().unwrap();
        let cy = Parameter::with_values(
            "cy",
            vec![ParameterValue::raw("4"), ParameterValue::tuple(tuple)],
        )
        .unwrap();
        let cycle = cy.decode(decoder_for::<ExecutionCycle>()).unwrap();
        assert_eq!(cycle.rule.get(), 4);
        assert_eq!(cycle.unit, CycleUnit::Week);
    }

    #[rstest]
    #[case("(0,d)")]
    #[case("(13,m)")]
    #[case("(2,q)")]
    #[case("(2)")]
    #[case("(n=2,m)")]
    #[case("2,m")]
    fn test_malformed_cycles(#[case] raw: &str) {
        assert!(param("cy", raw).decode(decoder_for::<ExecutionCycle>()).is_err());
    }

    #[test]
    fn test_closed_day_parameters() {
        let shift = param("sh", "3,af").decode(decoder_for::<ClosedDayShift>()).unwrap();
        assert_eq!(shift.direction, ShiftDirection::After);
        assert_eq!(shift.rule.get(), 3);
        assert!(param("sh", "later").decode(decoder_for::<ClosedDayShift>()).is_err());

        let days = param("shd", "10").decode(decoder_for::<ShiftDays>()).unwrap();
        assert_eq!(days.days, 10);
        assert!(param("shd", "32").decode(decoder_for::<ShiftDays>()).is_err());

        let linked = param("ln", "2,144").decode(decoder_for::<LinkedRule>()).unwrap();
        assert_eq!(linked.parent_rule.get(), 144);
        assert!(param("ln", "0").decode(decoder_for::<LinkedRule>()).is_err());
    }
}

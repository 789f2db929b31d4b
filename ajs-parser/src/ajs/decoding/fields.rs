//! Field splitting and the rule-number prefix

use crate::ajs::ast::{Parameter, ParameterValue};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The values of `parameter` split at top-level commas and trimmed.
///
/// Commas inside parentheses do not split, so a tuple stays one field. Quoted values
/// are always one field.
pub fn fields(parameter: &Parameter) -> Vec<String> {
    let mut fields = Vec::new();
    for value in parameter.values() {
        match value {
            ParameterValue::RawText { text } => split_top_level(text, &mut fields),
            ParameterValue::QuotedText { text, .. } => fields.push(text.clone()),
            ParameterValue::Tuple { tuple } => fields.push(tuple.to_string()),
        }
    }
    fields
}

fn split_top_level(text: &str, fields: &mut Vec<String>) {
    let mut depth = 0usize;
    let mut start = 0;
    for (index, ch) in text.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                fields.push(text[start..index].trim().to_string());
                start = index + 1;
            }
            _ => {}
        }
    }
    fields.push(text[start..].trim().to_string());
}

/// Which of a unit's alternative schedule rules a value belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RuleNumber(u8);

impl RuleNumber {
    pub const DEFAULT: RuleNumber = RuleNumber(1);
    /// Rule 0 only appears with an undefined start date.
    pub const UNDEFINED: RuleNumber = RuleNumber(0);
    pub const MAX: u8 = 144;

    /// A rule number in `0..=144`.
    pub fn new(number: u8) -> Option<Self> {
        (number <= Self::MAX).then_some(RuleNumber(number))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn is_undefined(self) -> bool {
        self.0 == 0
    }
}

impl Default for RuleNumber {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for RuleNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Remove the optional leading rule number from `fields`.
///
/// With `arity + 1` fields the first one must be the rule number; with `arity`
/// fields the rule number defaults to 1. Zero is accepted here and left to the caller
/// to reject.
pub(crate) fn take_rule_number(fields: &mut Vec<String>, arity: usize) -> Result<RuleNumber, String> {
    if fields.len() == arity {
        return Ok(RuleNumber::DEFAULT);
    }
    if fields.len() != arity + 1 {
        return Err(format!(
            "expected {} field(s) after an optional rule number, found {}",
            arity,
            fields.len()
        ));
    }
    let text = fields.remove(0);
    let mut cursor = Cursor::new(&text);
    let number = cursor
        .number()
        .filter(|_| cursor.is_empty())
        .ok_or_else(|| format!("rule number `{}` is not a number", text))?;
    u8::try_from(number)
        .ok()
        .and_then(RuleNumber::new)
        .ok_or_else(|| format!("rule number {} is out of range 0-{}", number, RuleNumber::MAX))
}

/// Reject rule number 0 outside of `sd=0,ud`.
pub(crate) fn require_defined(rule: RuleNumber) -> Result<RuleNumber, String> {
    if rule.is_undefined() {
        Err("rule number 0 is only valid with `ud`".to_string())
    } else {
        Ok(rule)
    }
}

/// Exactly one field, or an error naming what was expected.
pub(crate) fn single(mut fields: Vec<String>, what: &str) -> Result<String, String> {
    if fields.len() != 1 {
        return Err(format!("expected one {}, found {} fields", what, fields.len()));
    }
    Ok(fields.remove(0))
}

/// A character cursor for the small grammars inside field text
#[derive(Debug, Clone)]
pub(crate) struct Cursor<'a> {
    text: &'a str,
    offset: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, offset: 0 }
    }

    pub fn rest(&self) -> &'a str {
        &self.text[self.offset..]
    }

    pub fn is_empty(&self) -> bool {
        self.offset >= self.text.len()
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Consume `ch` if it is next.
    pub fn eat(&mut self, ch: char) -> bool {
        if self.peek() == Some(ch) {
            self.offset += ch.len_utf8();
            true
        } else {
            false
        }
    }

    /// Consume `word` if the rest starts with it.
    pub fn eat_str(&mut self, word: &str) -> bool {
        if self.rest().starts_with(word) {
            self.offset += word.len();
            true
        } else {
            false
        }
    }

    /// Consume the next character, whatever it is.
    pub fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.offset += ch.len_utf8();
        Some(ch)
    }

    /// Consume a run of ASCII digits.
    pub fn digits(&mut self) -> &'a str {
        let rest = self.rest();
        let len = rest.bytes().take_while(u8::is_ascii_digit).count();
        self.offset += len;
        &rest[..len]
    }

    /// Consume a decimal number; `None` if no digit is next or it overflows.
    pub fn number(&mut self) -> Option<u32> {
        let digits = self.digits();
        if digits.is_empty() {
            return None;
        }
        digits.parse().ok()
    }

    /// Fail unless everything has been consumed.
    pub fn expect_end(&self, what: &str) -> Result<(), String> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(format!("unexpected `{}` after {}", self.rest(), what))
        }
    }
}

/// `value` if it lies in `min..=max`, else an error naming `what`.
pub(crate) fn in_range(value: u32, min: u32, max: u32, what: &str) -> Result<u32, String> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{} {} is out of range {}-{}", what, value, min, max))
    }
}

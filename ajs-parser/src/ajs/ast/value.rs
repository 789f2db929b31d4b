//! Parameter values
//!
//!     Every value of a parameter is one of three variants, chosen at parse time from
//!     its first character:
//!
//!         "..." or '...'   QuotedText  quotes and escapes removed
//!         (...)            Tuple       structured entries
//!         anything else    RawText     verbatim up to the next `,` or `;`
//!
//!     Quoted text remembers its quote and escape characters so that
//!     [`ParameterValue::source_text`] can reproduce the value as it was written.

use super::tuple::Tuple;
use crate::ajs::lexing::QuoteRule;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// The variant tag of a [`ParameterValue`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    RawText,
    QuotedText,
    Tuple,
}

/// One value of a parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParameterValue {
    RawText { text: String },
    QuotedText { text: String, quote: char, escape: char },
    Tuple { tuple: Tuple },
}

impl ParameterValue {
    pub fn raw(text: impl Into<String>) -> Self {
        ParameterValue::RawText { text: text.into() }
    }

    /// Quoted text as written in unit definition files: `"` with `#` as escape prefix.
    pub fn quoted(text: impl Into<String>) -> Self {
        Self::quoted_with(text, QuoteRule::UNIT_DOUBLE)
    }

    pub fn quoted_with(text: impl Into<String>, rule: QuoteRule) -> Self {
        ParameterValue::QuotedText {
            text: text.into(),
            quote: rule.quote,
            escape: rule.escape,
        }
    }

    pub fn tuple(tuple: Tuple) -> Self {
        ParameterValue::Tuple { tuple }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            ParameterValue::RawText { .. } => ValueKind::RawText,
            ParameterValue::QuotedText { .. } => ValueKind::QuotedText,
            ParameterValue::Tuple { .. } => ValueKind::Tuple,
        }
    }

    /// The decoded string form: raw text verbatim, quoted text without quotes and
    /// escapes, tuples rendered back to `(k=v,...)`.
    pub fn as_str(&self) -> Cow<'_, str> {
        match self {
            ParameterValue::RawText { text } | ParameterValue::QuotedText { text, .. } => {
                Cow::Borrowed(text)
            }
            ParameterValue::Tuple { tuple } => Cow::Owned(tuple.to_string()),
        }
    }

    pub fn as_tuple(&self) -> Option<&Tuple> {
        match self {
            ParameterValue::Tuple { tuple } => Some(tuple),
            _ => None,
        }
    }

    pub fn is_quoted(&self) -> bool {
        matches!(self, ParameterValue::QuotedText { .. })
    }

    /// The quoting rule of a quoted value.
    pub fn quote_rule(&self) -> Option<QuoteRule> {
        match self {
            ParameterValue::QuotedText { quote, escape, .. } => Some(QuoteRule::new(*quote, *escape)),
            _ => None,
        }
    }

    /// The value as it appears in source, re-quoted and re-escaped where needed.
    pub fn source_text(&self) -> Cow<'_, str> {
        match self {
            ParameterValue::RawText { text } => Cow::Borrowed(text),
            ParameterValue::QuotedText {
                text,
                quote,
                escape,
            } => Cow::Owned(QuoteRule::new(*quote, *escape).escape(text)),
            ParameterValue::Tuple { tuple } => Cow::Owned(tuple.to_string()),
        }
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ajs::ast::TupleEntry;

    #[test]
    fn test_kind_tags() {
        assert_eq!(ParameterValue::raw("n").kind(), ValueKind::RawText);
        assert_eq!(ParameterValue::quoted("x").kind(), ValueKind::QuotedText);
        assert_eq!(ParameterValue::tuple(Tuple::empty()).kind(), ValueKind::Tuple);
    }

    #[test]
    fn test_decoded_string_form() {
        assert_eq!(ParameterValue::quoted("say \"hi\"").as_str(), "say \"hi\"");
        let tuple = Tuple::new(vec![TupleEntry::bare("2"), TupleEntry::bare("m")]);
        assert_eq!(ParameterValue::tuple(tuple).as_str(), "(2,m)");
    }

    #[test]
    fn test_source_text_reescapes_quoted_text() {
        let value = ParameterValue::quoted("a\"b#c");
        assert_eq!(value.source_text(), "\"a#\"b##c\"");
        assert_eq!(ParameterValue::raw("+80 +48").source_text(), "+80 +48");
    }

    #[test]
    fn test_only_tuples_expose_tuple_access() {
        assert!(ParameterValue::raw("(1,d)").as_tuple().is_none());
        assert!(ParameterValue::tuple(Tuple::empty()).as_tuple().is_some());
    }
}

//! Scanner configuration
//!
//! Comment markers and quoting rules are data, not code: the generic scanner defaults
//! to C-style comments and backslash escapes, while the unit grammar swaps in `#` as
//! the escape prefix inside quoted text.

/// How one quote character is escaped inside quoted text
///
/// When `escape == quote` the quote is escaped by doubling it (`""`). Otherwise
/// `escape` is a prefix that makes the following character literal, including the
/// quote and the prefix itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuoteRule {
    pub quote: char,
    pub escape: char,
}

impl QuoteRule {
    /// Double quotes in unit definition files: `#"` is a quote, `##` a `#`.
    pub const UNIT_DOUBLE: QuoteRule = QuoteRule::new('"', '#');
    /// Single quotes in unit definition files.
    pub const UNIT_SINGLE: QuoteRule = QuoteRule::new('\'', '#');

    pub const fn new(quote: char, escape: char) -> Self {
        Self { quote, escape }
    }

    /// Escape by doubling the quote character.
    pub const fn doubling(quote: char) -> Self {
        Self::new(quote, quote)
    }

    pub fn is_doubling(&self) -> bool {
        self.quote == self.escape
    }

    /// Quote `text`, escaping what needs escaping. The inverse of scanning it back.
    pub fn escape(&self, text: &str) -> String {
        let mut quoted = String::with_capacity(text.len() + 2);
        quoted.push(self.quote);
        for ch in text.chars() {
            if ch == self.quote || ch == self.escape {
                quoted.push(self.escape);
            }
            quoted.push(ch);
        }
        quoted.push(self.quote);
        quoted
    }
}

/// Knobs for [`TokenScanner`](super::TokenScanner)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannerOptions {
    /// Treat comments as whitespace in `skip_whitespace`.
    pub skip_comments: bool,
    /// Starts a comment running to the end of the line. Empty disables it.
    pub line_comment: String,
    /// Starts a comment running through `block_comment_end`. Empty disables it.
    pub block_comment_start: String,
    pub block_comment_end: String,
    /// Recognized quote characters and their escaping.
    pub quotes: Vec<QuoteRule>,
}

impl ScannerOptions {
    /// The rule for `quote`, if it is a configured quote character.
    pub fn quote_rule(&self, quote: char) -> Option<QuoteRule> {
        self.quotes.iter().copied().find(|rule| rule.quote == quote)
    }

    /// Replace (or add) the rule for `rule.quote`.
    pub fn with_quote(mut self, rule: QuoteRule) -> Self {
        match self.quotes.iter_mut().find(|known| known.quote == rule.quote) {
            Some(known) => *known = rule,
            None => self.quotes.push(rule),
        }
        self
    }

    pub fn with_comments(mut self, skip_comments: bool) -> Self {
        self.skip_comments = skip_comments;
        self
    }

    pub fn with_line_comment(mut self, marker: impl Into<String>) -> Self {
        self.line_comment = marker.into();
        self
    }

    pub fn with_block_comment(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.block_comment_start = start.into();
        self.block_comment_end = end.into();
        self
    }
}

impl Default for ScannerOptions {
    fn default() -> Self {
        Self {
            skip_comments: true,
            line_comment: "//".to_string(),
            block_comment_start: "/*".to_string(),
            block_comment_end: "*/".to_string(),
            quotes: vec![QuoteRule::new('"', '\\'), QuoteRule::new('\'', '\\')],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_with_prefix() {
        assert_eq!(QuoteRule::UNIT_DOUBLE.escape("a\"b#c"), "\"a#\"b##c\"");
        assert_eq!(QuoteRule::new('"', '\\').escape("C:\\tmp"), "\"C:\\\\tmp\"");
    }

    #[test]
    fn test_escape_by_doubling() {
        let rule = QuoteRule::doubling('\'');
        assert!(rule.is_doubling());
        assert_eq!(rule.escape("it's"), "'it''s'");
    }

    #[test]
    fn test_with_quote_replaces_existing_rule() {
        let options = ScannerOptions::default().with_quote(QuoteRule::UNIT_DOUBLE);
        assert_eq!(options.quote_rule('"'), Some(QuoteRule::UNIT_DOUBLE));
        assert_eq!(options.quotes.len(), 2);
        assert_eq!(options.quote_rule('`'), None);
    }
}

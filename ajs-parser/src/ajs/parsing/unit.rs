//! Unit grammar
//!
//!     Recursive descent over one source:
//!
//!         document  = unit+
//!         unit      = "unit" "=" attrs ";" "{" parameter* unit* "}"
//!         attrs     = name ["," permission ["," owner ["," resource-group]]]
//!         parameter = name "=" value ("," value)* ";"
//!         value     = quoted | tuple | raw
//!
//!     Whitespace and comments may appear between units, between parameters and
//!     around the braces. Inside a parameter only plain whitespace is skipped, so
//!     `//` in a raw value (a UNC path, a URL) stays text.
//!
//!     A name opens a child unit when it is exactly `unit`; whitespace, line breaks
//!     included, may separate the keyword from its `=` at any depth.
//!
//! Raw values
//!
//!     A raw value runs to the next `,`, `;` or line break and loses trailing
//!     whitespace. A quote character inside it starts an embedded quoted substring:
//!     the substring is scanned with the usual escaping rules and written back into
//!     the raw text re-escaped, so `sc=run "a,b";` keeps its comma and reads as
//!     `run "a,b"`.
//!
//! Units
//!
//!     A unit is finalized when its closing brace is read, after all of its children.
//!     Every unit needs a non-empty `ty` parameter; its first value becomes the type
//!     code. The first failure aborts the whole parse.

use crate::ajs::ast::tree::UnitDraft;
use crate::ajs::ast::{Parameter, ParameterValue, Position, UnitHeader};
use crate::ajs::error::{ParseError, ParseResult};
use crate::ajs::lexing::scanner::describe;
use crate::ajs::lexing::{LineSource, TokenScanner};
use crate::ajs::parsing::tuple::parse_tuple;
use tracing::trace;

const UNIT_KEYWORD: &str = "unit";
const MAX_ATTRIBUTES: usize = 4;

/// Recursive-descent parser for unit definitions
pub(crate) struct UnitGrammar<S> {
    scanner: TokenScanner<S>,
    raw_stops: Vec<char>,
}

impl<S: LineSource> UnitGrammar<S> {
    pub fn new(scanner: TokenScanner<S>) -> Self {
        let mut raw_stops = vec![',', ';', '\n'];
        raw_stops.extend(scanner.options().quotes.iter().map(|rule| rule.quote));
        Self { scanner, raw_stops }
    }

    /// Parse every top-level unit up to end of input.
    pub fn parse_document(&mut self) -> ParseResult<Vec<UnitDraft>> {
        let mut roots = Vec::new();
        loop {
            self.scanner.skip_whitespace()?;
            if self.scanner.at_eof() {
                break;
            }
            roots.push(self.parse_unit(None)?);
        }
        if roots.is_empty() {
            return Err(self.scanner.syntax_error("no unit definition found"));
        }
        Ok(roots)
    }

    /// Lines read so far, for logging.
    pub fn line_count(&self) -> usize {
        self.scanner.position().line
    }

    fn parse_unit(&mut self, parent: Option<&str>) -> ParseResult<UnitDraft> {
        self.scanner.skip_whitespace()?;
        let position = self.scanner.position();
        self.scanner.scan_word(UNIT_KEYWORD)?;
        self.parse_unit_definition(position, parent)
    }

    /// Everything after the `unit` keyword, starting at the whitespace before `=`.
    fn parse_unit_definition(
        &mut self,
        position: Position,
        parent: Option<&str>,
    ) -> ParseResult<UnitDraft> {
        self.scanner.skip_spaces()?;
        self.scanner.expect_char('=')?;
        let header = self.parse_header()?;
        self.scanner.expect_char(';')?;
        self.scanner.skip_whitespace()?;
        self.scanner.expect_char('{')?;

        let fully_qualified_name = match parent {
            Some(parent) => format!("{}/{}", parent, header.name),
            None => header.name.clone(),
        };

        let mut parameters = Vec::new();
        let mut children = Vec::new();
        loop {
            self.scanner.skip_whitespace()?;
            if self.scanner.at_eof() || self.scanner.current() == '}' {
                break;
            }
            let start = self.scanner.position();
            let name = self.scan_parameter_name()?;
            if name == UNIT_KEYWORD {
                children.push(self.parse_unit_definition(start, Some(&fully_qualified_name))?);
            } else if children.is_empty() {
                parameters.push(self.parse_parameter(name, start)?);
            } else {
                return Err(ParseError::syntax(
                    format!(
                        "expected `}}` closing unit `{}`, found parameter `{}`",
                        fully_qualified_name, name
                    ),
                    start,
                    self.scanner.stream().snippet(),
                ));
            }
        }

        if self.scanner.at_eof() {
            return Err(self.scanner.syntax_error(format!(
                "expected `}}` closing unit `{}`, found {}",
                fully_qualified_name,
                describe(self.scanner.current())
            )));
        }
        let type_code = parameters
            .iter()
            .find(|param| param.name() == "ty")
            .map(|ty| ty.first_value().as_str().into_owned())
            .filter(|code| !code.is_empty())
            .ok_or_else(|| {
                self.scanner.syntax_error(format!(
                    "unit `{}` has no `ty` parameter",
                    fully_qualified_name
                ))
            })?;
        self.scanner.advance()?;

        trace!(
            unit = %fully_qualified_name,
            ty = %type_code,
            parameters = parameters.len(),
            children = children.len(),
            "unit finalized"
        );
        Ok(UnitDraft {
            header,
            type_code,
            parameters,
            children,
            fully_qualified_name,
            position,
        })
    }

    /// The attribute fields between `unit=` and `;`. Empty fields read as absent.
    fn parse_header(&mut self) -> ParseResult<UnitHeader> {
        let start = self.scanner.position();
        let mut fields: Vec<String> = Vec::with_capacity(MAX_ATTRIBUTES);
        loop {
            let field = self.scanner.scan_until(&[',', ';', '{', '}', '\n'])?;
            fields.push(field.trim().to_string());
            if self.scanner.at_eof() || self.scanner.current() != ',' {
                break;
            }
            if fields.len() == MAX_ATTRIBUTES {
                return Err(self.scanner.syntax_error(format!(
                    "a unit has at most {} attributes",
                    MAX_ATTRIBUTES
                )));
            }
            self.scanner.advance()?;
        }

        let mut fields = fields.into_iter().map(|field| (!field.is_empty()).then_some(field));
        let name = match fields.next().flatten() {
            Some(name) => name,
            None => {
                return Err(ParseError::syntax(
                    "unit name is missing",
                    start,
                    self.scanner.stream().snippet(),
                ))
            }
        };
        Ok(UnitHeader {
            name,
            permission: fields.next().flatten(),
            owner: fields.next().flatten(),
            resource_group: fields.next().flatten(),
        })
    }

    /// A parameter name, or the `unit` keyword of a child unit.
    fn scan_parameter_name(&mut self) -> ParseResult<String> {
        let position = self.scanner.position();
        let name = self.scanner.scan_until(&['=', ';', '{', '}', '\n'])?;
        let name = name.trim();
        if name.is_empty() || !name.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_') {
            return Err(ParseError::syntax(
                format!("invalid parameter name `{}`", name),
                position,
                self.scanner.stream().snippet(),
            ));
        }
        Ok(name.to_string())
    }

    fn parse_parameter(&mut self, name: String, position: Position) -> ParseResult<Parameter> {
        if self.scanner.at_eof() || self.scanner.current() != '=' {
            return Err(self.scanner.syntax_error(format!(
                "expected `=` after parameter name `{}`, found {}",
                name,
                describe(self.scanner.current())
            )));
        }
        self.scanner.advance()?;

        let mut values = vec![self.parse_value()?];
        self.scanner.skip_spaces()?;
        while !self.scanner.at_eof() && self.scanner.current() == ',' {
            self.scanner.advance()?;
            values.push(self.parse_value()?);
            self.scanner.skip_spaces()?;
        }
        self.scanner.expect_char(';')?;

        let parameter = Parameter::with_values(name.as_str(), values)
            .ok_or_else(|| self.scanner.syntax_error(format!("parameter `{}` has no value", name)))?;
        Ok(parameter.at(position))
    }

    fn parse_value(&mut self) -> ParseResult<ParameterValue> {
        self.scanner.skip_spaces()?;
        if self.scanner.quote_rule_at_current().is_some() {
            let (text, rule) = self.scanner.scan_quoted_string()?;
            return Ok(ParameterValue::quoted_with(text, rule));
        }
        if !self.scanner.at_eof() && self.scanner.current() == '(' {
            return Ok(ParameterValue::tuple(parse_tuple(&mut self.scanner)?));
        }
        self.parse_raw()
    }

    fn parse_raw(&mut self) -> ParseResult<ParameterValue> {
        let mut text = String::new();
        loop {
            let chunk = self.scanner.scan_until(&self.raw_stops)?;
            text.push_str(&chunk);
            if self.scanner.quote_rule_at_current().is_none() {
                break;
            }
            let (quoted, rule) = self.scanner.scan_quoted_string()?;
            text.push_str(&rule.escape(&quoted));
        }
        text.truncate(text.trim_end().len());
        Ok(ParameterValue::raw(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ajs::lexing::{CharacterStream, StrSource};
    use crate::ajs::parsing::ParseOptions;

    fn parse_drafts(text: &str) -> Result<Vec<UnitDraft>, ParseError> {
        let stream = CharacterStream::new(StrSource::new(text))?;
        let scanner = TokenScanner::new(stream, ParseOptions::default().scanner);
        UnitGrammar::new(scanner).parse_document()
    }

    fn message(text: &str) -> String {
        let err = parse_drafts(text).unwrap_err();
        err.message().unwrap_or_default().to_string()
    }

    #[test]
    fn test_header_fields() {
        let drafts = parse_drafts("unit=NET,AP,jp1admin,grp;{ty=n;}").unwrap();
        let header = &drafts[0].header;
        assert_eq!(header.name, "NET");
        assert_eq!(header.permission.as_deref(), Some("AP"));
        assert_eq!(header.owner.as_deref(), Some("jp1admin"));
        assert_eq!(header.resource_group.as_deref(), Some("grp"));

        let drafts = parse_drafts("unit = NET;{ty=n;}").unwrap();
        assert_eq!(drafts[0].header, UnitHeader::new("NET"));
    }

    #[test]
    fn test_header_errors() {
        assert_eq!(message("unit=,,,;{ty=n;}"), "unit name is missing");
        assert_eq!(message("unit=A,b,c,d,e;{ty=n;}"), "a unit has at most 4 attributes");
        assert_eq!(message("unit=A{ty=n;}"), "expected `;`, found `{`");
    }

    #[test]
    fn test_value_variants() {
        let drafts = parse_drafts("unit=J,,,;{ty=j;te=1, \"a,b\" ,(f=A,t=B),'x#'y';}").unwrap();
        let te = &drafts[0].parameters[1];
        assert_eq!(te.name(), "te");
        assert_eq!(te.len(), 4);
        assert_eq!(te.values()[0], ParameterValue::raw("1"));
        assert_eq!(te.values()[1], ParameterValue::quoted("a,b"));
        assert_eq!(te.values()[2].as_tuple().map(|tuple| tuple.len()), Some(2));
        assert_eq!(te.values()[3].as_str(), "x'y");
    }

    #[test]
    fn test_raw_value_with_embedded_quotes() {
        let drafts = parse_drafts("unit=J,,,;{ty=j;sc=run \"a,b;c\" now  ;}").unwrap();
        let sc = &drafts[0].parameters[1];
        assert_eq!(sc.values(), &[ParameterValue::raw("run \"a,b;c\" now")]);
    }

    #[test]
    fn test_raw_value_reescapes_embedded_escapes() {
        let drafts = parse_drafts("unit=J,,,;{ty=j;sc=x\"#\"q##\"y;}").unwrap();
        assert_eq!(drafts[0].parameters[1].first_value().as_str(), "x\"#\"q##\"y");
    }

    #[test]
    fn test_raw_value_with_unterminated_embedded_quote() {
        assert_eq!(
            message("unit=J,,,;{ty=j;sc=run \"oops;}"),
            "unterminated quoted text opened at line 1, column 24"
        );
    }

    #[test]
    fn test_comments_between_parameters_but_not_inside_values() {
        let text = "/* net */ unit=J,,,;{ // header\n ty=j; sc=//srv/share/run.bat;\n}";
        let drafts = parse_drafts(text).unwrap();
        assert_eq!(drafts[0].parameters[1].first_value().as_str(), "//srv/share/run.bat");
    }

    #[test]
    fn test_children_and_fully_qualified_names() {
        let text = "unit=A,,,;{ty=n;unit=B,,,;{ty=n;unit=C,,,;{ty=j;}}unit=D,,,;{ty=j;}}";
        let drafts = parse_drafts(text).unwrap();
        let a = &drafts[0];
        assert_eq!(a.children.len(), 2);
        assert_eq!(a.children[0].children[0].fully_qualified_name, "A/B/C");
        assert_eq!(a.children[1].fully_qualified_name, "A/D");
    }

    #[test]
    fn test_parameters_after_children_are_rejected() {
        assert_eq!(
            message("unit=A,,,;{ty=n;unit=B,,,;{ty=j;}cm=x;}"),
            "expected `}` closing unit `A`, found parameter `cm`"
        );
    }

    #[test]
    fn test_unit_keyword_may_be_followed_by_a_line_break() {
        let text = "unit\n=A,,,;{ty=n;\n  unit\n  =B,,,;{ty=j;}\n  unit =C,,,;{ty=j;}\n}";
        let drafts = parse_drafts(text).unwrap();
        let names: Vec<&str> = drafts[0]
            .children
            .iter()
            .map(|child| child.fully_qualified_name.as_str())
            .collect();
        assert_eq!(names, vec!["A/B", "A/C"]);
        assert_eq!(drafts[0].children[0].position, Position::new(3, 3));
    }

    #[test]
    fn test_names_that_start_with_unit_are_parameters() {
        let drafts = parse_drafts("unit=A,,,;{ty=n;units=3;unit_x=y;}").unwrap();
        let names: Vec<&str> = drafts[0].parameters.iter().map(Parameter::name).collect();
        assert_eq!(names, vec!["ty", "units", "unit_x"]);
        assert!(drafts[0].children.is_empty());
    }

    #[test]
    fn test_missing_ty_rejected() {
        assert_eq!(message("unit=FOO,,,;{}"), "unit `FOO` has no `ty` parameter");
        assert_eq!(message("unit=FOO,,,;{ty=;}"), "unit `FOO` has no `ty` parameter");
    }

    #[test]
    fn test_parameter_errors() {
        assert_eq!(message("unit=A,,,;{ty=n\n}"), "expected `;`, found `}`");
        assert_eq!(message("unit=A,,,;{ty n;}"), "invalid parameter name `ty n`");
        assert_eq!(message("unit=A,,,;{ty;}"), "expected `=` after parameter name `ty`, found `;`");
        assert_eq!(message("unit=A,,,;{ty=n;"), "expected `}` closing unit `A`, found end of input");
    }

    #[test]
    fn test_document_needs_a_unit() {
        assert_eq!(message("  // nothing here\n"), "no unit definition found");
        assert_eq!(message("unix=A;{}"), "word not found: expected `unit`");
    }
}

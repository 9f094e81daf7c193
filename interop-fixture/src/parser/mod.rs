// Pest-based parser for .interop fixture scripts

use crate::ast::*;
use crate::error::*;
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

mod literals;
mod statements;

#[derive(Parser)]
#[grammar = "grammar.pest"]
pub struct FixtureParser;

impl FixtureParser {
    /// Parse a whole script
    pub fn parse_script(input: &str) -> ParseResult<Script> {
        Self::parse_script_with_source(input, None)
    }

    /// Parse a whole script, remembering which file it came from
    pub fn parse_script_with_source(
        input: &str,
        source_file: Option<String>,
    ) -> ParseResult<Script> {
        let mut pairs = Self::parse(Rule::script, input)
            .map_err(|e| ParseError::from_pest_error(e, input.to_string()))?;
        let script_pair = pairs.next().ok_or_else(|| Self::missing_rule("script", input))?;
        let span = Self::extract_span(&script_pair);

        let mut statements = Vec::new();
        for pair in script_pair.into_inner() {
            if pair.as_rule() == Rule::EOI {
                continue;
            }
            statements.push(Self::parse_statement_pair(pair)?);
        }

        Ok(Script {
            statements,
            source_file,
            span,
        })
    }

    /// Parse exactly one statement (used by the REPL)
    pub fn parse_statement(input: &str) -> ParseResult<Statement> {
        let mut pairs = Self::parse(Rule::single_statement, input)
            .map_err(|e| ParseError::from_pest_error(e, input.to_string()))?;
        let outer = pairs
            .next()
            .ok_or_else(|| Self::missing_rule("single_statement", input))?;

        let inner = outer
            .into_inner()
            .find(|pair| pair.as_rule() != Rule::EOI)
            .ok_or_else(|| Self::missing_rule("statement", input))?;

        Self::parse_statement_pair(inner)
    }

    pub(super) fn extract_span(pair: &Pair<Rule>) -> Span {
        let span = pair.as_span();
        Span::new(span.start(), span.end())
    }

    /// Build a miette-ready error for a literal that matched the grammar but
    /// could not be converted
    pub(super) fn create_parse_error(
        pair: &Pair<Rule>,
        constructor: fn(String, miette::SourceSpan, String) -> ParseError,
    ) -> ParseError {
        let span = Self::extract_span(pair);
        constructor(
            pair.get_input().to_string(),
            span.into(),
            pair.as_str().to_string(),
        )
    }

    /// First inner pair with the given rule
    pub(super) fn find_inner<'i>(pair: &Pair<'i, Rule>, rule: Rule) -> Option<Pair<'i, Rule>> {
        pair.clone().into_inner().find(|inner| inner.as_rule() == rule)
    }

    /// Like `find_inner`, but a missing rule is a parse error
    pub(super) fn expect_inner<'i>(
        pair: &Pair<'i, Rule>,
        rule: Rule,
    ) -> ParseResult<Pair<'i, Rule>> {
        Self::find_inner(pair, rule).ok_or_else(|| ParseError::UnexpectedRule {
            expected: format!("{:?}", rule),
            found: pair.as_rule(),
            span: Self::extract_span(pair),
        })
    }

    pub(super) fn parse_identifier(pair: Pair<Rule>) -> Identifier {
        Identifier {
            name: pair.as_str().to_string(),
            span: Self::extract_span(&pair),
        }
    }

    fn missing_rule(rule: &str, input: &str) -> ParseError {
        ParseError::PestError {
            src: input.to_string(),
            span: miette::SourceSpan::new(0.into(), 0),
            message: format!("Expected {rule}"),
        }
    }
}

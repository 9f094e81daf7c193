// Literal parsing functions for the fixture parser
// Handles integers, floats, strings, symbols, booleans and nil

use super::{FixtureParser, Rule};
use crate::ast::*;
use crate::error::*;
use pest::iterators::Pair;

impl FixtureParser {
    /// Parse a `literal` pair (or any of its alternatives directly)
    pub(super) fn parse_literal(pair: Pair<Rule>) -> ParseResult<Literal> {
        let pair = if pair.as_rule() == Rule::literal {
            Self::single_inner(pair)?
        } else {
            pair
        };
        let span = Self::extract_span(&pair);

        let kind = match pair.as_rule() {
            Rule::integer => pair
                .as_str()
                .parse::<i64>()
                .map(LiteralKind::Integer)
                .map_err(|_| Self::create_parse_error(&pair, ParseError::invalid_integer))?,
            Rule::float => pair
                .as_str()
                .parse::<f64>()
                .map(LiteralKind::Float)
                .map_err(|_| Self::create_parse_error(&pair, ParseError::invalid_float))?,
            Rule::string => LiteralKind::String(Self::parse_string_content(pair)?),
            Rule::symbol => LiteralKind::Symbol(Self::parse_symbol_name(pair)?),
            Rule::boolean => {
                let inner = Self::single_inner(pair)?;
                LiteralKind::Boolean(inner.as_rule() == Rule::kw_true)
            }
            Rule::nil => LiteralKind::Nil,
            found => {
                return Err(ParseError::UnexpectedRule {
                    expected: "literal".to_string(),
                    found,
                    span,
                })
            }
        };

        Ok(Literal { kind, span })
    }

    /// Parse a `[:a, :b]` symbol list
    pub(super) fn parse_symbol_list(pair: Pair<Rule>) -> ParseResult<Vec<Literal>> {
        pair.into_inner()
            .filter(|inner| inner.as_rule() == Rule::symbol)
            .map(Self::parse_literal)
            .collect()
    }

    fn parse_symbol_name(pair: Pair<Rule>) -> ParseResult<String> {
        let name = Self::expect_inner(&pair, Rule::symbol_name)?;
        Ok(name.as_str().to_string())
    }

    /// Decode the escapes of a string literal's content
    fn parse_string_content(pair: Pair<Rule>) -> ParseResult<String> {
        let content = Self::expect_inner(&pair, Rule::string_content)?;
        let raw = content.as_str();
        let mut decoded = String::with_capacity(raw.len());
        let mut chars = raw.char_indices();

        while let Some((_, c)) = chars.next() {
            if c != '\\' {
                decoded.push(c);
                continue;
            }

            let escaped = match chars.next() {
                Some((_, 'n')) => '\n',
                Some((_, 't')) => '\t',
                Some((_, 'r')) => '\r',
                Some((_, '0')) => '\0',
                Some((_, '\\')) => '\\',
                Some((_, '"')) => '"',
                Some((offset, other)) => {
                    let start = content.as_span().start() + offset - 1;
                    return Err(ParseError::invalid_string_escape(
                        pair.get_input().to_string(),
                        miette::SourceSpan::new(start.into(), 1 + other.len_utf8()),
                        format!("\\{}", other),
                    ));
                }
                // The grammar never ends content on a lone backslash
                None => '\\',
            };
            decoded.push(escaped);
        }

        Ok(decoded)
    }

    fn single_inner(pair: Pair<Rule>) -> ParseResult<Pair<Rule>> {
        let rule = pair.as_rule();
        let span = Self::extract_span(&pair);
        pair.into_inner()
            .next()
            .ok_or(ParseError::UnexpectedRule {
                expected: "inner rule".to_string(),
                found: rule,
                span,
            })
    }
}

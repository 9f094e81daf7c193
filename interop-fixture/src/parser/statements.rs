// Statement parsing functions for the fixture parser
// Handles assignments, object expressions, class definitions, queries and expectations

use super::{FixtureParser, Rule};
use crate::ast::*;
use crate::error::*;
use pest::iterators::Pair;

impl FixtureParser {
    pub(super) fn parse_statement_pair(pair: Pair<Rule>) -> ParseResult<Statement> {
        let span = Self::extract_span(&pair);

        let kind = match pair.as_rule() {
            Rule::assignment => StatementKind::Assignment(Self::parse_assignment(pair)?),
            Rule::class_definition => {
                StatementKind::ClassDefinition(Self::parse_class_definition(pair)?)
            }
            Rule::set_internal => StatementKind::SetInternal(Self::parse_set_internal(pair)?),
            Rule::freeze_statement => {
                let object = Self::expect_inner(&pair, Rule::identifier)?;
                StatementKind::Freeze(Self::parse_identifier(object))
            }
            Rule::query => StatementKind::Query(Self::parse_query(pair)?),
            Rule::expect_statement => StatementKind::Expect(Self::parse_expectation(pair)?),
            found => {
                return Err(ParseError::UnexpectedRule {
                    expected: "statement".to_string(),
                    found,
                    span,
                })
            }
        };

        Ok(Statement { kind, span })
    }

    fn parse_assignment(pair: Pair<Rule>) -> ParseResult<Assignment> {
        let variable = Self::parse_identifier(Self::expect_inner(&pair, Rule::identifier)?);
        let expression = Self::parse_expression(Self::expect_inner(&pair, Rule::expression)?)?;
        Ok(Assignment {
            variable,
            expression,
        })
    }

    fn parse_expression(pair: Pair<Rule>) -> ParseResult<Expression> {
        let span = Self::extract_span(&pair);
        let inner = pair
            .into_inner()
            .next()
            .ok_or(ParseError::UnexpectedRule {
                expected: "expression".to_string(),
                found: Rule::expression,
                span,
            })?;

        let kind = match inner.as_rule() {
            Rule::hash_literal => ExpressionKind::Hash(Self::parse_hash_literal(inner)?),
            Rule::meta_literal => {
                let hash = Self::expect_inner(&inner, Rule::hash_literal)?;
                ExpressionKind::Meta(Self::parse_hash_literal(hash)?)
            }
            Rule::new_object => ExpressionKind::New(Self::parse_new_object(inner)?),
            _ => ExpressionKind::Literal(Self::parse_literal(inner)?),
        };

        Ok(Expression { kind, span })
    }

    fn parse_hash_literal(pair: Pair<Rule>) -> ParseResult<HashLiteral> {
        let span = Self::extract_span(&pair);
        let mut entries = Vec::new();

        for entry_pair in pair.into_inner() {
            if entry_pair.as_rule() != Rule::hash_entry {
                continue;
            }
            let mut parts = entry_pair.into_inner();
            let (Some(key), Some(value)) = (parts.next(), parts.next()) else {
                return Err(ParseError::UnexpectedRule {
                    expected: "hash entry".to_string(),
                    found: Rule::hash_entry,
                    span,
                });
            };
            entries.push(HashEntry {
                key: Self::parse_literal(key)?,
                value: Self::parse_literal(value)?,
            });
        }

        Ok(HashLiteral { entries, span })
    }

    fn parse_new_object(pair: Pair<Rule>) -> ParseResult<NewObject> {
        let class_name = Self::parse_identifier(Self::expect_inner(&pair, Rule::constant)?);
        let mut internals = Vec::new();

        if let Some(block) = Self::find_inner(&pair, Rule::internal_block) {
            for init in block.into_inner() {
                if init.as_rule() == Rule::internal_init {
                    internals.push(Self::parse_internal_init(init)?);
                }
            }
        }

        Ok(NewObject {
            class_name,
            internals,
        })
    }

    fn parse_internal_init(pair: Pair<Rule>) -> ParseResult<InternalInit> {
        let name = Self::parse_identifier(Self::expect_inner(&pair, Rule::internal_name)?);
        let value = Self::parse_literal(Self::expect_inner(&pair, Rule::literal)?)?;
        Ok(InternalInit { name, value })
    }

    fn parse_class_definition(pair: Pair<Rule>) -> ParseResult<ClassDefinition> {
        let name = Self::parse_identifier(Self::expect_inner(&pair, Rule::constant)?);
        let mut accessors = Vec::new();

        for inner in pair.into_inner() {
            if inner.as_rule() == Rule::accessor_declaration {
                accessors.push(Self::parse_accessor_declaration(inner)?);
            }
        }

        Ok(ClassDefinition { name, accessors })
    }

    fn parse_accessor_declaration(pair: Pair<Rule>) -> ParseResult<AccessorDeclaration> {
        let span = Self::extract_span(&pair);
        let kind_pair = Self::expect_inner(&pair, Rule::accessor_kind)?;
        let kind = match kind_pair.into_inner().next().map(|kw| kw.as_rule()) {
            Some(Rule::kw_attr_reader) => AccessorKind::Reader,
            Some(Rule::kw_attr_writer) => AccessorKind::Writer,
            _ => AccessorKind::Accessor,
        };

        let mut names = Vec::new();
        for symbol in pair.into_inner() {
            if symbol.as_rule() == Rule::accessor_symbol {
                let name = Self::expect_inner(&symbol, Rule::accessor_name)?;
                names.push(Self::parse_identifier(name));
            }
        }

        Ok(AccessorDeclaration { kind, names, span })
    }

    fn parse_set_internal(pair: Pair<Rule>) -> ParseResult<SetInternal> {
        let object = Self::parse_identifier(Self::expect_inner(&pair, Rule::identifier)?);
        let name = Self::parse_identifier(Self::expect_inner(&pair, Rule::internal_name)?);
        let value = Self::parse_literal(Self::expect_inner(&pair, Rule::literal)?)?;
        Ok(SetInternal {
            object,
            name,
            value,
        })
    }

    fn parse_query(pair: Pair<Rule>) -> ParseResult<Query> {
        let span = Self::extract_span(&pair);
        let inner = pair
            .into_inner()
            .next()
            .ok_or(ParseError::UnexpectedRule {
                expected: "query".to_string(),
                found: Rule::query,
                span,
            })?;
        let object = Self::parse_identifier(Self::expect_inner(&inner, Rule::identifier)?);

        let kind = match inner.as_rule() {
            Rule::key_info_query => QueryKind::KeyInfo {
                object,
                key: Self::parse_literal(Self::expect_inner(&inner, Rule::literal)?)?,
            },
            Rule::read_query => QueryKind::Read {
                object,
                key: Self::parse_literal(Self::expect_inner(&inner, Rule::literal)?)?,
            },
            _ => QueryKind::Keys {
                object,
                include_internal: Self::find_inner(&inner, Rule::kw_internal).is_some(),
            },
        };

        Ok(Query { kind, span })
    }

    fn parse_expectation(pair: Pair<Rule>) -> ParseResult<Expectation> {
        let span = Self::extract_span(&pair);
        let query = Self::parse_query(Self::expect_inner(&pair, Rule::query)?)?;
        let matcher_pair = Self::expect_inner(&pair, Rule::matcher)?;
        let matcher_span = Self::extract_span(&matcher_pair);
        let inner = matcher_pair
            .into_inner()
            .next()
            .ok_or(ParseError::UnexpectedRule {
                expected: "matcher".to_string(),
                found: Rule::matcher,
                span: matcher_span,
            })?;

        let matcher = match inner.as_rule() {
            Rule::equals_matcher => {
                if let Some(list) = Self::find_inner(&inner, Rule::symbol_list) {
                    Matcher::Equals(ExpectedValue::SymbolList(Self::parse_symbol_list(list)?))
                } else {
                    let literal = Self::expect_inner(&inner, Rule::literal)?;
                    Matcher::Equals(ExpectedValue::Literal(Self::parse_literal(literal)?))
                }
            }
            Rule::includes_matcher => {
                Matcher::Includes(Self::parse_literal(Self::expect_inner(&inner, Rule::symbol)?)?)
            }
            Rule::excludes_matcher => {
                Matcher::Excludes(Self::parse_literal(Self::expect_inner(&inner, Rule::symbol)?)?)
            }
            _ => Matcher::IsEmpty,
        };

        Ok(Expectation {
            query,
            matcher,
            span,
        })
    }
}

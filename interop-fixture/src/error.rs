// Interop Fixture Error Handling
// Parse errors carry the script source so miette can render them directly

use crate::parser::Rule;
use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Main parse error type with miette integration
#[derive(Error, Diagnostic, Debug)]
pub enum ParseError {
    #[error("Parse error")]
    #[diagnostic(
        code(interop::parse::pest_error),
        help("{message}")
    )]
    PestError {
        #[source_code]
        src: String,
        #[label("error occurred here")]
        span: SourceSpan,
        message: String,
    },

    #[error("Invalid integer literal")]
    #[diagnostic(
        code(interop::parse::invalid_integer),
        help("Integer literals must fit in a signed 64-bit integer")
    )]
    InvalidInteger {
        #[source_code]
        src: String,
        #[label("invalid integer")]
        span: SourceSpan,
        found: String,
    },

    #[error("Invalid float literal")]
    #[diagnostic(
        code(interop::parse::invalid_float),
        help("Float literals are decimal numbers with a fractional part (e.g., 3.14)")
    )]
    InvalidFloat {
        #[source_code]
        src: String,
        #[label("invalid float")]
        span: SourceSpan,
        found: String,
    },

    #[error("Invalid string escape sequence")]
    #[diagnostic(
        code(interop::parse::invalid_string_escape),
        help("Valid escape sequences: \\n, \\t, \\r, \\0, \\\\, \\\"")
    )]
    InvalidStringEscape {
        #[source_code]
        src: String,
        #[label("invalid escape sequence")]
        span: SourceSpan,
        found: String,
    },

    #[error("Unexpected grammar rule")]
    #[diagnostic(
        code(interop::parse::unexpected_rule),
        help("Expected rule: {expected}")
    )]
    UnexpectedRule {
        expected: String,
        found: Rule,
        span: crate::ast::Span,
    },
}

impl ParseError {
    /// Create a parse error from a Pest parsing error
    pub fn from_pest_error(error: pest::error::Error<Rule>, src: String) -> Self {
        let span = match error.location {
            pest::error::InputLocation::Pos(pos) => SourceSpan::new(pos.into(), 1),
            pest::error::InputLocation::Span((start, end)) => {
                SourceSpan::new(start.into(), end - start)
            }
        };

        let message = match &error.variant {
            pest::error::ErrorVariant::ParsingError { positives, .. } if !positives.is_empty() => {
                let mut expected: Vec<String> = positives
                    .iter()
                    .map(rule_to_user_friendly_description)
                    .collect();
                expected.dedup();

                if expected.len() == 1 {
                    format!("Expected {}", expected[0])
                } else {
                    format!("Expected one of: {}", expected.join(", "))
                }
            }
            pest::error::ErrorVariant::ParsingError { .. } => {
                "Unexpected input".to_string()
            }
            pest::error::ErrorVariant::CustomError { message } => message.clone(),
        };

        ParseError::PestError { src, span, message }
    }

    pub fn invalid_integer(src: String, span: SourceSpan, found: String) -> Self {
        ParseError::InvalidInteger { src, span, found }
    }

    pub fn invalid_float(src: String, span: SourceSpan, found: String) -> Self {
        ParseError::InvalidFloat { src, span, found }
    }

    pub fn invalid_string_escape(src: String, span: SourceSpan, found: String) -> Self {
        ParseError::InvalidStringEscape { src, span, found }
    }
}

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Convert a parser rule to a user-friendly description
fn rule_to_user_friendly_description(rule: &Rule) -> String {
    match rule {
        Rule::integer => "an integer (like 42)".to_string(),
        Rule::float => "a float (like 3.14)".to_string(),
        Rule::string => "a string (like \"a\")".to_string(),
        Rule::symbol => "a symbol (like :ro or :@exists)".to_string(),
        Rule::accessor_symbol | Rule::accessor_name => {
            "an accessor name without '@' (like :ro)".to_string()
        }
        Rule::symbol_list => "a symbol list (like [:existing, :readable])".to_string(),
        Rule::boolean => "a boolean (true or false)".to_string(),
        Rule::nil => "nil".to_string(),
        Rule::literal => "a literal value".to_string(),

        Rule::identifier => "a variable name (like hash)".to_string(),
        Rule::constant => "a class name (like KeyInfoFixture)".to_string(),
        Rule::internal_name => "an instance variable name (like @exists)".to_string(),

        Rule::expression => "an object or literal".to_string(),
        Rule::hash_literal => "a hash (like {\"a\" => 1})".to_string(),
        Rule::hash_entry => "a hash entry (like \"a\" => 1)".to_string(),
        Rule::meta_literal => "a meta object (like meta {\"name\" => \"Hash\"})".to_string(),
        Rule::new_object => "an object (like new KeyInfoFixture)".to_string(),
        Rule::internal_init => "an instance variable assignment (like @exists = 14)".to_string(),

        Rule::assignment => "an assignment".to_string(),
        Rule::class_definition => "a class definition".to_string(),
        Rule::accessor_declaration | Rule::accessor_kind => {
            "an accessor declaration (attr_reader, attr_writer or attr_accessor)".to_string()
        }
        Rule::set_internal => "a set statement".to_string(),
        Rule::freeze_statement => "a freeze statement".to_string(),
        Rule::expect_statement => "an expect statement".to_string(),
        Rule::query | Rule::key_info_query | Rule::keys_query | Rule::read_query => {
            "a query (key_info, keys or read)".to_string()
        }
        Rule::matcher
        | Rule::equals_matcher
        | Rule::includes_matcher
        | Rule::excludes_matcher
        | Rule::empty_matcher => "a matcher (==, includes, excludes or is_empty)".to_string(),
        Rule::kw_internal => "'internal'".to_string(),
        Rule::EOI => "end of input".to_string(),

        _ => format!("{:?}", rule),
    }
}

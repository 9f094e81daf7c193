// Interop Fixture Library
// Pest-based parser for .interop key_info fixture scripts

pub mod ast;
pub mod error;
pub mod parser;

pub use ast::*;
pub use error::*;
pub use parser::*;

// Re-export parser rule for manual testing
pub use parser::Rule;

/// File extension of fixture scripts
pub const SCRIPT_EXTENSION: &str = "interop";

// Main parsing functions
pub fn parse_script(input: &str) -> Result<Script, ParseError> {
    parser::FixtureParser::parse_script(input)
}

pub fn parse_script_with_source(
    input: &str,
    source_file: Option<String>,
) -> Result<Script, ParseError> {
    parser::FixtureParser::parse_script_with_source(input, source_file)
}

pub fn parse_statement(input: &str) -> Result<Statement, ParseError> {
    parser::FixtureParser::parse_statement(input)
}

// Version and metadata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

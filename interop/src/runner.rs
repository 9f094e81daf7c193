//! Fixture script runner
//!
//! Executes parsed `.interop` statements against the key classifier:
//! - builds Hash, attributed and meta objects from the script's expressions
//! - keeps variable and class bindings across statements
//! - evaluates `key_info`, `keys` and `read` queries
//! - checks `expect` statements and records failures with their spans

use indexmap::IndexMap;
use interop_core::{
    Accessor, AttributedObject, CapabilitySet, InteropError, Key, MappingObject, MetaObject,
    Target, Value,
};
use interop_fixture::{
    AccessorKind, ClassDefinition, Expectation, ExpectedValue, Expression, ExpressionKind,
    HashLiteral, Identifier, Literal, LiteralKind, Matcher, ParseError, Query, QueryKind, Script,
    Span, Statement, StatementKind,
};
use miette::{Diagnostic, SourceSpan};
use std::fmt;
use thiserror::Error;

/// Errors raised while running a script
#[derive(Debug, Error, Diagnostic)]
pub enum RunError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),

    #[error("Undefined variable: {name}")]
    #[diagnostic(
        code(interop::run::undefined_variable),
        help("Assign the variable before using it")
    )]
    UndefinedVariable {
        name: String,
        #[label("not defined")]
        span: SourceSpan,
    },

    #[error("Undefined class: {name}")]
    #[diagnostic(
        code(interop::run::undefined_class),
        help("Define the class with `class {name} {{ ... }}` before instantiating it")
    )]
    UndefinedClass {
        name: String,
        #[label("not defined")]
        span: SourceSpan,
    },

    #[error("Unknown capability: :{name}")]
    #[diagnostic(
        code(interop::run::unknown_capability),
        help("Capabilities are :existing, :readable, :writable, :invocable, :internal, :insertable, :removable and :modifiable")
    )]
    UnknownCapability {
        name: String,
        #[label("not a capability")]
        span: SourceSpan,
    },

    #[error("Interop call failed")]
    #[diagnostic(code(interop::run::interop_error))]
    Interop {
        #[source]
        #[diagnostic_source]
        source: InteropError,
        #[label("raised here")]
        span: SourceSpan,
    },

    #[error("Expectation failed: expected {expected}, got {actual}")]
    #[diagnostic(code(interop::run::expectation_failed))]
    ExpectationFailed {
        expected: String,
        actual: String,
        #[label("expected {expected}")]
        span: SourceSpan,
    },
}

impl RunError {
    fn interop(source: InteropError, span: Span) -> Self {
        RunError::Interop {
            source,
            span: span.into(),
        }
    }

    fn undefined_variable(identifier: &Identifier) -> Self {
        RunError::UndefinedVariable {
            name: identifier.name.clone(),
            span: identifier.span.into(),
        }
    }

    pub fn is_expectation_failure(&self) -> bool {
        matches!(self, RunError::ExpectationFailed { .. })
    }
}

/// Result of a query statement
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    Capabilities(CapabilitySet),
    Keys(Vec<Key>),
    Value(Value),
}

impl fmt::Display for QueryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryResult::Capabilities(capabilities) => write!(f, "{capabilities}"),
            QueryResult::Keys(keys) => {
                let names: Vec<String> = keys.iter().map(|key| format!(":{key}")).collect();
                write!(f, "[{}]", names.join(", "))
            }
            QueryResult::Value(value) => write!(f, "{value}"),
        }
    }
}

/// What executing a single statement produced
#[derive(Debug, Clone, PartialEq)]
pub enum StatementOutcome {
    /// A variable was (re)bound
    Bound { name: String, value: Value },
    /// A class was defined or reopened
    ClassDefined { name: String },
    /// An object was mutated in place (set, freeze)
    Updated { name: String },
    /// A bare query was evaluated
    Query(QueryResult),
    /// An expectation held
    Passed,
}

/// Summary of a whole script run
#[derive(Debug, Default)]
pub struct ScriptReport {
    /// Rendered results of bare queries, with the span of the query
    pub outputs: Vec<(Span, String)>,
    pub passed: usize,
    pub failed: usize,
    /// Failed expectations, followed by the error that stopped the script, if any
    pub errors: Vec<RunError>,
}

impl ScriptReport {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Execution state for fixture statements
#[derive(Debug, Default)]
pub struct Runner {
    variables: IndexMap<String, Value>,
    classes: IndexMap<String, IndexMap<String, Accessor>>,
}

impl Runner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn variables(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.variables.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    /// Forget all variables and classes
    pub fn clear(&mut self) {
        self.variables.clear();
        self.classes.clear();
    }

    /// Run every statement of a script.
    ///
    /// Failed expectations are recorded and execution continues; any other
    /// error stops the script.
    pub fn run_script(&mut self, script: &Script) -> ScriptReport {
        let mut report = ScriptReport::default();

        for statement in &script.statements {
            match self.execute(statement) {
                Ok(StatementOutcome::Query(result)) => {
                    report.outputs.push((statement.span, result.to_string()));
                }
                Ok(StatementOutcome::Passed) => report.passed += 1,
                Ok(_) => {}
                Err(error) if error.is_expectation_failure() => {
                    report.failed += 1;
                    report.errors.push(error);
                }
                Err(error) => {
                    tracing::debug!(%error, "script stopped");
                    report.errors.push(error);
                    break;
                }
            }
        }

        report
    }

    /// Execute a single statement
    pub fn execute(&mut self, statement: &Statement) -> Result<StatementOutcome, RunError> {
        tracing::debug!(
            start = statement.span.start,
            end = statement.span.end,
            "executing statement"
        );

        match &statement.kind {
            StatementKind::Assignment(assignment) => {
                let value = self.evaluate_expression(&assignment.expression)?;
                let name = assignment.variable.name.clone();
                self.variables.insert(name.clone(), value.clone());
                Ok(StatementOutcome::Bound { name, value })
            }
            StatementKind::ClassDefinition(class) => Ok(self.define_class(class)),
            StatementKind::SetInternal(set) => {
                let value = literal_value(&set.value);
                self.target_mut(&set.object)?
                    .set_internal(set.name.name.as_str(), value)
                    .map_err(|error| RunError::interop(error, statement.span))?;
                Ok(StatementOutcome::Updated {
                    name: set.object.name.clone(),
                })
            }
            StatementKind::Freeze(object) => {
                self.target_mut(object)?.freeze();
                Ok(StatementOutcome::Updated {
                    name: object.name.clone(),
                })
            }
            StatementKind::Query(query) => Ok(StatementOutcome::Query(self.evaluate_query(query)?)),
            StatementKind::Expect(expectation) => {
                self.check_expectation(expectation)?;
                Ok(StatementOutcome::Passed)
            }
        }
    }

    fn define_class(&mut self, class: &ClassDefinition) -> StatementOutcome {
        // Reopening a class adds to its accessor table
        let accessors = self.classes.entry(class.name.name.clone()).or_default();
        for declaration in &class.accessors {
            let accessor = match declaration.kind {
                AccessorKind::Reader => Accessor::READER,
                AccessorKind::Writer => Accessor::WRITER,
                AccessorKind::Accessor => Accessor::BOTH,
            };
            for name in &declaration.names {
                let slot = accessors.entry(name.name.clone()).or_default();
                *slot = slot.merge(accessor);
            }
        }

        StatementOutcome::ClassDefined {
            name: class.name.name.clone(),
        }
    }

    fn evaluate_expression(&self, expression: &Expression) -> Result<Value, RunError> {
        match &expression.kind {
            ExpressionKind::Hash(hash) => {
                let entries = hash_entries(hash)?;
                Ok(Value::object(MappingObject::from_entries(entries)))
            }
            ExpressionKind::Meta(hash) => {
                let properties = hash_entries(hash)?;
                Ok(Value::object(MetaObject::new(properties)))
            }
            ExpressionKind::New(new_object) => {
                let class_name = &new_object.class_name;
                let accessors =
                    self.classes
                        .get(&class_name.name)
                        .ok_or_else(|| RunError::UndefinedClass {
                            name: class_name.name.clone(),
                            span: class_name.span.into(),
                        })?;

                let mut object = AttributedObject::with_accessors(
                    class_name.name.as_str(),
                    accessors.iter().map(|(name, accessor)| (name.as_str(), *accessor)),
                )
                .map_err(|error| RunError::interop(error, class_name.span))?;
                for init in &new_object.internals {
                    object
                        .set_internal(init.name.name.as_str(), literal_value(&init.value))
                        .map_err(|error| RunError::interop(error, init.name.span))?;
                }
                Ok(Value::object(object))
            }
            ExpressionKind::Literal(literal) => Ok(literal_value(literal)),
        }
    }

    fn variable(&self, identifier: &Identifier) -> Result<&Value, RunError> {
        self.variables
            .get(&identifier.name)
            .ok_or_else(|| RunError::undefined_variable(identifier))
    }

    fn target(&self, identifier: &Identifier) -> Result<&Target, RunError> {
        let value = self.variable(identifier)?;
        value.as_target().ok_or_else(|| {
            RunError::interop(
                InteropError::unsupported_receiver(value.type_name()),
                identifier.span,
            )
        })
    }

    fn target_mut(&mut self, identifier: &Identifier) -> Result<&mut Target, RunError> {
        let value = self
            .variables
            .get_mut(&identifier.name)
            .ok_or_else(|| RunError::undefined_variable(identifier))?;
        let type_name = value.type_name();
        value.as_target_mut().ok_or_else(|| {
            RunError::interop(InteropError::unsupported_receiver(type_name), identifier.span)
        })
    }

    /// Evaluate a query against the current bindings
    pub fn evaluate_query(&self, query: &Query) -> Result<QueryResult, RunError> {
        match &query.kind {
            QueryKind::KeyInfo { object, key } => {
                let receiver = self.variable(object)?;
                interop_core::key_info(receiver, &literal_value(key))
                    .map(QueryResult::Capabilities)
                    .map_err(|error| RunError::interop(error, query.span))
            }
            QueryKind::Keys {
                object,
                include_internal,
            } => {
                let target = self.target(object)?;
                Ok(QueryResult::Keys(interop_core::keys(
                    target,
                    *include_internal,
                )))
            }
            QueryKind::Read { object, key } => {
                let target = self.target(object)?;
                let key = literal_key(key)?;
                interop_core::read(target, &key)
                    .map(QueryResult::Value)
                    .map_err(|error| RunError::interop(error, query.span))
            }
        }
    }

    fn check_expectation(&self, expectation: &Expectation) -> Result<(), RunError> {
        let result = self.evaluate_query(&expectation.query)?;

        let (holds, expected) = match &expectation.matcher {
            Matcher::Equals(ExpectedValue::SymbolList(symbols)) => {
                let holds = match &result {
                    QueryResult::Capabilities(capabilities) => {
                        *capabilities == capability_set(symbols)?
                    }
                    QueryResult::Keys(keys) => {
                        keys.len() == symbols.len()
                            && keys
                                .iter()
                                .zip(symbols)
                                .all(|(key, symbol)| symbol.as_symbol() == Some(key.name()))
                    }
                    QueryResult::Value(_) => false,
                };
                (holds, render_symbols(symbols))
            }
            Matcher::Equals(ExpectedValue::Literal(literal)) => {
                let expected_value = literal_value(literal);
                let holds = matches!(&result, QueryResult::Value(value) if *value == expected_value);
                (holds, expected_value.to_display_string())
            }
            Matcher::Includes(symbol) => (
                includes(&result, symbol)?,
                format!("to include {}", render_symbol(symbol)),
            ),
            Matcher::Excludes(symbol) => (
                !includes(&result, symbol)? && !matches!(result, QueryResult::Value(_)),
                format!("not to include {}", render_symbol(symbol)),
            ),
            Matcher::IsEmpty => {
                let holds = match &result {
                    QueryResult::Capabilities(capabilities) => capabilities.is_empty(),
                    QueryResult::Keys(keys) => keys.is_empty(),
                    QueryResult::Value(_) => false,
                };
                (holds, "to be empty".to_string())
            }
        };

        if holds {
            Ok(())
        } else {
            let actual = result.to_string();
            tracing::debug!(%expected, %actual, "expectation failed");
            Err(RunError::ExpectationFailed {
                expected,
                actual,
                span: expectation.span.into(),
            })
        }
    }
}

fn literal_value(literal: &Literal) -> Value {
    match &literal.kind {
        LiteralKind::Integer(n) => Value::Integer(*n),
        LiteralKind::Float(f) => Value::Float(*f),
        LiteralKind::String(s) => Value::String(s.clone()),
        LiteralKind::Symbol(name) => Value::Symbol(name.clone()),
        LiteralKind::Boolean(b) => Value::Boolean(*b),
        LiteralKind::Nil => Value::Nil,
    }
}

fn literal_key(literal: &Literal) -> Result<Key, RunError> {
    let value = literal_value(literal);
    value.as_key().ok_or_else(|| {
        RunError::interop(InteropError::invalid_key(value.type_name()), literal.span)
    })
}

fn hash_entries(hash: &HashLiteral) -> Result<Vec<(String, Value)>, RunError> {
    hash.entries
        .iter()
        .map(|entry| {
            let key = literal_key(&entry.key)?;
            Ok::<_, RunError>((key.name().to_string(), literal_value(&entry.value)))
        })
        .collect()
}

fn capability(symbol: &Literal) -> Result<CapabilitySet, RunError> {
    let name = symbol.as_symbol().unwrap_or_default();
    CapabilitySet::from_symbol(name).ok_or_else(|| RunError::UnknownCapability {
        name: name.to_string(),
        span: symbol.span.into(),
    })
}

fn capability_set(symbols: &[Literal]) -> Result<CapabilitySet, RunError> {
    CapabilitySet::from_symbols(symbols.iter().filter_map(Literal::as_symbol)).map_err(|unknown| {
        let span = symbols
            .iter()
            .find(|symbol| symbol.as_symbol() == Some(unknown))
            .map_or_else(Span::default, |symbol| symbol.span);
        RunError::UnknownCapability {
            name: unknown.to_string(),
            span: span.into(),
        }
    })
}

/// Whether a capability set (or key list) contains the symbol
fn includes(result: &QueryResult, symbol: &Literal) -> Result<bool, RunError> {
    match result {
        QueryResult::Capabilities(capabilities) => Ok(capabilities.contains(capability(symbol)?)),
        QueryResult::Keys(keys) => Ok(keys
            .iter()
            .any(|key| symbol.as_symbol() == Some(key.name()))),
        QueryResult::Value(_) => Ok(false),
    }
}

fn render_symbol(symbol: &Literal) -> String {
    format!(":{}", symbol.as_symbol().unwrap_or_default())
}

fn render_symbols(symbols: &[Literal]) -> String {
    let rendered: Vec<String> = symbols.iter().map(render_symbol).collect();
    format!("[{}]", rendered.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use interop_fixture::{parse_script, parse_statement};
    use pretty_assertions::assert_eq;

    const KEY_INFO_SCRIPT: &str = include_str!("../fixtures/key_info.interop");

    fn run(source: &str) -> (Runner, ScriptReport) {
        let script = parse_script(source).unwrap();
        let mut runner = Runner::new();
        let report = runner.run_script(&script);
        (runner, report)
    }

    fn execute(runner: &mut Runner, source: &str) -> Result<StatementOutcome, RunError> {
        runner.execute(&parse_statement(source).unwrap())
    }

    #[test]
    fn test_bundled_key_info_script_passes() {
        let (_, report) = run(KEY_INFO_SCRIPT);
        assert!(report.is_success(), "failures: {:?}", report.errors);
        assert_eq!(report.failed, 0);
        assert!(report.passed > 40, "only {} expectations ran", report.passed);
    }

    #[test]
    fn test_bare_queries_are_rendered() {
        let source = r#"
hash = {"a" => 1, "b" => 2}
set hash @exists = 14
key_info(hash, "a")
keys(hash, internal)
read(hash, :@exists)
freeze hash
key_info(hash, :@exists)
key_info(hash, :missing)
"#;
        let (_, report) = run(source);
        let outputs: Vec<&str> = report.outputs.iter().map(|(_, text)| text.as_str()).collect();
        assert_eq!(
            outputs,
            vec![
                "[:existing, :readable, :writable]",
                "[:a, :b, :@exists]",
                "14",
                "[:existing, :readable, :internal]",
                "[]",
            ]
        );
    }

    #[test]
    fn test_failed_expectation_is_recorded_and_execution_continues() {
        let source = r#"
hash = {"a" => 1}
freeze hash
expect key_info(hash, "a") includes :writable
expect key_info(hash, "a") includes :readable
"#;
        let (_, report) = run(source);
        assert_eq!(report.passed, 1);
        assert_eq!(report.failed, 1);
        match &report.errors[0] {
            RunError::ExpectationFailed {
                expected, actual, ..
            } => {
                assert_eq!(expected, "to include :writable");
                assert_eq!(actual, "[:existing, :readable]");
            }
            other => panic!("Expected expectation failure, got {other:?}"),
        }
    }

    #[test]
    fn test_runtime_error_stops_script() {
        let source = "key_info(nothing, \"a\")\nhash = {}\n";
        let (runner, report) = run(source);
        assert_eq!(report.errors.len(), 1);
        assert!(matches!(
            report.errors[0],
            RunError::UndefinedVariable { ref name, .. } if name == "nothing"
        ));
        assert_eq!(runner.variables().count(), 0);
    }

    #[test]
    fn test_key_info_on_non_object_fails_fast() {
        let mut runner = Runner::new();
        execute(&mut runner, "number = 42").unwrap();
        let error = execute(&mut runner, "key_info(number, \"a\")").unwrap_err();
        assert!(matches!(
            error,
            RunError::Interop {
                source: InteropError::UnsupportedReceiver { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_key_info_with_non_name_key_fails_fast() {
        let mut runner = Runner::new();
        execute(&mut runner, "hash = {\"a\" => 1}").unwrap();
        let error = execute(&mut runner, "key_info(hash, 1)").unwrap_err();
        assert!(matches!(
            error,
            RunError::Interop {
                source: InteropError::InvalidKey { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_interop_error_keeps_inner_diagnostic() {
        let mut runner = Runner::new();
        execute(&mut runner, "number = 42").unwrap();
        let error = execute(&mut runner, "keys(number)").unwrap_err();

        assert_eq!(error.to_string(), "Interop call failed");
        let inner = error.diagnostic_source().expect("inner diagnostic");
        assert_eq!(
            inner.code().map(|code| code.to_string()),
            Some("interop::unsupported_receiver".to_string())
        );
        assert!(inner.help().is_some());
    }

    #[test]
    fn test_unknown_capability_in_list_points_at_symbol() {
        let source = "hash = {\"a\" => 1}\nexpect key_info(hash, \"a\") == [:existing, :flying]";
        let mut runner = Runner::new();
        let report = runner.run_script(&parse_script(source).unwrap());
        match &report.errors[..] {
            [RunError::UnknownCapability { name, span }] => {
                assert_eq!(name, "flying");
                assert_eq!(&source[span.offset()..span.offset() + span.len()], ":flying");
            }
            other => panic!("Expected unknown capability, got {other:?}"),
        }
    }

    #[test]
    fn test_undefined_class() {
        let mut runner = Runner::new();
        let error = execute(&mut runner, "object = new Missing").unwrap_err();
        assert!(matches!(error, RunError::UndefinedClass { ref name, .. } if name == "Missing"));
    }

    #[test]
    fn test_reopened_class_merges_accessors() {
        let mut runner = Runner::new();
        execute(&mut runner, "class Pair { attr_reader :left }").unwrap();
        execute(&mut runner, "class Pair { attr_writer :left }").unwrap();
        execute(&mut runner, "pair = new Pair").unwrap();

        let outcome = execute(&mut runner, "key_info(pair, :left)").unwrap();
        assert_eq!(
            outcome,
            StatementOutcome::Query(QueryResult::Capabilities(
                CapabilitySet::EXISTING | CapabilitySet::READABLE | CapabilitySet::WRITABLE
            ))
        );
    }

    #[test]
    fn test_set_on_frozen_object_fails() {
        let mut runner = Runner::new();
        execute(&mut runner, "hash = {}").unwrap();
        execute(&mut runner, "freeze hash").unwrap();
        let error = execute(&mut runner, "set hash @late = 1").unwrap_err();
        assert!(matches!(
            error,
            RunError::Interop {
                source: InteropError::FrozenTarget { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_capability_symbol() {
        let mut runner = Runner::new();
        execute(&mut runner, "hash = {\"a\" => 1}").unwrap();
        let error = execute(&mut runner, "expect key_info(hash, \"a\") includes :flying").unwrap_err();
        assert!(matches!(error, RunError::UnknownCapability { ref name, .. } if name == "flying"));
    }

    #[test]
    fn test_read_expectations() {
        let source = r#"
class Box { attr_accessor :content }
box = new Box { @content = "gift" }
expect read(box, :content) == "gift"
expect read(box, :@content) == "gift"
expect keys(box) == [:content]
expect keys(box, internal) == [:content, :@content]
"#;
        let (_, report) = run(source);
        assert!(report.is_success(), "failures: {:?}", report.errors);
        assert_eq!(report.passed, 4);
    }

    #[test]
    fn test_read_of_write_only_accessor_fails() {
        let mut runner = Runner::new();
        execute(&mut runner, "class Sink { attr_writer :input }").unwrap();
        execute(&mut runner, "sink = new Sink").unwrap();
        let error = execute(&mut runner, "read(sink, :input)").unwrap_err();
        assert!(matches!(
            error,
            RunError::Interop {
                source: InteropError::NotReadable { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_clear_forgets_bindings() {
        let mut runner = Runner::new();
        execute(&mut runner, "class Plain { }").unwrap();
        execute(&mut runner, "hash = {}").unwrap();
        runner.clear();
        assert_eq!(runner.variables().count(), 0);
        assert_eq!(runner.class_names().count(), 0);
    }
}

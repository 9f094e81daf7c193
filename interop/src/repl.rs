//! Interactive REPL for fixture statements
//!
//! Statements typed at the prompt run against a persistent [`Runner`], so
//! objects and classes defined earlier stay available:
//! - multi-line input until braces, brackets and parentheses balance
//! - REPL commands for inspecting and resetting the session
//! - miette reports for parse and runtime errors
//! - history support and line editing with rustyline

use crate::runner::{RunError, Runner, StatementOutcome};
use interop_fixture::{ParseError, parse_statement};
use miette::Diagnostic;
use rustyline::{DefaultEditor, error::ReadlineError};
use thiserror::Error;

/// Errors that can occur in the REPL
#[derive(Debug, Error, Diagnostic)]
pub enum ReplError {
    #[error("Parse error: {source}")]
    Parse {
        #[from]
        source: ParseError,
    },

    #[error("Runtime error: {source}")]
    Run {
        #[from]
        source: RunError,
    },

    #[error("Readline error: {source}")]
    Readline {
        #[from]
        source: ReadlineError,
    },

    #[error("REPL command error: {message}")]
    Command { message: String },
}

/// REPL session that keeps bindings across statements
pub struct ReplSession {
    editor: DefaultEditor,
    runner: Runner,
    config: ReplConfig,
    stats: ReplStats,
}

/// REPL configuration options
#[derive(Debug, Clone)]
pub struct ReplConfig {
    /// Prompt string for input
    pub prompt: String,

    /// Enable history persistence
    pub persist_history: bool,

    /// History file path
    pub history_file: Option<String>,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            prompt: "interop> ".to_string(),
            persist_history: true,
            history_file: Some(".interop_history".to_string()),
        }
    }
}

/// REPL session statistics
#[derive(Debug, Clone, Default)]
pub struct ReplStats {
    pub statements_executed: usize,
    pub expectations_passed: usize,
    pub errors_encountered: usize,
    pub commands_executed: usize,
}

/// Result of evaluating a line in the REPL
#[derive(Debug)]
pub enum ReplResult {
    /// A statement ran
    Outcome(StatementOutcome),

    /// Executed a REPL command
    Command { message: String },

    /// Empty line or comment
    Empty,

    /// Exit request
    Exit,
}

impl ReplSession {
    pub fn with_config(config: ReplConfig) -> Result<Self, ReplError> {
        let mut editor = DefaultEditor::new()?;

        if config.persist_history {
            if let Some(ref history_file) = config.history_file {
                // Missing history is normal for a first session
                let _ = editor.load_history(history_file);
            }
        }

        Ok(Self {
            editor,
            runner: Runner::new(),
            config,
            stats: ReplStats::default(),
        })
    }

    /// Start the REPL main loop
    pub fn run(&mut self) -> Result<(), ReplError> {
        self.print_welcome();

        while let Some(line) = self.read_line()? {
            match self.evaluate_line(&line) {
                Ok(ReplResult::Exit) => break,
                Ok(result) => self.display_result(result),
                Err(error) => {
                    self.stats.errors_encountered += 1;
                    self.display_error(error, &line);
                }
            }
        }

        self.print_goodbye();
        self.save_history()?;
        Ok(())
    }

    /// Read a line from the user, continuing while delimiters are open
    fn read_line(&mut self) -> Result<Option<String>, ReplError> {
        let mut complete_input = String::new();
        let mut line_count = 0;

        loop {
            let prompt = if line_count == 0 {
                &self.config.prompt
            } else {
                "... "
            };

            match self.editor.readline(prompt) {
                Ok(line) => {
                    line_count += 1;

                    if line_count == 1 && line.trim().is_empty() {
                        return Ok(Some(String::new()));
                    }

                    if !complete_input.is_empty() {
                        complete_input.push('\n');
                    }
                    complete_input.push_str(&line);

                    if is_input_complete(&complete_input) {
                        if !complete_input.trim().is_empty() {
                            self.editor.add_history_entry(complete_input.clone())?;
                        }
                        return Ok(Some(complete_input));
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Cancels any pending multi-line input
                    println!("^C");
                    return Ok(Some(String::new()));
                }
                Err(ReadlineError::Eof) => return Ok(None),
                Err(err) => return Err(ReplError::Readline { source: err }),
            }
        }
    }

    /// Evaluate a line of input
    pub fn evaluate_line(&mut self, line: &str) -> Result<ReplResult, ReplError> {
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(ReplResult::Empty);
        }

        if trimmed.starts_with('/') {
            return self.execute_command(trimmed);
        }

        let statement = parse_statement(trimmed)?;
        let outcome = self.runner.execute(&statement)?;

        self.stats.statements_executed += 1;
        if outcome == StatementOutcome::Passed {
            self.stats.expectations_passed += 1;
        }

        Ok(ReplResult::Outcome(outcome))
    }

    fn execute_command(&mut self, command: &str) -> Result<ReplResult, ReplError> {
        self.stats.commands_executed += 1;

        let parts: Vec<&str> = command.split_whitespace().collect();
        if parts.is_empty() {
            return Ok(ReplResult::Empty);
        }

        match parts[0] {
            "/help" | "/h" => Ok(ReplResult::Command {
                message: self.help_message(),
            }),

            "/vars" | "/variables" => Ok(ReplResult::Command {
                message: self.format_variables(),
            }),

            "/classes" => Ok(ReplResult::Command {
                message: self.format_classes(),
            }),

            "/clear" => {
                self.runner.clear();
                Ok(ReplResult::Command {
                    message: "Variables and classes cleared".to_string(),
                })
            }

            "/stats" => Ok(ReplResult::Command {
                message: self.format_stats(),
            }),

            "/quit" | "/q" | "/exit" => Ok(ReplResult::Exit),

            unknown => Err(ReplError::Command {
                message: format!("Unknown command: {unknown}. Type /help for available commands."),
            }),
        }
    }

    fn display_result(&self, result: ReplResult) {
        match result {
            ReplResult::Outcome(outcome) => match outcome {
                StatementOutcome::Bound { name, value } => println!("{name} = {value}"),
                StatementOutcome::ClassDefined { name } => println!("class {name}"),
                StatementOutcome::Updated { name } => {
                    if let Some((_, value)) = self.runner.variables().find(|(var, _)| *var == name)
                    {
                        println!("{name} = {value}");
                    }
                }
                StatementOutcome::Query(result) => println!("{result}"),
                StatementOutcome::Passed => println!("✅ passed"),
            },

            ReplResult::Command { message } => println!("{message}"),

            ReplResult::Empty | ReplResult::Exit => {}
        }
    }

    fn display_error(&self, error: ReplError, source_code: &str) {
        match error {
            // ParseError carries its own source code
            ReplError::Parse { source } => {
                eprintln!("{:?}", miette::Report::new(source));
            }
            ReplError::Run { source } => {
                let named_source = miette::NamedSource::new("<repl>", source_code.to_string());
                let report = miette::Report::new(source).with_source_code(named_source);
                eprintln!("{report:?}");
            }
            ReplError::Command { .. } => {
                eprintln!("{:?}", miette::Report::new(error));
            }
            error => eprintln!("Error: {error}"),
        }
    }

    fn print_welcome(&self) {
        println!("🔑 Interop REPL v{} 🔑", env!("CARGO_PKG_VERSION"));
        println!("Type /help for commands, /quit to exit");
        println!();
    }

    fn print_goodbye(&self) {
        println!("Goodbye! 👋");
    }

    fn save_history(&mut self) -> Result<(), ReplError> {
        if self.config.persist_history {
            if let Some(ref history_file) = self.config.history_file {
                self.editor.save_history(history_file)?;
            }
        }
        Ok(())
    }

    fn help_message(&self) -> String {
        r#"Interop REPL Commands:
  /help, /h           Show this help message
  /vars, /variables   List all variables with their values
  /classes            List defined classes
  /clear              Clear all variables and classes
  /stats              Show session statistics
  /quit, /q, /exit    Exit the REPL

Examples:
  hash = {"a" => 1}                 # Bind a Hash
  set hash @exists = 14             # Set an instance variable
  key_info(hash, "a")               # Classify a key
  keys(hash, internal)              # List keys, instance variables included
  class Point { attr_reader :x }    # Define a class
  point = new Point { @x = 1 }      # Instantiate it
  expect key_info(point, :x) includes :readable

Multi-line input:
  class Point {                     # Type { and press Enter
    attr_accessor :x, :y            # Continuation prompt (...)
  }                                 # Completes when braces close

Use Ctrl+C to interrupt, Ctrl+D to exit."#
            .to_string()
    }

    fn format_variables(&self) -> String {
        let lines: Vec<String> = self
            .runner
            .variables()
            .map(|(name, value)| format!("  {name} = {value}"))
            .collect();

        if lines.is_empty() {
            "No variables defined".to_string()
        } else {
            format!("Variables:\n{}", lines.join("\n"))
        }
    }

    fn format_classes(&self) -> String {
        let names: Vec<&str> = self.runner.class_names().collect();
        if names.is_empty() {
            "No classes defined".to_string()
        } else {
            format!("Classes: {}", names.join(", "))
        }
    }

    fn format_stats(&self) -> String {
        format!(
            r#"Session Statistics:
  Statements executed: {}
  Expectations passed: {}
  Errors encountered: {}
  Commands executed: {}"#,
            self.stats.statements_executed,
            self.stats.expectations_passed,
            self.stats.errors_encountered,
            self.stats.commands_executed
        )
    }
}

/// Check if the input has balanced delimiters and no open string
fn is_input_complete(input: &str) -> bool {
    let mut depth: i32 = 0;
    let mut in_string = false;
    let mut escaped = false;
    let mut in_comment = false;

    for ch in input.chars() {
        if in_comment {
            in_comment = ch != '\n';
            continue;
        }
        if escaped {
            escaped = false;
            continue;
        }

        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '#' if !in_string => in_comment = true,
            '{' | '[' | '(' if !in_string => depth += 1,
            '}' | ']' | ')' if !in_string => depth -= 1,
            _ => {}
        }
    }

    depth <= 0 && !in_string
}

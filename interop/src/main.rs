use clap::{Parser, Subcommand};
use interop_fixture::{SCRIPT_EXTENSION, Script, parse_script_with_source};
use miette::{IntoDiagnostic, MietteHandlerOpts, NamedSource, Result};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

mod logging;
mod repl;
mod runner;
mod sexpr;

use repl::{ReplConfig, ReplSession};
use runner::Runner;

#[derive(Parser)]
#[command(
    name = "interop",
    version,
    about = "Key classification for foreign objects crossing a language boundary",
    long_about = "Runs .interop fixture scripts that build Hash, attributed and meta objects and check what key_info reports for their keys."
)]
struct Cli {
    /// Log filter directives, e.g. `debug` or `interop_core=trace`
    #[arg(long, global = true, env = "INTEROP_LOG", default_value = logging::DEFAULT_LOG_FILTER)]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse fixture scripts and display their statements
    Parse {
        /// Fixture scripts to parse (use '-' to read from stdin)
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,

        /// Show the debug AST with span information
        #[arg(short, long)]
        spans: bool,
    },

    /// Run fixture scripts and check their expectations
    Run {
        /// Fixture scripts to run (use '-' to read from stdin)
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,

        /// Do not print the results of bare queries
        #[arg(short, long)]
        quiet: bool,
    },

    /// Start an interactive session
    Repl {
        /// Do not load or save `.interop_history`
        #[arg(long)]
        no_history: bool,
    },
}

fn main() {
    setup_miette_handler();

    let cli = Cli::parse();
    logging::init(&cli.log_level);

    match cli.command {
        Some(Commands::Parse { files, spans }) => handle_parse_command(files, spans),
        Some(Commands::Run { files, quiet }) => handle_run_command(files, quiet),
        Some(Commands::Repl { no_history }) => handle_repl_command(no_history),
        None => {
            Cli::parse_from(["interop", "--help"]);
        }
    }
}

fn setup_miette_handler() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .tab_width(4)
                .with_cause_chain()
                .build(),
        )
    }))
    .ok();
}

fn display_name(file_path: &Path) -> String {
    if file_path.to_str() == Some("-") {
        "<stdin>".to_string()
    } else {
        file_path.display().to_string()
    }
}

/// Read a script from a file or stdin, returning its source and display name
fn read_source(file_path: &Path) -> Result<(String, String)> {
    if file_path.to_str() == Some("-") {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer).into_diagnostic()?;
        return Ok((buffer, "<stdin>".to_string()));
    }

    if !file_path.exists() {
        return Err(miette::miette!("File not found: {}", file_path.display()));
    }

    if file_path.extension().and_then(|s| s.to_str()) != Some(SCRIPT_EXTENSION) {
        return Err(miette::miette!(
            "Expected .{} file, got: {}",
            SCRIPT_EXTENSION,
            file_path.display()
        ));
    }

    let source = fs::read_to_string(file_path).into_diagnostic()?;
    Ok((source, file_path.display().to_string()))
}

fn load_script(file_path: &Path) -> Result<(Script, String, String)> {
    let (source, source_name) = read_source(file_path)?;
    let script =
        parse_script_with_source(&source, Some(source_name.clone())).map_err(|error| {
            miette::Report::new(error)
                .with_source_code(NamedSource::new(&source_name, source.clone()))
        })?;
    Ok((script, source, source_name))
}

fn handle_parse_command(files: Vec<PathBuf>, spans: bool) {
    let mut success = true;
    let multiple_files = files.len() > 1;

    for file_path in files {
        match load_script(&file_path) {
            Ok((script, _, _)) => {
                if spans {
                    println!("{script:#?}");
                } else {
                    println!("{}", sexpr::format_script_as_sexpr(&script));
                }
                if multiple_files {
                    println!("✅ {}", display_name(&file_path));
                }
            }
            Err(e) => {
                eprintln!("{e:?}");
                success = false;
            }
        }
    }

    if !success {
        process::exit(1);
    }
}

fn handle_run_command(files: Vec<PathBuf>, quiet: bool) {
    let mut passed = 0;
    let mut failed = 0;
    let mut success = true;

    for file_path in files {
        let (script, source, source_name) = match load_script(&file_path) {
            Ok(loaded) => loaded,
            Err(e) => {
                eprintln!("{e:?}");
                success = false;
                continue;
            }
        };

        tracing::debug!(file = %source_name, statements = script.statements.len(), "running script");

        // Each script starts with fresh bindings
        let report = Runner::new().run_script(&script);

        if !quiet {
            for (_, output) in &report.outputs {
                println!("{output}");
            }
        }

        if !report.is_success() {
            success = false;
        }
        for error in report.errors {
            let diagnostic = miette::Report::new(error)
                .with_source_code(NamedSource::new(&source_name, source.clone()));
            eprintln!("{diagnostic:?}");
        }

        passed += report.passed;
        failed += report.failed;
    }

    println!("\n📊 {passed} passed, {failed} failed");

    if !success {
        process::exit(1);
    }
}

fn handle_repl_command(no_history: bool) {
    let config = if no_history {
        ReplConfig {
            persist_history: false,
            history_file: None,
            ..Default::default()
        }
    } else {
        ReplConfig::default()
    };

    let result = ReplSession::with_config(config).and_then(|mut session| session.run());
    if let Err(error) = result {
        eprintln!("Error: {error}");
        process::exit(1);
    }
}

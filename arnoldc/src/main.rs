//! ArnoldC interpreter CLI

use arnoldc::ast::Program;
use arnoldc::config::Config;
use arnoldc::error::report_error;
use arnoldc::interp::Interpreter;
use clap::{Parser, Subcommand};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "arnoldc", version, about = "ArnoldC interpreter")]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(long, global = true)]
    debug: bool,

    /// Configuration file (TOML)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run an ArnoldC program
    Run {
        /// Source file to run
        file: PathBuf,
    },
    /// Parse and dump AST as JSON (debug)
    Parse {
        /// Source file to parse
        file: PathBuf,
    },
    /// Tokenize and dump tokens (debug)
    Tokens {
        /// Source file to tokenize
        file: PathBuf,
    },
}

/// The failure has already been written to stderr.
struct Reported;

fn main() {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match Config::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        },
        None => Config::default(),
    };
    init_tracing(cli.debug, config.log.filter.as_deref());

    let result = match &cli.command {
        Command::Run { file } => run_file(file, &config),
        Command::Parse { file } => parse_file(file),
        Command::Tokens { file } => tokenize_file(file),
    };

    if result.is_err() {
        std::process::exit(1);
    }
}

/// Filter precedence: `RUST_LOG`, then `--debug`, then the config file,
/// then warnings only.
fn init_tracing(debug: bool, configured: Option<&str>) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if debug {
        EnvFilter::new("arnoldc=debug")
    } else {
        EnvFilter::new(configured.unwrap_or("warn"))
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

fn read_source(path: &Path) -> Result<String, Reported> {
    std::fs::read_to_string(path).map_err(|e| {
        eprintln!("Error: {}: {e}", path.display());
        Reported
    })
}

fn load_program(path: &Path) -> Result<Program, Reported> {
    let source = read_source(path)?;
    arnoldc::parser::parse(&source).map_err(|e| {
        report_error(&path.display().to_string(), &source, &e);
        Reported
    })
}

fn run_file(path: &Path, config: &Config) -> Result<(), Reported> {
    let program = load_program(path)?;

    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    Interpreter::new(&program, BufWriter::new(stdout.lock()), stderr.lock())
        .with_max_call_depth(config.run.max_call_depth)
        .run()
        .map_err(|_| Reported)
}

fn parse_file(path: &Path) -> Result<(), Reported> {
    let program = load_program(path)?;

    let json = serde_json::to_string_pretty(&program).map_err(|e| {
        eprintln!("Error: {e}");
        Reported
    })?;
    println!("{json}");
    Ok(())
}

fn tokenize_file(path: &Path) -> Result<(), Reported> {
    let source = read_source(path)?;

    let tokens = arnoldc::lexer::tokenize(&source).map_err(|e| {
        report_error(&path.display().to_string(), &source, &e);
        Reported
    })?;

    let mut out = BufWriter::new(std::io::stdout().lock());
    for (tok, span) in &tokens {
        if writeln!(out, "{tok} @ {}..{} ({span})", span.start, span.end).is_err() {
            return Err(Reported);
        }
    }
    out.flush().map_err(|_| Reported)
}

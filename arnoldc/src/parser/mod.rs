//! Parser implementation using lalrpop

use crate::ast::{Program, Span};
use crate::error::{CompileError, Result};
use crate::lexer::{Lexer, Token};
use lalrpop_util::ParseError;
use std::io::Read;


lalrpop_util::lalrpop_mod!(
    #[allow(clippy::all)]
    #[allow(unused_imports)]
    grammar,
    "/parser/grammar.rs"
);

type GrammarError = ParseError<usize, Token, CompileError>;

/// Parse a whole program. Tokens are pulled from the lexer on demand, so a
/// lexer error surfaces at the point the parser reaches it.
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn parse(source: &str) -> Result<Program> {
    let tokens = Lexer::new(source).map(|item| item.map(|(tok, span)| (span.start, tok, span.end)));

    let program = grammar::ProgramParser::new()
        .parse(source, tokens)
        .map_err(|e| convert_error(source, e))?;

    tracing::debug!(
        methods = program.methods.len(),
        main_statements = program.main.body.len(),
        "parsed program"
    );
    Ok(program)
}

/// Read the whole stream, then parse it.
pub fn parse_reader(mut reader: impl Read) -> Result<Program> {
    let mut source = String::new();
    reader.read_to_string(&mut source)?;
    parse(&source)
}

/// Reject a parameter list that names the same variable twice.
pub(crate) fn unique_params(
    source: &str,
    params: Vec<(usize, String, usize)>,
) -> std::result::Result<Vec<String>, GrammarError> {
    let mut names: Vec<String> = Vec::with_capacity(params.len());
    for (start, name, end) in params {
        if names.contains(&name) {
            return Err(ParseError::User {
                error: CompileError::parser(
                    format!("duplicate parameter {name:?}"),
                    Span::locate(source, start, end),
                ),
            });
        }
        names.push(name);
    }
    Ok(names)
}

fn convert_error(source: &str, err: GrammarError) -> CompileError {
    match err {
        ParseError::InvalidToken { location } => {
            CompileError::parser("invalid token", Span::locate(source, location, location + 1))
        }
        ParseError::UnrecognizedEof { location, expected } => CompileError::parser(
            format!("unexpected end of input{}", expected_list(&expected)),
            Span::locate(source, location, location),
        ),
        ParseError::UnrecognizedToken {
            token: (start, token, end),
            expected,
        } => CompileError::parser(
            format!("unexpected {token}{}", expected_list(&expected)),
            Span::locate(source, start, end),
        ),
        ParseError::ExtraToken {
            token: (start, token, end),
        } => CompileError::parser(
            format!("unexpected {token} after the end of the program"),
            Span::locate(source, start, end),
        ),
        ParseError::User { error } => error,
    }
}

fn expected_list(expected: &[String]) -> String {
    match expected {
        [] => String::new(),
        [one] => format!(", expected {one}"),
        many => format!(", expected one of {}", many.join(", ")),
    }
}

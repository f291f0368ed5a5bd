//! Two-mode lexer built on logos
//!
//! A line starts in instruction mode, where a run of uppercase words is
//! looked up as one phrase. A recognised phrase switches to operand mode
//! for the rest of the line, and the newline switches back.

mod token;

pub use token::{Instruction, LexErrorKind, Position, Token, macro_value};

use crate::ast::Span;
use crate::error::{CompileError, Result};
use logos::Logos;
use token::{OperandToken, PhraseToken};

/// Scan mode; each wraps the logos lexer for that mode.
enum Mode<'src> {
    Instruction(logos::Lexer<'src, PhraseToken>),
    Operand(logos::Lexer<'src, OperandToken>),
}

/// Pull-based lexer: each call to [`Lexer::next_token`] scans one token.
pub struct Lexer<'src> {
    source: &'src str,
    mode: Mode<'src>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Lexer {
            source,
            mode: Mode::Instruction(PhraseToken::lexer(source)),
        }
    }

    /// True while the lexer expects an instruction phrase.
    pub fn awaiting_instruction(&self) -> bool {
        matches!(self.mode, Mode::Instruction(_))
    }

    /// Current line bookkeeping.
    pub fn position(&self) -> Position {
        match &self.mode {
            Mode::Instruction(lex) => lex.extras,
            Mode::Operand(lex) => lex.extras,
        }
    }

    /// Scan the next token. At end of input this keeps returning
    /// [`Token::Eof`].
    pub fn next_token(&mut self) -> Result<(Token, Span)> {
        loop {
            match &mut self.mode {
                Mode::Instruction(lex) => {
                    let Some(result) = lex.next() else {
                        return Ok((Token::Eof, self.eof_span()));
                    };
                    let span = span_of(lex.span(), lex.extras);
                    let instr = match result {
                        Ok(PhraseToken::Phrase(instr)) => instr,
                        // Skipped by its callback; never yielded.
                        Ok(PhraseToken::Newline) => continue,
                        Err(kind) => return Err(self.error(kind, span)),
                    };
                    tracing::trace!(?instr, line = span.line, "phrase");
                    self.switch_to_operands();
                    return Ok((Token::Instruction(instr), span));
                }
                Mode::Operand(lex) => {
                    let Some(result) = lex.next() else {
                        return Ok((Token::Eof, self.eof_span()));
                    };
                    let span = span_of(lex.span(), lex.extras);
                    let token = match result {
                        Ok(OperandToken::Newline) => {
                            self.switch_to_instructions();
                            continue;
                        }
                        Ok(OperandToken::String(s)) => Token::String(s),
                        Ok(OperandToken::Integer(n)) => Token::Integer(n),
                        Ok(OperandToken::Variable(name)) => Token::Variable(name),
                        Ok(OperandToken::Macro(b)) => Token::Macro(b),
                        // Nothing else matched: pass the character through.
                        Err(LexErrorKind::UnexpectedCharacter) => {
                            let symbol = lex.slice().chars().next();
                            match symbol {
                                Some(c) => Token::Symbol(c),
                                None => {
                                    return Err(self.error(LexErrorKind::UnexpectedCharacter, span));
                                }
                            }
                        }
                        Err(kind) => return Err(self.error(kind, span)),
                    };
                    tracing::trace!(%token, line = span.line, "operand");
                    return Ok((token, span));
                }
            }
        }
    }

    fn switch_to_operands(&mut self) {
        let placeholder = Mode::Instruction(PhraseToken::lexer(""));
        self.mode = match std::mem::replace(&mut self.mode, placeholder) {
            Mode::Instruction(lex) => Mode::Operand(lex.morph()),
            operand => operand,
        };
    }

    fn switch_to_instructions(&mut self) {
        let placeholder = Mode::Instruction(PhraseToken::lexer(""));
        self.mode = match std::mem::replace(&mut self.mode, placeholder) {
            Mode::Operand(lex) => Mode::Instruction(lex.morph()),
            instruction => instruction,
        };
    }

    fn eof_span(&self) -> Span {
        let end = self.source.len();
        span_of(end..end, self.position())
    }

    fn error(&self, kind: LexErrorKind, span: Span) -> CompileError {
        let text = span.slice(self.source).unwrap_or("").trim();
        let message = match kind {
            LexErrorKind::UnexpectedCharacter => format!("unexpected character {text:?}"),
            LexErrorKind::UnknownInstruction => format!("unknown instruction {text:?}"),
            LexErrorKind::UnterminatedString => format!("unterminated string {text}"),
            LexErrorKind::MalformedInteger => format!("malformed integer {text:?}"),
            LexErrorKind::UnknownMacro => format!("unknown macro {text:?}"),
        };
        CompileError::lexer(message, span)
    }
}

fn span_of(range: std::ops::Range<usize>, pos: Position) -> Span {
    let column = range.start.saturating_sub(pos.line_start) + 1;
    Span::new(range.start, range.end, pos.line, column)
}

/// Yields tokens up to, but not including, [`Token::Eof`]. Iteration stops
/// after the first error.
impl<'src> Iterator for Lexer<'src> {
    type Item = Result<(Token, Span)>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_token() {
            Ok((Token::Eof, _)) => None,
            Ok(token) => Some(Ok(token)),
            Err(e) => {
                let source: &'src str = self.source;
                self.mode = Mode::Instruction(PhraseToken::lexer(&source[source.len()..]));
                Some(Err(e))
            }
        }
    }
}

/// Tokenize source code
pub fn tokenize(source: &str) -> Result<Vec<(Token, Span)>> {
    Lexer::new(source).collect()
}

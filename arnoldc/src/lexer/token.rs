//! Token definitions

use logos::Logos;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Every instruction phrase of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instruction {
    // Methods
    MainOpen,
    MainClose,
    MethodOpen,
    MethodClose,
    DeclareParameter,
    EndParameterDeclaration,
    Return,
    CallMethod,
    AssignFromCall,

    // Simple built ins
    Print,

    // Variable declaration
    Declare,
    Initialize,

    // Assignment
    Assignment,
    AssignmentEnd,
    FirstOperand,

    // Arithmetic
    Add,
    Subtract,
    Multiply,
    Divide,

    // Logic
    EqualTo,
    GreaterThan,
    Or,
    And,

    // If/Else
    If,
    Else,
    EndIf,

    // While loops
    While,
    EndWhile,
}

/// Phrase → instruction, in the order the language reference lists them.
const PHRASES: &[(&str, Instruction)] = &[
    ("IT'S SHOWTIME", Instruction::MainOpen),
    ("YOU HAVE BEEN TERMINATED", Instruction::MainClose),
    ("LISTEN TO ME VERY CAREFULLY", Instruction::MethodOpen),
    ("HASTA LA VISTA, BABY", Instruction::MethodClose),
    (
        "I NEED YOUR CLOTHES YOUR BOOTS AND YOUR MOTORCYCLE",
        Instruction::DeclareParameter,
    ),
    ("GIVE THESE PEOPLE AIR", Instruction::EndParameterDeclaration),
    ("I'LL BE BACK", Instruction::Return),
    ("DO IT NOW", Instruction::CallMethod),
    ("GET YOUR ASS TO MARS", Instruction::AssignFromCall),
    ("TALK TO THE HAND", Instruction::Print),
    ("HEY CHRISTMAS TREE", Instruction::Declare),
    ("YOU SET US UP", Instruction::Initialize),
    ("GET TO THE CHOPPER", Instruction::Assignment),
    ("ENOUGH TALK", Instruction::AssignmentEnd),
    ("HERE IS MY INVITATION", Instruction::FirstOperand),
    ("GET UP", Instruction::Add),
    ("GET DOWN", Instruction::Subtract),
    ("YOU'RE FIRED", Instruction::Multiply),
    ("HE HAD TO SPLIT", Instruction::Divide),
    ("YOU ARE NOT YOU YOU ARE ME", Instruction::EqualTo),
    ("LET OFF SOME STEAM BENNET", Instruction::GreaterThan),
    ("CONSIDER THAT A DIVORCE", Instruction::Or),
    ("KNOCK KNOCK", Instruction::And),
    ("BECAUSE I'M GOING TO SAY PLEASE", Instruction::If),
    ("BULLSHIT", Instruction::Else),
    ("YOU HAVE NO RESPECT FOR LOGIC", Instruction::EndIf),
    ("STICK AROUND", Instruction::While),
    ("CHILL", Instruction::EndWhile),
];

/// Boolean macros, written after an `@` marker.
const MACROS: &[(&str, bool)] = &[("NO PROBLEMO", true), ("I LIED", false)];

static PHRASE_TABLE: LazyLock<HashMap<&'static str, Instruction>> =
    LazyLock::new(|| PHRASES.iter().copied().collect());

impl Instruction {
    /// Look up a trimmed phrase.
    pub fn from_phrase(phrase: &str) -> Option<Instruction> {
        PHRASE_TABLE.get(phrase).copied()
    }

    pub fn phrase(self) -> &'static str {
        PHRASES
            .iter()
            .find(|(_, instr)| *instr == self)
            .map_or("", |(phrase, _)| phrase)
    }

    /// All instructions with their phrases.
    pub fn all() -> impl Iterator<Item = (&'static str, Instruction)> {
        PHRASES.iter().copied()
    }
}

impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.phrase())
    }
}

/// Look up a boolean macro phrase (without the `@`).
pub fn macro_value(phrase: &str) -> Option<bool> {
    MACROS
        .iter()
        .find(|(name, _)| *name == phrase)
        .map(|(_, value)| *value)
}

/// A token with its literal value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Instruction(Instruction),
    Integer(i64),
    String(String),
    Variable(String),
    /// `@NO PROBLEMO` / `@I LIED`
    Macro(bool),
    /// Any other single character in operand position
    Symbol(char),
    /// End of input; returned again on every later call
    Eof,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Instruction(instr) => write!(f, "{:?}", instr.phrase()),
            Token::Integer(n) => write!(f, "integer {n}"),
            Token::String(s) => write!(f, "string {s:?}"),
            Token::Variable(name) => write!(f, "variable {name:?}"),
            Token::Macro(true) => write!(f, "@NO PROBLEMO"),
            Token::Macro(false) => write!(f, "@I LIED"),
            Token::Symbol(c) => write!(f, "{c:?}"),
            Token::Eof => write!(f, "end of input"),
        }
    }
}

/// Line bookkeeping shared by both scanning modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// 1-based line number
    pub line: usize,
    /// Byte offset where the current line starts
    pub line_start: usize,
}

impl Default for Position {
    fn default() -> Self {
        Position {
            line: 1,
            line_start: 0,
        }
    }
}

/// Why a scan failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LexErrorKind {
    #[default]
    UnexpectedCharacter,
    UnknownInstruction,
    UnterminatedString,
    MalformedInteger,
    UnknownMacro,
}

fn newline<'src, T: Logos<'src, Extras = Position, Source = str>>(
    lex: &mut logos::Lexer<'src, T>,
) {
    lex.extras.line += 1;
    lex.extras.line_start = lex.span().end;
}

fn phrase(lex: &mut logos::Lexer<PhraseToken>) -> Result<Instruction, LexErrorKind> {
    Instruction::from_phrase(lex.slice().trim()).ok_or(LexErrorKind::UnknownInstruction)
}

/// Scanner for the `awaiting-instruction` mode.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(extras = Position, error = LexErrorKind)]
#[logos(skip r"[ \t\r\f]+")]
pub(crate) enum PhraseToken {
    #[token("\n", |lex| {
        newline(lex);
        logos::Skip
    })]
    Newline,

    #[regex(r"[A-Z'][A-Z', \t]*", phrase)]
    Phrase(Instruction),
}

fn string_literal(lex: &mut logos::Lexer<OperandToken>) -> Result<String, LexErrorKind> {
    let body = &lex.slice()[1..];
    body.strip_suffix('"')
        .map(str::to_owned)
        .ok_or(LexErrorKind::UnterminatedString)
}

fn integer(lex: &mut logos::Lexer<OperandToken>) -> Result<i64, LexErrorKind> {
    lex.slice()
        .parse()
        .map_err(|_| LexErrorKind::MalformedInteger)
}

fn bool_macro(lex: &mut logos::Lexer<OperandToken>) -> Result<bool, LexErrorKind> {
    macro_value(lex.slice()[1..].trim()).ok_or(LexErrorKind::UnknownMacro)
}

/// Scanner for the `awaiting-operand` mode.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(extras = Position, error = LexErrorKind)]
#[logos(skip r"[ \t\r\f]+")]
pub(crate) enum OperandToken {
    #[token("\n", |lex| newline(lex))]
    Newline,

    #[regex(r#""[^"\n]*"?"#, string_literal)]
    String(String),

    #[regex(r"-?[0-9]+", integer)]
    Integer(i64),

    /// Letters only: a digit ends the name.
    #[regex(r"[A-Za-z]+", |lex| lex.slice().to_owned())]
    Variable(String),

    #[regex(r"@[A-Z' \t]*", bool_macro)]
    Macro(bool),
}

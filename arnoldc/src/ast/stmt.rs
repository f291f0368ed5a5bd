//! Statement AST nodes

use super::Value;
use serde::{Deserialize, Serialize};

/// A statement is either a single-line expression or a block that owns
/// nested statements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Statement {
    Expression(Expression),
    Block(Block),
}

impl Statement {
    pub fn expression(op: Op, args: Vec<Value>) -> Self {
        Statement::Expression(Expression { op, args })
    }

    pub fn block(kind: BlockKind, args: Vec<Value>, statements: Vec<Statement>) -> Self {
        Statement::Block(Block {
            kind,
            args,
            statements,
        })
    }
}

/// One instruction with its operands.
///
/// Arity and operand kinds are fixed per `Op` by the grammar:
///
/// | op | args |
/// |---|---|
/// | `Print` | string, integer or variable |
/// | `Declare` | variable, integer |
/// | `FirstOperand` and the fold operators | one operand |
/// | `Return` | zero or one operand |
/// | `CallMethod` | method name, arguments... |
/// | `AssignFromCall` | destination, method name, arguments... |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expression {
    pub op: Op,
    pub args: Vec<Value>,
}

/// A compound statement.
///
/// * `Assignment`: args = `[target]`, statements = first operand then folds
/// * `Conditional`: args = `[test]`, statements = `TrueBranch` and an
///   optional `FalseBranch`
/// * `Loop`: args = `[test]`, statements = body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub kind: BlockKind,
    pub args: Vec<Value>,
    pub statements: Vec<Statement>,
}

/// Expression instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Op {
    Print,
    Declare,
    /// Seeds the accumulator of an assignment block
    FirstOperand,
    Add,
    Subtract,
    Multiply,
    Divide,
    EqualTo,
    GreaterThan,
    Or,
    And,
    Return,
    CallMethod,
    AssignFromCall,
}

impl Op {
    /// Source phrase for this instruction
    pub fn phrase(self) -> &'static str {
        match self {
            Op::Print => "TALK TO THE HAND",
            Op::Declare => "HEY CHRISTMAS TREE",
            Op::FirstOperand => "HERE IS MY INVITATION",
            Op::Add => "GET UP",
            Op::Subtract => "GET DOWN",
            Op::Multiply => "YOU'RE FIRED",
            Op::Divide => "HE HAD TO SPLIT",
            Op::EqualTo => "YOU ARE NOT YOU YOU ARE ME",
            Op::GreaterThan => "LET OFF SOME STEAM BENNET",
            Op::Or => "CONSIDER THAT A DIVORCE",
            Op::And => "KNOCK KNOCK",
            Op::Return => "I'LL BE BACK",
            Op::CallMethod => "DO IT NOW",
            Op::AssignFromCall => "GET YOUR ASS TO MARS",
        }
    }

    /// True for the operators allowed after the first operand of a fold
    pub fn is_fold_operator(self) -> bool {
        matches!(
            self,
            Op::Add
                | Op::Subtract
                | Op::Multiply
                | Op::Divide
                | Op::EqualTo
                | Op::GreaterThan
                | Op::Or
                | Op::And
        )
    }
}

/// Block instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    Assignment,
    Conditional,
    Loop,
    /// Statements run when a conditional's test is non-zero
    TrueBranch,
    /// Statements run when a conditional's test is zero
    FalseBranch,
}

impl BlockKind {
    pub fn phrase(self) -> &'static str {
        match self {
            BlockKind::Assignment => "GET TO THE CHOPPER",
            BlockKind::Conditional => "BECAUSE I'M GOING TO SAY PLEASE",
            BlockKind::Loop => "STICK AROUND",
            BlockKind::TrueBranch => "__TRUE",
            BlockKind::FalseBranch => "__FALSE",
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.phrase())
    }
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.phrase())
    }
}

/// Writes `[a, b, c]` using each item's `Display`.
pub(super) fn write_list<T: std::fmt::Display>(
    f: &mut std::fmt::Formatter<'_>,
    items: &[T],
) -> std::fmt::Result {
    write!(f, "[")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    write!(f, "]")
}

impl std::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Expression({:?}, ", self.op.phrase())?;
        write_list(f, &self.args)?;
        write!(f, ")")
    }
}

impl std::fmt::Display for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Block({:?}, ", self.kind.phrase())?;
        write_list(f, &self.args)?;
        write!(f, ", ")?;
        write_list(f, &self.statements)?;
        write!(f, ")")
    }
}

impl std::fmt::Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Statement::Expression(e) => write!(f, "{e}"),
            Statement::Block(b) => write!(f, "{b}"),
        }
    }
}

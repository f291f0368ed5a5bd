//! Operand values

use serde::{Deserialize, Serialize};

/// A literal operand or a reference to a variable.
///
/// Values are immutable once built by the parser; variable references are
/// only dereferenced by the interpreter against the active scope chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Value {
    /// Integer literal (boolean macros are folded into 1 / 0)
    Integer(i64),
    /// String literal, only valid as a print operand
    String(String),
    /// Variable reference by name
    Variable(String),
}

impl Value {
    /// Name of the referenced variable, if this is a reference.
    pub fn as_variable(&self) -> Option<&str> {
        match self {
            Value::Variable(name) => Some(name),
            _ => None,
        }
    }

    /// Kind name for error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::String(_) => "string",
            Value::Variable(_) => "variable",
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Integer(i64::from(b))
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "Integer({n})"),
            Value::String(s) => write!(f, "String({s:?})"),
            Value::Variable(name) => write!(f, "Variable({name:?})"),
        }
    }
}

//! Runtime errors for the interpreter

use std::fmt;

/// Runtime error during interpretation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeError {
    pub kind: ErrorKind,
    pub message: String,
}

/// Kinds of runtime errors. Every kind is fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No scope in the chain declares the name
    UndefinedVariable,
    /// Assignment block target is a literal
    NonVariableAssignmentTarget,
    /// Assignment block does not start with a first operand, or has a
    /// non-fold statement after it
    MalformedAssignmentBlock,
    /// Conditional block without a leading true branch
    MalformedConditional,
    /// Integer division by zero inside a fold
    DivisionByZero,
    /// Call to a method the program does not define
    UnknownMethod,
    /// Argument count differs from the parameter count
    ArityMismatch,
    /// Statement that is only valid inside another block
    UnknownInstruction,
    /// String used where an integer is required
    TypeError,
    /// Instruction is missing a required operand
    MissingOperand,
    /// Call nesting exceeded the configured limit
    CallDepthExceeded,
    /// Writing to an output sink failed
    Io,
}

impl RuntimeError {
    pub fn undefined_variable(name: &str) -> Self {
        RuntimeError {
            kind: ErrorKind::UndefinedVariable,
            message: format!("undefined variable: {name}"),
        }
    }

    pub fn non_variable_target(got: &str) -> Self {
        RuntimeError {
            kind: ErrorKind::NonVariableAssignmentTarget,
            message: format!("assignment target must be a variable, got {got}"),
        }
    }

    pub fn malformed_assignment(detail: &str) -> Self {
        RuntimeError {
            kind: ErrorKind::MalformedAssignmentBlock,
            message: format!("malformed assignment block: {detail}"),
        }
    }

    pub fn malformed_conditional() -> Self {
        RuntimeError {
            kind: ErrorKind::MalformedConditional,
            message: "malformed conditional block: missing true branch".to_string(),
        }
    }

    pub fn division_by_zero() -> Self {
        RuntimeError {
            kind: ErrorKind::DivisionByZero,
            message: "division by zero".to_string(),
        }
    }

    pub fn unknown_method(name: &str) -> Self {
        RuntimeError {
            kind: ErrorKind::UnknownMethod,
            message: format!("unknown method: {name}"),
        }
    }

    pub fn arity_mismatch(name: &str, expected: usize, got: usize) -> Self {
        RuntimeError {
            kind: ErrorKind::ArityMismatch,
            message: format!("method {name} expects {expected} argument(s), got {got}"),
        }
    }

    pub fn unknown_instruction(phrase: &str) -> Self {
        RuntimeError {
            kind: ErrorKind::UnknownInstruction,
            message: format!("unexpected instruction here: {phrase}"),
        }
    }

    pub fn type_error(expected: &str, got: &str) -> Self {
        RuntimeError {
            kind: ErrorKind::TypeError,
            message: format!("type error: expected {expected}, got {got}"),
        }
    }

    pub fn missing_operand(phrase: &str) -> Self {
        RuntimeError {
            kind: ErrorKind::MissingOperand,
            message: format!("missing operand for {phrase}"),
        }
    }

    pub fn call_depth_exceeded(limit: usize) -> Self {
        RuntimeError {
            kind: ErrorKind::CallDepthExceeded,
            message: format!("call depth exceeded: more than {limit} nested calls"),
        }
    }

    pub fn io_error(msg: &str) -> Self {
        RuntimeError {
            kind: ErrorKind::Io,
            message: format!("IO error: {msg}"),
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Runtime error: {}", self.message)
    }
}

impl std::error::Error for RuntimeError {}

impl From<std::io::Error> for RuntimeError {
    fn from(err: std::io::Error) -> Self {
        RuntimeError::io_error(&err.to_string())
    }
}

/// Result type for interpreter operations
pub type InterpResult<T> = Result<T, RuntimeError>;

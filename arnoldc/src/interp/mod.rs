//! Tree-walking interpreter

mod error;
mod eval;
mod scope;

pub use error::{ErrorKind, InterpResult, RuntimeError};
pub use eval::{DEFAULT_MAX_CALL_DEPTH, Interpreter};
pub use scope::{ScopeArena, ScopeId};

use crate::ast::Program;
use std::io::Write;

/// Run a parsed program, printing to `out` and reporting a terminal error
/// on `diag`. Output written before a failure is kept.
pub fn run<O: Write, E: Write>(program: &Program, out: O, diag: E) -> InterpResult<()> {
    Interpreter::new(program, out, diag).run()
}

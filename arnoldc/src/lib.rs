//! ArnoldC interpreter library
//!
//! Lexer, parser and tree-walking interpreter for ArnoldC, the language
//! whose keywords are Arnold Schwarzenegger movie quotes.

pub mod ast;
pub mod config;
pub mod error;
pub mod interp;
pub mod lexer;
pub mod parser;

pub use ast::Span;
pub use error::{CompileError, Result};

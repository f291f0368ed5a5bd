//! Abstract Syntax Tree definitions

mod span;
mod stmt;
mod value;

pub use span::*;
pub use stmt::*;
pub use value::*;

use serde::{Deserialize, Serialize};

/// A parsed program: the entry method plus the named methods in source order.
///
/// Built once by the parser and read-only during interpretation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub main: Method,
    pub methods: Vec<Method>,
}

impl Program {
    /// Look up a named method. Duplicate names are allowed; the first
    /// definition in source order wins.
    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// Method definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    /// Empty for the entry method
    pub name: String,
    /// Parameter names, unique within the method
    pub params: Vec<String>,
    pub body: Vec<Statement>,
}

impl Method {
    /// The entry method (`IT'S SHOWTIME` ... `YOU HAVE BEEN TERMINATED`)
    pub fn main(body: Vec<Statement>) -> Self {
        Method {
            name: String::new(),
            params: Vec::new(),
            body,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Method({:?}, Params: {:?}, Body: ", self.name, self.params)?;
        stmt::write_list(f, &self.body)?;
        write!(f, ")")
    }
}

impl std::fmt::Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Program(Main: {}, Methods: ", self.main)?;
        stmt::write_list(f, &self.methods)?;
        write!(f, ")")
    }
}

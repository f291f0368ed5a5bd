//! Scope arena for variable environments
//!
//! Scopes live in a `Vec` and point at their parent by index. Scopes are
//! created and discarded in strict stack order, so popping a scope is a
//! truncate and no scope ever outlives its parent.

use super::error::{InterpResult, RuntimeError};
use crate::ast::Value;
use std::collections::HashMap;

/// Index of a scope in a [`ScopeArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeId(usize);

#[derive(Debug)]
struct Scope {
    /// `None` for a root (a method body)
    parent: Option<ScopeId>,
    vars: HashMap<String, i64>,
}

/// Stack-shaped arena of parent-linked scopes
#[derive(Debug, Default)]
pub struct ScopeArena {
    scopes: Vec<Scope>,
}

impl ScopeArena {
    pub fn new() -> Self {
        ScopeArena { scopes: Vec::new() }
    }

    /// Push a new scope. `None` starts a fresh chain that sees nothing
    /// declared outside it.
    pub fn push(&mut self, parent: Option<ScopeId>) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope {
            parent,
            vars: HashMap::new(),
        });
        id
    }

    /// Discard `id` and every scope pushed after it.
    pub fn pop(&mut self, id: ScopeId) {
        self.scopes.truncate(id.0);
    }

    /// Number of live scopes
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Bind `name` in `scope` itself, shadowing any ancestor binding.
    pub fn declare(&mut self, scope: ScopeId, name: &str, value: i64) {
        if let Some(s) = self.scopes.get_mut(scope.0) {
            s.vars.insert(name.to_string(), value);
        }
    }

    /// Find the nearest scope in the chain that binds `name`.
    fn owner(&self, scope: ScopeId, name: &str) -> Option<ScopeId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let s = self.scopes.get(id.0)?;
            if s.vars.contains_key(name) {
                return Some(id);
            }
            current = s.parent;
        }
        None
    }

    /// Look up a variable, searching from `scope` up to its root
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<i64> {
        let owner = self.owner(scope, name)?;
        self.scopes[owner.0].vars.get(name).copied()
    }

    /// Resolve an operand to its integer value.
    pub fn get(&self, scope: ScopeId, value: &Value) -> InterpResult<i64> {
        match value {
            Value::Integer(n) => Ok(*n),
            Value::Variable(name) => self
                .lookup(scope, name)
                .ok_or_else(|| RuntimeError::undefined_variable(name)),
            Value::String(_) => Err(RuntimeError::type_error("integer", "string")),
        }
    }

    /// Update the nearest existing binding of `name`. Never declares.
    pub fn set(&mut self, scope: ScopeId, name: &str, value: i64) -> InterpResult<()> {
        let owner = self
            .owner(scope, name)
            .ok_or_else(|| RuntimeError::undefined_variable(name))?;
        self.scopes[owner.0].vars.insert(name.to_string(), value);
        Ok(())
    }

    /// Check if a variable is visible from `scope`
    pub fn contains(&self, scope: ScopeId, name: &str) -> bool {
        self.owner(scope, name).is_some()
    }
}

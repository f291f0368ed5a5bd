//! Statement executor

use super::error::{InterpResult, RuntimeError};
use super::scope::{ScopeArena, ScopeId};
use crate::ast::{Block, BlockKind, Expression, Method, Op, Program, Statement, Value};
use std::io::Write;
use std::ops::ControlFlow;

/// Default limit on nested method calls
pub const DEFAULT_MAX_CALL_DEPTH: usize = 10_000;

/// Stack growth parameters for deep recursion
const STACK_RED_ZONE: usize = 128 * 1024; // 128KB remaining triggers growth
const STACK_GROW_SIZE: usize = 4 * 1024 * 1024; // Grow by 4MB each time

/// Result of running a statement list: fall through, or return a value.
type Flow = ControlFlow<i64>;

/// The interpreter
///
/// Holds the program being run, the two output sinks and the scope arena.
/// Normal output goes to `out`; the terminal error, if any, to `diag`.
pub struct Interpreter<'p, O: Write, E: Write> {
    program: &'p Program,
    out: O,
    diag: E,
    scopes: ScopeArena,
    /// Current number of nested method calls
    depth: usize,
    max_depth: usize,
}

impl<'p, O: Write, E: Write> Interpreter<'p, O, E> {
    pub fn new(program: &'p Program, out: O, diag: E) -> Self {
        Interpreter {
            program,
            out,
            diag,
            scopes: ScopeArena::new(),
            depth: 0,
            max_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }

    pub fn with_max_call_depth(mut self, limit: usize) -> Self {
        self.max_depth = limit;
        self
    }

    /// Give back the output sinks.
    pub fn into_sinks(self) -> (O, E) {
        (self.out, self.diag)
    }

    /// Run the entry method. On failure the error text is also written to
    /// the diagnostic sink. Both sinks are flushed either way.
    pub fn run(&mut self) -> InterpResult<()> {
        let result = self.run_main();
        if let Err(err) = &result {
            tracing::debug!(kind = ?err.kind, "run failed");
            // Nowhere left to report a broken diagnostic sink.
            let _ = writeln!(self.diag, "{err}");
        }
        let flushed = self.out.flush().and_then(|()| self.diag.flush());
        result?;
        flushed?;
        Ok(())
    }

    fn run_main(&mut self) -> InterpResult<()> {
        let program = self.program;
        let root = self.scopes.push(None);
        let flow = self.exec_statements(&program.main.body, root);
        self.scopes.pop(root);
        if let ControlFlow::Break(value) = flow? {
            tracing::debug!(value, "main returned early");
        }
        Ok(())
    }

    fn exec_statements(&mut self, statements: &[Statement], scope: ScopeId) -> InterpResult<Flow> {
        for stmt in statements {
            let flow = match stmt {
                Statement::Expression(expr) => self.exec_expression(expr, scope)?,
                Statement::Block(block) => self.exec_block(block, scope)?,
            };
            if flow.is_break() {
                return Ok(flow);
            }
        }
        Ok(ControlFlow::Continue(()))
    }

    fn exec_expression(&mut self, expr: &Expression, scope: ScopeId) -> InterpResult<Flow> {
        tracing::trace!(op = %expr.op, "exec");
        match expr.op {
            Op::Print => match operand(expr, 0)? {
                Value::String(s) => writeln!(self.out, "{s}")?,
                value => {
                    let n = self.scopes.get(scope, value)?;
                    writeln!(self.out, "{n}")?;
                }
            },
            Op::Declare => {
                let name = target(expr.args.first(), expr.op.phrase())?;
                let value = self.scopes.get(scope, operand(expr, 1)?)?;
                self.scopes.declare(scope, name, value);
            }
            Op::Return => {
                let value = match expr.args.first() {
                    Some(value) => self.scopes.get(scope, value)?,
                    None => 0,
                };
                return Ok(ControlFlow::Break(value));
            }
            Op::CallMethod => {
                let name = method_name(expr, 0)?;
                self.call(name, &expr.args[1..], scope)?;
            }
            Op::AssignFromCall => {
                let dest = target(expr.args.first(), expr.op.phrase())?;
                let name = method_name(expr, 1)?;
                let value = self.call(name, &expr.args[2..], scope)?;
                if self.scopes.contains(scope, dest) {
                    self.scopes.set(scope, dest, value)?;
                } else {
                    self.scopes.declare(scope, dest, value);
                }
            }
            // Only meaningful inside an assignment block
            Op::FirstOperand
            | Op::Add
            | Op::Subtract
            | Op::Multiply
            | Op::Divide
            | Op::EqualTo
            | Op::GreaterThan
            | Op::Or
            | Op::And => return Err(RuntimeError::unknown_instruction(expr.op.phrase())),
        }
        Ok(ControlFlow::Continue(()))
    }

    fn exec_block(&mut self, block: &Block, scope: ScopeId) -> InterpResult<Flow> {
        tracing::trace!(kind = %block.kind, scopes = self.scopes.len(), "enter block");
        match block.kind {
            BlockKind::Assignment => {
                self.exec_assignment(block, scope)?;
                Ok(ControlFlow::Continue(()))
            }
            BlockKind::Conditional => self.exec_conditional(block, scope),
            BlockKind::Loop => self.exec_loop(block, scope),
            BlockKind::TrueBranch | BlockKind::FalseBranch => {
                Err(RuntimeError::unknown_instruction(block.kind.phrase()))
            }
        }
    }

    /// Run `f` in a fresh child of `parent`, discarding the child afterwards
    /// even if `f` fails.
    fn with_child<T>(
        &mut self,
        parent: ScopeId,
        f: impl FnOnce(&mut Self, ScopeId) -> InterpResult<T>,
    ) -> InterpResult<T> {
        let child = self.scopes.push(Some(parent));
        let result = f(self, child);
        self.scopes.pop(child);
        result
    }

    fn exec_assignment(&mut self, block: &Block, scope: ScopeId) -> InterpResult<()> {
        let name = target(block.args.first(), block.kind.phrase())?;
        let value = self.with_child(scope, |this, fold| this.fold(&block.statements, fold))?;
        // The result lands in the enclosing scope, not the fold scope.
        self.scopes.set(scope, name, value)
    }

    /// Evaluate a first operand followed by fold operators, left to right.
    fn fold(&mut self, statements: &[Statement], scope: ScopeId) -> InterpResult<i64> {
        let (seed, rest) = match statements.split_first() {
            Some((Statement::Expression(seed), rest)) if seed.op == Op::FirstOperand => (seed, rest),
            _ => {
                return Err(RuntimeError::malformed_assignment(
                    "expected HERE IS MY INVITATION first",
                ));
            }
        };

        let mut acc = self.scopes.get(scope, operand(seed, 0)?)?;
        for stmt in rest {
            let expr = match stmt {
                Statement::Expression(expr) if expr.op.is_fold_operator() => expr,
                Statement::Expression(expr) => {
                    return Err(RuntimeError::malformed_assignment(&format!(
                        "{} is not an operator",
                        expr.op.phrase()
                    )));
                }
                Statement::Block(block) => {
                    return Err(RuntimeError::malformed_assignment(&format!(
                        "unexpected {} block",
                        block.kind.phrase()
                    )));
                }
            };
            let rhs = self.scopes.get(scope, operand(expr, 0)?)?;
            acc = apply(expr.op, acc, rhs)?;
        }
        Ok(acc)
    }

    fn exec_conditional(&mut self, block: &Block, scope: ScopeId) -> InterpResult<Flow> {
        let test = self.scopes.get(scope, block_operand(block)?)?;
        let (then, otherwise) = match block.statements.as_slice() {
            [Statement::Block(then)] if then.kind == BlockKind::TrueBranch => (then, None),
            [Statement::Block(then), Statement::Block(otherwise)]
                if then.kind == BlockKind::TrueBranch && otherwise.kind == BlockKind::FalseBranch =>
            {
                (then, Some(otherwise))
            }
            _ => return Err(RuntimeError::malformed_conditional()),
        };

        // Branches run directly in the enclosing scope.
        let branch = if test != 0 { Some(then) } else { otherwise };
        match branch {
            Some(branch) => self.exec_statements(&branch.statements, scope),
            None => Ok(ControlFlow::Continue(())),
        }
    }

    fn exec_loop(&mut self, block: &Block, scope: ScopeId) -> InterpResult<Flow> {
        let test = block_operand(block)?;
        // One scope for the whole loop: declarations persist across iterations.
        self.with_child(scope, |this, body| {
            while this.scopes.get(body, test)? != 0 {
                let flow = this.exec_statements(&block.statements, body)?;
                if flow.is_break() {
                    return Ok(flow);
                }
            }
            Ok(ControlFlow::Continue(()))
        })
    }

    /// Resolve a call in the caller's scope and run it.
    fn call(&mut self, name: &str, args: &[Value], scope: ScopeId) -> InterpResult<i64> {
        let program = self.program;
        let method = program
            .method(name)
            .ok_or_else(|| RuntimeError::unknown_method(name))?;
        if method.params.len() != args.len() {
            return Err(RuntimeError::arity_mismatch(name, method.params.len(), args.len()));
        }
        let values = args
            .iter()
            .map(|arg| self.scopes.get(scope, arg))
            .collect::<InterpResult<Vec<_>>>()?;
        self.call_method(method, values)
    }

    /// Call a method with automatic stack growth
    fn call_method(&mut self, method: &'p Method, args: Vec<i64>) -> InterpResult<i64> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            self.call_method_inner(method, args)
        })
    }

    #[tracing::instrument(level = "debug", skip_all, fields(method = %method.name, depth = self.depth))]
    fn call_method_inner(&mut self, method: &'p Method, args: Vec<i64>) -> InterpResult<i64> {
        if self.depth >= self.max_depth {
            return Err(RuntimeError::call_depth_exceeded(self.max_depth));
        }
        self.depth += 1;

        // Method bodies see their parameters and nothing else.
        let scope = self.scopes.push(None);
        for (param, value) in method.params.iter().zip(args) {
            self.scopes.declare(scope, param, value);
        }
        let flow = self.exec_statements(&method.body, scope);
        self.scopes.pop(scope);
        self.depth -= 1;

        let value = match flow? {
            ControlFlow::Break(value) => value,
            ControlFlow::Continue(()) => 0,
        };
        tracing::debug!(value, "returned");
        Ok(value)
    }
}

/// Apply one fold operator. Arithmetic wraps on overflow.
fn apply(op: Op, acc: i64, rhs: i64) -> InterpResult<i64> {
    let value = match op {
        Op::Add => acc.wrapping_add(rhs),
        Op::Subtract => acc.wrapping_sub(rhs),
        Op::Multiply => acc.wrapping_mul(rhs),
        Op::Divide => {
            if rhs == 0 {
                return Err(RuntimeError::division_by_zero());
            }
            acc.wrapping_div(rhs)
        }
        Op::EqualTo => i64::from(acc == rhs),
        Op::GreaterThan => i64::from(acc > rhs),
        Op::Or => i64::from(acc != 0 || rhs != 0),
        Op::And => i64::from(acc != 0 && rhs != 0),
        other => {
            return Err(RuntimeError::malformed_assignment(&format!(
                "{} is not an operator",
                other.phrase()
            )));
        }
    };
    Ok(value)
}

fn operand(expr: &Expression, index: usize) -> InterpResult<&Value> {
    expr.args
        .get(index)
        .ok_or_else(|| RuntimeError::missing_operand(expr.op.phrase()))
}

fn block_operand(block: &Block) -> InterpResult<&Value> {
    block
        .args
        .first()
        .ok_or_else(|| RuntimeError::missing_operand(block.kind.phrase()))
}

/// The variable an instruction writes to.
fn target<'a>(value: Option<&'a Value>, phrase: &str) -> InterpResult<&'a str> {
    let value = value.ok_or_else(|| RuntimeError::missing_operand(phrase))?;
    value
        .as_variable()
        .ok_or_else(|| RuntimeError::non_variable_target(value.kind_name()))
}

fn method_name(expr: &Expression, index: usize) -> InterpResult<&str> {
    match operand(expr, index)? {
        Value::Variable(name) => Ok(name),
        other => Err(RuntimeError::type_error("method name", other.kind_name())),
    }
}

//! Expression and statement evaluation

pub mod await_expr;
pub mod binary;
pub mod call;
pub mod control;
pub mod field;
pub mod if_expr;
pub mod index;
pub mod interpreter;
pub mod item;
pub mod literal;
pub mod loops;
mod stack;
pub mod stmt;
pub mod unary;

pub use control::ControlFlow;
pub use interpreter::{Interpreter, OutputBuffer};
pub use item::ModuleLoader;

use crate::ast::{Expr, ExprKind, Span, Stmt};
use crate::error::{EvalError, Result};
use crate::Value;

/// Trait for evaluating expression nodes to values.
pub trait Evaluate {
    /// Evaluate this node in the interpreter's current environment.
    fn eval(&self, interp: &mut Interpreter) -> Result<Value>;
}

/// Trait for executing statement nodes.
pub trait Execute {
    /// Run this node, reporting how control left it.
    fn exec(&self, interp: &mut Interpreter) -> Result<ControlFlow>;
}

// ═══════════════════════════════════════════════════════════════════════
// Main Expression Dispatcher
// ═══════════════════════════════════════════════════════════════════════

impl Evaluate for Expr {
    fn eval(&self, interp: &mut Interpreter) -> Result<Value> {
        stack::ensure_sufficient_stack(|| eval_expr(self, interp))
    }
}

fn eval_expr(expr: &Expr, interp: &mut Interpreter) -> Result<Value> {
    let span = expr.span;
    match &expr.kind {
        ExprKind::Literal(lit) => Ok(literal::eval_literal(lit)),
        ExprKind::Var(name) => lookup_var(interp, name, span),
        ExprKind::AttrAccess { object, path } => {
            field::eval_attr_access(interp, object, path, span)
        }
        ExprKind::FuncCall { callee, args } => call::eval_call(interp, callee, args, span),
        ExprKind::Binary { op, left, right } => {
            binary::eval_binary(interp, *op, left, right, span)
        }
        ExprKind::Unary { op, operand } => unary::eval_unary(interp, *op, operand),
        ExprKind::Ternary {
            cond,
            then_expr,
            else_expr,
        } => if_expr::eval_ternary(interp, cond, then_expr, else_expr),
        ExprKind::PostfixInc(target) => unary::eval_postfix_inc(interp, target, span),
        ExprKind::Function(def) => literal::eval_function(interp, def, span),
        ExprKind::List(items) => literal::eval_list(interp, items),
        ExprKind::Object(entries) => literal::eval_object(interp, entries),
        ExprKind::Index { target, index } => index::eval_index(interp, target, index, span),
        ExprKind::Slice { target, start, end } => {
            index::eval_slice(interp, target, start.as_deref(), end.as_deref(), span)
        }
        ExprKind::Await(operand) => await_expr::eval_await(interp, operand, span),
    }
}

impl Execute for [Stmt] {
    fn exec(&self, interp: &mut Interpreter) -> Result<ControlFlow> {
        for stmt in self {
            let flow = stmt.exec(interp)?;
            if !flow.is_normal() {
                return Ok(flow);
            }
        }
        Ok(ControlFlow::Normal)
    }
}

/// Resolve a variable in the current environment.
pub(crate) fn lookup_var(interp: &Interpreter, name: &str, span: Span) -> Result<Value> {
    interp
        .current_env()
        .get(name)
        .ok_or_else(|| EvalError::UnboundName {
            name: name.to_string(),
            span: Some(span),
        })
}

// ═══════════════════════════════════════════════════════════════════════
// Convenience Functions
// ═══════════════════════════════════════════════════════════════════════

/// Evaluate a list of argument expressions left to right.
pub(crate) fn eval_args(interp: &mut Interpreter, args: &[Expr]) -> Result<Vec<Value>> {
    args.iter().map(|arg| arg.eval(interp)).collect()
}

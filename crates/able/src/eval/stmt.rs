//! Statement execution

use tracing::trace;

use super::{field, if_expr, item, loops, stack, ControlFlow, Evaluate, Execute, Interpreter};
use crate::ast::{Expr, SetTarget, Span, Stmt, StmtKind};
use crate::error::Result;
use crate::Value;

impl Execute for Stmt {
    fn exec(&self, interp: &mut Interpreter) -> Result<ControlFlow> {
        interp.check_interrupt()?;
        if interp.ctx.trace {
            trace!(
                line = self.span.line,
                column = self.span.column,
                kind = self.kind_name(),
                "exec"
            );
        }
        stack::ensure_sufficient_stack(|| exec_kind(&self.kind, self.span, interp))
            .map_err(|e| e.with_span(self.span))
    }
}

fn exec_kind(kind: &StmtKind, span: Span, interp: &mut Interpreter) -> Result<ControlFlow> {
    match kind {
        StmtKind::Set { target, value } => {
            exec_set(interp, target, value, span)?;
            Ok(ControlFlow::Normal)
        }
        StmtKind::Expr(expr) => {
            expr.eval(interp)?;
            Ok(ControlFlow::Normal)
        }
        StmtKind::If {
            cond,
            then_branch,
            else_branch,
        } => if_expr::exec_if(interp, cond, then_branch, else_branch.as_ref()),
        StmtKind::Block(stmts) => stmts.exec(interp),
        StmtKind::Return(expr) => {
            let value = match expr {
                Some(expr) => expr.eval(interp)?,
                None => Value::Undefined,
            };
            Ok(ControlFlow::Return(value))
        }
        StmtKind::For {
            var,
            iterable,
            body,
        } => loops::exec_for(interp, var, iterable, body, span),
        StmtKind::While { cond, body } => loops::exec_while(interp, cond, body),
        StmtKind::Break => Ok(ControlFlow::Break(span)),
        StmtKind::Continue => Ok(ControlFlow::Continue(span)),
        StmtKind::ClassDef {
            name,
            bases,
            methods,
        } => {
            item::exec_class_def(interp, name, bases, methods, span)?;
            Ok(ControlFlow::Normal)
        }
        StmtKind::Import { module } => {
            item::exec_import(interp, module, span)?;
            Ok(ControlFlow::Normal)
        }
        StmtKind::FromImport { module, names } => {
            item::exec_from_import(interp, module, names, span)?;
            Ok(ControlFlow::Normal)
        }
    }
}

/// `set target to value`.
///
/// A function value with no captured environment captures the current one
/// here, so closures see the scope they were first bound in.
fn exec_set(
    interp: &mut Interpreter,
    target: &SetTarget,
    value: &Expr,
    span: Span,
) -> Result<()> {
    let value = value.eval(interp)?;
    let env = interp.current_env();
    if let Value::Function(func) = &value {
        func.capture(&env);
    }
    match target {
        SetTarget::Name(name) => {
            env.set(name.as_str(), value);
            Ok(())
        }
        SetTarget::Attr { object, path } => field::assign_attr(interp, object, path, value, span),
    }
}

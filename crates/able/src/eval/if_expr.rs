//! Conditional evaluation: `if` statements and the ternary operator

use super::{ControlFlow, Evaluate, Execute, Interpreter};
use crate::ast::{ElseBranch, Expr, Stmt};
use crate::error::Result;
use crate::Value;

/// Run an `if` statement. Branches run in the current scope.
pub fn exec_if(
    interp: &mut Interpreter,
    cond: &Expr,
    then_branch: &[Stmt],
    else_branch: Option<&ElseBranch>,
) -> Result<ControlFlow> {
    if cond.eval(interp)?.to_boolean() {
        return then_branch.exec(interp);
    }
    match else_branch {
        Some(ElseBranch::Elif(stmt)) => stmt.exec(interp),
        Some(ElseBranch::Else(stmts)) => stmts.exec(interp),
        None => Ok(ControlFlow::Normal),
    }
}

/// Evaluate `cond ? then_expr : else_expr`. Only the chosen arm is evaluated.
pub fn eval_ternary(
    interp: &mut Interpreter,
    cond: &Expr,
    then_expr: &Expr,
    else_expr: &Expr,
) -> Result<Value> {
    if cond.eval(interp)?.to_boolean() {
        then_expr.eval(interp)
    } else {
        else_expr.eval(interp)
    }
}

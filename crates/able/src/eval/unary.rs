//! Unary and postfix operation evaluation

use super::field::{not_an_object, update_path};
use super::{Evaluate, Interpreter};
use crate::ast::{Expr, ExprKind, Span, UnaryOp};
use crate::error::{EvalError, Result};
use crate::Value;

/// Evaluate `op operand`.
pub fn eval_unary(interp: &mut Interpreter, op: UnaryOp, operand: &Expr) -> Result<Value> {
    let operand = operand.eval(interp)?;
    match op {
        UnaryOp::Not => Ok(Value::Bool(!operand.to_boolean())),
    }
}

/// Evaluate `target++`, returning the value before the increment.
///
/// The target must be a variable or an attribute chain holding a Number.
pub fn eval_postfix_inc(interp: &mut Interpreter, target: &Expr, span: Span) -> Result<Value> {
    match &target.kind {
        ExprKind::Var(name) => interp
            .current_env()
            .update(name, |slot| increment(slot, span))
            .unwrap_or_else(|| {
                Err(EvalError::UnboundName {
                    name: name.clone(),
                    span: Some(span),
                })
            }),
        ExprKind::AttrAccess { object, path } => {
            let Some((last, parents)) = path.split_last() else {
                return Err(unsupported(target, span));
            };
            update_path(interp, object, parents, span, |holder, holder_name| {
                if !holder.is_container() {
                    return Err(not_an_object(holder_name, holder, span));
                }
                let mut slot = holder.get_attr(last).unwrap_or_default();
                let old = increment(&mut slot, span)?;
                holder.put_attr(last, slot);
                Ok(old)
            })
        }
        _ => Err(unsupported(target, span)),
    }
}

fn increment(slot: &mut Value, span: Span) -> Result<Value> {
    match slot {
        Value::Number(n) => {
            let old = *n;
            *n += 1.0;
            Ok(Value::Number(old))
        }
        other => Err(EvalError::TypeMismatch {
            op: "++".to_string(),
            left: other.type_name().to_string(),
            right: "NUMBER".to_string(),
            span: Some(span),
        }),
    }
}

fn unsupported(target: &Expr, span: Span) -> EvalError {
    EvalError::UnsupportedNode {
        kind: format!("increment of {}", target.kind_name()),
        span: Some(span),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Stmt;

    #[test]
    fn test_not() {
        let mut interp = Interpreter::new();
        assert_eq!(
            eval_unary(&mut interp, UnaryOp::Not, &Expr::number(0.0)),
            Ok(Value::Bool(true))
        );
        assert_eq!(
            eval_unary(&mut interp, UnaryOp::Not, &Expr::string("x")),
            Ok(Value::Bool(false))
        );
    }

    #[test]
    fn test_increment_variable_returns_old_value() {
        let mut interp = Interpreter::new();
        interp.run_ast(&[Stmt::set("i", Expr::number(1.0))]).unwrap();
        let old = eval_postfix_inc(&mut interp, &Expr::var("i"), Span::default());
        assert_eq!(old, Ok(Value::Number(1.0)));
        assert_eq!(interp.global_env().get("i"), Some(Value::Number(2.0)));
    }

    #[test]
    fn test_increment_attribute() {
        let mut interp = Interpreter::new();
        interp
            .run_ast(&[
                Stmt::set("o", Expr::object(vec![("n", Expr::number(4.0))])),
                Stmt::expr(Expr::postfix_inc(Expr::attr("o", &["n"]))),
            ])
            .unwrap();
        let o = interp.global_env().get("o").unwrap();
        assert_eq!(o.get_attr("n"), Some(Value::Number(5.0)));
    }

    #[test]
    fn test_increment_rejects_non_numbers() {
        let mut interp = Interpreter::new();
        interp.run_ast(&[Stmt::set("s", Expr::string("a"))]).unwrap();
        let err = eval_postfix_inc(&mut interp, &Expr::var("s"), Span::default()).unwrap_err();
        assert!(matches!(err, EvalError::TypeMismatch { ref op, .. } if op == "++"));

        let err = eval_postfix_inc(&mut interp, &Expr::var("nope"), Span::default()).unwrap_err();
        assert!(matches!(err, EvalError::UnboundName { .. }));

        let err = eval_postfix_inc(&mut interp, &Expr::number(1.0), Span::default()).unwrap_err();
        assert!(matches!(err, EvalError::UnsupportedNode { .. }));
    }
}

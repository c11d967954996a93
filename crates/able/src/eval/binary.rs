//! Binary operation evaluation

use std::rc::Rc;

use super::{Evaluate, Interpreter};
use crate::ast::{BinaryOp, Expr, Span};
use crate::error::{EvalError, Result};
use crate::Value;

/// Evaluate `left op right`. Both operands are always evaluated, left
/// first, including for `and`/`or`.
pub fn eval_binary(
    interp: &mut Interpreter,
    op: BinaryOp,
    left: &Expr,
    right: &Expr,
    span: Span,
) -> Result<Value> {
    let left = left.eval(interp)?;
    let right = right.eval(interp)?;
    apply_binary(op, left, right, span)
}

/// Apply a binary operator to evaluated operands.
pub fn apply_binary(op: BinaryOp, left: Value, right: Value, span: Span) -> Result<Value> {
    match op {
        BinaryOp::Add => eval_add(left, right, span),
        BinaryOp::Sub => eval_arith(op, left, right, span, |a, b| a - b),
        BinaryOp::Mul => eval_arith(op, left, right, span, |a, b| a * b),
        // Division by zero yields 0
        BinaryOp::Div => eval_arith(op, left, right, span, |a, b| {
            if b == 0.0 {
                0.0
            } else {
                a / b
            }
        }),
        BinaryOp::Mod => eval_arith(op, left, right, span, |a, b| a % b),

        BinaryOp::Eq => Ok(Value::Bool(left.loose_equal(&right))),
        BinaryOp::StrictEq => Ok(Value::Bool(left.strict_equal(&right))),
        BinaryOp::Lt => eval_lt(left, right, span),
        BinaryOp::Gt => eval_gt(left, right, span),
        BinaryOp::Lte => eval_le(left, right, span),
        BinaryOp::Gte => eval_ge(left, right, span),

        BinaryOp::And => Ok(Value::Bool(left.to_boolean() && right.to_boolean())),
        BinaryOp::Or => Ok(Value::Bool(left.to_boolean() || right.to_boolean())),
    }
}

fn mismatch(op: BinaryOp, left: &Value, right: &Value, span: Span) -> EvalError {
    EvalError::TypeMismatch {
        op: op.symbol().to_string(),
        left: left.type_name().to_string(),
        right: right.type_name().to_string(),
        span: Some(span),
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Arithmetic Operations
// ═══════════════════════════════════════════════════════════════════════

fn eval_add(left: Value, right: Value, span: Span) -> Result<Value> {
    match (&left, &right) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
        (Value::String(a), Value::String(b)) => {
            let mut joined = String::with_capacity(a.len() + b.len());
            joined.push_str(a);
            joined.push_str(b);
            Ok(Value::from(joined))
        }
        (Value::List(a), Value::List(b)) => {
            let mut items = Vec::with_capacity(a.len() + b.len());
            items.extend(a.iter().cloned());
            items.extend(b.iter().cloned());
            Ok(Value::List(Rc::new(items)))
        }
        _ => Err(mismatch(BinaryOp::Add, &left, &right, span)),
    }
}

fn eval_arith(
    op: BinaryOp,
    left: Value,
    right: Value,
    span: Span,
    f: impl FnOnce(f64, f64) -> f64,
) -> Result<Value> {
    match (&left, &right) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(f(*a, *b))),
        _ => Err(mismatch(op, &left, &right, span)),
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Comparison Operations
// ═══════════════════════════════════════════════════════════════════════

macro_rules! impl_comparison {
    ($name:ident, $op:tt, $binop:expr) => {
        fn $name(left: Value, right: Value, span: Span) -> Result<Value> {
            match (&left, &right) {
                // Numbers and bools compare numerically
                (
                    Value::Number(_) | Value::Bool(_),
                    Value::Number(_) | Value::Bool(_),
                ) => Ok(Value::Bool(left.to_number() $op right.to_number())),

                // Strings compare lexicographically
                (Value::String(a), Value::String(b)) => Ok(Value::Bool(a $op b)),

                _ => Err(mismatch($binop, &left, &right, span)),
            }
        }
    };
}

impl_comparison!(eval_lt, <, BinaryOp::Lt);
impl_comparison!(eval_le, <=, BinaryOp::Lte);
impl_comparison!(eval_gt, >, BinaryOp::Gt);
impl_comparison!(eval_ge, >=, BinaryOp::Gte);

//! Index and slice evaluation

use super::{Evaluate, Interpreter};
use crate::ast::{Expr, Span};
use crate::error::{EvalError, Result};
use crate::Value;

/// Evaluate `target[index]`.
///
/// Lists and Strings take a Number index, truncated toward zero, with
/// negative values counting from the end. Objects take a String key.
///
/// # Errors
///
/// Returns `IndexOutOfRange` if a List or String index is out of range.
/// Returns `TypeMismatch` if the target cannot be indexed by the index.
pub fn eval_index(
    interp: &mut Interpreter,
    target: &Expr,
    index: &Expr,
    span: Span,
) -> Result<Value> {
    let target = target.eval(interp)?;
    let index = index.eval(interp)?;

    match (&target, &index) {
        (Value::List(items), Value::Number(n)) => {
            let i = resolve_index(*n, items.len(), span)?;
            Ok(items[i].clone())
        }
        (Value::String(s), Value::Number(n)) => {
            let len = s.chars().count();
            let i = resolve_index(*n, len, span)?;
            Ok(s.chars().nth(i).map_or(Value::Undefined, |c| Value::string(c.to_string())))
        }
        (Value::Object(map), Value::String(key)) => {
            Ok(map.get(&**key).cloned().unwrap_or_default())
        }
        _ => Err(EvalError::TypeMismatch {
            op: "[]".to_string(),
            left: target.type_name().to_string(),
            right: index.type_name().to_string(),
            span: Some(span),
        }),
    }
}

fn resolve_index(n: f64, len: usize, span: Span) -> Result<usize> {
    let index = n.trunc() as i64;
    let resolved = if index < 0 { index + len as i64 } else { index };
    if resolved >= 0 && (resolved as usize) < len {
        Ok(resolved as usize)
    } else {
        Err(EvalError::IndexOutOfRange {
            index,
            len,
            span: Some(span),
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Slices
// ═══════════════════════════════════════════════════════════════════════

/// Evaluate `target[start:end]` on a List or String.
///
/// Bounds are clamped to the value's length; a missing start is 0 and a
/// missing end is the length. The result is always a fresh value.
pub fn eval_slice(
    interp: &mut Interpreter,
    target: &Expr,
    start: Option<&Expr>,
    end: Option<&Expr>,
    span: Span,
) -> Result<Value> {
    let target = target.eval(interp)?;
    let start = slice_bound(interp, start, span)?;
    let end = slice_bound(interp, end, span)?;

    match &target {
        Value::List(items) => {
            let (from, to) = clamp_range(start, end, items.len());
            Ok(Value::list(items[from..to].to_vec()))
        }
        Value::String(s) => {
            let (from, to) = clamp_range(start, end, s.chars().count());
            let sliced: String = s.chars().skip(from).take(to - from).collect();
            Ok(Value::from(sliced))
        }
        other => Err(EvalError::TypeMismatch {
            op: "[:]".to_string(),
            left: other.type_name().to_string(),
            right: "NUMBER".to_string(),
            span: Some(span),
        }),
    }
}

fn slice_bound(interp: &mut Interpreter, bound: Option<&Expr>, span: Span) -> Result<Option<i64>> {
    let Some(expr) = bound else {
        return Ok(None);
    };
    match expr.eval(interp)? {
        Value::Number(n) => Ok(Some(n.trunc() as i64)),
        Value::Undefined | Value::Null => Ok(None),
        other => Err(EvalError::TypeMismatch {
            op: "[:]".to_string(),
            left: "LIST".to_string(),
            right: other.type_name().to_string(),
            span: Some(span),
        }),
    }
}

fn clamp_range(start: Option<i64>, end: Option<i64>, len: usize) -> (usize, usize) {
    let clamp = |bound: i64| -> usize {
        let resolved = if bound < 0 { bound + len as i64 } else { bound };
        resolved.clamp(0, len as i64) as usize
    };
    let from = start.map_or(0, clamp);
    let to = end.map_or(len, clamp);
    (from, to.max(from))
}

//! Literal evaluation

use std::rc::Rc;

use super::call::apply_annotation;
use super::{eval_args, Evaluate, Interpreter};
use crate::ast::{AnnotationKind, Expr, FunctionDef, Literal, Span};
use crate::error::Result;
use crate::value::{FunctionValue, ObjectMap};
use crate::Value;

/// Evaluate a scalar literal to a Value.
pub fn eval_literal(lit: &Literal) -> Value {
    match lit {
        Literal::Undefined => Value::Undefined,
        Literal::Null => Value::Null,
        Literal::Bool(b) => Value::Bool(*b),
        Literal::Number(n) => Value::Number(*n),
        Literal::String(s) => Value::string(s),
    }
}

/// Evaluate a function literal.
///
/// Each evaluation yields a fresh function with no captured environment;
/// the first `set` that stores it does the capture.
///
/// An annotated function captures the current environment before any
/// handler sees it. Modifiers then run in source
/// order; a modifier returning anything but Undefined replaces the
/// function. Decorators run last, innermost (bottom) first, and each
/// result replaces the value handed to the next one.
pub fn eval_function(
    interp: &mut Interpreter,
    def: &Rc<FunctionDef>,
    span: Span,
) -> Result<Value> {
    let func = FunctionValue::from_def(def);
    if def.annotations.is_empty() {
        return Ok(Value::function(func));
    }
    func.capture(&interp.current_env());

    let mut value = Value::function(func);
    let annotations_of =
        |kind: AnnotationKind| def.annotations.iter().filter(move |a| a.kind == kind);
    for modifier in annotations_of(AnnotationKind::Modifier) {
        let result = apply_annotation(interp, modifier, value.clone(), span)?;
        if !result.is_undefined() {
            value = result;
        }
    }
    for decorator in annotations_of(AnnotationKind::Decorator).rev() {
        value = apply_annotation(interp, decorator, value, span)?;
    }
    Ok(value)
}

/// Evaluate `[a, b, c]` left to right.
pub fn eval_list(interp: &mut Interpreter, items: &[Expr]) -> Result<Value> {
    Ok(Value::list(eval_args(interp, items)?))
}

/// Evaluate `{key: value, ...}` left to right. A repeated key keeps its
/// first position and its last value.
pub fn eval_object(interp: &mut Interpreter, entries: &[(String, Expr)]) -> Result<Value> {
    let mut map = ObjectMap::with_capacity(entries.len());
    for (key, expr) in entries {
        let value = expr.eval(interp)?;
        map.insert(key.clone(), value);
    }
    Ok(Value::object(map))
}

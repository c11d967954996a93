//! Attribute chain access and assignment

use super::{lookup_var, Interpreter};
use crate::ast::Span;
use crate::error::{EvalError, Result};
use crate::value::ObjectMap;
use crate::Value;

/// Evaluate `object.path[0].path[1]...`.
///
/// Each intermediate value must be a container; a missing attribute reads
/// as Undefined.
pub fn eval_attr_access(
    interp: &Interpreter,
    object: &str,
    path: &[String],
    span: Span,
) -> Result<Value> {
    let mut current = lookup_var(interp, object, span)?;
    let mut holder = object;
    for name in path {
        if !current.is_container() {
            return Err(not_an_object(holder, &current, span));
        }
        current = current.get_attr(name).unwrap_or_default();
        holder = name.as_str();
    }
    Ok(current)
}

/// `set object.path... to value`.
///
/// Writes the last segment on its holder's own map. Intermediate segments
/// that are missing, Undefined, or Null are replaced by empty Objects.
pub fn assign_attr(
    interp: &Interpreter,
    object: &str,
    path: &[String],
    value: Value,
    span: Span,
) -> Result<()> {
    let Some((last, parents)) = path.split_last() else {
        interp.current_env().set(object, value);
        return Ok(());
    };
    update_path(interp, object, parents, span, |holder, holder_name| {
        if holder.set_attr(last, value) {
            Ok(())
        } else {
            Err(not_an_object(holder_name, holder, span))
        }
    })
}

/// Apply `f` to the value at `object.path...` in place.
///
/// Navigation goes through the binding itself, so Objects reached along
/// the way are modified where they live rather than in a copy. `f`
/// receives the target and the name it was reached through.
pub(crate) fn update_path<R>(
    interp: &Interpreter,
    object: &str,
    path: &[String],
    span: Span,
    f: impl FnOnce(&mut Value, &str) -> Result<R>,
) -> Result<R> {
    interp
        .current_env()
        .update(object, |root| navigate(root, object, path, span, f))
        .unwrap_or_else(|| {
            Err(EvalError::UnboundName {
                name: object.to_string(),
                span: Some(span),
            })
        })
}

fn navigate<R>(
    target: &mut Value,
    target_name: &str,
    path: &[String],
    span: Span,
    f: impl FnOnce(&mut Value, &str) -> Result<R>,
) -> Result<R> {
    let Some((name, rest)) = path.split_first() else {
        return f(target, target_name);
    };
    if !target.is_container() {
        return Err(not_an_object(target_name, target, span));
    }
    let mut child = match target.take_attr(name) {
        Some(Value::Undefined | Value::Null) | None => Value::object(ObjectMap::new()),
        Some(child) => child,
    };
    let result = navigate(&mut child, name, rest, span, f);
    target.put_attr(name, child);
    result
}

pub(crate) fn not_an_object(name: &str, found: &Value, span: Span) -> EvalError {
    EvalError::NotAnObject {
        name: name.to_string(),
        found: found.type_name().to_string(),
        span: Some(span),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Expr, Stmt};

    fn path(segments: &[&str]) -> Vec<String> {
        segments.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_missing_attribute_is_undefined() {
        let mut interp = Interpreter::new();
        interp
            .run_ast(&[Stmt::set("o", Expr::object(vec![("a", Expr::number(1.0))]))])
            .unwrap();
        let value = eval_attr_access(&interp, "o", &path(&["b"]), Span::default()).unwrap();
        assert_eq!(value, Value::Undefined);
    }

    #[test]
    fn test_scalar_intermediate_is_not_an_object() {
        let mut interp = Interpreter::new();
        interp
            .run_ast(&[Stmt::set("o", Expr::object(vec![("a", Expr::number(1.0))]))])
            .unwrap();
        let err = eval_attr_access(&interp, "o", &path(&["a", "b"]), Span::default()).unwrap_err();
        assert!(matches!(err, EvalError::NotAnObject { ref name, .. } if name == "a"));
    }

    #[test]
    fn test_assign_creates_intermediate_objects() {
        let mut interp = Interpreter::new();
        interp
            .run_ast(&[
                Stmt::set("o", Expr::object(vec![])),
                Stmt::set_attr("o", &["a", "b"], Expr::number(2.0)),
            ])
            .unwrap();
        let value = eval_attr_access(&interp, "o", &path(&["a", "b"]), Span::default()).unwrap();
        assert_eq!(value, Value::Number(2.0));
    }

    #[test]
    fn test_assign_replaces_null_intermediate() {
        let mut interp = Interpreter::new();
        interp
            .run_ast(&[
                Stmt::set("o", Expr::object(vec![("a", Expr::null())])),
                Stmt::set_attr("o", &["a", "b"], Expr::number(1.0)),
            ])
            .unwrap();
        let value = eval_attr_access(&interp, "o", &path(&["a", "b"]), Span::default()).unwrap();
        assert_eq!(value, Value::Number(1.0));
    }

    #[test]
    fn test_assign_does_not_alias_copies() {
        let mut interp = Interpreter::new();
        interp
            .run_ast(&[
                Stmt::set("o", Expr::object(vec![("x", Expr::number(1.0))])),
                Stmt::set("copy", Expr::var("o")),
                Stmt::set_attr("o", &["x"], Expr::number(2.0)),
            ])
            .unwrap();
        let env = interp.global_env();
        assert_eq!(
            env.get("copy").and_then(|v| v.get_attr("x")),
            Some(Value::Number(1.0))
        );
        assert_eq!(
            env.get("o").and_then(|v| v.get_attr("x")),
            Some(Value::Number(2.0))
        );
    }

    #[test]
    fn test_assign_on_scalar_fails() {
        let mut interp = Interpreter::new();
        interp.run_ast(&[Stmt::set("n", Expr::number(1.0))]).unwrap();
        let err = interp
            .run_ast(&[Stmt::set_attr("n", &["x"], Expr::number(2.0))])
            .unwrap_err();
        assert!(matches!(err, EvalError::NotAnObject { ref found, .. } if found == "NUMBER"));
    }
}

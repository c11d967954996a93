//! Global prelude and call-site builtins

use std::rc::Rc;

use super::Environment;
use crate::error::{EvalError, Result, Span};
use crate::value::{ClassValue, ObjectMap, Value};

/// Name of the global promise namespace class.
pub const PROMISE_NAMESPACE: &str = "Promise";

impl Environment {
    /// Create a root environment with the global prelude loaded.
    pub fn with_prelude() -> Self {
        let env = Self::new();
        env.load_prelude();
        env
    }

    /// Bind `__version__`, an empty `__file__`, and the `Promise` namespace.
    pub fn load_prelude(&self) {
        self.define("__version__", Value::string(crate::VERSION));
        self.define("__file__", Value::string(""));
        self.define(
            PROMISE_NAMESPACE,
            Value::Type(Rc::new(ClassValue::new(PROMISE_NAMESPACE))),
        );
    }
}

/// Functions recognized by name at call sites whose callee is a bare
/// variable. They are not bindings, so user definitions cannot shadow them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    /// `pr(args...)`: print display forms followed by a newline
    Pr,
    /// `type(v)`: upper-case type name
    Type,
    /// `bool(v)`: truthiness
    Bool,
    /// `list(v)`: list copy, string characters, object values, or drained iterator
    List,
    /// `len(v)`: length of a string, list, or object
    Len,
    /// `str(v)`: display form
    Str,
    /// `int(v)`: numeric coercion truncated toward zero
    Int,
    /// `float(v)`: numeric coercion
    Float,
    /// `range(stop)`, `range(start, stop)`, `range(start, stop, step)`
    Range,
    /// `dict()`, `dict(object)`, or `dict(list of [key, value] pairs)`
    Dict,
    /// `register_modifier(name, handler)`
    RegisterModifier,
    /// `register_decorator(name, handler)`
    RegisterDecorator,
}

impl Builtin {
    /// Resolve a callee name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "pr" => Some(Builtin::Pr),
            "type" => Some(Builtin::Type),
            "bool" => Some(Builtin::Bool),
            "list" => Some(Builtin::List),
            "len" => Some(Builtin::Len),
            "str" => Some(Builtin::Str),
            "int" => Some(Builtin::Int),
            "float" => Some(Builtin::Float),
            "range" => Some(Builtin::Range),
            "dict" => Some(Builtin::Dict),
            "register_modifier" => Some(Builtin::RegisterModifier),
            "register_decorator" => Some(Builtin::RegisterDecorator),
            _ => None,
        }
    }

    /// Name as written in scripts.
    pub fn name(self) -> &'static str {
        match self {
            Builtin::Pr => "pr",
            Builtin::Type => "type",
            Builtin::Bool => "bool",
            Builtin::List => "list",
            Builtin::Len => "len",
            Builtin::Str => "str",
            Builtin::Int => "int",
            Builtin::Float => "float",
            Builtin::Range => "range",
            Builtin::Dict => "dict",
            Builtin::RegisterModifier => "register_modifier",
            Builtin::RegisterDecorator => "register_decorator",
        }
    }

    /// Apply a builtin that needs no interpreter state.
    ///
    /// `pr`, the registration builtins, and the iterator form of `list`
    /// are handled by the evaluator; this returns `None` for them.
    pub fn apply_pure(self, args: &[Value], span: Span) -> Option<Result<Value>> {
        let result = match self {
            Builtin::Pr | Builtin::RegisterModifier | Builtin::RegisterDecorator => return None,
            Builtin::Type => {
                single(self, args, span).map(|v| Value::string(v.type_name()))
            }
            Builtin::Bool => single(self, args, span).map(|v| Value::Bool(v.to_boolean())),
            Builtin::Str => single(self, args, span).map(|v| Value::string(v.to_string())),
            Builtin::Len => single(self, args, span).and_then(|v| length(v, span)),
            Builtin::List => match single(self, args, span) {
                Ok(v) => return list_of(v).map(Ok),
                Err(e) => Err(e),
            },
            Builtin::Int => single(self, args, span)
                .and_then(|v| numeric(self, v, span))
                .map(|n| Value::Number(n.trunc())),
            Builtin::Float => {
                single(self, args, span).and_then(|v| numeric(self, v, span).map(Value::Number))
            }
            Builtin::Range => range(args, span),
            Builtin::Dict => dict(args, span),
        };
        Some(result)
    }

    pub(crate) fn invalid(self, message: impl Into<String>, span: Span) -> EvalError {
        EvalError::InvalidArgument {
            name: self.name().to_string(),
            message: message.into(),
            span: Some(span),
        }
    }
}

fn single(builtin: Builtin, args: &[Value], span: Span) -> Result<&Value> {
    match args {
        [value] => Ok(value),
        _ => Err(builtin.invalid(
            format!("takes exactly one argument ({} given)", args.len()),
            span,
        )),
    }
}

/// Numbers, Bools, and Strings coerce; a String with no numeric prefix is 0.
fn numeric(builtin: Builtin, value: &Value, span: Span) -> Result<f64> {
    match value {
        Value::Number(_) | Value::Bool(_) | Value::String(_) => Ok(value.to_number()),
        other => Err(builtin.invalid(
            format!("cannot convert {} to a number", other.type_name()),
            span,
        )),
    }
}

fn range(args: &[Value], span: Span) -> Result<Value> {
    let mut bounds = Vec::with_capacity(args.len());
    for arg in args {
        match arg {
            Value::Number(n) if n.is_finite() => bounds.push(n.trunc()),
            other => {
                return Err(Builtin::Range.invalid(
                    format!("bounds must be finite numbers, not {}", other.type_name()),
                    span,
                ))
            }
        }
    }
    let (start, stop, step) = match bounds[..] {
        [stop] => (0.0, stop, 1.0),
        [start, stop] => (start, stop, 1.0),
        [start, stop, step] => (start, stop, step),
        _ => {
            return Err(Builtin::Range.invalid(
                format!("takes one to three arguments ({} given)", args.len()),
                span,
            ))
        }
    };
    if step == 0.0 {
        return Err(Builtin::Range.invalid("step must not be zero", span));
    }

    let mut items = Vec::new();
    let mut i = start;
    while (step > 0.0 && i < stop) || (step < 0.0 && i > stop) {
        items.push(Value::Number(i));
        i += step;
    }
    Ok(Value::list(items))
}

fn dict(args: &[Value], span: Span) -> Result<Value> {
    let source = match args {
        [] => return Ok(Value::object(ObjectMap::new())),
        [source] => source,
        _ => {
            return Err(Builtin::Dict.invalid(
                format!("takes at most one argument ({} given)", args.len()),
                span,
            ))
        }
    };
    match source {
        Value::Object(map) => Ok(Value::object(map.as_ref().clone())),
        Value::List(pairs) => {
            let mut map = ObjectMap::with_capacity(pairs.len());
            for pair in pairs.iter() {
                match pair.as_list() {
                    Some([key, value]) => {
                        map.insert(key.to_string(), value.clone());
                    }
                    _ => {
                        return Err(Builtin::Dict.invalid(
                            format!("expected a [key, value] pair, found {}", pair),
                            span,
                        ))
                    }
                }
            }
            Ok(Value::object(map))
        }
        other => Err(Builtin::Dict.invalid(
            format!("cannot build an OBJECT from {}", other.type_name()),
            span,
        )),
    }
}

fn length(value: &Value, span: Span) -> Result<Value> {
    let len = match value {
        Value::String(s) => s.chars().count(),
        Value::List(items) => items.len(),
        Value::Object(map) => map.len(),
        other => {
            return Err(Builtin::Len.invalid(
                format!("has no length for {}", other.type_name()),
                span,
            ))
        }
    };
    Ok(Value::from(len))
}

/// `list(v)` for values that need no iteration protocol.
fn list_of(value: &Value) -> Option<Value> {
    match value {
        Value::List(items) => Some(Value::list(items.as_ref().clone())),
        Value::String(s) => Some(Value::list(
            s.chars().map(|c| Value::string(c.to_string())).collect(),
        )),
        Value::Object(map) => Some(Value::list(map.values().cloned().collect())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(builtin: Builtin, args: &[Value]) -> Result<Value> {
        builtin
            .apply_pure(args, Span::default())
            .expect("pure builtin")
    }

    #[test]
    fn test_prelude_bindings() {
        let env = Environment::with_prelude();
        assert_eq!(env.get("__version__"), Some(Value::string(crate::VERSION)));
        assert!(matches!(env.get("Promise"), Some(Value::Type(_))));
        assert!(!env.contains("pr"));
    }

    #[test]
    fn test_type_names() {
        assert_eq!(apply(Builtin::Type, &[Value::Null]), Ok(Value::string("NULL")));
        assert_eq!(
            apply(Builtin::Type, &[Value::list(vec![])]),
            Ok(Value::string("LIST"))
        );
        assert!(matches!(
            apply(Builtin::Type, &[]),
            Err(EvalError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_len_and_str() {
        assert_eq!(apply(Builtin::Len, &[Value::string("héllo")]), Ok(Value::Number(5.0)));
        assert_eq!(apply(Builtin::Str, &[Value::Number(3.0)]), Ok(Value::string("3")));
        assert!(apply(Builtin::Len, &[Value::Number(1.0)]).is_err());
    }

    #[test]
    fn test_list_of_string() {
        assert_eq!(
            apply(Builtin::List, &[Value::string("ab")]),
            Ok(Value::from(vec!["a", "b"]))
        );
        assert!(Builtin::List
            .apply_pure(&[Value::Number(1.0)], Span::default())
            .is_none());
        assert!(Builtin::Pr.apply_pure(&[], Span::default()).is_none());
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Builtin::from_name("bool"), Some(Builtin::Bool));
        assert_eq!(Builtin::from_name("print"), None);
        assert_eq!(
            Builtin::from_name("register_decorator").map(Builtin::name),
            Some("register_decorator")
        );
    }

    #[test]
    fn test_int_and_float() {
        assert_eq!(apply(Builtin::Int, &[Value::Number(-2.7)]), Ok(Value::Number(-2.0)));
        assert_eq!(apply(Builtin::Int, &[Value::string("42abc")]), Ok(Value::Number(42.0)));
        assert_eq!(apply(Builtin::Int, &[Value::Bool(true)]), Ok(Value::Number(1.0)));
        assert_eq!(apply(Builtin::Float, &[Value::string(" 2.5")]), Ok(Value::Number(2.5)));
        assert!(matches!(
            apply(Builtin::Float, &[Value::Null]),
            Err(EvalError::InvalidArgument { ref name, .. }) if name == "float"
        ));
    }

    #[test]
    fn test_range_forms() {
        assert_eq!(
            apply(Builtin::Range, &[Value::Number(3.0)]),
            Ok(Value::from(vec![0, 1, 2]))
        );
        assert_eq!(
            apply(Builtin::Range, &[Value::Number(2.0), Value::Number(5.0)]),
            Ok(Value::from(vec![2, 3, 4]))
        );
        assert_eq!(
            apply(
                Builtin::Range,
                &[Value::Number(5.0), Value::Number(0.0), Value::Number(-2.0)]
            ),
            Ok(Value::from(vec![5, 3, 1]))
        );
        assert_eq!(
            apply(Builtin::Range, &[Value::Number(3.0), Value::Number(1.0)]),
            Ok(Value::list(vec![]))
        );
    }

    #[test]
    fn test_range_rejects_bad_bounds() {
        let zero_step = [Value::Number(0.0), Value::Number(3.0), Value::Number(0.0)];
        assert!(apply(Builtin::Range, &zero_step).is_err());
        assert!(apply(Builtin::Range, &[]).is_err());
        assert!(apply(Builtin::Range, &[Value::string("3")]).is_err());
    }

    #[test]
    fn test_dict_from_pairs() {
        let pairs = Value::list(vec![
            Value::from(vec!["a", "b"]),
            Value::list(vec![Value::Number(1.0), Value::Bool(true)]),
        ]);
        let value = apply(Builtin::Dict, &[pairs]).unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["a", "1"]);
        assert_eq!(value.get_attr("a"), Some(Value::string("b")));

        assert_eq!(
            apply(Builtin::Dict, &[]).map(|v| v.type_name()),
            Ok("OBJECT")
        );
        assert!(apply(Builtin::Dict, &[Value::from(vec![1, 2])]).is_err());
    }

    #[test]
    fn test_dict_copies_an_object() {
        let source = Value::object(ObjectMap::from([("k".to_string(), Value::Number(1.0))]));
        let copy = apply(Builtin::Dict, &[source.clone()]).unwrap();
        assert_eq!(copy.get_attr("k"), Some(Value::Number(1.0)));
        assert!(!copy.strict_equal(&source));
    }
}

//! Display and Debug implementations for Value

use std::fmt;

use super::*;

/// Render a number the way `pr` prints it: integral values without a
/// fractional part.
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::String(s) => write!(f, "{}", s),

            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }

            Value::Object(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }

            Value::Function(func) => write!(f, "<function {}>", func.display_name()),
            Value::Type(class) => write!(f, "<class {}>", class.name),
            Value::Instance(inst) => write!(f, "<{} instance>", inst.borrow().class.name),
            Value::BoundMethod(method) => {
                write!(f, "<bound method {}>", method.func.display_name())
            }
            Value::Promise(promise) => write!(f, "<promise {}>", promise.borrow().state_name()),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Debug quotes strings; handles stay shallow so cycles print finitely
        match self {
            Value::String(s) => write!(f, "{:?}", s.as_ref()),

            Value::List(items) => f.debug_list().entries(items.iter()).finish(),

            Value::Object(map) => f.debug_map().entries(map.iter()).finish(),

            _ => fmt::Display::fmt(self, f),
        }
    }
}

//! Value representation for runtime values

mod callable;
mod compound;
mod display;
mod impls;
mod promise;

pub use callable::{BoundMethod, FunctionValue};
pub use compound::{ClassValue, InstanceRef, InstanceValue, ObjectMap};
pub use display::format_number;
pub use promise::{AsyncTask, PromiseRef, PromiseState, PromiseValue};

use std::rc::Rc;

/// Runtime value representation for the Able interpreter.
///
/// Values are organized into three tiers that differ in what copying means:
/// - Tier 1: Inline scalars, copied.
/// - Tier 2: Structural values (String, Object, List). Storing one under a
///   binding, an attribute, or a list slot goes through [`Value::deep_copy`],
///   so every stored Object or List has its own identity. A Rust `clone`
///   only retains the payload; mutation goes through `Rc::make_mut`.
/// - Tier 3: Handles (Function, Type, Instance, BoundMethod, Promise). A
///   copy is another handle to the same object, and mutation through one
///   handle is visible through all of them. A stored Function gets its own
///   attribute map.
#[derive(Clone, Default)]
pub enum Value {
    // ═══════════════════════════════════════════════════════════════════
    // Tier 1: Inline Scalars
    // ═══════════════════════════════════════════════════════════════════
    /// Absence of a value: missing attributes, bare `return`
    #[default]
    Undefined,

    /// `null`
    Null,

    /// `true` / `false`
    Bool(bool),

    /// Double-precision number (the only numeric type)
    Number(f64),

    // ═══════════════════════════════════════════════════════════════════
    // Tier 2: Structural Values (copy-on-write)
    // ═══════════════════════════════════════════════════════════════════
    /// Immutable text
    String(Rc<str>),

    /// Ordered key → value map, keys unique, insertion order preserved
    Object(Rc<ObjectMap>),

    /// Growable sequence
    List(Rc<Vec<Value>>),

    // ═══════════════════════════════════════════════════════════════════
    // Tier 3: Shared Handles
    // ═══════════════════════════════════════════════════════════════════
    /// Closure: parameters, body, captured environment
    Function(Rc<FunctionValue>),

    /// Class object
    Type(Rc<ClassValue>),

    /// Class instance with its own attribute map
    Instance(InstanceRef),

    /// Function paired with the instance it was fetched from
    BoundMethod(Rc<BoundMethod>),

    /// Deferred computation handle
    Promise(PromiseRef),
}

impl Value {
    /// Language-level type name, as returned by the `type()` builtin.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "UNDEFINED",
            Value::Null => "NULL",
            Value::Bool(_) => "BOOLEAN",
            Value::Number(_) => "NUMBER",
            Value::String(_) => "STRING",
            Value::Object(_) => "OBJECT",
            Value::List(_) => "LIST",
            Value::Function(_) => "FUNCTION",
            Value::Type(_) => "TYPE",
            Value::Instance(_) => "INSTANCE",
            Value::BoundMethod(_) => "BOUND_METHOD",
            Value::Promise(_) => "PROMISE",
        }
    }

    /// Truthiness used by `if`, `while`, `not`, ternaries and `bool()`.
    ///
    /// False for Undefined, Null, `false`, `0` and the empty string.
    /// Containers and handles are always true, even when empty.
    pub fn to_boolean(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0,
            Value::String(s) => !s.is_empty(),
            _ => true,
        }
    }

    /// Numeric coercion used by loose equality and comparisons.
    ///
    /// Bools map to 0/1, strings parse their leading numeric prefix (0 if
    /// there is none), everything else is NaN.
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Number(n) => *n,
            Value::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::String(s) => parse_number_prefix(s),
            _ => f64::NAN,
        }
    }

    /// Strict equality (`===`).
    ///
    /// Tags must match. Scalars and strings compare by value; Object,
    /// List and every handle type compare by identity.
    pub fn strict_equal(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::List(a), Value::List(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => a.same_function(b),
            (Value::Type(a), Value::Type(b)) => Rc::ptr_eq(a, b),
            (Value::Instance(a), Value::Instance(b)) => Rc::ptr_eq(a, b),
            (Value::BoundMethod(a), Value::BoundMethod(b)) => {
                Rc::ptr_eq(&a.receiver, &b.receiver) && a.func.same_function(&b.func)
            }
            (Value::Promise(a), Value::Promise(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Loose equality (`==`).
    ///
    /// Same tags fall back to strict equality. Mixed Number/String/Bool
    /// pairs are compared after numeric coercion; any other mix is unequal.
    pub fn loose_equal(&self, other: &Value) -> bool {
        if std::mem::discriminant(self) == std::mem::discriminant(other) {
            return self.strict_equal(other);
        }
        if self.is_primitive_coercible() && other.is_primitive_coercible() {
            return self.to_number() == other.to_number();
        }
        false
    }

    /// Copy made whenever a value is stored.
    ///
    /// Objects and Lists are copied recursively and get a fresh identity.
    /// Functions stay the same function but carry a copy of their attribute
    /// map. Strings and the other handles are retained.
    pub fn deep_copy(&self) -> Value {
        match self {
            Value::Object(map) => Value::Object(Rc::new(
                map.iter().map(|(k, v)| (k.clone(), v.deep_copy())).collect(),
            )),
            Value::List(items) => {
                Value::List(Rc::new(items.iter().map(Value::deep_copy).collect()))
            }
            Value::Function(func) => Value::Function(Rc::new(func.copied())),
            other => other.clone(),
        }
    }

    fn is_primitive_coercible(&self) -> bool {
        matches!(self, Value::Number(_) | Value::String(_) | Value::Bool(_))
    }
}

/// Parse the longest numeric prefix of `s`, C `atof` style.
fn parse_number_prefix(s: &str) -> f64 {
    let trimmed = s.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    let mut seen_exp = false;

    while end < bytes.len() {
        let c = bytes[end];
        match c {
            b'0'..=b'9' => seen_digit = true,
            b'+' | b'-' if end == 0 => {}
            b'+' | b'-' if seen_exp && matches!(bytes[end - 1], b'e' | b'E') => {}
            b'.' if !seen_dot && !seen_exp => seen_dot = true,
            b'e' | b'E' if seen_digit && !seen_exp => seen_exp = true,
            _ => break,
        }
        end += 1;
    }

    // Back off trailing characters that cannot end a number ("1e", "2e+", "-")
    let mut candidate = &trimmed[..end];
    while !candidate.is_empty() {
        if let Ok(n) = candidate.parse::<f64>() {
            return n;
        }
        candidate = &candidate[..candidate.len() - 1];
    }
    0.0
}

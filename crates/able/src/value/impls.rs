//! Value trait implementations: constructors, predicates, extractors, From traits, PartialEq

use std::rc::Rc;

use super::*;

// ═══════════════════════════════════════════════════════════════════
// Convenience Constructors
// ═══════════════════════════════════════════════════════════════════

impl Value {
    /// Create a string value
    pub fn string(s: impl AsRef<str>) -> Self {
        Value::String(Rc::from(s.as_ref()))
    }

    /// Create a list value
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Rc::new(items))
    }

    /// Create an object value
    pub fn object(map: ObjectMap) -> Self {
        Value::Object(Rc::new(map))
    }

    /// Create a function value
    pub fn function(func: FunctionValue) -> Self {
        Value::Function(Rc::new(func))
    }

    /// Create a class value
    pub fn class(class: ClassValue) -> Self {
        Value::Type(Rc::new(class))
    }

    /// Create a fresh instance of `class`
    pub fn instance(class: Rc<ClassValue>) -> Self {
        Value::Instance(InstanceValue::new(class).into_ref())
    }

    /// Create a promise value
    pub fn promise(promise: PromiseValue) -> Self {
        Value::Promise(promise.into_ref())
    }

    // ═══════════════════════════════════════════════════════════════════
    // Type Predicates
    // ═══════════════════════════════════════════════════════════════════
    /// Check if value is undefined
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Check if value is a number
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    /// Check if value is a string
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Check if value can appear in call position
    pub fn is_callable(&self) -> bool {
        matches!(
            self,
            Value::Function(_) | Value::BoundMethod(_) | Value::Type(_)
        )
    }

    /// Check if value is a promise
    pub fn is_promise(&self) -> bool {
        matches!(self, Value::Promise(_))
    }

    // ═══════════════════════════════════════════════════════════════════
    // Extractors (return Option for safe access)
    // ═══════════════════════════════════════════════════════════════════
    /// Extract boolean value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extract number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extract string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Extract list elements
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Extract object map
    pub fn as_object(&self) -> Option<&ObjectMap> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Extract function handle
    pub fn as_function(&self) -> Option<&Rc<FunctionValue>> {
        match self {
            Value::Function(func) => Some(func),
            _ => None,
        }
    }

    /// Extract class handle
    pub fn as_class(&self) -> Option<&Rc<ClassValue>> {
        match self {
            Value::Type(class) => Some(class),
            _ => None,
        }
    }

    /// Extract instance handle
    pub fn as_instance(&self) -> Option<&InstanceRef> {
        match self {
            Value::Instance(inst) => Some(inst),
            _ => None,
        }
    }

    /// Extract promise handle
    pub fn as_promise(&self) -> Option<&PromiseRef> {
        match self {
            Value::Promise(promise) => Some(promise),
            _ => None,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// PartialEq Implementation
// ═══════════════════════════════════════════════════════════════════

/// Host-side equality: structural for strings, lists, and objects,
/// identity for handles. Scripts use `strict_equal`/`loose_equal` instead.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            _ => self.strict_equal(other),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// From Trait Implementations
// ═══════════════════════════════════════════════════════════════════

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Rc::from(s))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<ObjectMap> for Value {
    fn from(map: ObjectMap) -> Self {
        Value::object(map)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::list(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Undefined, Into::into)
    }
}

//! Callable value types: functions and bound methods

use std::cell::{OnceCell, RefCell};
use std::fmt;
use std::rc::Rc;

use super::{InstanceRef, ObjectMap, Value};
use crate::ast::{FunctionDef, MethodDef, Stmt};
use crate::environment::Environment;

/// A user-defined function or method.
///
/// The defining environment is captured at most once: by the class
/// definition for methods, or by the first `set` that stores the function.
/// A function that was never stored (an immediately-called literal) runs
/// in a child of the global environment.
///
/// Copies made by [`FunctionValue::copied`] share the capture slot, which
/// is also what makes them the same function for `===`. Each copy owns its
/// attribute map.
pub struct FunctionValue {
    /// Name hint for diagnostics
    pub name: Option<String>,

    /// Parameter names in order
    pub params: Vec<String>,

    /// Body statements, shared with the syntax tree
    pub body: Rc<Vec<Stmt>>,

    /// Calling returns a Promise instead of running the body
    pub is_async: bool,

    /// Fetching this function from an instance produces a bound method
    pub bind_on_access: bool,

    closure: Rc<OnceCell<Environment>>,
    attributes: RefCell<ObjectMap>,
}

impl FunctionValue {
    /// Build a fresh, uncaptured function from a literal.
    pub fn from_def(def: &FunctionDef) -> Self {
        Self {
            name: def.name.clone(),
            params: def.params.clone(),
            body: Rc::clone(&def.body),
            is_async: def.is_async,
            bind_on_access: false,
            closure: Rc::new(OnceCell::new()),
            attributes: RefCell::new(ObjectMap::new()),
        }
    }

    /// Build a class method that closes over the class definition's scope.
    pub fn method(def: &MethodDef, env: &Environment) -> Self {
        let func = Self {
            name: Some(def.name.clone()),
            params: def.params.clone(),
            body: Rc::clone(&def.body),
            is_async: def.is_async,
            bind_on_access: !def.is_static,
            closure: Rc::new(OnceCell::new()),
            attributes: RefCell::new(ObjectMap::new()),
        };
        func.capture(env);
        func
    }

    /// Capture `env` unless an environment was already captured.
    ///
    /// Returns true if this call did the capture.
    pub fn capture(&self, env: &Environment) -> bool {
        self.closure.set(env.clone()).is_ok()
    }

    /// The captured environment, if any.
    pub fn captured_env(&self) -> Option<&Environment> {
        self.closure.get()
    }

    /// Another handle to this function with a deep copy of its attributes.
    pub fn copied(&self) -> Self {
        let attributes = self
            .attributes
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.deep_copy()))
            .collect();
        Self {
            name: self.name.clone(),
            params: self.params.clone(),
            body: Rc::clone(&self.body),
            is_async: self.is_async,
            bind_on_access: self.bind_on_access,
            closure: Rc::clone(&self.closure),
            attributes: RefCell::new(attributes),
        }
    }

    /// True if both values came from the same function literal evaluation
    /// or method definition.
    pub fn same_function(&self, other: &FunctionValue) -> bool {
        Rc::ptr_eq(&self.closure, &other.closure)
    }

    /// Read an attribute stored on the function object.
    pub fn get_attr(&self, name: &str) -> Option<Value> {
        self.attributes.borrow().get(name).cloned()
    }

    /// Store an attribute on the function object.
    pub fn set_attr(&self, name: impl Into<String>, value: Value) {
        self.attributes.borrow_mut().insert(name.into(), value);
    }

    /// Remove an attribute for in-place update; put it back with `set_attr`.
    pub(crate) fn take_attr(&self, name: &str) -> Option<Value> {
        self.attributes
            .borrow_mut()
            .get_mut(name)
            .map(std::mem::take)
    }

    /// Number of declared parameters.
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Name used in diagnostics.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<anonymous>")
    }
}

impl fmt::Debug for FunctionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Environments can reach this function again; never print them
        f.debug_struct("FunctionValue")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("is_async", &self.is_async)
            .field("bind_on_access", &self.bind_on_access)
            .field("captured", &self.closure.get().is_some())
            .finish()
    }
}

/// A method fetched from an instance, remembering its receiver.
#[derive(Debug, Clone)]
pub struct BoundMethod {
    /// Instance passed as the first argument
    pub receiver: InstanceRef,

    /// The underlying method
    pub func: Rc<FunctionValue>,
}

impl BoundMethod {
    /// Pair a method with its receiver.
    pub fn new(receiver: InstanceRef, func: Rc<FunctionValue>) -> Self {
        Self { receiver, func }
    }

    /// Arguments expected at the call site (the receiver is implicit).
    pub fn arity(&self) -> usize {
        self.func.arity().saturating_sub(1)
    }
}

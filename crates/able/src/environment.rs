//! Runtime environment managing variable bindings

mod annotations;
mod frame;
mod prelude;

pub use annotations::AnnotationRegistry;
pub use frame::{CallFrame, CallStack};
pub use prelude::{Builtin, PROMISE_NAMESPACE};

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::value::Value;

struct Scope {
    bindings: IndexMap<String, Value>,
    parent: Option<Environment>,
}

/// A lexical scope: a binding map plus an optional parent scope.
///
/// `Environment` is a shared handle. Cloning it retains the same scope, so
/// a closure that captured it keeps the scope alive after the call that
/// created it has returned. Lookups and assignments walk the parent chain.
///
/// Every stored value is a [`Value::deep_copy`] of the value passed in;
/// lookups return the stored value itself.
///
/// # Example
///
/// ```
/// use able::{Environment, Value};
///
/// let globals = Environment::new();
/// globals.set("x", Value::Number(1.0));
///
/// let local = globals.child();
/// local.define("y", Value::Number(2.0));
/// local.set("x", Value::Number(10.0)); // updates the global binding
///
/// assert_eq!(globals.get("x"), Some(Value::Number(10.0)));
/// assert_eq!(globals.get("y"), None);
/// assert_eq!(local.get("y"), Some(Value::Number(2.0)));
/// ```
#[derive(Clone)]
pub struct Environment(Rc<RefCell<Scope>>);

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    /// Create a root environment with no parent.
    pub fn new() -> Self {
        Self::with_parent(None)
    }

    /// Create a scope whose parent is `self`.
    pub fn child(&self) -> Self {
        Self::with_parent(Some(self.clone()))
    }

    fn with_parent(parent: Option<Environment>) -> Self {
        Environment(Rc::new(RefCell::new(Scope {
            bindings: IndexMap::new(),
            parent,
        })))
    }

    /// The enclosing scope, if any.
    pub fn parent(&self) -> Option<Environment> {
        self.0.borrow().parent.clone()
    }

    // ═══════════════════════════════════════════════════════════════════
    // Binding Definition and Assignment
    // ═══════════════════════════════════════════════════════════════════

    /// Assign `name`: overwrite the nearest existing binding in the chain,
    /// or create one in this scope if none exists.
    pub fn set(&self, name: impl Into<String>, value: Value) {
        let name = name.into();
        let target = self.find_scope(&name).unwrap_or_else(|| self.clone());
        target.0.borrow_mut().bindings.insert(name, value.deep_copy());
    }

    /// Create or overwrite a binding in this scope only.
    pub fn define(&self, name: impl Into<String>, value: Value) {
        self.0
            .borrow_mut()
            .bindings
            .insert(name.into(), value.deep_copy());
    }

    /// Mutate a binding in place wherever it lives in the chain.
    ///
    /// Returns `None` if `name` is unbound. The closure must not touch
    /// this environment chain.
    pub fn update<R>(&self, name: &str, f: impl FnOnce(&mut Value) -> R) -> Option<R> {
        let scope = self.find_scope(name)?;
        let mut borrowed = scope.0.borrow_mut();
        borrowed.bindings.get_mut(name).map(f)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Binding Lookup
    // ═══════════════════════════════════════════════════════════════════

    /// Look `name` up through the chain, innermost first.
    pub fn get(&self, name: &str) -> Option<Value> {
        let scope = self.find_scope(name)?;
        let borrowed = scope.0.borrow();
        borrowed.bindings.get(name).cloned()
    }

    /// Check if `name` is bound anywhere in the chain.
    pub fn contains(&self, name: &str) -> bool {
        self.find_scope(name).is_some()
    }

    /// Check if `name` is bound in this scope itself.
    pub fn contains_local(&self, name: &str) -> bool {
        self.0.borrow().bindings.contains_key(name)
    }

    fn find_scope(&self, name: &str) -> Option<Environment> {
        let mut current = Some(self.clone());
        while let Some(env) = current {
            if env.0.borrow().bindings.contains_key(name) {
                return Some(env);
            }
            current = env.parent();
        }
        None
    }

    // ═══════════════════════════════════════════════════════════════════
    // Inspection
    // ═══════════════════════════════════════════════════════════════════

    /// Snapshot of this scope's own bindings in definition order.
    pub fn bindings(&self) -> Vec<(String, Value)> {
        self.0
            .borrow()
            .bindings
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Names bound in this scope.
    pub fn names(&self) -> Vec<String> {
        self.0.borrow().bindings.keys().cloned().collect()
    }

    /// Number of scopes from here to the root, inclusive.
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut current = self.parent();
        while let Some(env) = current {
            depth += 1;
            current = env.parent();
        }
        depth
    }

    /// Number of live handles to this scope.
    pub fn use_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }

    /// True if both handles refer to the same scope.
    pub fn ptr_eq(&self, other: &Environment) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Names only: bound values may hold closures over this scope
        f.debug_struct("Environment")
            .field("names", &self.names())
            .field("depth", &self.depth())
            .finish()
    }
}

//! Compound value types: objects, classes, and instances

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use super::{BoundMethod, Value};

/// Ordered attribute map used by Objects, classes, instances, and functions.
///
/// IndexMap keeps insertion order, which is the order `pr` prints keys in.
pub type ObjectMap = IndexMap<String, Value>;

/// Shared handle to an instance. Every binding holding the instance sees
/// the same attribute map.
pub type InstanceRef = Rc<RefCell<InstanceValue>>;

/// A class object.
///
/// Bases are fixed once the class is wrapped in an `Rc`; attributes stay
/// mutable so `set Cls.x to ...` works after definition.
pub struct ClassValue {
    /// Class name
    pub name: String,

    /// Base classes in declared order
    pub bases: Vec<Rc<ClassValue>>,

    attributes: RefCell<ObjectMap>,
}

impl ClassValue {
    /// Create a class with no bases and no attributes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bases: Vec::new(),
            attributes: RefCell::new(ObjectMap::new()),
        }
    }

    /// Replace the base list.
    pub fn set_bases(&mut self, bases: Vec<Rc<ClassValue>>) {
        self.bases = bases;
    }

    /// Add an attribute (builder pattern)
    pub fn with_attr(self, name: impl Into<String>, value: Value) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Look `name` up on this class, then on each base in declared order,
    /// depth first. The first match wins.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.attributes.borrow().get(name) {
            return Some(value.clone());
        }
        self.bases.iter().find_map(|base| base.lookup(name))
    }

    /// Read an attribute from this class only.
    pub fn get_own(&self, name: &str) -> Option<Value> {
        self.attributes.borrow().get(name).cloned()
    }

    /// Write an attribute on this class (never on a base).
    pub fn set_attr(&self, name: impl Into<String>, value: Value) {
        self.attributes.borrow_mut().insert(name.into(), value);
    }

    pub(crate) fn take_attr(&self, name: &str) -> Option<Value> {
        self.attributes
            .borrow_mut()
            .get_mut(name)
            .map(std::mem::take)
    }

    /// Names of the attributes defined directly on this class.
    pub fn own_names(&self) -> Vec<String> {
        self.attributes.borrow().keys().cloned().collect()
    }
}

impl fmt::Debug for ClassValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bases: Vec<&str> = self.bases.iter().map(|b| b.name.as_str()).collect();
        f.debug_struct("ClassValue")
            .field("name", &self.name)
            .field("bases", &bases)
            .field("attributes", &self.own_names())
            .finish()
    }
}

/// An instance of a class.
#[derive(Debug)]
pub struct InstanceValue {
    /// The class this instance was constructed from
    pub class: Rc<ClassValue>,

    /// Attributes set on this instance
    pub attributes: ObjectMap,
}

impl InstanceValue {
    /// Create an instance with an empty attribute map.
    pub fn new(class: Rc<ClassValue>) -> Self {
        Self {
            class,
            attributes: ObjectMap::new(),
        }
    }

    /// Wrap in a shared handle.
    pub fn into_ref(self) -> InstanceRef {
        Rc::new(RefCell::new(self))
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Attribute resolution
// ═══════════════════════════════════════════════════════════════════════

impl Value {
    /// True for values that carry an attribute map.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            Value::Object(_) | Value::Instance(_) | Value::Type(_) | Value::Function(_)
        )
    }

    /// Resolve `name` on this value.
    ///
    /// Instances check their own map and then their class hierarchy, and
    /// wrap methods into bound methods. Objects, classes, and functions
    /// read only their own map. A missing attribute is `None`, as is any
    /// attribute of a non-container.
    pub fn get_attr(&self, name: &str) -> Option<Value> {
        match self {
            Value::Instance(inst) => {
                let found = {
                    let borrowed = inst.borrow();
                    match borrowed.attributes.get(name) {
                        Some(value) => Some(value.clone()),
                        None => borrowed.class.lookup(name),
                    }
                };
                found.map(|value| bind_to(value, inst))
            }
            Value::Object(map) => map.get(name).cloned(),
            Value::Type(class) => class.get_own(name),
            Value::Function(func) => func.get_attr(name),
            _ => None,
        }
    }

    /// Store a copy of `value` as `name` on this value's own attribute map.
    ///
    /// Returns false if the value is not a container.
    pub fn set_attr(&mut self, name: &str, value: Value) -> bool {
        self.put_attr(name, value.deep_copy())
    }

    /// Store `value` itself, without copying. Used to write back an
    /// attribute taken out with `take_attr`.
    pub(crate) fn put_attr(&mut self, name: &str, value: Value) -> bool {
        match self {
            Value::Instance(inst) => {
                inst.borrow_mut().attributes.insert(name.to_string(), value);
            }
            Value::Object(map) => {
                Rc::make_mut(map).insert(name.to_string(), value);
            }
            Value::Type(class) => class.set_attr(name, value),
            Value::Function(func) => func.set_attr(name, value),
            _ => return false,
        }
        true
    }

    /// Move an attribute out for in-place modification, leaving Undefined
    /// behind. Instances fall back to a copy of the class attribute, so
    /// writing it back shadows the class value on this instance only.
    pub(crate) fn take_attr(&mut self, name: &str) -> Option<Value> {
        match self {
            Value::Instance(inst) => {
                let mut borrowed = inst.borrow_mut();
                match borrowed.attributes.get_mut(name) {
                    Some(slot) => Some(std::mem::take(slot)),
                    None => borrowed.class.lookup(name),
                }
            }
            Value::Object(map) => Rc::make_mut(map).get_mut(name).map(std::mem::take),
            Value::Type(class) => class.take_attr(name),
            Value::Function(func) => func.take_attr(name),
            _ => None,
        }
    }
}

fn bind_to(value: Value, receiver: &InstanceRef) -> Value {
    match value {
        Value::Function(func) if func.bind_on_access => {
            Value::BoundMethod(Rc::new(BoundMethod::new(Rc::clone(receiver), func)))
        }
        other => other,
    }
}

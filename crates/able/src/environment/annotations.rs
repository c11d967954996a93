//! Modifier and decorator registries
//!
//! Annotations on a function definition name a handler registered here.
//! The two kinds live in separate tables, so a modifier and a decorator
//! may share a name.

use indexmap::IndexMap;

use crate::ast::AnnotationKind;
use crate::value::Value;

/// Handlers for function annotations, indexed by name.
#[derive(Debug, Clone, Default)]
pub struct AnnotationRegistry {
    modifiers: IndexMap<String, Value>,
    decorators: IndexMap<String, Value>,
}

impl AnnotationRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under `name`, replacing an earlier handler.
    ///
    /// The registry keeps its own copy of the handler.
    pub fn register(&mut self, kind: AnnotationKind, name: impl Into<String>, handler: Value) {
        self.table_mut(kind).insert(name.into(), handler.deep_copy());
    }

    /// Look up a handler.
    pub fn handler(&self, kind: AnnotationKind, name: &str) -> Option<Value> {
        self.table(kind).get(name).cloned()
    }

    /// Check if a handler is registered.
    pub fn contains(&self, kind: AnnotationKind, name: &str) -> bool {
        self.table(kind).contains_key(name)
    }

    fn table(&self, kind: AnnotationKind) -> &IndexMap<String, Value> {
        match kind {
            AnnotationKind::Modifier => &self.modifiers,
            AnnotationKind::Decorator => &self.decorators,
        }
    }

    fn table_mut(&mut self, kind: AnnotationKind) -> &mut IndexMap<String, Value> {
        match kind {
            AnnotationKind::Modifier => &mut self.modifiers,
            AnnotationKind::Decorator => &mut self.decorators,
        }
    }
}

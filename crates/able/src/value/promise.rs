//! Promises and the deferred tasks behind them

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use super::{FunctionValue, InstanceRef, Value};
use crate::ast::Span;

/// Shared handle to a promise.
pub type PromiseRef = Rc<RefCell<PromiseValue>>;

/// A deferred call of an async function.
///
/// Nothing runs until the owning promise is awaited. The task is taken out
/// of the promise before it runs, which is what makes execution at most once.
#[derive(Debug, Clone)]
pub struct AsyncTask {
    /// The function to run
    pub func: Rc<FunctionValue>,

    /// Arguments, already evaluated at call time
    pub args: Vec<Value>,

    /// Receiver for async methods
    pub receiver: Option<InstanceRef>,

    /// Call site, for diagnostics raised while running the task
    pub span: Option<Span>,
}

/// Lifecycle of a promise. Fulfilled and Rejected are terminal.
#[derive(Debug)]
pub enum PromiseState {
    /// Not settled; holds the task until someone starts running it
    Pending(Option<AsyncTask>),

    /// Settled with a result
    Fulfilled(Value),

    /// Settled with a rejection reason
    Rejected(Value),
}

/// A promise: settlement state plus the task that will settle it.
#[derive(Debug)]
pub struct PromiseValue {
    /// Current state
    pub state: PromiseState,
}

impl PromiseValue {
    /// A pending promise that will run `task` when awaited.
    pub fn pending(task: AsyncTask) -> Self {
        debug!(
            function = task.func.display_name(),
            args = task.args.len(),
            "promise created"
        );
        Self {
            state: PromiseState::Pending(Some(task)),
        }
    }

    /// An already-fulfilled promise.
    pub fn fulfilled(value: Value) -> Self {
        Self {
            state: PromiseState::Fulfilled(value),
        }
    }

    /// An already-rejected promise.
    pub fn rejected(reason: Value) -> Self {
        Self {
            state: PromiseState::Rejected(reason),
        }
    }

    /// Wrap in a shared handle.
    pub fn into_ref(self) -> PromiseRef {
        Rc::new(RefCell::new(self))
    }

    /// Take the pending task, leaving the promise pending without one.
    pub fn take_task(&mut self) -> Option<AsyncTask> {
        match &mut self.state {
            PromiseState::Pending(task) => task.take(),
            _ => None,
        }
    }

    /// Fulfil the promise. Has no effect once settled.
    pub fn resolve(&mut self, value: Value) {
        if self.is_pending() {
            debug!(result = value.type_name(), "promise fulfilled");
            self.state = PromiseState::Fulfilled(value);
        }
    }

    /// True while unsettled.
    pub fn is_pending(&self) -> bool {
        matches!(self.state, PromiseState::Pending(_))
    }

    /// `pending`, `fulfilled`, or `rejected`.
    pub fn state_name(&self) -> &'static str {
        match self.state {
            PromiseState::Pending(_) => "pending",
            PromiseState::Fulfilled(_) => "fulfilled",
            PromiseState::Rejected(_) => "rejected",
        }
    }
}

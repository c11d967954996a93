//! Per-interpreter runtime settings

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Call depth used when a host does not pick one.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 1000;

/// Settings an embedding host hands to an [`Interpreter`](crate::Interpreter).
///
/// Cloning shares the stop flag. A host keeps one clone and gives the other
/// to the interpreter; setting the flag from a watchdog thread or a Ctrl-C
/// handler makes the running script fail with `Interrupted` at its next
/// statement or loop iteration.
#[derive(Debug, Clone)]
pub struct EvalContext {
    /// Script calls allowed to be active at once; one more is a `StackOverflow`
    pub max_call_depth: usize,

    /// Stop flag polled between statements and loop iterations
    pub interrupt: Arc<AtomicBool>,

    /// Log every statement at `trace` level, with its line number
    pub trace: bool,
}

impl Default for EvalContext {
    fn default() -> Self {
        Self {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            interrupt: Arc::new(AtomicBool::new(false)),
            trace: false,
        }
    }
}

impl EvalContext {
    /// Default depth limit, stop flag cleared, tracing off.
    pub fn new() -> Self {
        Self::default()
    }

    /// Like [`EvalContext::new`] with a different depth limit.
    pub fn with_max_call_depth(max_depth: usize) -> Self {
        Self {
            max_call_depth: max_depth,
            ..Default::default()
        }
    }

    /// Turn statement tracing on or off (builder pattern)
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    /// True once a stop was requested.
    pub fn is_interrupted(&self) -> bool {
        self.interrupt.load(Ordering::Relaxed)
    }

    /// Ask the running script to stop.
    pub fn interrupt(&self) {
        self.interrupt.store(true, Ordering::Relaxed);
    }

    /// Clear the stop flag so the interpreter can run again.
    pub fn reset_interrupt(&self) {
        self.interrupt.store(false, Ordering::Relaxed);
    }
}

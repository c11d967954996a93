//! Call stack of active function activations

use tracing::trace;

use super::Environment;
use crate::error::{EvalError, Result};

/// One function activation: the environment its body runs in.
#[derive(Debug, Clone)]
pub struct CallFrame {
    /// Environment for the activation's locals
    pub env: Environment,

    /// Callee name, for tracing
    pub name: String,
}

impl CallFrame {
    /// Create a frame running in `env`.
    pub fn new(name: impl Into<String>, env: Environment) -> Self {
        Self {
            env,
            name: name.into(),
        }
    }
}

/// Stack of call frames above a root frame that holds the globals.
///
/// The root frame is never popped. The top frame's environment is the
/// interpreter's current environment.
#[derive(Debug)]
pub struct CallStack {
    frames: Vec<CallFrame>,
    max_depth: usize,
}

impl CallStack {
    /// Create a stack whose root frame runs in `globals`.
    pub fn new(globals: Environment, max_depth: usize) -> Self {
        Self {
            frames: vec![CallFrame::new("<module>", globals)],
            max_depth,
        }
    }

    /// Push a frame. Fails with `StackOverflow` once the call depth limit
    /// is reached.
    pub fn push(&mut self, frame: CallFrame) -> Result<()> {
        if self.depth() >= self.max_depth {
            return Err(EvalError::StackOverflow {
                depth: self.depth() + 1,
                max: self.max_depth,
            });
        }
        trace!(name = %frame.name, depth = self.depth() + 1, "push frame");
        self.frames.push(frame);
        Ok(())
    }

    /// Pop the top frame. The root frame stays.
    pub fn pop(&mut self) -> Option<CallFrame> {
        if self.frames.len() > 1 {
            let frame = self.frames.pop();
            if let Some(frame) = &frame {
                trace!(name = %frame.name, depth = self.depth(), "pop frame");
            }
            frame
        } else {
            None
        }
    }

    /// The top frame (the root frame when no call is active).
    pub fn current(&self) -> &CallFrame {
        // frames is never empty: the root frame cannot be popped
        &self.frames[self.frames.len() - 1]
    }

    /// Replace the environment of the top frame.
    pub fn set_current_env(&mut self, env: Environment) {
        let last = self.frames.len() - 1;
        self.frames[last].env = env;
    }

    /// Number of active calls, not counting the root frame.
    pub fn depth(&self) -> usize {
        self.frames.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_frame_is_never_popped() {
        let globals = Environment::new();
        let mut stack = CallStack::new(globals.clone(), 10);
        assert_eq!(stack.depth(), 0);
        assert!(stack.pop().is_none());
        assert!(stack.current().env.ptr_eq(&globals));
    }

    #[test]
    fn test_push_and_pop() {
        let globals = Environment::new();
        let mut stack = CallStack::new(globals.clone(), 10);
        let local = globals.child();
        stack.push(CallFrame::new("f", local.clone())).unwrap();
        assert_eq!(stack.depth(), 1);
        assert!(stack.current().env.ptr_eq(&local));

        let popped = stack.pop().unwrap();
        assert_eq!(popped.name, "f");
        assert!(stack.current().env.ptr_eq(&globals));
    }

    #[test]
    fn test_depth_limit() {
        let globals = Environment::new();
        let mut stack = CallStack::new(globals.clone(), 2);
        stack.push(CallFrame::new("a", globals.child())).unwrap();
        stack.push(CallFrame::new("b", globals.child())).unwrap();
        let err = stack.push(CallFrame::new("c", globals.child())).unwrap_err();
        assert_eq!(err, EvalError::StackOverflow { depth: 3, max: 2 });
        assert_eq!(stack.depth(), 2);
    }

    #[test]
    fn test_set_current_env_replaces_only_the_top_frame() {
        let globals = Environment::new();
        let mut stack = CallStack::new(globals.clone(), 4);
        stack.push(CallFrame::new("f", globals.child())).unwrap();
        let other = Environment::new();
        stack.set_current_env(other.clone());
        assert!(stack.current().env.ptr_eq(&other));
        stack.pop();
        assert!(stack.current().env.ptr_eq(&globals));
    }
}

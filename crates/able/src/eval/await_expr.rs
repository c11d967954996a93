//! Await evaluation: running deferred tasks to settle promises

use std::rc::Rc;

use tracing::instrument;

use super::{Evaluate, Interpreter};
use crate::ast::{Expr, Span};
use crate::error::{EvalError, Result};
use crate::value::{AsyncTask, PromiseState};
use crate::Value;

/// Evaluate `await operand`.
pub fn eval_await(interp: &mut Interpreter, operand: &Expr, span: Span) -> Result<Value> {
    let value = operand.eval(interp)?;
    interp.await_value(value, Some(span))
}

impl Interpreter {
    /// Resolve `value` to a non-promise result.
    ///
    /// Non-promises are returned as is. A pending promise runs its task
    /// right here, at most once, and is fulfilled with the task's result.
    /// A promise fulfilled with another promise is followed until a plain
    /// value turns up.
    ///
    /// # Errors
    ///
    /// - `PromiseStalled` if the promise is pending but its task was already
    ///   taken (it is being awaited from inside its own task)
    /// - `SelfResolution` if a promise was fulfilled with itself
    /// - `PromiseRejected` for a rejected promise
    #[instrument(level = "trace", skip_all, fields(kind = value.type_name()))]
    pub fn await_value(&mut self, value: Value, span: Option<Span>) -> Result<Value> {
        let mut current = value;
        loop {
            let promise = match &current {
                Value::Promise(promise) => Rc::clone(promise),
                _ => return Ok(current),
            };

            if promise.borrow().is_pending() {
                let task = promise.borrow_mut().take_task();
                let Some(task) = task else {
                    return Err(EvalError::PromiseStalled { span });
                };
                let result = self.run_task(task)?;
                promise.borrow_mut().resolve(result);
            }

            let next = match &promise.borrow().state {
                PromiseState::Fulfilled(result) => result.deep_copy(),
                PromiseState::Rejected(reason) => {
                    return Err(EvalError::PromiseRejected {
                        reason: reason.to_string(),
                        span,
                    })
                }
                PromiseState::Pending(_) => return Err(EvalError::PromiseStalled { span }),
            };

            if let Value::Promise(inner) = &next {
                if Rc::ptr_eq(inner, &promise) {
                    return Err(EvalError::SelfResolution { span });
                }
            }
            current = next;
        }
    }

    fn run_task(&mut self, task: AsyncTask) -> Result<Value> {
        let AsyncTask {
            func,
            args,
            receiver,
            span,
        } = task;
        self.invoke(&func, receiver, args).map_err(|e| match span {
            Some(at) => e.with_span(at),
            None => e,
        })
    }
}

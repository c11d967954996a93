//! Control flow signals for break/continue/return

use crate::ast::Span;
use crate::error::{EvalError, Result};
use crate::Value;

/// How a statement or block finished.
///
/// Statements return this instead of setting flags on the interpreter;
/// loops consume `Break`/`Continue`, calls consume `Return`.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlFlow {
    /// Ran to completion; continue with the next statement
    Normal,

    /// `break` at the given position
    Break(Span),

    /// `continue` at the given position
    Continue(Span),

    /// `return`, with its value (Undefined for a bare return)
    Return(Value),
}

impl ControlFlow {
    /// True if execution continues with the next statement.
    pub fn is_normal(&self) -> bool {
        matches!(self, ControlFlow::Normal)
    }

    /// Result of a function body or script that finished this way.
    ///
    /// A `break` or `continue` that escaped every loop is an error here.
    pub fn into_value(self) -> Result<Value> {
        match self {
            ControlFlow::Normal => Ok(Value::Undefined),
            ControlFlow::Return(value) => Ok(value),
            ControlFlow::Break(span) => Err(EvalError::BreakOutsideLoop { span: Some(span) }),
            ControlFlow::Continue(span) => {
                Err(EvalError::ContinueOutsideLoop { span: Some(span) })
            }
        }
    }
}

//! Loop execution: `for` and `while`

use super::{ControlFlow, Evaluate, Execute, Interpreter};
use crate::ast::{Expr, Span, Stmt};
use crate::error::{EvalError, Result};
use crate::Value;

/// What the loop should do after one run of its body.
enum Step {
    Next,
    Exit(ControlFlow),
}

/// Fold a body's control flow into the loop: `break` ends the loop
/// normally, `continue` moves on, `return` leaves the loop with the value.
fn step(flow: ControlFlow) -> Step {
    match flow {
        ControlFlow::Normal | ControlFlow::Continue(_) => Step::Next,
        ControlFlow::Break(_) => Step::Exit(ControlFlow::Normal),
        ret @ ControlFlow::Return(_) => Step::Exit(ret),
    }
}

// ═══════════════════════════════════════════════════════════════════════
// for statement
// ═══════════════════════════════════════════════════════════════════════

/// Run `for var of iterable: body`.
///
/// Lists are iterated over a snapshot taken before the first iteration.
/// Anything else goes through `__iter__`/`__next__`.
pub fn exec_for(
    interp: &mut Interpreter,
    var: &str,
    iterable: &Expr,
    body: &[Stmt],
    span: Span,
) -> Result<ControlFlow> {
    let iterable = iterable.eval(interp)?;

    if let Value::List(items) = iterable {
        for item in items.iter() {
            interp.check_interrupt()?;
            interp.current_env().set(var, item.clone());
            if let Step::Exit(flow) = step(body.exec(interp)?) {
                return Ok(flow);
            }
        }
        return Ok(ControlFlow::Normal);
    }

    let mut iter = IterProtocol::start(interp, &iterable, span)?;
    while let Some(item) = iter.next(interp)? {
        interp.check_interrupt()?;
        interp.current_env().set(var, item);
        if let Step::Exit(flow) = step(body.exec(interp)?) {
            return Ok(flow);
        }
    }
    Ok(ControlFlow::Normal)
}

// ═══════════════════════════════════════════════════════════════════════
// while statement
// ═══════════════════════════════════════════════════════════════════════

/// Run `while cond: body`.
pub fn exec_while(interp: &mut Interpreter, cond: &Expr, body: &[Stmt]) -> Result<ControlFlow> {
    loop {
        interp.check_interrupt()?;
        if !cond.eval(interp)?.to_boolean() {
            return Ok(ControlFlow::Normal);
        }
        if let Step::Exit(flow) = step(body.exec(interp)?) {
            return Ok(flow);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Iterator protocol
// ═══════════════════════════════════════════════════════════════════════

/// An iterator obtained from a value's `__iter__` method.
struct IterProtocol {
    iterator: Value,
    span: Span,
}

impl IterProtocol {
    /// Call `__iter__` on `value` once.
    fn start(interp: &mut Interpreter, value: &Value, span: Span) -> Result<Self> {
        let iter_fn = protocol_method(value, "__iter__", span)?;
        let iterator = interp.call_value(iter_fn, vec![], Some(span))?;
        Ok(Self { iterator, span })
    }

    /// Call `__next__`; `None` once it yields Undefined.
    fn next(&mut self, interp: &mut Interpreter) -> Result<Option<Value>> {
        let next_fn = protocol_method(&self.iterator, "__next__", self.span)?;
        match interp.call_value(next_fn, vec![], Some(self.span))? {
            Value::Undefined => Ok(None),
            item => Ok(Some(item)),
        }
    }
}

fn protocol_method(value: &Value, name: &str, span: Span) -> Result<Value> {
    match value.get_attr(name) {
        Some(method) if method.is_callable() => Ok(method),
        _ => Err(EvalError::NotIterable {
            found: value.type_name().to_string(),
            span: Some(span),
        }),
    }
}

/// Drain an iterator-protocol value into a vector, as `list(v)` does.
pub(crate) fn collect_iterator(
    interp: &mut Interpreter,
    value: &Value,
    span: Span,
) -> Result<Vec<Value>> {
    let mut iter = IterProtocol::start(interp, value, span)?;
    let mut items = Vec::new();
    while let Some(item) = iter.next(interp)? {
        interp.check_interrupt()?;
        items.push(item);
    }
    Ok(items)
}

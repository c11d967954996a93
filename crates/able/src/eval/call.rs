//! Function call evaluation

use std::rc::Rc;

use tracing::{debug, instrument};

use super::field::{eval_attr_access, update_path};
use super::{eval_args, loops, Evaluate, Execute, Interpreter};
use crate::ast::{Annotation, AnnotationKind, Expr, ExprKind, Span};
use crate::environment::{Builtin, CallFrame};
use crate::error::{EvalError, Result};
use crate::value::{
    AsyncTask, ClassValue, FunctionValue, InstanceRef, InstanceValue, PromiseValue,
};
use crate::Value;

/// Evaluate `callee(args...)`.
///
/// Builtins and list methods are recognized from the callee's shape before
/// the callee is evaluated.
pub fn eval_call(
    interp: &mut Interpreter,
    callee: &Expr,
    args: &[Expr],
    span: Span,
) -> Result<Value> {
    match &callee.kind {
        ExprKind::Var(name) => {
            if let Some(builtin) = Builtin::from_name(name) {
                let args = eval_args(interp, args)?;
                return call_builtin(interp, builtin, args, span);
            }
        }
        ExprKind::AttrAccess { object, path } => {
            if let Some(result) = try_list_method(interp, object, path, args, span) {
                return result;
            }
        }
        _ => {}
    }

    let func = callee.eval(interp)?;
    let args = eval_args(interp, args)?;
    interp
        .call_value(func, args, Some(span))
        .map_err(|e| e.with_span(span))
}

impl Interpreter {
    /// Call a value with already-evaluated arguments.
    ///
    /// Functions and bound methods check arity and run their body, or
    /// return a pending Promise if async. Classes construct an instance.
    ///
    /// # Errors
    ///
    /// `NotCallable` for any other value, `ArityMismatch` on a wrong
    /// argument count, plus whatever the body raises.
    #[instrument(
        level = "debug",
        skip_all,
        fields(callee = callee.type_name(), argc = args.len())
    )]
    pub fn call_value(
        &mut self,
        callee: Value,
        args: Vec<Value>,
        span: Option<Span>,
    ) -> Result<Value> {
        match callee {
            Value::Function(func) => self.call_function(func, None, args, span),
            Value::BoundMethod(method) => self.call_function(
                Rc::clone(&method.func),
                Some(Rc::clone(&method.receiver)),
                args,
                span,
            ),
            Value::Type(class) => self.construct(class, args, span),
            other => Err(EvalError::NotCallable {
                found: other.type_name().to_string(),
                span,
            }),
        }
    }

    /// Call a value and await the result.
    pub fn call_and_await(
        &mut self,
        callee: Value,
        args: Vec<Value>,
        span: Option<Span>,
    ) -> Result<Value> {
        let result = self.call_value(callee, args, span)?;
        self.await_value(result, span)
    }

    fn call_function(
        &mut self,
        func: Rc<FunctionValue>,
        receiver: Option<InstanceRef>,
        args: Vec<Value>,
        span: Option<Span>,
    ) -> Result<Value> {
        check_arity(&func, receiver.is_some(), args.len(), span)?;
        if func.is_async {
            // The task owns its arguments from here on
            let promise = PromiseValue::pending(AsyncTask {
                func,
                args: args.iter().map(Value::deep_copy).collect(),
                receiver,
                span,
            });
            return Ok(Value::promise(promise));
        }
        self.invoke(&func, receiver, args)
    }

    /// Run a function body synchronously in a fresh frame.
    ///
    /// The local scope's parent is the captured environment, or the globals
    /// for a function that was never bound.
    pub(crate) fn invoke(
        &mut self,
        func: &FunctionValue,
        receiver: Option<InstanceRef>,
        args: Vec<Value>,
    ) -> Result<Value> {
        let parent = func
            .captured_env()
            .cloned()
            .unwrap_or_else(|| self.global_env());
        let local = parent.child();

        let receiver = receiver.map(Value::Instance);
        for (param, arg) in func.params.iter().zip(receiver.into_iter().chain(args)) {
            local.define(param.as_str(), arg);
        }

        let mut frame = self.enter_frame(CallFrame::new(func.display_name(), local))?;
        let flow = func.body.exec(&mut frame)?;
        flow.into_value()
    }

    /// Create an instance of `class`, running its `init` method if any.
    fn construct(
        &mut self,
        class: Rc<ClassValue>,
        args: Vec<Value>,
        span: Option<Span>,
    ) -> Result<Value> {
        if self.is_promise_namespace(&class) {
            return Err(EvalError::NotCallable {
                found: "Promise (cannot be instantiated directly)".to_string(),
                span,
            });
        }

        let instance = InstanceValue::new(Rc::clone(&class)).into_ref();
        let value = Value::Instance(Rc::clone(&instance));
        match value.get_attr("init") {
            Some(Value::BoundMethod(init)) => {
                check_arity(&init.func, true, args.len(), span)?;
                self.invoke(&init.func, Some(instance), args)?;
            }
            _ if !args.is_empty() => {
                return Err(EvalError::ArityMismatch {
                    name: class.name.clone(),
                    expected: 0,
                    got: args.len(),
                    span,
                });
            }
            _ => {}
        }
        Ok(value)
    }
}

fn check_arity(func: &FunctionValue, bound: bool, got: usize, span: Option<Span>) -> Result<()> {
    let expected = if bound {
        func.arity().saturating_sub(1)
    } else {
        func.arity()
    };
    if got == expected {
        Ok(())
    } else {
        Err(EvalError::ArityMismatch {
            name: func.display_name().to_string(),
            expected,
            got,
            span,
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Builtins
// ═══════════════════════════════════════════════════════════════════════

fn call_builtin(
    interp: &mut Interpreter,
    builtin: Builtin,
    args: Vec<Value>,
    span: Span,
) -> Result<Value> {
    if let Some(result) = builtin.apply_pure(&args, span) {
        return result;
    }
    match builtin {
        Builtin::Pr => {
            let mut line: String = args.iter().map(ToString::to_string).collect();
            line.push('\n');
            interp.write_output(&line)?;
            Ok(Value::Undefined)
        }
        Builtin::RegisterModifier => register_annotation(interp, builtin, args, span),
        Builtin::RegisterDecorator => register_annotation(interp, builtin, args, span),
        // Anything `apply_pure` could not convert goes through the iterator protocol
        _ => {
            let items = loops::collect_iterator(interp, &args[0], span)?;
            Ok(Value::list(items))
        }
    }
}

/// `register_modifier(name, handler)` / `register_decorator(name, handler)`
fn register_annotation(
    interp: &mut Interpreter,
    builtin: Builtin,
    args: Vec<Value>,
    span: Span,
) -> Result<Value> {
    let kind = match builtin {
        Builtin::RegisterModifier => AnnotationKind::Modifier,
        _ => AnnotationKind::Decorator,
    };
    let [name, handler]: [Value; 2] = args.try_into().map_err(|args: Vec<Value>| {
        builtin.invalid(
            format!("takes exactly two arguments ({} given)", args.len()),
            span,
        )
    })?;
    let Some(name) = name.as_str() else {
        return Err(builtin.invalid(
            format!("name must be a STRING, not {}", name.type_name()),
            span,
        ));
    };
    if !handler.is_callable() {
        return Err(builtin.invalid(
            format!("handler must be callable, not {}", handler.type_name()),
            span,
        ));
    }
    let replaced = interp.annotations.contains(kind, name);
    debug!(kind = %kind, name, replaced, "registered annotation handler");
    interp.annotations.register(kind, name, handler);
    Ok(Value::Undefined)
}

/// Run the handler registered for `annotation` on `target`.
pub(crate) fn apply_annotation(
    interp: &mut Interpreter,
    annotation: &Annotation,
    target: Value,
    span: Span,
) -> Result<Value> {
    let Some(handler) = interp.annotations.handler(annotation.kind, &annotation.name) else {
        return Err(EvalError::UnknownAnnotation {
            name: annotation.name.clone(),
            kind: annotation.kind.label().to_string(),
            span: Some(if annotation.span.line == 0 { span } else { annotation.span }),
        });
    };
    interp.call_value(handler, vec![target], Some(span))
}

// ═══════════════════════════════════════════════════════════════════════
// List methods
// ═══════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy)]
enum ListMethod {
    Append,
    Remove,
    Get,
    Extend,
}

impl ListMethod {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "append" => Some(ListMethod::Append),
            "remove" => Some(ListMethod::Remove),
            "get" => Some(ListMethod::Get),
            "extend" => Some(ListMethod::Extend),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            ListMethod::Append => "append",
            ListMethod::Remove => "remove",
            ListMethod::Get => "get",
            ListMethod::Extend => "extend",
        }
    }
}

/// Handle `xs.append(v)` and friends when the prefix of the chain is a
/// List. Returns `None` to fall back to an ordinary call.
fn try_list_method(
    interp: &mut Interpreter,
    object: &str,
    path: &[String],
    args: &[Expr],
    span: Span,
) -> Option<Result<Value>> {
    let (method_name, prefix) = path.split_last()?;
    let method = ListMethod::from_name(method_name)?;
    match eval_attr_access(interp, object, prefix, span) {
        Ok(Value::List(_)) => {}
        _ => return None,
    }
    Some(call_list_method(interp, object, prefix, method, args, span))
}

fn call_list_method(
    interp: &mut Interpreter,
    object: &str,
    prefix: &[String],
    method: ListMethod,
    args: &[Expr],
    span: Span,
) -> Result<Value> {
    let args = eval_args(interp, args)?;
    let [arg] = <[Value; 1]>::try_from(args).map_err(|args| EvalError::ArityMismatch {
        name: method.name().to_string(),
        expected: 1,
        got: args.len(),
        span: Some(span),
    })?;

    update_path(interp, object, prefix, span, |target, _| {
        let Value::List(items) = target else {
            return Err(EvalError::InvalidArgument {
                name: method.name().to_string(),
                message: format!("expects a list receiver, found {}", target.type_name()),
                span: Some(span),
            });
        };
        match method {
            ListMethod::Append => {
                Rc::make_mut(items).push(arg.deep_copy());
                Ok(Value::Undefined)
            }
            ListMethod::Extend => match arg {
                Value::List(more) => {
                    Rc::make_mut(items).extend(more.iter().map(Value::deep_copy));
                    Ok(Value::Undefined)
                }
                other => Err(EvalError::InvalidArgument {
                    name: "extend".to_string(),
                    message: format!("expects a list, got {}", other.type_name()),
                    span: Some(span),
                }),
            },
            ListMethod::Get => {
                let index = list_position(method, &arg, items.len(), span)?;
                Ok(index.map_or(Value::Undefined, |i| items[i].clone()))
            }
            ListMethod::Remove => {
                let index = list_position(method, &arg, items.len(), span)?;
                Ok(index.map_or(Value::Undefined, |i| Rc::make_mut(items).remove(i)))
            }
        }
    })
}

/// Convert a `get`/`remove` argument to a position, `None` if out of range.
fn list_position(
    method: ListMethod,
    arg: &Value,
    len: usize,
    span: Span,
) -> Result<Option<usize>> {
    let Value::Number(n) = arg else {
        return Err(EvalError::InvalidArgument {
            name: method.name().to_string(),
            message: format!("expects a number index, got {}", arg.type_name()),
            span: Some(span),
        });
    };
    let index = n.trunc();
    if index >= 0.0 && index < len as f64 {
        Ok(Some(index as usize))
    } else {
        Ok(None)
    }
}

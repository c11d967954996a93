//! Interpreter state: globals, call stack, output sink, module loader

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{self, Write};
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

use super::item::ModuleLoader;
use super::{Evaluate, Execute};
use crate::ast::{AnnotationKind, Expr, Program, Stmt};
use crate::environment::{AnnotationRegistry, CallFrame, CallStack, Environment, PROMISE_NAMESPACE};
use crate::error::{EvalError, Result};
use crate::value::ClassValue;
use crate::{EvalContext, Value};

/// A tree-walking interpreter for Able programs.
///
/// # Example
///
/// ```
/// use able::ast::{BinaryOp, Expr, Stmt};
/// use able::{Interpreter, Value};
///
/// let mut interp = Interpreter::new();
/// interp
///     .run_ast(&[Stmt::set(
///         "x",
///         Expr::binary(BinaryOp::Mul, Expr::number(6.0), Expr::number(7.0)),
///     )])
///     .unwrap();
/// assert_eq!(interp.global_env().get("x"), Some(Value::Number(42.0)));
/// ```
pub struct Interpreter {
    pub(crate) globals: Environment,
    pub(crate) stack: CallStack,
    pub(crate) ctx: EvalContext,
    out: Box<dyn Write>,
    pub(crate) loader: Option<Box<dyn ModuleLoader>>,
    pub(crate) modules: HashMap<String, Value>,
    pub(crate) annotations: AnnotationRegistry,
    promise_namespace: Option<Rc<ClassValue>>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// Create an interpreter with default limits, writing to stdout.
    pub fn new() -> Self {
        Self::with_context(EvalContext::default())
    }

    /// Create an interpreter with the given context.
    pub fn with_context(ctx: EvalContext) -> Self {
        let globals = Environment::with_prelude();
        let promise_namespace = globals
            .get(PROMISE_NAMESPACE)
            .and_then(|v| v.as_class().cloned());
        Self {
            stack: CallStack::new(globals.clone(), ctx.max_call_depth),
            globals,
            ctx,
            out: Box::new(io::stdout()),
            loader: None,
            modules: HashMap::new(),
            annotations: AnnotationRegistry::new(),
            promise_namespace,
        }
    }

    /// Redirect `pr` output (builder pattern)
    pub fn with_output(mut self, out: Box<dyn Write>) -> Self {
        self.out = out;
        self
    }

    /// Install the loader used by `import` statements.
    pub fn set_module_loader(&mut self, loader: Box<dyn ModuleLoader>) {
        self.loader = Some(loader);
    }

    /// The evaluation context.
    pub fn context(&self) -> &EvalContext {
        &self.ctx
    }

    // ═══════════════════════════════════════════════════════════════════
    // Environments
    // ═══════════════════════════════════════════════════════════════════

    /// The global environment.
    pub fn global_env(&self) -> Environment {
        self.globals.clone()
    }

    /// The environment statements currently run in.
    pub fn current_env(&self) -> Environment {
        self.stack.current().env.clone()
    }

    /// Run subsequent statements in `env`; returns the environment replaced.
    pub fn set_env(&mut self, env: Environment) -> Environment {
        let previous = self.current_env();
        self.stack.set_current_env(env);
        previous
    }

    /// Number of active calls.
    pub fn call_depth(&self) -> usize {
        self.stack.depth()
    }

    /// Push a call frame that is popped when the guard drops.
    pub(crate) fn enter_frame(&mut self, frame: CallFrame) -> Result<FrameGuard<'_>> {
        self.stack.push(frame)?;
        Ok(FrameGuard { interp: self })
    }

    // ═══════════════════════════════════════════════════════════════════
    // Annotations
    // ═══════════════════════════════════════════════════════════════════

    /// Register a modifier handler. It is called with the new function;
    /// a result other than Undefined replaces the function.
    pub fn register_modifier(&mut self, name: impl Into<String>, handler: Value) {
        self.annotations.register(AnnotationKind::Modifier, name, handler);
    }

    /// Register a decorator handler. Its result replaces the function.
    pub fn register_decorator(&mut self, name: impl Into<String>, handler: Value) {
        self.annotations.register(AnnotationKind::Decorator, name, handler);
    }

    /// The modifier and decorator handlers registered so far.
    pub fn annotations(&self) -> &AnnotationRegistry {
        &self.annotations
    }

    // ═══════════════════════════════════════════════════════════════════
    // Entry Points
    // ═══════════════════════════════════════════════════════════════════

    /// Execute statements in the current environment.
    ///
    /// Returns the value of a top-level `return`, or Undefined.
    pub fn run_ast(&mut self, stmts: &[Stmt]) -> Result<Value> {
        stmts.exec(self)?.into_value()
    }

    /// Execute a whole program.
    pub fn run_program(&mut self, program: &Program) -> Result<Value> {
        self.run_ast(&program.statements)
    }

    /// Evaluate one expression in the current environment.
    pub fn eval_node(&mut self, expr: &Expr) -> Result<Value> {
        expr.eval(self)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Helpers for evaluators
    // ═══════════════════════════════════════════════════════════════════

    pub(crate) fn check_interrupt(&self) -> Result<()> {
        if self.ctx.is_interrupted() {
            Err(EvalError::Interrupted)
        } else {
            Ok(())
        }
    }

    pub(crate) fn is_promise_namespace(&self, class: &Rc<ClassValue>) -> bool {
        self.promise_namespace
            .as_ref()
            .is_some_and(|ns| Rc::ptr_eq(ns, class))
    }

    pub(crate) fn write_output(&mut self, text: &str) -> Result<()> {
        self.out
            .write_all(text.as_bytes())
            .and_then(|()| self.out.flush())
            .map_err(|e| EvalError::Output {
                message: e.to_string(),
            })
    }
}

/// RAII guard that pops a call frame when dropped.
pub(crate) struct FrameGuard<'a> {
    interp: &'a mut Interpreter,
}

impl Drop for FrameGuard<'_> {
    fn drop(&mut self) {
        self.interp.stack.pop();
    }
}

impl Deref for FrameGuard<'_> {
    type Target = Interpreter;

    fn deref(&self) -> &Self::Target {
        self.interp
    }
}

impl DerefMut for FrameGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.interp
    }
}

/// In-memory output sink, handy for capturing `pr` output.
///
/// Clones share the same buffer, so one clone can be handed to
/// [`Interpreter::with_output`] and another read afterwards.
#[derive(Debug, Clone, Default)]
pub struct OutputBuffer(Rc<RefCell<Vec<u8>>>);

impl OutputBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }

    /// Discard the captured output.
    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

impl Write for OutputBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

//! Class definitions and imports

use std::collections::HashMap;
use std::rc::Rc;

use tracing::debug;

use super::{Execute, Interpreter};
use crate::ast::{MethodDef, Span, Stmt};
use crate::environment::CallFrame;
use crate::error::{EvalError, Result};
use crate::value::{ClassValue, FunctionValue, ObjectMap};
use crate::Value;

// ═══════════════════════════════════════════════════════════════════════
// Classes
// ═══════════════════════════════════════════════════════════════════════

/// Run `class name(bases...): methods`.
///
/// Bases are resolved in declared order and must all be classes. Methods
/// capture the scope the class is defined in.
pub fn exec_class_def(
    interp: &mut Interpreter,
    name: &str,
    bases: &[String],
    methods: &[MethodDef],
    span: Span,
) -> Result<()> {
    let env = interp.current_env();

    let mut base_classes = Vec::with_capacity(bases.len());
    for base in bases {
        match env.get(base) {
            Some(Value::Type(class)) => base_classes.push(class),
            Some(_) => {
                return Err(EvalError::InvalidBase {
                    class: name.to_string(),
                    name: base.clone(),
                    span: Some(span),
                })
            }
            None => {
                return Err(EvalError::UnboundName {
                    name: base.clone(),
                    span: Some(span),
                })
            }
        }
    }

    let mut class = ClassValue::new(name);
    class.set_bases(base_classes);
    for method in methods {
        class.set_attr(
            method.name.as_str(),
            Value::function(FunctionValue::method(method, &env)),
        );
    }

    debug!(class = name, bases = bases.len(), methods = methods.len(), "defined class");
    env.set(name, Value::Type(Rc::new(class)));
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════
// Imports
// ═══════════════════════════════════════════════════════════════════════

/// Source of module code for `import` statements.
///
/// Module paths use `/` between segments (`import a.b` asks for `a/b`).
pub trait ModuleLoader {
    /// Return the top-level statements of `module`.
    fn load(&mut self, module: &str) -> Result<Vec<Stmt>>;
}

impl ModuleLoader for HashMap<String, Vec<Stmt>> {
    fn load(&mut self, module: &str) -> Result<Vec<Stmt>> {
        self.get(module)
            .cloned()
            .ok_or_else(|| EvalError::ModuleLoad {
                module: module.to_string(),
                message: "no such module".to_string(),
                span: None,
            })
    }
}

/// Run `import module`, binding the module object under the last path
/// segment.
pub fn exec_import(interp: &mut Interpreter, module: &str, span: Span) -> Result<()> {
    let value = load_module(interp, module, span)?;
    let name = module.rsplit('/').next().unwrap_or(module);
    interp.current_env().set(name, value);
    Ok(())
}

/// Run `from module import names...`.
pub fn exec_from_import(
    interp: &mut Interpreter,
    module: &str,
    names: &[String],
    span: Span,
) -> Result<()> {
    let value = load_module(interp, module, span)?;
    let env = interp.current_env();
    for name in names {
        let member = value.get_attr(name).ok_or_else(|| EvalError::UnboundName {
            name: format!("{module}.{name}"),
            span: Some(span),
        })?;
        env.set(name.as_str(), member);
    }
    Ok(())
}

/// Load and run a module once; later imports reuse the cached object.
fn load_module(interp: &mut Interpreter, module: &str, span: Span) -> Result<Value> {
    if let Some(cached) = interp.modules.get(module) {
        return Ok(cached.clone());
    }

    let loader = interp
        .loader
        .as_mut()
        .ok_or_else(|| EvalError::UnsupportedNode {
            kind: format!("import of '{module}' without a module loader"),
            span: Some(span),
        })?;
    let stmts = loader.load(module)?;
    debug!(module, statements = stmts.len(), "loading module");

    let env = interp.global_env().child();
    {
        let mut frame = interp.enter_frame(CallFrame::new(module, env.clone()))?;
        stmts.exec(&mut frame)?.into_value()?;
    }

    let members: ObjectMap = env.bindings().into_iter().collect();
    let value = Value::object(members);
    interp.modules.insert(module.to_string(), value.clone());
    Ok(value)
}

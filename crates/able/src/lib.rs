//! # Able
//!
//! Evaluation runtime for the Able scripting language.
//!
//! Able is a small dynamically typed language with closures, classes with
//! multiple inheritance, and cooperative `async`/`await`. This crate takes
//! a parsed syntax tree (see [`ast`]) and runs it with a tree-walking
//! interpreter. Parsing and the module loader's file lookup live outside
//! the runtime.
//!
//! ## Architecture
//!
//! - **Values**: [`Value`], copied on every store; Lists and Objects get a
//!   new identity, while classes, instances, and promises stay shared handles
//! - **Environments**: shared lexical scopes ([`Environment`]) chained to
//!   their parent, captured by closures
//! - **Evaluation**: the [`Evaluate`] and [`Execute`] traits over the tree,
//!   driven by an [`Interpreter`] that owns the call stack
//! - **Async**: an async call returns a pending promise holding its task;
//!   `await` runs the task on the spot, at most once
//! - **Annotations**: modifiers and decorators on function definitions call
//!   handlers from an [`AnnotationRegistry`]
//!
//! ## Example
//!
//! ```
//! use able::ast::{Expr, Stmt};
//! use able::{Interpreter, OutputBuffer};
//!
//! let out = OutputBuffer::new();
//! let mut interp = Interpreter::new().with_output(Box::new(out.clone()));
//! interp
//!     .run_ast(&[Stmt::expr(Expr::call(
//!         Expr::var("pr"),
//!         vec![Expr::string("hello")],
//!     ))])
//!     .unwrap();
//! assert_eq!(out.contents(), "hello\n");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ast;
pub mod context;
pub mod environment;
pub mod error;
pub mod eval;
pub mod value;

// Re-export main types
pub use ast::Span;
pub use context::{EvalContext, DEFAULT_MAX_CALL_DEPTH};
pub use environment::{AnnotationRegistry, Builtin, CallFrame, CallStack, Environment};
pub use error::{EvalError, Result};
pub use eval::{ControlFlow, Evaluate, Execute, Interpreter, ModuleLoader, OutputBuffer};
pub use value::{
    BoundMethod, ClassValue, FunctionValue, InstanceRef, InstanceValue, ObjectMap, PromiseRef,
    PromiseState, PromiseValue, Value,
};

/// Runtime version, bound to `__version__` in every global scope
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

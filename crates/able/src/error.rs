//! Error types for Able evaluation
//!
//! Every runtime failure is fatal to the running script. The library
//! reports them as `Err(EvalError)`; the `able` binary turns them into a
//! diagnostic and a non-zero exit status.

use thiserror::Error;

pub use crate::ast::Span;

/// Runtime failure raised while evaluating a script.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// Variable or attribute not found
    #[error("variable '{name}' is not defined")]
    UnboundName {
        /// The missing name
        name: String,
        /// Where it was referenced
        span: Option<Span>,
    },

    /// Attribute access or assignment on a value without attributes
    #[error("'{name}' is not an object (found {found})")]
    NotAnObject {
        /// The offending chain segment
        name: String,
        /// Type name of the value found there
        found: String,
        /// Where it was accessed
        span: Option<Span>,
    },

    /// Calling a value that is not a function, method, or class
    #[error("attempting to call non-function {found}")]
    NotCallable {
        /// Type name (or description) of the callee
        found: String,
        /// Where the call happened
        span: Option<Span>,
    },

    /// Wrong number of call arguments
    #[error("{name} expects {expected} arguments, but got {got}")]
    ArityMismatch {
        /// Callee name
        name: String,
        /// Declared arity
        expected: usize,
        /// Supplied arguments
        got: usize,
        /// Where the call happened
        span: Option<Span>,
    },

    /// Operand types incompatible with an operator
    #[error("type error in binary expression: {left} {op} {right}")]
    TypeMismatch {
        /// Operator symbol
        op: String,
        /// Left operand type
        left: String,
        /// Right operand type
        right: String,
        /// Where the operation happened
        span: Option<Span>,
    },

    /// A builtin was called with arguments it cannot accept
    #[error("{name}() {message}")]
    InvalidArgument {
        /// Builtin name
        name: String,
        /// What went wrong
        message: String,
        /// Where the call happened
        span: Option<Span>,
    },

    /// A function definition names a modifier or decorator nobody registered
    #[error("unknown {kind} '{name}'")]
    UnknownAnnotation {
        /// Handler name
        name: String,
        /// `modifier` or `decorator`
        kind: String,
        /// Where the annotation was written
        span: Option<Span>,
    },

    /// List or string index outside the valid range
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange {
        /// Requested index
        index: i64,
        /// Length of the indexed value
        len: usize,
        /// Where the index happened
        span: Option<Span>,
    },

    /// `for` over a value that is neither a list nor implements `__iter__`
    #[error("{found} is not iterable")]
    NotIterable {
        /// Type name of the value
        found: String,
        /// Where the loop starts
        span: Option<Span>,
    },

    /// A class names a base that is not a class
    #[error("base '{name}' of class '{class}' is not a class")]
    InvalidBase {
        /// Class being defined
        class: String,
        /// Offending base name
        name: String,
        /// Where the class is defined
        span: Option<Span>,
    },

    /// Awaiting a pending promise whose task was already taken
    #[error("Promise is still pending")]
    PromiseStalled {
        /// Where the await happened
        span: Option<Span>,
    },

    /// A promise fulfilled with itself
    #[error("Promise resolved with itself")]
    SelfResolution {
        /// Where the await happened
        span: Option<Span>,
    },

    /// Awaiting a rejected promise
    #[error("Promise rejected: {reason}")]
    PromiseRejected {
        /// Display form of the rejection reason
        reason: String,
        /// Where the await happened
        span: Option<Span>,
    },

    /// Call depth exceeded the configured limit
    #[error("stack overflow: call depth {depth} exceeds maximum {max}")]
    StackOverflow {
        /// Depth reached
        depth: usize,
        /// Configured maximum
        max: usize,
    },

    /// Evaluation interrupted through `EvalContext::interrupt`
    #[error("evaluation interrupted")]
    Interrupted,

    /// `break` outside any loop
    #[error("'break' outside of a loop")]
    BreakOutsideLoop {
        /// Where the break is
        span: Option<Span>,
    },

    /// `continue` outside any loop
    #[error("'continue' outside of a loop")]
    ContinueOutsideLoop {
        /// Where the continue is
        span: Option<Span>,
    },

    /// A module loader could not provide the requested module
    #[error("cannot load module '{module}': {message}")]
    ModuleLoad {
        /// Module path as written in the import
        module: String,
        /// Loader diagnostic
        message: String,
        /// Where the import is
        span: Option<Span>,
    },

    /// Writing to the interpreter's output sink failed
    #[error("output error: {message}")]
    Output {
        /// I/O error description
        message: String,
    },

    /// Node the runtime cannot evaluate in the current configuration
    #[error("unsupported node: {kind}")]
    UnsupportedNode {
        /// Description of the node
        kind: String,
        /// Where it is
        span: Option<Span>,
    },
}

impl EvalError {
    /// Source position of the failure, if known.
    pub fn span(&self) -> Option<Span> {
        match self {
            EvalError::UnboundName { span, .. }
            | EvalError::NotAnObject { span, .. }
            | EvalError::NotCallable { span, .. }
            | EvalError::ArityMismatch { span, .. }
            | EvalError::TypeMismatch { span, .. }
            | EvalError::InvalidArgument { span, .. }
            | EvalError::UnknownAnnotation { span, .. }
            | EvalError::IndexOutOfRange { span, .. }
            | EvalError::NotIterable { span, .. }
            | EvalError::InvalidBase { span, .. }
            | EvalError::PromiseStalled { span }
            | EvalError::SelfResolution { span }
            | EvalError::PromiseRejected { span, .. }
            | EvalError::BreakOutsideLoop { span }
            | EvalError::ContinueOutsideLoop { span }
            | EvalError::ModuleLoad { span, .. }
            | EvalError::UnsupportedNode { span, .. } => *span,
            EvalError::StackOverflow { .. } | EvalError::Interrupted | EvalError::Output { .. } => {
                None
            }
        }
    }

    /// Fill in a span if the error does not carry a known one yet.
    ///
    /// Used when an error raised deep inside a helper bubbles up through a
    /// node that knows its own position. Line 0 marks a node built without
    /// a position and counts as unknown.
    pub fn with_span(mut self, at: Span) -> Self {
        match &mut self {
            EvalError::UnboundName { span, .. }
            | EvalError::NotAnObject { span, .. }
            | EvalError::NotCallable { span, .. }
            | EvalError::ArityMismatch { span, .. }
            | EvalError::TypeMismatch { span, .. }
            | EvalError::InvalidArgument { span, .. }
            | EvalError::UnknownAnnotation { span, .. }
            | EvalError::IndexOutOfRange { span, .. }
            | EvalError::NotIterable { span, .. }
            | EvalError::InvalidBase { span, .. }
            | EvalError::PromiseStalled { span }
            | EvalError::SelfResolution { span }
            | EvalError::PromiseRejected { span, .. }
            | EvalError::BreakOutsideLoop { span }
            | EvalError::ContinueOutsideLoop { span }
            | EvalError::ModuleLoad { span, .. }
            | EvalError::UnsupportedNode { span, .. } => {
                if span.map_or(true, |s| s.line == 0) {
                    *span = Some(at);
                }
            }
            EvalError::StackOverflow { .. }
            | EvalError::Interrupted
            | EvalError::Output { .. } => {}
        }
        self
    }

    /// Render the diagnostic the way the command-line runner prints it.
    pub fn report(&self) -> String {
        match self.span() {
            Some(span) => format!("[ERROR in line {}:{}] {}", span.line, span.column, self),
            None => format!("[ERROR] {}", self),
        }
    }
}

/// Result type alias for Able evaluation
pub type Result<T> = std::result::Result<T, EvalError>;

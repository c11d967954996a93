//! Syntax tree consumed by the runtime
//!
//! The tree is produced by the Able parser, which lives outside this crate.
//! It arrives either as Rust values built through the constructors below or
//! as JSON deserialized with `serde`. The runtime treats it as read-only;
//! function bodies are shared through `Rc` so a `FunctionValue` can hold
//! on to the statements it runs.

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Source position of a node, used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    /// 1-based line
    pub line: u32,
    /// 1-based column
    pub column: u32,
}

impl Span {
    /// Create a span at the given position.
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A whole script: the top-level statement list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Program {
    /// Top-level statements in source order
    pub statements: Vec<Stmt>,
}

impl Program {
    /// Wrap a statement list.
    pub fn new(statements: Vec<Stmt>) -> Self {
        Self { statements }
    }

    /// Count every statement and expression node in the program.
    pub fn node_count(&self) -> usize {
        self.statements.iter().map(Stmt::node_count).sum()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Operators and literals
// ═══════════════════════════════════════════════════════════════════════

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Mod,
    /// `==` (loose)
    Eq,
    /// `===` (strict)
    StrictEq,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    Lte,
    /// `>=`
    Gte,
    /// `and`
    And,
    /// `or`
    Or,
}

impl BinaryOp {
    /// Operator as written in source.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Eq => "==",
            BinaryOp::StrictEq => "===",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Lte => "<=",
            BinaryOp::Gte => ">=",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
        }
    }
}

/// Unary operators. Negation is lowered by the parser to `0 - x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    /// `not`
    Not,
}

/// Scalar literal stored in the tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    /// `undefined`
    Undefined,
    /// `null`
    Null,
    /// `true` / `false`
    Bool(bool),
    /// Any number literal
    Number(f64),
    /// String literal with escapes already processed
    String(String),
}

// ═══════════════════════════════════════════════════════════════════════
// Expressions
// ═══════════════════════════════════════════════════════════════════════

/// An expression node with its source position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    /// What kind of expression this is
    pub kind: ExprKind,
    /// Where it starts
    #[serde(default)]
    pub span: Span,
}

/// Expression node kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprKind {
    /// Scalar literal
    Literal(Literal),
    /// Variable reference
    Var(String),
    /// Dotted chain `object.a.b`
    AttrAccess {
        /// Root variable name
        object: String,
        /// Attribute names, left to right (never empty)
        path: Vec<String>,
    },
    /// Call `callee(args...)`
    FuncCall {
        /// Callee expression
        callee: Box<Expr>,
        /// Argument expressions
        args: Vec<Expr>,
    },
    /// Binary operation; both operands are always evaluated
    Binary {
        /// Operator
        op: BinaryOp,
        /// Left operand
        left: Box<Expr>,
        /// Right operand
        right: Box<Expr>,
    },
    /// Unary operation
    Unary {
        /// Operator
        op: UnaryOp,
        /// Operand
        operand: Box<Expr>,
    },
    /// `cond ? a : b`
    Ternary {
        /// Condition
        cond: Box<Expr>,
        /// Value when truthy
        then_expr: Box<Expr>,
        /// Value when falsy
        else_expr: Box<Expr>,
    },
    /// `target++` on a `Var` or `AttrAccess`
    PostfixInc(Box<Expr>),
    /// `fun(params): body`
    Function(Rc<FunctionDef>),
    /// `[a, b, c]`
    List(Vec<Expr>),
    /// `{key: value, ...}`
    Object(Vec<(String, Expr)>),
    /// `target[index]`
    Index {
        /// Indexed value
        target: Box<Expr>,
        /// Index expression
        index: Box<Expr>,
    },
    /// `target[start:end]`
    Slice {
        /// Sliced value
        target: Box<Expr>,
        /// Optional start bound
        start: Option<Box<Expr>>,
        /// Optional end bound
        end: Option<Box<Expr>>,
    },
    /// `await expr`
    Await(Box<Expr>),
}

/// A function literal or method body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDef {
    /// Name hint (from `fun name(...)` declarations)
    #[serde(default)]
    pub name: Option<String>,
    /// Parameter names in order
    pub params: Vec<String>,
    /// Body statements
    pub body: Rc<Vec<Stmt>>,
    /// Declared with `async`
    #[serde(default)]
    pub is_async: bool,
    /// Modifiers and decorators, in source order
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

/// Which registry an annotation is looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnnotationKind {
    /// Bare keyword before `fun`; a non-Undefined result replaces the function
    Modifier,
    /// `@name` above `fun`; its result replaces the function
    Decorator,
}

impl AnnotationKind {
    /// Lowercase name used in messages.
    pub fn label(self) -> &'static str {
        match self {
            AnnotationKind::Modifier => "modifier",
            AnnotationKind::Decorator => "decorator",
        }
    }
}

impl fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A named modifier or decorator attached to a function definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// Registered handler name
    pub name: String,
    /// Modifier or decorator
    pub kind: AnnotationKind,
    /// Source position
    #[serde(default)]
    pub span: Span,
}

impl FunctionDef {
    /// Create a synchronous function definition.
    pub fn new(params: &[&str], body: Vec<Stmt>) -> Self {
        Self {
            name: None,
            params: params.iter().map(|p| p.to_string()).collect(),
            body: Rc::new(body),
            is_async: false,
            annotations: Vec::new(),
        }
    }

    /// Attach a name hint (builder pattern)
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Mark as `async` (builder pattern)
    pub fn asynchronous(mut self) -> Self {
        self.is_async = true;
        self
    }

    /// Append a modifier (builder pattern)
    pub fn modifier(self, name: impl Into<String>) -> Self {
        self.annotated(name, AnnotationKind::Modifier)
    }

    /// Append a decorator (builder pattern)
    pub fn decorator(self, name: impl Into<String>) -> Self {
        self.annotated(name, AnnotationKind::Decorator)
    }

    fn annotated(mut self, name: impl Into<String>, kind: AnnotationKind) -> Self {
        self.annotations.push(Annotation {
            name: name.into(),
            kind,
            span: Span::default(),
        });
        self
    }
}

impl Expr {
    /// Wrap a kind with a default span.
    pub fn new(kind: ExprKind) -> Self {
        Self {
            kind,
            span: Span::default(),
        }
    }

    /// Set the source position (builder pattern)
    pub fn at(mut self, line: u32, column: u32) -> Self {
        self.span = Span::new(line, column);
        self
    }

    /// Number literal
    pub fn number(n: f64) -> Self {
        Self::new(ExprKind::Literal(Literal::Number(n)))
    }

    /// String literal
    pub fn string(s: impl Into<String>) -> Self {
        Self::new(ExprKind::Literal(Literal::String(s.into())))
    }

    /// Boolean literal
    pub fn bool(b: bool) -> Self {
        Self::new(ExprKind::Literal(Literal::Bool(b)))
    }

    /// `null`
    pub fn null() -> Self {
        Self::new(ExprKind::Literal(Literal::Null))
    }

    /// `undefined`
    pub fn undefined() -> Self {
        Self::new(ExprKind::Literal(Literal::Undefined))
    }

    /// Variable reference
    pub fn var(name: impl Into<String>) -> Self {
        Self::new(ExprKind::Var(name.into()))
    }

    /// Attribute chain `object.path[0].path[1]...`
    pub fn attr(object: impl Into<String>, path: &[&str]) -> Self {
        Self::new(ExprKind::AttrAccess {
            object: object.into(),
            path: path.iter().map(|p| p.to_string()).collect(),
        })
    }

    /// Call expression
    pub fn call(callee: Expr, args: Vec<Expr>) -> Self {
        Self::new(ExprKind::FuncCall {
            callee: Box::new(callee),
            args,
        })
    }

    /// Binary expression
    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Self::new(ExprKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    /// `not operand`
    pub fn not(operand: Expr) -> Self {
        Self::new(ExprKind::Unary {
            op: UnaryOp::Not,
            operand: Box::new(operand),
        })
    }

    /// `cond ? then_expr : else_expr`
    pub fn ternary(cond: Expr, then_expr: Expr, else_expr: Expr) -> Self {
        Self::new(ExprKind::Ternary {
            cond: Box::new(cond),
            then_expr: Box::new(then_expr),
            else_expr: Box::new(else_expr),
        })
    }

    /// `target++`
    pub fn postfix_inc(target: Expr) -> Self {
        Self::new(ExprKind::PostfixInc(Box::new(target)))
    }

    /// Function literal
    pub fn function(def: FunctionDef) -> Self {
        Self::new(ExprKind::Function(Rc::new(def)))
    }

    /// List literal
    pub fn list(items: Vec<Expr>) -> Self {
        Self::new(ExprKind::List(items))
    }

    /// Object literal
    pub fn object(entries: Vec<(&str, Expr)>) -> Self {
        Self::new(ExprKind::Object(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        ))
    }

    /// `target[index]`
    pub fn index(target: Expr, index: Expr) -> Self {
        Self::new(ExprKind::Index {
            target: Box::new(target),
            index: Box::new(index),
        })
    }

    /// `target[start:end]`
    pub fn slice(target: Expr, start: Option<Expr>, end: Option<Expr>) -> Self {
        Self::new(ExprKind::Slice {
            target: Box::new(target),
            start: start.map(Box::new),
            end: end.map(Box::new),
        })
    }

    /// `await operand`
    pub fn await_on(operand: Expr) -> Self {
        Self::new(ExprKind::Await(Box::new(operand)))
    }

    /// Human-readable node kind, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            ExprKind::Literal(_) => "literal",
            ExprKind::Var(_) => "variable",
            ExprKind::AttrAccess { .. } => "attribute access",
            ExprKind::FuncCall { .. } => "function call",
            ExprKind::Binary { .. } => "binary operation",
            ExprKind::Unary { .. } => "unary operation",
            ExprKind::Ternary { .. } => "ternary",
            ExprKind::PostfixInc(_) => "postfix increment",
            ExprKind::Function(_) => "function literal",
            ExprKind::List(_) => "list literal",
            ExprKind::Object(_) => "object literal",
            ExprKind::Index { .. } => "index",
            ExprKind::Slice { .. } => "slice",
            ExprKind::Await(_) => "await",
        }
    }

    fn node_count(&self) -> usize {
        1 + match &self.kind {
            ExprKind::Literal(_) | ExprKind::Var(_) | ExprKind::AttrAccess { .. } => 0,
            ExprKind::FuncCall { callee, args } => {
                callee.node_count() + args.iter().map(Expr::node_count).sum::<usize>()
            }
            ExprKind::Binary { left, right, .. } => left.node_count() + right.node_count(),
            ExprKind::Unary { operand, .. } => operand.node_count(),
            ExprKind::Ternary {
                cond,
                then_expr,
                else_expr,
            } => cond.node_count() + then_expr.node_count() + else_expr.node_count(),
            ExprKind::PostfixInc(target) | ExprKind::Await(target) => target.node_count(),
            ExprKind::Function(def) => def.body.iter().map(Stmt::node_count).sum(),
            ExprKind::List(items) => items.iter().map(Expr::node_count).sum(),
            ExprKind::Object(entries) => entries.iter().map(|(_, e)| e.node_count()).sum(),
            ExprKind::Index { target, index } => target.node_count() + index.node_count(),
            ExprKind::Slice { target, start, end } => {
                target.node_count()
                    + start.as_ref().map_or(0, |e| e.node_count())
                    + end.as_ref().map_or(0, |e| e.node_count())
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Statements
// ═══════════════════════════════════════════════════════════════════════

/// A statement node with its source position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stmt {
    /// What kind of statement this is
    pub kind: StmtKind,
    /// Where it starts
    #[serde(default)]
    pub span: Span,
}

/// Left-hand side of a `set`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SetTarget {
    /// `set name to ...`
    Name(String),
    /// `set object.a.b to ...`
    Attr {
        /// Root variable name
        object: String,
        /// Attribute names, left to right (never empty)
        path: Vec<String>,
    },
}

/// What follows the `then` branch of an `if`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ElseBranch {
    /// `elif cond: ...`: a nested `If` statement
    Elif(Box<Stmt>),
    /// `else: ...`
    Else(Vec<Stmt>),
}

/// A method inside a class body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDef {
    /// Method name
    pub name: String,
    /// Parameters, receiver first for instance methods
    pub params: Vec<String>,
    /// Body statements
    pub body: Rc<Vec<Stmt>>,
    /// Declared with the static marker (not bound on access)
    #[serde(default)]
    pub is_static: bool,
    /// Declared with `async`
    #[serde(default)]
    pub is_async: bool,
    /// Where the method is declared
    #[serde(default)]
    pub span: Span,
}

impl MethodDef {
    /// Create an instance method.
    pub fn new(name: impl Into<String>, params: &[&str], body: Vec<Stmt>) -> Self {
        Self {
            name: name.into(),
            params: params.iter().map(|p| p.to_string()).collect(),
            body: Rc::new(body),
            is_static: false,
            is_async: false,
            span: Span::default(),
        }
    }

    /// Mark as static (builder pattern)
    pub fn static_method(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Mark as `async` (builder pattern)
    pub fn asynchronous(mut self) -> Self {
        self.is_async = true;
        self
    }
}

/// Statement node kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StmtKind {
    /// `set target to value`; assigns if bound in an enclosing scope, else declares
    Set {
        /// Where the value goes
        target: SetTarget,
        /// Right-hand side
        value: Expr,
    },
    /// Expression evaluated for its side effects (calls, `x++`, `await`)
    Expr(Expr),
    /// `if cond: ... [elif ...|else: ...]`
    If {
        /// Condition
        cond: Expr,
        /// Statements run when truthy
        then_branch: Vec<Stmt>,
        /// Optional continuation
        else_branch: Option<ElseBranch>,
    },
    /// Nested statement block
    Block(Vec<Stmt>),
    /// `return [expr]`
    Return(Option<Expr>),
    /// `for var of iterable: ...`
    For {
        /// Loop variable
        var: String,
        /// Iterated value
        iterable: Expr,
        /// Loop body
        body: Vec<Stmt>,
    },
    /// `while cond: ...`
    While {
        /// Condition
        cond: Expr,
        /// Loop body
        body: Vec<Stmt>,
    },
    /// `break`
    Break,
    /// `continue`
    Continue,
    /// `class Name(Base, ...): methods`
    ClassDef {
        /// Class name
        name: String,
        /// Base class names in declared order
        bases: Vec<String>,
        /// Methods in the body
        methods: Vec<MethodDef>,
    },
    /// `import a.b`
    Import {
        /// Module path, segments joined with `/`
        module: String,
    },
    /// `from a.b import x, y`
    FromImport {
        /// Module path, segments joined with `/`
        module: String,
        /// Names to bind
        names: Vec<String>,
    },
}

impl Stmt {
    /// Wrap a kind with a default span.
    pub fn new(kind: StmtKind) -> Self {
        Self {
            kind,
            span: Span::default(),
        }
    }

    /// Set the source position (builder pattern)
    pub fn at(mut self, line: u32, column: u32) -> Self {
        self.span = Span::new(line, column);
        self
    }

    /// `set name to value`
    pub fn set(name: impl Into<String>, value: Expr) -> Self {
        Self::new(StmtKind::Set {
            target: SetTarget::Name(name.into()),
            value,
        })
    }

    /// `set object.path to value`
    pub fn set_attr(object: impl Into<String>, path: &[&str], value: Expr) -> Self {
        Self::new(StmtKind::Set {
            target: SetTarget::Attr {
                object: object.into(),
                path: path.iter().map(|p| p.to_string()).collect(),
            },
            value,
        })
    }

    /// `fun name(params): body`, sugar for `set name to fun(params): body`
    pub fn fun(name: &str, params: &[&str], body: Vec<Stmt>) -> Self {
        Self::set(name, Expr::function(FunctionDef::new(params, body).named(name)))
    }

    /// Expression statement
    pub fn expr(expr: Expr) -> Self {
        Self::new(StmtKind::Expr(expr))
    }

    /// `if cond: then_branch`
    pub fn if_then(cond: Expr, then_branch: Vec<Stmt>) -> Self {
        Self::new(StmtKind::If {
            cond,
            then_branch,
            else_branch: None,
        })
    }

    /// `if cond: then_branch else: else_branch`
    pub fn if_else(cond: Expr, then_branch: Vec<Stmt>, else_branch: Vec<Stmt>) -> Self {
        Self::new(StmtKind::If {
            cond,
            then_branch,
            else_branch: Some(ElseBranch::Else(else_branch)),
        })
    }

    /// `if cond: then_branch elif ...` where `elif` is another `If` statement
    pub fn if_elif(cond: Expr, then_branch: Vec<Stmt>, elif: Stmt) -> Self {
        Self::new(StmtKind::If {
            cond,
            then_branch,
            else_branch: Some(ElseBranch::Elif(Box::new(elif))),
        })
    }

    /// Nested block
    pub fn block(stmts: Vec<Stmt>) -> Self {
        Self::new(StmtKind::Block(stmts))
    }

    /// `return expr`
    pub fn return_value(expr: Expr) -> Self {
        Self::new(StmtKind::Return(Some(expr)))
    }

    /// bare `return`
    pub fn return_none() -> Self {
        Self::new(StmtKind::Return(None))
    }

    /// `for var of iterable: body`
    pub fn for_each(var: impl Into<String>, iterable: Expr, body: Vec<Stmt>) -> Self {
        Self::new(StmtKind::For {
            var: var.into(),
            iterable,
            body,
        })
    }

    /// `while cond: body`
    pub fn while_loop(cond: Expr, body: Vec<Stmt>) -> Self {
        Self::new(StmtKind::While { cond, body })
    }

    /// `break`
    pub fn break_loop() -> Self {
        Self::new(StmtKind::Break)
    }

    /// `continue`
    pub fn continue_loop() -> Self {
        Self::new(StmtKind::Continue)
    }

    /// `class name(bases): methods`
    pub fn class(name: impl Into<String>, bases: &[&str], methods: Vec<MethodDef>) -> Self {
        Self::new(StmtKind::ClassDef {
            name: name.into(),
            bases: bases.iter().map(|b| b.to_string()).collect(),
            methods,
        })
    }

    /// `import module`
    pub fn import(module: impl Into<String>) -> Self {
        Self::new(StmtKind::Import {
            module: module.into(),
        })
    }

    /// `from module import names`
    pub fn from_import(module: impl Into<String>, names: &[&str]) -> Self {
        Self::new(StmtKind::FromImport {
            module: module.into(),
            names: names.iter().map(|n| n.to_string()).collect(),
        })
    }

    /// Human-readable node kind, used in diagnostics and tracing.
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            StmtKind::Set { .. } => "set",
            StmtKind::Expr(_) => "expression",
            StmtKind::If { .. } => "if",
            StmtKind::Block(_) => "block",
            StmtKind::Return(_) => "return",
            StmtKind::For { .. } => "for",
            StmtKind::While { .. } => "while",
            StmtKind::Break => "break",
            StmtKind::Continue => "continue",
            StmtKind::ClassDef { .. } => "class definition",
            StmtKind::Import { .. } => "import",
            StmtKind::FromImport { .. } => "from-import",
        }
    }

    fn node_count(&self) -> usize {
        fn block(stmts: &[Stmt]) -> usize {
            stmts.iter().map(Stmt::node_count).sum()
        }

        1 + match &self.kind {
            StmtKind::Set { value, .. } => value.node_count(),
            StmtKind::Expr(expr) => expr.node_count(),
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                cond.node_count()
                    + block(then_branch)
                    + match else_branch {
                        Some(ElseBranch::Elif(stmt)) => stmt.node_count(),
                        Some(ElseBranch::Else(stmts)) => block(stmts),
                        None => 0,
                    }
            }
            StmtKind::Block(stmts) => block(stmts),
            StmtKind::Return(expr) => expr.as_ref().map_or(0, |e| e.node_count()),
            StmtKind::For { iterable, body, .. } => iterable.node_count() + block(body),
            StmtKind::While { cond, body } => cond.node_count() + block(body),
            StmtKind::ClassDef { methods, .. } => methods.iter().map(|m| block(&m.body)).sum(),
            StmtKind::Break
            | StmtKind::Continue
            | StmtKind::Import { .. }
            | StmtKind::FromImport { .. } => 0,
        }
    }
}

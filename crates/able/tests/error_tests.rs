//! Diagnostics: error kinds, positions, and report formatting

use std::collections::HashMap;

use able::ast::{BinaryOp, Expr, Program, Stmt};
use able::*;
use pretty_assertions::assert_eq;

fn run_err(stmts: Vec<Stmt>) -> EvalError {
    let mut interp = Interpreter::new().with_output(Box::new(OutputBuffer::new()));
    interp.run_ast(&stmts).unwrap_err()
}

#[test]
fn test_unbound_name_report() {
    let err = run_err(vec![
        Stmt::set("x", Expr::number(1.0)).at(1, 1),
        Stmt::expr(Expr::call(Expr::var("pr"), vec![Expr::var("y")])).at(2, 1),
    ]);
    assert_eq!(err.report(), "[ERROR in line 2:1] variable 'y' is not defined");
}

#[test]
fn test_expression_span_wins_over_statement_span() {
    let err = run_err(vec![Stmt::expr(Expr::var("missing").at(5, 9)).at(5, 1)]);
    assert_eq!(err.span(), Some(Span::new(5, 9)));
}

#[test]
fn test_error_inside_function_keeps_inner_position() {
    let err = run_err(vec![
        Stmt::fun(
            "broken",
            &[],
            vec![Stmt::return_value(Expr::binary(
                BinaryOp::Sub,
                Expr::string("a"),
                Expr::number(1.0),
            ))
            .at(2, 5)],
        )
        .at(1, 1),
        Stmt::expr(Expr::call(Expr::var("broken"), vec![])).at(4, 1),
    ]);
    assert_eq!(
        err.report(),
        "[ERROR in line 2:5] type error in binary expression: STRING - NUMBER"
    );
}

#[test]
fn test_not_an_object() {
    let err = run_err(vec![
        Stmt::set("n", Expr::number(3.0)),
        Stmt::expr(Expr::attr("n", &["field"])),
    ]);
    assert_eq!(
        err,
        EvalError::NotAnObject {
            name: "n".to_string(),
            found: "NUMBER".to_string(),
            span: Some(Span::default()),
        }
    );
}

#[test]
fn test_arity_mismatch_message() {
    let err = run_err(vec![
        Stmt::fun("two", &["a", "b"], vec![]),
        Stmt::expr(Expr::call(Expr::var("two"), vec![Expr::number(1.0)])),
    ]);
    assert_eq!(err.to_string(), "two expects 2 arguments, but got 1");
}

#[test]
fn test_comparison_type_mismatch() {
    let err = run_err(vec![Stmt::expr(Expr::binary(
        BinaryOp::Lt,
        Expr::list(vec![]),
        Expr::number(1.0),
    ))]);
    assert!(matches!(
        err,
        EvalError::TypeMismatch { ref op, ref left, .. } if op == "<" && left == "LIST"
    ));
}

#[test]
fn test_builtin_argument_errors() {
    let err = run_err(vec![Stmt::expr(Expr::call(Expr::var("len"), vec![]))]);
    assert!(matches!(err, EvalError::InvalidArgument { ref name, .. } if name == "len"));

    let err = run_err(vec![Stmt::expr(Expr::call(
        Expr::var("len"),
        vec![Expr::number(3.0)],
    ))]);
    assert!(matches!(err, EvalError::InvalidArgument { .. }));

    let err = run_err(vec![Stmt::expr(Expr::call(
        Expr::var("list"),
        vec![Expr::number(3.0)],
    ))]);
    assert!(matches!(err, EvalError::NotIterable { .. }));
}

#[test]
fn test_index_out_of_range_message() {
    let err = run_err(vec![Stmt::expr(Expr::index(
        Expr::list(vec![Expr::number(1.0)]),
        Expr::number(4.0),
    ))]);
    assert_eq!(err.to_string(), "index 4 out of range for length 1");
}

#[test]
fn test_errors_are_fatal_to_the_rest_of_the_script() {
    let out = OutputBuffer::new();
    let mut interp = Interpreter::new().with_output(Box::new(out.clone()));
    let result = interp.run_ast(&[
        Stmt::expr(Expr::call(Expr::var("pr"), vec![Expr::string("one")])),
        Stmt::expr(Expr::var("nope")),
        Stmt::expr(Expr::call(Expr::var("pr"), vec![Expr::string("two")])),
    ]);
    assert!(result.is_err());
    assert_eq!(out.contents(), "one\n");
}

#[test]
fn test_modules_from_json() {
    let json = r#"[{"kind":{"Set":{
        "target":{"Name":"answer"},
        "value":{"kind":{"Literal":{"Number":42.0}}}
    }}}]"#;
    let module: Program = serde_json::from_str(json).unwrap();
    let mut modules = HashMap::new();
    modules.insert("lib/answers".to_string(), module.statements);

    let out = OutputBuffer::new();
    let mut interp = Interpreter::new().with_output(Box::new(out.clone()));
    interp.set_module_loader(Box::new(modules));
    interp
        .run_ast(&[
            Stmt::import("lib/answers"),
            Stmt::expr(Expr::call(
                Expr::var("pr"),
                vec![Expr::attr("answers", &["answer"])],
            )),
        ])
        .unwrap();
    assert_eq!(out.contents(), "42\n");
}

// ═══════════════════════════════════════════════════════════════════════
// Deep recursion under the default limits
// ═══════════════════════════════════════════════════════════════════════

/// `fun down(n) { if n > 0 { return down(n - 1) } return n }`, or the same
/// without a base case when `bounded` is false.
fn countdown(bounded: bool) -> Stmt {
    let recurse = Stmt::return_value(Expr::call(
        Expr::var("down"),
        vec![Expr::binary(BinaryOp::Sub, Expr::var("n"), Expr::number(1.0))],
    ));
    let body = if bounded {
        vec![
            Stmt::if_then(
                Expr::binary(BinaryOp::Gt, Expr::var("n"), Expr::number(0.0)),
                vec![recurse],
            ),
            Stmt::return_value(Expr::var("n")),
        ]
    } else {
        vec![recurse]
    };
    Stmt::fun("down", &["n"], body)
}

#[test]
fn test_unbounded_recursion_hits_the_default_limit() {
    let err = run_err(vec![
        countdown(false),
        Stmt::expr(Expr::call(Expr::var("down"), vec![Expr::number(0.0)])),
    ]);
    assert_eq!(err, EvalError::StackOverflow { depth: 1001, max: 1000 });
}

#[test]
fn test_deep_recursion_below_the_default_limit() {
    let mut interp = Interpreter::new();
    let result = interp
        .run_ast(&[
            countdown(true),
            Stmt::return_value(Expr::call(Expr::var("down"), vec![Expr::number(990.0)])),
        ])
        .unwrap();
    assert_eq!(result, Value::Number(0.0));
}

//! Tests for if/elif/else, loops, break/continue, and return

use able::ast::{BinaryOp, Expr, MethodDef, Stmt};
use able::*;
use pretty_assertions::assert_eq;

fn run(stmts: Vec<Stmt>) -> (Result<Value>, String) {
    let out = OutputBuffer::new();
    let mut interp = Interpreter::new().with_output(Box::new(out.clone()));
    let result = interp.run_ast(&stmts);
    (result, out.contents())
}

fn pr(args: Vec<Expr>) -> Stmt {
    Stmt::expr(Expr::call(Expr::var("pr"), args))
}

fn eq(left: Expr, right: Expr) -> Expr {
    Expr::binary(BinaryOp::Eq, left, right)
}

fn numbers(items: &[f64]) -> Expr {
    Expr::list(items.iter().map(|n| Expr::number(*n)).collect())
}

// ═══════════════════════════════════════════════════════════════════════
// If Statement Tests
// ═══════════════════════════════════════════════════════════════════════

fn classify(n: f64) -> Vec<Stmt> {
    vec![
        Stmt::set("n", Expr::number(n)),
        Stmt::if_elif(
            Expr::binary(BinaryOp::Lt, Expr::var("n"), Expr::number(0.0)),
            vec![pr(vec![Expr::string("negative")])],
            Stmt::if_else(
                eq(Expr::var("n"), Expr::number(0.0)),
                vec![pr(vec![Expr::string("zero")])],
                vec![pr(vec![Expr::string("positive")])],
            ),
        ),
    ]
}

#[test]
fn test_if_chain_runs_exactly_one_branch() {
    assert_eq!(run(classify(-3.0)).1, "negative\n");
    assert_eq!(run(classify(0.0)).1, "zero\n");
    assert_eq!(run(classify(8.0)).1, "positive\n");
}

#[test]
fn test_if_uses_truthiness() {
    let (_, out) = run(vec![
        Stmt::if_else(
            Expr::string(""),
            vec![pr(vec![Expr::string("yes")])],
            vec![pr(vec![Expr::string("no")])],
        ),
        Stmt::if_else(
            Expr::list(vec![]),
            vec![pr(vec![Expr::string("yes")])],
            vec![pr(vec![Expr::string("no")])],
        ),
        Stmt::if_then(Expr::null(), vec![pr(vec![Expr::string("never")])]),
    ]);
    assert_eq!(out, "no\nyes\n");
}

// ═══════════════════════════════════════════════════════════════════════
// Loop Tests
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_break_stops_after_current_iteration() {
    let (result, out) = run(vec![Stmt::for_each(
        "i",
        numbers(&[1.0, 2.0, 3.0]),
        vec![
            pr(vec![Expr::var("i")]),
            Stmt::if_then(eq(Expr::var("i"), Expr::number(2.0)), vec![Stmt::break_loop()]),
        ],
    )]);
    assert_eq!(result, Ok(Value::Undefined));
    assert_eq!(out, "1\n2\n");
}

#[test]
fn test_continue_skips_rest_of_body() {
    let (_, out) = run(vec![Stmt::for_each(
        "i",
        numbers(&[1.0, 2.0, 3.0]),
        vec![
            Stmt::if_then(eq(Expr::var("i"), Expr::number(2.0)), vec![Stmt::continue_loop()]),
            pr(vec![Expr::var("i")]),
        ],
    )]);
    assert_eq!(out, "1\n3\n");
}

#[test]
fn test_loop_variable_survives_the_loop() {
    let (_, out) = run(vec![
        Stmt::for_each("i", numbers(&[4.0, 5.0]), vec![]),
        pr(vec![Expr::var("i")]),
    ]);
    assert_eq!(out, "5\n");
}

#[test]
fn test_while_loop() {
    let (_, out) = run(vec![
        Stmt::set("i", Expr::number(0.0)),
        Stmt::while_loop(
            Expr::binary(BinaryOp::Lt, Expr::var("i"), Expr::number(3.0)),
            vec![pr(vec![Expr::postfix_inc(Expr::var("i"))])],
        ),
    ]);
    assert_eq!(out, "0\n1\n2\n");
}

#[test]
fn test_break_only_leaves_inner_loop() {
    let (_, out) = run(vec![Stmt::for_each(
        "a",
        numbers(&[1.0, 2.0]),
        vec![Stmt::for_each(
            "b",
            numbers(&[10.0, 20.0]),
            vec![
                Stmt::if_then(eq(Expr::var("b"), Expr::number(20.0)), vec![Stmt::break_loop()]),
                pr(vec![Expr::var("a"), Expr::string(":"), Expr::var("b")]),
            ],
        )],
    )]);
    assert_eq!(out, "1:10\n2:10\n");
}

#[test]
fn test_return_from_nested_loops() {
    let (_, out) = run(vec![
        Stmt::fun(
            "find",
            &["target"],
            vec![
                Stmt::for_each(
                    "a",
                    numbers(&[1.0, 2.0, 3.0]),
                    vec![Stmt::for_each(
                        "b",
                        numbers(&[1.0, 2.0, 3.0]),
                        vec![Stmt::if_then(
                            eq(
                                Expr::binary(BinaryOp::Mul, Expr::var("a"), Expr::var("b")),
                                Expr::var("target"),
                            ),
                            vec![Stmt::return_value(Expr::list(vec![
                                Expr::var("a"),
                                Expr::var("b"),
                            ]))],
                        )],
                    )],
                ),
                Stmt::return_none(),
            ],
        ),
        pr(vec![Expr::call(Expr::var("find"), vec![Expr::number(6.0)])]),
        pr(vec![Expr::call(Expr::var("find"), vec![Expr::number(7.0)])]),
    ]);
    assert_eq!(out, "[2, 3]\nundefined\n");
}

#[test]
fn test_for_over_class_iterator() {
    let range = Stmt::class(
        "Range",
        &[],
        vec![
            MethodDef::new(
                "init",
                &["self", "end"],
                vec![
                    Stmt::set_attr("self", &["end"], Expr::var("end")),
                    Stmt::set_attr("self", &["at"], Expr::number(0.0)),
                ],
            ),
            MethodDef::new("__iter__", &["self"], vec![Stmt::return_value(Expr::var("self"))]),
            MethodDef::new(
                "__next__",
                &["self"],
                vec![
                    Stmt::if_then(
                        eq(Expr::attr("self", &["at"]), Expr::attr("self", &["end"])),
                        vec![Stmt::return_none()],
                    ),
                    Stmt::return_value(Expr::postfix_inc(Expr::attr("self", &["at"]))),
                ],
            ),
        ],
    );
    let (result, out) = run(vec![
        range,
        Stmt::for_each(
            "i",
            Expr::call(Expr::var("Range"), vec![Expr::number(3.0)]),
            vec![pr(vec![Expr::var("i")])],
        ),
        pr(vec![Expr::call(
            Expr::var("list"),
            vec![Expr::call(Expr::var("Range"), vec![Expr::number(2.0)])],
        )]),
    ]);
    result.unwrap();
    assert_eq!(out, "0\n1\n2\n[0, 1]\n");
}

// ═══════════════════════════════════════════════════════════════════════
// Stray Control Flow
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_break_outside_loop_in_function() {
    let (result, _) = run(vec![
        Stmt::fun("f", &[], vec![Stmt::break_loop().at(2, 5)]),
        Stmt::expr(Expr::call(Expr::var("f"), vec![])),
    ]);
    assert_eq!(
        result,
        Err(EvalError::BreakOutsideLoop {
            span: Some(Span::new(2, 5))
        })
    );
}

#[test]
fn test_continue_outside_loop() {
    let (result, _) = run(vec![Stmt::continue_loop()]);
    assert!(matches!(result, Err(EvalError::ContinueOutsideLoop { .. })));
}

#[test]
fn test_interrupt_stops_loop() {
    let ctx = EvalContext::new();
    ctx.interrupt();
    let mut interp = Interpreter::with_context(ctx);
    let result = interp.run_ast(&[Stmt::while_loop(Expr::bool(true), vec![])]);
    assert_eq!(result, Err(EvalError::Interrupted));
}

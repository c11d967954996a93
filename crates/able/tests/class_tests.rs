//! Classes, instances, inheritance, and bound methods

use able::ast::{BinaryOp, Expr, MethodDef, Stmt};
use able::*;
use pretty_assertions::assert_eq;

fn run(stmts: Vec<Stmt>) -> (Result<Value>, String) {
    let out = OutputBuffer::new();
    let mut interp = Interpreter::new().with_output(Box::new(out.clone()));
    let result = interp.run_ast(&stmts);
    (result, out.contents())
}

fn run_ok(stmts: Vec<Stmt>) -> String {
    let (result, output) = run(stmts);
    result.unwrap();
    output
}

fn pr(args: Vec<Expr>) -> Stmt {
    Stmt::expr(Expr::call(Expr::var("pr"), args))
}

fn new(class: &str, args: Vec<Expr>) -> Expr {
    Expr::call(Expr::var(class), args)
}

fn method_call(object: &str, path: &[&str], args: Vec<Expr>) -> Expr {
    Expr::call(Expr::attr(object, path), args)
}

fn returns(name: &str, value: Expr) -> MethodDef {
    MethodDef::new(name, &["self"], vec![Stmt::return_value(value)])
}

#[test]
fn test_inherited_method() {
    let out = run_ok(vec![
        Stmt::class("Animal", &[], vec![returns("speak", Expr::string("..."))]),
        Stmt::class("Dog", &["Animal"], vec![]),
        Stmt::set("d", new("Dog", vec![])),
        pr(vec![method_call("d", &["speak"], vec![])]),
    ]);
    assert_eq!(out, "...\n");
}

#[test]
fn test_override_wins() {
    let out = run_ok(vec![
        Stmt::class("Animal", &[], vec![returns("speak", Expr::string("..."))]),
        Stmt::class("Dog", &["Animal"], vec![returns("speak", Expr::string("woof"))]),
        Stmt::set("d", new("Dog", vec![])),
        pr(vec![method_call("d", &["speak"], vec![])]),
    ]);
    assert_eq!(out, "woof\n");
}

#[test]
fn test_base_lookup_follows_declared_order() {
    let out = run_ok(vec![
        Stmt::class("C", &[], vec![returns("who", Expr::string("C"))]),
        Stmt::class(
            "D",
            &[],
            vec![
                returns("who", Expr::string("D")),
                returns("x", Expr::string("D.x")),
            ],
        ),
        Stmt::class("B", &["C", "D"], vec![]),
        Stmt::set("b", new("B", vec![])),
        pr(vec![
            method_call("b", &["x"], vec![]),
            Expr::string(" "),
            method_call("b", &["who"], vec![]),
        ]),
    ]);
    assert_eq!(out, "D.x C\n");
}

#[test]
fn test_diamond_picks_first_depth_first_match() {
    let out = run_ok(vec![
        Stmt::class("Top", &[], vec![returns("name", Expr::string("top"))]),
        Stmt::class("Left", &["Top"], vec![]),
        Stmt::class("Right", &["Top"], vec![returns("name", Expr::string("right"))]),
        Stmt::class("Bottom", &["Left", "Right"], vec![]),
        Stmt::set("b", new("Bottom", vec![])),
        pr(vec![method_call("b", &["name"], vec![])]),
    ]);
    assert_eq!(out, "top\n");
}

fn point_class() -> Stmt {
    Stmt::class(
        "Point",
        &[],
        vec![
            MethodDef::new(
                "init",
                &["self", "x", "y"],
                vec![
                    Stmt::set_attr("self", &["x"], Expr::var("x")),
                    Stmt::set_attr("self", &["y"], Expr::var("y")),
                ],
            ),
            returns(
                "sum",
                Expr::binary(
                    BinaryOp::Add,
                    Expr::attr("self", &["x"]),
                    Expr::attr("self", &["y"]),
                ),
            ),
            MethodDef::new("origin", &[], vec![Stmt::return_value(Expr::string("0,0"))])
                .static_method(),
        ],
    )
}

#[test]
fn test_init_and_bound_receiver() {
    let out = run_ok(vec![
        point_class(),
        Stmt::set("p", new("Point", vec![Expr::number(2.0), Expr::number(3.0)])),
        Stmt::set("m", Expr::attr("p", &["sum"])),
        Stmt::set_attr("p", &["x"], Expr::number(10.0)),
        pr(vec![
            Expr::call(Expr::var("m"), vec![]),
            Expr::string(" "),
            Expr::var("m"),
            Expr::string(" "),
            Expr::var("p"),
        ]),
    ]);
    assert_eq!(out, "13 <bound method sum> <Point instance>\n");
}

#[test]
fn test_static_method_is_not_bound() {
    let out = run_ok(vec![
        point_class(),
        Stmt::set("p", new("Point", vec![Expr::number(0.0), Expr::number(0.0)])),
        pr(vec![
            method_call("Point", &["origin"], vec![]),
            Expr::string(" "),
            method_call("p", &["origin"], vec![]),
        ]),
    ]);
    assert_eq!(out, "0,0 0,0\n");
}

#[test]
fn test_instances_are_shared_handles() {
    let out = run_ok(vec![
        point_class(),
        Stmt::set("p", new("Point", vec![Expr::number(1.0), Expr::number(1.0)])),
        Stmt::set("q", Expr::var("p")),
        Stmt::set_attr("q", &["x"], Expr::number(5.0)),
        pr(vec![
            Expr::attr("p", &["x"]),
            Expr::string(" "),
            Expr::binary(BinaryOp::StrictEq, Expr::var("p"), Expr::var("q")),
        ]),
    ]);
    assert_eq!(out, "5 true\n");
}

#[test]
fn test_class_value_shadowed_per_instance() {
    let out = run_ok(vec![
        Stmt::class("Box", &[], vec![]),
        Stmt::set_attr("Box", &["tags"], Expr::list(vec![])),
        Stmt::set("a", new("Box", vec![])),
        Stmt::set("b", new("Box", vec![])),
        Stmt::expr(method_call("a", &["tags", "append"], vec![Expr::string("t")])),
        pr(vec![
            Expr::attr("a", &["tags"]),
            Expr::attr("b", &["tags"]),
            Expr::attr("Box", &["tags"]),
        ]),
    ]);
    assert_eq!(out, "[t][][]\n");
}

#[test]
fn test_constructor_arity() {
    let (result, _) = run(vec![
        point_class(),
        Stmt::expr(new("Point", vec![Expr::number(1.0)])),
    ]);
    assert!(matches!(
        result,
        Err(EvalError::ArityMismatch { expected: 2, got: 1, .. })
    ));

    let (result, _) = run(vec![
        Stmt::class("Empty", &[], vec![]),
        Stmt::expr(new("Empty", vec![Expr::number(1.0)])),
    ]);
    assert!(matches!(
        result,
        Err(EvalError::ArityMismatch { expected: 0, got: 1, .. })
    ));
}

#[test]
fn test_promise_cannot_be_constructed() {
    let (result, _) = run(vec![Stmt::expr(new("Promise", vec![]))]);
    assert!(matches!(result, Err(EvalError::NotCallable { .. })));
}

#[test]
fn test_missing_method_is_not_callable() {
    let (result, _) = run(vec![
        Stmt::class("A", &[], vec![]),
        Stmt::set("a", new("A", vec![])),
        Stmt::expr(method_call("a", &["nope"], vec![])).at(3, 1),
    ]);
    let err = result.unwrap_err();
    assert_eq!(
        err,
        EvalError::NotCallable {
            found: "UNDEFINED".to_string(),
            span: Some(Span::new(3, 1)),
        }
    );
}

#[test]
fn test_class_display_and_type() {
    let out = run_ok(vec![
        Stmt::class("A", &[], vec![]),
        pr(vec![
            Expr::var("A"),
            Expr::string(" "),
            Expr::call(Expr::var("type"), vec![new("A", vec![])]),
        ]),
    ]);
    assert_eq!(out, "<class A> INSTANCE\n");
}

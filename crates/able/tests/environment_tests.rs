//! Environment scoping and call stack tests

use able::ast::{Expr, Stmt};
use able::*;
use pretty_assertions::assert_eq;

#[test]
fn test_set_then_get() {
    let env = Environment::new();
    env.set("x", Value::Number(1.0));
    assert_eq!(env.get("x"), Some(Value::Number(1.0)));
}

#[test]
fn test_child_set_is_invisible_to_siblings() {
    let root = Environment::new();
    let left = root.child();
    let right = root.child();

    left.set("only_left", Value::Bool(true));
    assert!(left.contains("only_left"));
    assert!(!right.contains("only_left"));
    assert!(!root.contains("only_left"));
}

#[test]
fn test_child_set_updates_existing_parent_binding() {
    let root = Environment::new();
    root.set("x", Value::Number(1.0));
    let child = root.child();
    child.set("x", Value::Number(2.0));
    assert_eq!(root.get("x"), Some(Value::Number(2.0)));
    assert!(!child.contains_local("x"));
}

#[test]
fn test_closure_keeps_scope_alive() {
    let mut interp = Interpreter::new();
    interp
        .run_ast(&[
            Stmt::fun(
                "outer",
                &[],
                vec![
                    Stmt::set("secret", Expr::number(7.0)),
                    Stmt::fun("peek", &[], vec![Stmt::return_value(Expr::var("secret"))]),
                    Stmt::return_value(Expr::var("peek")),
                ],
            ),
            Stmt::set("peek", Expr::call(Expr::var("outer"), vec![])),
        ])
        .unwrap();

    let peek = interp.global_env().get("peek").unwrap();
    let captured = peek.as_function().unwrap().captured_env().unwrap().clone();
    assert!(!captured.ptr_eq(&interp.global_env()));
    assert_eq!(captured.get("secret"), Some(Value::Number(7.0)));
    assert_eq!(captured.depth(), 2);

    let result = interp.call_value(peek, vec![], None).unwrap();
    assert_eq!(result, Value::Number(7.0));
}

#[test]
fn test_set_env_redirects_statements() {
    let mut interp = Interpreter::new();
    let sandbox = interp.global_env().child();
    let previous = interp.set_env(sandbox.clone());
    interp
        .run_ast(&[Stmt::set("local_only", Expr::number(1.0))])
        .unwrap();
    interp.set_env(previous);

    assert!(sandbox.contains_local("local_only"));
    assert!(!interp.global_env().contains("local_only"));
    assert!(interp.current_env().ptr_eq(&interp.global_env()));
}

#[test]
fn test_call_stack_depth_limit() {
    let globals = Environment::new();
    let mut stack = CallStack::new(globals.clone(), 2);
    stack.push(CallFrame::new("a", globals.child())).unwrap();
    stack.push(CallFrame::new("b", globals.child())).unwrap();
    let err = stack
        .push(CallFrame::new("c", globals.child()))
        .unwrap_err();
    assert_eq!(err, EvalError::StackOverflow { depth: 3, max: 2 });
    assert_eq!(stack.current().name, "b");

    assert_eq!(stack.pop().map(|frame| frame.name), Some("b".to_string()));
    stack.pop();
    assert_eq!(stack.current().name, "<module>");
    assert!(stack.pop().is_none());
    assert_eq!(stack.depth(), 0);
}

mod common;

use pretty_assertions::assert_eq;

use rox::expr::{Expr, ExprId};
use rox::lox::Outcome;
use rox::stmt::Stmt;

/// Collect (name, id) for every variable-like node, in source order.
fn collect_refs(statements: &[Stmt]) -> Vec<(String, ExprId)> {
    fn walk_expr(expr: &Expr, out: &mut Vec<(String, ExprId)>) {
        match expr {
            Expr::Assign { id, name, value } => {
                walk_expr(value, out);
                out.push((format!("{}=", name.lexeme), *id));
            }
            Expr::Binary { left, right, .. } | Expr::Logical { left, right, .. } => {
                walk_expr(left, out);
                walk_expr(right, out);
            }
            Expr::Call {
                callee, arguments, ..
            } => {
                walk_expr(callee, out);
                arguments.iter().for_each(|a| walk_expr(a, out));
            }
            Expr::Get { object, .. } => walk_expr(object, out),
            Expr::Set { object, value, .. } => {
                walk_expr(object, out);
                walk_expr(value, out);
            }
            Expr::Grouping(inner) | Expr::Unary { right: inner, .. } => walk_expr(inner, out),
            Expr::Literal(_) => {}
            Expr::Super { id, .. } => out.push(("super".to_string(), *id)),
            Expr::This { id, .. } => out.push(("this".to_string(), *id)),
            Expr::Variable { id, name } => out.push((name.lexeme.clone(), *id)),
        }
    }

    fn walk_stmt(stmt: &Stmt, out: &mut Vec<(String, ExprId)>) {
        match stmt {
            Stmt::Block(body) => body.iter().for_each(|s| walk_stmt(s, out)),
            Stmt::Class {
                superclass,
                methods,
                ..
            } => {
                if let Some(sc) = superclass {
                    walk_expr(sc, out);
                }
                for m in methods {
                    m.body.iter().for_each(|s| walk_stmt(s, out));
                }
            }
            Stmt::Expression(e) | Stmt::Print { value: e, .. } => walk_expr(e, out),
            Stmt::Function(decl) => decl.body.iter().for_each(|s| walk_stmt(s, out)),
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                walk_expr(condition, out);
                walk_stmt(then_branch, out);
                if let Some(e) = else_branch {
                    walk_stmt(e, out);
                }
            }
            Stmt::Return { value, .. } => {
                if let Some(v) = value {
                    walk_expr(v, out);
                }
            }
            Stmt::Var { initializer, .. } => {
                if let Some(i) = initializer {
                    walk_expr(i, out);
                }
            }
            Stmt::While { condition, body } => {
                walk_expr(condition, out);
                walk_stmt(body, out);
            }
        }
    }

    let mut out = Vec::new();
    statements.iter().for_each(|s| walk_stmt(s, &mut out));
    out
}

fn depths(source: &str) -> Vec<(String, Option<usize>)> {
    let (statements, interpreter, diagnostics) = common::resolve(source);
    assert!(!diagnostics.had_error(), "{:?}", diagnostics.errors());

    collect_refs(&statements)
        .into_iter()
        .map(|(name, id)| (name, interpreter.binding_depth(id)))
        .collect()
}

fn resolve_errors(source: &str) -> Vec<String> {
    let result = common::run(source);
    assert_eq!(result.outcome, Outcome::StaticError);
    assert_eq!(result.output, "", "nothing may run after a static error");
    result.errors
}

#[test]
fn globals_get_no_entry() {
    assert_eq!(depths("var a = 1; print a;"), vec![("a".to_string(), None)]);
}

#[test]
fn block_locals_count_scopes_outward() {
    assert_eq!(
        depths("{ var a = 1; { var b = 2; print a; print b; } }"),
        vec![("a".to_string(), Some(1)), ("b".to_string(), Some(0))]
    );
}

#[test]
fn closures_resolve_through_function_scope() {
    let source = "
        fun makeCounter() {
            var count = 0;
            fun inc() { count = count + 1; return count; }
            return inc;
        }";

    assert_eq!(
        depths(source),
        vec![
            ("count".to_string(), Some(1)),
            ("count=".to_string(), Some(1)),
            ("count".to_string(), Some(1)),
            ("inc".to_string(), Some(0)),
        ]
    );
}

#[test]
fn this_and_super_sit_in_their_own_scopes() {
    let source = "
        class A { m() {} }
        class B < A { m() { super.m(); return this; } }";

    assert_eq!(
        depths(source),
        vec![
            ("A".to_string(), None),
            ("super".to_string(), Some(2)),
            ("this".to_string(), Some(1)),
        ]
    );
}

#[test]
fn own_initializer_even_when_shadowing() {
    assert_eq!(
        resolve_errors("var a = \"outer\"; { var a = a; }"),
        vec!["[line 1] Error at 'a': Can't read local variable in its own initializer."]
    );
}

#[test]
fn redeclaration_in_local_scope() {
    assert_eq!(
        resolve_errors("{ var a = 1; var a = 2; }"),
        vec!["[line 1] Error at 'a': Already a variable with this name in this scope."]
    );
}

#[test]
fn redeclared_local_still_checks_its_initializer() {
    assert_eq!(
        resolve_errors("{ var a = 1; var a = a; }"),
        vec![
            "[line 1] Error at 'a': Already a variable with this name in this scope.",
            "[line 1] Error at 'a': Can't read local variable in its own initializer.",
        ]
    );
}

#[test]
fn global_redeclaration_is_fine() {
    let result = common::run("var a = 1; var a = 2; print a;");
    assert_eq!(result.outcome, Outcome::Ok);
    assert_eq!(result.output, "2\n");
}

#[test]
fn return_rules() {
    assert_eq!(
        resolve_errors("return 1;"),
        vec!["[line 1] Error at 'return': Can't return from top-level code."]
    );
    assert_eq!(
        resolve_errors("class A { init() { return 1; } }"),
        vec!["[line 1] Error at 'return': Can't return a value from an initializer."]
    );

    let result = common::run("class A { init() { return; } } print A();");
    assert_eq!(result.outcome, Outcome::Ok);
    assert_eq!(result.output, "A instance\n");
}

#[test]
fn this_and_super_outside_classes() {
    assert_eq!(
        resolve_errors("print this;"),
        vec!["[line 1] Error at 'this': Can't use 'this' outside of a class."]
    );
    assert_eq!(
        resolve_errors("fun f() { super.g(); }"),
        vec!["[line 1] Error at 'super': Can't use 'super' outside of a class."]
    );
    assert_eq!(
        resolve_errors("class A { m() { super.m(); } }"),
        vec!["[line 1] Error at 'super': Can't use 'super' in a class with no superclass."]
    );
}

#[test]
fn class_cannot_inherit_from_itself() {
    assert_eq!(
        resolve_errors("class A < A {}"),
        vec!["[line 1] Error at 'A': A class can't inherit from itself."]
    );
}

#[test]
fn errors_are_collected_in_one_pass() {
    let errors = resolve_errors("return;\n{ var x = 1; var x = 2; }\nprint this;");

    assert_eq!(
        errors,
        vec![
            "[line 1] Error at 'return': Can't return from top-level code.",
            "[line 2] Error at 'x': Already a variable with this name in this scope.",
            "[line 3] Error at 'this': Can't use 'this' outside of a class.",
        ]
    );
}

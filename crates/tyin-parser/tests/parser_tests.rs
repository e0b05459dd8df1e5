//! Parser integration tests over the public API.

use tyin_parser::ast::*;
use tyin_parser::parse;

fn parse_ok(source: &str) -> Program {
    let result = parse(source);
    assert!(
        result.diagnostics.is_empty(),
        "unexpected diagnostics for {source:?}: {:?}",
        result.diagnostics
    );
    result.program
}

fn first_stmt(program: &Program) -> &Stmt {
    program.body.first().expect("expected at least one statement")
}

#[test]
fn test_var_declaration() {
    let program = parse_ok("let x = 1;");
    let Stmt::VarDecl(decl) = first_stmt(&program) else {
        panic!("expected var decl");
    };
    assert_eq!(decl.kind, DeclKind::Let);
    assert_eq!(decl.declarators.len(), 1);
    let Pat::Ident(ident) = &decl.declarators[0].pat else {
        panic!("expected identifier pattern");
    };
    assert_eq!(ident.name, "x");
    assert!(matches!(
        decl.declarators[0].init,
        Some(Expr::Number(NumberLit { value, .. })) if value == 1.0
    ));
}

#[test]
fn test_const_without_semicolon() {
    let program = parse_ok("const x = \"hi\"\nconst y = 2");
    assert_eq!(program.body.len(), 2);
}

#[test]
fn test_function_declaration() {
    let program = parse_ok("function add(a, b) { return a + b; }");
    let Stmt::FunctionDecl(function) = first_stmt(&program) else {
        panic!("expected function decl");
    };
    assert_eq!(function.name.as_ref().map(|n| n.name.as_str()), Some("add"));
    assert_eq!(function.params.len(), 2);
    assert!(!function.is_async);
    assert!(!function.is_arrow);
}

#[test]
fn test_arrow_functions() {
    let program = parse_ok("const f = x => x + 1; const g = (a, b) => { return a; };");
    assert_eq!(program.body.len(), 2);
    let Stmt::VarDecl(decl) = first_stmt(&program) else {
        panic!("expected var decl");
    };
    let Some(Expr::Arrow(arrow)) = &decl.declarators[0].init else {
        panic!("expected arrow function");
    };
    assert!(arrow.is_arrow);
    assert_eq!(arrow.params.len(), 1);
    assert!(matches!(arrow.body, FunctionBody::Expr(_)));
}

#[test]
fn test_async_arrow() {
    let program = parse_ok("const f = async (x) => x;");
    let Stmt::VarDecl(decl) = first_stmt(&program) else {
        panic!("expected var decl");
    };
    let Some(Expr::Arrow(arrow)) = &decl.declarators[0].init else {
        panic!("expected arrow function");
    };
    assert!(arrow.is_async);
}

#[test]
fn test_operator_precedence() {
    let program = parse_ok("x = 1 + 2 * 3;");
    let Stmt::Expr(stmt) = first_stmt(&program) else {
        panic!("expected expression statement");
    };
    let Expr::Assign(assign) = &stmt.expr else {
        panic!("expected assignment");
    };
    let Expr::Binary(add) = &assign.value else {
        panic!("expected binary add");
    };
    assert_eq!(add.op, BinaryOp::Add);
    let Expr::Binary(mul) = &add.right else {
        panic!("expected binary mul on the right");
    };
    assert_eq!(mul.op, BinaryOp::Mul);
}

#[test]
fn test_exponent_right_associative() {
    let program = parse_ok("x = 2 ** 3 ** 2;");
    let Stmt::Expr(stmt) = first_stmt(&program) else {
        panic!("expected expression statement");
    };
    let Expr::Assign(assign) = &stmt.expr else {
        panic!("expected assignment");
    };
    let Expr::Binary(outer) = &assign.value else {
        panic!("expected binary");
    };
    assert_eq!(outer.op, BinaryOp::Exp);
    assert!(matches!(&outer.right, Expr::Binary(inner) if inner.op == BinaryOp::Exp));
}

#[test]
fn test_logical_operators() {
    let program = parse_ok("x = a ?? b || c && d;");
    let Stmt::Expr(stmt) = first_stmt(&program) else {
        panic!("expected expression statement");
    };
    let Expr::Assign(assign) = &stmt.expr else {
        panic!("expected assignment");
    };
    let Expr::Logical(nullish) = &assign.value else {
        panic!("expected logical");
    };
    assert_eq!(nullish.op, LogicalOp::Nullish);
}

#[test]
fn test_for_in_and_for_of() {
    let program = parse_ok("for (const k in obj) {} for (const v of list) {}");
    assert!(matches!(program.body[0], Stmt::ForIn(_)));
    assert!(matches!(program.body[1], Stmt::ForOf(_)));
}

#[test]
fn test_for_head_in_is_not_an_operator() {
    let program = parse_ok("for (k in obj) {} for (x = 0; x in obj; x++) {}");
    assert!(matches!(program.body[0], Stmt::ForIn(_)));
    // Inside the test clause `in` is an ordinary binary operator again
    let Stmt::For(for_stmt) = &program.body[1] else {
        panic!("expected plain for");
    };
    assert!(matches!(
        for_stmt.test,
        Some(Expr::Binary(ref b)) if b.op == BinaryOp::In
    ));
}

#[test]
fn test_switch_with_fallthrough() {
    let program = parse_ok(
        "switch (x) { case 1: case 2: y = 1; break; default: y = 2; }",
    );
    let Stmt::Switch(switch_stmt) = first_stmt(&program) else {
        panic!("expected switch");
    };
    assert_eq!(switch_stmt.cases.len(), 3);
    assert!(switch_stmt.cases[0].body.is_empty());
    assert!(switch_stmt.cases[2].test.is_none());
}

#[test]
fn test_try_catch_finally() {
    let program = parse_ok("try { f(); } catch (e) { g(e); } finally { h(); }");
    let Stmt::Try(try_stmt) = first_stmt(&program) else {
        panic!("expected try");
    };
    assert!(try_stmt.handler.is_some());
    assert!(try_stmt.finalizer.is_some());
}

#[test]
fn test_labeled_break_continue() {
    let program = parse_ok("outer: while (a) { while (b) { break outer; continue outer; } }");
    assert!(matches!(first_stmt(&program), Stmt::Labeled(_)));
}

#[test]
fn test_duplicate_label_is_reported() {
    let result = parse("dup: while (a) { dup: while (b) { break dup; } }");
    assert!(
        result
            .diagnostics
            .iter()
            .any(|d| d.message_text == "Duplicate label 'dup'")
    );
    // Sibling labels with the same name are fine
    let ok = parse("one: while (a) {} one: while (b) {}");
    assert!(ok.diagnostics.is_empty(), "{:?}", ok.diagnostics);
}

#[test]
fn test_class_declaration() {
    let program = parse_ok(
        "class Point extends Base {
            constructor(x, y) { this.x = x; this.y = y; }
            norm() { return this.x; }
            get x2() { return this.x; }
            static origin() { return new Point(0, 0); }
            count = 0;
        }",
    );
    let Stmt::ClassDecl(class) = first_stmt(&program) else {
        panic!("expected class decl");
    };
    assert_eq!(class.name.as_ref().map(|n| n.name.as_str()), Some("Point"));
    assert!(class.super_class.is_some());
    assert_eq!(class.members.len(), 5);
    let ClassMember::Method(ctor) = &class.members[0] else {
        panic!("expected constructor first");
    };
    assert_eq!(ctor.kind, ClassMethodKind::Constructor);
    let ClassMember::Method(getter) = &class.members[2] else {
        panic!("expected getter");
    };
    assert_eq!(getter.kind, ClassMethodKind::Get);
    let ClassMember::Field(field) = &class.members[4] else {
        panic!("expected field");
    };
    assert!(!field.is_static);
}

#[test]
fn test_object_literal_forms() {
    let program = parse_ok("x = { a: 1, b, c() { return 2; }, \"d\": 3, [k]: 4, ...rest };");
    let Stmt::Expr(stmt) = first_stmt(&program) else {
        panic!("expected expression statement");
    };
    let Expr::Assign(assign) = &stmt.expr else {
        panic!("expected assignment");
    };
    let Expr::Object(object) = &assign.value else {
        panic!("expected object literal");
    };
    assert_eq!(object.properties.len(), 6);
    assert!(matches!(object.properties[1], ObjectProperty::Shorthand(_)));
    assert!(matches!(object.properties[5], ObjectProperty::Spread(_)));
}

#[test]
fn test_destructuring_declarations() {
    let program = parse_ok("const { a, b: { c } = {}, ...rest } = obj; const [x, , y = 1] = arr;");
    assert_eq!(program.body.len(), 2);
    let Stmt::VarDecl(decl) = &program.body[1] else {
        panic!("expected var decl");
    };
    let Pat::Array(array) = &decl.declarators[0].pat else {
        panic!("expected array pattern");
    };
    assert_eq!(array.elements.len(), 3);
    assert!(array.elements[1].is_none());
    assert!(matches!(array.elements[2], Some(Pat::Assign(_))));
}

#[test]
fn test_destructuring_assignment() {
    let program = parse_ok("[a, b] = pair;");
    let Stmt::Expr(stmt) = first_stmt(&program) else {
        panic!("expected expression statement");
    };
    let Expr::Assign(assign) = &stmt.expr else {
        panic!("expected assignment");
    };
    assert!(matches!(assign.target, AssignTarget::Pattern(_)));
}

#[test]
fn test_member_chains_and_optional() {
    let program = parse_ok("x = a.b?.c[0]?.(1).d;");
    assert_eq!(program.body.len(), 1);
}

#[test]
fn test_new_expression() {
    let program = parse_ok("const p = new Point(1, 2); const q = new Box;");
    let Stmt::VarDecl(decl) = first_stmt(&program) else {
        panic!("expected var decl");
    };
    let Some(Expr::New(new_expr)) = &decl.declarators[0].init else {
        panic!("expected new expression");
    };
    assert_eq!(new_expr.arguments.len(), 2);
}

#[test]
fn test_error_recovery_keeps_later_statements() {
    let result = parse("let x = ;\nlet y = 2;");
    assert!(!result.diagnostics.is_empty());
    assert!(
        result
            .program
            .body
            .iter()
            .any(|stmt| matches!(stmt, Stmt::VarDecl(d) if matches!(
                d.declarators.first().map(|dd| &dd.pat),
                Some(Pat::Ident(ident)) if ident.name == "y"
            )))
    );
}

#[test]
fn test_node_ids_are_unique() {
    let program = parse_ok("function f(a) { return a; } f(1);");
    let mut seen = std::collections::HashSet::new();
    // Spot-check a few: program, both statements
    assert!(seen.insert(program.id));
    for stmt in &program.body {
        match stmt {
            Stmt::FunctionDecl(function) => assert!(seen.insert(function.id)),
            Stmt::Expr(stmt) => assert!(seen.insert(stmt.id)),
            _ => {}
        }
    }
}

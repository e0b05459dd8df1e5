//! End-to-end inference scenarios over the public API.

use tyin_infer::{AnnotationKind, InferOptions, InferenceResult, infer};
use tyin_parser::parse;

fn run(source: &str) -> InferenceResult {
    let parsed = parse(source);
    assert!(
        parsed.diagnostics.is_empty(),
        "parse diagnostics: {:?}",
        parsed.diagnostics
    );
    infer(&parsed.program, source, "test.js", &InferOptions::default())
}

fn annotation_type<'r>(
    result: &'r InferenceResult,
    kind: AnnotationKind,
    name: &str,
) -> &'r str {
    result
        .annotations
        .iter()
        .find(|a| a.kind == kind && a.name.as_deref() == Some(name))
        .map(|a| a.type_string.as_str())
        .unwrap_or_else(|| panic!("no {kind:?} annotation for '{name}' in {:#?}", result.annotations))
}

#[test]
fn test_literal_widening_across_assignments() {
    let result = run("let x = 1; x = \"a\";");
    assert_eq!(
        annotation_type(&result, AnnotationKind::Variable, "x"),
        "number | string"
    );
    assert!(result.errors.is_empty());
}

#[test]
fn test_typeof_narrowing_with_call_sites() {
    let result = run(
        "function f(x) { if (typeof x === \"string\") { return x.length; } return 0; }\n\
         f(1);\n\
         f(\"hi\");",
    );
    assert_eq!(
        annotation_type(&result, AnnotationKind::Function, "f"),
        "(x: number | string) => number"
    );
    assert_eq!(
        annotation_type(&result, AnnotationKind::Parameter, "x"),
        "number | string"
    );
    assert!(result.errors.is_empty());
}

#[test]
fn test_record_width_join() {
    let result = run(
        "function g(b) { return b ? {a: 1, b: 2} : {a: 3, c: 4}; }\n\
         const r = g(true);",
    );
    assert_eq!(
        annotation_type(&result, AnnotationKind::Const, "r"),
        "{ a: number }"
    );
    assert_eq!(
        annotation_type(&result, AnnotationKind::Function, "g"),
        "(b: boolean) => { a: number }"
    );
}

#[test]
fn test_linked_list_walk_converges() {
    let result = run(
        "let list = { value: 1, next: { value: 2, next: null } };\n\
         let current = list;\n\
         while (current) { current = current.next; }",
    );
    assert!(
        result
            .warnings
            .iter()
            .all(|w| !w.message.contains("did not converge")),
        "solver diverged: {:?}",
        result.warnings
    );
    assert!(result.cfg_stats.iterations <= 100);
    assert!(result.cfg_stats.back_edges >= 1);
    // The loop variable got an annotation despite the cyclic flow
    assert!(
        result
            .annotations
            .iter()
            .any(|a| a.name.as_deref() == Some("current"))
    );
}

#[test]
fn test_const_violation() {
    let result = run("const x = 1; x = 2;");
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].message, "Cannot assign to constant 'x'");
    // The annotation survives with the original literal type
    assert_eq!(annotation_type(&result, AnnotationKind::Const, "x"), "1");
}

#[test]
fn test_call_site_aggregation() {
    let result = run("function id(x) { return x; } id(1); id(\"a\");");
    assert_eq!(
        annotation_type(&result, AnnotationKind::Function, "id"),
        "(x: number | string) => number | string"
    );
}

#[test]
fn test_uncalled_parameter_degrades_to_any() {
    let result = run("function lonely(x) { return x; }");
    assert_eq!(annotation_type(&result, AnnotationKind::Parameter, "x"), "any");
    assert!(result.errors.is_empty());
}

#[test]
fn test_clean_program_has_no_errors() {
    let result = run(
        "const limit = 10;\n\
         let total = 0;\n\
         for (let i = 0; i < limit; i = i + 1) { total = total + i; }\n\
         function double(n) { return n * 2; }\n\
         double(total);",
    );
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    assert_eq!(
        annotation_type(&result, AnnotationKind::Function, "double"),
        "(n: number) => number"
    );
}

#[test]
fn test_unbound_identifier_reports_error() {
    let result = run("let x = mystery;");
    assert!(
        result
            .errors
            .iter()
            .any(|e| e.message == "Cannot find name 'mystery'")
    );
    assert_eq!(annotation_type(&result, AnnotationKind::Variable, "x"), "any");
}

#[test]
fn test_unreachable_code_is_a_warning_not_error() {
    let result = run("function f() { return 1; let dead = 2; } f();");
    assert!(result.errors.is_empty());
    assert!(
        result
            .warnings
            .iter()
            .any(|w| w.message == "Unreachable code")
    );
}

#[test]
fn test_loose_null_narrowing() {
    let result = run(
        "function pick(v) { if (v == null) { return 0; } return v.length; }\n\
         pick(\"abc\");\n\
         pick(null);",
    );
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    assert_eq!(
        annotation_type(&result, AnnotationKind::Function, "pick"),
        "(v: null | string) => number"
    );
}

#[test]
fn test_class_inference() {
    let result = run(
        "class Point {\n\
           constructor(x, y) { this.x = x; this.y = y; }\n\
           norm() { return this.x * this.x + this.y * this.y; }\n\
         }\n\
         const p = new Point(3, 4);\n\
         const n = p.norm();",
    );
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    assert_eq!(
        annotation_type(&result, AnnotationKind::Class, "Point"),
        "class Point"
    );
    assert_eq!(annotation_type(&result, AnnotationKind::Const, "n"), "number");
}

#[test]
fn test_async_function_returns_promise() {
    let result = run("async function fetchIt() { return 42; } fetchIt();");
    assert_eq!(
        annotation_type(&result, AnnotationKind::Function, "fetchIt"),
        "async () => Promise<number>"
    );
}

#[test]
fn test_await_unwraps_promise() {
    let result = run(
        "async function inner() { return 1; }\n\
         async function outer() { const v = await inner(); return v; }\n\
         outer();",
    );
    assert_eq!(annotation_type(&result, AnnotationKind::Const, "v"), "number");
}

#[test]
fn test_tuple_and_array_literals() {
    let result = run("const pair = [1, \"two\"]; let nums = [1, 2, 3];");
    assert_eq!(
        annotation_type(&result, AnnotationKind::Const, "pair"),
        "[1, \"two\"]"
    );
    // Mutable bindings widen the tuple refinement's literals
    assert_eq!(
        annotation_type(&result, AnnotationKind::Variable, "nums"),
        "[number, number, number]"
    );
}

#[test]
fn test_destructuring_declaration() {
    let result = run(
        "const point = { x: 1, y: \"up\" };\n\
         const { x, y } = point;",
    );
    assert_eq!(annotation_type(&result, AnnotationKind::Const, "x"), "1");
    assert_eq!(annotation_type(&result, AnnotationKind::Const, "y"), "\"up\"");
}

#[test]
fn test_for_of_element_binding() {
    let result = run("let xs = [1, 2]; for (const v of xs) { v; }");
    assert_eq!(annotation_type(&result, AnnotationKind::Element, "v"), "number");
}

#[test]
fn test_determinism() {
    let source = "function f(a, b) { if (a) { return b; } return \"x\"; }\n\
                  f(true, 1); f(false, \"s\");\n\
                  let z = f(true, 2);";
    let first = run(source);
    let second = run(source);
    let render = |result: &InferenceResult| {
        result
            .annotations
            .iter()
            .map(|a| format!("{}:{}:{}:{:?}:{}", a.line, a.column, a.start, a.kind, a.type_string))
            .collect::<Vec<_>>()
    };
    assert_eq!(render(&first), render(&second));
}

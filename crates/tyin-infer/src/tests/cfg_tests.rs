//! CFG construction tests: shapes, back-edges, dominators, predicates.

use crate::cfg::{CfgBuilder, EdgeKind};
use crate::narrow::Predicate;
use crate::types::TypeInterner;
use tyin_parser::parse;

fn build(source: &str) -> (TypeInterner, tyin_parser::ast::Program) {
    let result = parse(source);
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    (TypeInterner::new(), result.program)
}

#[test]
fn test_straight_line_has_no_back_edges() {
    let (interner, program) = build("let x = 1; let y = 2;");
    let cfg = CfgBuilder::new(&interner).build(&program.body);
    assert_eq!(cfg.back_edge_count(), 0);
    // Entry flows to exit
    assert!(cfg.edges.iter().any(|e| e.target == cfg.exit));
}

#[test]
fn test_if_produces_true_false_edges() {
    let (interner, program) = build("if (x) { y = 1; } else { y = 2; }");
    let cfg = CfgBuilder::new(&interner).build(&program.body);
    let true_edges = cfg.edges.iter().filter(|e| e.kind == EdgeKind::True).count();
    let false_edges = cfg.edges.iter().filter(|e| e.kind == EdgeKind::False).count();
    assert_eq!(true_edges, 1);
    assert_eq!(false_edges, 1);
}

#[test]
fn test_while_creates_back_edge() {
    let (interner, program) = build("while (x) { x = f(x); }");
    let cfg = CfgBuilder::new(&interner).build(&program.body);
    assert_eq!(cfg.back_edge_count(), 1);
}

#[test]
fn test_do_while_creates_back_edge() {
    let (interner, program) = build("do { x = 1; } while (x);");
    let cfg = CfgBuilder::new(&interner).build(&program.body);
    assert_eq!(cfg.back_edge_count(), 1);
}

#[test]
fn test_nested_loops_create_two_back_edges() {
    let (interner, program) = build("while (a) { while (b) { c = 1; } }");
    let cfg = CfgBuilder::new(&interner).build(&program.body);
    assert_eq!(cfg.back_edge_count(), 2);
}

#[test]
fn test_typeof_condition_attaches_predicates() {
    let (interner, program) = build("if (typeof x === \"string\") { y = x; }");
    let cfg = CfgBuilder::new(&interner).build(&program.body);
    let true_edge = cfg
        .edges
        .iter()
        .find(|e| e.kind == EdgeKind::True)
        .expect("true edge");
    assert!(matches!(
        true_edge.predicates.as_slice(),
        [Predicate::TypeofIs { .. }]
    ));
    let false_edge = cfg
        .edges
        .iter()
        .find(|e| e.kind == EdgeKind::False)
        .expect("false edge");
    assert!(matches!(
        false_edge.predicates.as_slice(),
        [Predicate::TypeofNot { .. }]
    ));
}

#[test]
fn test_conjunction_proves_both_on_true_edge() {
    let (interner, program) = build("if (a && b) { c = 1; }");
    let cfg = CfgBuilder::new(&interner).build(&program.body);
    let true_edge = cfg
        .edges
        .iter()
        .find(|e| e.kind == EdgeKind::True)
        .expect("true edge");
    assert_eq!(true_edge.predicates.len(), 2);
    // A failed conjunction proves nothing
    let false_edge = cfg
        .edges
        .iter()
        .find(|e| e.kind == EdgeKind::False)
        .expect("false edge");
    assert!(false_edge.predicates.is_empty());
}

#[test]
fn test_switch_produces_case_and_default_edges() {
    let (interner, program) = build(
        "switch (x) { case 1: a = 1; break; case 2: a = 2; break; default: a = 3; }",
    );
    let cfg = CfgBuilder::new(&interner).build(&program.body);
    let case_edges = cfg.edges.iter().filter(|e| e.kind == EdgeKind::Case).count();
    let default_edges = cfg
        .edges
        .iter()
        .filter(|e| e.kind == EdgeKind::Default)
        .count();
    assert_eq!(case_edges, 2);
    assert_eq!(default_edges, 1);
}

#[test]
fn test_throw_inside_try_targets_catch() {
    let (interner, program) = build("try { throw e; } catch (err) { a = 1; }");
    let cfg = CfgBuilder::new(&interner).build(&program.body);
    assert!(cfg.edges.iter().any(|e| e.kind == EdgeKind::Exception && e.target != cfg.exit));
}

#[test]
fn test_throw_without_handler_targets_exit() {
    let (interner, program) = build("throw e;");
    let cfg = CfgBuilder::new(&interner).build(&program.body);
    assert!(
        cfg.edges
            .iter()
            .any(|e| e.kind == EdgeKind::Exception && e.target == cfg.exit)
    );
}

#[test]
fn test_finally_complete_edges() {
    let (interner, program) = build("try { a = 1; } finally { b = 2; }");
    let cfg = CfgBuilder::new(&interner).build(&program.body);
    assert!(cfg.edges.iter().any(|e| e.kind == EdgeKind::FinallyComplete));
}

#[test]
fn test_entry_dominates_everything_reachable() {
    let (interner, program) = build("if (x) { a = 1; } b = 2;");
    let cfg = CfgBuilder::new(&interner).build(&program.body);
    for (index, dominators) in cfg.dominators.iter().enumerate() {
        // Reachable blocks are dominated by entry
        if !cfg.predecessors[index].is_empty() || index == cfg.entry.index() {
            assert!(
                dominators.contains(cfg.entry.index()),
                "block {index} not dominated by entry"
            );
        }
    }
}

#[test]
fn test_loop_header_dominates_body() {
    let (interner, program) = build("while (x) { y = 1; }");
    let cfg = CfgBuilder::new(&interner).build(&program.body);
    let &back_edge_index = cfg.back_edges.iter().next().expect("one back edge");
    let header = cfg.edges[back_edge_index].target;
    let latch = cfg.edges[back_edge_index].source;
    assert!(cfg.dominators[latch.index()].contains(header.index()));
}

#[test]
fn test_code_after_return_is_predecessor_less() {
    let (interner, program) = build("return 1; let x = 2;");
    let cfg = CfgBuilder::new(&interner).build(&program.body);
    let dead = cfg
        .blocks
        .iter()
        .find(|b| !b.items.is_empty() && cfg.predecessors[b.id.index()].is_empty() && b.id != cfg.entry);
    assert!(dead.is_some(), "expected an unreachable block");
}

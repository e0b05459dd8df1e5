//! CFG-based, flow-sensitive type inference for untyped source.
//!
//! The engine takes a parsed program and invents type annotations for
//! every binding, parameter, function, and class:
//!
//! - `types` - the structural type lattice (interned, literal-refined)
//! - `lattice` / `subtype` - join, meet, subtyping
//! - `narrow` - refinement along conditional edges
//! - `cfg` - basic blocks, typed edges, back-edges, dominators
//! - `env` / `state` - scopes, bindings, per-block type states
//! - `solver` - worklist fixed point with widening and call-site
//!   aggregation
//!
//! The single entry point is [`infer`]. The engine is a pure function
//! of its inputs: errors are collected, never thrown, and two runs on
//! byte-identical input produce byte-identical annotation sequences.

pub mod annotate;
pub mod cfg;
pub mod env;
pub mod expr;
pub mod lattice;
pub mod narrow;
pub mod solver;
pub mod state;
pub mod subtype;
pub mod transfer;
pub mod types;

pub use annotate::{
    AnnotationKind, CfgStats, InferOptions, InferenceError, InferenceResult, TypeAnnotation,
};
pub use lattice::{join, meet};
pub use narrow::Predicate;
pub use solver::widen_type;
pub use state::TypeState;
pub use subtype::SubtypeChecker;
pub use types::{type_to_string, TypeData, TypeId, TypeInterner};

use tracing::debug;
use tyin_common::LineMap;
use tyin_parser::Program;

/// Infer types for a whole program.
///
/// `source` is used for line/column resolution and `filename` only for
/// trace output; the analysis itself is a pure function of the AST.
pub fn infer(
    program: &Program,
    source: &str,
    filename: &str,
    options: &InferOptions,
) -> InferenceResult {
    debug!(filename, "starting inference");

    // A fresh interner per call resets the type variable counter,
    // which keeps runs deterministic
    let interner = TypeInterner::new();
    let mut global = solver::GlobalSolver::new(&interner, options);
    global.run(program);

    let line_map = LineMap::build(source);

    let mut annotations: Vec<TypeAnnotation> = global
        .annotations
        .iter()
        .map(|raw| {
            let position = line_map.position(raw.span.start, source);
            TypeAnnotation {
                start: raw.span.start,
                end: raw.span.end,
                line: position.line,
                column: position.column,
                node_kind: raw.node_kind,
                name: raw.name.clone(),
                type_id: raw.ty,
                type_string: type_to_string(&interner, raw.ty),
                kind: raw.kind,
            }
        })
        .collect();
    annotations.sort_by(|a, b| {
        (a.line, a.column, a.start)
            .cmp(&(b.line, b.column, b.start))
    });

    let to_reported = |items: &[(String, tyin_common::Span)]| {
        let mut reported: Vec<InferenceError> = items
            .iter()
            .map(|(message, span)| {
                let position = if span.is_dummy() {
                    tyin_common::Position::new(0, 0)
                } else {
                    line_map.position(span.start, source)
                };
                InferenceError {
                    message: message.clone(),
                    line: position.line,
                    column: position.column,
                    node_kind: None,
                }
            })
            .collect();
        reported.sort_by(|a, b| (a.line, a.column).cmp(&(b.line, b.column)));
        reported
    };
    let errors = to_reported(&global.errors);
    let warnings = to_reported(&global.warnings);

    let mut cfg_stats = CfgStats::default();
    for stats in global.stats.values() {
        cfg_stats.blocks += stats.blocks;
        cfg_stats.edges += stats.edges;
        cfg_stats.back_edges += stats.back_edges;
        cfg_stats.iterations = cfg_stats.iterations.max(stats.iterations);
    }

    debug!(
        annotations = annotations.len(),
        errors = errors.len(),
        blocks = cfg_stats.blocks,
        "inference finished"
    );

    InferenceResult {
        annotations,
        errors,
        warnings,
        cfg_stats,
    }
}

#[cfg(test)]
mod tests;

//! Annotation and error values handed to downstream formatters.

use crate::types::TypeId;
use serde::Serialize;
use tyin_common::Span;

/// What kind of source position an annotation describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationKind {
    Variable,
    Const,
    Parameter,
    Function,
    Return,
    Property,
    Element,
    Expression,
    Class,
    Method,
    Field,
}

/// A `(location, type, kind)` record for one source position.
#[derive(Clone, Debug, Serialize)]
pub struct TypeAnnotation {
    pub start: u32,
    pub end: u32,
    /// 0-indexed line of `start`.
    pub line: u32,
    /// 0-indexed column of `start`.
    pub column: u32,
    pub node_kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub type_id: TypeId,
    pub type_string: String,
    pub kind: AnnotationKind,
}

#[derive(Clone, Debug, Serialize)]
pub struct InferenceError {
    pub message: String,
    pub line: u32,
    pub column: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_kind: Option<&'static str>,
}

/// Counters describing the analyzed control flow graphs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CfgStats {
    pub blocks: usize,
    pub edges: usize,
    pub back_edges: usize,
    /// Worklist iterations of the longest-running function analysis.
    pub iterations: u32,
}

/// Tuning knobs for one `infer` call.
#[derive(Clone, Debug)]
pub struct InferOptions {
    /// Per-function worklist iteration cap.
    pub max_iterations: u32,
    /// Array literals longer than this lose their tuple refinement.
    pub tuple_cap: usize,
    /// Loop variables spanning this many primitive kinds widen to `any`.
    pub widen_kind_limit: usize,
}

impl Default for InferOptions {
    fn default() -> Self {
        InferOptions {
            max_iterations: tyin_common::limits::MAX_ITERATIONS,
            tuple_cap: tyin_common::limits::TUPLE_CAP,
            widen_kind_limit: tyin_common::limits::WIDEN_KIND_LIMIT,
        }
    }
}

/// Everything one `infer` call produces.
#[derive(Debug, Serialize)]
pub struct InferenceResult {
    pub annotations: Vec<TypeAnnotation>,
    pub errors: Vec<InferenceError>,
    pub warnings: Vec<InferenceError>,
    pub cfg_stats: CfgStats,
}

/// An annotation before line/column resolution.
#[derive(Clone, Debug)]
pub(crate) struct RawAnnotation {
    pub span: Span,
    pub node_kind: &'static str,
    pub name: Option<String>,
    pub ty: TypeId,
    pub kind: AnnotationKind,
}

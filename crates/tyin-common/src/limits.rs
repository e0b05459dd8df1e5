//! Centralized limits and thresholds.

/// Per-function worklist iteration cap. On reaching the cap the solver
/// marks the result as not converged and emits a warning instead of
/// looping forever.
pub const MAX_ITERATIONS: u32 = 100;

/// Array literals with at most this many elements keep their tuple
/// refinement; longer literals degrade to an array of the element join.
pub const TUPLE_CAP: usize = 32;

/// A variable whose widened type has grown across this many primitive
/// kinds in a loop snaps to `any`.
pub const WIDEN_KIND_LIMIT: usize = 3;

/// Unions are capped at this many members; beyond it the union collapses
/// to the unrefined primitives of its members.
pub const MAX_UNION_MEMBERS: usize = 64;

/// Outer call-site aggregation rounds are capped independently of the
/// per-function worklist.
pub const MAX_GLOBAL_ROUNDS: u32 = 20;

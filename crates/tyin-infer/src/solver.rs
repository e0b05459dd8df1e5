//! The iterative solver.
//!
//! Per function: hoist declarations, then run a worklist fixed-point
//! over the CFG, narrowing along conditional edges and widening on
//! back-edges. All per-function analyses sit under an outer fixed
//! point driven by call-site aggregation: when a function's merged
//! parameter types change, every function is re-analyzed the next
//! round. The outer loop terminates because parameter types ascend
//! monotonically and widening caps them.

use crate::annotate::{AnnotationKind, CfgStats, InferOptions, RawAnnotation};
use crate::cfg::{BasicBlock, BlockItem, Cfg, CfgBuilder, Terminator};
use crate::env::{BindingKind, Environment};
use crate::lattice::join;
use crate::narrow::narrow_type;
use crate::state::TypeState;
use crate::types::{
    FunctionShape, ParamInfo, Polarity, PropertyInfo, TypeData, TypeId, TypeInterner,
};
use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;
use tracing::debug;
use tyin_common::limits::MAX_GLOBAL_ROUNDS;
use tyin_common::{Atom, Span};
use tyin_parser::ast::*;

/// Whether a body run is converging types or emitting annotations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Mode {
    Analyze,
    Extract,
}

/// What `this` means inside the body being analyzed.
#[derive(Clone, Copy, Debug)]
pub(crate) enum ThisCtx {
    /// A plain function: `this.f = e` assignments accumulate into a
    /// record used by `new` on this function.
    Free,
    /// A class method; `this` is the instance of the class declared at
    /// the given node.
    Instance(u32),
}

/// Mutable context threaded through one body analysis.
pub(crate) struct BodyCtx {
    pub env: Environment,
    /// Types visible from enclosing scopes.
    pub closure: TypeState,
    /// Binding kinds of enclosing scopes, for const checks.
    pub closure_kinds: FxHashMap<Atom, BindingKind>,
    /// Join of all return-site types seen so far.
    pub returns: TypeId,
    /// `this.f` assignment types, in first-assignment order.
    pub this_props: IndexMap<Atom, TypeId>,
    /// Names resolved through the closure.
    pub captures: Vec<Atom>,
    /// Join of every type each binding takes over the whole body; this
    /// is what declaration annotations report.
    pub binding_types: FxHashMap<Atom, TypeId>,
    pub this_ctx: ThisCtx,
    pub mode: Mode,
}

impl BodyCtx {
    pub(crate) fn record_capture(&mut self, name: Atom) {
        if !self.captures.contains(&name) {
            self.captures.push(name);
        }
    }

    pub(crate) fn record_binding_type(&mut self, interner: &TypeInterner, name: Atom, ty: TypeId) -> TypeId {
        let accumulated = match self.binding_types.get(&name) {
            Some(existing) => join(interner, *existing, ty),
            None => ty,
        };
        self.binding_types.insert(name, accumulated);
        accumulated
    }
}

/// Aggregated call-site information for one function identity.
#[derive(Clone, Debug, Default)]
pub(crate) struct FunctionCallInfo {
    pub call_sites: usize,
    /// Pointwise join of argument types over all observed calls;
    /// positions missing at some call site include `undefined`.
    pub merged: Vec<TypeId>,
}

pub(crate) struct FunctionEntry<'a> {
    pub node: &'a Function,
    pub closure: TypeState,
    pub closure_kinds: FxHashMap<Atom, BindingKind>,
    pub this_ctx: ThisCtx,
    /// Join of return-site types from the latest analysis (promise
    /// wrapped for async functions).
    pub return_type: TypeId,
    pub this_props: Vec<PropertyInfo>,
    pub type_id: TypeId,
    /// One fresh negative variable per parameter, allocated once.
    pub param_vars: Vec<TypeId>,
    pub name: Option<String>,
}

pub(crate) struct GlobalSolver<'a> {
    pub interner: &'a TypeInterner,
    pub options: &'a InferOptions,
    pub functions: IndexMap<u32, FunctionEntry<'a>>,
    pub calls: FxHashMap<u32, FunctionCallInfo>,
    /// Class name -> class type, for `instanceof` narrowing.
    pub classes: FxHashMap<Atom, TypeId>,
    /// Class declaration node -> latest instance type.
    pub class_instances: FxHashMap<u32, TypeId>,
    pub errors: Vec<(String, Span)>,
    pub warnings: Vec<(String, Span)>,
    pub annotations: Vec<RawAnnotation>,
    /// Set when the outer fixed point must run another round.
    pub dirty: bool,
    pub rec_counter: u32,
    /// Per-body CFG statistics, keyed by declaration node.
    pub stats: FxHashMap<u32, CfgStats>,
}

impl<'a> GlobalSolver<'a> {
    pub fn new(interner: &'a TypeInterner, options: &'a InferOptions) -> Self {
        GlobalSolver {
            interner,
            options,
            functions: IndexMap::new(),
            calls: FxHashMap::default(),
            classes: FxHashMap::default(),
            class_instances: FxHashMap::default(),
            errors: Vec::new(),
            warnings: Vec::new(),
            annotations: Vec::new(),
            dirty: false,
            rec_counter: 0,
            stats: FxHashMap::default(),
        }
    }

    /// Run the outer fixed point over the whole program, then the
    /// extraction pass that emits annotations and diagnostics.
    pub fn run(&mut self, program: &'a Program) {
        let mut round = 0u32;
        loop {
            self.dirty = false;
            self.analyze_top_level(program, Mode::Analyze);
            self.analyze_all_functions(Mode::Analyze);
            round += 1;
            if !self.dirty || round >= MAX_GLOBAL_ROUNDS {
                break;
            }
            debug!(round, "call-site aggregation changed, re-analyzing");
        }
        // Extraction re-runs every body once with annotation emission on
        self.analyze_top_level(program, Mode::Extract);
        self.analyze_all_functions(Mode::Extract);
    }

    fn analyze_top_level(&mut self, program: &'a Program, mode: Mode) {
        let mut entry_state = TypeState::new();
        crate::env::install_builtins(self.interner, &mut entry_state);

        let mut ctx = BodyCtx {
            env: Environment::global(),
            closure: TypeState::new(),
            closure_kinds: FxHashMap::default(),
            returns: TypeId::NEVER,
            this_props: IndexMap::new(),
            captures: Vec::new(),
            binding_types: FxHashMap::default(),
            this_ctx: ThisCtx::Free,
            mode: Mode::Analyze,
        };
        self.run_body(program.id.0, &program.body, &mut ctx, entry_state, mode);
    }

    fn analyze_all_functions(&mut self, mode: Mode) {
        let mut index = 0;
        // New functions discovered mid-round are picked up by the
        // growing key list
        loop {
            let Some((&key, _)) = self.functions.get_index(index) else {
                break;
            };
            index += 1;
            self.analyze_function(key, mode);
        }
    }

    pub(crate) fn analyze_function(&mut self, key: u32, mode: Mode) {
        let (node, closure, closure_kinds, this_ctx, param_vars, old_type) = {
            let entry = &self.functions[&key];
            (
                entry.node,
                entry.closure.clone(),
                entry.closure_kinds.clone(),
                entry.this_ctx,
                entry.param_vars.clone(),
                entry.type_id,
            )
        };

        let mut ctx = BodyCtx {
            env: Environment::global(),
            closure,
            closure_kinds,
            returns: TypeId::NEVER,
            this_props: IndexMap::new(),
            captures: Vec::new(),
            binding_types: FxHashMap::default(),
            this_ctx,
            mode: Mode::Analyze,
        };

        // Bind parameters
        let mut state = TypeState::new();
        for (index, param) in node.params.iter().enumerate() {
            let ty = self.parameter_type(key, index, param, &param_vars);
            self.bind_pattern(
                &param.pat,
                ty,
                BindingKind::Parameter,
                &mut state,
                &mut ctx,
            );
        }

        match &node.body {
            FunctionBody::Expr(expr) => {
                let value = self.infer_expr(expr, &mut state, &mut ctx);
                ctx.returns = join(self.interner, ctx.returns, value);
                if mode == Mode::Extract {
                    ctx.mode = Mode::Extract;
                    let mut replay = TypeState::new();
                    for (index, param) in node.params.iter().enumerate() {
                        let ty = self.extracted_parameter_type(key, index, param);
                        self.bind_pattern(
                            &param.pat,
                            ty,
                            BindingKind::Parameter,
                            &mut replay,
                            &mut ctx,
                        );
                    }
                    self.infer_expr(expr, &mut replay, &mut ctx);
                    ctx.mode = Mode::Analyze;
                }
                self.stats.insert(
                    key,
                    CfgStats {
                        blocks: 1,
                        edges: 0,
                        back_edges: 0,
                        iterations: 1,
                    },
                );
            }
            FunctionBody::Block(block) => {
                self.run_body(key, &block.body, &mut ctx, state, mode);
            }
        }

        // A body that can complete normally returns undefined; literal
        // refinements generalize at the function boundary
        let mut return_type = widen_type(self.interner, ctx.returns);
        if return_type == TypeId::NEVER {
            return_type = TypeId::UNDEFINED;
        }
        if node.is_async {
            return_type = self.interner.promise(return_type);
        }

        let this_props: Vec<PropertyInfo> = ctx
            .this_props
            .iter()
            .map(|(name, ty)| PropertyInfo::new(*name, *ty))
            .collect();

        let captures = ctx.captures.clone();
        {
            let entry = self.functions.get_mut(&key).expect("entry exists");
            entry.return_type = return_type;
            entry.this_props = this_props;
        }
        let new_type = self.build_function_type(key, Some(captures));
        self.functions.get_mut(&key).expect("entry exists").type_id = new_type;
        if new_type != old_type {
            self.dirty = true;
        }
    }

    // =========================================================================
    // Function registry
    // =========================================================================

    /// Register (or refresh) a function encountered during analysis.
    /// Returns its current type.
    pub(crate) fn register_function(
        &mut self,
        node: &'a Function,
        state: &TypeState,
        ctx: &BodyCtx,
        this_ctx: ThisCtx,
    ) -> TypeId {
        let key = node.id.0;
        if !self.functions.contains_key(&key) {
            let param_vars = node
                .params
                .iter()
                .enumerate()
                .map(|(index, param)| {
                    let hint = primary_pattern_name(&param.pat)
                        .unwrap_or_else(|| format!("arg{index}"));
                    self.interner.fresh_var(Polarity::Negative, &hint)
                })
                .collect();
            let name = node.name.as_ref().map(|n| n.name.clone());
            self.functions.insert(
                key,
                FunctionEntry {
                    node,
                    closure: TypeState::new(),
                    closure_kinds: FxHashMap::default(),
                    this_ctx,
                    return_type: TypeId::NEVER,
                    this_props: Vec::new(),
                    type_id: TypeId::NEVER,
                    param_vars,
                    name,
                },
            );
            self.dirty = true;
            let initial = self.build_function_type(key, None);
            self.functions.get_mut(&key).expect("just inserted").type_id = initial;
        }

        // Refresh the closure snapshot: the body sees the enclosing
        // state as of this point, plus whatever that scope closed over
        let mut closure = ctx.closure.clone();
        for (name, ty) in state.iter() {
            closure.set(name, ty);
        }
        let mut closure_kinds = ctx.closure_kinds.clone();
        for (name, kind) in ctx.env.flatten_kinds() {
            closure_kinds.insert(name, kind);
        }
        let entry = self.functions.get_mut(&key).expect("entry exists");
        entry.closure = closure;
        entry.closure_kinds = closure_kinds;
        entry.type_id
    }

    /// Assemble the function type from the registry's current view.
    pub(crate) fn build_function_type(&self, key: u32, captures: Option<Vec<Atom>>) -> TypeId {
        let entry = &self.functions[&key];
        let params: Vec<ParamInfo> = entry
            .node
            .params
            .iter()
            .enumerate()
            .map(|(index, param)| {
                let name_str = primary_pattern_name(&param.pat)
                    .unwrap_or_else(|| format!("arg{index}"));
                ParamInfo {
                    name: self.interner.intern_string(&name_str),
                    ty: self.extracted_parameter_type(key, index, param),
                    optional: matches!(param.pat, Pat::Assign(_)),
                    rest: matches!(param.pat, Pat::Rest(_)),
                }
            })
            .collect();
        self.interner.function(FunctionShape {
            decl: key,
            params,
            return_type: self.interner.eliminate_vars(entry.return_type),
            is_async: entry.node.is_async,
            is_generator: entry.node.is_generator,
            captures: captures.unwrap_or_else(|| {
                match self.interner.lookup(entry.type_id) {
                    Some(TypeData::Function(shape)) => shape.captures.clone(),
                    _ => Vec::new(),
                }
            }),
        })
    }

    /// The type a parameter is bound to while analyzing the body:
    /// merged call-site type when calls were observed, the parameter's
    /// type variable otherwise.
    pub(crate) fn parameter_type(
        &self,
        key: u32,
        index: usize,
        param: &Param,
        param_vars: &[TypeId],
    ) -> TypeId {
        let info = self.calls.get(&key);
        if let Some(info) = info
            && info.call_sites > 0
        {
            if matches!(param.pat, Pat::Rest(_)) {
                let tail = info.merged.get(index..).unwrap_or_default();
                let element = tail
                    .iter()
                    .fold(TypeId::NEVER, |acc, t| join(self.interner, acc, *t));
                return self.interner.array(element);
            }
            return info.merged.get(index).copied().unwrap_or(TypeId::UNDEFINED);
        }
        let var = param_vars
            .get(index)
            .copied()
            .unwrap_or(TypeId::ANY);
        if matches!(param.pat, Pat::Rest(_)) {
            self.interner.array(var)
        } else {
            var
        }
    }

    /// The parameter type that escapes into annotations and function
    /// shapes: merged call-site types, or `any` with an
    /// `uncalled-parameter` reason when no call was seen.
    pub(crate) fn extracted_parameter_type(&self, key: u32, index: usize, param: &Param) -> TypeId {
        let info = self.calls.get(&key);
        if let Some(info) = info
            && info.call_sites > 0
        {
            let base = if matches!(param.pat, Pat::Rest(_)) {
                let tail = info.merged.get(index..).unwrap_or_default();
                let element = tail
                    .iter()
                    .fold(TypeId::NEVER, |acc, t| join(self.interner, acc, *t));
                self.interner.array(element)
            } else {
                info.merged.get(index).copied().unwrap_or(TypeId::UNDEFINED)
            };
            return self.interner.eliminate_vars(base);
        }
        self.interner.any_with_reason("uncalled-parameter")
    }

    /// Record an observed call. Argument literals generalize to their
    /// primitives before merging; re-running dependent analyses is the
    /// outer fixed point's job.
    pub(crate) fn record_call(&mut self, decl: u32, args: &[TypeId]) {
        let args: Vec<TypeId> = args.iter().map(|a| widen_type(self.interner, *a)).collect();
        let info = self.calls.entry(decl).or_default();
        let first_site = info.call_sites == 0;
        let before = info.merged.clone();
        let width = info.merged.len().max(args.len());
        for index in 0..width {
            let arg = args.get(index).copied().unwrap_or(TypeId::UNDEFINED);
            match info.merged.get(index).copied() {
                Some(existing) => {
                    let merged = join(self.interner, existing, arg);
                    info.merged[index] = merged;
                }
                None => {
                    // A position earlier sites never passed: those
                    // sites contributed undefined
                    let merged = if info.call_sites > 0 {
                        join(self.interner, TypeId::UNDEFINED, arg)
                    } else {
                        arg
                    };
                    info.merged.push(merged);
                }
            }
        }
        info.call_sites += 1;
        if first_site || info.merged != before {
            self.dirty = true;
        }

        // Observed arguments are lower bounds on the parameter
        // variables of the callee
        if let Some(entry) = self.functions.get(&decl) {
            let param_vars = entry.param_vars.clone();
            for (index, var_ty) in param_vars.iter().enumerate() {
                if let Some(TypeData::Var(var)) = self.interner.lookup(*var_ty)
                    && let Some(arg) = args.get(index)
                {
                    let interner = self.interner;
                    interner.raise_lower_bound(var, *arg, |a, b| join(interner, a, b));
                }
            }
        }
    }

    // =========================================================================
    // Worklist
    // =========================================================================

    pub(crate) fn run_body(
        &mut self,
        key: u32,
        body: &'a [Stmt],
        ctx: &mut BodyCtx,
        mut entry_state: TypeState,
        mode: Mode,
    ) {
        self.hoist(body, &mut entry_state, ctx);

        let cfg = CfgBuilder::new(self.interner).build(body);
        let loop_assigned = compute_loop_assigned(self.interner, &cfg);

        let block_count = cfg.block_count();
        let mut block_states: Vec<Option<TypeState>> = vec![None; block_count];
        block_states[cfg.entry.index()] = Some(entry_state);

        let mut queue: VecDeque<usize> = VecDeque::new();
        let mut queued = vec![false; block_count];
        queue.push_back(cfg.entry.index());
        queued[cfg.entry.index()] = true;

        let mut iterations = 0u32;
        let mut converged = true;
        let mut rec_counter = self.rec_counter;

        while let Some(block_index) = queue.pop_front() {
            queued[block_index] = false;
            if iterations >= self.options.max_iterations {
                converged = false;
                break;
            }
            iterations += 1;

            let Some(block_entry) = block_states[block_index].clone() else {
                continue;
            };
            let mut state = block_entry;
            self.transfer_block(&cfg.blocks[block_index], &mut state, ctx);

            // Normal completion into the exit block returns undefined
            for &edge_index in &cfg.successors[block_index] {
                let edge = &cfg.edges[edge_index];
                if edge.target == cfg.exit
                    && !matches!(
                        cfg.blocks[block_index].terminator,
                        Terminator::Return(_) | Terminator::Throw(_)
                    )
                {
                    ctx.returns = join(self.interner, ctx.returns, TypeId::UNDEFINED);
                }

                let mut edge_state = state.clone();
                for predicate in &edge.predicates {
                    let name = predicate.target();
                    let current = edge_state
                        .get(name)
                        .or_else(|| ctx.closure.get(name));
                    if let Some(current_ty) = current {
                        let narrowed = narrow_type(self.interner, current_ty, predicate, &|atom| {
                            self.classes.get(&atom).and_then(|class_ty| {
                                match self.interner.lookup(*class_ty) {
                                    Some(TypeData::Class(shape)) => Some(shape.instance),
                                    _ => None,
                                }
                            })
                        });
                        edge_state.set(name, narrowed);
                    }
                }

                let is_back = cfg.back_edges.contains(&edge_index);
                let target_index = edge.target.index();
                let changed = match &mut block_states[target_index] {
                    slot @ None => {
                        *slot = Some(edge_state);
                        true
                    }
                    Some(existing) => {
                        let interner = self.interner;
                        let limit = self.options.widen_kind_limit;
                        let assigned = loop_assigned.get(&edge_index);
                        existing.join_from(interner, &edge_state, |name, old, new| {
                            if is_back && assigned.is_some_and(|set| set.contains(&name)) {
                                Some(widen_join(interner, old, new, limit, &mut rec_counter))
                            } else {
                                None
                            }
                        })
                    }
                };
                if changed && !queued[target_index] {
                    queue.push_back(target_index);
                    queued[target_index] = true;
                }
            }
        }
        self.rec_counter = rec_counter;

        self.stats.insert(
            key,
            CfgStats {
                blocks: cfg.block_count(),
                edges: cfg.edge_count(),
                back_edges: cfg.back_edge_count(),
                iterations,
            },
        );

        if mode == Mode::Extract {
            if !converged {
                self.warnings.push((
                    format!(
                        "Analysis did not converge within {} iterations",
                        self.options.max_iterations
                    ),
                    body.first().map_or(Span::dummy(), Stmt::span),
                ));
            }
            for (block_index, block) in cfg.blocks.iter().enumerate() {
                if block_states[block_index].is_none() && !block.items.is_empty() {
                    if let Some(span) = first_item_span(block) {
                        self.warnings.push(("Unreachable code".to_string(), span));
                    }
                }
            }
            // Replay every reachable block once with emission on
            ctx.mode = Mode::Extract;
            for (block_index, block) in cfg.blocks.iter().enumerate() {
                let mut state = block_states[block_index].clone().unwrap_or_default();
                self.transfer_block(block, &mut state, ctx);
            }
            ctx.mode = Mode::Analyze;
        }
    }

    pub(crate) fn error(&mut self, message: impl Into<String>, span: Span) {
        self.errors.push((message.into(), span));
    }

    pub(crate) fn annotate(
        &mut self,
        span: Span,
        node_kind: &'static str,
        name: Option<String>,
        ty: TypeId,
        kind: AnnotationKind,
    ) {
        let ty = self.interner.eliminate_vars(ty);
        self.annotations.push(RawAnnotation {
            span,
            node_kind,
            name,
            ty,
            kind,
        });
    }
}

fn first_item_span(block: &BasicBlock<'_>) -> Option<Span> {
    block.items.iter().find_map(|item| match item {
        BlockItem::Stmt(stmt) => Some(stmt.span()),
        BlockItem::Decl(decl) => Some(decl.span),
        BlockItem::Expr(expr) => Some(expr.span()),
        BlockItem::ForBind { source, .. } => Some(source.span()),
        BlockItem::CatchBind(pat) => Some(pat.span()),
    })
}

/// The first identifier bound by a pattern, used for parameter display
/// names and variable hints.
pub(crate) fn primary_pattern_name(pat: &Pat) -> Option<String> {
    match pat {
        Pat::Ident(ident) => Some(ident.name.clone()),
        Pat::Assign(assign) => primary_pattern_name(&assign.pat),
        Pat::Rest(rest) => primary_pattern_name(&rest.pat),
        Pat::Object(_) | Pat::Array(_) => None,
    }
}

// =============================================================================
// Widening
// =============================================================================

/// Generalize literal refinements to their primitives, recursively.
pub fn widen_type(interner: &TypeInterner, ty: TypeId) -> TypeId {
    match interner.lookup(ty) {
        Some(TypeData::Literal(lit)) => lit.primitive(),
        Some(TypeData::Union(members)) => {
            let widened = members.iter().map(|m| widen_type(interner, *m)).collect();
            interner.union(widened)
        }
        Some(TypeData::Array(element)) => interner.array(widen_type(interner, element)),
        Some(TypeData::Tuple(elements)) => {
            let widened = elements.iter().map(|e| widen_type(interner, *e)).collect();
            interner.tuple(widened)
        }
        Some(TypeData::Object(shape)) => {
            let props = shape
                .props
                .iter()
                .map(|p| p.with_type(widen_type(interner, p.ty)))
                .collect();
            interner.object_shape(crate::types::ObjectShape { props, ..*shape })
        }
        Some(TypeData::Promise(resolved)) => interner.promise(widen_type(interner, resolved)),
        _ => ty,
    }
}

/// The widening operator used on back-edges for loop-modified
/// variables: join, then snap literals to primitives, then cap runaway
/// unions at `any`. Detects self-referential growth and emits a
/// recursive type for it.
pub(crate) fn widen_join(
    interner: &TypeInterner,
    old: TypeId,
    new: TypeId,
    kind_limit: usize,
    rec_counter: &mut u32,
) -> TypeId {
    let joined = join(interner, old, new);
    if joined == old {
        return old;
    }

    if let Some(recursive) = detect_recursion(interner, old, joined, rec_counter) {
        return recursive;
    }

    let widened = widen_type(interner, joined);
    let kinds = primitive_kind_count(interner, widened);
    if kinds >= kind_limit {
        return interner.any_with_reason("widened");
    }
    widened
}

fn primitive_kind_count(interner: &TypeInterner, ty: TypeId) -> usize {
    let members = match interner.lookup(ty) {
        Some(TypeData::Union(members)) => members,
        _ => vec![ty],
    };
    let mut kinds = FxHashSet::default();
    for member in members {
        if let Some(data) = interner.lookup(member)
            && let Some(kind) = data.primitive_kind()
        {
            kinds.insert(kind);
        }
    }
    kinds.len()
}

/// If `joined` is a record with a field whose type contains the loop
/// variable's previous type, rebuild it as `mu. record` with the
/// self-reference folded in.
fn detect_recursion(
    interner: &TypeInterner,
    old: TypeId,
    joined: TypeId,
    rec_counter: &mut u32,
) -> Option<TypeId> {
    let TypeData::Object(shape) = interner.lookup(joined)? else {
        return None;
    };
    let self_referential = shape.props.iter().any(|p| contains_type(interner, p.ty, old, 0));
    if !self_referential {
        return None;
    }
    let binder = *rec_counter;
    *rec_counter += 1;
    let rec_ref = interner.intern(TypeData::RecRef(binder));
    let props = shape
        .props
        .iter()
        .map(|p| p.with_type(replace_type(interner, p.ty, old, rec_ref, 0)))
        .collect();
    let body = interner.object_shape(crate::types::ObjectShape { props, ..*shape });
    Some(interner.intern(TypeData::Recursive { binder, body }))
}

fn contains_type(interner: &TypeInterner, haystack: TypeId, needle: TypeId, depth: u32) -> bool {
    if haystack == needle {
        return true;
    }
    if depth > 8 {
        return false;
    }
    match interner.lookup(haystack) {
        Some(TypeData::Union(members)) => members
            .iter()
            .any(|m| contains_type(interner, *m, needle, depth + 1)),
        Some(TypeData::Array(element)) => contains_type(interner, element, needle, depth + 1),
        Some(TypeData::Object(shape)) => shape
            .props
            .iter()
            .any(|p| contains_type(interner, p.ty, needle, depth + 1)),
        _ => false,
    }
}

fn replace_type(
    interner: &TypeInterner,
    ty: TypeId,
    target: TypeId,
    replacement: TypeId,
    depth: u32,
) -> TypeId {
    if ty == target {
        return replacement;
    }
    if depth > 8 {
        return ty;
    }
    match interner.lookup(ty) {
        Some(TypeData::Union(members)) => {
            let replaced = members
                .iter()
                .map(|m| replace_type(interner, *m, target, replacement, depth + 1))
                .collect();
            interner.union(replaced)
        }
        Some(TypeData::Array(element)) => {
            interner.array(replace_type(interner, element, target, replacement, depth + 1))
        }
        Some(TypeData::Object(shape)) => {
            let props = shape
                .props
                .iter()
                .map(|p| p.with_type(replace_type(interner, p.ty, target, replacement, depth + 1)))
                .collect();
            interner.object_shape(crate::types::ObjectShape { props, ..*shape })
        }
        _ => ty,
    }
}

// =============================================================================
// Loop-modified variable collection
// =============================================================================

/// For each back-edge, the set of variables assigned anywhere in its
/// natural loop. These are the variables the widening operator applies
/// to at the loop header.
fn compute_loop_assigned(
    interner: &TypeInterner,
    cfg: &Cfg<'_>,
) -> FxHashMap<usize, FxHashSet<Atom>> {
    let mut result = FxHashMap::default();
    for &edge_index in &cfg.back_edges {
        let edge = &cfg.edges[edge_index];
        let header = edge.target.index();
        let latch = edge.source.index();

        // Natural loop: blocks reaching the latch without crossing the
        // header
        let mut loop_blocks: FxHashSet<usize> = FxHashSet::default();
        loop_blocks.insert(header);
        let mut stack = vec![latch];
        while let Some(block) = stack.pop() {
            if !loop_blocks.insert(block) {
                continue;
            }
            for &incoming in &cfg.predecessors[block] {
                stack.push(cfg.edges[incoming].source.index());
            }
        }

        let mut assigned = FxHashSet::default();
        for &block in &loop_blocks {
            collect_block_assigned(interner, &cfg.blocks[block], &mut assigned);
        }
        result.insert(edge_index, assigned);
    }
    result
}

fn collect_block_assigned(interner: &TypeInterner, block: &BasicBlock<'_>, out: &mut FxHashSet<Atom>) {
    for item in &block.items {
        match item {
            BlockItem::Stmt(stmt) => collect_stmt_assigned(interner, stmt, out),
            BlockItem::Decl(decl) => {
                for declarator in &decl.declarators {
                    collect_pattern_names(interner, &declarator.pat, out);
                    if let Some(init) = &declarator.init {
                        collect_expr_assigned(interner, init, out);
                    }
                }
            }
            BlockItem::Expr(expr) => collect_expr_assigned(interner, expr, out),
            BlockItem::ForBind { head, .. } => match head {
                ForHead::VarDecl(decl) => {
                    for declarator in &decl.declarators {
                        collect_pattern_names(interner, &declarator.pat, out);
                    }
                }
                ForHead::Pat(pat) => collect_pattern_names(interner, pat, out),
            },
            BlockItem::CatchBind(pat) => collect_pattern_names(interner, pat, out),
        }
    }
    match block.terminator {
        Terminator::Branch(expr) | Terminator::Switch(expr) | Terminator::Throw(expr) => {
            collect_expr_assigned(interner, expr, out);
        }
        Terminator::Return(Some(expr)) => collect_expr_assigned(interner, expr, out),
        _ => {}
    }
}

fn collect_stmt_assigned(interner: &TypeInterner, stmt: &Stmt, out: &mut FxHashSet<Atom>) {
    match stmt {
        Stmt::VarDecl(decl) => {
            for declarator in &decl.declarators {
                collect_pattern_names(interner, &declarator.pat, out);
                if let Some(init) = &declarator.init {
                    collect_expr_assigned(interner, init, out);
                }
            }
        }
        Stmt::FunctionDecl(function) => {
            if let Some(name) = &function.name {
                out.insert(interner.intern_string(&name.name));
            }
        }
        Stmt::ClassDecl(class) => {
            if let Some(name) = &class.name {
                out.insert(interner.intern_string(&name.name));
            }
        }
        Stmt::Expr(stmt) => collect_expr_assigned(interner, &stmt.expr, out),
        _ => {}
    }
}

pub(crate) fn collect_pattern_names(interner: &TypeInterner, pat: &Pat, out: &mut FxHashSet<Atom>) {
    match pat {
        Pat::Ident(ident) => {
            out.insert(interner.intern_string(&ident.name));
        }
        Pat::Object(object) => {
            for prop in &object.props {
                collect_pattern_names(interner, &prop.value, out);
            }
            if let Some(rest) = &object.rest {
                collect_pattern_names(interner, rest, out);
            }
        }
        Pat::Array(array) => {
            for element in array.elements.iter().flatten() {
                collect_pattern_names(interner, element, out);
            }
        }
        Pat::Assign(assign) => collect_pattern_names(interner, &assign.pat, out),
        Pat::Rest(rest) => collect_pattern_names(interner, &rest.pat, out),
    }
}

fn collect_expr_assigned(interner: &TypeInterner, expr: &Expr, out: &mut FxHashSet<Atom>) {
    match expr {
        Expr::Assign(assign) => {
            match &assign.target {
                AssignTarget::Ident(ident) => {
                    out.insert(interner.intern_string(&ident.name));
                }
                AssignTarget::Pattern(pat) => collect_pattern_names(interner, pat, out),
                AssignTarget::Member(member) => {
                    collect_expr_assigned(interner, &member.object, out);
                }
                AssignTarget::Index(index) => {
                    collect_expr_assigned(interner, &index.object, out);
                    collect_expr_assigned(interner, &index.index, out);
                }
            }
            collect_expr_assigned(interner, &assign.value, out);
        }
        Expr::Update(update) => {
            if let Expr::Ident(ident) = &update.argument {
                out.insert(interner.intern_string(&ident.name));
            }
            collect_expr_assigned(interner, &update.argument, out);
        }
        Expr::Array(array) => {
            for element in array.elements.iter().flatten() {
                match element {
                    ArrayElement::Expr(e) => collect_expr_assigned(interner, e, out),
                    ArrayElement::Spread(spread) => {
                        collect_expr_assigned(interner, &spread.argument, out);
                    }
                }
            }
        }
        Expr::Object(object) => {
            for property in &object.properties {
                match property {
                    ObjectProperty::KeyValue { value, .. } => {
                        collect_expr_assigned(interner, value, out);
                    }
                    ObjectProperty::Spread(spread) => {
                        collect_expr_assigned(interner, &spread.argument, out);
                    }
                    ObjectProperty::Shorthand(_) | ObjectProperty::Method { .. } => {}
                }
            }
        }
        Expr::Member(member) => collect_expr_assigned(interner, &member.object, out),
        Expr::Index(index) => {
            collect_expr_assigned(interner, &index.object, out);
            collect_expr_assigned(interner, &index.index, out);
        }
        Expr::Call(call) => {
            collect_expr_assigned(interner, &call.callee, out);
            for argument in &call.arguments {
                match argument {
                    Argument::Expr(e) => collect_expr_assigned(interner, e, out),
                    Argument::Spread(spread) => {
                        collect_expr_assigned(interner, &spread.argument, out);
                    }
                }
            }
        }
        Expr::New(new_expr) => {
            collect_expr_assigned(interner, &new_expr.callee, out);
            for argument in &new_expr.arguments {
                match argument {
                    Argument::Expr(e) => collect_expr_assigned(interner, e, out),
                    Argument::Spread(spread) => {
                        collect_expr_assigned(interner, &spread.argument, out);
                    }
                }
            }
        }
        Expr::Unary(unary) => collect_expr_assigned(interner, &unary.argument, out),
        Expr::Binary(binary) => {
            collect_expr_assigned(interner, &binary.left, out);
            collect_expr_assigned(interner, &binary.right, out);
        }
        Expr::Logical(logical) => {
            collect_expr_assigned(interner, &logical.left, out);
            collect_expr_assigned(interner, &logical.right, out);
        }
        Expr::Cond(cond) => {
            collect_expr_assigned(interner, &cond.test, out);
            collect_expr_assigned(interner, &cond.consequent, out);
            collect_expr_assigned(interner, &cond.alternate, out);
        }
        Expr::Seq(seq) => {
            for e in &seq.exprs {
                collect_expr_assigned(interner, e, out);
            }
        }
        Expr::Await(await_expr) => collect_expr_assigned(interner, &await_expr.argument, out),
        Expr::Yield(yield_expr) => {
            if let Some(argument) = &yield_expr.argument {
                collect_expr_assigned(interner, argument, out);
            }
        }
        _ => {}
    }
}

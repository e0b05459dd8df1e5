//! Control flow graph construction.
//!
//! Translates a structured statement list into basic blocks with typed
//! edges. Conditional edges carry narrowing predicates derived from the
//! branch condition. Post-processing identifies back-edges by DFS and
//! computes dominators and post-dominators by iterative dataflow.

use crate::narrow::Predicate;
use crate::types::TypeInterner;
use fixedbitset::FixedBitSet;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use tyin_common::Atom;
use tyin_parser::ast::*;

/// Per-block adjacency: edge indices, inline for the common small case.
pub type EdgeList = SmallVec<[usize; 4]>;

// =============================================================================
// Graph data
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockId(pub u32);

impl BlockId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One work item inside a basic block. Besides plain statements the
/// builder synthesizes items for loop-head bindings and catch
/// parameters, which have no statement of their own.
#[derive(Clone, Copy, Debug)]
pub enum BlockItem<'a> {
    Stmt(&'a Stmt),
    Expr(&'a Expr),
    /// A declaration in a for-statement head.
    Decl(&'a VarDecl),
    /// Bind the for-in/for-of head from the iterated value. `of` is
    /// false for for-in (property names).
    ForBind {
        head: &'a ForHead,
        source: &'a Expr,
        of: bool,
    },
    /// Bind the catch parameter.
    CatchBind(&'a Pat),
}

#[derive(Clone, Copy, Debug)]
pub enum Terminator<'a> {
    Fallthrough,
    Branch(&'a Expr),
    Switch(&'a Expr),
    Return(Option<&'a Expr>),
    Throw(&'a Expr),
    Break(Option<Atom>),
    Continue(Option<Atom>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeKind {
    Unconditional,
    True,
    False,
    Case,
    Default,
    Exception,
    FinallyComplete,
}

#[derive(Clone, Debug)]
pub struct Edge {
    pub source: BlockId,
    pub target: BlockId,
    pub kind: EdgeKind,
    /// Narrowing facts proven along this edge.
    pub predicates: Vec<Predicate>,
}

#[derive(Debug)]
pub struct BasicBlock<'a> {
    pub id: BlockId,
    pub items: Vec<BlockItem<'a>>,
    pub terminator: Terminator<'a>,
}

#[derive(Debug)]
pub struct Cfg<'a> {
    pub blocks: Vec<BasicBlock<'a>>,
    pub edges: Vec<Edge>,
    pub entry: BlockId,
    pub exit: BlockId,
    /// Indices into `edges` of loop back-edges.
    pub back_edges: FxHashSet<usize>,
    /// Per-block dominator sets, indexed by block.
    pub dominators: Vec<FixedBitSet>,
    pub post_dominators: Vec<FixedBitSet>,
    /// Outgoing edge indices per block.
    pub successors: Vec<EdgeList>,
    /// Incoming edge indices per block.
    pub predecessors: Vec<EdgeList>,
}

impl<'a> Cfg<'a> {
    pub fn block(&self, id: BlockId) -> &BasicBlock<'a> {
        &self.blocks[id.index()]
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn back_edge_count(&self) -> usize {
        self.back_edges.len()
    }
}

// =============================================================================
// Builder
// =============================================================================

struct TryFrame {
    catch: Option<BlockId>,
    finally: Option<BlockId>,
}

pub struct CfgBuilder<'a, 'i> {
    interner: &'i TypeInterner,
    blocks: Vec<BasicBlock<'a>>,
    edges: Vec<Edge>,
    current: BlockId,
    exit: BlockId,
    /// Innermost-last stacks; `None` labels match unlabelled jumps.
    break_targets: Vec<(Option<Atom>, BlockId)>,
    continue_targets: Vec<(Option<Atom>, BlockId)>,
    try_frames: Vec<TryFrame>,
    /// Label waiting to attach to the next loop statement.
    pending_label: Option<Atom>,
    /// The current block already has a terminator; further statements
    /// open an unreachable block.
    terminated: bool,
}

impl<'a, 'i> CfgBuilder<'a, 'i> {
    pub fn new(interner: &'i TypeInterner) -> Self {
        let entry = BasicBlock {
            id: BlockId(0),
            items: Vec::new(),
            terminator: Terminator::Fallthrough,
        };
        let exit = BasicBlock {
            id: BlockId(1),
            items: Vec::new(),
            terminator: Terminator::Fallthrough,
        };
        CfgBuilder {
            interner,
            blocks: vec![entry, exit],
            edges: Vec::new(),
            current: BlockId(0),
            exit: BlockId(1),
            break_targets: Vec::new(),
            continue_targets: Vec::new(),
            try_frames: Vec::new(),
            pending_label: None,
            terminated: false,
        }
    }

    pub fn build(mut self, body: &'a [Stmt]) -> Cfg<'a> {
        for stmt in body {
            self.lower_stmt(stmt);
        }
        if !self.terminated {
            self.add_edge(self.current, self.exit, EdgeKind::Unconditional, Vec::new());
        }
        self.finish()
    }

    // -------------------------------------------------------------------------
    // Infrastructure
    // -------------------------------------------------------------------------

    fn new_block(&mut self) -> BlockId {
        let id = BlockId(u32::try_from(self.blocks.len()).unwrap_or(u32::MAX));
        self.blocks.push(BasicBlock {
            id,
            items: Vec::new(),
            terminator: Terminator::Fallthrough,
        });
        id
    }

    fn add_edge(&mut self, source: BlockId, target: BlockId, kind: EdgeKind, predicates: Vec<Predicate>) {
        self.edges.push(Edge {
            source,
            target,
            kind,
            predicates,
        });
    }

    fn set_terminator(&mut self, terminator: Terminator<'a>) {
        self.blocks[self.current.index()].terminator = terminator;
        self.terminated = true;
    }

    /// Move the cursor to `block`; statements append there.
    fn move_to(&mut self, block: BlockId) {
        self.current = block;
        self.terminated = false;
    }

    fn push_item(&mut self, item: BlockItem<'a>) {
        self.ensure_open();
        self.blocks[self.current.index()].items.push(item);
    }

    /// After a return/break/throw the cursor sits on a terminated
    /// block; dead code opens a fresh predecessor-less block so it is
    /// still analyzed and the unreachable warning can point at it.
    fn ensure_open(&mut self) {
        if self.terminated {
            let dead = self.new_block();
            self.move_to(dead);
        }
    }

    fn nearest_catch(&self) -> Option<BlockId> {
        self.try_frames.iter().rev().find_map(|f| f.catch)
    }

    fn jump_target(targets: &[(Option<Atom>, BlockId)], label: Option<Atom>) -> Option<BlockId> {
        match label {
            None => targets.last().map(|(_, b)| *b),
            Some(atom) => targets
                .iter()
                .rev()
                .find(|(l, _)| *l == Some(atom))
                .map(|(_, b)| *b),
        }
    }

    // -------------------------------------------------------------------------
    // Statement lowering
    // -------------------------------------------------------------------------

    fn lower_stmt(&mut self, stmt: &'a Stmt) {
        match stmt {
            Stmt::VarDecl(_)
            | Stmt::FunctionDecl(_)
            | Stmt::ClassDecl(_)
            | Stmt::Expr(_)
            | Stmt::Empty(_) => self.push_item(BlockItem::Stmt(stmt)),
            Stmt::Block(block) => {
                for inner in &block.body {
                    self.lower_stmt(inner);
                }
            }
            Stmt::If(if_stmt) => self.lower_if(if_stmt),
            Stmt::While(while_stmt) => self.lower_while(while_stmt),
            Stmt::DoWhile(do_stmt) => self.lower_do_while(do_stmt),
            Stmt::For(for_stmt) => self.lower_for(for_stmt),
            Stmt::ForIn(for_in) => {
                self.lower_for_each(&for_in.left, &for_in.object, &for_in.body, false);
            }
            Stmt::ForOf(for_of) => {
                self.lower_for_each(&for_of.left, &for_of.iterable, &for_of.body, true);
            }
            Stmt::Switch(switch_stmt) => self.lower_switch(switch_stmt),
            Stmt::Try(try_stmt) => self.lower_try(try_stmt),
            Stmt::Labeled(labeled) => self.lower_labeled(labeled),
            Stmt::Return(return_stmt) => {
                self.ensure_open();
                self.set_terminator(Terminator::Return(return_stmt.argument.as_ref()));
                self.add_edge(self.current, self.exit, EdgeKind::Unconditional, Vec::new());
            }
            Stmt::Throw(throw_stmt) => {
                self.ensure_open();
                self.set_terminator(Terminator::Throw(&throw_stmt.argument));
                let target = self.nearest_catch().unwrap_or(self.exit);
                self.add_edge(self.current, target, EdgeKind::Exception, Vec::new());
            }
            Stmt::Break(break_stmt) => {
                self.ensure_open();
                let label = break_stmt
                    .label
                    .as_ref()
                    .map(|l| self.interner.intern_string(&l.name));
                self.set_terminator(Terminator::Break(label));
                if let Some(target) = Self::jump_target(&self.break_targets, label) {
                    self.add_edge(self.current, target, EdgeKind::Unconditional, Vec::new());
                }
            }
            Stmt::Continue(continue_stmt) => {
                self.ensure_open();
                let label = continue_stmt
                    .label
                    .as_ref()
                    .map(|l| self.interner.intern_string(&l.name));
                self.set_terminator(Terminator::Continue(label));
                if let Some(target) = Self::jump_target(&self.continue_targets, label) {
                    self.add_edge(self.current, target, EdgeKind::Unconditional, Vec::new());
                }
            }
        }
    }

    fn lower_if(&mut self, if_stmt: &'a IfStmt) {
        self.ensure_open();
        self.set_terminator(Terminator::Branch(&if_stmt.test));
        let branch = self.current;
        let then_block = self.new_block();
        let join = self.new_block();

        self.add_edge(
            branch,
            then_block,
            EdgeKind::True,
            self.condition_predicates(&if_stmt.test, true),
        );

        if let Some(alternate) = &if_stmt.alternate {
            let else_block = self.new_block();
            self.add_edge(
                branch,
                else_block,
                EdgeKind::False,
                self.condition_predicates(&if_stmt.test, false),
            );
            self.move_to(then_block);
            self.lower_stmt(&if_stmt.consequent);
            if !self.terminated {
                self.add_edge(self.current, join, EdgeKind::Unconditional, Vec::new());
            }
            self.move_to(else_block);
            self.lower_stmt(alternate);
            if !self.terminated {
                self.add_edge(self.current, join, EdgeKind::Unconditional, Vec::new());
            }
        } else {
            self.add_edge(
                branch,
                join,
                EdgeKind::False,
                self.condition_predicates(&if_stmt.test, false),
            );
            self.move_to(then_block);
            self.lower_stmt(&if_stmt.consequent);
            if !self.terminated {
                self.add_edge(self.current, join, EdgeKind::Unconditional, Vec::new());
            }
        }
        self.move_to(join);
    }

    fn loop_labels(&mut self) -> Option<Atom> {
        self.pending_label.take()
    }

    fn lower_while(&mut self, while_stmt: &'a WhileStmt) {
        let label = self.loop_labels();
        let header = self.new_block();
        let body = self.new_block();
        let after = self.new_block();

        if !self.terminated {
            self.add_edge(self.current, header, EdgeKind::Unconditional, Vec::new());
        }
        self.move_to(header);
        self.set_terminator(Terminator::Branch(&while_stmt.test));
        self.add_edge(
            header,
            body,
            EdgeKind::True,
            self.condition_predicates(&while_stmt.test, true),
        );
        self.add_edge(
            header,
            after,
            EdgeKind::False,
            self.condition_predicates(&while_stmt.test, false),
        );

        self.break_targets.push((None, after));
        self.continue_targets.push((None, header));
        if let Some(atom) = label {
            self.break_targets.push((Some(atom), after));
            self.continue_targets.push((Some(atom), header));
        }
        self.move_to(body);
        self.lower_stmt(&while_stmt.body);
        if !self.terminated {
            self.add_edge(self.current, header, EdgeKind::Unconditional, Vec::new());
        }
        self.pop_loop_targets(label);
        self.move_to(after);
    }

    fn lower_do_while(&mut self, do_stmt: &'a DoWhileStmt) {
        let label = self.loop_labels();
        let body = self.new_block();
        let cond = self.new_block();
        let after = self.new_block();

        if !self.terminated {
            self.add_edge(self.current, body, EdgeKind::Unconditional, Vec::new());
        }

        self.break_targets.push((None, after));
        self.continue_targets.push((None, cond));
        if let Some(atom) = label {
            self.break_targets.push((Some(atom), after));
            self.continue_targets.push((Some(atom), cond));
        }
        self.move_to(body);
        self.lower_stmt(&do_stmt.body);
        if !self.terminated {
            self.add_edge(self.current, cond, EdgeKind::Unconditional, Vec::new());
        }
        self.pop_loop_targets(label);

        self.move_to(cond);
        self.set_terminator(Terminator::Branch(&do_stmt.test));
        self.add_edge(
            cond,
            body,
            EdgeKind::True,
            self.condition_predicates(&do_stmt.test, true),
        );
        self.add_edge(
            cond,
            after,
            EdgeKind::False,
            self.condition_predicates(&do_stmt.test, false),
        );
        self.move_to(after);
    }

    fn lower_for(&mut self, for_stmt: &'a ForStmt) {
        let label = self.loop_labels();
        match &for_stmt.init {
            Some(ForInit::VarDecl(decl)) => self.push_item(BlockItem::Decl(decl)),
            Some(ForInit::Expr(expr)) => self.push_item(BlockItem::Expr(expr)),
            None => self.ensure_open(),
        }

        let header = self.new_block();
        let body = self.new_block();
        let update = self.new_block();
        let after = self.new_block();

        if !self.terminated {
            self.add_edge(self.current, header, EdgeKind::Unconditional, Vec::new());
        }
        self.move_to(header);
        match &for_stmt.test {
            Some(test) => {
                self.set_terminator(Terminator::Branch(test));
                self.add_edge(header, body, EdgeKind::True, self.condition_predicates(test, true));
                self.add_edge(
                    header,
                    after,
                    EdgeKind::False,
                    self.condition_predicates(test, false),
                );
            }
            None => {
                self.set_terminator(Terminator::Fallthrough);
                self.add_edge(header, body, EdgeKind::Unconditional, Vec::new());
            }
        }

        self.break_targets.push((None, after));
        self.continue_targets.push((None, update));
        if let Some(atom) = label {
            self.break_targets.push((Some(atom), after));
            self.continue_targets.push((Some(atom), update));
        }
        self.move_to(body);
        self.lower_stmt(&for_stmt.body);
        if !self.terminated {
            self.add_edge(self.current, update, EdgeKind::Unconditional, Vec::new());
        }
        self.pop_loop_targets(label);

        self.move_to(update);
        if let Some(update_expr) = &for_stmt.update {
            self.push_item(BlockItem::Expr(update_expr));
        }
        self.add_edge(update, header, EdgeKind::Unconditional, Vec::new());
        self.set_terminator(Terminator::Fallthrough);
        self.move_to(after);
    }

    fn lower_for_each(&mut self, head: &'a ForHead, source: &'a Expr, body_stmt: &'a Stmt, of: bool) {
        let label = self.loop_labels();
        let header = self.new_block();
        let body = self.new_block();
        let after = self.new_block();

        if !self.terminated {
            self.add_edge(self.current, header, EdgeKind::Unconditional, Vec::new());
        }
        // The branch condition is the iterated expression: truthy while
        // elements remain
        self.move_to(header);
        self.set_terminator(Terminator::Branch(source));
        self.add_edge(header, body, EdgeKind::True, Vec::new());
        self.add_edge(header, after, EdgeKind::False, Vec::new());

        self.break_targets.push((None, after));
        self.continue_targets.push((None, header));
        if let Some(atom) = label {
            self.break_targets.push((Some(atom), after));
            self.continue_targets.push((Some(atom), header));
        }
        self.move_to(body);
        self.push_item(BlockItem::ForBind { head, source, of });
        self.lower_stmt(body_stmt);
        if !self.terminated {
            self.add_edge(self.current, header, EdgeKind::Unconditional, Vec::new());
        }
        self.pop_loop_targets(label);
        self.move_to(after);
    }

    fn pop_loop_targets(&mut self, label: Option<Atom>) {
        if label.is_some() {
            self.break_targets.pop();
            self.continue_targets.pop();
        }
        self.break_targets.pop();
        self.continue_targets.pop();
    }

    fn lower_switch(&mut self, switch_stmt: &'a SwitchStmt) {
        self.ensure_open();
        self.set_terminator(Terminator::Switch(&switch_stmt.discriminant));
        let dispatch = self.current;
        let after = self.new_block();

        let case_blocks: Vec<BlockId> = switch_stmt
            .cases
            .iter()
            .map(|_| self.new_block())
            .collect();

        let mut has_default = false;
        for (case, block) in switch_stmt.cases.iter().zip(&case_blocks) {
            match &case.test {
                Some(test) => {
                    let predicates = self.case_predicates(&switch_stmt.discriminant, test);
                    self.add_edge(dispatch, *block, EdgeKind::Case, predicates);
                }
                None => {
                    has_default = true;
                    self.add_edge(dispatch, *block, EdgeKind::Default, Vec::new());
                }
            }
        }
        if !has_default {
            self.add_edge(dispatch, after, EdgeKind::Default, Vec::new());
        }

        self.break_targets.push((None, after));
        let label = self.pending_label.take();
        if let Some(atom) = label {
            self.break_targets.push((Some(atom), after));
        }
        for (i, case) in switch_stmt.cases.iter().enumerate() {
            self.move_to(case_blocks[i]);
            for stmt in &case.body {
                self.lower_stmt(stmt);
            }
            if !self.terminated {
                // Fall through into the next case body
                let next = case_blocks.get(i + 1).copied().unwrap_or(after);
                self.add_edge(self.current, next, EdgeKind::Unconditional, Vec::new());
            }
        }
        if label.is_some() {
            self.break_targets.pop();
        }
        self.break_targets.pop();
        self.move_to(after);
    }

    fn lower_try(&mut self, try_stmt: &'a TryStmt) {
        self.ensure_open();
        let try_block = self.new_block();
        let catch_block = try_stmt.handler.as_ref().map(|_| self.new_block());
        let finally_block = try_stmt.finalizer.as_ref().map(|_| self.new_block());
        let after = self.new_block();
        let continuation = finally_block.unwrap_or(after);
        let continuation_kind = if finally_block.is_some() {
            EdgeKind::FinallyComplete
        } else {
            EdgeKind::Unconditional
        };

        if !self.terminated {
            self.add_edge(self.current, try_block, EdgeKind::Unconditional, Vec::new());
        }

        self.try_frames.push(TryFrame {
            catch: catch_block,
            finally: finally_block,
        });
        self.move_to(try_block);
        for stmt in &try_stmt.block.body {
            self.lower_stmt(stmt);
        }
        if !self.terminated {
            self.add_edge(self.current, continuation, continuation_kind, Vec::new());
        }
        self.try_frames.pop();

        if let (Some(handler), Some(catch_id)) = (&try_stmt.handler, catch_block) {
            self.move_to(catch_id);
            if let Some(param) = &handler.param {
                self.push_item(BlockItem::CatchBind(param));
            }
            for stmt in &handler.body.body {
                self.lower_stmt(stmt);
            }
            if !self.terminated {
                self.add_edge(self.current, continuation, continuation_kind, Vec::new());
            }
        }

        if let (Some(finalizer), Some(finally_id)) = (&try_stmt.finalizer, finally_block) {
            self.move_to(finally_id);
            for stmt in &finalizer.body {
                self.lower_stmt(stmt);
            }
            if !self.terminated {
                self.add_edge(self.current, after, EdgeKind::Unconditional, Vec::new());
            }
        }
        self.move_to(after);
    }

    fn lower_labeled(&mut self, labeled: &'a LabeledStmt) {
        let atom = self.interner.intern_string(&labeled.label.name);
        match &labeled.body {
            Stmt::While(_) | Stmt::DoWhile(_) | Stmt::For(_) | Stmt::ForIn(_) | Stmt::ForOf(_) => {
                self.pending_label = Some(atom);
                self.lower_stmt(&labeled.body);
                self.pending_label = None;
            }
            _ => {
                // A labelled non-loop statement: `break label` exits it
                let after = self.new_block();
                self.break_targets.push((Some(atom), after));
                self.lower_stmt(&labeled.body);
                self.break_targets.pop();
                if !self.terminated {
                    self.add_edge(self.current, after, EdgeKind::Unconditional, Vec::new());
                }
                self.move_to(after);
            }
        }
    }

    // -------------------------------------------------------------------------
    // Condition predicates
    // -------------------------------------------------------------------------

    /// Facts proven when `condition` evaluates to `assume`.
    fn condition_predicates(&self, condition: &Expr, assume: bool) -> Vec<Predicate> {
        crate::narrow::condition_predicates(self.interner, condition, assume)
    }

    fn case_predicates(&self, discriminant: &Expr, test: &Expr) -> Vec<Predicate> {
        crate::narrow::case_predicates(self.interner, discriminant, test)
    }

    // -------------------------------------------------------------------------
    // Post-processing
    // -------------------------------------------------------------------------

    fn finish(self) -> Cfg<'a> {
        let block_count = self.blocks.len();
        let mut successors: Vec<EdgeList> = vec![EdgeList::new(); block_count];
        let mut predecessors: Vec<EdgeList> = vec![EdgeList::new(); block_count];
        for (index, edge) in self.edges.iter().enumerate() {
            successors[edge.source.index()].push(index);
            predecessors[edge.target.index()].push(index);
        }

        let back_edges = find_back_edges(block_count, &self.edges, &successors, BlockId(0));
        let dominators = compute_dominators(block_count, &predecessors, &self.edges, 0);
        let post_dominators =
            compute_post_dominators(block_count, &successors, &self.edges, self.exit.index());

        Cfg {
            blocks: self.blocks,
            edges: self.edges,
            entry: BlockId(0),
            exit: self.exit,
            back_edges,
            dominators,
            post_dominators,
            successors,
            predecessors,
        }
    }
}

/// DFS back-edge identification: an edge whose target is on the current
/// DFS stack.
fn find_back_edges(
    block_count: usize,
    edges: &[Edge],
    successors: &[EdgeList],
    entry: BlockId,
) -> FxHashSet<usize> {
    let mut back_edges = FxHashSet::default();
    let mut visited = vec![false; block_count];
    let mut on_stack = vec![false; block_count];
    // (block, next successor index to visit)
    let mut stack: Vec<(usize, usize)> = vec![(entry.index(), 0)];
    visited[entry.index()] = true;
    on_stack[entry.index()] = true;

    while let Some(frame) = stack.last_mut() {
        let block = frame.0;
        if frame.1 < successors[block].len() {
            let edge_index = successors[block][frame.1];
            frame.1 += 1;
            let target = edges[edge_index].target.index();
            if on_stack[target] {
                back_edges.insert(edge_index);
            } else if !visited[target] {
                visited[target] = true;
                on_stack[target] = true;
                stack.push((target, 0));
            }
        } else {
            on_stack[block] = false;
            stack.pop();
        }
    }
    back_edges
}

/// Iterative dominator dataflow: `dom(n) = {n} ∪ ⋂ dom(p)` over
/// predecessors, entry seeded with itself.
fn compute_dominators(
    block_count: usize,
    predecessors: &[EdgeList],
    edges: &[Edge],
    entry: usize,
) -> Vec<FixedBitSet> {
    let mut dominators: Vec<FixedBitSet> = (0..block_count)
        .map(|i| {
            let mut set = FixedBitSet::with_capacity(block_count);
            if i == entry {
                set.insert(entry);
            } else {
                set.insert_range(..);
            }
            set
        })
        .collect();

    let mut changed = true;
    while changed {
        changed = false;
        for block in 0..block_count {
            if block == entry {
                continue;
            }
            let mut new_set: Option<FixedBitSet> = None;
            for &edge_index in &predecessors[block] {
                let pred = edges[edge_index].source.index();
                match &mut new_set {
                    None => new_set = Some(dominators[pred].clone()),
                    Some(set) => set.intersect_with(&dominators[pred]),
                }
            }
            let mut new_set = new_set.unwrap_or_else(|| {
                let mut empty = FixedBitSet::with_capacity(block_count);
                empty.insert_range(..);
                empty
            });
            new_set.insert(block);
            if new_set != dominators[block] {
                dominators[block] = new_set;
                changed = true;
            }
        }
    }
    dominators
}

/// Post-dominators: the same dataflow on the reversed graph from the
/// exit set.
fn compute_post_dominators(
    block_count: usize,
    successors: &[EdgeList],
    edges: &[Edge],
    exit: usize,
) -> Vec<FixedBitSet> {
    let mut post: Vec<FixedBitSet> = (0..block_count)
        .map(|i| {
            let mut set = FixedBitSet::with_capacity(block_count);
            if i == exit {
                set.insert(exit);
            } else {
                set.insert_range(..);
            }
            set
        })
        .collect();

    let mut changed = true;
    while changed {
        changed = false;
        for block in (0..block_count).rev() {
            if block == exit {
                continue;
            }
            let mut new_set: Option<FixedBitSet> = None;
            for &edge_index in &successors[block] {
                let succ = edges[edge_index].target.index();
                match &mut new_set {
                    None => new_set = Some(post[succ].clone()),
                    Some(set) => set.intersect_with(&post[succ]),
                }
            }
            let mut new_set = new_set.unwrap_or_else(|| {
                let mut empty = FixedBitSet::with_capacity(block_count);
                empty.insert_range(..);
                empty
            });
            new_set.insert(block);
            if new_set != post[block] {
                post[block] = new_set;
                changed = true;
            }
        }
    }
    post
}

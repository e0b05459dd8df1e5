//! Statement transfer functions and declaration binding.
//!
//! Given a block's entry state, `transfer_block` produces its exit
//! state, recording return contributions and (in extraction mode)
//! annotations and diagnostics. Hoisting installs `var`, `function`,
//! and `class` declarations before the worklist starts.

use crate::annotate::AnnotationKind;
use crate::cfg::{BasicBlock, BlockItem, Terminator};
use crate::env::{Binding, BindingKind};
use crate::lattice::join;
use crate::solver::{BodyCtx, GlobalSolver, Mode, ThisCtx, primary_pattern_name};
use crate::state::TypeState;
use crate::types::{
    ClassShape, FunctionShape, ObjectShape, PropertyInfo, TypeData, TypeId,
};
use tyin_parser::ast::*;

impl<'a> GlobalSolver<'a> {
    pub(crate) fn transfer_block(
        &mut self,
        block: &BasicBlock<'a>,
        state: &mut TypeState,
        ctx: &mut BodyCtx,
    ) {
        for item in &block.items {
            match *item {
                BlockItem::Stmt(stmt) => self.transfer_stmt(stmt, state, ctx),
                BlockItem::Decl(decl) => self.transfer_var_decl(decl, state, ctx),
                BlockItem::Expr(expr) => {
                    self.infer_expr(expr, state, ctx);
                }
                BlockItem::ForBind { head, source, of } => {
                    let source_ty = self.infer_expr(source, state, ctx);
                    let bound = if of {
                        self.element_type(source_ty)
                    } else {
                        TypeId::STRING
                    };
                    match head {
                        ForHead::VarDecl(decl) => {
                            let kind = binding_kind(decl.kind);
                            for declarator in &decl.declarators {
                                self.bind_pattern_with_kind(
                                    &declarator.pat,
                                    bound,
                                    kind,
                                    AnnotationKind::Element,
                                    state,
                                    ctx,
                                );
                            }
                        }
                        ForHead::Pat(pat) => self.assign_pattern(pat, bound, state, ctx),
                    }
                }
                BlockItem::CatchBind(pat) => {
                    let caught = self.interner.any_with_reason("caught");
                    self.bind_pattern_with_kind(
                        pat,
                        caught,
                        BindingKind::Let,
                        AnnotationKind::Variable,
                        state,
                        ctx,
                    );
                }
            }
        }

        match block.terminator {
            Terminator::Branch(test) | Terminator::Switch(test) => {
                self.infer_expr(test, state, ctx);
            }
            Terminator::Return(argument) => {
                let value = match argument {
                    Some(expr) => self.infer_expr(expr, state, ctx),
                    None => TypeId::UNDEFINED,
                };
                ctx.returns = join(self.interner, ctx.returns, value);
            }
            Terminator::Throw(argument) => {
                self.infer_expr(argument, state, ctx);
            }
            Terminator::Fallthrough | Terminator::Break(_) | Terminator::Continue(_) => {}
        }
    }

    fn transfer_stmt(&mut self, stmt: &'a Stmt, state: &mut TypeState, ctx: &mut BodyCtx) {
        match stmt {
            Stmt::VarDecl(decl) => self.transfer_var_decl(decl, state, ctx),
            Stmt::FunctionDecl(function) => {
                let ty = self.register_function(function, state, ctx, ThisCtx::Free);
                if let Some(name) = &function.name {
                    let atom = self.interner.intern_string(&name.name);
                    state.set(atom, ty);
                    ctx.env.declare(Binding {
                        name: atom,
                        ty,
                        kind: BindingKind::Function,
                        decl: function.id,
                        initialized: true,
                    });
                }
                if ctx.mode == Mode::Extract {
                    self.emit_function_annotations(function, AnnotationKind::Function);
                }
            }
            Stmt::ClassDecl(class) => {
                let ty = self.analyze_class(class, state, ctx);
                if let Some(name) = &class.name {
                    let atom = self.interner.intern_string(&name.name);
                    state.set(atom, ty);
                    ctx.env.declare(Binding {
                        name: atom,
                        ty,
                        kind: BindingKind::Class,
                        decl: class.id,
                        initialized: true,
                    });
                }
            }
            Stmt::Expr(expr_stmt) => {
                let ty = self.infer_expr(&expr_stmt.expr, state, ctx);
                if ctx.mode == Mode::Extract {
                    self.annotate(
                        expr_stmt.span,
                        "ExpressionStatement",
                        None,
                        ty,
                        AnnotationKind::Expression,
                    );
                }
            }
            Stmt::Empty(_) => {}
            // Control statements are lowered into the CFG and never
            // appear as block items
            _ => {}
        }
    }

    pub(crate) fn transfer_var_decl(
        &mut self,
        decl: &'a VarDecl,
        state: &mut TypeState,
        ctx: &mut BodyCtx,
    ) {
        let kind = binding_kind(decl.kind);
        let annotation = if decl.kind == DeclKind::Const {
            AnnotationKind::Const
        } else {
            AnnotationKind::Variable
        };
        for declarator in &decl.declarators {
            let value = match &declarator.init {
                Some(init) => self.infer_expr(init, state, ctx),
                None => TypeId::UNDEFINED,
            };
            self.bind_pattern_with_kind(&declarator.pat, value, kind, annotation, state, ctx);
        }
    }

    // =========================================================================
    // Pattern binding
    // =========================================================================

    pub(crate) fn bind_pattern(
        &mut self,
        pat: &'a Pat,
        ty: TypeId,
        kind: BindingKind,
        state: &mut TypeState,
        ctx: &mut BodyCtx,
    ) {
        let annotation = match kind {
            BindingKind::Const => AnnotationKind::Const,
            BindingKind::Parameter => AnnotationKind::Parameter,
            _ => AnnotationKind::Variable,
        };
        self.bind_pattern_with_kind(pat, ty, kind, annotation, state, ctx);
    }

    /// Structurally decompose `ty` over the pattern, declaring each
    /// bound identifier. Unknown slots are `any`; defaults contribute
    /// by union; rest elements collect the tuple tail or record
    /// residue.
    pub(crate) fn bind_pattern_with_kind(
        &mut self,
        pat: &'a Pat,
        ty: TypeId,
        kind: BindingKind,
        annotation: AnnotationKind,
        state: &mut TypeState,
        ctx: &mut BodyCtx,
    ) {
        match pat {
            Pat::Ident(ident) => {
                let atom = self.interner.intern_string(&ident.name);
                // Mutable bindings generalize fresh literals; `const`
                // keeps its literal refinement
                let bound = if matches!(kind, BindingKind::Var | BindingKind::Let) {
                    crate::solver::widen_type(self.interner, ty)
                } else {
                    ty
                };
                state.set(atom, bound);
                let accumulated = ctx.record_binding_type(self.interner, atom, bound);
                ctx.env.declare(Binding {
                    name: atom,
                    ty: bound,
                    kind,
                    decl: ident.id,
                    initialized: true,
                });
                if ctx.mode == Mode::Extract && kind != BindingKind::Parameter {
                    self.annotate(
                        ident.span,
                        "Identifier",
                        Some(ident.name.clone()),
                        accumulated,
                        annotation,
                    );
                }
            }
            Pat::Object(object) => {
                let mut taken: Vec<tyin_common::Atom> = Vec::new();
                for prop in &object.props {
                    let slot = match prop.key.static_name() {
                        Some(name) => {
                            let atom = self.interner.intern_string(name);
                            taken.push(atom);
                            self.member_type_quiet(ty, atom).unwrap_or(TypeId::ANY)
                        }
                        None => TypeId::ANY,
                    };
                    self.bind_pattern_with_kind(&prop.value, slot, kind, annotation, state, ctx);
                }
                if let Some(rest) = &object.rest {
                    let residue = self.record_residue(ty, &taken);
                    self.bind_pattern_with_kind(rest, residue, kind, annotation, state, ctx);
                }
            }
            Pat::Array(array) => {
                for (index, element) in array.elements.iter().enumerate() {
                    let Some(element_pat) = element else {
                        continue;
                    };
                    if let Pat::Rest(rest) = element_pat {
                        let tail = self.tuple_tail(ty, index);
                        self.bind_pattern_with_kind(
                            &rest.pat, tail, kind, annotation, state, ctx,
                        );
                        continue;
                    }
                    let slot = self.index_slot(ty, index);
                    self.bind_pattern_with_kind(element_pat, slot, kind, annotation, state, ctx);
                }
            }
            Pat::Assign(assign) => {
                let default = self.infer_expr(&assign.default, state, ctx);
                let combined = self.interner.union2(ty, default);
                self.bind_pattern_with_kind(&assign.pat, combined, kind, annotation, state, ctx);
            }
            Pat::Rest(rest) => {
                self.bind_pattern_with_kind(&rest.pat, ty, kind, annotation, state, ctx);
            }
        }
    }

    /// Assign through a pattern to bindings that already exist
    /// (destructuring assignment, for-of over an existing variable).
    pub(crate) fn assign_pattern(
        &mut self,
        pat: &'a Pat,
        ty: TypeId,
        state: &mut TypeState,
        ctx: &mut BodyCtx,
    ) {
        match pat {
            Pat::Ident(ident) => {
                self.assign_ident(&ident.name, ident.span, ty, state, ctx);
            }
            Pat::Object(object) => {
                for prop in &object.props {
                    let slot = match prop.key.static_name() {
                        Some(name) => {
                            let atom = self.interner.intern_string(name);
                            self.member_type_quiet(ty, atom).unwrap_or(TypeId::ANY)
                        }
                        None => TypeId::ANY,
                    };
                    self.assign_pattern(&prop.value, slot, state, ctx);
                }
                if let Some(rest) = &object.rest {
                    let taken: Vec<tyin_common::Atom> = object
                        .props
                        .iter()
                        .filter_map(|p| p.key.static_name())
                        .map(|name| self.interner.intern_string(name))
                        .collect();
                    let residue = self.record_residue(ty, &taken);
                    self.assign_pattern(rest, residue, state, ctx);
                }
            }
            Pat::Array(array) => {
                for (index, element) in array.elements.iter().enumerate() {
                    let Some(element_pat) = element else {
                        continue;
                    };
                    if let Pat::Rest(rest) = element_pat {
                        let tail = self.tuple_tail(ty, index);
                        self.assign_pattern(&rest.pat, tail, state, ctx);
                        continue;
                    }
                    let slot = self.index_slot(ty, index);
                    self.assign_pattern(element_pat, slot, state, ctx);
                }
            }
            Pat::Assign(assign) => {
                let default = self.infer_expr(&assign.default, state, ctx);
                let combined = self.interner.union2(ty, default);
                self.assign_pattern(&assign.pat, combined, state, ctx);
            }
            Pat::Rest(rest) => self.assign_pattern(&rest.pat, ty, state, ctx),
        }
    }

    /// Assignment to a named binding, with the const check.
    pub(crate) fn assign_ident(
        &mut self,
        name: &str,
        span: tyin_common::Span,
        ty: TypeId,
        state: &mut TypeState,
        ctx: &mut BodyCtx,
    ) {
        let atom = self.interner.intern_string(name);
        let kind = ctx
            .env
            .kind_of(atom)
            .or_else(|| ctx.closure_kinds.get(&atom).copied());
        if kind == Some(BindingKind::Const) {
            if ctx.mode == Mode::Extract {
                self.error(format!("Cannot assign to constant '{name}'"), span);
            }
            // State deliberately unchanged
            return;
        }
        let widened = crate::solver::widen_type(self.interner, ty);
        if kind.is_none() && state.get(atom).is_none() && ctx.closure.get(atom).is_none() {
            // Implicit global
            ctx.env.declare(Binding {
                name: atom,
                ty: widened,
                kind: BindingKind::Var,
                decl: tyin_parser::NodeId::NONE,
                initialized: true,
            });
        }
        ctx.env.mark_initialized(atom);
        ctx.record_binding_type(self.interner, atom, widened);
        state.set(atom, widened);
    }

    // =========================================================================
    // Slot helpers
    // =========================================================================

    /// The record residue after removing `taken` fields, for rest
    /// patterns.
    fn record_residue(&self, ty: TypeId, taken: &[tyin_common::Atom]) -> TypeId {
        match self.interner.lookup(ty) {
            Some(TypeData::Object(shape)) => {
                let props: Vec<PropertyInfo> = shape
                    .props
                    .iter()
                    .filter(|p| !taken.contains(&p.name))
                    .cloned()
                    .collect();
                self.interner.object_shape(ObjectShape {
                    props,
                    ..*shape
                })
            }
            _ => TypeId::ANY,
        }
    }

    /// The element at a fixed index of an array-like value.
    fn index_slot(&self, ty: TypeId, index: usize) -> TypeId {
        match self.interner.lookup(ty) {
            Some(TypeData::Tuple(elements)) => {
                elements.get(index).copied().unwrap_or(TypeId::UNDEFINED)
            }
            Some(TypeData::Array(element)) => element,
            Some(TypeData::Union(members)) => {
                let slots = members.iter().map(|m| self.index_slot(*m, index)).collect();
                self.interner.union(slots)
            }
            _ => TypeId::ANY,
        }
    }

    /// The remaining tuple tail (or array) from `index` on, for array
    /// rest patterns.
    fn tuple_tail(&self, ty: TypeId, index: usize) -> TypeId {
        match self.interner.lookup(ty) {
            Some(TypeData::Tuple(elements)) => {
                let tail: Vec<TypeId> = elements.get(index..).unwrap_or_default().to_vec();
                self.interner.tuple(tail)
            }
            Some(TypeData::Array(_)) => ty,
            _ => self.interner.array(TypeId::ANY),
        }
    }

    /// The per-iteration element type of a for-of iterable.
    pub(crate) fn element_type(&self, iterable: TypeId) -> TypeId {
        match self.interner.lookup(iterable) {
            Some(TypeData::Array(element)) => element,
            Some(TypeData::Tuple(elements)) => self.interner.union(elements),
            Some(TypeData::String | TypeData::Literal(crate::types::LiteralValue::String(_))) => {
                TypeId::STRING
            }
            Some(TypeData::Union(members)) => {
                let elements = members.iter().map(|m| self.element_type(*m)).collect();
                self.interner.union(elements)
            }
            _ => self.interner.any_with_reason("unknown-iterable"),
        }
    }

    // =========================================================================
    // Hoisting
    // =========================================================================

    /// Install hoisted declarations into the entry state: `undefined`
    /// for `var`, the function type for `function`, a forward stub for
    /// `class`. `let`/`const` enter the environment uninitialized
    /// (temporal dead zone).
    pub(crate) fn hoist(&mut self, body: &'a [Stmt], state: &mut TypeState, ctx: &mut BodyCtx) {
        for stmt in body {
            self.hoist_stmt(stmt, state, ctx);
        }
    }

    fn hoist_stmt(&mut self, stmt: &'a Stmt, state: &mut TypeState, ctx: &mut BodyCtx) {
        match stmt {
            Stmt::VarDecl(decl) => self.hoist_var_decl(decl, state, ctx),
            Stmt::FunctionDecl(function) => {
                let ty = self.register_function(function, state, ctx, ThisCtx::Free);
                if let Some(name) = &function.name {
                    let atom = self.interner.intern_string(&name.name);
                    state.set(atom, ty);
                    ctx.env.declare(Binding {
                        name: atom,
                        ty,
                        kind: BindingKind::Function,
                        decl: function.id,
                        initialized: true,
                    });
                }
            }
            Stmt::ClassDecl(class) => {
                if let Some(name) = &class.name {
                    let atom = self.interner.intern_string(&name.name);
                    let stub = self.interner.any_with_reason("class-forward");
                    state.set(atom, stub);
                    ctx.env.declare(Binding {
                        name: atom,
                        ty: stub,
                        kind: BindingKind::Class,
                        decl: class.id,
                        initialized: false,
                    });
                }
            }
            Stmt::Block(block) => self.hoist(&block.body, state, ctx),
            Stmt::If(if_stmt) => {
                self.hoist_stmt(&if_stmt.consequent, state, ctx);
                if let Some(alternate) = &if_stmt.alternate {
                    self.hoist_stmt(alternate, state, ctx);
                }
            }
            Stmt::While(while_stmt) => self.hoist_stmt(&while_stmt.body, state, ctx),
            Stmt::DoWhile(do_stmt) => self.hoist_stmt(&do_stmt.body, state, ctx),
            Stmt::For(for_stmt) => {
                if let Some(ForInit::VarDecl(decl)) = &for_stmt.init {
                    self.hoist_var_decl(decl, state, ctx);
                }
                self.hoist_stmt(&for_stmt.body, state, ctx);
            }
            Stmt::ForIn(for_in) => {
                if let ForHead::VarDecl(decl) = &for_in.left {
                    self.hoist_var_decl(decl, state, ctx);
                }
                self.hoist_stmt(&for_in.body, state, ctx);
            }
            Stmt::ForOf(for_of) => {
                if let ForHead::VarDecl(decl) = &for_of.left {
                    self.hoist_var_decl(decl, state, ctx);
                }
                self.hoist_stmt(&for_of.body, state, ctx);
            }
            Stmt::Try(try_stmt) => {
                self.hoist(&try_stmt.block.body, state, ctx);
                if let Some(handler) = &try_stmt.handler {
                    self.hoist(&handler.body.body, state, ctx);
                }
                if let Some(finalizer) = &try_stmt.finalizer {
                    self.hoist(&finalizer.body, state, ctx);
                }
            }
            Stmt::Switch(switch_stmt) => {
                for case in &switch_stmt.cases {
                    self.hoist(&case.body, state, ctx);
                }
            }
            Stmt::Labeled(labeled) => self.hoist_stmt(&labeled.body, state, ctx),
            _ => {}
        }
    }

    fn hoist_var_decl(&mut self, decl: &'a VarDecl, state: &mut TypeState, ctx: &mut BodyCtx) {
        let kind = binding_kind(decl.kind);
        for declarator in &decl.declarators {
            let mut names = rustc_hash::FxHashSet::default();
            crate::solver::collect_pattern_names(self.interner, &declarator.pat, &mut names);
            for atom in names {
                if kind == BindingKind::Var {
                    if state.get(atom).is_none() {
                        state.set(atom, TypeId::UNDEFINED);
                    }
                    ctx.env.declare(Binding {
                        name: atom,
                        ty: TypeId::UNDEFINED,
                        kind,
                        decl: declarator.id,
                        initialized: true,
                    });
                } else {
                    // Temporal dead zone entry
                    ctx.env.declare(Binding {
                        name: atom,
                        ty: TypeId::UNDEFINED,
                        kind,
                        decl: declarator.id,
                        initialized: false,
                    });
                }
            }
        }
    }

    // =========================================================================
    // Classes
    // =========================================================================

    /// Build the class type: instance record from constructor `this`
    /// assignments, declared fields and methods; constructor parameter
    /// types from `new`-site aggregation; statics on the class itself.
    pub(crate) fn analyze_class(
        &mut self,
        class: &'a Class,
        state: &mut TypeState,
        ctx: &mut BodyCtx,
    ) -> TypeId {
        let class_name = class
            .name
            .as_ref()
            .map_or_else(|| "anonymous".to_string(), |n| n.name.clone());
        let name_atom = self.interner.intern_string(&class_name);

        let super_class = class.super_class.as_ref().and_then(|expr| {
            let ty = self.infer_expr(expr, state, ctx);
            match self.interner.lookup(ty) {
                Some(TypeData::Class(_)) => Some(ty),
                _ => None,
            }
        });
        let proto = super_class.and_then(|ty| match self.interner.lookup(ty) {
            Some(TypeData::Class(shape)) => Some(shape.instance),
            _ => None,
        });

        let mut instance_props: Vec<PropertyInfo> = Vec::new();
        let mut static_props: Vec<PropertyInfo> = Vec::new();
        let mut ctor: Option<TypeId> = None;
        let mut ctor_key: Option<u32> = None;

        for member in &class.members {
            match member {
                ClassMember::Method(method) => {
                    let ty = self.register_function(
                        &method.function,
                        state,
                        ctx,
                        ThisCtx::Instance(class.id.0),
                    );
                    let Some(method_name) = method.key.static_name() else {
                        continue;
                    };
                    let atom = self.interner.intern_string(method_name);
                    match method.kind {
                        ClassMethodKind::Constructor => {
                            ctor = Some(ty);
                            ctor_key = Some(method.function.id.0);
                        }
                        ClassMethodKind::Get => {
                            let value = self
                                .functions
                                .get(&method.function.id.0)
                                .map_or(TypeId::ANY, |entry| {
                                    self.interner.eliminate_vars(entry.return_type)
                                });
                            let target = if method.is_static {
                                &mut static_props
                            } else {
                                &mut instance_props
                            };
                            push_prop(target, PropertyInfo::new(atom, value));
                        }
                        ClassMethodKind::Set => {}
                        ClassMethodKind::Method => {
                            let target = if method.is_static {
                                &mut static_props
                            } else {
                                &mut instance_props
                            };
                            push_prop(target, PropertyInfo::new(atom, ty));
                        }
                    }
                    if ctx.mode == Mode::Extract {
                        self.annotate(
                            method.key.span(),
                            "MethodDefinition",
                            Some(method_name.to_string()),
                            ty,
                            AnnotationKind::Method,
                        );
                        self.emit_function_parameter_annotations(&method.function);
                    }
                }
                ClassMember::Field(field) => {
                    let value = match &field.value {
                        Some(init) => self.infer_expr(init, state, ctx),
                        None => TypeId::UNDEFINED,
                    };
                    let Some(field_name) = field.key.static_name() else {
                        continue;
                    };
                    let atom = self.interner.intern_string(field_name);
                    let target = if field.is_static {
                        &mut static_props
                    } else {
                        &mut instance_props
                    };
                    push_prop(target, PropertyInfo::new(atom, value));
                    if ctx.mode == Mode::Extract {
                        self.annotate(
                            field.key.span(),
                            "PropertyDefinition",
                            Some(field_name.to_string()),
                            value,
                            AnnotationKind::Field,
                        );
                    }
                }
            }
        }

        // Fields assigned on `this` in the constructor
        if let Some(key) = ctor_key
            && let Some(entry) = self.functions.get(&key)
        {
            for prop in entry.this_props.clone() {
                push_prop(&mut instance_props, prop);
            }
        }

        let instance = self.interner.object_shape(ObjectShape {
            props: instance_props,
            proto,
            sealed: false,
            frozen: false,
            open: false,
        });
        self.class_instances.insert(class.id.0, instance);

        let ctor = ctor.unwrap_or_else(|| {
            self.interner.function(FunctionShape {
                decl: class.id.0,
                params: Vec::new(),
                return_type: TypeId::UNDEFINED,
                is_async: false,
                is_generator: false,
                captures: Vec::new(),
            })
        });

        let class_ty = self.interner.class(ClassShape {
            name: name_atom,
            decl: class.id.0,
            ctor,
            instance,
            statics: static_props,
            super_class,
        });
        self.classes.insert(name_atom, class_ty);

        if ctx.mode == Mode::Extract {
            let span = class.name.as_ref().map_or(class.span, |n| n.span);
            self.annotate(
                span,
                "ClassDeclaration",
                Some(class_name),
                class_ty,
                AnnotationKind::Class,
            );
        }
        class_ty
    }

    // =========================================================================
    // Annotation helpers
    // =========================================================================

    /// Function, return, and parameter annotations for one function,
    /// emitted at its declaration site during extraction.
    pub(crate) fn emit_function_annotations(
        &mut self,
        function: &'a Function,
        kind: AnnotationKind,
    ) {
        let key = function.id.0;
        let ty = self
            .functions
            .get(&key)
            .map_or(TypeId::ANY, |entry| entry.type_id);
        let name = function.name.as_ref().map(|n| n.name.clone());
        let span = function.name.as_ref().map_or(function.span, |n| n.span);
        let node_kind = if function.is_arrow {
            "ArrowFunction"
        } else {
            "FunctionDeclaration"
        };
        self.annotate(span, node_kind, name.clone(), ty, kind);

        let return_type = self
            .functions
            .get(&key)
            .map_or(TypeId::UNDEFINED, |entry| entry.return_type);
        self.annotate(span, node_kind, name, return_type, AnnotationKind::Return);
        self.emit_function_parameter_annotations(function);
    }

    pub(crate) fn emit_function_parameter_annotations(&mut self, function: &'a Function) {
        let key = function.id.0;
        for (index, param) in function.params.iter().enumerate() {
            let ty = self.extracted_parameter_type(key, index, param);
            let name = primary_pattern_name(&param.pat);
            self.annotate(param.span, "Parameter", name, ty, AnnotationKind::Parameter);
        }
    }
}

fn push_prop(props: &mut Vec<PropertyInfo>, prop: PropertyInfo) {
    if let Some(existing) = props.iter_mut().find(|p| p.name == prop.name) {
        *existing = prop;
    } else {
        props.push(prop);
    }
}

pub(crate) fn binding_kind(kind: DeclKind) -> BindingKind {
    match kind {
        DeclKind::Var => BindingKind::Var,
        DeclKind::Let => BindingKind::Let,
        DeclKind::Const => BindingKind::Const,
    }
}

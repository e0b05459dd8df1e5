//! Expression inference.
//!
//! Pure with respect to the block state except for assignments, which
//! update it in place (they are the only expressions with a state
//! effect). Anything the engine cannot prove degrades to `any` with a
//! reason string, never to silent unsoundness.

use crate::annotate::AnnotationKind;
use crate::env::BindingKind;
use crate::lattice::join;
use crate::narrow::{condition_predicates, narrow_nullish, narrow_truthy, narrow_type};
use crate::solver::{BodyCtx, GlobalSolver, Mode, ThisCtx};
use crate::state::TypeState;
use crate::subtype::unfold;
use crate::types::{ObjectShape, PropertyInfo, TypeData, TypeId};
use tyin_common::{Atom, Span};
use tyin_parser::ast::*;

impl<'a> GlobalSolver<'a> {
    pub(crate) fn infer_expr(
        &mut self,
        expr: &'a Expr,
        state: &mut TypeState,
        ctx: &mut BodyCtx,
    ) -> TypeId {
        match expr {
            Expr::Number(lit) => self.interner.literal_number(lit.value),
            Expr::String(lit) => self.interner.literal_string(&lit.value),
            Expr::BigInt(lit) => self.interner.literal_bigint(&lit.value),
            Expr::Boolean(lit) => self.interner.literal_boolean(lit.value),
            Expr::Null(_) => TypeId::NULL,
            Expr::Undefined(_) => TypeId::UNDEFINED,
            Expr::Ident(ident) => self.lookup_name(&ident.name, ident.span, state, ctx),
            Expr::This(_) => self.this_type(ctx),
            Expr::Array(array) => self.infer_array(array, state, ctx),
            Expr::Object(object) => self.infer_object(object, state, ctx),
            Expr::Member(member) => {
                let object_ty = self.infer_expr(&member.object, state, ctx);
                let atom = self.interner.intern_string(&member.property.name);
                if member.optional {
                    let non_nullish = narrow_nullish(self.interner, object_ty, true, false);
                    let accessed =
                        self.member_type(non_nullish, atom, &member.property.name, member.span, ctx);
                    self.interner.union2(accessed, TypeId::UNDEFINED)
                } else {
                    self.member_type(object_ty, atom, &member.property.name, member.span, ctx)
                }
            }
            Expr::Index(index) => self.infer_index(index, state, ctx),
            Expr::Call(call) => self.infer_call(call, state, ctx),
            Expr::New(new_expr) => self.infer_new(new_expr, state, ctx),
            Expr::Unary(unary) => self.infer_unary(unary, state, ctx),
            Expr::Update(update) => {
                if let Expr::Ident(ident) = &update.argument {
                    self.assign_ident(&ident.name, ident.span, TypeId::NUMBER, state, ctx);
                } else {
                    self.infer_expr(&update.argument, state, ctx);
                }
                TypeId::NUMBER
            }
            Expr::Binary(binary) => self.infer_binary(binary, state, ctx),
            Expr::Logical(logical) => self.infer_logical(logical, state, ctx),
            Expr::Assign(assign) => self.infer_assign(assign, state, ctx),
            Expr::Cond(cond) => self.infer_cond(cond, state, ctx),
            Expr::Function(function) | Expr::Arrow(function) => {
                let ty = self.register_function(function, state, ctx, ThisCtx::Free);
                if ctx.mode == Mode::Extract {
                    self.emit_function_annotations(function, AnnotationKind::Function);
                }
                ty
            }
            Expr::Class(class) => self.analyze_class(class, state, ctx),
            Expr::Seq(seq) => {
                let mut last = TypeId::UNDEFINED;
                for e in &seq.exprs {
                    last = self.infer_expr(e, state, ctx);
                }
                last
            }
            Expr::Await(await_expr) => {
                let value = self.infer_expr(&await_expr.argument, state, ctx);
                self.unwrap_promise(value)
            }
            Expr::Yield(yield_expr) => {
                if let Some(argument) = &yield_expr.argument {
                    self.infer_expr(argument, state, ctx);
                }
                self.interner.any_with_reason("yield-input")
            }
        }
    }

    // =========================================================================
    // Names
    // =========================================================================

    pub(crate) fn lookup_name(
        &mut self,
        name: &str,
        span: Span,
        state: &mut TypeState,
        ctx: &mut BodyCtx,
    ) -> TypeId {
        let atom = self.interner.intern_string(name);
        if let Some(ty) = state.get(atom) {
            return ty;
        }
        if let Some(binding) = ctx.env.lookup(atom) {
            // Declared but not yet flowed-to (a sibling branch, or the
            // temporal dead zone): reads yield undefined
            let kind = binding.kind;
            let initialized = binding.initialized;
            if kind == BindingKind::Const && !initialized && ctx.mode == Mode::Extract {
                self.error(
                    format!("Constant '{name}' is used before being assigned"),
                    span,
                );
            }
            return TypeId::UNDEFINED;
        }
        if let Some(ty) = ctx.closure.get(atom) {
            ctx.record_capture(atom);
            return ty;
        }
        if ctx.mode == Mode::Extract {
            self.error(format!("Cannot find name '{name}'"), span);
        }
        self.interner.any_with_reason(&format!("unbound:{name}"))
    }

    fn this_type(&mut self, ctx: &mut BodyCtx) -> TypeId {
        match ctx.this_ctx {
            ThisCtx::Instance(decl) => self
                .class_instances
                .get(&decl)
                .copied()
                .unwrap_or_else(|| self.interner.any_with_reason("this-forward")),
            ThisCtx::Free => {
                let props = ctx
                    .this_props
                    .iter()
                    .map(|(name, ty)| PropertyInfo::new(*name, *ty))
                    .collect();
                self.interner.object_shape(ObjectShape {
                    props,
                    proto: None,
                    sealed: false,
                    frozen: false,
                    open: true,
                })
            }
        }
    }

    // =========================================================================
    // Member access
    // =========================================================================

    /// Field lookup without diagnostics, used by destructuring and
    /// union access. Walks prototype chains; `None` means the field is
    /// provably absent.
    pub(crate) fn member_type_quiet(&self, ty: TypeId, atom: Atom) -> Option<TypeId> {
        match self.interner.lookup(ty)? {
            TypeData::Any { .. } | TypeData::Unknown | TypeData::Var(_) => Some(TypeId::ANY),
            TypeData::Object(shape) => {
                if let Some(prop) = shape.field(atom) {
                    return Some(prop.ty);
                }
                if let Some(proto) = shape.proto {
                    if let Some(found) = self.member_type_quiet(proto, atom) {
                        return Some(found);
                    }
                }
                if shape.open {
                    Some(self.interner.any_with_reason("dynamic-key"))
                } else {
                    None
                }
            }
            TypeData::Recursive { .. } => {
                let unfolded = unfold(self.interner, ty);
                if unfolded == ty {
                    None
                } else {
                    self.member_type_quiet(unfolded, atom)
                }
            }
            TypeData::Union(members) => {
                let mut results = Vec::new();
                for member in members {
                    results.push(self.member_type_quiet(member, atom)?);
                }
                Some(self.interner.union(results))
            }
            TypeData::Class(shape) => shape
                .statics
                .iter()
                .find(|p| p.name == atom)
                .map(|p| p.ty),
            _ => None,
        }
    }

    /// Member access with diagnostics.
    pub(crate) fn member_type(
        &mut self,
        object_ty: TypeId,
        atom: Atom,
        name: &str,
        span: Span,
        ctx: &mut BodyCtx,
    ) -> TypeId {
        let Some(data) = self.interner.lookup(object_ty) else {
            return TypeId::ANY;
        };
        match data {
            TypeData::Any { .. } | TypeData::Unknown | TypeData::Var(_) => TypeId::ANY,
            TypeData::Null | TypeData::Undefined => {
                if ctx.mode == Mode::Extract {
                    let shown = crate::types::type_to_string(self.interner, object_ty);
                    self.error(
                        format!("Property '{name}' does not exist on type '{shown}'"),
                        span,
                    );
                }
                self.interner.any_with_reason("missing-property")
            }
            TypeData::Object(_) | TypeData::Recursive { .. } | TypeData::Union(_) => {
                match self.member_type_quiet(object_ty, atom) {
                    Some(found) => found,
                    None => {
                        if ctx.mode == Mode::Extract {
                            let shown = crate::types::type_to_string(self.interner, object_ty);
                            self.error(
                                format!("Property '{name}' does not exist on type '{shown}'"),
                                span,
                            );
                        }
                        self.interner.any_with_reason("missing-property")
                    }
                }
            }
            TypeData::Array(_) => {
                if name == "length" {
                    TypeId::NUMBER
                } else {
                    self.interner.any_with_reason("array-member")
                }
            }
            TypeData::Tuple(elements) => {
                if name == "length" {
                    let length = elements.len() as f64;
                    self.interner.literal_number(length)
                } else {
                    self.interner.any_with_reason("array-member")
                }
            }
            TypeData::String | TypeData::Literal(crate::types::LiteralValue::String(_)) => {
                if name == "length" {
                    TypeId::NUMBER
                } else {
                    self.interner.any_with_reason("string-member")
                }
            }
            TypeData::Class(shape) => shape
                .statics
                .iter()
                .find(|p| p.name == atom)
                .map_or_else(|| self.interner.any_with_reason("class-member"), |p| p.ty),
            TypeData::Function(_) => self.interner.any_with_reason("function-member"),
            TypeData::Promise(_) => self.interner.any_with_reason("promise-member"),
            _ => self.interner.any_with_reason("primitive-member"),
        }
    }

    fn infer_index(&mut self, index: &'a IndexExpr, state: &mut TypeState, ctx: &mut BodyCtx) -> TypeId {
        let object_ty = self.infer_expr(&index.object, state, ctx);
        let index_ty = self.infer_expr(&index.index, state, ctx);
        match self.interner.lookup(object_ty) {
            Some(TypeData::Array(element)) => element,
            Some(TypeData::Tuple(elements)) => {
                if let Some(TypeData::Literal(crate::types::LiteralValue::Number(n))) =
                    self.interner.lookup(index_ty)
                {
                    let position = n.0 as usize;
                    return elements
                        .get(position)
                        .copied()
                        .unwrap_or(TypeId::UNDEFINED);
                }
                self.interner.union(elements)
            }
            Some(TypeData::Object(_)) => {
                if let Some(TypeData::Literal(crate::types::LiteralValue::String(atom))) =
                    self.interner.lookup(index_ty)
                {
                    let name = self.interner.resolve_atom(atom);
                    return self.member_type(object_ty, atom, &name, index.span, ctx);
                }
                self.interner.any_with_reason("dynamic-key")
            }
            Some(TypeData::String | TypeData::Literal(crate::types::LiteralValue::String(_))) => {
                TypeId::STRING
            }
            Some(TypeData::Any { .. } | TypeData::Unknown | TypeData::Var(_)) => TypeId::ANY,
            _ => self.interner.any_with_reason("dynamic-key"),
        }
    }

    // =========================================================================
    // Literals with structure
    // =========================================================================

    fn infer_array(&mut self, array: &'a ArrayLit, state: &mut TypeState, ctx: &mut BodyCtx) -> TypeId {
        let mut elements = Vec::with_capacity(array.elements.len());
        let mut spread_elements = Vec::new();
        let mut tuple_shape = true;
        for element in &array.elements {
            match element {
                None => elements.push(TypeId::UNDEFINED),
                Some(ArrayElement::Expr(e)) => elements.push(self.infer_expr(e, state, ctx)),
                Some(ArrayElement::Spread(spread)) => {
                    let value = self.infer_expr(&spread.argument, state, ctx);
                    spread_elements.push(self.element_type(value));
                    tuple_shape = false;
                }
            }
        }
        if tuple_shape && elements.len() <= self.options.tuple_cap {
            return self.interner.tuple(elements);
        }
        let mut joined = TypeId::NEVER;
        for ty in elements.into_iter().chain(spread_elements) {
            joined = join(self.interner, joined, ty);
        }
        self.interner.array(joined)
    }

    fn infer_object(&mut self, object: &'a ObjectLit, state: &mut TypeState, ctx: &mut BodyCtx) -> TypeId {
        let mut props: Vec<PropertyInfo> = Vec::new();
        let mut open = false;
        let mut push = |props: &mut Vec<PropertyInfo>, prop: PropertyInfo| {
            if let Some(existing) = props.iter_mut().find(|p| p.name == prop.name) {
                *existing = prop;
            } else {
                props.push(prop);
            }
        };

        for property in &object.properties {
            match property {
                ObjectProperty::KeyValue { key, value, .. } => {
                    let value_ty = self.infer_expr(value, state, ctx);
                    match key.static_name() {
                        Some(name) => {
                            let atom = self.interner.intern_string(name);
                            push(&mut props, PropertyInfo::new(atom, value_ty));
                        }
                        None => {
                            // Computed or numeric key: the record stays
                            // open and the key expression is still
                            // evaluated for its effects
                            if let PropKey::Computed(key_expr) = key {
                                self.infer_expr(key_expr, state, ctx);
                            }
                            open = true;
                        }
                    }
                }
                ObjectProperty::Shorthand(ident) => {
                    let value_ty = self.lookup_name(&ident.name, ident.span, state, ctx);
                    let atom = self.interner.intern_string(&ident.name);
                    push(&mut props, PropertyInfo::new(atom, value_ty));
                }
                ObjectProperty::Method {
                    key,
                    kind,
                    function,
                    ..
                } => {
                    let ty = self.register_function(function, state, ctx, ThisCtx::Free);
                    if ctx.mode == Mode::Extract {
                        self.emit_function_annotations(function, AnnotationKind::Function);
                    }
                    let Some(name) = key.static_name() else {
                        open = true;
                        continue;
                    };
                    let atom = self.interner.intern_string(name);
                    match kind {
                        MethodKind::Get => {
                            let value = self
                                .functions
                                .get(&function.id.0)
                                .map_or(TypeId::ANY, |entry| entry.return_type);
                            let value = self.interner.eliminate_vars(value);
                            push(&mut props, PropertyInfo::new(atom, value));
                        }
                        MethodKind::Set => {}
                        MethodKind::Method => push(&mut props, PropertyInfo::new(atom, ty)),
                    }
                }
                ObjectProperty::Spread(spread) => {
                    let value = self.infer_expr(&spread.argument, state, ctx);
                    match self.interner.lookup(value) {
                        Some(TypeData::Object(shape)) => {
                            for prop in &shape.props {
                                push(&mut props, prop.clone());
                            }
                            open |= shape.open;
                        }
                        _ => open = true,
                    }
                }
            }
        }
        self.interner.object_shape(ObjectShape {
            props,
            proto: None,
            sealed: false,
            frozen: false,
            open,
        })
    }

    // =========================================================================
    // Calls
    // =========================================================================

    fn infer_arguments(
        &mut self,
        arguments: &'a [Argument],
        state: &mut TypeState,
        ctx: &mut BodyCtx,
    ) -> Vec<TypeId> {
        arguments
            .iter()
            .map(|argument| match argument {
                Argument::Expr(e) => self.infer_expr(e, state, ctx),
                Argument::Spread(spread) => {
                    let value = self.infer_expr(&spread.argument, state, ctx);
                    self.element_type(value)
                }
            })
            .collect()
    }

    fn infer_call(&mut self, call: &'a CallExpr, state: &mut TypeState, ctx: &mut BodyCtx) -> TypeId {
        let callee_ty = self.infer_expr(&call.callee, state, ctx);
        let args = self.infer_arguments(&call.arguments, state, ctx);
        let result = self.call_result(callee_ty, &args, call.span, ctx);
        if call.optional {
            self.interner.union2(result, TypeId::UNDEFINED)
        } else {
            result
        }
    }

    fn call_result(
        &mut self,
        callee_ty: TypeId,
        args: &[TypeId],
        span: Span,
        ctx: &mut BodyCtx,
    ) -> TypeId {
        match self.interner.lookup(callee_ty) {
            Some(TypeData::Function(shape)) => {
                if ctx.mode == Mode::Analyze {
                    self.record_call(shape.decl, args);
                }
                // Prefer the registry's fresh view over the possibly
                // stale interned shape
                match self.functions.get(&shape.decl) {
                    Some(entry) => self.interner.eliminate_vars(entry.return_type),
                    None => shape.return_type,
                }
            }
            Some(TypeData::Class(shape)) => {
                if ctx.mode == Mode::Extract {
                    let name = self.interner.resolve_atom(shape.name);
                    self.error(
                        format!("Class constructor '{name}' cannot be invoked without 'new'"),
                        span,
                    );
                }
                self.interner.any_with_reason("class-call")
            }
            Some(TypeData::Union(members)) => {
                let mut result = TypeId::NEVER;
                for member in members {
                    let member_result = self.call_result(member, args, span, ctx);
                    result = join(self.interner, result, member_result);
                }
                result
            }
            _ => self.interner.any_with_reason("unknown-callee"),
        }
    }

    fn infer_new(&mut self, new_expr: &'a NewExpr, state: &mut TypeState, ctx: &mut BodyCtx) -> TypeId {
        let callee_ty = self.infer_expr(&new_expr.callee, state, ctx);
        let args = self.infer_arguments(&new_expr.arguments, state, ctx);
        match self.interner.lookup(callee_ty) {
            Some(TypeData::Class(shape)) => {
                if ctx.mode == Mode::Analyze
                    && let Some(TypeData::Function(ctor)) = self.interner.lookup(shape.ctor)
                {
                    self.record_call(ctor.decl, &args);
                }
                // The registry's instance is fresher than the interned
                // shape after re-analysis rounds
                self.class_instances
                    .get(&shape.decl)
                    .copied()
                    .unwrap_or(shape.instance)
            }
            Some(TypeData::Function(shape)) => {
                if ctx.mode == Mode::Analyze {
                    self.record_call(shape.decl, &args);
                }
                // `new` on a plain function produces its `this`-record
                match self.functions.get(&shape.decl) {
                    Some(entry) => self.interner.object(entry.this_props.clone()),
                    None => self.interner.object(Vec::new()),
                }
            }
            _ => self.interner.any_with_reason("unknown-callee"),
        }
    }

    // =========================================================================
    // Operators
    // =========================================================================

    fn infer_unary(&mut self, unary: &'a UnaryExpr, state: &mut TypeState, ctx: &mut BodyCtx) -> TypeId {
        let argument = self.infer_expr(&unary.argument, state, ctx);
        match unary.op {
            UnaryOp::Typeof => TypeId::STRING,
            UnaryOp::Void => TypeId::UNDEFINED,
            UnaryOp::Delete => TypeId::BOOLEAN,
            UnaryOp::Not => TypeId::BOOLEAN,
            UnaryOp::Minus => {
                if let Some(TypeData::Literal(crate::types::LiteralValue::Number(n))) =
                    self.interner.lookup(argument)
                {
                    self.interner.literal_number(-n.0)
                } else {
                    TypeId::NUMBER
                }
            }
            UnaryOp::Plus | UnaryOp::Tilde => TypeId::NUMBER,
        }
    }

    fn infer_binary(&mut self, binary: &'a BinaryExpr, state: &mut TypeState, ctx: &mut BodyCtx) -> TypeId {
        let left = self.infer_expr(&binary.left, state, ctx);
        let right = self.infer_expr(&binary.right, state, ctx);
        match binary.op {
            BinaryOp::Add => self.add_result(left, right),
            BinaryOp::Sub
            | BinaryOp::Mul
            | BinaryOp::Div
            | BinaryOp::Rem
            | BinaryOp::Exp
            | BinaryOp::BitAnd
            | BinaryOp::BitOr
            | BinaryOp::BitXor
            | BinaryOp::Shl
            | BinaryOp::Shr
            | BinaryOp::UShr => {
                if self.is_kind(left, TypeId::BIGINT) && self.is_kind(right, TypeId::BIGINT) {
                    TypeId::BIGINT
                } else {
                    TypeId::NUMBER
                }
            }
            BinaryOp::Lt
            | BinaryOp::Gt
            | BinaryOp::Le
            | BinaryOp::Ge
            | BinaryOp::EqEq
            | BinaryOp::NotEq
            | BinaryOp::EqEqEq
            | BinaryOp::NotEqEq
            | BinaryOp::In
            | BinaryOp::Instanceof => TypeId::BOOLEAN,
        }
    }

    /// `+`: number when both sides are provably numeric, string when
    /// either side is a string, `number | string` otherwise.
    fn add_result(&self, left: TypeId, right: TypeId) -> TypeId {
        let left_number = self.is_kind(left, TypeId::NUMBER);
        let right_number = self.is_kind(right, TypeId::NUMBER);
        if left_number && right_number {
            return TypeId::NUMBER;
        }
        if self.is_kind(left, TypeId::BIGINT) && self.is_kind(right, TypeId::BIGINT) {
            return TypeId::BIGINT;
        }
        if self.is_kind(left, TypeId::STRING) || self.is_kind(right, TypeId::STRING) {
            return TypeId::STRING;
        }
        self.interner.union2(TypeId::NUMBER, TypeId::STRING)
    }

    fn is_kind(&self, ty: TypeId, kind: TypeId) -> bool {
        match self.interner.lookup(ty) {
            Some(data) => data.primitive_kind() == Some(kind),
            None => false,
        }
    }

    fn infer_logical(&mut self, logical: &'a LogicalExpr, state: &mut TypeState, ctx: &mut BodyCtx) -> TypeId {
        let left = self.infer_expr(&logical.left, state, ctx);
        let (kept, assume) = match logical.op {
            // `a && b` yields b when a is truthy, else the falsy
            // residue of a
            LogicalOp::And => (narrow_truthy(self.interner, left, false), true),
            LogicalOp::Or => (narrow_truthy(self.interner, left, true), false),
            LogicalOp::Nullish => (narrow_nullish(self.interner, left, true, false), false),
        };

        // The right side evaluates under what the left side proved
        let mut branch_state = state.clone();
        match logical.op {
            LogicalOp::Nullish => {
                if let Expr::Ident(ident) = &logical.left {
                    let atom = self.interner.intern_string(&ident.name);
                    if let Some(current) = branch_state.get(atom) {
                        branch_state
                            .set(atom, narrow_nullish(self.interner, current, true, true));
                    }
                }
            }
            _ => {
                self.apply_condition(&logical.left, assume, &mut branch_state, ctx);
            }
        }
        let right = self.infer_expr(&logical.right, &mut branch_state, ctx);
        // Assignments on the right were conditional
        state.join_from(self.interner, &branch_state, |_, _, _| None);
        join(self.interner, kept, right)
    }

    fn infer_cond(&mut self, cond: &'a CondExpr, state: &mut TypeState, ctx: &mut BodyCtx) -> TypeId {
        self.infer_expr(&cond.test, state, ctx);

        let mut true_state = state.clone();
        self.apply_condition(&cond.test, true, &mut true_state, ctx);
        let consequent = self.infer_expr(&cond.consequent, &mut true_state, ctx);

        let mut false_state = state.clone();
        self.apply_condition(&cond.test, false, &mut false_state, ctx);
        let alternate = self.infer_expr(&cond.alternate, &mut false_state, ctx);

        state.join_from(self.interner, &true_state, |_, _, _| None);
        state.join_from(self.interner, &false_state, |_, _, _| None);
        join(self.interner, consequent, alternate)
    }

    /// Narrow a state copy under a condition's proven facts.
    fn apply_condition(&self, condition: &Expr, assume: bool, state: &mut TypeState, ctx: &BodyCtx) {
        for predicate in condition_predicates(self.interner, condition, assume) {
            let name = predicate.target();
            let current = state.get(name).or_else(|| ctx.closure.get(name));
            if let Some(current_ty) = current {
                let narrowed = narrow_type(self.interner, current_ty, &predicate, &|atom| {
                    self.classes
                        .get(&atom)
                        .and_then(|class_ty| match self.interner.lookup(*class_ty) {
                            Some(TypeData::Class(shape)) => Some(shape.instance),
                            _ => None,
                        })
                });
                state.set(name, narrowed);
            }
        }
    }

    // =========================================================================
    // Assignment
    // =========================================================================

    fn infer_assign(&mut self, assign: &'a AssignExpr, state: &mut TypeState, ctx: &mut BodyCtx) -> TypeId {
        let value = match assign.op {
            AssignOp::Assign => self.infer_expr(&assign.value, state, ctx),
            AssignOp::AndAssign | AssignOp::OrAssign | AssignOp::NullishAssign => {
                let current = self.read_target(&assign.target, state, ctx);
                let rhs = self.infer_expr(&assign.value, state, ctx);
                let kept = match assign.op {
                    AssignOp::AndAssign => narrow_truthy(self.interner, current, false),
                    AssignOp::OrAssign => narrow_truthy(self.interner, current, true),
                    _ => narrow_nullish(self.interner, current, true, false),
                };
                join(self.interner, kept, rhs)
            }
            AssignOp::Add => {
                let current = self.read_target(&assign.target, state, ctx);
                let rhs = self.infer_expr(&assign.value, state, ctx);
                self.add_result(current, rhs)
            }
            _ => {
                let current = self.read_target(&assign.target, state, ctx);
                let rhs = self.infer_expr(&assign.value, state, ctx);
                if self.is_kind(current, TypeId::BIGINT) && self.is_kind(rhs, TypeId::BIGINT) {
                    TypeId::BIGINT
                } else {
                    TypeId::NUMBER
                }
            }
        };

        match &assign.target {
            AssignTarget::Ident(ident) => {
                self.assign_ident(&ident.name, ident.span, value, state, ctx);
            }
            AssignTarget::Member(member) => {
                self.assign_member(member, value, state, ctx);
            }
            AssignTarget::Index(index) => {
                self.assign_index(index, value, state, ctx);
            }
            AssignTarget::Pattern(pat) => {
                self.assign_pattern(pat, value, state, ctx);
            }
        }
        value
    }

    fn read_target(&mut self, target: &'a AssignTarget, state: &mut TypeState, ctx: &mut BodyCtx) -> TypeId {
        match target {
            AssignTarget::Ident(ident) => self.lookup_name(&ident.name, ident.span, state, ctx),
            AssignTarget::Member(member) => {
                let object_ty = self.infer_expr(&member.object, state, ctx);
                let atom = self.interner.intern_string(&member.property.name);
                self.member_type_quiet(object_ty, atom).unwrap_or(TypeId::ANY)
            }
            AssignTarget::Index(_) | AssignTarget::Pattern(_) => TypeId::ANY,
        }
    }

    /// `o.k = v`. `this.k` accumulates into the this-record; a simple
    /// variable holding a record gets a strong field update.
    fn assign_member(
        &mut self,
        member: &'a MemberExpr,
        value: TypeId,
        state: &mut TypeState,
        ctx: &mut BodyCtx,
    ) {
        let atom = self.interner.intern_string(&member.property.name);

        if let Expr::This(_) = &member.object {
            let merged = match ctx.this_props.get(&atom) {
                Some(existing) => join(self.interner, *existing, value),
                None => value,
            };
            ctx.this_props.insert(atom, merged);
            if ctx.mode == Mode::Extract {
                self.annotate(
                    member.property.span,
                    "PropertyAssignment",
                    Some(member.property.name.clone()),
                    merged,
                    AnnotationKind::Property,
                );
            }
            return;
        }

        let object_ty = self.infer_expr(&member.object, state, ctx);
        if let Expr::Ident(object_ident) = &member.object
            && let Some(TypeData::Object(shape)) = self.interner.lookup(object_ty)
        {
            let has_field = shape.field(atom).is_some();
            if shape.frozen {
                if ctx.mode == Mode::Extract {
                    self.error(
                        format!(
                            "Cannot assign to read-only property '{}'",
                            member.property.name
                        ),
                        member.span,
                    );
                }
                return;
            }
            if !has_field && shape.sealed {
                if ctx.mode == Mode::Extract {
                    self.error(
                        format!(
                            "Cannot add property '{}' to a sealed object",
                            member.property.name
                        ),
                        member.span,
                    );
                }
                return;
            }
            let mut props = shape.props.clone();
            match props.iter_mut().find(|p| p.name == atom) {
                Some(prop) => prop.ty = value,
                None => props.push(PropertyInfo::new(atom, value)),
            }
            let updated = self.interner.object_shape(ObjectShape { props, ..*shape });
            self.assign_ident(&object_ident.name, object_ident.span, updated, state, ctx);
        }
    }

    fn assign_index(
        &mut self,
        index: &'a IndexExpr,
        value: TypeId,
        state: &mut TypeState,
        ctx: &mut BodyCtx,
    ) {
        let object_ty = self.infer_expr(&index.object, state, ctx);
        self.infer_expr(&index.index, state, ctx);
        if let Expr::Ident(object_ident) = &index.object {
            match self.interner.lookup(object_ty) {
                Some(TypeData::Array(element)) => {
                    let widened = join(self.interner, element, value);
                    let updated = self.interner.array(widened);
                    self.assign_ident(&object_ident.name, object_ident.span, updated, state, ctx);
                }
                Some(TypeData::Tuple(elements)) => {
                    // Element updates lose the tuple refinement
                    let mut joined = value;
                    for element in elements {
                        joined = join(self.interner, joined, element);
                    }
                    let updated = self.interner.array(joined);
                    self.assign_ident(&object_ident.name, object_ident.span, updated, state, ctx);
                }
                _ => {}
            }
        }
    }

    fn unwrap_promise(&self, ty: TypeId) -> TypeId {
        match self.interner.lookup(ty) {
            Some(TypeData::Promise(resolved)) => resolved,
            Some(TypeData::Union(members)) => {
                let unwrapped = members.iter().map(|m| self.unwrap_promise(*m)).collect();
                self.interner.union(unwrapped)
            }
            _ => ty,
        }
    }
}

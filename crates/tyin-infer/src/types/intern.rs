//! Structural type interning.
//!
//! The `TypeInterner` deduplicates types by structure: interning the
//! same `TypeData` twice yields the same `TypeId`, so equality checks
//! are id comparisons. Intrinsics are pre-registered at fixed ids.
//!
//! The interner also owns the string interner for identifiers and
//! property names, and the solver's type variable table. The variable
//! counter restarts with each fresh interner, which is what gives a
//! top-level `infer` call deterministic variable numbering.

use super::def::*;
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use tyin_common::limits::MAX_UNION_MEMBERS;
use tyin_common::{Atom, Interner};

pub struct TypeInterner {
    types: RefCell<Vec<TypeData>>,
    dedup: RefCell<FxHashMap<TypeData, TypeId>>,
    vars: RefCell<Vec<VarData>>,
    strings: Interner,
}

impl TypeInterner {
    pub fn new() -> Self {
        let interner = TypeInterner {
            types: RefCell::new(Vec::new()),
            dedup: RefCell::new(FxHashMap::default()),
            vars: RefCell::new(Vec::new()),
            strings: Interner::new(),
        };
        // Seed intrinsics in TypeId order
        let intrinsics = [
            TypeData::Any { reason: None },
            TypeData::Unknown,
            TypeData::Never,
            TypeData::Undefined,
            TypeData::Null,
            TypeData::Boolean,
            TypeData::Number,
            TypeData::String,
            TypeData::BigInt,
            TypeData::Symbol,
        ];
        for data in intrinsics {
            interner.intern(data);
        }
        interner
    }

    // =========================================================================
    // Interning
    // =========================================================================

    /// Intern a type, returning its id. Structurally equal types get
    /// the same id.
    pub fn intern(&self, data: TypeData) -> TypeId {
        if let Some(&existing) = self.dedup.borrow().get(&data) {
            return existing;
        }
        let mut types = self.types.borrow_mut();
        let id = TypeId(u32::try_from(types.len()).unwrap_or(u32::MAX));
        types.push(data.clone());
        self.dedup.borrow_mut().insert(data, id);
        id
    }

    /// Look up the data for a type id.
    pub fn lookup(&self, id: TypeId) -> Option<TypeData> {
        self.types.borrow().get(id.0 as usize).cloned()
    }

    /// Intern a string, returning its atom.
    pub fn intern_string(&self, s: &str) -> Atom {
        self.strings.intern(s)
    }

    /// Resolve an atom back to its string.
    pub fn resolve_atom(&self, atom: Atom) -> String {
        self.strings.resolve(atom)
    }

    // =========================================================================
    // Factories
    // =========================================================================

    pub fn literal_string(&self, value: &str) -> TypeId {
        let atom = self.intern_string(value);
        self.intern(TypeData::Literal(LiteralValue::String(atom)))
    }

    pub fn literal_number(&self, value: f64) -> TypeId {
        self.intern(TypeData::Literal(LiteralValue::Number(OrderedFloat(value))))
    }

    pub fn literal_bigint(&self, digits: &str) -> TypeId {
        let atom = self.intern_string(digits);
        self.intern(TypeData::Literal(LiteralValue::BigInt(atom)))
    }

    pub fn literal_boolean(&self, value: bool) -> TypeId {
        self.intern(TypeData::Literal(LiteralValue::Boolean(value)))
    }

    pub fn any_with_reason(&self, reason: &str) -> TypeId {
        let atom = self.intern_string(reason);
        self.intern(TypeData::Any {
            reason: Some(atom),
        })
    }

    pub fn array(&self, element: TypeId) -> TypeId {
        self.intern(TypeData::Array(element))
    }

    pub fn tuple(&self, elements: Vec<TypeId>) -> TypeId {
        self.intern(TypeData::Tuple(elements))
    }

    pub fn object(&self, props: Vec<PropertyInfo>) -> TypeId {
        self.intern(TypeData::Object(Box::new(ObjectShape::new(props))))
    }

    pub fn object_shape(&self, shape: ObjectShape) -> TypeId {
        self.intern(TypeData::Object(Box::new(shape)))
    }

    pub fn function(&self, shape: FunctionShape) -> TypeId {
        self.intern(TypeData::Function(Box::new(shape)))
    }

    pub fn class(&self, shape: ClassShape) -> TypeId {
        self.intern(TypeData::Class(Box::new(shape)))
    }

    pub fn promise(&self, resolved: TypeId) -> TypeId {
        self.intern(TypeData::Promise(resolved))
    }

    pub fn union2(&self, a: TypeId, b: TypeId) -> TypeId {
        self.union(vec![a, b])
    }

    pub fn union3(&self, a: TypeId, b: TypeId, c: TypeId) -> TypeId {
        self.union(vec![a, b, c])
    }

    /// Union construction policy: flatten one level, deduplicate by
    /// structural identity, collapse `any`, drop `never`, collapse
    /// singletons. Members are kept in canonical (id) order so that
    /// unions built from either operand order intern identically.
    pub fn union(&self, members: Vec<TypeId>) -> TypeId {
        let mut flat: Vec<TypeId> = Vec::with_capacity(members.len());
        let mut seen = rustc_hash::FxHashSet::default();
        for member in members {
            match self.lookup(member) {
                Some(TypeData::Union(inner)) => {
                    for id in inner {
                        if seen.insert(id) {
                            flat.push(id);
                        }
                    }
                }
                Some(TypeData::Any { .. }) => return member,
                Some(TypeData::Never) => {}
                _ => {
                    if seen.insert(member) {
                        flat.push(member);
                    }
                }
            }
        }

        // Drop literals that are subsumed by their unrefined primitive
        let primitives: rustc_hash::FxHashSet<TypeId> = flat
            .iter()
            .filter(|id| {
                matches!(
                    self.lookup(**id),
                    Some(
                        TypeData::Boolean
                            | TypeData::Number
                            | TypeData::String
                            | TypeData::BigInt
                    )
                )
            })
            .copied()
            .collect();
        if !primitives.is_empty() {
            flat.retain(|id| match self.lookup(*id) {
                Some(TypeData::Literal(lit)) => !primitives.contains(&lit.primitive()),
                _ => true,
            });
        }

        flat.sort_by_key(|id| id.0);
        match flat.len() {
            0 => TypeId::NEVER,
            1 => flat[0],
            n if n > MAX_UNION_MEMBERS => self.widen_oversized_union(flat),
            _ => self.intern(TypeData::Union(flat)),
        }
    }

    /// Oversized unions generalize literals to their primitives; if
    /// that is not enough the union collapses to `any`.
    fn widen_oversized_union(&self, members: Vec<TypeId>) -> TypeId {
        let mut widened: Vec<TypeId> = Vec::new();
        let mut seen = rustc_hash::FxHashSet::default();
        for member in members {
            let id = match self.lookup(member) {
                Some(TypeData::Literal(lit)) => lit.primitive(),
                _ => member,
            };
            if seen.insert(id) {
                widened.push(id);
            }
        }
        if widened.len() > MAX_UNION_MEMBERS {
            return self.any_with_reason("oversized-union");
        }
        widened.sort_by_key(|id| id.0);
        match widened.len() {
            0 => TypeId::NEVER,
            1 => widened[0],
            _ => self.intern(TypeData::Union(widened)),
        }
    }

    pub fn intersection(&self, members: Vec<TypeId>) -> TypeId {
        let mut flat: Vec<TypeId> = Vec::with_capacity(members.len());
        let mut seen = rustc_hash::FxHashSet::default();
        for member in members {
            match self.lookup(member) {
                Some(TypeData::Intersection(inner)) => {
                    for id in inner {
                        if seen.insert(id) {
                            flat.push(id);
                        }
                    }
                }
                Some(TypeData::Never) => return TypeId::NEVER,
                Some(TypeData::Any { .. } | TypeData::Unknown) => {}
                _ => {
                    if seen.insert(member) {
                        flat.push(member);
                    }
                }
            }
        }
        flat.sort_by_key(|id| id.0);
        match flat.len() {
            0 => TypeId::UNKNOWN,
            1 => flat[0],
            _ => self.intern(TypeData::Intersection(flat)),
        }
    }

    // =========================================================================
    // Type variables
    // =========================================================================

    /// Allocate a fresh type variable. Bounds start at the extremes and
    /// tighten as the solver observes uses.
    pub fn fresh_var(&self, polarity: Polarity, hint: &str) -> TypeId {
        let mut vars = self.vars.borrow_mut();
        let var_id = VarId(u32::try_from(vars.len()).unwrap_or(u32::MAX));
        vars.push(VarData {
            polarity,
            lower: TypeId::NEVER,
            upper: TypeId::ANY,
            hint: self.intern_string(hint),
        });
        drop(vars);
        self.intern(TypeData::Var(var_id))
    }

    pub fn var_data(&self, var: VarId) -> Option<VarData> {
        self.vars.borrow().get(var.0 as usize).cloned()
    }

    /// Raise a variable's lower bound. The upper bound is lifted along
    /// with it so that `lower <= upper` keeps holding.
    pub fn raise_lower_bound(&self, var: VarId, bound: TypeId, join: impl Fn(TypeId, TypeId) -> TypeId) {
        let mut vars = self.vars.borrow_mut();
        if let Some(data) = vars.get_mut(var.0 as usize) {
            let lower = data.lower;
            let upper = data.upper;
            drop(vars);
            let new_lower = join(lower, bound);
            let new_upper = if upper == TypeId::ANY {
                upper
            } else {
                join(upper, new_lower)
            };
            let mut vars = self.vars.borrow_mut();
            if let Some(data) = vars.get_mut(var.0 as usize) {
                data.lower = new_lower;
                data.upper = new_upper;
            }
        }
    }

    /// Substitute every type variable in `ty` by its bound: the lower
    /// bound when one was observed, the upper bound otherwise. Called
    /// before annotations leave the solver.
    pub fn eliminate_vars(&self, ty: TypeId) -> TypeId {
        self.eliminate_vars_guarded(ty, &mut Vec::new())
    }

    fn eliminate_vars_guarded(&self, ty: TypeId, in_progress: &mut Vec<TypeId>) -> TypeId {
        if in_progress.contains(&ty) {
            return TypeId::ANY;
        }
        let Some(data) = self.lookup(ty) else {
            return ty;
        };
        match data {
            TypeData::Var(var) => {
                let Some(data) = self.var_data(var) else {
                    return TypeId::ANY;
                };
                if data.lower != TypeId::NEVER {
                    in_progress.push(ty);
                    let result = self.eliminate_vars_guarded(data.lower, in_progress);
                    in_progress.pop();
                    result
                } else {
                    data.upper
                }
            }
            TypeData::Array(element) => {
                in_progress.push(ty);
                let element = self.eliminate_vars_guarded(element, in_progress);
                in_progress.pop();
                self.array(element)
            }
            TypeData::Tuple(elements) => {
                in_progress.push(ty);
                let elements = elements
                    .iter()
                    .map(|e| self.eliminate_vars_guarded(*e, in_progress))
                    .collect();
                in_progress.pop();
                self.tuple(elements)
            }
            TypeData::Object(shape) => {
                in_progress.push(ty);
                let props = shape
                    .props
                    .iter()
                    .map(|p| p.with_type(self.eliminate_vars_guarded(p.ty, in_progress)))
                    .collect();
                in_progress.pop();
                self.object_shape(ObjectShape {
                    props,
                    ..*shape.clone()
                })
            }
            TypeData::Function(shape) => {
                in_progress.push(ty);
                let params = shape
                    .params
                    .iter()
                    .map(|p| ParamInfo {
                        ty: self.eliminate_vars_guarded(p.ty, in_progress),
                        ..p.clone()
                    })
                    .collect();
                let return_type = self.eliminate_vars_guarded(shape.return_type, in_progress);
                in_progress.pop();
                self.function(FunctionShape {
                    params,
                    return_type,
                    ..*shape.clone()
                })
            }
            TypeData::Union(members) => {
                in_progress.push(ty);
                let members = members
                    .iter()
                    .map(|m| self.eliminate_vars_guarded(*m, in_progress))
                    .collect();
                in_progress.pop();
                self.union(members)
            }
            TypeData::Intersection(members) => {
                in_progress.push(ty);
                let members = members
                    .iter()
                    .map(|m| self.eliminate_vars_guarded(*m, in_progress))
                    .collect();
                in_progress.pop();
                self.intersection(members)
            }
            TypeData::Promise(resolved) => {
                in_progress.push(ty);
                let resolved = self.eliminate_vars_guarded(resolved, in_progress);
                in_progress.pop();
                self.promise(resolved)
            }
            _ => ty,
        }
    }

    /// Number of interned types (intrinsics included).
    pub fn len(&self) -> usize {
        self.types.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

//! Structural subtyping.
//!
//! Contravariant in function parameters, covariant in returns and
//! array elements. Record subtyping is width plus depth; sealed and
//! frozen records forbid width extension, so a sealed supertype
//! requires an exact field set.

use crate::types::{TypeData, TypeId, TypeInterner};
use rustc_hash::FxHashSet;
use tyin_common::Atom;

pub struct SubtypeChecker<'a> {
    interner: &'a TypeInterner,
    /// Pairs currently being checked; assumed true when re-entered
    /// (coinductive handling of recursive types).
    in_progress: FxHashSet<(TypeId, TypeId)>,
}

impl<'a> SubtypeChecker<'a> {
    pub fn new(interner: &'a TypeInterner) -> Self {
        SubtypeChecker {
            interner,
            in_progress: FxHashSet::default(),
        }
    }

    /// Check `a <= b`.
    pub fn is_subtype_of(&mut self, a: TypeId, b: TypeId) -> bool {
        if a == b {
            return true;
        }
        if !self.in_progress.insert((a, b)) {
            return true;
        }
        let result = self.check(a, b);
        self.in_progress.remove(&(a, b));
        result
    }

    fn check(&mut self, a: TypeId, b: TypeId) -> bool {
        let Some(data_a) = self.interner.lookup(a) else {
            return false;
        };
        let Some(data_b) = self.interner.lookup(b) else {
            return false;
        };

        // Extremes first
        if matches!(data_b, TypeData::Any { .. } | TypeData::Unknown) {
            return true;
        }
        if matches!(data_a, TypeData::Never) {
            return true;
        }
        if matches!(data_a, TypeData::Any { .. } | TypeData::Unknown) {
            return false;
        }

        // Recursive types unfold one level under the coinductive guard
        if let TypeData::Recursive { .. } = data_a {
            let unfolded = unfold(self.interner, a);
            return self.is_subtype_of(unfolded, b);
        }
        if let TypeData::Recursive { .. } = data_b {
            let unfolded = unfold(self.interner, b);
            return self.is_subtype_of(a, unfolded);
        }

        // Union / intersection structure
        if let TypeData::Union(members) = &data_a {
            return members.iter().all(|m| self.is_subtype_of(*m, b));
        }
        if let TypeData::Intersection(members) = &data_a {
            if members.iter().any(|m| self.is_subtype_of(*m, b)) {
                return true;
            }
        }
        if let TypeData::Union(members) = &data_b {
            return members.iter().any(|m| self.is_subtype_of(a, *m));
        }
        if let TypeData::Intersection(members) = &data_b {
            return members.iter().all(|m| self.is_subtype_of(a, *m));
        }

        match (&data_a, &data_b) {
            (TypeData::Literal(lit), _) if lit.primitive() == b => true,
            (TypeData::Tuple(elements_a), TypeData::Tuple(elements_b)) => {
                elements_a.len() == elements_b.len()
                    && elements_a
                        .iter()
                        .zip(elements_b.iter())
                        .all(|(ea, eb)| self.is_subtype_of(*ea, *eb))
            }
            (TypeData::Tuple(elements), TypeData::Array(element)) => {
                elements.iter().all(|e| self.is_subtype_of(*e, *element))
            }
            (TypeData::Array(element_a), TypeData::Array(element_b)) => {
                self.is_subtype_of(*element_a, *element_b)
            }
            (TypeData::Object(shape_a), TypeData::Object(shape_b)) => {
                if shape_b.sealed || shape_b.frozen {
                    // Exact field set required
                    if shape_a.props.len() != shape_b.props.len() {
                        return false;
                    }
                }
                shape_b.props.iter().all(|prop_b| {
                    self.lookup_through_proto(a, prop_b.name)
                        .is_some_and(|field_ty| self.is_subtype_of(field_ty, prop_b.ty))
                })
            }
            (TypeData::Function(shape_a), TypeData::Function(shape_b)) => {
                // Accepting fewer parameters is fine
                if shape_a.params.len() > shape_b.params.len()
                    && !shape_a.params[shape_b.params.len()..]
                        .iter()
                        .all(|p| p.optional || p.rest)
                {
                    return false;
                }
                let params_ok = shape_a
                    .params
                    .iter()
                    .zip(shape_b.params.iter())
                    .all(|(pa, pb)| self.is_subtype_of(pb.ty, pa.ty));
                params_ok && self.is_subtype_of(shape_a.return_type, shape_b.return_type)
            }
            (TypeData::Class(shape_a), TypeData::Class(shape_b)) => {
                if shape_a.decl == shape_b.decl {
                    return true;
                }
                // Walk the superclass chain
                let mut current = shape_a.super_class;
                let mut fuel = 64;
                while let Some(super_ty) = current {
                    if fuel == 0 {
                        break;
                    }
                    fuel -= 1;
                    if super_ty == b {
                        return true;
                    }
                    match self.interner.lookup(super_ty) {
                        Some(TypeData::Class(super_shape)) => {
                            if super_shape.decl == shape_b.decl {
                                return true;
                            }
                            current = super_shape.super_class;
                        }
                        _ => break,
                    }
                }
                false
            }
            (TypeData::Promise(resolved_a), TypeData::Promise(resolved_b)) => {
                self.is_subtype_of(*resolved_a, *resolved_b)
            }
            _ => false,
        }
    }

    /// Find a field on an object type, walking its prototype chain.
    fn lookup_through_proto(&self, obj: TypeId, name: Atom) -> Option<TypeId> {
        let mut current = obj;
        let mut fuel = 64;
        while fuel > 0 {
            fuel -= 1;
            match self.interner.lookup(current)? {
                TypeData::Object(shape) => {
                    if let Some(prop) = shape.field(name) {
                        return Some(prop.ty);
                    }
                    current = shape.proto?;
                }
                _ => return None,
            }
        }
        None
    }
}

/// Unfold a recursive type one level: substitute references to the
/// binder with the recursive type itself.
pub fn unfold(interner: &TypeInterner, rec: TypeId) -> TypeId {
    let Some(TypeData::Recursive { binder, body }) = interner.lookup(rec) else {
        return rec;
    };
    substitute_rec_ref(interner, body, binder, rec, 0)
}

fn substitute_rec_ref(
    interner: &TypeInterner,
    ty: TypeId,
    binder: u32,
    replacement: TypeId,
    depth: u32,
) -> TypeId {
    if depth > 16 {
        return ty;
    }
    let Some(data) = interner.lookup(ty) else {
        return ty;
    };
    match data {
        TypeData::RecRef(b) if b == binder => replacement,
        TypeData::Array(element) => {
            let element = substitute_rec_ref(interner, element, binder, replacement, depth + 1);
            interner.array(element)
        }
        TypeData::Tuple(elements) => {
            let elements = elements
                .iter()
                .map(|e| substitute_rec_ref(interner, *e, binder, replacement, depth + 1))
                .collect();
            interner.tuple(elements)
        }
        TypeData::Object(shape) => {
            let props = shape
                .props
                .iter()
                .map(|p| p.with_type(substitute_rec_ref(interner, p.ty, binder, replacement, depth + 1)))
                .collect();
            interner.object_shape(crate::types::ObjectShape {
                props,
                ..*shape
            })
        }
        TypeData::Union(members) => {
            let members = members
                .iter()
                .map(|m| substitute_rec_ref(interner, *m, binder, replacement, depth + 1))
                .collect();
            interner.union(members)
        }
        TypeData::Promise(resolved) => {
            let resolved = substitute_rec_ref(interner, resolved, binder, replacement, depth + 1);
            interner.promise(resolved)
        }
        _ => ty,
    }
}

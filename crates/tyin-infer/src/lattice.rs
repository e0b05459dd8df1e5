//! Lattice operations: least upper bound and greatest lower bound.
//!
//! Both operations are total and defined by structural recursion.
//! Record join is field-wise over the intersection of field names
//! (width subtyping); record meet is field-wise over the union of
//! names. Anything without a better rule joins into a union, which is
//! always an upper bound.

use crate::subtype::SubtypeChecker;
use crate::types::{
    FunctionShape, ObjectShape, PropertyInfo, TypeData, TypeId, TypeInterner,
};

/// Least upper bound.
pub fn join(interner: &TypeInterner, a: TypeId, b: TypeId) -> TypeId {
    if a == b {
        return a;
    }
    let Some(data_a) = interner.lookup(a) else {
        return b;
    };
    let Some(data_b) = interner.lookup(b) else {
        return a;
    };

    match (&data_a, &data_b) {
        (TypeData::Never, _) => return b,
        (_, TypeData::Never) => return a,
        (TypeData::Any { .. }, TypeData::Any { .. }) => return TypeId::ANY,
        (TypeData::Any { .. }, _) => return a,
        (_, TypeData::Any { .. }) => return b,
        (TypeData::Unknown, _) | (_, TypeData::Unknown) => return TypeId::UNKNOWN,
        _ => {}
    }

    match (&data_a, &data_b) {
        // Same-kind literals with different values generalize
        (TypeData::Literal(lit_a), TypeData::Literal(lit_b))
            if lit_a.primitive() == lit_b.primitive() =>
        {
            lit_a.primitive()
        }
        (TypeData::Array(element_a), TypeData::Array(element_b)) => {
            interner.array(join(interner, *element_a, *element_b))
        }
        (TypeData::Tuple(elements_a), TypeData::Tuple(elements_b)) => {
            if elements_a.len() == elements_b.len() {
                let joined = elements_a
                    .iter()
                    .zip(elements_b.iter())
                    .map(|(ea, eb)| join(interner, *ea, *eb))
                    .collect();
                interner.tuple(joined)
            } else {
                // Tuple structure is kept only for equal lengths
                let element = elements_a
                    .iter()
                    .chain(elements_b.iter())
                    .fold(TypeId::NEVER, |acc, e| join(interner, acc, *e));
                interner.array(element)
            }
        }
        (TypeData::Tuple(elements), TypeData::Array(element))
        | (TypeData::Array(element), TypeData::Tuple(elements)) => {
            let joined = elements
                .iter()
                .fold(*element, |acc, e| join(interner, acc, *e));
            interner.array(joined)
        }
        (TypeData::Object(shape_a), TypeData::Object(shape_b)) => {
            join_objects(interner, shape_a, shape_b)
        }
        (TypeData::Function(shape_a), TypeData::Function(shape_b))
            if shape_a.decl == shape_b.decl =>
        {
            join_functions(interner, shape_a, shape_b)
        }
        (TypeData::Class(shape_a), TypeData::Class(shape_b))
            if shape_a.decl == shape_b.decl =>
        {
            a
        }
        (TypeData::Promise(resolved_a), TypeData::Promise(resolved_b)) => {
            interner.promise(join(interner, *resolved_a, *resolved_b))
        }
        _ => interner.union2(a, b),
    }
}

fn join_objects(interner: &TypeInterner, a: &ObjectShape, b: &ObjectShape) -> TypeId {
    // Width join: only fields present on both sides survive. Canonical
    // field order keeps the operation commutative at the id level.
    let mut props = Vec::new();
    for prop_a in &a.props {
        if let Some(prop_b) = b.field(prop_a.name) {
            props.push(PropertyInfo {
                name: prop_a.name,
                ty: join(interner, prop_a.ty, prop_b.ty),
                writable: prop_a.writable || prop_b.writable,
                enumerable: prop_a.enumerable || prop_b.enumerable,
                configurable: prop_a.configurable || prop_b.configurable,
            });
        }
    }
    props.sort_by_key(|p| p.name);
    interner.object_shape(ObjectShape {
        props,
        proto: if a.proto == b.proto { a.proto } else { None },
        sealed: a.sealed && b.sealed,
        frozen: a.frozen && b.frozen,
        open: a.open || b.open,
    })
}

fn join_functions(interner: &TypeInterner, a: &FunctionShape, b: &FunctionShape) -> TypeId {
    // Same declaration seen through two analysis rounds: parameters
    // meet (contravariant), returns join
    let longest = a.params.len().max(b.params.len());
    let mut params = Vec::with_capacity(longest);
    for i in 0..longest {
        match (a.params.get(i), b.params.get(i)) {
            (Some(pa), Some(pb)) => params.push(crate::types::ParamInfo {
                name: pa.name,
                ty: meet(interner, pa.ty, pb.ty),
                optional: pa.optional && pb.optional,
                rest: pa.rest || pb.rest,
            }),
            (Some(p), None) | (None, Some(p)) => params.push(crate::types::ParamInfo {
                optional: true,
                ..p.clone()
            }),
            (None, None) => unreachable!(),
        }
    }
    let mut captures = a.captures.clone();
    for capture in &b.captures {
        if !captures.contains(capture) {
            captures.push(*capture);
        }
    }
    interner.function(FunctionShape {
        decl: a.decl,
        params,
        return_type: join(interner, a.return_type, b.return_type),
        is_async: a.is_async || b.is_async,
        is_generator: a.is_generator || b.is_generator,
        captures,
    })
}

/// Greatest lower bound.
pub fn meet(interner: &TypeInterner, a: TypeId, b: TypeId) -> TypeId {
    if a == b {
        return a;
    }
    let Some(data_a) = interner.lookup(a) else {
        return TypeId::NEVER;
    };
    let Some(data_b) = interner.lookup(b) else {
        return TypeId::NEVER;
    };

    match (&data_a, &data_b) {
        (TypeData::Never, _) | (_, TypeData::Never) => return TypeId::NEVER,
        // `unknown` sits below `any` in the order
        (TypeData::Any { .. }, TypeData::Unknown)
        | (TypeData::Unknown, TypeData::Any { .. }) => return TypeId::UNKNOWN,
        (TypeData::Any { .. }, TypeData::Any { .. }) => return TypeId::ANY,
        (TypeData::Any { .. } | TypeData::Unknown, _) => return b,
        (_, TypeData::Any { .. } | TypeData::Unknown) => return a,
        _ => {}
    }

    // Unions distribute over meet
    if let TypeData::Union(members) = &data_a {
        let met = members.iter().map(|m| meet(interner, *m, b)).collect();
        return interner.union(met);
    }
    if let TypeData::Union(members) = &data_b {
        let met = members.iter().map(|m| meet(interner, a, *m)).collect();
        return interner.union(met);
    }

    match (&data_a, &data_b) {
        (TypeData::Literal(lit), _) if lit.primitive() == b => a,
        (_, TypeData::Literal(lit)) if lit.primitive() == a => b,
        (TypeData::Array(element_a), TypeData::Array(element_b)) => {
            let element = meet(interner, *element_a, *element_b);
            interner.array(element)
        }
        (TypeData::Tuple(elements_a), TypeData::Tuple(elements_b)) => {
            if elements_a.len() != elements_b.len() {
                return TypeId::NEVER;
            }
            let mut met = Vec::with_capacity(elements_a.len());
            for (ea, eb) in elements_a.iter().zip(elements_b.iter()) {
                let element = meet(interner, *ea, *eb);
                if element == TypeId::NEVER {
                    return TypeId::NEVER;
                }
                met.push(element);
            }
            interner.tuple(met)
        }
        (TypeData::Tuple(elements), TypeData::Array(element))
        | (TypeData::Array(element), TypeData::Tuple(elements)) => {
            let mut met = Vec::with_capacity(elements.len());
            for e in elements {
                let item = meet(interner, *e, *element);
                if item == TypeId::NEVER {
                    return TypeId::NEVER;
                }
                met.push(item);
            }
            interner.tuple(met)
        }
        (TypeData::Object(shape_a), TypeData::Object(shape_b)) => {
            meet_objects(interner, shape_a, shape_b)
        }
        (TypeData::Promise(resolved_a), TypeData::Promise(resolved_b)) => {
            let resolved = meet(interner, *resolved_a, *resolved_b);
            interner.promise(resolved)
        }
        _ => {
            // Fall back to the subtype order, then to bottom
            let mut checker = SubtypeChecker::new(interner);
            if checker.is_subtype_of(a, b) {
                return a;
            }
            if checker.is_subtype_of(b, a) {
                return b;
            }
            TypeId::NEVER
        }
    }
}

fn meet_objects(interner: &TypeInterner, a: &ObjectShape, b: &ObjectShape) -> TypeId {
    // A sealed record admits no fields beyond its own
    if (a.sealed || a.frozen) && b.props.iter().any(|p| a.field(p.name).is_none()) {
        return TypeId::NEVER;
    }
    if (b.sealed || b.frozen) && a.props.iter().any(|p| b.field(p.name).is_none()) {
        return TypeId::NEVER;
    }

    // Field-wise meet over the union of field names
    let mut props: Vec<PropertyInfo> = Vec::new();
    for prop_a in &a.props {
        let (ty, other) = match b.field(prop_a.name) {
            Some(prop_b) => {
                let met = meet(interner, prop_a.ty, prop_b.ty);
                if met == TypeId::NEVER {
                    return TypeId::NEVER;
                }
                (met, Some(prop_b))
            }
            None => (prop_a.ty, None),
        };
        props.push(PropertyInfo {
            name: prop_a.name,
            ty,
            writable: prop_a.writable && other.is_none_or(|p| p.writable),
            enumerable: prop_a.enumerable && other.is_none_or(|p| p.enumerable),
            configurable: prop_a.configurable && other.is_none_or(|p| p.configurable),
        });
    }
    for prop_b in &b.props {
        if a.field(prop_b.name).is_none() {
            props.push(prop_b.clone());
        }
    }
    props.sort_by_key(|p| p.name);
    interner.object_shape(ObjectShape {
        props,
        proto: a.proto.or(b.proto),
        sealed: a.sealed || b.sealed,
        frozen: a.frozen || b.frozen,
        open: a.open && b.open,
    })
}

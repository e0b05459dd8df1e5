//! Lattice law tests.
//!
//! The mathematical properties the lattice must satisfy:
//! - Commutativity: join(a, b) = join(b, a), meet(a, b) = meet(b, a)
//! - Idempotence: join(a, a) = a, meet(a, a) = a
//! - Absorption: a <= join(a, b) and meet(a, b) <= a
//! - Monotonicity of join with respect to the subtype order
//! - Top is maximal, bottom minimal

use crate::lattice::{join, meet};
use crate::subtype::SubtypeChecker;
use crate::types::{PropertyInfo, TypeId, TypeInterner};

fn sample_types(interner: &TypeInterner) -> Vec<TypeId> {
    let x = interner.intern_string("x");
    let y = interner.intern_string("y");
    vec![
        TypeId::ANY,
        TypeId::UNKNOWN,
        TypeId::NEVER,
        TypeId::UNDEFINED,
        TypeId::NULL,
        TypeId::BOOLEAN,
        TypeId::NUMBER,
        TypeId::STRING,
        TypeId::BIGINT,
        interner.literal_number(42.0),
        interner.literal_string("hello"),
        interner.literal_boolean(true),
        interner.array(TypeId::NUMBER),
        interner.tuple(vec![TypeId::NUMBER, TypeId::STRING]),
        interner.object(vec![PropertyInfo::new(x, TypeId::NUMBER)]),
        interner.object(vec![
            PropertyInfo::new(x, TypeId::NUMBER),
            PropertyInfo::new(y, TypeId::STRING),
        ]),
        interner.union2(TypeId::NUMBER, TypeId::STRING),
        interner.promise(TypeId::NUMBER),
    ]
}

#[test]
fn test_law_join_commutative() {
    let interner = TypeInterner::new();
    let types = sample_types(&interner);
    for &a in &types {
        for &b in &types {
            assert_eq!(
                join(&interner, a, b),
                join(&interner, b, a),
                "join not commutative for {a:?}, {b:?}"
            );
        }
    }
}

#[test]
fn test_law_meet_commutative() {
    let interner = TypeInterner::new();
    let types = sample_types(&interner);
    for &a in &types {
        for &b in &types {
            assert_eq!(
                meet(&interner, a, b),
                meet(&interner, b, a),
                "meet not commutative for {a:?}, {b:?}"
            );
        }
    }
}

#[test]
fn test_law_idempotence() {
    let interner = TypeInterner::new();
    for &a in &sample_types(&interner) {
        assert_eq!(join(&interner, a, a), a);
        assert_eq!(meet(&interner, a, a), a);
    }
}

#[test]
fn test_law_absorption() {
    let interner = TypeInterner::new();
    let types = sample_types(&interner);
    let mut checker = SubtypeChecker::new(&interner);
    for &a in &types {
        for &b in &types {
            let joined = join(&interner, a, b);
            assert!(
                checker.is_subtype_of(a, joined),
                "a is not a subtype of join(a, b) for {a:?}, {b:?}"
            );
            let met = meet(&interner, a, b);
            assert!(
                checker.is_subtype_of(met, a),
                "meet(a, b) is not a subtype of a for {a:?}, {b:?}"
            );
        }
    }
}

#[test]
fn test_law_reflexivity() {
    let interner = TypeInterner::new();
    let mut checker = SubtypeChecker::new(&interner);
    for &ty in &sample_types(&interner) {
        assert!(checker.is_subtype_of(ty, ty), "reflexivity failed for {ty:?}");
    }
}

#[test]
fn test_law_top_and_bottom() {
    let interner = TypeInterner::new();
    let mut checker = SubtypeChecker::new(&interner);
    for &ty in &sample_types(&interner) {
        assert!(checker.is_subtype_of(ty, TypeId::ANY));
        assert!(checker.is_subtype_of(TypeId::NEVER, ty));
    }
}

#[test]
fn test_join_literal_widening() {
    let interner = TypeInterner::new();
    let one = interner.literal_number(1.0);
    let two = interner.literal_number(2.0);
    assert_eq!(join(&interner, one, two), TypeId::NUMBER);
    // But equal literals stay refined
    assert_eq!(join(&interner, one, one), one);
}

#[test]
fn test_join_of_distinct_kinds_is_union() {
    let interner = TypeInterner::new();
    let joined = join(&interner, TypeId::NUMBER, TypeId::STRING);
    assert_eq!(joined, interner.union2(TypeId::NUMBER, TypeId::STRING));
}

#[test]
fn test_record_join_is_width_intersection() {
    let interner = TypeInterner::new();
    let a = interner.intern_string("a");
    let b = interner.intern_string("b");
    let c = interner.intern_string("c");
    let left = interner.object(vec![
        PropertyInfo::new(a, TypeId::NUMBER),
        PropertyInfo::new(b, TypeId::NUMBER),
    ]);
    let right = interner.object(vec![
        PropertyInfo::new(a, TypeId::NUMBER),
        PropertyInfo::new(c, TypeId::NUMBER),
    ]);
    let joined = join(&interner, left, right);
    let expected = interner.object(vec![PropertyInfo::new(a, TypeId::NUMBER)]);
    assert_eq!(joined, expected);
}

#[test]
fn test_record_meet_is_field_union() {
    let interner = TypeInterner::new();
    let a = interner.intern_string("a");
    let b = interner.intern_string("b");
    let left = interner.object(vec![PropertyInfo::new(a, TypeId::NUMBER)]);
    let right = interner.object(vec![PropertyInfo::new(b, TypeId::STRING)]);
    let met = meet(&interner, left, right);
    let expected = interner.object(vec![
        PropertyInfo::new(a, TypeId::NUMBER),
        PropertyInfo::new(b, TypeId::STRING),
    ]);
    assert_eq!(met, expected);
}

#[test]
fn test_meet_of_disjoint_primitives_is_never() {
    let interner = TypeInterner::new();
    assert_eq!(meet(&interner, TypeId::NUMBER, TypeId::STRING), TypeId::NEVER);
    assert_eq!(meet(&interner, TypeId::NULL, TypeId::BOOLEAN), TypeId::NEVER);
}

#[test]
fn test_meet_distributes_over_union() {
    let interner = TypeInterner::new();
    let union = interner.union2(TypeId::NUMBER, TypeId::STRING);
    assert_eq!(meet(&interner, union, TypeId::STRING), TypeId::STRING);
}

#[test]
fn test_tuple_is_subtype_of_element_array() {
    let interner = TypeInterner::new();
    let tuple = interner.tuple(vec![TypeId::NUMBER, TypeId::STRING]);
    let array = interner.array(interner.union2(TypeId::NUMBER, TypeId::STRING));
    let mut checker = SubtypeChecker::new(&interner);
    assert!(checker.is_subtype_of(tuple, array));
    assert!(!checker.is_subtype_of(array, tuple));
}

#[test]
fn test_sealed_record_requires_exact_width() {
    let interner = TypeInterner::new();
    let a = interner.intern_string("a");
    let b = interner.intern_string("b");
    let wide = interner.object(vec![
        PropertyInfo::new(a, TypeId::NUMBER),
        PropertyInfo::new(b, TypeId::NUMBER),
    ]);
    let sealed_narrow = interner.object_shape(crate::types::ObjectShape {
        props: vec![PropertyInfo::new(a, TypeId::NUMBER)],
        proto: None,
        sealed: true,
        frozen: false,
        open: false,
    });
    let mut checker = SubtypeChecker::new(&interner);
    // Width subtyping is refused against the sealed supertype
    assert!(!checker.is_subtype_of(wide, sealed_narrow));
}

#[test]
fn test_function_parameter_contravariance() {
    let interner = TypeInterner::new();
    let x = interner.intern_string("x");
    let narrow_param = interner.function(crate::types::FunctionShape {
        decl: 1,
        params: vec![crate::types::ParamInfo {
            name: x,
            ty: interner.literal_number(1.0),
            optional: false,
            rest: false,
        }],
        return_type: TypeId::NUMBER,
        is_async: false,
        is_generator: false,
        captures: Vec::new(),
    });
    let wide_param = interner.function(crate::types::FunctionShape {
        decl: 2,
        params: vec![crate::types::ParamInfo {
            name: x,
            ty: TypeId::NUMBER,
            optional: false,
            rest: false,
        }],
        return_type: TypeId::NUMBER,
        is_async: false,
        is_generator: false,
        captures: Vec::new(),
    });
    let mut checker = SubtypeChecker::new(&interner);
    // A function accepting the wider parameter works where the
    // narrower one is expected
    assert!(checker.is_subtype_of(wide_param, narrow_param));
    assert!(!checker.is_subtype_of(narrow_param, wide_param));
}

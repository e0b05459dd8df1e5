//! Interner behavior: deduplication, intrinsic seeding, display.

use crate::types::{
    LiteralValue, PropertyInfo, TypeData, TypeId, TypeInterner, type_to_string,
};

#[test]
fn test_interner_intrinsics() {
    let interner = TypeInterner::new();
    assert!(interner.lookup(TypeId::STRING).is_some());
    assert!(interner.lookup(TypeId::NUMBER).is_some());
    assert!(interner.lookup(TypeId::ANY).is_some());
    assert!(matches!(interner.lookup(TypeId::NEVER), Some(TypeData::Never)));
}

#[test]
fn test_interner_deduplication() {
    let interner = TypeInterner::new();
    let id1 = interner.literal_string("hello");
    let id2 = interner.literal_string("hello");
    let id3 = interner.literal_string("world");
    assert_eq!(id1, id2);
    assert_ne!(id1, id3);
}

#[test]
fn test_object_deduplication_is_structural() {
    let interner = TypeInterner::new();
    let x = interner.intern_string("x");
    let a = interner.object(vec![PropertyInfo::new(x, TypeId::NUMBER)]);
    let b = interner.object(vec![PropertyInfo::new(x, TypeId::NUMBER)]);
    assert_eq!(a, b);
}

#[test]
fn test_union_flattening_and_dedup() {
    let interner = TypeInterner::new();
    let inner = interner.union2(TypeId::NUMBER, TypeId::STRING);
    let outer = interner.union2(inner, TypeId::NUMBER);
    assert_eq!(outer, inner);
}

#[test]
fn test_union_collapses_any() {
    let interner = TypeInterner::new();
    let union = interner.union3(TypeId::NUMBER, TypeId::ANY, TypeId::STRING);
    assert_eq!(union, TypeId::ANY);
}

#[test]
fn test_union_drops_never() {
    let interner = TypeInterner::new();
    assert_eq!(interner.union2(TypeId::NEVER, TypeId::NUMBER), TypeId::NUMBER);
    assert_eq!(interner.union2(TypeId::NEVER, TypeId::NEVER), TypeId::NEVER);
}

#[test]
fn test_union_singleton_collapses() {
    let interner = TypeInterner::new();
    assert_eq!(interner.union(vec![TypeId::STRING]), TypeId::STRING);
}

#[test]
fn test_union_subsumes_literals_under_primitive() {
    let interner = TypeInterner::new();
    let one = interner.literal_number(1.0);
    let union = interner.union2(one, TypeId::NUMBER);
    assert_eq!(union, TypeId::NUMBER);
}

#[test]
fn test_union_order_is_canonical() {
    let interner = TypeInterner::new();
    let ab = interner.union2(TypeId::NUMBER, TypeId::STRING);
    let ba = interner.union2(TypeId::STRING, TypeId::NUMBER);
    assert_eq!(ab, ba);
}

#[test]
fn test_bigint_literal_roundtrip() {
    let interner = TypeInterner::new();
    let id = interner.literal_bigint("123");
    match interner.lookup(id) {
        Some(TypeData::Literal(LiteralValue::BigInt(atom))) => {
            assert_eq!(interner.resolve_atom(atom), "123");
        }
        other => panic!("expected bigint literal, got {other:?}"),
    }
}

#[test]
fn test_fresh_vars_are_distinct() {
    let interner = TypeInterner::new();
    let a = interner.fresh_var(crate::types::Polarity::Negative, "x");
    let b = interner.fresh_var(crate::types::Polarity::Negative, "x");
    assert_ne!(a, b);
}

#[test]
fn test_display_is_deterministic() {
    let interner = TypeInterner::new();
    let x = interner.intern_string("x");
    let record = interner.object(vec![PropertyInfo::new(
        x,
        interner.union2(TypeId::NUMBER, TypeId::STRING),
    )]);
    let first = type_to_string(&interner, record);
    let second = type_to_string(&interner, record);
    assert_eq!(first, second);
    assert_eq!(first, "{ x: number | string }");
}

#[test]
fn test_display_forms() {
    let interner = TypeInterner::new();
    assert_eq!(type_to_string(&interner, TypeId::ANY), "any");
    assert_eq!(type_to_string(&interner, TypeId::NEVER), "never");
    assert_eq!(
        type_to_string(&interner, interner.literal_number(42.0)),
        "42"
    );
    assert_eq!(
        type_to_string(&interner, interner.literal_number(1.5)),
        "1.5"
    );
    assert_eq!(
        type_to_string(&interner, interner.literal_string("hi")),
        "\"hi\""
    );
    assert_eq!(
        type_to_string(&interner, interner.literal_bigint("7")),
        "7n"
    );
    assert_eq!(
        type_to_string(&interner, interner.array(TypeId::NUMBER)),
        "number[]"
    );
    let union_array = interner.array(interner.union2(TypeId::NUMBER, TypeId::STRING));
    assert_eq!(type_to_string(&interner, union_array), "(number | string)[]");
    assert_eq!(
        type_to_string(&interner, interner.tuple(vec![TypeId::NUMBER, TypeId::STRING])),
        "[number, string]"
    );
    assert_eq!(
        type_to_string(&interner, interner.promise(TypeId::STRING)),
        "Promise<string>"
    );
    assert_eq!(type_to_string(&interner, interner.object(vec![])), "{}");
}

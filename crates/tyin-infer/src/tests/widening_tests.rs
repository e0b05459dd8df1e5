//! Widening operator tests.

use crate::solver::widen_type;
use crate::types::{PropertyInfo, TypeData, TypeId, TypeInterner};

#[test]
fn test_widen_string_literal() {
    let interner = TypeInterner::new();
    let lit = interner.literal_string("hello");
    assert_eq!(widen_type(&interner, lit), TypeId::STRING);
}

#[test]
fn test_widen_number_literal() {
    let interner = TypeInterner::new();
    let lit = interner.literal_number(42.0);
    assert_eq!(widen_type(&interner, lit), TypeId::NUMBER);
}

#[test]
fn test_widen_boolean_literal() {
    let interner = TypeInterner::new();
    let lit = interner.literal_boolean(true);
    assert_eq!(widen_type(&interner, lit), TypeId::BOOLEAN);
}

#[test]
fn test_widen_union_of_literals_collapses() {
    let interner = TypeInterner::new();
    let union = interner.union2(
        interner.literal_number(1.0),
        interner.literal_number(2.0),
    );
    assert_eq!(widen_type(&interner, union), TypeId::NUMBER);
}

#[test]
fn test_widen_primitive_preserved() {
    let interner = TypeInterner::new();
    assert_eq!(widen_type(&interner, TypeId::STRING), TypeId::STRING);
    assert_eq!(widen_type(&interner, TypeId::ANY), TypeId::ANY);
}

#[test]
fn test_widen_object_properties() {
    let interner = TypeInterner::new();
    let x = interner.intern_string("x");
    let obj = interner.object(vec![PropertyInfo::new(x, interner.literal_number(1.0))]);
    let widened = widen_type(&interner, obj);
    match interner.lookup(widened) {
        Some(TypeData::Object(shape)) => {
            assert_eq!(shape.props.len(), 1);
            assert_eq!(shape.props[0].ty, TypeId::NUMBER);
        }
        other => panic!("expected widened object, got {other:?}"),
    }
}

#[test]
fn test_widen_nested_containers() {
    let interner = TypeInterner::new();
    let array = interner.array(interner.literal_string("a"));
    assert_eq!(widen_type(&interner, array), interner.array(TypeId::STRING));
    let tuple = interner.tuple(vec![interner.literal_number(1.0), TypeId::STRING]);
    assert_eq!(
        widen_type(&interner, tuple),
        interner.tuple(vec![TypeId::NUMBER, TypeId::STRING])
    );
}

//! Narrowing operator tests: typeof, null, truthiness, instanceof, in.

use crate::narrow::{
    narrow_has_prop, narrow_instance, narrow_literal, narrow_nullish, narrow_truthy,
    narrow_typeof,
};
use crate::subtype::SubtypeChecker;
use crate::types::{LiteralValue, OrderedFloat, PropertyInfo, TypeId, TypeInterner};

#[test]
fn test_typeof_string_true_edge() {
    let interner = TypeInterner::new();
    let union = interner.union2(TypeId::STRING, TypeId::NUMBER);
    let kind = interner.intern_string("string");
    assert_eq!(narrow_typeof(&interner, union, kind, true), TypeId::STRING);
}

#[test]
fn test_typeof_string_false_edge_subtracts() {
    let interner = TypeInterner::new();
    let union = interner.union2(TypeId::STRING, TypeId::NUMBER);
    let kind = interner.intern_string("string");
    assert_eq!(narrow_typeof(&interner, union, kind, false), TypeId::NUMBER);
}

#[test]
fn test_typeof_narrows_any_to_primitive() {
    let interner = TypeInterner::new();
    let kind = interner.intern_string("number");
    assert_eq!(narrow_typeof(&interner, TypeId::ANY, kind, true), TypeId::NUMBER);
}

#[test]
fn test_typeof_matches_literals() {
    let interner = TypeInterner::new();
    let union = interner.union2(interner.literal_string("a"), TypeId::NUMBER);
    let kind = interner.intern_string("string");
    assert_eq!(
        narrow_typeof(&interner, union, kind, true),
        interner.literal_string("a")
    );
}

#[test]
fn test_strict_null_narrowing() {
    let interner = TypeInterner::new();
    let union = interner.union3(TypeId::STRING, TypeId::NULL, TypeId::UNDEFINED);
    assert_eq!(narrow_nullish(&interner, union, false, true), TypeId::NULL);
    assert_eq!(
        narrow_nullish(&interner, union, false, false),
        interner.union2(TypeId::STRING, TypeId::UNDEFINED)
    );
}

#[test]
fn test_loose_null_narrowing_includes_undefined() {
    let interner = TypeInterner::new();
    let union = interner.union3(TypeId::STRING, TypeId::NULL, TypeId::UNDEFINED);
    assert_eq!(
        narrow_nullish(&interner, union, true, true),
        interner.union2(TypeId::NULL, TypeId::UNDEFINED)
    );
    assert_eq!(narrow_nullish(&interner, union, true, false), TypeId::STRING);
}

#[test]
fn test_truthy_removes_nullish_and_falsy_literals() {
    let interner = TypeInterner::new();
    let union = interner.union(vec![
        TypeId::STRING,
        TypeId::NULL,
        TypeId::UNDEFINED,
        interner.literal_number(0.0),
    ]);
    assert_eq!(narrow_truthy(&interner, union, true), TypeId::STRING);
}

#[test]
fn test_falsy_residue() {
    let interner = TypeInterner::new();
    let union = interner.union2(TypeId::NULL, interner.object(vec![]));
    // Objects are always truthy, so only null survives the false edge
    assert_eq!(narrow_truthy(&interner, union, false), TypeId::NULL);
}

#[test]
fn test_truthy_boolean_becomes_literal() {
    let interner = TypeInterner::new();
    assert_eq!(
        narrow_truthy(&interner, TypeId::BOOLEAN, true),
        interner.literal_boolean(true)
    );
    assert_eq!(
        narrow_truthy(&interner, TypeId::BOOLEAN, false),
        interner.literal_boolean(false)
    );
}

#[test]
fn test_literal_equality_narrowing() {
    let interner = TypeInterner::new();
    let union = interner.union2(TypeId::NUMBER, TypeId::STRING);
    let one = LiteralValue::Number(OrderedFloat(1.0));
    assert_eq!(
        narrow_literal(&interner, union, &one, true),
        interner.literal_number(1.0)
    );
    // Subtracting a literal from an unrefined primitive cannot shrink it
    assert_eq!(narrow_literal(&interner, union, &one, false), union);
}

#[test]
fn test_instanceof_narrowing() {
    let interner = TypeInterner::new();
    let x = interner.intern_string("x");
    let instance = interner.object(vec![PropertyInfo::new(x, TypeId::NUMBER)]);
    let union = interner.union2(instance, TypeId::STRING);
    let narrowed = narrow_instance(&interner, union, instance, true);
    let mut checker = SubtypeChecker::new(&interner);
    assert!(checker.is_subtype_of(narrowed, instance));
    assert_eq!(
        narrow_instance(&interner, union, instance, false),
        TypeId::STRING
    );
}

#[test]
fn test_in_narrowing_filters_union() {
    let interner = TypeInterner::new();
    let kind = interner.intern_string("kind");
    let other = interner.intern_string("other");
    let with_kind = interner.object(vec![PropertyInfo::new(kind, TypeId::STRING)]);
    let without = interner.object(vec![PropertyInfo::new(other, TypeId::NUMBER)]);
    let union = interner.union2(with_kind, without);
    assert_eq!(narrow_has_prop(&interner, union, kind, true), with_kind);
    assert_eq!(narrow_has_prop(&interner, union, kind, false), without);
}

#[test]
fn test_narrowing_is_monotone() {
    let interner = TypeInterner::new();
    let mut checker = SubtypeChecker::new(&interner);
    let union = interner.union3(TypeId::STRING, TypeId::NUMBER, TypeId::NULL);
    let kind = interner.intern_string("string");
    for narrowed in [
        narrow_typeof(&interner, union, kind, true),
        narrow_typeof(&interner, union, kind, false),
        narrow_truthy(&interner, union, true),
        narrow_truthy(&interner, union, false),
        narrow_nullish(&interner, union, true, true),
        narrow_nullish(&interner, union, true, false),
    ] {
        assert!(
            checker.is_subtype_of(narrowed, union),
            "narrowing produced a non-subtype: {narrowed:?}"
        );
    }
}

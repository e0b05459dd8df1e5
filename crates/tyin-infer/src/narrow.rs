//! Type narrowing under proven predicates.
//!
//! Conditional CFG edges carry predicates derived from the branch
//! condition. Applying one refines the type of the affected variable in
//! the edge's state copy; the source block's exit state is never
//! touched. Every narrowing result is a subtype of the input.

use crate::subtype::SubtypeChecker;
use crate::types::{
    LiteralValue, ObjectShape, OrderedFloat, PropertyInfo, TypeData, TypeId, TypeInterner,
};
use tyin_common::Atom;

/// A fact proven along one conditional edge, about one variable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Predicate {
    Truthy { name: Atom },
    Falsy { name: Atom },
    /// `typeof x === "<kind>"` (or its negation).
    TypeofIs { name: Atom, kind: Atom },
    TypeofNot { name: Atom, kind: Atom },
    /// `x === null` / `x == null`; loose equality includes `undefined`.
    IsNullish { name: Atom, loose: bool },
    NotNullish { name: Atom, loose: bool },
    LiteralEq { name: Atom, value: LiteralValue },
    LiteralNe { name: Atom, value: LiteralValue },
    /// `x instanceof C`; the class is looked up by name when the edge
    /// state is applied.
    InstanceOf { name: Atom, class_name: Atom },
    NotInstanceOf { name: Atom, class_name: Atom },
    /// `"k" in x`.
    HasProp { name: Atom, prop: Atom },
    NotHasProp { name: Atom, prop: Atom },
}

impl Predicate {
    pub fn target(&self) -> Atom {
        match self {
            Predicate::Truthy { name }
            | Predicate::Falsy { name }
            | Predicate::TypeofIs { name, .. }
            | Predicate::TypeofNot { name, .. }
            | Predicate::IsNullish { name, .. }
            | Predicate::NotNullish { name, .. }
            | Predicate::LiteralEq { name, .. }
            | Predicate::LiteralNe { name, .. }
            | Predicate::InstanceOf { name, .. }
            | Predicate::NotInstanceOf { name, .. }
            | Predicate::HasProp { name, .. }
            | Predicate::NotHasProp { name, .. } => *name,
        }
    }

}

/// Apply a predicate to a type. `resolve_instance` maps a class name to
/// its instance type for `instanceof` narrowing.
pub fn narrow_type(
    interner: &TypeInterner,
    ty: TypeId,
    predicate: &Predicate,
    resolve_instance: &dyn Fn(Atom) -> Option<TypeId>,
) -> TypeId {
    match predicate {
        Predicate::Truthy { .. } => narrow_truthy(interner, ty, true),
        Predicate::Falsy { .. } => narrow_truthy(interner, ty, false),
        Predicate::TypeofIs { kind, .. } => narrow_typeof(interner, ty, *kind, true),
        Predicate::TypeofNot { kind, .. } => narrow_typeof(interner, ty, *kind, false),
        Predicate::IsNullish { loose, .. } => narrow_nullish(interner, ty, *loose, true),
        Predicate::NotNullish { loose, .. } => narrow_nullish(interner, ty, *loose, false),
        Predicate::LiteralEq { value, .. } => narrow_literal(interner, ty, value, true),
        Predicate::LiteralNe { value, .. } => narrow_literal(interner, ty, value, false),
        Predicate::InstanceOf { class_name, .. } => match resolve_instance(*class_name) {
            Some(instance) => narrow_instance(interner, ty, instance, true),
            None => ty,
        },
        Predicate::NotInstanceOf { class_name, .. } => match resolve_instance(*class_name) {
            Some(instance) => narrow_instance(interner, ty, instance, false),
            None => ty,
        },
        Predicate::HasProp { prop, .. } => narrow_has_prop(interner, ty, *prop, true),
        Predicate::NotHasProp { prop, .. } => narrow_has_prop(interner, ty, *prop, false),
    }
}

fn members_of(interner: &TypeInterner, ty: TypeId) -> Vec<TypeId> {
    match interner.lookup(ty) {
        Some(TypeData::Union(members)) => members,
        _ => vec![ty],
    }
}

fn literal_is_falsy(interner: &TypeInterner, lit: &LiteralValue) -> bool {
    match lit {
        LiteralValue::Boolean(value) => !*value,
        LiteralValue::Number(value) => value.0 == 0.0 || value.0.is_nan(),
        LiteralValue::String(atom) => interner.resolve_atom(*atom).is_empty(),
        LiteralValue::BigInt(atom) => {
            let digits = interner.resolve_atom(*atom);
            digits.chars().all(|c| c == '0' || c == '-')
        }
    }
}

/// Truthiness narrowing. On the true edge remove `null`, `undefined`,
/// and falsy literals; on the false edge keep the falsy residue of each
/// member.
pub fn narrow_truthy(interner: &TypeInterner, ty: TypeId, assume: bool) -> TypeId {
    let mut result = Vec::new();
    for member in members_of(interner, ty) {
        let Some(data) = interner.lookup(member) else {
            continue;
        };
        if assume {
            match data {
                TypeData::Undefined | TypeData::Null => {}
                TypeData::Literal(lit) => {
                    if !literal_is_falsy(interner, &lit) {
                        result.push(member);
                    }
                }
                TypeData::Boolean => result.push(interner.literal_boolean(true)),
                _ => result.push(member),
            }
        } else {
            match data {
                TypeData::Undefined | TypeData::Null => result.push(member),
                TypeData::Literal(lit) => {
                    if literal_is_falsy(interner, &lit) {
                        result.push(member);
                    }
                }
                TypeData::Boolean => result.push(interner.literal_boolean(false)),
                TypeData::Number => {
                    result.push(interner.literal_number(0.0));
                    result.push(interner.literal_number(f64::NAN));
                }
                TypeData::String => result.push(interner.literal_string("")),
                TypeData::BigInt => result.push(interner.literal_bigint("0")),
                // A top-like value's falsy residue is the union of the
                // falsy constants
                TypeData::Any { .. } | TypeData::Unknown | TypeData::Var(_) => {
                    result.push(falsy_union(interner));
                }
                // Objects, arrays, functions are always truthy
                _ => {}
            }
        }
    }
    interner.union(result)
}

/// `typeof` narrowing. The true edge keeps members of the matching
/// primitive kind; the false edge subtracts them.
pub fn narrow_typeof(interner: &TypeInterner, ty: TypeId, kind: Atom, assume: bool) -> TypeId {
    let kind_name = interner.resolve_atom(kind);
    let mut result = Vec::new();
    for member in members_of(interner, ty) {
        let Some(data) = interner.lookup(member) else {
            continue;
        };
        let matches = typeof_matches(&data, &kind_name);
        if assume {
            match matches {
                Some(true) => result.push(member),
                Some(false) => {}
                // Top-like members narrow to the named kind
                None => {
                    if let Some(target) = typeof_target(interner, &kind_name) {
                        result.push(target);
                    } else {
                        result.push(member);
                    }
                }
            }
        } else {
            match matches {
                Some(true) => {}
                Some(false) | None => result.push(member),
            }
        }
    }
    interner.union(result)
}

/// Whether a concrete type matches `typeof x === kind`. `None` means
/// unknowable (any/unknown/type variables).
fn typeof_matches(data: &TypeData, kind: &str) -> Option<bool> {
    let result = match kind {
        "undefined" => matches!(data, TypeData::Undefined),
        "boolean" => matches!(
            data,
            TypeData::Boolean | TypeData::Literal(LiteralValue::Boolean(_))
        ),
        "number" => matches!(
            data,
            TypeData::Number | TypeData::Literal(LiteralValue::Number(_))
        ),
        "string" => matches!(
            data,
            TypeData::String | TypeData::Literal(LiteralValue::String(_))
        ),
        "bigint" => matches!(
            data,
            TypeData::BigInt | TypeData::Literal(LiteralValue::BigInt(_))
        ),
        "symbol" => matches!(data, TypeData::Symbol),
        "function" => matches!(data, TypeData::Function(_) | TypeData::Class(_)),
        "object" => matches!(
            data,
            TypeData::Null
                | TypeData::Object(_)
                | TypeData::Array(_)
                | TypeData::Tuple(_)
                | TypeData::Promise(_)
                | TypeData::Recursive { .. }
        ),
        _ => return Some(false),
    };
    match data {
        TypeData::Any { .. } | TypeData::Unknown | TypeData::Var(_) => None,
        _ => Some(result),
    }
}

/// The type a top-like member narrows to under `typeof x === kind`.
fn typeof_target(interner: &TypeInterner, kind: &str) -> Option<TypeId> {
    match kind {
        "undefined" => Some(TypeId::UNDEFINED),
        "boolean" => Some(TypeId::BOOLEAN),
        "number" => Some(TypeId::NUMBER),
        "string" => Some(TypeId::STRING),
        "bigint" => Some(TypeId::BIGINT),
        "symbol" => Some(TypeId::SYMBOL),
        "object" | "function" => Some(interner.any_with_reason(&format!("typeof-{kind}"))),
        _ => None,
    }
}

/// Null narrowing: `x === null` (strict) or `x == null` (loose, also
/// matches `undefined`).
pub fn narrow_nullish(interner: &TypeInterner, ty: TypeId, loose: bool, assume: bool) -> TypeId {
    let mut result = Vec::new();
    for member in members_of(interner, ty) {
        let Some(data) = interner.lookup(member) else {
            continue;
        };
        let is_nullish = match data {
            TypeData::Null => true,
            TypeData::Undefined => loose,
            _ => false,
        };
        let top_like = matches!(
            data,
            TypeData::Any { .. } | TypeData::Unknown | TypeData::Var(_)
        );
        if assume {
            if is_nullish {
                result.push(member);
            } else if top_like {
                result.push(TypeId::NULL);
                if loose {
                    result.push(TypeId::UNDEFINED);
                }
            }
        } else if !is_nullish {
            result.push(member);
        }
    }
    interner.union(result)
}

/// Equality narrowing against a literal value.
pub fn narrow_literal(
    interner: &TypeInterner,
    ty: TypeId,
    value: &LiteralValue,
    assume: bool,
) -> TypeId {
    let literal = interner.intern(TypeData::Literal(value.clone()));
    let mut result = Vec::new();
    for member in members_of(interner, ty) {
        let Some(data) = interner.lookup(member) else {
            continue;
        };
        if assume {
            let unrefined_match = data.primitive_kind() == Some(value.primitive())
                && !matches!(data, TypeData::Literal(_));
            let top_like = matches!(
                data,
                TypeData::Any { .. } | TypeData::Unknown | TypeData::Var(_)
            );
            let possible = member == literal || unrefined_match || top_like;
            if possible {
                result.push(literal);
            }
        } else if member != literal {
            result.push(member);
        }
    }
    interner.union(result)
}

/// `instanceof` narrowing against a class instance type.
pub fn narrow_instance(
    interner: &TypeInterner,
    ty: TypeId,
    instance: TypeId,
    assume: bool,
) -> TypeId {
    let mut checker = SubtypeChecker::new(interner);
    let mut result = Vec::new();
    for member in members_of(interner, ty) {
        let is_instance = checker.is_subtype_of(member, instance);
        let top_like = matches!(
            interner.lookup(member),
            Some(TypeData::Any { .. } | TypeData::Unknown | TypeData::Var(_))
        );
        if assume {
            if is_instance {
                result.push(member);
            } else if top_like || matches!(interner.lookup(member), Some(TypeData::Object(_))) {
                result.push(instance);
            }
        } else if !is_instance {
            result.push(member);
        }
    }
    interner.union(result)
}

/// `"k" in x` narrowing: the true edge keeps members carrying the
/// field; open records gain it.
pub fn narrow_has_prop(interner: &TypeInterner, ty: TypeId, prop: Atom, assume: bool) -> TypeId {
    let mut result = Vec::new();
    for member in members_of(interner, ty) {
        let Some(data) = interner.lookup(member) else {
            continue;
        };
        match &data {
            TypeData::Object(shape) => {
                let has = shape.field(prop).is_some();
                if assume {
                    if has {
                        result.push(member);
                    } else if shape.open && !shape.sealed && !shape.frozen {
                        // Width extension is allowed on an open record
                        let mut props = shape.props.clone();
                        props.push(PropertyInfo::new(prop, TypeId::ANY));
                        result.push(interner.object_shape(ObjectShape {
                            props,
                            ..*shape.clone()
                        }));
                    }
                } else if !has {
                    result.push(member);
                }
            }
            TypeData::Any { .. } | TypeData::Unknown | TypeData::Var(_) => {
                if assume {
                    let props = vec![PropertyInfo::new(prop, TypeId::ANY)];
                    result.push(interner.object_shape(ObjectShape {
                        props,
                        proto: None,
                        sealed: false,
                        frozen: false,
                        open: true,
                    }));
                } else {
                    result.push(member);
                }
            }
            _ => {
                if !assume {
                    result.push(member);
                }
            }
        }
    }
    interner.union(result)
}

// =============================================================================
// Predicate derivation from branch conditions
// =============================================================================

/// Facts proven about simple variables when `condition` evaluates to
/// `assume`. A true `a && b` proves both conjuncts; a false one proves
/// nothing (either side may have failed), and dually for `||`.
pub fn condition_predicates(
    interner: &TypeInterner,
    condition: &tyin_parser::ast::Expr,
    assume: bool,
) -> Vec<Predicate> {
    let mut out = Vec::new();
    collect_predicates(interner, condition, assume, &mut out);
    out
}

fn collect_predicates(
    interner: &TypeInterner,
    condition: &tyin_parser::ast::Expr,
    assume: bool,
    out: &mut Vec<Predicate>,
) {
    use tyin_parser::ast::{Expr, LogicalOp, UnaryOp};
    match condition {
        Expr::Ident(ident) => {
            let name = interner.intern_string(&ident.name);
            out.push(if assume {
                Predicate::Truthy { name }
            } else {
                Predicate::Falsy { name }
            });
        }
        Expr::Unary(unary) if unary.op == UnaryOp::Not => {
            collect_predicates(interner, &unary.argument, !assume, out);
        }
        Expr::Logical(logical) => match logical.op {
            LogicalOp::And if assume => {
                collect_predicates(interner, &logical.left, true, out);
                collect_predicates(interner, &logical.right, true, out);
            }
            LogicalOp::Or if !assume => {
                collect_predicates(interner, &logical.left, false, out);
                collect_predicates(interner, &logical.right, false, out);
            }
            _ => {}
        },
        Expr::Binary(binary) => collect_binary_predicates(interner, binary, assume, out),
        _ => {}
    }
}

fn collect_binary_predicates(
    interner: &TypeInterner,
    binary: &tyin_parser::ast::BinaryExpr,
    assume: bool,
    out: &mut Vec<Predicate>,
) {
    use tyin_parser::ast::{BinaryOp, Expr};
    match binary.op {
        BinaryOp::EqEqEq | BinaryOp::EqEq | BinaryOp::NotEqEq | BinaryOp::NotEq => {
            let loose = matches!(binary.op, BinaryOp::EqEq | BinaryOp::NotEq);
            let positive = matches!(binary.op, BinaryOp::EqEqEq | BinaryOp::EqEq) == assume;
            collect_equality(interner, &binary.left, &binary.right, loose, positive, out);
            collect_equality(interner, &binary.right, &binary.left, loose, positive, out);
        }
        BinaryOp::Instanceof => {
            if let (Expr::Ident(target), Expr::Ident(class_ident)) = (&binary.left, &binary.right) {
                let name = interner.intern_string(&target.name);
                let class_name = interner.intern_string(&class_ident.name);
                out.push(if assume {
                    Predicate::InstanceOf { name, class_name }
                } else {
                    Predicate::NotInstanceOf { name, class_name }
                });
            }
        }
        BinaryOp::In => {
            if let (Expr::String(key), Expr::Ident(target)) = (&binary.left, &binary.right) {
                let name = interner.intern_string(&target.name);
                let prop = interner.intern_string(&key.value);
                out.push(if assume {
                    Predicate::HasProp { name, prop }
                } else {
                    Predicate::NotHasProp { name, prop }
                });
            }
        }
        _ => {}
    }
}

/// Equality facts about `subject` compared with `probe`.
fn collect_equality(
    interner: &TypeInterner,
    subject: &tyin_parser::ast::Expr,
    probe: &tyin_parser::ast::Expr,
    loose: bool,
    positive: bool,
    out: &mut Vec<Predicate>,
) {
    use tyin_parser::ast::{Expr, UnaryOp};

    // typeof x === "kind"
    if let Expr::Unary(unary) = subject
        && unary.op == UnaryOp::Typeof
        && let Expr::Ident(target) = &unary.argument
        && let Expr::String(kind_lit) = probe
    {
        let name = interner.intern_string(&target.name);
        let kind = interner.intern_string(&kind_lit.value);
        out.push(if positive {
            Predicate::TypeofIs { name, kind }
        } else {
            Predicate::TypeofNot { name, kind }
        });
        return;
    }

    let Expr::Ident(target) = subject else {
        return;
    };
    let name = interner.intern_string(&target.name);

    match probe {
        Expr::Null(_) => out.push(if positive {
            Predicate::IsNullish { name, loose }
        } else {
            Predicate::NotNullish { name, loose }
        }),
        Expr::Undefined(_) => {
            if loose {
                out.push(if positive {
                    Predicate::IsNullish { name, loose: true }
                } else {
                    Predicate::NotNullish { name, loose: true }
                });
            } else {
                let kind = interner.intern_string("undefined");
                out.push(if positive {
                    Predicate::TypeofIs { name, kind }
                } else {
                    Predicate::TypeofNot { name, kind }
                });
            }
        }
        Expr::Number(lit) => {
            let value = LiteralValue::Number(OrderedFloat(lit.value));
            out.push(if positive {
                Predicate::LiteralEq { name, value }
            } else {
                Predicate::LiteralNe { name, value }
            });
        }
        Expr::String(lit) => {
            let value = LiteralValue::String(interner.intern_string(&lit.value));
            out.push(if positive {
                Predicate::LiteralEq { name, value }
            } else {
                Predicate::LiteralNe { name, value }
            });
        }
        Expr::Boolean(lit) => {
            let value = LiteralValue::Boolean(lit.value);
            out.push(if positive {
                Predicate::LiteralEq { name, value }
            } else {
                Predicate::LiteralNe { name, value }
            });
        }
        _ => {}
    }
}

/// The narrowing fact a `case` clause proves about the switch
/// discriminant.
pub fn case_predicates(
    interner: &TypeInterner,
    discriminant: &tyin_parser::ast::Expr,
    test: &tyin_parser::ast::Expr,
) -> Vec<Predicate> {
    use tyin_parser::ast::Expr;
    let Expr::Ident(target) = discriminant else {
        return Vec::new();
    };
    let name = interner.intern_string(&target.name);
    let value = match test {
        Expr::Number(lit) => LiteralValue::Number(OrderedFloat(lit.value)),
        Expr::String(lit) => LiteralValue::String(interner.intern_string(&lit.value)),
        Expr::Boolean(lit) => LiteralValue::Boolean(lit.value),
        _ => return Vec::new(),
    };
    vec![Predicate::LiteralEq { name, value }]
}

/// Join of the falsy constants, used when a false branch needs the
/// residue of an unconstrained value.
pub fn falsy_union(interner: &TypeInterner) -> TypeId {
    interner.union(vec![
        TypeId::UNDEFINED,
        TypeId::NULL,
        interner.literal_boolean(false),
        interner.literal_number(0.0),
        interner.intern(TypeData::Literal(LiteralValue::Number(OrderedFloat(
            f64::NAN,
        )))),
        interner.literal_string(""),
    ])
}

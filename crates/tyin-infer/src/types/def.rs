//! Core type definitions for the inference lattice.
//!
//! This module contains the `TypeData` enum and all type variant
//! structs. Types are structurally interned by the `TypeInterner`, so
//! every variant derives `Hash`/`Eq`; floating point literal values are
//! wrapped in `OrderedFloat` to make that possible.

use serde::Serialize;
use tyin_common::Atom;

// =============================================================================
// Type ID
// =============================================================================

/// Unique identifier for a type in the type interner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct TypeId(pub u32);

impl TypeId {
    /// Pre-registered intrinsics. The interner seeds these in order, so
    /// the ids are stable across runs.
    pub const ANY: TypeId = TypeId(0);
    pub const UNKNOWN: TypeId = TypeId(1);
    pub const NEVER: TypeId = TypeId(2);
    pub const UNDEFINED: TypeId = TypeId(3);
    pub const NULL: TypeId = TypeId(4);
    pub const BOOLEAN: TypeId = TypeId(5);
    pub const NUMBER: TypeId = TypeId(6);
    pub const STRING: TypeId = TypeId(7);
    pub const BIGINT: TypeId = TypeId(8);
    pub const SYMBOL: TypeId = TypeId(9);

    pub const INTRINSIC_COUNT: u32 = 10;

    pub fn is_intrinsic(self) -> bool {
        self.0 < Self::INTRINSIC_COUNT
    }
}

// =============================================================================
// Literal values
// =============================================================================

/// An f64 with total ordering and hashing by bit pattern, for interning
/// number literal types.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct OrderedFloat(pub f64);

impl PartialEq for OrderedFloat {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for OrderedFloat {}

impl std::hash::Hash for OrderedFloat {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

/// A literal refinement of a primitive type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum LiteralValue {
    String(Atom),
    Number(OrderedFloat),
    /// Stored as digits for precision, same rule as number otherwise.
    BigInt(Atom),
    Boolean(bool),
}

impl LiteralValue {
    /// The unrefined primitive this literal belongs to.
    pub fn primitive(&self) -> TypeId {
        match self {
            LiteralValue::String(_) => TypeId::STRING,
            LiteralValue::Number(_) => TypeId::NUMBER,
            LiteralValue::BigInt(_) => TypeId::BIGINT,
            LiteralValue::Boolean(_) => TypeId::BOOLEAN,
        }
    }

}

// =============================================================================
// Object (record) types
// =============================================================================

/// One field of a record type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct PropertyInfo {
    pub name: Atom,
    pub ty: TypeId,
    pub writable: bool,
    pub enumerable: bool,
    pub configurable: bool,
}

impl PropertyInfo {
    /// A plain data property: writable, enumerable, configurable.
    pub fn new(name: Atom, ty: TypeId) -> Self {
        PropertyInfo {
            name,
            ty,
            writable: true,
            enumerable: true,
            configurable: true,
        }
    }

    pub fn with_type(&self, ty: TypeId) -> Self {
        PropertyInfo { ty, ..self.clone() }
    }
}

/// The shape of a record: ordered fields plus prototype and seal state.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ObjectShape {
    /// Insertion-ordered fields.
    pub props: Vec<PropertyInfo>,
    /// Prototype reference; `None` is a null prototype.
    pub proto: Option<TypeId>,
    /// Sealed records forbid width extension.
    pub sealed: bool,
    /// Frozen implies sealed and read-only fields.
    pub frozen: bool,
    /// Open records carry at least these fields but may have more
    /// (computed keys degrade an object literal to open).
    pub open: bool,
}

impl ObjectShape {
    pub fn new(props: Vec<PropertyInfo>) -> Self {
        ObjectShape {
            props,
            proto: None,
            sealed: false,
            frozen: false,
            open: false,
        }
    }

    pub fn field(&self, name: Atom) -> Option<&PropertyInfo> {
        self.props.iter().find(|p| p.name == name)
    }
}

// =============================================================================
// Function and class types
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ParamInfo {
    pub name: Atom,
    pub ty: TypeId,
    pub optional: bool,
    pub rest: bool,
}

/// A function type. `decl` is the declaration node id, which keeps
/// distinct functions with identical shapes from collapsing together in
/// the interner and is the key call-site aggregation uses.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct FunctionShape {
    pub decl: u32,
    pub params: Vec<ParamInfo>,
    pub return_type: TypeId,
    pub is_async: bool,
    pub is_generator: bool,
    /// Names referenced from enclosing scopes.
    pub captures: Vec<Atom>,
}

/// A class type: constructor plus instance record plus statics.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ClassShape {
    pub name: Atom,
    pub decl: u32,
    pub ctor: TypeId,
    pub instance: TypeId,
    pub statics: Vec<PropertyInfo>,
    pub super_class: Option<TypeId>,
}

// =============================================================================
// Type variables
// =============================================================================

/// Identifier of a solver-owned type variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct VarId(pub u32);

/// Polarity of a type variable: negative variables sit in input
/// position (parameters) and accumulate lower bounds from call sites;
/// positive variables sit in output position and accumulate upper
/// bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Polarity {
    Positive,
    Negative,
}

/// Bounds for a type variable, owned by the solver for the duration of
/// one function analysis. `lower <= upper` is maintained by the solver.
#[derive(Clone, Debug)]
pub struct VarData {
    pub polarity: Polarity,
    pub lower: TypeId,
    pub upper: TypeId,
    pub hint: Atom,
}

// =============================================================================
// The type enum
// =============================================================================

/// All type variants. Large variants are boxed to keep the enum small.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum TypeData {
    /// Top. The optional reason records why inference degraded.
    Any { reason: Option<Atom> },
    Unknown,
    /// Bottom.
    Never,
    Undefined,
    Null,
    Boolean,
    Number,
    String,
    BigInt,
    Symbol,
    Literal(LiteralValue),
    Array(TypeId),
    /// Ordered finite sequence; a tuple is a subtype of the array of
    /// the union of its element types.
    Tuple(Vec<TypeId>),
    Object(Box<ObjectShape>),
    Function(Box<FunctionShape>),
    Class(Box<ClassShape>),
    /// Flat, deduplicated, >= 2 members.
    Union(Vec<TypeId>),
    Intersection(Vec<TypeId>),
    Promise(TypeId),
    /// A solver-owned type variable; eliminated before annotations
    /// leave the solver.
    Var(VarId),
    /// `mu binder. body` - a recursive type; `RecRef(binder)` inside
    /// the body refers back to the whole type.
    Recursive { binder: u32, body: TypeId },
    RecRef(u32),
}

impl TypeData {
    /// The primitive kind bucket used for widening kind counts.
    /// Returns `None` for non-primitive types.
    pub fn primitive_kind(&self) -> Option<TypeId> {
        match self {
            TypeData::Undefined => Some(TypeId::UNDEFINED),
            TypeData::Null => Some(TypeId::NULL),
            TypeData::Boolean => Some(TypeId::BOOLEAN),
            TypeData::Number => Some(TypeId::NUMBER),
            TypeData::String => Some(TypeId::STRING),
            TypeData::BigInt => Some(TypeId::BIGINT),
            TypeData::Symbol => Some(TypeId::SYMBOL),
            TypeData::Literal(lit) => Some(lit.primitive()),
            _ => None,
        }
    }
}

//! Type representation: variants, interning, rendering.

pub mod def;
pub mod display;
pub mod intern;

pub use def::{
    ClassShape, FunctionShape, LiteralValue, ObjectShape, OrderedFloat, ParamInfo, Polarity,
    PropertyInfo, TypeData, TypeId, VarData, VarId,
};
pub use display::type_to_string;
pub use intern::TypeInterner;

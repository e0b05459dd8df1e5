//! Environments, bindings, and the built-in global table.
//!
//! An `Environment` is a stack of scopes (global, function, block).
//! Lookup walks outward. `var` and `function` declarations hoist to the
//! enclosing function scope; `let`/`const` are block-scoped with a
//! temporal dead zone where pre-declaration lookup yields `undefined`.

use crate::types::{
    FunctionShape, ParamInfo, PropertyInfo, TypeData, TypeId, TypeInterner,
};
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use tyin_common::Atom;
use tyin_parser::NodeId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BindingKind {
    Var,
    Let,
    Const,
    Function,
    Class,
    Parameter,
    Builtin,
}

impl BindingKind {
    /// Hoisted bindings live in the enclosing function scope.
    pub fn hoists(self) -> bool {
        matches!(self, BindingKind::Var | BindingKind::Function)
    }
}

#[derive(Clone, Debug)]
pub struct Binding {
    pub name: Atom,
    pub ty: TypeId,
    pub kind: BindingKind,
    pub decl: NodeId,
    /// False until the declaration statement itself runs (temporal dead
    /// zone for `let`/`const`).
    pub initialized: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScopeKind {
    Global,
    Function,
    Block,
}

#[derive(Debug)]
struct Scope {
    kind: ScopeKind,
    bindings: FxHashMap<Atom, Binding>,
}

#[derive(Debug)]
pub struct Environment {
    scopes: Vec<Scope>,
}

impl Environment {
    pub fn global() -> Self {
        Environment {
            scopes: vec![Scope {
                kind: ScopeKind::Global,
                bindings: FxHashMap::default(),
            }],
        }
    }

    pub fn push(&mut self, kind: ScopeKind) {
        self.scopes.push(Scope {
            kind,
            bindings: FxHashMap::default(),
        });
    }

    pub fn pop(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Declare a binding. Hoisted kinds land in the nearest function or
    /// global scope, block-scoped kinds in the innermost scope.
    pub fn declare(&mut self, binding: Binding) {
        let index = if binding.kind.hoists() {
            self.scopes
                .iter()
                .rposition(|s| matches!(s.kind, ScopeKind::Function | ScopeKind::Global))
                .unwrap_or(0)
        } else {
            self.scopes.len() - 1
        };
        self.scopes[index].bindings.insert(binding.name, binding);
    }

    pub fn lookup(&self, name: Atom) -> Option<&Binding> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.bindings.get(&name))
    }

    pub fn lookup_mut(&mut self, name: Atom) -> Option<&mut Binding> {
        self.scopes
            .iter_mut()
            .rev()
            .find_map(|scope| scope.bindings.get_mut(&name))
    }

    pub fn kind_of(&self, name: Atom) -> Option<BindingKind> {
        self.lookup(name).map(|b| b.kind)
    }

    pub fn mark_initialized(&mut self, name: Atom) {
        if let Some(binding) = self.lookup_mut(name) {
            binding.initialized = true;
        }
    }

    /// All binding kinds flattened outermost-first, for closure capture
    /// by nested functions.
    pub fn flatten_kinds(&self) -> FxHashMap<Atom, BindingKind> {
        let mut kinds = FxHashMap::default();
        for scope in &self.scopes {
            for (name, binding) in &scope.bindings {
                kinds.insert(*name, binding.kind);
            }
        }
        kinds
    }
}

// =============================================================================
// Builtins
// =============================================================================

/// Globals the engine knows about without a declaration. Anything else
/// resolves to `any` with an `unbound` reason.
static BUILTIN_CONSTRUCTORS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "Object", "Array", "String", "Number", "Boolean", "Promise", "Symbol", "Error",
        "globalThis",
    ]
});

/// Install the built-in global bindings into a state map. Builtin
/// function declaration ids count down from `u32::MAX` so distinct
/// builtins never collapse in the interner or collide with AST ids.
pub fn install_builtins(interner: &TypeInterner, out: &mut crate::state::TypeState) {
    let mut next_decl = u32::MAX;
    let mut fresh_decl = || {
        let id = next_decl;
        next_decl -= 1;
        id
    };

    let any_args = |interner: &TypeInterner, decl: u32, ret: TypeId| {
        let args = interner.intern_string("args");
        interner.function(FunctionShape {
            decl,
            params: vec![ParamInfo {
                name: args,
                ty: interner.array(TypeId::ANY),
                optional: true,
                rest: true,
            }],
            return_type: ret,
            is_async: false,
            is_generator: false,
            captures: Vec::new(),
        })
    };
    let unary_fn = |interner: &TypeInterner, decl: u32, param: &str, ty: TypeId, ret: TypeId| {
        let name = interner.intern_string(param);
        interner.function(FunctionShape {
            decl,
            params: vec![ParamInfo {
                name,
                ty,
                optional: false,
                rest: false,
            }],
            return_type: ret,
            is_async: false,
            is_generator: false,
            captures: Vec::new(),
        })
    };

    // console
    let log = any_args(interner, fresh_decl(), TypeId::UNDEFINED);
    let console_props = ["log", "warn", "error", "info", "debug"]
        .iter()
        .map(|method| PropertyInfo::new(interner.intern_string(method), log))
        .collect();
    let console = interner.object(console_props);
    out.set(interner.intern_string("console"), console);

    // Math
    let number_fn = any_args(interner, fresh_decl(), TypeId::NUMBER);
    let mut math_props: Vec<PropertyInfo> = [
        "floor", "ceil", "round", "trunc", "abs", "sqrt", "pow", "max", "min", "random", "log",
        "sin", "cos", "tan",
    ]
    .iter()
    .map(|method| PropertyInfo::new(interner.intern_string(method), number_fn))
    .collect();
    math_props.push(PropertyInfo::new(
        interner.intern_string("PI"),
        TypeId::NUMBER,
    ));
    math_props.push(PropertyInfo::new(
        interner.intern_string("E"),
        TypeId::NUMBER,
    ));
    out.set(interner.intern_string("Math"), interner.object(math_props));

    // JSON
    let json_parse = unary_fn(interner, fresh_decl(), "text", TypeId::STRING, TypeId::ANY);
    let json_stringify = unary_fn(interner, fresh_decl(), "value", TypeId::ANY, TypeId::STRING);
    let json = interner.object(vec![
        PropertyInfo::new(interner.intern_string("parse"), json_parse),
        PropertyInfo::new(interner.intern_string("stringify"), json_stringify),
    ]);
    out.set(interner.intern_string("JSON"), json);

    // Free functions and constants
    let parse_int = unary_fn(interner, fresh_decl(), "text", TypeId::STRING, TypeId::NUMBER);
    out.set(interner.intern_string("parseInt"), parse_int);
    let parse_float = unary_fn(interner, fresh_decl(), "text", TypeId::STRING, TypeId::NUMBER);
    out.set(interner.intern_string("parseFloat"), parse_float);
    let is_nan = unary_fn(interner, fresh_decl(), "value", TypeId::ANY, TypeId::BOOLEAN);
    out.set(interner.intern_string("isNaN"), is_nan);
    let is_finite = unary_fn(interner, fresh_decl(), "value", TypeId::ANY, TypeId::BOOLEAN);
    out.set(interner.intern_string("isFinite"), is_finite);
    out.set(
        interner.intern_string("NaN"),
        interner.intern(TypeData::Literal(crate::types::LiteralValue::Number(
            crate::types::OrderedFloat(f64::NAN),
        ))),
    );
    out.set(interner.intern_string("Infinity"), TypeId::NUMBER);

    for name in BUILTIN_CONSTRUCTORS.iter() {
        let atom = interner.intern_string(name);
        out.set(atom, interner.any_with_reason("builtin"));
    }
}

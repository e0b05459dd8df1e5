//! Per-block type state.
//!
//! A `TypeState` maps variable names to their current types. States are
//! partially ordered pointwise with missing keys at bottom; the join of
//! two states is pointwise join over the union of keys, with keys
//! absent on one side passing through unchanged.

use crate::lattice::join;
use crate::types::{TypeId, TypeInterner};
use rustc_hash::FxHashMap;
use tyin_common::Atom;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TypeState {
    map: FxHashMap<Atom, TypeId>,
}

impl TypeState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: Atom) -> Option<TypeId> {
        self.map.get(&name).copied()
    }

    pub fn set(&mut self, name: Atom, ty: TypeId) {
        self.map.insert(name, ty);
    }

    pub fn remove(&mut self, name: Atom) {
        self.map.remove(&name);
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Atom, TypeId)> + '_ {
        self.map.iter().map(|(k, v)| (*k, *v))
    }

    /// Join `incoming` into `self`. Returns whether `self` changed.
    /// `widen` is consulted for keys that need a coarser join (loop
    /// headers on back-edges).
    pub fn join_from(
        &mut self,
        interner: &TypeInterner,
        incoming: &TypeState,
        mut widen: impl FnMut(Atom, TypeId, TypeId) -> Option<TypeId>,
    ) -> bool {
        let mut changed = false;
        for (name, incoming_ty) in incoming.iter() {
            match self.map.get(&name).copied() {
                None => {
                    self.map.insert(name, incoming_ty);
                    changed = true;
                }
                Some(current) => {
                    let joined = match widen(name, current, incoming_ty) {
                        Some(widened) => widened,
                        None => join(interner, current, incoming_ty),
                    };
                    if joined != current {
                        self.map.insert(name, joined);
                        changed = true;
                    }
                }
            }
        }
        changed
    }

    /// Pointwise partial order: `self <= other` iff every binding in
    /// `self` is a subtype of the corresponding binding in `other`
    /// (missing keys in `other` treated as bottom).
    pub fn leq(&self, interner: &TypeInterner, other: &TypeState) -> bool {
        let mut checker = crate::subtype::SubtypeChecker::new(interner);
        self.iter().all(|(name, ty)| {
            other
                .get(name)
                .is_some_and(|other_ty| checker.is_subtype_of(ty, other_ty))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_adds_missing_keys() {
        let interner = TypeInterner::new();
        let x = interner.intern_string("x");
        let mut a = TypeState::new();
        let mut b = TypeState::new();
        b.set(x, TypeId::NUMBER);
        assert!(a.join_from(&interner, &b, |_, _, _| None));
        assert_eq!(a.get(x), Some(TypeId::NUMBER));
        // Second join is a no-op
        assert!(!a.join_from(&interner, &b, |_, _, _| None));
    }

    #[test]
    fn test_join_is_pointwise() {
        let interner = TypeInterner::new();
        let x = interner.intern_string("x");
        let mut a = TypeState::new();
        a.set(x, TypeId::NUMBER);
        let mut b = TypeState::new();
        b.set(x, TypeId::STRING);
        assert!(a.join_from(&interner, &b, |_, _, _| None));
        assert_eq!(a.get(x), Some(interner.union2(TypeId::NUMBER, TypeId::STRING)));
    }

    #[test]
    fn test_keys_absent_on_one_side_pass_through() {
        let interner = TypeInterner::new();
        let x = interner.intern_string("x");
        let y = interner.intern_string("y");
        let mut a = TypeState::new();
        a.set(x, TypeId::NUMBER);
        let mut b = TypeState::new();
        b.set(y, TypeId::STRING);
        a.join_from(&interner, &b, |_, _, _| None);
        assert_eq!(a.get(x), Some(TypeId::NUMBER));
        assert_eq!(a.get(y), Some(TypeId::STRING));
    }
}

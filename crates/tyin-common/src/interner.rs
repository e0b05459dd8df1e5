//! String interning for identifier and property name deduplication.
//!
//! Interning turns repeated string comparisons into u32 comparisons and
//! lets type states and record fields key on a copyable `Atom`.

use rustc_hash::FxHashMap;
use serde::Serialize;
use std::cell::RefCell;

/// An interned string handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Atom(pub u32);

impl Atom {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A single-threaded string interner.
///
/// Uses interior mutability so callers holding a shared reference can
/// intern; the inference engine is sequential (no suspension points), so
/// the `RefCell` borrows are always short-lived.
#[derive(Debug, Default)]
pub struct Interner {
    inner: RefCell<InternerInner>,
}

#[derive(Debug, Default)]
struct InternerInner {
    map: FxHashMap<Box<str>, Atom>,
    strings: Vec<Box<str>>,
}

impl Interner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a string, returning its atom. Repeated calls with equal
    /// strings return the same atom.
    pub fn intern(&self, s: &str) -> Atom {
        let mut inner = self.inner.borrow_mut();
        if let Some(&atom) = inner.map.get(s) {
            return atom;
        }
        let atom = Atom(u32::try_from(inner.strings.len()).unwrap_or(u32::MAX));
        let boxed: Box<str> = s.into();
        inner.strings.push(boxed.clone());
        inner.map.insert(boxed, atom);
        atom
    }

    /// Resolve an atom back to its string.
    ///
    /// Returns an owned copy; atoms resolve in hot paths only during
    /// display and annotation emission.
    #[must_use]
    pub fn resolve(&self, atom: Atom) -> String {
        self.inner
            .borrow()
            .strings
            .get(atom.index())
            .map(|s| s.to_string())
            .unwrap_or_default()
    }

    /// Number of distinct interned strings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().strings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interner_deduplication() {
        let interner = Interner::new();
        let a = interner.intern("hello");
        let b = interner.intern("hello");
        let c = interner.intern("world");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(interner.len(), 2);
    }

    #[test]
    fn test_interner_resolve() {
        let interner = Interner::new();
        let atom = interner.intern("next");
        assert_eq!(interner.resolve(atom), "next");
        assert_eq!(interner.resolve(Atom(999)), "");
    }
}

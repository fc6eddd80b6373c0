//! String interning for name symbols.
//!
//! Every identifier in a compilation unit is interned once into an `Atom`,
//! a 4-byte handle. Name comparison throughout the binder and checker is
//! then a plain integer compare, and the name table can key its binding
//! stacks on `Atom` directly.

use rustc_hash::FxHashMap;

/// An interned name symbol. Equality means string equality within the
/// owning `Interner`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Atom(pub u32);

/// Interns strings, handing out stable `Atom` handles.
///
/// Atoms are only meaningful against the interner that produced them; each
/// compilation unit owns exactly one.
#[derive(Debug, Default)]
pub struct Interner {
    map: FxHashMap<Box<str>, Atom>,
    strings: Vec<Box<str>>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a string, returning its atom. Repeated calls with equal
    /// strings return the same atom.
    pub fn intern(&mut self, text: &str) -> Atom {
        if let Some(&atom) = self.map.get(text) {
            return atom;
        }
        let atom = Atom(self.strings.len() as u32);
        let boxed: Box<str> = text.into();
        self.strings.push(boxed.clone());
        self.map.insert(boxed, atom);
        atom
    }

    /// Resolve an atom back to its string.
    pub fn resolve(&self, atom: Atom) -> &str {
        &self.strings[atom.0 as usize]
    }

    /// Number of distinct interned strings.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/interner_tests.rs"]
mod interner_tests;

//! Node sequences.
//!
//! Two containers recur throughout the IR: plain ordered sequences
//! (statement lists, argument lists, parameter lists) and ordered
//! name-indexed sequences (module members, struct fields) where declaration
//! order matters for the emitter and names must still be looked up.

use conec_common::Atom;
use indexmap::IndexMap;

use crate::arena::NodeId;

/// An ordered, append-only sequence of nodes. Iteration is insertion order.
pub type NodeList = Vec<NodeId>;

/// An ordered name -> node sequence.
///
/// Preserves insertion order (the emitter depends on field order) while
/// supporting lookup by name symbol. At most one node per name; overloads
/// live in plain method `NodeList`s instead.
#[derive(Debug, Default, Clone)]
pub struct NamedNodes {
    entries: IndexMap<Atom, NodeId>,
}

impl NamedNodes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named node. Returns the previously bound node if the name was
    /// already present (the caller diagnoses the duplicate); the original
    /// binding is kept.
    pub fn add(&mut self, name: Atom, node: NodeId) -> Option<NodeId> {
        match self.entries.entry(name) {
            indexmap::map::Entry::Occupied(prior) => Some(*prior.get()),
            indexmap::map::Entry::Vacant(slot) => {
                slot.insert(node);
                None
            }
        }
    }

    /// Find a node by name.
    pub fn find(&self, name: Atom) -> Option<NodeId> {
        self.entries.get(&name).copied()
    }

    /// Iterate (name, node) pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (Atom, NodeId)> + '_ {
        self.entries.iter().map(|(&name, &node)| (name, node))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/seq_tests.rs"]
mod seq_tests;

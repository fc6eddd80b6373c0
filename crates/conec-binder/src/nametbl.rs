//! The global name table.
//!
//! Each name symbol maps to a stack of visible bindings; the innermost
//! binding shadows outer ones. Scopes hook their declarations on entry and
//! unhook exactly that set, in reverse order, on exit. Frames make the
//! unhook bookkeeping structural: every `push_frame` records which symbols
//! the scope hooked, and `pop_frame` restores the shadowed bindings, so
//! the hook/unhook pairing holds on every exit path.

use conec_common::Atom;
use conec_ir::NodeId;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Binding stacks keyed by name symbol, plus the frame stack that scopes
/// hook through. Holds only non-owning `NodeId` back-references.
#[derive(Debug, Default)]
pub struct NameTable {
    bindings: FxHashMap<Atom, SmallVec<[NodeId; 2]>>,
    frames: Vec<Vec<Atom>>,
}

impl NameTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a scope frame. Subsequent hooks are recorded against it.
    pub fn push_frame(&mut self) {
        self.frames.push(Vec::new());
    }

    /// Hook a declaration: the new binding shadows any outer one for the
    /// same symbol until the current frame pops.
    ///
    /// Must be called inside a frame.
    pub fn hook(&mut self, sym: Atom, decl: NodeId) {
        self.bindings.entry(sym).or_default().push(decl);
        self.frames
            .last_mut()
            .expect("name table hook outside any scope frame")
            .push(sym);
    }

    /// Current innermost binding for a symbol, if any.
    pub fn lookup(&self, sym: Atom) -> Option<NodeId> {
        self.bindings.get(&sym).and_then(|stack| stack.last()).copied()
    }

    /// Close the current frame, unhooking its bindings in reverse hook
    /// order and restoring whatever they shadowed.
    pub fn pop_frame(&mut self) {
        let frame = self
            .frames
            .pop()
            .expect("name table pop without a matching frame");
        for sym in frame.into_iter().rev() {
            if let Some(stack) = self.bindings.get_mut(&sym) {
                stack.pop();
                if stack.is_empty() {
                    self.bindings.remove(&sym);
                }
            }
        }
    }

    /// Number of open frames.
    pub fn frame_depth(&self) -> usize {
        self.frames.len()
    }

    /// True when no pass-introduced bindings remain. Holds after the root
    /// pass returns.
    pub fn is_balanced(&self) -> bool {
        self.frames.is_empty() && self.bindings.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/nametbl_tests.rs"]
mod nametbl_tests;

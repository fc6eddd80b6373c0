//! The permission model.
//!
//! Permissions qualify references and variables with read/write/alias/
//! threading rights. They form a closed set, so they are carried inline as
//! a value enum rather than as arena nodes.

use bitflags::bitflags;

/// Reference/variable permissions, in declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Perm {
    /// Unique: sole owner, read/write, no live aliases.
    Uni,
    /// Mutable: read/write, aliasable, single-threaded.
    Mut,
    /// Immutable: read-only, aliasable, shareable across threads.
    Imm,
    /// Const: read-only view over anything.
    Const,
    /// Mutex-guarded mutable: read/write under the designated lock.
    Mutx,
    /// Identity: no content access, identity comparison only.
    Id,
    /// Lock: the lock-holding view of a `mutx` reference.
    Lock,
}

bitflags! {
    /// Capability bits a permission grants. Each set bit enables a
    /// capability; clear bits deny it.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct PermFlags: u8 {
        /// Contents may be read.
        const MAY_READ = 0x01;
        /// Contents may be mutated.
        const MAY_WRITE = 0x02;
        /// Another live alias may be created able to read the contents.
        const MAY_ALIAS = 0x04;
        /// Another live alias may be created able to write the contents.
        const MAY_ALIAS_WRITE = 0x08;
        /// A reference may be shared with or sent to another thread.
        const RACE_SAFE = 0x10;
        /// No locks are needed to read or mutate the contents.
        const IS_LOCKLESS = 0x40;
    }
}

impl Perm {
    /// Capability bits granted by this permission.
    pub const fn flags(self) -> PermFlags {
        match self {
            Perm::Uni => PermFlags::MAY_READ
                .union(PermFlags::MAY_WRITE)
                .union(PermFlags::RACE_SAFE)
                .union(PermFlags::IS_LOCKLESS),
            Perm::Mut => PermFlags::MAY_READ
                .union(PermFlags::MAY_WRITE)
                .union(PermFlags::MAY_ALIAS)
                .union(PermFlags::MAY_ALIAS_WRITE)
                .union(PermFlags::IS_LOCKLESS),
            Perm::Imm => PermFlags::MAY_READ
                .union(PermFlags::MAY_ALIAS)
                .union(PermFlags::RACE_SAFE)
                .union(PermFlags::IS_LOCKLESS),
            Perm::Const => PermFlags::MAY_READ
                .union(PermFlags::MAY_ALIAS)
                .union(PermFlags::IS_LOCKLESS),
            Perm::Mutx => PermFlags::MAY_READ
                .union(PermFlags::MAY_WRITE)
                .union(PermFlags::MAY_ALIAS)
                .union(PermFlags::MAY_ALIAS_WRITE)
                .union(PermFlags::RACE_SAFE),
            Perm::Id => PermFlags::MAY_ALIAS.union(PermFlags::RACE_SAFE).union(PermFlags::IS_LOCKLESS),
            Perm::Lock => PermFlags::MAY_READ
                .union(PermFlags::MAY_WRITE)
                .union(PermFlags::MAY_ALIAS)
                .union(PermFlags::MAY_ALIAS_WRITE)
                .union(PermFlags::RACE_SAFE),
        }
    }

    /// Whether an lval with this permission may be written.
    ///
    /// `mutx` counts as mutable; enforcing its lock discipline is the flow
    /// pass's and emitter's concern, not the assignment check's.
    pub const fn is_mutable(self) -> bool {
        self.flags().contains(PermFlags::MAY_WRITE)
    }

    /// Directional permission compatibility: can a reference with
    /// permission `self` be supplied from a source with permission
    /// `source`?
    pub const fn accepts(self, source: Perm) -> bool {
        match self {
            Perm::Uni => matches!(source, Perm::Uni),
            Perm::Mut => matches!(source, Perm::Uni | Perm::Mut),
            Perm::Imm => matches!(source, Perm::Uni | Perm::Imm),
            Perm::Const => true,
            Perm::Mutx => matches!(source, Perm::Uni | Perm::Mut | Perm::Mutx),
            Perm::Id => true,
            Perm::Lock => matches!(source, Perm::Lock),
        }
    }
}

#[cfg(test)]
#[path = "tests/perm_tests.rs"]
mod perm_tests;

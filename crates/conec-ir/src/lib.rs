//! Arena-allocated IR node model for the conec compiler front-end.
//!
//! This crate provides:
//! - `IrArena` - bump arena of IR nodes addressed by `NodeId`
//! - `Node`/`NodeKind` - the polymorphic node model shared by all passes
//! - Type nodes and the canonical primitive types
//! - `Perm` - the permission model for references and variables
//! - `CompileUnit` - the per-unit compiler context threaded through passes
//!
//! A parser builds the untyped tree through the constructor methods on
//! `IrArena`; the binder and checker then mutate it in place. All
//! cross-references between nodes are `NodeId` indices, so back-edges
//! (declaration references, owner links) never carry ownership.

pub mod arena;
pub use arena::{IrArena, NodeId};

pub mod node;
pub use node::{
    Assign, AssignKind, Binary, Block, Element, FnCall, FnDcl, If, Module, NameUse, Node, NodeKind,
    Program, VarDcl, While,
};

pub mod seq;
pub use seq::{NamedNodes, NodeList};

pub mod ty;
pub use ty::{Alloc, ArrayType, FnSig, NumKind, NumType, RefType, StructType, TupleType};

pub mod perm;
pub use perm::{Perm, PermFlags};

pub mod intrinsics;

pub mod unit;
pub use unit::CompileUnit;

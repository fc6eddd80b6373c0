//! Type node payloads.
//!
//! Types are ordinary arena nodes so that expressions' value-type slots,
//! declared types, and signature references are all plain `NodeId`s.
//! Canonical primitive types are pre-seeded by `IrArena::new` at fixed ids;
//! everything else is built by the parser (or the checker, for inserted
//! casts and inferred reference element types).

use conec_common::Atom;

use crate::arena::NodeId;
use crate::perm::Perm;
use crate::seq::{NamedNodes, NodeList};

/// Numeric kind of a primitive number type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NumKind {
    Int,
    UInt,
    Float,
}

/// Primitive numeric type: kind plus bit width (1, 8, 16, 32 or 64).
/// `bool` is the 1-bit unsigned number type.
///
/// Number types name methods: the intrinsic arithmetic and comparison
/// operators live in `methods` so operator expressions resolve through
/// ordinary method dispatch.
#[derive(Clone, Debug)]
pub struct NumType {
    pub kind: NumKind,
    pub bits: u8,
    pub methods: NodeList,
}

/// Allocator tag of a reference type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alloc {
    /// Borrowed reference; lifetime constrained by the borrowee's scope.
    Borrow,
    /// Owning reference; allocation and destructor scheduling are delegated
    /// to the configured allocator.
    Own,
}

/// Reference type: element type + permission + allocator tag.
///
/// `pvtype` may start as `NodeId::VOID` on an `address-of` whose element
/// type is inferred from the borrowed expression during type check.
#[derive(Clone, Copy, Debug)]
pub struct RefType {
    pub pvtype: NodeId,
    pub perm: Perm,
    pub alloc: Alloc,
}

/// Function signature: return type plus parameter list.
///
/// Parameters are `VarDcl` nodes at scope depth 1; a parameter's
/// initializer, when present, is its declared default argument.
#[derive(Clone, Debug)]
pub struct FnSig {
    pub rettype: NodeId,
    pub parms: NodeList,
}

/// Struct (or alloc-struct) type: ordered fields plus method list.
///
/// Fields are name-indexed because field access resolves by name while the
/// emitter depends on declaration order. Methods are a plain ordered list:
/// only methods may share a name (overloads), and dispatch scans them.
#[derive(Clone, Debug)]
pub struct StructType {
    pub name: Atom,
    pub fields: NamedNodes,
    pub methods: NodeList,
    pub is_alloc: bool,
    pub owner: Option<NodeId>,
}

/// Fixed-size array type.
#[derive(Clone, Copy, Debug)]
pub struct ArrayType {
    pub size: u32,
    pub elemtype: NodeId,
}

/// Tuple type, used for multi-value returns.
#[derive(Clone, Debug)]
pub struct TupleType {
    pub elems: NodeList,
}

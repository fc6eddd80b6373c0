//! The type algebra: extraction, equality, matching, coercion.
//!
//! All relations operate on arena node ids and transparently strip
//! `NameUse` type references down to their referent type node, so callers
//! can hand in whatever a declared-type slot happens to hold.
//!
//! `coerce` is the one mutating operation: it rewrites an expression slot
//! by wrapping the expression in a cast node when a numeric conversion is
//! needed. Reference-to-reference compatibility never needs a wrapper;
//! permission compatibility is part of reference equality itself.

use conec_ir::{IrArena, NodeId, NodeKind, NumKind};
use tracing::trace;

/// How a source relates to a target type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Match {
    /// No implicit conversion exists.
    None,
    /// Types are equal; nothing to do.
    Exact,
    /// Convertible by inserting a cast.
    Coerce,
}

/// Strip a single layer of `NameUse` type reference to its referent,
/// yielding the canonical type node.
pub fn type_of(arena: &IrArena, ty: NodeId) -> NodeId {
    match arena.kind(ty) {
        NodeKind::NameUse(use_) => use_.dcl.unwrap_or(ty),
        _ => ty,
    }
}

/// Value-type of an expression (or declared type of a declaration).
pub fn vtype_of(arena: &IrArena, node: NodeId) -> NodeId {
    type_of(arena, arena.vtype(node))
}

/// Structural type equality, directional where permissions are involved:
/// `type_eq(target, source)` asks whether a source value is usable exactly
/// where the target type is expected.
pub fn type_eq(arena: &IrArena, target: NodeId, source: NodeId) -> bool {
    let t = type_of(arena, target);
    let s = type_of(arena, source);
    if t == s {
        return true;
    }
    match (arena.kind(t), arena.kind(s)) {
        (NodeKind::NumType(a), NodeKind::NumType(b)) => a.kind == b.kind && a.bits == b.bits,
        (NodeKind::VoidType, NodeKind::VoidType) => true,
        (NodeKind::RefType(a), NodeKind::RefType(b)) => {
            a.alloc == b.alloc
                && a.perm.accepts(b.perm)
                && type_eq(arena, a.pvtype, b.pvtype)
        }
        (NodeKind::FnSig(a), NodeKind::FnSig(b)) => {
            if a.parms.len() != b.parms.len() || !type_eq(arena, a.rettype, b.rettype) {
                return false;
            }
            a.parms
                .iter()
                .zip(b.parms.iter())
                .all(|(&pa, &pb)| type_eq(arena, arena.vtype(pa), arena.vtype(pb)))
        }
        (NodeKind::StructType(a), NodeKind::StructType(b)) => {
            if a.fields.len() != b.fields.len() {
                return false;
            }
            a.fields.iter().zip(b.fields.iter()).all(|((na, fa), (nb, fb))| {
                na == nb && type_eq(arena, arena.vtype(fa), arena.vtype(fb))
            })
        }
        (NodeKind::ArrayType(a), NodeKind::ArrayType(b)) => {
            a.size == b.size && type_eq(arena, a.elemtype, b.elemtype)
        }
        (NodeKind::TupleType(a), NodeKind::TupleType(b)) => {
            a.elems.len() == b.elems.len()
                && a.elems
                    .iter()
                    .zip(b.elems.iter())
                    .all(|(&ea, &eb)| type_eq(arena, ea, eb))
        }
        _ => false,
    }
}

/// How an expression relates to a target type under implicit conversion.
///
/// Numeric widening within one kind converts; cross-kind conversions are
/// reserved for explicit casts, except that an untyped-by-intent integer
/// literal may take on any numeric target (its value is known) and a float
/// literal any float target. `bool` never gains an implicit source.
pub fn can_coerce(arena: &IrArena, target: NodeId, exp: NodeId) -> Match {
    let t = type_of(arena, target);
    let s = vtype_of(arena, exp);
    if type_eq(arena, t, s) {
        return Match::Exact;
    }
    if let (NodeKind::NumType(tn), NodeKind::NumType(sn)) = (arena.kind(t), arena.kind(s)) {
        // bool (the 1-bit number) is never an implicit target
        if tn.bits == 1 {
            return Match::None;
        }
        if tn.kind == sn.kind && tn.bits > sn.bits {
            return Match::Coerce;
        }
        match arena.kind(exp) {
            NodeKind::ULit(_) => return Match::Coerce,
            NodeKind::FLit(_) if tn.kind == NumKind::Float => return Match::Coerce,
            _ => {}
        }
    }
    Match::None
}

/// Coerce the expression in `slot` to the target type, wrapping it in a
/// cast node when conversion is needed. Returns false when no implicit
/// conversion exists; the slot is left untouched in that case.
pub fn coerce(arena: &mut IrArena, target: NodeId, slot: &mut NodeId) -> bool {
    match can_coerce(arena, target, *slot) {
        Match::Exact => true,
        Match::Coerce => {
            let t = type_of(arena, target);
            let span = arena.span(*slot);
            let cast = arena.new_cast(span, *slot, t);
            trace!(exp = slot.0, cast = cast.0, "inserted coercion cast");
            *slot = cast;
            true
        }
        Match::None => false,
    }
}

/// Insert an automatic dereference if the expression in `slot` is of
/// reference type; its value-type becomes the pointee.
pub fn deref_auto(arena: &mut IrArena, slot: &mut NodeId) {
    let ty = vtype_of(arena, *slot);
    let NodeKind::RefType(r) = arena.kind(ty) else {
        return;
    };
    let pvtype = r.pvtype;
    let span = arena.span(*slot);
    let deref = arena.new_deref(span, *slot);
    arena.set_vtype(deref, pvtype);
    *slot = deref;
}

/// Whether an explicit cast between these types is legal: number to
/// number (including bool), reference to reference.
pub fn is_castable(arena: &IrArena, target: NodeId, source: NodeId) -> bool {
    let t = type_of(arena, target);
    let s = type_of(arena, source);
    matches!(
        (arena.kind(t), arena.kind(s)),
        (NodeKind::NumType(_), NodeKind::NumType(_)) | (NodeKind::RefType(_), NodeKind::RefType(_))
    )
}

#[cfg(test)]
#[path = "tests/relate_tests.rs"]
mod relate_tests;

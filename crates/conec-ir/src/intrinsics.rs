//! Intrinsic methods on the primitive number types.
//!
//! Operator expressions (`1 + 2`, `a < b`) reach the checker as method
//! calls, so every numeric type carries the intrinsic arithmetic and
//! comparison operators in its method list. Intrinsics have no body; the
//! emitter lowers them directly to machine operations.

use conec_common::{Interner, Span};

use crate::arena::{IrArena, NodeId};
use crate::node::NodeKind;
use crate::perm::Perm;

const ARITH_OPS: [&str; 5] = ["+", "-", "*", "/", "%"];
const CMP_OPS: [&str; 6] = ["==", "!=", "<", "<=", ">", ">="];

const NUMERIC_TYPES: [NodeId; 12] = [
    NodeId::I8,
    NodeId::I16,
    NodeId::I32,
    NodeId::I64,
    NodeId::U8,
    NodeId::U16,
    NodeId::U32,
    NodeId::U64,
    NodeId::F32,
    NodeId::F64,
    NodeId::USIZE,
    NodeId::BOOL,
];

/// Install the intrinsic operator methods on every canonical number type.
/// Runs once per compilation unit, right after the arena is seeded.
pub fn install_numeric_methods(arena: &mut IrArena, interner: &mut Interner) {
    let self_sym = interner.intern("self");
    let other_sym = interner.intern("n");

    for &ty in &NUMERIC_TYPES {
        // bool gets only the comparison operators
        if ty != NodeId::BOOL {
            for op in ARITH_OPS {
                let op_sym = interner.intern(op);
                let p0 = arena.new_var_dcl(Span::dummy(), self_sym, Perm::Imm, ty, None);
                let p1 = arena.new_var_dcl(Span::dummy(), other_sym, Perm::Imm, ty, None);
                set_parm_scope(arena, p0);
                set_parm_scope(arena, p1);
                let sig = arena.new_fn_sig(ty, vec![p0, p1]);
                let method = arena.new_fn_dcl(Span::dummy(), op_sym, sig, None);
                push_method(arena, ty, method);
            }
        }
        for op in CMP_OPS {
            let op_sym = interner.intern(op);
            let p0 = arena.new_var_dcl(Span::dummy(), self_sym, Perm::Imm, ty, None);
            let p1 = arena.new_var_dcl(Span::dummy(), other_sym, Perm::Imm, ty, None);
            set_parm_scope(arena, p0);
            set_parm_scope(arena, p1);
            let sig = arena.new_fn_sig(NodeId::BOOL, vec![p0, p1]);
            let method = arena.new_fn_dcl(Span::dummy(), op_sym, sig, None);
            push_method(arena, ty, method);
        }
    }
}

fn set_parm_scope(arena: &mut IrArena, parm: NodeId) {
    if let NodeKind::VarDcl(var) = &mut arena.get_mut(parm).kind {
        var.scope = 1;
    }
}

fn push_method(arena: &mut IrArena, ty: NodeId, method: NodeId) {
    if let NodeKind::FnDcl(fun) = &mut arena.get_mut(method).kind {
        fun.owner = Some(ty);
    }
    if let NodeKind::NumType(num) = &mut arena.get_mut(ty).kind {
        num.methods.push(method);
    }
}

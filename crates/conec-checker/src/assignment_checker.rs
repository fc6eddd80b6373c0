//! Assignment checking: lval forms, coercion, mutability.

use conec_common::diagnostics::{diagnostic_codes, diagnostic_messages};
use conec_ir::{NodeId, NodeKind, Perm};

use crate::relate::{coerce, vtype_of};
use crate::state::CheckerState;

impl CheckerState<'_> {
    pub(crate) fn check_assign(&mut self, id: NodeId) {
        let (lval, rval) = match self.unit.arena.kind(id) {
            NodeKind::Assign(assign) => (assign.lval, assign.rval),
            _ => return,
        };
        let mut lval_slot = lval;
        let mut rval_slot = rval;
        self.check(&mut lval_slot);
        self.check(&mut rval_slot);

        if !self.is_lval(lval_slot) {
            self.unit.error_at(
                lval_slot,
                diagnostic_codes::NOT_LVAL,
                diagnostic_messages::NOT_LVAL,
            );
        } else {
            let lval_ty = self.unit.arena.vtype(lval_slot);
            if !coerce(&mut self.unit.arena, lval_ty, &mut rval_slot) {
                self.unit.error_at(
                    rval_slot,
                    diagnostic_codes::INVALID_TYPE,
                    diagnostic_messages::INVALID_TYPE,
                );
            } else if !self.lval_perm(lval_slot).is_some_and(Perm::is_mutable) {
                self.unit.error_at(
                    lval_slot,
                    diagnostic_codes::NOT_MUTABLE,
                    diagnostic_messages::NOT_MUTABLE,
                );
            }
        }

        let vtype = self.unit.arena.vtype(rval_slot);
        self.unit.arena.set_vtype(id, vtype);
        if let NodeKind::Assign(assign) = &mut self.unit.arena.get_mut(id).kind {
            assign.lval = lval_slot;
            assign.rval = rval_slot;
        }
    }

    /// An expression denotes a storage location when it is a variable
    /// name use, a dereference, or a field element.
    pub(crate) fn is_lval(&self, node: NodeId) -> bool {
        match self.unit.arena.kind(node) {
            NodeKind::NameUse(use_) => use_
                .dcl
                .is_some_and(|dcl| matches!(self.unit.arena.kind(dcl), NodeKind::VarDcl(_))),
            NodeKind::Deref(_) | NodeKind::Element(_) => true,
            _ => false,
        }
    }

    /// Permission governing writes through an lval: a variable's own
    /// permission, a reference's permission when writing through a deref,
    /// and the owning path's permission for a field element.
    pub(crate) fn lval_perm(&self, node: NodeId) -> Option<Perm> {
        match self.unit.arena.kind(node) {
            NodeKind::NameUse(use_) => match self.unit.arena.kind(use_.dcl?) {
                NodeKind::VarDcl(var) => Some(var.perm),
                _ => None,
            },
            NodeKind::Deref(exp) => {
                let ty = vtype_of(&self.unit.arena, *exp);
                match self.unit.arena.kind(ty) {
                    NodeKind::RefType(r) => Some(r.perm),
                    _ => None,
                }
            }
            NodeKind::Element(elem) => self.lval_perm(elem.owner),
            _ => None,
        }
    }
}

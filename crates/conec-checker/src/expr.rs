//! Expression handlers: address-of, dereference, cast, field access,
//! value tuples.

use conec_common::diagnostics::{diagnostic_codes, diagnostic_messages, format_message};
use conec_ir::{NodeId, NodeKind, ty::Alloc};

use crate::relate::{deref_auto, is_castable, type_of, vtype_of};
use crate::state::CheckerState;

impl CheckerState<'_> {
    /// Address-of / allocate. The node's value-type slot already holds the
    /// reference type the parser built; an element type of void is
    /// inferred from the operand. A borrow additionally requires a
    /// variable lval whose permission can supply the reference's.
    pub(crate) fn check_addr_of(&mut self, id: NodeId, exp: NodeId) {
        let mut exp_slot = exp;
        self.check(&mut exp_slot);
        if let NodeKind::AddrOf(slot) = &mut self.unit.arena.get_mut(id).kind {
            *slot = exp_slot;
        }

        if !self.unit.arena.kind(exp_slot).is_expr() {
            self.unit.error_at(
                exp_slot,
                diagnostic_codes::BAD_TERM,
                diagnostic_messages::BAD_TERM,
            );
            return;
        }

        let reftype = self.unit.arena.vtype(id);
        let (pvtype, perm, alloc) = match self.unit.arena.kind(reftype) {
            NodeKind::RefType(r) => (r.pvtype, r.perm, r.alloc),
            _ => return,
        };
        if pvtype == NodeId::VOID {
            let inferred = self.unit.arena.vtype(exp_slot);
            if let NodeKind::RefType(r) = &mut self.unit.arena.get_mut(reftype).kind {
                r.pvtype = inferred;
            }
        }

        match alloc {
            Alloc::Borrow => self.check_borrow(id, exp_slot, perm),
            // Owning allocation is delegated to the allocator; the flow
            // pass schedules its dealias.
            Alloc::Own => {}
        }
    }

    /// A borrow may only take the address of a named declaration, and the
    /// borrowee's permission must be able to supply the reference's.
    /// Functions borrow as immutable sources.
    fn check_borrow(&mut self, id: NodeId, exp: NodeId, ref_perm: conec_ir::Perm) {
        let dcl = match self.unit.arena.kind(exp) {
            NodeKind::NameUse(use_) => use_.dcl,
            _ => None,
        };
        let var_perm = dcl.and_then(|dcl| match self.unit.arena.kind(dcl) {
            NodeKind::VarDcl(var) => Some(var.perm),
            NodeKind::FnDcl(_) => Some(conec_ir::Perm::Imm),
            _ => None,
        });
        let Some(var_perm) = var_perm else {
            self.unit.error_at(
                id,
                diagnostic_codes::NOT_LVAL,
                diagnostic_messages::BORROW_NOT_LVAL,
            );
            return;
        };
        if !ref_perm.accepts(var_perm) {
            self.unit.error_at(
                id,
                diagnostic_codes::BAD_PERMISSION,
                diagnostic_messages::BAD_PERMISSION,
            );
        }
    }

    /// Dereference: the operand must be a reference; the value-type is
    /// its pointee.
    pub(crate) fn check_deref(&mut self, id: NodeId, exp: NodeId) {
        let mut exp_slot = exp;
        self.check(&mut exp_slot);
        if let NodeKind::Deref(slot) = &mut self.unit.arena.get_mut(id).kind {
            *slot = exp_slot;
        }
        let ty = vtype_of(&self.unit.arena, exp_slot);
        match self.unit.arena.kind(ty) {
            NodeKind::RefType(r) => {
                let pvtype = r.pvtype;
                self.unit.arena.set_vtype(id, pvtype);
            }
            _ => self.unit.error_at(
                id,
                diagnostic_codes::NOT_POINTER,
                diagnostic_messages::NOT_POINTER,
            ),
        }
    }

    /// Explicit cast: the value-type is the target; number-to-number and
    /// reference-to-reference casts are legal.
    pub(crate) fn check_cast(&mut self, id: NodeId, exp: NodeId) {
        let mut exp_slot = exp;
        self.check(&mut exp_slot);
        if let NodeKind::Cast(slot) = &mut self.unit.arena.get_mut(id).kind {
            *slot = exp_slot;
        }
        let target = self.unit.arena.vtype(id);
        let source = vtype_of(&self.unit.arena, exp_slot);
        if !is_castable(&self.unit.arena, target, source) {
            self.unit.error_at(
                id,
                diagnostic_codes::INVALID_TYPE,
                diagnostic_messages::INVALID_CAST,
            );
        }
    }

    /// Struct field access: auto-deref the owner one layer, then resolve
    /// the field name in the owner type's field sequence.
    pub(crate) fn check_element(&mut self, id: NodeId) {
        let (owner, field) = match self.unit.arena.kind(id) {
            NodeKind::Element(elem) => (elem.owner, elem.field),
            _ => return,
        };
        let mut owner_slot = owner;
        self.check(&mut owner_slot);
        deref_auto(&mut self.unit.arena, &mut owner_slot);
        if let NodeKind::Element(elem) = &mut self.unit.arena.get_mut(id).kind {
            elem.owner = owner_slot;
        }

        let field_sym = match self.unit.arena.kind(field) {
            NodeKind::MemberUse(sym) => *sym,
            // Already bound on a previous run.
            NodeKind::NameUse(use_) => {
                if let Some(dcl) = use_.dcl {
                    let vtype = self.unit.arena.vtype(dcl);
                    self.unit.arena.set_vtype(id, vtype);
                }
                return;
            }
            _ => return,
        };

        let owner_ty = vtype_of(&self.unit.arena, owner_slot);
        let found = match self.unit.arena.kind(owner_ty) {
            NodeKind::StructType(st) => st.fields.find(field_sym),
            _ => {
                self.unit.error_at(
                    id,
                    diagnostic_codes::NO_METHOD,
                    diagnostic_messages::NO_MEMBERS,
                );
                return;
            }
        };
        match found {
            Some(field_dcl) => {
                let vtype = self.unit.arena.vtype(field_dcl);
                // Bind the member use like a resolved name use.
                let node = self.unit.arena.get_mut(field);
                node.vtype = vtype;
                node.kind = NodeKind::NameUse(conec_ir::NameUse {
                    module: None,
                    name: field_sym,
                    dcl: Some(field_dcl),
                });
                self.unit.arena.set_vtype(id, vtype);
            }
            None => {
                let text = self.unit.name(field_sym).to_string();
                self.unit.error_at(
                    field,
                    diagnostic_codes::UNKNOWN_NAME,
                    format_message(diagnostic_messages::NO_FIELD, &[&text]),
                );
            }
        }
    }

    /// Value tuple: its type is the tuple of its element types; a
    /// surrounding return overrides it with the declared return tuple.
    pub(crate) fn check_vtuple(&mut self, id: NodeId) {
        let elems = match self.unit.arena.kind(id) {
            NodeKind::VTuple(elems) => elems.clone(),
            _ => return,
        };
        let mut checked = elems;
        for slot in checked.iter_mut() {
            self.check(slot);
        }
        let elem_types: Vec<NodeId> = checked
            .iter()
            .map(|&e| self.unit.arena.vtype(e))
            .collect();
        if let NodeKind::VTuple(elems) = &mut self.unit.arena.get_mut(id).kind {
            *elems = checked;
        }
        if type_of(&self.unit.arena, self.unit.arena.vtype(id)) == NodeId::VOID {
            let tuple_ty = self.unit.arena.new_tuple_type(elem_types);
            self.unit.arena.set_vtype(id, tuple_ty);
        }
    }
}

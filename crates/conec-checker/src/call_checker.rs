//! Function call checking and method dispatch.
//!
//! A call whose callee is a member name (`object.method`) resolves the
//! method against the first argument's type, scoring every candidate:
//! 0 rejects, 1 is an exact match, n > 1 costs n - 1 coercions. The
//! smallest positive score wins; ties go to the first-declared method.
//! On success the member use is rewritten into a bound name use, so a
//! re-run of the pass takes the ordinary callee path.

use conec_common::diagnostics::{diagnostic_codes, diagnostic_messages, format_message};
use conec_common::Atom;
use conec_ir::{Node, NodeId, NodeKind};
use tracing::debug;

use crate::relate::{can_coerce, coerce, deref_auto, type_of, vtype_of, Match};
use crate::state::CheckerState;

impl CheckerState<'_> {
    pub(crate) fn check_fn_call(&mut self, id: NodeId) {
        let (callee, args) = match self.unit.arena.kind(id) {
            NodeKind::FnCall(call) => (call.callee, call.args.clone()),
            _ => return,
        };
        let mut args = args;
        for slot in args.iter_mut() {
            self.check(slot);
        }

        let mut callee_slot = callee;
        if let NodeKind::MemberUse(meth_sym) = *self.unit.arena.kind(callee) {
            // Object call: resolve the method within the first argument's
            // type, then rewrite the callee in place.
            match self.find_method(&args, meth_sym) {
                Some(method) => {
                    debug!(call = id.0, method = method.0, "dispatched method call");
                    let sig = self.unit.arena.vtype(method);
                    let node = self.unit.arena.get_mut(callee);
                    node.vtype = sig;
                    node.kind = NodeKind::NameUse(conec_ir::NameUse {
                        module: None,
                        name: meth_sym,
                        dcl: Some(method),
                    });
                }
                None => {
                    let text = self.unit.name(meth_sym).to_string();
                    self.unit.error_at(
                        id,
                        diagnostic_codes::NO_METHOD,
                        format_message(diagnostic_messages::NO_METHOD, &[&text]),
                    );
                    self.write_back(id, callee_slot, args);
                    return;
                }
            }
        } else {
            self.check(&mut callee_slot);
            // A reference to a function dereferences automatically.
            deref_auto(&mut self.unit.arena, &mut callee_slot);
        }

        // The callee must be callable; the call takes its return type.
        let sig_ty = vtype_of(&self.unit.arena, callee_slot);
        let (rettype, parms) = match self.unit.arena.kind(sig_ty) {
            NodeKind::FnSig(sig) => (sig.rettype, sig.parms.clone()),
            _ => {
                self.unit.error_at(
                    callee_slot,
                    diagnostic_codes::NOT_FUNCTION,
                    diagnostic_messages::NOT_FUNCTION,
                );
                self.write_back(id, callee_slot, args);
                return;
            }
        };
        self.unit.arena.set_vtype(id, rettype);

        if args.len() > parms.len() {
            self.unit.error_at(
                id,
                diagnostic_codes::ARG_COUNT_MISMATCH,
                diagnostic_messages::MANY_ARGS,
            );
            self.write_back(id, callee_slot, args);
            return;
        }

        // Passed arguments must coerce to their declared parameters.
        for (slot, &parm) in args.iter_mut().zip(parms.iter()) {
            let parm_ty = self.unit.arena.vtype(parm);
            if !coerce(&mut self.unit.arena, parm_ty, slot) {
                self.unit.error_at(
                    *slot,
                    diagnostic_codes::INVALID_TYPE,
                    diagnostic_messages::INVALID_TYPE,
                );
            }
        }

        // Too few arguments: extend from declared defaults.
        if args.len() < parms.len() {
            for &parm in &parms[args.len()..] {
                match self.parm_default(parm) {
                    Some(default) => {
                        let filled = self.clone_literal(default);
                        args.push(filled);
                    }
                    None => {
                        self.unit.error_at(
                            id,
                            diagnostic_codes::ARG_COUNT_MISMATCH,
                            diagnostic_messages::FEW_ARGS,
                        );
                        break;
                    }
                }
            }
        }

        self.write_back(id, callee_slot, args);
    }

    fn write_back(&mut self, id: NodeId, callee: NodeId, args: Vec<NodeId>) {
        if let NodeKind::FnCall(call) = &mut self.unit.arena.get_mut(id).kind {
            call.callee = callee;
            call.args = args;
        }
    }

    /// Best-fit method for a member call, by dispatch score.
    fn find_method(&mut self, args: &[NodeId], meth_sym: Atom) -> Option<NodeId> {
        let &obj = args.first()?;
        // Dispatch on the value type behind a reference.
        let mut obj_ty = vtype_of(&self.unit.arena, obj);
        if let NodeKind::RefType(r) = self.unit.arena.kind(obj_ty) {
            obj_ty = type_of(&self.unit.arena, r.pvtype);
        }
        let methods = match self.unit.arena.kind(obj_ty) {
            NodeKind::NumType(num) => num.methods.clone(),
            NodeKind::StructType(st) => st.methods.clone(),
            _ => return None,
        };

        let mut best_score = u32::MAX;
        let mut best: Option<NodeId> = None;
        for method in methods {
            if self.unit.arena.decl_name(method) != Some(meth_sym) {
                continue;
            }
            let sig = self.unit.arena.vtype(method);
            match self.sig_matches_call(sig, args) {
                0 => continue,
                1 => return Some(method), // exact match
                score if score < best_score => {
                    best_score = score;
                    best = Some(method);
                }
                _ => {}
            }
        }
        best
    }

    /// Score a signature against a call's arguments: 0 rejects, 1 exact,
    /// 1 + n for a match needing n coercions. Missing trailing arguments
    /// are admissible when the parameters declare defaults.
    fn sig_matches_call(&self, sig: NodeId, args: &[NodeId]) -> u32 {
        let parms = match self.unit.arena.kind(sig) {
            NodeKind::FnSig(sig) => &sig.parms,
            _ => return 0,
        };
        if args.len() > parms.len() {
            return 0;
        }
        for &parm in &parms[args.len()..] {
            if self.parm_default(parm).is_none() {
                return 0;
            }
        }
        let mut score = 1u32;
        for (&arg, &parm) in args.iter().zip(parms.iter()) {
            let parm_ty = self.unit.arena.vtype(parm);
            match can_coerce(&self.unit.arena, parm_ty, arg) {
                Match::Exact => {}
                Match::Coerce => score += 1,
                Match::None => return 0,
            }
        }
        score
    }

    fn parm_default(&self, parm: NodeId) -> Option<NodeId> {
        match self.unit.arena.kind(parm) {
            NodeKind::VarDcl(var) => var.value,
            _ => None,
        }
    }

    /// Clone a default-argument literal into the call's own argument
    /// list, so every sequence owns its elements.
    fn clone_literal(&mut self, node: NodeId) -> NodeId {
        let Node { span, vtype, kind } = self.unit.arena.get(node).clone();
        self.unit.arena.alloc(Node { span, vtype, kind })
    }
}

//! Statement handlers: implicit return, `if` arms, loops, returns.

use conec_common::Span;
use conec_common::diagnostics::{diagnostic_codes, diagnostic_messages, format_message};
use conec_ir::{NodeId, NodeKind};

use crate::relate::{coerce, type_eq, type_of};
use crate::state::CheckerState;

impl CheckerState<'_> {
    /// Syntactic sugar: turn a function body's trailing implicit return
    /// into an explicit one. A void function gets a bare return appended;
    /// a value-returning function has its final expression wrapped, and
    /// anything else final is diagnosed.
    pub(crate) fn implicit_return(&mut self, rettype: NodeId, body: NodeId) {
        let stmts = match self.unit.arena.kind(body) {
            NodeKind::Block(block) => block.stmts.clone(),
            _ => return,
        };
        let last = stmts.last().copied();

        if type_of(&self.unit.arena, rettype) == NodeId::VOID {
            let needs_return = match last {
                Some(last) => !matches!(self.unit.arena.kind(last), NodeKind::Return(_)),
                None => true,
            };
            if needs_return {
                let ret = self.unit.arena.new_return(Span::dummy(), None);
                if let NodeKind::Block(block) = &mut self.unit.arena.get_mut(body).kind {
                    block.stmts.push(ret);
                }
            }
            return;
        }

        match last {
            None => {
                self.unit.error_at(
                    body,
                    diagnostic_codes::MISSING_RETURN,
                    diagnostic_messages::MISSING_RETURN,
                );
            }
            Some(last) if matches!(self.unit.arena.kind(last), NodeKind::Return(_)) => {}
            Some(last) if self.unit.arena.kind(last).is_expr() => {
                // Inject a return in front of the final expression.
                let span = self.unit.arena.span(last);
                let ret = self.unit.arena.new_return(span, Some(last));
                if let NodeKind::Block(block) = &mut self.unit.arena.get_mut(body).kind {
                    *block.stmts.last_mut().expect("non-empty block") = ret;
                }
            }
            Some(last) => {
                self.unit.error_at(
                    last,
                    diagnostic_codes::MISSING_RETURN,
                    diagnostic_messages::MISSING_RETURN,
                );
            }
        }
    }

    /// `if`: every condition coerces to bool; the node's value-type is
    /// the unified type of the branch values that do not diverge.
    pub(crate) fn check_if(&mut self, id: NodeId) {
        let condblk = match self.unit.arena.kind(id) {
            NodeKind::If(ifnode) => ifnode.condblk.clone(),
            _ => return,
        };
        let mut checked = condblk;
        let mut i = 0;
        while i < checked.len() {
            if i + 1 < checked.len() {
                self.check_condition(&mut checked[i]);
                i += 1;
            }
            self.check(&mut checked[i]);
            i += 1;
        }

        // Unify the values of the non-diverging arms (blocks sit at odd
        // positions, plus a trailing else at the end).
        let mut unified = NodeId::VOID;
        let mut j = 0;
        while j < checked.len() {
            let block = if j + 1 < checked.len() { checked[j + 1] } else { checked[j] };
            if self.block_diverges(block) {
                j += 2;
                continue;
            }
            let block_ty = self.unit.arena.vtype(block);
            if type_of(&self.unit.arena, block_ty) != NodeId::VOID {
                if unified == NodeId::VOID {
                    unified = block_ty;
                } else if !type_eq(&self.unit.arena, unified, block_ty) {
                    self.unit.error_at(
                        block,
                        diagnostic_codes::INVALID_TYPE,
                        diagnostic_messages::INVALID_TYPE,
                    );
                }
            }
            j += 2;
        }

        if let NodeKind::If(ifnode) = &mut self.unit.arena.get_mut(id).kind {
            ifnode.condblk = checked;
        }
        self.unit.arena.set_vtype(id, unified);
    }

    /// Whether a block's final statement unconditionally leaves it.
    fn block_diverges(&self, block: NodeId) -> bool {
        match self.unit.arena.kind(block) {
            NodeKind::Block(blk) => blk
                .stmts
                .last()
                .is_some_and(|&last| self.unit.arena.kind(last).is_diverging()),
            _ => false,
        }
    }

    pub(crate) fn check_while(&mut self, id: NodeId, whl: conec_ir::While) {
        let mut cond = whl.cond;
        self.check_condition(&mut cond);
        self.loop_depth += 1;
        let mut body = whl.body;
        self.check(&mut body);
        self.loop_depth -= 1;
        if let NodeKind::While(whl) = &mut self.unit.arena.get_mut(id).kind {
            whl.cond = cond;
            whl.body = body;
        }
    }

    fn check_condition(&mut self, slot: &mut NodeId) {
        self.check(slot);
        if !coerce(&mut self.unit.arena, NodeId::BOOL, slot) {
            self.unit.error_at(
                *slot,
                diagnostic_codes::INVALID_TYPE,
                diagnostic_messages::INVALID_TYPE,
            );
        }
    }

    pub(crate) fn check_loop_exit(&mut self, id: NodeId) {
        if self.loop_depth == 0 {
            let word = match self.unit.arena.kind(id) {
                NodeKind::Continue => "continue",
                _ => "break",
            };
            self.unit.error_at(
                id,
                diagnostic_codes::OUTSIDE_LOOP,
                format_message(diagnostic_messages::OUTSIDE_LOOP, &[word]),
            );
        }
    }

    /// Return: coerce the expression to the current function's return
    /// type; a tuple return requires a value tuple with pointwise
    /// coercion.
    pub(crate) fn check_return(&mut self, id: NodeId, exp: Option<NodeId>) {
        let Some(sig_id) = self.fnsig else {
            return;
        };
        let rettype = match self.unit.arena.kind(sig_id) {
            NodeKind::FnSig(sig) => sig.rettype,
            _ => return,
        };
        let ret_is_void = type_of(&self.unit.arena, rettype) == NodeId::VOID;

        let Some(exp) = exp else {
            if !ret_is_void {
                self.unit.error_at_related(
                    id,
                    diagnostic_codes::INVALID_TYPE,
                    diagnostic_messages::RETURN_TYPE_MISMATCH,
                    rettype,
                    diagnostic_messages::DECLARED_RETURN_TYPE,
                );
            }
            return;
        };

        // Returning an `if` value: strip redundant returns its arms
        // already carry before checking, so arm values unify and the
        // emitter merges plain values.
        if matches!(self.unit.arena.kind(exp), NodeKind::If(_)) {
            self.if_remove_returns(exp);
        }

        let mut exp_slot = exp;
        self.check(&mut exp_slot);

        let ret_ty = type_of(&self.unit.arena, rettype);
        if let NodeKind::TupleType(tuple) = self.unit.arena.kind(ret_ty) {
            let rettypes = tuple.elems.clone();
            self.check_tuple_return(exp_slot, rettype, &rettypes);
        } else if !coerce(&mut self.unit.arena, rettype, &mut exp_slot) {
            self.unit.error_at_related(
                exp_slot,
                diagnostic_codes::INVALID_TYPE,
                diagnostic_messages::RETURN_TYPE_MISMATCH,
                rettype,
                diagnostic_messages::DECLARED_RETURN_TYPE,
            );
        }
        if let NodeKind::Return(slot) = &mut self.unit.arena.get_mut(id).kind {
            *slot = Some(exp_slot);
        }
    }

    fn check_tuple_return(&mut self, exp: NodeId, rettype: NodeId, rettypes: &[NodeId]) {
        let elems = match self.unit.arena.kind(exp) {
            NodeKind::VTuple(elems) => elems.clone(),
            _ => {
                self.unit.error_at(
                    exp,
                    diagnostic_codes::BAD_TERM,
                    diagnostic_messages::TUPLE_ARITY,
                );
                return;
            }
        };
        if rettypes.len() > elems.len() {
            self.unit.error_at(
                exp,
                diagnostic_codes::BAD_TERM,
                diagnostic_messages::TUPLE_ARITY,
            );
            return;
        }
        let mut checked = elems;
        for (slot, &want) in checked.iter_mut().zip(rettypes.iter()) {
            if !coerce(&mut self.unit.arena, want, slot) {
                self.unit.error_at(
                    *slot,
                    diagnostic_codes::INVALID_TYPE,
                    diagnostic_messages::RETURN_TYPE_MISMATCH,
                );
            }
        }
        if let NodeKind::VTuple(elems) = &mut self.unit.arena.get_mut(exp).kind {
            *elems = checked;
        }
        // The tuple takes the declared return type.
        self.unit.arena.set_vtype(exp, rettype);
    }

    /// Recursively strip each arm's trailing `return`, splicing the
    /// returned expression back in as the arm's value.
    fn if_remove_returns(&mut self, if_id: NodeId) {
        let condblk = match self.unit.arena.kind(if_id) {
            NodeKind::If(ifnode) => ifnode.condblk.clone(),
            _ => return,
        };
        let mut j = 0;
        while j < condblk.len() {
            let block = if j + 1 < condblk.len() { condblk[j + 1] } else { condblk[j] };
            let last = match self.unit.arena.kind(block) {
                NodeKind::Block(blk) => blk.stmts.last().copied(),
                _ => None,
            };
            if let Some(last) = last {
                match self.unit.arena.kind(last).clone() {
                    NodeKind::Return(Some(value)) => {
                        if let NodeKind::Block(blk) = &mut self.unit.arena.get_mut(block).kind {
                            *blk.stmts.last_mut().expect("non-empty block") = value;
                        }
                    }
                    NodeKind::If(_) => self.if_remove_returns(last),
                    _ => {}
                }
            }
            j += 2;
        }
    }
}

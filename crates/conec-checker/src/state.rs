//! The type-check pass: state and dispatcher.
//!
//! A single recursive walk that assigns a value-type to every expression,
//! inserts implicit casts and derefs, resolves method calls, and applies
//! the implicit-return sugar to function bodies.
//!
//! Handlers receive the *slot* holding a child (`&mut NodeId`), not just
//! the child, so they can replace the child in place — wrapping it in a
//! cast or deref node. Declarations and containers are never replaced, so
//! their handlers work on plain ids.

use conec_common::diagnostics::{diagnostic_codes, diagnostic_messages};
use conec_ir::{CompileUnit, NodeId, NodeKind};
use tracing::{Level, span};

use crate::relate::{coerce, type_of};

/// Run the type-check pass over a program tree.
pub fn type_check(unit: &mut CompileUnit, program: NodeId) {
    let _span = span!(Level::DEBUG, "type_check", file = %unit.file).entered();
    let mut state = CheckerState {
        unit,
        fnsig: None,
        loop_depth: 0,
    };
    let mut root = program;
    state.check(&mut root);
}

/// Mutable state threaded through the type-check walk.
pub struct CheckerState<'u> {
    pub unit: &'u mut CompileUnit,
    /// Signature of the function whose body is being checked; return
    /// statements coerce against its return type.
    pub(crate) fnsig: Option<NodeId>,
    /// Number of enclosing loops; gates `break`/`continue`.
    pub(crate) loop_depth: u32,
}

impl CheckerState<'_> {
    /// Dispatch on the node's tag. This is the sole entry point handlers
    /// recurse through, and the extension point for new node kinds.
    pub(crate) fn check(&mut self, slot: &mut NodeId) {
        let id = *slot;
        match self.unit.arena.kind(id).clone() {
            NodeKind::Program(pgm) => {
                for module in pgm.modules {
                    let mut slot = module;
                    self.check(&mut slot);
                }
            }
            NodeKind::Module(module) => {
                for decl in module.nodes {
                    let mut slot = decl;
                    self.check(&mut slot);
                }
            }
            NodeKind::StructType(st) => {
                for (_, field) in st.fields.iter().collect::<Vec<_>>() {
                    let mut slot = field;
                    self.check(&mut slot);
                }
                for method in st.methods {
                    let mut slot = method;
                    self.check(&mut slot);
                }
            }
            NodeKind::VarDcl(var) => self.check_var_dcl(id, var.value, var.scope),
            NodeKind::FnDcl(fun) => self.check_fn_dcl(id, fun.body),
            NodeKind::Block(_) => self.check_block(id),
            NodeKind::NameUse(use_) => {
                if let Some(dcl) = use_.dcl {
                    let vtype = self.unit.arena.vtype(dcl);
                    self.unit.arena.set_vtype(id, vtype);
                }
            }
            NodeKind::FnCall(_) => self.check_fn_call(id),
            NodeKind::Assign(_) => self.check_assign(id),
            NodeKind::AddrOf(exp) => self.check_addr_of(id, exp),
            NodeKind::Deref(exp) => self.check_deref(id, exp),
            NodeKind::Element(_) => self.check_element(id),
            NodeKind::Cast(exp) => self.check_cast(id, exp),
            NodeKind::LogicAnd(bin) | NodeKind::LogicOr(bin) => {
                self.check_logic_operand(bin.lhs, id, 0);
                self.check_logic_operand(bin.rhs, id, 1);
            }
            NodeKind::LogicNot(exp) => self.check_logic_operand(exp, id, 0),
            NodeKind::VTuple(_) => self.check_vtuple(id),
            NodeKind::If(_) => self.check_if(id),
            NodeKind::While(whl) => self.check_while(id, whl),
            NodeKind::Return(exp) => self.check_return(id, exp),
            NodeKind::Break | NodeKind::Continue => self.check_loop_exit(id),
            // Literals and sizeof carry their value-type from construction;
            // member names are resolved by call dispatch or element access;
            // type nodes have nothing to compute.
            NodeKind::ULit(_)
            | NodeKind::FLit(_)
            | NodeKind::SLit(_)
            | NodeKind::SizeOf(_)
            | NodeKind::MemberUse(_)
            | NodeKind::NumType(_)
            | NodeKind::VoidType
            | NodeKind::RefType(_)
            | NodeKind::FnSig(_)
            | NodeKind::ArrayType(_)
            | NodeKind::TupleType(_) => {}
        }
    }

    /// Variable declaration: infer the type from the initializer, or
    /// coerce the initializer to the declared type. Module-level and
    /// parameter initializers must be literal constants.
    fn check_var_dcl(&mut self, id: NodeId, value: Option<NodeId>, scope: u32) {
        let Some(value) = value else {
            if type_of(&self.unit.arena, self.unit.arena.vtype(id)) == NodeId::VOID {
                self.unit.error_at(
                    id,
                    diagnostic_codes::MISSING_TYPE,
                    diagnostic_messages::MISSING_TYPE,
                );
            }
            return;
        };
        let mut value_slot = value;
        self.check(&mut value_slot);

        if scope <= 1 && !self.unit.arena.kind(value_slot).is_literal() {
            self.unit.error_at(
                value_slot,
                diagnostic_codes::NON_LITERAL_INIT,
                diagnostic_messages::NON_LITERAL_INIT,
            );
        }

        let declared = self.unit.arena.vtype(id);
        if type_of(&self.unit.arena, declared) == NodeId::VOID {
            let inferred = self.unit.arena.vtype(value_slot);
            self.unit.arena.set_vtype(id, inferred);
        } else if !coerce(&mut self.unit.arena, declared, &mut value_slot) {
            self.unit.error_at(
                value_slot,
                diagnostic_codes::INVALID_TYPE,
                diagnostic_messages::INVALID_TYPE,
            );
        }
        if let NodeKind::VarDcl(var) = &mut self.unit.arena.get_mut(id).kind {
            var.value = Some(value_slot);
        }
    }

    /// Function declaration: check parameter defaults, apply the
    /// implicit-return sugar, then check the body against the signature.
    fn check_fn_dcl(&mut self, id: NodeId, body: Option<NodeId>) {
        let sig_id = self.unit.arena.vtype(id);
        let Some(body) = body else {
            return; // intrinsic
        };
        let (rettype, parms) = match self.unit.arena.kind(sig_id) {
            NodeKind::FnSig(sig) => (sig.rettype, sig.parms.clone()),
            _ => return,
        };
        for parm in parms {
            let mut slot = parm;
            self.check(&mut slot);
        }

        self.implicit_return(rettype, body);

        let saved_sig = self.fnsig.replace(sig_id);
        let saved_loop = std::mem::take(&mut self.loop_depth);
        let mut body_slot = body;
        self.check(&mut body_slot);
        self.loop_depth = saved_loop;
        self.fnsig = saved_sig;
    }

    /// Block: check each statement; the block's value-type is the last
    /// statement's when that statement is an expression, else void.
    fn check_block(&mut self, id: NodeId) {
        let stmts = match self.unit.arena.kind(id) {
            NodeKind::Block(block) => block.stmts.clone(),
            _ => return,
        };
        let mut checked = stmts;
        for slot in checked.iter_mut() {
            self.check(slot);
        }
        let vtype = match checked.last() {
            Some(&last) if self.unit.arena.kind(last).is_expr() => self.unit.arena.vtype(last),
            _ => NodeId::VOID,
        };
        if let NodeKind::Block(block) = &mut self.unit.arena.get_mut(id).kind {
            block.stmts = checked;
        }
        self.unit.arena.set_vtype(id, vtype);
    }

    /// Coerce a logic operand to bool, rewriting the operand slot inside
    /// the logic node at position `pos` (0 = lhs/only, 1 = rhs).
    fn check_logic_operand(&mut self, operand: NodeId, logic: NodeId, pos: usize) {
        let mut slot = operand;
        self.check(&mut slot);
        if !coerce(&mut self.unit.arena, NodeId::BOOL, &mut slot) {
            self.unit.error_at(
                slot,
                diagnostic_codes::INVALID_TYPE,
                diagnostic_messages::INVALID_TYPE,
            );
        }
        match &mut self.unit.arena.get_mut(logic).kind {
            NodeKind::LogicAnd(bin) | NodeKind::LogicOr(bin) => {
                if pos == 0 {
                    bin.lhs = slot;
                } else {
                    bin.rhs = slot;
                }
            }
            NodeKind::LogicNot(exp) => *exp = slot,
            _ => {}
        }
    }
}

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod state_tests;

//! The data-flow pass: copies, moves, borrows, dealias scheduling.
//!
//! Runs after type check over every function body. Expressions feeding
//! assignments and arguments either copy (numbers, bools, aliasable
//! borrows) or move (owning unique references); moving out of a variable
//! consumes it until a reassignment revives it. Borrows register against
//! their variable for the rest of the enclosing block, and alias creation
//! is checked against the prior borrow's alias capability bits. Owning
//! allocations are appended to the enclosing block's dealias list for the
//! emitter's destructor insertion.

use conec_common::diagnostics::{diagnostic_codes, diagnostic_messages, format_message};
use conec_ir::{CompileUnit, NodeId, NodeKind, Perm, PermFlags, ty::Alloc};
use rustc_hash::FxHashSet;
use tracing::{Level, span};

use crate::relate::{type_of, vtype_of};

/// Run the data-flow pass over a program tree.
pub fn flow_check(unit: &mut CompileUnit, program: NodeId) {
    let _span = span!(Level::DEBUG, "flow_check", file = %unit.file).entered();
    let mut state = FlowState {
        unit,
        consumed: FxHashSet::default(),
        borrows: Vec::new(),
        blocks: Vec::new(),
    };
    state.walk_container(program);
}

struct FlowState<'u> {
    unit: &'u mut CompileUnit,
    /// Variables whose value has been moved away and not yet restored.
    consumed: FxHashSet<NodeId>,
    /// Live borrows per open block: (borrowed variable, reference perm).
    borrows: Vec<Vec<(NodeId, Perm)>>,
    /// Enclosing block stack, innermost last; owns the dealias lists.
    blocks: Vec<NodeId>,
}

impl FlowState<'_> {
    /// Descend through containers to every function body.
    fn walk_container(&mut self, id: NodeId) {
        match self.unit.arena.kind(id).clone() {
            NodeKind::Program(pgm) => {
                for module in pgm.modules {
                    self.walk_container(module);
                }
            }
            NodeKind::Module(module) => {
                for decl in module.nodes {
                    self.walk_container(decl);
                }
            }
            NodeKind::StructType(st) => {
                for method in st.methods {
                    self.walk_container(method);
                }
            }
            NodeKind::FnDcl(fun) => {
                if let Some(body) = fun.body {
                    self.consumed.clear();
                    self.flow_block(body);
                }
            }
            _ => {}
        }
    }

    fn flow_block(&mut self, id: NodeId) {
        let stmts = match self.unit.arena.kind(id) {
            NodeKind::Block(block) => block.stmts.clone(),
            _ => return,
        };
        // Re-entrant runs start the scope's dealias schedule afresh.
        if let NodeKind::Block(block) = &mut self.unit.arena.get_mut(id).kind {
            block.dealias.clear();
        }
        self.blocks.push(id);
        self.borrows.push(Vec::new());
        for stmt in stmts {
            self.flow_stmt(stmt);
        }
        self.borrows.pop();
        self.blocks.pop();
    }

    fn flow_stmt(&mut self, id: NodeId) {
        match self.unit.arena.kind(id).clone() {
            NodeKind::VarDcl(var) => {
                if let Some(value) = var.value {
                    self.flow_exp(value);
                }
            }
            NodeKind::Assign(assign) => {
                self.flow_exp(assign.rval);
                // Reassignment restores a consumed variable.
                if let NodeKind::NameUse(use_) = self.unit.arena.kind(assign.lval)
                    && let Some(dcl) = use_.dcl
                {
                    self.consumed.remove(&dcl);
                }
            }
            NodeKind::Return(exp) => {
                if let Some(exp) = exp {
                    self.flow_exp(exp);
                }
            }
            NodeKind::Block(_) => self.flow_block(id),
            NodeKind::If(ifnode) => {
                let mut i = 0;
                while i < ifnode.condblk.len() {
                    if i + 1 < ifnode.condblk.len() {
                        self.flow_exp(ifnode.condblk[i]);
                        i += 1;
                    }
                    self.flow_block(ifnode.condblk[i]);
                    i += 1;
                }
            }
            NodeKind::While(whl) => {
                self.flow_exp(whl.cond);
                self.flow_block(whl.body);
            }
            NodeKind::Break | NodeKind::Continue => {}
            _ => self.flow_exp(id),
        }
    }

    fn flow_exp(&mut self, id: NodeId) {
        match self.unit.arena.kind(id).clone() {
            NodeKind::NameUse(use_) => {
                let Some(dcl) = use_.dcl else { return };
                if !matches!(self.unit.arena.kind(dcl), NodeKind::VarDcl(_)) {
                    return;
                }
                if self.consumed.contains(&dcl) {
                    let text = self.unit.name(use_.name).to_string();
                    self.unit.error_at(
                        id,
                        diagnostic_codes::MOVED_VALUE,
                        format_message(diagnostic_messages::MOVED_VALUE, &[&text]),
                    );
                    return;
                }
                // A read of a move type consumes the source lvalue.
                let ty = vtype_of(&self.unit.arena, id);
                if is_move_type(self.unit, ty) {
                    self.consumed.insert(dcl);
                }
            }
            NodeKind::AddrOf(exp) => self.flow_addr_of(id, exp),
            NodeKind::FnCall(call) => {
                for arg in call.args {
                    self.flow_exp(arg);
                }
                self.flow_exp(call.callee);
            }
            NodeKind::Assign(_) => self.flow_stmt(id),
            NodeKind::Deref(exp) | NodeKind::Cast(exp) | NodeKind::LogicNot(exp) => {
                self.flow_exp(exp)
            }
            NodeKind::Element(elem) => self.flow_exp(elem.owner),
            NodeKind::LogicAnd(bin) | NodeKind::LogicOr(bin) => {
                self.flow_exp(bin.lhs);
                self.flow_exp(bin.rhs);
            }
            NodeKind::VTuple(elems) => {
                for elem in elems {
                    self.flow_exp(elem);
                }
            }
            NodeKind::Block(_) => self.flow_block(id),
            NodeKind::If(_) | NodeKind::While(_) => self.flow_stmt(id),
            _ => {}
        }
    }

    /// Borrows register against their variable; owning allocations are
    /// scheduled for dealias at the end of the enclosing scope.
    fn flow_addr_of(&mut self, id: NodeId, exp: NodeId) {
        let reftype = self.unit.arena.vtype(id);
        let (perm, alloc) = match self.unit.arena.kind(reftype) {
            NodeKind::RefType(r) => (r.perm, r.alloc),
            _ => return,
        };
        match alloc {
            Alloc::Own => {
                self.flow_exp(exp);
                if let Some(&block) = self.blocks.last()
                    && let NodeKind::Block(blk) = &mut self.unit.arena.get_mut(block).kind
                {
                    blk.dealias.push(id);
                }
            }
            Alloc::Borrow => {
                let Some(var) = self.borrowed_var(exp) else {
                    return;
                };
                if self.consumed.contains(&var) {
                    let text = self
                        .unit
                        .arena
                        .decl_name(var)
                        .map(|sym| self.unit.name(sym).to_string())
                        .unwrap_or_default();
                    self.unit.error_at(
                        id,
                        diagnostic_codes::MOVED_VALUE,
                        format_message(diagnostic_messages::MOVED_VALUE, &[&text]),
                    );
                    return;
                }
                if self.alias_conflict(var, perm) {
                    self.unit.error_at(
                        id,
                        diagnostic_codes::BAD_PERMISSION,
                        diagnostic_messages::BAD_PERMISSION,
                    );
                }
                if let Some(frame) = self.borrows.last_mut() {
                    frame.push((var, perm));
                }
            }
        }
    }

    fn borrowed_var(&self, exp: NodeId) -> Option<NodeId> {
        match self.unit.arena.kind(exp) {
            NodeKind::NameUse(use_) => use_
                .dcl
                .filter(|&dcl| matches!(self.unit.arena.kind(dcl), NodeKind::VarDcl(_))),
            _ => None,
        }
    }

    /// Does creating a new alias with `new_perm` violate a live borrow's
    /// alias capabilities?
    fn alias_conflict(&self, var: NodeId, new_perm: Perm) -> bool {
        let new_writes = new_perm.flags().contains(PermFlags::MAY_WRITE);
        for frame in &self.borrows {
            for &(borrowed, prior) in frame {
                if borrowed != var {
                    continue;
                }
                let prior_flags = prior.flags();
                if new_writes && !prior_flags.contains(PermFlags::MAY_ALIAS_WRITE) {
                    return true;
                }
                if !prior_flags.contains(PermFlags::MAY_ALIAS) {
                    return true;
                }
            }
        }
        false
    }
}

/// Owning unique references move; everything else copies.
fn is_move_type(unit: &CompileUnit, ty: NodeId) -> bool {
    let t = type_of(&unit.arena, ty);
    match unit.arena.kind(t) {
        NodeKind::RefType(r) => r.perm == Perm::Uni && r.alloc == Alloc::Own,
        _ => false,
    }
}

//! The name-resolution pass.
//!
//! A depth-first walk that binds every `NameUse` to its declaration,
//! assigns scope depths to variable declarations, and diagnoses duplicate
//! names at the same depth. Module members are hooked before any body is
//! walked so module-level uses may precede their declarations; block
//! locals become visible only at their declaration statement.
//!
//! The pass mutates nothing beyond declaration back-references and scope
//! depths; all name-table changes are unwound on scope exit.

use conec_common::diagnostics::{diagnostic_codes, diagnostic_messages, format_message};
use conec_ir::{CompileUnit, NodeId, NodeKind};
use rustc_hash::FxHashSet;
use tracing::{Level, debug, span};

use crate::nametbl::NameTable;

/// Run name resolution over a program tree.
pub fn resolve_names(unit: &mut CompileUnit, program: NodeId) {
    let _span = span!(Level::DEBUG, "resolve_names", file = %unit.file).entered();
    let mut state = ResolveState {
        unit,
        names: NameTable::new(),
        scope: 0,
    };
    state.walk(program);
    debug_assert!(state.names.is_balanced(), "unbalanced name table");
}

struct ResolveState<'u> {
    unit: &'u mut CompileUnit,
    names: NameTable,
    /// Current scope depth: 0 module, 1 parameters, >= 2 block locals.
    scope: u32,
}

impl ResolveState<'_> {
    /// Dispatch on the node's tag. Handlers recurse through this entry.
    fn walk(&mut self, id: NodeId) {
        match self.unit.arena.kind(id).clone() {
            NodeKind::Program(pgm) => {
                for module in pgm.modules {
                    self.walk(module);
                }
            }
            NodeKind::Module(module) => self.resolve_module(&module.nodes),
            NodeKind::Block(block) => self.resolve_block(&block.stmts),
            NodeKind::VarDcl(var) => self.resolve_var_dcl(id, var.value),
            NodeKind::FnDcl(fun) => self.resolve_fn_dcl(id, fun.body),
            NodeKind::StructType(_) => self.resolve_struct(id),
            NodeKind::NameUse(use_) => self.resolve_name_use(id, use_),
            NodeKind::FnCall(call) => {
                for arg in call.args {
                    self.walk(arg);
                }
                self.walk(call.callee);
            }
            NodeKind::Assign(assign) => {
                self.walk(assign.lval);
                self.walk(assign.rval);
            }
            NodeKind::AddrOf(exp) => {
                self.walk(exp);
                let reftype = self.unit.arena.vtype(id);
                self.walk_type(reftype);
            }
            NodeKind::Deref(exp) | NodeKind::LogicNot(exp) => self.walk(exp),
            NodeKind::Element(elem) => self.walk(elem.owner),
            NodeKind::Cast(exp) => {
                self.walk(exp);
                let target = self.unit.arena.vtype(id);
                self.walk_type(target);
            }
            NodeKind::SizeOf(ty) => self.walk_type(ty),
            NodeKind::LogicAnd(bin) | NodeKind::LogicOr(bin) => {
                self.walk(bin.lhs);
                self.walk(bin.rhs);
            }
            NodeKind::VTuple(elems) => {
                for elem in elems {
                    self.walk(elem);
                }
            }
            NodeKind::If(ifnode) => {
                for entry in ifnode.condblk {
                    self.walk(entry);
                }
            }
            NodeKind::While(whl) => {
                self.walk(whl.cond);
                self.walk(whl.body);
            }
            NodeKind::Return(exp) => {
                if let Some(exp) = exp {
                    self.walk(exp);
                }
            }
            // Literals carry their type; member names resolve during
            // method dispatch; the rest have no names to bind.
            NodeKind::ULit(_)
            | NodeKind::FLit(_)
            | NodeKind::SLit(_)
            | NodeKind::MemberUse(_)
            | NodeKind::Break
            | NodeKind::Continue
            | NodeKind::NumType(_)
            | NodeKind::VoidType
            | NodeKind::RefType(_)
            | NodeKind::FnSig(_)
            | NodeKind::ArrayType(_)
            | NodeKind::TupleType(_) => {}
        }
    }

    /// Walk a type position: type expressions may name struct types
    /// through `NameUse` nodes and may nest further types.
    fn walk_type(&mut self, ty: NodeId) {
        if ty == NodeId::VOID {
            return;
        }
        match self.unit.arena.kind(ty).clone() {
            NodeKind::NameUse(use_) => self.resolve_name_use(ty, use_),
            NodeKind::RefType(r) => self.walk_type(r.pvtype),
            NodeKind::ArrayType(array) => self.walk_type(array.elemtype),
            NodeKind::TupleType(tuple) => {
                for elem in tuple.elems {
                    self.walk_type(elem);
                }
            }
            NodeKind::FnSig(sig) => {
                self.walk_type(sig.rettype);
                for parm in sig.parms {
                    let parm_ty = self.unit.arena.vtype(parm);
                    self.walk_type(parm_ty);
                }
            }
            _ => {}
        }
    }

    /// Hook all module members first so forward references resolve, then
    /// walk the member bodies.
    fn resolve_module(&mut self, members: &[NodeId]) {
        self.names.push_frame();
        for &decl in members {
            self.hook_decl(decl);
        }
        for &decl in members {
            self.walk(decl);
        }
        self.names.pop_frame();
    }

    fn resolve_block(&mut self, stmts: &[NodeId]) {
        self.scope += 1;
        self.names.push_frame();
        for &stmt in stmts {
            self.walk(stmt);
        }
        self.names.pop_frame();
        self.scope -= 1;
    }

    fn resolve_var_dcl(&mut self, id: NodeId, value: Option<NodeId>) {
        // A declaration inside a block is a local; module-level variables
        // were hooked by the enclosing module already.
        if self.scope >= 2 {
            self.hook_decl(id);
        }
        let vtype = self.unit.arena.vtype(id);
        self.walk_type(vtype);
        if let Some(value) = value {
            self.walk(value);
        }
    }

    /// Hook parameters at depth 1, then walk the body.
    fn resolve_fn_dcl(&mut self, id: NodeId, body: Option<NodeId>) {
        let sig = self.unit.arena.vtype(id);
        self.walk_type(sig);
        let Some(body) = body else {
            return; // intrinsic or forward declaration
        };
        let parms = match self.unit.arena.kind(sig) {
            NodeKind::FnSig(sig) => sig.parms.clone(),
            _ => Vec::new(),
        };
        let saved = self.scope;
        self.scope = 1;
        self.names.push_frame();
        for parm in parms {
            if let NodeKind::VarDcl(var) = &mut self.unit.arena.get_mut(parm).kind {
                var.scope = 1;
            }
            self.hook_decl(parm);
            if let Some(default) = self.default_of(parm) {
                self.walk(default);
            }
        }
        self.walk(body);
        self.names.pop_frame();
        self.scope = saved;
    }

    fn default_of(&self, parm: NodeId) -> Option<NodeId> {
        match self.unit.arena.kind(parm) {
            NodeKind::VarDcl(var) => var.value,
            _ => None,
        }
    }

    /// Struct scope: fields and methods are visible to the method bodies.
    fn resolve_struct(&mut self, id: NodeId) {
        let (fields, methods) = match self.unit.arena.kind(id) {
            NodeKind::StructType(st) => (
                st.fields.iter().collect::<Vec<_>>(),
                st.methods.clone(),
            ),
            _ => return,
        };
        self.names.push_frame();
        // Field uniqueness was settled when the struct was built; fields
        // may shadow module-level names, so hook without a depth check.
        for &(sym, field) in &fields {
            self.names.hook(sym, field);
        }
        // Methods overload: hook each method name once; dispatch scans
        // the full list later.
        let mut hooked = FxHashSet::default();
        for &method in &methods {
            if let Some(sym) = self.unit.arena.decl_name(method)
                && hooked.insert(sym)
            {
                self.names.hook(sym, method);
            }
        }
        for (_, field) in fields {
            self.walk(field);
        }
        for method in methods {
            self.walk(method);
        }
        self.names.pop_frame();
    }

    fn resolve_name_use(&mut self, id: NodeId, use_: conec_ir::NameUse) {
        if use_.dcl.is_some() {
            return; // already bound (re-entrant pass run)
        }
        let found = match use_.module {
            // Qualified use: only the named module's members are visible.
            Some(module) => match self.unit.arena.kind(module) {
                NodeKind::Module(module) => module.named.find(use_.name),
                _ => None,
            },
            None => self.names.lookup(use_.name),
        };
        match found {
            Some(decl) => {
                debug!(node = id.0, decl = decl.0, "bound name use");
                if let NodeKind::NameUse(nu) = &mut self.unit.arena.get_mut(id).kind {
                    nu.dcl = Some(decl);
                }
            }
            None => {
                let text = self.unit.name(use_.name).to_string();
                self.unit.error_at(
                    id,
                    diagnostic_codes::UNKNOWN_NAME,
                    format_message(diagnostic_messages::UNKNOWN_NAME, &[&text]),
                );
            }
        }
    }

    /// Hook a named declaration at the current depth, diagnosing a
    /// duplicate against an existing binding at the same depth.
    fn hook_decl(&mut self, decl: NodeId) {
        let Some(sym) = self.unit.arena.decl_name(decl) else {
            return;
        };
        if let Some(prior) = self.names.lookup(sym)
            && self.hooked_depth(prior) == self.scope
        {
            let text = self.unit.name(sym).to_string();
            self.unit.error_at_related(
                decl,
                diagnostic_codes::DUPLICATE_NAME,
                format_message(diagnostic_messages::DUPLICATE_NAME, &[&text]),
                prior,
                format_message(diagnostic_messages::DUPLICATE_NAME_PRIOR, &[&text]),
            );
            return;
        }
        if let NodeKind::VarDcl(var) = &mut self.unit.arena.get_mut(decl).kind {
            var.scope = self.scope;
        }
        self.names.hook(sym, decl);
    }

    /// Depth a declaration was hooked at. Functions and types only hook
    /// at module depth.
    fn hooked_depth(&self, decl: NodeId) -> u32 {
        match self.unit.arena.kind(decl) {
            NodeKind::VarDcl(var) => var.scope,
            _ => 0,
        }
    }
}

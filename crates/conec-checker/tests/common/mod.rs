//! Shared fixture for checker integration tests: builds small programs
//! the way a parser would, then runs the pipeline over them.

#![allow(dead_code)]

use conec_common::Span;
use conec_ir::{CompileUnit, NodeId, NodeKind, Perm};

pub fn sp(n: u32) -> Span {
    Span::new(n, n + 1)
}

pub struct Fixture {
    pub unit: CompileUnit,
    pub program: NodeId,
    pub module: NodeId,
}

pub fn fixture() -> Fixture {
    let mut unit = CompileUnit::new("test.con");
    let program = unit.arena.new_program();
    let mod_sym = unit.intern("main");
    let module = unit.arena.new_module(Span::dummy(), mod_sym);
    unit.arena.program_add(program, module);
    Fixture {
        unit,
        program,
        module,
    }
}

impl Fixture {
    /// Add a function to the module and return its declaration node.
    pub fn add_fn(&mut self, name: &str, parms: Vec<NodeId>, ret: NodeId, body: NodeId) -> NodeId {
        let sym = self.unit.intern(name);
        let sig = self.unit.arena.new_fn_sig(ret, parms);
        let f = self.unit.arena.new_fn_dcl(Span::dummy(), sym, sig, Some(body));
        self.unit.arena.module_add(self.module, f);
        f
    }

    pub fn parm(&mut self, name: &str, ty: NodeId) -> NodeId {
        let sym = self.unit.intern(name);
        self.unit
            .arena
            .new_var_dcl(Span::dummy(), sym, Perm::Imm, ty, None)
    }

    pub fn block(&mut self, stmts: Vec<NodeId>) -> NodeId {
        let block = self.unit.arena.new_block(Span::dummy());
        for stmt in stmts {
            self.unit.arena.block_add(block, stmt);
        }
        block
    }

    /// Local `perm name ty = value` declaration node.
    pub fn local(&mut self, name: &str, perm: Perm, ty: NodeId, value: Option<NodeId>) -> NodeId {
        let sym = self.unit.intern(name);
        self.unit.arena.new_var_dcl(Span::dummy(), sym, perm, ty, value)
    }

    pub fn name_use(&mut self, name: &str, at: u32) -> NodeId {
        let sym = self.unit.intern(name);
        self.unit.arena.new_name_use(sp(at), sym)
    }

    /// `object.method(args...)` call node.
    pub fn method_call(&mut self, method: &str, args: Vec<NodeId>, at: u32) -> NodeId {
        let sym = self.unit.intern(method);
        let callee = self.unit.arena.new_member_use(sp(at), sym);
        self.unit.arena.new_fn_call(sp(at), callee, args)
    }

    pub fn int(&mut self, value: u64) -> NodeId {
        self.unit.arena.new_ulit(Span::dummy(), value, NodeId::I32)
    }

    pub fn boolean(&mut self, value: bool) -> NodeId {
        self.unit
            .arena
            .new_ulit(Span::dummy(), u64::from(value), NodeId::BOOL)
    }

    /// Run the full pipeline.
    pub fn analyze(&mut self) {
        conec_checker::analyze(&mut self.unit, self.program);
    }

    pub fn codes(&self) -> Vec<u32> {
        self.unit.diags.all().iter().map(|d| d.code).collect()
    }

    pub fn block_stmts(&self, block: NodeId) -> Vec<NodeId> {
        match self.unit.arena.kind(block) {
            NodeKind::Block(blk) => blk.stmts.clone(),
            other => panic!("expected block, got {other:?}"),
        }
    }
}

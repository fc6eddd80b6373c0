//! The IR arena.
//!
//! All nodes of one compilation unit live in a single growable arena and
//! are addressed by `NodeId`. Nothing is ever freed; the arena's lifetime
//! is the unit's. Canonical primitive type nodes are seeded at fixed ids
//! when the arena is created, so passes can compare against `NodeId::BOOL`
//! and friends without lookups.

use conec_common::{Atom, CompilerOptions, Span};

use crate::node::{
    Assign, AssignKind, Binary, Block, Element, FnCall, FnDcl, If, Module, NameUse, Node, NodeKind,
    Program, VarDcl, While,
};
use crate::perm::Perm;
use crate::seq::{NamedNodes, NodeList};
use crate::ty::{Alloc, ArrayType, FnSig, NumKind, NumType, RefType, StructType, TupleType};

/// Index of a node within its unit's `IrArena`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    // Canonical type nodes, in `IrArena::new` seeding order.
    pub const VOID: NodeId = NodeId(0);
    pub const BOOL: NodeId = NodeId(1);
    pub const I8: NodeId = NodeId(2);
    pub const I16: NodeId = NodeId(3);
    pub const I32: NodeId = NodeId(4);
    pub const I64: NodeId = NodeId(5);
    pub const U8: NodeId = NodeId(6);
    pub const U16: NodeId = NodeId(7);
    pub const U32: NodeId = NodeId(8);
    pub const U64: NodeId = NodeId(9);
    pub const F32: NodeId = NodeId(10);
    pub const F64: NodeId = NodeId(11);
    pub const USIZE: NodeId = NodeId(12);
}

/// Bump arena of IR nodes.
#[derive(Debug)]
pub struct IrArena {
    nodes: Vec<Node>,
}

impl IrArena {
    /// Create an arena seeded with the canonical primitive types.
    pub fn new(options: &CompilerOptions) -> Self {
        let mut arena = IrArena { nodes: Vec::with_capacity(256) };
        arena.alloc_type(NodeKind::VoidType); // VOID
        arena.alloc_num(NumKind::UInt, 1); // BOOL
        arena.alloc_num(NumKind::Int, 8);
        arena.alloc_num(NumKind::Int, 16);
        arena.alloc_num(NumKind::Int, 32);
        arena.alloc_num(NumKind::Int, 64);
        arena.alloc_num(NumKind::UInt, 8);
        arena.alloc_num(NumKind::UInt, 16);
        arena.alloc_num(NumKind::UInt, 32);
        arena.alloc_num(NumKind::UInt, 64);
        arena.alloc_num(NumKind::Float, 32);
        arena.alloc_num(NumKind::Float, 64);
        arena.alloc_num(NumKind::UInt, options.ptr_width.bits()); // USIZE
        arena
    }

    fn alloc_num(&mut self, kind: NumKind, bits: u8) -> NodeId {
        self.alloc_type(NodeKind::NumType(NumType {
            kind,
            bits,
            methods: NodeList::new(),
        }))
    }

    fn alloc_type(&mut self, kind: NodeKind) -> NodeId {
        self.alloc(Node {
            span: Span::dummy(),
            vtype: NodeId::VOID,
            kind,
        })
    }

    /// Allocate a node, returning its id. Never fails; the arena grows.
    pub fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0 as usize]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.get(id).kind
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.get(id).span
    }

    /// The node's value-type slot (`NodeId::VOID` until assigned).
    pub fn vtype(&self, id: NodeId) -> NodeId {
        self.get(id).vtype
    }

    pub fn set_vtype(&mut self, id: NodeId, vtype: NodeId) {
        self.get_mut(id).vtype = vtype;
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // =========================================================================
    // Node constructors
    //
    // The surface a parser (and the passes, for synthesized nodes) builds
    // the tree through.
    // =========================================================================

    pub fn new_program(&mut self) -> NodeId {
        self.alloc(Node {
            span: Span::dummy(),
            vtype: NodeId::VOID,
            kind: NodeKind::Program(Program {
                modules: NodeList::new(),
            }),
        })
    }

    pub fn new_module(&mut self, span: Span, name: Atom) -> NodeId {
        self.alloc(Node {
            span,
            vtype: NodeId::VOID,
            kind: NodeKind::Module(Module {
                name,
                nodes: NodeList::new(),
                named: NamedNodes::new(),
            }),
        })
    }

    /// Append a module to the program's module list.
    pub fn program_add(&mut self, program: NodeId, module: NodeId) {
        if let NodeKind::Program(pgm) = &mut self.get_mut(program).kind {
            pgm.modules.push(module);
        }
    }

    /// Append a declaration to a module, indexing it by name for
    /// module-qualified lookup. Returns the prior binding on a duplicate
    /// name (kept; the caller diagnoses).
    pub fn module_add(&mut self, module: NodeId, decl: NodeId) -> Option<NodeId> {
        let name = self.decl_name(decl)?;
        match &mut self.get_mut(decl).kind {
            NodeKind::VarDcl(var) => var.owner = Some(module),
            NodeKind::FnDcl(fun) => fun.owner = Some(module),
            NodeKind::StructType(st) => st.owner = Some(module),
            _ => {}
        }
        if let NodeKind::Module(m) = &mut self.get_mut(module).kind {
            m.nodes.push(decl);
            m.named.add(name, decl)
        } else {
            None
        }
    }

    /// Name symbol of a named declaration node.
    pub fn decl_name(&self, decl: NodeId) -> Option<Atom> {
        match self.kind(decl) {
            NodeKind::VarDcl(var) => Some(var.name),
            NodeKind::FnDcl(fun) => Some(fun.name),
            NodeKind::StructType(st) => Some(st.name),
            NodeKind::Module(m) => Some(m.name),
            _ => None,
        }
    }

    pub fn new_block(&mut self, span: Span) -> NodeId {
        self.alloc(Node {
            span,
            vtype: NodeId::VOID,
            kind: NodeKind::Block(Block {
                stmts: NodeList::new(),
                dealias: NodeList::new(),
            }),
        })
    }

    /// Append a statement to a block.
    pub fn block_add(&mut self, block: NodeId, stmt: NodeId) {
        if let NodeKind::Block(blk) = &mut self.get_mut(block).kind {
            blk.stmts.push(stmt);
        }
    }

    pub fn new_var_dcl(
        &mut self,
        span: Span,
        name: Atom,
        perm: Perm,
        vtype: NodeId,
        value: Option<NodeId>,
    ) -> NodeId {
        self.alloc(Node {
            span,
            vtype,
            kind: NodeKind::VarDcl(VarDcl {
                name,
                perm,
                value,
                scope: 0,
                owner: None,
            }),
        })
    }

    pub fn new_fn_dcl(&mut self, span: Span, name: Atom, sig: NodeId, body: Option<NodeId>) -> NodeId {
        self.alloc(Node {
            span,
            vtype: sig,
            kind: NodeKind::FnDcl(FnDcl {
                name,
                body,
                owner: None,
            }),
        })
    }

    pub fn new_fn_sig(&mut self, rettype: NodeId, parms: NodeList) -> NodeId {
        self.alloc_type(NodeKind::FnSig(FnSig { rettype, parms }))
    }

    pub fn new_ref_type(&mut self, pvtype: NodeId, perm: Perm, alloc: Alloc) -> NodeId {
        self.alloc_type(NodeKind::RefType(RefType {
            pvtype,
            perm,
            alloc,
        }))
    }

    pub fn new_array_type(&mut self, size: u32, elemtype: NodeId) -> NodeId {
        self.alloc_type(NodeKind::ArrayType(ArrayType { size, elemtype }))
    }

    pub fn new_tuple_type(&mut self, elems: NodeList) -> NodeId {
        self.alloc_type(NodeKind::TupleType(TupleType { elems }))
    }

    pub fn new_struct_type(&mut self, span: Span, name: Atom, is_alloc: bool) -> NodeId {
        self.alloc(Node {
            span,
            vtype: NodeId::VOID,
            kind: NodeKind::StructType(StructType {
                name,
                fields: NamedNodes::new(),
                methods: NodeList::new(),
                is_alloc,
                owner: None,
            }),
        })
    }

    /// Add a field to a struct. Returns the prior binding on a duplicate
    /// field name (kept; the caller diagnoses — only methods overload).
    pub fn struct_add_field(&mut self, strct: NodeId, field: NodeId) -> Option<NodeId> {
        let name = self.decl_name(field)?;
        if let NodeKind::VarDcl(var) = &mut self.get_mut(field).kind {
            var.owner = Some(strct);
        }
        if let NodeKind::StructType(st) = &mut self.get_mut(strct).kind {
            st.fields.add(name, field)
        } else {
            None
        }
    }

    /// Add a method to a struct's ordered method list.
    pub fn struct_add_method(&mut self, strct: NodeId, method: NodeId) {
        if let NodeKind::FnDcl(fun) = &mut self.get_mut(method).kind {
            fun.owner = Some(strct);
        }
        if let NodeKind::StructType(st) = &mut self.get_mut(strct).kind {
            st.methods.push(method);
        }
    }

    pub fn new_ulit(&mut self, span: Span, value: u64, vtype: NodeId) -> NodeId {
        self.alloc(Node {
            span,
            vtype,
            kind: NodeKind::ULit(value),
        })
    }

    pub fn new_flit(&mut self, span: Span, value: f64, vtype: NodeId) -> NodeId {
        self.alloc(Node {
            span,
            vtype,
            kind: NodeKind::FLit(value),
        })
    }

    /// String literal: carries an immutable borrowed reference to a fixed
    /// u8 array as its default type.
    pub fn new_slit(&mut self, span: Span, value: String) -> NodeId {
        let array = self.new_array_type(value.len() as u32, NodeId::U8);
        let vtype = self.new_ref_type(array, Perm::Imm, Alloc::Borrow);
        self.alloc(Node {
            span,
            vtype,
            kind: NodeKind::SLit(value),
        })
    }

    pub fn new_name_use(&mut self, span: Span, name: Atom) -> NodeId {
        self.alloc(Node {
            span,
            vtype: NodeId::VOID,
            kind: NodeKind::NameUse(NameUse {
                module: None,
                name,
                dcl: None,
            }),
        })
    }

    pub fn new_qualified_name_use(&mut self, span: Span, module: NodeId, name: Atom) -> NodeId {
        self.alloc(Node {
            span,
            vtype: NodeId::VOID,
            kind: NodeKind::NameUse(NameUse {
                module: Some(module),
                name,
                dcl: None,
            }),
        })
    }

    pub fn new_member_use(&mut self, span: Span, name: Atom) -> NodeId {
        self.alloc(Node {
            span,
            vtype: NodeId::VOID,
            kind: NodeKind::MemberUse(name),
        })
    }

    pub fn new_fn_call(&mut self, span: Span, callee: NodeId, args: NodeList) -> NodeId {
        self.alloc(Node {
            span,
            vtype: NodeId::VOID,
            kind: NodeKind::FnCall(FnCall { callee, args }),
        })
    }

    pub fn new_assign(&mut self, span: Span, lval: NodeId, rval: NodeId) -> NodeId {
        self.alloc(Node {
            span,
            vtype: NodeId::VOID,
            kind: NodeKind::Assign(Assign {
                kind: AssignKind::Simple,
                lval,
                rval,
            }),
        })
    }

    /// Address-of / allocate. `reftype` is a `RefType` node carrying the
    /// requested permission and allocator; its element type may be
    /// `NodeId::VOID` for inference from `exp`.
    pub fn new_addr_of(&mut self, span: Span, exp: NodeId, reftype: NodeId) -> NodeId {
        self.alloc(Node {
            span,
            vtype: reftype,
            kind: NodeKind::AddrOf(exp),
        })
    }

    pub fn new_deref(&mut self, span: Span, exp: NodeId) -> NodeId {
        self.alloc(Node {
            span,
            vtype: NodeId::VOID,
            kind: NodeKind::Deref(exp),
        })
    }

    pub fn new_element(&mut self, span: Span, owner: NodeId, field: NodeId) -> NodeId {
        self.alloc(Node {
            span,
            vtype: NodeId::VOID,
            kind: NodeKind::Element(Element { owner, field }),
        })
    }

    pub fn new_cast(&mut self, span: Span, exp: NodeId, target: NodeId) -> NodeId {
        self.alloc(Node {
            span,
            vtype: target,
            kind: NodeKind::Cast(exp),
        })
    }

    pub fn new_sizeof(&mut self, span: Span, ty: NodeId) -> NodeId {
        self.alloc(Node {
            span,
            vtype: NodeId::USIZE,
            kind: NodeKind::SizeOf(ty),
        })
    }

    pub fn new_logic_and(&mut self, span: Span, lhs: NodeId, rhs: NodeId) -> NodeId {
        self.alloc(Node {
            span,
            vtype: NodeId::BOOL,
            kind: NodeKind::LogicAnd(Binary { lhs, rhs }),
        })
    }

    pub fn new_logic_or(&mut self, span: Span, lhs: NodeId, rhs: NodeId) -> NodeId {
        self.alloc(Node {
            span,
            vtype: NodeId::BOOL,
            kind: NodeKind::LogicOr(Binary { lhs, rhs }),
        })
    }

    pub fn new_logic_not(&mut self, span: Span, exp: NodeId) -> NodeId {
        self.alloc(Node {
            span,
            vtype: NodeId::BOOL,
            kind: NodeKind::LogicNot(exp),
        })
    }

    pub fn new_vtuple(&mut self, span: Span, elems: NodeList) -> NodeId {
        self.alloc(Node {
            span,
            vtype: NodeId::VOID,
            kind: NodeKind::VTuple(elems),
        })
    }

    pub fn new_if(&mut self, span: Span, condblk: NodeList) -> NodeId {
        self.alloc(Node {
            span,
            vtype: NodeId::VOID,
            kind: NodeKind::If(If { condblk }),
        })
    }

    pub fn new_while(&mut self, span: Span, cond: NodeId, body: NodeId) -> NodeId {
        self.alloc(Node {
            span,
            vtype: NodeId::VOID,
            kind: NodeKind::While(While { cond, body }),
        })
    }

    pub fn new_return(&mut self, span: Span, exp: Option<NodeId>) -> NodeId {
        self.alloc(Node {
            span,
            vtype: NodeId::VOID,
            kind: NodeKind::Return(exp),
        })
    }

    pub fn new_break(&mut self, span: Span) -> NodeId {
        self.alloc(Node {
            span,
            vtype: NodeId::VOID,
            kind: NodeKind::Break,
        })
    }

    pub fn new_continue(&mut self, span: Span) -> NodeId {
        self.alloc(Node {
            span,
            vtype: NodeId::VOID,
            kind: NodeKind::Continue,
        })
    }
}

#[cfg(test)]
#[path = "tests/arena_tests.rs"]
mod arena_tests;

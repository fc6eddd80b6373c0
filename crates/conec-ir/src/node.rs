//! The polymorphic node model.
//!
//! Every IR entity is a `Node`: a common header (source span + value-type
//! slot) and a `NodeKind` payload. Passes recover the concrete shape by
//! matching on the kind; the dispatcher in each pass is the sole extension
//! point for new kinds.
//!
//! The `vtype` header slot serves double duty the way the original tree
//! does: for expressions it is the value-type assigned by type check, for
//! declarations it is the declared type (a `FnSig` for functions). It is
//! `NodeId::VOID` until something assigns it.

use conec_common::{Atom, Span, Spanned};

use crate::arena::NodeId;
use crate::perm::Perm;
use crate::seq::NodeList;
use crate::ty::{ArrayType, FnSig, NumType, RefType, StructType, TupleType};

/// One IR node: header plus kind-specific payload.
#[derive(Clone, Debug)]
pub struct Node {
    pub span: Span,
    /// Value-type of expressions / declared type of declarations.
    pub vtype: NodeId,
    pub kind: NodeKind,
}

impl Spanned for Node {
    fn span(&self) -> Span {
        self.span
    }
}

/// Top-level container: the list of modules in a compilation unit.
#[derive(Clone, Debug)]
pub struct Program {
    pub modules: NodeList,
}

/// A module: ordered member declarations plus a name index over them for
/// module-qualified lookup.
#[derive(Clone, Debug)]
pub struct Module {
    pub name: Atom,
    pub nodes: NodeList,
    pub named: crate::seq::NamedNodes,
}

/// Statement block. `dealias` is filled by the flow pass with the owning
/// allocations whose destructors run at scope exit.
#[derive(Clone, Debug)]
pub struct Block {
    pub stmts: NodeList,
    pub dealias: NodeList,
}

/// Variable declaration (also used for function parameters and struct
/// fields). `scope` is 0 for module level, 1 for parameters, >= 2 for
/// block locals, assigned during name resolution.
#[derive(Clone, Debug)]
pub struct VarDcl {
    pub name: Atom,
    pub perm: Perm,
    /// Initializer, or declared default for parameters.
    pub value: Option<NodeId>,
    pub scope: u32,
    /// Owning container (module or struct); non-owning back-edge.
    pub owner: Option<NodeId>,
}

/// Function declaration. The signature lives in the node's `vtype` slot;
/// a missing body marks an intrinsic the emitter lowers directly.
#[derive(Clone, Debug)]
pub struct FnDcl {
    pub name: Atom,
    pub body: Option<NodeId>,
    pub owner: Option<NodeId>,
}

/// Name use. `dcl` is the declaration back-reference bound by name
/// resolution; `module` is an explicit module qualifier, when present.
#[derive(Clone, Copy, Debug)]
pub struct NameUse {
    pub module: Option<NodeId>,
    pub name: Atom,
    pub dcl: Option<NodeId>,
}

/// Function (or method) call: callee expression plus arguments. For a
/// method call the callee is a `MemberUse` and the object rides as the
/// first argument; dispatch rewrites the callee into a bound `NameUse`.
#[derive(Clone, Debug)]
pub struct FnCall {
    pub callee: NodeId,
    pub args: NodeList,
}

/// Assignment operator kind. The parser currently produces only simple
/// assignment; compound forms would desugar before reaching the checker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssignKind {
    Simple,
}

#[derive(Clone, Copy, Debug)]
pub struct Assign {
    pub kind: AssignKind,
    pub lval: NodeId,
    pub rval: NodeId,
}

/// Struct field access: owner expression plus a `MemberUse` carrying the
/// field name (and, after type check, the field binding).
#[derive(Clone, Copy, Debug)]
pub struct Element {
    pub owner: NodeId,
    pub field: NodeId,
}

/// Two-operand logic node (`and`, `or`).
#[derive(Clone, Copy, Debug)]
pub struct Binary {
    pub lhs: NodeId,
    pub rhs: NodeId,
}

/// `if` expression: alternating condition/block list; an odd length means
/// a trailing `else` block.
#[derive(Clone, Debug)]
pub struct If {
    pub condblk: NodeList,
}

#[derive(Clone, Copy, Debug)]
pub struct While {
    pub cond: NodeId,
    pub body: NodeId,
}

/// The closed set of node kinds.
#[derive(Clone, Debug)]
pub enum NodeKind {
    // Containers
    Program(Program),
    Module(Module),
    Block(Block),

    // Named declarations
    VarDcl(VarDcl),
    FnDcl(FnDcl),

    // Types
    NumType(NumType),
    VoidType,
    RefType(RefType),
    FnSig(FnSig),
    StructType(StructType),
    ArrayType(ArrayType),
    TupleType(TupleType),

    // Expressions
    ULit(u64),
    FLit(f64),
    SLit(String),
    NameUse(NameUse),
    MemberUse(Atom),
    FnCall(FnCall),
    Assign(Assign),
    AddrOf(NodeId),
    Deref(NodeId),
    Element(Element),
    Cast(NodeId),
    SizeOf(NodeId),
    LogicAnd(Binary),
    LogicOr(Binary),
    LogicNot(NodeId),
    VTuple(NodeList),

    // Statements
    If(If),
    While(While),
    Return(Option<NodeId>),
    Break,
    Continue,
}

impl NodeKind {
    /// Whether this kind is a value-producing expression.
    pub fn is_expr(&self) -> bool {
        matches!(
            self,
            NodeKind::ULit(_)
                | NodeKind::FLit(_)
                | NodeKind::SLit(_)
                | NodeKind::NameUse(_)
                | NodeKind::FnCall(_)
                | NodeKind::Assign(_)
                | NodeKind::AddrOf(_)
                | NodeKind::Deref(_)
                | NodeKind::Element(_)
                | NodeKind::Cast(_)
                | NodeKind::SizeOf(_)
                | NodeKind::LogicAnd(_)
                | NodeKind::LogicOr(_)
                | NodeKind::LogicNot(_)
                | NodeKind::VTuple(_)
                | NodeKind::Block(_)
                | NodeKind::If(_)
        )
    }

    /// Whether this kind is a type node.
    pub fn is_type(&self) -> bool {
        matches!(
            self,
            NodeKind::NumType(_)
                | NodeKind::VoidType
                | NodeKind::RefType(_)
                | NodeKind::FnSig(_)
                | NodeKind::StructType(_)
                | NodeKind::ArrayType(_)
                | NodeKind::TupleType(_)
        )
    }

    /// Whether this kind is a literal constant.
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            NodeKind::ULit(_) | NodeKind::FLit(_) | NodeKind::SLit(_)
        )
    }

    /// Whether a statement in this kind unconditionally leaves its block
    /// (so it contributes no value to an `if` arm).
    pub fn is_diverging(&self) -> bool {
        matches!(
            self,
            NodeKind::Return(_) | NodeKind::Break | NodeKind::Continue
        )
    }
}

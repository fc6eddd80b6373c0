//! Assignment checking: lvals, mutability, coercion.

mod common;

use common::{fixture, sp};
use conec_common::diagnostics::diagnostic_codes;
use conec_ir::{NodeId, Perm, ty::Alloc};

#[test]
fn assignment_to_immutable_is_rejected_at_the_lval() {
    // imm x i32 = 0; x = 1
    let mut fx = fixture();
    let zero = fx.int(0);
    let x = fx.local("x", Perm::Imm, NodeId::I32, Some(zero));
    let use_x = fx.name_use("x", 17);
    let one = fx.int(1);
    let assign = fx.unit.arena.new_assign(sp(19), use_x, one);
    let body = fx.block(vec![x, assign]);
    fx.add_fn("f", vec![], NodeId::VOID, body);

    fx.analyze();

    assert_eq!(fx.codes(), vec![diagnostic_codes::NOT_MUTABLE]);
    // Anchored at the left side.
    assert_eq!(fx.unit.diags.all()[0].start, 17);
}

#[test]
fn assignment_to_mutable_types_as_the_rval() {
    let mut fx = fixture();
    let zero = fx.int(0);
    let x = fx.local("x", Perm::Mut, NodeId::I32, Some(zero));
    let use_x = fx.name_use("x", 17);
    let one = fx.int(1);
    let assign = fx.unit.arena.new_assign(sp(19), use_x, one);
    let body = fx.block(vec![x, assign]);
    fx.add_fn("f", vec![], NodeId::VOID, body);

    fx.analyze();

    assert_eq!(fx.unit.diags.error_count(), 0);
    assert_eq!(fx.unit.arena.vtype(assign), NodeId::I32);
}

#[test]
fn literal_target_is_not_an_lval() {
    let mut fx = fixture();
    let two = fx.int(2);
    let one = fx.int(1);
    let assign = fx.unit.arena.new_assign(sp(5), two, one);
    let body = fx.block(vec![assign]);
    fx.add_fn("f", vec![], NodeId::VOID, body);

    fx.analyze();

    assert_eq!(fx.codes(), vec![diagnostic_codes::NOT_LVAL]);
}

#[test]
fn write_through_mut_reference_is_allowed() {
    // mut x i32 = 0; imm r &mut i32 = &mut x; *r = 3
    let mut fx = fixture();
    let zero = fx.int(0);
    let x = fx.local("x", Perm::Mut, NodeId::I32, Some(zero));
    let use_x = fx.name_use("x", 30);
    let ref_ty = fx.unit.arena.new_ref_type(NodeId::I32, Perm::Mut, Alloc::Borrow);
    let addr = fx.unit.arena.new_addr_of(sp(28), use_x, ref_ty);
    let decl_ty = fx.unit.arena.new_ref_type(NodeId::I32, Perm::Mut, Alloc::Borrow);
    let r = fx.local("r", Perm::Imm, decl_ty, Some(addr));
    let use_r = fx.name_use("r", 40);
    let deref = fx.unit.arena.new_deref(sp(39), use_r);
    let three = fx.int(3);
    let assign = fx.unit.arena.new_assign(sp(42), deref, three);
    let body = fx.block(vec![x, r, assign]);
    fx.add_fn("f", vec![], NodeId::VOID, body);

    fx.analyze();

    assert_eq!(fx.unit.diags.error_count(), 0);
}

#[test]
fn write_through_imm_reference_is_not() {
    // mut x i32 = 0; imm r &imm i32 = &imm x; *r = 3
    let mut fx = fixture();
    let zero = fx.int(0);
    let x = fx.local("x", Perm::Mut, NodeId::I32, Some(zero));
    let use_x = fx.name_use("x", 30);
    let ref_ty = fx.unit.arena.new_ref_type(NodeId::I32, Perm::Imm, Alloc::Borrow);
    let addr = fx.unit.arena.new_addr_of(sp(28), use_x, ref_ty);
    let decl_ty = fx.unit.arena.new_ref_type(NodeId::I32, Perm::Imm, Alloc::Borrow);
    let r = fx.local("r", Perm::Imm, decl_ty, Some(addr));
    let use_r = fx.name_use("r", 40);
    let deref = fx.unit.arena.new_deref(sp(39), use_r);
    let three = fx.int(3);
    let assign = fx.unit.arena.new_assign(sp(42), deref, three);
    let body = fx.block(vec![x, r, assign]);
    fx.add_fn("f", vec![], NodeId::VOID, body);

    fx.analyze();

    assert_eq!(fx.codes(), vec![diagnostic_codes::NOT_MUTABLE]);
}

#[test]
fn struct_field_assignment_follows_the_owner_permission() {
    // struct P { x f32 }; mut p P; p.x = 1.0 ok; with imm p, rejected
    for (perm, want_errors) in [(Perm::Mut, 0u32), (Perm::Imm, 1u32)] {
        let mut fx = fixture();
        let p_sym = fx.unit.intern("P");
        let strct = fx.unit.arena.new_struct_type(sp(0), p_sym, false);
        let fx_sym = fx.unit.intern("x");
        let field = fx
            .unit
            .arena
            .new_var_dcl(sp(11), fx_sym, Perm::Mut, NodeId::F32, None);
        fx.unit.arena.struct_add_field(strct, field);
        fx.unit.arena.module_add(fx.module, strct);

        let p_ty = fx.name_use("P", 20);
        let p = fx.local("p", perm, p_ty, None);
        let use_p = fx.name_use("p", 30);
        let member = fx.unit.arena.new_member_use(sp(32), fx_sym);
        let elem = fx.unit.arena.new_element(sp(30), use_p, member);
        let val = fx.unit.arena.new_flit(conec_common::Span::dummy(), 1.0, NodeId::F32);
        let assign = fx.unit.arena.new_assign(sp(34), elem, val);
        let body = fx.block(vec![p, assign]);
        fx.add_fn("f", vec![], NodeId::VOID, body);

        fx.analyze();

        assert_eq!(fx.unit.diags.error_count(), want_errors, "perm {perm:?}");
        if want_errors == 0 {
            assert_eq!(fx.unit.arena.vtype(elem), NodeId::F32);
        }
    }
}

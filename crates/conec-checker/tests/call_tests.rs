//! Call arity, default arguments, callable checks.

mod common;

use common::{fixture, sp};
use conec_common::Span;
use conec_common::diagnostics::diagnostic_codes;
use conec_ir::{NodeId, NodeKind, Perm, ty::Alloc};

#[test]
fn zero_arg_call_on_parameterless_function() {
    let mut fx = fixture();
    let helper_body = fx.block(vec![]);
    let helper = fx.add_fn("helper", vec![], NodeId::VOID, helper_body);

    let use_helper = fx.name_use("helper", 20);
    let call = fx.unit.arena.new_fn_call(sp(20), use_helper, vec![]);
    let body = fx.block(vec![call]);
    fx.add_fn("f", vec![], NodeId::VOID, body);

    fx.analyze();

    assert_eq!(fx.unit.diags.error_count(), 0);
    let _ = helper;
}

#[test]
fn extra_argument_is_an_arity_error() {
    let mut fx = fixture();
    let helper_body = fx.block(vec![]);
    fx.add_fn("helper", vec![], NodeId::VOID, helper_body);

    let use_helper = fx.name_use("helper", 20);
    let one = fx.int(1);
    let call = fx.unit.arena.new_fn_call(sp(20), use_helper, vec![one]);
    let body = fx.block(vec![call]);
    fx.add_fn("f", vec![], NodeId::VOID, body);

    fx.analyze();

    assert_eq!(fx.codes(), vec![diagnostic_codes::ARG_COUNT_MISMATCH]);
}

#[test]
fn missing_argument_fills_from_the_declared_default() {
    // fn g(a i32, b i32 = 5) void; g(7)
    let mut fx = fixture();
    let a = fx.parm("a", NodeId::I32);
    let five = fx.int(5);
    let b_sym = fx.unit.intern("b");
    let b = fx
        .unit
        .arena
        .new_var_dcl(Span::dummy(), b_sym, Perm::Imm, NodeId::I32, Some(five));
    let g_body = fx.block(vec![]);
    fx.add_fn("g", vec![a, b], NodeId::VOID, g_body);

    let use_g = fx.name_use("g", 30);
    let seven = fx.int(7);
    let call = fx.unit.arena.new_fn_call(sp(30), use_g, vec![seven]);
    let body = fx.block(vec![call]);
    fx.add_fn("f", vec![], NodeId::VOID, body);

    fx.analyze();

    assert_eq!(fx.unit.diags.error_count(), 0);
    let NodeKind::FnCall(resolved) = fx.unit.arena.kind(call) else {
        panic!("expected call");
    };
    assert_eq!(resolved.args.len(), 2);
    // The filled argument is the default's value, owned by the call.
    let filled = resolved.args[1];
    assert_ne!(filled, five);
    assert!(matches!(fx.unit.arena.kind(filled), NodeKind::ULit(5)));
}

#[test]
fn missing_argument_without_default_is_an_arity_error() {
    let mut fx = fixture();
    let a = fx.parm("a", NodeId::I32);
    let b = fx.parm("b", NodeId::I32);
    let g_body = fx.block(vec![]);
    fx.add_fn("g", vec![a, b], NodeId::VOID, g_body);

    let use_g = fx.name_use("g", 30);
    let seven = fx.int(7);
    let call = fx.unit.arena.new_fn_call(sp(30), use_g, vec![seven]);
    let body = fx.block(vec![call]);
    fx.add_fn("f", vec![], NodeId::VOID, body);

    fx.analyze();

    assert_eq!(fx.codes(), vec![diagnostic_codes::ARG_COUNT_MISMATCH]);
}

#[test]
fn calling_a_number_is_not_a_function() {
    let mut fx = fixture();
    let zero = fx.int(0);
    let x = fx.local("x", Perm::Imm, NodeId::I32, Some(zero));
    let use_x = fx.name_use("x", 20);
    let call = fx.unit.arena.new_fn_call(sp(20), use_x, vec![]);
    let body = fx.block(vec![call]);
    fx.add_fn("f", vec![], NodeId::VOID, body);

    fx.analyze();

    assert_eq!(fx.codes(), vec![diagnostic_codes::NOT_FUNCTION]);
}

#[test]
fn function_reference_callee_auto_derefs() {
    // fn helper() void {}; imm r & imm (fn sig) = &imm helper; r()
    let mut fx = fixture();
    let helper_body = fx.block(vec![]);
    let helper = fx.add_fn("helper", vec![], NodeId::VOID, helper_body);
    let helper_sig = fx.unit.arena.vtype(helper);

    let use_helper = fx.name_use("helper", 20);
    let ref_ty = fx.unit.arena.new_ref_type(helper_sig, Perm::Imm, Alloc::Borrow);
    let addr = fx.unit.arena.new_addr_of(sp(18), use_helper, ref_ty);
    let decl_ty = fx.unit.arena.new_ref_type(helper_sig, Perm::Imm, Alloc::Borrow);
    let r = fx.local("r", Perm::Imm, decl_ty, Some(addr));

    let use_r = fx.name_use("r", 40);
    let call = fx.unit.arena.new_fn_call(sp(40), use_r, vec![]);
    let body = fx.block(vec![r, call]);
    fx.add_fn("f", vec![], NodeId::VOID, body);

    fx.analyze();

    assert_eq!(fx.unit.diags.error_count(), 0);
    let NodeKind::FnCall(resolved) = fx.unit.arena.kind(call) else {
        panic!("expected call");
    };
    assert!(matches!(
        fx.unit.arena.kind(resolved.callee),
        NodeKind::Deref(_)
    ));
}

#[test]
fn call_takes_the_signature_return_type() {
    let mut fx = fixture();
    let one = fx.int(1);
    let g_body = fx.block(vec![one]);
    fx.add_fn("g", vec![], NodeId::I32, g_body);

    let use_g = fx.name_use("g", 30);
    let call = fx.unit.arena.new_fn_call(sp(30), use_g, vec![]);
    let body = fx.block(vec![call]);
    fx.add_fn("f", vec![], NodeId::I32, body);

    fx.analyze();

    assert_eq!(fx.unit.diags.error_count(), 0);
    assert_eq!(fx.unit.arena.vtype(call), NodeId::I32);
}

//! Name-use binding tests: forward references, module qualification,
//! struct member scopes.

use conec_binder::resolve_names;
use conec_common::Span;
use conec_common::diagnostics::diagnostic_codes;
use conec_ir::{CompileUnit, NodeId, NodeKind, Perm};

fn sp(n: u32) -> Span {
    Span::new(n, n + 1)
}

#[test]
fn module_members_resolve_forward() {
    // fn caller() { helper() }  fn helper() { }
    let mut unit = CompileUnit::new("fwd.con");
    let program = unit.arena.new_program();
    let module = {
        let sym = unit.intern("main");
        unit.arena.new_module(Span::dummy(), sym)
    };
    unit.arena.program_add(program, module);

    let helper_sym = unit.intern("helper");
    let use_helper = unit.arena.new_name_use(sp(14), helper_sym);
    let call = unit.arena.new_fn_call(sp(14), use_helper, vec![]);
    let caller_body = unit.arena.new_block(Span::new(12, 25));
    unit.arena.block_add(caller_body, call);
    let caller_sym = unit.intern("caller");
    let caller_sig = unit.arena.new_fn_sig(NodeId::VOID, vec![]);
    let caller = unit
        .arena
        .new_fn_dcl(sp(0), caller_sym, caller_sig, Some(caller_body));
    unit.arena.module_add(module, caller);

    let helper_body = unit.arena.new_block(Span::new(40, 42));
    let helper_sig = unit.arena.new_fn_sig(NodeId::VOID, vec![]);
    let helper = unit
        .arena
        .new_fn_dcl(sp(30), helper_sym, helper_sig, Some(helper_body));
    unit.arena.module_add(module, helper);

    resolve_names(&mut unit, program);

    assert_eq!(unit.diags.error_count(), 0);
    match unit.arena.kind(use_helper) {
        NodeKind::NameUse(nu) => assert_eq!(nu.dcl, Some(helper)),
        other => panic!("expected name use, got {other:?}"),
    }
}

#[test]
fn qualified_use_sees_only_the_named_module() {
    let mut unit = CompileUnit::new("mods.con");
    let program = unit.arena.new_program();

    let math_sym = unit.intern("math");
    let math = unit.arena.new_module(Span::dummy(), math_sym);
    unit.arena.program_add(program, math);
    let pi_sym = unit.intern("pi");
    let pi_lit = unit.arena.new_flit(sp(20), 3.14, NodeId::F64);
    let pi = unit
        .arena
        .new_var_dcl(sp(10), pi_sym, Perm::Imm, NodeId::F64, Some(pi_lit));
    unit.arena.module_add(math, pi);

    let main_sym = unit.intern("main");
    let main = unit.arena.new_module(Span::dummy(), main_sym);
    unit.arena.program_add(program, main);

    // math::pi resolves; bare pi from another module does not.
    let qualified = unit.arena.new_qualified_name_use(sp(40), math, pi_sym);
    let bare = unit.arena.new_name_use(sp(60), pi_sym);
    let body = unit.arena.new_block(Span::new(38, 64));
    unit.arena.block_add(body, qualified);
    unit.arena.block_add(body, bare);
    let f_sym = unit.intern("f");
    let sig = unit.arena.new_fn_sig(NodeId::VOID, vec![]);
    let f = unit.arena.new_fn_dcl(sp(30), f_sym, sig, Some(body));
    unit.arena.module_add(main, f);

    resolve_names(&mut unit, program);

    match unit.arena.kind(qualified) {
        NodeKind::NameUse(nu) => assert_eq!(nu.dcl, Some(pi)),
        other => panic!("expected name use, got {other:?}"),
    }
    assert_eq!(unit.diags.error_count(), 1);
    assert_eq!(unit.diags.all()[0].code, diagnostic_codes::UNKNOWN_NAME);
    assert_eq!(unit.diags.all()[0].start, 60);
}

#[test]
fn method_body_sees_sibling_fields() {
    // struct P { x f32; fn len() { x } }
    let mut unit = CompileUnit::new("struct.con");
    let program = unit.arena.new_program();
    let mod_sym = unit.intern("main");
    let module = unit.arena.new_module(Span::dummy(), mod_sym);
    unit.arena.program_add(program, module);

    let p_sym = unit.intern("P");
    let strct = unit.arena.new_struct_type(sp(0), p_sym, false);
    let x_sym = unit.intern("x");
    let x_field = unit
        .arena
        .new_var_dcl(sp(11), x_sym, Perm::Mut, NodeId::F32, None);
    unit.arena.struct_add_field(strct, x_field);

    let use_x = unit.arena.new_name_use(sp(30), x_sym);
    let body = unit.arena.new_block(Span::new(28, 33));
    unit.arena.block_add(body, use_x);
    let len_sym = unit.intern("len");
    let sig = unit.arena.new_fn_sig(NodeId::F32, vec![]);
    let len = unit.arena.new_fn_dcl(sp(20), len_sym, sig, Some(body));
    unit.arena.struct_add_method(strct, len);
    unit.arena.module_add(module, strct);

    resolve_names(&mut unit, program);

    assert_eq!(unit.diags.error_count(), 0);
    match unit.arena.kind(use_x) {
        NodeKind::NameUse(nu) => assert_eq!(nu.dcl, Some(x_field)),
        other => panic!("expected name use, got {other:?}"),
    }
}

#[test]
fn declared_type_references_resolve_to_struct() {
    // struct P {}; imm v P (declared type names the struct)
    let mut unit = CompileUnit::new("tyref.con");
    let program = unit.arena.new_program();
    let mod_sym = unit.intern("main");
    let module = unit.arena.new_module(Span::dummy(), mod_sym);
    unit.arena.program_add(program, module);

    let p_sym = unit.intern("P");
    let strct = unit.arena.new_struct_type(sp(0), p_sym, false);
    unit.arena.module_add(module, strct);

    let ty_use = unit.arena.new_name_use(sp(20), p_sym);
    let v_sym = unit.intern("v");
    let v = unit.arena.new_var_dcl(sp(16), v_sym, Perm::Imm, ty_use, None);
    unit.arena.module_add(module, v);

    resolve_names(&mut unit, program);

    assert_eq!(unit.diags.error_count(), 0);
    match unit.arena.kind(ty_use) {
        NodeKind::NameUse(nu) => assert_eq!(nu.dcl, Some(strct)),
        other => panic!("expected name use, got {other:?}"),
    }
}

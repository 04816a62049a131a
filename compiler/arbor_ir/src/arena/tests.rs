use pretty_assertions::assert_eq;

use super::*;
use crate::{BinaryOp, Decl};

#[test]
fn test_canonical_nodes() {
    let arena = TreeArena::new();
    assert_eq!(arena.kind(NodeId::ERROR), NodeKind::ErrorMark);
    assert_eq!(arena.ty(NodeId::ERROR), Some(NodeId::ERROR));
    assert_eq!(arena.kind(NodeId::VOID), NodeKind::VoidCst);
    assert_eq!(arena.ty(NodeId::VOID), Some(arena.common().void));
    assert!(arena.is_void_type(arena.common().void));
    assert!(arena.error_operand_p(NodeId::ERROR));
    assert!(!arena.error_operand_p(NodeId::VOID));
    assert_eq!(arena.len(), 6);
}

#[test]
fn test_error_typed_node_is_error_operand() {
    let mut arena = TreeArena::new();
    let bad = arena.alloc(NodeKind::IntegerCst(1), Some(NodeId::ERROR), Span::UNKNOWN);
    assert!(arena.error_operand_p(bad));
}

#[test]
fn test_operand_lists() {
    let mut arena = TreeArena::new();
    let int = arena.common().int;
    let a = arena.integer_cst(1, int);
    let b = arena.integer_cst(2, int);
    let range = arena.alloc_list(&[a, b]);
    assert_eq!(arena.list(range), &[a, b]);
    assert_eq!(arena.alloc_list(&[]), NodeRange::EMPTY);
    assert!(arena.list(NodeRange::EMPTY).is_empty());
}

#[test]
fn test_call_with_more_than_u16_arguments() {
    let mut arena = TreeArena::new();
    let int = arena.common().int;
    let fn_ty = arena.function_type(int, &[]);
    let f = arena.function_decl("f", fn_ty, Span::UNKNOWN);
    let arg = arena.integer_cst(0, int);
    let args = vec![arg; usize::from(u16::MAX) + 10];

    let call = arena.call_expr(Some(f), &args, Some(int), Span::UNKNOWN);

    let NodeKind::CallExpr { args: range, .. } = arena.kind(call) else {
        panic!("expected a call, got {:?}", arena.kind(call));
    };
    assert_eq!(range.len(), args.len());
    assert_eq!(arena.list(range).last(), Some(&arg));
}

#[test]
fn test_side_effects_propagate_from_operands() {
    let mut arena = TreeArena::new();
    let int = arena.common().int;
    let fn_ty = arena.function_type(int, &[]);
    let f = arena.function_decl("f", fn_ty, Span::UNKNOWN);
    let call = arena.call_expr(Some(f), &[], Some(int), Span::UNKNOWN);
    let one = arena.integer_cst(1, int);
    let sum = arena.binary(BinaryOp::Plus, call, one, int, Span::UNKNOWN);
    let pure = arena.binary(BinaryOp::Plus, one, one, int, Span::UNKNOWN);

    assert!(arena.side_effects(call));
    assert!(arena.side_effects(sum));
    assert!(!arena.side_effects(pure));
}

#[test]
fn test_unevaluated_operands_do_not_propagate() {
    let mut arena = TreeArena::new();
    let int = arena.common().int;
    let call = arena.call_expr(None, &[], Some(int), Span::UNKNOWN);
    let size = arena.common().size;
    let sizeof = arena.build(NodeKind::SizeofExpr(call), Some(size), Span::UNKNOWN);
    assert!(!arena.side_effects(sizeof));
}

#[test]
fn test_volatile_access_flags() {
    let mut arena = TreeArena::new();
    let int = arena.common().int;
    let vint = arena.qualified_type(int, NodeFlags::VOLATILE);
    let ptr = arena.pointer_type(vint);
    let p = arena.var_decl("p", ptr, Span::UNKNOWN);
    let deref = arena.indirect_ref(p, vint, Span::UNKNOWN);
    let v = arena.var_decl("v", vint, Span::UNKNOWN);

    assert!(arena.has_flag(deref, NodeFlags::THIS_VOLATILE));
    assert!(arena.side_effects(deref));
    assert!(arena.side_effects(v));
    assert!(!arena.side_effects(p));
}

#[test]
fn test_type_queries() {
    let mut arena = TreeArena::new();
    let int = arena.common().int;
    let fwd = arena.record_type("Fwd", None, Span::UNKNOWN);
    let full = arena.record_type("Full", Some(16), Span::UNKNOWN);
    let r = arena.reference_type(full);
    let p = arena.pointer_type(int);

    assert!(!arena.is_complete(fwd));
    assert!(arena.is_complete(full));
    assert!(!arena.is_complete(arena.common().void));
    assert!(arena.is_reference_type(r));
    assert!(arena.is_indirect_type(r) && arena.is_indirect_type(p));
    assert_eq!(arena.indirect_target(p), Some(int));
    assert_eq!(arena.type_size_unit(int), Some(4));
    assert_eq!(arena.type_size_unit(full), Some(16));
    assert_eq!(arena.type_size_unit(fwd), None);

    arena.complete_record_type(fwd, 8);
    assert!(arena.is_complete(fwd));
}

#[test]
fn test_qualified_variant_keeps_attributes() {
    let mut arena = TreeArena::new();
    let rec = arena.record_type("Token", Some(4), Span::UNKNOWN);
    let nodiscard = arena.intern("nodiscard");
    arena.add_attribute(rec, Attribute::new(nodiscard));
    let cv = arena.qualified_type(rec, NodeFlags::CONST | NodeFlags::VOLATILE);

    assert!(arena.is_volatile(cv));
    assert!(arena.lookup_attribute(cv, "nodiscard").is_some());
    assert_eq!(arena.format_type(cv), "const volatile Token");
}

#[test]
fn test_attribute_lookup() {
    let mut arena = TreeArena::new();
    let int = arena.common().int;
    let fn_ty = arena.function_type(int, &[]);
    let f = arena.function_decl("f", fn_ty, Span::UNKNOWN);
    let name = arena.intern("nodiscard");
    let msg = arena.intern("check it");
    arena.add_attribute(f, Attribute::with_arg(name, msg));

    let attr = arena.lookup_attribute(f, "nodiscard");
    assert_eq!(attr.and_then(Attribute::first_arg), Some(msg));
    assert!(arena.lookup_attribute(f, "deprecated").is_none());
    assert!(arena.attributes(int).is_empty());
}

#[test]
fn test_decl_initial_update() {
    let mut arena = TreeArena::new();
    let int = arena.common().int;
    let x = arena.var_decl("x", int, Span::UNKNOWN);
    let one = arena.integer_cst(1, int);
    arena.set_decl_initial(x, Some(one));
    assert_eq!(
        arena.decl(x).copied(),
        Some(Decl {
            name: arena.intern("x"),
            initial: Some(one),
            size: None,
            size_unit: None,
        })
    );
}

#[test]
fn test_location_wrapper_kinds() {
    let mut arena = TreeArena::new();
    let int = arena.common().int;
    let x = arena.var_decl("x", int, Span::UNKNOWN);
    let one = arena.integer_cst(1, int);
    let wx = arena.location_wrapper(x, Span::new(3, 4));
    let w1 = arena.location_wrapper(one, Span::new(5, 6));

    assert_eq!(arena.kind(wx), NodeKind::ViewConvertExpr(x));
    assert_eq!(arena.kind(w1), NodeKind::NonLvalueExpr(one));
    assert!(arena.has_flag(wx, NodeFlags::LOCATION_WRAPPER));
    assert_eq!(arena.ty(wx), Some(int));
}

#[test]
fn test_operands_and_type_fields() {
    let mut arena = TreeArena::new();
    let int = arena.common().int;
    let a = arena.integer_cst(1, int);
    let b = arena.integer_cst(2, int);
    let c = arena.integer_cst(3, int);
    let cond = arena.cond_expr(a, None, c, Some(int), Span::UNKNOWN);
    let comma = arena.compound_expr(a, b, Span::UNKNOWN);
    let fn_ty = arena.function_type(int, &[int, int]);

    assert_eq!(arena.operands(cond).as_slice(), &[a, c]);
    assert_eq!(arena.operands(comma).as_slice(), &[a, b]);
    assert!(arena.operands(a).is_empty());
    assert_eq!(arena.type_fields(fn_ty).as_slice(), &[int, int, int]);
}

#[test]
fn test_warning_suppression() {
    let mut arena = TreeArena::new();
    let int = arena.common().int;
    let a = arena.integer_cst(1, int);
    assert!(!arena.any_warning_suppressed(a));
    arena.suppress_warning(a, NodeFlags::NO_UNUSED_VALUE_WARNING);
    assert!(arena.warning_suppressed(a, NodeFlags::NO_UNUSED_VALUE_WARNING));
    assert!(!arena.warning_suppressed(a, NodeFlags::NO_UNUSED_RESULT_WARNING));
    assert!(arena.any_warning_suppressed(a));

    arena.suppress_warning(a, NodeFlags::NO_WARNING);
    assert!(arena.warning_suppressed(a, NodeFlags::NO_UNUSED_RESULT_WARNING));
}

#[test]
fn test_format_types() {
    let mut arena = TreeArena::new();
    let int = arena.common().int;
    let ptr = arena.pointer_type(int);
    let r = arena.reference_type(ptr);
    let u8_ty = arena.integer_type(8, true);
    let f = arena.function_type(arena.common().void, &[int, u8_ty]);
    let dbl = arena.real_type(64);

    assert_eq!(arena.format_type(r), "int*&");
    assert_eq!(arena.format_type(f), "void(int, u8)");
    assert_eq!(arena.format_type(dbl), "double");
    assert_eq!(arena.format_type(NodeId::ERROR), "<error>");
    assert_eq!(arena.format_type(arena.common().size), "size_t");
}

#[test]
fn test_format_decl() {
    let mut arena = TreeArena::new();
    let int = arena.common().int;
    let v = arena.var_decl("counter", int, Span::UNKNOWN);
    assert_eq!(arena.format_decl(v), "counter");
    assert_eq!(arena.format_decl(int), "<integer_type>");
}

use arbor_diagnostic::{DiagnosticConfig, ErrorCode};
use arbor_ir::{CastKind, Span};
use pretty_assertions::assert_eq;

use super::*;
use crate::TreeConfig;

/// Walk `root`, recording every visited node.
fn collect(cx: &mut TreeCx, root: NodeId, visited: Option<&mut Visited>) -> Vec<NodeId> {
    let mut seen = Vec::new();
    let mut visit = |_: &mut TreeCx, node: NodeId, _: &mut bool| {
        seen.push(node);
        None
    };
    assert_eq!(walk_tree(cx, root, &mut visit, visited), None);
    seen
}

/// `DeclExpr(x)` where the temporary `x` is initialized by `(decl_expr, x)`.
fn decl_cycle(cx: &mut TreeCx) -> (NodeId, NodeId, NodeId) {
    let int = cx.arena.common().int;
    let x = cx.arena.var_decl("x", int, Span::new(0, 1));
    cx.arena.insert_flags(x, NodeFlags::ARTIFICIAL);
    let decl_expr = cx.arena.decl_expr(x, Span::new(0, 5));
    let init = cx.arena.compound_expr(decl_expr, x, Span::new(2, 5));
    cx.arena.set_decl_initial(x, Some(init));
    (decl_expr, x, init)
}

#[test]
fn test_operands_in_order() {
    let mut cx = TreeCx::default();
    let int = cx.arena.common().int;
    let a = cx.arena.var_decl("a", int, Span::UNKNOWN);
    let b = cx.arena.var_decl("b", int, Span::UNKNOWN);
    let sum = cx.arena.binary(arbor_ir::BinaryOp::Plus, a, b, int, Span::UNKNOWN);
    let assign = cx.arena.modify_expr(a, sum, Span::UNKNOWN);

    assert_eq!(collect(&mut cx, assign, None), vec![assign, a, sum, a, b]);

    let mut visited = Visited::default();
    assert_eq!(
        collect(&mut cx, assign, Some(&mut visited)),
        vec![assign, a, sum, b]
    );
}

#[test]
fn test_cycle_with_visited_set_terminates() {
    let mut cx = TreeCx::default();
    let (decl_expr, x, init) = decl_cycle(&mut cx);

    let mut visited = Visited::default();
    let seen = collect(&mut cx, decl_expr, Some(&mut visited));

    assert_eq!(seen, vec![decl_expr, init, x]);
    assert!(cx.diagnostics.is_empty());
}

#[test]
fn test_cycle_without_visited_set_hits_nesting_limit() {
    let mut cx = TreeCx::new(TreeConfig {
        max_nesting_depth: 32,
        diagnostics: DiagnosticConfig::default(),
    });
    let (decl_expr, _, _) = decl_cycle(&mut cx);

    let mut visit = |_: &mut TreeCx, _: NodeId, _: &mut bool| None;
    assert_eq!(
        walk_tree(&mut cx, decl_expr, &mut visit, None),
        Some(NodeId::ERROR)
    );
    assert_eq!(cx.nesting_depth(), 0);
    let codes: Vec<_> = cx.diagnostics.peek().map(|d| d.code).collect();
    assert_eq!(codes, vec![ErrorCode::E9001]);
}

#[test]
fn test_user_declarations_are_not_entered() {
    let mut cx = TreeCx::default();
    let int = cx.arena.common().int;
    let one = cx.arena.integer_cst(1, int);
    let y = cx.arena.var_decl("y", int, Span::UNKNOWN);
    cx.arena.set_decl_initial(y, Some(one));
    let decl_expr = cx.arena.decl_expr(y, Span::UNKNOWN);

    assert_eq!(collect(&mut cx, decl_expr, None), vec![decl_expr, y]);

    let s = cx.arena.var_decl("s", int, Span::UNKNOWN);
    cx.arena
        .insert_flags(s, NodeFlags::ARTIFICIAL | NodeFlags::STATIC);
    cx.arena.set_decl_initial(s, Some(one));
    let static_expr = cx.arena.decl_expr(s, Span::UNKNOWN);
    assert_eq!(collect(&mut cx, static_expr, None), vec![static_expr, s]);
}

#[test]
fn test_early_exit_inside_pack_expansion() {
    let mut cx = TreeCx::default();
    let int = cx.arena.common().int;
    let pattern = cx.arena.var_decl("pattern", int, Span::UNKNOWN);
    let before = cx.arena.integer_cst(1, int);
    let target = cx.arena.integer_cst(2, int);
    let after = cx.arena.integer_cst(3, int);
    let elts = cx.arena.alloc_list(&[before, target, after]);
    let extra = cx
        .arena
        .alloc(NodeKind::TreeVec { elts }, None, Span::UNKNOWN);
    let expansion = cx.arena.build(
        NodeKind::ExprPackExpansion {
            pattern,
            extra_args: Some(extra),
        },
        Some(int),
        Span::UNKNOWN,
    );
    let sibling = cx.arena.var_decl("sibling", int, Span::UNKNOWN);
    let root = cx.arena.compound_expr(expansion, sibling, Span::UNKNOWN);

    let mut seen = Vec::new();
    let mut visit = |_: &mut TreeCx, node: NodeId, _: &mut bool| {
        seen.push(node);
        (node == target).then_some(node)
    };
    let found = walk_tree(&mut cx, root, &mut visit, None);

    assert_eq!(found, Some(target));
    assert_eq!(seen, vec![root, expansion, pattern, extra, before, target]);
}

#[test]
fn test_pruned_tree_list_still_walks_chain() {
    let mut cx = TreeCx::default();
    let int = cx.arena.common().int;
    let v1 = cx.arena.integer_cst(1, int);
    let v2 = cx.arena.integer_cst(2, int);
    let tail = cx.arena.alloc(
        NodeKind::TreeList {
            purpose: None,
            value: Some(v2),
            chain: None,
        },
        None,
        Span::UNKNOWN,
    );
    let head = cx.arena.alloc(
        NodeKind::TreeList {
            purpose: None,
            value: Some(v1),
            chain: Some(tail),
        },
        None,
        Span::UNKNOWN,
    );

    let mut seen = Vec::new();
    let mut visit = |cx: &mut TreeCx, node: NodeId, walk: &mut bool| {
        seen.push(node);
        if matches!(cx.arena.kind(node), NodeKind::TreeList { .. }) {
            *walk = false;
        }
        None
    };
    assert_eq!(walk_tree(&mut cx, head, &mut visit, None), None);
    assert_eq!(seen, vec![head, tail]);

    assert_eq!(collect(&mut cx, head, None), vec![head, v1, tail, v2]);
}

#[test]
fn test_unevaluated_operands() {
    let mut cx = TreeCx::default();
    let int = cx.arena.common().int;
    let size = cx.arena.common().size;
    let x = cx.arena.var_decl("x", int, Span::UNKNOWN);
    let sizeof = cx.arena.build(NodeKind::SizeofExpr(x), Some(size), Span::UNKNOWN);
    let root = cx.arena.compound_expr(sizeof, x, Span::UNKNOWN);

    let mut depths = Vec::new();
    let mut visit = |cx: &mut TreeCx, node: NodeId, _: &mut bool| {
        if node == x {
            depths.push(cx.unevaluated_depth());
        }
        None
    };
    assert_eq!(walk_tree(&mut cx, root, &mut visit, None), None);
    assert_eq!(depths, vec![1, 0]);
    assert_eq!(cx.unevaluated_depth(), 0);
}

#[test]
fn test_unevaluated_depth_restored_on_early_exit() {
    let mut cx = TreeCx::default();
    let int = cx.arena.common().int;
    let x = cx.arena.var_decl("x", int, Span::UNKNOWN);
    let decltype = cx
        .arena
        .alloc(NodeKind::DecltypeType { expr: x }, None, Span::UNKNOWN);

    let mut visit = |_: &mut TreeCx, node: NodeId, _: &mut bool| (node == x).then_some(node);
    assert_eq!(walk_tree(&mut cx, decltype, &mut visit, None), Some(x));
    assert_eq!(cx.unevaluated_depth(), 0);
}

#[test]
fn test_requires_expression_skips_parameters() {
    let mut cx = TreeCx::default();
    let int = cx.arena.common().int;
    let parm = cx.arena.parm_decl("t", int, Span::UNKNOWN);
    let reqs = cx.arena.var_decl("req", int, Span::UNKNOWN);
    let requires = cx.arena.build(
        NodeKind::RequiresExpr {
            parms: Some(parm),
            reqs,
        },
        Some(cx.arena.common().bool),
        Span::UNKNOWN,
    );

    assert_eq!(collect(&mut cx, requires, None), vec![requires, reqs]);
}

#[test]
fn test_type_fields_need_visited_set() {
    let mut cx = TreeCx::default();
    let int = cx.arena.common().int;
    let ptr = cx.arena.pointer_type(int);
    let f = cx.arena.var_decl("f", int, Span::UNKNOWN);
    let cast = cx
        .arena
        .cast(CastKind::Static, f, ptr, Span::UNKNOWN);

    assert_eq!(collect(&mut cx, cast, None), vec![cast, ptr, f]);

    let mut visited = Visited::default();
    assert_eq!(
        collect(&mut cx, cast, Some(&mut visited)),
        vec![cast, ptr, int, f]
    );
}

#[test]
fn test_pruning_kinds() {
    let mut cx = TreeCx::default();
    let int = cx.arena.common().int;
    let f = cx.arena.intern("f");
    let f_id = cx.arena.alloc(NodeKind::Identifier(f), None, Span::UNKNOWN);
    let fn_type = cx.arena.function_type(int, &[]);
    let g = cx.arena.function_decl("g", fn_type, Span::UNKNOWN);
    let h = cx.arena.function_decl("h", fn_type, Span::UNKNOWN);
    let tail = cx.arena.alloc(
        NodeKind::Overload {
            function: h,
            chain: None,
        },
        None,
        Span::UNKNOWN,
    );
    let overload = cx.arena.alloc(
        NodeKind::Overload {
            function: g,
            chain: Some(tail),
        },
        None,
        Span::UNKNOWN,
    );
    let record = cx.arena.record_type("R", Some(8), Span::UNKNOWN);
    let baselink = cx.arena.alloc(
        NodeKind::Baselink {
            access_type: Some(record),
            functions: overload,
        },
        None,
        Span::UNKNOWN,
    );
    let using = cx.arena.alloc(
        NodeKind::UsingDecl {
            name: f_id,
            scope: Some(record),
            decls: Some(overload),
        },
        None,
        Span::UNKNOWN,
    );

    assert_eq!(
        collect(&mut cx, baselink, None),
        vec![baselink, overload, g, tail, h]
    );
    cx.arena
        .insert_flags(baselink, NodeFlags::BASELINK_QUALIFIED);
    assert_eq!(
        collect(&mut cx, baselink, None),
        vec![baselink, record, overload, g, tail, h]
    );
    assert_eq!(
        collect(&mut cx, using, None),
        vec![using, f_id, record, overload, g, tail, h]
    );
}

#[test]
fn test_coroutine_and_static_assert_children() {
    let mut cx = TreeCx::default();
    let int = cx.arena.common().int;
    let void = cx.arena.common().void;
    let awaited = cx.arena.var_decl("awaited", int, Span::UNKNOWN);
    let frame = cx.arena.var_decl("frame", int, Span::UNKNOWN);
    let init = cx.arena.integer_cst(0, int);
    let co_await = cx.arena.build(
        NodeKind::CoAwaitExpr {
            expr: awaited,
            frame_var: Some(frame),
            initializer: Some(init),
        },
        Some(int),
        Span::UNKNOWN,
    );
    assert_eq!(
        collect(&mut cx, co_await, None),
        vec![co_await, frame, init, awaited]
    );

    let value = cx.arena.var_decl("value", int, Span::UNKNOWN);
    let call = cx.arena.call_expr(None, &[value], Some(void), Span::UNKNOWN);
    let co_return = cx.arena.build(
        NodeKind::CoReturnExpr {
            expr: Some(value),
            call: Some(call),
        },
        None,
        Span::UNKNOWN,
    );
    assert_eq!(
        collect(&mut cx, co_return, None),
        vec![co_return, call, value]
    );

    let nothing = cx.arena.call_expr(None, &[], Some(void), Span::UNKNOWN);
    let void_return = cx.arena.build(
        NodeKind::CoReturnExpr {
            expr: Some(nothing),
            call: None,
        },
        None,
        Span::UNKNOWN,
    );
    assert_eq!(
        collect(&mut cx, void_return, None),
        vec![void_return, nothing]
    );

    let stray = cx.arena.call_expr(None, &[], Some(void), Span::UNKNOWN);
    let bare_return = cx.arena.build(
        NodeKind::CoReturnExpr {
            expr: None,
            call: Some(stray),
        },
        None,
        Span::UNKNOWN,
    );
    assert_eq!(collect(&mut cx, bare_return, None), vec![bare_return]);

    let condition = cx.arena.integer_cst(1, int);
    let message = cx.arena.string_cst("message", int);
    let assertion = cx.arena.alloc(
        NodeKind::StaticAssert {
            condition,
            message: Some(message),
        },
        None,
        Span::UNKNOWN,
    );
    assert_eq!(
        collect(&mut cx, assertion, None),
        vec![assertion, condition, message]
    );
}

#[test]
fn test_argument_packs_and_compound_literals() {
    let mut cx = TreeCx::default();
    let int = cx.arena.common().int;
    let a = cx.arena.integer_cst(1, int);
    let b = cx.arena.integer_cst(2, int);
    let args = cx.arena.alloc_list(&[a, b]);
    let pack = cx
        .arena
        .alloc(NodeKind::NontypeArgumentPack { args }, None, Span::UNKNOWN);
    assert_eq!(collect(&mut cx, pack, None), vec![pack, a, b]);

    let record = cx.arena.record_type("P", Some(8), Span::UNKNOWN);
    let elts = cx.arena.alloc_list(&[a, b]);
    let ctor = cx
        .arena
        .build(NodeKind::Constructor { elts }, Some(record), Span::UNKNOWN);
    assert_eq!(collect(&mut cx, ctor, None), vec![ctor, a, b]);
    cx.arena.insert_flags(ctor, NodeFlags::COMPOUND_LITERAL);
    assert_eq!(collect(&mut cx, ctor, None), vec![ctor, record, a, b]);
}

#[test]
fn test_visitor_result_stops_walk() {
    let mut cx = TreeCx::default();
    let int = cx.arena.common().int;
    let a = cx.arena.var_decl("a", int, Span::UNKNOWN);
    let b = cx.arena.var_decl("b", int, Span::UNKNOWN);
    let comma = cx.arena.compound_expr(a, b, Span::UNKNOWN);

    let mut calls = 0;
    let mut visit = |_: &mut TreeCx, _: NodeId, _: &mut bool| {
        calls += 1;
        Some(NodeId::VOID)
    };
    assert_eq!(walk_tree(&mut cx, comma, &mut visit, None), Some(NodeId::VOID));
    assert_eq!(calls, 1);
}

//! Property-based tests for the tree utilities.
//!
//! These tests use proptest to generate random integer expressions over
//! fresh variables and verify:
//! 1. Side-effect preservation: conversion to void collapses exactly the
//!    expressions without side effects
//! 2. Idempotence: converting a converted expression changes nothing
//! 3. Error propagation through every entry point
//! 4. Comma asymmetry: only the right operand of a comma is converted

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::doc_markdown,
    clippy::needless_pass_by_value,
    reason = "Proptest macros generate code with these patterns"
)]

use arbor_diagnostic::DiagnosticConfig;
use arbor_ir::{BinaryOp, NodeId, NodeKind, Span};
use arbor_tree::{
    convert_to_void, mark_discarded_use, mark_lvalue_use, mark_rvalue_use, mark_use, TreeConfig,
    TreeCx, UseMode, VoidContext,
};
use proptest::prelude::*;

// -- Expression Generation --

/// Shape of a generated expression; every leaf is a fresh node.
#[derive(Clone, Debug)]
enum Shape {
    Var,
    LocatedVar,
    Const(i64),
    Call,
    Assign,
    Deref,
    Add(Box<Shape>, Box<Shape>),
    Comma(Box<Shape>, Box<Shape>),
    Cond(Box<Shape>, Box<Shape>, Box<Shape>),
    Nop(Box<Shape>),
}

fn leaf_strategy() -> impl Strategy<Value = Shape> {
    prop_oneof![
        Just(Shape::Var),
        Just(Shape::LocatedVar),
        any::<i8>().prop_map(|v| Shape::Const(i64::from(v))),
        Just(Shape::Call),
        Just(Shape::Assign),
        Just(Shape::Deref),
    ]
}

/// Generate an expression (recursive with depth limit).
fn shape_strategy() -> impl Strategy<Value = Shape> {
    leaf_strategy().prop_recursive(4, 32, 3, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone())
                .prop_map(|(a, b)| Shape::Add(Box::new(a), Box::new(b))),
            (inner.clone(), inner.clone())
                .prop_map(|(a, b)| Shape::Comma(Box::new(a), Box::new(b))),
            (inner.clone(), inner.clone(), inner.clone()).prop_map(|(c, a, b)| Shape::Cond(
                Box::new(c),
                Box::new(a),
                Box::new(b)
            )),
            inner.prop_map(|a| Shape::Nop(Box::new(a))),
        ]
    })
}

fn context_strategy() -> impl Strategy<Value = VoidContext> {
    prop::sample::select(VoidContext::ALL.to_vec())
}

fn new_cx() -> TreeCx {
    TreeCx::new(TreeConfig {
        diagnostics: DiagnosticConfig::unlimited(),
        ..TreeConfig::default()
    })
}

fn build(cx: &mut TreeCx, shape: &Shape) -> NodeId {
    let int = cx.arena.common().int;
    match shape {
        Shape::Var => cx.arena.var_decl("v", int, Span::new(0, 1)),
        Shape::LocatedVar => {
            let v = cx.arena.var_decl("v", int, Span::new(0, 1));
            cx.arena.location_wrapper(v, Span::new(2, 3))
        }
        Shape::Const(v) => cx.arena.integer_cst(*v, int),
        Shape::Call => {
            let fn_type = cx.arena.function_type(int, &[]);
            let f = cx.arena.function_decl("f", fn_type, Span::UNKNOWN);
            cx.arena.call_expr(Some(f), &[], Some(int), Span::new(4, 7))
        }
        Shape::Assign => {
            let v = cx.arena.var_decl("v", int, Span::new(0, 1));
            let one = cx.arena.integer_cst(1, int);
            cx.arena.modify_expr(v, one, Span::new(0, 5))
        }
        Shape::Deref => {
            let ptr = cx.arena.pointer_type(int);
            let p = cx.arena.var_decl("p", ptr, Span::new(8, 9));
            cx.arena.indirect_ref(p, int, Span::new(7, 9))
        }
        Shape::Add(a, b) => {
            let a = build(cx, a);
            let b = build(cx, b);
            cx.arena.binary(BinaryOp::Plus, a, b, int, Span::UNKNOWN)
        }
        Shape::Comma(a, b) => {
            let a = build(cx, a);
            let b = build(cx, b);
            cx.arena.compound_expr(a, b, Span::UNKNOWN)
        }
        Shape::Cond(c, a, b) => {
            let c = build(cx, c);
            let a = build(cx, a);
            let b = build(cx, b);
            cx.arena.cond_expr(c, Some(a), b, Some(int), Span::UNKNOWN)
        }
        Shape::Nop(a) => {
            let a = build(cx, a);
            cx.arena.nop_expr(a, int, Span::UNKNOWN)
        }
    }
}

// -- Property Tests --

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    })]

    /// Conversion collapses an expression to void iff it has no side effects.
    #[test]
    fn prop_side_effects_preserved(shape in shape_strategy(), ctx in context_strategy()) {
        let mut cx = new_cx();
        let expr = build(&mut cx, &shape);
        let had_effects = cx.arena.side_effects(expr);

        let result = convert_to_void(&mut cx, expr, ctx);

        prop_assert_eq!(result == NodeId::VOID, !had_effects);
        prop_assert!(result != NodeId::ERROR);
    }

    /// Converting an already converted expression returns it unchanged.
    #[test]
    fn prop_conversion_idempotent(shape in shape_strategy(), ctx in context_strategy()) {
        let mut cx = new_cx();
        let expr = build(&mut cx, &shape);

        let once = convert_to_void(&mut cx, expr, ctx);
        let twice = convert_to_void(&mut cx, once, ctx);

        prop_assert_eq!(once, twice);
    }

    /// Only the right operand of a comma is converted.
    #[test]
    fn prop_comma_left_operand_untouched(
        lhs in shape_strategy(),
        rhs in shape_strategy(),
        ctx in context_strategy(),
    ) {
        let mut cx = new_cx();
        let lhs = build(&mut cx, &lhs);
        let rhs = build(&mut cx, &rhs);
        let lhs_kind = cx.arena.kind(lhs);
        let lhs_flags = cx.arena.flags(lhs);
        let comma = cx.arena.compound_expr(lhs, rhs, Span::UNKNOWN);

        let result = convert_to_void(&mut cx, comma, ctx);

        prop_assert_eq!(cx.arena.kind(lhs), lhs_kind);
        prop_assert_eq!(cx.arena.flags(lhs), lhs_flags);
        if let NodeKind::CompoundExpr { lhs: new_lhs, .. } = cx.arena.kind(result) {
            prop_assert_eq!(new_lhs, lhs);
        }
    }

    /// Erroneous input is returned without diagnostics.
    #[test]
    fn prop_errors_propagate(
        ctx in context_strategy(),
        rvalue in any::<bool>(),
        read in any::<bool>(),
    ) {
        let mut cx = new_cx();
        let bad = cx.arena.var_decl("bad", NodeId::ERROR, Span::new(0, 3));
        let mode = UseMode { rvalue, read, loc: Span::UNKNOWN, reject_builtin: true };

        prop_assert_eq!(convert_to_void(&mut cx, NodeId::ERROR, ctx), NodeId::ERROR);
        prop_assert_eq!(convert_to_void(&mut cx, bad, ctx), NodeId::ERROR);
        prop_assert_eq!(mark_use(&mut cx, NodeId::ERROR, mode), NodeId::ERROR);
        prop_assert_eq!(mark_use(&mut cx, bad, mode), bad);
        prop_assert_eq!(mark_rvalue_use(&mut cx, bad), bad);
        prop_assert_eq!(mark_lvalue_use(&mut cx, bad), bad);
        prop_assert_eq!(mark_discarded_use(&mut cx, NodeId::ERROR), NodeId::ERROR);
        prop_assert_eq!(mark_discarded_use(&mut cx, bad), bad);
        prop_assert!(cx.diagnostics.is_empty());
    }
}

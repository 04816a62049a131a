//! Expression-use classification.
//!
//! A use of an expression is either an rvalue use (only the value matters)
//! or an lvalue use (the expression designates storage). Classification
//! walks through transparent wrappers, marks leaf variables read and
//! rewrites location wrappers and reference dereferences in place.
//!
//! Every entry point returns the classified expression, which is either the
//! input node, a replacement for it, or [`NodeId::ERROR`].

use arbor_diagnostic::builtin_not_called;
use arbor_ir::{NodeFlags, NodeId, NodeKind, Span};

use crate::fold::{location_wrapper_p, strip_any_location_wrapper};
use crate::TreeCx;

/// How an expression is being used.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct UseMode {
    /// Only the value is needed.
    pub rvalue: bool,
    /// The use reads the value.
    pub read: bool,
    /// Location of the use, for diagnostics.
    pub loc: Span,
    /// Reject a bare reference to a builtin with no library fallback.
    pub reject_builtin: bool,
}

/// Classify a use of `expr`.
#[tracing::instrument(level = "trace", skip(cx))]
pub fn mark_use(cx: &mut TreeCx, expr: NodeId, mode: UseMode) -> NodeId {
    if cx.arena.error_operand_p(expr) {
        return expr;
    }

    if mode.reject_builtin && is_uncallable_builtin(cx, expr) {
        let target = strip_any_location_wrapper(&cx.arena, expr);
        let name = cx.arena.format_decl(target);
        let span = mode.loc.or(cx.expr_loc_or_input_loc(expr));
        cx.diagnostics.error(builtin_not_called(span, &name));
        return NodeId::ERROR;
    }

    if mode.read {
        mark_exp_read(cx, expr);
    }

    let span = cx.arena.span(expr);
    cx.nested(span, NodeId::ERROR, |cx| classify(cx, expr, mode))
}

/// A use of `expr` as an rvalue, rejecting uncallable builtins.
pub fn mark_rvalue_use(cx: &mut TreeCx, expr: NodeId) -> NodeId {
    mark_rvalue_use_at(cx, expr, Span::UNKNOWN, true)
}

/// A use of `expr` as an rvalue at `loc`.
pub fn mark_rvalue_use_at(
    cx: &mut TreeCx,
    expr: NodeId,
    loc: Span,
    reject_builtin: bool,
) -> NodeId {
    mark_use(
        cx,
        expr,
        UseMode {
            rvalue: true,
            read: true,
            loc,
            reject_builtin,
        },
    )
}

/// A reading use of `expr` as an lvalue.
pub fn mark_lvalue_use(cx: &mut TreeCx, expr: NodeId) -> NodeId {
    let loc = cx.input_location;
    mark_use(
        cx,
        expr,
        UseMode {
            rvalue: false,
            read: true,
            loc,
            reject_builtin: false,
        },
    )
}

/// A use of `expr` as an lvalue that does not read it (e.g. assignment target).
pub fn mark_lvalue_use_nonread(cx: &mut TreeCx, expr: NodeId) -> NodeId {
    let loc = cx.input_location;
    mark_use(
        cx,
        expr,
        UseMode {
            rvalue: false,
            read: false,
            loc,
            reject_builtin: false,
        },
    )
}

/// A use of `expr` whose value is discarded.
///
/// Only the value-carrying branches of conditionals and comma expressions
/// are followed; memory accesses and declarations get an rvalue use.
/// Location wrappers are stripped.
#[tracing::instrument(level = "trace", skip(cx))]
pub fn mark_discarded_use(cx: &mut TreeCx, expr: NodeId) -> NodeId {
    let expr = strip_any_location_wrapper(&cx.arena, expr);
    let span = cx.arena.span(expr);
    cx.nested(span, NodeId::ERROR, |cx| discard(cx, expr))
}

fn discard(cx: &mut TreeCx, expr: NodeId) -> NodeId {
    match cx.arena.kind(expr) {
        NodeKind::CondExpr {
            cond,
            second,
            third,
        } => {
            let new_third = mark_discarded_use(cx, third);
            let new_second = match second {
                Some(second) => Some(mark_discarded_use(cx, second)),
                None => None,
            };
            if new_third == NodeId::ERROR || new_second == Some(NodeId::ERROR) {
                return NodeId::ERROR;
            }
            cx.arena.set_kind(
                expr,
                NodeKind::CondExpr {
                    cond,
                    second: new_second,
                    third: new_third,
                },
            );
            cx.arena.update_side_effects(expr);
            expr
        }
        NodeKind::CompoundExpr { lhs, rhs } => {
            let new_rhs = mark_discarded_use(cx, rhs);
            if new_rhs == NodeId::ERROR {
                return NodeId::ERROR;
            }
            cx.arena
                .set_kind(expr, NodeKind::CompoundExpr { lhs, rhs: new_rhs });
            cx.arena.update_side_effects(expr);
            expr
        }
        NodeKind::ComponentRef { .. }
        | NodeKind::ArrayRef { .. }
        | NodeKind::IndirectRef(_)
        | NodeKind::MemberRef { .. } => discarded_rvalue_use(cx, expr),
        kind if kind.is_decl() => discarded_rvalue_use(cx, expr),
        _ => expr,
    }
}

fn discarded_rvalue_use(cx: &mut TreeCx, expr: NodeId) -> NodeId {
    let loc = cx.input_location;
    mark_use(
        cx,
        expr,
        UseMode {
            rvalue: true,
            read: true,
            loc,
            reject_builtin: false,
        },
    )
}

/// Mark the variable or parameter `expr` designates as read.
pub fn mark_exp_read(cx: &mut TreeCx, expr: NodeId) {
    let span = cx.arena.span(expr);
    cx.nested(span, (), |cx| match cx.arena.kind(expr) {
        NodeKind::VarDecl(_) | NodeKind::ParmDecl(_) => {
            cx.arena.insert_flags(expr, NodeFlags::READ);
        }
        NodeKind::ArrayRef { base: op, .. }
        | NodeKind::ComponentRef { object: op, .. }
        | NodeKind::ModifyExpr { lhs: op, .. }
        | NodeKind::RealpartExpr(op)
        | NodeKind::ImagpartExpr(op)
        | NodeKind::NopExpr(op)
        | NodeKind::ConvertExpr(op)
        | NodeKind::AddrExpr(op)
        | NodeKind::IndirectRef(op)
        | NodeKind::FloatExpr(op)
        | NodeKind::NonDependentExpr(op)
        | NodeKind::ViewConvertExpr(op) => mark_exp_read(cx, op),
        NodeKind::NonLvalueExpr(op) if location_wrapper_p(&cx.arena, expr) => {
            mark_exp_read(cx, op);
        }
        NodeKind::CompoundExpr { rhs, .. } => mark_exp_read(cx, rhs),
        NodeKind::CondExpr { second, third, .. } => {
            if let Some(second) = second {
                mark_exp_read(cx, second);
            }
            mark_exp_read(cx, third);
        }
        _ => {}
    });
}

/// Dereference a reference-typed value; other values are returned as is.
pub fn convert_from_reference(cx: &mut TreeCx, val: NodeId) -> NodeId {
    let Some(ty) = cx.arena.ty(val) else {
        return val;
    };
    let NodeKind::ReferenceType { referent } = cx.arena.kind(ty) else {
        return val;
    };
    mark_exp_read(cx, val);
    let span = cx.arena.span(val);
    cx.arena.indirect_ref(val, referent, span)
}

fn is_uncallable_builtin(cx: &TreeCx, expr: NodeId) -> bool {
    let target = strip_any_location_wrapper(&cx.arena, expr);
    cx.arena.is_function_decl(target)
        && cx
            .arena
            .has_flag(target, NodeFlags::BUILTIN_NO_FALLBACK)
}

fn classify(cx: &mut TreeCx, expr: NodeId, mode: UseMode) -> NodeId {
    match cx.arena.kind(expr) {
        NodeKind::ComponentRef { object, field } => {
            let object = mark_use(cx, object, mode);
            if object == NodeId::ERROR {
                return NodeId::ERROR;
            }
            replace_kind(cx, expr, NodeKind::ComponentRef { object, field })
        }
        NodeKind::NonDependentExpr(op) => {
            let op = mark_use(cx, op, mode);
            if op == NodeId::ERROR {
                return NodeId::ERROR;
            }
            replace_kind(cx, expr, NodeKind::NonDependentExpr(op))
        }
        NodeKind::CompoundExpr { lhs, rhs } => {
            let loc = cx.expr_loc_or_loc(expr, mode.loc);
            let rhs = mark_use(cx, rhs, UseMode { loc, ..mode });
            if rhs == NodeId::ERROR {
                return NodeId::ERROR;
            }
            replace_kind(cx, expr, NodeKind::CompoundExpr { lhs, rhs })
        }
        NodeKind::CondExpr {
            cond,
            second,
            third,
        } => {
            let second = match second {
                Some(second) => {
                    let second = mark_use(cx, second, mode);
                    if second == NodeId::ERROR {
                        return NodeId::ERROR;
                    }
                    Some(second)
                }
                None => None,
            };
            let third = mark_use(cx, third, mode);
            if third == NodeId::ERROR {
                return NodeId::ERROR;
            }
            replace_kind(
                cx,
                expr,
                NodeKind::CondExpr {
                    cond,
                    second,
                    third,
                },
            )
        }
        NodeKind::IndirectRef(reference) if cx.arena.is_reference_ref(reference) => {
            let value = mark_rvalue_use_at(cx, reference, mode.loc, mode.reject_builtin);
            if value == NodeId::ERROR {
                NodeId::ERROR
            } else if value == reference {
                expr
            } else {
                tracing::debug!(?expr, ?value, "rebuilt reference dereference");
                convert_from_reference(cx, value)
            }
        }
        NodeKind::ViewConvertExpr(op) if location_wrapper_p(&cx.arena, expr) => {
            classify_location_wrapper(cx, expr, op, mode)
        }
        NodeKind::NopExpr(op) | NodeKind::ConvertExpr(op) | NodeKind::ViewConvertExpr(op) => {
            let new_op = mark_use(cx, op, mode);
            if new_op == NodeId::ERROR {
                return NodeId::ERROR;
            }
            let kind = match cx.arena.kind(expr) {
                NodeKind::NopExpr(_) => NodeKind::NopExpr(new_op),
                NodeKind::ConvertExpr(_) => NodeKind::ConvertExpr(new_op),
                _ => NodeKind::ViewConvertExpr(new_op),
            };
            replace_kind(cx, expr, kind)
        }
        _ => expr,
    }
}

/// Classify the operand of a location wrapper under the wrapper's location.
///
/// A declaration or constant keeps the wrapper, which becomes a
/// `NonLvalueExpr` for rvalue uses. Anything else replaces the wrapper and
/// inherits its location.
fn classify_location_wrapper(
    cx: &mut TreeCx,
    wrapper: NodeId,
    op: NodeId,
    mode: UseMode,
) -> NodeId {
    let loc = cx.arena.span(wrapper);
    let new_op = mark_use(cx, op, UseMode { loc, ..mode });
    if new_op == NodeId::ERROR {
        return NodeId::ERROR;
    }

    let new_kind = cx.arena.kind(new_op);
    if new_kind.is_decl() || new_kind.is_constant() {
        let kind = if mode.rvalue {
            NodeKind::NonLvalueExpr(new_op)
        } else {
            NodeKind::ViewConvertExpr(new_op)
        };
        cx.arena.set_kind(wrapper, kind);
        cx.arena.update_side_effects(wrapper);
        wrapper
    } else {
        tracing::debug!(?wrapper, replacement = ?new_op, "dropped location wrapper");
        if new_kind.is_expression() {
            cx.arena.set_span(new_op, loc);
        }
        new_op
    }
}

fn replace_kind(cx: &mut TreeCx, expr: NodeId, kind: NodeKind) -> NodeId {
    if cx.arena.kind(expr) != kind {
        cx.arena.set_kind(expr, kind);
        cx.arena.update_side_effects(expr);
    }
    expr
}

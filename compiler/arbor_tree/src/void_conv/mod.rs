//! Conversion of discarded expressions to void.
//!
//! [`convert_to_void`] reduces an expression evaluated only for its effects
//! to the part that still has to run. Effect-free dereferences are
//! stripped, conditional and comma expressions are converted branch by
//! branch, and anything left without side effects collapses to
//! [`NodeId::VOID`]. Volatile accesses that cannot be performed are
//! diagnosed with wording that names where the expression appears.

mod messages;

use std::fmt;

use arbor_diagnostic::ErrorCode;
use arbor_ir::{NodeFlags, NodeId, NodeKind, Span};

use crate::mark::{mark_discarded_use, mark_exp_read};
use crate::nodiscard::maybe_warn_nodiscard;
use crate::TreeCx;

/// Where a discarded expression appears.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum VoidContext {
    /// Explicit cast to void.
    Cast,
    SecondOfCond,
    ThirdOfCond,
    RightOfComma,
    LeftOfComma,
    /// Expression statement.
    Statement,
    /// Increment expression of a `for` loop.
    ThirdInFor,
}

impl VoidContext {
    pub const ALL: [VoidContext; 7] = [
        VoidContext::Cast,
        VoidContext::SecondOfCond,
        VoidContext::ThirdOfCond,
        VoidContext::RightOfComma,
        VoidContext::LeftOfComma,
        VoidContext::Statement,
        VoidContext::ThirdInFor,
    ];

    /// Phrase naming the position in diagnostics; `None` for explicit casts.
    pub fn position(self) -> Option<&'static str> {
        match self {
            VoidContext::Cast => None,
            VoidContext::SecondOfCond => Some("second operand of conditional expression"),
            VoidContext::ThirdOfCond => Some("third operand of conditional expression"),
            VoidContext::RightOfComma => Some("right operand of comma operator"),
            VoidContext::LeftOfComma => Some("left operand of comma operator"),
            VoidContext::Statement => Some("statement"),
            VoidContext::ThirdInFor => Some("for increment expression"),
        }
    }
}

impl fmt::Display for VoidContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.position().unwrap_or("cast to void"))
    }
}

/// Convert `expr`, whose value is discarded in `ctx`, to void.
///
/// Returns `ERROR` for erroneous input, the expression itself when it is
/// typeless or already void, [`NodeId::VOID`] when nothing needs to be
/// evaluated, and otherwise the (possibly rewritten) expression.
#[tracing::instrument(level = "trace", skip(cx))]
pub fn convert_to_void(cx: &mut TreeCx, expr: NodeId, ctx: VoidContext) -> NodeId {
    if cx.arena.error_operand_p(expr) {
        return NodeId::ERROR;
    }
    // Taken before location wrappers are discarded.
    let loc = cx.expr_loc_or_input_loc(expr);
    cx.nested(loc, NodeId::ERROR, |cx| convert(cx, expr, loc, ctx))
}

fn convert(cx: &mut TreeCx, expr: NodeId, loc: Span, ctx: VoidContext) -> NodeId {
    let mut expr = mark_discarded_use(cx, expr);
    if cx.arena.error_operand_p(expr) {
        return NodeId::ERROR;
    }
    if ctx == VoidContext::Cast {
        mark_exp_read(cx, expr);
    }

    let Some(ty) = cx.arena.ty(expr) else {
        return expr;
    };
    if cx.arena.is_void_type(ty) {
        return expr;
    }

    match cx.arena.kind(expr) {
        NodeKind::CondExpr {
            cond,
            second,
            third,
        } => {
            let branch_effects = second.is_some_and(|op| cx.arena.side_effects(op))
                || cx.arena.side_effects(third);
            let (second_ctx, third_ctx) = if ctx != VoidContext::Cast && !branch_effects {
                (VoidContext::SecondOfCond, VoidContext::ThirdOfCond)
            } else {
                (VoidContext::Cast, VoidContext::Cast)
            };
            let new_second = second.map(|op| convert_to_void(cx, op, second_ctx));
            let new_third = convert_to_void(cx, third, third_ctx);
            if new_second == Some(NodeId::ERROR) || new_third == NodeId::ERROR {
                return NodeId::ERROR;
            }
            if new_second != second || new_third != third {
                let ty = cx.arena.ty(new_third);
                expr = cx.arena.cond_expr(cond, new_second, new_third, ty, loc);
                tracing::debug!(?expr, "rebuilt discarded conditional");
            }
        }
        NodeKind::CompoundExpr { lhs, rhs } => {
            let rhs_ctx = if ctx != VoidContext::Cast && !cx.arena.any_warning_suppressed(expr) {
                VoidContext::RightOfComma
            } else {
                VoidContext::Cast
            };
            let new_rhs = convert_to_void(cx, rhs, rhs_ctx);
            if new_rhs == NodeId::ERROR {
                return NodeId::ERROR;
            }
            if new_rhs != rhs {
                expr = cx.arena.compound_expr(lhs, new_rhs, loc);
                tracing::debug!(?expr, "rebuilt discarded comma expression");
            }
        }
        NodeKind::NonLvalueExpr(_) | NodeKind::NopExpr(_) => {}
        NodeKind::CallExpr { .. } | NodeKind::TargetExpr { .. } => {
            maybe_warn_nodiscard(cx, expr, ctx);
        }
        NodeKind::IndirectRef(pointer) => {
            expr = convert_indirection(cx, expr, pointer, ty, loc, ctx);
        }
        NodeKind::VarDecl(decl) => {
            if cx.arena.is_volatile(ty) && !cx.arena.is_complete(ty) {
                let var = cx.arena.name_str(decl.name).to_owned();
                let ty_name = cx.arena.format_type(ty);
                let message = messages::incomplete_variable(ctx, &var, &ty_name);
                cx.warn(ErrorCode::W1004, loc, message);
            }
        }
        _ => {}
    }

    if cx.arena.side_effects(expr) {
        expr
    } else {
        NodeId::VOID
    }
}

/// Discard the value of `*pointer`, where `expr` is the dereference of type
/// `ty` and `loc` the location of the discarded expression.
///
/// A volatile dereference is kept as the access it denotes; one that cannot
/// be performed is diagnosed. Any other dereference is replaced by its
/// operand.
fn convert_indirection(
    cx: &mut TreeCx,
    expr: NodeId,
    pointer: NodeId,
    ty: NodeId,
    loc: Span,
    ctx: VoidContext,
) -> NodeId {
    let is_reference = cx.arena.is_reference_ref(pointer);
    let is_volatile = cx.arena.is_volatile(ty);

    if is_volatile {
        let ty_name = cx.arena.format_type(ty);
        if !cx.arena.is_complete(ty) {
            cx.warn(
                ErrorCode::W1001,
                loc,
                messages::incomplete_type(ctx, &ty_name),
            );
        } else if is_reference {
            cx.warn(
                ErrorCode::W1002,
                loc,
                messages::reference_type(ctx, &ty_name),
            );
        } else if cx.arena.is_addressable(ty) {
            cx.warn(
                ErrorCode::W1003,
                loc,
                messages::non_trivially_copyable(ctx, &ty_name),
            );
        }
        return expr;
    }

    if ctx != VoidContext::Cast
        && !is_reference
        && !cx.in_unevaluated_operand()
        && !cx
            .arena
            .warning_suppressed(expr, NodeFlags::NO_UNUSED_VALUE_WARNING)
    {
        cx.warn(ErrorCode::W1005, loc, messages::UNUSED_VALUE);
    }
    tracing::debug!(?expr, ?pointer, "stripped effect-free dereference");
    if let NodeKind::CallExpr { .. } = cx.arena.kind(pointer) {
        maybe_warn_nodiscard(cx, pointer, ctx);
    }
    pointer
}

//! Wrapper stripping and constant-folding helpers.

use arbor_ir::{BinaryOp, NodeFlags, NodeId, NodeKind, Span, TreeArena};

/// Whether `expr` is a location wrapper: a view-convert or non-lvalue node
/// that only carries a location for a declaration or constant.
pub fn location_wrapper_p(arena: &TreeArena, expr: NodeId) -> bool {
    arena.has_flag(expr, NodeFlags::LOCATION_WRAPPER)
        && matches!(
            arena.kind(expr),
            NodeKind::ViewConvertExpr(_) | NodeKind::NonLvalueExpr(_)
        )
}

/// Strip a location wrapper, if `expr` is one.
pub fn strip_any_location_wrapper(arena: &TreeArena, expr: NodeId) -> NodeId {
    if location_wrapper_p(arena, expr) {
        if let NodeKind::ViewConvertExpr(op) | NodeKind::NonLvalueExpr(op) = arena.kind(expr) {
            return op;
        }
    }
    expr
}

/// Strip conversions that do not change the value's representation.
pub fn strip_nops(arena: &TreeArena, mut expr: NodeId) -> NodeId {
    loop {
        match arena.kind(expr) {
            NodeKind::NopExpr(op) | NodeKind::ConvertExpr(op) | NodeKind::NonLvalueExpr(op) => {
                expr = op;
            }
            NodeKind::ViewConvertExpr(op) if location_wrapper_p(arena, expr) => expr = op,
            _ => return expr,
        }
    }
}

/// Build `base p+ (size_t) index * sizeof (*base)`.
///
/// Returns `ERROR` if any input is erroneous or the element type has no
/// known size. Constant operands fold: a constant index yields a constant
/// offset and a zero offset yields `base` itself.
pub fn pointer_offset_expression(
    arena: &mut TreeArena,
    base: NodeId,
    index: NodeId,
    loc: Span,
) -> NodeId {
    if base == NodeId::ERROR || index == NodeId::ERROR {
        return NodeId::ERROR;
    }
    let Some(base_ty) = arena.ty(base) else {
        return NodeId::ERROR;
    };
    if base_ty == NodeId::ERROR {
        return NodeId::ERROR;
    }
    let Some(element) = arena.indirect_target(base_ty) else {
        return NodeId::ERROR;
    };
    if element == NodeId::ERROR {
        return NodeId::ERROR;
    }
    let Some(element_size) = arena
        .type_size_unit(element)
        .and_then(|size| i64::try_from(size).ok())
    else {
        return NodeId::ERROR;
    };

    let size_ty = arena.common().size;
    let index = fold_convert(arena, index, size_ty, loc);
    let offset = fold_mult(arena, index, element_size, size_ty, loc);
    if let NodeKind::IntegerCst(0) = arena.kind(offset) {
        return base;
    }
    arena.binary(BinaryOp::PointerPlus, base, offset, base_ty, loc)
}

/// Convert `expr` to `ty`, folding constants.
fn fold_convert(arena: &mut TreeArena, expr: NodeId, ty: NodeId, loc: Span) -> NodeId {
    if arena.ty(expr) == Some(ty) {
        return expr;
    }
    match arena.kind(expr) {
        NodeKind::IntegerCst(value) => arena.integer_cst(value, ty),
        _ => arena.convert_expr(expr, ty, loc),
    }
}

/// Multiply `expr` by a constant, folding constants and unit factors.
fn fold_mult(arena: &mut TreeArena, expr: NodeId, factor: i64, ty: NodeId, loc: Span) -> NodeId {
    if factor == 1 {
        return expr;
    }
    match arena.kind(expr) {
        NodeKind::IntegerCst(value) => arena.integer_cst(value.wrapping_mul(factor), ty),
        _ => {
            let factor = arena.integer_cst(factor, ty);
            arena.binary(BinaryOp::Mult, expr, factor, ty, loc)
        }
    }
}

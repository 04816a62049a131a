//! Warnings for discarded results of `nodiscard` functions and types.

use arbor_diagnostic::ErrorCode;
use arbor_ir::{NodeId, NodeKind, TreeArena};

use crate::fold::strip_nops;
use crate::{TreeCx, VoidContext};

/// Attribute marking a function or type whose results must be used.
pub const NODISCARD: &str = "nodiscard";

/// Warn if the call `expr` discards a result that must be used.
///
/// `expr` may also be a temporary initialized by the call. Nothing is
/// reported for explicit casts to void.
#[tracing::instrument(level = "trace", skip(cx))]
pub fn maybe_warn_nodiscard(cx: &mut TreeCx, expr: NodeId, ctx: VoidContext) {
    let call = match cx.arena.kind(expr) {
        NodeKind::TargetExpr { initial, .. } => initial,
        _ => expr,
    };
    let NodeKind::CallExpr {
        callee: Some(callee),
        ..
    } = cx.arena.kind(call)
    else {
        return;
    };
    let Some(callee_ty) = cx.arena.ty(callee) else {
        return;
    };
    let fn_ty = cx.arena.indirect_target(callee_ty).unwrap_or(callee_ty);
    let Some(ret) = cx.arena.function_return_type(fn_ty) else {
        return;
    };
    if ctx == VoidContext::Cast {
        return;
    }

    let fndecl = get_fndecl_from_callee(&cx.arena, callee);
    let loc = cx.expr_loc_or_input_loc(call);

    if let Some((fndecl, message)) =
        fndecl.and_then(|decl| nodiscard_message(&cx.arena, decl).map(|msg| (decl, msg)))
    {
        let name = cx.arena.format_decl(fndecl);
        let text = format!("ignoring return value of `{name}`, that must be used{message}");
        if cx.warn(ErrorCode::W1006, loc, text) {
            let decl_loc = cx.arena.span(fndecl);
            cx.note(decl_loc, "declared here");
        }
    } else if let Some(message) = nodiscard_message(&cx.arena, ret) {
        let ty = cx.arena.format_type(ret);
        let text = format!("ignoring returned value of type `{ty}`, that must be used{message}");
        if cx.warn(ErrorCode::W1006, loc, text) {
            if let Some(fndecl) = fndecl {
                let name = cx.arena.format_decl(fndecl);
                let decl_loc = cx.arena.span(fndecl);
                cx.note(decl_loc, format!("in call to `{name}`, declared here"));
            }
            if let Some(type_decl) = cx.arena.type_name_decl(ret) {
                let type_loc = cx.arena.span(type_decl);
                cx.note(type_loc, format!("`{ty}` declared here"));
            }
        }
    }
}

/// The function declaration a callee names, if it can be resolved
/// syntactically.
///
/// A pointer-typed callee resolves through no-op conversions and a single
/// address-of; anything else (a function pointer variable, a member
/// dispatch) is unresolved.
pub fn get_fndecl_from_callee(arena: &TreeArena, callee: NodeId) -> Option<NodeId> {
    if arena.is_function_decl(callee) {
        return Some(callee);
    }
    let ty = arena.ty(callee)?;
    if !arena.is_indirect_type(ty) {
        return None;
    }
    let mut target = strip_nops(arena, callee);
    if let NodeKind::AddrExpr(op) = arena.kind(target) {
        target = op;
    }
    arena.is_function_decl(target).then_some(target)
}

/// Message suffix for a node carrying `nodiscard`, or `None` without it.
///
/// The suffix is empty when the attribute has no message.
fn nodiscard_message(arena: &TreeArena, id: NodeId) -> Option<String> {
    let attr = arena.lookup_attribute(id, NODISCARD)?;
    Some(match attr.first_arg() {
        Some(msg) => format!(": \"{}\"", escape_message(arena.name_str(msg))),
        None => String::new(),
    })
}

/// Escape quotes, backslashes and control characters of a user message.
fn escape_message(msg: &str) -> String {
    let mut out = String::with_capacity(msg.len());
    for c in msg.chars() {
        if c.is_control() || c == '"' || c == '\\' {
            out.extend(c.escape_default());
        } else {
            out.push(c);
        }
    }
    out
}

//! Subtree walking.
//!
//! [`walk_tree`] visits a node and then its children, depth-first in
//! operand order. Children the generic operand table does not describe
//! (types named by casts, template and coroutine parts, the initializers of
//! compiler temporaries) are reached through [`walk_subtrees`].
//!
//! # Callback protocol
//!
//! The visitor receives the node and a `walk_subtrees` flag, initially
//! `true`. Returning `Some(node)` stops the whole walk and makes `walk_tree`
//! return that node. Clearing the flag skips the node's children; the
//! remaining entries of a [`NodeKind::TreeList`] chain are still visited.
//!
//! # Shared and cyclic trees
//!
//! With a [`Visited`] set every node is visited at most once, and component
//! types of type nodes are walked too. Without one, shared subtrees are
//! visited once per reference and type graphs are not entered. A cyclic
//! tree walked without a set ends at the nesting limit with `ERROR`.

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use arbor_ir::{NodeFlags, NodeId, NodeKind};

use crate::TreeCx;

/// Nodes already visited by a walk, by identity.
pub type Visited = FxHashSet<NodeId>;

/// Outcome of [`walk_subtrees`] for one node.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SubtreeWalk {
    /// The generic walk handles this kind.
    NotHandled,
    /// Kind-specific children were walked; the generic walk continues
    /// unless the subtree flag was cleared.
    Continue,
    /// A recursive walk returned this node.
    Stop(NodeId),
}

/// Walk `node` and its subtrees with `visit`.
///
/// Returns the first node a visitor call returned, or `None` when the walk
/// completed. Returns `Some(NodeId::ERROR)` after reporting `E9001` if the
/// tree is nested deeper than the configured limit.
#[tracing::instrument(level = "trace", skip(cx, visit, visited))]
pub fn walk_tree<F>(
    cx: &mut TreeCx,
    node: NodeId,
    visit: &mut F,
    visited: Option<&mut Visited>,
) -> Option<NodeId>
where
    F: FnMut(&mut TreeCx, NodeId, &mut bool) -> Option<NodeId>,
{
    let span = cx.arena.span(node);
    cx.nested(span, Some(NodeId::ERROR), |cx| {
        walk_node(cx, node, visit, visited)
    })
}

fn walk_node<F>(
    cx: &mut TreeCx,
    node: NodeId,
    visit: &mut F,
    mut visited: Option<&mut Visited>,
) -> Option<NodeId>
where
    F: FnMut(&mut TreeCx, NodeId, &mut bool) -> Option<NodeId>,
{
    if let Some(set) = visited.as_deref_mut() {
        if !set.insert(node) {
            return None;
        }
    }

    let mut walk_children = true;
    if let Some(found) = visit(cx, node, &mut walk_children) {
        return Some(found);
    }

    let kind = cx.arena.kind(node);
    if !walk_children {
        // The rest of a list is a sibling, not a child.
        return match kind {
            NodeKind::TreeList {
                chain: Some(chain), ..
            } => walk_tree(cx, chain, visit, visited),
            _ => None,
        };
    }

    match walk_subtrees(cx, node, &mut walk_children, visit, visited.as_deref_mut()) {
        SubtreeWalk::Stop(found) => return Some(found),
        SubtreeWalk::Continue if !walk_children => return None,
        SubtreeWalk::Continue | SubtreeWalk::NotHandled => {}
    }

    let children = if kind.is_type() {
        if visited.is_none() {
            return None;
        }
        cx.arena.type_fields(node)
    } else {
        cx.arena.operands(node)
    };
    for child in children {
        if let Some(found) = walk_tree(cx, child, visit, visited.as_deref_mut()) {
            return Some(found);
        }
    }
    None
}

/// Walk `$node`, stopping the enclosing `walk_subtrees` on a result.
macro_rules! walk_subtree {
    ($cx:expr, ? $node:expr, $visit:expr, $visited:expr) => {
        if let Some(node) = $node {
            walk_subtree!($cx, node, $visit, $visited);
        }
    };
    ($cx:expr, $node:expr, $visit:expr, $visited:expr) => {
        if let Some(found) = walk_tree($cx, $node, $visit, $visited.as_deref_mut()) {
            return SubtreeWalk::Stop(found);
        }
    };
}

/// Walk `$node` as an unevaluated operand.
macro_rules! walk_unevaluated {
    ($cx:expr, $node:expr, $visit:expr, $visited:expr) => {
        let found = $cx.unevaluated(|cx| walk_tree(cx, $node, $visit, $visited.as_deref_mut()));
        if let Some(found) = found {
            return SubtreeWalk::Stop(found);
        }
    };
}

/// Walk the children of `node` that the generic operand table does not
/// describe.
///
/// Clears `walk_subtrees` for kinds whose generic operands must not be
/// walked afterwards. Operands of `sizeof`, `alignof`, `noexcept`,
/// `decltype` and requires-expressions are walked as unevaluated operands.
pub fn walk_subtrees<F>(
    cx: &mut TreeCx,
    node: NodeId,
    walk_subtrees: &mut bool,
    visit: &mut F,
    mut visited: Option<&mut Visited>,
) -> SubtreeWalk
where
    F: FnMut(&mut TreeCx, NodeId, &mut bool) -> Option<NodeId>,
{
    match cx.arena.kind(node) {
        NodeKind::DeferredParse | NodeKind::TypeofType { .. } | NodeKind::UnderlyingType { .. } => {
            *walk_subtrees = false;
        }
        NodeKind::TypenameType { context, fullname } => {
            walk_subtree!(cx, ?context, visit, visited);
            walk_subtree!(cx, fullname, visit, visited);
            *walk_subtrees = false;
        }
        NodeKind::Baselink {
            access_type,
            functions,
        } => {
            if cx.arena.has_flag(node, NodeFlags::BASELINK_QUALIFIED) {
                walk_subtree!(cx, ?access_type, visit, visited);
            }
            walk_subtree!(cx, functions, visit, visited);
            *walk_subtrees = false;
        }
        NodeKind::PtrmemCst { .. } => {
            walk_subtree!(cx, ?cx.arena.ty(node), visit, visited);
            *walk_subtrees = false;
        }
        NodeKind::TreeList { purpose, .. } => {
            walk_subtree!(cx, ?purpose, visit, visited);
        }
        NodeKind::Overload { function, chain } => {
            walk_subtree!(cx, function, visit, visited);
            walk_subtree!(cx, ?chain, visit, visited);
            *walk_subtrees = false;
        }
        NodeKind::UsingDecl { name, scope, decls } => {
            walk_subtree!(cx, name, visit, visited);
            walk_subtree!(cx, ?scope, visit, visited);
            walk_subtree!(cx, ?decls, visit, visited);
            *walk_subtrees = false;
        }
        NodeKind::RecordType {
            ptrmemfunc_fn_type, ..
        } => {
            walk_subtree!(cx, ?ptrmemfunc_fn_type, visit, visited);
        }
        NodeKind::TypeArgumentPack { args } | NodeKind::NontypeArgumentPack { args } => {
            let args: SmallVec<[NodeId; 4]> = cx.arena.list(args).iter().copied().collect();
            for arg in args {
                walk_subtree!(cx, arg, visit, visited);
            }
        }
        NodeKind::TypePackExpansion {
            pattern,
            extra_args,
        }
        | NodeKind::ExprPackExpansion {
            pattern,
            extra_args,
        } => {
            walk_subtree!(cx, pattern, visit, visited);
            walk_subtree!(cx, ?extra_args, visit, visited);
            *walk_subtrees = false;
        }
        NodeKind::Cast { .. } => {
            walk_subtree!(cx, ?cx.arena.ty(node), visit, visited);
        }
        NodeKind::Constructor { .. } => {
            if cx.arena.has_flag(node, NodeFlags::COMPOUND_LITERAL) {
                walk_subtree!(cx, ?cx.arena.ty(node), visit, visited);
            }
        }
        NodeKind::DecltypeType { expr } => {
            walk_unevaluated!(cx, expr, visit, visited);
            *walk_subtrees = false;
        }
        NodeKind::AlignofExpr(op) | NodeKind::SizeofExpr(op) | NodeKind::NoexceptExpr(op) => {
            walk_unevaluated!(cx, op, visit, visited);
            *walk_subtrees = false;
        }
        NodeKind::RequiresExpr { reqs, .. } => {
            walk_unevaluated!(cx, reqs, visit, visited);
            *walk_subtrees = false;
        }
        NodeKind::DeclExpr(decl) => {
            let temporary = matches!(cx.arena.kind(decl), NodeKind::VarDecl(_))
                && cx.arena.has_flag(decl, NodeFlags::ARTIFICIAL)
                && !cx.arena.has_flag(decl, NodeFlags::STATIC);
            if let Some(payload) = cx.arena.decl(decl).copied().filter(|_| temporary) {
                walk_subtree!(cx, ?payload.initial, visit, visited);
                walk_subtree!(cx, ?payload.size, visit, visited);
                walk_subtree!(cx, ?payload.size_unit, visit, visited);
            }
        }
        NodeKind::CoAwaitExpr {
            frame_var,
            initializer,
            ..
        } => {
            walk_subtree!(cx, ?frame_var, visit, visited);
            walk_subtree!(cx, ?initializer, visit, visited);
        }
        NodeKind::CoReturnExpr {
            expr: Some(expr),
            call,
        } => {
            // A void operand carries everything; `call` is then trivial.
            let void_operand = cx
                .arena
                .ty(expr)
                .is_some_and(|ty| cx.arena.is_void_type(ty));
            if void_operand {
                walk_subtree!(cx, expr, visit, visited);
            } else {
                walk_subtree!(cx, ?call, visit, visited);
            }
        }
        NodeKind::CoReturnExpr { expr: None, .. } => {}
        NodeKind::StaticAssert { condition, message } => {
            walk_subtree!(cx, condition, visit, visited);
            walk_subtree!(cx, ?message, visit, visited);
        }
        _ => return SubtreeWalk::NotHandled,
    }
    SubtreeWalk::Continue
}

#[cfg(test)]
mod tests;

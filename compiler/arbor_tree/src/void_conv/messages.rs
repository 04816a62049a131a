//! Wording of the void-conversion warnings.
//!
//! An explicit cast gets its own sentence; every implicit context names the
//! syntactic position the discarded expression appears in.

use super::VoidContext;

/// `W1001`: volatile object of incomplete type behind an indirection.
pub(super) fn incomplete_type(ctx: VoidContext, ty: &str) -> String {
    match ctx.position() {
        None => format!("conversion to void will not access object of incomplete type `{ty}`"),
        Some(pos) => {
            format!("indirection will not access object of incomplete type `{ty}` in {pos}")
        }
    }
}

/// `W1002`: implicit dereference of a volatile reference.
pub(super) fn reference_type(ctx: VoidContext, ty: &str) -> String {
    match ctx.position() {
        None => format!("conversion to void will not access object of type `{ty}`"),
        Some(pos) => format!("implicit dereference will not access object of type `{ty}` in {pos}"),
    }
}

/// `W1003`: volatile object of non-trivially-copyable type.
pub(super) fn non_trivially_copyable(ctx: VoidContext, ty: &str) -> String {
    match ctx.position() {
        None => format!(
            "conversion to void will not access object of non-trivially-copyable type `{ty}`"
        ),
        Some(pos) => format!(
            "indirection will not access object of non-trivially-copyable type `{ty}` in {pos}"
        ),
    }
}

/// `W1004`: volatile variable of incomplete type.
pub(super) fn incomplete_variable(ctx: VoidContext, var: &str, ty: &str) -> String {
    match ctx.position() {
        None => format!(
            "conversion to void will not access object `{var}` of incomplete type `{ty}`"
        ),
        Some(pos) => {
            format!("variable `{var}` of incomplete type `{ty}` will not be accessed in {pos}")
        }
    }
}

/// `W1005`.
pub(super) const UNUSED_VALUE: &str = "value computed is not used";

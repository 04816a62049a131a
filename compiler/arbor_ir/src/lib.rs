//! Arbor IR - tree node model
//!
//! This crate contains the node representation shared by the tree
//! utilities:
//! - Spans for source locations
//! - Names for interned identifiers
//! - `NodeKind`, the closed set of node kinds with typed operands
//! - `NodeFlags` for per-node boolean properties
//! - `TreeArena`, the struct-of-arrays node store with builders, type
//!   queries, an attribute side table and diagnostic formatting
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: strings become `Name(u32)`
//! - **Flatten Everything**: no boxed children, operands are `NodeId(u32)`
//! - **Identity by Handle**: shared subtrees and cycles are plain handle
//!   reuse; visited sets key on `NodeId`
//!
//! Floats are stored as `u64` bits so every kind is `Eq + Hash`.

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod arena;
mod attribute;
mod flags;
mod kind;
mod name;
mod node_id;
mod span;

pub use arena::{CommonTypes, TreeArena};
pub use attribute::Attribute;
pub use flags::NodeFlags;
pub use kind::{BinaryOp, CastKind, Decl, NodeKind};
pub use name::{Name, NameTable};
pub use node_id::{NodeId, NodeRange};
pub use span::{Span, SpanError};

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::{NodeId, NodeRange};
    crate::static_assert_size!(NodeId, 4);
    crate::static_assert_size!(NodeRange, 8);
}

//! Node handles and operand ranges.
//!
//! Nodes live in a [`TreeArena`](crate::TreeArena) and are addressed by
//! `NodeId(u32)`. Identity is handle equality: two structurally identical
//! nodes are still distinct nodes.

use std::fmt;

/// Index into the tree arena.
///
/// The first arena slots hold the canonical nodes shared by every tree:
/// [`NodeId::ERROR`] and [`NodeId::VOID`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// The canonical error node. A subtree that is (or contains) this node
    /// has already been diagnosed and must not be processed further.
    pub const ERROR: NodeId = NodeId(0);

    /// The canonical void value, the result of discarding an expression
    /// without side effects.
    pub const VOID: NodeId = NodeId(1);

    /// Create a new `NodeId`.
    #[inline]
    pub const fn new(index: u32) -> Self {
        NodeId(index)
    }

    /// Get the index into the arena.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Get the raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Whether this is the canonical error node.
    #[inline]
    pub const fn is_error(self) -> bool {
        self.0 == Self::ERROR.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            NodeId::ERROR => write!(f, "NodeId::ERROR"),
            NodeId::VOID => write!(f, "NodeId::VOID"),
            NodeId(raw) => write!(f, "NodeId({raw})"),
        }
    }
}

/// Range of node handles in the arena's flattened list storage.
///
/// Used for variable-length operand lists (call arguments, argument packs,
/// constructor elements).
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct NodeRange {
    pub start: u32,
    pub len: u32,
}

impl NodeRange {
    /// Empty range.
    pub const EMPTY: NodeRange = NodeRange { start: 0, len: 0 };

    /// Create a new range.
    #[inline]
    pub const fn new(start: u32, len: u32) -> Self {
        NodeRange { start, len }
    }

    /// Check if the range is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get the number of handles.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len as usize
    }
}

impl fmt::Debug for NodeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "NodeRange({}..{})",
            self.start,
            self.start + self.len
        )
    }
}

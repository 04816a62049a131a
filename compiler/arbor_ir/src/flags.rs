//! Per-node boolean flags.
//!
//! One flag word covers expressions, declarations and types; each flag
//! documents which node categories it is meaningful for.

use bitflags::bitflags;

bitflags! {
    /// Boolean node properties.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct NodeFlags: u32 {
        // === Evaluation (bits 0-7) ===

        /// Evaluating the node can observably change program state.
        const SIDE_EFFECTS = 1 << 0;
        /// The node itself is a volatile access (expressions, declarations).
        const THIS_VOLATILE = 1 << 1;
        /// The declaration has been read (variables and parameters).
        const READ = 1 << 2;

        // === Diagnostics (bits 8-15) ===

        /// All warnings are suppressed for this node.
        const NO_WARNING = 1 << 8;
        /// "value computed is not used" is suppressed for this node.
        const NO_UNUSED_VALUE_WARNING = 1 << 9;
        /// Ignored-nodiscard-result warnings are suppressed for this node.
        const NO_UNUSED_RESULT_WARNING = 1 << 10;

        // === Expression / declaration shape (bits 16-23) ===

        /// View-convert or non-lvalue node that only carries a location.
        const LOCATION_WRAPPER = 1 << 16;
        /// Compiler-generated declaration.
        const ARTIFICIAL = 1 << 17;
        /// Declaration with static storage.
        const STATIC = 1 << 18;
        /// Constructor written as a compound literal.
        const COMPOUND_LITERAL = 1 << 19;
        /// Baselink reached through a qualified name.
        const BASELINK_QUALIFIED = 1 << 20;
        /// Builtin function with no library fallback; its address cannot be taken.
        const BUILTIN_NO_FALLBACK = 1 << 21;

        // === Type qualifiers and properties (bits 24-31) ===

        /// Volatile-qualified type.
        const VOLATILE = 1 << 24;
        /// Const-qualified type.
        const CONST = 1 << 25;
        /// Type is not trivially copyable; it must live in memory.
        const ADDRESSABLE = 1 << 26;

        /// Any of the warning suppression flags.
        const ANY_SUPPRESSION = Self::NO_WARNING.bits()
            | Self::NO_UNUSED_VALUE_WARNING.bits()
            | Self::NO_UNUSED_RESULT_WARNING.bits();
    }
}

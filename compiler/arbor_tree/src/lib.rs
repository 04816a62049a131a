//! Tree utilities for the Arbor front end.
//!
//! Three passes over [`arbor_ir`] trees, all threaded through a [`TreeCx`]:
//!
//! - **Use classification** ([`mark_use`] and wrappers): marks variables
//!   read and rewrites location wrappers and reference dereferences
//!   according to whether a use wants an lvalue or an rvalue.
//! - **Void conversion** ([`convert_to_void`]): reduces an expression whose
//!   value is discarded to the effects that still have to happen, warning
//!   about volatile accesses that cannot be performed and ignored
//!   `nodiscard` results.
//! - **Subtree walking** ([`walk_tree`], [`walk_subtrees`]): a visitor-driven
//!   depth-first walk with optional cycle protection.
//!
//! Erroneous subtrees are represented by [`NodeId::ERROR`](arbor_ir::NodeId::ERROR)
//! and pass through every entry point without further diagnostics.
//!
//! # Debug Environment Variables
//!
//! - `RUST_LOG=arbor_tree=debug`: log tree rewrites.
//! - `RUST_LOG=arbor_tree=trace`: also trace every entry point.

mod context;
mod fold;
mod mark;
mod nodiscard;
mod void_conv;
mod walk;

use std::sync::Once;

pub use context::{TreeConfig, TreeCx, UnevaluatedScope};
pub use fold::{
    location_wrapper_p, pointer_offset_expression, strip_any_location_wrapper, strip_nops,
};
pub use mark::{
    convert_from_reference, mark_discarded_use, mark_exp_read, mark_lvalue_use,
    mark_lvalue_use_nonread, mark_rvalue_use, mark_rvalue_use_at, mark_use, UseMode,
};
pub use nodiscard::{get_fndecl_from_callee, maybe_warn_nodiscard, NODISCARD};
pub use void_conv::{convert_to_void, VoidContext};
pub use walk::{walk_subtrees, walk_tree, SubtreeWalk, Visited};

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber filtered by `RUST_LOG`.
///
/// Does nothing when `RUST_LOG` is unset or after the first call.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

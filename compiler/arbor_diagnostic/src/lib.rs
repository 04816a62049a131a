//! Diagnostic system for the tree utilities.
//!
//! Every reported problem carries:
//! - An error code for searchability
//! - A clear message (what went wrong)
//! - A primary span (where it went wrong)
//! - Secondary labels (the declaration it refers to)
//!
//! Warnings are gated per [`WarningCategory`] by the queue's
//! [`DiagnosticConfig`]; the queue reports whether a warning was accepted so
//! callers attach follow-up notes only to emitted warnings.

mod diagnostic;
mod error_code;
pub mod queue;

pub use diagnostic::{builtin_not_called, too_deeply_nested, Diagnostic, Label, Severity};
pub use error_code::{ErrorCode, WarningCategory, WarningFlags};
pub use queue::{DiagnosticConfig, DiagnosticQueue};

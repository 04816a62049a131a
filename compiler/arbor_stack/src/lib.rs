//! Stack safety utilities for deep tree recursion.
//!
//! Two complementary guards:
//! - [`ensure_sufficient_stack`] grows the native stack on demand so deep
//!   but finite trees never overflow it.
//! - [`NestingLimit`] counts recursion depth explicitly so a cyclic tree
//!   walked without a visited set stops with an error instead of growing
//!   the stack forever.
//!
//! # Platform Support
//!
//! - **Native targets**: Uses the `stacker` crate to grow the stack on demand.
//! - **WASM targets**: No-op passthrough (WASM has its own stack management).

use thiserror::Error;

/// Minimum stack space to keep available (100KB red zone).
const RED_ZONE: usize = 100 * 1024;

/// Stack space to allocate when growing (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Default depth bound for tree recursion.
pub const DEFAULT_NESTING_LIMIT: u32 = 4096;

/// Ensure sufficient stack space is available before executing `f`.
///
/// If the remaining stack is below the red zone threshold, this will
/// allocate additional stack space before calling `f`.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM version - just call directly (WASM has its own stack management).
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

/// Recursion went deeper than the configured limit.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
#[error("nesting depth exceeded the limit of {limit}")]
pub struct NestingError {
    pub limit: u32,
}

/// Explicit recursion depth counter.
///
/// Every successful [`NestingLimit::enter`] must be paired with one
/// [`NestingLimit::exit`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct NestingLimit {
    depth: u32,
    limit: u32,
}

impl NestingLimit {
    pub fn new(limit: u32) -> Self {
        NestingLimit { depth: 0, limit }
    }

    /// Enter one level of recursion.
    pub fn enter(&mut self) -> Result<(), NestingError> {
        if self.depth >= self.limit {
            return Err(NestingError { limit: self.limit });
        }
        self.depth += 1;
        Ok(())
    }

    /// Leave one level of recursion.
    pub fn exit(&mut self) {
        debug_assert!(self.depth > 0, "unbalanced NestingLimit::exit");
        self.depth = self.depth.saturating_sub(1);
    }

    /// Current depth.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }
}

impl Default for NestingLimit {
    fn default() -> Self {
        Self::new(DEFAULT_NESTING_LIMIT)
    }
}

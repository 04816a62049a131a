//! Tree context: the state every tree utility threads through.
//!
//! [`TreeCx`] owns the arena and the diagnostic queue and carries the two
//! pieces of ambient state the utilities consult: the current input
//! location (fallback for nodes without a span) and the unevaluated-operand
//! depth. Recursion goes through [`TreeCx::nested`], which bounds depth
//! explicitly and grows the native stack on demand.

use std::ops::{Deref, DerefMut};

use arbor_diagnostic::{
    too_deeply_nested, Diagnostic, DiagnosticConfig, DiagnosticQueue, ErrorCode,
};
use arbor_ir::{NodeId, Span, TreeArena};
use arbor_stack::{ensure_sufficient_stack, NestingLimit, DEFAULT_NESTING_LIMIT};

/// Configuration for a tree context.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TreeConfig {
    /// Maximum recursion depth of any single tree operation.
    pub max_nesting_depth: u32,
    pub diagnostics: DiagnosticConfig,
}

impl Default for TreeConfig {
    fn default() -> Self {
        TreeConfig {
            max_nesting_depth: DEFAULT_NESTING_LIMIT,
            diagnostics: DiagnosticConfig::default(),
        }
    }
}

/// Context for tree operations.
#[derive(Debug)]
pub struct TreeCx {
    pub arena: TreeArena,
    pub diagnostics: DiagnosticQueue,
    /// Location of the construct currently being elaborated.
    pub input_location: Span,
    unevaluated_operand: u32,
    nesting: NestingLimit,
}

impl TreeCx {
    /// Create a context with a fresh arena.
    pub fn new(config: TreeConfig) -> Self {
        Self::with_arena(TreeArena::new(), config)
    }

    /// Create a context over an existing arena.
    pub fn with_arena(arena: TreeArena, config: TreeConfig) -> Self {
        TreeCx {
            arena,
            diagnostics: DiagnosticQueue::with_config(config.diagnostics),
            input_location: Span::UNKNOWN,
            unevaluated_operand: 0,
            nesting: NestingLimit::new(config.max_nesting_depth),
        }
    }

    // === Locations ===

    /// The expression's own location, or `or_loc` when it has none.
    ///
    /// Declarations, constants and types have no expression location; their
    /// spans point at where they were declared, not where they are used.
    pub fn expr_loc_or_loc(&self, expr: NodeId, or_loc: Span) -> Span {
        if self.arena.kind(expr).is_expression() {
            self.arena.span(expr).or(or_loc)
        } else {
            or_loc
        }
    }

    /// The expression's own location, or the current input location.
    pub fn expr_loc_or_input_loc(&self, expr: NodeId) -> Span {
        self.expr_loc_or_loc(expr, self.input_location)
    }

    // === Diagnostics ===

    /// Emit a warning at `span`. Returns whether it was emitted.
    pub fn warn(&mut self, code: ErrorCode, span: Span, message: impl Into<String>) -> bool {
        let diag = Diagnostic::warning(code)
            .with_message(message)
            .with_label(span, "");
        self.diagnostics.warn(diag)
    }

    /// Attach a note to the most recently emitted diagnostic.
    pub fn note(&mut self, span: Span, message: impl Into<String>) -> bool {
        self.diagnostics.note(span, message)
    }

    // === Unevaluated operands ===

    /// Whether we are inside an operand that is never evaluated.
    pub fn in_unevaluated_operand(&self) -> bool {
        self.unevaluated_operand > 0
    }

    /// Current unevaluated-operand depth.
    pub fn unevaluated_depth(&self) -> u32 {
        self.unevaluated_operand
    }

    /// Enter an unevaluated operand until the returned guard is dropped.
    pub fn enter_unevaluated(&mut self) -> UnevaluatedScope<'_> {
        self.unevaluated_operand += 1;
        UnevaluatedScope { cx: self }
    }

    /// Run `f` inside an unevaluated operand.
    pub fn unevaluated<R>(&mut self, f: impl FnOnce(&mut TreeCx) -> R) -> R {
        let mut scope = self.enter_unevaluated();
        f(&mut scope)
    }

    // === Recursion ===

    /// Run one level of recursion.
    ///
    /// When the nesting limit is reached, reports `E9001` at `span` and
    /// returns `on_overflow` without calling `f`.
    pub fn nested<R>(&mut self, span: Span, on_overflow: R, f: impl FnOnce(&mut Self) -> R) -> R {
        if let Err(err) = self.nesting.enter() {
            tracing::debug!(limit = err.limit, "tree nesting limit reached");
            let span = span.or(self.input_location);
            self.diagnostics.error(too_deeply_nested(span, err.limit));
            return on_overflow;
        }
        let result = ensure_sufficient_stack(|| f(self));
        self.nesting.exit();
        result
    }

    /// Current recursion depth.
    pub fn nesting_depth(&self) -> u32 {
        self.nesting.depth()
    }
}

impl Default for TreeCx {
    fn default() -> Self {
        Self::new(TreeConfig::default())
    }
}

/// Scope of an unevaluated operand.
///
/// Dereferences to the context; the depth is restored when the scope is
/// dropped, on every exit path.
pub struct UnevaluatedScope<'cx> {
    cx: &'cx mut TreeCx,
}

impl Deref for UnevaluatedScope<'_> {
    type Target = TreeCx;

    fn deref(&self) -> &TreeCx {
        self.cx
    }
}

impl DerefMut for UnevaluatedScope<'_> {
    fn deref_mut(&mut self) -> &mut TreeCx {
        self.cx
    }
}

impl Drop for UnevaluatedScope<'_> {
    fn drop(&mut self) {
        self.cx.unevaluated_operand -= 1;
    }
}

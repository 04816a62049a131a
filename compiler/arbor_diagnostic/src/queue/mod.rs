//! Diagnostic queue: the sink every tree utility reports into.
//!
//! Features:
//! - Warning enablement per [`WarningCategory`]
//! - Error limits to prevent overwhelming output
//! - Deduplication of repeated errors at the same location
//! - Notes attached to the diagnostic they explain

use std::hash::{Hash, Hasher};

use arbor_ir::Span;

use crate::{Diagnostic, Severity, WarningCategory, WarningFlags};

/// Number of characters to use for message prefix deduplication.
const MESSAGE_PREFIX_LEN: usize = 30;

/// Hash the first N characters of a message for dedup comparison.
#[inline]
fn message_prefix_hash(msg: &str) -> u64 {
    let byte_end = msg
        .char_indices()
        .nth(MESSAGE_PREFIX_LEN)
        .map_or(msg.len(), |(idx, _)| idx);
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    msg[..byte_end].hash(&mut hasher);
    hasher.finish()
}

/// Configuration for diagnostic processing.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticConfig {
    /// Maximum number of errors before further errors are dropped (0 = unlimited).
    pub error_limit: usize,
    /// Drop an error repeating the previous one at the same location.
    pub deduplicate: bool,
    /// Enabled warning categories.
    pub warnings: WarningFlags,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig {
            error_limit: 10,
            deduplicate: true,
            warnings: WarningFlags::all(),
        }
    }
}

impl DiagnosticConfig {
    /// Create a config with no limits (for testing).
    pub fn unlimited() -> Self {
        DiagnosticConfig {
            error_limit: 0,
            deduplicate: false,
            warnings: WarningFlags::all(),
        }
    }

    /// Default limits with only the given warning categories enabled.
    pub fn with_warnings(warnings: WarningFlags) -> Self {
        DiagnosticConfig {
            warnings,
            ..Self::default()
        }
    }
}

/// Queue collecting the diagnostics of one analysis.
///
/// # Example
///
/// ```text
/// let mut queue = DiagnosticQueue::new();
/// if queue.warn(diagnostic) {
///     queue.note(decl_span, "declared here");
/// }
/// let diagnostics = queue.flush();
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticQueue {
    diagnostics: Vec<Diagnostic>,
    /// Count of errors (not warnings).
    error_count: usize,
    /// Last (primary span, `message_prefix_hash`) for error dedup.
    last_error: Option<(Span, u64)>,
    /// Whether the most recent warning or error was accepted; notes attach
    /// only to accepted diagnostics.
    last_accepted: bool,
    config: DiagnosticConfig,
}

impl Default for DiagnosticQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticQueue {
    /// Create a new diagnostic queue with default configuration.
    pub fn new() -> Self {
        Self::with_config(DiagnosticConfig::default())
    }

    /// Create a diagnostic queue with custom configuration.
    pub fn with_config(config: DiagnosticConfig) -> Self {
        DiagnosticQueue {
            diagnostics: Vec::new(),
            error_count: 0,
            last_error: None,
            last_accepted: false,
            config,
        }
    }

    pub fn config(&self) -> &DiagnosticConfig {
        &self.config
    }

    /// Whether warnings of this category would be accepted.
    pub fn is_enabled(&self, category: WarningCategory) -> bool {
        self.config.warnings.contains(category.flag())
    }

    /// Report a warning.
    ///
    /// Returns `false` if the warning's category is disabled; callers emit
    /// follow-up notes only when this returns `true`.
    pub fn warn(&mut self, diag: Diagnostic) -> bool {
        debug_assert_eq!(diag.severity, Severity::Warning);
        let enabled = diag
            .code
            .warning_category()
            .is_some_and(|category| self.is_enabled(category));
        self.last_accepted = enabled;
        if enabled {
            self.diagnostics.push(diag);
        }
        enabled
    }

    /// Report an error.
    ///
    /// Returns `false` if the error limit is reached or the error repeats
    /// the previous one.
    pub fn error(&mut self, diag: Diagnostic) -> bool {
        debug_assert_eq!(diag.severity, Severity::Error);
        self.last_accepted = false;

        if self.limit_reached() {
            return false;
        }

        let key = (
            diag.primary_span().unwrap_or(Span::UNKNOWN),
            message_prefix_hash(&diag.message),
        );
        if self.config.deduplicate && self.last_error == Some(key) {
            return false;
        }

        self.last_error = Some(key);
        self.diagnostics.push(diag);
        self.error_count += 1;
        self.last_accepted = true;
        true
    }

    /// Attach a note at `span` to the most recently accepted diagnostic.
    ///
    /// Returns `false` (and drops the note) if that diagnostic was filtered.
    pub fn note(&mut self, span: Span, message: impl Into<String>) -> bool {
        if !self.last_accepted {
            return false;
        }
        match self.diagnostics.last_mut() {
            Some(last) => {
                last.labels.push(crate::Label::secondary(span, message));
                true
            }
            None => false,
        }
    }

    /// Check if the error limit has been reached.
    pub fn limit_reached(&self) -> bool {
        self.config.error_limit > 0 && self.error_count >= self.config.error_limit
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_warning()).count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Sort diagnostics by position and return them, clearing the queue.
    ///
    /// Diagnostics without a location sort last; ties keep report order.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        let mut result: Vec<Diagnostic> = self.diagnostics.drain(..).collect();
        result.sort_by_key(|d| d.primary_span().map_or(u32::MAX, |span| span.start));

        self.error_count = 0;
        self.last_error = None;
        self.last_accepted = false;

        result
    }

    /// Get diagnostics in report order without clearing the queue.
    pub fn peek(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }
}

//! Diagnostic codes and warning categories.
//!
//! Format: a letter and four digits. The letter is the severity class, the
//! first digit the area:
//! - E2xxx: semantic errors raised by the tree utilities
//! - E9xxx: resource limits
//! - W1xxx: discarded-value warnings

use bitflags::bitflags;
use std::fmt;

/// Codes for every diagnostic the tree utilities emit.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Semantic errors (E2xxx)
    /// Built-in function used other than in a direct call
    E2001,

    // Resource limits (E9xxx)
    /// Expression nested deeper than the configured limit
    E9001,

    // Discarded-value warnings (W1xxx)
    /// Indirection will not access an object of incomplete type
    W1001,
    /// Implicit dereference will not access an object
    W1002,
    /// Indirection will not access an object of non-trivially-copyable type
    W1003,
    /// Variable of incomplete type will not be accessed
    W1004,
    /// Value computed is not used
    W1005,
    /// Ignoring a `nodiscard` result
    W1006,
}

impl ErrorCode {
    /// Every code, in declaration order.
    pub const ALL: [ErrorCode; 8] = [
        ErrorCode::E2001,
        ErrorCode::E9001,
        ErrorCode::W1001,
        ErrorCode::W1002,
        ErrorCode::W1003,
        ErrorCode::W1004,
        ErrorCode::W1005,
        ErrorCode::W1006,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E2001 => "E2001",
            ErrorCode::E9001 => "E9001",
            ErrorCode::W1001 => "W1001",
            ErrorCode::W1002 => "W1002",
            ErrorCode::W1003 => "W1003",
            ErrorCode::W1004 => "W1004",
            ErrorCode::W1005 => "W1005",
            ErrorCode::W1006 => "W1006",
        }
    }

    /// Check if this is a warning code (W-prefix).
    pub fn is_warning(&self) -> bool {
        self.warning_category().is_some()
    }

    /// Check if this is a resource limit error (E9xxx).
    pub fn is_limit_error(&self) -> bool {
        matches!(self, ErrorCode::E9001)
    }

    /// The enablement category of a warning code, `None` for errors.
    pub fn warning_category(&self) -> Option<WarningCategory> {
        match self {
            ErrorCode::E2001 | ErrorCode::E9001 => None,
            ErrorCode::W1001 | ErrorCode::W1002 | ErrorCode::W1003 | ErrorCode::W1004 => {
                Some(WarningCategory::Default)
            }
            ErrorCode::W1005 => Some(WarningCategory::UnusedValue),
            ErrorCode::W1006 => Some(WarningCategory::UnusedResult),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ErrorCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorCode::ALL
            .into_iter()
            .find(|code| code.as_str() == s)
            .ok_or(())
    }
}

/// Warning enablement categories.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum WarningCategory {
    /// Warnings that are always meaningful (inaccessible volatile objects).
    Default,
    /// "value computed is not used".
    UnusedValue,
    /// Ignored `nodiscard` results.
    UnusedResult,
}

impl WarningCategory {
    /// The enablement flag controlling this category.
    pub fn flag(self) -> WarningFlags {
        match self {
            WarningCategory::Default => WarningFlags::DEFAULT,
            WarningCategory::UnusedValue => WarningFlags::UNUSED_VALUE,
            WarningCategory::UnusedResult => WarningFlags::UNUSED_RESULT,
        }
    }
}

bitflags! {
    /// Enabled warning categories.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct WarningFlags: u8 {
        const DEFAULT = 1 << 0;
        const UNUSED_VALUE = 1 << 1;
        const UNUSED_RESULT = 1 << 2;
    }
}

impl Default for WarningFlags {
    fn default() -> Self {
        WarningFlags::all()
    }
}

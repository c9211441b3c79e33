//! Common error infrastructure for spellpoints-core.
//!
//! Domain-specific errors (`FormulaError`, `RuleError`) are defined next to the
//! code that raises them. This module only provides the classification shared by
//! all of them.
//!
//! Note that running out of points, or paying with hit points until the
//! character dies, are *outcomes* of a settlement and never surface as errors.

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the host can fix the condition (e.g. create the missing resource)
/// - **Validation**: a configured formula or table is invalid and must be edited
/// - **Internal**: unexpected inconsistency in the character record
/// - **Fatal**: the rules cannot be evaluated at all
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - the acting user can fix it and retry.
    ///
    /// Examples: spell point resource missing on the sheet
    Recoverable,

    /// Validation error - configuration must change before retrying.
    ///
    /// Examples: malformed cost formula, unknown variable in a formula
    Validation,

    /// Internal error - unexpected state inconsistency.
    ///
    /// Examples: pact slot consumed while the pact level is unset
    Internal,

    /// Fatal error - rules cannot run.
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all spellpoints-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait SpellPointError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

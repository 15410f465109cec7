//! # Error Types
//!
//! Domain-specific error types for reji-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          Error Types                                │
//! │                                                                     │
//! │  reji-core errors (this file)                                       │
//! │  ├── CoreError        - Cart and payment domain errors              │
//! │  └── ValidationError  - Input validation failures                   │
//! │                                                                     │
//! │  reji-codec errors (separate crate)                                 │
//! │  └── CodecError       - Payload transport failures                  │
//! │                                                                     │
//! │  reji-scan errors (separate crate)                                  │
//! │  └── ScanError        - Device / decoder / session failures         │
//! │                                                                     │
//! │  Flow: ValidationError → CoreError → caller-facing message          │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (code, amounts, etc.)
//! 3. Errors are enum variants, never String
//! 4. Validation errors are recoverable in place; the flow/session stays alive

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic failures.
/// They should be caught and translated to user-facing messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No cart line exists for the given code.
    #[error("No cart line for code {0}")]
    LineNotFound(String),

    /// Cart has reached the maximum number of distinct lines.
    #[error("Cart cannot have more than {max} lines")]
    CartTooLarge { max: usize },

    /// Line quantity would exceed the maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// The payment flow is not in a state that allows the requested operation.
    ///
    /// Raised when completing or mutating a flow that is already
    /// completed or cancelled.
    #[error("Payment is {phase}, cannot {action}")]
    InvalidPaymentPhase {
        phase: &'static str,
        action: &'static str,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// The owning session or payment flow remains in place; the caller
/// corrects the input and retries.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: &'static str },

    /// Field value has too few digits/characters.
    #[error("{field} must be at least {min} digits")]
    TooShort { field: &'static str, min: usize },

    /// Field value has too many digits/characters.
    #[error("{field} must be at most {max} digits")]
    TooLong { field: &'static str, max: usize },

    /// Value contains characters outside the allowed set.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat {
        field: &'static str,
        reason: &'static str,
    },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: &'static str },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
    },

    /// Cash tendered does not cover the amount due.
    #[error("Tendered ¥{tendered} is less than total ¥{total}")]
    InsufficientTender { tendered: i64, total: i64 },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::QuantityTooLarge {
            requested: 1500,
            max: 999,
        };
        assert_eq!(
            err.to_string(),
            "Quantity 1500 exceeds maximum allowed (999)"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::TooShort {
            field: "code",
            min: 8,
        };
        assert_eq!(err.to_string(), "code must be at least 8 digits");

        let err = ValidationError::InsufficientTender {
            tendered: 300,
            total: 330,
        };
        assert_eq!(err.to_string(), "Tendered ¥300 is less than total ¥330");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required { field: "code" };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}

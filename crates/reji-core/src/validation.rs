//! # Validation Module
//!
//! Input validation for values keyed in by the cashier.
//!
//! Validation errors are always recoverable: the owning session or payment
//! flow stays where it is and the caller corrects the input.
//!
//! ## Usage
//! ```rust
//! use reji_core::validation::validate_manual_code;
//!
//! assert!(validate_manual_code("12345678").is_ok());
//! assert!(validate_manual_code("1234567").is_err()); // 7 digits - too short
//! ```

use crate::error::{ValidationError, ValidationResult};
use crate::money::Money;
use crate::{MAX_LINE_QUANTITY, MAX_MANUAL_CODE_DIGITS, MIN_MANUAL_CODE_DIGITS};

// =============================================================================
// Manual Barcode Entry
// =============================================================================

/// Validates a manually keyed barcode.
///
/// ## Rules
/// - Digits only (the keypad allows nothing else, but paste does)
/// - At least 8 digits, at most 32
/// - Must not be all zeros - a zero code is "no code"
///
/// Returns the trimmed digit string. Leading zeros are preserved: EAN codes
/// may start with 0 and the digit string is the code.
pub fn validate_manual_code(code: &str) -> ValidationResult<String> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required { field: "code" });
    }

    if !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "code",
            reason: "must contain only digits",
        });
    }

    if code.len() < MIN_MANUAL_CODE_DIGITS {
        return Err(ValidationError::TooShort {
            field: "code",
            min: MIN_MANUAL_CODE_DIGITS,
        });
    }

    if code.len() > MAX_MANUAL_CODE_DIGITS {
        return Err(ValidationError::TooLong {
            field: "code",
            max: MAX_MANUAL_CODE_DIGITS,
        });
    }

    if code.bytes().all(|b| b == b'0') {
        return Err(ValidationError::InvalidFormat {
            field: "code",
            reason: "must not be zero",
        });
    }

    Ok(code.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity (1 ..= MAX_LINE_QUANTITY).
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive { field: "quantity" });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity",
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a unit price. Zero is allowed (giveaway items).
pub fn validate_price(price: i64) -> ValidationResult<()> {
    if price < 0 {
        return Err(ValidationError::MustBePositive { field: "price" });
    }

    Ok(())
}

/// Validates a cash tender against the amount due.
pub fn validate_tender(tendered: Money, total: Money) -> ValidationResult<()> {
    if !tendered.is_positive() {
        return Err(ValidationError::MustBePositive { field: "tendered" });
    }

    if tendered < total {
        return Err(ValidationError::InsufficientTender {
            tendered: tendered.yen(),
            total: total.yen(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Transport Encoding
//!
//! Canonical text form of the transaction payload and its binary-safe
//! transport wrapper.
//!
//! The canonical form is compact JSON with the struct field order
//! (`items`, then `total_amount`; items carry
//! `code, name, unit_price, quantity, subtotal`). The JSON is UTF-8 and may
//! contain arbitrary product names, so it is wrapped in standard-alphabet
//! base64 before it ever reaches the optical layer - QR alphanumeric modes
//! and scanner firmwares disagree about non-ASCII, ASCII transport text does
//! not.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use reji_core::TransactionPayload;

use crate::error::{CodecError, CodecResult};

/// Encodes a payload into its transport text.
///
/// The result is self-contained ASCII suitable for embedding in an optical
/// code.
pub fn encode(payload: &TransactionPayload) -> CodecResult<String> {
    let json = serde_json::to_string(payload)?;
    Ok(BASE64.encode(json.as_bytes()))
}

/// Decodes transport text back into a payload.
///
/// Reverses the base64 wrapper, parses the canonical JSON and validates the
/// structural shape. Every failure mode is [`CodecError::Malformed`]; there
/// is no partial recovery.
pub fn decode(raw: &str) -> CodecResult<TransactionPayload> {
    let bytes = BASE64.decode(raw.trim())?;
    let json = String::from_utf8(bytes)?;
    let payload: TransactionPayload = serde_json::from_str(&json)?;

    if let Some(violation) = payload.structural_error() {
        return Err(CodecError::Malformed(violation.to_string()));
    }

    Ok(payload)
}

// =============================================================================
// Unit Tests
// =============================================================================

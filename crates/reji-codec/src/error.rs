//! # Codec Error Types
//!
//! A decoded payload is either completely usable or completely rejected:
//! every transport, parse or shape failure collapses into a single
//! `Malformed` variant, and the codec never attempts partial recovery.

use thiserror::Error;

/// Result type alias for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Codec failures.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The scanned text is not a valid transaction payload.
    ///
    /// Covers broken base64, invalid UTF-8, unparseable JSON and
    /// structurally invalid payloads alike - the caller shows one
    /// "invalid payload" message either way.
    #[error("Malformed payload: {0}")]
    Malformed(String),

    /// The encoded payload does not fit the QR symbol capacity.
    #[error("Payload exceeds QR capacity: {0}")]
    Capacity(String),
}

impl From<base64::DecodeError> for CodecError {
    fn from(err: base64::DecodeError) -> Self {
        CodecError::Malformed(format!("transport encoding: {err}"))
    }
}

impl From<std::string::FromUtf8Error> for CodecError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        CodecError::Malformed(format!("payload text: {err}"))
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(err: serde_json::Error) -> Self {
        CodecError::Malformed(format!("payload structure: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_decode_failures_are_malformed() {
        let from_b64: CodecError = base64::DecodeError::InvalidPadding.into();
        assert!(matches!(from_b64, CodecError::Malformed(_)));

        let from_json: CodecError =
            serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(matches!(from_json, CodecError::Malformed(_)));
    }
}

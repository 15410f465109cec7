//! # Scan Error Types
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Scan Error Categories                          │
//! │                                                                     │
//! │  ┌────────────────┐  ┌────────────────┐  ┌──────────────────────┐   │
//! │  │    Device      │  │    Decoder     │  │      Session         │   │
//! │  │                │  │                │  │                      │   │
//! │  │ PermissionDen. │  │ DecoderFailed  │  │ InvalidTransition    │   │
//! │  │ Unavailable    │  │ (fault cap hit)│  │ SessionClosed        │   │
//! │  │    = FATAL     │  │    = FATAL     │  │ Validation = retry   │   │
//! │  └────────────────┘  └────────────────┘  └──────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A single decoder fault is NOT an error surface - it is logged and decoding
//! continues. Only the consecutive-fault cap promotes it to `DecoderFailed`.
//! "No symbol in this frame" is steady-state signal and never appears here
//! at all.

use thiserror::Error;

use crate::capture::DeviceError;
use crate::decoder::DecodeFault;
use crate::session::ScanPhase;

/// Result type alias for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;

/// Scan session failures surfaced to the caller.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum ScanError {
    /// Capture device failure. Fatal: the session always ends Cancelled.
    #[error(transparent)]
    Device(#[from] DeviceError),

    /// The decoder faulted too many times in a row. Fatal.
    #[error("Decoder failed after {faults} consecutive faults: {last}")]
    DecoderFailed { faults: u32, last: DecodeFault },

    /// Manual input rejected; the session stays in manual entry.
    #[error(transparent)]
    Validation(#[from] reji_core::ValidationError),

    /// The requested action does not apply to the current phase.
    #[error("Cannot {action} while {phase:?}")]
    InvalidTransition {
        phase: ScanPhase,
        action: &'static str,
    },

    /// The session task has already shut down.
    #[error("Scan session is closed")]
    SessionClosed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_error_passthrough() {
        let err: ScanError = DeviceError::PermissionDenied.into();
        assert_eq!(err.to_string(), "Camera permission denied");
    }

    #[test]
    fn test_decoder_failed_message() {
        let err = ScanError::DecoderFailed {
            faults: 5,
            last: DecodeFault::new("checksum mismatch"),
        };
        assert!(err.to_string().contains("5 consecutive faults"));
        assert!(err.to_string().contains("checksum mismatch"));
    }
}

//! # Symbol Decoding
//!
//! Per-frame decode attempts and the feed that merges capture and decoder
//! into one signal sequence.
//!
//! ## Decode Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Per-Frame Outcomes                             │
//! │                                                                     │
//! │  decode_frame(frame) ──▶ Ok(Some(symbol))  at most one per frame    │
//! │                      ──▶ Ok(None)          no symbol found -        │
//! │                                            NORMAL steady state,     │
//! │                                            never logged, never an   │
//! │                                            error                    │
//! │                      ──▶ Err(fault)        decoder fault - logged,  │
//! │                                            scanning continues;      │
//! │                                            retry policy belongs to  │
//! │                                            the session              │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The decode sequence is lazy, unbounded and non-restartable: frames are
//! only examined while something polls the feed, and after `reset()` the
//! decoder produces nothing until a session starts a fresh scan.

use std::fmt;

use thiserror::Error;
use tracing::debug;

use crate::capture::{CaptureStream, DeviceError, Frame};

// =============================================================================
// Decoded Symbol
// =============================================================================

/// Symbol family of a decoded optical code.
///
/// The session's acceptance policy keys on scan *mode*, not on the symbol
/// format - a QR symbol containing digits is a perfectly good product code.
/// The format is carried for logging and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolFormat {
    Ean13,
    Ean8,
    Code128,
    QrCode,
    Other,
}

impl fmt::Display for SymbolFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolFormat::Ean13 => write!(f, "EAN-13"),
            SymbolFormat::Ean8 => write!(f, "EAN-8"),
            SymbolFormat::Code128 => write!(f, "Code 128"),
            SymbolFormat::QrCode => write!(f, "QR"),
            SymbolFormat::Other => write!(f, "other"),
        }
    }
}

/// A decoded optical code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedSymbol {
    /// The decoded text, verbatim.
    pub text: String,
    /// Symbol family, for diagnostics.
    pub format: SymbolFormat,
}

impl DecodedSymbol {
    pub fn new(text: impl Into<String>, format: SymbolFormat) -> Self {
        DecodedSymbol {
            text: text.into(),
            format,
        }
    }
}

// =============================================================================
// Decode Fault
// =============================================================================

/// An internal decoder failure on one frame.
///
/// Distinct from "no symbol found" (which is `Ok(None)`): a fault means the
/// decoder itself misbehaved. It does not stop scanning by itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct DecodeFault(String);

impl DecodeFault {
    pub fn new(reason: impl Into<String>) -> Self {
        DecodeFault(reason.into())
    }
}

// =============================================================================
// Frame Decoder Trait
// =============================================================================

/// A decoder examining one frame at a time.
pub trait FrameDecoder: Send {
    /// Attempts to decode a symbol out of one frame.
    fn decode_frame(&mut self, frame: &Frame) -> Result<Option<DecodedSymbol>, DecodeFault>;

    /// Stops the current decode run and discards per-run state.
    ///
    /// Idempotent, and safe to call before the first frame was ever seen.
    fn reset(&mut self);
}

// =============================================================================
// Decode Feed
// =============================================================================

/// One merged signal out of the capture/decoder pair.
#[derive(Debug)]
pub enum DecodeSignal {
    /// A symbol was decoded from the current frame.
    Symbol(DecodedSymbol),
    /// No frame ready, or a frame with no symbol in it. Steady state.
    Idle,
    /// The decoder faulted on this frame.
    Fault(DecodeFault),
    /// The capture hardware failed. Fatal.
    Device(DeviceError),
}

/// Pairs exactly one capture stream with exactly one frame decoder and
/// merges their outputs.
///
/// The feed owns both halves for the session's lifetime, which is what makes
/// session teardown able to guarantee release: closing the feed closes the
/// stream and resets the decoder, in that order, idempotently.
pub struct DecodeFeed {
    stream: Box<dyn CaptureStream>,
    decoder: Box<dyn FrameDecoder>,
}

impl DecodeFeed {
    pub fn new(stream: Box<dyn CaptureStream>, decoder: Box<dyn FrameDecoder>) -> Self {
        DecodeFeed { stream, decoder }
    }

    /// Pulls one frame and runs one decode attempt.
    pub fn poll(&mut self) -> DecodeSignal {
        let frame = match self.stream.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => return DecodeSignal::Idle,
            Err(err) => return DecodeSignal::Device(err),
        };

        match self.decoder.decode_frame(&frame) {
            Ok(Some(symbol)) => {
                debug!(format = %symbol.format, "symbol decoded");
                DecodeSignal::Symbol(symbol)
            }
            Ok(None) => DecodeSignal::Idle,
            Err(fault) => DecodeSignal::Fault(fault),
        }
    }

    /// Stops the decode run. Idempotent; the stream stays open for preview.
    pub fn reset(&mut self) {
        self.decoder.reset();
    }

    /// Releases everything: decode run stopped, hardware handed back.
    /// Idempotent.
    pub fn close(&mut self) {
        self.decoder.reset();
        self.stream.close();
    }

    /// Whether the underlying stream still holds the hardware.
    pub fn is_open(&self) -> bool {
        self.stream.is_open()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

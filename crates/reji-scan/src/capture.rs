//! # Capture Seam
//!
//! The camera abstraction the scan session sits on top of. Everything below
//! this seam - driver quirks, permission prompts, pixel formats - belongs to
//! the backend implementing these traits.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Capture Contract                              │
//! │                                                                     │
//! │  open(Environment) ──▶ CaptureStream   (may prompt for permission)  │
//! │                                                                     │
//! │  next_frame() ──▶ Ok(Some(frame))   frame ready                     │
//! │               ──▶ Ok(None)          nothing this tick, not an error │
//! │               ──▶ Err(DeviceError)  hardware gone, FATAL            │
//! │                                                                     │
//! │  close()  idempotent - safe on an already-closed stream             │
//! │                                                                     │
//! │  One stream is exclusively owned by the session that opened it      │
//! │  until released.                                                    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Device Error
// =============================================================================

/// Capture device failures. Always fatal to the owning session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeviceError {
    /// The user (or platform policy) denied camera access.
    #[error("Camera permission denied")]
    PermissionDenied,

    /// The capture hardware is missing, busy, or stopped mid-session.
    #[error("Capture device unavailable: {0}")]
    Unavailable(String),
}

// =============================================================================
// Facing
// =============================================================================

/// Which camera to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    /// Rear camera - the one pointed at barcodes.
    Environment,
    /// Front camera.
    User,
}

// =============================================================================
// Frame
// =============================================================================

/// One captured video frame, grayscale.
///
/// Optical decoders work on luminance; backends convert whatever the sensor
/// produces into a single luma plane before it crosses this seam.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    /// Row-major luma bytes, `width × height` long.
    pub luma: Vec<u8>,
}

impl Frame {
    /// Creates a frame, checking the buffer length against the dimensions.
    pub fn new(width: u32, height: u32, luma: Vec<u8>) -> Option<Self> {
        if luma.len() == (width as usize) * (height as usize) {
            Some(Frame { width, height, luma })
        } else {
            None
        }
    }

    /// A uniform gray frame - what an idle preview looks like to a decoder.
    pub fn blank(width: u32, height: u32) -> Self {
        Frame {
            width,
            height,
            luma: vec![0x80; (width as usize) * (height as usize)],
        }
    }
}

// =============================================================================
// Traits
// =============================================================================

/// A camera-like device that can hand out capture streams.
pub trait CaptureDevice: Send + Sync {
    /// Acquires a live capture stream.
    ///
    /// May prompt a user permission gate; denial surfaces as
    /// [`DeviceError::PermissionDenied`].
    fn open(&self, facing: Facing) -> Result<Box<dyn CaptureStream>, DeviceError>;
}

/// A live capture stream owned by exactly one session.
pub trait CaptureStream: Send {
    /// Pulls the next frame if one is ready.
    ///
    /// `Ok(None)` means no frame this tick and is normal; `Err` means the
    /// hardware went away and the session must end.
    fn next_frame(&mut self) -> Result<Option<Frame>, DeviceError>;

    /// Releases the underlying hardware. Idempotent: calling it on an
    /// already-closed (or never-started) stream does nothing.
    fn close(&mut self);

    /// Whether the stream still holds the hardware.
    fn is_open(&self) -> bool;
}

// =============================================================================
// Unit Tests
// =============================================================================

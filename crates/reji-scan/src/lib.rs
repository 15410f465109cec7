//! # reji-scan: Scan Acquisition for Reji POS
//!
//! One [`session::ScanSession`] binds one capture stream and one symbol
//! decoder for its whole lifetime and drives decoding until a symbol is
//! accepted, the countdown elapses, or the caller closes it. The register
//! runs it in Product / EC-stock mode; the tablet runs it in QR mode with
//! the autostart tablet flag.
//!
//! ## Layers
//!
//! - [`capture`] - the camera seam: open-by-facing, luma frames, idempotent close
//! - [`decoder`] - per-frame symbol attempts and the merged decode feed
//! - [`session`] - the pure state machine (no I/O, no timers)
//! - [`driver`] - the tokio event loop that owns feed + timers and executes
//!   the machine's side effects
//!
//! ## Event Model
//!
//! All events against one session - decode results, countdown expiry, user
//! commands - are delivered serially by a single task. There is no decode
//! callback racing a timer callback: the loop's arm order makes a usable
//! symbol cancel the countdown before any timeout can run.

pub mod capture;
pub mod decoder;
pub mod driver;
pub mod error;
pub mod session;

pub use capture::{CaptureDevice, CaptureStream, DeviceError, Facing, Frame};
pub use decoder::{DecodeFault, DecodeFeed, DecodeSignal, DecodedSymbol, FrameDecoder, SymbolFormat};
pub use driver::{ScanDriver, ScanHandle};
pub use error::{ScanError, ScanResult};
pub use session::{NoOpSink, ScanConfig, ScanMode, ScanPhase, ScanSession, ScanSink, ScanValue};

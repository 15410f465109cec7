//! # reji-codec: Transaction Transport Codec for Reji POS
//!
//! Bridges the two devices without a network round-trip: the register encodes
//! a [`reji_core::TransactionPayload`] into a self-contained text block and
//! renders it as a QR image; the tablet scans the image and decodes the text
//! back into an identical payload.
//!
//! ## Wire Stack
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        Payload Wire Stack                           │
//! │                                                                     │
//! │   TransactionPayload                                                │
//! │        │  serde_json (compact, canonical field order)               │
//! │        ▼                                                            │
//! │   JSON text (UTF-8, may contain 茶 etc.)                            │
//! │        │  base64 standard alphabet                                  │
//! │        ▼                                                            │
//! │   ASCII transport text  ◀━━ this is what decode() receives          │
//! │        │  QR matrix + PNG                                           │
//! │        ▼                                                            │
//! │   image bytes                                                       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Invariant: `decode(encode(payload)) == payload` for every reachable
//! payload, including non-ASCII item names.

pub mod error;
pub mod render;
pub mod transport;

pub use error::{CodecError, CodecResult};
pub use render::{EcLevel, RenderOptions};

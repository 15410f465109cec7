//! # reji-core: Pure Business Logic for Reji POS
//!
//! This crate is the heart of the two-device POS. It contains all business
//! logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Reji POS Architecture                         │
//! │                                                                     │
//! │   Register device                         Tablet device             │
//! │  ┌───────────────────┐                  ┌───────────────────┐       │
//! │  │ scan product code │                  │ scan QR payload   │       │
//! │  │   (reji-scan)     │                  │   (reji-scan)     │       │
//! │  └─────────┬─────────┘                  └─────────┬─────────┘       │
//! │            ▼                                      ▼                 │
//! │  ┌───────────────────┐   QR image       ┌───────────────────┐       │
//! │  │ Cart → Payload    │ ───────────────▶ │ Payload → Payment │       │
//! │  │  ★ THIS CRATE ★   │  (reji-codec)    │  ★ THIS CRATE ★   │       │
//! │  └───────────────────┘                  └───────────────────┘       │
//! │                                                                     │
//! │   NO I/O • NO CAMERA • NO NETWORK • PURE FUNCTIONS                  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type in whole yen with integer tax arithmetic
//! - [`cart`] - Cart and cart lines on the register side
//! - [`payload`] - Immutable transaction snapshot carried between devices
//! - [`catalog`] - Opaque product/EC-stock lookup collaborator
//! - [`payment`] - Payment flow on the tablet side
//! - [`validation`] - Input validation (manual codes, tender amounts)
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Camera, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are whole yen (i64), never floats
//! 4. **Recompute, Never Store**: subtotal/tax/total are derived on every read

pub mod cart;
pub mod catalog;
pub mod error;
pub mod money;
pub mod payload;
pub mod payment;
pub mod validation;

pub use cart::{Cart, CartLine, CartTotals};
pub use catalog::{EcStockRecord, ProductCatalog, ProductRecord};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{Money, TaxRate};
pub use payload::{PayloadItem, TransactionPayload};
pub use payment::{PaymentFlow, PaymentMethod, PaymentPhase, PaymentSummary};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Japanese consumption tax in basis points (10%).
///
/// The register computes `tax = floor(subtotal × 10%)` before totalling; the
/// tablet derives `subtotal = floor(total / 1.1)` back out of the payload.
/// The two directions can disagree by the rounding remainder - that asymmetry
/// is intentional, see [`money::Money::strip_tax`].
pub const CONSUMPTION_TAX_BPS: u32 = 1000;

/// Maximum distinct lines allowed in a single cart.
///
/// Prevents runaway carts and keeps the encoded payload within QR capacity.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity of a single line in the cart.
///
/// Prevents accidental over-ordering (e.g. typing 1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;

/// Minimum digits for a manually keyed barcode (EAN-8 is the shortest code
/// the register accepts).
pub const MIN_MANUAL_CODE_DIGITS: usize = 8;

/// Maximum digits for a manually keyed barcode. Comfortably above EAN-13 and
/// GS1-128 numeric lengths; anything longer is a typo, not a code.
pub const MAX_MANUAL_CODE_DIGITS: usize = 32;

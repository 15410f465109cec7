//! # Payment Flow
//!
//! The tablet-side state machine that settles a decoded transaction.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      PaymentFlow Lifecycle                          │
//! │                                                                     │
//! │   payload decoded                                                   │
//! │        │                                                            │
//! │        ▼            select_method / set_tendered                    │
//! │  ┌───────────┐ ◀──────────────────────────────┐                     │
//! │  │ Selecting │ ──────────────────────────────▶│                     │
//! │  └─────┬─────┘                                                      │
//! │        │ complete()              cancel()                           │
//! │        ▼                            ▼                               │
//! │  ┌───────────┐                ┌───────────┐                         │
//! │  │ Completed │                │ Cancelled │                         │
//! │  └───────────┘                └───────────┘                         │
//! │                                                                     │
//! │  Both terminal states refuse further mutation. Cancellation fully   │
//! │  discards - there is no partial or resumable payment.               │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A tendered amount only means something for Cash; the cashless methods
//! settle exactly and change is zero by definition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::payload::TransactionPayload;

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash; requires a tendered amount.
    Cash,
    /// Credit card.
    Credit,
    /// QR wallet payment.
    Qr,
    /// Contactless e-money.
    EMoney,
}

impl PaymentMethod {
    /// Whether this method takes a tendered amount and returns change.
    #[inline]
    pub const fn takes_tender(&self) -> bool {
        matches!(self, PaymentMethod::Cash)
    }
}

impl Default for PaymentMethod {
    fn default() -> Self {
        // The tablet screen preselects cash.
        PaymentMethod::Cash
    }
}

// =============================================================================
// Payment Phase
// =============================================================================

/// Current phase of a payment flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentPhase {
    /// Method/tender selection in progress.
    Selecting,
    /// Payment settled; summary produced.
    Completed,
    /// Payment discarded.
    Cancelled,
}

impl PaymentPhase {
    fn name(&self) -> &'static str {
        match self {
            PaymentPhase::Selecting => "selecting",
            PaymentPhase::Completed => "completed",
            PaymentPhase::Cancelled => "cancelled",
        }
    }
}

// =============================================================================
// Payment Summary
// =============================================================================

/// Record produced by a completed payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSummary {
    /// Timestamp-derived receipt identifier, `TXN-<unix millis>`.
    pub transaction_id: String,

    /// Method the payment settled with.
    pub method: PaymentMethod,

    /// Tax-inclusive amount settled.
    pub total: Money,

    /// Change returned to the customer (zero for cashless methods).
    pub change: Money,

    /// Completion time.
    pub completed_at: DateTime<Utc>,
}

// =============================================================================
// Payment Flow
// =============================================================================

/// A payment in progress against one decoded payload.
///
/// Owns its payload copy outright - the originating cart lives on another
/// device and is never touched.
#[derive(Debug, Clone)]
pub struct PaymentFlow {
    payload: TransactionPayload,
    method: PaymentMethod,
    tendered: Option<Money>,
    phase: PaymentPhase,
}

impl PaymentFlow {
    /// Starts a flow for a freshly decoded payload.
    pub fn new(payload: TransactionPayload) -> Self {
        PaymentFlow {
            payload,
            method: PaymentMethod::default(),
            tendered: None,
            phase: PaymentPhase::Selecting,
        }
    }

    /// The payload being settled.
    pub fn payload(&self) -> &TransactionPayload {
        &self.payload
    }

    /// Current phase.
    pub fn phase(&self) -> PaymentPhase {
        self.phase
    }

    /// Currently selected method.
    pub fn method(&self) -> PaymentMethod {
        self.method
    }

    /// Tax-inclusive amount due.
    pub fn total(&self) -> Money {
        self.payload.total()
    }

    /// Selects the payment method. Switching away from Cash clears any
    /// tendered amount.
    pub fn select_method(&mut self, method: PaymentMethod) -> CoreResult<()> {
        self.ensure_selecting("select a method")?;
        self.method = method;
        if !method.takes_tender() {
            self.tendered = None;
        }
        Ok(())
    }

    /// Records the cash handed over by the customer.
    pub fn set_tendered(&mut self, amount: Money) -> CoreResult<()> {
        self.ensure_selecting("record tender")?;
        if !self.method.takes_tender() {
            return Err(CoreError::InvalidPaymentPhase {
                phase: "cashless",
                action: "record tender",
            });
        }
        if !amount.is_positive() {
            return Err(ValidationError::MustBePositive { field: "tendered" }.into());
        }
        self.tendered = Some(amount);
        Ok(())
    }

    /// Change due so far: `max(0, tendered - total)` for Cash, zero for
    /// everything else. Safe to call at any time for display.
    pub fn change(&self) -> Money {
        match (self.method.takes_tender(), self.tendered) {
            (true, Some(tendered)) if tendered >= self.total() => tendered - self.total(),
            _ => Money::zero(),
        }
    }

    /// Settles the payment and produces the summary record. Terminal.
    ///
    /// For Cash the tendered amount must cover the total, otherwise a
    /// validation error is returned and the flow stays in place.
    pub fn complete(&mut self) -> CoreResult<PaymentSummary> {
        self.ensure_selecting("complete")?;

        let total = self.total();
        let change = if self.method.takes_tender() {
            let tendered = self.tendered.unwrap_or(Money::zero());
            if tendered < total {
                return Err(ValidationError::InsufficientTender {
                    tendered: tendered.yen(),
                    total: total.yen(),
                }
                .into());
            }
            tendered - total
        } else {
            Money::zero()
        };

        self.phase = PaymentPhase::Completed;
        let completed_at = Utc::now();

        Ok(PaymentSummary {
            transaction_id: format!("TXN-{}", completed_at.timestamp_millis()),
            method: self.method,
            total,
            change,
            completed_at,
        })
    }

    /// Discards the in-progress payment. Terminal, idempotent on an already
    /// cancelled flow.
    pub fn cancel(&mut self) {
        if self.phase == PaymentPhase::Selecting {
            self.phase = PaymentPhase::Cancelled;
            self.tendered = None;
        }
    }

    fn ensure_selecting(&self, action: &'static str) -> CoreResult<()> {
        if self.phase != PaymentPhase::Selecting {
            return Err(CoreError::InvalidPaymentPhase {
                phase: self.phase.name(),
                action,
            });
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

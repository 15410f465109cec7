//! # Cart Module
//!
//! The register-side cart: an ordered collection of lines keyed by product
//! code.
//!
//! ## Invariants
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        Cart Invariants                              │
//! │                                                                     │
//! │  • Lines are unique by `code`; adding the same product again        │
//! │    increments its quantity                                          │
//! │  • Quantity is always ≥ 1; setting it to 0 removes the line         │
//! │  • Line subtotal = quantity × unit_price, recomputed on every       │
//! │    read, never stored                                               │
//! │  • Cart subtotal / tax / total are pure functions of the line set   │
//! │  • Insertion order is preserved (it is the receipt order)           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::catalog::ProductRecord;
use crate::error::{CoreError, CoreResult};
use crate::money::{Money, TaxRate};
use crate::{MAX_CART_LINES, MAX_LINE_QUANTITY};

// =============================================================================
// Cart Line
// =============================================================================

/// One line in the cart.
///
/// Name and price are frozen copies of the catalog record at scan time, so
/// the cart stays consistent even if the catalog changes underneath it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Barcode value - the line key, unique within a cart.
    pub code: String,

    /// Product name at scan time (frozen).
    pub name: String,

    /// Unit price in yen at scan time (frozen).
    pub unit_price: Money,

    /// Quantity in cart, always ≥ 1.
    pub quantity: i64,
}

impl CartLine {
    /// Creates a line from a catalog record with quantity 1.
    pub fn from_product(product: &ProductRecord) -> Self {
        CartLine {
            code: product.code.clone(),
            name: product.name.clone(),
            unit_price: Money::from_yen(product.price),
            quantity: 1,
        }
    }

    /// Line subtotal (unit price × quantity). Always recomputed.
    #[inline]
    pub fn subtotal(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The register-side shopping cart.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Adds a catalog product to the cart.
    ///
    /// If a line with the same code already exists its quantity is
    /// incremented; otherwise a new line is appended.
    pub fn add_product(&mut self, product: &ProductRecord) -> CoreResult<()> {
        if let Some(line) = self.lines.iter_mut().find(|l| l.code == product.code) {
            let new_qty = line.quantity + 1;
            if new_qty > MAX_LINE_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_LINE_QUANTITY,
                });
            }
            line.quantity = new_qty;
            return Ok(());
        }

        if self.lines.len() >= MAX_CART_LINES {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_LINES,
            });
        }

        self.lines.push(CartLine::from_product(product));
        Ok(())
    }

    /// Sets the quantity of a line.
    ///
    /// Quantity 0 (or less) removes the line, mirroring the register's
    /// minus button behavior.
    pub fn set_quantity(&mut self, code: &str, quantity: i64) -> CoreResult<()> {
        if quantity < 1 {
            return self.remove(code);
        }

        if quantity > MAX_LINE_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_LINE_QUANTITY,
            });
        }

        match self.lines.iter_mut().find(|l| l.code == code) {
            Some(line) => {
                line.quantity = quantity;
                Ok(())
            }
            None => Err(CoreError::LineNotFound(code.to_string())),
        }
    }

    /// Removes a line by code.
    pub fn remove(&mut self, code: &str) -> CoreResult<()> {
        let before = self.lines.len();
        self.lines.retain(|l| l.code != code);

        if self.lines.len() == before {
            Err(CoreError::LineNotFound(code.to_string()))
        } else {
            Ok(())
        }
    }

    /// Removes all lines.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// The lines in insertion (receipt) order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Subtotal before tax: Σ line subtotal.
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(|l| l.subtotal()).sum()
    }

    /// Consumption tax: `floor(subtotal × 10%)`.
    pub fn tax(&self) -> Money {
        self.subtotal().calculate_tax(TaxRate::consumption())
    }

    /// Grand total: subtotal + tax.
    pub fn total(&self) -> Money {
        self.subtotal() + self.tax()
    }
}

// =============================================================================
// Cart Totals
// =============================================================================

/// Totals summary for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    pub line_count: usize,
    pub total_quantity: i64,
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            line_count: cart.line_count(),
            total_quantity: cart.total_quantity(),
            subtotal: cart.subtotal(),
            tax: cart.tax(),
            total: cart.total(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Transaction Payload
//!
//! The immutable snapshot of a finished cart that travels between the two
//! devices inside the optical code.
//!
//! ## Ownership Across the Air Gap
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │   Register device              │              Tablet device         │
//! │                                │                                    │
//! │   Cart ──snapshot──▶ Payload ──┼──▶ QR image ──▶ Payload (rebuilt)  │
//! │                                │                                    │
//! │   The payload is produced once and never mutated. The tablet        │
//! │   reconstructs its own copy from the decoded text; there is no      │
//! │   shared memory between the devices.                                │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The struct here is the *canonical form*; the transport encoding (JSON →
//! base64 → QR) lives in `reji-codec`.

use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::money::{Money, TaxRate};

// =============================================================================
// Payload Item
// =============================================================================

/// One cart line frozen into the payload.
///
/// Unlike [`crate::cart::CartLine`], the subtotal IS stored here: the payload
/// is a wire snapshot, not live state, and the tablet displays exactly what
/// the register computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadItem {
    /// Barcode value.
    pub code: String,

    /// Product name at sale time.
    pub name: String,

    /// Unit price in whole yen.
    pub unit_price: i64,

    /// Quantity sold.
    pub quantity: i64,

    /// Line subtotal in whole yen (unit_price × quantity at snapshot time).
    pub subtotal: i64,
}

// =============================================================================
// Transaction Payload
// =============================================================================

/// The transaction carried from register to tablet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionPayload {
    /// Snapshot of the cart lines in receipt order.
    pub items: Vec<PayloadItem>,

    /// Tax-inclusive grand total in whole yen.
    pub total_amount: i64,
}

impl TransactionPayload {
    /// Snapshots a cart into a payload.
    pub fn from_cart(cart: &Cart) -> Self {
        let items = cart
            .lines()
            .iter()
            .map(|line| PayloadItem {
                code: line.code.clone(),
                name: line.name.clone(),
                unit_price: line.unit_price.yen(),
                quantity: line.quantity,
                subtotal: line.subtotal().yen(),
            })
            .collect();

        TransactionPayload {
            items,
            total_amount: cart.total().yen(),
        }
    }

    /// The tax-inclusive total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_yen(self.total_amount)
    }

    /// Pre-tax subtotal derived back out of the total:
    /// `floor(total / 1.1)`. See [`Money::strip_tax`] for the asymmetry note.
    pub fn derived_subtotal(&self) -> Money {
        self.total().strip_tax(TaxRate::consumption())
    }

    /// Tax portion derived back out of the total: `total - derived_subtotal`.
    pub fn derived_tax(&self) -> Money {
        self.total().included_tax(TaxRate::consumption())
    }

    /// Total quantity across all items (the "n items" figure next to the QR).
    pub fn item_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Structural validation applied after transport decode.
    ///
    /// Returns the violated constraint, or `None` when the payload is well
    /// formed: non-negative total, every quantity ≥ 1, no negative prices
    /// or subtotals.
    pub fn structural_error(&self) -> Option<&'static str> {
        if self.total_amount < 0 {
            return Some("total_amount must be non-negative");
        }
        for item in &self.items {
            if item.quantity < 1 {
                return Some("item quantity must be at least 1");
            }
            if item.unit_price < 0 {
                return Some("item unit_price must be non-negative");
            }
            if item.subtotal < 0 {
                return Some("item subtotal must be non-negative");
            }
        }
        None
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ProductRecord;

    fn tea_cart() -> Cart {
        let mut cart = Cart::new();
        cart.add_product(&ProductRecord {
            id: "PRD-1".into(),
            code: "4901234567894".into(),
            name: "茶".into(),
            price: 150,
        })
        .unwrap();
        cart.set_quantity("4901234567894", 2).unwrap();
        cart
    }

    #[test]
    fn test_snapshot_from_cart() {
        let payload = TransactionPayload::from_cart(&tea_cart());

        assert_eq!(payload.total_amount, 330);
        assert_eq!(payload.items.len(), 1);
        assert_eq!(payload.items[0].name, "茶");
        assert_eq!(payload.items[0].subtotal, 300);
        assert_eq!(payload.item_quantity(), 2);
    }

    #[test]
    fn test_snapshot_is_independent_of_cart() {
        let mut cart = tea_cart();
        let payload = TransactionPayload::from_cart(&cart);

        cart.set_quantity("4901234567894", 5).unwrap();

        // The snapshot keeps the totals from snapshot time.
        assert_eq!(payload.total_amount, 330);
        assert_eq!(payload.items[0].quantity, 2);
    }

    #[test]
    fn test_derived_split() {
        let payload = TransactionPayload {
            items: vec![],
            total_amount: 1100,
        };
        assert_eq!(payload.derived_subtotal().yen(), 1000);
        assert_eq!(payload.derived_tax().yen(), 100);
    }

    /// total_amount = 1 derives subtotal 0 / tax 1 - the documented
    /// rounding asymmetry of the reverse direction.
    #[test]
    fn test_derived_split_asymmetry() {
        let payload = TransactionPayload {
            items: vec![],
            total_amount: 1,
        };
        assert_eq!(payload.derived_subtotal().yen(), 0);
        assert_eq!(payload.derived_tax().yen(), 1);
    }

    #[test]
    fn test_empty_cart_payload() {
        let payload = TransactionPayload::from_cart(&Cart::new());
        assert!(payload.items.is_empty());
        assert_eq!(payload.total_amount, 0);
        assert!(payload.structural_error().is_none());
    }

    #[test]
    fn test_structural_validation() {
        let good = TransactionPayload::from_cart(&tea_cart());
        assert!(good.structural_error().is_none());

        let negative_total = TransactionPayload {
            items: vec![],
            total_amount: -1,
        };
        assert!(negative_total.structural_error().is_some());

        let zero_quantity = TransactionPayload {
            items: vec![PayloadItem {
                code: "1".into(),
                name: "a".into(),
                unit_price: 100,
                quantity: 0,
                subtotal: 0,
            }],
            total_amount: 0,
        };
        assert!(zero_quantity.structural_error().is_some());
    }
}

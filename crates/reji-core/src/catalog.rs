//! # Catalog Module
//!
//! Records returned by the external product catalog and the lookup seam the
//! surrounding application implements.
//!
//! The core treats the catalog as opaque: a lookup either yields a record or
//! nothing. Network transport, caching and retries all belong to the caller.

use serde::{Deserialize, Serialize};

// =============================================================================
// Records
// =============================================================================

/// A sellable product as returned by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Catalog identifier.
    pub id: String,

    /// Barcode value - the key the register scans.
    pub code: String,

    /// Display name (may contain non-ASCII text).
    pub name: String,

    /// Unit price in whole yen.
    pub price: i64,
}

/// EC warehouse stock information for a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EcStockRecord {
    /// Barcode value.
    pub code: String,

    /// Display name.
    pub name: String,

    /// Standard (list) price in whole yen.
    pub list_price: i64,

    /// Units available in the EC warehouse.
    pub stock_quantity: i64,
}

// =============================================================================
// Lookup Seam
// =============================================================================

/// Product lookup collaborator implemented by the surrounding application.
///
/// `None` means "not in the catalog" - the register surfaces this back into
/// the scan session as an external rejection, it is not an error.
pub trait ProductCatalog {
    /// Looks up a product by scanned barcode.
    fn lookup_product(&self, code: &str) -> Option<ProductRecord>;

    /// Looks up EC warehouse stock by scanned barcode.
    fn lookup_ec_stock(&self, code: &str) -> Option<EcStockRecord>;
}

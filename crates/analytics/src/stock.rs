use serde::{Deserialize, Serialize};

use shoplytics_catalog::Product;

/// Quantity at which a product counts as out of stock.
pub const OUT_OF_STOCK_QUANTITY: u64 = 0;

/// Products with fewer units than this (but more than none) are low on stock.
pub const LOW_STOCK_THRESHOLD: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StockStatus {
    #[serde(rename = "Out of Stock")]
    OutOfStock,
    #[serde(rename = "Low Stock")]
    LowStock,
    #[serde(rename = "In Stock")]
    InStock,
}

impl StockStatus {
    pub fn from_quantity(quantity: u64) -> Self {
        if quantity == OUT_OF_STOCK_QUANTITY {
            StockStatus::OutOfStock
        } else if quantity < LOW_STOCK_THRESHOLD {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StockStatus::OutOfStock => "Out of Stock",
            StockStatus::LowStock => "Low Stock",
            StockStatus::InStock => "In Stock",
        }
    }
}

impl core::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// A product annotated with its stock status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedProduct {
    #[serde(flatten)]
    pub product: Product,
    pub stock_status: StockStatus,
}

/// Annotate every product with its stock status, preserving input order.
pub fn classify_stock(products: &[Product]) -> Vec<ClassifiedProduct> {
    products
        .iter()
        .map(|p| ClassifiedProduct {
            product: p.clone(),
            stock_status: StockStatus::from_quantity(p.quantity),
        })
        .collect()
}

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use shoplytics_catalog::{Product, Sale};
use shoplytics_core::{ProductId, SaleId};

/// A sale joined with its product's name and current price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedSale {
    pub sale_id: SaleId,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u64,
    pub sold_at: DateTime<Utc>,
    /// Current unit price of the product, not the price at sale time.
    pub unit_price: u64,
    pub revenue: u64,
}

/// Inner-join sales onto products and compute revenue.
///
/// Sales whose product id does not resolve are dropped. Surviving sales keep
/// their input order.
pub fn aggregate_sales(sales: &[Sale], products: &[Product]) -> Vec<EnrichedSale> {
    let mut by_id: HashMap<&ProductId, &Product> = HashMap::with_capacity(products.len());
    for p in products {
        by_id.entry(&p.id).or_insert(p);
    }

    sales
        .iter()
        .filter_map(|sale| {
            let Some(product) = by_id.get(&sale.product_id) else {
                debug!(sale_id = %sale.id, product_id = %sale.product_id, "dropping sale for unknown product");
                return None;
            };
            Some(EnrichedSale {
                sale_id: sale.id.clone(),
                product_id: product.id.clone(),
                product_name: product.name.clone(),
                quantity: sale.quantity,
                sold_at: sale.sold_at,
                unit_price: product.unit_price,
                revenue: sale.quantity.saturating_mul(product.unit_price),
            })
        })
        .collect()
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shoplytics_core::{DomainError, DomainResult, Entity, ProductId, SaleId};

/// A recorded sale. Immutable once recorded.
///
/// `product_id` is not guaranteed to resolve: sales and products may be supplied
/// independently by an external store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    pub id: SaleId,
    pub product_id: ProductId,
    pub quantity: u64,
    pub sold_at: DateTime<Utc>,
}

impl Entity for Sale {
    type Id = SaleId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Command: record a sale against a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSale {
    pub product_id: ProductId,
    pub quantity: u64,
    pub sold_at: DateTime<Utc>,
}

impl RecordSale {
    pub fn new(product_id: ProductId, quantity: u64, sold_at: DateTime<Utc>) -> Self {
        Self {
            product_id,
            quantity,
            sold_at,
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.quantity == 0 {
            return Err(DomainError::validation("quantity sold must be at least 1"));
        }
        Ok(())
    }
}

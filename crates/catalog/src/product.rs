use serde::{Deserialize, Serialize};

use shoplytics_core::{DomainError, DomainResult, Entity, ProductId};

/// A product on the shop floor.
///
/// Prices are in the smallest currency unit (e.g., cents).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub unit_price: u64,
    pub quantity: u64,
}

impl Product {
    /// Build a product from a validated `NewProduct` command.
    pub fn create(id: ProductId, cmd: NewProduct) -> DomainResult<Self> {
        cmd.validate()?;
        Ok(Self {
            id,
            name: cmd.name.trim().to_string(),
            unit_price: cmd.unit_price,
            quantity: cmd.quantity,
        })
    }

    /// Remove `quantity` units from stock.
    ///
    /// Stock can never go negative; a sale larger than what is on hand is rejected
    /// and leaves the product untouched.
    pub fn sell(&mut self, quantity: u64) -> DomainResult<()> {
        if quantity == 0 {
            return Err(DomainError::validation("quantity sold must be at least 1"));
        }
        if quantity > self.quantity {
            return Err(DomainError::invariant(format!(
                "insufficient stock for {} (available: {}, requested: {quantity})",
                self.name, self.quantity
            )));
        }
        self.quantity -= quantity;
        Ok(())
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Command: add a product to the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    /// Price in smallest currency unit (e.g., cents). Must be positive.
    pub unit_price: u64,
    pub quantity: u64,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, unit_price: u64, quantity: u64) -> Self {
        Self {
            name: name.into(),
            unit_price,
            quantity,
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if self.unit_price == 0 {
            return Err(DomainError::validation("unit price must be positive"));
        }
        Ok(())
    }
}

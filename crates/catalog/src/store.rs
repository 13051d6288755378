use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use tracing::{debug, info};

use shoplytics_core::{DomainError, DomainResult, Entity, ProductId, SaleId};

use crate::product::{NewProduct, Product};
use crate::sale::{RecordSale, Sale};

/// Repository boundary for products and sales.
///
/// The analytics engine only needs the two list operations; the rest is the
/// CRUD surface of the shop (add a product, record a sale, search).
pub trait ShopStore: Send + Sync {
    fn list_products(&self) -> Vec<Product>;

    /// All sales, in no particular chronological order. May contain sales whose
    /// product no longer resolves.
    fn list_sales(&self) -> Vec<Sale>;

    fn get_product(&self, id: &ProductId) -> Option<Product>;

    fn add_product(&self, cmd: NewProduct) -> DomainResult<Product>;

    /// Record a sale and decrement the product's stock.
    fn record_sale(&self, cmd: RecordSale) -> DomainResult<Sale>;

    /// Case-insensitive substring search on product name.
    fn search_products(&self, query: &str) -> Vec<Product> {
        let needle = query.trim().to_lowercase();
        self.list_products()
            .into_iter()
            .filter(|p| needle.is_empty() || p.name.to_lowercase().contains(&needle))
            .collect()
    }
}

impl<S> ShopStore for Arc<S>
where
    S: ShopStore + ?Sized,
{
    fn list_products(&self) -> Vec<Product> {
        (**self).list_products()
    }

    fn list_sales(&self) -> Vec<Sale> {
        (**self).list_sales()
    }

    fn get_product(&self, id: &ProductId) -> Option<Product> {
        (**self).get_product(id)
    }

    fn add_product(&self, cmd: NewProduct) -> DomainResult<Product> {
        (**self).add_product(cmd)
    }

    fn record_sale(&self, cmd: RecordSale) -> DomainResult<Sale> {
        (**self).record_sale(cmd)
    }

    fn search_products(&self, query: &str) -> Vec<Product> {
        (**self).search_products(query)
    }
}

#[derive(Debug, Default)]
struct Tables {
    products: BTreeMap<ProductId, Product>,
    sales: Vec<Sale>,
}

/// In-memory store for tests/dev.
///
/// Products are listed in id order; sales in the order they were recorded.
#[derive(Debug, Default)]
pub struct InMemoryShopStore {
    inner: RwLock<Tables>,
}

impl InMemoryShopStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load already-existing records as-is.
    ///
    /// No referential checks are made: this mirrors an external store whose
    /// sales may point at products that are gone.
    pub fn seeded(products: Vec<Product>, sales: Vec<Sale>) -> DomainResult<Self> {
        let mut tables = Tables::default();
        for product in products {
            let id: ProductId = product.id().as_str().parse()?;
            if tables.products.insert(id.clone(), product).is_some() {
                return Err(DomainError::conflict(format!("duplicate product id {id}")));
            }
        }
        for sale in &sales {
            sale.id().as_str().parse::<SaleId>()?;
        }
        tables.sales = sales;
        debug!(
            products = tables.products.len(),
            sales = tables.sales.len(),
            "seeded in-memory shop store"
        );
        Ok(Self {
            inner: RwLock::new(tables),
        })
    }

    fn read(&self) -> DomainResult<std::sync::RwLockReadGuard<'_, Tables>> {
        self.inner
            .read()
            .map_err(|_| DomainError::invariant("shop store lock poisoned"))
    }

    fn write(&self) -> DomainResult<std::sync::RwLockWriteGuard<'_, Tables>> {
        self.inner
            .write()
            .map_err(|_| DomainError::invariant("shop store lock poisoned"))
    }
}

impl ShopStore for InMemoryShopStore {
    fn list_products(&self) -> Vec<Product> {
        match self.read() {
            Ok(t) => t.products.values().cloned().collect(),
            Err(_) => vec![],
        }
    }

    fn list_sales(&self) -> Vec<Sale> {
        match self.read() {
            Ok(t) => t.sales.clone(),
            Err(_) => vec![],
        }
    }

    fn get_product(&self, id: &ProductId) -> Option<Product> {
        self.read().ok()?.products.get(id).cloned()
    }

    fn add_product(&self, cmd: NewProduct) -> DomainResult<Product> {
        let product = Product::create(ProductId::generate(), cmd)?;
        let mut tables = self.write()?;
        if tables.products.contains_key(&product.id) {
            return Err(DomainError::conflict(format!("product {} already exists", product.id)));
        }
        tables.products.insert(product.id.clone(), product.clone());
        info!(product_id = %product.id, name = %product.name, "product added");
        Ok(product)
    }

    fn record_sale(&self, cmd: RecordSale) -> DomainResult<Sale> {
        cmd.validate()?;

        // Stock check and decrement happen under one write lock.
        let mut tables = self.write()?;
        let product = tables
            .products
            .get_mut(&cmd.product_id)
            .ok_or_else(|| DomainError::not_found(format!("product {}", cmd.product_id)))?;
        product.sell(cmd.quantity)?;
        let remaining = product.quantity;

        let sale = Sale {
            id: SaleId::generate(),
            product_id: cmd.product_id,
            quantity: cmd.quantity,
            sold_at: cmd.sold_at,
        };
        tables.sales.push(sale.clone());
        info!(
            sale_id = %sale.id(),
            product_id = %sale.product_id,
            quantity = sale.quantity,
            remaining,
            "sale recorded"
        );
        Ok(sale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn ts() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 10, 0, 0).unwrap()
    }

    #[test]
    fn add_product_assigns_id_and_lists() {
        let store = InMemoryShopStore::new();
        let product = store.add_product(NewProduct::new("Mug", 800, 12)).unwrap();
        assert!(!product.id.as_str().is_empty());
        assert_eq!(store.list_products(), vec![product.clone()]);
        assert_eq!(store.get_product(&product.id), Some(product));
    }

    #[test]
    fn add_product_propagates_validation() {
        let store = InMemoryShopStore::new();
        assert!(matches!(
            store.add_product(NewProduct::new("", 800, 12)),
            Err(DomainError::Validation(_))
        ));
        assert!(store.list_products().is_empty());
    }

    #[test]
    fn record_sale_decrements_stock() {
        let store = InMemoryShopStore::new();
        let product = store.add_product(NewProduct::new("Mug", 800, 12)).unwrap();
        let sale = store
            .record_sale(RecordSale::new(product.id.clone(), 5, ts()))
            .unwrap();
        assert_eq!(sale.quantity, 5);
        assert_eq!(sale.sold_at, ts());
        assert_eq!(store.get_product(&product.id).unwrap().quantity, 7);
        assert_eq!(store.list_sales(), vec![sale]);
    }

    #[test]
    fn record_sale_rejects_unknown_product() {
        let store = InMemoryShopStore::new();
        let err = store
            .record_sale(RecordSale::new(ProductId::from("ghost"), 1, ts()))
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(msg) if msg.contains("ghost")));
        assert!(store.list_sales().is_empty());
    }

    #[test]
    fn record_sale_rejects_insufficient_stock() {
        let store = InMemoryShopStore::new();
        let product = store.add_product(NewProduct::new("Mug", 800, 2)).unwrap();
        let err = store
            .record_sale(RecordSale::new(product.id.clone(), 3, ts()))
            .unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
        assert_eq!(store.get_product(&product.id).unwrap().quantity, 2);
        assert!(store.list_sales().is_empty());
    }

    #[test]
    fn record_sale_rejects_zero_quantity() {
        let store = InMemoryShopStore::new();
        let product = store.add_product(NewProduct::new("Mug", 800, 2)).unwrap();
        assert!(matches!(
            store.record_sale(RecordSale::new(product.id, 0, ts())),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let store = InMemoryShopStore::new();
        store.add_product(NewProduct::new("Green Tea", 300, 4)).unwrap();
        store.add_product(NewProduct::new("Black TEA", 350, 4)).unwrap();
        store.add_product(NewProduct::new("Espresso", 900, 4)).unwrap();

        let mut names: Vec<String> = store.search_products("tea").into_iter().map(|p| p.name).collect();
        names.sort();
        assert_eq!(names, vec!["Black TEA".to_string(), "Green Tea".to_string()]);
        assert_eq!(store.search_products("  ").len(), 3);
        assert!(store.search_products("latte").is_empty());
    }

    #[test]
    fn seeded_keeps_orphan_sales_and_rejects_duplicate_products() {
        let product = Product {
            id: ProductId::from("A"),
            name: "Apple".to_string(),
            unit_price: 100,
            quantity: 3,
        };
        let orphan = Sale {
            id: SaleId::from("s-1"),
            product_id: ProductId::from("missing"),
            quantity: 1,
            sold_at: ts(),
        };
        let store = InMemoryShopStore::seeded(vec![product.clone()], vec![orphan.clone()]).unwrap();
        assert_eq!(store.list_sales(), vec![orphan]);

        let err = InMemoryShopStore::seeded(vec![product.clone(), product], vec![]).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn seeded_rejects_blank_ids() {
        let blank_product = Product {
            id: ProductId::from("  "),
            name: "Apple".to_string(),
            unit_price: 100,
            quantity: 3,
        };
        let err = InMemoryShopStore::seeded(vec![blank_product], vec![]).unwrap_err();
        assert!(matches!(err, DomainError::InvalidId(msg) if msg.contains("ProductId")));

        let blank_sale = Sale {
            id: SaleId::from(""),
            product_id: ProductId::from("A"),
            quantity: 1,
            sold_at: ts(),
        };
        let err = InMemoryShopStore::seeded(vec![], vec![blank_sale]).unwrap_err();
        assert!(matches!(err, DomainError::InvalidId(msg) if msg.contains("SaleId")));
    }

    #[test]
    fn arc_store_delegates() {
        let store = Arc::new(InMemoryShopStore::new());
        let product = store.add_product(NewProduct::new("Mug", 800, 1)).unwrap();
        let shared: Arc<InMemoryShopStore> = Arc::clone(&store);
        assert_eq!(ShopStore::list_products(&shared), vec![product]);
    }
}

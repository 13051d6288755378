//! Shop catalog: products, sales and the store they live in.
//!
//! Records here are plain data; the only business rules are input validation
//! and the no-oversell check when a sale is recorded.

pub mod product;
pub mod sale;
pub mod store;

pub use product::{NewProduct, Product};
pub use sale::{RecordSale, Sale};
pub use store::{InMemoryShopStore, ShopStore};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use shoplytics_catalog::{InMemoryShopStore, Product, Sale, ShopStore};

use crate::config::AnalyticsConfig;
use crate::error::AnalyticsError;
use crate::insights::{InsightReport, compose_insights_with};
use crate::sales::{EnrichedSale, aggregate_sales};
use crate::stock::{ClassifiedProduct, classify_stock};
use crate::weekly::{WeeklyBucket, weekly_rollup};

/// Runs the analytics pipeline over whatever the store currently holds.
///
/// The engine keeps no state of its own: each call reads fresh collections from
/// the store and derives its results from them. Reference time is always passed
/// in by the caller.
#[derive(Debug, Clone)]
pub struct AnalyticsEngine<S> {
    store: S,
    config: AnalyticsConfig,
}

impl<S: ShopStore> AnalyticsEngine<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            config: AnalyticsConfig::default(),
        }
    }

    pub fn with_config(store: S, config: AnalyticsConfig) -> Result<Self, AnalyticsError> {
        config.validate()?;
        Ok(Self { store, config })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Products with their stock status.
    pub fn classified_products(&self) -> Vec<ClassifiedProduct> {
        classify_stock(&self.store.list_products())
    }

    /// Sales joined with products; orphan sales are dropped and logged.
    pub fn enriched_sales(&self) -> Vec<EnrichedSale> {
        let products = self.store.list_products();
        self.enrich(&products)
    }

    pub fn weekly_sales(&self) -> Vec<WeeklyBucket> {
        weekly_rollup(&self.enriched_sales())
    }

    /// Full insight report as of `now`.
    pub fn report(&self, now: DateTime<Utc>) -> InsightReport {
        let products = self.store.list_products();
        let classified = classify_stock(&products);
        let enriched = self.enrich(&products);
        let weekly = weekly_rollup(&enriched);

        let report = compose_insights_with(&classified, &enriched, &weekly, now, &self.config);

        info!(
            products = classified.len(),
            sales = enriched.len(),
            weeks = weekly.len(),
            low_stock = report.low_stock.len(),
            "insight report composed"
        );
        report
    }

    fn enrich(&self, products: &[Product]) -> Vec<EnrichedSale> {
        let sales = self.store.list_sales();
        let enriched = aggregate_sales(&sales, products);
        let dropped = sales.len() - enriched.len();
        if dropped > 0 {
            warn!(dropped, "sales reference unknown products and were skipped");
        }
        debug!(total = sales.len(), kept = enriched.len(), "sales aggregated");
        enriched
    }
}

impl AnalyticsEngine<InMemoryShopStore> {
    /// Engine over records fetched elsewhere (files, another database).
    ///
    /// Records that cannot form a store (duplicate or blank ids) surface as
    /// [`AnalyticsError::Store`].
    pub fn from_records(
        products: Vec<Product>,
        sales: Vec<Sale>,
        config: AnalyticsConfig,
    ) -> Result<Self, AnalyticsError> {
        config.validate()?;
        let store = InMemoryShopStore::seeded(products, sales)?;
        Ok(Self { store, config })
    }
}

//! `shoplytics-analytics`
//!
//! **Responsibility:** derive shop insights from product and sale history.
//!
//! - Pure functions over already-fetched collections; no I/O, no clock reads.
//! - Four stages: stock classification, sale aggregation, weekly rollup,
//!   insight composition.
//! - [`AnalyticsEngine`] wires the stages to a [`shoplytics_catalog::ShopStore`].

pub mod config;
pub mod engine;
pub mod error;
pub mod insights;
pub mod sales;
pub mod stock;
pub mod weekly;

pub use config::AnalyticsConfig;
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use insights::{
    InsightReport, LowStockAlert, RestockRecommendation, RestockUrgency, RevenueShare, TopProduct,
    compose_insights, compose_insights_with,
};
pub use sales::{EnrichedSale, aggregate_sales};
pub use stock::{ClassifiedProduct, StockStatus, classify_stock};
pub use weekly::{Trend, WeeklyBucket, weekly_rollup};

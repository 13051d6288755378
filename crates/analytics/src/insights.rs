use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use shoplytics_core::ProductId;

use crate::config::AnalyticsConfig;
use crate::sales::EnrichedSale;
use crate::stock::{ClassifiedProduct, LOW_STOCK_THRESHOLD, StockStatus};
use crate::weekly::WeeklyBucket;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopProduct {
    pub name: String,
    pub quantity: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LowStockAlert {
    pub name: String,
    pub quantity: u64,
    pub stock_status: StockStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueShare {
    pub name: String,
    pub revenue: u64,
    /// Share of total revenue, in percent.
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RestockUrgency {
    Urgent,
    Moderate,
    Low,
}

impl RestockUrgency {
    /// `None` means stock is not being depleted at all.
    pub fn from_days(days_to_depletion: Option<f64>, config: &AnalyticsConfig) -> Self {
        match days_to_depletion {
            Some(days) if days < f64::from(config.urgent_days) => RestockUrgency::Urgent,
            Some(days) if days < f64::from(config.moderate_days) => RestockUrgency::Moderate,
            _ => RestockUrgency::Low,
        }
    }
}

impl core::fmt::Display for RestockUrgency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            RestockUrgency::Urgent => "Urgent",
            RestockUrgency::Moderate => "Moderate",
            RestockUrgency::Low => "Low",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestockRecommendation {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u64,
    /// Average units sold per day over the velocity window.
    pub velocity: f64,
    /// `None` when nothing sold in the window.
    pub days_to_depletion: Option<f64>,
    pub urgency: RestockUrgency,
}

/// Everything the insights page shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightReport {
    pub top_products: Vec<TopProduct>,
    pub low_stock: Vec<LowStockAlert>,
    pub weekly_trend: Vec<WeeklyBucket>,
    pub revenue_contribution: Vec<RevenueShare>,
    pub restock_recommendations: Vec<RestockRecommendation>,
}

/// Compose all insight views with the default shop policy.
pub fn compose_insights(
    products: &[ClassifiedProduct],
    sales: &[EnrichedSale],
    weekly: &[WeeklyBucket],
    now: DateTime<Utc>,
) -> InsightReport {
    compose_insights_with(products, sales, weekly, now, &AnalyticsConfig::default())
}

/// Compose all insight views with an explicit [`AnalyticsConfig`].
pub fn compose_insights_with(
    products: &[ClassifiedProduct],
    sales: &[EnrichedSale],
    weekly: &[WeeklyBucket],
    now: DateTime<Utc>,
    config: &AnalyticsConfig,
) -> InsightReport {
    InsightReport {
        top_products: top_products(sales, config.top_products),
        low_stock: low_stock(products),
        weekly_trend: weekly.to_vec(),
        revenue_contribution: revenue_contribution(sales),
        restock_recommendations: restock_recommendations(products, sales, now, config),
    }
}

/// Best sellers by units, grouped by product name.
///
/// Ties are broken by name ascending.
pub fn top_products(sales: &[EnrichedSale], limit: usize) -> Vec<TopProduct> {
    let mut totals: Vec<TopProduct> = sum_by_name(sales, |s| s.quantity)
        .into_iter()
        .map(|(name, quantity)| TopProduct { name, quantity })
        .collect();
    // Stable sort over name-ordered input keeps equal quantities in name order.
    totals.sort_by(|a, b| b.quantity.cmp(&a.quantity));
    totals.truncate(limit);
    totals
}

/// Products with fewer than [`LOW_STOCK_THRESHOLD`] units, in input order.
pub fn low_stock(products: &[ClassifiedProduct]) -> Vec<LowStockAlert> {
    products
        .iter()
        .filter(|c| c.product.quantity < LOW_STOCK_THRESHOLD)
        .map(|c| LowStockAlert {
            name: c.product.name.clone(),
            quantity: c.product.quantity,
            stock_status: c.stock_status,
        })
        .collect()
}

/// Percentage of total revenue per product name, ordered by name.
///
/// Empty when there is no revenue at all.
pub fn revenue_contribution(sales: &[EnrichedSale]) -> Vec<RevenueShare> {
    let by_name = sum_by_name(sales, |s| s.revenue);
    let total: u64 = by_name.values().fold(0u64, |acc, r| acc.saturating_add(*r));
    if total == 0 {
        return Vec::new();
    }

    by_name
        .into_iter()
        .map(|(name, revenue)| RevenueShare {
            name,
            revenue,
            percentage: revenue as f64 / total as f64 * 100.0,
        })
        .collect()
}

/// Restock urgency for every product, in product input order.
///
/// Velocity counts sales with `now - window <= sold_at <= now`.
pub fn restock_recommendations(
    products: &[ClassifiedProduct],
    sales: &[EnrichedSale],
    now: DateTime<Utc>,
    config: &AnalyticsConfig,
) -> Vec<RestockRecommendation> {
    // A window reaching past the earliest representable instant covers everything.
    let window_start = now
        .checked_sub_signed(Duration::days(i64::from(config.velocity_window_days)))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);

    let mut recent: HashMap<&ProductId, u64> = HashMap::new();
    for sale in sales
        .iter()
        .filter(|s| s.sold_at >= window_start && s.sold_at <= now)
    {
        let units = recent.entry(&sale.product_id).or_insert(0);
        *units = units.saturating_add(sale.quantity);
    }

    let window = f64::from(config.velocity_window_days);

    products
        .iter()
        .map(|c| {
            let p = &c.product;
            let sold = recent.get(&p.id).copied().unwrap_or(0);
            let velocity = sold as f64 / window;
            let days_to_depletion = if velocity > 0.0 {
                Some(p.quantity as f64 / velocity)
            } else {
                None
            };
            RestockRecommendation {
                product_id: p.id.clone(),
                name: p.name.clone(),
                quantity: p.quantity,
                velocity,
                days_to_depletion,
                urgency: RestockUrgency::from_days(days_to_depletion, config),
            }
        })
        .collect()
}

fn sum_by_name<F>(sales: &[EnrichedSale], value: F) -> BTreeMap<String, u64>
where
    F: Fn(&EnrichedSale) -> u64,
{
    let mut totals: BTreeMap<String, u64> = BTreeMap::new();
    for sale in sales {
        let entry = totals.entry(sale.product_name.clone()).or_insert(0);
        *entry = entry.saturating_add(value(sale));
    }
    totals
}

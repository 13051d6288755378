use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::sales::EnrichedSale;

/// Week-over-week direction of units sold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
    #[serde(rename = "Insufficient Data")]
    InsufficientData,
}

impl Trend {
    pub fn label(&self) -> &'static str {
        match self {
            Trend::Increasing => "Increasing",
            Trend::Decreasing => "Decreasing",
            Trend::Stable => "Stable",
            Trend::InsufficientData => "Insufficient Data",
        }
    }

    fn between(previous: u64, current: u64) -> Self {
        match current.cmp(&previous) {
            core::cmp::Ordering::Greater => Trend::Increasing,
            core::cmp::Ordering::Less => Trend::Decreasing,
            core::cmp::Ordering::Equal => Trend::Stable,
        }
    }
}

impl core::fmt::Display for Trend {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// Sales totals for one ISO-8601 week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyBucket {
    /// ISO week-numbering year (may differ from the calendar year around New Year).
    pub year: i32,
    pub week: u32,
    pub quantity: u64,
    pub revenue: u64,
    /// Date of the earliest sale in the week, `YYYY-MM-DD`.
    pub week_start: String,
    pub trend: Trend,
}

struct WeekTotals {
    quantity: u64,
    revenue: u64,
    earliest: DateTime<Utc>,
}

/// Bucket sales by ISO week, ordered by (year, week) ascending.
///
/// With fewer than two buckets every trend is `InsufficientData`. Otherwise each
/// bucket is compared with its predecessor; the first bucket has none and is
/// reported as `Stable`.
pub fn weekly_rollup(sales: &[EnrichedSale]) -> Vec<WeeklyBucket> {
    let mut weeks: BTreeMap<(i32, u32), WeekTotals> = BTreeMap::new();

    for sale in sales {
        let iso = sale.sold_at.date_naive().iso_week();
        let totals = weeks.entry((iso.year(), iso.week())).or_insert(WeekTotals {
            quantity: 0,
            revenue: 0,
            earliest: sale.sold_at,
        });
        totals.quantity = totals.quantity.saturating_add(sale.quantity);
        totals.revenue = totals.revenue.saturating_add(sale.revenue);
        if sale.sold_at < totals.earliest {
            totals.earliest = sale.sold_at;
        }
    }

    let insufficient = weeks.len() < 2;
    let mut previous: Option<u64> = None;

    weeks
        .into_iter()
        .map(|((year, week), totals)| {
            let trend = if insufficient {
                Trend::InsufficientData
            } else {
                previous.map_or(Trend::Stable, |prev| Trend::between(prev, totals.quantity))
            };
            previous = Some(totals.quantity);
            WeeklyBucket {
                year,
                week,
                quantity: totals.quantity,
                revenue: totals.revenue,
                week_start: totals.earliest.format("%Y-%m-%d").to_string(),
                trend,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;
    use shoplytics_core::{ProductId, SaleId};

    fn sale_at(n: usize, quantity: u64, at: DateTime<Utc>) -> EnrichedSale {
        EnrichedSale {
            sale_id: SaleId::from(format!("s{n}")),
            product_id: ProductId::from("A"),
            product_name: "Apple".to_string(),
            quantity,
            sold_at: at,
            unit_price: 10,
            revenue: quantity * 10,
        }
    }

    fn ymd(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 9, 30, 0).unwrap()
    }

    #[test]
    fn empty_input_gives_no_buckets() {
        assert!(weekly_rollup(&[]).is_empty());
    }

    #[test]
    fn year_boundary_follows_iso_weeks() {
        // 2024-12-23 is in 2024-W52; 2024-12-31 is a Tuesday in 2025-W01.
        let sales = [sale_at(0, 5, ymd(2024, 12, 31)), sale_at(1, 3, ymd(2024, 12, 23))];
        let buckets = weekly_rollup(&sales);

        assert_eq!(buckets.len(), 2);
        assert_eq!((buckets[0].year, buckets[0].week), (2024, 52));
        assert_eq!(buckets[0].quantity, 3);
        assert_eq!((buckets[1].year, buckets[1].week), (2025, 1));
        assert_eq!(buckets[1].quantity, 5);
        assert_eq!(buckets[1].week_start, "2024-12-31");
        assert_eq!(buckets[1].trend, Trend::Increasing);
    }

    #[test]
    fn single_bucket_is_insufficient_data() {
        // Two sales in the same week: still one bucket, so the fallback applies
        // even though a per-bucket comparison would say "Stable".
        let sales = [sale_at(0, 2, ymd(2025, 3, 4)), sale_at(1, 1, ymd(2025, 3, 6))];
        let buckets = weekly_rollup(&sales);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].trend, Trend::InsufficientData);
        assert_eq!(buckets[0].quantity, 3);
        assert_eq!(buckets[0].revenue, 30);
    }

    #[test]
    fn trend_compares_with_immediate_predecessor() {
        let sales = [
            sale_at(0, 4, ymd(2025, 3, 3)),
            sale_at(1, 4, ymd(2025, 3, 10)),
            sale_at(2, 1, ymd(2025, 3, 17)),
            sale_at(3, 9, ymd(2025, 3, 24)),
        ];
        let trends: Vec<Trend> = weekly_rollup(&sales).iter().map(|b| b.trend).collect();
        assert_eq!(
            trends,
            vec![Trend::Stable, Trend::Stable, Trend::Decreasing, Trend::Increasing]
        );
    }

    #[test]
    fn gaps_between_weeks_compare_with_previous_bucket() {
        // No sales in the weeks between: the comparison is bucket to bucket.
        let sales = [sale_at(0, 6, ymd(2025, 1, 6)), sale_at(1, 2, ymd(2025, 4, 7))];
        let buckets = weekly_rollup(&sales);
        assert_eq!(buckets[1].trend, Trend::Decreasing);
    }

    #[test]
    fn week_start_is_earliest_sale_regardless_of_input_order() {
        let sales = [
            sale_at(0, 1, ymd(2025, 3, 7)),
            sale_at(1, 1, ymd(2025, 3, 5)),
            sale_at(2, 1, ymd(2025, 3, 6)),
        ];
        assert_eq!(weekly_rollup(&sales)[0].week_start, "2025-03-05");
    }

    proptest! {
        /// Property: buckets are strictly ascending and conserve quantities.
        #[test]
        fn buckets_sorted_unique_and_conserving(
            rows in prop::collection::vec((0i64..800, 1u64..20), 0..60)
        ) {
            let base = ymd(2023, 11, 1);
            let sales: Vec<EnrichedSale> = rows
                .iter()
                .enumerate()
                .map(|(n, (days, q))| sale_at(n, *q, base + Duration::days(*days)))
                .collect();

            let buckets = weekly_rollup(&sales);
            for pair in buckets.windows(2) {
                prop_assert!((pair[0].year, pair[0].week) < (pair[1].year, pair[1].week));
            }

            let total: u64 = rows.iter().map(|(_, q)| q).sum();
            prop_assert_eq!(buckets.iter().map(|b| b.quantity).sum::<u64>(), total);

            if buckets.len() < 2 {
                prop_assert!(buckets.iter().all(|b| b.trend == Trend::InsufficientData));
            } else {
                for pair in buckets.windows(2) {
                    let expected = Trend::between(pair[0].quantity, pair[1].quantity);
                    prop_assert_eq!(pair[1].trend, expected);
                }
            }
        }
    }
}

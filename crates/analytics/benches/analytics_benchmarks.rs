use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::{Duration, TimeZone, Utc};
use shoplytics_analytics::{aggregate_sales, classify_stock, compose_insights, weekly_rollup};
use shoplytics_catalog::{Product, Sale};
use shoplytics_core::{ProductId, SaleId};

fn fixture(products: usize, sales: usize) -> (Vec<Product>, Vec<Sale>) {
    let catalog: Vec<Product> = (0..products)
        .map(|i| Product {
            id: ProductId::from(format!("p{i}")),
            name: format!("Product {i}"),
            unit_price: 100 + (i as u64 % 50),
            quantity: (i as u64 * 7) % 40,
        })
        .collect();

    let base = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
    let history: Vec<Sale> = (0..sales)
        .map(|n| Sale {
            id: SaleId::from(format!("s{n}")),
            // Every 50th sale points at a product that does not exist.
            product_id: if n % 50 == 0 {
                ProductId::from("missing")
            } else {
                ProductId::from(format!("p{}", n % products))
            },
            quantity: 1 + (n as u64 % 5),
            sold_at: base + Duration::hours((n as i64 * 37) % (24 * 365)),
        })
        .collect();

    (catalog, history)
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    let now = Utc.with_ymd_and_hms(2024, 12, 31, 23, 0, 0).unwrap();

    for &sales in &[1_000usize, 10_000, 100_000] {
        let (products, history) = fixture(200, sales);
        group.throughput(Throughput::Elements(sales as u64));

        group.bench_with_input(BenchmarkId::new("aggregate_sales", sales), &sales, |b, _| {
            b.iter(|| aggregate_sales(black_box(&history), black_box(&products)));
        });

        let enriched = aggregate_sales(&history, &products);
        group.bench_with_input(BenchmarkId::new("weekly_rollup", sales), &sales, |b, _| {
            b.iter(|| weekly_rollup(black_box(&enriched)));
        });

        let classified = classify_stock(&products);
        let weekly = weekly_rollup(&enriched);
        group.bench_with_input(BenchmarkId::new("compose_insights", sales), &sales, |b, _| {
            b.iter(|| compose_insights(black_box(&classified), black_box(&enriched), black_box(&weekly), now));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);

//! Offline insight report: load products and sales from JSON files, print the
//! insight report as JSON.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use chrono::{DateTime, Utc};
use tracing::info;

use shoplytics_analytics::{AnalyticsConfig, AnalyticsEngine, InsightReport};
use shoplytics_catalog::{InMemoryShopStore, Product, Sale};

pub const USAGE: &str = "usage: shoplytics-report <products.json> <sales.json> [--now <RFC3339>]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportArgs {
    pub products: PathBuf,
    pub sales: PathBuf,
    /// Reference time; `None` means "now" at the edge of the program.
    pub now: Option<DateTime<Utc>>,
}

impl ReportArgs {
    pub fn parse<I>(args: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut positional = Vec::new();
        let mut now = None;
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            if arg == "--now" {
                let raw = args.next().context("--now needs a value")?;
                let ts = DateTime::parse_from_rfc3339(&raw)
                    .with_context(|| format!("invalid --now timestamp {raw:?}"))?;
                now = Some(ts.with_timezone(&Utc));
            } else if arg.starts_with("--") {
                bail!("unknown option {arg}\n{USAGE}");
            } else {
                positional.push(PathBuf::from(arg));
            }
        }

        let [products, sales]: [PathBuf; 2] = positional
            .try_into()
            .map_err(|_| anyhow::anyhow!("expected two input files\n{USAGE}"))?;

        Ok(Self {
            products,
            sales,
            now,
        })
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

/// Load both files and build an engine over them.
pub fn load_engine(
    products: &Path,
    sales: &Path,
    config: AnalyticsConfig,
) -> anyhow::Result<AnalyticsEngine<InMemoryShopStore>> {
    let products: Vec<Product> = read_json(products)?;
    let sales: Vec<Sale> = read_json(sales)?;
    info!(products = products.len(), sales = sales.len(), "loaded shop records");
    AnalyticsEngine::from_records(products, sales, config).context("building shop store")
}

pub fn run(args: &ReportArgs, config: AnalyticsConfig, now: DateTime<Utc>) -> anyhow::Result<InsightReport> {
    let engine = load_engine(&args.products, &args.sales, config)?;
    Ok(engine.report(args.now.unwrap_or(now)))
}

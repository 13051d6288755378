use std::process::ExitCode;

use chrono::Utc;

use shoplytics_analytics::AnalyticsConfig;
use shoplytics_report::{ReportArgs, run};

fn main() -> ExitCode {
    shoplytics_observability::init();

    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "report failed");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn try_main() -> anyhow::Result<()> {
    let args = ReportArgs::parse(std::env::args().skip(1))?;
    let config = AnalyticsConfig::from_env()?;
    let report = run(&args, config, Utc::now())?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

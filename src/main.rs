use anyhow::{Context, Result};
use serde_json::json;
use statscrape::{
    config::ScrapeConfig,
    fetch::HttpFetcher,
    pipeline::{run_catalog, run_emissions},
    report::{CatalogReport, EmissionsReport},
};
use std::env;
use tokio::time::Instant;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,statscrape=info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .init();
    info!("startup");

    // ─── 2) load config ──────────────────────────────────────────────
    let cfg = match env::args().nth(1) {
        Some(path) => ScrapeConfig::load(&path)?,
        None => ScrapeConfig::default(),
    };
    let fetcher = HttpFetcher::new(&cfg.http).context("building http client")?;

    // ─── 3) emissions table ──────────────────────────────────────────
    let start = Instant::now();
    let emissions = run_emissions(&fetcher, &cfg.emissions)
        .await
        .with_context(|| format!("emissions run against {}", cfg.emissions.url))?;
    let emissions_report = EmissionsReport::build(&emissions)?;
    info!(elapsed = ?start.elapsed(), records = emissions.len(), "emissions done");

    // ─── 4) paginated catalogue ──────────────────────────────────────
    let start = Instant::now();
    let catalog = run_catalog(&fetcher, &cfg.catalog, cfg.http.max_concurrency)
        .await
        .with_context(|| format!("catalog run against {}", cfg.catalog.url_template))?;
    let catalog_report = CatalogReport::build(&catalog)?;
    info!(elapsed = ?start.elapsed(), records = catalog.len(), "catalog done");

    // ─── 5) hand off to the chart side ───────────────────────────────
    let out = json!({
        "emissions": { "dataset": emissions, "report": emissions_report },
        "catalog": { "dataset": catalog, "report": catalog_report },
    });
    println!("{}", serde_json::to_string_pretty(&out)?);

    info!("all done");
    Ok(())
}

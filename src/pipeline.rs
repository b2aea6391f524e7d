// src/pipeline.rs

//! fetch → extract → normalize, for each of the two sources.
//! Stage errors abort the run; row-level problems only show up in drop counts.

use tracing::{info, instrument};
use url::Url;

use crate::config::{CatalogConfig, EmissionsConfig};
use crate::error::PipelineError;
use crate::extract::{extract_listing, extract_table, Extraction};
use crate::fetch::{fetch_all, Fetcher};
use crate::normalize::{normalize, CatalogColumns, CatalogRecord, Dataset, EmissionRecord};

/// Scrape the single emissions table.
#[instrument(level = "info", skip_all, fields(url = %cfg.url))]
pub async fn run_emissions<F: Fetcher>(
    fetcher: &F,
    cfg: &EmissionsConfig,
) -> Result<Dataset<EmissionRecord>, PipelineError> {
    let url = Url::parse(&cfg.url).map_err(|_| PipelineError::InvalidUrl {
        url: cfg.url.clone(),
    })?;
    let markup = fetcher.fetch(&url).await?;
    let extraction = extract_table(&markup)?;
    let ds: Dataset<EmissionRecord> =
        normalize(&cfg.columns, &extraction.schema, &extraction.rows);

    info!(
        records = ds.len(),
        malformed_rows = extraction.dropped,
        rejected_rows = ds.dropped(),
        "emissions dataset ready"
    );
    Ok(ds)
}

/// Scrape every catalogue page and concatenate them in page order.
#[instrument(level = "info", skip_all, fields(pages = cfg.page_count))]
pub async fn run_catalog<F: Fetcher>(
    fetcher: &F,
    cfg: &CatalogConfig,
    concurrency: usize,
) -> Result<Dataset<CatalogRecord>, PipelineError> {
    let pages = fetch_all(fetcher, &cfg.url_template, cfg.page_count, concurrency).await?;

    let extraction = pages
        .iter()
        .map(|markup| extract_listing(markup, &cfg.layout))
        .try_fold(Extraction::empty(cfg.layout.schema()), |acc, page| {
            page.map(|p| acc.concat(p))
        })?;
    let ds: Dataset<CatalogRecord> =
        normalize(&CatalogColumns, &extraction.schema, &extraction.rows);

    info!(
        records = ds.len(),
        malformed_rows = extraction.dropped,
        rejected_rows = ds.dropped(),
        "catalog dataset ready"
    );
    Ok(ds)
}

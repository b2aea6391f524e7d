// src/fetch/mod.rs

pub mod http;

pub use http::HttpFetcher;

use futures::{stream, StreamExt, TryStreamExt};
use tracing::{debug, instrument};
use url::Url;

use crate::config::page_url;
use crate::error::PipelineError;

/// Fetch-by-URL capability returning raw markup.
#[allow(async_fn_in_trait)]
pub trait Fetcher {
    async fn fetch(&self, url: &Url) -> Result<String, PipelineError>;
}

/// Fetch pages `1..=page_count` of a `{page}` template.
///
/// Up to `concurrency` requests are in flight at once, but the result is always
/// in page-index order. The first failing page aborts the whole fetch.
#[instrument(level = "info", skip(fetcher))]
pub async fn fetch_all<F: Fetcher>(
    fetcher: &F,
    template: &str,
    page_count: usize,
    concurrency: usize,
) -> Result<Vec<String>, PipelineError> {
    let urls = (1..=page_count)
        .map(|page| page_url(template, page))
        .collect::<Result<Vec<Url>, _>>()?;

    let pages: Vec<String> = stream::iter(urls.iter())
        .map(|url| async move {
            let body = fetcher.fetch(url).await?;
            debug!(%url, bytes = body.len(), "fetched page");
            Ok::<_, PipelineError>(body)
        })
        .buffered(concurrency.max(1))
        .try_collect()
        .await?;

    Ok(pages)
}

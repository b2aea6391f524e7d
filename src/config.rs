// src/config.rs

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};
use url::Url;

use crate::error::PipelineError;
use crate::extract::{FieldRule, FieldScope, FieldSource, ListingLayout};

const PAGE_PLACEHOLDER: &str = "{page}";

/// Top-level run configuration. Every section falls back to the public sites.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    pub http: HttpConfig,
    pub emissions: EmissionsConfig,
    pub catalog: CatalogConfig,
}

impl ScrapeConfig {
    /// Read a YAML config. Missing keys keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text =
            fs::read_to_string(path).with_context(|| format!("reading config {:?}", path))?;
        let cfg = serde_yaml::from_str(&text)
            .with_context(|| format!("parsing config {:?}", path))?;
        Ok(cfg)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,
    /// `None` leaves the transport's own default in place.
    pub timeout_secs: Option<u64>,
    pub max_concurrency: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("statscrape/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: None,
            max_concurrency: 4,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmissionsConfig {
    pub url: String,
    pub columns: EmissionsColumns,
}

impl Default for EmissionsConfig {
    fn default() -> Self {
        Self {
            url: "https://www.worldometers.info/co2-emissions/us-co2-emissions/".to_string(),
            columns: EmissionsColumns::default(),
        }
    }
}

/// Header needles: the first header containing the needle (case-insensitive) is used.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EmissionsColumns {
    pub year: String,
    pub emissions: String,
}

impl Default for EmissionsColumns {
    fn default() -> Self {
        Self {
            year: "year".to_string(),
            emissions: "emissions".to_string(),
        }
    }
}

/// Defaults to the site-wide catalogue. Its pages all carry the heading
/// "All products", so every record gets that `category` and a per-category
/// breakdown collapses to one bucket. Point `url_template` at a category listing
/// (e.g. `.../catalogue/category/books/mystery_3/page-{page}.html`) to get
/// meaningful categories.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Page URL with a `{page}` placeholder, pages are numbered from 1.
    pub url_template: String,
    pub page_count: usize,
    pub layout: ListingLayout,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url_template: "https://books.toscrape.com/catalogue/page-{page}.html".to_string(),
            page_count: 5,
            layout: ListingLayout::default(),
        }
    }
}

impl Default for ListingLayout {
    fn default() -> Self {
        let item = |name: &str, selector: &str, source: FieldSource| FieldRule {
            name: name.to_string(),
            selector: selector.to_string(),
            source,
            scope: FieldScope::Item,
        };
        Self {
            container_selector: "ol.row".to_string(),
            item_selector: "article.product_pod".to_string(),
            fields: vec![
                item("title", "h3 a", FieldSource::Attr("title".to_string())),
                item("price", "p.price_color", FieldSource::Text),
                item("availability", "p.availability", FieldSource::Text),
                item(
                    "rating",
                    "p.star-rating",
                    FieldSource::ClassToken {
                        skip: "star-rating".to_string(),
                    },
                ),
                FieldRule {
                    name: "category".to_string(),
                    selector: "div.page-header h1".to_string(),
                    source: FieldSource::Text,
                    scope: FieldScope::Page,
                },
            ],
        }
    }
}

/// Substitute a 1-based page index into a `{page}` template.
pub fn page_url(template: &str, page: usize) -> Result<Url, PipelineError> {
    if !template.contains(PAGE_PLACEHOLDER) {
        return Err(PipelineError::InvalidUrl {
            url: template.to_string(),
        });
    }
    let raw = template.replace(PAGE_PLACEHOLDER, &page.to_string());
    Url::parse(&raw).map_err(|_| PipelineError::InvalidUrl { url: raw })
}

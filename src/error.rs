// src/error.rs

use thiserror::Error;

/// Stage-level failures. Any of these aborts the pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The network call did not complete or returned a non-success status.
    #[error("fetching {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The expected table or item container is absent from the page.
    #[error("structure not found: {what}")]
    StructureNotFound { what: String },

    /// The aggregate is undefined over zero records.
    #[error("{query} is undefined over an empty dataset")]
    EmptyDataset { query: &'static str },

    #[error("invalid url: {url}")]
    InvalidUrl { url: String },
}

impl PipelineError {
    pub fn transport(
        url: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Transport {
            url: url.into(),
            source: source.into(),
        }
    }

    pub(crate) fn structure(what: impl Into<String>) -> Self {
        Self::StructureNotFound { what: what.into() }
    }
}

/// Row-level coercion failure. Absorbed by the normalizer, never surfaced per row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoerceError {
    #[error("missing column matching {0:?}")]
    MissingColumn(String),

    #[error("not a number: {0:?}")]
    NotANumber(String),

    #[error("no price in {0:?}")]
    NotAPrice(String),

    #[error("unrecognised rating {0:?}")]
    BadRating(String),

    #[error("unrecognised availability {0:?}")]
    BadAvailability(String),

    #[error("empty field {0:?}")]
    Empty(&'static str),
}

// src/extract/mod.rs

//! Markup → positional text rows.
//!
//! Two strategies share the same output: [`extract_table`] for documents with a
//! real `<table>` and header row, [`extract_listing`] for repeated item cards
//! whose schema is fixed by a [`ListingLayout`]. Rows whose field count does not
//! match the schema are dropped and counted, never partially accepted.

mod listing;
mod table;

pub use listing::{extract_listing, FieldRule, FieldScope, FieldSource, ListingLayout};
pub use table::extract_table;

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Selector};
use serde::Serialize;

use crate::error::PipelineError;

static WS_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Ordered field names; the positional contract for every row of one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    fields: Vec<String>,
}

impl Schema {
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Position of the first field whose name contains `needle`, ignoring case.
    /// An exact (case-insensitive) match takes precedence.
    pub fn position(&self, needle: &str) -> Option<usize> {
        let needle = needle.to_lowercase();
        let lowered: Vec<String> = self.fields.iter().map(|f| f.to_lowercase()).collect();
        lowered
            .iter()
            .position(|f| *f == needle)
            .or_else(|| lowered.iter().position(|f| f.contains(&needle)))
    }
}

/// One scraped item as text, in schema order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawRow {
    fields: Vec<String>,
}

impl RawRow {
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn get(&self, idx: usize) -> Option<&str> {
        self.fields.get(idx).map(String::as_str)
    }
}

/// Output of one extraction: the schema, accepted rows in document order, and
/// how many rows failed shape validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub schema: Schema,
    pub rows: Vec<RawRow>,
    pub dropped: usize,
}

impl Extraction {
    pub fn empty(schema: Schema) -> Self {
        Self {
            schema,
            rows: Vec::new(),
            dropped: 0,
        }
    }

    /// Build from candidate rows, keeping only those matching the schema width.
    pub(crate) fn from_candidates<I>(schema: Schema, candidates: I) -> Self
    where
        I: IntoIterator<Item = Vec<String>>,
    {
        let (rows, dropped) =
            candidates
                .into_iter()
                .fold((Vec::new(), 0usize), |(mut rows, dropped), fields| {
                    if fields.len() == schema.len() {
                        rows.push(RawRow::new(fields));
                        (rows, dropped)
                    } else {
                        (rows, dropped + 1)
                    }
                });
        Self {
            schema,
            rows,
            dropped,
        }
    }

    /// Append another page's rows after this one's. The left schema is kept.
    pub fn concat(mut self, other: Extraction) -> Self {
        self.rows.extend(other.rows);
        self.dropped += other.dropped;
        self
    }
}

/// Element text, trimmed with inner whitespace runs collapsed to one space.
pub(crate) fn clean_text(el: ElementRef<'_>) -> String {
    let joined: String = el.text().collect();
    collapse_ws(&joined)
}

pub(crate) fn collapse_ws(s: &str) -> String {
    WS_RUN.replace_all(s.trim(), " ").into_owned()
}

pub(crate) fn selector(css: &str) -> Result<Selector, PipelineError> {
    Selector::parse(css).map_err(|e| PipelineError::structure(format!("bad selector {css:?}: {e:?}")))
}

// src/extract/listing.rs

use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use tracing::debug;

use super::{clean_text, selector, Extraction, Schema};
use crate::error::PipelineError;

/// Where a field's value is read from on the matched element.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldSource {
    Text,
    Attr(String),
    /// First class token other than `skip`, e.g. `star-rating Three` → `Three`.
    ClassToken { skip: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldScope {
    /// Resolved inside each item card.
    #[default]
    Item,
    /// Resolved once per document and shared by every item on it.
    Page,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldRule {
    pub name: String,
    pub selector: String,
    pub source: FieldSource,
    #[serde(default)]
    pub scope: FieldScope,
}

/// Fixed layout of a repeated item card. Field order is schema order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ListingLayout {
    /// The list holding the cards. Its absence means the page is not a listing.
    pub container_selector: String,
    pub item_selector: String,
    pub fields: Vec<FieldRule>,
}

impl ListingLayout {
    pub fn schema(&self) -> Schema {
        Schema::new(self.fields.iter().map(|f| f.name.clone()).collect())
    }
}

fn read(el: ElementRef<'_>, source: &FieldSource) -> Option<String> {
    match source {
        FieldSource::Text => Some(clean_text(el)),
        FieldSource::Attr(name) => el.value().attr(name).map(|v| v.trim().to_string()),
        FieldSource::ClassToken { skip } => el
            .value()
            .classes()
            .find(|c| *c != skip.as_str())
            .map(str::to_string),
    }
}

/// Extract every item card matching `layout.item_selector` inside the first
/// `layout.container_selector`, in document order.
///
/// A missing container is `StructureNotFound`; a container without cards is an
/// empty extraction. A field that does not resolve is left out of its row, which
/// then fails the width check and is dropped.
pub fn extract_listing(markup: &str, layout: &ListingLayout) -> Result<Extraction, PipelineError> {
    let doc = Html::parse_document(markup);
    let container_sel = selector(&layout.container_selector)?;
    let item_sel = selector(&layout.item_selector)?;
    let rules = layout
        .fields
        .iter()
        .map(|rule| Ok((rule, selector(&rule.selector)?)))
        .collect::<Result<Vec<(&FieldRule, Selector)>, PipelineError>>()?;

    // Page-scoped values are identical for every card.
    let page_values: Vec<Option<String>> = rules
        .iter()
        .map(|(rule, sel)| match rule.scope {
            FieldScope::Page => doc.select(sel).next().and_then(|el| read(el, &rule.source)),
            FieldScope::Item => None,
        })
        .collect();

    let container = doc.select(&container_sel).next().ok_or_else(|| {
        PipelineError::structure(format!(
            "no container matching {:?}",
            layout.container_selector
        ))
    })?;
    let items: Vec<ElementRef<'_>> = container.select(&item_sel).collect();
    if items.is_empty() {
        debug!(container = %layout.container_selector, "listing container has no items");
        return Ok(Extraction::empty(layout.schema()));
    }

    let candidates = items.into_iter().map(|item| {
        rules
            .iter()
            .zip(&page_values)
            .filter_map(|((rule, sel), page_value)| match rule.scope {
                FieldScope::Page => page_value.clone(),
                FieldScope::Item => item.select(sel).next().and_then(|el| read(el, &rule.source)),
            })
            .collect::<Vec<_>>()
    });

    let extraction = Extraction::from_candidates(layout.schema(), candidates);
    debug!(
        items = extraction.rows.len() + extraction.dropped,
        rows = extraction.rows.len(),
        dropped = extraction.dropped,
        "extracted listing"
    );
    Ok(extraction)
}

// src/normalize/mod.rs

//! Raw text rows → typed records.
//!
//! Each field is coerced by an explicit function returning `Result`; a row with
//! any failing field is dropped whole and only counted.

pub mod coerce;
pub mod record;

pub use coerce::Availability;
pub use record::{decade_of, CatalogColumns, CatalogRecord, EmissionRecord, TypedRecord};

use serde::Serialize;
use tracing::{debug, trace};

use crate::extract::{RawRow, Schema};

/// The accepted records of one run, in scrape order. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset<R> {
    records: Vec<R>,
    /// Rows that failed coercion.
    dropped: usize,
}

impl<R> Dataset<R> {
    pub fn from_records(records: Vec<R>) -> Self {
        Self {
            records,
            dropped: 0,
        }
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.records.iter()
    }
}

impl<'a, R> IntoIterator for &'a Dataset<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Coerce every row; rows that fail are excluded and counted in `dropped`.
pub fn normalize<R: TypedRecord>(columns: &R::Columns, schema: &Schema, rows: &[RawRow]) -> Dataset<R> {
    let (records, dropped) = rows.iter().enumerate().fold(
        (Vec::with_capacity(rows.len()), 0usize),
        |(mut records, dropped), (idx, row)| match R::from_raw(columns, schema, row) {
            Ok(rec) => {
                records.push(rec);
                (records, dropped)
            }
            Err(e) => {
                trace!(row = idx, error = %e, "row rejected");
                (records, dropped + 1)
            }
        },
    );
    debug!(accepted = records.len(), dropped, "normalized rows");
    Dataset { records, dropped }
}

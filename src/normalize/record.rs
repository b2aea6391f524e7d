// src/normalize/record.rs

use serde::Serialize;

use super::coerce::{parse_availability, parse_currency, parse_integer, parse_number, parse_rating, Availability};
use crate::config::EmissionsColumns;
use crate::error::CoerceError;
use crate::extract::{RawRow, Schema};

/// A record that can be built from one positional text row.
pub trait TypedRecord: Sized {
    /// Per-dataset column selection (header needles, etc).
    type Columns;

    fn from_raw(columns: &Self::Columns, schema: &Schema, row: &RawRow) -> Result<Self, CoerceError>;
}

fn field<'a>(schema: &Schema, row: &'a RawRow, needle: &str) -> Result<&'a str, CoerceError> {
    schema
        .position(needle)
        .and_then(|idx| row.get(idx))
        .ok_or_else(|| CoerceError::MissingColumn(needle.to_string()))
}

/// Floor a year to the start of its decade: 1965 → 1960, -5 → -10.
pub fn decade_of(year: i32) -> i32 {
    year.div_euclid(10) * 10
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmissionRecord {
    pub year: i32,
    pub emission_tons: f64,
    pub decade: i32,
}

impl EmissionRecord {
    pub fn new(year: i32, emission_tons: f64) -> Self {
        Self {
            year,
            emission_tons,
            decade: decade_of(year),
        }
    }
}

impl TypedRecord for EmissionRecord {
    type Columns = EmissionsColumns;

    fn from_raw(columns: &EmissionsColumns, schema: &Schema, row: &RawRow) -> Result<Self, CoerceError> {
        let year_text = field(schema, row, &columns.year)?;
        let year = i32::try_from(parse_integer(year_text)?)
            .map_err(|_| CoerceError::NotANumber(year_text.to_string()))?;
        let tons = parse_number(field(schema, row, &columns.emissions)?)?;
        Ok(Self::new(year, tons))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogRecord {
    pub title: String,
    pub price: f64,
    pub availability: Availability,
    pub rating_stars: u8,
    pub category: String,
}

/// Catalog fields are addressed by the layout's field names.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogColumns;

impl TypedRecord for CatalogRecord {
    type Columns = CatalogColumns;

    fn from_raw(_: &CatalogColumns, schema: &Schema, row: &RawRow) -> Result<Self, CoerceError> {
        let title = field(schema, row, "title")?.trim();
        if title.is_empty() {
            return Err(CoerceError::Empty("title"));
        }
        Ok(Self {
            title: title.to_string(),
            price: parse_currency(field(schema, row, "price")?)?,
            availability: parse_availability(field(schema, row, "availability")?)?,
            rating_stars: parse_rating(field(schema, row, "rating")?)?,
            category: field(schema, row, "category")?.trim().to_string(),
        })
    }
}

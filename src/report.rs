// src/report.rs

//! Plain, serialisable payloads handed to whatever draws the charts.

use serde::Serialize;

use crate::aggregate::{
    cross_tabulate_mean, distribution, extremum, group_by_sum, mean, trend_series, Direction,
    DistributionOrder,
};
use crate::error::PipelineError;
use crate::normalize::{Availability, CatalogRecord, Dataset, EmissionRecord};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmissionsReport {
    pub records: usize,
    /// `(year, tons)` ascending by year, for the line chart.
    pub trend: Vec<(i32, f64)>,
    pub peak: EmissionRecord,
    pub lowest: EmissionRecord,
    pub mean_tons: f64,
    /// `(decade, tons)` ascending by decade, for the bar chart.
    pub by_decade: Vec<(i32, f64)>,
}

impl EmissionsReport {
    pub fn build(ds: &Dataset<EmissionRecord>) -> Result<Self, PipelineError> {
        let tons = |r: &EmissionRecord| r.emission_tons;
        Ok(Self {
            records: ds.len(),
            trend: trend_series(ds, |r| r.year, tons),
            peak: extremum(ds, tons, Direction::Max)?.clone(),
            lowest: extremum(ds, tons, Direction::Min)?.clone(),
            mean_tons: mean(ds, tons)?,
            by_decade: group_by_sum(ds, |r| r.decade, tons),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogReport {
    pub records: usize,
    /// `(stars, count)` ascending by stars.
    pub rating_distribution: Vec<(u8, usize)>,
    /// `(availability, count)`, most common first.
    pub availability_distribution: Vec<(Availability, usize)>,
    /// `(stars, mean price)` ascending by stars.
    pub mean_price_by_rating: Vec<(u8, f64)>,
    pub mean_price: f64,
    pub most_expensive: CatalogRecord,
    pub cheapest: CatalogRecord,
}

impl CatalogReport {
    pub fn build(ds: &Dataset<CatalogRecord>) -> Result<Self, PipelineError> {
        let price = |r: &CatalogRecord| r.price;
        Ok(Self {
            records: ds.len(),
            rating_distribution: distribution(ds, |r| r.rating_stars, DistributionOrder::Natural),
            availability_distribution: distribution(
                ds,
                |r| r.availability,
                DistributionOrder::CountDesc,
            ),
            mean_price_by_rating: cross_tabulate_mean(ds, |r| r.rating_stars, price),
            mean_price: mean(ds, price)?,
            most_expensive: extremum(ds, price, Direction::Max)?.clone(),
            cheapest: extremum(ds, price, Direction::Min)?.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emissions_report() {
        let ds = Dataset::from_records(vec![
            EmissionRecord::new(2020, 4.7e9),
            EmissionRecord::new(2019, 5.0e9),
            EmissionRecord::new(1995, 3.0e9),
        ]);
        let report = EmissionsReport::build(&ds).unwrap();
        assert_eq!(report.records, 3);
        assert_eq!(report.trend.first(), Some(&(1995, 3.0e9)));
        assert_eq!(report.peak.year, 2019);
        assert_eq!(report.lowest.year, 1995);
        assert_eq!(report.by_decade, vec![(1990, 3.0e9), (2010, 5.0e9), (2020, 4.7e9)]);
        assert!((report.mean_tons - 4.233333333e9).abs() < 1.0e3);
    }

    #[test]
    fn test_catalog_report_serialises() {
        let book = |title: &str, price: f64, stars: u8, availability| CatalogRecord {
            title: title.to_string(),
            price,
            availability,
            rating_stars: stars,
            category: "Poetry".to_string(),
        };
        let ds = Dataset::from_records(vec![
            book("a", 12.0, 3, Availability::InStock),
            book("b", 30.0, 5, Availability::OutOfStock),
            book("c", 18.0, 3, Availability::InStock),
        ]);
        let report = CatalogReport::build(&ds).unwrap();
        assert_eq!(report.rating_distribution, vec![(3, 2), (5, 1)]);
        assert_eq!(
            report.availability_distribution,
            vec![(Availability::InStock, 2), (Availability::OutOfStock, 1)]
        );
        assert_eq!(report.mean_price_by_rating, vec![(3, 15.0), (5, 30.0)]);
        assert_eq!(report.most_expensive.title, "b");
        assert_eq!(report.cheapest.title, "a");

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["availability_distribution"][0][0], "in_stock");
        assert_eq!(json["mean_price"], 20.0);
    }

    #[test]
    fn test_reports_reject_empty_datasets() {
        assert!(matches!(
            EmissionsReport::build(&Dataset::from_records(vec![])),
            Err(PipelineError::EmptyDataset { .. })
        ));
        assert!(matches!(
            CatalogReport::build(&Dataset::from_records(vec![])),
            Err(PipelineError::EmptyDataset { .. })
        ));
    }
}

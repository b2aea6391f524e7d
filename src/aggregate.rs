// src/aggregate.rs

//! Pure queries over a [`Dataset`]. None of them mutate or reorder the dataset;
//! each returns a fresh collection.

use std::collections::BTreeMap;

use crate::error::PipelineError;
use crate::normalize::Dataset;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Max,
    Min,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistributionOrder {
    /// Ascending by category value.
    Natural,
    /// Most frequent first; equal counts fall back to ascending category.
    CountDesc,
}

/// `(key, measure)` pairs stable-sorted by key; equal keys keep dataset order.
pub fn trend_series<R, K, FK, FM>(ds: &Dataset<R>, key: FK, measure: FM) -> Vec<(K, f64)>
where
    K: Ord,
    FK: Fn(&R) -> K,
    FM: Fn(&R) -> f64,
{
    let mut series: Vec<(K, f64)> = ds.iter().map(|r| (key(r), measure(r))).collect();
    series.sort_by(|a, b| a.0.cmp(&b.0));
    series
}

/// The record with the largest (or smallest) measure. Ties go to the earliest record.
pub fn extremum<R, FM>(ds: &Dataset<R>, measure: FM, direction: Direction) -> Result<&R, PipelineError>
where
    FM: Fn(&R) -> f64,
{
    let mut iter = ds.iter();
    let first = iter.next().ok_or(PipelineError::EmptyDataset { query: "extremum" })?;

    let (best, _) = iter.fold((first, measure(first)), |(best, best_v), r| {
        let v = measure(r);
        let better = match direction {
            Direction::Max => v > best_v,
            Direction::Min => v < best_v,
        };
        if better {
            (r, v)
        } else {
            (best, best_v)
        }
    });
    Ok(best)
}

/// Arithmetic mean. Fails rather than returning zero or NaN when empty.
pub fn mean<R, FM>(ds: &Dataset<R>, measure: FM) -> Result<f64, PipelineError>
where
    FM: Fn(&R) -> f64,
{
    if ds.is_empty() {
        return Err(PipelineError::EmptyDataset { query: "mean" });
    }
    let total: f64 = ds.iter().map(measure).sum();
    Ok(total / ds.len() as f64)
}

/// Sum of `measure` per distinct key, ascending by key.
pub fn group_by_sum<R, K, FK, FM>(ds: &Dataset<R>, key: FK, measure: FM) -> Vec<(K, f64)>
where
    K: Ord,
    FK: Fn(&R) -> K,
    FM: Fn(&R) -> f64,
{
    let mut groups: BTreeMap<K, f64> = BTreeMap::new();
    for r in ds {
        *groups.entry(key(r)).or_insert(0.0) += measure(r);
    }
    groups.into_iter().collect()
}

/// Record count per distinct category value.
pub fn distribution<R, K, FK>(ds: &Dataset<R>, key: FK, order: DistributionOrder) -> Vec<(K, usize)>
where
    K: Ord,
    FK: Fn(&R) -> K,
{
    let mut counts: BTreeMap<K, usize> = BTreeMap::new();
    for r in ds {
        *counts.entry(key(r)).or_insert(0) += 1;
    }
    let mut out: Vec<(K, usize)> = counts.into_iter().collect();
    if order == DistributionOrder::CountDesc {
        // stable, so ties keep the ascending key order from the map
        out.sort_by(|a, b| b.1.cmp(&a.1));
    }
    out
}

/// Mean of `measure` per distinct category value, ascending by category.
pub fn cross_tabulate_mean<R, K, FK, FM>(ds: &Dataset<R>, key: FK, measure: FM) -> Vec<(K, f64)>
where
    K: Ord,
    FK: Fn(&R) -> K,
    FM: Fn(&R) -> f64,
{
    let mut acc: BTreeMap<K, (f64, usize)> = BTreeMap::new();
    for r in ds {
        let slot = acc.entry(key(r)).or_insert((0.0, 0));
        slot.0 += measure(r);
        slot.1 += 1;
    }
    acc.into_iter()
        .map(|(k, (sum, n))| (k, sum / n as f64))
        .collect()
}

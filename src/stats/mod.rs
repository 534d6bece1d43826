//! Distribution summary over per-checkpoint timing samples.

pub mod sort;

pub use sort::quick_sort;

use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub max: i64,
    pub min: i64,
    /// Mean, truncated toward zero.
    pub avg: i64,
    /// Element at index `n / 2` of the sorted samples. For even `n` this is
    /// the upper of the two middle values, not their mean.
    pub mid: i64,
    /// Most frequent value; ties go to the smallest value.
    pub more: i64,
}

/// Summarize `values`; `None` for an empty sample.
pub fn compute_stats(values: &[i64]) -> Option<Stats> {
    if values.is_empty() {
        return None;
    }

    let sum: i128 = values.iter().map(|&v| i128::from(v)).sum();
    // |mean| never exceeds the largest |sample|, so it fits back into i64.
    let avg = (sum / values.len() as i128) as i64;

    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for &v in values {
        *counts.entry(v).or_default() += 1;
    }
    // Ascending key order + strict `>` keeps the smallest of tied values.
    let mut more = values[0];
    let mut best = 0;
    for (&value, &count) in &counts {
        if count > best {
            best = count;
            more = value;
        }
    }

    let sorted = quick_sort(values);
    Some(Stats {
        max: sorted[sorted.len() - 1],
        min: sorted[0],
        avg,
        mid: sorted[sorted.len() / 2],
        more,
    })
}

use serde::Serialize;
use std::collections::HashMap;

use crate::analyzers::utility::round_to;
use crate::error::Result;
use crate::observation::{Attribute, Observation};

/// Daily average of new cases for one region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionAverage {
    pub region: String,
    pub average: f64,
}

/// Region name to daily average of new cases.
///
/// Iterates in the order regions first appear in the observations the map
/// was built from.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RegionAverages {
    entries: Vec<RegionAverage>,
}

impl RegionAverages {
    pub fn get(&self, region: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.region == region)
            .map(|e| e.average)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegionAverage> {
        self.entries.iter()
    }

    pub fn regions(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.region.as_str())
    }

    /// Entries by average, highest first. Equal averages keep map order.
    pub fn sorted_desc(&self) -> Vec<&RegionAverage> {
        let mut sorted: Vec<_> = self.entries.iter().collect();
        sorted.sort_by(|a, b| b.average.total_cmp(&a.average));
        sorted
    }

    /// The `k` regions with the highest average.
    pub fn top(&self, k: usize) -> Vec<&RegionAverage> {
        let mut sorted = self.sorted_desc();
        sorted.truncate(k);
        sorted
    }
}

/// Groups observations by region and averages their new cases, rounded to two
/// decimals.
///
/// # Errors
///
/// Fails on the first observation whose new cases is not a number.
pub fn compute_averages(observations: &[Observation]) -> Result<RegionAverages> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<(&str, i128, usize)> = Vec::new();

    for obs in observations {
        let new_cases = obs.require(Attribute::NewCases)?;

        let slot = *index.entry(obs.region.as_str()).or_insert_with(|| {
            totals.push((obs.region.as_str(), 0, 0));
            totals.len() - 1
        });

        let (_, sum, count) = &mut totals[slot];
        *sum += i128::from(new_cases);
        *count += 1;
    }

    let entries = totals
        .into_iter()
        .map(|(region, sum, count)| RegionAverage {
            region: region.to_string(),
            average: round_to(sum as f64 / count as f64, 2),
        })
        .collect();

    Ok(RegionAverages { entries })
}

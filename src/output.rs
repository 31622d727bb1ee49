//! Console and file output for parsed observations and aggregates.
//!
//! Console output goes through `tracing`, file output is CSV.

use anyhow::Result;
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

use crate::analyzers::averages::RegionAverages;
use crate::analyzers::utility::round_to;
use crate::observation::Observation;

/// Logs the first `limit` observations, one line each.
pub fn print_observations(observations: &[Observation], limit: usize) {
    for obs in observations.iter().take(limit) {
        info!("{}", obs);
    }
}

/// Logs every field of one observation, `None` marking a field that was not
/// a number in the source row.
pub fn print_pretty(observation: &Observation) {
    info!(
        date = %observation.date,
        region = %observation.region,
        icu = ?observation.icu,
        new_cases = ?observation.new_cases,
        deaths = ?observation.deaths,
        total_cases = ?observation.total_cases,
        tests = ?observation.tests,
        "Observation"
    );
}

/// Logs each ranked observation with its death ratio rounded to two decimals.
pub fn print_ranking(ranked: &[&Observation]) -> Result<()> {
    for obs in ranked {
        let ratio = round_to(obs.death_ratio()?, 2);
        info!(region = %obs.region, date = %obs.date, ratio, "{} {}", obs.region, ratio);
    }
    Ok(())
}

/// Logs one `region: average` line per region, in map order.
pub fn print_averages(averages: &RegionAverages) {
    for entry in averages.iter() {
        info!("{}: {}", entry.region, entry.average);
    }
}

#[derive(Serialize)]
struct AverageRow<'a> {
    region: &'a str,
    average: f64,
}

/// Writes the averages to a CSV file, highest first, with a header row.
/// An existing file is replaced.
pub fn write_averages_csv(path: impl AsRef<Path>, averages: &RegionAverages) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

    for entry in averages.sorted_desc() {
        writer.serialize(AverageRow {
            region: &entry.region,
            average: entry.average,
        })?;
    }
    writer.flush()?;

    debug!(path = %path.display(), rows = averages.len(), "Averages written");
    Ok(())
}

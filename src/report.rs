//! End-to-end report: parse, rank, average and chart the configured files.

use anyhow::Result;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::analyzers::averages::compute_averages;
use crate::analyzers::ranking::top_regions;
use crate::charts::{ChartSpec, average_bar_chart, timeline_all_chart, timeline_chart};
use crate::config::ReportConfig;
use crate::output::{print_averages, print_observations, print_ranking};
use crate::parser::{parse, parse_files};

/// File-name friendly form of a chart name: ASCII alphanumerics kept,
/// everything else collapsed to `_`.
pub fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    out.trim_matches('_').to_string()
}

/// Runs the full report described by `config` and returns the paths of the
/// charts written, in the order they were produced.
///
/// A chart whose file name collides with one already written in this run
/// (same request twice, or names that differ only in punctuation) is skipped.
#[tracing::instrument(skip(config), fields(output_dir = %config.output_dir.display()))]
pub fn run_report(config: &ReportConfig) -> Result<Vec<PathBuf>> {
    info!(path = %config.latest.display(), "Reading latest file");
    let latest = parse(&config.latest)?;
    print_observations(&latest, 3);

    info!(top = config.top, "Regions with the highest deaths-to-infected ratio");
    print_ranking(&top_regions(&latest, config.top)?)?;

    info!(files = config.daily.len(), "Reading daily files");
    let daily = parse_files(&config.daily)?;
    print_observations(&daily, 5);

    info!("Daily average of new cases per region");
    let averages = compute_averages(&daily)?;
    print_averages(&averages);

    let mut charts: Vec<(String, ChartSpec)> =
        vec![("averages".to_string(), average_bar_chart(&averages))];

    for request in &config.timelines {
        charts.push((
            format!("timeline_{}_{}", request.attribute, request.region),
            timeline_chart(&daily, &request.region, request.attribute),
        ));
    }

    for attribute in &config.timeline_all {
        charts.push((
            format!("timeline_all_{}", attribute),
            timeline_all_chart(&daily, *attribute)?,
        ));
    }

    let renderer = config.format.renderer();
    let mut written: Vec<PathBuf> = Vec::with_capacity(charts.len());
    for (name, chart) in charts {
        let path = config
            .output_dir
            .join(format!("{}.{}", slug(&name), renderer.extension()));
        if written.contains(&path) {
            warn!(chart = %name, path = %path.display(), "Chart file already written, skipping");
            continue;
        }
        renderer.render(&chart, &path)?;
        written.push(path);
    }

    info!(charts = written.len(), "Report complete");
    Ok(written)
}

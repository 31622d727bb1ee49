//! Chart descriptions built from observations. Nothing here touches disk;
//! see [`crate::charts::render`] for output.

use serde::Serialize;

use crate::analyzers::averages::{RegionAverages, compute_averages};
use crate::dates::str2date;
use crate::error::Result;
use crate::observation::{Attribute, Observation};

/// Number of regions overlaid by [`timeline_all_chart`].
pub const TIMELINE_ALL_REGIONS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
}

/// A single point on a category axis. `y` is `None` where the source field
/// was not a number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub x: String,
    pub y: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub label: String,
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Category axis, in display order.
    pub labels: Vec<String>,
    pub series: Vec<Series>,
    pub legend: bool,
}

impl ChartSpec {
    fn new(kind: ChartKind, title: String, x_label: &str, y_label: String) -> Self {
        ChartSpec {
            kind,
            title,
            x_label: x_label.to_string(),
            y_label,
            labels: Vec::new(),
            series: Vec::new(),
            legend: false,
        }
    }

    fn push_series(&mut self, series: Series) {
        for point in &series.points {
            if !self.labels.contains(&point.x) {
                self.labels.push(point.x.clone());
            }
        }
        self.series.push(series);
    }
}

/// Bar chart of the daily average of new cases, highest region first.
pub fn average_bar_chart(averages: &RegionAverages) -> ChartSpec {
    let mut chart = ChartSpec::new(
        ChartKind::Bar,
        "Daily average of new cases per region".to_string(),
        "Regions",
        "Daily average of new cases".to_string(),
    );

    let points = averages
        .sorted_desc()
        .into_iter()
        .map(|e| Point {
            x: e.region.clone(),
            y: Some(e.average),
        })
        .collect();

    chart.push_series(Series {
        label: "Daily average of new cases".to_string(),
        points,
    });
    chart
}

fn region_points(observations: &[Observation], region: &str, attribute: Attribute) -> Vec<Point> {
    observations
        .iter()
        .filter(|o| o.region == region)
        .map(|o| Point {
            x: str2date(&o.date),
            y: attribute.value(o).map(|v| v as f64),
        })
        .collect()
}

/// Line chart of one attribute over time for a single region, in input order.
pub fn timeline_chart(
    observations: &[Observation],
    region: &str,
    attribute: Attribute,
) -> ChartSpec {
    let mut chart = ChartSpec::new(
        ChartKind::Line,
        format!("Timeline of {} in {}", attribute, region),
        "Date",
        attribute.to_string(),
    );

    chart.push_series(Series {
        label: region.to_string(),
        points: region_points(observations, region, attribute),
    });
    chart
}

/// Overlays one timeline per region for the regions with the highest daily
/// average of new cases.
///
/// # Errors
///
/// Fails when the averages cannot be computed (a new cases field is not a
/// number).
pub fn timeline_all_chart(observations: &[Observation], attribute: Attribute) -> Result<ChartSpec> {
    let averages = compute_averages(observations)?;

    let mut chart = ChartSpec::new(
        ChartKind::Line,
        format!("Timeline of {} in each region", attribute),
        "Date",
        attribute.to_string(),
    );
    chart.legend = true;

    for entry in averages.top(TIMELINE_ALL_REGIONS) {
        chart.push_series(Series {
            label: entry.region.clone(),
            points: region_points(observations, &entry.region, attribute),
        });
    }

    Ok(chart)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(date: &str, region: &str, icu: Option<i64>, new_cases: i64) -> Observation {
        Observation {
            date: date.to_string(),
            region: region.to_string(),
            icu,
            new_cases: Some(new_cases),
            deaths: Some(0),
            total_cases: Some(1),
            tests: Some(0),
        }
    }

    #[test]
    fn test_bar_chart_sorted_high_to_low() {
        let data = vec![
            obs("2020-06-15T17:00:00", "Molise", Some(0), 1),
            obs("2020-06-15T17:00:00", "Lombardia", Some(5), 200),
            obs("2020-06-15T17:00:00", "Piemonte", Some(3), 50),
        ];
        let averages = compute_averages(&data).unwrap();
        let chart = average_bar_chart(&averages);

        assert_eq!(chart.kind, ChartKind::Bar);
        assert_eq!(chart.labels, ["Lombardia", "Piemonte", "Molise"]);
        let ys: Vec<_> = chart.series[0].points.iter().map(|p| p.y).collect();
        assert_eq!(ys, [Some(200.0), Some(50.0), Some(1.0)]);
    }

    #[test]
    fn test_timeline_filters_region_and_keeps_order() {
        let data = vec![
            obs("2020-06-14T17:00:00", "Lombardia", Some(10), 1),
            obs("2020-06-14T17:00:00", "Veneto", Some(4), 1),
            obs("2020-06-15T17:00:00", "Lombardia", None, 1),
            obs("2020-06-16T17:00:00", "Lombardia", Some(8), 1),
        ];
        let chart = timeline_chart(&data, "Lombardia", Attribute::Icu);

        assert_eq!(chart.title, "Timeline of ICU in Lombardia");
        assert_eq!(chart.y_label, "ICU");
        assert_eq!(chart.labels, ["2020-06-14", "2020-06-15", "2020-06-16"]);
        let ys: Vec<_> = chart.series[0].points.iter().map(|p| p.y).collect();
        assert_eq!(ys, [Some(10.0), None, Some(8.0)]);
    }

    #[test]
    fn test_timeline_unknown_region_is_empty() {
        let data = vec![obs("2020-06-14T17:00:00", "Veneto", Some(4), 1)];
        let chart = timeline_chart(&data, "Atlantide", Attribute::Icu);
        assert!(chart.series[0].points.is_empty());
        assert!(chart.labels.is_empty());
    }

    #[test]
    fn test_timeline_all_picks_top_five() {
        let regions = ["A", "B", "C", "D", "E", "F", "G"];
        let mut data = Vec::new();
        for day in ["2020-06-14T17:00:00", "2020-06-15T17:00:00"] {
            for (i, region) in regions.iter().enumerate() {
                data.push(obs(day, region, Some(i as i64), i as i64));
            }
        }
        let chart = timeline_all_chart(&data, Attribute::NewCases).unwrap();

        let labels: Vec<_> = chart.series.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, ["G", "F", "E", "D", "C"]);
        assert!(chart.legend);
        assert_eq!(chart.title, "Timeline of NewCases in each region");
        assert_eq!(chart.labels, ["2020-06-14", "2020-06-15"]);
        assert_eq!(chart.series[0].points.len(), 2);
    }

    #[test]
    fn test_timeline_all_ties_follow_first_appearance() {
        let data = vec![
            obs("2020-06-14T17:00:00", "X", Some(1), 3),
            obs("2020-06-14T17:00:00", "Y", Some(1), 3),
            obs("2020-06-14T17:00:00", "Z", Some(1), 4),
        ];
        let chart = timeline_all_chart(&data, Attribute::Icu).unwrap();
        let labels: Vec<_> = chart.series.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, ["Z", "X", "Y"]);
    }
}

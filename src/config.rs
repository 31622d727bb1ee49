use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;

use crate::analyzers::ranking::DEFAULT_TOP;
use crate::charts::ChartFormat;
use crate::observation::Attribute;

/// A region/attribute pair to draw a timeline for.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TimelineRequest {
    pub region: String,
    pub attribute: Attribute,
}

/// Inputs and outputs of a full report run.
///
/// Stored as JSON on disk; every key is optional:
/// ```json
/// {
///   "latest": "data/dpc-covid19-ita-regioni-latest.csv",
///   "daily": ["data/dpc-covid19-ita-regioni-20200614.csv"],
///   "output_dir": "charts",
///   "format": "html",
///   "top": 3,
///   "timelines": [{ "region": "Lombardia", "attribute": "ICU" }],
///   "timeline_all": ["ICU", "NewCases"]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    pub latest: PathBuf,
    pub daily: Vec<PathBuf>,
    pub output_dir: PathBuf,
    pub format: ChartFormat,
    pub top: usize,
    pub timelines: Vec<TimelineRequest>,
    pub timeline_all: Vec<Attribute>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        let daily = (14..=20)
            .map(|day| PathBuf::from(format!("dpc-covid19-ita-regioni-202006{day}.csv")))
            .collect();

        ReportConfig {
            latest: PathBuf::from("dpc-covid19-ita-regioni-latest.csv"),
            daily,
            output_dir: PathBuf::from("charts"),
            format: ChartFormat::Html,
            top: DEFAULT_TOP,
            timelines: vec![
                TimelineRequest {
                    region: "Lombardia".to_string(),
                    attribute: Attribute::Icu,
                },
                TimelineRequest {
                    region: "Emilia-Romagna".to_string(),
                    attribute: Attribute::Icu,
                },
            ],
            timeline_all: vec![Attribute::Icu, Attribute::NewCases],
        }
    }
}

impl ReportConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

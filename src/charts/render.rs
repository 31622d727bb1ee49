//! Writes [`ChartSpec`]s to disk.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

use crate::charts::spec::{ChartKind, ChartSpec};

/// Output backend for charts.
pub trait Renderer {
    /// File extension (without dot) of the files this renderer writes.
    fn extension(&self) -> &'static str;

    fn render_to_string(&self, chart: &ChartSpec) -> Result<String>;

    /// Renders `chart` into `path`, creating parent directories.
    fn render(&self, chart: &ChartSpec, path: &Path) -> Result<()> {
        let content = self.render_to_string(chart)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        info!(path = %path.display(), title = %chart.title, "Chart written");
        Ok(())
    }
}

/// Pretty-printed JSON dump of the chart description.
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn render_to_string(&self, chart: &ChartSpec) -> Result<String> {
        Ok(serde_json::to_string_pretty(chart)?)
    }
}

/// Standalone HTML page drawing the chart with Chart.js.
pub struct HtmlRenderer;

const PALETTE: &[&str] = &["#4682b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b"];

impl HtmlRenderer {
    /// Chart.js configuration object for `chart`.
    pub fn chart_config(chart: &ChartSpec) -> Value {
        let datasets: Vec<Value> = chart
            .series
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let color = PALETTE[i % PALETTE.len()];
                let data: Vec<Value> = s
                    .points
                    .iter()
                    .map(|p| json!({ "x": p.x, "y": p.y }))
                    .collect();
                json!({
                    "label": s.label,
                    "data": data,
                    "backgroundColor": color,
                    "borderColor": color,
                    "fill": false,
                })
            })
            .collect();

        let kind = match chart.kind {
            ChartKind::Bar => "bar",
            ChartKind::Line => "line",
        };

        json!({
            "type": kind,
            "data": {
                "labels": chart.labels,
                "datasets": datasets,
            },
            "options": {
                "responsive": true,
                "maintainAspectRatio": false,
                "plugins": {
                    "title": { "display": true, "text": chart.title },
                    "legend": { "display": chart.legend, "position": "right" },
                },
                "scales": {
                    "x": {
                        "title": { "display": true, "text": chart.x_label },
                        "ticks": { "maxRotation": 90, "minRotation": 90 },
                    },
                    "y": { "title": { "display": true, "text": chart.y_label } },
                },
            },
        })
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

impl Renderer for HtmlRenderer {
    fn extension(&self) -> &'static str {
        "html"
    }

    fn render_to_string(&self, chart: &ChartSpec) -> Result<String> {
        // "</" would close the script element early.
        let config = serde_json::to_string(&Self::chart_config(chart))?.replace("</", "<\\/");
        let title = escape_html(&chart.title);

        Ok(format!(
            r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <script src="https://cdn.jsdelivr.net/npm/chart.js"></script>
    <style>
        body {{
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            margin: 0;
            padding: 20px;
            background: #f5f5f5;
        }}
        .chart-container {{
            position: relative;
            height: 80vh;
            background: white;
            border-radius: 8px;
            padding: 16px;
        }}
    </style>
</head>
<body>
    <div class="chart-container">
        <canvas id="chart"></canvas>
    </div>
    <script>
        new Chart(document.getElementById('chart'), {config});
    </script>
</body>
</html>
"##
        ))
    }
}

/// Renderer selection for the CLI and report config.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartFormat {
    #[default]
    Html,
    Json,
}

impl ChartFormat {
    pub fn renderer(self) -> Box<dyn Renderer> {
        match self {
            ChartFormat::Html => Box::new(HtmlRenderer),
            ChartFormat::Json => Box::new(JsonRenderer),
        }
    }
}

impl FromStr for ChartFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "html" => Ok(ChartFormat::Html),
            "json" => Ok(ChartFormat::Json),
            other => anyhow::bail!("unknown chart format: {}", other),
        }
    }
}

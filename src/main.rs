//! CLI entry point for the regional COVID-19 report tool.
//!
//! Provides subcommands for inspecting a single daily file, averaging new
//! cases across several files, drawing charts, running the full report and
//! downloading the daily files from the Civil Protection repository.

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use covid_regions::analyzers::averages::compute_averages;
use covid_regions::analyzers::ranking::{DEFAULT_TOP, top_regions};
use covid_regions::charts::{
    ChartFormat, ChartSpec, average_bar_chart, timeline_all_chart, timeline_chart,
};
use covid_regions::config::ReportConfig;
use covid_regions::fetch::{self, BasicClient, DEFAULT_BASE_URL, LATEST_FILE};
use covid_regions::observation::Attribute;
use covid_regions::output::{
    print_averages, print_observations, print_pretty, print_ranking, write_averages_csv,
};
use covid_regions::parser::{parse, parse_files};
use covid_regions::report::{run_report, slug};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "covid_regions")]
#[command(about = "Daily COVID-19 statistics for Italian regions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the first rows of a file and the highest deaths-to-infected ratios
    Summary {
        /// Regional CSV file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Number of observations to rank
        #[arg(short = 'n', long, default_value_t = DEFAULT_TOP)]
        top: usize,

        /// Number of leading rows to print
        #[arg(short, long, default_value_t = 3)]
        show: usize,

        /// Dump every field of the first observation, including missing ones
        #[arg(short, long, default_value_t = false)]
        verbose: bool,
    },
    /// Daily average of new cases per region across several files
    Averages {
        /// Regional CSV files, one per date
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,

        /// Optional: also write the averages to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Bar chart of the daily average of new cases per region
    PlotAverages {
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,

        /// Output file (defaults to charts/averages.<format>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(short, long, default_value = "html")]
        format: ChartFormat,
    },
    /// Timeline of one attribute in one region
    Timeline {
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,

        #[arg(short, long, default_value = "Lombardia")]
        region: String,

        /// ICU, NewCases, Deaths, TotalCases or Tests
        #[arg(short, long, default_value = "Deaths")]
        attr: Attribute,

        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(short, long, default_value = "html")]
        format: ChartFormat,
    },
    /// Timelines of one attribute for the five regions with the most new cases
    TimelineAll {
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,

        /// ICU, NewCases, Deaths, TotalCases or Tests
        #[arg(short, long, default_value = "ICU")]
        attr: Attribute,

        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(short, long, default_value = "html")]
        format: ChartFormat,
    },
    /// Run the full report: summary, ranking, averages and every chart
    Report {
        /// JSON report config; the June 2020 defaults are used when omitted
        #[arg(short, long)]
        config: Option<String>,
    },
    /// Download daily regional files from the Civil Protection repository
    Fetch {
        /// First day to download (YYYY-MM-DD)
        #[arg(long)]
        from: NaiveDate,

        /// Last day to download, inclusive (defaults to --from)
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Directory to save the files into
        #[arg(short, long, default_value = "data")]
        dir: PathBuf,

        /// Also download the latest file
        #[arg(long, default_value_t = false)]
        latest: bool,

        #[arg(long, default_value = DEFAULT_BASE_URL)]
        base_url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/covid_regions.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("covid_regions.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Summary {
            file,
            top,
            show,
            verbose,
        } => {
            let observations = parse(&file)?;
            info!(rows = observations.len(), "Read one file");
            print_observations(&observations, show);
            if verbose {
                if let Some(first) = observations.first() {
                    print_pretty(first);
                }
            }

            info!("Regions with the highest deaths-to-infected ratio");
            print_ranking(&top_regions(&observations, top)?)?;
        }
        Commands::Averages { files, csv } => {
            let observations = parse_files(&files)?;
            let averages = compute_averages(&observations)?;
            print_averages(&averages);

            if let Some(path) = csv {
                write_averages_csv(&path, &averages)?;
                info!(path = %path.display(), "Averages saved");
            }
        }
        Commands::PlotAverages {
            files,
            output,
            format,
        } => {
            let averages = compute_averages(&parse_files(&files)?)?;
            render(&average_bar_chart(&averages), "averages", output, format)?;
        }
        Commands::Timeline {
            files,
            region,
            attr,
            output,
            format,
        } => {
            let observations = parse_files(&files)?;
            let chart = timeline_chart(&observations, &region, attr);
            if chart.series.iter().all(|s| s.points.is_empty()) {
                info!(region = %region, "No observations for region");
            }
            render(&chart, &format!("timeline_{}_{}", attr, region), output, format)?;
        }
        Commands::TimelineAll {
            files,
            attr,
            output,
            format,
        } => {
            let observations = parse_files(&files)?;
            let chart = timeline_all_chart(&observations, attr)?;
            render(&chart, &format!("timeline_all_{}", attr), output, format)?;
        }
        Commands::Report { config } => {
            let config = match config {
                Some(path) => ReportConfig::load(&path)?,
                None => ReportConfig::default(),
            };
            run_report(&config)?;
        }
        Commands::Fetch {
            from,
            to,
            dir,
            latest,
            base_url,
        } => {
            let client = BasicClient::new()?;
            let to = to.unwrap_or(from);

            let paths = fetch::fetch_range(&client, &base_url, from, to, &dir).await?;
            if latest {
                fetch::fetch_file(&client, &base_url, LATEST_FILE, &dir).await?;
            }
            info!(files = paths.len(), dir = %dir.display(), "Fetch complete");
        }
    }

    Ok(())
}

/// Renders `chart` to `output`, or to `charts/<slug of name>.<ext>` when no
/// path was given.
fn render(
    chart: &ChartSpec,
    name: &str,
    output: Option<PathBuf>,
    format: ChartFormat,
) -> Result<()> {
    let renderer = format.renderer();
    let path = output.unwrap_or_else(|| {
        PathBuf::from("charts").join(format!("{}.{}", slug(name), renderer.extension()))
    });
    renderer.render(chart, &path)
}

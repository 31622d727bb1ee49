//! Downloads the DPC regional daily files.
//!
//! The Civil Protection department publishes one CSV per day under
//! `dati-regioni/dpc-covid19-ita-regioni-YYYYMMDD.csv`, plus a `-latest` copy
//! of the most recent day.

mod client;

pub use client::{BasicClient, HttpClient};

use anyhow::{Result, bail};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const DEFAULT_BASE_URL: &str =
    "https://raw.githubusercontent.com/pcm-dpc/COVID-19/master/dati-regioni";

pub const LATEST_FILE: &str = "dpc-covid19-ita-regioni-latest.csv";

/// `dpc-covid19-ita-regioni-YYYYMMDD.csv`
pub fn daily_file_name(date: NaiveDate) -> String {
    format!("dpc-covid19-ita-regioni-{}.csv", date.format("%Y%m%d"))
}

pub fn file_url(base: &str, file_name: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), file_name)
}

/// Every day from `from` to `to`, both included.
pub fn days(from: NaiveDate, to: NaiveDate) -> Result<Vec<NaiveDate>> {
    if from > to {
        bail!("start date {} is after end date {}", from, to);
    }
    Ok(from.iter_days().take_while(|d| *d <= to).collect())
}

pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?.error_for_status()?;
    Ok(resp.bytes().await?.to_vec())
}

/// Downloads `file_name` from `base` into `dir`, returning the written path.
#[tracing::instrument(skip(client, dir), fields(dir = %dir.display()))]
pub async fn fetch_file<C: HttpClient>(
    client: &C,
    base: &str,
    file_name: &str,
    dir: &Path,
) -> Result<PathBuf> {
    let url = file_url(base, file_name);
    let bytes = fetch_bytes(client, &url).await?;
    debug!(bytes = bytes.len(), %url, "Downloaded");

    std::fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    std::fs::write(&path, bytes)?;
    Ok(path)
}

/// Downloads the daily file of every day in `from..=to`, one after another,
/// and returns the written paths in date order.
pub async fn fetch_range<C: HttpClient>(
    client: &C,
    base: &str,
    from: NaiveDate,
    to: NaiveDate,
    dir: &Path,
) -> Result<Vec<PathBuf>> {
    let days = days(from, to)?;
    let mut paths = Vec::with_capacity(days.len());

    for day in days {
        paths.push(fetch_file(client, base, &daily_file_name(day), dir).await?);
    }

    info!(files = paths.len(), %from, %to, "Daily files downloaded");
    Ok(paths)
}

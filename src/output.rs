//! Result files written after a successful run
//!
//! Two files per `(day, area)`: the full series as CSV and a JSON summary of
//! the statistics and selected hours.

use crate::error::Result;
use crate::logging::get_logger;
use crate::normalize::PriceRow;
use crate::pipeline::RunResult;
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const CSV_HEADER: [&str; 2] = ["time", "price_kr_per_kWh_incl_vat"];

/// One hour in the summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourPrice {
    /// Local `HH:MM`
    pub time: String,
    pub price: f64,
}

impl From<&PriceRow> for HourPrice {
    fn from(row: &PriceRow) -> Self {
        Self {
            time: row.hour_label(),
            price: row.price,
        }
    }
}

/// JSON summary of one run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySummary {
    pub date: String,
    pub area: String,
    pub threshold: f64,
    pub min: f64,
    pub median: f64,
    pub avg: f64,
    pub max: f64,
    pub hits: Vec<HourPrice>,
    pub cheapest3: Vec<HourPrice>,
}

impl From<&RunResult> for DaySummary {
    fn from(result: &RunResult) -> Self {
        Self {
            date: result.day.format("%Y-%m-%d").to_string(),
            area: result.area.clone(),
            threshold: result.threshold,
            min: result.stats.min,
            median: result.stats.median,
            avg: result.stats.average,
            max: result.stats.max,
            hits: result.selection.hits.iter().map(HourPrice::from).collect(),
            cheapest3: result
                .selection
                .cheapest3
                .iter()
                .map(HourPrice::from)
                .collect(),
        }
    }
}

/// Paths of the files written for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub csv: PathBuf,
    pub summary: PathBuf,
}

fn file_stem(result: &RunResult) -> String {
    format!("{}_{}", result.day.format("%Y-%m-%d"), result.area)
}

pub fn csv_path(dir: &Path, result: &RunResult) -> PathBuf {
    dir.join(format!("{}.csv", file_stem(result)))
}

pub fn summary_path(dir: &Path, result: &RunResult) -> PathBuf {
    dir.join(format!("{}_summary.json", file_stem(result)))
}

/// Write the series as `time,price` rows with local `YYYY-MM-DD HH:MM` times
pub fn write_csv(path: &Path, rows: &[PriceRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(CSV_HEADER)?;
    for row in rows {
        writer.write_record([
            row.timestamp.format("%Y-%m-%d %H:%M").to_string(),
            format!("{:.6}", row.price),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_summary(path: &Path, summary: &DaySummary) -> Result<()> {
    let contents = serde_json::to_string_pretty(summary)?;
    std::fs::write(path, contents)?;
    Ok(())
}

/// Write both files into `dir`, creating it if needed
pub fn write_outputs(dir: &Path, result: &RunResult) -> Result<OutputPaths> {
    let logger = get_logger("output");
    std::fs::create_dir_all(dir)?;

    let paths = OutputPaths {
        csv: csv_path(dir, result),
        summary: summary_path(dir, result),
    };
    write_csv(&paths.csv, &result.rows)?;
    write_summary(&paths.summary, &DaySummary::from(result))?;

    logger.info(&format!(
        "Saved {} and {}",
        paths.csv.display(),
        paths.summary.display()
    ));
    Ok(paths)
}

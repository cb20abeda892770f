//! One run of the retrieval-and-decision pipeline
//!
//! `(area, day)` → fetch with retries → normalize → statistics → selection.
//! Only the fetch is retried; anything failing after that aborts the run.

use crate::config::Config;
use crate::error::Result;
use crate::feed::{PriceFeed, fetch_with_retries};
use crate::logging::{LogContext, get_logger_with_context};
use crate::normalize::{PriceRow, TimeZoneLookup, normalize_rows_in};
use crate::report;
use crate::selection::{Selection, select_hours};
use crate::stats::{PriceStats, daily_stats};
use chrono::{Local, NaiveDate};

/// Everything one successful run hands to its collaborators
#[derive(Debug, Clone)]
pub struct RunResult {
    pub day: NaiveDate,
    pub area: String,
    pub threshold: f64,
    pub rows: Vec<PriceRow>,
    pub stats: PriceStats,
    pub selection: Selection,
}

/// Explicit day, or tomorrow relative to `today`
pub fn target_day(explicit: Option<NaiveDate>, today: NaiveDate) -> NaiveDate {
    explicit.unwrap_or_else(|| today.succ_opt().unwrap_or(today))
}

/// Explicit day, or tomorrow on the local clock
pub fn target_day_local(explicit: Option<NaiveDate>) -> NaiveDate {
    target_day(explicit, Local::now().date_naive())
}

/// Run the pipeline for one area and day
pub async fn run_pipeline<F>(
    config: &Config,
    feed: &F,
    lookup: &dyn TimeZoneLookup,
    day: NaiveDate,
) -> Result<RunResult>
where
    F: PriceFeed + ?Sized,
{
    let logger = get_logger_with_context(
        LogContext::new("pipeline")
            .with_area(&config.area)
            .with_day(day),
    );
    logger.info(&format!(
        "Starting price check for {}, area {}, threshold {:.2} kr/kWh",
        day, config.area, config.threshold
    ));

    let raw = fetch_with_retries(
        feed,
        &config.area,
        day,
        config.retries,
        config.retry_wait(),
    )
    .await?;

    let rows = normalize_rows_in(&raw, config.include_vat, &config.timezone, lookup)?;
    let prices: Vec<f64> = rows.iter().map(|r| r.price).collect();
    let stats = daily_stats(&prices)?;
    let selection = select_hours(&rows, config.threshold, stats.median);

    logger.info(&format!(
        "Results for {}: {} hours ≤ {:.2} kr/kWh",
        day,
        selection.hits.len(),
        config.threshold
    ));
    let show_text = if selection.show.is_empty() {
        "None".to_string()
    } else {
        report::join_items(&selection.show, " | ")
    };
    logger.info(&format!("Cheap hours: {}", show_text));
    logger.info(&format!(
        "Cheapest 3: {}",
        report::join_items(&selection.cheapest3, ", ")
    ));
    logger.info(&format!("Price stats: {}", report::stats_text(&stats, ", ")));

    Ok(RunResult {
        day,
        area: config.area.clone(),
        threshold: config.threshold,
        rows,
        stats,
        selection,
    })
}

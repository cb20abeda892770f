//! A complete price check: pipeline plus its collaborators
//!
//! Prints the console report, sends the notification and writes the result
//! files. Notification delivery never changes the outcome; a failed file
//! write does.

use crate::config::Config;
use crate::error::Result;
use crate::feed::PriceFeed;
use crate::logging::get_logger;
use crate::normalize::TimeZoneLookup;
use crate::notify::Notifier;
use crate::output::{OutputPaths, write_outputs};
use crate::pipeline::{RunResult, run_pipeline};
use crate::report;
use chrono::NaiveDate;

/// What a successful check produced
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub result: RunResult,
    pub files: OutputPaths,
}

/// Run one check for `day`
pub async fn run_check<F>(
    config: &Config,
    feed: &F,
    lookup: &dyn TimeZoneLookup,
    notifier: &dyn Notifier,
    day: NaiveDate,
) -> Result<CheckOutcome>
where
    F: PriceFeed + ?Sized,
{
    let outcome = check_and_report(config, feed, lookup, notifier, day).await;

    if let Err(e) = &outcome {
        get_logger("app").error(&format!("Price check failed: {}", e));
        if config.show_notifications {
            notifier.notify(report::NOTIFY_ERROR_TITLE, &report::failure_notification(e));
        }
    }
    outcome
}

async fn check_and_report<F>(
    config: &Config,
    feed: &F,
    lookup: &dyn TimeZoneLookup,
    notifier: &dyn Notifier,
    day: NaiveDate,
) -> Result<CheckOutcome>
where
    F: PriceFeed + ?Sized,
{
    let result = run_pipeline(config, feed, lookup, day).await?;

    for line in report::console_lines(&result) {
        println!("{}", line);
    }
    if config.show_notifications {
        notifier.notify(report::NOTIFY_TITLE, &report::success_notification(&result));
    }

    let files = write_outputs(&config.output_dir(), &result)?;
    Ok(CheckOutcome { result, files })
}

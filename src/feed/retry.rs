//! Run-level retry policy around a single feed fetch

use crate::error::{Result, StromprisError};
use crate::feed::client::PriceFeed;
use crate::feed::types::RawPriceRecord;
use crate::logging::{LogContext, get_logger_with_context};
use chrono::NaiveDate;
use std::time::Duration;

/// Fetch with a bounded number of attempts, sleeping `wait` between them.
///
/// Fetch and validation failures are retried alike. The run gives up once the
/// attempt count exceeds `max(1, retries)` and reports
/// [`StromprisError::RetriesExhausted`], which the binary turns into exit status 2.
pub async fn fetch_with_retries<F>(
    feed: &F,
    area: &str,
    day: NaiveDate,
    retries: u32,
    wait: Duration,
) -> Result<Vec<RawPriceRecord>>
where
    F: PriceFeed + ?Sized,
{
    let logger = get_logger_with_context(LogContext::new("feed").with_area(area).with_day(day));
    let budget = retries.max(1);
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;
        match feed.fetch(area, day).await {
            Ok(records) => {
                if attempt > 1 {
                    logger.info(&format!("Prices fetched on attempt {}", attempt));
                }
                return Ok(records);
            }
            Err(e) => {
                if attempt > budget {
                    logger.error(&format!(
                        "Fetch failed after {} retries: {}",
                        attempt - 1,
                        e
                    ));
                    return Err(StromprisError::retries_exhausted(attempt, e.to_string()));
                }
                logger.warn(&format!(
                    "Not published yet or fetch error on attempt {}: {} -> {} attempt(s) left, next in {} min",
                    attempt,
                    e,
                    attempts_left(attempt, budget),
                    wait.as_secs() / 60
                ));
                tokio::time::sleep(wait).await;
            }
        }
    }
}

/// Attempts still to come after `attempt` has failed; the first try is not a retry
fn attempts_left(attempt: u32, budget: u32) -> u32 {
    (budget + 1).saturating_sub(attempt)
}

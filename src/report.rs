//! Human-readable rendering of a run's result
//!
//! Console lines for interactive runs and the short notification texts.

use crate::normalize::PriceRow;
use crate::pipeline::RunResult;
use crate::stats::PriceStats;

pub const NOTIFY_TITLE: &str = "⚡ Strompris";
pub const NOTIFY_ERROR_TITLE: &str = "❌ Strompris Error";

/// How many hit times a notification lists before summarising the rest
const NOTIFY_MAX_TIMES: usize = 3;
const NOTIFY_ERROR_MAX_CHARS: usize = 100;

/// `HH:MM 0.43 kr/kWh`
pub fn format_item(row: &PriceRow) -> String {
    format!("{} {:.2} kr/kWh", row.hour_label(), row.price)
}

pub fn join_items(rows: &[PriceRow], separator: &str) -> String {
    rows.iter()
        .map(format_item)
        .collect::<Vec<_>>()
        .join(separator)
}

pub fn stats_text(stats: &PriceStats, separator: &str) -> String {
    [
        format!("min {:.2}", stats.min),
        format!("median {:.2}", stats.median),
        format!("avg {:.2}", stats.average),
        format!("max {:.2}", stats.max),
    ]
    .join(separator)
}

/// Lines printed to stdout after a successful run
pub fn console_lines(result: &RunResult) -> Vec<String> {
    let title = if result.selection.is_fallback() {
        "Below median:".to_string()
    } else {
        format!("≤ {:.2} kr/kWh:", result.threshold)
    };

    vec![
        format!("Date: {}  Area: {}", result.day, result.area),
        format!("{} {}", title, join_items(&result.selection.show, " | ")),
        format!(
            "Cheapest 3: {}",
            join_items(&result.selection.cheapest3, ", ")
        ),
        format!("Stats: {}", stats_text(&result.stats, "  ")),
    ]
}

/// Notification body after a successful run
pub fn success_notification(result: &RunResult) -> String {
    let hits = &result.selection.hits;
    if !hits.is_empty() {
        let times = hits
            .iter()
            .take(NOTIFY_MAX_TIMES)
            .map(PriceRow::hour_label)
            .collect::<Vec<_>>()
            .join(", ");
        let mut msg = format!("Cheap hours {}: {}", result.day, times);
        if hits.len() > NOTIFY_MAX_TIMES {
            msg.push_str(&format!(" (+{} more)", hits.len() - NOTIFY_MAX_TIMES));
        }
        return msg;
    }

    match result.selection.cheapest3.first() {
        Some(cheapest) => format!(
            "No hours ≤{:.2} kr. Cheapest: {} ({:.2} kr)",
            result.threshold,
            cheapest.hour_label(),
            cheapest.price
        ),
        None => format!("No hours ≤{:.2} kr.", result.threshold),
    }
}

/// Notification body after a failed run
pub fn failure_notification(error: &dyn std::fmt::Display) -> String {
    let text: String = error
        .to_string()
        .chars()
        .take(NOTIFY_ERROR_MAX_CHARS)
        .collect();
    format!("Failed to get prices: {}", text)
}

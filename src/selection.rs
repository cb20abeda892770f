//! Cheap-hour selection
//!
//! Turns the day's series, the configured threshold and the daily median into
//! the hours worth flagging. All three views keep the rows' timestamp order
//! except `cheapest3`, which is ordered by price.

use crate::normalize::PriceRow;

/// How many of the cheapest hours are always reported
pub const CHEAPEST_COUNT: usize = 3;

/// Hours selected from one day's series
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Rows priced at or below the threshold
    pub hits: Vec<PriceRow>,
    /// Rows surfaced to the user: `hits`, or below-median rows when there are none
    pub show: Vec<PriceRow>,
    /// Up to three cheapest rows, cheapest first; ties keep timestamp order
    pub cheapest3: Vec<PriceRow>,
}

impl Selection {
    /// Whether `show` came from the median fallback
    pub fn is_fallback(&self) -> bool {
        self.hits.is_empty()
    }
}

/// Select hits, the show set and the cheapest hours
///
/// A series shorter than three rows yields a shorter `cheapest3`.
pub fn select_hours(rows: &[PriceRow], threshold: f64, median: f64) -> Selection {
    let hits: Vec<PriceRow> = rows
        .iter()
        .filter(|row| row.price <= threshold)
        .cloned()
        .collect();

    let show = if hits.is_empty() {
        rows.iter()
            .filter(|row| row.price < median)
            .cloned()
            .collect()
    } else {
        hits.clone()
    };

    let mut by_price = rows.to_vec();
    by_price.sort_by(|a, b| a.price.total_cmp(&b.price));
    by_price.truncate(CHEAPEST_COUNT);

    Selection {
        hits,
        show,
        cheapest3: by_price,
    }
}

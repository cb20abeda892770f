//! Normalization of raw feed records into the local price series
//!
//! Raw records carry UTC instants and wholesale prices. The normalized series
//! carries local wall-clock timestamps (so DST days show 23 or 25 rows) and
//! prices with the optional VAT factor applied, rounded to six decimals and
//! sorted by time.

use crate::config::DEFAULT_TIMEZONE;
use crate::error::{Result, StromprisError};
use crate::feed::RawPriceRecord;
use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;

/// Norwegian VAT applied to household electricity
pub const VAT_FACTOR: f64 = 1.25;

/// One hour of the canonical price series
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRow {
    /// Local start of the hour, carrying the UTC offset in force at that instant
    pub timestamp: DateTime<FixedOffset>,
    /// Price in kr/kWh, rounded to 6 decimals
    pub price: f64,
}

impl PriceRow {
    /// Local `HH:MM` label
    pub fn hour_label(&self) -> String {
        self.timestamp.format("%H:%M").to_string()
    }

    /// Back to the feed's shape; the timestamp keeps its local offset
    pub fn to_raw(&self) -> RawPriceRecord {
        RawPriceRecord::new(self.price, self.timestamp.to_rfc3339())
    }
}

/// Resolves a zone identifier to the local representation of an instant
pub trait TimeZoneLookup: Send + Sync {
    fn to_local(&self, zone: &str, instant: DateTime<Utc>) -> Result<DateTime<FixedOffset>>;
}

/// IANA time zone database compiled in through `chrono-tz`
#[derive(Debug, Clone, Copy, Default)]
pub struct ChronoTzLookup;

impl TimeZoneLookup for ChronoTzLookup {
    fn to_local(&self, zone: &str, instant: DateTime<Utc>) -> Result<DateTime<FixedOffset>> {
        let tz: Tz = zone.parse().map_err(|_| {
            StromprisError::validation("timezone", format!("Unknown time zone '{}'", zone))
        })?;
        Ok(instant.with_timezone(&tz).fixed_offset())
    }
}

/// Round a price to 6 fractional digits
///
/// The exact binary value is rounded once, through fixed-point formatting.
pub fn round_price(value: f64) -> f64 {
    format!("{:.6}", value).parse().unwrap_or(value)
}

fn tax_factor(apply_tax: bool) -> f64 {
    if apply_tax { VAT_FACTOR } else { 1.0 }
}

/// Parse a feed timestamp (`Z` or an explicit offset) as a UTC instant
pub fn parse_instant(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            StromprisError::validation(
                "time_start",
                format!("Invalid time_start format '{}': {}", raw, e),
            )
        })
}

/// Normalize into the default zone (Europe/Oslo)
pub fn normalize_rows(raw: &[RawPriceRecord], apply_tax: bool) -> Result<Vec<PriceRow>> {
    normalize_rows_in(raw, apply_tax, DEFAULT_TIMEZONE, &ChronoTzLookup)
}

/// Normalize into `zone`, resolving offsets through `lookup`
pub fn normalize_rows_in(
    raw: &[RawPriceRecord],
    apply_tax: bool,
    zone: &str,
    lookup: &dyn TimeZoneLookup,
) -> Result<Vec<PriceRow>> {
    let factor = tax_factor(apply_tax);

    let mut rows = raw
        .iter()
        .map(|record| {
            let instant = parse_instant(&record.time_start)?;
            Ok(PriceRow {
                timestamp: lookup.to_local(zone, instant)?,
                price: round_price(record.nok_per_kwh * factor),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    // sort_by_key is stable, so equal instants keep feed order
    rows.sort_by_key(|row| row.timestamp);
    Ok(rows)
}

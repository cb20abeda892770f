//! Payload shape validation for the price feed

use crate::error::{Result, StromprisError};
use crate::feed::types::RawPriceRecord;
use serde_json::Value;

pub const PRICE_FIELD: &str = "NOK_per_kWh";
pub const TIME_FIELD: &str = "time_start";

/// Record counts accepted from the feed (25 on the autumn DST change)
const VALID_RECORD_COUNTS: [usize; 2] = [24, 25];

/// Parse a raw response body into validated records
pub fn parse_payload(body: &[u8]) -> Result<Vec<RawPriceRecord>> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| StromprisError::validation("payload", format!("Invalid JSON: {}", e)))?;
    validate_payload(&value)
}

/// Validate an already-decoded payload and extract the records in order
pub fn validate_payload(value: &Value) -> Result<Vec<RawPriceRecord>> {
    let Some(items) = value.as_array() else {
        return Err(StromprisError::validation(
            "payload",
            format!("Expected a JSON array, got {}", type_name(value)),
        ));
    };

    if !VALID_RECORD_COUNTS.contains(&items.len()) {
        return Err(StromprisError::validation(
            "payload",
            format!("Expected 24 or 25 records, got {}", items.len()),
        ));
    }

    items
        .iter()
        .enumerate()
        .map(|(idx, item)| validate_record(idx, item))
        .collect()
}

fn validate_record(idx: usize, item: &Value) -> Result<RawPriceRecord> {
    let Some(obj) = item.as_object() else {
        return Err(StromprisError::validation(
            "payload",
            format!("Record {} is {}, expected an object", idx, type_name(item)),
        ));
    };

    let (Some(price), Some(start)) = (obj.get(PRICE_FIELD), obj.get(TIME_FIELD)) else {
        return Err(StromprisError::validation(
            PRICE_FIELD,
            format!(
                "Record {} is missing {} or {}: {}",
                idx, PRICE_FIELD, TIME_FIELD, item
            ),
        ));
    };

    let nok_per_kwh = coerce_price(price).ok_or_else(|| {
        StromprisError::validation(
            PRICE_FIELD,
            format!("Record {} has invalid price value {}", idx, price),
        )
    })?;

    let time_start = match start.as_str() {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => {
            return Err(StromprisError::validation(
                TIME_FIELD,
                format!("Record {} has invalid start time {}", idx, start),
            ));
        }
    };

    Ok(RawPriceRecord {
        nok_per_kwh,
        time_start,
    })
}

/// Numbers pass through; numeric strings are coerced. Non-finite values are rejected.
fn coerce_price(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    parsed.is_finite().then_some(parsed)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

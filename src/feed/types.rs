/// One hourly record as published by the feed
///
/// Field names on the wire are `NOK_per_kWh` and `time_start`; other fields
/// the feed sends (`EUR_per_kWh`, `EXR`, `time_end`) are not kept.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPriceRecord {
    pub nok_per_kwh: f64,
    pub time_start: String,
}

impl RawPriceRecord {
    pub fn new(nok_per_kwh: f64, time_start: impl Into<String>) -> Self {
        Self {
            nok_per_kwh,
            time_start: time_start.into(),
        }
    }
}

/// Result of probing a single trust option against the feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Request succeeded and the payload validated
    Success { records: usize },
    /// Connection worked but the server answered with a non-2xx status
    HttpStatus(u16),
    /// Connection, TLS or payload failure
    Failed(String),
    /// Option not configured or its bundle file is missing
    Unavailable,
}

/// Per-option probe report used by the TLS check
#[derive(Debug, Clone)]
pub struct TrustProbe {
    pub option: String,
    pub outcome: ProbeOutcome,
}

impl std::fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeOutcome::Success { records } => write!(f, "OK ({} records)", records),
            ProbeOutcome::HttpStatus(code) => write!(f, "connected, HTTP {}", code),
            ProbeOutcome::Failed(reason) => write!(f, "FAILED: {}", reason),
            ProbeOutcome::Unavailable => write!(f, "skipped"),
        }
    }
}

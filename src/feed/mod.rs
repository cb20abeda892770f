//! Day-ahead price feed integration
//!
//! Retrieves one day of hourly prices for one area from the public
//! hvakosterstrommen.no API, validates the payload shape, and wraps the
//! fetch in the run-level retry policy. Trust-store fallback for the TLS
//! handshake lives in [`tls`].

pub mod client;
pub mod retry;
pub mod tls;
pub mod types;
pub mod validate;

pub use client::{HvaKosterStrommenFeed, PriceFeed, price_url};
pub use retry::fetch_with_retries;
pub use tls::{TlsSettings, TrustOption};
pub use types::{ProbeOutcome, RawPriceRecord, TrustProbe};
pub use validate::{parse_payload, validate_payload};

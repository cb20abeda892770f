//! # Strompris - day-ahead electricity price alerts
//!
//! Fetches tomorrow's hourly prices for a Norwegian price area from
//! hvakosterstrommen.no, converts them to local time with optional VAT,
//! and picks out the hours worth shifting consumption into.
//!
//! ## Features
//!
//! - **Resilient fetching**: bounded retries with a fixed wait between attempts
//! - **TLS fallback**: corporate CA bundles, environment bundles and bundled
//!   roots are tried in turn when certificate verification fails
//! - **DST aware**: 23- and 25-hour days come out with correct local hours
//! - **Reports**: console summary, desktop notification, CSV and JSON files
//! - **Configuration**: YAML-based configuration with validation
//!
//! ## Architecture
//!
//! - `feed`: price API client, payload validation, retries and trust options
//! - `normalize`: UTC records to the local, VAT-adjusted price series
//! - `stats`: min, median, average and max for the day
//! - `selection`: threshold hits, median fallback and the cheapest hours
//! - `pipeline`: fetch, normalize, stats and selection for one run
//! - `app`: pipeline plus report, notification and result files
//! - `report`, `output`, `notify`: the run's collaborators
//! - `config`, `logging`, `error`: ambient plumbing

pub mod app;
pub mod config;
pub mod error;
pub mod feed;
pub mod logging;
pub mod normalize;
pub mod notify;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod selection;
pub mod stats;

// Re-export commonly used types
pub use config::Config;
pub use error::{Result, StromprisError};
pub use feed::{HvaKosterStrommenFeed, PriceFeed, RawPriceRecord};
pub use normalize::PriceRow;
pub use pipeline::{RunResult, run_pipeline};

use crate::config::Config;
use crate::error::{Result, StromprisError};
use crate::feed::tls::{TlsSettings, TrustOption, error_chain, is_tls_failure};
use crate::feed::types::{ProbeOutcome, RawPriceRecord, TrustProbe};
use crate::feed::validate::parse_payload;
use crate::logging::{LogContext, StructuredLogger, get_logger, get_logger_with_context};
use chrono::{Datelike, NaiveDate};
use std::time::Duration;

/// Source of one day's raw price records for one area
#[async_trait::async_trait]
pub trait PriceFeed: Send + Sync {
    async fn fetch(&self, area: &str, day: NaiveDate) -> Result<Vec<RawPriceRecord>>;
}

/// Build the feed URL for one area and day
///
/// `https://www.hvakosterstrommen.no/api/v1/prices/2025/08-17_NO1.json`
pub fn price_url(base_url: &str, area: &str, day: NaiveDate) -> String {
    format!(
        "{}/api/v1/prices/{:04}/{:02}-{:02}_{}.json",
        base_url.trim_end_matches('/'),
        day.year(),
        day.month(),
        day.day(),
        area
    )
}

/// HTTP client for the hvakosterstrommen.no price API
pub struct HvaKosterStrommenFeed {
    base_url: String,
    timeout: Duration,
    tls: TlsSettings,
    logger: StructuredLogger,
}

impl HvaKosterStrommenFeed {
    /// Create new feed client
    pub fn new(base_url: impl Into<String>, timeout: Duration, tls: TlsSettings) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
            tls,
            logger: get_logger("feed"),
        }
    }

    /// Create a feed client from run configuration and resolved trust settings
    pub fn from_config(config: &Config, tls: TlsSettings) -> Self {
        Self::new(config.feed.base_url.clone(), config.feed_timeout(), tls)
    }

    /// GET `url`, walking the trust chain on certificate failures
    async fn get_with_trust_fallback(&self, url: &str) -> Result<reqwest::Response> {
        let chain = self.tls.trust_chain();
        if self.tls.skip_verify {
            self.logger
                .warn("Certificate verification disabled by operator request");
        }

        let mut failures: Vec<String> = Vec::new();
        for option in &chain {
            let client = match option.build_client(self.timeout) {
                Ok(client) => client,
                Err(e) => {
                    self.logger
                        .warn(&format!("Trust option '{}' unusable: {}", option, e));
                    failures.push(format!("{}: {}", option, e));
                    continue;
                }
            };

            match client.get(url).send().await {
                Ok(resp) => {
                    if !failures.is_empty() {
                        self.logger.info(&format!(
                            "Connected using trust option '{}' after {} failed option(s)",
                            option,
                            failures.len()
                        ));
                    }
                    return Ok(resp);
                }
                Err(e) if is_tls_failure(&e) && !option.is_skip_verify() => {
                    let detail = error_chain(&e);
                    self.logger.warn(&format!(
                        "TLS verification failed with '{}': {}",
                        option, detail
                    ));
                    failures.push(format!("{}: {}", option, detail));
                }
                Err(e) => {
                    return Err(StromprisError::fetch(format!(
                        "Request to {} failed: {}",
                        url,
                        error_chain(&e)
                    )));
                }
            }
        }

        Err(StromprisError::fetch(format!(
            "TLS verification failed with all trust options [{}]. Point {} at your \
             organisation's CA bundle, or set {}=true as a last resort",
            failures.join("; "),
            crate::feed::tls::CORPORATE_BUNDLE_VAR,
            crate::feed::tls::SKIP_VERIFY_VAR,
        )))
    }

    /// Probe every trust option against the feed and report what works
    pub async fn probe_trust_options(&self, area: &str, day: NaiveDate) -> Vec<TrustProbe> {
        let url = price_url(&self.base_url, area, day);
        let mut report = Vec::new();
        for (label, option) in self.tls.probe_candidates() {
            let outcome = match option {
                Some(option) => self.probe_one(&option, &url).await,
                None => ProbeOutcome::Unavailable,
            };
            report.push(TrustProbe {
                option: label,
                outcome,
            });
        }
        report
    }

    async fn probe_one(&self, option: &TrustOption, url: &str) -> ProbeOutcome {
        let client = match option.build_client(self.timeout) {
            Ok(client) => client,
            Err(e) => return ProbeOutcome::Failed(e.to_string()),
        };
        let resp = match client.get(url).send().await {
            Ok(resp) => resp,
            Err(e) => return ProbeOutcome::Failed(error_chain(&e)),
        };
        if !resp.status().is_success() {
            return ProbeOutcome::HttpStatus(resp.status().as_u16());
        }
        match resp.bytes().await {
            Ok(body) => match parse_payload(&body) {
                Ok(records) => ProbeOutcome::Success {
                    records: records.len(),
                },
                Err(e) => ProbeOutcome::Failed(e.to_string()),
            },
            Err(e) => ProbeOutcome::Failed(error_chain(&e)),
        }
    }
}

#[async_trait::async_trait]
impl PriceFeed for HvaKosterStrommenFeed {
    async fn fetch(&self, area: &str, day: NaiveDate) -> Result<Vec<RawPriceRecord>> {
        let logger = get_logger_with_context(
            LogContext::new("feed").with_area(area).with_day(day),
        );
        let url = price_url(&self.base_url, area, day);
        logger.debug(&format!("GET {}", url));

        let resp = self.get_with_trust_fallback(&url).await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(StromprisError::fetch(format!(
                "HTTP {} from {}",
                status, url
            )));
        }

        let body = resp.bytes().await?;
        let records = parse_payload(&body)?;
        logger.debug(&format!("Received {} price records", records.len()));
        Ok(records)
    }
}

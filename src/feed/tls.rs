//! Trust-store resolution for the feed connection
//!
//! Options are tried in a fixed order: corporate bundle, the conventional
//! `SSL_CERT_FILE` / `REQUESTS_CA_BUNDLE` bundles, then the webpki roots
//! compiled into rustls. Skipping verification is only ever used when the
//! operator asks for it, and then it is the only option.

use crate::config::TlsConfig;
use crate::error::{Result, StromprisError};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CORPORATE_BUNDLE_VAR: &str = "CORPORATE_CA_BUNDLE";
pub const BUNDLE_VARS: [&str; 2] = ["SSL_CERT_FILE", "REQUESTS_CA_BUNDLE"];
pub const SKIP_VERIFY_VAR: &str = "SKIP_SSL_VERIFY";

const USER_AGENT: &str = concat!("strompris/", env!("CARGO_PKG_VERSION"));

/// One way of establishing trust for the TLS handshake
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrustOption {
    /// Operator-supplied corporate CA bundle
    CorporateBundle(PathBuf),
    /// Bundle named by a conventional environment variable
    EnvBundle { var: &'static str, path: PathBuf },
    /// webpki roots shipped with rustls
    BundledRoots,
    /// Certificate verification disabled
    SkipVerify,
}

impl fmt::Display for TrustOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrustOption::CorporateBundle(path) => {
                write!(f, "corporate bundle ({})", path.display())
            }
            TrustOption::EnvBundle { var, path } => write!(f, "{} ({})", var, path.display()),
            TrustOption::BundledRoots => write!(f, "bundled roots"),
            TrustOption::SkipVerify => write!(f, "no verification"),
        }
    }
}

impl TrustOption {
    pub fn is_skip_verify(&self) -> bool {
        matches!(self, TrustOption::SkipVerify)
    }

    /// Build an HTTP client that trusts exactly what this option names
    pub fn build_client(&self, timeout: Duration) -> Result<reqwest::Client> {
        let builder = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT);

        let builder = match self {
            TrustOption::CorporateBundle(path) | TrustOption::EnvBundle { path, .. } => {
                let mut builder = builder.tls_built_in_root_certs(false);
                for cert in load_pem_bundle(path)? {
                    builder = builder.add_root_certificate(cert);
                }
                builder
            }
            TrustOption::BundledRoots => builder,
            TrustOption::SkipVerify => builder.danger_accept_invalid_certs(true),
        };

        builder.build().map_err(StromprisError::from)
    }
}

fn load_pem_bundle(path: &Path) -> Result<Vec<reqwest::Certificate>> {
    let pem = std::fs::read(path).map_err(|e| {
        StromprisError::fetch(format!("Cannot read CA bundle {}: {}", path.display(), e))
    })?;
    let certs = reqwest::Certificate::from_pem_bundle(&pem).map_err(|e| {
        StromprisError::fetch(format!("Invalid CA bundle {}: {}", path.display(), e))
    })?;
    if certs.is_empty() {
        return Err(StromprisError::fetch(format!(
            "CA bundle {} contains no certificates",
            path.display()
        )));
    }
    Ok(certs)
}

/// Trust settings resolved once at startup from config and environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TlsSettings {
    pub corporate_ca_bundle: Option<PathBuf>,
    pub env_bundles: Vec<(&'static str, PathBuf)>,
    pub skip_verify: bool,
}

impl TlsSettings {
    /// Resolve from the process environment
    pub fn from_env(config: &TlsConfig) -> Self {
        Self::from_lookup(config, |name| std::env::var(name).ok())
    }

    /// Resolve using an arbitrary variable lookup; the environment wins over config
    pub fn from_lookup<F>(config: &TlsConfig, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let corporate_ca_bundle = non_empty(CORPORATE_BUNDLE_VAR)
            .or_else(|| config.corporate_ca_bundle.clone())
            .map(PathBuf::from);

        let env_bundles = BUNDLE_VARS
            .iter()
            .filter_map(|&var| non_empty(var).map(|v| (var, PathBuf::from(v))))
            .collect();

        let skip_verify = config.skip_verify
            || non_empty(SKIP_VERIFY_VAR)
                .map(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes"))
                .unwrap_or(false);

        Self {
            corporate_ca_bundle,
            env_bundles,
            skip_verify,
        }
    }

    /// Ordered trust options to try for one request
    pub fn trust_chain(&self) -> Vec<TrustOption> {
        if self.skip_verify {
            return vec![TrustOption::SkipVerify];
        }

        let mut chain = Vec::new();
        if let Some(path) = self.corporate_ca_bundle.as_ref().filter(|p| p.is_file()) {
            chain.push(TrustOption::CorporateBundle(path.clone()));
        }
        for &(var, ref path) in &self.env_bundles {
            // The same file is often exported under both variable names
            let seen = chain.iter().any(|opt| match opt {
                TrustOption::CorporateBundle(p) | TrustOption::EnvBundle { path: p, .. } => {
                    p == path
                }
                _ => false,
            });
            if path.is_file() && !seen {
                chain.push(TrustOption::EnvBundle {
                    var,
                    path: path.clone(),
                });
            }
        }
        chain.push(TrustOption::BundledRoots);
        chain
    }

    /// Every option the TLS check reports on, with `None` where the option
    /// is not configured or its file is missing
    pub fn probe_candidates(&self) -> Vec<(String, Option<TrustOption>)> {
        let mut out = Vec::new();

        match &self.corporate_ca_bundle {
            Some(path) if path.is_file() => out.push((
                format!("{} ({})", CORPORATE_BUNDLE_VAR, path.display()),
                Some(TrustOption::CorporateBundle(path.clone())),
            )),
            Some(path) => out.push((
                format!("{} ({}, missing)", CORPORATE_BUNDLE_VAR, path.display()),
                None,
            )),
            None => out.push((format!("{} (not set)", CORPORATE_BUNDLE_VAR), None)),
        }

        for var in BUNDLE_VARS {
            match self.env_bundles.iter().find(|(v, _)| *v == var) {
                Some((_, path)) if path.is_file() => out.push((
                    format!("{} ({})", var, path.display()),
                    Some(TrustOption::EnvBundle {
                        var,
                        path: path.clone(),
                    }),
                )),
                Some((_, path)) => {
                    out.push((format!("{} ({}, missing)", var, path.display()), None))
                }
                None => out.push((format!("{} (not set)", var), None)),
            }
        }

        out.push((
            TrustOption::BundledRoots.to_string(),
            Some(TrustOption::BundledRoots),
        ));
        out.push((
            TrustOption::SkipVerify.to_string(),
            Some(TrustOption::SkipVerify),
        ));
        out
    }
}

/// Full source chain of an error, joined for log output
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut parts = vec![err.to_string()];
    let mut source = err.source();
    while let Some(inner) = source {
        parts.push(inner.to_string());
        source = inner.source();
    }
    parts.join(": ")
}

/// Whether a request failed during certificate validation or the TLS handshake
///
/// Only the causes below reqwest's own message are inspected; that message
/// carries the request URL, whose host name may contain any of the needles.
pub fn is_tls_failure(err: &reqwest::Error) -> bool {
    if !err.is_connect() && !err.is_request() {
        return false;
    }
    let Some(cause) = std::error::Error::source(err) else {
        return false;
    };
    let chain = error_chain(cause).to_lowercase();
    ["certificate", "unknownissuer", "handshake", "tls", "ssl"]
        .iter()
        .any(|needle| chain.contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn empty_environment_falls_back_to_bundled_roots() {
        let settings = TlsSettings::from_lookup(&TlsConfig::default(), lookup_from(&[]));
        assert_eq!(settings.trust_chain(), vec![TrustOption::BundledRoots]);
    }

    #[test]
    fn chain_order_follows_corporate_then_env_bundles() {
        let dir = tempfile::tempdir().unwrap();
        let corp = dir.path().join("corp.pem");
        let ssl = dir.path().join("ssl.pem");
        std::fs::write(&corp, "x").unwrap();
        std::fs::write(&ssl, "x").unwrap();

        let settings = TlsSettings::from_lookup(
            &TlsConfig::default(),
            lookup_from(&[
                ("CORPORATE_CA_BUNDLE", corp.to_str().unwrap()),
                ("SSL_CERT_FILE", ssl.to_str().unwrap()),
                ("REQUESTS_CA_BUNDLE", ssl.to_str().unwrap()),
            ]),
        );

        assert_eq!(
            settings.trust_chain(),
            vec![
                TrustOption::CorporateBundle(corp),
                TrustOption::EnvBundle {
                    var: "SSL_CERT_FILE",
                    path: ssl,
                },
                TrustOption::BundledRoots,
            ]
        );
    }

    #[test]
    fn missing_bundle_files_are_skipped() {
        let settings = TlsSettings::from_lookup(
            &TlsConfig {
                corporate_ca_bundle: Some("/nonexistent/corp.pem".to_string()),
                skip_verify: false,
            },
            lookup_from(&[("REQUESTS_CA_BUNDLE", "/nonexistent/req.pem")]),
        );
        assert_eq!(settings.trust_chain(), vec![TrustOption::BundledRoots]);
    }

    #[test]
    fn skip_verify_is_exclusive_and_opt_in() {
        let settings =
            TlsSettings::from_lookup(&TlsConfig::default(), lookup_from(&[("SKIP_SSL_VERIFY", "Yes")]));
        assert_eq!(settings.trust_chain(), vec![TrustOption::SkipVerify]);

        let settings =
            TlsSettings::from_lookup(&TlsConfig::default(), lookup_from(&[("SKIP_SSL_VERIFY", "no")]));
        assert!(!settings.skip_verify);
        assert!(!settings.trust_chain().contains(&TrustOption::SkipVerify));
    }

    #[test]
    fn probe_candidates_cover_every_option() {
        let settings = TlsSettings::from_lookup(&TlsConfig::default(), lookup_from(&[]));
        let candidates = settings.probe_candidates();
        assert_eq!(candidates.len(), 5);
        assert!(candidates[0].1.is_none());
        assert_eq!(candidates[3].1, Some(TrustOption::BundledRoots));
        assert_eq!(candidates[4].1, Some(TrustOption::SkipVerify));
    }

    #[test]
    fn unreadable_bundle_fails_client_build() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("empty.pem");
        std::fs::write(&empty, "").unwrap();
        let err = TrustOption::CorporateBundle(empty)
            .build_client(Duration::from_secs(1))
            .unwrap_err();
        assert!(matches!(err, StromprisError::Fetch { .. }));
    }

    #[tokio::test]
    async fn dns_failure_on_tls_like_host_is_not_a_tls_failure() {
        let client = TrustOption::BundledRoots
            .build_client(Duration::from_secs(5))
            .unwrap();
        let err = client
            .get("https://prices.sslproxy-tls-certificate.invalid/api")
            .send()
            .await
            .unwrap_err();
        assert!(error_chain(&err).contains("sslproxy"));
        assert!(!is_tls_failure(&err));
    }
}

use super::*;

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.hvakosterstrommen.no".to_string(),
            timeout_secs: 20,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: "data/outputs".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            console_level: None,
            file_level: None,
            file: "data/logs/strompris.log".to_string(),
            backup_count: 14,
            console_output: true,
            json_format: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            area: DEFAULT_AREA.to_string(),
            include_vat: true,
            threshold: 0.50,
            retries: 0,
            retry_interval_min: 30,
            show_notifications: true,
            timezone: DEFAULT_TIMEZONE.to_string(),
            feed: FeedConfig::default(),
            tls: TlsConfig::default(),
            output: OutputConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{Value, json};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use strompris::app::run_check;
use strompris::feed::{HvaKosterStrommenFeed, PriceFeed, RawPriceRecord, TlsSettings};
use strompris::normalize::ChronoTzLookup;
use strompris::notify::Notifier;
use strompris::report::{NOTIFY_ERROR_TITLE, NOTIFY_TITLE};
use strompris::{Config, Result, StromprisError};

const PRICES: [f64; 24] = [
    0.62, 0.55, 0.48, 0.41, 0.39, 0.45, 0.70, 0.95, 1.10, 1.02, 0.88, 0.74, 0.60, 0.52, 0.47,
    0.50, 0.66, 0.91, 1.25, 1.30, 1.05, 0.83, 0.71, 0.58,
];

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 8, 17).unwrap()
}

fn records() -> Vec<RawPriceRecord> {
    PRICES
        .iter()
        .enumerate()
        .map(|(h, &p)| RawPriceRecord::new(p, format!("2025-08-17T{:02}:00:00+02:00", h)))
        .collect()
}

#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, title: &str, message: &str) -> bool {
        self.sent
            .lock()
            .unwrap()
            .push((title.to_string(), message.to_string()));
        true
    }
}

struct FixedFeed;

#[async_trait]
impl PriceFeed for FixedFeed {
    async fn fetch(&self, _area: &str, _day: NaiveDate) -> Result<Vec<RawPriceRecord>> {
        Ok(records())
    }
}

#[derive(Default)]
struct DownFeed {
    calls: AtomicU32,
}

#[async_trait]
impl PriceFeed for DownFeed {
    async fn fetch(&self, _area: &str, _day: NaiveDate) -> Result<Vec<RawPriceRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(StromprisError::fetch("connection refused"))
    }
}

fn config_in(dir: &std::path::Path) -> Config {
    let mut config = Config::default();
    config.include_vat = false;
    config.threshold = 0.50;
    config.output.dir = dir.join("outputs").to_string_lossy().to_string();
    config
}

#[tokio::test]
async fn successful_check_notifies_and_writes_files() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config_in(tmp.path());
    let notifier = RecordingNotifier::default();

    let outcome = run_check(&config, &FixedFeed, &ChronoTzLookup, &notifier, day())
        .await
        .unwrap();

    assert_eq!(outcome.result.selection.hits.len(), 6);
    assert!(outcome.files.csv.ends_with("2025-08-17_NO1.csv"));
    assert!(outcome.files.csv.is_file());
    assert!(outcome.files.summary.is_file());

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, NOTIFY_TITLE);
    assert_eq!(
        sent[0].1,
        "Cheap hours 2025-08-17: 02:00, 03:00, 04:00 (+3 more)"
    );
}

#[tokio::test]
async fn notifications_can_be_turned_off() {
    let tmp = tempfile::tempdir().unwrap();
    let mut config = config_in(tmp.path());
    config.show_notifications = false;
    let notifier = RecordingNotifier::default();

    run_check(&config, &FixedFeed, &ChronoTzLookup, &notifier, day())
        .await
        .unwrap();
    assert!(notifier.sent().is_empty());
}

#[tokio::test(start_paused = true)]
async fn exhausted_retries_notify_failure_and_write_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let mut config = config_in(tmp.path());
    config.retries = 2;
    let feed = DownFeed::default();
    let notifier = RecordingNotifier::default();

    let err = run_check(&config, &feed, &ChronoTzLookup, &notifier, day())
        .await
        .unwrap_err();

    assert!(matches!(err, StromprisError::RetriesExhausted { attempts: 3, .. }));
    assert_eq!(err.exit_code(), 2);
    assert_eq!(feed.calls.load(Ordering::SeqCst), 3);

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, NOTIFY_ERROR_TITLE);
    assert!(sent[0].1.starts_with("Failed to get prices: "));
    assert!(!tmp.path().join("outputs").exists());
}

#[tokio::test]
async fn unwritable_output_fails_after_success_notification() {
    let tmp = tempfile::tempdir().unwrap();
    let blocker = tmp.path().join("outputs");
    std::fs::write(&blocker, "a file where the directory should be").unwrap();
    let config = config_in(tmp.path());
    let notifier = RecordingNotifier::default();

    let err = run_check(&config, &FixedFeed, &ChronoTzLookup, &notifier, day())
        .await
        .unwrap_err();
    assert_eq!(err.exit_code(), 1);

    let titles: Vec<String> = notifier.sent().into_iter().map(|(t, _)| t).collect();
    assert_eq!(titles, vec![NOTIFY_TITLE, NOTIFY_ERROR_TITLE]);
}

#[tokio::test]
async fn end_to_end_over_http() {
    let body: Vec<Value> = PRICES
        .iter()
        .enumerate()
        .map(|(h, &p)| {
            json!({
                "NOK_per_kWh": p,
                "time_start": format!("2025-08-17T{:02}:00:00+02:00", h),
            })
        })
        .collect();

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/prices/2025/08-17_NO1.json")
        .with_status(200)
        .with_body(Value::Array(body).to_string())
        .create_async()
        .await;

    let tmp = tempfile::tempdir().unwrap();
    let mut config = config_in(tmp.path());
    config.include_vat = true;
    config.feed.base_url = server.url();
    let feed = HvaKosterStrommenFeed::from_config(&config, TlsSettings::default());
    let notifier = RecordingNotifier::default();

    let outcome = run_check(&config, &feed, &ChronoTzLookup, &notifier, day())
        .await
        .unwrap();
    mock.assert_async().await;

    // 0.39 * 1.25 is the only price at or below 0.50
    let hits = &outcome.result.selection.hits;
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].hour_label(), "04:00");
    assert_eq!(hits[0].price, 0.4875);
    assert_eq!(outcome.result.rows.len(), 24);
}

#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes as a feed response body
    if let Ok(records) = strompris::feed::parse_payload(data) {
        assert!(records.len() == 24 || records.len() == 25);
        let _ = strompris::normalize::normalize_rows(&records, true);
    }
});

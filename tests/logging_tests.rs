use strompris::logging::{LogContext, get_logger_with_context, min_level, parse_log_level};
use tracing::Level;

#[test]
fn parse_accepts_python_style_names() {
    assert_eq!(parse_log_level("warning").unwrap(), Level::WARN);
    assert_eq!(parse_log_level("CRITICAL").unwrap(), Level::ERROR);
    assert_eq!(parse_log_level("Debug").unwrap(), Level::DEBUG);
    assert!(parse_log_level("loud").is_err());
}

#[test]
fn min_level_picks_the_more_verbose() {
    assert_eq!(min_level(Level::INFO, Level::DEBUG), Level::DEBUG);
    assert_eq!(min_level(Level::ERROR, Level::WARN), Level::WARN);
}

#[test]
fn context_carries_area_and_day() {
    let day = chrono::NaiveDate::from_ymd_opt(2025, 8, 17).unwrap();
    let ctx = LogContext::new("pipeline").with_area("NO1").with_day(day);
    assert_eq!(ctx.area.as_deref(), Some("NO1"));
    assert_eq!(ctx.day, Some(day));
    assert_eq!(ctx.to_string(), "component=pipeline,area=NO1,day=2025-08-17");

    // Logging without an installed subscriber is a no-op
    get_logger_with_context(ctx).info("hello");
}
